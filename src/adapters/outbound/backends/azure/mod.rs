//! Azure Resource Manager backend
//!
//! Writes `<model>.json`. Every compute becomes a Linux VM with its network
//! interface, security group and public IP on one shared virtual network.
//! The software a VM hosts is installed by a single CustomScript extension
//! running the component scripts in hosting order.

mod resources;

pub use resources::{ArmResource, ArmTemplate, Requirement, VmProfile};

use super::support::{component_env, operations_with_artifacts, to_json};
use crate::deployment_model::domain::{Component, ComponentId};
use crate::deployment_model::services::TopologyTraversal;
use crate::deployment_model::visitor::{BackendVisitor, ComponentVisitor, VisitorHelper};
use crate::shared::Result;
use crate::transformation::propagation::merge_contributions;
use crate::transformation::{Lifecycle, ProcessedComponents, TransformationContext};
use indexmap::IndexMap;

const SCRIPTS_DIR: &str = "scripts";

pub struct AzureLifecycle {
    context: TransformationContext,
}

impl AzureLifecycle {
    pub const TARGET: &'static str = "azure";

    pub fn new(context: TransformationContext) -> Self {
        Self { context }
    }

    /// Output file name: `<model>.json`
    pub fn template_file(&self) -> String {
        format!("{}.json", self.context.model().normalized_name())
    }
}

impl Lifecycle for AzureLifecycle {
    fn context(&self) -> &TransformationContext {
        &self.context
    }

    fn transform(&mut self) -> Result<()> {
        tracing::info!(model = self.context.model().name(), "begin transformation to Azure");
        let mut visitor = ArmVisitor::new(&self.context);
        VisitorHelper::visit_components(self.context.topology(), &mut visitor)?;

        let content = to_json(&visitor.into_template())?;
        self.context
            .file_access()
            .write(&self.template_file(), &content)?;
        tracing::info!("transformation to Azure successful");
        Ok(())
    }
}

#[derive(Debug, Default)]
struct ScriptSteps {
    file_uris: Vec<String>,
    commands: Vec<String>,
}

pub struct ArmVisitor<'a> {
    context: &'a TransformationContext,
    profile: VmProfile,
    network: ArmResource,
    machines: IndexMap<ComponentId, ArmResource>,
    scripts: IndexMap<ComponentId, ScriptSteps>,
    processed: ProcessedComponents,
}

impl<'a> ArmVisitor<'a> {
    pub fn new(context: &'a TransformationContext) -> Self {
        let settings = context.settings();
        let profile = VmProfile {
            size: settings.option_or("vm_size", "Standard_B1s").to_string(),
            admin_username: settings.option_or("admin_username", "azureuser").to_string(),
            image_publisher: settings.option_or("image_publisher", "Canonical").to_string(),
            image_offer: settings
                .option_or("image_offer", "0001-com-ubuntu-server-jammy")
                .to_string(),
            image_sku: settings.option_or("image_sku", "22_04-lts-gen2").to_string(),
        };
        let network_name = format!("{}-vnet", context.model().normalized_name());
        Self {
            context,
            profile,
            network: resources::virtual_network(&network_name),
            machines: IndexMap::new(),
            scripts: IndexMap::new(),
            processed: ProcessedComponents::new(),
        }
    }

    /// The network, then every VM, then the extensions installing software
    pub fn into_template(self) -> ArmTemplate {
        if self.machines.is_empty() {
            return ArmTemplate::from_resources(Vec::new());
        }
        let mut roots = vec![self.network];
        let mut extensions = Vec::new();
        for (compute, steps) in self.scripts.iter().filter(|(_, s)| !s.commands.is_empty()) {
            if let Some(vm) = self.machines.get(compute) {
                extensions.push(resources::custom_script(
                    vm,
                    &steps.file_uris,
                    &steps.commands.join(" && "),
                ));
            }
        }
        roots.extend(self.machines.into_values());
        roots.extend(extensions);
        ArmTemplate::from_resources(roots)
    }

    /// Ports exposed by the software stacked on `compute`
    fn exposed_ports(&self, compute: ComponentId) -> Result<Vec<u16>> {
        let topology = self.context.topology();
        let mut ports = Vec::new();
        for id in TopologyTraversal::hosting_stack(topology, compute) {
            let component = topology.component(id);
            let port = if let Some(dbms) = component.as_dbms() {
                dbms.port()?
            } else if let Some(web_server) = component.as_web_server() {
                web_server.port()?
            } else {
                None
            };
            if let Some(port) = port.filter(|p| !ports.contains(p)) {
                ports.push(port);
            }
        }
        Ok(ports)
    }

    fn add_scripts(&mut self, id: ComponentId, component: &Component) -> Result<()> {
        if !self.processed.mark_transformed(id) {
            return Ok(());
        }
        let context = self.context;
        let topology = context.topology();
        let Some(compute) = TopologyTraversal::resolve_hosting_component(topology, id)? else {
            tracing::warn!(component = component.name(), "component is not hosted on a compute, skipping");
            return Ok(());
        };

        let mut contributions = Vec::new();
        for host in TopologyTraversal::hosts_above(topology, id).into_iter().rev() {
            contributions.push(component_env(topology.component(host))?);
        }
        contributions.push(component_env(component)?);
        let prefix: String = merge_contributions(contributions)
            .iter()
            .map(|(name, value)| format!("{}={} ", name, shell_quote(value)))
            .collect();

        let files = context.file_access();
        let steps = self.scripts.entry(compute).or_default();
        for operation in operations_with_artifacts(component)? {
            for artifact in operation.artifacts() {
                // CustomScript downloads every file into one directory
                let script = format!("{}_{}", component.normalized_name(), artifact.file_name());
                files.write(
                    &format!("{}/{}", SCRIPTS_DIR, script),
                    &files.read_to_string(artifact.value())?,
                )?;
                steps.file_uris.push(format!(
                    "[concat(parameters('artifactsLocation'), '/{}')]",
                    script
                ));
                steps.commands.push(format!("{}sh {}", prefix, script));
            }
        }
        Ok(())
    }
}

/// Single-quotes a value for `sh`
fn shell_quote(value: &str) -> String {
    format!("'{}'", value.replace('\'', r"'\''"))
}

impl BackendVisitor for ArmVisitor<'_> {
    fn target_name(&self) -> &str {
        AzureLifecycle::TARGET
    }
}

impl ComponentVisitor for ArmVisitor<'_> {
    fn visit_compute(&mut self, id: ComponentId, component: &Component) -> Result<()> {
        if !self.processed.mark_transformed(id) {
            return Ok(());
        }
        let name = component.normalized_name().replace('_', "-");
        let public_key = component
            .as_compute()
            .map(|c| c.public_key())
            .transpose()?
            .flatten();

        let interface = resources::network_interface(
            &format!("{}-nic", name),
            resources::security_group(&format!("{}-nsg", name), &self.exposed_ports(id)?),
            resources::public_ip(&format!("{}-ip", name)),
            &self.network.resource_id(),
        );
        let vm = resources::virtual_machine(&name, interface, &self.profile, public_key);
        tracing::debug!(compute = component.name(), vm = vm.name(), "added virtual machine");
        self.machines.insert(id, vm);
        Ok(())
    }

    fn visit_software_component(&mut self, id: ComponentId, component: &Component) -> Result<()> {
        self.add_scripts(id, component)
    }

    fn visit_database(&mut self, id: ComponentId, component: &Component) -> Result<()> {
        self.add_scripts(id, component)
    }

    fn visit_web_application(&mut self, id: ComponentId, component: &Component) -> Result<()> {
        self.add_scripts(id, component)
    }
}
