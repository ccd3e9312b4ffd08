//! OpenStack Heat (HOT) backend
//!
//! Every compute becomes a server with its port and floating IP; every
//! software operation with an artifact becomes a `SoftwareDeployment`
//! running a `SoftwareConfig` on the server that hosts the component.

mod template;

use super::support::{component_env, operations_with_artifacts, to_yaml};
use crate::deployment_model::domain::{Component, ComponentId, RelationKind};
use crate::deployment_model::services::TopologyTraversal;
use crate::deployment_model::visitor::{BackendVisitor, ComponentVisitor, VisitorHelper};
use crate::shared::error::TransformError;
use crate::shared::Result;
use crate::transformation::propagation::{collect_topology_values, merge_contributions};
use crate::transformation::{
    Lifecycle, NodeId, OutputGraph, ProcessedComponents, ResourceDescriptor,
    TransformationContext,
};
use indexmap::IndexMap;
use serde_json::{json, Value};
use std::collections::HashMap;
use template::{get_param, get_resource, HeatParameter, HeatTemplate};

const SERVER_TYPE: &str = "OS::Nova::Server";
const PORT_TYPE: &str = "OS::Neutron::Port";
const FLOATING_IP_TYPE: &str = "OS::Neutron::FloatingIP";
const FLOATING_IP_ASSOC_TYPE: &str = "OS::Neutron::FloatingIPAssociation";
const SOFTWARE_DEPLOYMENT_TYPE: &str = "OS::Heat::SoftwareDeployment";
const SOFTWARE_CONFIG_TYPE: &str = "OS::Heat::SoftwareConfig";

const KEY_NAME: &str = "key_name";
const IMAGE: &str = "image";
const FLAVOR: &str = "flavor";
const NETWORK: &str = "network";
const SECURITY_GROUP: &str = "security_group";

pub struct HeatLifecycle {
    context: TransformationContext,
}

impl HeatLifecycle {
    pub const TARGET: &'static str = "heat";

    pub fn new(context: TransformationContext) -> Self {
        Self { context }
    }

    /// Output file name: `<model>.yaml`
    pub fn template_file(&self) -> String {
        format!("{}.yaml", self.context.model().normalized_name())
    }
}

impl Lifecycle for HeatLifecycle {
    fn context(&self) -> &TransformationContext {
        &self.context
    }

    fn transform(&mut self) -> Result<()> {
        tracing::info!(model = self.context.model().name(), "begin transformation to Heat");
        let mut visitor = HeatVisitor::new(&self.context);
        VisitorHelper::visit_components(self.context.topology(), &mut visitor)?;

        let content = to_yaml(&visitor.into_template())?;
        self.context
            .file_access()
            .write(&self.template_file(), &content)?;
        tracing::info!("transformation to Heat successful");
        Ok(())
    }
}

/// Builds the HOT resource graph while visiting the topology
pub struct HeatVisitor<'a> {
    context: &'a TransformationContext,
    graph: OutputGraph<ResourceDescriptor>,
    parameters: IndexMap<String, HeatParameter>,
    instances: HashMap<ComponentId, NodeId>,
    processed: ProcessedComponents,
}

impl<'a> HeatVisitor<'a> {
    pub fn new(context: &'a TransformationContext) -> Self {
        Self {
            context,
            graph: OutputGraph::new(),
            parameters: IndexMap::new(),
            instances: HashMap::new(),
            processed: ProcessedComponents::new(),
        }
    }

    pub fn graph(&self) -> &OutputGraph<ResourceDescriptor> {
        &self.graph
    }

    pub fn into_template(self) -> HeatTemplate {
        let description = self.context.model().description().map(str::to_string);
        HeatTemplate::from_graph(description, self.parameters, &self.graph)
    }

    /// Declares a shared parameter; `backends.heat.<name>` overrides the default
    fn add_parameter(&mut self, name: &str, default: Option<&str>) {
        let mut parameter = HeatParameter::string();
        if let Some(default) = self.context.settings().option(name).or(default) {
            parameter = parameter.with_default(default);
        }
        self.parameters.entry(name.to_string()).or_insert(parameter);
    }

    /// Values a software deployment receives: the hosting stack first
    /// (farthest host first), then Connects-To targets, then the component
    /// itself, later entries winning
    fn input_values(&self, id: ComponentId, component: &Component) -> Result<IndexMap<String, String>> {
        let topology = self.context.topology();
        let mut contributions = Vec::new();
        for host in TopologyTraversal::hosts_above(topology, id).into_iter().rev() {
            contributions.push(component_env(topology.component(host))?);
        }
        contributions.push(collect_topology_values(
            topology,
            id,
            RelationKind::ConnectsTo,
            |target| component_env(topology.component(target)),
        )?);
        contributions.push(component_env(component)?);
        Ok(merge_contributions(contributions))
    }

    fn handle_software_deployment(&mut self, id: ComponentId, component: &Component) -> Result<()> {
        if !self.processed.mark_transformed(id) {
            return Ok(());
        }
        let context = self.context;
        let topology = context.topology();
        let Some(compute) = TopologyTraversal::resolve_hosting_component(topology, id)? else {
            tracing::warn!(
                component = component.name(),
                "component is not hosted on a compute, skipping"
            );
            return Ok(());
        };
        let instance = *self.instances.get(&compute).ok_or_else(|| TransformError::Validation {
            message: format!(
                "compute '{}' was not visited before '{}'",
                topology.component(compute).name(),
                component.name()
            ),
        })?;
        let instance_name = self.graph.node(instance).name.clone();

        let inputs = self.input_values(id, component)?;
        for operation in operations_with_artifacts(component)? {
            // One config per operation; further artifacts are ignored
            let artifact = &operation.artifacts()[0];
            let script = context.file_access().read_to_string(artifact.value())?;

            self.graph
                .node_mut(instance)
                .set_property("user_data_format", json!("SOFTWARE_CONFIG"));

            let deployment_name =
                format!("{}_{}", component.normalized_name(), operation.normalized_name());
            let config_name = format!("{}_config", deployment_name);

            let mut deployment = ResourceDescriptor::new(&deployment_name, SOFTWARE_DEPLOYMENT_TYPE)
                .with_property("config", get_resource(&config_name))
                .with_property("server", get_resource(&instance_name));
            let mut config = ResourceDescriptor::new(&config_name, SOFTWARE_CONFIG_TYPE)
                .with_property("group", json!("script"));
            if !inputs.is_empty() {
                let values: serde_json::Map<String, Value> = inputs
                    .iter()
                    .map(|(k, v)| (k.clone(), Value::String(v.clone())))
                    .collect();
                deployment.set_property("input_values", Value::Object(values));
                let declared: Vec<Value> = inputs.keys().map(|k| json!({ "name": k })).collect();
                config.set_property("inputs", Value::Array(declared));
            }
            config.set_property("config", Value::String(script));

            let deployment = self.graph.add_node(deployment)?;
            let config = self.graph.add_node(config)?;
            self.graph.add_dependency(deployment, instance);
            self.graph.add_dependency(deployment, config);
        }
        Ok(())
    }
}

impl BackendVisitor for HeatVisitor<'_> {
    fn target_name(&self) -> &str {
        HeatLifecycle::TARGET
    }
}

impl ComponentVisitor for HeatVisitor<'_> {
    fn visit_compute(&mut self, id: ComponentId, component: &Component) -> Result<()> {
        if !self.processed.mark_transformed(id) {
            return Ok(());
        }
        let name = component.normalized_name();
        self.add_parameter(KEY_NAME, None);
        self.add_parameter(IMAGE, None);
        self.add_parameter(FLAVOR, None);
        self.add_parameter(NETWORK, Some("default"));
        self.add_parameter(SECURITY_GROUP, Some("default"));

        let port_name = format!("{}_port", name);
        let port = self.graph.add_node(
            ResourceDescriptor::new(&port_name, PORT_TYPE)
                .with_property(NETWORK, get_param(NETWORK))
                .with_property("security_groups", json!([get_param(SECURITY_GROUP)])),
        )?;

        let instance = self.graph.add_node(
            ResourceDescriptor::new(&name, SERVER_TYPE)
                .with_property(KEY_NAME, get_param(KEY_NAME))
                .with_property(IMAGE, get_param(IMAGE))
                .with_property(FLAVOR, get_param(FLAVOR))
                .with_property("networks", json!([{ "port": get_resource(&port_name) }])),
        )?;
        self.graph.add_dependency(instance, port);

        let floating_ip_name = format!("{}_floating_ip", name);
        let floating_ip = self.graph.add_node(
            ResourceDescriptor::new(&floating_ip_name, FLOATING_IP_TYPE)
                .with_property("floating_network", get_param(NETWORK))
                .with_property("port_id", get_resource(&port_name)),
        )?;
        self.graph.add_dependency(floating_ip, port);

        let association = self.graph.add_node(
            ResourceDescriptor::new(
                format!("{}_floating_ip_association", name),
                FLOATING_IP_ASSOC_TYPE,
            )
            .with_property("floatingip_id", get_resource(&floating_ip_name))
            .with_property("port_id", get_resource(&port_name)),
        )?;
        self.graph.add_dependency(association, floating_ip);
        self.graph.add_dependency(association, port);

        self.instances.insert(id, instance);
        Ok(())
    }

    fn visit_software_component(&mut self, id: ComponentId, component: &Component) -> Result<()> {
        self.handle_software_deployment(id, component)
    }

    fn visit_database(&mut self, id: ComponentId, component: &Component) -> Result<()> {
        self.handle_software_deployment(id, component)
    }

    fn visit_web_application(&mut self, id: ComponentId, component: &Component) -> Result<()> {
        self.handle_software_deployment(id, component)
    }
}
