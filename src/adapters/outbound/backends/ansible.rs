//! Ansible backend
//!
//! Writes one playbook, `deployment.yml`, with a play per compute. Each
//! hosted component contributes one task per artifact, in hosting order,
//! running the copied script with the component's properties as environment.

use super::support::{component_env, operations_with_artifacts, require_tools, to_yaml};
use crate::deployment_model::domain::{Component, ComponentId, ComponentKind};
use crate::deployment_model::services::TopologyTraversal;
use crate::deployment_model::visitor::{BackendVisitor, ComponentVisitor, VisitorHelper};
use crate::shared::error::TransformError;
use crate::shared::Result;
use crate::transformation::propagation::merge_contributions;
use crate::transformation::{Lifecycle, ProcessedComponents, TransformationContext};
use indexmap::IndexMap;
use serde::Serialize;

const PLAYBOOK_FILE: &str = "deployment.yml";
const FILES_DIR: &str = "files";

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct Play {
    pub name: String,
    pub hosts: String,
    #[serde(rename = "become")]
    pub escalate: bool,
    pub tasks: Vec<Task>,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct Task {
    pub name: String,
    #[serde(rename = "ansible.builtin.script")]
    pub script: String,
    #[serde(skip_serializing_if = "IndexMap::is_empty")]
    pub environment: IndexMap<String, String>,
}

pub struct AnsibleLifecycle {
    context: TransformationContext,
}

impl AnsibleLifecycle {
    pub const TARGET: &'static str = "ansible";

    pub fn new(context: TransformationContext) -> Self {
        Self { context }
    }
}

impl Lifecycle for AnsibleLifecycle {
    fn context(&self) -> &TransformationContext {
        &self.context
    }

    fn check_environment(&mut self) -> Result<()> {
        require_tools(&self.context, &["ansible-playbook"])
    }

    /// Every database sits on exactly one DBMS somewhere in its hosting chain
    fn check_model(&mut self) -> Result<()> {
        let topology = self.context.topology();
        for (id, component) in topology.components() {
            if !component.is_a(ComponentKind::Database) {
                continue;
            }
            let dbms_hosts = TopologyTraversal::hosts_above(topology, id)
                .into_iter()
                .filter(|&host| topology.component(host).is_a(ComponentKind::Dbms))
                .count();
            if dbms_hosts != 1 {
                return Err(TransformError::ModelCheck {
                    target: Self::TARGET.to_string(),
                    reason: format!(
                        "database '{}' must be hosted on exactly one DBMS, found {}",
                        component.name(),
                        dbms_hosts
                    ),
                }
                .into());
            }
        }
        Ok(())
    }

    fn transform(&mut self) -> Result<()> {
        tracing::info!(model = self.context.model().name(), "begin transformation to Ansible");
        let mut visitor = PlaybookVisitor::new(&self.context);
        VisitorHelper::visit_components(self.context.topology(), &mut visitor)?;
        let plays = visitor.into_plays();

        self.context
            .file_access()
            .write(PLAYBOOK_FILE, &to_yaml(&plays)?)?;
        tracing::info!(plays = plays.len(), "transformation to Ansible successful");
        Ok(())
    }
}

/// Collects plays keyed by compute, in the order computes are visited
pub struct PlaybookVisitor<'a> {
    context: &'a TransformationContext,
    plays: IndexMap<ComponentId, Play>,
    processed: ProcessedComponents,
}

impl<'a> PlaybookVisitor<'a> {
    pub fn new(context: &'a TransformationContext) -> Self {
        Self {
            context,
            plays: IndexMap::new(),
            processed: ProcessedComponents::new(),
        }
    }

    pub fn into_plays(self) -> Vec<Play> {
        self.plays.into_values().collect()
    }

    fn add_tasks(&mut self, id: ComponentId, component: &Component) -> Result<()> {
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
        let environment = merge_contributions(contributions);

        let files = context.file_access();
        let mut tasks = Vec::new();
        for operation in operations_with_artifacts(component)? {
            for artifact in operation.artifacts() {
                let script = format!(
                    "{}/{}/{}",
                    FILES_DIR,
                    component.normalized_name(),
                    artifact.file_name()
                );
                files.write(&script, &files.read_to_string(artifact.value())?)?;
                tasks.push(Task {
                    name: format!("{}_{}", component.normalized_name(), operation.normalized_name()),
                    script,
                    environment: environment.clone(),
                });
            }
        }

        if let Some(play) = self.plays.get_mut(&compute) {
            play.tasks.extend(tasks);
        }
        Ok(())
    }
}

impl BackendVisitor for PlaybookVisitor<'_> {
    fn target_name(&self) -> &str {
        AnsibleLifecycle::TARGET
    }
}

impl ComponentVisitor for PlaybookVisitor<'_> {
    fn visit_compute(&mut self, id: ComponentId, component: &Component) -> Result<()> {
        if !self.processed.mark_transformed(id) {
            return Ok(());
        }
        let hosts = component.normalized_name();
        self.plays.insert(
            id,
            Play {
                name: format!("deploy {}", hosts),
                hosts,
                escalate: true,
                tasks: Vec::new(),
            },
        );
        Ok(())
    }

    fn visit_software_component(&mut self, id: ComponentId, component: &Component) -> Result<()> {
        self.add_tasks(id, component)
    }

    fn visit_database(&mut self, id: ComponentId, component: &Component) -> Result<()> {
        self.add_tasks(id, component)
    }

    fn visit_web_application(&mut self, id: ComponentId, component: &Component) -> Result<()> {
        self.add_tasks(id, component)
    }
}
