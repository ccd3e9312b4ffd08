use super::entity_graph::EntityGraph;
use super::topology_graph::TopologyGraph;
use std::sync::Arc;

/// The resolved deployment model: a name plus its topology
///
/// Immutable after construction, so one model can back several target runs.
#[derive(Debug, Clone)]
pub struct DeploymentModel {
    name: String,
    description: Option<String>,
    graph: Arc<EntityGraph>,
    topology: TopologyGraph,
}

impl DeploymentModel {
    pub fn new(
        name: impl Into<String>,
        description: Option<String>,
        graph: Arc<EntityGraph>,
        topology: TopologyGraph,
    ) -> Self {
        Self {
            name: name.into(),
            description,
            graph,
            topology,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn normalized_name(&self) -> String {
        super::normalize_name(&self.name)
    }

    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    pub fn graph(&self) -> &EntityGraph {
        &self.graph
    }

    pub fn topology(&self) -> &TopologyGraph {
        &self.topology
    }
}
