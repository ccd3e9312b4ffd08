use super::entity_graph::{keys, EntityGraph, EntityId};
use std::cmp::Ordering;

/// Artifact attached to an operation, usually a script path relative to the model
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Artifact {
    name: String,
    value: String,
}

impl Artifact {
    pub fn new(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn value(&self) -> &str {
        &self.value
    }

    /// File name part of the artifact path
    pub fn file_name(&self) -> &str {
        self.value.rsplit('/').next().unwrap_or(&self.value)
    }
}

/// A named lifecycle operation (create, configure, start, ...)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Operation {
    name: String,
    description: Option<String>,
    artifacts: Vec<Artifact>,
}

/// Standard operations, in the order deployments run them
pub const STANDARD_OPERATIONS: [&str; 5] = ["create", "configure", "start", "stop", "delete"];

impl Operation {
    pub fn new(name: impl Into<String>, artifacts: Vec<Artifact>) -> Self {
        Self {
            name: name.into(),
            description: None,
            artifacts,
        }
    }

    /// Reads an operation from its graph entity
    ///
    /// `create: ./create.sh` is shorthand for one artifact named `cmd`;
    /// the long form lists `artifacts` as `- name: path` entries.
    pub fn from_entity(graph: &EntityGraph, id: EntityId) -> Self {
        let entity = graph.entity(id);
        if let Some(value) = entity.value() {
            return Self::new(entity.name(), vec![Artifact::new("cmd", value.to_string())]);
        }

        let mut artifacts = Vec::new();
        if let Some(list) = graph.get_child(id, keys::ARTIFACTS) {
            for item in graph.get_children(list) {
                let item_entity = graph.entity(item);
                if let Some(value) = item_entity.value() {
                    artifacts.push(Artifact::new("cmd", value.to_string()));
                    continue;
                }
                for field in graph.get_children(item) {
                    let field_entity = graph.entity(field);
                    if let Some(value) = field_entity.value() {
                        artifacts.push(Artifact::new(field_entity.name(), value.to_string()));
                    }
                }
            }
        }

        Self {
            name: entity.name().to_string(),
            description: graph.child_string(id, keys::DESCRIPTION),
            artifacts,
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

    pub fn artifacts(&self) -> &[Artifact] {
        &self.artifacts
    }

    pub fn has_artifacts(&self) -> bool {
        !self.artifacts.is_empty()
    }

    /// Position in the standard lifecycle; unknown operations sort last
    fn rank(&self) -> usize {
        STANDARD_OPERATIONS
            .iter()
            .position(|op| *op == self.name)
            .unwrap_or(STANDARD_OPERATIONS.len())
    }

    /// Orders operations create, configure, start, stop, delete, then by name
    pub fn lifecycle_order(a: &Operation, b: &Operation) -> Ordering {
        a.rank().cmp(&b.rank()).then_with(|| a.name.cmp(&b.name))
    }
}
