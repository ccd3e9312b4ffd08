pub mod component;
pub mod deployment_model;
pub mod entity_graph;
pub mod graph_helper;
pub mod model_entity;
pub mod operation;
pub mod property;
pub mod relation;
pub mod topology_graph;

pub use component::{Component, ComponentKind, Compute, Database, Dbms, WebServer};
pub use deployment_model::DeploymentModel;
pub use entity_graph::{keys, Entity, EntityGraph, EntityGraphBuilder, EntityId, ScalarValue};
pub use graph_helper::{GraphHelper, MAX_INHERITANCE_DEPTH};
pub use model_entity::ModelEntity;
pub use operation::{Artifact, Operation, STANDARD_OPERATIONS};
pub use property::{Attribute, FromScalar, Property};
pub use relation::{Relation, RelationKind};
pub use topology_graph::{ComponentId, EdgeId, TopologyEdge, TopologyGraph};

/// Normalizes a model name into an identifier usable in generated artifacts
///
/// Lowercases ASCII letters and maps every character outside `[a-z0-9_]` to `_`.
pub fn normalize_name(name: &str) -> String {
    name.chars()
        .map(|c| {
            let c = c.to_ascii_lowercase();
            if c.is_ascii_lowercase() || c.is_ascii_digit() || c == '_' {
                c
            } else {
                '_'
            }
        })
        .collect()
}
