//! Hand-built topologies for unit tests that do not need a parsed document

use crate::deployment_model::domain::{
    keys, Component, ComponentKind, DeploymentModel, EntityGraphBuilder, EntityId, ModelEntity,
    Relation, RelationKind, ScalarValue, TopologyGraph,
};
use std::sync::Arc;

/// Builds a deployment model from components and edges given by variant
///
/// Entities carry no types, so only structure and variants are meaningful.
pub fn model(
    components: &[(&str, ComponentKind)],
    edges: &[(&str, RelationKind, &str)],
) -> DeploymentModel {
    let mut b = EntityGraphBuilder::new();
    let root = b.root();
    let list = b.add_entity(root, keys::COMPONENTS, None);
    let ids: Vec<EntityId> = components
        .iter()
        .map(|(name, _)| b.add_entity(list, *name, None))
        .collect();
    let edge_list = b.add_entity(root, "edges", None);
    let edge_ids: Vec<EntityId> = edges
        .iter()
        .enumerate()
        .map(|(i, (_, kind, target))| {
            let entry = b.add_entity(edge_list, i.to_string(), None);
            b.add_entity(
                entry,
                kind.type_name(),
                Some(ScalarValue::String(target.to_string())),
            )
        })
        .collect();
    let graph = Arc::new(b.build());

    let mut topology = TopologyGraph::new();
    for ((_, kind), id) in components.iter().zip(ids) {
        topology.add_component(Component::new(
            ModelEntity::new(Arc::clone(&graph), id),
            *kind,
        ));
    }
    for ((source, kind, target), id) in edges.iter().zip(edge_ids) {
        let relation = Relation::new(
            ModelEntity::new(Arc::clone(&graph), id),
            *kind,
            *source,
            *target,
        );
        let s = topology.component_id(source).unwrap();
        let t = topology.component_id(target).unwrap();
        topology.add_relation(s, t, relation);
    }
    DeploymentModel::new("test", None, graph, topology)
}

pub fn topology(
    components: &[(&str, ComponentKind)],
    edges: &[(&str, RelationKind, &str)],
) -> TopologyGraph {
    model(components, edges).topology().clone()
}
