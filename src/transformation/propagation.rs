//! Derived-value propagation
//!
//! Values a resource needs but does not declare itself (environment
//! variables of connected stacks, parameters of nested sub-resources) are
//! gathered from neighbours and merged. Every merge applies contributions in
//! a fixed order and the last applied value wins on a key collision.

use super::output_graph::{NodeId, OutputGraph, OutputNode};
use crate::deployment_model::domain::{ComponentId, RelationKind, TopologyGraph};
use crate::deployment_model::services::TopologyTraversal;
use crate::shared::Result;
use indexmap::IndexMap;

/// Merges contributions in iteration order; later values replace earlier ones
pub fn merge_contributions<V, I>(contributions: I) -> IndexMap<String, V>
where
    I: IntoIterator<Item = IndexMap<String, V>>,
{
    let mut merged = IndexMap::new();
    for contribution in contributions {
        merged.extend(contribution);
    }
    merged
}

/// Collects values from the output-graph targets of `node` over `kind` edges
///
/// Targets are applied in node-id order, so output is reproducible.
pub fn collect_from_neighbors<N, V, F>(
    graph: &OutputGraph<N>,
    node: NodeId,
    kind: RelationKind,
    contribution: F,
) -> IndexMap<String, V>
where
    N: OutputNode,
    F: Fn(&N) -> IndexMap<String, V>,
{
    merge_contributions(
        graph
            .targets(node, kind)
            .into_iter()
            .map(|target| contribution(graph.node(target))),
    )
}

/// Collects values from topology neighbours of `component` over `kind` edges
///
/// Neighbours are applied in component-id order.
pub fn collect_topology_values<V, F>(
    graph: &TopologyGraph,
    component: ComponentId,
    kind: RelationKind,
    contribution: F,
) -> Result<IndexMap<String, V>>
where
    F: Fn(ComponentId) -> Result<IndexMap<String, V>>,
{
    let mut merged = IndexMap::new();
    for target in TopologyTraversal::get_target_components(graph, component, kind) {
        merged.extend(contribution(target)?);
    }
    Ok(merged)
}

/// A composite resource exposing values of its own plus nested resources
pub trait DerivedValues<V> {
    /// Values this resource requires itself
    fn own_values(&self) -> IndexMap<String, V>;

    /// Nested sub-resources, in the order their values are applied
    fn nested_sources(&self) -> Vec<&dyn DerivedValues<V>> {
        Vec::new()
    }
}

/// Own values first, then every nested source recursively, in order
pub fn collect_nested<V>(root: &dyn DerivedValues<V>) -> IndexMap<String, V> {
    let mut merged = root.own_values();
    for nested in root.nested_sources() {
        merged.extend(collect_nested(nested));
    }
    merged
}
