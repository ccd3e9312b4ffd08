use crate::deployment_model::domain::{ComponentId, ComponentKind, RelationKind, TopologyGraph};
use crate::shared::error::TransformError;
use crate::shared::Result;
use std::collections::{BTreeSet, HashSet, VecDeque};

/// TopologyTraversal service for queries over the topology graph
///
/// Pure algorithms over an already built graph; no I/O.
pub struct TopologyTraversal;

impl TopologyTraversal {
    /// Follows Hosted-On edges from `component` to the Compute it runs on
    ///
    /// A Compute resolves to itself. A chain ending before any Compute
    /// resolves to `None`; callers skip that component.
    ///
    /// # Errors
    /// Fails with a hosting cycle when the chain revisits a component.
    pub fn resolve_hosting_component(
        graph: &TopologyGraph,
        component: ComponentId,
    ) -> Result<Option<ComponentId>> {
        let mut visited = HashSet::new();
        let mut current = component;

        loop {
            if graph.component(current).is_a(ComponentKind::Compute) {
                return Ok(Some(current));
            }
            if !visited.insert(current) {
                return Err(TransformError::HostingCycle {
                    component: graph.component(component).name().to_string(),
                }
                .into());
            }
            match Self::host_of(graph, current) {
                Some(host) => current = host,
                None => {
                    tracing::debug!(
                        component = graph.component(component).name(),
                        stopped_at = graph.component(current).name(),
                        "hosting chain ends before a compute"
                    );
                    return Ok(None);
                }
            }
        }
    }

    /// The direct host of a component, if it declares one
    pub fn host_of(graph: &TopologyGraph, component: ComponentId) -> Option<ComponentId> {
        graph
            .outgoing_edges(component)
            .find(|edge| edge.kind().is_a(RelationKind::HostedOn))
            .map(|edge| edge.target())
    }

    /// Components one hop away over outgoing edges of `kind` (or a refinement)
    pub fn get_target_components(
        graph: &TopologyGraph,
        source: ComponentId,
        kind: RelationKind,
    ) -> BTreeSet<ComponentId> {
        graph
            .outgoing_edges(source)
            .filter(|edge| edge.kind().is_a(kind))
            .map(|edge| edge.target())
            .collect()
    }

    /// Components one hop away over incoming edges of `kind` (or a refinement)
    pub fn get_source_components(
        graph: &TopologyGraph,
        target: ComponentId,
        kind: RelationKind,
    ) -> BTreeSet<ComponentId> {
        graph
            .incoming_edges(target)
            .filter(|edge| edge.kind().is_a(kind))
            .map(|edge| edge.source())
            .collect()
    }

    /// All components, hosts before the components they host
    ///
    /// Kahn's algorithm over Hosted-On edges; ties keep insertion order, so
    /// the result is stable across runs.
    ///
    /// # Errors
    /// Fails with a hosting cycle when Hosted-On edges form a loop.
    pub fn hosting_order(graph: &TopologyGraph) -> Result<Vec<ComponentId>> {
        let mut pending_hosts: Vec<usize> = graph
            .component_ids()
            .map(|id| Self::get_target_components(graph, id, RelationKind::HostedOn).len())
            .collect();
        let mut queue: VecDeque<ComponentId> = graph
            .component_ids()
            .filter(|id| pending_hosts[id.index()] == 0)
            .collect();
        let mut order = Vec::with_capacity(graph.component_count());

        while let Some(id) = queue.pop_front() {
            order.push(id);
            let hosted: BTreeSet<ComponentId> =
                Self::get_source_components(graph, id, RelationKind::HostedOn);
            for child in hosted {
                pending_hosts[child.index()] -= 1;
                if pending_hosts[child.index()] == 0 {
                    queue.push_back(child);
                }
            }
        }

        if order.len() < graph.component_count() {
            let stuck = graph
                .component_ids()
                .find(|id| pending_hosts[id.index()] > 0)
                .map(|id| graph.component(id).name().to_string())
                .unwrap_or_default();
            return Err(TransformError::HostingCycle { component: stuck }.into());
        }
        Ok(order)
    }

    /// Components transitively hosted on `host`, nearest first
    ///
    /// For a compute this is its software stack bottom-up: DBMS before the
    /// database it hosts.
    pub fn hosting_stack(graph: &TopologyGraph, host: ComponentId) -> Vec<ComponentId> {
        let mut stack = Vec::new();
        let mut visited = HashSet::from([host]);
        let mut queue = VecDeque::from([host]);

        while let Some(current) = queue.pop_front() {
            for child in Self::get_source_components(graph, current, RelationKind::HostedOn) {
                if visited.insert(child) {
                    stack.push(child);
                    queue.push_back(child);
                }
            }
        }
        stack
    }

    /// The chain of hosts above `component`, nearest first, excluding itself
    pub fn hosts_above(graph: &TopologyGraph, component: ComponentId) -> Vec<ComponentId> {
        let mut hosts = Vec::new();
        let mut visited = HashSet::from([component]);
        let mut current = component;
        while let Some(host) = Self::host_of(graph, current) {
            if !visited.insert(host) {
                break;
            }
            hosts.push(host);
            current = host;
        }
        hosts
    }
}
