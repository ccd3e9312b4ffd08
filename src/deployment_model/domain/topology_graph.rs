use super::component::Component;
use super::relation::{Relation, RelationKind};
use std::collections::HashMap;

/// Stable identifier of a component node in a [`TopologyGraph`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ComponentId(usize);

impl ComponentId {
    pub fn index(self) -> usize {
        self.0
    }
}

/// Stable identifier of a relation edge in a [`TopologyGraph`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct EdgeId(usize);

/// A typed edge, directed from the declaring (dependent) component to its target
#[derive(Debug, Clone)]
pub struct TopologyEdge {
    id: EdgeId,
    source: ComponentId,
    target: ComponentId,
    relation: Relation,
}

impl TopologyEdge {
    pub fn id(&self) -> EdgeId {
        self.id
    }

    pub fn source(&self) -> ComponentId {
        self.source
    }

    pub fn target(&self) -> ComponentId {
        self.target
    }

    pub fn relation(&self) -> &Relation {
        &self.relation
    }

    pub fn kind(&self) -> RelationKind {
        self.relation.kind()
    }
}

/// Directed graph of components (nodes) and relations (edges)
///
/// Adjacency lists keep insertion order, so every query iterates
/// deterministically.
#[derive(Debug, Clone, Default)]
pub struct TopologyGraph {
    components: Vec<Component>,
    by_name: HashMap<String, ComponentId>,
    edges: Vec<TopologyEdge>,
    outgoing: Vec<Vec<EdgeId>>,
    incoming: Vec<Vec<EdgeId>>,
}

impl TopologyGraph {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_component(&mut self, component: Component) -> ComponentId {
        if let Some(existing) = self.by_name.get(component.name()) {
            return *existing;
        }
        let id = ComponentId(self.components.len());
        self.by_name.insert(component.name().to_string(), id);
        self.components.push(component);
        self.outgoing.push(Vec::new());
        self.incoming.push(Vec::new());
        id
    }

    pub fn add_relation(
        &mut self,
        source: ComponentId,
        target: ComponentId,
        relation: Relation,
    ) -> EdgeId {
        let id = EdgeId(self.edges.len());
        self.edges.push(TopologyEdge {
            id,
            source,
            target,
            relation,
        });
        self.outgoing[source.0].push(id);
        self.incoming[target.0].push(id);
        id
    }

    pub fn component(&self, id: ComponentId) -> &Component {
        &self.components[id.0]
    }

    pub fn component_id(&self, name: &str) -> Option<ComponentId> {
        self.by_name.get(name).copied()
    }

    pub fn find(&self, name: &str) -> Option<&Component> {
        self.component_id(name).map(|id| self.component(id))
    }

    pub fn component_ids(&self) -> impl Iterator<Item = ComponentId> {
        (0..self.components.len()).map(ComponentId)
    }

    pub fn components(&self) -> impl Iterator<Item = (ComponentId, &Component)> {
        self.components
            .iter()
            .enumerate()
            .map(|(i, c)| (ComponentId(i), c))
    }

    pub fn edge(&self, id: EdgeId) -> &TopologyEdge {
        &self.edges[id.0]
    }

    pub fn edges(&self) -> impl Iterator<Item = &TopologyEdge> {
        self.edges.iter()
    }

    pub fn outgoing_edges(&self, id: ComponentId) -> impl Iterator<Item = &TopologyEdge> {
        self.outgoing[id.0].iter().map(|e| &self.edges[e.0])
    }

    pub fn incoming_edges(&self, id: ComponentId) -> impl Iterator<Item = &TopologyEdge> {
        self.incoming[id.0].iter().map(|e| &self.edges[e.0])
    }

    pub fn component_count(&self) -> usize {
        self.components.len()
    }

    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    pub fn is_empty(&self) -> bool {
        self.components.is_empty()
    }
}
