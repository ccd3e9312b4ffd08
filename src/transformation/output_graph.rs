use crate::deployment_model::domain::RelationKind;
use crate::shared::error::TransformError;
use crate::shared::Result;
use indexmap::{IndexMap, IndexSet};
use serde_json::Value;
use std::collections::HashMap;

/// A node of a backend's output graph, addressed by a unique name
pub trait OutputNode {
    fn name(&self) -> &str;
}

/// Stable identifier of a node in an [`OutputGraph`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(usize);

/// Edge label of the output graph
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OutputEdge {
    /// The source must be materialized after the target
    DependsOn,
    /// Mirrors a topology relation between the generated nodes
    Relation(RelationKind),
}

/// Graph of generated resources built while visiting the topology
///
/// Records exactly the edges a backend declares, deduplicated, in
/// declaration order. It never reorders nodes; the target format decides
/// how dependencies are honoured.
#[derive(Debug, Clone)]
pub struct OutputGraph<N> {
    nodes: Vec<N>,
    by_name: HashMap<String, NodeId>,
    edges: IndexSet<(NodeId, NodeId, OutputEdge)>,
}

impl<N> Default for OutputGraph<N> {
    fn default() -> Self {
        Self {
            nodes: Vec::new(),
            by_name: HashMap::new(),
            edges: IndexSet::new(),
        }
    }
}

impl<N: OutputNode> OutputGraph<N> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a node; names are unique within one graph
    ///
    /// # Errors
    /// Fails when a node with the same name already exists.
    pub fn add_node(&mut self, node: N) -> Result<NodeId> {
        if self.by_name.contains_key(node.name()) {
            return Err(TransformError::Validation {
                message: format!("Duplicate output resource name '{}'", node.name()),
            }
            .into());
        }
        let id = NodeId(self.nodes.len());
        self.by_name.insert(node.name().to_string(), id);
        self.nodes.push(node);
        Ok(id)
    }

    pub fn find(&self, name: &str) -> Option<NodeId> {
        self.by_name.get(name).copied()
    }

    pub fn node(&self, id: NodeId) -> &N {
        &self.nodes[id.0]
    }

    pub fn node_mut(&mut self, id: NodeId) -> &mut N {
        &mut self.nodes[id.0]
    }

    /// Nodes in insertion order
    pub fn nodes(&self) -> impl Iterator<Item = (NodeId, &N)> {
        self.nodes.iter().enumerate().map(|(i, n)| (NodeId(i), n))
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Records an edge; returns `false` if it was already present
    pub fn add_edge(&mut self, from: NodeId, to: NodeId, edge: OutputEdge) -> bool {
        self.edges.insert((from, to, edge))
    }

    /// Records that `from` depends on `to`
    pub fn add_dependency(&mut self, from: NodeId, to: NodeId) -> bool {
        self.add_edge(from, to, OutputEdge::DependsOn)
    }

    pub fn edges(&self) -> impl Iterator<Item = &(NodeId, NodeId, OutputEdge)> {
        self.edges.iter()
    }

    /// Direct dependencies of `node`, in declaration order
    pub fn dependencies(&self, node: NodeId) -> Vec<NodeId> {
        self.edges
            .iter()
            .filter(|(from, _, edge)| *from == node && *edge == OutputEdge::DependsOn)
            .map(|(_, to, _)| *to)
            .collect()
    }

    /// Names of the direct dependencies of `node`
    pub fn dependency_names(&self, node: NodeId) -> Vec<String> {
        self.dependencies(node)
            .into_iter()
            .map(|id| self.node(id).name().to_string())
            .collect()
    }

    /// Nodes reached over outgoing relation edges of `kind`, by node id
    pub fn targets(&self, node: NodeId, kind: RelationKind) -> Vec<NodeId> {
        let mut targets: Vec<NodeId> = self
            .edges
            .iter()
            .filter(|(from, _, edge)| *from == node && Self::is_relation(*edge, kind))
            .map(|(_, to, _)| *to)
            .collect();
        targets.sort();
        targets.dedup();
        targets
    }

    /// Nodes with relation edges of `kind` pointing at `node`, by node id
    pub fn sources(&self, node: NodeId, kind: RelationKind) -> Vec<NodeId> {
        let mut sources: Vec<NodeId> = self
            .edges
            .iter()
            .filter(|(_, to, edge)| *to == node && Self::is_relation(*edge, kind))
            .map(|(from, _, _)| *from)
            .collect();
        sources.sort();
        sources.dedup();
        sources
    }

    fn is_relation(edge: OutputEdge, kind: RelationKind) -> bool {
        matches!(edge, OutputEdge::Relation(k) if k.is_a(kind))
    }
}

/// A generated resource: name, target-format type and property assignments
#[derive(Debug, Clone, PartialEq)]
pub struct ResourceDescriptor {
    pub name: String,
    pub resource_type: String,
    pub properties: IndexMap<String, Value>,
}

impl ResourceDescriptor {
    pub fn new(name: impl Into<String>, resource_type: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            resource_type: resource_type.into(),
            properties: IndexMap::new(),
        }
    }

    pub fn with_property(mut self, key: impl Into<String>, value: Value) -> Self {
        self.properties.insert(key.into(), value);
        self
    }

    pub fn set_property(&mut self, key: impl Into<String>, value: Value) {
        self.properties.insert(key.into(), value);
    }
}

impl OutputNode for ResourceDescriptor {
    fn name(&self) -> &str {
        &self.name
    }
}
