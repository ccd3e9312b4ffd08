use crate::deployment_model::domain::{
    keys, Component, ComponentId, DeploymentModel, EntityGraph, EntityId, ModelEntity, Relation,
    RelationKind, TopologyGraph,
};
use crate::shared::error::TransformError;
use crate::shared::Result;
use std::sync::Arc;

/// A relation entry before its target has been resolved to a topology node
struct PendingRelation {
    source: ComponentId,
    target: String,
    relation: Relation,
}

/// ModelBuilder service turning an entity graph into a typed deployment model
///
/// Every component instance becomes a topology node and every relation entry
/// a typed edge. Integrity is checked here, once, so traversal code can rely
/// on well-formed targets and on at most one host per component.
pub struct ModelBuilder;

impl ModelBuilder {
    /// Builds the deployment model named `name` from a parsed entity graph
    ///
    /// # Errors
    /// - a component or relation without a resolvable type
    /// - a relation naming a component that does not exist
    /// - a component declaring more than one Hosted-On relation
    pub fn build(name: &str, graph: EntityGraph) -> Result<DeploymentModel> {
        let graph = Arc::new(graph);
        let description = graph.child_string(graph.root(), keys::DESCRIPTION);
        let mut topology = TopologyGraph::new();
        let mut pending = Vec::new();

        if let Some(components) = graph.get_child(graph.root(), keys::COMPONENTS) {
            for instance in graph.get_children(components) {
                let entity = ModelEntity::new(Arc::clone(&graph), instance);
                let component = Component::from_entity(entity)?;
                tracing::debug!(
                    component = component.name(),
                    kind = %component.kind(),
                    "resolved component"
                );
                let name = component.name().to_string();
                let id = topology.add_component(component);
                pending.extend(Self::read_relations(&graph, instance, id, &name)?);
            }
        }

        for PendingRelation {
            source,
            target,
            relation,
        } in pending
        {
            let target_id =
                topology
                    .component_id(&target)
                    .ok_or_else(|| TransformError::UnknownEntity {
                        source_component: relation.source().to_string(),
                        relation: relation.name().to_string(),
                        target,
                    })?;
            topology.add_relation(source, target_id, relation);
        }

        Self::check_single_host(&topology)?;

        tracing::info!(
            model = name,
            components = topology.component_count(),
            relations = topology.edge_count(),
            "deployment model built"
        );
        Ok(DeploymentModel::new(name, description, graph, topology))
    }

    /// Reads `relations:` entries of one instance
    ///
    /// An entry is `- <relation_type>: <target>` or
    /// `- <relation_type>: { target: <target>, properties: ... }`.
    fn read_relations(
        graph: &Arc<EntityGraph>,
        instance: EntityId,
        source_id: ComponentId,
        source: &str,
    ) -> Result<Vec<PendingRelation>> {
        let Some(relations) = graph.get_child(instance, keys::RELATIONS) else {
            return Ok(Vec::new());
        };

        let mut result = Vec::new();
        for entry in graph.get_children(relations) {
            let mut relation_ids = graph.get_children(entry).peekable();
            if relation_ids.peek().is_none() {
                let found = graph
                    .entity(entry)
                    .value()
                    .map(|v| format!(" (found '{}')", v))
                    .unwrap_or_default();
                return Err(TransformError::Validation {
                    message: format!(
                        "relation entry of '{}' must map a relation type to a target, \
                         e.g. '- hosted_on: <component>'{}",
                        source, found
                    ),
                }
                .into());
            }
            for relation_id in relation_ids {
                let entity = ModelEntity::new(Arc::clone(graph), relation_id);
                let target = graph
                    .entity(relation_id)
                    .value()
                    .map(|v| v.to_string())
                    .or_else(|| graph.child_string(relation_id, keys::TARGET))
                    .ok_or_else(|| TransformError::UnknownEntity {
                        source_component: source.to_string(),
                        relation: entity.name().to_string(),
                        target: String::new(),
                    })?;
                let kind = RelationKind::resolve(&entity.type_chain_names()?);
                result.push(PendingRelation {
                    source: source_id,
                    target: target.clone(),
                    relation: Relation::new(entity, kind, source, target),
                });
            }
        }
        Ok(result)
    }

    fn check_single_host(topology: &TopologyGraph) -> Result<()> {
        for id in topology.component_ids() {
            let hosts: Vec<String> = topology
                .outgoing_edges(id)
                .filter(|edge| edge.kind().is_a(RelationKind::HostedOn))
                .map(|edge| topology.component(edge.target()).name().to_string())
                .collect();
            if hosts.len() > 1 {
                return Err(TransformError::MultipleHosts {
                    component: topology.component(id).name().to_string(),
                    hosts,
                }
                .into());
            }
        }
        Ok(())
    }
}
