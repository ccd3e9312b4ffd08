use super::entity_graph::{keys, EntityGraph, EntityId};
use crate::shared::error::TransformError;
use crate::shared::Result;
use std::collections::HashSet;

/// Upper bound on inheritance depth; deeper chains are rejected as model errors
pub const MAX_INHERITANCE_DEPTH: usize = 64;

/// GraphHelper - type lookups over the attributed entity graph
pub struct GraphHelper;

impl GraphHelper {
    /// Returns the entity's declared type, following its type reference
    ///
    /// Absence is not an error here; callers decide whether it is.
    pub fn find_type_entity(graph: &EntityGraph, entity: EntityId) -> Option<EntityId> {
        graph.entity(entity).type_ref()
    }

    /// Resolves the inheritance chain of a type, nearest first
    ///
    /// The chain starts with `start_type` itself and follows `extends` until a
    /// type declares no parent. Reaching an already visited type ends the
    /// chain; a cyclic `extends` is a model defect, not a reason to loop.
    ///
    /// # Errors
    /// - `extends` names a type that does not exist
    /// - the chain is longer than [`MAX_INHERITANCE_DEPTH`]
    pub fn resolve_inheritance_chain(
        graph: &EntityGraph,
        start_type: EntityId,
    ) -> Result<Vec<EntityId>> {
        let mut chain = Vec::new();
        let mut visited = HashSet::new();
        let mut current = Some(start_type);

        while let Some(type_entity) = current {
            if !visited.insert(type_entity) {
                tracing::warn!(
                    type_name = graph.entity(type_entity).name(),
                    "inheritance cycle detected, truncating type chain"
                );
                break;
            }
            if chain.len() >= MAX_INHERITANCE_DEPTH {
                return Err(TransformError::InheritanceTooDeep {
                    type_name: graph.entity(start_type).name().to_string(),
                    limit: MAX_INHERITANCE_DEPTH,
                }
                .into());
            }
            chain.push(type_entity);
            current = Self::parent_type(graph, type_entity)?;
        }

        Ok(chain)
    }

    /// Names of the types in an inheritance chain, nearest first
    pub fn chain_names(graph: &EntityGraph, chain: &[EntityId]) -> Vec<String> {
        chain
            .iter()
            .map(|id| graph.entity(*id).name().to_string())
            .collect()
    }

    fn parent_type(graph: &EntityGraph, type_entity: EntityId) -> Result<Option<EntityId>> {
        let Some(parent_name) = graph.child_string(type_entity, keys::EXTENDS) else {
            return Ok(None);
        };
        let parent_name = parent_name.trim();
        if parent_name.is_empty() || parent_name == "null" || parent_name == "~" {
            return Ok(None);
        }
        graph
            .lookup_type_like(type_entity, parent_name)
            .map(Some)
            .ok_or_else(|| {
                TransformError::UnresolvableType {
                    entity: graph.entity(type_entity).name().to_string(),
                    type_name: Some(parent_name.to_string()),
                }
                .into()
            })
    }
}
