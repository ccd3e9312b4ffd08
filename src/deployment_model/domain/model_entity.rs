use super::entity_graph::{keys, EntityGraph, EntityId};
use super::graph_helper::GraphHelper;
use super::operation::Operation;
use super::property::{Attribute, FromScalar, Property};
use crate::shared::error::TransformError;
use crate::shared::Result;
use indexmap::IndexMap;
use std::fmt;
use std::sync::Arc;

/// Typed wrapper over one graph entity with a back-reference to its graph
///
/// Adds inheritance-aware property and operation resolution on top of the
/// raw structural access the graph provides.
#[derive(Clone)]
pub struct ModelEntity {
    graph: Arc<EntityGraph>,
    id: EntityId,
}

impl ModelEntity {
    pub fn new(graph: Arc<EntityGraph>, id: EntityId) -> Self {
        Self { graph, id }
    }

    pub fn id(&self) -> EntityId {
        self.id
    }

    pub fn graph(&self) -> &EntityGraph {
        &self.graph
    }

    pub fn name(&self) -> &str {
        self.graph.entity(self.id).name()
    }

    pub fn normalized_name(&self) -> String {
        super::normalize_name(self.name())
    }

    pub fn description(&self) -> Option<String> {
        self.graph.child_string(self.id, keys::DESCRIPTION)
    }

    /// The declared `extends` parent, when this entity is a type definition
    pub fn extends(&self) -> Option<String> {
        self.graph.child_string(self.id, keys::EXTENDS)
    }

    /// Declared type name (`type:` child) of an instance
    pub fn type_name(&self) -> Option<String> {
        self.graph.child_string(self.id, keys::TYPE)
    }

    /// Inheritance chain of this entity's type, nearest first
    ///
    /// # Errors
    /// Fails when the entity has no resolvable type.
    pub fn type_chain(&self) -> Result<Vec<EntityId>> {
        let type_ref = GraphHelper::find_type_entity(&self.graph, self.id).ok_or_else(|| {
            TransformError::UnresolvableType {
                entity: self.name().to_string(),
                type_name: self.type_name(),
            }
        })?;
        GraphHelper::resolve_inheritance_chain(&self.graph, type_ref)
    }

    /// Names of the types in [`type_chain`](Self::type_chain)
    pub fn type_chain_names(&self) -> Result<Vec<String>> {
        let chain = self.type_chain()?;
        Ok(GraphHelper::chain_names(&self.graph, &chain))
    }

    /// Flattened properties: local assignments first, then nearest ancestor
    /// definitions, each name resolved by its nearest declaration.
    pub fn properties(&self) -> Result<IndexMap<String, Property>> {
        let chain = self.type_chain()?;
        let mut result: IndexMap<String, Property> = IndexMap::new();

        for owner in std::iter::once(self.id).chain(chain) {
            let Some(container) = self.graph.get_child(owner, keys::PROPERTIES) else {
                continue;
            };
            for child in self.graph.get_children(container) {
                let property = Property::from_entity(&self.graph, child);
                match result.get_mut(property.name()) {
                    Some(existing) => existing.inherit_from(property),
                    None => {
                        result.insert(property.name().to_string(), property);
                    }
                }
            }
        }

        Ok(result)
    }

    pub fn property(&self, name: &str) -> Result<Option<Property>> {
        Ok(self.properties()?.shift_remove(name))
    }

    /// Typed lookup; empty when the property is absent or has no value
    ///
    /// # Errors
    /// Fails with a type mismatch when the stored value cannot be coerced.
    pub fn property_as<T: FromScalar>(&self, attribute: &Attribute<T>) -> Result<Option<T>> {
        let Some(property) = self.property(attribute.name())? else {
            return Ok(None);
        };
        let Some(value) = property.value() else {
            return Ok(None);
        };
        T::from_scalar(value).map(Some).ok_or_else(|| {
            TransformError::TypeMismatch {
                entity: self.name().to_string(),
                attribute: attribute.name().to_string(),
                expected: T::TYPE_NAME,
                found: value.to_string(),
            }
            .into()
        })
    }

    /// Effective property values rendered as strings, skipping unset ones
    pub fn property_values(&self) -> Result<IndexMap<String, String>> {
        Ok(self
            .properties()?
            .into_iter()
            .filter_map(|(name, p)| p.value().map(|v| (name, v.to_string())))
            .collect())
    }

    /// Flattened operations, resolved with the same precedence as properties
    pub fn operations(&self) -> Result<IndexMap<String, Operation>> {
        let chain = self.type_chain()?;
        let mut result: IndexMap<String, Operation> = IndexMap::new();

        for owner in std::iter::once(self.id).chain(chain) {
            let Some(container) = self.graph.get_child(owner, keys::OPERATIONS) else {
                continue;
            };
            for child in self.graph.get_children(container) {
                let operation = Operation::from_entity(&self.graph, child);
                result
                    .entry(operation.name().to_string())
                    .or_insert(operation);
            }
        }

        Ok(result)
    }

    pub fn operation(&self, name: &str) -> Result<Option<Operation>> {
        Ok(self.operations()?.shift_remove(name))
    }

    /// Operations in standard lifecycle order
    pub fn ordered_operations(&self) -> Result<Vec<Operation>> {
        let mut operations: Vec<Operation> = self.operations()?.into_values().collect();
        operations.sort_by(Operation::lifecycle_order);
        Ok(operations)
    }
}

impl fmt::Debug for ModelEntity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ModelEntity")
            .field("id", &self.id)
            .field("name", &self.name())
            .finish()
    }
}

impl PartialEq for ModelEntity {
    fn eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.graph, &other.graph) && self.id == other.id
    }
}

impl Eq for ModelEntity {}
