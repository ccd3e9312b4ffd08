use indexmap::IndexMap;
use std::collections::HashMap;
use std::fmt;

/// Well-known child names of the source model document
pub mod keys {
    pub const COMPONENTS: &str = "components";
    pub const COMPONENT_TYPES: &str = "component_types";
    pub const RELATION_TYPES: &str = "relation_types";
    pub const DESCRIPTION: &str = "description";
    pub const TYPE: &str = "type";
    pub const EXTENDS: &str = "extends";
    pub const PROPERTIES: &str = "properties";
    pub const OPERATIONS: &str = "operations";
    pub const RELATIONS: &str = "relations";
    pub const ARTIFACTS: &str = "artifacts";
    pub const DEFAULT_VALUE: &str = "default_value";
    pub const VALUE: &str = "value";
    pub const TARGET: &str = "target";
}

/// Stable identifier of an entity inside one [`EntityGraph`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct EntityId(usize);

impl EntityId {
    pub fn index(self) -> usize {
        self.0
    }
}

/// Scalar payload of a leaf entity
#[derive(Debug, Clone, PartialEq)]
pub enum ScalarValue {
    String(String),
    Integer(i64),
    Float(f64),
    Boolean(bool),
}

impl ScalarValue {
    pub fn as_str(&self) -> Option<&str> {
        match self {
            ScalarValue::String(s) => Some(s),
            _ => None,
        }
    }
}

impl fmt::Display for ScalarValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ScalarValue::String(s) => write!(f, "{}", s),
            ScalarValue::Integer(i) => write!(f, "{}", i),
            ScalarValue::Float(x) => write!(f, "{}", x),
            ScalarValue::Boolean(b) => write!(f, "{}", b),
        }
    }
}

/// A node of the attributed entity graph
///
/// Mapping-like: named children plus an optional scalar value and an
/// optional type reference to the entity acting as its type.
#[derive(Debug, Clone)]
pub struct Entity {
    id: EntityId,
    name: String,
    parent: Option<EntityId>,
    children: IndexMap<String, EntityId>,
    value: Option<ScalarValue>,
    type_ref: Option<EntityId>,
}

impl Entity {
    pub fn id(&self) -> EntityId {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn parent(&self) -> Option<EntityId> {
        self.parent
    }

    pub fn value(&self) -> Option<&ScalarValue> {
        self.value.as_ref()
    }

    pub fn type_ref(&self) -> Option<EntityId> {
        self.type_ref
    }

    pub fn get_child(&self, name: &str) -> Option<EntityId> {
        self.children.get(name).copied()
    }

    pub fn get_children(&self) -> impl Iterator<Item = EntityId> + '_ {
        self.children.values().copied()
    }

    pub fn has_children(&self) -> bool {
        !self.children.is_empty()
    }
}

/// Attributed entity graph produced from a source model document
///
/// Immutable once built: construct it through [`EntityGraphBuilder`], which
/// also builds the name -> type index and wires every instance's type reference.
#[derive(Debug, Clone)]
pub struct EntityGraph {
    entities: Vec<Entity>,
    component_types: HashMap<String, EntityId>,
    relation_types: HashMap<String, EntityId>,
}

impl EntityGraph {
    pub fn root(&self) -> EntityId {
        EntityId(0)
    }

    pub fn entity(&self, id: EntityId) -> &Entity {
        &self.entities[id.0]
    }

    pub fn len(&self) -> usize {
        self.entities.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entities.len() <= 1
    }

    pub fn get_child(&self, id: EntityId, name: &str) -> Option<EntityId> {
        self.entity(id).get_child(name)
    }

    pub fn get_children(&self, id: EntityId) -> impl Iterator<Item = EntityId> + '_ {
        self.entity(id).get_children()
    }

    /// Scalar value of the named child, if the child exists and carries one
    pub fn child_value(&self, id: EntityId, name: &str) -> Option<&ScalarValue> {
        self.get_child(id, name)
            .and_then(|child| self.entity(child).value())
    }

    /// String form of the named child's scalar value
    pub fn child_string(&self, id: EntityId, name: &str) -> Option<String> {
        self.child_value(id, name).map(|v| v.to_string())
    }

    /// Looks up a type entity by name in the namespace that `sibling` lives in
    ///
    /// Component types extend component types and relation types extend
    /// relation types, so `extends` is resolved against the sibling's index.
    pub fn lookup_type_like(&self, sibling: EntityId, name: &str) -> Option<EntityId> {
        let namespace = self.entity(sibling).parent()?;
        let namespace_name = self.entity(namespace).name();
        match namespace_name {
            keys::COMPONENT_TYPES => self.component_type(name),
            keys::RELATION_TYPES => self.relation_type(name),
            _ => None,
        }
    }

    pub fn component_type(&self, name: &str) -> Option<EntityId> {
        self.component_types.get(name).copied()
    }

    pub fn relation_type(&self, name: &str) -> Option<EntityId> {
        self.relation_types.get(name).copied()
    }
}

/// Incrementally assembles an [`EntityGraph`]
pub struct EntityGraphBuilder {
    entities: Vec<Entity>,
}

impl EntityGraphBuilder {
    pub fn new() -> Self {
        let root = Entity {
            id: EntityId(0),
            name: String::new(),
            parent: None,
            children: IndexMap::new(),
            value: None,
            type_ref: None,
        };
        Self {
            entities: vec![root],
        }
    }

    pub fn root(&self) -> EntityId {
        EntityId(0)
    }

    /// Existing child of `parent`, used to merge documents into one namespace
    pub fn child(&self, parent: EntityId, name: &str) -> Option<EntityId> {
        self.entities[parent.0].children.get(name).copied()
    }

    /// Adds a child entity below `parent`
    ///
    /// A child with the same name replaces the previous one in the parent's
    /// child map (the old entity stays allocated but unreachable).
    pub fn add_entity(
        &mut self,
        parent: EntityId,
        name: impl Into<String>,
        value: Option<ScalarValue>,
    ) -> EntityId {
        let id = EntityId(self.entities.len());
        let name = name.into();
        self.entities.push(Entity {
            id,
            name: name.clone(),
            parent: Some(parent),
            children: IndexMap::new(),
            value,
            type_ref: None,
        });
        self.entities[parent.0].children.insert(name, id);
        id
    }

    /// Finishes the graph: indexes type definitions and resolves type references
    ///
    /// Instances whose declared type is unknown keep no type reference; the
    /// model layer reports that as an integrity error when it needs the type.
    pub fn build(mut self) -> EntityGraph {
        let component_types = self.index_namespace(keys::COMPONENT_TYPES);
        let relation_types = self.index_namespace(keys::RELATION_TYPES);

        let mut type_refs = Vec::new();
        if let Some(components) = self.entities[0].children.get(keys::COMPONENTS).copied() {
            for &instance in self.entities[components.0].children.values() {
                let declared = self.entities[instance.0]
                    .children
                    .get(keys::TYPE)
                    .and_then(|t| self.entities[t.0].value.as_ref())
                    .map(|v| v.to_string());
                if let Some(type_entity) = declared.and_then(|n| component_types.get(&n).copied())
                {
                    type_refs.push((instance, type_entity));
                }
                type_refs.extend(self.relation_type_refs(instance, &relation_types));
            }
        }
        for (instance, type_entity) in type_refs {
            self.entities[instance.0].type_ref = Some(type_entity);
        }

        EntityGraph {
            entities: self.entities,
            component_types,
            relation_types,
        }
    }

    fn index_namespace(&self, namespace: &str) -> HashMap<String, EntityId> {
        self.entities[0]
            .children
            .get(namespace)
            .map(|ns| {
                self.entities[ns.0]
                    .children
                    .iter()
                    .map(|(name, id)| (name.clone(), *id))
                    .collect()
            })
            .unwrap_or_default()
    }

    /// Relation entries look like `- hosted_on: dbms`: the entry's single
    /// child is named after the relation type.
    fn relation_type_refs(
        &self,
        instance: EntityId,
        relation_types: &HashMap<String, EntityId>,
    ) -> Vec<(EntityId, EntityId)> {
        let Some(relations) = self.entities[instance.0].children.get(keys::RELATIONS) else {
            return Vec::new();
        };
        let mut refs = Vec::new();
        for entry in self.entities[relations.0].children.values() {
            for (type_name, relation) in &self.entities[entry.0].children {
                if let Some(type_entity) = relation_types.get(type_name) {
                    refs.push((*relation, *type_entity));
                }
            }
        }
        refs
    }
}

impl Default for EntityGraphBuilder {
    fn default() -> Self {
        Self::new()
    }
}
