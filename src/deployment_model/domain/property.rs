use super::entity_graph::{keys, EntityGraph, EntityId, ScalarValue};
use std::marker::PhantomData;

/// A resolved property of a model entity
///
/// Instances assign values (`port: 3306`); type definitions declare a type,
/// a default and a description. Resolution merges both into one record.
#[derive(Debug, Clone, PartialEq)]
pub struct Property {
    name: String,
    value: Option<ScalarValue>,
    type_name: Option<String>,
    default_value: Option<ScalarValue>,
    description: Option<String>,
}

impl Property {
    pub fn new(name: impl Into<String>, value: Option<ScalarValue>) -> Self {
        Self {
            name: name.into(),
            value,
            type_name: None,
            default_value: None,
            description: None,
        }
    }

    /// Reads a property from its graph entity
    ///
    /// A scalar entity is a plain assignment; a mapping entity is a
    /// definition with optional `type`, `default_value`, `description` and `value`.
    pub fn from_entity(graph: &EntityGraph, id: EntityId) -> Self {
        let entity = graph.entity(id);
        if let Some(value) = entity.value() {
            return Self::new(entity.name(), Some(value.clone()));
        }
        Self {
            name: entity.name().to_string(),
            value: graph.child_value(id, keys::VALUE).cloned(),
            type_name: graph.child_string(id, keys::TYPE),
            default_value: graph.child_value(id, keys::DEFAULT_VALUE).cloned(),
            description: graph.child_string(id, keys::DESCRIPTION),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn type_name(&self) -> Option<&str> {
        self.type_name.as_deref()
    }

    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    pub fn default_value(&self) -> Option<&ScalarValue> {
        self.default_value.as_ref()
    }

    /// Assigned value, falling back to the declared default
    pub fn value(&self) -> Option<&ScalarValue> {
        self.value.as_ref().or(self.default_value.as_ref())
    }

    /// Fills fields this property lacks from a more distant definition
    ///
    /// Fields already set always win, so merging nearest-first keeps
    /// local and near declarations authoritative.
    pub(crate) fn inherit_from(&mut self, farther: Property) {
        if self.value.is_none() {
            self.value = farther.value;
        }
        if self.type_name.is_none() {
            self.type_name = farther.type_name;
        }
        if self.default_value.is_none() {
            self.default_value = farther.default_value;
        }
        if self.description.is_none() {
            self.description = farther.description;
        }
    }
}

/// Conversion from a stored scalar into a typed attribute value
pub trait FromScalar: Sized {
    /// Human-readable type name used in mismatch errors
    const TYPE_NAME: &'static str;

    fn from_scalar(value: &ScalarValue) -> Option<Self>;
}

impl FromScalar for String {
    const TYPE_NAME: &'static str = "string";

    fn from_scalar(value: &ScalarValue) -> Option<Self> {
        Some(value.to_string())
    }
}

impl FromScalar for i64 {
    const TYPE_NAME: &'static str = "integer";

    fn from_scalar(value: &ScalarValue) -> Option<Self> {
        match value {
            ScalarValue::Integer(i) => Some(*i),
            ScalarValue::String(s) => s.trim().parse().ok(),
            _ => None,
        }
    }
}

impl FromScalar for u16 {
    const TYPE_NAME: &'static str = "port number";

    fn from_scalar(value: &ScalarValue) -> Option<Self> {
        i64::from_scalar(value).and_then(|i| u16::try_from(i).ok())
    }
}

impl FromScalar for f64 {
    const TYPE_NAME: &'static str = "float";

    fn from_scalar(value: &ScalarValue) -> Option<Self> {
        match value {
            ScalarValue::Float(x) => Some(*x),
            ScalarValue::Integer(i) => Some(*i as f64),
            ScalarValue::String(s) => s.trim().parse().ok(),
            ScalarValue::Boolean(_) => None,
        }
    }
}

impl FromScalar for bool {
    const TYPE_NAME: &'static str = "boolean";

    fn from_scalar(value: &ScalarValue) -> Option<Self> {
        match value {
            ScalarValue::Boolean(b) => Some(*b),
            ScalarValue::String(s) => match s.trim().to_lowercase().as_str() {
                "true" | "yes" => Some(true),
                "false" | "no" => Some(false),
                _ => None,
            },
            _ => None,
        }
    }
}

/// Typed attribute descriptor: a property name plus its expected value type
#[derive(Debug)]
pub struct Attribute<T> {
    name: &'static str,
    _type: PhantomData<fn() -> T>,
}

impl<T> Attribute<T> {
    pub const fn new(name: &'static str) -> Self {
        Self {
            name,
            _type: PhantomData,
        }
    }

    pub fn name(&self) -> &'static str {
        self.name
    }
}

impl<T> Clone for Attribute<T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T> Copy for Attribute<T> {}
