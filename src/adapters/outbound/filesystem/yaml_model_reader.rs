use crate::deployment_model::domain::{
    keys, EntityGraph, EntityGraphBuilder, EntityId, ScalarValue,
};
use crate::ports::outbound::ModelReader;
use crate::shared::error::TransformError;
use crate::shared::security::validate_regular_file;
use crate::shared::Result;
use serde_yaml_ng::{Mapping, Value};
use std::fs;
use std::path::{Path, PathBuf};

/// Component and relation types every model can use without declaring them
const NORMATIVE_TYPES: &str = include_str!("normative_types.yml");

/// YamlModelReader adapter reading deployment models from YAML documents
///
/// The bundled normative types are loaded first; the document's own
/// `component_types` and `relation_types` are merged into the same
/// namespaces, so a document may refine a built-in type by redeclaring it.
pub struct YamlModelReader {
    include_normative_types: bool,
}

impl YamlModelReader {
    pub fn new() -> Self {
        Self {
            include_normative_types: true,
        }
    }

    /// Reader that only sees types the document declares itself
    pub fn without_normative_types() -> Self {
        Self {
            include_normative_types: false,
        }
    }

    /// Parses a model document held in memory
    ///
    /// `origin` is only used in error messages.
    pub fn parse_str(&self, content: &str, origin: &Path) -> Result<EntityGraph> {
        let mut builder = EntityGraphBuilder::new();
        let root = builder.root();

        if self.include_normative_types {
            let normative = Self::parse_document(NORMATIVE_TYPES, Path::new("normative_types.yml"))?;
            Self::merge_document(&mut builder, root, &normative, origin)?;
        }

        let document = Self::parse_document(content, origin)?;
        Self::merge_document(&mut builder, root, &document, origin)?;

        Ok(builder.build())
    }

    fn parse_document(content: &str, origin: &Path) -> Result<Mapping> {
        let value: Value =
            serde_yaml_ng::from_str(content).map_err(|e| TransformError::ModelParse {
                path: origin.to_path_buf(),
                details: e.to_string(),
            })?;
        match value {
            Value::Mapping(mapping) => Ok(mapping),
            Value::Null => Ok(Mapping::new()),
            _ => Err(TransformError::ModelParse {
                path: origin.to_path_buf(),
                details: "document root must be a mapping".to_string(),
            }
            .into()),
        }
    }

    /// Adds the document's top-level keys below `root`
    ///
    /// Type namespaces that already exist are merged entry by entry; every
    /// other key replaces what was there.
    fn merge_document(
        builder: &mut EntityGraphBuilder,
        root: EntityId,
        document: &Mapping,
        origin: &Path,
    ) -> Result<()> {
        for (key, value) in document {
            let name = Self::key_name(key, origin)?;
            let is_namespace = name == keys::COMPONENT_TYPES || name == keys::RELATION_TYPES;
            match (is_namespace, builder.child(root, &name), value) {
                (true, Some(namespace), Value::Mapping(entries)) => {
                    for (type_key, definition) in entries {
                        let type_name = Self::key_name(type_key, origin)?;
                        Self::insert_value(builder, namespace, type_name, definition, origin)?;
                    }
                }
                _ => {
                    Self::insert_value(builder, root, name, value, origin)?;
                }
            }
        }
        Ok(())
    }

    /// Mappings become entities with named children, sequence items are
    /// named by index, scalars carry their value
    fn insert_value(
        builder: &mut EntityGraphBuilder,
        parent: EntityId,
        name: String,
        value: &Value,
        origin: &Path,
    ) -> Result<EntityId> {
        match value {
            Value::Mapping(mapping) => {
                let id = builder.add_entity(parent, name, None);
                for (key, child) in mapping {
                    let child_name = Self::key_name(key, origin)?;
                    Self::insert_value(builder, id, child_name, child, origin)?;
                }
                Ok(id)
            }
            Value::Sequence(items) => {
                let id = builder.add_entity(parent, name, None);
                for (index, item) in items.iter().enumerate() {
                    Self::insert_value(builder, id, index.to_string(), item, origin)?;
                }
                Ok(id)
            }
            Value::Tagged(tagged) => Self::insert_value(builder, parent, name, &tagged.value, origin),
            scalar => Ok(builder.add_entity(parent, name, Self::scalar(scalar))),
        }
    }

    fn scalar(value: &Value) -> Option<ScalarValue> {
        match value {
            Value::String(s) => Some(ScalarValue::String(s.clone())),
            Value::Bool(b) => Some(ScalarValue::Boolean(*b)),
            Value::Number(n) => match n.as_i64() {
                Some(i) => Some(ScalarValue::Integer(i)),
                None => n.as_f64().map(ScalarValue::Float),
            },
            _ => None,
        }
    }

    fn key_name(key: &Value, origin: &Path) -> Result<String> {
        match key {
            Value::String(s) => Ok(s.clone()),
            Value::Bool(b) => Ok(b.to_string()),
            Value::Number(n) => Ok(n.to_string()),
            other => Err(TransformError::ModelParse {
                path: origin.to_path_buf(),
                details: format!("unsupported mapping key: {:?}", other),
            }
            .into()),
        }
    }
}

impl Default for YamlModelReader {
    fn default() -> Self {
        Self::new()
    }
}

impl ModelReader for YamlModelReader {
    fn read_model(&self, path: &Path) -> Result<EntityGraph> {
        if !path.exists() {
            return Err(TransformError::ModelParse {
                path: path.to_path_buf(),
                details: "file does not exist".to_string(),
            }
            .into());
        }

        validate_regular_file(path, "model file").map_err(|e| TransformError::ModelParse {
            path: PathBuf::from(path),
            details: e.to_string(),
        })?;

        let content = fs::read_to_string(path).map_err(|e| TransformError::ModelParse {
            path: path.to_path_buf(),
            details: e.to_string(),
        })?;

        tracing::debug!(path = %path.display(), bytes = content.len(), "read model document");
        self.parse_str(&content, path)
    }
}
