//! Configuration file support for topology-transform.
//!
//! Provides YAML-based configuration through `topology-transform.config.yml`
//! files, including data structures, file loading, and validation.

use anyhow::{bail, Context};
use indexmap::IndexMap;
use serde::Deserialize;
use std::collections::HashMap;
use std::path::{Path, PathBuf};

use crate::shared::Result;

pub const CONFIG_FILENAME: &str = "topology-transform.config.yml";

/// Top-level configuration file schema.
#[derive(Debug, Deserialize, Default)]
pub struct ConfigFile {
    pub targets: Option<Vec<String>>,
    pub output_dir: Option<PathBuf>,
    pub source_dir: Option<PathBuf>,
    pub verify_tools: Option<bool>,
    /// Backend-specific options: `backends.<target>.<key>: <value>`.
    #[serde(default)]
    pub backends: IndexMap<String, IndexMap<String, serde_yaml_ng::Value>>,
    /// Captures unknown fields for warnings.
    #[serde(flatten)]
    pub unknown_fields: HashMap<String, serde_yaml_ng::Value>,
}

impl ConfigFile {
    /// Backend options with scalar values rendered as strings.
    pub fn backend_options(&self) -> IndexMap<String, IndexMap<String, String>> {
        self.backends
            .iter()
            .map(|(backend, options)| {
                let options = options
                    .iter()
                    .filter_map(|(key, value)| scalar_string(value).map(|v| (key.clone(), v)))
                    .collect();
                (backend.clone(), options)
            })
            .collect()
    }
}

fn scalar_string(value: &serde_yaml_ng::Value) -> Option<String> {
    match value {
        serde_yaml_ng::Value::String(s) => Some(s.clone()),
        serde_yaml_ng::Value::Bool(b) => Some(b.to_string()),
        serde_yaml_ng::Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

/// Load config from an explicit path. Returns an error if the file is not found.
pub fn load_config_from_path(path: &Path) -> Result<ConfigFile> {
    let content = std::fs::read_to_string(path).with_context(|| {
        format!(
            "Failed to read config file: {}\n\n💡 Hint: Check that the file exists and is readable.",
            path.display()
        )
    })?;

    let config: ConfigFile = serde_yaml_ng::from_str(&content).with_context(|| {
        format!(
            "Failed to parse config file: {}\n\n💡 Hint: Ensure the file contains valid YAML syntax.",
            path.display()
        )
    })?;

    validate_config(&config)?;
    warn_unknown_fields(&config);

    Ok(config)
}

/// Auto-discover config in a directory. Returns `None` silently if not found.
pub fn discover_config(dir: &Path) -> Result<Option<ConfigFile>> {
    let config_path = dir.join(CONFIG_FILENAME);

    if !config_path.exists() {
        return Ok(None);
    }

    let config = load_config_from_path(&config_path)?;
    Ok(Some(config))
}

/// Validate the loaded configuration.
fn validate_config(config: &ConfigFile) -> Result<()> {
    if let Some(ref targets) = config.targets {
        for (i, target) in targets.iter().enumerate() {
            if target.trim().is_empty() {
                bail!(
                    "Invalid config: targets[{}] must not be empty.\n\n\
                     💡 Hint: List backend names such as \"heat\" or \"kubernetes\".",
                    i
                );
            }
        }
    }
    for (backend, options) in &config.backends {
        for (key, value) in options {
            if scalar_string(value).is_none() {
                bail!(
                    "Invalid config: backends.{}.{} must be a scalar value.\n\n\
                     💡 Hint: Backend options are plain strings, numbers or booleans.",
                    backend,
                    key
                );
            }
        }
    }
    Ok(())
}

/// Warn about unknown fields in the config file.
fn warn_unknown_fields(config: &ConfigFile) {
    for key in config.unknown_fields.keys() {
        tracing::warn!(field = key.as_str(), "unknown config field");
        eprintln!(
            "⚠️  Warning: Unknown config field '{}' will be ignored.",
            key
        );
    }
}
