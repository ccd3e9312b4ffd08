//! Helpers shared by the backends

use crate::deployment_model::domain::{Component, Operation};
use crate::shared::error::TransformError;
use crate::shared::Result;
use crate::transformation::TransformationContext;
use indexmap::IndexMap;
use serde::Serialize;

/// Operations that carry at least one artifact, in lifecycle order
pub(crate) fn operations_with_artifacts(component: &Component) -> Result<Vec<Operation>> {
    Ok(component
        .ordered_operations()?
        .into_iter()
        .filter(Operation::has_artifacts)
        .collect())
}

/// Environment variable name for a component property: `DBMS_ROOT_PASSWORD`
pub(crate) fn env_name(component: &Component, property: &str) -> String {
    format!(
        "{}_{}",
        component.normalized_name(),
        crate::deployment_model::domain::normalize_name(property)
    )
    .to_uppercase()
}

/// Property values of a component keyed by [`env_name`]
pub(crate) fn component_env(component: &Component) -> Result<IndexMap<String, String>> {
    Ok(component
        .property_values()?
        .into_iter()
        .map(|(name, value)| (env_name(component, &name), value))
        .collect())
}

pub(crate) fn to_yaml<T: Serialize>(value: &T) -> Result<String> {
    serde_yaml_ng::to_string(value).map_err(|e| {
        TransformError::Serialization {
            format: "YAML".to_string(),
            details: e.to_string(),
        }
        .into()
    })
}

pub(crate) fn to_json<T: Serialize>(value: &T) -> Result<String> {
    serde_json::to_string_pretty(value).map_err(|e| {
        TransformError::Serialization {
            format: "JSON".to_string(),
            details: e.to_string(),
        }
        .into()
    })
}

/// Fails `check_environment` when tool verification is on and a tool is missing
pub(crate) fn require_tools(context: &TransformationContext, tools: &[&str]) -> Result<()> {
    if !context.settings().verify_tools {
        return Ok(());
    }
    for tool in tools {
        match context.tool_locator().locate(tool) {
            Some(path) => tracing::debug!(tool, path = %path.display(), "found tool"),
            None => {
                return Err(TransformError::Environment {
                    target: context.target().to_string(),
                    reason: format!("'{}' was not found on PATH", tool),
                }
                .into())
            }
        }
    }
    Ok(())
}
