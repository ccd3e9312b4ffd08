use crate::deployment_model::domain::{DeploymentModel, TopologyGraph};
use crate::ports::outbound::{FileAccess, ToolLocator};
use chrono::{DateTime, Utc};
use indexmap::IndexMap;
use std::fmt;
use std::sync::Arc;
use uuid::Uuid;

/// Per-target settings merged from the config file and the command line
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TargetSettings {
    /// Probe external tools during `check_environment`
    pub verify_tools: bool,
    /// Backend-specific options (`backends.<target>` in the config file)
    pub options: IndexMap<String, String>,
}

impl TargetSettings {
    pub fn new(verify_tools: bool) -> Self {
        Self {
            verify_tools,
            options: IndexMap::new(),
        }
    }

    pub fn with_option(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.options.insert(key.into(), value.into());
        self
    }

    pub fn option(&self, key: &str) -> Option<&str> {
        self.options.get(key).map(String::as_str)
    }

    pub fn option_or<'a>(&'a self, key: &str, default: &'a str) -> &'a str {
        self.option(key).unwrap_or(default)
    }
}

/// State carried through one transformation run of one target
///
/// The model is shared read-only between runs; everything else belongs to
/// this run alone.
pub struct TransformationContext {
    run_id: Uuid,
    started_at: DateTime<Utc>,
    target: String,
    model: Arc<DeploymentModel>,
    file_access: Box<dyn FileAccess>,
    tool_locator: Box<dyn ToolLocator>,
    settings: TargetSettings,
}

impl TransformationContext {
    pub fn new(
        target: impl Into<String>,
        model: Arc<DeploymentModel>,
        file_access: Box<dyn FileAccess>,
        tool_locator: Box<dyn ToolLocator>,
        settings: TargetSettings,
    ) -> Self {
        Self {
            run_id: Uuid::new_v4(),
            started_at: Utc::now(),
            target: target.into(),
            model,
            file_access,
            tool_locator,
            settings,
        }
    }

    pub fn run_id(&self) -> Uuid {
        self.run_id
    }

    pub fn started_at(&self) -> DateTime<Utc> {
        self.started_at
    }

    pub fn target(&self) -> &str {
        &self.target
    }

    pub fn model(&self) -> &Arc<DeploymentModel> {
        &self.model
    }

    pub fn topology(&self) -> &TopologyGraph {
        self.model.topology()
    }

    pub fn file_access(&self) -> &dyn FileAccess {
        self.file_access.as_ref()
    }

    pub fn tool_locator(&self) -> &dyn ToolLocator {
        self.tool_locator.as_ref()
    }

    pub fn settings(&self) -> &TargetSettings {
        &self.settings
    }
}

impl fmt::Debug for TransformationContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TransformationContext")
            .field("run_id", &self.run_id)
            .field("target", &self.target)
            .field("model", &self.model.name())
            .field("settings", &self.settings)
            .finish()
    }
}
