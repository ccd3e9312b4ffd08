use chrono::{DateTime, Duration, Utc};
use std::path::PathBuf;
use uuid::Uuid;

/// Result of one target run
#[derive(Debug, Clone, PartialEq)]
pub struct TargetOutcome {
    pub target: String,
    /// Output files written, relative to the target's output directory
    pub written_files: Vec<PathBuf>,
    /// Rendered error chain when the run failed
    pub error: Option<String>,
    /// When the target's context was created
    pub started_at: Option<DateTime<Utc>>,
    pub finished_at: Option<DateTime<Utc>>,
}

impl TargetOutcome {
    pub fn succeeded(target: impl Into<String>, written_files: Vec<PathBuf>) -> Self {
        Self {
            target: target.into(),
            written_files,
            error: None,
            started_at: None,
            finished_at: None,
        }
    }

    pub fn failed(target: impl Into<String>, written_files: Vec<PathBuf>, error: String) -> Self {
        Self {
            target: target.into(),
            written_files,
            error: Some(error),
            started_at: None,
            finished_at: None,
        }
    }

    pub fn with_timing(mut self, started_at: DateTime<Utc>, finished_at: DateTime<Utc>) -> Self {
        self.started_at = Some(started_at);
        self.finished_at = Some(finished_at);
        self
    }

    /// Wall-clock time of the run, when timing was recorded
    pub fn elapsed(&self) -> Option<Duration> {
        Some(self.finished_at? - self.started_at?)
    }

    pub fn is_success(&self) -> bool {
        self.error.is_none()
    }
}

/// TransformationResponse - Internal response DTO from the transform use case
#[derive(Debug, Clone)]
pub struct TransformationResponse {
    /// Name of the transformed model (the model file stem)
    pub model_name: String,
    /// Identifies this invocation in logs
    pub run_id: Uuid,
    /// One outcome per requested target, in request order
    pub outcomes: Vec<TargetOutcome>,
}

impl TransformationResponse {
    pub fn new(model_name: String, outcomes: Vec<TargetOutcome>) -> Self {
        Self {
            model_name,
            run_id: Uuid::new_v4(),
            outcomes,
        }
    }

    pub fn all_succeeded(&self) -> bool {
        self.outcomes.iter().all(TargetOutcome::is_success)
    }

    pub fn failed_targets(&self) -> Vec<&str> {
        self.outcomes
            .iter()
            .filter(|o| !o.is_success())
            .map(|o| o.target.as_str())
            .collect()
    }
}
