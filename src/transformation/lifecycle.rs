use super::context::TransformationContext;
use crate::shared::Result;
use std::fmt;

/// The five phases every backend runs, in order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LifecyclePhase {
    CheckEnvironment,
    CheckModel,
    Prepare,
    Transform,
    Cleanup,
}

impl LifecyclePhase {
    pub const ALL: [LifecyclePhase; 5] = [
        LifecyclePhase::CheckEnvironment,
        LifecyclePhase::CheckModel,
        LifecyclePhase::Prepare,
        LifecyclePhase::Transform,
        LifecyclePhase::Cleanup,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            LifecyclePhase::CheckEnvironment => "check_environment",
            LifecyclePhase::CheckModel => "check_model",
            LifecyclePhase::Prepare => "prepare",
            LifecyclePhase::Transform => "transform",
            LifecyclePhase::Cleanup => "cleanup",
        }
    }
}

impl fmt::Display for LifecyclePhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Lifecycle contract every backend implements
///
/// Phases do not check their own ordering; [`LifecycleDriver`](super::LifecycleDriver)
/// is the only caller and enforces it.
pub trait Lifecycle {
    fn context(&self) -> &TransformationContext;

    /// Verifies external prerequisites; must not touch the output location
    fn check_environment(&mut self) -> Result<()> {
        Ok(())
    }

    /// Verifies backend-specific structural preconditions of the topology
    fn check_model(&mut self) -> Result<()> {
        Ok(())
    }

    fn prepare(&mut self) -> Result<()> {
        self.context().file_access().prepare()
    }

    /// Visits the topology and writes the generated artifacts
    fn transform(&mut self) -> Result<()>;

    /// Releases what `prepare` acquired, whether or not `transform` succeeded
    fn cleanup(&mut self) -> Result<()> {
        self.context().file_access().release()
    }
}
