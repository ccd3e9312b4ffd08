use super::lifecycle::{Lifecycle, LifecyclePhase};
use crate::shared::error::TransformError;
use crate::shared::Result;
use anyhow::Context;

/// Where a driven lifecycle stands
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LifecycleState {
    Idle,
    EnvironmentChecked,
    ModelChecked,
    Prepared,
    Transformed,
    CleanedUp,
    /// The named phase failed; only `cleanup` may follow, and only once
    /// `prepare` has been attempted
    Failed(LifecyclePhase),
}

impl LifecycleState {
    /// The phase allowed to run next
    pub fn next_phase(self) -> Option<LifecyclePhase> {
        match self {
            LifecycleState::Idle => Some(LifecyclePhase::CheckEnvironment),
            LifecycleState::EnvironmentChecked => Some(LifecyclePhase::CheckModel),
            LifecycleState::ModelChecked => Some(LifecyclePhase::Prepare),
            LifecycleState::Prepared => Some(LifecyclePhase::Transform),
            LifecycleState::Transformed
            | LifecycleState::Failed(LifecyclePhase::Prepare)
            | LifecycleState::Failed(LifecyclePhase::Transform) => Some(LifecyclePhase::Cleanup),
            LifecycleState::CleanedUp | LifecycleState::Failed(_) => None,
        }
    }

    fn after(phase: LifecyclePhase) -> Self {
        match phase {
            LifecyclePhase::CheckEnvironment => LifecycleState::EnvironmentChecked,
            LifecyclePhase::CheckModel => LifecycleState::ModelChecked,
            LifecyclePhase::Prepare => LifecycleState::Prepared,
            LifecyclePhase::Transform => LifecycleState::Transformed,
            LifecyclePhase::Cleanup => LifecycleState::CleanedUp,
        }
    }
}

/// Drives one backend lifecycle through its phases, each exactly once
///
/// Out-of-order calls are rejected with [`TransformError::LifecycleOrder`]
/// before the backend sees them.
pub struct LifecycleDriver {
    lifecycle: Box<dyn Lifecycle>,
    state: LifecycleState,
}

impl LifecycleDriver {
    pub fn new(lifecycle: Box<dyn Lifecycle>) -> Self {
        Self {
            lifecycle,
            state: LifecycleState::Idle,
        }
    }

    pub fn state(&self) -> LifecycleState {
        self.state
    }

    pub fn target(&self) -> &str {
        self.lifecycle.context().target()
    }

    pub fn lifecycle(&self) -> &dyn Lifecycle {
        self.lifecycle.as_ref()
    }

    pub fn check_environment(&mut self) -> Result<()> {
        self.step(LifecyclePhase::CheckEnvironment, |l| l.check_environment())
    }

    pub fn check_model(&mut self) -> Result<()> {
        self.step(LifecyclePhase::CheckModel, |l| l.check_model())
    }

    pub fn prepare(&mut self) -> Result<()> {
        self.step(LifecyclePhase::Prepare, |l| l.prepare())
    }

    pub fn transform(&mut self) -> Result<()> {
        self.step(LifecyclePhase::Transform, |l| l.transform())
    }

    pub fn cleanup(&mut self) -> Result<()> {
        self.step(LifecyclePhase::Cleanup, |l| l.cleanup())
    }

    /// Runs all phases in order
    ///
    /// A failing check aborts before anything is acquired. Once `prepare`
    /// has been attempted, `cleanup` runs on every path; the first error
    /// wins and a cleanup error after it is only logged.
    pub fn run(&mut self) -> Result<()> {
        self.check_environment()?;
        self.check_model()?;

        let outcome = self.prepare().and_then(|()| self.transform());
        let cleanup = self.cleanup();

        match (outcome, cleanup) {
            (Err(error), Err(cleanup_error)) => {
                tracing::warn!(
                    target_name = self.target(),
                    error = %cleanup_error,
                    "cleanup failed after an earlier error"
                );
                Err(error)
            }
            (Err(error), Ok(())) => Err(error),
            (Ok(()), cleanup) => cleanup,
        }
    }

    fn step<F>(&mut self, phase: LifecyclePhase, run: F) -> Result<()>
    where
        F: FnOnce(&mut dyn Lifecycle) -> Result<()>,
    {
        let expected = self.state.next_phase();
        if expected != Some(phase) {
            return Err(TransformError::LifecycleOrder {
                expected: expected.map(LifecyclePhase::as_str).unwrap_or("no further phase"),
                requested: phase.as_str(),
            }
            .into());
        }

        tracing::info!(target_name = self.target(), phase = %phase, "running phase");
        match run(self.lifecycle.as_mut()) {
            Ok(()) => {
                self.state = LifecycleState::after(phase);
                Ok(())
            }
            Err(error) => {
                self.state = LifecycleState::Failed(phase);
                let target = self.target().to_string();
                Err(error).with_context(|| format!("{} phase '{}' failed", target, phase))
            }
        }
    }
}
