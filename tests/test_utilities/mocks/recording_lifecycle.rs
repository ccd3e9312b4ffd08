use std::sync::{Arc, Mutex};
use topology_transform::prelude::*;

/// Lifecycle that records every phase it runs and can fail in one of them
pub struct RecordingLifecycle {
    context: TransformationContext,
    calls: Arc<Mutex<Vec<LifecyclePhase>>>,
    fail_in: Option<LifecyclePhase>,
}

impl RecordingLifecycle {
    pub fn new(context: TransformationContext) -> Self {
        Self {
            context,
            calls: Arc::default(),
            fail_in: None,
        }
    }

    pub fn failing_in(mut self, phase: LifecyclePhase) -> Self {
        self.fail_in = Some(phase);
        self
    }

    /// Handle to the recorded phases that outlives the lifecycle
    pub fn calls(&self) -> Arc<Mutex<Vec<LifecyclePhase>>> {
        Arc::clone(&self.calls)
    }

    fn record(&self, phase: LifecyclePhase) -> Result<()> {
        self.calls.lock().unwrap().push(phase);
        if self.fail_in == Some(phase) {
            anyhow::bail!("injected failure in {}", phase);
        }
        Ok(())
    }
}

impl Lifecycle for RecordingLifecycle {
    fn context(&self) -> &TransformationContext {
        &self.context
    }

    fn check_environment(&mut self) -> Result<()> {
        self.record(LifecyclePhase::CheckEnvironment)
    }

    fn check_model(&mut self) -> Result<()> {
        self.record(LifecyclePhase::CheckModel)
    }

    fn prepare(&mut self) -> Result<()> {
        self.record(LifecyclePhase::Prepare)
    }

    fn transform(&mut self) -> Result<()> {
        self.record(LifecyclePhase::Transform)
    }

    fn cleanup(&mut self) -> Result<()> {
        self.record(LifecyclePhase::Cleanup)
    }
}
