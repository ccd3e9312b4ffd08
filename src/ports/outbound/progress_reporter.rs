/// ProgressReporter port for user-facing progress of a transformation
///
/// Diagnostic detail goes through `tracing`; this port carries only the
/// messages an operator watches while targets are generated.
pub trait ProgressReporter {
    /// Reports a free-form status line
    fn report(&self, message: &str);

    /// Reports that target `current` of `total` is being generated
    ///
    /// # Arguments
    /// * `current` - 1-based position of the target
    /// * `total` - Number of requested targets
    /// * `target` - Backend name
    fn report_target(&self, current: usize, total: usize, target: &str);

    /// Reports a failed target or another recoverable problem
    fn report_error(&self, message: &str);

    /// Reports the end of the run
    fn report_completion(&self, message: &str);
}
