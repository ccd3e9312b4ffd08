use crate::application::dto::{TransformationRequest, TransformationResponse};
use crate::shared::Result;

/// TransformationPort - Inbound port for the model transformation use case
///
/// This port is what external adapters (the CLI) call to turn one model
/// into artifacts for a list of targets.
pub trait TransformationPort {
    /// Transforms the requested model for every requested target
    ///
    /// A failing target does not stop the others; its error is reported in
    /// the response.
    ///
    /// # Errors
    /// Returns an error only when nothing can be attempted:
    /// - a requested target is not registered
    /// - the model cannot be read or built
    fn transform(&self, request: TransformationRequest) -> Result<TransformationResponse>;

    /// Names of the targets this port can generate, sorted
    fn available_targets(&self) -> Vec<String>;
}
