/// Data Transfer Objects for application layer
///
/// DTOs carry a transformation request in from the CLI and the per-target
/// outcomes back out, keeping the domain layer isolated.
mod transformation_request;
mod transformation_response;

pub use transformation_request::TransformationRequest;
pub use transformation_response::{TargetOutcome, TransformationResponse};
