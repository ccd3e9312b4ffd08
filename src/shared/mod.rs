/// Shared kernel - error types, result alias and filesystem safety checks
pub mod error;
pub mod result;
pub mod security;

pub use error::{ExitCode, TransformError};
pub use result::Result;
