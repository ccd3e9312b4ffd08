/// Crate-wide result alias.
///
/// Typed failures are raised as [`TransformError`](super::TransformError) and
/// travel inside `anyhow::Error`, so callers can add phase context and still
/// downcast to the original cause.
pub type Result<T> = std::result::Result<T, anyhow::Error>;
