use crate::deployment_model::domain::EntityGraph;
use crate::shared::Result;
use std::path::Path;

/// ModelReader port for reading a source model document
///
/// Implementations own the concrete document syntax; the core only sees the
/// resulting attributed entity graph.
pub trait ModelReader {
    /// Reads and parses the model at `path`
    ///
    /// # Errors
    /// Returns an error if the file cannot be read or is not a valid model
    /// document.
    fn read_model(&self, path: &Path) -> Result<EntityGraph>;
}
