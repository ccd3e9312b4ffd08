use crate::shared::Result;
use std::path::PathBuf;

/// FileAccess port for the artifacts a transformation reads and writes
///
/// Paths are relative: reads resolve against the model's source directory,
/// writes against the run's output directory. Implementations reject paths
/// that would escape either root.
pub trait FileAccess {
    /// Acquires the output location; called from the `prepare` phase
    fn prepare(&self) -> Result<()>;

    /// Reads a referenced artifact (e.g. an operation script) as UTF-8
    ///
    /// # Errors
    /// Returns an error if the path is invalid, missing, or unreadable.
    fn read_to_string(&self, path: &str) -> Result<String>;

    /// Appends to an output file, creating it and its parents when needed
    fn append(&self, path: &str, content: &str) -> Result<()>;

    /// Writes an output file, replacing previous content
    fn write(&self, path: &str, content: &str) -> Result<()>;

    /// Output files touched so far, relative to the output root, in write order
    fn written_files(&self) -> Vec<PathBuf>;

    /// Releases the output location; called from the `cleanup` phase
    fn release(&self) -> Result<()>;
}

/// Creates one [`FileAccess`] per target run
pub trait FileAccessFactory {
    fn create(&self, target: &str) -> Box<dyn FileAccess>;
}
