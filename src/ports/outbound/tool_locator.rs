use std::path::PathBuf;

/// ToolLocator port for probing external tools a backend may need
pub trait ToolLocator {
    /// Location of the named executable, if one is available
    fn locate(&self, tool: &str) -> Option<PathBuf>;
}
