/// Outbound ports (Driven ports) - Infrastructure interfaces
///
/// These ports define the interfaces the transformation core uses to reach
/// the file system, the environment and the console.
pub mod file_access;
pub mod model_reader;
pub mod progress_reporter;
pub mod tool_locator;

pub use file_access::{FileAccess, FileAccessFactory};
pub use model_reader::ModelReader;
pub use progress_reporter::ProgressReporter;
pub use tool_locator::ToolLocator;
