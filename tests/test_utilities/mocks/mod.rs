/// Mock implementations for testing
mod mock_file_access;
mod mock_model_reader;
mod mock_progress_reporter;
mod mock_tool_locator;
mod recording_lifecycle;

pub use mock_file_access::{MockFileAccess, MockFileAccessFactory};
pub use mock_model_reader::MockModelReader;
pub use mock_progress_reporter::MockProgressReporter;
pub use mock_tool_locator::MockToolLocator;
pub use recording_lifecycle::RecordingLifecycle;
