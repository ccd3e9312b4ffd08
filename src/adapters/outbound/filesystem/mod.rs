/// Filesystem adapters: model documents in, generated artifacts out
mod file_system_access;
mod yaml_model_reader;

pub use file_system_access::{FileSystemAccess, FileSystemAccessFactory};
pub use yaml_model_reader::YamlModelReader;
