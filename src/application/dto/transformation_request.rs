use crate::transformation::TargetSettings;
use indexmap::IndexMap;
use std::path::PathBuf;

/// TransformationRequest - Internal request DTO for the transform use case
///
/// Built by the CLI from command-line flags merged over the config file.
#[derive(Debug, Clone)]
pub struct TransformationRequest {
    /// Path to the model document
    pub model_path: PathBuf,
    /// Directory that artifact paths in the model are relative to
    pub source_dir: PathBuf,
    /// Root output directory; each target writes below `<output_dir>/<target>`
    pub output_dir: PathBuf,
    /// Backend names, run in this order
    pub targets: Vec<String>,
    /// Probe external tools during `check_environment`
    pub verify_tools: bool,
    /// Backend-specific options keyed by backend name
    pub backend_options: IndexMap<String, IndexMap<String, String>>,
}

impl TransformationRequest {
    /// Request with the source directory defaulting to the model's directory
    pub fn new(model_path: PathBuf, output_dir: PathBuf, targets: Vec<String>) -> Self {
        let source_dir = model_path
            .parent()
            .filter(|p| !p.as_os_str().is_empty())
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from("."));
        Self {
            model_path,
            source_dir,
            output_dir,
            targets,
            verify_tools: false,
            backend_options: IndexMap::new(),
        }
    }

    pub fn with_source_dir(mut self, source_dir: PathBuf) -> Self {
        self.source_dir = source_dir;
        self
    }

    pub fn with_verify_tools(mut self, verify_tools: bool) -> Self {
        self.verify_tools = verify_tools;
        self
    }

    pub fn with_backend_options(
        mut self,
        backend_options: IndexMap<String, IndexMap<String, String>>,
    ) -> Self {
        self.backend_options = backend_options;
        self
    }

    /// Settings handed to the context of one target run
    pub fn settings_for(&self, target: &str) -> TargetSettings {
        TargetSettings {
            verify_tools: self.verify_tools,
            options: self.backend_options.get(target).cloned().unwrap_or_default(),
        }
    }
}
