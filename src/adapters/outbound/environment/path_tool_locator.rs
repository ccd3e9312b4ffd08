use crate::ports::outbound::ToolLocator;
use std::env;
use std::ffi::OsString;
use std::path::PathBuf;

/// PathToolLocator adapter searching the directories of a `PATH`-style list
#[derive(Debug, Clone)]
pub struct PathToolLocator {
    search_path: Option<OsString>,
}

impl PathToolLocator {
    /// Searches the process's `PATH`
    pub fn new() -> Self {
        Self {
            search_path: env::var_os("PATH"),
        }
    }

    /// Searches an explicit path list instead of the process environment
    pub fn with_search_path(search_path: impl Into<OsString>) -> Self {
        Self {
            search_path: Some(search_path.into()),
        }
    }

    fn candidates(tool: &str) -> Vec<String> {
        #[cfg(windows)]
        let candidates = vec![format!("{}.exe", tool), tool.to_string()];
        #[cfg(not(windows))]
        let candidates = vec![tool.to_string()];
        candidates
    }
}

impl Default for PathToolLocator {
    fn default() -> Self {
        Self::new()
    }
}

impl ToolLocator for PathToolLocator {
    fn locate(&self, tool: &str) -> Option<PathBuf> {
        let search_path = self.search_path.as_ref()?;
        let found = env::split_paths(search_path).find_map(|dir| {
            Self::candidates(tool)
                .into_iter()
                .map(|name| dir.join(name))
                .find(|candidate| candidate.is_file())
        });
        tracing::debug!(tool, found = ?found, "tool lookup");
        found
    }
}
