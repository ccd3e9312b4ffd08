use std::path::PathBuf;
use topology_transform::prelude::*;

/// Mock ToolLocator that finds exactly the configured tools
#[derive(Default, Clone)]
pub struct MockToolLocator {
    tools: Vec<String>,
}

impl MockToolLocator {
    pub fn with_tools(tools: &[&str]) -> Self {
        Self {
            tools: tools.iter().map(|t| t.to_string()).collect(),
        }
    }
}

impl ToolLocator for MockToolLocator {
    fn locate(&self, tool: &str) -> Option<PathBuf> {
        self.tools
            .iter()
            .any(|t| t == tool)
            .then(|| PathBuf::from("/mock/bin").join(tool))
    }
}
