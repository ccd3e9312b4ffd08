use std::path::Path;
use topology_transform::prelude::*;

/// Mock ModelReader parsing an in-memory document regardless of the path
pub struct MockModelReader {
    content: String,
}

impl MockModelReader {
    pub fn new(content: impl Into<String>) -> Self {
        Self {
            content: content.into(),
        }
    }
}

impl ModelReader for MockModelReader {
    fn read_model(&self, path: &Path) -> Result<EntityGraph> {
        YamlModelReader::new().parse_str(&self.content, path)
    }
}
