use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::{Arc, Mutex};
use topology_transform::prelude::*;

#[derive(Default)]
struct State {
    sources: HashMap<String, String>,
    outputs: Vec<(String, String)>,
    fail_writes_to: Option<String>,
    prepare_calls: usize,
    release_calls: usize,
}

/// In-memory FileAccess with injectable write failures
///
/// Clones share state, so a test keeps one handle while the context owns
/// another.
#[derive(Default, Clone)]
pub struct MockFileAccess {
    state: Arc<Mutex<State>>,
}

impl MockFileAccess {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_source(self, path: &str, content: &str) -> Self {
        self.state
            .lock()
            .unwrap()
            .sources
            .insert(path.to_string(), content.to_string());
        self
    }

    /// Every write or append to `path` fails with an I/O error
    pub fn failing_writes_to(self, path: &str) -> Self {
        self.state.lock().unwrap().fail_writes_to = Some(path.to_string());
        self
    }

    pub fn output(&self, path: &str) -> Option<String> {
        self.state
            .lock()
            .unwrap()
            .outputs
            .iter()
            .find(|(p, _)| p == path)
            .map(|(_, c)| c.clone())
    }

    pub fn prepare_calls(&self) -> usize {
        self.state.lock().unwrap().prepare_calls
    }

    pub fn release_calls(&self) -> usize {
        self.state.lock().unwrap().release_calls
    }

    fn check_writable(&self, path: &str) -> Result<()> {
        if self.state.lock().unwrap().fail_writes_to.as_deref() == Some(path) {
            return Err(TransformError::FileWrite {
                path: PathBuf::from(path),
                details: "injected I/O failure".to_string(),
            }
            .into());
        }
        Ok(())
    }
}

impl FileAccess for MockFileAccess {
    fn prepare(&self) -> Result<()> {
        self.state.lock().unwrap().prepare_calls += 1;
        Ok(())
    }

    fn read_to_string(&self, path: &str) -> Result<String> {
        let path = path.trim_start_matches("./");
        self.state
            .lock()
            .unwrap()
            .sources
            .get(path)
            .cloned()
            .ok_or_else(|| {
                TransformError::FileRead {
                    path: PathBuf::from(path),
                    details: "not found".to_string(),
                }
                .into()
            })
    }

    fn append(&self, path: &str, content: &str) -> Result<()> {
        self.check_writable(path)?;
        let mut state = self.state.lock().unwrap();
        match state.outputs.iter_mut().find(|(p, _)| p == path) {
            Some((_, existing)) => existing.push_str(content),
            None => state.outputs.push((path.to_string(), content.to_string())),
        }
        Ok(())
    }

    fn write(&self, path: &str, content: &str) -> Result<()> {
        self.check_writable(path)?;
        let mut state = self.state.lock().unwrap();
        state.outputs.retain(|(p, _)| p != path);
        state.outputs.push((path.to_string(), content.to_string()));
        Ok(())
    }

    fn written_files(&self) -> Vec<PathBuf> {
        self.state
            .lock()
            .unwrap()
            .outputs
            .iter()
            .map(|(p, _)| PathBuf::from(p))
            .collect()
    }

    fn release(&self) -> Result<()> {
        self.state.lock().unwrap().release_calls += 1;
        Ok(())
    }
}

/// Hands out one MockFileAccess per target, created on first use
#[derive(Default, Clone)]
pub struct MockFileAccessFactory {
    template: MockFileAccess,
    created: Arc<Mutex<HashMap<String, MockFileAccess>>>,
}

impl MockFileAccessFactory {
    /// Targets share the template's sources but get their own outputs
    pub fn new(template: MockFileAccess) -> Self {
        Self {
            template,
            created: Arc::default(),
        }
    }

    pub fn for_target(&self, target: &str) -> Option<MockFileAccess> {
        self.created.lock().unwrap().get(target).cloned()
    }
}

impl FileAccessFactory for MockFileAccessFactory {
    fn create(&self, target: &str) -> Box<dyn FileAccess> {
        let template = self.template.state.lock().unwrap();
        let access = MockFileAccess {
            state: Arc::new(Mutex::new(State {
                sources: template.sources.clone(),
                fail_writes_to: template.fail_writes_to.clone(),
                ..State::default()
            })),
        };
        self.created
            .lock()
            .unwrap()
            .insert(target.to_string(), access.clone());
        Box::new(access)
    }
}
