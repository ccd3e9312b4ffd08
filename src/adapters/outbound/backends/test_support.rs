//! In-memory collaborators for backend unit tests

use crate::adapters::outbound::filesystem::YamlModelReader;
use crate::deployment_model::domain::DeploymentModel;
use crate::deployment_model::services::ModelBuilder;
use crate::ports::outbound::{FileAccess, ToolLocator};
use crate::shared::Result;
use crate::transformation::{TargetSettings, TransformationContext};
use indexmap::IndexMap;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

/// Compute hosting a MySQL DBMS hosting a database, plus a web stack
pub const STACK_MODEL: &str = r#"
description: Web shop
components:
  vm:
    type: compute
    properties:
      machine_image: ubuntu
  dbms:
    type: mysql_dbms
    properties:
      root_password: secret
    operations:
      create: ./dbms/create.sh
    relations:
      - hosted_on: vm
  db:
    type: mysql_database
    properties:
      schema_name: shop
    operations:
      configure: ./db/configure.sh
    relations:
      - hosted_on: dbms
  web_vm:
    type: compute
  tomcat:
    type: tomcat
    operations:
      create: ./tomcat/create.sh
      start: ./tomcat/start.sh
    relations:
      - hosted_on: web_vm
  shop:
    type: web_application
    operations:
      configure: ./shop/deploy.sh
    relations:
      - hosted_on: tomcat
      - connects_to: db
"#;

/// Scripts referenced by [`STACK_MODEL`]
pub const STACK_ARTIFACTS: [&str; 5] = [
    "dbms/create.sh",
    "db/configure.sh",
    "tomcat/create.sh",
    "tomcat/start.sh",
    "shop/deploy.sh",
];

pub fn model(yaml: &str) -> Arc<DeploymentModel> {
    let graph = YamlModelReader::new()
        .parse_str(yaml, Path::new("stack.yml"))
        .unwrap();
    Arc::new(ModelBuilder::build("stack", graph).unwrap())
}

/// Shared state of a [`MemoryFiles`], inspectable after the context is gone
#[derive(Default)]
pub struct MemoryState {
    pub sources: IndexMap<String, String>,
    pub outputs: IndexMap<String, String>,
}

#[derive(Clone, Default)]
pub struct MemoryFiles {
    pub state: Arc<Mutex<MemoryState>>,
}

impl MemoryFiles {
    pub fn with_sources(paths: &[&str]) -> Self {
        let files = Self::default();
        {
            let mut state = files.state.lock().unwrap();
            for path in paths {
                state
                    .sources
                    .insert(path.to_string(), format!("#!/bin/sh\n# {}\n", path));
            }
        }
        files
    }

    pub fn output(&self, path: &str) -> Option<String> {
        self.state.lock().unwrap().outputs.get(path).cloned()
    }

    pub fn output_names(&self) -> Vec<String> {
        self.state.lock().unwrap().outputs.keys().cloned().collect()
    }
}

impl FileAccess for MemoryFiles {
    fn prepare(&self) -> Result<()> {
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
            .ok_or_else(|| anyhow::anyhow!("no such artifact: {}", path))
    }

    fn append(&self, path: &str, content: &str) -> Result<()> {
        let mut state = self.state.lock().unwrap();
        state
            .outputs
            .entry(path.to_string())
            .or_default()
            .push_str(content);
        Ok(())
    }

    fn write(&self, path: &str, content: &str) -> Result<()> {
        self.state
            .lock()
            .unwrap()
            .outputs
            .insert(path.to_string(), content.to_string());
        Ok(())
    }

    fn written_files(&self) -> Vec<PathBuf> {
        self.output_names().into_iter().map(PathBuf::from).collect()
    }

    fn release(&self) -> Result<()> {
        Ok(())
    }
}

/// Tool locator that knows exactly the listed tools
#[derive(Clone)]
pub struct KnownTools(pub Vec<&'static str>);

impl ToolLocator for KnownTools {
    fn locate(&self, tool: &str) -> Option<PathBuf> {
        self.0
            .contains(&tool)
            .then(|| PathBuf::from("/usr/bin").join(tool))
    }
}

pub fn context(
    target: &str,
    model: Arc<DeploymentModel>,
    files: &MemoryFiles,
    settings: TargetSettings,
) -> TransformationContext {
    TransformationContext::new(
        target,
        model,
        Box::new(files.clone()),
        Box::new(KnownTools(Vec::new())),
        settings,
    )
}
