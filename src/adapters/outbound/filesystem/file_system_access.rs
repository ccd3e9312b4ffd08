use crate::ports::outbound::{FileAccess, FileAccessFactory};
use crate::shared::error::TransformError;
use crate::shared::security::{
    validate_not_symlink, validate_regular_file, validate_relative_path,
};
use crate::shared::Result;
use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

/// FileSystemAccess adapter for one target run
///
/// Reads resolve against the source root (where the model's artifacts
/// live), writes against the target root. Both only accept relative paths
/// that stay below their root.
pub struct FileSystemAccess {
    source_root: PathBuf,
    target_root: PathBuf,
    written: Mutex<Vec<PathBuf>>,
}

impl FileSystemAccess {
    pub fn new(source_root: impl Into<PathBuf>, target_root: impl Into<PathBuf>) -> Self {
        Self {
            source_root: source_root.into(),
            target_root: target_root.into(),
            written: Mutex::new(Vec::new()),
        }
    }

    pub fn source_root(&self) -> &Path {
        &self.source_root
    }

    pub fn target_root(&self) -> &Path {
        &self.target_root
    }

    fn relative(path: &str) -> Result<PathBuf> {
        let relative = PathBuf::from(path.trim_start_matches("./"));
        validate_relative_path(&relative)?;
        Ok(relative)
    }

    /// Resolves an output path and makes sure its parent directory exists
    fn output_path(&self, path: &str) -> Result<(PathBuf, PathBuf)> {
        let relative = Self::relative(path)?;
        let full = self.target_root.join(&relative);

        if let Some(parent) = full.parent() {
            fs::create_dir_all(parent).map_err(|e| TransformError::FileWrite {
                path: full.clone(),
                details: format!("Failed to create parent directory: {}", e),
            })?;
        }

        // Writing through an existing link would escape the target root
        if fs::symlink_metadata(&full).is_ok() {
            validate_not_symlink(&full, "write")?;
        }

        Ok((relative, full))
    }

    fn record(&self, relative: PathBuf) {
        let mut written = self.written.lock().unwrap_or_else(|e| e.into_inner());
        if !written.contains(&relative) {
            written.push(relative);
        }
    }
}

impl FileAccess for FileSystemAccess {
    fn prepare(&self) -> Result<()> {
        if fs::symlink_metadata(&self.target_root).is_ok() {
            validate_not_symlink(&self.target_root, "output")?;
        }
        fs::create_dir_all(&self.target_root).map_err(|e| TransformError::FileWrite {
            path: self.target_root.clone(),
            details: format!("Failed to create output directory: {}", e),
        })?;
        tracing::debug!(target_root = %self.target_root.display(), "output directory ready");
        Ok(())
    }

    fn read_to_string(&self, path: &str) -> Result<String> {
        let relative = Self::relative(path)?;
        let full = self.source_root.join(&relative);

        validate_regular_file(&full, "artifact").map_err(|e| TransformError::FileRead {
            path: full.clone(),
            details: e.to_string(),
        })?;

        fs::read_to_string(&full).map_err(|e| {
            TransformError::FileRead {
                path: full,
                details: e.to_string(),
            }
            .into()
        })
    }

    fn append(&self, path: &str, content: &str) -> Result<()> {
        let (relative, full) = self.output_path(path)?;
        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&full)
            .map_err(|e| TransformError::FileWrite {
                path: full.clone(),
                details: e.to_string(),
            })?;
        file.write_all(content.as_bytes())
            .map_err(|e| TransformError::FileWrite {
                path: full.clone(),
                details: e.to_string(),
            })?;
        self.record(relative);
        Ok(())
    }

    fn write(&self, path: &str, content: &str) -> Result<()> {
        let (relative, full) = self.output_path(path)?;
        fs::write(&full, content).map_err(|e| TransformError::FileWrite {
            path: full.clone(),
            details: e.to_string(),
        })?;
        self.record(relative);
        Ok(())
    }

    fn written_files(&self) -> Vec<PathBuf> {
        self.written
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .clone()
    }

    fn release(&self) -> Result<()> {
        tracing::debug!(
            target_root = %self.target_root.display(),
            files = self.written_files().len(),
            "output directory released"
        );
        Ok(())
    }
}

/// Creates a [`FileSystemAccess`] per target, writing below `<output>/<target>`
pub struct FileSystemAccessFactory {
    source_root: PathBuf,
    output_root: PathBuf,
}

impl FileSystemAccessFactory {
    pub fn new(source_root: impl Into<PathBuf>, output_root: impl Into<PathBuf>) -> Self {
        Self {
            source_root: source_root.into(),
            output_root: output_root.into(),
        }
    }
}

impl FileAccessFactory for FileSystemAccessFactory {
    fn create(&self, target: &str) -> Box<dyn FileAccess> {
        Box::new(FileSystemAccess::new(
            self.source_root.clone(),
            self.output_root.join(target),
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn access() -> (TempDir, FileSystemAccess) {
        let temp_dir = TempDir::new().unwrap();
        let source = temp_dir.path().join("model");
        fs::create_dir_all(source.join("scripts")).unwrap();
        fs::write(source.join("scripts/create.sh"), "#!/bin/sh\necho create\n").unwrap();
        let access = FileSystemAccess::new(source, temp_dir.path().join("out"));
        (temp_dir, access)
    }

    #[test]
    fn test_prepare_creates_target_root() {
        let (_temp_dir, access) = access();
        assert!(!access.target_root().exists());
        access.prepare().unwrap();
        assert!(access.target_root().is_dir());
    }

    #[test]
    fn test_read_artifact_relative_to_source() {
        let (_temp_dir, access) = access();
        let content = access.read_to_string("./scripts/create.sh").unwrap();
        assert!(content.contains("echo create"));
    }

    #[test]
    fn test_read_missing_artifact() {
        let (_temp_dir, access) = access();
        let err = access.read_to_string("scripts/missing.sh").unwrap_err();
        assert!(matches!(
            err.downcast_ref::<TransformError>(),
            Some(TransformError::FileRead { .. })
        ));
    }

    #[test]
    fn test_paths_escaping_root_are_rejected() {
        let (_temp_dir, access) = access();
        access.prepare().unwrap();
        assert!(access.read_to_string("../outside.sh").is_err());
        assert!(access.write("/tmp/absolute.yaml", "x").is_err());
        assert!(access.append("a/../../b.yaml", "x").is_err());
        assert!(access.written_files().is_empty());
    }

    #[test]
    fn test_write_creates_parents_and_records_once() {
        let (_temp_dir, access) = access();
        access.prepare().unwrap();
        access.write("web/Dockerfile", "FROM ubuntu\n").unwrap();
        access.write("web/Dockerfile", "FROM debian\n").unwrap();

        let content = fs::read_to_string(access.target_root().join("web/Dockerfile")).unwrap();
        assert_eq!(content, "FROM debian\n");
        assert_eq!(access.written_files(), vec![PathBuf::from("web/Dockerfile")]);
    }

    #[test]
    fn test_append_accumulates() {
        let (_temp_dir, access) = access();
        access.prepare().unwrap();
        access.append("deployment.yml", "- hosts: vm\n").unwrap();
        access.append("deployment.yml", "- hosts: db\n").unwrap();

        let content = fs::read_to_string(access.target_root().join("deployment.yml")).unwrap();
        assert_eq!(content, "- hosts: vm\n- hosts: db\n");
    }

    #[cfg(unix)]
    #[test]
    fn test_write_through_symlink_rejected() {
        let (temp_dir, access) = access();
        access.prepare().unwrap();
        let outside = temp_dir.path().join("outside.txt");
        fs::write(&outside, "keep").unwrap();
        std::os::unix::fs::symlink(&outside, access.target_root().join("link.yaml")).unwrap();

        assert!(access.write("link.yaml", "overwrite").is_err());
        assert_eq!(fs::read_to_string(&outside).unwrap(), "keep");
    }

    #[test]
    fn test_factory_separates_targets() {
        let temp_dir = TempDir::new().unwrap();
        let factory = FileSystemAccessFactory::new(temp_dir.path(), temp_dir.path().join("out"));
        let heat = factory.create("heat");
        heat.prepare().unwrap();
        heat.write("stack.yaml", "heat_template_version: 2018-08-31\n")
            .unwrap();

        assert!(temp_dir.path().join("out/heat/stack.yaml").is_file());
    }
}
