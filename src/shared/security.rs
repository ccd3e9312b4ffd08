use crate::shared::error::TransformError;
use crate::shared::Result;
use std::fs;
use std::path::{Component, Path};

/// Maximum size of a model document or referenced artifact (100 MB)
pub const MAX_FILE_SIZE: u64 = 100 * 1024 * 1024;

/// Validates that a path is not a symbolic link
///
/// Uses `symlink_metadata()` so the link itself is inspected, not its target.
///
/// # Errors
/// Returns an error if the path is a symbolic link or if metadata cannot be read
pub fn validate_not_symlink(path: &Path, operation: &str) -> Result<()> {
    let metadata = fs::symlink_metadata(path).map_err(|e| TransformError::FileRead {
        path: path.to_path_buf(),
        details: format!("cannot stat before {}: {}", operation, e),
    })?;

    if metadata.is_symlink() {
        return Err(TransformError::PathViolation {
            path: path.to_path_buf(),
            reason: format!("{} operations on symbolic links are not allowed", operation),
        }
        .into());
    }

    Ok(())
}

/// Validates that a path exists and is a regular file (not a directory or symlink)
///
/// # Errors
/// Returns an error if:
/// - The path doesn't exist
/// - The path is a symbolic link
/// - The path is not a regular file
pub fn validate_regular_file(path: &Path, file_description: &str) -> Result<()> {
    let metadata = fs::symlink_metadata(path).map_err(|e| TransformError::FileRead {
        path: path.to_path_buf(),
        details: format!("cannot stat {}: {}", file_description, e),
    })?;

    if metadata.is_symlink() {
        return Err(TransformError::PathViolation {
            path: path.to_path_buf(),
            reason: "symbolic links are not allowed".to_string(),
        }
        .into());
    }

    if !metadata.is_file() {
        anyhow::bail!("{} is not a regular file", path.display());
    }

    validate_file_size(metadata.len(), path, MAX_FILE_SIZE)
}

/// Rejects models and artifacts above `max_size` bytes
pub fn validate_file_size(file_size: u64, path: &Path, max_size: u64) -> Result<()> {
    if file_size > max_size {
        return Err(TransformError::PathViolation {
            path: path.to_path_buf(),
            reason: format!("file is too large ({} bytes, limit {})", file_size, max_size),
        }
        .into());
    }
    Ok(())
}

/// Validates that a path is relative and stays below its root
///
/// Backends address artifacts and outputs by relative path; absolute paths
/// and `..` components would escape the managed source/target directories.
pub fn validate_relative_path(path: &Path) -> Result<()> {
    let escapes = path.components().any(|c| {
        matches!(
            c,
            Component::ParentDir | Component::RootDir | Component::Prefix(_)
        )
    });
    if escapes || path.as_os_str().is_empty() {
        return Err(TransformError::PathViolation {
            path: path.to_path_buf(),
            reason: "path must be relative and must not leave its root directory".to_string(),
        }
        .into());
    }
    Ok(())
}
