//! Journal path checks shared by the commands.

use std::path::{Path, PathBuf};
use thiserror::Error;

/// Why a journal path was rejected.
#[derive(Error, Debug)]
pub enum PathError {
    #[error("journal {0} does not exist")]
    Missing(String),
    #[error("{0} is a directory")]
    Directory(String),
    #[error("parent directory of {0} does not exist")]
    NoParent(String),
}

/// Checks `path` before a command touches it. Readers need an existing
/// file; writers (`allow_create`) only need an existing parent directory.
pub fn validate_journal_path(path: &Path, allow_create: bool) -> Result<PathBuf, PathError> {
    let shown = sanitize_path_for_error(path);
    if path.is_dir() {
        return Err(PathError::Directory(shown));
    }
    if path.exists() {
        return Ok(path.to_path_buf());
    }
    if !allow_create {
        return Err(PathError::Missing(shown));
    }
    match path.parent() {
        Some(parent) if parent.as_os_str().is_empty() || parent.is_dir() => Ok(path.to_path_buf()),
        _ => Err(PathError::NoParent(shown)),
    }
}

/// File name only, so errors do not echo full directory layouts.
pub fn sanitize_path_for_error(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| "<journal>".to_string())
}
