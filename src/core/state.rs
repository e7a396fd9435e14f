use std::{
    fs,
    io::{self, Write},
    path::{Path, PathBuf},
};

use tempfile::NamedTempFile;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum StateError {
    #[error("head file not found: {0}")]
    NotFound(PathBuf),

    #[error("failed to access head file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("head file is empty: {0}")]
    Empty(PathBuf),
}

/// Reads the last inspected commit id. Surrounding whitespace is dropped and
/// only the first line counts.
pub fn read_marker(path: &Path) -> Result<String, StateError> {
    let content = match fs::read_to_string(path) {
        Ok(content) => content,
        Err(e) if e.kind() == io::ErrorKind::NotFound => {
            return Err(StateError::NotFound(path.to_path_buf()));
        }
        Err(source) => {
            return Err(StateError::Io {
                path: path.to_path_buf(),
                source,
            });
        }
    };

    match content.trim().lines().next() {
        Some(marker) if !marker.trim().is_empty() => Ok(marker.trim().to_string()),
        _ => Err(StateError::Empty(path.to_path_buf())),
    }
}

/// Replaces the marker content with `commit`.
///
/// The new content goes to a temporary file next to `path` which is then
/// renamed over it, so readers see either the old or the new id.
pub fn write_marker(path: &Path, commit: &str) -> Result<(), StateError> {
    let io_err = |source: io::Error| StateError::Io {
        path: path.to_path_buf(),
        source,
    };

    let dir = match path.parent() {
        Some(p) if !p.as_os_str().is_empty() => p,
        _ => Path::new("."),
    };

    let mut tmp = NamedTempFile::new_in(dir).map_err(io_err)?;
    tmp.write_all(commit.as_bytes()).map_err(io_err)?;
    tmp.as_file().sync_all().map_err(io_err)?;

    if let Ok(meta) = fs::metadata(path) {
        tmp.as_file()
            .set_permissions(meta.permissions())
            .map_err(io_err)?;
    }

    tmp.persist(path).map_err(|e| io_err(e.error))?;
    Ok(())
}

pub fn same_commit(a: &str, b: &str) -> bool {
    a.trim() == b.trim()
}
