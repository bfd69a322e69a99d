//! Run-scoped temporary workspace

use std::path::{Path, PathBuf};
use tempfile::TempDir;
use thiserror::Error;
use tracing::debug;

/// Errors raised while managing workspace files.
#[derive(Debug, Error)]
pub enum WorkspaceError {
    #[error("failed to create workspace: {0}")]
    Create(#[source] std::io::Error),

    #[error("failed to write workspace file '{name}': {source}")]
    Write {
        name: String,
        #[source]
        source: std::io::Error,
    },
}

/// A temporary directory whose lifetime is bound to one pipeline run.
///
/// Used for materializing intermediate files (e.g. the hyperparameter
/// config) that a step needs but that are not artifacts in the versioned
/// store. The directory and everything in it is removed when the workspace
/// is dropped, on every exit path.
#[derive(Debug)]
pub struct ScopedWorkspace {
    dir: TempDir,
}

impl ScopedWorkspace {
    /// Create a fresh workspace for one run.
    pub fn acquire() -> Result<Self, WorkspaceError> {
        let dir = TempDir::with_prefix("mlpipe-").map_err(WorkspaceError::Create)?;
        debug!("Acquired workspace at {}", dir.path().display());
        Ok(Self { dir })
    }

    /// Location of the workspace directory.
    pub fn path(&self) -> &Path {
        self.dir.path()
    }

    /// Write a transient file into the workspace, returning its absolute path.
    pub fn write_file(&self, name: &str, content: &str) -> Result<PathBuf, WorkspaceError> {
        let path = self.dir.path().join(name);
        std::fs::write(&path, content).map_err(|source| WorkspaceError::Write {
            name: name.to_string(),
            source,
        })?;
        debug!("Materialized workspace file {}", path.display());
        Ok(path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_write_file_returns_absolute_path() {
        let workspace = ScopedWorkspace::acquire().unwrap();
        let path = workspace.write_file("rf_config.json", "{}").unwrap();

        assert!(path.is_absolute());
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "{}");
    }

    #[test]
    fn test_files_removed_on_drop() {
        let path;
        {
            let workspace = ScopedWorkspace::acquire().unwrap();
            path = workspace.write_file("transient.txt", "gone soon").unwrap();
            assert!(path.exists());
        }
        assert!(!path.exists());
    }
}
