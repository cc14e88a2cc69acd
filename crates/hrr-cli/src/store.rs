//! Filesystem-backed file store

use hrr_core::{FileStore, StorageError};
use std::io::ErrorKind;
use std::path::{Component, Path, PathBuf};

/// File store confined to a project root
///
/// Paths are resolved relative to the root. Absolute paths are accepted only
/// when they already point inside it, and `..` segments are refused.
#[derive(Debug, Clone)]
pub struct DiskStore {
    root: PathBuf,
}

impl DiskStore {
    /// Create a store rooted at `root`
    #[inline]
    #[must_use]
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Project root
    #[inline]
    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Map a project path to a location on disk
    ///
    /// # Errors
    /// Returns `StorageError::Forbidden` for paths escaping the root.
    pub fn resolve(&self, path: &Path) -> Result<PathBuf, StorageError> {
        let relative = if path.is_absolute() {
            path.strip_prefix(&self.root)
                .map_err(|_| StorageError::Forbidden(path.to_path_buf()))?
        } else {
            path
        };

        let escapes = relative
            .components()
            .any(|c| !matches!(c, Component::Normal(_) | Component::CurDir));
        if escapes {
            return Err(StorageError::Forbidden(path.to_path_buf()));
        }
        Ok(self.root.join(relative))
    }
}

fn io_error(path: &Path, source: std::io::Error) -> StorageError {
    if source.kind() == ErrorKind::NotFound {
        StorageError::NotFound(path.to_path_buf())
    } else {
        StorageError::Io {
            path: path.to_path_buf(),
            source,
        }
    }
}

#[async_trait::async_trait]
impl FileStore for DiskStore {
    async fn read_file(&self, path: &Path) -> Result<String, StorageError> {
        let full = self.resolve(path)?;
        tokio::fs::read_to_string(&full)
            .await
            .map_err(|e| io_error(path, e))
    }

    async fn write_file(&self, path: &Path, content: &str) -> Result<(), StorageError> {
        let full = self.resolve(path)?;
        tokio::fs::write(&full, content)
            .await
            .map_err(|e| io_error(path, e))?;
        tracing::debug!(path = %path.display(), bytes = content.len(), "wrote file");
        Ok(())
    }
}
