//! Local filesystem storage backend.

use crate::traits::{Storage, StorageError, StorageResult};
use async_trait::async_trait;
use bytes::Bytes;
use std::path::PathBuf;
use tokio::fs;
use tokio::io::AsyncWriteExt;

/// Attachment storage rooted at a single upload directory.
#[derive(Clone)]
pub struct LocalStorage {
    base_path: PathBuf,
}

impl LocalStorage {
    /// Create the backend, creating the upload directory if needed.
    pub async fn new(base_path: impl Into<PathBuf>) -> StorageResult<Self> {
        let base_path = base_path.into();

        fs::create_dir_all(&base_path).await.map_err(|e| {
            StorageError::ConfigError(format!(
                "Failed to create upload directory {}: {}",
                base_path.display(),
                e
            ))
        })?;

        Ok(LocalStorage { base_path })
    }

    pub fn base_path(&self) -> &PathBuf {
        &self.base_path
    }

    /// Resolve a stored name to a filesystem path.
    ///
    /// Stored names are generated server-side, but the traversal guard stays:
    /// a name containing `..`, a path separator, or a leading `/` never
    /// resolves.
    fn name_to_path(&self, stored_name: &str) -> StorageResult<PathBuf> {
        if stored_name.is_empty()
            || stored_name.contains("..")
            || stored_name.contains('/')
            || stored_name.contains('\\')
        {
            return Err(StorageError::InvalidKey(
                "Stored name contains invalid characters".to_string(),
            ));
        }
        Ok(self.base_path.join(stored_name))
    }
}

#[async_trait]
impl Storage for LocalStorage {
    async fn store(&self, stored_name: &str, data: Bytes) -> StorageResult<PathBuf> {
        let path = self.name_to_path(stored_name)?;
        let size = data.len();
        let start = std::time::Instant::now();

        let mut file = fs::File::create(&path).await.map_err(|e| {
            StorageError::StoreFailed(format!("Failed to create file {}: {}", path.display(), e))
        })?;

        file.write_all(&data).await.map_err(|e| {
            StorageError::StoreFailed(format!("Failed to write file {}: {}", path.display(), e))
        })?;

        file.sync_all().await.map_err(|e| {
            StorageError::StoreFailed(format!("Failed to sync file {}: {}", path.display(), e))
        })?;

        tracing::info!(
            path = %path.display(),
            size_bytes = size,
            duration_ms = start.elapsed().as_secs_f64() * 1000.0,
            "Attachment stored"
        );

        Ok(path)
    }

    async fn delete(&self, stored_name: &str) -> StorageResult<()> {
        let path = self.name_to_path(stored_name)?;
        match fs::remove_file(&path).await {
            Ok(()) => {
                tracing::info!(path = %path.display(), "Attachment deleted");
                Ok(())
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(StorageError::DeleteFailed(format!(
                "Failed to delete {}: {}",
                path.display(),
                e
            ))),
        }
    }

    async fn exists(&self, stored_name: &str) -> StorageResult<bool> {
        let path = self.name_to_path(stored_name)?;
        Ok(fs::try_exists(&path).await?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    async fn storage() -> (tempfile::TempDir, LocalStorage) {
        let dir = tempfile::tempdir().unwrap();
        let storage = LocalStorage::new(dir.path()).await.unwrap();
        (dir, storage)
    }

    #[tokio::test]
    async fn store_then_exists_then_delete() {
        let (_dir, storage) = storage().await;

        let path = storage
            .store("abc_1.pdf", Bytes::from_static(b"%PDF-1.4"))
            .await
            .unwrap();
        assert!(path.ends_with("abc_1.pdf"));
        assert!(storage.exists("abc_1.pdf").await.unwrap());

        storage.delete("abc_1.pdf").await.unwrap();
        assert!(!storage.exists("abc_1.pdf").await.unwrap());
    }

    #[tokio::test]
    async fn deleting_absent_file_is_not_an_error() {
        let (_dir, storage) = storage().await;
        assert!(storage.delete("never-stored.pdf").await.is_ok());
    }

    #[tokio::test]
    async fn traversal_names_are_rejected() {
        let (_dir, storage) = storage().await;
        for name in ["../escape.pdf", "a/b.pdf", "a\\b.pdf", ""] {
            let err = storage.store(name, Bytes::from_static(b"x")).await;
            assert!(matches!(err, Err(StorageError::InvalidKey(_))), "{name}");
        }
    }
}
