use crate::keys::{generate_storage_key, MediaFolder};
use crate::traits::{Storage, StorageError, StorageResult, StoredObject};
use crate::StorageBackend;
use async_trait::async_trait;
use std::path::{Path, PathBuf};
use tokio::fs;
use tokio::io::AsyncWriteExt;

/// Local filesystem media host
///
/// Blobs are written under `base_path` and served by the API under `base_url`.
#[derive(Clone)]
pub struct LocalStorage {
    base_path: PathBuf,
    base_url: String,
}

impl LocalStorage {
    /// Create a new LocalStorage instance
    ///
    /// # Arguments
    /// * `base_path` - Root directory for blob storage (e.g., "./data/media")
    /// * `base_url` - Base URL for serving blobs (e.g., "http://localhost:4000/media/upload")
    pub async fn new(base_path: impl Into<PathBuf>, base_url: String) -> StorageResult<Self> {
        let base_path = base_path.into();

        fs::create_dir_all(&base_path).await.map_err(|e| {
            StorageError::ConfigError(format!(
                "Failed to create storage directory {}: {}",
                base_path.display(),
                e
            ))
        })?;

        Ok(LocalStorage {
            base_path,
            base_url,
        })
    }

    pub fn base_path(&self) -> &Path {
        &self.base_path
    }

    /// Convert a storage id to a filesystem path, rejecting ids that would
    /// escape the base directory.
    fn key_to_path(&self, storage_id: &str) -> StorageResult<PathBuf> {
        if storage_id.is_empty()
            || storage_id.contains("..")
            || storage_id.starts_with('/')
            || storage_id.contains('\\')
        {
            return Err(StorageError::InvalidKey(
                "Storage key contains invalid characters".to_string(),
            ));
        }

        let path = self.base_path.join(storage_id);
        if path.strip_prefix(&self.base_path).is_err() {
            return Err(StorageError::InvalidKey(
                "Storage key resolves outside storage directory".to_string(),
            ));
        }

        Ok(path)
    }

    fn generate_url(&self, key: &str) -> String {
        format!("{}/{}", self.base_url.trim_end_matches('/'), key)
    }

    async fn ensure_parent_dir(&self, path: &Path) -> StorageResult<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).await?;
        }
        Ok(())
    }
}

#[async_trait]
impl Storage for LocalStorage {
    async fn upload(
        &self,
        folder: MediaFolder,
        filename: &str,
        _content_type: &str,
        data: Vec<u8>,
    ) -> StorageResult<StoredObject> {
        let key = generate_storage_key(folder, filename, &data);
        let path = self.key_to_path(&key)?;
        let size = data.len();

        self.ensure_parent_dir(&path).await?;

        let start = std::time::Instant::now();

        let mut file = fs::File::create(&path).await.map_err(|e| {
            StorageError::UploadFailed(format!("Failed to create file {}: {}", path.display(), e))
        })?;

        file.write_all(&data).await.map_err(|e| {
            StorageError::UploadFailed(format!("Failed to write file {}: {}", path.display(), e))
        })?;

        file.sync_all().await.map_err(|e| {
            StorageError::UploadFailed(format!("Failed to sync file {}: {}", path.display(), e))
        })?;

        let url = self.generate_url(&key);

        tracing::info!(
            path = %path.display(),
            key = %key,
            size_bytes = size,
            duration_ms = start.elapsed().as_secs_f64() * 1000.0,
            "Local storage upload successful"
        );

        Ok(StoredObject {
            storage_id: key,
            url,
        })
    }

    async fn download(&self, storage_id: &str) -> StorageResult<Vec<u8>> {
        let path = self.key_to_path(storage_id)?;

        if !fs::try_exists(&path).await.unwrap_or(false) {
            return Err(StorageError::NotFound(storage_id.to_string()));
        }

        fs::read(&path).await.map_err(|e| {
            StorageError::DownloadFailed(format!("Failed to read file {}: {}", path.display(), e))
        })
    }

    async fn delete(&self, storage_id: &str) -> StorageResult<()> {
        let path = self.key_to_path(storage_id)?;
        let start = std::time::Instant::now();

        if !fs::try_exists(&path).await.unwrap_or(false) {
            return Ok(());
        }

        fs::remove_file(&path).await.map_err(|e| {
            StorageError::DeleteFailed(format!("Failed to delete file {}: {}", path.display(), e))
        })?;

        tracing::info!(
            path = %path.display(),
            key = %storage_id,
            duration_ms = start.elapsed().as_secs_f64() * 1000.0,
            "Local storage delete successful"
        );

        Ok(())
    }

    async fn exists(&self, storage_id: &str) -> StorageResult<bool> {
        let path = self.key_to_path(storage_id)?;
        Ok(fs::try_exists(&path).await.unwrap_or(false))
    }

    fn backend_type(&self) -> StorageBackend {
        StorageBackend::Local
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    async fn storage(dir: &Path) -> LocalStorage {
        LocalStorage::new(dir, "http://localhost:4000/media/".to_string())
            .await
            .unwrap()
    }

    #[tokio::test]
    async fn test_local_storage_upload_download() {
        let dir = tempdir().unwrap();
        let storage = storage(dir.path()).await;
        let data = b"fake mp4 bytes".to_vec();

        let stored = storage
            .upload(MediaFolder::Videos, "clip.mp4", "video/mp4", data.clone())
            .await
            .unwrap();

        assert!(stored.storage_id.starts_with("videos/"));
        assert_eq!(
            stored.url,
            format!("http://localhost:4000/media/{}", stored.storage_id)
        );

        let downloaded = storage.download(&stored.storage_id).await.unwrap();
        assert_eq!(data, downloaded);
    }

    #[tokio::test]
    async fn test_reupload_is_stable() {
        let dir = tempdir().unwrap();
        let storage = storage(dir.path()).await;

        let first = storage
            .upload(MediaFolder::Waste, "a.jpg", "image/jpeg", b"img".to_vec())
            .await
            .unwrap();
        let second = storage
            .upload(MediaFolder::Waste, "b.jpg", "image/jpeg", b"img".to_vec())
            .await
            .unwrap();
        assert_eq!(first, second);
    }

    #[tokio::test]
    async fn test_path_traversal_rejected() {
        let dir = tempdir().unwrap();
        let storage = storage(dir.path()).await;

        let result = storage.download("../../../etc/passwd").await;
        assert!(matches!(result, Err(StorageError::InvalidKey(_))));

        let result = storage.delete("../etc/passwd").await;
        assert!(matches!(result, Err(StorageError::InvalidKey(_))));

        let result = storage.exists("/etc/passwd").await;
        assert!(matches!(result, Err(StorageError::InvalidKey(_))));
    }

    #[tokio::test]
    async fn test_delete_and_exists() {
        let dir = tempdir().unwrap();
        let storage = storage(dir.path()).await;

        let stored = storage
            .upload(MediaFolder::Videos, "clip.webm", "video/webm", b"v".to_vec())
            .await
            .unwrap();
        assert!(storage.exists(&stored.storage_id).await.unwrap());

        storage.delete(&stored.storage_id).await.unwrap();
        assert!(!storage.exists(&stored.storage_id).await.unwrap());

        // Deleting again is a no-op
        assert!(storage.delete(&stored.storage_id).await.is_ok());
    }

    #[tokio::test]
    async fn test_download_missing_is_not_found() {
        let dir = tempdir().unwrap();
        let storage = storage(dir.path()).await;
        let result = storage.download("videos/missing.mp4").await;
        assert!(matches!(result, Err(StorageError::NotFound(_))));
    }
}
