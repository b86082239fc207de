//! Storage abstraction trait
//!
//! This module defines the Storage trait that every media host backend implements.

use crate::keys::MediaFolder;
use crate::StorageBackend;
use async_trait::async_trait;
use thiserror::Error;

/// Storage operation errors
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("Upload failed: {0}")]
    UploadFailed(String),

    #[error("Download failed: {0}")]
    DownloadFailed(String),

    #[error("Delete failed: {0}")]
    DeleteFailed(String),

    #[error("File not found: {0}")]
    NotFound(String),

    #[error("Invalid storage key: {0}")]
    InvalidKey(String),

    #[error("Storage backend error: {0}")]
    BackendError(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Configuration error: {0}")]
    ConfigError(String),
}

/// Result type for storage operations
pub type StorageResult<T> = Result<T, StorageError>;

/// A blob accepted by the media host.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredObject {
    /// Opaque identifier used to delete the blob later.
    pub storage_id: String,
    /// Publicly retrievable URL.
    pub url: String,
}

/// Media host abstraction
///
/// The asset and waste services only talk to this trait, so they work the same
/// against S3 and the local filesystem.
#[async_trait]
pub trait Storage: Send + Sync {
    /// Upload a blob under `folder` and return its storage id and URL.
    async fn upload(
        &self,
        folder: MediaFolder,
        filename: &str,
        content_type: &str,
        data: Vec<u8>,
    ) -> StorageResult<StoredObject>;

    /// Download a blob by its storage id
    async fn download(&self, storage_id: &str) -> StorageResult<Vec<u8>>;

    /// Delete a blob by its storage id. Deleting a missing blob succeeds.
    async fn delete(&self, storage_id: &str) -> StorageResult<()>;

    /// Check if a blob exists
    async fn exists(&self, storage_id: &str) -> StorageResult<bool>;

    /// Get the storage backend type
    fn backend_type(&self) -> StorageBackend;
}
