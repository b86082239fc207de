//! Media host wrapper that can be told to fail.

use async_trait::async_trait;
use smartbin_storage::{
    LocalStorage, MediaFolder, Storage, StorageBackend, StorageError, StorageResult,
    StoredObject,
};

/// Which operations the wrapped media host rejects.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StorageFault {
    None,
    Uploads,
    Deletes,
}

pub struct FailingStorage {
    inner: LocalStorage,
    fault: StorageFault,
}

impl FailingStorage {
    pub fn new(inner: LocalStorage, fault: StorageFault) -> Self {
        Self { inner, fault }
    }
}

#[async_trait]
impl Storage for FailingStorage {
    async fn upload(
        &self,
        folder: MediaFolder,
        filename: &str,
        content_type: &str,
        data: Vec<u8>,
    ) -> StorageResult<StoredObject> {
        if self.fault == StorageFault::Uploads {
            return Err(StorageError::UploadFailed(
                "simulated media host outage".to_string(),
            ));
        }
        self.inner.upload(folder, filename, content_type, data).await
    }

    async fn download(&self, storage_id: &str) -> StorageResult<Vec<u8>> {
        self.inner.download(storage_id).await
    }

    async fn delete(&self, storage_id: &str) -> StorageResult<()> {
        if self.fault == StorageFault::Deletes {
            return Err(StorageError::DeleteFailed(
                "simulated media host outage".to_string(),
            ));
        }
        self.inner.delete(storage_id).await
    }

    async fn exists(&self, storage_id: &str) -> StorageResult<bool> {
        self.inner.exists(storage_id).await
    }

    fn backend_type(&self) -> StorageBackend {
        StorageBackend::Local
    }
}
