//! Store traits shared by the PostgreSQL and in-memory backends.

use async_trait::async_trait;
use smartbin_core::models::{Asset, Bin, NewWasteEntry, RegisteredAsset, WasteCategory, WasteEntry};
use smartbin_core::AppError;
use uuid::Uuid;

#[async_trait]
pub trait BinStore: Send + Sync {
    /// Insert a bin. A name that is already taken yields `AppError::InvalidInput`.
    async fn create_bin(&self, name: &str) -> Result<Bin, AppError>;

    async fn get_bin(&self, id: Uuid) -> Result<Option<Bin>, AppError>;

    /// All bins, oldest first.
    async fn list_bins(&self) -> Result<Vec<Bin>, AppError>;
}

#[async_trait]
pub trait AssetStore: Send + Sync {
    /// Return the existing asset for `(bin_id, storage_id)` or insert a new one.
    ///
    /// Concurrent callers racing on the same pair end up with one row; the
    /// loser sees `duplicate = true`.
    async fn register_asset(
        &self,
        bin_id: Uuid,
        url: &str,
        storage_id: &str,
    ) -> Result<RegisteredAsset, AppError>;

    async fn get_asset(&self, id: Uuid) -> Result<Option<Asset>, AppError>;

    /// Assets for one bin, oldest first.
    async fn list_assets_by_bin(&self, bin_id: Uuid) -> Result<Vec<Asset>, AppError>;

    /// Returns false when no row matched.
    async fn delete_asset(&self, id: Uuid) -> Result<bool, AppError>;

    /// Number of assets, across all bins, pointing at `storage_id`.
    async fn count_by_storage_id(&self, storage_id: &str) -> Result<i64, AppError>;
}

#[async_trait]
pub trait WasteStore: Send + Sync {
    async fn create_waste(&self, entry: NewWasteEntry) -> Result<WasteEntry, AppError>;

    async fn get_waste(&self, id: Uuid) -> Result<Option<WasteEntry>, AppError>;

    /// All entries, newest `disposed_at` first.
    async fn list_waste(&self) -> Result<Vec<WasteEntry>, AppError>;

    /// Overwrite the category. Returns `None` when the entry does not exist.
    async fn set_category(
        &self,
        id: Uuid,
        category: WasteCategory,
    ) -> Result<Option<WasteEntry>, AppError>;

    /// Returns false when no row matched.
    async fn delete_waste(&self, id: Uuid) -> Result<bool, AppError>;

    /// Number of entries pointing at `storage_id`.
    async fn count_by_storage_id(&self, storage_id: &str) -> Result<i64, AppError>;
}
