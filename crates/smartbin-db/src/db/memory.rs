//! In-memory store implementations.
//!
//! Used by integration tests and by `STORE_BACKEND=memory` for local
//! development. Each store keeps its rows behind a `tokio::sync::RwLock`.

use async_trait::async_trait;
use chrono::Utc;
use smartbin_core::models::{
    Asset, Bin, NewWasteEntry, RegisteredAsset, WasteCategory, WasteEntry,
};
use smartbin_core::AppError;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;
use uuid::Uuid;

use super::traits::{AssetStore, BinStore, WasteStore};

/// In-memory bin store
#[derive(Clone, Default)]
pub struct MemoryBinStore {
    bins: Arc<RwLock<Vec<Bin>>>,
}

impl MemoryBinStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl BinStore for MemoryBinStore {
    async fn create_bin(&self, name: &str) -> Result<Bin, AppError> {
        let mut bins = self.bins.write().await;
        if bins.iter().any(|b| b.name == name) {
            return Err(AppError::InvalidInput(format!(
                "Bin name '{}' is already taken",
                name
            )));
        }
        let bin = Bin {
            id: Uuid::new_v4(),
            name: name.to_string(),
            created_at: Utc::now(),
        };
        bins.push(bin.clone());
        Ok(bin)
    }

    async fn get_bin(&self, id: Uuid) -> Result<Option<Bin>, AppError> {
        Ok(self.bins.read().await.iter().find(|b| b.id == id).cloned())
    }

    async fn list_bins(&self) -> Result<Vec<Bin>, AppError> {
        Ok(self.bins.read().await.clone())
    }
}

/// In-memory asset store
#[derive(Clone, Default)]
pub struct MemoryAssetStore {
    assets: Arc<RwLock<Vec<Asset>>>,
}

impl MemoryAssetStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn len(&self) -> usize {
        self.assets.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.assets.read().await.is_empty()
    }
}

#[async_trait]
impl AssetStore for MemoryAssetStore {
    async fn register_asset(
        &self,
        bin_id: Uuid,
        url: &str,
        storage_id: &str,
    ) -> Result<RegisteredAsset, AppError> {
        let mut assets = self.assets.write().await;
        if let Some(existing) = assets
            .iter()
            .find(|a| a.bin_id == bin_id && a.storage_id == storage_id)
        {
            return Ok(RegisteredAsset {
                asset: existing.clone(),
                duplicate: true,
            });
        }

        let asset = Asset {
            id: Uuid::new_v4(),
            bin_id,
            url: url.to_string(),
            storage_id: storage_id.to_string(),
            created_at: Utc::now(),
        };
        assets.push(asset.clone());
        Ok(RegisteredAsset {
            asset,
            duplicate: false,
        })
    }

    async fn get_asset(&self, id: Uuid) -> Result<Option<Asset>, AppError> {
        Ok(self.assets.read().await.iter().find(|a| a.id == id).cloned())
    }

    async fn list_assets_by_bin(&self, bin_id: Uuid) -> Result<Vec<Asset>, AppError> {
        Ok(self
            .assets
            .read()
            .await
            .iter()
            .filter(|a| a.bin_id == bin_id)
            .cloned()
            .collect())
    }

    async fn delete_asset(&self, id: Uuid) -> Result<bool, AppError> {
        let mut assets = self.assets.write().await;
        let before = assets.len();
        assets.retain(|a| a.id != id);
        Ok(assets.len() != before)
    }

    async fn count_by_storage_id(&self, storage_id: &str) -> Result<i64, AppError> {
        Ok(self
            .assets
            .read()
            .await
            .iter()
            .filter(|a| a.storage_id == storage_id)
            .count() as i64)
    }
}

/// In-memory waste store
#[derive(Clone, Default)]
pub struct MemoryWasteStore {
    entries: Arc<RwLock<HashMap<Uuid, WasteEntry>>>,
}

impl MemoryWasteStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a fully-formed entry, e.g. with a specific `disposed_at`.
    pub async fn insert(&self, entry: WasteEntry) {
        self.entries.write().await.insert(entry.id, entry);
    }
}

#[async_trait]
impl WasteStore for MemoryWasteStore {
    async fn create_waste(&self, entry: NewWasteEntry) -> Result<WasteEntry, AppError> {
        let entry = entry.into_entry(Uuid::new_v4(), Utc::now());
        self.entries.write().await.insert(entry.id, entry.clone());
        Ok(entry)
    }

    async fn get_waste(&self, id: Uuid) -> Result<Option<WasteEntry>, AppError> {
        Ok(self.entries.read().await.get(&id).cloned())
    }

    async fn list_waste(&self) -> Result<Vec<WasteEntry>, AppError> {
        let mut entries: Vec<WasteEntry> = self.entries.read().await.values().cloned().collect();
        entries.sort_by(|a, b| {
            b.disposed_at
                .cmp(&a.disposed_at)
                .then_with(|| a.id.cmp(&b.id))
        });
        Ok(entries)
    }

    async fn set_category(
        &self,
        id: Uuid,
        category: WasteCategory,
    ) -> Result<Option<WasteEntry>, AppError> {
        let mut entries = self.entries.write().await;
        Ok(entries.get_mut(&id).map(|entry| {
            entry.category = Some(category);
            entry.clone()
        }))
    }

    async fn delete_waste(&self, id: Uuid) -> Result<bool, AppError> {
        Ok(self.entries.write().await.remove(&id).is_some())
    }

    async fn count_by_storage_id(&self, storage_id: &str) -> Result<i64, AppError> {
        Ok(self
            .entries
            .read()
            .await
            .values()
            .filter(|e| e.storage_id == storage_id)
            .count() as i64)
    }
}
