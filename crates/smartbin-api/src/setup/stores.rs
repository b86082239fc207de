//! Record store selection

use anyhow::Result;
use smartbin_core::{Config, StoreBackend};
use smartbin_db::{
    AssetRepository, BinRepository, MemoryAssetStore, MemoryBinStore, MemoryWasteStore,
    WasteRepository,
};
use std::sync::Arc;

use super::database::setup_database;
use crate::state::StoreState;

/// Build the bin, asset and waste stores for the configured backend.
pub async fn setup_stores(config: &Config) -> Result<StoreState> {
    match config.store_backend() {
        StoreBackend::Postgres => {
            let pool = setup_database(config).await?;
            Ok(StoreState {
                bins: Arc::new(BinRepository::new(pool.clone())),
                assets: Arc::new(AssetRepository::new(pool.clone())),
                waste: Arc::new(WasteRepository::new(pool.clone())),
                pool: Some(pool),
            })
        }
        StoreBackend::Memory => {
            tracing::warn!("Using in-memory stores; records are lost on restart");
            Ok(memory_stores())
        }
    }
}

/// Fresh, empty in-memory stores.
pub fn memory_stores() -> StoreState {
    StoreState {
        bins: Arc::new(MemoryBinStore::new()),
        assets: Arc::new(MemoryAssetStore::new()),
        waste: Arc::new(MemoryWasteStore::new()),
        pool: None,
    }
}
