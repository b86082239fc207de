//! Media host setup and initialization

use anyhow::Result;
use smartbin_core::Config;
use smartbin_storage::{create_storage, Storage};
use std::sync::Arc;

pub async fn setup_storage(config: &Config) -> Result<Arc<dyn Storage>> {
    tracing::info!("Initializing media host...");
    let storage = create_storage(config).await?;
    tracing::info!(
        backend = ?storage.backend_type(),
        "Media host initialized successfully"
    );
    Ok(storage)
}
