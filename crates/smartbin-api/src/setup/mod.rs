//! Application setup and initialization
//!
//! This module contains all application initialization logic extracted from main.rs
//! for better organization and testability.

pub mod database;
pub mod routes;
pub mod server;
pub mod storage;
pub mod stores;
pub mod validation;

use crate::state::AppState;
use anyhow::{Context, Result};
use smartbin_core::Config;
use std::sync::Arc;

/// Initialize the entire application
pub async fn initialize_app(config: Config) -> Result<(Arc<AppState>, axum::Router)> {
    validation::validate_config(&config).context("Configuration validation failed")?;

    crate::telemetry::init_telemetry()
        .map_err(|e| anyhow::anyhow!("Failed to initialize telemetry: {}", e))?;

    tracing::info!(
        environment = %config.environment(),
        store_backend = %config.store_backend(),
        storage_backend = %config.storage_backend(),
        "Configuration loaded and validated successfully"
    );

    let stores = stores::setup_stores(&config).await?;
    let storage = storage::setup_storage(&config).await?;

    let state = Arc::new(AppState::new(config.clone(), stores, storage));

    let router = routes::setup_routes(&config, state.clone())?;

    Ok((state, router))
}
