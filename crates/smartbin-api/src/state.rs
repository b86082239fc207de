//! Application state shared by every handler.
//!
//! Stores and the media host are built once at startup and handed to handlers
//! through axum `State<Arc<AppState>>`.

use smartbin_core::{Config, RemoteDeletePolicy};
use smartbin_db::{AssetStore, BinStore, WasteStore};
use smartbin_storage::Storage;
use sqlx::PgPool;
use std::sync::Arc;

/// Record stores. `pool` is only present for the Postgres backend.
#[derive(Clone)]
pub struct StoreState {
    pub bins: Arc<dyn BinStore>,
    pub assets: Arc<dyn AssetStore>,
    pub waste: Arc<dyn WasteStore>,
    pub pool: Option<PgPool>,
}

/// Upload limits for one kind of media.
#[derive(Clone, Debug)]
pub struct MediaLimits {
    pub max_file_size: usize,
    pub allowed_extensions: Vec<String>,
    pub allowed_content_types: Vec<String>,
}

impl MediaLimits {
    pub fn video(config: &Config) -> Self {
        Self {
            max_file_size: config.max_video_size_bytes(),
            allowed_extensions: config.video_allowed_extensions().to_vec(),
            allowed_content_types: config.video_allowed_content_types().to_vec(),
        }
    }

    pub fn waste_image(config: &Config) -> Self {
        Self {
            max_file_size: config.max_waste_image_size_bytes(),
            allowed_extensions: config.image_allowed_extensions().to_vec(),
            allowed_content_types: config.image_allowed_content_types().to_vec(),
        }
    }
}

/// Media host plus the per-entity upload limits and delete policies.
#[derive(Clone)]
pub struct MediaConfig {
    pub storage: Arc<dyn Storage>,
    pub video: MediaLimits,
    pub waste_image: MediaLimits,
    pub asset_delete_policy: RemoteDeletePolicy,
    pub waste_delete_policy: RemoteDeletePolicy,
}

impl MediaConfig {
    pub fn from_config(config: &Config, storage: Arc<dyn Storage>) -> Self {
        Self {
            storage,
            video: MediaLimits::video(config),
            waste_image: MediaLimits::waste_image(config),
            asset_delete_policy: config.asset_remote_delete_policy(),
            waste_delete_policy: config.waste_remote_delete_policy(),
        }
    }
}

#[derive(Clone)]
pub struct AppState {
    pub config: Config,
    pub stores: StoreState,
    pub media: MediaConfig,
}

impl AppState {
    pub fn new(config: Config, stores: StoreState, storage: Arc<dyn Storage>) -> Self {
        let media = MediaConfig::from_config(&config, storage);
        Self {
            config,
            stores,
            media,
        }
    }
}
