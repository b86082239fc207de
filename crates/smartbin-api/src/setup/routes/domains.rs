//! Domain route groups.

use crate::handlers::{assets, bins, download_page, media, waste};
use crate::state::AppState;
use axum::{
    routing::{delete, get, patch, post},
    Router,
};
use smartbin_core::download::MEDIA_DELIVERY_PATH;
use std::sync::Arc;

pub fn bin_routes() -> Router<Arc<AppState>> {
    Router::new().route("/bins", post(bins::create_bin).get(bins::list_bins))
}

pub fn asset_routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/assets/upload", post(assets::upload_asset))
        .route("/assets/by-bin/{bin_id}", get(assets::list_assets))
        .route(
            "/assets/by-bin/{bin_id}/download-page",
            get(download_page::download_page),
        )
        .route("/assets/{id}", delete(assets::delete_asset))
}

pub fn waste_routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/waste", post(waste::record_waste).get(waste::list_waste))
        .route(
            "/waste/{id}",
            patch(waste::categorize_waste).delete(waste::delete_waste),
        )
}

/// Blob delivery for every media host backend.
pub fn media_routes() -> Router<Arc<AppState>> {
    Router::new().route(
        &format!("{}/{{*key}}", MEDIA_DELIVERY_PATH),
        get(media::serve_media),
    )
}
