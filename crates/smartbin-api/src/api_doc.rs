//! OpenAPI documentation, served at `/api/openapi.json`.

use utoipa::OpenApi;

use crate::error;
use crate::handlers;
use smartbin_core::models;

pub fn get_openapi_spec() -> utoipa::openapi::OpenApi {
    ApiDoc::openapi()
}

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Smartbin API",
        version = "0.1.0",
        description = "Smart waste bin backend: bins, bin camera videos with download links, and classified waste records."
    ),
    paths(
        handlers::bins::create_bin,
        handlers::bins::list_bins,
        handlers::assets::upload_asset,
        handlers::assets::list_assets,
        handlers::assets::delete_asset,
        handlers::download_page::download_page,
        handlers::waste::record_waste,
        handlers::waste::list_waste,
        handlers::waste::categorize_waste,
        handlers::waste::delete_waste,
        handlers::media::serve_media,
    ),
    components(schemas(
        error::ErrorResponse,
        models::Bin,
        models::CreateBinRequest,
        models::AssetResponse,
        models::WasteEntry,
        models::WasteCategory,
        handlers::bins::BinResponse,
        handlers::bins::BinListResponse,
        handlers::assets::UploadAssetResponse,
        handlers::assets::AssetListResponse,
        handlers::assets::DeleteResponse,
        handlers::waste::WasteResponse,
        handlers::waste::WasteListResponse,
        handlers::waste::CategoryUpdateRequest,
        handlers::waste::DeleteWasteRequest,
    )),
    tags(
        (name = "bins", description = "Smart bin registry"),
        (name = "assets", description = "Bin camera videos"),
        (name = "waste", description = "Disposed waste records"),
        (name = "media", description = "Media host blob delivery")
    )
)]
pub struct ApiDoc;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn spec_lists_every_route() {
        let spec = get_openapi_spec();
        for path in [
            "/bins",
            "/assets/upload",
            "/assets/by-bin/{bin_id}",
            "/assets/by-bin/{bin_id}/download-page",
            "/assets/{id}",
            "/waste",
            "/waste/{id}",
        ] {
            assert!(spec.paths.paths.contains_key(path), "missing {}", path);
        }
    }
}
