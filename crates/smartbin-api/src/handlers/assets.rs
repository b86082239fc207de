use crate::error::{ErrorResponse, HttpAppError};
use crate::services::AssetService;
use crate::state::AppState;
use crate::utils::upload::extract_multipart_form;
use axum::{
    extract::{Multipart, Path, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use serde::Serialize;
use smartbin_core::models::AssetResponse;
use smartbin_core::AppError;
use std::sync::Arc;
use uuid::Uuid;
use utoipa::ToSchema;

/// Multipart field carrying the video
pub const VIDEO_FIELD: &str = "video";
/// Multipart field carrying the owning bin id
pub const BIN_ID_FIELD: &str = "binId";

#[derive(Debug, Serialize, ToSchema)]
pub struct UploadAssetResponse {
    pub success: bool,
    pub asset: AssetResponse,
    /// True when this bin already held the same video
    pub duplicate: bool,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AssetListResponse {
    pub success: bool,
    pub bin_id: Uuid,
    pub count: usize,
    pub assets: Vec<AssetResponse>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct DeleteResponse {
    pub success: bool,
    pub message: String,
}

#[utoipa::path(
    post,
    path = "/assets/upload",
    tag = "assets",
    request_body(content = String, description = "Multipart form with `video` file and `binId`", content_type = "multipart/form-data"),
    responses(
        (status = 201, description = "Video uploaded and registered", body = UploadAssetResponse),
        (status = 200, description = "Video already registered for this bin", body = UploadAssetResponse),
        (status = 400, description = "Missing field or invalid file", body = ErrorResponse),
        (status = 404, description = "Bin not found", body = ErrorResponse),
        (status = 413, description = "File too large", body = ErrorResponse),
        (status = 500, description = "Upload failed", body = ErrorResponse)
    )
)]
#[tracing::instrument(skip(state, multipart), fields(operation = "upload_asset"))]
pub async fn upload_asset(
    State(state): State<Arc<AppState>>,
    multipart: Multipart,
) -> Result<impl IntoResponse, HttpAppError> {
    let form = extract_multipart_form(multipart, VIDEO_FIELD).await?;
    let bin_id: Uuid = form
        .required_text(BIN_ID_FIELD)?
        .parse()
        .map_err(|_| AppError::InvalidInput("binId must be a UUID".to_string()))?;
    let file = form.required_file(VIDEO_FIELD)?;

    let registered = AssetService::new(&state).upload_asset(bin_id, file).await?;

    let status = if registered.duplicate {
        StatusCode::OK
    } else {
        StatusCode::CREATED
    };

    Ok((
        status,
        Json(UploadAssetResponse {
            success: true,
            asset: registered.asset.into(),
            duplicate: registered.duplicate,
        }),
    ))
}

#[utoipa::path(
    get,
    path = "/assets/by-bin/{bin_id}",
    tag = "assets",
    params(
        ("bin_id" = Uuid, Path, description = "Bin ID")
    ),
    responses(
        (status = 200, description = "Assets of the bin, oldest first", body = AssetListResponse),
        (status = 404, description = "Bin not found", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
pub async fn list_assets(
    State(state): State<Arc<AppState>>,
    Path(bin_id): Path<Uuid>,
) -> Result<impl IntoResponse, HttpAppError> {
    let assets: Vec<AssetResponse> = AssetService::new(&state)
        .list_assets(bin_id)
        .await?
        .into_iter()
        .map(AssetResponse::from)
        .collect();

    Ok(Json(AssetListResponse {
        success: true,
        bin_id,
        count: assets.len(),
        assets,
    }))
}

#[utoipa::path(
    delete,
    path = "/assets/{id}",
    tag = "assets",
    params(
        ("id" = Uuid, Path, description = "Asset ID")
    ),
    responses(
        (status = 200, description = "Asset deleted", body = DeleteResponse),
        (status = 404, description = "Asset not found", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
#[tracing::instrument(skip(state), fields(asset_id = %id, operation = "delete_asset"))]
pub async fn delete_asset(
    State(state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, HttpAppError> {
    AssetService::new(&state).delete_asset(id).await?;
    Ok(Json(DeleteResponse {
        success: true,
        message: "Video deleted".to_string(),
    }))
}
