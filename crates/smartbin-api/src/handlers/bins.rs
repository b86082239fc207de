use crate::error::{ErrorResponse, HttpAppError, ValidatedJson};
use crate::services::BinService;
use crate::state::AppState;
use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use serde::Serialize;
use smartbin_core::models::{Bin, CreateBinRequest};
use std::sync::Arc;
use utoipa::ToSchema;

#[derive(Debug, Serialize, ToSchema)]
pub struct BinResponse {
    pub success: bool,
    pub bin: Bin,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct BinListResponse {
    pub success: bool,
    pub bins: Vec<Bin>,
}

#[utoipa::path(
    post,
    path = "/bins",
    tag = "bins",
    request_body = CreateBinRequest,
    responses(
        (status = 201, description = "Bin created", body = BinResponse),
        (status = 400, description = "Missing, too long or duplicate name", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
#[tracing::instrument(skip(state, request), fields(operation = "create_bin"))]
pub async fn create_bin(
    State(state): State<Arc<AppState>>,
    ValidatedJson(request): ValidatedJson<CreateBinRequest>,
) -> Result<impl IntoResponse, HttpAppError> {
    let bin = BinService::new(&state).create_bin(&request.name).await?;
    Ok((
        StatusCode::CREATED,
        Json(BinResponse { success: true, bin }),
    ))
}

#[utoipa::path(
    get,
    path = "/bins",
    tag = "bins",
    responses(
        (status = 200, description = "All bins", body = BinListResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
pub async fn list_bins(
    State(state): State<Arc<AppState>>,
) -> Result<impl IntoResponse, HttpAppError> {
    let bins = BinService::new(&state).list_bins().await?;
    Ok(Json(BinListResponse {
        success: true,
        bins,
    }))
}
