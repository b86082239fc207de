use crate::error::{ErrorResponse, HttpAppError, ValidatedJson};
use crate::handlers::assets::DeleteResponse;
use crate::services::waste::WasteUpload;
use crate::services::WasteService;
use crate::state::AppState;
use crate::utils::upload::extract_multipart_form;
use axum::{
    body::Bytes,
    extract::{Multipart, Path, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use serde::{Deserialize, Serialize};
use smartbin_core::models::WasteEntry;
use smartbin_core::AppError;
use std::sync::Arc;
use uuid::Uuid;
use utoipa::ToSchema;

pub const IMAGE_FIELD: &str = "image";
pub const TYPE_FIELD: &str = "type";
pub const LOCATION_FIELD: &str = "binlocation";

#[derive(Debug, Serialize, ToSchema)]
pub struct WasteResponse {
    pub success: bool,
    pub waste: WasteEntry,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct WasteListResponse {
    pub success: bool,
    pub waste: Vec<WasteEntry>,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct CategoryUpdateRequest {
    /// One of `biodegradable`, `recyclable`, `miscellaneous`
    pub category: Option<String>,
}

#[derive(Debug, Default, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct DeleteWasteRequest {
    /// When present, must match the stored image id
    pub storage_id: Option<String>,
}

#[utoipa::path(
    post,
    path = "/waste",
    tag = "waste",
    request_body(content = String, description = "Multipart form with `image`, `type` and `binlocation`", content_type = "multipart/form-data"),
    responses(
        (status = 201, description = "Waste entry recorded", body = WasteResponse),
        (status = 400, description = "Missing field or invalid image", body = ErrorResponse),
        (status = 413, description = "Image too large", body = ErrorResponse),
        (status = 500, description = "Upload failed", body = ErrorResponse)
    )
)]
#[tracing::instrument(skip(state, multipart), fields(operation = "record_waste"))]
pub async fn record_waste(
    State(state): State<Arc<AppState>>,
    multipart: Multipart,
) -> Result<impl IntoResponse, HttpAppError> {
    let form = extract_multipart_form(multipart, IMAGE_FIELD).await?;
    let waste_type = form.required_text(TYPE_FIELD)?;
    let bin_location = form.required_text(LOCATION_FIELD)?;
    let image = form.required_file(IMAGE_FIELD)?;

    let waste = WasteService::new(&state)
        .record_waste(WasteUpload {
            waste_type,
            bin_location,
            image,
        })
        .await?;

    Ok((
        StatusCode::CREATED,
        Json(WasteResponse {
            success: true,
            waste,
        }),
    ))
}

#[utoipa::path(
    get,
    path = "/waste",
    tag = "waste",
    responses(
        (status = 200, description = "Waste entries, newest disposal first", body = WasteListResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
pub async fn list_waste(
    State(state): State<Arc<AppState>>,
) -> Result<impl IntoResponse, HttpAppError> {
    let waste = WasteService::new(&state).list_waste().await?;
    Ok(Json(WasteListResponse {
        success: true,
        waste,
    }))
}

#[utoipa::path(
    patch,
    path = "/waste/{id}",
    tag = "waste",
    params(
        ("id" = Uuid, Path, description = "Waste entry ID")
    ),
    request_body = CategoryUpdateRequest,
    responses(
        (status = 200, description = "Category updated", body = WasteResponse),
        (status = 400, description = "Invalid category", body = ErrorResponse),
        (status = 404, description = "Waste entry not found", body = ErrorResponse)
    )
)]
#[tracing::instrument(skip(state, request), fields(waste_id = %id, operation = "categorize_waste"))]
pub async fn categorize_waste(
    State(state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
    ValidatedJson(request): ValidatedJson<CategoryUpdateRequest>,
) -> Result<impl IntoResponse, HttpAppError> {
    let waste = WasteService::new(&state)
        .categorize(id, request.category.as_deref())
        .await?;
    Ok(Json(WasteResponse {
        success: true,
        waste,
    }))
}

#[utoipa::path(
    delete,
    path = "/waste/{id}",
    tag = "waste",
    params(
        ("id" = Uuid, Path, description = "Waste entry ID")
    ),
    request_body(content = DeleteWasteRequest, description = "Optional body; `storageId` must match the entry"),
    responses(
        (status = 200, description = "Waste entry deleted", body = DeleteResponse),
        (status = 400, description = "storageId mismatch", body = ErrorResponse),
        (status = 404, description = "Waste entry not found", body = ErrorResponse),
        (status = 500, description = "Media host delete failed; entry kept", body = ErrorResponse)
    )
)]
#[tracing::instrument(skip(state, body), fields(waste_id = %id, operation = "delete_waste"))]
pub async fn delete_waste(
    State(state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
    body: Bytes,
) -> Result<impl IntoResponse, HttpAppError> {
    let request = parse_delete_body(&body)?;

    WasteService::new(&state)
        .delete_waste(id, request.storage_id.as_deref())
        .await?;

    Ok(Json(DeleteResponse {
        success: true,
        message: "Waste entry deleted".to_string(),
    }))
}

/// An empty body means no guard.
fn parse_delete_body(body: &[u8]) -> Result<DeleteWasteRequest, AppError> {
    if body.iter().all(u8::is_ascii_whitespace) {
        return Ok(DeleteWasteRequest::default());
    }
    serde_json::from_slice(body)
        .map_err(|e| AppError::InvalidInput(format!("Invalid request body: {}", e)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_delete_body_has_no_guard() {
        assert!(parse_delete_body(b"").unwrap().storage_id.is_none());
        assert!(parse_delete_body(b"  \n").unwrap().storage_id.is_none());
    }

    #[test]
    fn delete_body_reads_camel_case_storage_id() {
        let request = parse_delete_body(br#"{"storageId":"waste/abc.jpg"}"#).unwrap();
        assert_eq!(request.storage_id.as_deref(), Some("waste/abc.jpg"));
    }

    #[test]
    fn malformed_delete_body_is_rejected() {
        assert!(matches!(
            parse_delete_body(b"{not json"),
            Err(AppError::InvalidInput(_))
        ));
    }
}
