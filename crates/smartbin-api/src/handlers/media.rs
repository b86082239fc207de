//! Serves media host blobs, from either backend, under the `/upload/` delivery path.

use crate::error::{ErrorResponse, HttpAppError};
use crate::state::AppState;
use axum::{
    body::Body,
    extract::{Path, State},
    http::{header, Response, StatusCode},
    response::IntoResponse,
};
use smartbin_core::download::ATTACHMENT_FLAG;
use smartbin_core::AppError;
use std::sync::Arc;

/// Content type for a stored key, from its extension.
fn content_type_for(key: &str) -> &'static str {
    let ext = key.rsplit_once('.').map(|(_, e)| e.to_lowercase());
    match ext.as_deref() {
        Some("mp4") => "video/mp4",
        Some("mov") => "video/quicktime",
        Some("avi") => "video/x-msvideo",
        Some("webm") => "video/webm",
        Some("mkv") => "video/x-matroska",
        Some("jpg") | Some("jpeg") => "image/jpeg",
        Some("png") => "image/png",
        Some("gif") => "image/gif",
        Some("webp") => "image/webp",
        _ => "application/octet-stream",
    }
}

#[utoipa::path(
    get,
    path = "/media/upload/{key}",
    tag = "media",
    params(
        ("key" = String, Path, description = "Storage id, optionally prefixed with fl_attachment/")
    ),
    responses(
        (status = 200, description = "Blob content"),
        (status = 404, description = "Blob not found", body = ErrorResponse)
    )
)]
pub async fn serve_media(
    State(state): State<Arc<AppState>>,
    Path(key): Path<String>,
) -> Result<impl IntoResponse, HttpAppError> {
    let (storage_id, attachment) = match key.strip_prefix(ATTACHMENT_FLAG) {
        Some(rest) => (rest, true),
        None => (key.as_str(), false),
    };

    let data = state.media.storage.download(storage_id).await?;

    let mut builder = Response::builder()
        .status(StatusCode::OK)
        .header(header::CONTENT_TYPE, content_type_for(storage_id))
        .header(header::CACHE_CONTROL, "public, max-age=31536000, immutable");

    if attachment {
        let filename = storage_id.rsplit('/').next().unwrap_or(storage_id);
        builder = builder.header(
            header::CONTENT_DISPOSITION,
            format!("attachment; filename=\"{}\"", filename),
        );
    }

    let response = builder
        .body(Body::from(data))
        .map_err(|e| AppError::Internal(format!("Failed to build response: {}", e)))?;

    Ok(response)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn content_type_follows_extension() {
        assert_eq!(content_type_for("videos/abc.mp4"), "video/mp4");
        assert_eq!(content_type_for("waste/abc.JPG"), "image/jpeg");
        assert_eq!(content_type_for("waste/abc.bin"), "application/octet-stream");
    }
}
