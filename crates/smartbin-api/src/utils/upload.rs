//! Common utilities for file upload handlers

use axum::extract::multipart::MultipartError;
use axum::extract::Multipart;
use axum::http::StatusCode;
use smartbin_core::AppError;
use std::collections::HashMap;

use crate::state::MediaLimits;

/// A file part pulled out of a multipart form.
#[derive(Debug, Clone)]
pub struct UploadedFile {
    pub data: Vec<u8>,
    pub filename: String,
    pub content_type: String,
}

/// One file field plus every text field of a multipart form.
#[derive(Debug, Default)]
pub struct UploadForm {
    pub file: Option<UploadedFile>,
    pub fields: HashMap<String, String>,
}

impl UploadForm {
    /// A required, non-blank text field.
    pub fn required_text(&self, name: &str) -> Result<String, AppError> {
        self.fields
            .get(name)
            .map(|v| v.trim())
            .filter(|v| !v.is_empty())
            .map(String::from)
            .ok_or_else(|| AppError::InvalidInput(format!("Missing required field '{}'", name)))
    }

    /// The file field, or a validation error naming it.
    pub fn required_file(self, name: &str) -> Result<UploadedFile, AppError> {
        self.file
            .ok_or_else(|| AppError::InvalidInput(format!("No file provided in field '{}'", name)))
    }
}

/// Read a multipart form, keeping the field named `file_field` as bytes and
/// every other field as text. A second `file_field` part is rejected.
pub async fn extract_multipart_form(
    mut multipart: Multipart,
    file_field: &str,
) -> Result<UploadForm, AppError> {
    let mut form = UploadForm::default();

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| multipart_error("Failed to read multipart", e))?
    {
        let field_name = field.name().map(|s| s.to_string()).unwrap_or_default();

        if field_name == file_field {
            if form.file.is_some() {
                return Err(AppError::InvalidInput(format!(
                    "Multiple file fields are not allowed; send exactly one field named '{}'",
                    file_field
                )));
            }
            let filename = field
                .file_name()
                .map(|s| s.to_string())
                .unwrap_or_else(|| "unknown".to_string());
            let content_type = field
                .content_type()
                .map(|s| s.to_string())
                .unwrap_or_else(|| "application/octet-stream".to_string());

            let data = field
                .bytes()
                .await
                .map_err(|e| multipart_error("Failed to read file data", e))?;

            form.file = Some(UploadedFile {
                data: data.to_vec(),
                filename,
                content_type,
            });
        } else if !field_name.is_empty() {
            let value = field.text().await.map_err(|e| {
                multipart_error(&format!("Failed to read field '{}'", field_name), e)
            })?;
            form.fields.insert(field_name, value);
        }
    }

    Ok(form)
}

/// A body cut off by the route's size limit is a 413, anything else is malformed input.
fn multipart_error(context: &str, error: MultipartError) -> AppError {
    if error.status() == StatusCode::PAYLOAD_TOO_LARGE {
        AppError::PayloadTooLarge("Request body too large".to_string())
    } else {
        AppError::InvalidInput(format!("{}: {}", context, error))
    }
}

/// Validate file size
pub fn validate_file_size(file_size: usize, max_size: usize) -> Result<(), AppError> {
    if file_size == 0 {
        return Err(AppError::InvalidInput("File is empty".to_string()));
    }
    if file_size > max_size {
        return Err(AppError::PayloadTooLarge(format!(
            "File too large (max {}MB)",
            max_size / 1024 / 1024
        )));
    }
    Ok(())
}

/// Normalize MIME type by stripping parameters (e.g. "image/jpeg; charset=utf-8" -> "image/jpeg").
fn normalize_mime_type(content_type: &str) -> &str {
    content_type
        .split(';')
        .next()
        .map(|s| s.trim())
        .unwrap_or(content_type)
}

/// Validate content type against allowlist. Compares normalized MIME type only.
pub fn validate_content_type(content_type: &str, allowed_types: &[String]) -> Result<(), AppError> {
    let normalized = normalize_mime_type(content_type).to_lowercase();
    if !allowed_types.iter().any(|ct| normalized == ct.to_lowercase()) {
        return Err(AppError::InvalidInput(format!(
            "Invalid content type. Allowed types: {}",
            allowed_types.join(", ")
        )));
    }
    Ok(())
}

/// Validate file extension
pub fn validate_file_extension(
    filename: &str,
    allowed_extensions: &[String],
) -> Result<String, AppError> {
    let extension = match filename.rsplit_once('.') {
        Some((_, ext)) => ext.to_lowercase(),
        None => String::new(),
    };

    if !allowed_extensions.contains(&extension) {
        return Err(AppError::InvalidInput(format!(
            "Invalid file extension. Allowed extensions: {}",
            allowed_extensions.join(", ")
        )));
    }

    Ok(extension)
}

/// Sanitize filename to prevent path traversal and invalid characters.
pub fn sanitize_filename(filename: &str) -> Result<String, AppError> {
    const MAX_FILENAME_LENGTH: usize = 255;

    let path = std::path::Path::new(filename);
    let filename_only = path
        .file_name()
        .and_then(|n| n.to_str())
        .unwrap_or(filename);

    if filename_only.contains("..") {
        return Err(AppError::InvalidInput(
            "Filename contains invalid path traversal".to_string(),
        ));
    }

    let sanitized: String = filename_only
        .chars()
        .take(MAX_FILENAME_LENGTH)
        .map(|c| {
            if c.is_alphanumeric() || c == '.' || c == '-' || c == '_' {
                c
            } else {
                '_'
            }
        })
        .collect();

    if sanitized.trim().is_empty() || sanitized.len() < 3 {
        return Ok("file".to_string());
    }

    Ok(sanitized)
}

/// Run every check for a video upload. Returns the sanitized filename.
pub fn validate_video(file: &UploadedFile, limits: &MediaLimits) -> Result<String, AppError> {
    validate_file_size(file.data.len(), limits.max_file_size)?;
    let filename = sanitize_filename(&file.filename)?;
    validate_file_extension(&filename, &limits.allowed_extensions)?;
    validate_content_type(&file.content_type, &limits.allowed_content_types)?;
    Ok(filename)
}

/// Run every check for a waste image. Camera uploads often arrive without a
/// usable filename, so only size and content type are enforced.
pub fn validate_waste_image(file: &UploadedFile, limits: &MediaLimits) -> Result<String, AppError> {
    validate_file_size(file.data.len(), limits.max_file_size)?;
    validate_content_type(&file.content_type, &limits.allowed_content_types)?;
    sanitize_filename(&file.filename)
}
