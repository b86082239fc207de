use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use crate::error::AppError;

/// Maximum length of a bin name, in characters.
pub const BIN_NAME_MAX_LEN: usize = 60;

/// A registered smart bin. Created once and never mutated.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, ToSchema)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[serde(rename_all = "camelCase")]
pub struct Bin {
    pub id: Uuid,
    pub name: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct CreateBinRequest {
    #[validate(length(min = 1, max = 60, message = "Bin name must be 1-60 characters"))]
    pub name: String,
}

/// Trim a bin name and check it is non-empty and at most [`BIN_NAME_MAX_LEN`] characters.
pub fn normalize_bin_name(name: &str) -> Result<String, AppError> {
    let trimmed = name.trim();
    if trimmed.is_empty() {
        return Err(AppError::InvalidInput("Bin name is required".to_string()));
    }
    let request = CreateBinRequest {
        name: trimmed.to_string(),
    };
    request.validate()?;
    Ok(request.name)
}
