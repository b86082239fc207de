use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter, Result as FmtResult};
use std::str::FromStr;
use utoipa::ToSchema;
use uuid::Uuid;

use crate::error::AppError;

/// Classification a human assigns to a waste entry.
///
/// Entries start uncategorized (`None`). Once set, a category can be replaced
/// by another one but never cleared.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, ToSchema)]
#[cfg_attr(feature = "sqlx", derive(sqlx::Type))]
#[cfg_attr(
    feature = "sqlx",
    sqlx(type_name = "waste_category", rename_all = "lowercase")
)]
#[serde(rename_all = "lowercase")]
pub enum WasteCategory {
    Biodegradable,
    Recyclable,
    Miscellaneous,
}

pub const WASTE_CATEGORIES: [WasteCategory; 3] = [
    WasteCategory::Biodegradable,
    WasteCategory::Recyclable,
    WasteCategory::Miscellaneous,
];

impl WasteCategory {
    pub fn as_str(&self) -> &'static str {
        match self {
            WasteCategory::Biodegradable => "biodegradable",
            WasteCategory::Recyclable => "recyclable",
            WasteCategory::Miscellaneous => "miscellaneous",
        }
    }
}

impl Display for WasteCategory {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.write_str(self.as_str())
    }
}

/// Only the exact lowercase names are accepted.
impl FromStr for WasteCategory {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        WASTE_CATEGORIES
            .iter()
            .copied()
            .find(|c| c.as_str() == s)
            .ok_or_else(|| AppError::InvalidInput("Invalid category".to_string()))
    }
}

/// An uploaded waste image with its reported type and bin location.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, ToSchema)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[serde(rename_all = "camelCase")]
pub struct WasteEntry {
    pub id: Uuid,
    #[serde(rename = "type")]
    pub waste_type: String,
    pub edited_type: String,
    pub bin_location: String,
    pub image_url: String,
    pub storage_id: String,
    pub category: Option<WasteCategory>,
    pub disposed_at: DateTime<Utc>,
}

/// Fields for a new waste entry; `edited_type` is derived.
#[derive(Debug, Clone)]
pub struct NewWasteEntry {
    pub waste_type: String,
    pub bin_location: String,
    pub image_url: String,
    pub storage_id: String,
}

impl NewWasteEntry {
    pub fn edited_type(&self) -> String {
        self.waste_type.to_lowercase()
    }

    pub fn into_entry(self, id: Uuid, disposed_at: DateTime<Utc>) -> WasteEntry {
        WasteEntry {
            id,
            edited_type: self.edited_type(),
            waste_type: self.waste_type,
            bin_location: self.bin_location,
            image_url: self.image_url,
            storage_id: self.storage_id,
            category: None,
            disposed_at,
        }
    }
}
