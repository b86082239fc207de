use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::download::to_download_url;

/// A video stored on the media host and attached to a bin.
///
/// `(bin_id, storage_id)` is unique.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct Asset {
    pub id: Uuid,
    pub bin_id: Uuid,
    pub url: String,
    pub storage_id: String,
    pub created_at: DateTime<Utc>,
}

/// Result of registering an asset reference.
#[derive(Debug, Clone)]
pub struct RegisteredAsset {
    pub asset: Asset,
    /// True when the (bin, storage id) pair already existed.
    pub duplicate: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AssetResponse {
    pub id: Uuid,
    pub bin_id: Uuid,
    pub url: String,
    pub download_url: String,
    pub storage_id: String,
    pub created_at: DateTime<Utc>,
}

impl From<Asset> for AssetResponse {
    fn from(asset: Asset) -> Self {
        AssetResponse {
            download_url: to_download_url(&asset.url),
            id: asset.id,
            bin_id: asset.bin_id,
            url: asset.url,
            storage_id: asset.storage_id,
            created_at: asset.created_at,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn response_carries_download_url() {
        let asset = Asset {
            id: Uuid::new_v4(),
            bin_id: Uuid::new_v4(),
            url: "https://res.example.com/demo/video/upload/v17/videos/ab12.mp4".to_string(),
            storage_id: "videos/ab12.mp4".to_string(),
            created_at: Utc::now(),
        };
        let response = AssetResponse::from(asset.clone());
        assert_eq!(response.url, asset.url);
        assert_eq!(
            response.download_url,
            "https://res.example.com/demo/video/upload/fl_attachment/v17/videos/ab12.mp4"
        );

        let json = serde_json::to_value(&response).unwrap();
        assert!(json.get("downloadUrl").is_some());
        assert!(json.get("binId").is_some());
        assert!(json.get("storageId").is_some());
    }
}
