//! HTTP client for the smartbin API.
//!
//! Set SMARTBIN_API_URL (or API_URL) to point at the server.

use anyhow::{Context, Result};
use reqwest::multipart::{Form, Part};
use reqwest::{Client, RequestBuilder, Response};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use smartbin_core::models::{AssetResponse, Bin, WasteEntry};
use std::path::Path;
use std::time::Duration;
use uuid::Uuid;

use crate::content_type_for_path;

const DEFAULT_API_URL: &str = "http://localhost:4000";

#[derive(Debug, Serialize, Deserialize)]
pub struct BinResponse {
    pub success: bool,
    pub bin: Bin,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct BinListResponse {
    pub success: bool,
    pub bins: Vec<Bin>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct UploadAssetResponse {
    pub success: bool,
    pub asset: AssetResponse,
    pub duplicate: bool,
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AssetListResponse {
    pub success: bool,
    pub bin_id: Uuid,
    pub count: usize,
    pub assets: Vec<AssetResponse>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct WasteResponse {
    pub success: bool,
    pub waste: WasteEntry,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct WasteListResponse {
    pub success: bool,
    pub waste: Vec<WasteEntry>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct DeleteResponse {
    pub success: bool,
    pub message: String,
}

/// HTTP client for the smartbin API.
#[derive(Clone, Debug)]
pub struct ApiClient {
    client: Client,
    base_url: String,
}

impl ApiClient {
    pub fn new(base_url: String) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(300))
            .build()
            .context("Failed to create HTTP client")?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    /// Create client from environment: SMARTBIN_API_URL (or API_URL).
    pub fn from_env() -> Result<Self> {
        let base_url = std::env::var("SMARTBIN_API_URL")
            .or_else(|_| std::env::var("API_URL"))
            .unwrap_or_else(|_| DEFAULT_API_URL.to_string());
        Self::new(base_url)
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn build_url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    async fn send(request: RequestBuilder) -> Result<Response> {
        let response = request.send().await.context("Failed to send request")?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            return Err(anyhow::anyhow!(
                "API request failed with status {}: {}",
                status,
                error_text
            ));
        }

        Ok(response)
    }

    async fn send_json<T: DeserializeOwned>(request: RequestBuilder) -> Result<T> {
        Self::send(request)
            .await?
            .json()
            .await
            .context("Failed to parse response as JSON")
    }

    async fn file_part(path: &Path) -> Result<Part> {
        let data = tokio::fs::read(path)
            .await
            .with_context(|| format!("Failed to read {}", path.display()))?;
        let file_name = path
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_else(|| "upload".to_string());

        Part::bytes(data)
            .file_name(file_name)
            .mime_str(content_type_for_path(path))
            .context("Invalid content type")
    }

    pub async fn create_bin(&self, name: &str) -> Result<BinResponse> {
        let request = self
            .client
            .post(self.build_url("/bins"))
            .json(&serde_json::json!({ "name": name }));
        Self::send_json(request).await
    }

    pub async fn list_bins(&self) -> Result<BinListResponse> {
        Self::send_json(self.client.get(self.build_url("/bins"))).await
    }

    pub async fn upload_video(&self, bin_id: Uuid, path: &Path) -> Result<UploadAssetResponse> {
        let form = Form::new()
            .text("binId", bin_id.to_string())
            .part("video", Self::file_part(path).await?);
        let request = self
            .client
            .post(self.build_url("/assets/upload"))
            .multipart(form);
        Self::send_json(request).await
    }

    pub async fn list_assets(&self, bin_id: Uuid) -> Result<AssetListResponse> {
        let url = self.build_url(&format!("/assets/by-bin/{}", bin_id));
        Self::send_json(self.client.get(url)).await
    }

    pub async fn delete_asset(&self, asset_id: Uuid) -> Result<DeleteResponse> {
        let url = self.build_url(&format!("/assets/{}", asset_id));
        Self::send_json(self.client.delete(url)).await
    }

    pub async fn list_waste(&self) -> Result<WasteListResponse> {
        Self::send_json(self.client.get(self.build_url("/waste"))).await
    }

    pub async fn upload_waste(
        &self,
        path: &Path,
        waste_type: &str,
        bin_location: &str,
    ) -> Result<WasteResponse> {
        let form = Form::new()
            .text("type", waste_type.to_string())
            .text("binlocation", bin_location.to_string())
            .part("image", Self::file_part(path).await?);
        let request = self.client.post(self.build_url("/waste")).multipart(form);
        Self::send_json(request).await
    }

    pub async fn categorize_waste(&self, id: Uuid, category: &str) -> Result<WasteResponse> {
        let request = self
            .client
            .patch(self.build_url(&format!("/waste/{}", id)))
            .json(&serde_json::json!({ "category": category }));
        Self::send_json(request).await
    }

    pub async fn delete_waste(
        &self,
        id: Uuid,
        storage_id: Option<&str>,
    ) -> Result<DeleteResponse> {
        let mut request = self.client.delete(self.build_url(&format!("/waste/{}", id)));
        if let Some(storage_id) = storage_id {
            request = request.json(&serde_json::json!({ "storageId": storage_id }));
        }
        Self::send_json(request).await
    }

    /// Fetch an absolute URL (e.g. a media host download URL) as raw bytes.
    pub async fn fetch_bytes(&self, url: &str) -> Result<Vec<u8>> {
        let response = Self::send(self.client.get(url)).await?;
        let bytes = response
            .bytes()
            .await
            .context("Failed to read response body")?;
        Ok(bytes.to_vec())
    }
}
