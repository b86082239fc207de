//! Configuration module
//!
//! Configuration is read from environment variables (after loading `.env` through
//! dotenvy) and validated once at startup.

use std::env;

use crate::download::{to_download_url, ATTACHMENT_FLAG, MEDIA_DELIVERY_PATH};
use crate::policy::RemoteDeletePolicy;
use crate::storage_types::{StorageBackend, StoreBackend};

// Common constants
const MAX_CONNECTIONS: u32 = 20;
const CONNECTION_TIMEOUT_SECS: u64 = 30;
const SERVER_PORT: u16 = 4000;
const MAX_VIDEO_SIZE_MB: usize = 500;
const MAX_WASTE_IMAGE_SIZE_MB: usize = 10;
const DOWNLOAD_PAGE_DELAY_MS: u64 = 3000;
const BYTES_PER_MB: usize = 1024 * 1024;

/// Multipart framing allowed on top of the largest accepted file.
pub const MULTIPART_OVERHEAD_BYTES: usize = 64 * 1024;

/// Base configuration shared by the server and its tooling
#[derive(Clone, Debug)]
pub struct BaseConfig {
    pub server_port: u16,
    pub cors_origins: Vec<String>,
    pub db_max_connections: u32,
    pub db_timeout_seconds: u64,
    pub environment: String,
}

#[derive(Clone, Debug)]
pub struct SmartbinConfig {
    pub base: BaseConfig,
    pub store_backend: StoreBackend,
    pub database_url: Option<String>,
    // Media host configuration
    pub storage_backend: StorageBackend,
    pub s3_bucket: Option<String>,
    pub s3_region: Option<String>,
    pub s3_endpoint: Option<String>, // Custom endpoint for S3-compatible providers (MinIO etc.)
    pub aws_region: Option<String>,
    pub local_storage_path: String,
    /// Public base of delivered media, `{origin}/media/upload`. Both backends build
    /// blob URLs as `{media_base_url}/{key}`.
    pub media_base_url: String,
    // Upload limits
    pub max_video_size_bytes: usize,
    pub video_allowed_extensions: Vec<String>,
    pub video_allowed_content_types: Vec<String>,
    pub max_waste_image_size_bytes: usize,
    pub image_allowed_extensions: Vec<String>,
    pub image_allowed_content_types: Vec<String>,
    // Delete cascade
    pub asset_remote_delete_policy: RemoteDeletePolicy,
    pub waste_remote_delete_policy: RemoteDeletePolicy,
    pub download_page_delay_ms: u64,
}

/// Application configuration.
#[derive(Clone, Debug)]
pub struct Config(pub Box<SmartbinConfig>);

impl Config {
    fn inner(&self) -> &SmartbinConfig {
        &self.0
    }

    /// Check if the application is running in production mode
    pub fn is_production(&self) -> bool {
        let env = self.inner().base.environment.to_lowercase();
        env == "production" || env == "prod"
    }

    pub fn from_env() -> Result<Self, anyhow::Error> {
        dotenvy::dotenv().ok();
        let config = SmartbinConfig::from_lookup(|key| env::var(key).ok())?;
        Ok(Config(Box::new(config)))
    }

    pub fn validate(&self) -> Result<(), anyhow::Error> {
        self.inner().validate()
    }

    pub fn server_port(&self) -> u16 {
        self.inner().base.server_port
    }

    pub fn cors_origins(&self) -> &[String] {
        &self.inner().base.cors_origins
    }

    pub fn environment(&self) -> &str {
        &self.inner().base.environment
    }

    pub fn db_max_connections(&self) -> u32 {
        self.inner().base.db_max_connections
    }

    pub fn db_timeout_seconds(&self) -> u64 {
        self.inner().base.db_timeout_seconds
    }

    pub fn store_backend(&self) -> StoreBackend {
        self.inner().store_backend
    }

    pub fn database_url(&self) -> Option<&str> {
        self.inner().database_url.as_deref()
    }

    pub fn storage_backend(&self) -> StorageBackend {
        self.inner().storage_backend
    }

    pub fn s3_bucket(&self) -> Option<&str> {
        self.inner().s3_bucket.as_deref()
    }

    pub fn s3_region(&self) -> Option<&str> {
        self.inner().s3_region.as_deref()
    }

    pub fn s3_endpoint(&self) -> Option<&str> {
        self.inner().s3_endpoint.as_deref()
    }

    pub fn aws_region(&self) -> Option<&str> {
        self.inner().aws_region.as_deref()
    }

    pub fn local_storage_path(&self) -> &str {
        &self.inner().local_storage_path
    }

    pub fn media_base_url(&self) -> &str {
        &self.inner().media_base_url
    }

    pub fn max_video_size_bytes(&self) -> usize {
        self.inner().max_video_size_bytes
    }

    pub fn video_allowed_extensions(&self) -> &[String] {
        &self.inner().video_allowed_extensions
    }

    pub fn video_allowed_content_types(&self) -> &[String] {
        &self.inner().video_allowed_content_types
    }

    pub fn max_waste_image_size_bytes(&self) -> usize {
        self.inner().max_waste_image_size_bytes
    }

    /// Request body limit for video upload routes.
    pub fn video_body_limit(&self) -> usize {
        self.max_video_size_bytes()
            .saturating_add(MULTIPART_OVERHEAD_BYTES)
    }

    /// Request body limit for waste routes.
    pub fn waste_body_limit(&self) -> usize {
        self.max_waste_image_size_bytes()
            .saturating_add(MULTIPART_OVERHEAD_BYTES)
    }

    pub fn image_allowed_extensions(&self) -> &[String] {
        &self.inner().image_allowed_extensions
    }

    pub fn image_allowed_content_types(&self) -> &[String] {
        &self.inner().image_allowed_content_types
    }

    pub fn asset_remote_delete_policy(&self) -> RemoteDeletePolicy {
        self.inner().asset_remote_delete_policy
    }

    pub fn waste_remote_delete_policy(&self) -> RemoteDeletePolicy {
        self.inner().waste_remote_delete_policy
    }

    pub fn download_page_delay_ms(&self) -> u64 {
        self.inner().download_page_delay_ms
    }
}

/// Read a size in MiB and convert it to bytes, rejecting values that overflow.
fn megabytes_to_bytes(
    key: &str,
    raw: Option<String>,
    default_mb: usize,
) -> Result<usize, anyhow::Error> {
    let mb = match raw {
        Some(s) => s
            .trim()
            .parse::<usize>()
            .map_err(|_| anyhow::anyhow!("{} must be a whole number of megabytes", key))?,
        None => default_mb,
    };
    mb.checked_mul(BYTES_PER_MB)
        .ok_or_else(|| anyhow::anyhow!("{} is too large", key))
}

fn split_list(raw: String) -> Vec<String> {
    raw.split(',')
        .map(|s| s.trim().to_lowercase())
        .filter(|s| !s.is_empty())
        .collect()
}

impl SmartbinConfig {
    /// Build a configuration from an arbitrary key lookup.
    ///
    /// `Config::from_env` passes `std::env::var`; tests pass a map.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, anyhow::Error>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let environment = var("ENVIRONMENT")
            .or_else(|| var("APP_ENV"))
            .unwrap_or_else(|| "development".to_string());

        let cors_origins_str = var("CORS_ORIGINS").unwrap_or_else(|| "*".to_string());
        let is_production =
            environment.to_lowercase() == "production" || environment.to_lowercase() == "prod";
        if is_production && cors_origins_str.trim() == "*" {
            return Err(anyhow::anyhow!(
                "CORS_ORIGINS cannot be '*' in production. Please specify explicit origins."
            ));
        }

        let cors_origins: Vec<String> = cors_origins_str
            .split(',')
            .map(|s| s.trim().to_string())
            .collect();

        let server_port = var("PORT")
            .unwrap_or_else(|| SERVER_PORT.to_string())
            .parse::<u16>()
            .map_err(|_| anyhow::anyhow!("PORT must be a valid number"))?;

        let base = BaseConfig {
            server_port,
            cors_origins,
            db_max_connections: var("DB_MAX_CONNECTIONS")
                .and_then(|s| s.parse().ok())
                .unwrap_or(MAX_CONNECTIONS),
            db_timeout_seconds: var("DB_TIMEOUT_SECONDS")
                .and_then(|s| s.parse().ok())
                .unwrap_or(CONNECTION_TIMEOUT_SECS),
            environment,
        };

        let store_backend = match var("STORE_BACKEND") {
            Some(s) => s.parse()?,
            None => StoreBackend::Postgres,
        };

        let storage_backend = match var("STORAGE_BACKEND") {
            Some(s) => s.parse()?,
            None => StorageBackend::Local,
        };

        let asset_remote_delete_policy = match var("ASSET_REMOTE_DELETE_POLICY") {
            Some(s) => s.parse()?,
            None => RemoteDeletePolicy::BestEffort,
        };

        let waste_remote_delete_policy = match var("WASTE_REMOTE_DELETE_POLICY") {
            Some(s) => s.parse()?,
            None => RemoteDeletePolicy::Required,
        };

        let config = SmartbinConfig {
            store_backend,
            database_url: var("DATABASE_URL"),
            storage_backend,
            s3_bucket: var("S3_BUCKET"),
            s3_region: var("S3_REGION"),
            s3_endpoint: var("S3_ENDPOINT"),
            aws_region: var("AWS_REGION"),
            local_storage_path: var("LOCAL_STORAGE_PATH")
                .unwrap_or_else(|| "./data/media".to_string()),
            media_base_url: var("MEDIA_BASE_URL")
                .or_else(|| var("LOCAL_STORAGE_BASE_URL"))
                .map(|url| url.trim_end_matches('/').to_string())
                .unwrap_or_else(|| {
                    format!("http://localhost:{}{}", base.server_port, MEDIA_DELIVERY_PATH)
                }),
            max_video_size_bytes: megabytes_to_bytes(
                "MAX_VIDEO_SIZE_MB",
                var("MAX_VIDEO_SIZE_MB"),
                MAX_VIDEO_SIZE_MB,
            )?,
            video_allowed_extensions: split_list(
                var("VIDEO_ALLOWED_EXTENSIONS")
                    .unwrap_or_else(|| "mp4,mov,avi,webm,mkv".to_string()),
            ),
            video_allowed_content_types: split_list(
                var("VIDEO_ALLOWED_CONTENT_TYPES").unwrap_or_else(|| {
                    "video/mp4,video/quicktime,video/x-msvideo,video/webm,video/x-matroska"
                        .to_string()
                }),
            ),
            max_waste_image_size_bytes: megabytes_to_bytes(
                "MAX_WASTE_IMAGE_SIZE_MB",
                var("MAX_WASTE_IMAGE_SIZE_MB"),
                MAX_WASTE_IMAGE_SIZE_MB,
            )?,
            image_allowed_extensions: split_list(
                var("IMAGE_ALLOWED_EXTENSIONS")
                    .unwrap_or_else(|| "jpg,jpeg,png,gif,webp".to_string()),
            ),
            image_allowed_content_types: split_list(
                var("IMAGE_ALLOWED_CONTENT_TYPES")
                    .unwrap_or_else(|| "image/jpeg,image/png,image/gif,image/webp".to_string()),
            ),
            asset_remote_delete_policy,
            waste_remote_delete_policy,
            download_page_delay_ms: var("DOWNLOAD_PAGE_DELAY_MS")
                .and_then(|s| s.parse().ok())
                .unwrap_or(DOWNLOAD_PAGE_DELAY_MS),
            base,
        };

        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), anyhow::Error> {
        if self.store_backend == StoreBackend::Postgres {
            let url = self.database_url.as_deref().ok_or_else(|| {
                anyhow::anyhow!("DATABASE_URL must be set when STORE_BACKEND=postgres")
            })?;
            if !url.starts_with("postgres://") && !url.starts_with("postgresql://") {
                return Err(anyhow::anyhow!(
                    "DATABASE_URL must be a valid PostgreSQL connection string"
                ));
            }
        }

        match self.storage_backend {
            StorageBackend::S3 => {
                if self.s3_bucket.is_none() {
                    return Err(anyhow::anyhow!(
                        "S3_BUCKET must be set when using S3 storage backend"
                    ));
                }
                if self.s3_region.is_none() && self.aws_region.is_none() {
                    return Err(anyhow::anyhow!(
                        "S3_REGION or AWS_REGION must be set when using S3 storage backend"
                    ));
                }
            }
            StorageBackend::Local => {}
        }

        self.validate_media_base_url()?;

        if self.max_waste_image_size_bytes == 0 || self.max_video_size_bytes == 0 {
            return Err(anyhow::anyhow!("Upload size limits must be greater than zero"));
        }

        let largest = self.max_video_size_bytes.max(self.max_waste_image_size_bytes);
        if largest.checked_add(MULTIPART_OVERHEAD_BYTES).is_none() {
            return Err(anyhow::anyhow!("Upload size limits are too large"));
        }

        if self.video_allowed_content_types.is_empty()
            || self.image_allowed_content_types.is_empty()
        {
            return Err(anyhow::anyhow!(
                "Allowed content type lists must not be empty"
            ));
        }

        Ok(())
    }

    /// Blob URLs must be served by the API's delivery route and accept the
    /// attachment flag.
    fn validate_media_base_url(&self) -> Result<(), anyhow::Error> {
        let url = &self.media_base_url;
        if !url.starts_with("http://") && !url.starts_with("https://") {
            return Err(anyhow::anyhow!("MEDIA_BASE_URL must be an http(s) URL"));
        }
        if !url.ends_with(MEDIA_DELIVERY_PATH) {
            return Err(anyhow::anyhow!(
                "MEDIA_BASE_URL must end with {}",
                MEDIA_DELIVERY_PATH
            ));
        }
        let sample = format!("{}/videos/sample.mp4", url);
        if !to_download_url(&sample).contains(ATTACHMENT_FLAG) {
            return Err(anyhow::anyhow!(
                "MEDIA_BASE_URL must produce URLs that accept the attachment flag"
            ));
        }
        Ok(())
    }
}
