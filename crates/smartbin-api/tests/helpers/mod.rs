//! Test helpers: build AppState and router for integration tests.
//!
//! Every test app runs on in-memory stores and a `LocalStorage` rooted in its
//! own temp dir, so tests need neither Postgres nor network access.

#![allow(dead_code)]

pub mod fixtures;
pub mod storage;

use axum::body::Bytes;
use axum_test::multipart::{MultipartForm, Part};
use axum_test::{TestResponse, TestServer};
use smartbin_api::setup::routes;
use smartbin_api::{AppState, StoreState};
use smartbin_core::{Config, SmartbinConfig};
use smartbin_db::{MemoryAssetStore, MemoryBinStore, MemoryWasteStore};
use smartbin_storage::{LocalStorage, Storage};
use std::collections::HashMap;
use std::sync::Arc;
use tempfile::TempDir;
use uuid::Uuid;

use storage::{FailingStorage, StorageFault};

pub const TEST_MEDIA_BASE_URL: &str = "http://localhost:4000/media/upload";

/// Test application: server plus handles on the in-memory stores.
pub struct TestApp {
    pub server: TestServer,
    pub state: Arc<AppState>,
    pub assets: MemoryAssetStore,
    pub waste: MemoryWasteStore,
    pub _temp_dir: TempDir,
}

impl TestApp {
    pub fn client(&self) -> &TestServer {
        &self.server
    }
}

/// Build a `Config` from defaults plus `overrides`.
pub fn test_config(storage_path: &str, overrides: &[(&str, &str)]) -> Config {
    let mut vars: HashMap<String, String> = HashMap::from([
        ("STORE_BACKEND".to_string(), "memory".to_string()),
        ("STORAGE_BACKEND".to_string(), "local".to_string()),
        ("LOCAL_STORAGE_PATH".to_string(), storage_path.to_string()),
        (
            "MEDIA_BASE_URL".to_string(),
            TEST_MEDIA_BASE_URL.to_string(),
        ),
    ]);
    for (key, value) in overrides {
        vars.insert(key.to_string(), value.to_string());
    }
    let config = SmartbinConfig::from_lookup(|k| vars.get(k).cloned())
        .expect("Failed to build test config");
    Config(Box::new(config))
}

/// Setup test app with in-memory stores and a healthy local media host.
pub async fn setup_test_app() -> TestApp {
    setup_test_app_with(&[], StorageFault::None).await
}

/// Setup test app with config overrides and an optionally failing media host.
pub async fn setup_test_app_with(overrides: &[(&str, &str)], fault: StorageFault) -> TestApp {
    let temp_dir = tempfile::tempdir().expect("Failed to create temp directory");
    let storage_path = temp_dir.path().to_string_lossy().to_string();
    let config = test_config(&storage_path, overrides);

    let local = LocalStorage::new(temp_dir.path(), TEST_MEDIA_BASE_URL.to_string())
        .await
        .expect("Failed to create local storage");
    let storage: Arc<dyn Storage> = Arc::new(FailingStorage::new(local, fault));

    let assets = MemoryAssetStore::new();
    let waste = MemoryWasteStore::new();
    let stores = StoreState {
        bins: Arc::new(MemoryBinStore::new()),
        assets: Arc::new(assets.clone()),
        waste: Arc::new(waste.clone()),
        pool: None,
    };

    let state = Arc::new(AppState::new(config.clone(), stores, storage));
    let app = routes::setup_routes(&config, state.clone()).expect("Failed to build routes");
    let server = TestServer::new(app).expect("Failed to create test server");

    TestApp {
        server,
        state,
        assets,
        waste,
        _temp_dir: temp_dir,
    }
}

/// Create a bin and return its id.
pub async fn create_bin(client: &TestServer, name: &str) -> Uuid {
    let response = client
        .post("/bins")
        .json(&serde_json::json!({ "name": name }))
        .await;
    assert_eq!(response.status_code(), 201, "create bin {}", name);
    let body: serde_json::Value = response.json();
    body["bin"]["id"]
        .as_str()
        .and_then(|s| Uuid::parse_str(s).ok())
        .expect("Expected bin id in response")
}

/// POST /assets/upload with a `video` part and a `binId` field.
pub async fn upload_video(
    client: &TestServer,
    bin_id: &str,
    filename: &str,
    content_type: &str,
    data: Vec<u8>,
) -> TestResponse {
    let part = Part::bytes(Bytes::from(data))
        .file_name(filename.to_string())
        .mime_type(content_type.to_string());
    let form = MultipartForm::new()
        .add_text("binId", bin_id.to_string())
        .add_part("video", part);
    client.post("/assets/upload").multipart(form).await
}

/// POST /waste with an `image` part plus `type` and `binlocation`.
pub async fn upload_waste(
    client: &TestServer,
    waste_type: &str,
    location: &str,
    data: Vec<u8>,
) -> TestResponse {
    let part = Part::bytes(Bytes::from(data))
        .file_name("photo.jpg")
        .mime_type("image/jpeg");
    let form = MultipartForm::new()
        .add_text("type", waste_type.to_string())
        .add_text("binlocation", location.to_string())
        .add_part("image", part);
    client.post("/waste").multipart(form).await
}
