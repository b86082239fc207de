//! Waste API integration tests.

mod helpers;

use chrono::{Duration, Utc};
use helpers::fixtures::{fake_jpeg, fake_mp4, jpeg_of_size};
use helpers::storage::StorageFault;
use helpers::{create_bin, setup_test_app, setup_test_app_with, upload_video, upload_waste};
use serde_json::json;
use smartbin_core::models::NewWasteEntry;
use smartbin_db::WasteStore;
use smartbin_storage::Storage;

#[tokio::test]
async fn test_record_waste() {
    let app = setup_test_app().await;
    let client = app.client();

    let response = upload_waste(client, "Banana Peel", "Kitchen", fake_jpeg("peel")).await;
    assert_eq!(response.status_code(), 201, "{}", response.text());
    let body: serde_json::Value = response.json();
    let waste = &body["waste"];
    assert_eq!(waste["type"], "Banana Peel");
    assert_eq!(waste["editedType"], "banana peel");
    assert_eq!(waste["binLocation"], "Kitchen");
    assert!(waste["category"].is_null());
    assert!(waste["disposedAt"].is_string());

    let storage_id = waste["storageId"].as_str().expect("storageId");
    assert!(storage_id.starts_with("waste/"));
    assert!(app.state.media.storage.exists(storage_id).await.unwrap());
}

#[tokio::test]
async fn test_record_waste_requires_every_field() {
    let app = setup_test_app().await;
    let client = app.client();

    let response = upload_waste(client, "", "Kitchen", fake_jpeg("x")).await;
    assert_eq!(response.status_code(), 400);
    let body: serde_json::Value = response.json();
    assert_eq!(body["error"], "Missing required field 'type'");

    let response = upload_waste(client, "Can", " ", fake_jpeg("x")).await;
    assert_eq!(response.status_code(), 400);
    let body: serde_json::Value = response.json();
    assert_eq!(body["error"], "Missing required field 'binlocation'");

    let response = client.get("/waste").await;
    let body: serde_json::Value = response.json();
    assert_eq!(body["waste"].as_array().map(Vec::len), Some(0));
}

#[tokio::test]
async fn test_oversized_image_is_413() {
    let app = setup_test_app_with(&[("MAX_WASTE_IMAGE_SIZE_MB", "1")], StorageFault::None).await;
    let response = upload_waste(app.client(), "Can", "Lobby", jpeg_of_size(1024 * 1024 + 1)).await;
    assert_eq!(response.status_code(), 413);
    let body: serde_json::Value = response.json();
    assert_eq!(body["error"], "File too large (max 1MB)");
}

#[tokio::test]
async fn test_waste_body_limit_is_separate_from_video_limit() {
    let app = setup_test_app_with(&[("MAX_WASTE_IMAGE_SIZE_MB", "1")], StorageFault::None).await;
    let client = app.client();

    let response = upload_waste(client, "Can", "Lobby", jpeg_of_size(3 * 1024 * 1024)).await;
    assert_eq!(response.status_code(), 413);
    assert!(!response.text().contains("File too large"));
    let body: serde_json::Value = client.get("/waste").await.json();
    assert_eq!(body["waste"].as_array().map(Vec::len), Some(0));

    let bin_id = create_bin(client, "Lobby").await.to_string();
    let mut video = fake_mp4("large");
    video.resize(3 * 1024 * 1024, 0);
    let response = upload_video(client, &bin_id, "large.mp4", "video/mp4", video).await;
    assert_eq!(response.status_code(), 201, "{}", response.text());
}

#[tokio::test]
async fn test_listing_is_newest_first() {
    let app = setup_test_app().await;
    let now = Utc::now();
    for (label, hours_ago) in [("middle", 1), ("newest", 0), ("oldest", 2)] {
        let entry = NewWasteEntry {
            waste_type: label.to_string(),
            bin_location: "Lobby".to_string(),
            image_url: format!("http://localhost/{}", label),
            storage_id: format!("waste/{}.jpg", label),
        }
        .into_entry(uuid::Uuid::new_v4(), now - Duration::hours(hours_ago));
        app.waste.insert(entry).await;
    }

    let body: serde_json::Value = app.client().get("/waste").await.json();
    let order: Vec<&str> = body["waste"]
        .as_array()
        .expect("waste array")
        .iter()
        .filter_map(|w| w["type"].as_str())
        .collect();
    assert_eq!(order, vec!["newest", "middle", "oldest"]);
}

#[tokio::test]
async fn test_categorize_waste() {
    let app = setup_test_app().await;
    let client = app.client();
    let body: serde_json::Value = upload_waste(client, "Bottle", "Lobby", fake_jpeg("b"))
        .await
        .json();
    let id = body["waste"]["id"].as_str().expect("id").to_string();

    let response = client
        .patch(&format!("/waste/{}", id))
        .json(&json!({ "category": "recyclable" }))
        .await;
    assert_eq!(response.status_code(), 200);
    let body: serde_json::Value = response.json();
    assert_eq!(body["waste"]["category"], "recyclable");

    let response = client
        .patch(&format!("/waste/{}", id))
        .json(&json!({ "category": "miscellaneous" }))
        .await;
    assert_eq!(response.status_code(), 200);
    let body: serde_json::Value = response.json();
    assert_eq!(body["waste"]["category"], "miscellaneous");

    for payload in [json!({ "category": "Compost" }), json!({})] {
        let response = client.patch(&format!("/waste/{}", id)).json(&payload).await;
        assert_eq!(response.status_code(), 400);
        let body: serde_json::Value = response.json();
        assert_eq!(body["error"], "Invalid category");
    }

    let stored = app
        .waste
        .get_waste(id.parse().expect("uuid"))
        .await
        .unwrap()
        .expect("entry");
    assert_eq!(stored.category.map(|c| c.as_str()), Some("miscellaneous"));

    let response = client
        .patch(&format!("/waste/{}", uuid::Uuid::new_v4()))
        .json(&json!({ "category": "recyclable" }))
        .await;
    assert_eq!(response.status_code(), 404);
    let body: serde_json::Value = response.json();
    assert_eq!(body["error"], "Waste entry not found");
}

#[tokio::test]
async fn test_delete_waste() {
    let app = setup_test_app().await;
    let client = app.client();
    let body: serde_json::Value = upload_waste(client, "Can", "Lobby", fake_jpeg("can"))
        .await
        .json();
    let id = body["waste"]["id"].as_str().expect("id").to_string();
    let storage_id = body["waste"]["storageId"].as_str().expect("storageId").to_string();

    let response = client
        .delete(&format!("/waste/{}", id))
        .json(&json!({ "storageId": "waste/other.jpg" }))
        .await;
    assert_eq!(response.status_code(), 400);
    assert!(app.state.media.storage.exists(&storage_id).await.unwrap());

    let response = client
        .delete(&format!("/waste/{}", id))
        .json(&json!({ "storageId": storage_id }))
        .await;
    assert_eq!(response.status_code(), 200);
    assert!(!app.state.media.storage.exists(&storage_id).await.unwrap());

    let body: serde_json::Value = client.get("/waste").await.json();
    assert_eq!(body["waste"].as_array().map(Vec::len), Some(0));

    let response = client.delete(&format!("/waste/{}", id)).await;
    assert_eq!(response.status_code(), 404);
}

#[tokio::test]
async fn test_required_delete_keeps_entry_on_media_host_failure() {
    let app = setup_test_app_with(&[], StorageFault::Deletes).await;
    let client = app.client();
    let body: serde_json::Value = upload_waste(client, "Can", "Lobby", fake_jpeg("can"))
        .await
        .json();
    let id = body["waste"]["id"].as_str().expect("id").to_string();

    let response = client.delete(&format!("/waste/{}", id)).await;
    assert_eq!(response.status_code(), 500);

    let stored = app
        .waste
        .get_waste(id.parse().expect("uuid"))
        .await
        .unwrap();
    assert!(stored.is_some());
}

#[tokio::test]
async fn test_shared_image_survives_first_delete() {
    let app = setup_test_app().await;
    let client = app.client();

    let first: serde_json::Value = upload_waste(client, "Can", "Lobby", fake_jpeg("shared"))
        .await
        .json();
    let second: serde_json::Value = upload_waste(client, "Can", "Kitchen", fake_jpeg("shared"))
        .await
        .json();
    let storage_id = first["waste"]["storageId"].as_str().expect("storageId");
    assert_eq!(second["waste"]["storageId"], storage_id);
    assert_ne!(first["waste"]["id"], second["waste"]["id"]);

    let first_id = first["waste"]["id"].as_str().expect("id");
    let response = client
        .delete(&format!("/waste/{}", first_id))
        .json(&json!({ "storageId": storage_id }))
        .await;
    assert_eq!(response.status_code(), 200);
    assert!(app.state.media.storage.exists(storage_id).await.unwrap());

    let body: serde_json::Value = client.get("/waste").await.json();
    assert_eq!(body["waste"].as_array().map(Vec::len), Some(1));

    let second_id = second["waste"]["id"].as_str().expect("id");
    let response = client.delete(&format!("/waste/{}", second_id)).await;
    assert_eq!(response.status_code(), 200);
    assert!(!app.state.media.storage.exists(storage_id).await.unwrap());
}
