mod helpers;

use std::time::Duration;

use axum::http::StatusCode;
use helpers::{files_form, setup_test_app_with_ttl};
use serde_json::Value;

#[tokio::test]
async fn expired_code_is_gone_and_blob_reclaimed() {
    let app = setup_test_app_with_ttl(Duration::from_millis(500)).await;

    let body: Value = app
        .server
        .post("/upload")
        .multipart(files_form(&[("a.txt", b"short-lived", "text/plain")]))
        .await
        .json();
    let code = body["code"].as_str().unwrap().to_string();

    // Live immediately after upload.
    assert_eq!(
        app.server
            .get(&format!("/download/{}", code))
            .await
            .status_code(),
        StatusCode::OK
    );
    assert_eq!(app.blob_count(), 1);

    tokio::time::sleep(Duration::from_millis(1000)).await;

    // The reaper has not run; the lazy check still refuses and reclaims.
    let response = app.server.get(&format!("/download/{}", code)).await;
    assert_eq!(response.status_code(), StatusCode::GONE);
    let body: Value = response.json();
    assert_eq!(body["code"], "EXPIRED");
    assert_eq!(app.blob_count(), 0);

    // After reclamation the code reads as never-existed.
    let response = app.server.get(&format!("/download/{}", code)).await;
    assert_eq!(response.status_code(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn file_fetch_on_expired_code_is_gone() {
    let app = setup_test_app_with_ttl(Duration::from_millis(400)).await;

    let body: Value = app
        .server
        .post("/upload")
        .multipart(files_form(&[("a.txt", b"x", "text/plain")]))
        .await
        .json();
    let code = body["code"].as_str().unwrap().to_string();
    let listing: Value = app.server.get(&format!("/download/{}", code)).await.json();
    let storage_id = listing["files"][0]["storageId"].as_str().unwrap().to_string();

    tokio::time::sleep(Duration::from_millis(800)).await;

    let response = app
        .server
        .get(&format!("/download/{}?file={}", code, storage_id))
        .await;
    assert_eq!(response.status_code(), StatusCode::GONE);
}

#[tokio::test]
async fn reaper_sweep_reclaims_unvisited_groups() {
    let app = setup_test_app_with_ttl(Duration::from_millis(100)).await;

    for name in ["one.txt", "two.txt"] {
        let response = app
            .server
            .post("/upload")
            .multipart(files_form(&[(name, b"data", "text/plain")]))
            .await;
        assert_eq!(response.status_code(), StatusCode::OK);
    }
    assert_eq!(app.blob_count(), 2);

    tokio::time::sleep(Duration::from_millis(400)).await;

    // Nobody ever looked these groups up again; the sweep reclaims them.
    let purged = app.state.cleanup.sweep().await.unwrap();
    assert_eq!(purged, 2);
    assert_eq!(app.blob_count(), 0);

    // A second sweep finds nothing: both deletion paths are idempotent.
    assert_eq!(app.state.cleanup.sweep().await.unwrap(), 0);
}

#[tokio::test]
async fn live_groups_survive_a_sweep() {
    let app = setup_test_app_with_ttl(Duration::from_secs(3600)).await;

    let body: Value = app
        .server
        .post("/upload")
        .multipart(files_form(&[("keep.txt", b"keep me", "text/plain")]))
        .await
        .json();
    let code = body["code"].as_str().unwrap().to_string();

    assert_eq!(app.state.cleanup.sweep().await.unwrap(), 0);
    assert_eq!(
        app.server
            .get(&format!("/download/{}", code))
            .await
            .status_code(),
        StatusCode::OK
    );
    assert_eq!(app.blob_count(), 1);
}
