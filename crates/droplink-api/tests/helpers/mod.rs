#![allow(dead_code)]

use std::sync::Arc;
use std::time::Duration;

use axum_test::multipart::{MultipartForm, Part};
use axum_test::TestServer;
use droplink_api::AppState;
use droplink_core::Config;
use tempfile::TempDir;

/// Test application with isolated database and blob directory.
pub struct TestApp {
    pub server: TestServer,
    pub state: Arc<AppState>,
    dir: TempDir,
}

impl TestApp {
    /// Number of blobs currently on disk.
    pub fn blob_count(&self) -> usize {
        std::fs::read_dir(self.dir.path().join("blobs"))
            .map(|entries| entries.count())
            .unwrap_or(0)
    }
}

pub async fn setup_test_app() -> TestApp {
    setup_test_app_with_ttl(Duration::from_secs(3600)).await
}

pub async fn setup_test_app_with_ttl(ttl: Duration) -> TestApp {
    let dir = TempDir::new().unwrap();
    let config = Config {
        server_port: 0,
        base_url: "http://localhost:3000".to_string(),
        database_url: format!("sqlite://{}", dir.path().join("registry.db").display()),
        storage_path: dir.path().join("blobs").display().to_string(),
        file_ttl: ttl,
        reaper_interval: Duration::from_secs(600),
        reaper_grace: Duration::ZERO,
        cors_origins: vec![],
        max_upload_bytes: 10 * 1024 * 1024,
    };

    let (state, router) = droplink_api::setup::initialize_app(config).await.unwrap();
    TestApp {
        server: TestServer::new(router).unwrap(),
        state,
        dir,
    }
}

/// Multipart form with the given `files` parts.
pub fn files_form(files: &[(&str, &[u8], &str)]) -> MultipartForm {
    let mut form = MultipartForm::new();
    for (name, data, content_type) in files {
        form = form.add_part(
            "files",
            Part::bytes(data.to_vec())
                .file_name(name.to_string())
                .mime_type(content_type.to_string()),
        );
    }
    form
}
