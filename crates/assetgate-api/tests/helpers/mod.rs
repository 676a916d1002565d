//! Test helpers: build AppState and router for integration tests.
//!
//! Every app runs against `MemoryStorage`, a temporary scratch directory and a
//! fixed clock, so storage keys are predictable.

#![allow(dead_code)]

pub mod fixtures;

use assetgate_api::setup::routes;
use assetgate_api::state::AppState;
use assetgate_core::{CategoryTable, Config, StorageBackend};
use assetgate_processing::FixedClock;
use assetgate_storage::MemoryStorage;
use axum_test::TestServer;
use std::sync::Arc;
use tempfile::TempDir;

/// Timestamp every key is built with.
pub const TS: i64 = 1_700_000_000_000;

/// Test application: server plus the store it writes into.
pub struct TestApp {
    pub server: TestServer,
    pub storage: MemoryStorage,
    pub _scratch: TempDir,
}

impl TestApp {
    pub fn client(&self) -> &TestServer {
        &self.server
    }
}

pub fn setup_test_app() -> TestApp {
    setup_test_app_with(Config::default(), MemoryStorage::new())
}

pub fn setup_test_app_with(mut config: Config, storage: MemoryStorage) -> TestApp {
    let scratch = tempfile::tempdir().expect("Failed to create scratch dir");
    config.scratch_dir = scratch.path().join("tmp");
    config.storage_backend = StorageBackend::Memory;

    let state = AppState::new(
        config.clone(),
        Arc::new(storage.clone()),
        CategoryTable::builtin().expect("Built-in categories must parse"),
        Arc::new(FixedClock(TS)),
    )
    .expect("Failed to build app state");

    let app = routes::setup_routes(&config, Arc::new(state)).expect("Failed to setup routes");
    let server = TestServer::new(app.into_make_service()).expect("Failed to create test server");

    TestApp {
        server,
        storage,
        _scratch: scratch,
    }
}

/// Serve `body` as `content_type` at `path` on an ephemeral local port.
pub async fn serve_remote(path: &'static str, content_type: &'static str, body: Vec<u8>) -> String {
    use axum::http::header;
    use axum::routing::get;

    let router = axum::Router::new().route(
        path,
        get(move || {
            let body = body.clone();
            async move { ([(header::CONTENT_TYPE, content_type)], body) }
        }),
    );
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("Failed to bind remote server");
    let addr = listener.local_addr().expect("No local address");
    tokio::spawn(async move {
        axum::serve(listener, router).await.ok();
    });
    format!("http://{}{}", addr, path)
}
