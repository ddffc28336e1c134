//! Test utilities for integration tests
use std::sync::{Arc, RwLock};

use axum::{Router, body::Body};

use huddle::api::AppState;
use huddle::api::app;
use huddle::core::AppConfig;
use huddle::core::db::{async_db, initialize_db};

/// Creates a test application router backed by a fresh database in a
/// temporary directory, so tests can run in parallel without sharing
/// state.
pub async fn test_app() -> Router {
    let dir = tempfile::tempdir().expect("Failed to create temp dir");
    let db_path = dir.path().join("huddle.db");
    let db_path_str = db_path.to_str().unwrap().to_string();

    // Keep the directory alive for the rest of the test process so the
    // database file isn't removed out from under the connection
    std::mem::forget(dir);

    let db = async_db(&db_path_str)
        .await
        .expect("Failed to connect to async db");
    db.call(|conn| {
        initialize_db(conn).expect("Failed to migrate db");
        Ok(())
    })
    .await
    .unwrap();

    let app_config = AppConfig {
        db_path: db_path_str,
        slot_gap_mins: 30,
    };
    let app_state = AppState::new(db, app_config);
    app(Arc::new(RwLock::new(app_state)))
}

/// Collect a response body into a string
pub async fn body_to_string(body: Body) -> String {
    let bytes = axum::body::to_bytes(body, usize::MAX)
        .await
        .expect("Failed to read response body");
    String::from_utf8(bytes.to_vec()).expect("Response body was not utf-8")
}
