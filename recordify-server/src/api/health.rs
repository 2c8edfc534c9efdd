//! Root and health check endpoints (no database access)

use axum::{extract::State, routing::get, Json, Router};
use chrono::Utc;
use serde::Serialize;
use serde_json::{json, Value};

use crate::AppState;

/// Health check response
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub ok: bool,
    pub status: String,
    pub module: String,
    pub version: String,
    pub uptime_secs: i64,
}

/// GET /
pub async fn root() -> Json<Value> {
    Json(json!({ "message": "recordify backend running" }))
}

/// GET /health
pub async fn health_check(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        ok: true,
        status: "ok".to_string(),
        module: "recordify-server".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        uptime_secs: (Utc::now() - state.startup_time).num_seconds(),
    })
}

/// Build health check routes
pub fn health_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(root))
        .route("/health", get(health_check))
        .route("/build_info", get(super::get_build_info))
}
