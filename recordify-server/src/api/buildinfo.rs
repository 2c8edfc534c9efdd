//! Build identification for the running recordify-server binary

use axum::{extract::State, response::Json};
use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::AppState;

/// Values stamped in by `build.rs`
#[derive(Debug, Clone, Serialize)]
pub struct BuildInfo {
    pub module: &'static str,
    pub version: &'static str,
    pub git_hash: &'static str,
    pub build_timestamp: &'static str,
    pub build_profile: &'static str,
}

impl BuildInfo {
    pub const fn current() -> Self {
        Self {
            module: "recordify-server",
            version: env!("CARGO_PKG_VERSION"),
            git_hash: env!("GIT_HASH"),
            build_timestamp: env!("BUILD_TIMESTAMP"),
            build_profile: env!("BUILD_PROFILE"),
        }
    }
}

/// `GET /build_info` body: the build stamp plus when this process started
#[derive(Debug, Serialize)]
pub struct BuildInfoResponse {
    #[serde(flatten)]
    pub build: BuildInfo,
    pub started_at: DateTime<Utc>,
}

/// GET /build_info
pub async fn get_build_info(State(state): State<AppState>) -> Json<BuildInfoResponse> {
    Json(BuildInfoResponse {
        build: BuildInfo::current(),
        started_at: state.startup_time,
    })
}
