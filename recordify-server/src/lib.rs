//! recordify-server library
//!
//! HTTP front end for the tag player: registers tag UIDs against Spotify
//! items, lists them, and starts playback when a tag is scanned.

use axum::Router;
use chrono::{DateTime, Utc};
use sqlx::SqlitePool;
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

pub mod api;
pub mod config;
pub mod error;
pub mod playback;

pub use crate::error::{ApiError, ApiResult};
use crate::playback::PlaybackProvider;

/// Application state shared across HTTP handlers
#[derive(Clone)]
pub struct AppState {
    /// Tag store connection pool
    pub db: SqlitePool,
    /// Streaming-service control surface
    pub playback: Arc<dyn PlaybackProvider>,
    /// Service startup timestamp for uptime reporting
    pub startup_time: DateTime<Utc>,
}

impl AppState {
    pub fn new(db: SqlitePool, playback: Arc<dyn PlaybackProvider>) -> Self {
        Self {
            db,
            playback,
            startup_time: Utc::now(),
        }
    }
}

/// Build application router
pub fn build_router(state: AppState) -> Router {
    Router::new()
        .merge(api::health_routes())
        .merge(api::tag_routes())
        .merge(api::playback_routes())
        .with_state(state)
        .layer(TraceLayer::new_for_http())
        // The web UI is served from a different origin
        .layer(CorsLayer::permissive())
}
