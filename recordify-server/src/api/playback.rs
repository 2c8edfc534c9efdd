//! Playback endpoints
//!
//! - `POST /api/play/:uid`: resolve the tag and start its item
//! - `GET /api/now_playing`: current playback state from the provider

use axum::{
    extract::{Path, State},
    routing::{get, post},
    Json, Router,
};
use recordify_common::{db, SpotifyUri};
use serde::Serialize;
use tracing::info;

use crate::playback::NowPlaying;
use crate::{ApiError, ApiResult, AppState};

/// Response payload for a started tag
#[derive(Debug, Serialize)]
pub struct PlayResponse {
    pub ok: bool,
    pub uid: String,
    pub spotify_uri: String,
}

/// POST /api/play/:uid
///
/// **Errors:**
/// - 404 Not Found: tag UID never registered
/// - 502 Bad Gateway: provider failure (no device, expired token, ...)
pub async fn play_tag(
    State(state): State<AppState>,
    Path(uid): Path<String>,
) -> ApiResult<Json<PlayResponse>> {
    let tag = db::get_tag(&state.db, &uid)
        .await?
        .ok_or_else(|| ApiError::NotFound(format!("Tag not found: {}", uid)))?;

    // Stored values are canonical; a parse failure means the row was edited by hand
    let uri: SpotifyUri = tag.spotify_uri.parse().map_err(|e| {
        ApiError::Internal(format!("Stored URI for tag {} is invalid: {}", uid, e))
    })?;

    state.playback.start(&uri).await?;

    info!(uid = %uid, spotify_uri = %uri, "Playing tag");

    Ok(Json(PlayResponse {
        ok: true,
        uid,
        spotify_uri: tag.spotify_uri,
    }))
}

/// GET /api/now_playing
pub async fn now_playing(State(state): State<AppState>) -> ApiResult<Json<NowPlaying>> {
    Ok(Json(state.playback.current_status().await?))
}

/// Build playback routes
pub fn playback_routes() -> Router<AppState> {
    Router::new()
        .route("/api/play/:uid", post(play_tag))
        .route("/api/now_playing", get(now_playing))
}
