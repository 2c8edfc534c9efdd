//! Tag registration and lookup endpoints
//!
//! - `POST /api/tags/:uid`: normalize `spotify_uri` and upsert the tag
//! - `GET /api/tags/:uid`: one tag, 404 if never registered
//! - `GET /api/tags`: all tags, most recently written first

use axum::{
    extract::{rejection::JsonRejection, Path, State},
    routing::get,
    Json, Router,
};
use recordify_common::db::{self, TagRecord};
use recordify_common::normalize;
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::{ApiError, ApiResult, AppState};

/// Request payload for registering a tag
#[derive(Debug, Deserialize)]
pub struct SaveTagRequest {
    /// Spotify web link or `spotify:` URI
    pub spotify_uri: String,
    /// Display name; omitting it clears any stored label
    #[serde(default)]
    pub label: Option<String>,
}

/// Response payload for a saved tag
#[derive(Debug, Serialize)]
pub struct SaveTagResponse {
    pub ok: bool,
    pub uid: String,
    /// Canonical `spotify:{kind}:{id}` form that was stored
    pub spotify_uri: String,
    pub label: Option<String>,
}

/// POST /api/tags/:uid
///
/// **Request:** `{"spotify_uri": "https://open.spotify.com/track/...", "label": "..."}`
///
/// **Errors:**
/// - 400 Bad Request: blank UID, unreadable body, or unsupported/malformed Spotify link
pub async fn save_tag(
    State(state): State<AppState>,
    Path(uid): Path<String>,
    payload: Result<Json<SaveTagRequest>, JsonRejection>,
) -> ApiResult<Json<SaveTagResponse>> {
    if uid.trim().is_empty() {
        return Err(ApiError::BadRequest("Tag UID cannot be empty".to_string()));
    }
    let Json(payload) = payload?;

    let spotify_uri = normalize(&payload.spotify_uri)?;

    db::upsert_tag(&state.db, &uid, &spotify_uri, payload.label.as_deref()).await?;

    info!(uid = %uid, spotify_uri = %spotify_uri, "Tag saved");

    Ok(Json(SaveTagResponse {
        ok: true,
        uid,
        spotify_uri: spotify_uri.to_string(),
        label: payload.label,
    }))
}

/// GET /api/tags/:uid
pub async fn get_tag(
    State(state): State<AppState>,
    Path(uid): Path<String>,
) -> ApiResult<Json<TagRecord>> {
    db::get_tag(&state.db, &uid)
        .await?
        .map(Json)
        .ok_or_else(|| ApiError::NotFound(format!("Tag not found: {}", uid)))
}

/// GET /api/tags
pub async fn list_tags(State(state): State<AppState>) -> ApiResult<Json<Vec<TagRecord>>> {
    Ok(Json(db::list_tags(&state.db).await?))
}

/// Build tag routes
pub fn tag_routes() -> Router<AppState> {
    Router::new()
        .route("/api/tags", get(list_tags))
        .route("/api/tags/:uid", get(get_tag).post(save_tag))
}
