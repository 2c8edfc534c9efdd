//! Spotify Web API client
//!
//! Covers the three calls playback needs: list devices, start playback on a
//! device, and read the currently playing item. Authorization is a bearer
//! access token supplied by configuration; obtaining or refreshing it is
//! outside this client.

use super::{NowPlaying, NowPlayingItem, PlaybackError, PlaybackProvider};
use async_trait::async_trait;
use recordify_common::{ItemKind, SpotifyUri};
use reqwest::StatusCode;
use serde::Deserialize;
use serde_json::json;
use std::time::Duration;
use tracing::{debug, info};

pub const SPOTIFY_API_BASE_URL: &str = "https://api.spotify.com/v1";
const USER_AGENT: &str = concat!("recordify/", env!("CARGO_PKG_VERSION"));
const REQUEST_TIMEOUT_SECS: u64 = 10;

/// Playback device as listed by `/me/player/devices`
#[derive(Debug, Clone, Deserialize)]
pub struct Device {
    /// Spotify may report `null` for restricted devices
    pub id: Option<String>,
    #[serde(default)]
    pub is_active: bool,
    #[serde(default)]
    pub name: String,
    #[serde(rename = "type", default)]
    pub device_type: String,
}

#[derive(Debug, Deserialize)]
struct DevicesResponse {
    devices: Vec<Device>,
}

#[derive(Debug, Deserialize)]
struct CurrentlyPlayingResponse {
    #[serde(default)]
    is_playing: bool,
    progress_ms: Option<u64>,
    item: Option<PlayingItem>,
}

#[derive(Debug, Deserialize)]
struct PlayingItem {
    name: String,
    #[serde(default)]
    artists: Vec<NamedEntity>,
    album: Option<Album>,
    external_urls: Option<ExternalUrls>,
    uri: Option<String>,
}

#[derive(Debug, Deserialize)]
struct NamedEntity {
    name: String,
}

#[derive(Debug, Deserialize)]
struct Album {
    name: Option<String>,
    #[serde(default)]
    images: Vec<Image>,
}

#[derive(Debug, Deserialize)]
struct Image {
    url: String,
}

#[derive(Debug, Deserialize)]
struct ExternalUrls {
    spotify: Option<String>,
}

impl From<PlayingItem> for NowPlayingItem {
    fn from(item: PlayingItem) -> Self {
        let artists = item
            .artists
            .iter()
            .map(|a| a.name.as_str())
            .collect::<Vec<_>>()
            .join(", ");
        let (album, image_url) = match item.album {
            Some(album) => (album.name, album.images.into_iter().next().map(|i| i.url)),
            None => (None, None),
        };

        Self {
            name: item.name,
            artists,
            album,
            image_url,
            spotify_url: item.external_urls.and_then(|u| u.spotify),
            uri: item.uri,
        }
    }
}

/// Pick the active device, or the first listed one if none is active
pub fn pick_device(devices: &[Device]) -> Option<&Device> {
    devices.iter().find(|d| d.is_active).or_else(|| devices.first())
}

/// Request body for `PUT /me/player/play`
///
/// Tracks are passed as a one-element `uris` list; playlists are a playback
/// context.
pub fn play_request_body(uri: &SpotifyUri) -> serde_json::Value {
    match uri.kind() {
        ItemKind::Track => json!({ "uris": [uri.to_string()] }),
        ItemKind::Playlist => json!({ "context_uri": uri.to_string() }),
    }
}

/// Spotify Web API client
pub struct SpotifyClient {
    http_client: reqwest::Client,
    base_url: String,
    access_token: String,
}

impl SpotifyClient {
    pub fn new(access_token: impl Into<String>) -> Result<Self, PlaybackError> {
        Self::with_base_url(access_token, SPOTIFY_API_BASE_URL)
    }

    /// Client against a different API root (used by tests)
    pub fn with_base_url(
        access_token: impl Into<String>,
        base_url: impl Into<String>,
    ) -> Result<Self, PlaybackError> {
        let http_client = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .build()
            .map_err(|e| PlaybackError::NetworkError(e.to_string()))?;

        Ok(Self {
            http_client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            access_token: access_token.into(),
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// List the user's playback devices
    pub async fn devices(&self) -> Result<Vec<Device>, PlaybackError> {
        let response = self
            .http_client
            .get(self.url("/me/player/devices"))
            .bearer_auth(&self.access_token)
            .send()
            .await
            .map_err(|e| PlaybackError::NetworkError(e.to_string()))?;

        let response = check_status(response).await?;
        let body: DevicesResponse = response
            .json()
            .await
            .map_err(|e| PlaybackError::ParseError(e.to_string()))?;

        Ok(body.devices)
    }

    /// Id of the device playback should start on
    pub async fn pick_device_id(&self) -> Result<String, PlaybackError> {
        let devices = self.devices().await?;
        let device = pick_device(&devices).ok_or(PlaybackError::NoDevice)?;

        debug!(device = %device.name, active = device.is_active, "Selected playback device");

        device.id.clone().ok_or(PlaybackError::NoDevice)
    }

    /// Start playback of `uri` on a specific device
    pub async fn start_playback(&self, device_id: &str, uri: &SpotifyUri) -> Result<(), PlaybackError> {
        let response = self
            .http_client
            .put(self.url("/me/player/play"))
            .query(&[("device_id", device_id)])
            .bearer_auth(&self.access_token)
            .json(&play_request_body(uri))
            .send()
            .await
            .map_err(|e| PlaybackError::NetworkError(e.to_string()))?;

        check_status(response).await?;
        Ok(())
    }

    /// Read the currently playing item
    pub async fn currently_playing(&self) -> Result<NowPlaying, PlaybackError> {
        let response = self
            .http_client
            .get(self.url("/me/player/currently-playing"))
            .bearer_auth(&self.access_token)
            .send()
            .await
            .map_err(|e| PlaybackError::NetworkError(e.to_string()))?;

        // 204: no active playback session
        if response.status() == StatusCode::NO_CONTENT {
            return Ok(NowPlaying::idle());
        }

        let response = check_status(response).await?;
        let body: CurrentlyPlayingResponse = response
            .json()
            .await
            .map_err(|e| PlaybackError::ParseError(e.to_string()))?;

        let Some(item) = body.item else {
            return Ok(NowPlaying::idle());
        };

        Ok(NowPlaying {
            is_playing: body.is_playing,
            progress_ms: body.progress_ms,
            item: Some(item.into()),
        })
    }
}

async fn check_status(response: reqwest::Response) -> Result<reqwest::Response, PlaybackError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let error_text = response.text().await.unwrap_or_default();
    Err(PlaybackError::ApiError(status.as_u16(), error_text))
}

#[async_trait]
impl PlaybackProvider for SpotifyClient {
    async fn start(&self, uri: &SpotifyUri) -> Result<(), PlaybackError> {
        let device_id = self.pick_device_id().await?;
        self.start_playback(&device_id, uri).await?;

        info!(uri = %uri, device_id = %device_id, "Started playback");
        Ok(())
    }

    async fn current_status(&self) -> Result<NowPlaying, PlaybackError> {
        self.currently_playing().await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn device(id: &str, is_active: bool) -> Device {
        Device {
            id: Some(id.to_string()),
            is_active,
            name: format!("Device {}", id),
            device_type: "Computer".to_string(),
        }
    }

    #[test]
    fn test_pick_device_prefers_active() {
        let devices = vec![device("a", false), device("b", true), device("c", false)];
        assert_eq!(pick_device(&devices).unwrap().id.as_deref(), Some("b"));
    }

    #[test]
    fn test_pick_device_falls_back_to_first() {
        let devices = vec![device("a", false), device("b", false)];
        assert_eq!(pick_device(&devices).unwrap().id.as_deref(), Some("a"));
    }

    #[test]
    fn test_pick_device_none() {
        assert!(pick_device(&[]).is_none());
    }

    #[test]
    fn test_play_request_body_by_kind() {
        let track = recordify_common::normalize("spotify:track:t1").unwrap();
        assert_eq!(play_request_body(&track), json!({ "uris": ["spotify:track:t1"] }));

        let playlist = recordify_common::normalize("spotify:playlist:p1").unwrap();
        assert_eq!(play_request_body(&playlist), json!({ "context_uri": "spotify:playlist:p1" }));
    }

    #[test]
    fn test_playing_item_conversion() {
        let item: PlayingItem = serde_json::from_value(json!({
            "name": "Song",
            "artists": [{ "name": "A" }, { "name": "B" }],
            "album": { "name": "Album", "images": [{ "url": "https://i.scdn.co/1" }, { "url": "https://i.scdn.co/2" }] },
            "external_urls": { "spotify": "https://open.spotify.com/track/t1" },
            "uri": "spotify:track:t1"
        }))
        .unwrap();

        let item = NowPlayingItem::from(item);
        assert_eq!(item.artists, "A, B");
        assert_eq!(item.album.as_deref(), Some("Album"));
        assert_eq!(item.image_url.as_deref(), Some("https://i.scdn.co/1"));
        assert_eq!(item.spotify_url.as_deref(), Some("https://open.spotify.com/track/t1"));
    }

    #[test]
    fn test_playing_item_without_album() {
        let item: PlayingItem = serde_json::from_value(json!({ "name": "Episode" })).unwrap();
        let item = NowPlayingItem::from(item);
        assert_eq!(item.artists, "");
        assert_eq!(item.album, None);
        assert_eq!(item.image_url, None);
    }

    #[test]
    fn test_client_creation() {
        assert!(SpotifyClient::new("token").is_ok());
    }
}
