//! Playback collaborator
//!
//! The tag API only needs two things from a streaming service: start a
//! canonical item and report what is playing. [`PlaybackProvider`] is the
//! seam; [`SpotifyClient`] talks to the Spotify Web API and
//! [`UnconfiguredPlayback`] stands in when no credentials were supplied.
//! Provider errors are passed through to the HTTP layer untouched.

pub mod spotify;

pub use spotify::SpotifyClient;

use async_trait::async_trait;
use recordify_common::SpotifyUri;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Playback provider errors
#[derive(Debug, Error)]
pub enum PlaybackError {
    #[error("Playback not configured: {0}")]
    NotConfigured(String),

    #[error("No devices available")]
    NoDevice,

    #[error("Network error: {0}")]
    NetworkError(String),

    #[error("Spotify API error {0}: {1}")]
    ApiError(u16, String),

    #[error("Parse error: {0}")]
    ParseError(String),
}

/// Current playback state as reported to clients
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NowPlaying {
    pub is_playing: bool,
    #[serde(default)]
    pub progress_ms: Option<u64>,
    pub item: Option<NowPlayingItem>,
}

impl NowPlaying {
    /// Nothing is playing
    pub fn idle() -> Self {
        Self {
            is_playing: false,
            progress_ms: None,
            item: None,
        }
    }
}

/// Metadata of the playing item
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NowPlayingItem {
    pub name: String,
    /// Artist names joined with ", "
    pub artists: String,
    pub album: Option<String>,
    pub image_url: Option<String>,
    pub spotify_url: Option<String>,
    pub uri: Option<String>,
}

/// Streaming-service control surface used by the HTTP API
#[async_trait]
pub trait PlaybackProvider: Send + Sync {
    /// Start playing a track or playlist
    async fn start(&self, uri: &SpotifyUri) -> Result<(), PlaybackError>;

    /// What is playing right now
    async fn current_status(&self) -> Result<NowPlaying, PlaybackError>;
}

/// Provider used when no Spotify access token is configured
///
/// Every call fails with [`PlaybackError::NotConfigured`] so the tag API
/// stays usable without Spotify.
#[derive(Debug, Clone)]
pub struct UnconfiguredPlayback {
    reason: String,
}

impl UnconfiguredPlayback {
    pub fn new(reason: impl Into<String>) -> Self {
        Self {
            reason: reason.into(),
        }
    }
}

#[async_trait]
impl PlaybackProvider for UnconfiguredPlayback {
    async fn start(&self, _uri: &SpotifyUri) -> Result<(), PlaybackError> {
        Err(PlaybackError::NotConfigured(self.reason.clone()))
    }

    async fn current_status(&self) -> Result<NowPlaying, PlaybackError> {
        Err(PlaybackError::NotConfigured(self.reason.clone()))
    }
}
