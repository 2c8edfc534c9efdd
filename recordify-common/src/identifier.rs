//! Spotify identifier normalization
//!
//! Accepts either a shareable web link (`https://open.spotify.com/track/{id}?si=...`)
//! or a native URI (`spotify:track:{id}`) and canonicalizes it into a
//! [`SpotifyUri`], serialized as `spotify:{kind}:{id}`.
//!
//! Only tracks and playlists are supported. Albums, artists, shows and
//! anything else are rejected since playback can only be started for the
//! two supported kinds.

use serde::{de, Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;
use url::Url;

/// Literal prefix of a native Spotify URI
pub const URI_PREFIX: &str = "spotify:";

/// Hosts accepted for web links
pub const ALLOWED_HOSTS: [&str; 2] = ["open.spotify.com", "api.spotify.com"];

/// Reasons a raw identifier cannot be normalized
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum IdentifierError {
    /// Native URI did not have exactly three `:`-separated segments
    #[error("Invalid URI format")]
    InvalidUriFormat,

    /// Kind segment is not `track` or `playlist`
    #[error("Unsupported link type: {0}")]
    UnsupportedKind(String),

    /// Native URI had an empty id segment
    #[error("Missing identifier")]
    MissingId,

    /// Not a URL, or a URL whose host is not a Spotify host
    #[error("Unsupported link")]
    UnsupportedLink,

    /// URL path did not contain `/{kind}/{id}`
    #[error("Invalid URL format")]
    InvalidUrlFormat,
}

/// Kind of playable Spotify item
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ItemKind {
    Track,
    Playlist,
}

impl ItemKind {
    /// Segment used in URIs and URL paths
    pub fn as_str(&self) -> &'static str {
        match self {
            ItemKind::Track => "track",
            ItemKind::Playlist => "playlist",
        }
    }
}

impl fmt::Display for ItemKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ItemKind {
    type Err = IdentifierError;

    /// Exact, case-sensitive match on the segment
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "track" => Ok(ItemKind::Track),
            "playlist" => Ok(ItemKind::Playlist),
            other => Err(IdentifierError::UnsupportedKind(other.to_string())),
        }
    }
}

/// Canonical Spotify identifier (`spotify:{kind}:{id}`)
///
/// The id is guaranteed non-empty. Serializes to and from the canonical
/// string form, so it can sit directly in JSON bodies and TEXT columns.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SpotifyUri {
    kind: ItemKind,
    id: String,
}

impl SpotifyUri {
    /// Build from parts, rejecting an empty id
    pub fn new(kind: ItemKind, id: impl Into<String>) -> Result<Self, IdentifierError> {
        let id = id.into();
        if id.is_empty() {
            return Err(IdentifierError::MissingId);
        }
        Ok(Self { kind, id })
    }

    pub fn kind(&self) -> ItemKind {
        self.kind
    }

    pub fn id(&self) -> &str {
        &self.id
    }
}

impl fmt::Display for SpotifyUri {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}:{}", URI_PREFIX, self.kind, self.id)
    }
}

impl FromStr for SpotifyUri {
    type Err = IdentifierError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        normalize(s)
    }
}

impl Serialize for SpotifyUri {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for SpotifyUri {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        normalize(&raw).map_err(de::Error::custom)
    }
}

/// Normalize a Spotify web link or native URI
///
/// Surrounding whitespace is trimmed first. Inputs starting with `spotify:`
/// are treated as native URIs; everything else is parsed as a URL, whose
/// query string and fragment are ignored.
///
/// # Examples
///
/// ```
/// use recordify_common::identifier::normalize;
///
/// let uri = normalize("https://open.spotify.com/track/4uLU6hMCjMI75M1A2tKUQC?si=x").unwrap();
/// assert_eq!(uri.to_string(), "spotify:track:4uLU6hMCjMI75M1A2tKUQC");
/// ```
pub fn normalize(raw: &str) -> Result<SpotifyUri, IdentifierError> {
    let value = raw.trim();

    if value.starts_with(URI_PREFIX) {
        normalize_uri(value)
    } else {
        normalize_url(value)
    }
}

/// Normalize to the canonical string form
pub fn normalize_spotify_input(raw: &str) -> Result<String, IdentifierError> {
    normalize(raw).map(|uri| uri.to_string())
}

fn normalize_uri(value: &str) -> Result<SpotifyUri, IdentifierError> {
    let parts: Vec<&str> = value.split(':').collect();
    let [_, kind, id] = parts.as_slice() else {
        return Err(IdentifierError::InvalidUriFormat);
    };

    let kind: ItemKind = kind.parse()?;
    SpotifyUri::new(kind, *id)
}

fn normalize_url(value: &str) -> Result<SpotifyUri, IdentifierError> {
    let url = Url::parse(value).map_err(|_| IdentifierError::UnsupportedLink)?;

    // Userinfo or an explicit port means the authority is not a bare Spotify host
    let host_ok = url
        .host_str()
        .is_some_and(|host| ALLOWED_HOSTS.contains(&host));
    if !host_ok || url.port().is_some() || !url.username().is_empty() || url.password().is_some() {
        return Err(IdentifierError::UnsupportedLink);
    }

    // The parsed path has dot segments resolved and characters percent-encoded,
    // so kind and id come from the path as written
    let (authority, path) = raw_authority_and_path(value).ok_or(IdentifierError::UnsupportedLink)?;
    if authority.contains('\\') {
        return Err(IdentifierError::UnsupportedLink);
    }

    let segments: Vec<&str> = path.split('/').filter(|s| !s.is_empty()).collect();
    if segments.len() < 2 {
        return Err(IdentifierError::InvalidUrlFormat);
    }

    let kind: ItemKind = segments[0].parse()?;
    SpotifyUri::new(kind, segments[1])
}

/// Split `scheme://authority/path?query#fragment` into its literal authority
/// and path, without query or fragment
fn raw_authority_and_path(value: &str) -> Option<(&str, &str)> {
    let (_, rest) = value.split_once("://")?;
    let rest = rest.split(['?', '#']).next().unwrap_or_default();
    let path_start = rest.find('/').unwrap_or(rest.len());
    Some(rest.split_at(path_start))
}
