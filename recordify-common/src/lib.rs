//! # Recordify Common Library
//!
//! Shared code for the Recordify tag player:
//! - Spotify identifier normalization (URLs and `spotify:` URIs)
//! - Tag store (SQLite persistence of tag UID → Spotify item)
//! - Configuration loading and root folder resolution
//! - Error types and timestamp utilities

pub mod config;
pub mod db;
pub mod error;
pub mod identifier;
pub mod time;

pub use error::{Error, Result};
pub use identifier::{normalize, normalize_spotify_input, IdentifierError, ItemKind, SpotifyUri};
