//! Database models

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One row of the `tags` table
///
/// Maps a physical tag UID to a canonical Spotify URI. `updated_at` is set
/// by the store on every write and is never supplied by callers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, sqlx::FromRow)]
pub struct TagRecord {
    pub uid: String,
    pub spotify_uri: String,
    pub label: Option<String>,
    pub updated_at: DateTime<Utc>,
}
