//! Tag store operations
//!
//! Persists the mapping from a physical tag UID to a canonical Spotify URI.
//! Records are created on first write, replaced on every later write to the
//! same UID and never deleted.

use crate::identifier::SpotifyUri;
use crate::time::{monotonic_now, to_db_string};
use crate::Result;
use sqlx::SqlitePool;
use tracing::debug;

use super::models::TagRecord;

/// Insert a tag, or replace every field of the existing tag with this UID
///
/// A single `INSERT ... ON CONFLICT DO UPDATE` statement, so a concurrent
/// reader sees either the old row or the new one, never a mix. Passing
/// `label = None` clears a previously stored label.
///
/// `updated_at` is stamped before the statement runs. Writes that overlap
/// in time may therefore commit in a different order than their timestamps,
/// and the listing order among them is not guaranteed to match commit order.
/// Writes that do not overlap always list newest first.
pub async fn upsert_tag(
    pool: &SqlitePool,
    uid: &str,
    spotify_uri: &SpotifyUri,
    label: Option<&str>,
) -> Result<()> {
    let updated_at = to_db_string(&monotonic_now());

    sqlx::query(
        r#"
        INSERT INTO tags (uid, spotify_uri, label, updated_at)
        VALUES (?, ?, ?, ?)
        ON CONFLICT(uid) DO UPDATE SET
            spotify_uri = excluded.spotify_uri,
            label = excluded.label,
            updated_at = excluded.updated_at
        "#,
    )
    .bind(uid)
    .bind(spotify_uri.to_string())
    .bind(label)
    .bind(&updated_at)
    .execute(pool)
    .await?;

    debug!(uid = %uid, spotify_uri = %spotify_uri, updated_at = %updated_at, "Upserted tag");

    Ok(())
}

/// Look up a tag by UID
///
/// Returns `Ok(None)` if the UID has never been written.
pub async fn get_tag(pool: &SqlitePool, uid: &str) -> Result<Option<TagRecord>> {
    let record = sqlx::query_as::<_, TagRecord>(
        "SELECT uid, spotify_uri, label, updated_at FROM tags WHERE uid = ?",
    )
    .bind(uid)
    .fetch_optional(pool)
    .await?;

    Ok(record)
}

/// All tags, most recently written first
pub async fn list_tags(pool: &SqlitePool) -> Result<Vec<TagRecord>> {
    let records = sqlx::query_as::<_, TagRecord>(
        r#"
        SELECT uid, spotify_uri, label, updated_at
        FROM tags
        ORDER BY updated_at DESC, rowid DESC
        "#,
    )
    .fetch_all(pool)
    .await?;

    Ok(records)
}
