//! Database initialization
//!
//! Opens (or creates) the SQLite database file and creates the schema.
//! Every step is idempotent, so this runs on each process start.

use crate::Result;
use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions};
use sqlx::SqlitePool;
use std::path::Path;
use std::time::Duration;
use tracing::info;

/// Busy timeout applied to every connection (ms)
pub const BUSY_TIMEOUT_MS: u64 = 5000;

/// Initialize database connection and create tables if needed
pub async fn init_database(db_path: &Path) -> Result<SqlitePool> {
    let newly_created = !db_path.exists();

    // Create parent directory if it doesn't exist
    if let Some(parent) = db_path.parent() {
        std::fs::create_dir_all(parent)?;
    }

    // WAL lets readers proceed while a write is in progress; the busy timeout
    // makes concurrent writers wait for the lock instead of failing
    let options = SqliteConnectOptions::new()
        .filename(db_path)
        .create_if_missing(true)
        .journal_mode(SqliteJournalMode::Wal)
        .busy_timeout(Duration::from_millis(BUSY_TIMEOUT_MS));

    let pool = SqlitePoolOptions::new()
        .max_connections(5)
        .connect_with(options)
        .await?;

    if newly_created {
        info!("Initialized new database: {}", db_path.display());
    } else {
        info!("Opened existing database: {}", db_path.display());
    }

    create_schema(&pool).await?;

    Ok(pool)
}

/// Create all tables (safe to call on an initialized database)
pub async fn create_schema(pool: &SqlitePool) -> Result<()> {
    create_tags_table(pool).await
}

async fn create_tags_table(pool: &SqlitePool) -> Result<()> {
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS tags (
            uid TEXT PRIMARY KEY,
            spotify_uri TEXT NOT NULL,
            label TEXT,
            updated_at TEXT NOT NULL
        )
        "#,
    )
    .execute(pool)
    .await?;

    sqlx::query("CREATE INDEX IF NOT EXISTS idx_tags_updated_at ON tags(updated_at)")
        .execute(pool)
        .await?;

    Ok(())
}
