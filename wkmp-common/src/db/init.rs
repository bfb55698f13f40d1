//! Database initialization
//!
//! Opens (or creates) the catalog database and makes sure the song table and
//! its full-text index exist. Safe to call on every startup.

use crate::Result;
use sqlx::{sqlite::SqlitePoolOptions, SqlitePool};
use std::path::Path;
use tracing::info;

/// Initialize database connection and create catalog tables if needed
pub async fn init_database(db_path: &Path) -> Result<SqlitePool> {
    let newly_created = !db_path.exists();

    if let Some(parent) = db_path.parent() {
        std::fs::create_dir_all(parent)?;
    }

    let db_url = format!("sqlite://{}?mode=rwc", db_path.display());
    let pool = SqlitePoolOptions::new()
        .max_connections(5)
        .connect(&db_url)
        .await?;

    if newly_created {
        info!("Initialized new database: {}", db_path.display());
    } else {
        info!("Opened existing database: {}", db_path.display());
    }

    // WAL keeps searches readable while an importer writes
    sqlx::query("PRAGMA journal_mode = WAL")
        .execute(&pool)
        .await?;
    sqlx::query("PRAGMA busy_timeout = 5000")
        .execute(&pool)
        .await?;

    create_catalog_schema(&pool).await?;

    Ok(pool)
}

/// Create the songs table, its FTS5 index and the sync triggers (idempotent)
pub async fn create_catalog_schema(pool: &SqlitePool) -> Result<()> {
    create_songs_table(pool).await?;
    create_songs_fts(pool).await?;
    Ok(())
}

async fn create_songs_table(pool: &SqlitePool) -> Result<()> {
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS songs (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            guid TEXT NOT NULL UNIQUE,
            title TEXT,
            artist TEXT,
            album TEXT,
            play_count INTEGER NOT NULL DEFAULT 0,
            last_played_at TIMESTAMP,
            excluded INTEGER NOT NULL DEFAULT 0,
            created_at TIMESTAMP NOT NULL DEFAULT CURRENT_TIMESTAMP,
            updated_at TIMESTAMP NOT NULL DEFAULT CURRENT_TIMESTAMP
        )
        "#,
    )
    .execute(pool)
    .await?;

    // Fuzzy candidate pool is "top N by play count"
    sqlx::query(
        "CREATE INDEX IF NOT EXISTS idx_songs_play_count ON songs(play_count DESC, last_played_at DESC)",
    )
    .execute(pool)
    .await?;

    Ok(())
}

/// External-content FTS5 index over title/artist/album
///
/// Triggers keep the index in step with the songs table so callers never
/// write to `songs_fts` directly.
async fn create_songs_fts(pool: &SqlitePool) -> Result<()> {
    sqlx::query(
        r#"
        CREATE VIRTUAL TABLE IF NOT EXISTS songs_fts USING fts5(
            title,
            artist,
            album,
            content='songs',
            content_rowid='id',
            tokenize='unicode61'
        )
        "#,
    )
    .execute(pool)
    .await?;

    sqlx::query(
        r#"
        CREATE TRIGGER IF NOT EXISTS songs_fts_insert AFTER INSERT ON songs BEGIN
            INSERT INTO songs_fts(rowid, title, artist, album)
            VALUES (new.id, new.title, new.artist, new.album);
        END
        "#,
    )
    .execute(pool)
    .await?;

    sqlx::query(
        r#"
        CREATE TRIGGER IF NOT EXISTS songs_fts_delete AFTER DELETE ON songs BEGIN
            INSERT INTO songs_fts(songs_fts, rowid, title, artist, album)
            VALUES ('delete', old.id, old.title, old.artist, old.album);
        END
        "#,
    )
    .execute(pool)
    .await?;

    sqlx::query(
        r#"
        CREATE TRIGGER IF NOT EXISTS songs_fts_update AFTER UPDATE OF title, artist, album ON songs BEGIN
            INSERT INTO songs_fts(songs_fts, rowid, title, artist, album)
            VALUES ('delete', old.id, old.title, old.artist, old.album);
            INSERT INTO songs_fts(rowid, title, artist, album)
            VALUES (new.id, new.title, new.artist, new.album);
        END
        "#,
    )
    .execute(pool)
    .await?;

    Ok(())
}
