//! Song catalog rows
//!
//! Write-side helpers for the `songs` table. The search module only reads
//! this table; importers and the player use these helpers to maintain it.

use crate::{Error, Result};
use chrono::{DateTime, Utc};
use sqlx::SqlitePool;
use uuid::Uuid;

/// Song to be added to the catalog
#[derive(Debug, Clone, Default)]
pub struct NewSong {
    pub title: Option<String>,
    /// Album artist label
    pub artist: Option<String>,
    pub album: Option<String>,
    pub play_count: i64,
    pub last_played_at: Option<DateTime<Utc>>,
}

impl NewSong {
    pub fn new(title: &str, artist: &str, album: &str) -> Self {
        Self {
            title: Some(title.to_string()),
            artist: Some(artist.to_string()),
            album: Some(album.to_string()),
            ..Default::default()
        }
    }

    pub fn with_play_count(mut self, play_count: i64) -> Self {
        self.play_count = play_count;
        self
    }

    pub fn with_last_played_at(mut self, last_played_at: DateTime<Utc>) -> Self {
        self.last_played_at = Some(last_played_at);
        self
    }
}

/// Insert a song and return its new guid
pub async fn insert_song(pool: &SqlitePool, song: &NewSong) -> Result<Uuid> {
    if song.play_count < 0 {
        return Err(Error::InvalidInput(format!(
            "play_count must not be negative (got {})",
            song.play_count
        )));
    }

    let guid = Uuid::new_v4();
    sqlx::query(
        r#"
        INSERT INTO songs (guid, title, artist, album, play_count, last_played_at)
        VALUES (?, ?, ?, ?, ?, ?)
        "#,
    )
    .bind(guid.to_string())
    .bind(&song.title)
    .bind(&song.artist)
    .bind(&song.album)
    .bind(song.play_count)
    .bind(song.last_played_at)
    .execute(pool)
    .await?;

    Ok(guid)
}

/// Count one play of a song
pub async fn record_play(pool: &SqlitePool, guid: Uuid, played_at: DateTime<Utc>) -> Result<()> {
    let result = sqlx::query(
        r#"
        UPDATE songs
        SET play_count = play_count + 1,
            last_played_at = ?,
            updated_at = CURRENT_TIMESTAMP
        WHERE guid = ?
        "#,
    )
    .bind(played_at)
    .bind(guid.to_string())
    .execute(pool)
    .await?;

    if result.rows_affected() == 0 {
        return Err(Error::SongNotFound(guid));
    }
    Ok(())
}

/// Hide (or restore) songs from search; returns the number of rows changed
pub async fn set_excluded(pool: &SqlitePool, guids: &[Uuid], excluded: bool) -> Result<u64> {
    let mut changed = 0;
    for guid in guids {
        let result = sqlx::query(
            "UPDATE songs SET excluded = ?, updated_at = CURRENT_TIMESTAMP WHERE guid = ?",
        )
        .bind(excluded)
        .bind(guid.to_string())
        .execute(pool)
        .await?;
        changed += result.rows_affected();
    }
    Ok(changed)
}

/// Remove a song from the catalog
pub async fn delete_song(pool: &SqlitePool, guid: Uuid) -> Result<()> {
    let result = sqlx::query("DELETE FROM songs WHERE guid = ?")
        .bind(guid.to_string())
        .execute(pool)
        .await?;

    if result.rows_affected() == 0 {
        return Err(Error::SongNotFound(guid));
    }
    Ok(())
}
