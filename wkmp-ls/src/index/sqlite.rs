//! SQLite catalog index
//!
//! Reads the `songs` table and its `songs_fts` FTS5 index created by
//! `wkmp_common::db::init_database`. Excluded songs are never returned.

use async_trait::async_trait;
use sqlx::sqlite::SqliteRow;
use sqlx::{Row, SqlitePool};
use tracing::debug;
use uuid::Uuid;

use super::{CatalogIndex, DEFAULT_QUERY_LIMIT};
use crate::error::IndexError;
use crate::search::SongRef;

const SONG_COLUMNS: &str = "s.guid, s.title, s.artist, s.album, s.play_count, s.last_played_at";

pub struct SqliteCatalogIndex {
    pool: SqlitePool,
    query_limit: usize,
}

impl SqliteCatalogIndex {
    pub fn new(pool: SqlitePool) -> Self {
        Self {
            pool,
            query_limit: DEFAULT_QUERY_LIMIT,
        }
    }

    /// Override the row cap for prefix/substring/phrase queries
    pub fn with_query_limit(mut self, query_limit: usize) -> Self {
        self.query_limit = query_limit;
        self
    }

    fn limit(&self) -> i64 {
        sql_limit(self.query_limit)
    }

    async fn fetch_fts(&self, fts_query: &str, prefix_pattern: Option<&str>) -> Result<Vec<SongRef>, IndexError> {
        let rows = match prefix_pattern {
            // Prefix search: rows whose field *starts* with the query come
            // first, title before artist before album
            Some(pattern) => {
                let sql = format!(
                    r#"
                    SELECT {SONG_COLUMNS}
                    FROM songs s
                    JOIN songs_fts ON s.id = songs_fts.rowid
                    WHERE songs_fts MATCH ?1 AND s.excluded = 0
                    ORDER BY
                        CASE
                            WHEN s.title LIKE ?2 ESCAPE '\' THEN 3
                            WHEN s.artist LIKE ?2 ESCAPE '\' THEN 2
                            WHEN s.album LIKE ?2 ESCAPE '\' THEN 1
                            ELSE 0
                        END DESC,
                        songs_fts.rank,
                        s.play_count DESC
                    LIMIT ?3
                    "#
                );
                sqlx::query(&sql)
                    .bind(fts_query)
                    .bind(pattern)
                    .bind(self.limit())
                    .fetch_all(&self.pool)
                    .await?
            }
            None => {
                let sql = format!(
                    r#"
                    SELECT {SONG_COLUMNS}
                    FROM songs s
                    JOIN songs_fts ON s.id = songs_fts.rowid
                    WHERE songs_fts MATCH ?1 AND s.excluded = 0
                    ORDER BY songs_fts.rank, s.play_count DESC
                    LIMIT ?2
                    "#
                );
                sqlx::query(&sql)
                    .bind(fts_query)
                    .bind(self.limit())
                    .fetch_all(&self.pool)
                    .await?
            }
        };

        rows.iter().map(song_from_row).collect()
    }
}

#[async_trait]
impl CatalogIndex for SqliteCatalogIndex {
    async fn search_prefix(&self, query: &str) -> Result<Vec<SongRef>, IndexError> {
        let Some(fts_query) = fts_prefix_query(query) else {
            return Ok(Vec::new());
        };
        debug!(fts_query = %fts_query, "FTS prefix query");

        let prefix_pattern = format!("{}%", escape_like(query));
        self.fetch_fts(&fts_query, Some(&prefix_pattern)).await
    }

    async fn search_substring(&self, query: &str) -> Result<Vec<SongRef>, IndexError> {
        let pattern = format!("%{}%", escape_like(query));

        let sql = format!(
            r#"
            SELECT {SONG_COLUMNS}
            FROM songs s
            WHERE (s.title LIKE ?1 ESCAPE '\'
                OR s.artist LIKE ?1 ESCAPE '\'
                OR s.album LIKE ?1 ESCAPE '\')
                AND s.excluded = 0
            ORDER BY
                CASE
                    WHEN s.title LIKE ?1 ESCAPE '\' THEN 3
                    WHEN s.artist LIKE ?1 ESCAPE '\' THEN 2
                    WHEN s.album LIKE ?1 ESCAPE '\' THEN 1
                    ELSE 0
                END DESC,
                s.play_count DESC
            LIMIT ?2
            "#
        );

        let rows = sqlx::query(&sql)
            .bind(&pattern)
            .bind(self.limit())
            .fetch_all(&self.pool)
            .await?;

        rows.iter().map(song_from_row).collect()
    }

    async fn search_phrase(&self, query: &str) -> Result<Vec<SongRef>, IndexError> {
        let Some(fts_query) = fts_phrase_query(query) else {
            return Ok(Vec::new());
        };
        debug!(fts_query = %fts_query, "FTS phrase query");

        self.fetch_fts(&fts_query, None).await
    }

    async fn top_songs(&self, limit: usize) -> Result<Vec<SongRef>, IndexError> {
        let sql = format!(
            r#"
            SELECT {SONG_COLUMNS}
            FROM songs s
            WHERE s.excluded = 0
            ORDER BY s.play_count DESC, s.last_played_at DESC
            LIMIT ?
            "#
        );

        let rows = sqlx::query(&sql)
            .bind(sql_limit(limit))
            .fetch_all(&self.pool)
            .await?;

        rows.iter().map(song_from_row).collect()
    }
}

fn sql_limit(limit: usize) -> i64 {
    i64::try_from(limit).unwrap_or(i64::MAX)
}

fn song_from_row(row: &SqliteRow) -> Result<SongRef, IndexError> {
    let guid_str: String = row.try_get("guid")?;
    let guid = Uuid::parse_str(&guid_str)
        .map_err(|e| IndexError::CorruptRow(format!("guid '{}': {}", guid_str, e)))?;

    Ok(SongRef {
        guid,
        title: row.try_get("title")?,
        artist: row.try_get("artist")?,
        album: row.try_get("album")?,
        play_count: row.try_get("play_count")?,
        last_played_at: row.try_get("last_played_at")?,
    })
}

/// Split text the way the unicode61 tokenizer does
fn fts_tokens(text: &str) -> Vec<&str> {
    text.split(|c: char| !c.is_alphanumeric())
        .filter(|t| !t.is_empty())
        .collect()
}

/// Quote a string as an FTS5 string literal
fn fts_quote(text: &str) -> String {
    format!("\"{}\"", text.replace('"', "\"\""))
}

/// `beat it` → `"beat" "it"*`
///
/// Every token must be present; the last one may be incomplete.
fn fts_prefix_query(query: &str) -> Option<String> {
    let tokens = fts_tokens(query);
    if tokens.is_empty() {
        return None;
    }
    let quoted: Vec<String> = tokens.iter().map(|t| fts_quote(t)).collect();
    Some(format!("{}*", quoted.join(" ")))
}

/// `dark side` → `"dark side"`
fn fts_phrase_query(query: &str) -> Option<String> {
    let tokens = fts_tokens(query);
    if tokens.is_empty() {
        return None;
    }
    Some(fts_quote(&tokens.join(" ")))
}

/// Escape LIKE wildcards so user text matches literally (`ESCAPE '\'`)
fn escape_like(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        if matches!(c, '%' | '_' | '\\') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped
}
