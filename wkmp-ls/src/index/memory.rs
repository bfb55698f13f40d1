//! In-memory catalog index
//!
//! Linear scans over a `Vec<SongRef>`, mirroring the ordering rules of the
//! SQLite index. Used by tests and by embedders that already hold the
//! catalog in memory.

use async_trait::async_trait;
use std::cmp::Reverse;

use super::{CatalogIndex, DEFAULT_QUERY_LIMIT};
use crate::error::IndexError;
use crate::search::{Field, SongRef};

pub struct MemoryCatalogIndex {
    songs: Vec<SongRef>,
    query_limit: usize,
    phrase_support: bool,
}

impl MemoryCatalogIndex {
    pub fn new(songs: Vec<SongRef>) -> Self {
        Self {
            songs,
            query_limit: DEFAULT_QUERY_LIMIT,
            phrase_support: true,
        }
    }

    /// Override the row cap for prefix/substring/phrase queries
    pub fn with_query_limit(mut self, query_limit: usize) -> Self {
        self.query_limit = query_limit;
        self
    }

    /// Behave like a backend without a phrase index (phrase search is empty)
    pub fn without_phrase_support(mut self) -> Self {
        self.phrase_support = false;
        self
    }

    pub fn len(&self) -> usize {
        self.songs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.songs.is_empty()
    }

    /// Rank of the first field satisfying `matches` (0 = title), if any
    fn field_rank(song: &SongRef, matches: impl Fn(&str) -> bool) -> Option<usize> {
        Field::PRIORITY.iter().position(|field| {
            song.field_text(*field)
                .map(|text| matches(&text.to_lowercase()))
                .unwrap_or(false)
        })
    }

    /// Sort by (rank, play count desc) keeping catalog order for ties, then cap
    fn ranked(&self, mut hits: Vec<(usize, &SongRef)>) -> Vec<SongRef> {
        hits.sort_by_key(|(rank, song)| (*rank, Reverse(song.play_count)));
        hits.into_iter()
            .take(self.query_limit)
            .map(|(_, song)| song.clone())
            .collect()
    }
}

/// Lowercased alphanumeric tokens, the way the FTS5 unicode61 tokenizer splits
fn tokens(text: &str) -> Vec<String> {
    text.split(|c: char| !c.is_alphanumeric())
        .filter(|t| !t.is_empty())
        .map(str::to_lowercase)
        .collect()
}

fn contains_phrase(haystack: &[String], phrase: &[String]) -> bool {
    !phrase.is_empty()
        && haystack.len() >= phrase.len()
        && haystack.windows(phrase.len()).any(|window| window == phrase)
}

#[async_trait]
impl CatalogIndex for MemoryCatalogIndex {
    async fn search_prefix(&self, query: &str) -> Result<Vec<SongRef>, IndexError> {
        let query = query.to_lowercase();
        let query_tokens = tokens(&query);

        let hits = self
            .songs
            .iter()
            .filter_map(|song| {
                if let Some(rank) = Self::field_rank(song, |text| text.starts_with(&query)) {
                    return Some((rank, song));
                }
                // Word-prefix hit somewhere inside a field (e.g. "Michael Beat")
                let word_hit = Field::PRIORITY.iter().any(|field| {
                    song.field_text(*field)
                        .map(|text| {
                            let words = tokens(text);
                            query_tokens.iter().all(|q| words.iter().any(|w| w.starts_with(q.as_str())))
                        })
                        .unwrap_or(false)
                });
                (word_hit && !query_tokens.is_empty()).then_some((Field::PRIORITY.len(), song))
            })
            .collect();

        Ok(self.ranked(hits))
    }

    async fn search_substring(&self, query: &str) -> Result<Vec<SongRef>, IndexError> {
        let query = query.to_lowercase();

        let hits = self
            .songs
            .iter()
            .filter_map(|song| Self::field_rank(song, |text| text.contains(&query)).map(|rank| (rank, song)))
            .collect();

        Ok(self.ranked(hits))
    }

    async fn search_phrase(&self, query: &str) -> Result<Vec<SongRef>, IndexError> {
        if !self.phrase_support {
            return Ok(Vec::new());
        }
        let phrase = tokens(query);

        let hits = self
            .songs
            .iter()
            .filter(|song| {
                Field::PRIORITY.iter().any(|field| {
                    song.field_text(*field)
                        .map(|text| contains_phrase(&tokens(text), &phrase))
                        .unwrap_or(false)
                })
            })
            .map(|song| (0, song))
            .collect();

        Ok(self.ranked(hits))
    }

    async fn top_songs(&self, limit: usize) -> Result<Vec<SongRef>, IndexError> {
        let mut songs: Vec<&SongRef> = self.songs.iter().collect();
        songs.sort_by_key(|song| (Reverse(song.play_count), Reverse(song.last_played_at)));
        Ok(songs.into_iter().take(limit).cloned().collect())
    }
}
