//! Tier 1 (prefix / phrase) and Tier 2 (substring) matchers
//!
//! Both tiers take candidates from the catalog index and only decide how
//! each candidate matched.

use tracing::debug;

use super::types::{Field, MatchType, SearchResult, SongRef};
use crate::error::IndexError;
use crate::index::CatalogIndex;

/// Tier 1: phrase match for multi-word queries, otherwise prefix match
///
/// A non-empty phrase result is returned as-is (`Phrase`, `Unknown` field)
/// and prefix search is skipped.
pub async fn prefix_tier<I>(index: &I, query: &str) -> Result<Vec<SearchResult>, IndexError>
where
    I: CatalogIndex + ?Sized,
{
    if is_multi_word(query) {
        let phrase_hits = index.search_phrase(query).await?;
        if !phrase_hits.is_empty() {
            debug!(query = %query, count = phrase_hits.len(), "Phrase match");
            return Ok(phrase_hits
                .into_iter()
                .map(|song| SearchResult::new(song, MatchType::Phrase, Field::Unknown))
                .collect());
        }
    }

    let query_lower = query.to_lowercase();
    let songs = index.search_prefix(query).await?;

    Ok(songs
        .into_iter()
        .map(|song| {
            let field = attribute_field(&song, |text| text.starts_with(&query_lower));
            SearchResult::new(song, MatchType::Prefix, field)
        })
        .collect())
}

/// Tier 2: any-position substring match
pub async fn substring_tier<I>(index: &I, query: &str) -> Result<Vec<SearchResult>, IndexError>
where
    I: CatalogIndex + ?Sized,
{
    let query_lower = query.to_lowercase();
    let songs = index.search_substring(query).await?;

    Ok(songs
        .into_iter()
        .map(|song| {
            let field = attribute_field(&song, |text| text.contains(&query_lower));
            SearchResult::new(song, MatchType::Substring, field)
        })
        .collect())
}

/// First field (title, artist, album) whose lowercased text satisfies
/// `matches`, or `Unknown` when the backend returned a row none of them
/// satisfies
pub(crate) fn attribute_field(song: &SongRef, matches: impl Fn(&str) -> bool) -> Field {
    Field::PRIORITY
        .into_iter()
        .find(|field| {
            song.field_text(*field)
                .map(|text| matches(&text.to_lowercase()))
                .unwrap_or(false)
        })
        .unwrap_or(Field::Unknown)
}

/// Trimmed query containing whitespace between words
fn is_multi_word(query: &str) -> bool {
    query.trim().chars().any(char::is_whitespace)
}
