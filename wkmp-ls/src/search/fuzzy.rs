//! Tier 3: typo-tolerant matching over the most popular songs
//!
//! Fuzzy matching is too expensive to run over the whole catalog, so it only
//! looks at the `fuzzy_pool_size` most played songs.

use tracing::debug;

use super::edit_distance::{bounded_levenshtein, DISTANCE_EXCEEDED};
use super::types::{Field, SearchConfig, SearchResult, SongRef};
use crate::error::IndexError;
use crate::index::CatalogIndex;

/// Tier 3: keep pool songs with a field within `fuzzy_max_edit_distance`
pub async fn fuzzy_tier<I>(
    index: &I,
    query: &str,
    config: &SearchConfig,
) -> Result<Vec<SearchResult>, IndexError>
where
    I: CatalogIndex + ?Sized,
{
    let candidates = index.top_songs(config.fuzzy_pool_size).await?;
    let matcher = FuzzyMatcher::new(query, config.fuzzy_max_edit_distance);

    debug!(
        query = %query,
        pool = candidates.len(),
        max_edit_distance = config.fuzzy_max_edit_distance,
        "Fuzzy pool loaded"
    );

    Ok(candidates
        .into_iter()
        .filter_map(|song| {
            let (field, distance) = matcher.best_field(&song)?;
            Some(SearchResult::fuzzy(song, field, distance))
        })
        .collect())
}

/// Pre-normalized query plus the distance bound
struct FuzzyMatcher {
    query: String,
    /// Query words joined by single spaces, compared against word windows
    query_words: String,
    word_count: usize,
    max_distance: usize,
}

impl FuzzyMatcher {
    fn new(query: &str, max_distance: usize) -> Self {
        let query = query.to_lowercase();
        let words: Vec<&str> = query.split_whitespace().collect();
        let word_count = words.len();
        let query_words = words.join(" ");
        Self {
            query,
            query_words,
            word_count,
            max_distance,
        }
    }

    /// Field with the smallest distance within the bound
    ///
    /// Ties go to the earlier field in title, artist, album order. A missing
    /// field never matches.
    fn best_field(&self, song: &SongRef) -> Option<(Field, usize)> {
        let mut best: Option<(Field, usize)> = None;
        for field in Field::PRIORITY {
            let distance = song
                .field_text(field)
                .map(|text| self.field_distance(&text.to_lowercase()))
                .unwrap_or(DISTANCE_EXCEEDED);

            if distance > self.max_distance {
                continue;
            }
            match best {
                Some((_, best_distance)) if best_distance <= distance => {}
                _ => best = Some((field, distance)),
            }
        }
        best
    }

    /// Distance to the whole field, or to the closest run of consecutive
    /// words with the same word count as the query
    ///
    /// Returns [`DISTANCE_EXCEEDED`] when nothing is within the bound.
    fn field_distance(&self, text: &str) -> usize {
        let whole = bounded_levenshtein(&self.query, text, self.max_distance);
        if whole == 0 || self.word_count == 0 {
            return whole;
        }

        let words: Vec<&str> = text.split_whitespace().collect();
        if words.len() <= self.word_count {
            return whole;
        }

        words
            .windows(self.word_count)
            .map(|window| bounded_levenshtein(&self.query_words, &window.join(" "), self.max_distance))
            .fold(whole, usize::min)
    }
}
