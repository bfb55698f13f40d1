//! Tiered search orchestration
//!
//! Tiers run cheapest first and stop as soon as enough unique songs have
//! been found:
//!
//! 1. Prefix (phrase for multi-word queries)
//! 2. Substring, only for queries of 3+ characters
//! 3. Fuzzy, over the most popular songs
//!
//! The merged list is then scored, sorted by score (stable, so equal scores
//! keep discovery order) and cut to `max_results`.

use std::sync::Arc;
use tracing::{debug, warn};

use super::fuzzy::fuzzy_tier;
use super::merge::ResultMerger;
use super::rank::score;
use super::tiers::{prefix_tier, substring_tier};
use super::types::{SearchConfig, SearchResult, Tier};
use crate::error::{IndexError, SearchError};
use crate::index::CatalogIndex;

/// Queries shorter than this (in chars, after trimming) return nothing
pub const MIN_QUERY_CHARS: usize = 2;

/// Queries shorter than this skip the substring tier
pub const MIN_SUBSTRING_QUERY_CHARS: usize = 3;

/// Search engine over one catalog index
///
/// Holds no per-call state, so one engine can serve concurrent searches.
pub struct SearchEngine<I: CatalogIndex + ?Sized> {
    index: Arc<I>,
}

impl<I: CatalogIndex + ?Sized> Clone for SearchEngine<I> {
    fn clone(&self) -> Self {
        Self {
            index: Arc::clone(&self.index),
        }
    }
}

impl<I: CatalogIndex + ?Sized> SearchEngine<I> {
    pub fn new(index: Arc<I>) -> Self {
        Self { index }
    }

    pub fn index(&self) -> &I {
        &self.index
    }

    /// Run a tiered search
    ///
    /// Returns at most `config.max_results` results, best first. Queries
    /// under two characters (after trimming) return an empty list without
    /// touching the index. Any backend failure aborts the search.
    pub async fn search(
        &self,
        query: &str,
        config: &SearchConfig,
    ) -> Result<Vec<SearchResult>, SearchError> {
        let scored = self.search_scored(query, config).await?;
        Ok(scored.into_iter().map(|(result, _)| result).collect())
    }

    /// Same as [`search`](Self::search), keeping each result's score
    pub async fn search_scored(
        &self,
        query: &str,
        config: &SearchConfig,
    ) -> Result<Vec<(SearchResult, f64)>, SearchError> {
        let query = query.trim();
        let query_chars = query.chars().count();
        if query_chars < MIN_QUERY_CHARS {
            debug!(query = %query, "Query too short, skipping search");
            return Ok(Vec::new());
        }

        let mut merger = ResultMerger::new();

        let prefix = prefix_tier(self.index.as_ref(), query)
            .await
            .map_err(|e| backend_error(Tier::Prefix, query, e))?;
        let added = merger.merge(prefix);
        debug!(query = %query, tier = %Tier::Prefix, added, total = merger.len(), "Tier complete");

        if merger.len() < config.min_results {
            if query_chars >= MIN_SUBSTRING_QUERY_CHARS {
                let substring = substring_tier(self.index.as_ref(), query)
                    .await
                    .map_err(|e| backend_error(Tier::Substring, query, e))?;
                let added = merger.merge(substring);
                debug!(query = %query, tier = %Tier::Substring, added, total = merger.len(), "Tier complete");
            } else {
                debug!(query = %query, "Query too short for substring tier");
            }
        }

        if merger.len() < config.min_results {
            let fuzzy = fuzzy_tier(self.index.as_ref(), query, config)
                .await
                .map_err(|e| backend_error(Tier::Fuzzy, query, e))?;
            let added = merger.merge(fuzzy);
            debug!(query = %query, tier = %Tier::Fuzzy, added, total = merger.len(), "Tier complete");
        }

        let mut scored: Vec<(SearchResult, f64)> = merger
            .into_results()
            .into_iter()
            .map(|result| {
                let s = score(&result, query);
                (result, s)
            })
            .collect();

        // sort_by is stable: equal scores keep discovery order
        scored.sort_by(|(_, a), (_, b)| b.total_cmp(a));
        scored.truncate(config.max_results);

        debug!(query = %query, returned = scored.len(), "Search complete");
        Ok(scored)
    }
}

fn backend_error(tier: Tier, query: &str, source: IndexError) -> SearchError {
    warn!(query = %query, tier = %tier, error = %source, "Catalog index query failed");
    SearchError::Backend { tier, source }
}
