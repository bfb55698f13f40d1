//! Cross-tier result accumulation
//!
//! Results are kept in discovery order. A song seen once keeps the match
//! classification of the tier that found it first; tiers run from highest
//! to lowest fidelity, so that is also its best classification.

use std::collections::HashSet;
use uuid::Uuid;

use super::types::SearchResult;

#[derive(Debug, Default)]
pub struct ResultMerger {
    results: Vec<SearchResult>,
    seen: HashSet<Uuid>,
}

impl ResultMerger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append results for songs not seen yet; returns how many were added
    pub fn merge(&mut self, incoming: Vec<SearchResult>) -> usize {
        let before = self.results.len();
        for result in incoming {
            if self.seen.insert(result.identity()) {
                self.results.push(result);
            }
        }
        self.results.len() - before
    }

    /// Number of unique songs accumulated so far
    pub fn len(&self) -> usize {
        self.results.len()
    }

    pub fn is_empty(&self) -> bool {
        self.results.is_empty()
    }

    /// Accumulated results in discovery order
    pub fn into_results(self) -> Vec<SearchResult> {
        self.results
    }
}
