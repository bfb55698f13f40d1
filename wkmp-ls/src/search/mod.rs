//! Tiered song search
//!
//! [`SearchEngine`] runs prefix, substring and fuzzy tiers against a
//! [`CatalogIndex`](crate::index::CatalogIndex), deduplicates by song and
//! ranks the merged results with [`score`].

pub mod edit_distance;
pub mod engine;
pub mod fuzzy;
pub mod merge;
pub mod rank;
pub mod tiers;
pub mod types;

pub use engine::SearchEngine;
pub use rank::score;
pub use types::{Field, MatchType, SearchConfig, SearchResult, SongRef, Tier};
