//! Catalog index backends
//!
//! The search engine never touches storage directly. It asks a
//! [`CatalogIndex`] for candidate songs and does all classification and
//! ranking itself.

use async_trait::async_trait;

use crate::error::IndexError;
use crate::search::SongRef;

pub mod memory;
pub mod sqlite;

pub use memory::MemoryCatalogIndex;
pub use sqlite::SqliteCatalogIndex;

/// Default cap on rows returned by the prefix, substring and phrase queries
pub const DEFAULT_QUERY_LIMIT: usize = 50;

/// Candidate source queried by the search tiers
///
/// All methods receive the trimmed query. Matching is case-insensitive.
#[async_trait]
pub trait CatalogIndex: Send + Sync {
    /// Songs whose title, artist or album begins with `query`
    ///
    /// Word-prefix matching (any word of the field) is acceptable; the
    /// prefix tier credits such rows to `Field::Unknown`.
    async fn search_prefix(&self, query: &str) -> Result<Vec<SongRef>, IndexError>;

    /// Songs whose title, artist or album contains `query` anywhere
    /// (conceptually `LIKE '%query%'`)
    async fn search_substring(&self, query: &str) -> Result<Vec<SongRef>, IndexError>;

    /// Songs containing `query` as a contiguous, word-aligned phrase
    ///
    /// Backends without phrase support return an empty list.
    async fn search_phrase(&self, query: &str) -> Result<Vec<SongRef>, IndexError>;

    /// Up to `limit` songs ordered by descending play count
    async fn top_songs(&self, limit: usize) -> Result<Vec<SongRef>, IndexError>;
}
