//! Search data model
//!
//! Everything here is created per search call and dropped when the result
//! list is returned.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// Read-only projection of one catalog track
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SongRef {
    /// Stable song identity
    pub guid: Uuid,
    /// Display name
    pub title: Option<String>,
    /// Primary (album) artist label
    pub artist: Option<String>,
    pub album: Option<String>,
    /// Popularity counter
    pub play_count: i64,
    pub last_played_at: Option<DateTime<Utc>>,
}

impl SongRef {
    /// Text of the given field, if the song has one
    pub fn field_text(&self, field: Field) -> Option<&str> {
        match field {
            Field::SongName => self.title.as_deref(),
            Field::Artist => self.artist.as_deref(),
            Field::Album => self.album.as_deref(),
            Field::Unknown => None,
        }
    }
}

/// How a result was found, highest fidelity first
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchType {
    Exact,
    Prefix,
    Phrase,
    Substring,
    Fuzzy,
}

/// Which song attribute satisfied the match
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Field {
    SongName,
    Artist,
    Album,
    /// The backend matched but no single field can be credited
    Unknown,
}

impl Field {
    /// Attribution order used by every tier: name, then artist, then album
    pub const PRIORITY: [Field; 3] = [Field::SongName, Field::Artist, Field::Album];
}

/// One matched song plus how it matched
///
/// `PartialEq` is structural. Deduplication uses [`SearchResult::same_song`].
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SearchResult {
    pub song: SongRef,
    pub match_type: MatchType,
    pub field: Field,
    /// Non-zero only for `MatchType::Fuzzy`
    pub edit_distance: usize,
}

impl SearchResult {
    pub fn new(song: SongRef, match_type: MatchType, field: Field) -> Self {
        Self {
            song,
            match_type,
            field,
            edit_distance: 0,
        }
    }

    pub fn fuzzy(song: SongRef, field: Field, edit_distance: usize) -> Self {
        Self {
            song,
            match_type: MatchType::Fuzzy,
            field,
            edit_distance,
        }
    }

    /// Deduplication key: the underlying song, never the match metadata
    pub fn identity(&self) -> Uuid {
        self.song.guid
    }

    /// Identity comparison: true when both results refer to the same song,
    /// whatever their match metadata
    pub fn same_song(&self, other: &SearchResult) -> bool {
        self.identity() == other.identity()
    }
}

/// Caller-supplied search tuning
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchConfig {
    /// Escalate to the next tier while fewer unique results than this exist
    pub min_results: usize,
    /// Output cap
    pub max_results: usize,
    /// Top-popularity candidates considered by the fuzzy tier
    pub fuzzy_pool_size: usize,
    pub fuzzy_max_edit_distance: usize,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            min_results: 10,
            max_results: 50,
            fuzzy_pool_size: 100,
            fuzzy_max_edit_distance: 2,
        }
    }
}

/// Search strategy, in escalation order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Tier {
    Prefix,
    Substring,
    Fuzzy,
}

impl fmt::Display for Tier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Tier::Prefix => "prefix",
            Tier::Substring => "substring",
            Tier::Fuzzy => "fuzzy",
        };
        f.write_str(name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn song(title: &str) -> SongRef {
        SongRef {
            guid: Uuid::new_v4(),
            title: Some(title.to_string()),
            artist: None,
            album: None,
            play_count: 0,
            last_played_at: None,
        }
    }

    #[test]
    fn test_match_type_fidelity_order() {
        assert!(MatchType::Exact < MatchType::Prefix);
        assert!(MatchType::Prefix < MatchType::Phrase);
        assert!(MatchType::Phrase < MatchType::Substring);
        assert!(MatchType::Substring < MatchType::Fuzzy);
    }

    #[test]
    fn test_same_song_ignores_match_metadata() {
        let s = song("Beat It");
        let a = SearchResult::new(s.clone(), MatchType::Prefix, Field::SongName);
        let b = SearchResult::fuzzy(s, Field::Artist, 2);

        assert!(a.same_song(&b));
        assert_ne!(a, b, "structural equality still sees the difference");
    }

    #[test]
    fn test_different_songs_same_metadata() {
        let a = SearchResult::new(song("Beat It"), MatchType::Prefix, Field::SongName);
        let b = SearchResult::new(song("Beat It"), MatchType::Prefix, Field::SongName);
        assert!(!a.same_song(&b));
    }

    #[test]
    fn test_config_defaults() {
        let config = SearchConfig::default();
        assert_eq!(config.min_results, 10);
        assert_eq!(config.max_results, 50);
        assert_eq!(config.fuzzy_pool_size, 100);
        assert_eq!(config.fuzzy_max_edit_distance, 2);
    }

    #[test]
    fn test_config_partial_toml() {
        let config: SearchConfig = toml::from_str("min_results = 3").unwrap();
        assert_eq!(config.min_results, 3);
        assert_eq!(config.max_results, 50);
    }

    #[test]
    fn test_field_text() {
        let mut s = song("Darkness");
        s.album = Some("Dark Side of the Moon".to_string());
        assert_eq!(s.field_text(Field::SongName), Some("Darkness"));
        assert_eq!(s.field_text(Field::Album), Some("Dark Side of the Moon"));
        assert_eq!(s.field_text(Field::Artist), None);
        assert_eq!(s.field_text(Field::Unknown), None);
    }
}
