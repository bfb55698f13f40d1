//! Search engine integration tests
//!
//! Tests cover:
//! - Tier escalation and its short-query rules
//! - Deduplication across tiers
//! - Ranking, truncation and determinism
//! - Backend failures

use async_trait::async_trait;
use std::sync::{Arc, Mutex};
use uuid::Uuid;
use wkmp_ls::error::{IndexError, SearchError};
use wkmp_ls::index::{CatalogIndex, MemoryCatalogIndex};
use wkmp_ls::search::{score, Field, MatchType, SearchConfig, SearchEngine, SongRef, Tier};

// =============================================================================
// Test backends
// =============================================================================

/// Backend call, as seen by the test
#[derive(Debug, Clone, PartialEq)]
enum Call {
    Prefix(String),
    Substring(String),
    Phrase(String),
    TopSongs(usize),
}

/// Returns canned candidate lists and records every call
#[derive(Default)]
struct ScriptedIndex {
    prefix: Vec<SongRef>,
    substring: Vec<SongRef>,
    phrase: Vec<SongRef>,
    top: Vec<SongRef>,
    /// Tier whose backend call fails
    fail_on: Option<Tier>,
    calls: Mutex<Vec<Call>>,
}

impl ScriptedIndex {
    fn calls(&self) -> Vec<Call> {
        self.calls.lock().unwrap().clone()
    }

    fn record(&self, call: Call) {
        self.calls.lock().unwrap().push(call);
    }

    fn fail_if(&self, tier: Tier) -> Result<(), IndexError> {
        if self.fail_on == Some(tier) {
            return Err(IndexError::Unavailable(format!("{} backend down", tier)));
        }
        Ok(())
    }
}

#[async_trait]
impl CatalogIndex for ScriptedIndex {
    async fn search_prefix(&self, query: &str) -> Result<Vec<SongRef>, IndexError> {
        self.record(Call::Prefix(query.to_string()));
        self.fail_if(Tier::Prefix)?;
        Ok(self.prefix.clone())
    }

    async fn search_substring(&self, query: &str) -> Result<Vec<SongRef>, IndexError> {
        self.record(Call::Substring(query.to_string()));
        self.fail_if(Tier::Substring)?;
        Ok(self.substring.clone())
    }

    async fn search_phrase(&self, query: &str) -> Result<Vec<SongRef>, IndexError> {
        self.record(Call::Phrase(query.to_string()));
        self.fail_if(Tier::Prefix)?;
        Ok(self.phrase.clone())
    }

    async fn top_songs(&self, limit: usize) -> Result<Vec<SongRef>, IndexError> {
        self.record(Call::TopSongs(limit));
        self.fail_if(Tier::Fuzzy)?;
        Ok(self.top.iter().take(limit).cloned().collect())
    }
}

fn song(title: &str, artist: &str, album: &str, play_count: i64) -> SongRef {
    SongRef {
        guid: Uuid::new_v4(),
        title: Some(title.to_string()),
        artist: Some(artist.to_string()),
        album: Some(album.to_string()),
        play_count,
        last_played_at: None,
    }
}

fn scripted_engine(index: ScriptedIndex) -> (Arc<ScriptedIndex>, SearchEngine<ScriptedIndex>) {
    let index = Arc::new(index);
    (Arc::clone(&index), SearchEngine::new(index))
}

// =============================================================================
// Literal scenarios
// =============================================================================

#[tokio::test]
async fn test_prefix_hits_ranked_by_field_fit() {
    // Same play count for all three; the shorter matching title wins and a
    // row with no field starting with the query ranks last
    let anthology = song("Beatles Anthology", "The Beatles", "Anthology 1", 0);
    let beat_it = song("Beat It", "Michael Jackson", "Thriller", 0);
    let beautiful = song("Beautiful Day", "U2", "All That You Can't Leave Behind", 0);

    let (index, engine) = scripted_engine(ScriptedIndex {
        prefix: vec![anthology.clone(), beat_it.clone(), beautiful.clone()],
        ..Default::default()
    });
    let config = SearchConfig {
        min_results: 3,
        ..SearchConfig::default()
    };

    let results = engine.search("beat", &config).await.unwrap();

    assert_eq!(results.len(), 3);
    assert!(results.iter().all(|r| r.match_type == MatchType::Prefix));
    // "Beautiful Day" does not start with "beat": attribution finds no field
    assert_eq!(results[0].song.guid, beat_it.guid);
    assert_eq!(results[1].song.guid, anthology.guid);
    assert_eq!(results[2].song.guid, beautiful.guid);
    assert_eq!(results[2].field, Field::Unknown);

    // Tier 1 satisfied min_results: nothing else ran
    assert_eq!(index.calls(), vec![Call::Prefix("beat".to_string())]);
}

#[tokio::test]
async fn test_equal_scores_keep_discovery_order() {
    let first = song("Beat One", "x", "y", 0);
    let second = song("Beat Two", "x", "y", 0);
    let third = song("Beat Six", "x", "y", 0);

    let (_, engine) = scripted_engine(ScriptedIndex {
        prefix: vec![first.clone(), second.clone(), third.clone()],
        ..Default::default()
    });
    let config = SearchConfig {
        min_results: 1,
        ..SearchConfig::default()
    };

    let results = engine.search("beat", &config).await.unwrap();
    let guids: Vec<Uuid> = results.iter().map(|r| r.song.guid).collect();
    assert_eq!(guids, vec![first.guid, second.guid, third.guid]);
}

#[tokio::test]
async fn test_phrase_match_for_multi_word_query() {
    let engine = SearchEngine::new(Arc::new(MemoryCatalogIndex::new(vec![
        song("Time", "Pink Floyd", "Dark Side of the Moon", 40),
        song("Darkness", "Someone", "Other", 10),
    ])));
    let config = SearchConfig {
        min_results: 1,
        ..SearchConfig::default()
    };

    let results = engine.search("dark side", &config).await.unwrap();

    assert_eq!(results.len(), 1);
    assert_eq!(results[0].match_type, MatchType::Phrase);
    assert_eq!(results[0].field, Field::Unknown);
    assert_eq!(results[0].song.album.as_deref(), Some("Dark Side of the Moon"));
}

#[tokio::test]
async fn test_nothing_found_runs_every_tier() {
    let catalog = vec![
        song("Paranoid", "Black Sabbath", "Paranoid", 3),
        song("Yesterday", "The Beatles", "Help!", 2),
        song("Hurt", "Johnny Cash", "American IV", 1),
    ];
    let (index, engine) = scripted_engine(ScriptedIndex {
        top: catalog,
        ..Default::default()
    });

    let results = engine.search("zzqq", &SearchConfig::default()).await.unwrap();

    assert!(results.is_empty());
    assert_eq!(
        index.calls(),
        vec![
            Call::Prefix("zzqq".to_string()),
            Call::Substring("zzqq".to_string()),
            Call::TopSongs(100),
        ]
    );
}

#[tokio::test]
async fn test_typo_found_by_fuzzy_tier() {
    let engine = SearchEngine::new(Arc::new(MemoryCatalogIndex::new(vec![
        song("Beatles Greatest Hits", "Various", "Compilation", 900),
        song("Paranoid", "Black Sabbath", "Paranoid", 50),
    ])));

    let scored = engine
        .search_scored("beatels", &SearchConfig::default())
        .await
        .unwrap();

    assert_eq!(scored.len(), 1);
    let (result, result_score) = &scored[0];
    assert_eq!(result.match_type, MatchType::Fuzzy);
    assert_eq!(result.field, Field::SongName);
    assert_eq!(result.edit_distance, 2);

    // 500 + 100 - 20 (two edits) + 50 (capped popularity) + length bonus
    let expected = 500.0 + 100.0 - 20.0 + 50.0 + 20.0 * (1.0 - 21.0 / 100.0);
    assert!((result_score - expected).abs() < 1e-9);
}

#[tokio::test]
async fn test_single_char_query_never_hits_backend() {
    let (index, engine) = scripted_engine(ScriptedIndex {
        prefix: vec![song("A", "B", "C", 0)],
        ..Default::default()
    });

    let results = engine.search("a", &SearchConfig::default()).await.unwrap();

    assert!(results.is_empty());
    assert!(index.calls().is_empty());
}

// =============================================================================
// Escalation
// =============================================================================

#[tokio::test]
async fn test_two_char_query_skips_substring_tier() {
    let (index, engine) = scripted_engine(ScriptedIndex::default());

    engine.search("be", &SearchConfig::default()).await.unwrap();

    assert_eq!(
        index.calls(),
        vec![Call::Prefix("be".to_string()), Call::TopSongs(100)]
    );
}

#[tokio::test]
async fn test_substring_satisfies_min_results_skips_fuzzy() {
    let (index, engine) = scripted_engine(ScriptedIndex {
        prefix: vec![song("Moonlight", "x", "y", 0)],
        substring: vec![song("Blue Moon", "x", "y", 0)],
        ..Default::default()
    });
    let config = SearchConfig {
        min_results: 2,
        ..SearchConfig::default()
    };

    let results = engine.search("moon", &config).await.unwrap();

    assert_eq!(results.len(), 2);
    assert_eq!(
        index.calls(),
        vec![
            Call::Prefix("moon".to_string()),
            Call::Substring("moon".to_string())
        ]
    );
}

#[tokio::test]
async fn test_query_is_trimmed_before_backend_calls() {
    let (index, engine) = scripted_engine(ScriptedIndex::default());

    engine.search("  moon \t", &SearchConfig::default()).await.unwrap();

    assert_eq!(index.calls()[0], Call::Prefix("moon".to_string()));
}

#[tokio::test]
async fn test_multi_word_query_tries_phrase_then_prefix() {
    let (index, engine) = scripted_engine(ScriptedIndex::default());
    let config = SearchConfig {
        min_results: 0,
        ..SearchConfig::default()
    };

    engine.search("dark side", &config).await.unwrap();

    assert_eq!(
        index.calls(),
        vec![
            Call::Phrase("dark side".to_string()),
            Call::Prefix("dark side".to_string())
        ]
    );
}

#[tokio::test]
async fn test_pool_size_passed_to_backend() {
    let (index, engine) = scripted_engine(ScriptedIndex::default());
    let config = SearchConfig {
        fuzzy_pool_size: 7,
        ..SearchConfig::default()
    };

    engine.search("zzqq", &config).await.unwrap();

    assert_eq!(index.calls().last(), Some(&Call::TopSongs(7)));
}

// =============================================================================
// Deduplication and ranking
// =============================================================================

#[tokio::test]
async fn test_song_found_by_several_tiers_appears_once() {
    let beatles = song("Here Comes the Sun", "The Beatles", "Abbey Road", 10);
    let (_, engine) = scripted_engine(ScriptedIndex {
        prefix: vec![beatles.clone()],
        substring: vec![beatles.clone()],
        top: vec![beatles.clone()],
        ..Default::default()
    });

    let results = engine.search("the beatles", &SearchConfig::default()).await.unwrap();

    assert_eq!(results.len(), 1);
    // First (highest fidelity) classification wins
    assert_eq!(results[0].match_type, MatchType::Prefix);
    assert_eq!(results[0].field, Field::Artist);
}

#[tokio::test]
async fn test_scores_non_increasing_and_bounded() {
    let catalog: Vec<SongRef> = (0..30)
        .map(|i| song(&format!("Love Song {i}"), "Various", "Hits", i * 7))
        .chain((0..30).map(|i| song("Glove", &format!("Band {i}"), "Gloves", i)))
        .collect();
    let engine = SearchEngine::new(Arc::new(MemoryCatalogIndex::new(catalog)));
    let config = SearchConfig {
        min_results: 100,
        max_results: 25,
        ..SearchConfig::default()
    };

    let scored = engine.search_scored("love", &config).await.unwrap();

    assert_eq!(scored.len(), 25);
    assert!(scored.windows(2).all(|w| w[0].1 >= w[1].1));
    for (result, result_score) in &scored {
        assert_eq!(*result_score, score(result, "love"));
    }
}

#[tokio::test]
async fn test_fuzzy_results_respect_edit_bound() {
    let catalog = vec![
        song("Beatles", "a", "b", 10),
        song("Beetles", "a", "b", 9),
        song("Bagels", "a", "b", 8),
        song("Battles", "a", "b", 7),
    ];
    let engine = SearchEngine::new(Arc::new(MemoryCatalogIndex::new(catalog)));

    for max in 0..=3 {
        let config = SearchConfig {
            fuzzy_max_edit_distance: max,
            ..SearchConfig::default()
        };
        let results = engine.search("beatels", &config).await.unwrap();
        assert!(results
            .iter()
            .filter(|r| r.match_type == MatchType::Fuzzy)
            .all(|r| r.edit_distance <= max));
    }
}

#[tokio::test]
async fn test_search_is_deterministic() {
    let catalog: Vec<SongRef> = ["Beat It", "Beat Street", "Heartbeat", "Upbeat", "Beta Band"]
        .iter()
        .enumerate()
        .map(|(i, title)| song(title, "Artist", "Album", (i as i64 % 2) * 10))
        .collect();
    let engine = SearchEngine::new(Arc::new(MemoryCatalogIndex::new(catalog)));
    let config = SearchConfig::default();

    let first = engine.search("beat", &config).await.unwrap();
    let second = engine.search("beat", &config).await.unwrap();

    assert_eq!(first, second);
}

#[tokio::test]
async fn test_engine_shared_behind_trait_object() {
    let index: Arc<dyn CatalogIndex> = Arc::new(MemoryCatalogIndex::new(vec![song(
        "Beat It",
        "Michael Jackson",
        "Thriller",
        5,
    )]));
    let engine: SearchEngine<dyn CatalogIndex> = SearchEngine::new(index);

    let handles: Vec<_> = (0..4)
        .map(|_| {
            let engine = engine.clone();
            tokio::spawn(async move { engine.search("beat", &SearchConfig::default()).await })
        })
        .collect();

    for handle in handles {
        let results = handle.await.unwrap().unwrap();
        assert_eq!(results.len(), 1);
    }
}

// =============================================================================
// Backend failures
// =============================================================================

#[tokio::test]
async fn test_prefix_failure_aborts_search() {
    let (index, engine) = scripted_engine(ScriptedIndex {
        fail_on: Some(Tier::Prefix),
        ..Default::default()
    });

    let err = engine.search("beat", &SearchConfig::default()).await.unwrap_err();

    assert_eq!(err.tier(), Tier::Prefix);
    assert!(matches!(
        err,
        SearchError::Backend {
            source: IndexError::Unavailable(_),
            ..
        }
    ));
    // No escalation after a failure
    assert_eq!(index.calls(), vec![Call::Prefix("beat".to_string())]);
}

#[tokio::test]
async fn test_fuzzy_failure_discards_earlier_results() {
    let (_, engine) = scripted_engine(ScriptedIndex {
        prefix: vec![song("Beat It", "x", "y", 0)],
        fail_on: Some(Tier::Fuzzy),
        ..Default::default()
    });

    let err = engine.search("beat", &SearchConfig::default()).await.unwrap_err();

    assert_eq!(err.tier(), Tier::Fuzzy);
    assert_eq!(err.to_string(), "fuzzy tier failed: Index unavailable: fuzzy backend down");
}

#[tokio::test]
async fn test_substring_failure_reports_tier() {
    let (_, engine) = scripted_engine(ScriptedIndex {
        fail_on: Some(Tier::Substring),
        ..Default::default()
    });

    let err = engine.search("moon", &SearchConfig::default()).await.unwrap_err();
    assert_eq!(err.tier(), Tier::Substring);
}
