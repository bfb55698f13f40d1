//! Composite rank score
//!
//! Sum of seven signals, in descending weight:
//! 1. Match type: exact(1000) > prefix(900) > phrase(850) > substring(700) > fuzzy(500)
//! 2. Field priority: song name(100) > artist(80) > album(60) > unknown(0)
//! 3. Match position: earlier occurrence of the query in the field (0-50)
//! 4. Popularity: play count / 10, capped at 50
//! 5. Recency: 25 if the song was ever played
//! 6. Edit distance penalty: -10 per edit
//! 7. Length penalty: shorter matched fields score higher (0-20)

use super::types::{Field, MatchType, SearchResult};

const POSITION_WEIGHT: f64 = 50.0;
const POPULARITY_CAP: f64 = 50.0;
const RECENCY_BONUS: f64 = 25.0;
const EDIT_PENALTY: f64 = 10.0;
const LENGTH_WEIGHT: f64 = 20.0;
/// Field length assumed when the matched field is unknown or missing
const FALLBACK_FIELD_LENGTH: usize = 100;

/// Score one result against the normalized (trimmed) query
pub fn score(result: &SearchResult, normalized_query: &str) -> f64 {
    let field_text = result.song.field_text(result.field);

    match_type_weight(result.match_type)
        + field_weight(result.field)
        + position_score(field_text, normalized_query)
        + popularity_score(result.song.play_count)
        + recency_score(result)
        - EDIT_PENALTY * result.edit_distance as f64
        + length_score(field_text)
}

fn match_type_weight(match_type: MatchType) -> f64 {
    match match_type {
        MatchType::Exact => 1000.0,
        MatchType::Prefix => 900.0,
        MatchType::Phrase => 850.0,
        MatchType::Substring => 700.0,
        MatchType::Fuzzy => 500.0,
    }
}

fn field_weight(field: Field) -> f64 {
    match field {
        Field::SongName => 100.0,
        Field::Artist => 80.0,
        Field::Album => 60.0,
        Field::Unknown => 0.0,
    }
}

/// `50 * (1 - position / length)`, 0 when the query does not occur in the field
fn position_score(field_text: Option<&str>, query: &str) -> f64 {
    let Some(text) = field_text else {
        return 0.0;
    };
    let haystack = text.to_lowercase();
    let needle = query.to_lowercase();

    let Some(byte_pos) = haystack.find(&needle) else {
        return 0.0;
    };

    // Positions and lengths are in chars, not bytes
    let position = haystack[..byte_pos].chars().count();
    let length = haystack.chars().count().max(1);
    POSITION_WEIGHT * (1.0 - position as f64 / length as f64)
}

fn popularity_score(play_count: i64) -> f64 {
    (play_count.max(0) as f64 / 10.0).min(POPULARITY_CAP)
}

fn recency_score(result: &SearchResult) -> f64 {
    if result.song.last_played_at.is_some() {
        RECENCY_BONUS
    } else {
        0.0
    }
}

/// `20 * (1 - length / 100)`, kept within 0-20 for fields longer than 100
fn length_score(field_text: Option<&str>) -> f64 {
    let length = field_text
        .map(|text| text.chars().count())
        .unwrap_or(FALLBACK_FIELD_LENGTH);
    (LENGTH_WEIGHT * (1.0 - length as f64 / 100.0)).clamp(0.0, LENGTH_WEIGHT)
}
