//! Song search endpoint

use axum::{
    extract::{Query, State},
    Json,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::debug;
use uuid::Uuid;

use crate::config::MAX_REQUEST_LIMIT;
use crate::error::ApiError;
use crate::search::{Field, MatchType, SearchConfig, SearchResult};
use crate::AppState;

/// Query parameters for song search
///
/// Every tuning parameter falls back to the service defaults.
#[derive(Debug, Default, Deserialize)]
pub struct SearchQuery {
    /// Search text
    pub q: Option<String>,
    pub min_results: Option<usize>,
    pub max_results: Option<usize>,
    pub fuzzy_pool_size: Option<usize>,
    pub fuzzy_max_edit_distance: Option<usize>,
}

impl SearchQuery {
    /// Merge request overrides into `defaults`, rejecting oversized limits
    pub fn to_config(&self, defaults: &SearchConfig) -> Result<SearchConfig, ApiError> {
        let config = SearchConfig {
            min_results: self.min_results.unwrap_or(defaults.min_results),
            max_results: self.max_results.unwrap_or(defaults.max_results),
            fuzzy_pool_size: self.fuzzy_pool_size.unwrap_or(defaults.fuzzy_pool_size),
            fuzzy_max_edit_distance: self
                .fuzzy_max_edit_distance
                .unwrap_or(defaults.fuzzy_max_edit_distance),
        };

        if config.max_results > MAX_REQUEST_LIMIT {
            return Err(ApiError::BadRequest(format!(
                "max_results must be at most {} (got {})",
                MAX_REQUEST_LIMIT, config.max_results
            )));
        }
        if config.fuzzy_pool_size > MAX_REQUEST_LIMIT {
            return Err(ApiError::BadRequest(format!(
                "fuzzy_pool_size must be at most {} (got {})",
                MAX_REQUEST_LIMIT, config.fuzzy_pool_size
            )));
        }

        Ok(config)
    }
}

/// One ranked song
#[derive(Debug, Serialize, Deserialize)]
pub struct SearchHit {
    pub guid: Uuid,
    pub title: Option<String>,
    pub artist: Option<String>,
    pub album: Option<String>,
    pub play_count: i64,
    pub last_played_at: Option<DateTime<Utc>>,
    pub match_type: MatchType,
    pub field: Field,
    pub edit_distance: usize,
    pub score: f64,
}

impl SearchHit {
    pub fn new(result: SearchResult, score: f64) -> Self {
        let SearchResult {
            song,
            match_type,
            field,
            edit_distance,
        } = result;
        Self {
            guid: song.guid,
            title: song.title,
            artist: song.artist,
            album: song.album,
            play_count: song.play_count,
            last_played_at: song.last_played_at,
            match_type,
            field,
            edit_distance,
            score,
        }
    }
}

/// Search response, best match first
#[derive(Debug, Serialize, Deserialize)]
pub struct SearchResponse {
    pub query: String,
    pub total_results: usize,
    pub results: Vec<SearchHit>,
}

impl SearchResponse {
    pub fn new(query: &str, scored: Vec<(SearchResult, f64)>) -> Self {
        let results: Vec<SearchHit> = scored
            .into_iter()
            .map(|(result, score)| SearchHit::new(result, score))
            .collect();
        Self {
            query: query.to_string(),
            total_results: results.len(),
            results,
        }
    }
}

/// GET /api/search?q=beat
pub async fn search_songs(
    State(state): State<AppState>,
    Query(params): Query<SearchQuery>,
) -> Result<Json<SearchResponse>, ApiError> {
    let query = params
        .q
        .as_deref()
        .ok_or_else(|| ApiError::BadRequest("Missing query parameter 'q'".to_string()))?;
    let config = params.to_config(&state.defaults)?;

    let scored = state.engine.search_scored(query, &config).await?;
    debug!(query = %query, count = scored.len(), "Search request served");

    Ok(Json(SearchResponse::new(query, scored)))
}
