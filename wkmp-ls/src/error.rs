//! Error types for wkmp-ls

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

use crate::search::Tier;

/// Catalog index backend failure
#[derive(Debug, Error)]
pub enum IndexError {
    /// SQLite query failed
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Stored row could not be mapped to a song
    #[error("Corrupt catalog row: {0}")]
    CorruptRow(String),

    /// Backend cannot serve queries right now
    #[error("Index unavailable: {0}")]
    Unavailable(String),
}

/// Search failure
///
/// A failed backend call aborts the whole search. Returning the results of
/// earlier tiers (or escalating as if the tier found nothing) would make the
/// result count, and therefore the escalation decision, silently wrong.
#[derive(Debug, Error)]
pub enum SearchError {
    #[error("{tier} tier failed: {source}")]
    Backend {
        tier: Tier,
        #[source]
        source: IndexError,
    },
}

impl SearchError {
    pub fn tier(&self) -> Tier {
        match self {
            SearchError::Backend { tier, .. } => *tier,
        }
    }
}

/// HTTP API error type
#[derive(Debug, Error)]
pub enum ApiError {
    /// Invalid request parameter (400)
    #[error("Invalid request: {0}")]
    BadRequest(String),

    /// Search engine failure (500)
    #[error(transparent)]
    Search(#[from] SearchError),

    /// Anything else (500)
    #[error("Internal server error: {0}")]
    Internal(String),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, error_code) = match &self {
            ApiError::BadRequest(_) => (StatusCode::BAD_REQUEST, "BAD_REQUEST"),
            ApiError::Search(_) => (StatusCode::INTERNAL_SERVER_ERROR, "SEARCH_FAILED"),
            ApiError::Internal(_) => (StatusCode::INTERNAL_SERVER_ERROR, "INTERNAL_ERROR"),
        };

        let body = Json(json!({
            "error": {
                "code": error_code,
                "message": self.to_string(),
            }
        }));

        (status, body).into_response()
    }
}
