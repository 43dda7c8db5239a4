//! Typed errors for each pipeline stage.
//!
//! Extract/load/invalidate errors are per-league and recoverable: the
//! orchestrator records them in the run summary and moves on. Only
//! `ConfigError` is fatal to an invocation.

use thiserror::Error;

use crate::types::League;

/// Malformed static configuration — a deploy-time bug, not a runtime
/// condition to recover from.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid season window for {league}: {reason}")]
    InvalidSeasonWindow { league: League, reason: String },

    #[error("duplicate league in season table: {league}")]
    DuplicateLeague { league: League },

    #[error("no extractor registered for scheduled league: {league}")]
    MissingExtractor { league: League },
}

/// Errors from pulling raw records out of one upstream source.
#[derive(Debug, Error)]
pub enum ExtractError {
    #[error("HTTP error: {0}")]
    Http(String),

    #[error("upstream returned status {code}")]
    Status { code: u16 },

    #[error("upstream request timed out")]
    Timeout,

    #[error("rate limited by upstream")]
    RateLimited,

    #[error("malformed upstream response: {0}")]
    Malformed(String),
}

impl From<reqwest::Error> for ExtractError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            ExtractError::Timeout
        } else if err.is_decode() {
            ExtractError::Malformed(err.to_string())
        } else {
            ExtractError::Http(err.to_string())
        }
    }
}

/// Errors from upserting extracted records into storage.
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),
}

/// Errors from deleting derived cache views.
#[derive(Debug, Error)]
pub enum InvalidateError {
    #[error("cache delete failed for {key}: {message}")]
    Delete { key: String, message: String },
}
