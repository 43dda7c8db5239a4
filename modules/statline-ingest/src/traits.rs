//! Trait seams between the orchestrator and its collaborators.
//!
//! The orchestrator is polymorphic over these three capabilities and never
//! sees league-specific extraction detail, the storage engine, or the cache
//! backend. Mock implementations in `testing` make the whole pipeline
//! testable with no network, no database, no Docker.

use async_trait::async_trait;

use statline_common::{ExtractError, InvalidateError, League, LoadError, StatRecord};

/// Pulls raw stat records from one league's upstream source.
///
/// One implementation per league. Ordinary transient failures (timeouts,
/// non-2xx, rate limits) come back as typed `ExtractError`s, never panics.
/// Network I/O only; extractors never write to storage.
#[async_trait]
pub trait StatExtractor: Send + Sync {
    fn league(&self) -> League;

    async fn extract(&self) -> Result<Vec<StatRecord>, ExtractError>;
}

/// Upserts extracted records into durable storage.
///
/// Keyed by `(league, external_id)`; running the same extraction twice must
/// leave storage in the same state (no duplicate rows). Returns the number
/// of rows written.
#[async_trait]
pub trait RecordStore: Send + Sync {
    async fn upsert(&self, league: League, records: &[StatRecord]) -> Result<u64, LoadError>;
}

/// Removes the derived cache views for one league so the next read
/// recomputes from fresh data.
#[async_trait]
pub trait CacheInvalidator: Send + Sync {
    async fn invalidate(&self, league: League) -> Result<(), InvalidateError>;
}
