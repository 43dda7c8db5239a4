//! In-memory fakes for the pipeline trait seams.
//!
//! Deterministic tests with no network and no database: extractors are
//! scripted, the store is a hash map, the invalidator records calls.

use std::collections::HashMap;
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;
use chrono::Utc;

use statline_common::{ExtractError, InvalidateError, League, LoadError, StatRecord};

use crate::traits::{CacheInvalidator, RecordStore, StatExtractor};

pub fn record(league: League, external_id: &str, player_name: &str) -> StatRecord {
    StatRecord {
        league,
        external_id: external_id.to_string(),
        player_name: player_name.to_string(),
        team: "TST".to_string(),
        position: None,
        games_played: 10,
        goals: 20,
        assists: 15,
        points: 35,
        scraped_at: Utc::now(),
    }
}

// ---------------------------------------------------------------------------
// MockExtractor
// ---------------------------------------------------------------------------

enum Script {
    Records(Vec<StatRecord>),
    FailTimeout,
}

pub struct MockExtractor {
    league: League,
    script: Script,
    delay: Duration,
    calls: AtomicU32,
}

impl MockExtractor {
    pub fn ok(league: League, records: Vec<StatRecord>) -> Self {
        Self {
            league,
            script: Script::Records(records),
            delay: Duration::ZERO,
            calls: AtomicU32::new(0),
        }
    }

    pub fn ok_after(league: League, records: Vec<StatRecord>, delay: Duration) -> Self {
        Self {
            league,
            script: Script::Records(records),
            delay,
            calls: AtomicU32::new(0),
        }
    }

    pub fn failing(league: League) -> Self {
        Self {
            league,
            script: Script::FailTimeout,
            delay: Duration::ZERO,
            calls: AtomicU32::new(0),
        }
    }

    pub fn call_count(&self) -> u32 {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl StatExtractor for MockExtractor {
    fn league(&self) -> League {
        self.league
    }

    async fn extract(&self) -> Result<Vec<StatRecord>, ExtractError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if !self.delay.is_zero() {
            tokio::time::sleep(self.delay).await;
        }
        match &self.script {
            Script::Records(records) => Ok(records.clone()),
            Script::FailTimeout => Err(ExtractError::Timeout),
        }
    }
}

// ---------------------------------------------------------------------------
// MemoryRecordStore
// ---------------------------------------------------------------------------

#[derive(Default)]
pub struct MemoryRecordStore {
    rows: Mutex<HashMap<(League, String), StatRecord>>,
    calls: Mutex<Vec<League>>,
    fail_for: Mutex<Vec<League>>,
}

impl MemoryRecordStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make `upsert` fail for this league with a closed-pool error.
    pub fn fail_for(&self, league: League) {
        self.fail_for.lock().unwrap().push(league);
    }

    pub fn rows_for(&self, league: League) -> Vec<StatRecord> {
        let rows = self.rows.lock().unwrap();
        let mut out: Vec<StatRecord> = rows
            .iter()
            .filter(|((l, _), _)| *l == league)
            .map(|(_, r)| r.clone())
            .collect();
        out.sort_by(|a, b| a.external_id.cmp(&b.external_id));
        out
    }

    pub fn upsert_calls(&self) -> Vec<League> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl RecordStore for MemoryRecordStore {
    async fn upsert(&self, league: League, records: &[StatRecord]) -> Result<u64, LoadError> {
        self.calls.lock().unwrap().push(league);
        if self.fail_for.lock().unwrap().contains(&league) {
            return Err(LoadError::Database(sqlx::Error::PoolClosed));
        }
        let mut rows = self.rows.lock().unwrap();
        for record in records {
            rows.insert((league, record.external_id.clone()), record.clone());
        }
        Ok(records.len() as u64)
    }
}

// ---------------------------------------------------------------------------
// MockInvalidator
// ---------------------------------------------------------------------------

#[derive(Default)]
pub struct MockInvalidator {
    calls: Mutex<Vec<League>>,
    fail_for: Mutex<Vec<League>>,
}

impl MockInvalidator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn fail_for(&self, league: League) {
        self.fail_for.lock().unwrap().push(league);
    }

    pub fn calls(&self) -> Vec<League> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl CacheInvalidator for MockInvalidator {
    async fn invalidate(&self, league: League) -> Result<(), InvalidateError> {
        self.calls.lock().unwrap().push(league);
        if self.fail_for.lock().unwrap().contains(&league) {
            return Err(InvalidateError::Delete {
                key: format!("leaderboard:{league}"),
                message: "connection refused".to_string(),
            });
        }
        Ok(())
    }
}
