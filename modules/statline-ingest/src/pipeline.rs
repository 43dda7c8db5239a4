//! Pipeline orchestrator — the scheduled entry point.
//!
//! One invocation: compute the active league set, run one
//! extract → load → invalidate task per active league concurrently, and
//! collect a run summary. Failure isolation is the core guarantee: one
//! league's failure never cancels or blocks another's task, and the
//! invocation as a whole only fails on config-level errors.

use std::sync::Arc;
use std::time::Duration;

use chrono::{NaiveDate, Utc};
use futures::future::join_all;
use tokio::sync::Semaphore;
use tracing::{info, warn};
use uuid::Uuid;

use statline_common::{ConfigError, League, LeagueSeason};

use crate::season::active_leagues;
use crate::summary::{LeagueResult, RunSummary, Stage, TaskOutcome};
use crate::traits::{CacheInvalidator, RecordStore, StatExtractor};

pub struct Pipeline {
    table: Vec<LeagueSeason>,
    extractors: Vec<Arc<dyn StatExtractor>>,
    store: Arc<dyn RecordStore>,
    invalidator: Arc<dyn CacheInvalidator>,
    /// Per-league deadline within one invocation.
    deadline: Duration,
    /// Defensive cap on concurrent league tasks; the league count is small
    /// and static, so this should never bind in practice.
    semaphore: Arc<Semaphore>,
}

impl Pipeline {
    pub fn new(
        table: Vec<LeagueSeason>,
        extractors: Vec<Arc<dyn StatExtractor>>,
        store: Arc<dyn RecordStore>,
        invalidator: Arc<dyn CacheInvalidator>,
        deadline: Duration,
        max_concurrent: usize,
    ) -> Result<Self, ConfigError> {
        statline_common::leagues::validate_table(&table)?;
        // A scheduled league with no extractor is a deploy-time bug, not a
        // runtime condition: catch it before the first run ever fans out.
        for entry in &table {
            if entry.window.historical {
                continue;
            }
            if !extractors.iter().any(|e| e.league() == entry.league) {
                return Err(ConfigError::MissingExtractor {
                    league: entry.league,
                });
            }
        }
        Ok(Self {
            table,
            extractors,
            store,
            invalidator,
            deadline,
            semaphore: Arc::new(Semaphore::new(max_concurrent.max(1))),
        })
    }

    /// Run one scheduled invocation for the given calendar date.
    ///
    /// Always returns a summary; per-league failures are aggregated, never
    /// re-thrown. A no-op run (nothing in season) is not an error.
    pub async fn run(&self, today: NaiveDate) -> RunSummary {
        let started_at = Utc::now();
        let run_id = Uuid::new_v4().to_string();

        let active = active_leagues(today, &self.table);
        info!(run_id = %run_id, date = %today, active = ?active, "Ingest run starting");

        if active.is_empty() {
            info!(run_id = %run_id, "No leagues in season, nothing to do");
            let summary = RunSummary {
                run_id,
                started_at,
                finished_at: Utc::now(),
                active,
                results: Vec::new(),
            };
            summary.log();
            return summary;
        }

        let tasks = active.iter().map(|&league| {
            let semaphore = Arc::clone(&self.semaphore);
            async move {
                // The deadline covers the whole task, including time spent
                // queued behind the fan-out cap. The pipeline owns the
                // semaphore and never closes it.
                let task = async {
                    let _permit = semaphore
                        .acquire()
                        .await
                        .expect("pipeline semaphore never closes");
                    self.run_league(league).await
                };
                let outcome = match tokio::time::timeout(self.deadline, task).await {
                    Ok(outcome) => outcome,
                    Err(_) => {
                        warn!(league = %league, deadline_secs = self.deadline.as_secs(),
                            "League task hit run deadline");
                        TaskOutcome::TimedOut
                    }
                };
                LeagueResult { league, outcome }
            }
        });

        let results = join_all(tasks).await;

        let summary = RunSummary {
            run_id,
            started_at,
            finished_at: Utc::now(),
            active,
            results,
        };
        summary.log();
        summary
    }

    /// Extract → load → invalidate for one league, strictly sequential.
    /// Each stage failure short-circuits the later stages for this league
    /// only.
    async fn run_league(&self, league: League) -> TaskOutcome {
        let Some(extractor) = self
            .extractors
            .iter()
            .find(|e| e.league() == league)
        else {
            warn!(league = %league, "No extractor registered for active league");
            return TaskOutcome::Failed {
                stage: Stage::Extract,
                error: "no extractor registered".to_string(),
            };
        };

        let records = match extractor.extract().await {
            Ok(records) => records,
            Err(e) => {
                warn!(league = %league, error = %e, "Extract failed");
                return TaskOutcome::Failed {
                    stage: Stage::Extract,
                    error: e.to_string(),
                };
            }
        };

        let written = match self.store.upsert(league, &records).await {
            Ok(written) => written,
            Err(e) => {
                warn!(league = %league, error = %e, "Load failed");
                return TaskOutcome::Failed {
                    stage: Stage::Load,
                    error: e.to_string(),
                };
            }
        };

        if let Err(e) = self.invalidator.invalidate(league).await {
            // Data landed; only the cache is stale until the next run.
            warn!(league = %league, error = %e, "Invalidate failed, cache is stale");
            return TaskOutcome::Failed {
                stage: Stage::Invalidate,
                error: e.to_string(),
            };
        }

        TaskOutcome::Succeeded { records: written }
    }
}
