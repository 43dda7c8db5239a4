//! Run summary — the aggregated outcome of one scheduled invocation.
//!
//! Exists only for the duration of the run: it is logged (structured
//! fields plus a JSON document) and then discarded. No cross-run state.

use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::info;

use statline_common::League;

/// The pipeline stage a league task failed at. Remediation differs per
/// stage, so the summary keeps them distinct: a failed invalidate means the
/// data landed and only the cache is stale.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Stage {
    Extract,
    Load,
    Invalidate,
}

impl std::fmt::Display for Stage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Stage::Extract => write!(f, "extract"),
            Stage::Load => write!(f, "load"),
            Stage::Invalidate => write!(f, "invalidate"),
        }
    }
}

/// Outcome of one league's extract → load → invalidate task.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum TaskOutcome {
    Succeeded { records: u64 },
    Failed { stage: Stage, error: String },
    TimedOut,
}

impl TaskOutcome {
    pub fn is_success(&self) -> bool {
        matches!(self, TaskOutcome::Succeeded { .. })
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct LeagueResult {
    pub league: League,
    #[serde(flatten)]
    pub outcome: TaskOutcome,
}

#[derive(Debug, Clone, Serialize)]
pub struct RunSummary {
    pub run_id: String,
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
    /// Leagues considered active this run, in table order.
    pub active: Vec<League>,
    pub results: Vec<LeagueResult>,
}

impl RunSummary {
    pub fn succeeded(&self) -> usize {
        self.results.iter().filter(|r| r.outcome.is_success()).count()
    }

    pub fn failed(&self) -> usize {
        self.results.len() - self.succeeded()
    }

    pub fn elapsed_ms(&self) -> i64 {
        (self.finished_at - self.started_at).num_milliseconds()
    }

    /// Log the summary: one structured line plus the serialized document.
    pub fn log(&self) {
        info!(
            run_id = %self.run_id,
            active = self.active.len(),
            succeeded = self.succeeded(),
            failed = self.failed(),
            elapsed_ms = self.elapsed_ms(),
            "Ingest run complete"
        );
        match serde_json::to_string(self) {
            Ok(doc) => info!(run_id = %self.run_id, summary = %doc, "Run summary"),
            Err(e) => tracing::warn!(error = %e, "Failed to serialize run summary"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn counts_split_success_and_failure() {
        let now = Utc::now();
        let summary = RunSummary {
            run_id: "test".into(),
            started_at: now,
            finished_at: now,
            active: vec![League::Pll, League::Nll],
            results: vec![
                LeagueResult {
                    league: League::Pll,
                    outcome: TaskOutcome::Succeeded { records: 3 },
                },
                LeagueResult {
                    league: League::Nll,
                    outcome: TaskOutcome::Failed {
                        stage: Stage::Extract,
                        error: "upstream request timed out".into(),
                    },
                },
            ],
        };
        assert_eq!(summary.succeeded(), 1);
        assert_eq!(summary.failed(), 1);
    }

    #[test]
    fn timed_out_counts_as_failure() {
        let now = Utc::now();
        let summary = RunSummary {
            run_id: "test".into(),
            started_at: now,
            finished_at: now,
            active: vec![League::Pll],
            results: vec![LeagueResult {
                league: League::Pll,
                outcome: TaskOutcome::TimedOut,
            }],
        };
        assert_eq!(summary.succeeded(), 0);
        assert_eq!(summary.failed(), 1);
    }

    #[test]
    fn summary_serializes_with_stage_detail() {
        let now = Utc::now();
        let summary = RunSummary {
            run_id: "test".into(),
            started_at: now,
            finished_at: now,
            active: vec![League::Nll],
            results: vec![LeagueResult {
                league: League::Nll,
                outcome: TaskOutcome::Failed {
                    stage: Stage::Invalidate,
                    error: "cache delete failed".into(),
                },
            }],
        };
        let doc = serde_json::to_value(&summary).unwrap();
        assert_eq!(doc["results"][0]["outcome"], "failed");
        assert_eq!(doc["results"][0]["stage"], "invalidate");
    }
}
