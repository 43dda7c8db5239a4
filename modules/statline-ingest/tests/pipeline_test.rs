//! Orchestrator integration tests against in-memory fakes.
//!
//! No network, no database: extractors are scripted, the store is a hash
//! map, the invalidator records calls.

use std::sync::Arc;
use std::time::{Duration, Instant};

use chrono::NaiveDate;

use statline_common::{ConfigError, League, LeagueSeason, MonthDay, SeasonWindow};
use statline_ingest::pipeline::Pipeline;
use statline_ingest::summary::{Stage, TaskOutcome};
use statline_ingest::testing::{record, MemoryRecordStore, MockExtractor, MockInvalidator};
use statline_ingest::traits::StatExtractor;

const DEADLINE: Duration = Duration::from_secs(5);

fn july_10() -> NaiveDate {
    NaiveDate::from_ymd_opt(2025, 7, 10).unwrap()
}

/// A table where every non-historical league is in season in July.
fn summer_table(leagues: &[League]) -> Vec<LeagueSeason> {
    leagues
        .iter()
        .map(|&league| LeagueSeason {
            league,
            window: SeasonWindow::new(MonthDay::new(6, 1), MonthDay::new(9, 15)),
        })
        .collect()
}

fn pipeline(
    table: Vec<LeagueSeason>,
    extractors: Vec<Arc<dyn StatExtractor>>,
    store: Arc<MemoryRecordStore>,
    invalidator: Arc<MockInvalidator>,
) -> Pipeline {
    Pipeline::new(table, extractors, store, invalidator, DEADLINE, 4)
        .expect("valid test table")
}

fn outcome_for(summary: &statline_ingest::summary::RunSummary, league: League) -> &TaskOutcome {
    &summary
        .results
        .iter()
        .find(|r| r.league == league)
        .expect("league in results")
        .outcome
}

// ---------------------------------------------------------------------------
// Failure isolation
// ---------------------------------------------------------------------------

#[tokio::test]
async fn extract_failure_is_isolated_and_skips_later_stages() {
    let store = Arc::new(MemoryRecordStore::new());
    let invalidator = Arc::new(MockInvalidator::new());

    let extractors: Vec<Arc<dyn StatExtractor>> = vec![
        Arc::new(MockExtractor::ok(
            League::Pll,
            vec![record(League::Pll, "p1", "Pat Kavanagh")],
        )),
        Arc::new(MockExtractor::failing(League::Nll)),
        Arc::new(MockExtractor::ok(
            League::Wll,
            vec![record(League::Wll, "w1", "Charlotte North")],
        )),
    ];

    let p = pipeline(
        summer_table(&[League::Pll, League::Nll, League::Wll]),
        extractors,
        Arc::clone(&store),
        Arc::clone(&invalidator),
    );
    let summary = p.run(july_10()).await;

    assert_eq!(summary.succeeded(), 2);
    assert_eq!(summary.failed(), 1);
    assert!(matches!(
        outcome_for(&summary, League::Nll),
        TaskOutcome::Failed {
            stage: Stage::Extract,
            ..
        }
    ));

    // Loader and invalidator never ran for the failed league.
    assert!(!store.upsert_calls().contains(&League::Nll));
    assert!(!invalidator.calls().contains(&League::Nll));
    assert!(store.rows_for(League::Nll).is_empty());
}

#[tokio::test]
async fn load_failure_skips_invalidate() {
    let store = Arc::new(MemoryRecordStore::new());
    store.fail_for(League::Pll);
    let invalidator = Arc::new(MockInvalidator::new());

    let extractors: Vec<Arc<dyn StatExtractor>> = vec![Arc::new(MockExtractor::ok(
        League::Pll,
        vec![record(League::Pll, "p1", "Pat Kavanagh")],
    ))];

    let p = pipeline(
        summer_table(&[League::Pll]),
        extractors,
        Arc::clone(&store),
        Arc::clone(&invalidator),
    );
    let summary = p.run(july_10()).await;

    assert!(matches!(
        outcome_for(&summary, League::Pll),
        TaskOutcome::Failed {
            stage: Stage::Load,
            ..
        }
    ));
    assert!(invalidator.calls().is_empty());
}

#[tokio::test]
async fn invalidate_failure_is_distinct_and_data_stays_loaded() {
    let store = Arc::new(MemoryRecordStore::new());
    let invalidator = Arc::new(MockInvalidator::new());
    invalidator.fail_for(League::Pll);

    let extractors: Vec<Arc<dyn StatExtractor>> = vec![Arc::new(MockExtractor::ok(
        League::Pll,
        vec![
            record(League::Pll, "p1", "Pat Kavanagh"),
            record(League::Pll, "p2", "Jeff Teat"),
        ],
    ))];

    let p = pipeline(
        summer_table(&[League::Pll]),
        extractors,
        Arc::clone(&store),
        Arc::clone(&invalidator),
    );
    let summary = p.run(july_10()).await;

    // Failed at invalidate, not extract/load — remediation differs.
    assert!(matches!(
        outcome_for(&summary, League::Pll),
        TaskOutcome::Failed {
            stage: Stage::Invalidate,
            ..
        }
    ));
    // The freshly loaded records are still in storage.
    assert_eq!(store.rows_for(League::Pll).len(), 2);
}

// ---------------------------------------------------------------------------
// Idempotence
// ---------------------------------------------------------------------------

#[tokio::test]
async fn repeated_runs_on_identical_data_leave_store_unchanged() {
    let store = Arc::new(MemoryRecordStore::new());
    let invalidator = Arc::new(MockInvalidator::new());

    let records = vec![
        record(League::Pll, "p1", "Pat Kavanagh"),
        record(League::Pll, "p2", "Jeff Teat"),
        record(League::Pll, "p3", "Brennan O'Neill"),
    ];
    let extractors: Vec<Arc<dyn StatExtractor>> =
        vec![Arc::new(MockExtractor::ok(League::Pll, records))];

    let p = pipeline(
        summer_table(&[League::Pll]),
        extractors,
        Arc::clone(&store),
        Arc::clone(&invalidator),
    );

    p.run(july_10()).await;
    let first = store.rows_for(League::Pll);
    p.run(july_10()).await;
    let second = store.rows_for(League::Pll);

    assert_eq!(first.len(), 3);
    assert_eq!(first, second, "second run must not duplicate or alter rows");
}

// ---------------------------------------------------------------------------
// Concurrency
// ---------------------------------------------------------------------------

#[tokio::test]
async fn league_tasks_run_concurrently_not_sequentially() {
    let store = Arc::new(MemoryRecordStore::new());
    let invalidator = Arc::new(MockInvalidator::new());

    let delay = Duration::from_millis(200);
    let extractors: Vec<Arc<dyn StatExtractor>> = vec![
        Arc::new(MockExtractor::failing(League::Pll)),
        Arc::new(MockExtractor::ok_after(
            League::Nll,
            vec![record(League::Nll, "n1", "Dhane Smith")],
            delay,
        )),
        Arc::new(MockExtractor::ok_after(
            League::Wll,
            vec![record(League::Wll, "w1", "Charlotte North")],
            delay,
        )),
    ];

    let p = pipeline(
        summer_table(&[League::Pll, League::Nll, League::Wll]),
        extractors,
        Arc::clone(&store),
        Arc::clone(&invalidator),
    );

    let started = Instant::now();
    let summary = p.run(july_10()).await;
    let elapsed = started.elapsed();

    assert_eq!(summary.succeeded(), 2);
    assert_eq!(summary.failed(), 1);
    // Sequential execution would take >= 2 * delay.
    assert!(
        elapsed < delay * 2,
        "tasks ran sequentially: {elapsed:?} for delay {delay:?}"
    );
}

#[tokio::test]
async fn deadline_expiry_records_timed_out_without_failing_the_run() {
    let store = Arc::new(MemoryRecordStore::new());
    let invalidator = Arc::new(MockInvalidator::new());

    let extractors: Vec<Arc<dyn StatExtractor>> = vec![
        Arc::new(MockExtractor::ok_after(
            League::Pll,
            vec![record(League::Pll, "p1", "Pat Kavanagh")],
            Duration::from_secs(60),
        )),
        Arc::new(MockExtractor::ok(
            League::Nll,
            vec![record(League::Nll, "n1", "Dhane Smith")],
        )),
    ];

    let p = Pipeline::new(
        summer_table(&[League::Pll, League::Nll]),
        extractors,
        Arc::clone(&store) as _,
        Arc::clone(&invalidator) as _,
        Duration::from_millis(50),
        4,
    )
    .expect("valid test table");

    let summary = p.run(july_10()).await;

    assert!(matches!(
        outcome_for(&summary, League::Pll),
        TaskOutcome::TimedOut
    ));
    assert!(outcome_for(&summary, League::Nll).is_success());
}

#[tokio::test]
async fn queue_wait_behind_the_cap_counts_against_the_deadline() {
    let store = Arc::new(MemoryRecordStore::new());
    let invalidator = Arc::new(MockInvalidator::new());

    // Cap of 1 serializes the two tasks. Each extract takes 200ms, so the
    // queued task cannot finish inside the 300ms deadline; if queue time
    // were excluded, both would succeed.
    let delay = Duration::from_millis(200);
    let extractors: Vec<Arc<dyn StatExtractor>> = vec![
        Arc::new(MockExtractor::ok_after(
            League::Pll,
            vec![record(League::Pll, "p1", "Pat Kavanagh")],
            delay,
        )),
        Arc::new(MockExtractor::ok_after(
            League::Nll,
            vec![record(League::Nll, "n1", "Dhane Smith")],
            delay,
        )),
    ];

    let p = Pipeline::new(
        summer_table(&[League::Pll, League::Nll]),
        extractors,
        Arc::clone(&store) as _,
        Arc::clone(&invalidator) as _,
        Duration::from_millis(300),
        1,
    )
    .expect("valid test table");

    let summary = p.run(july_10()).await;

    assert_eq!(summary.succeeded(), 1);
    assert_eq!(summary.failed(), 1);
    assert!(summary
        .results
        .iter()
        .any(|r| matches!(r.outcome, TaskOutcome::TimedOut)));
}

// ---------------------------------------------------------------------------
// Active-set behavior
// ---------------------------------------------------------------------------

#[tokio::test]
async fn off_season_run_is_an_empty_noop() {
    let store = Arc::new(MemoryRecordStore::new());
    let invalidator = Arc::new(MockInvalidator::new());

    let extractor = Arc::new(MockExtractor::ok(
        League::Nll,
        vec![record(League::Nll, "n1", "Dhane Smith")],
    ));
    let extractors: Vec<Arc<dyn StatExtractor>> = vec![Arc::clone(&extractor) as _];

    // NLL winter window: nothing active on July 10.
    let table = vec![LeagueSeason {
        league: League::Nll,
        window: SeasonWindow::new(MonthDay::new(12, 1), MonthDay::new(5, 15)),
    }];

    let p = pipeline(table, extractors, Arc::clone(&store), Arc::clone(&invalidator));
    let summary = p.run(july_10()).await;

    assert!(summary.active.is_empty());
    assert!(summary.results.is_empty());
    assert_eq!(extractor.call_count(), 0);
    assert!(store.upsert_calls().is_empty());
}

#[tokio::test]
async fn end_to_end_scenario_pll_in_july() {
    // {PLL: Jun 1–Sep 15, NLL: Dec 1–May 15 (wrapping), MLL: historical}
    let table = vec![
        LeagueSeason {
            league: League::Pll,
            window: SeasonWindow::new(MonthDay::new(6, 1), MonthDay::new(9, 15)),
        },
        LeagueSeason {
            league: League::Nll,
            window: SeasonWindow::new(MonthDay::new(12, 1), MonthDay::new(5, 15)),
        },
        LeagueSeason {
            league: League::Mll,
            window: SeasonWindow::historical(),
        },
    ];

    let store = Arc::new(MemoryRecordStore::new());
    let invalidator = Arc::new(MockInvalidator::new());
    let extractors: Vec<Arc<dyn StatExtractor>> = vec![
        Arc::new(MockExtractor::ok(
            League::Pll,
            vec![
                record(League::Pll, "p1", "Pat Kavanagh"),
                record(League::Pll, "p2", "Jeff Teat"),
                record(League::Pll, "p3", "Brennan O'Neill"),
            ],
        )),
        Arc::new(MockExtractor::ok(
            League::Nll,
            vec![record(League::Nll, "n1", "Dhane Smith")],
        )),
    ];

    let p = pipeline(table, extractors, Arc::clone(&store), Arc::clone(&invalidator));
    let summary = p.run(july_10()).await;

    assert_eq!(summary.active, vec![League::Pll]);
    assert_eq!(summary.succeeded(), 1);
    assert_eq!(summary.failed(), 0);
    assert!(matches!(
        outcome_for(&summary, League::Pll),
        TaskOutcome::Succeeded { records: 3 }
    ));
    assert_eq!(store.rows_for(League::Pll).len(), 3);
    assert_eq!(invalidator.calls(), vec![League::Pll]);
}

#[test]
fn missing_extractor_for_scheduled_league_is_a_config_error() {
    let result = Pipeline::new(
        summer_table(&[League::Pll]),
        Vec::new(),
        Arc::new(MemoryRecordStore::new()),
        Arc::new(MockInvalidator::new()),
        DEADLINE,
        4,
    );
    assert!(matches!(
        result,
        Err(ConfigError::MissingExtractor {
            league: League::Pll
        })
    ));
}

#[test]
fn historical_league_needs_no_extractor() {
    let table = vec![LeagueSeason {
        league: League::Mll,
        window: SeasonWindow::historical(),
    }];
    let result = Pipeline::new(
        table,
        Vec::new(),
        Arc::new(MemoryRecordStore::new()),
        Arc::new(MockInvalidator::new()),
        DEADLINE,
        4,
    );
    assert!(result.is_ok());
}
