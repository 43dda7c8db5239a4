use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use chrono::Utc;
use sqlx::postgres::PgPoolOptions;
use tracing::info;
use tracing_subscriber::EnvFilter;

use statline_common::Config;
use statline_ingest::extract::{NllExtractor, PllExtractor, WllExtractor};
use statline_ingest::invalidate::UpstashInvalidator;
use statline_ingest::loader::{ensure_schema, PgRecordStore};
use statline_ingest::pipeline::Pipeline;
use statline_ingest::traits::StatExtractor;
use upstash_client::UpstashClient;

/// One scheduled pass: invoked by an external cron (hourly in the
/// reference deployment), runs the pipeline once, and exits. Non-zero
/// exit only on config/connect failure.
#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive("statline=info".parse()?))
        .init();

    info!("Statline ingest starting...");

    // Load config
    let config = Config::from_env();
    config.log_redacted();

    // Connect to Postgres
    let pool = PgPoolOptions::new()
        .max_connections(5)
        .connect(&config.database_url)
        .await?;

    // Idempotent schema setup
    ensure_schema(&pool).await?;

    // Build the collaborators
    let extractors: Vec<Arc<dyn StatExtractor>> = vec![
        Arc::new(PllExtractor::new(&config.pll_stats_url)),
        Arc::new(NllExtractor::new(&config.nll_stats_url)),
        Arc::new(WllExtractor::new(&config.wll_stats_url)),
    ];
    let store = Arc::new(PgRecordStore::new(pool));
    let invalidator = Arc::new(UpstashInvalidator::new(UpstashClient::new(
        &config.upstash_url,
        &config.upstash_token,
    )));

    let pipeline = Pipeline::new(
        statline_common::season_table(),
        extractors,
        store,
        invalidator,
        Duration::from_secs(config.run_deadline_secs),
        config.max_concurrent_leagues,
    )?;

    let summary = pipeline.run(Utc::now().date_naive()).await;
    info!(
        succeeded = summary.succeeded(),
        failed = summary.failed(),
        "Statline ingest finished"
    );

    Ok(())
}
