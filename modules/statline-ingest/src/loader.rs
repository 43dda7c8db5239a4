//! Postgres-backed record store.
//!
//! Partial-batch policy: all-or-nothing per call. Every record in the batch
//! is upserted inside one transaction; any failure rolls the whole batch
//! back and the league's load is reported as failed.

use async_trait::async_trait;
use sqlx::PgPool;
use tracing::info;

use statline_common::{League, LoadError, StatRecord};

use crate::traits::RecordStore;

pub struct PgRecordStore {
    pool: PgPool,
}

impl PgRecordStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

/// Idempotent schema setup, run once at startup.
pub async fn ensure_schema(pool: &PgPool) -> Result<(), LoadError> {
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS player_stats (
            league       TEXT        NOT NULL,
            external_id  TEXT        NOT NULL,
            player_name  TEXT        NOT NULL,
            team         TEXT        NOT NULL,
            position     TEXT,
            games_played INT         NOT NULL DEFAULT 0,
            goals        INT         NOT NULL DEFAULT 0,
            assists      INT         NOT NULL DEFAULT 0,
            points       INT         NOT NULL DEFAULT 0,
            scraped_at   TIMESTAMPTZ NOT NULL,
            PRIMARY KEY (league, external_id)
        )
        "#,
    )
    .execute(pool)
    .await?;
    Ok(())
}

#[async_trait]
impl RecordStore for PgRecordStore {
    async fn upsert(&self, league: League, records: &[StatRecord]) -> Result<u64, LoadError> {
        let mut tx = self.pool.begin().await?;

        for record in records {
            sqlx::query(
                r#"
                INSERT INTO player_stats
                    (league, external_id, player_name, team, position,
                     games_played, goals, assists, points, scraped_at)
                VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)
                ON CONFLICT (league, external_id) DO UPDATE SET
                    player_name  = EXCLUDED.player_name,
                    team         = EXCLUDED.team,
                    position     = EXCLUDED.position,
                    games_played = EXCLUDED.games_played,
                    goals        = EXCLUDED.goals,
                    assists      = EXCLUDED.assists,
                    points       = EXCLUDED.points,
                    scraped_at   = EXCLUDED.scraped_at
                "#,
            )
            .bind(league.code())
            .bind(&record.external_id)
            .bind(&record.player_name)
            .bind(&record.team)
            .bind(&record.position)
            .bind(record.games_played)
            .bind(record.goals)
            .bind(record.assists)
            .bind(record.points)
            .bind(record.scraped_at)
            .execute(&mut *tx)
            .await?;
        }

        tx.commit().await?;

        let written = records.len() as u64;
        info!(league = %league, rows = written, "Records upserted");
        Ok(written)
    }
}
