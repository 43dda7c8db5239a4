use std::time::Duration;

use async_trait::async_trait;
use chrono::Utc;
use tracing::{info, warn};

use statline_common::{ExtractError, League, StatRecord};

use crate::traits::StatExtractor;

/// Pulls player stat lines from the PLL stats API.
pub struct PllExtractor {
    client: reqwest::Client,
    stats_url: String,
}

#[derive(Debug, serde::Deserialize)]
struct PllResponse {
    #[serde(default)]
    players: Vec<PllPlayer>,
}

#[derive(Debug, serde::Deserialize)]
struct PllPlayer {
    #[serde(default)]
    id: String,
    #[serde(default)]
    name: String,
    #[serde(default)]
    team: String,
    position: Option<String>,
    #[serde(default)]
    games_played: i32,
    #[serde(default)]
    goals: i32,
    #[serde(default)]
    assists: i32,
    #[serde(default)]
    points: i32,
}

impl PllExtractor {
    pub fn new(stats_url: &str) -> Self {
        Self {
            client: reqwest::Client::builder()
                .timeout(Duration::from_secs(30))
                .build()
                .expect("Failed to build HTTP client"),
            stats_url: stats_url.to_string(),
        }
    }
}

#[async_trait]
impl StatExtractor for PllExtractor {
    fn league(&self) -> League {
        League::Pll
    }

    async fn extract(&self) -> Result<Vec<StatRecord>, ExtractError> {
        info!(league = %self.league(), url = %self.stats_url, "Extracting player stats");

        let resp = self.client.get(&self.stats_url).send().await?;

        let status = resp.status();
        if status.as_u16() == 429 {
            return Err(ExtractError::RateLimited);
        }
        if !status.is_success() {
            return Err(ExtractError::Status {
                code: status.as_u16(),
            });
        }

        let data: PllResponse = resp
            .json()
            .await
            .map_err(|e| ExtractError::Malformed(e.to_string()))?;

        let scraped_at = Utc::now();
        let records: Vec<StatRecord> = data
            .players
            .into_iter()
            .filter_map(|p| {
                // Rows without a stable upstream id cannot be upserted.
                if p.id.is_empty() {
                    warn!(league = "pll", player = %p.name, "Skipping row with empty id");
                    return None;
                }
                Some(StatRecord {
                    league: League::Pll,
                    external_id: p.id,
                    player_name: p.name,
                    team: p.team,
                    position: p.position,
                    games_played: p.games_played,
                    goals: p.goals,
                    assists: p.assists,
                    points: p.points,
                    scraped_at,
                })
            })
            .collect();

        info!(league = "pll", count = records.len(), "Extraction complete");
        Ok(records)
    }
}
