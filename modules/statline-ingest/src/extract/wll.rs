use std::time::Duration;

use async_trait::async_trait;
use chrono::Utc;
use tracing::{info, warn};

use statline_common::{ExtractError, League, StatRecord};

use crate::traits::StatExtractor;

/// Pulls player stat lines from the WLL stats API.
///
/// The WLL endpoint wraps rows in a `data` envelope and does not report
/// points; they are derived from goals and assists.
pub struct WllExtractor {
    client: reqwest::Client,
    stats_url: String,
}

#[derive(Debug, serde::Deserialize)]
struct WllResponse {
    #[serde(default)]
    data: Vec<WllPlayer>,
}

#[derive(Debug, serde::Deserialize)]
struct WllPlayer {
    #[serde(default)]
    player_id: String,
    #[serde(default)]
    display_name: String,
    #[serde(default)]
    team_abbr: String,
    pos: Option<String>,
    #[serde(default)]
    gp: i32,
    #[serde(default)]
    goals: i32,
    #[serde(default)]
    assists: i32,
}

impl WllExtractor {
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
impl StatExtractor for WllExtractor {
    fn league(&self) -> League {
        League::Wll
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

        let data: WllResponse = resp
            .json()
            .await
            .map_err(|e| ExtractError::Malformed(e.to_string()))?;

        let scraped_at = Utc::now();
        let records: Vec<StatRecord> = data
            .data
            .into_iter()
            .filter_map(|p| {
                if p.player_id.is_empty() {
                    warn!(league = "wll", player = %p.display_name, "Skipping row with empty id");
                    return None;
                }
                Some(StatRecord {
                    league: League::Wll,
                    external_id: p.player_id,
                    player_name: p.display_name,
                    team: p.team_abbr,
                    position: p.pos,
                    games_played: p.gp,
                    goals: p.goals,
                    assists: p.assists,
                    points: p.goals + p.assists,
                    scraped_at,
                })
            })
            .collect();

        info!(league = "wll", count = records.len(), "Extraction complete");
        Ok(records)
    }
}
