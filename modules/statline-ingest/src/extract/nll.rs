use std::time::Duration;

use async_trait::async_trait;
use chrono::Utc;
use tracing::{info, warn};

use statline_common::{ExtractError, League, StatRecord};

use crate::traits::StatExtractor;

/// Pulls player stat lines from the NLL stats feed.
///
/// The NLL feed is a flat array and splits goals into the record itself;
/// points are derived when the feed omits them.
pub struct NllExtractor {
    client: reqwest::Client,
    stats_url: String,
}

#[derive(Debug, serde::Deserialize)]
struct NllPlayer {
    #[serde(default)]
    player_id: String,
    #[serde(default)]
    full_name: String,
    #[serde(default)]
    team_code: String,
    position: Option<String>,
    #[serde(default)]
    gp: i32,
    #[serde(default)]
    g: i32,
    #[serde(default)]
    a: i32,
    pts: Option<i32>,
}

impl NllExtractor {
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
impl StatExtractor for NllExtractor {
    fn league(&self) -> League {
        League::Nll
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

        let data: Vec<NllPlayer> = resp
            .json()
            .await
            .map_err(|e| ExtractError::Malformed(e.to_string()))?;

        let scraped_at = Utc::now();
        let records: Vec<StatRecord> = data
            .into_iter()
            .filter_map(|p| {
                if p.player_id.is_empty() {
                    warn!(league = "nll", player = %p.full_name, "Skipping row with empty id");
                    return None;
                }
                let points = p.pts.unwrap_or(p.g + p.a);
                Some(StatRecord {
                    league: League::Nll,
                    external_id: p.player_id,
                    player_name: p.full_name,
                    team: p.team_code,
                    position: p.position,
                    games_played: p.gp,
                    goals: p.g,
                    assists: p.a,
                    points,
                    scraped_at,
                })
            })
            .collect();

        info!(league = "nll", count = records.len(), "Extraction complete");
        Ok(records)
    }
}
