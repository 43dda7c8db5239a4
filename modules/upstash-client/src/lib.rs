pub mod error;

pub use error::{Result, UpstashError};

use std::time::Duration;

use serde::Deserialize;
use tracing::debug;

pub struct UpstashClient {
    client: reqwest::Client,
    base_url: String,
    token: String,
}

#[derive(Debug, Deserialize)]
struct DelResponse {
    /// Number of keys removed. 0 when the key did not exist, which still
    /// counts as a successful delete.
    #[serde(default)]
    result: u64,
}

impl UpstashClient {
    pub fn new(base_url: &str, token: &str) -> Self {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(10))
            .build()
            .expect("Failed to build HTTP client");

        Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            token: token.to_string(),
        }
    }

    /// Delete a key via the Upstash REST `DEL` endpoint. Returns the number
    /// of keys removed (0 or 1).
    pub async fn del(&self, key: &str) -> Result<u64> {
        let endpoint = format!("{}/del/{key}", self.base_url);

        let resp = self
            .client
            .get(&endpoint)
            .bearer_auth(&self.token)
            .send()
            .await?;

        let status = resp.status();
        if !status.is_success() {
            let message = resp.text().await.unwrap_or_default();
            return Err(UpstashError::Api {
                status: status.as_u16(),
                message,
            });
        }

        let data: DelResponse = resp.json().await?;
        debug!(key, removed = data.result, "Upstash DEL");
        Ok(data.result)
    }
}
