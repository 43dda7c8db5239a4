//! Cache invalidation for derived per-league views.
//!
//! Deletes are issued concurrently per key and the call succeeds only if
//! every delete succeeds. A failure here never rolls back loader writes:
//! stale cache outliving fresh data is an accepted, bounded-staleness
//! failure mode corrected by the next scheduled run.

use async_trait::async_trait;
use futures::future::join_all;
use tracing::{info, warn};

use statline_common::{CacheView, InvalidateError, League};
use upstash_client::UpstashClient;

use crate::traits::CacheInvalidator;

pub struct UpstashInvalidator {
    client: UpstashClient,
}

impl UpstashInvalidator {
    pub fn new(client: UpstashClient) -> Self {
        Self { client }
    }
}

#[async_trait]
impl CacheInvalidator for UpstashInvalidator {
    async fn invalidate(&self, league: League) -> Result<(), InvalidateError> {
        let keys: Vec<String> = CacheView::ALL.iter().map(|v| v.key(league)).collect();

        let deletes = keys.iter().map(|key| {
            let client = &self.client;
            async move { (key.clone(), client.del(key).await) }
        });

        let mut first_failure = None;
        for (key, result) in join_all(deletes).await {
            if let Err(e) = result {
                warn!(league = %league, key = %key, error = %e, "Cache delete failed");
                if first_failure.is_none() {
                    first_failure = Some(InvalidateError::Delete {
                        key,
                        message: e.to_string(),
                    });
                }
            }
        }

        if let Some(err) = first_failure {
            return Err(err);
        }

        info!(league = %league, keys = keys.len(), "Cache invalidated");
        Ok(())
    }
}
