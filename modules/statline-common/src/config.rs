use std::env;

/// Application configuration loaded from environment variables.
#[derive(Debug, Clone)]
pub struct Config {
    // Postgres
    pub database_url: String,

    // Upstash Redis REST cache
    pub upstash_url: String,
    pub upstash_token: String,

    // Upstream stat endpoints (overridable for staging/fixtures)
    pub pll_stats_url: String,
    pub nll_stats_url: String,
    pub wll_stats_url: String,

    // Orchestration
    /// Per-league deadline within one scheduled invocation, seconds.
    pub run_deadline_secs: u64,
    /// Defensive cap on concurrent league tasks.
    pub max_concurrent_leagues: usize,
}

impl Config {
    /// Load configuration from environment variables.
    /// Panics with a clear message if required vars are missing.
    pub fn from_env() -> Self {
        Self {
            database_url: required_env("DATABASE_URL"),
            upstash_url: required_env("UPSTASH_REDIS_REST_URL"),
            upstash_token: required_env("UPSTASH_REDIS_REST_TOKEN"),
            pll_stats_url: env::var("PLL_STATS_URL")
                .unwrap_or_else(|_| "https://stats.premierlacrosse.com/api/players".to_string()),
            nll_stats_url: env::var("NLL_STATS_URL")
                .unwrap_or_else(|_| "https://api.nll.com/v2/stats/players".to_string()),
            wll_stats_url: env::var("WLL_STATS_URL")
                .unwrap_or_else(|_| "https://stats.wll.com/api/players".to_string()),
            run_deadline_secs: env::var("RUN_DEADLINE_SECS")
                .unwrap_or_else(|_| "300".to_string())
                .parse()
                .expect("RUN_DEADLINE_SECS must be a number"),
            max_concurrent_leagues: env::var("MAX_CONCURRENT_LEAGUES")
                .unwrap_or_else(|_| "4".to_string())
                .parse()
                .expect("MAX_CONCURRENT_LEAGUES must be a number"),
        }
    }

    /// Log the loaded config with secrets redacted to a short preview.
    pub fn log_redacted(&self) {
        tracing::info!("Config loaded:");
        tracing::info!("  DATABASE_URL: {}", preview(&self.database_url));
        tracing::info!("  UPSTASH_REDIS_REST_URL: {}", self.upstash_url);
        tracing::info!("  UPSTASH_REDIS_REST_TOKEN: {}", preview(&self.upstash_token));
        tracing::info!("  RUN_DEADLINE_SECS: {}", self.run_deadline_secs);
        tracing::info!("  MAX_CONCURRENT_LEAGUES: {}", self.max_concurrent_leagues);
    }
}

fn required_env(key: &str) -> String {
    env::var(key).unwrap_or_else(|_| panic!("{key} environment variable is required"))
}

/// First few characters of a secret plus its length. Counts characters,
/// not bytes, so multibyte values cannot split a code point.
fn preview(val: &str) -> String {
    let prefix: String = val.chars().take(5).collect();
    format!("{prefix}...({} chars)", val.chars().count())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn preview_truncates_to_five_chars() {
        assert_eq!(preview("supersecretvalue"), "super...(16 chars)");
        assert_eq!(preview("abc"), "abc...(3 chars)");
    }

    #[test]
    fn preview_handles_multibyte_values() {
        // Each char below is multiple bytes; a byte-offset slice would panic.
        assert_eq!(preview("pässwörd"), "pässw...(8 chars)");
        assert_eq!(preview("日本語トークン"), "日本語トー...(7 chars)");
    }
}
