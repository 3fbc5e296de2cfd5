use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Configuration for the NBA stats fetcher
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FetcherConfig {
    /// Stats API configuration
    pub api: NbaApiConfig,

    /// Retry configuration
    pub retry: RetryConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NbaApiConfig {
    /// Base URL of the stats API
    pub base_url: String,

    /// Season identifier (e.g., "2025-26")
    pub season: String,

    /// "Regular Season", "Playoffs", ...
    pub season_type: String,

    /// "00" is the NBA
    pub league_id: String,

    /// Request timeout in seconds
    pub timeout_secs: u64,

    /// The API refuses requests without a browser-like user agent
    pub user_agent: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RetryConfig {
    /// Maximum number of retries after the first attempt
    pub max_retries: u32,

    /// Initial retry delay in milliseconds
    pub initial_delay_ms: u64,

    /// Maximum retry delay in milliseconds
    pub max_delay_ms: u64,

    /// Backoff multiplier
    pub backoff_multiplier: f64,
}

impl Default for FetcherConfig {
    fn default() -> Self {
        Self {
            api: NbaApiConfig {
                base_url: "https://stats.nba.com/stats".to_string(),
                season: value_engine::DEFAULT_SEASON.to_string(),
                season_type: "Regular Season".to_string(),
                league_id: "00".to_string(),
                timeout_secs: 30,
                user_agent: "Mozilla/5.0 (X11; Linux x86_64) AppleWebKit/537.36 (KHTML, like Gecko) \
                             Chrome/124.0 Safari/537.36"
                    .to_string(),
            },
            retry: RetryConfig::default(),
        }
    }
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self { max_retries: 3, initial_delay_ms: 2_000, max_delay_ms: 30_000, backoff_multiplier: 2.0 }
    }
}

impl FetcherConfig {
    /// Defaults for the given season
    pub fn for_season(season: impl Into<String>) -> Self {
        let mut config = Self::default();
        config.api.season = season.into();
        config
    }

    /// Load configuration from environment variables
    pub fn from_env() -> anyhow::Result<Self> {
        let mut config = Self::default();

        if let Ok(base_url) = std::env::var("NBA_STATS_BASE_URL") {
            config.api.base_url = base_url;
        }

        if let Ok(season) = std::env::var("NBA_STATS_SEASON") {
            config.api.season = season;
        }

        if let Ok(season_type) = std::env::var("NBA_STATS_SEASON_TYPE") {
            config.api.season_type = season_type;
        }

        if let Ok(timeout) = std::env::var("NBA_STATS_TIMEOUT_SECS") {
            config.api.timeout_secs = timeout.parse().unwrap_or(30);
        }

        if let Ok(retries) = std::env::var("NBA_STATS_MAX_RETRIES") {
            config.retry.max_retries = retries.parse().unwrap_or(3);
        }

        Ok(config)
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.api.timeout_secs)
    }
}

impl RetryConfig {
    /// No retries, used by tests and one-shot tools
    pub fn none() -> Self {
        Self { max_retries: 0, ..Self::default() }
    }

    pub fn initial_delay(&self) -> Duration {
        Duration::from_millis(self.initial_delay_ms)
    }

    /// Delay after `delay`, grown by the multiplier and capped
    pub fn next_delay(&self, delay: Duration) -> Duration {
        let grown = delay.as_millis() as f64 * self.backoff_multiplier;
        Duration::from_millis(grown.min(self.max_delay_ms as f64) as u64)
    }
}
