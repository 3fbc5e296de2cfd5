use crate::config::FetcherConfig;
use crate::models::*;
use crate::retry::run_with_retry;
use anyhow::{Context, Result};
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, ACCEPT_LANGUAGE, ORIGIN, REFERER, USER_AGENT};
use reqwest::Client;
use tracing::info;

pub const PLAYER_DASHBOARD: &str = "leaguedashplayerstats";
pub const TEAM_DASHBOARD: &str = "leaguedashteamstats";

/// Dashboard flavours the audit pulls
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MeasureType {
    Base,
    Advanced,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PerMode {
    PerGame,
    Totals,
}

impl MeasureType {
    fn as_str(self) -> &'static str {
        match self {
            MeasureType::Base => "Base",
            MeasureType::Advanced => "Advanced",
        }
    }
}

impl PerMode {
    fn as_str(self) -> &'static str {
        match self {
            PerMode::PerGame => "PerGame",
            PerMode::Totals => "Totals",
        }
    }
}

/// Client for the stats.nba.com league dashboards
pub struct NbaStatsFetcher {
    config: FetcherConfig,
    client: Client,
}

impl NbaStatsFetcher {
    /// Create a new fetcher instance
    pub fn new(config: FetcherConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(config.timeout())
            .default_headers(browser_headers(&config.api.user_agent)?)
            .build()
            .context("Failed to create HTTP client")?;

        Ok(Self { config, client })
    }

    pub fn config(&self) -> &FetcherConfig {
        &self.config
    }

    /// Query parameters for a league dashboard; the API rejects requests
    /// that leave any of these out, even when empty.
    pub fn dashboard_params(&self, measure_type: MeasureType, per_mode: PerMode) -> Vec<(&'static str, String)> {
        let api = &self.config.api;
        let mut params: Vec<(&'static str, String)> = [
            ("College", ""),
            ("Conference", ""),
            ("Country", ""),
            ("DateFrom", ""),
            ("DateTo", ""),
            ("Division", ""),
            ("DraftPick", ""),
            ("DraftYear", ""),
            ("GameScope", ""),
            ("GameSegment", ""),
            ("Height", ""),
            ("LastNGames", "0"),
            ("Location", ""),
            ("Month", "0"),
            ("OpponentTeamID", "0"),
            ("Outcome", ""),
            ("PORound", "0"),
            ("PaceAdjust", "N"),
            ("Period", "0"),
            ("PlayerExperience", ""),
            ("PlayerPosition", ""),
            ("PlusMinus", "N"),
            ("Rank", "N"),
            ("SeasonSegment", ""),
            ("ShotClockRange", ""),
            ("StarterBench", ""),
            ("TeamID", "0"),
            ("TwoWay", "0"),
            ("VsConference", ""),
            ("VsDivision", ""),
            ("Weight", ""),
        ]
        .into_iter()
        .map(|(key, value)| (key, value.to_string()))
        .collect();

        params.push(("LeagueID", api.league_id.clone()));
        params.push(("MeasureType", measure_type.as_str().to_string()));
        params.push(("PerMode", per_mode.as_str().to_string()));
        params.push(("Season", api.season.clone()));
        params.push(("SeasonType", api.season_type.clone()));
        params
    }

    pub fn endpoint_url(&self, endpoint: &str) -> String {
        format!("{}/{}", self.config.api.base_url.trim_end_matches('/'), endpoint)
    }

    async fn get_once(&self, endpoint: &str, params: &[(&'static str, String)]) -> Result<StatsResponse> {
        let url = self.endpoint_url(endpoint);
        let response = self
            .client
            .get(&url)
            .query(params)
            .send()
            .await
            .with_context(|| format!("Failed to fetch {}", endpoint))?;

        if !response.status().is_success() {
            anyhow::bail!("API request to {} failed with status: {}", endpoint, response.status());
        }

        response
            .json()
            .await
            .with_context(|| format!("Failed to parse {} JSON", endpoint))
    }

    /// Fetch one dashboard, retrying transient failures
    pub async fn fetch_dashboard(
        &self,
        endpoint: &str,
        measure_type: MeasureType,
        per_mode: PerMode,
    ) -> Result<StatsResponse> {
        let params = self.dashboard_params(measure_type, per_mode);
        info!(
            "Fetching {} ({}, {}) for {}",
            endpoint,
            measure_type.as_str(),
            per_mode.as_str(),
            self.config.api.season
        );

        let response = run_with_retry(|| self.get_once(endpoint, &params), &self.config.retry).await?;
        let rows: usize = response.result_sets.iter().map(ResultSet::len).sum();
        info!("Successfully fetched {} rows from {}", rows, endpoint);
        Ok(response)
    }

    /// Advanced per-game player dashboard
    pub async fn fetch_player_advanced(&self) -> Result<StatsResponse> {
        self.fetch_dashboard(PLAYER_DASHBOARD, MeasureType::Advanced, PerMode::PerGame).await
    }

    /// Base season-total player dashboard, source of three-point volume
    pub async fn fetch_player_base(&self) -> Result<StatsResponse> {
        self.fetch_dashboard(PLAYER_DASHBOARD, MeasureType::Base, PerMode::Totals).await
    }

    pub async fn fetch_team_advanced(&self) -> Result<StatsResponse> {
        self.fetch_dashboard(TEAM_DASHBOARD, MeasureType::Advanced, PerMode::PerGame).await
    }

    /// Fetch and parse everything the audit needs
    pub async fn fetch_all(&self) -> Result<StatsBundle> {
        let advanced = self.fetch_player_advanced().await?;
        let base = self.fetch_player_base().await?;
        let teams = self.fetch_team_advanced().await?;
        StatsBundle::from_responses(&advanced, &base, &teams)
    }
}

fn browser_headers(user_agent: &str) -> Result<HeaderMap> {
    let mut headers = HeaderMap::new();
    headers.insert(USER_AGENT, HeaderValue::from_str(user_agent).context("Invalid user agent")?);
    headers.insert(ACCEPT, HeaderValue::from_static("application/json, text/plain, */*"));
    headers.insert(ACCEPT_LANGUAGE, HeaderValue::from_static("en-US,en;q=0.9"));
    headers.insert(REFERER, HeaderValue::from_static("https://www.nba.com/"));
    headers.insert(ORIGIN, HeaderValue::from_static("https://www.nba.com"));
    headers.insert("x-nba-stats-origin", HeaderValue::from_static("stats"));
    headers.insert("x-nba-stats-token", HeaderValue::from_static("true"));
    Ok(headers)
}
