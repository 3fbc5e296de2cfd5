//! Save the three league dashboards as JSON so audits can run offline.
//!
//! Usage: fetch-stats-snapshot [output-dir]

use nba_stats_fetcher::snapshot::write_response;
use nba_stats_fetcher::{FetcherConfig, NbaStatsFetcher, StatsBundle};
use std::path::PathBuf;
use tracing::info;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let out_dir = std::env::args().nth(1).map(PathBuf::from).unwrap_or_else(|| PathBuf::from("."));
    tokio::fs::create_dir_all(&out_dir).await?;

    let config = FetcherConfig::from_env()?;
    info!("Fetching stats snapshot for {} into {}", config.api.season, out_dir.display());
    let fetcher = NbaStatsFetcher::new(config)?;

    let advanced = fetcher.fetch_player_advanced().await?;
    let base = fetcher.fetch_player_base().await?;
    let teams = fetcher.fetch_team_advanced().await?;

    // Parse once so a broken response is caught before it is saved
    let bundle = StatsBundle::from_responses(&advanced, &base, &teams)?;
    info!("Snapshot holds {} players and {} teams", bundle.players.len(), bundle.teams.len());

    write_response(out_dir.join("advanced.json"), &advanced).await?;
    write_response(out_dir.join("base.json"), &base).await?;
    write_response(out_dir.join("teams.json"), &teams).await?;

    Ok(())
}
