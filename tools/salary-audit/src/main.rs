//! Salary Audit CLI
//!
//! Loads a salary sheet, pulls league statistics (live or from saved
//! snapshots), and prints the five contract-value tables.

mod report;

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use nba_stats_fetcher::{load_salaries, load_snapshot, FetcherConfig, NbaStatsFetcher, StatsBundle};
use std::path::PathBuf;
use tracing::info;
use tracing_subscriber::EnvFilter;
use value_engine::{AuditConfig, AuditEngine};

#[derive(Parser)]
#[command(name = "salary-audit")]
#[command(about = "Audit NBA contracts against on-court value")]
#[command(version = "0.1.0")]
struct Cli {
    /// Salary sheet (CSV export with a Player column and a season salary column)
    #[arg(long)]
    salaries: PathBuf,

    /// TOML file overriding the default thresholds, weights and aliases
    #[arg(long)]
    config: Option<PathBuf>,

    /// Season identifier, e.g. 2025-26
    #[arg(long)]
    season: Option<String>,

    /// Saved Advanced player dashboard; skips the network when given with the other two
    #[arg(long, requires_all = ["base_json", "teams_json"])]
    advanced_json: Option<PathBuf>,

    /// Saved Base (totals) player dashboard
    #[arg(long, requires_all = ["advanced_json", "teams_json"])]
    base_json: Option<PathBuf>,

    /// Saved Advanced team dashboard
    #[arg(long, requires_all = ["advanced_json", "base_json"])]
    teams_json: Option<PathBuf>,

    #[arg(long, value_enum, default_value_t = OutputFormat::Table)]
    format: OutputFormat,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum OutputFormat {
    Table,
    Json,
}

impl Cli {
    fn snapshot_paths(&self) -> Option<(&PathBuf, &PathBuf, &PathBuf)> {
        match (&self.advanced_json, &self.base_json, &self.teams_json) {
            (Some(advanced), Some(base), Some(teams)) => Some((advanced, base, teams)),
            _ => None,
        }
    }
}

fn load_config(cli: &Cli) -> Result<AuditConfig> {
    let mut config = AuditConfig::load(cli.config.as_deref()).context("Failed to load configuration")?;
    if let Some(season) = &cli.season {
        config.season = season.clone();
        config.validate().context("Invalid season")?;
    }
    Ok(config)
}

async fn load_stats(cli: &Cli, season: &str) -> Result<StatsBundle> {
    if let Some((advanced, base, teams)) = cli.snapshot_paths() {
        info!("Loading stats from snapshots");
        return load_snapshot(advanced, base, teams).await;
    }

    let mut fetcher_config = FetcherConfig::from_env()?;
    fetcher_config.api.season = season.to_string();
    let fetcher = NbaStatsFetcher::new(fetcher_config)?;
    fetcher.fetch_all().await.context("Failed to fetch league stats")
}

#[tokio::main]
async fn main() -> Result<()> {
    // Logs go to stderr so the tables on stdout stay clean
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let config = load_config(&cli)?;
    info!("Running salary audit for {}", config.season);

    let salaries = load_salaries(&cli.salaries, &config.season).await?;
    let stats = load_stats(&cli, &config.season).await?;

    let engine = AuditEngine::new(config);
    let report = engine.run(&salaries, &stats.players, &stats.teams);

    match cli.format {
        OutputFormat::Table => report::print_report(&report),
        OutputFormat::Json => {
            let json = serde_json::to_string_pretty(&report).context("Failed to serialize report")?;
            println!("{}", json);
        }
    }

    Ok(())
}
