//! NBA Stats Fetcher
//!
//! Acquisition layer for the salary audit: parses the salary sheet and pulls
//! player and team statistics from the NBA stats API (or from JSON snapshots
//! of the same responses), handing clean records to the value engine.

pub mod config;
pub mod fetcher;
pub mod models;
pub mod retry;
pub mod salaries;
pub mod snapshot;

pub use config::{FetcherConfig, RetryConfig};
pub use fetcher::NbaStatsFetcher;
pub use models::{ResultSet, StatsBundle, StatsResponse};
pub use salaries::{load_salaries, parse_salaries};
pub use snapshot::load_snapshot;
