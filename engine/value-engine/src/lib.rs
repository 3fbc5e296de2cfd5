//! Value Engine
//!
//! Joins salary rows to league statistics, scores every player and sorts
//! contracts into five value categories (toxic, fading stars, negative-impact
//! passives, elite, bargains) for a single reporting run.

pub mod calculator;
pub mod classifier;
pub mod config;
pub mod engine;
pub mod error;
pub mod models;

pub use calculator::ScoreCalculator;
pub use classifier::{classify, Category, Classifier, FiveCategoryReport, SortOrder};
pub use config::{AuditConfig, ClassifierConfig, LeagueConstants, ScoreWeights};
pub use engine::{AuditCounters, AuditEngine, AuditReport, Rejection, ReportStatus};
pub use error::{ConfigError, ValidationError};
pub use models::*;

pub use player_registry::{AliasEntry, AliasTable, MatchKind};

/// Default season identifier
pub const DEFAULT_SEASON: &str = "2025-26";

/// Default minimum games played to be considered at all
pub const DEFAULT_MIN_GAMES: u32 = 16;

/// Environment variable prefix for configuration overrides
pub const ENV_PREFIX: &str = "SALARY_AUDIT";
