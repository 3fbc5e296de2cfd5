use crate::calculator::ScoreCalculator;
use crate::classifier::{Classifier, FiveCategoryReport};
use crate::config::AuditConfig;
use crate::error::ValidationError;
use crate::models::*;
use chrono::{DateTime, Utc};
use player_registry::PlayerRegistry;
use serde::{Deserialize, Serialize};
use std::collections::hash_map::Entry;
use std::collections::{HashMap, HashSet};
use tracing::{debug, info, warn};

/// How a run ended
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReportStatus {
    /// The pipeline ran over non-empty inputs (categories may still be empty)
    Complete,
    /// Salary or stat input was empty; nothing was classified
    NoData,
}

/// Per-stage counts, mostly to explain why players are missing from the tables
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuditCounters {
    pub salary_records: usize,
    pub stat_records: usize,
    pub team_records: usize,
    pub matched: usize,
    pub unmatched: usize,
    /// Salary rows resolving to a player already claimed by an earlier row
    pub duplicates: usize,
    pub rejected: usize,
    pub missing_team: usize,
    pub below_min_games: usize,
    pub scored: usize,
}

/// A record refused because its values failed validation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Rejection {
    pub name: String,
    pub reason: String,
}

impl Rejection {
    fn new(name: &str, error: &ValidationError) -> Self {
        Self { name: name.to_string(), reason: error.to_string() }
    }
}

/// Everything the presentation layer needs from one run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AuditReport {
    pub season: String,
    pub generated_at: DateTime<Utc>,
    pub status: ReportStatus,
    pub categories: FiveCategoryReport,

    /// Every scored player meeting the games filter, in salary-sheet order
    pub players: Vec<ScoredPlayer>,

    pub counters: AuditCounters,
    pub rejections: Vec<Rejection>,
}

impl AuditReport {
    fn new(season: &str, status: ReportStatus, counters: AuditCounters) -> Self {
        Self {
            season: season.to_string(),
            generated_at: Utc::now(),
            status,
            categories: FiveCategoryReport::default(),
            players: Vec::new(),
            counters,
            rejections: Vec::new(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.categories.is_empty()
    }
}

/// Salary audit pipeline: reconcile, join, validate, score, classify
pub struct AuditEngine {
    config: AuditConfig,
    calculator: ScoreCalculator,
    classifier: Classifier,
}

impl AuditEngine {
    pub fn new(config: AuditConfig) -> Self {
        let calculator = ScoreCalculator::new(config.league, config.weights);
        let classifier = Classifier::new(config.classifier.clone());
        Self { config, calculator, classifier }
    }

    pub fn config(&self) -> &AuditConfig {
        &self.config
    }

    /// Run the whole pipeline over already-parsed inputs
    ///
    /// Never fails: empty inputs give a `NoData` report, unmatched names and
    /// missing joins drop the player, invalid records are listed in
    /// `rejections`.
    pub fn run(
        &self,
        salaries: &[PlayerSalaryRecord],
        stats: &[PlayerStatRecord],
        teams: &[TeamStatRecord],
    ) -> AuditReport {
        info!(
            "Starting salary audit for season {}: {} salaries, {} player stats, {} teams",
            self.config.season,
            salaries.len(),
            stats.len(),
            teams.len()
        );

        let mut counters = AuditCounters {
            salary_records: salaries.len(),
            stat_records: stats.len(),
            team_records: teams.len(),
            ..Default::default()
        };

        if salaries.is_empty() || stats.is_empty() {
            warn!("No salary or stat data supplied, returning an empty report");
            return AuditReport::new(&self.config.season, ReportStatus::NoData, counters);
        }

        let mut rejections = Vec::new();
        let reconciled = self.reconcile(salaries, stats, &mut counters, &mut rejections);
        let players = self.score(reconciled, teams, &mut counters, &mut rejections);
        let categories = self.classifier.classify(&players);

        info!(
            "Audit complete: {} matched, {} unmatched, {} rejected, {} scored",
            counters.matched, counters.unmatched, counters.rejected, counters.scored
        );

        AuditReport {
            categories,
            players,
            rejections,
            ..AuditReport::new(&self.config.season, ReportStatus::Complete, counters)
        }
    }

    /// Join each salary row to at most one stat record
    pub fn reconcile(
        &self,
        salaries: &[PlayerSalaryRecord],
        stats: &[PlayerStatRecord],
        counters: &mut AuditCounters,
        rejections: &mut Vec<Rejection>,
    ) -> Vec<ReconciledPlayer> {
        let mut by_name: HashMap<&str, &PlayerStatRecord> = HashMap::with_capacity(stats.len());
        for record in stats {
            match by_name.entry(record.canonical_name.as_str()) {
                Entry::Vacant(slot) => {
                    slot.insert(record);
                }
                Entry::Occupied(_) => {
                    warn!(
                        "Duplicate canonical name '{}' (player {}), keeping the first record",
                        record.canonical_name, record.player_id
                    );
                }
            }
        }

        let registry = PlayerRegistry::new(by_name.keys().copied(), self.config.alias_table());
        let mut claimed: HashSet<i32> = HashSet::new();
        let mut reconciled = Vec::new();

        for salary in salaries {
            if let Err(e) = salary.validate() {
                warn!("Rejected salary row '{}': {}", salary.raw_name, e);
                counters.rejected += 1;
                rejections.push(Rejection::new(&salary.raw_name, &e));
                continue;
            }

            let Some(resolution) = registry.resolve(&salary.raw_name) else {
                counters.unmatched += 1;
                continue;
            };

            // Every name the registry returns comes from `by_name`
            let Some(record) = by_name.get(resolution.canonical_name.as_str()) else {
                counters.unmatched += 1;
                continue;
            };

            if let Err(e) = record.validate() {
                warn!("Rejected stats for '{}': {}", record.canonical_name, e);
                counters.rejected += 1;
                rejections.push(Rejection::new(&record.canonical_name, &e));
                continue;
            }

            if !claimed.insert(record.player_id) {
                debug!(
                    "Salary row '{}' resolves to already matched player '{}', skipping",
                    salary.raw_name, record.canonical_name
                );
                counters.duplicates += 1;
                continue;
            }

            counters.matched += 1;
            reconciled.push(ReconciledPlayer {
                salary: salary.clone(),
                stats: (*record).clone(),
                matched_by: resolution.kind,
            });
        }

        info!(
            "Reconciled {} of {} salary rows ({} unmatched)",
            reconciled.len(),
            salaries.len(),
            counters.unmatched
        );
        reconciled
    }

    /// Attach team context, apply the games filter and compute scores
    pub fn score(
        &self,
        reconciled: Vec<ReconciledPlayer>,
        teams: &[TeamStatRecord],
        counters: &mut AuditCounters,
        rejections: &mut Vec<Rejection>,
    ) -> Vec<ScoredPlayer> {
        let mut by_id: HashMap<i32, &TeamStatRecord> = HashMap::with_capacity(teams.len());
        for team in teams {
            by_id.entry(team.team_id).or_insert(team);
        }

        let min_games = self.config.classifier.min_games;
        let mut scored = Vec::with_capacity(reconciled.len());

        for player in reconciled {
            let Some(team) = by_id.get(&player.stats.team_id) else {
                debug!("No team record {} for '{}'", player.stats.team_id, player.stats.canonical_name);
                counters.missing_team += 1;
                continue;
            };

            if let Err(e) = team.validate() {
                warn!("Rejected team '{}' for '{}': {}", team.team_name, player.stats.canonical_name, e);
                counters.rejected += 1;
                rejections.push(Rejection::new(&player.stats.canonical_name, &e));
                continue;
            }

            if player.stats.games_played < min_games {
                counters.below_min_games += 1;
                continue;
            }

            let player = self.calculator.score_player(player, team);
            if !player.score.is_finite() {
                let e = ValidationError::NonFinite { field: "score", value: player.score };
                warn!("Rejected '{}': {}", player.name(), e);
                counters.rejected += 1;
                rejections.push(Rejection::new(player.name(), &e));
                continue;
            }
            scored.push(player);
        }

        counters.scored = scored.len();
        scored
    }
}

/// Run the pipeline with a one-off engine
pub fn run_audit(
    config: AuditConfig,
    salaries: &[PlayerSalaryRecord],
    stats: &[PlayerStatRecord],
    teams: &[TeamStatRecord],
) -> AuditReport {
    AuditEngine::new(config).run(salaries, stats, teams)
}
