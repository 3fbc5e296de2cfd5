use crate::error::ValidationError;
use player_registry::MatchKind;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// One row of the salary sheet
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlayerSalaryRecord {
    /// Name as typed in the salary source, possibly mangled
    pub raw_name: String,

    /// Season salary in dollars
    pub salary: Decimal,
}

/// Season statistics for one player, as published by the stats feed
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlayerStatRecord {
    pub player_id: i32,
    pub canonical_name: String,
    pub team_id: i32,
    pub games_played: u32,

    /// Average minutes per game
    pub minutes: f64,

    /// USG%, 0-1 scale
    pub usage_pct: f64,

    /// TS%, 0-1 scale
    pub true_shooting_pct: f64,

    /// PIE, roughly 0-0.3
    pub player_impact_estimate: f64,

    pub net_rating: f64,

    /// Season totals
    pub three_point_attempts: u32,
    pub three_point_makes: u32,

    /// 3P%, 0-1 scale
    pub three_point_pct: f64,
}

/// Team-level context used to isolate a player's own net rating
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TeamStatRecord {
    pub team_id: i32,
    pub team_name: String,
    pub net_rating: f64,
}

/// A salary row joined to exactly one stat record
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReconciledPlayer {
    pub salary: PlayerSalaryRecord,
    pub stats: PlayerStatRecord,

    /// How the salary-sheet name was matched
    pub matched_by: MatchKind,
}

/// The six raw inputs of the performance score
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ScoreInputs {
    pub player_impact_estimate: f64,
    pub relative_net_rating: f64,
    pub true_shooting_pct: f64,
    pub usage_pct: f64,
    pub three_point_pct: f64,
    pub three_point_attempts_per_game: f64,
}

/// The additive terms of the score, kept for reporting
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct ScoreBreakdown {
    pub impact: f64,
    pub relative_net_rating: f64,
    pub shooting_efficiency: f64,
    pub usage: f64,
    pub sharpshooter: f64,
}

impl ScoreBreakdown {
    pub fn total(&self) -> f64 {
        self.impact + self.relative_net_rating + self.shooting_efficiency + self.usage + self.sharpshooter
    }
}

/// Fully joined and scored player, ready for classification
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoredPlayer {
    pub salary: PlayerSalaryRecord,
    pub stats: PlayerStatRecord,
    pub team: TeamStatRecord,
    pub matched_by: MatchKind,

    /// Player net rating minus team net rating
    pub relative_net_rating: f64,

    pub three_point_attempts_per_game: f64,
    pub score: f64,
    pub breakdown: ScoreBreakdown,
}

impl ScoredPlayer {
    pub fn player_id(&self) -> i32 {
        self.stats.player_id
    }

    pub fn name(&self) -> &str {
        &self.stats.canonical_name
    }

    pub fn salary(&self) -> Decimal {
        self.salary.salary
    }

    pub fn usage_pct(&self) -> f64 {
        self.stats.usage_pct
    }

    pub fn minutes(&self) -> f64 {
        self.stats.minutes
    }

    pub fn games_played(&self) -> u32 {
        self.stats.games_played
    }

    pub fn inputs(&self) -> ScoreInputs {
        ScoreInputs {
            player_impact_estimate: self.stats.player_impact_estimate,
            relative_net_rating: self.relative_net_rating,
            true_shooting_pct: self.stats.true_shooting_pct,
            usage_pct: self.stats.usage_pct,
            three_point_pct: self.stats.three_point_pct,
            three_point_attempts_per_game: self.three_point_attempts_per_game,
        }
    }
}

fn check_finite(field: &'static str, value: f64) -> Result<(), ValidationError> {
    if value.is_finite() {
        Ok(())
    } else {
        Err(ValidationError::NonFinite { field, value })
    }
}

fn check_unit_interval(field: &'static str, value: f64) -> Result<(), ValidationError> {
    check_finite(field, value)?;
    if (0.0..=1.0).contains(&value) {
        Ok(())
    } else {
        Err(ValidationError::OutOfRange { field, value, min: 0.0, max: 1.0 })
    }
}

impl PlayerSalaryRecord {
    pub fn new(raw_name: impl Into<String>, salary: Decimal) -> Self {
        Self { raw_name: raw_name.into(), salary }
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.raw_name.trim().is_empty() {
            return Err(ValidationError::EmptyName);
        }
        if self.salary < Decimal::ZERO {
            return Err(ValidationError::NegativeSalary { salary: self.salary });
        }
        Ok(())
    }
}

impl PlayerStatRecord {
    /// Reject records whose numbers would silently corrupt a score
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.canonical_name.trim().is_empty() {
            return Err(ValidationError::EmptyName);
        }
        check_finite("minutes", self.minutes)?;
        if self.minutes < 0.0 {
            return Err(ValidationError::OutOfRange {
                field: "minutes",
                value: self.minutes,
                min: 0.0,
                max: f64::INFINITY,
            });
        }
        check_unit_interval("usage_pct", self.usage_pct)?;
        check_unit_interval("true_shooting_pct", self.true_shooting_pct)?;
        check_unit_interval("three_point_pct", self.three_point_pct)?;
        check_finite("player_impact_estimate", self.player_impact_estimate)?;
        check_finite("net_rating", self.net_rating)?;
        if self.three_point_makes > self.three_point_attempts {
            return Err(ValidationError::MakesExceedAttempts {
                makes: self.three_point_makes,
                attempts: self.three_point_attempts,
            });
        }
        Ok(())
    }
}

impl TeamStatRecord {
    pub fn new(team_id: i32, team_name: impl Into<String>, net_rating: f64) -> Self {
        Self { team_id, team_name: team_name.into(), net_rating }
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        check_finite("team_net_rating", self.net_rating)
    }
}

#[cfg(test)]
pub(crate) mod fixtures {
    use super::*;

    /// A rotation player with league-average shooting
    pub fn stat_record(player_id: i32, name: &str, team_id: i32) -> PlayerStatRecord {
        PlayerStatRecord {
            player_id,
            canonical_name: name.to_string(),
            team_id,
            games_played: 40,
            minutes: 30.0,
            usage_pct: 0.20,
            true_shooting_pct: 0.58,
            player_impact_estimate: 0.10,
            net_rating: 2.0,
            three_point_attempts: 200,
            three_point_makes: 72,
            three_point_pct: 0.36,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::fixtures::stat_record;
    use super::*;

    #[test]
    fn test_valid_stat_record() {
        assert_eq!(stat_record(1, "Nikola Jokic", 10).validate(), Ok(()));
    }

    #[test]
    fn test_percentages_must_be_fractions() {
        let mut record = stat_record(1, "Nikola Jokic", 10);
        record.usage_pct = 31.5;
        assert!(matches!(
            record.validate(),
            Err(ValidationError::OutOfRange { field: "usage_pct", .. })
        ));
    }

    #[test]
    fn test_nan_is_rejected() {
        let mut record = stat_record(1, "Nikola Jokic", 10);
        record.player_impact_estimate = f64::NAN;
        assert!(matches!(
            record.validate(),
            Err(ValidationError::NonFinite { field: "player_impact_estimate", .. })
        ));
    }

    #[test]
    fn test_makes_cannot_exceed_attempts() {
        let mut record = stat_record(1, "Nikola Jokic", 10);
        record.three_point_makes = 201;
        assert_eq!(
            record.validate(),
            Err(ValidationError::MakesExceedAttempts { makes: 201, attempts: 200 })
        );
    }

    #[test]
    fn test_salary_validation() {
        assert!(PlayerSalaryRecord::new("Nikola Jokic", Decimal::from(55_224_526)).validate().is_ok());
        assert!(PlayerSalaryRecord::new("Minimum Guy", Decimal::ZERO).validate().is_ok());
        assert_eq!(
            PlayerSalaryRecord::new("  ", Decimal::from(1)).validate(),
            Err(ValidationError::EmptyName)
        );
        assert!(matches!(
            PlayerSalaryRecord::new("Nikola Jokic", Decimal::from(-5)).validate(),
            Err(ValidationError::NegativeSalary { .. })
        ));
    }

    #[test]
    fn test_team_validation() {
        assert!(TeamStatRecord::new(10, "Denver Nuggets", 5.1).validate().is_ok());
        assert!(TeamStatRecord::new(10, "Denver Nuggets", f64::INFINITY).validate().is_err());
    }

    #[test]
    fn test_breakdown_total() {
        let breakdown = ScoreBreakdown {
            impact: 10.0,
            relative_net_rating: -2.0,
            shooting_efficiency: 3.0,
            usage: 4.0,
            sharpshooter: 0.5,
        };
        assert!((breakdown.total() - 15.5).abs() < 1e-12);
    }
}
