use crate::error::ConfigError;
use crate::{DEFAULT_MIN_GAMES, DEFAULT_SEASON, ENV_PREFIX};
use player_registry::{AliasEntry, AliasTable};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::info;

/// Configuration for one salary audit run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AuditConfig {
    /// Season identifier passed to the stats feed (e.g., "2025-26")
    pub season: String,

    /// League baselines the score is measured against
    pub league: LeagueConstants,

    /// Weights of the additive score terms
    pub weights: ScoreWeights,

    /// Category thresholds and caps
    pub classifier: ClassifierConfig,

    /// Base alias table (defaults to the built-in nickname entries)
    pub aliases: Vec<AliasEntry>,

    /// Entries layered on top of `aliases`, overriding on conflict
    pub extra_aliases: Vec<AliasEntry>,
}

/// League-wide shooting baselines; known norms, not derived from the dataset
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LeagueConstants {
    /// League average TS% (e.g., 0.58)
    pub avg_true_shooting: f64,

    /// League average 3P% (e.g., 0.36)
    pub avg_three_point: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScoreWeights {
    /// Multiplier applied to PIE
    pub impact: f64,

    /// Multiplier applied to TS% above league average
    pub shooting_efficiency: f64,

    /// Multiplier applied to USG%
    pub usage: f64,

    /// Multiplier applied to (3P% above average) x attempts per game
    pub sharpshooter: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClassifierConfig {
    /// Players below this many games are ignored entirely
    pub min_games: u32,

    /// Minutes per game for a meaningful rotation role
    pub rotation_minutes: f64,

    /// Minutes per game required for the elite table
    pub elite_minutes: f64,

    pub toxic: ToxicRule,
    pub fading_stars: FadingStarsRule,
    pub passives: PassivesRule,
    pub elite: EliteRule,
    pub bargains: BargainsRule,
}

/// Expensive, ball-dominant and playing rotation minutes
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ToxicRule {
    pub salary_above: Decimal,
    pub usage_above: f64,
    pub limit: usize,
}

/// Max-contract players whose team is better without them
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FadingStarsRule {
    pub salary_above: Decimal,
    pub rel_net_rating_below: f64,
    pub limit: usize,
}

/// Well-paid role players with low usage and no positive impact
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PassivesRule {
    pub salary_above: Decimal,
    pub usage_at_most: f64,
    pub rel_net_rating_below: f64,
    pub limit: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EliteRule {
    pub salary_above: Decimal,
    pub limit: usize,
}

/// Cheap contracts with strong relative impact
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BargainsRule {
    pub salary_below: Decimal,
    pub rel_net_rating_above: f64,
    pub limit: usize,
}

impl Default for AuditConfig {
    fn default() -> Self {
        Self {
            season: DEFAULT_SEASON.to_string(),
            league: LeagueConstants::default(),
            weights: ScoreWeights::default(),
            classifier: ClassifierConfig::default(),
            aliases: AliasEntry::defaults(),
            extra_aliases: Vec::new(),
        }
    }
}

impl Default for LeagueConstants {
    fn default() -> Self {
        Self { avg_true_shooting: 0.58, avg_three_point: 0.36 }
    }
}

impl Default for ScoreWeights {
    fn default() -> Self {
        Self { impact: 100.0, shooting_efficiency: 100.0, usage: 20.0, sharpshooter: 15.0 }
    }
}

impl Default for ClassifierConfig {
    fn default() -> Self {
        Self {
            min_games: DEFAULT_MIN_GAMES,
            rotation_minutes: 20.0,
            elite_minutes: 28.0,
            toxic: ToxicRule::default(),
            fading_stars: FadingStarsRule::default(),
            passives: PassivesRule::default(),
            elite: EliteRule::default(),
            bargains: BargainsRule::default(),
        }
    }
}

impl Default for ToxicRule {
    fn default() -> Self {
        Self { salary_above: Decimal::from(20_000_000), usage_above: 0.23, limit: 5 }
    }
}

impl Default for FadingStarsRule {
    fn default() -> Self {
        Self { salary_above: Decimal::from(30_000_000), rel_net_rating_below: 0.0, limit: 5 }
    }
}

impl Default for PassivesRule {
    fn default() -> Self {
        Self {
            salary_above: Decimal::from(18_000_000),
            usage_at_most: 0.23,
            rel_net_rating_below: 1.5,
            limit: 5,
        }
    }
}

impl Default for EliteRule {
    fn default() -> Self {
        Self { salary_above: Decimal::from(30_000_000), limit: 5 }
    }
}

impl Default for BargainsRule {
    fn default() -> Self {
        Self { salary_below: Decimal::from(15_000_000), rel_net_rating_above: 2.0, limit: 10 }
    }
}

impl AuditConfig {
    /// Load configuration: built-in defaults, then the optional TOML file,
    /// then `SALARY_AUDIT_*` environment variables (`__` separates nested
    /// keys, e.g. `SALARY_AUDIT_CLASSIFIER__MIN_GAMES=20`)
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let mut builder = config::Config::builder().add_source(config::Config::try_from(&Self::default())?);

        if let Some(path) = path {
            info!("Loading configuration file: {:?}", path);
            builder = builder.add_source(config::File::from(path).required(true));
        }

        builder = builder.add_source(
            config::Environment::with_prefix(ENV_PREFIX)
                .prefix_separator("_")
                .separator("__")
                .try_parsing(true),
        );

        let config: AuditConfig = builder.build()?.try_deserialize()?;
        config.validate()?;
        Ok(config)
    }

    /// Defaults plus environment overrides
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::load(None)
    }

    /// The alias table handed to the name reconciler
    pub fn alias_table(&self) -> AliasTable {
        let mut table = AliasTable::from_entries(self.aliases.iter().cloned());
        table.extend(self.extra_aliases.iter().cloned());
        table
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.season.trim().is_empty() {
            return Err(ConfigError::invalid("season", "must not be empty"));
        }

        let fractions = [
            ("league.avg_true_shooting", self.league.avg_true_shooting),
            ("league.avg_three_point", self.league.avg_three_point),
            ("classifier.toxic.usage_above", self.classifier.toxic.usage_above),
            ("classifier.passives.usage_at_most", self.classifier.passives.usage_at_most),
        ];
        for (field, value) in fractions {
            if !(0.0..=1.0).contains(&value) {
                return Err(ConfigError::invalid(field, format!("{value} is not a fraction in [0, 1]")));
            }
        }

        let minutes = [
            ("classifier.rotation_minutes", self.classifier.rotation_minutes),
            ("classifier.elite_minutes", self.classifier.elite_minutes),
        ];
        for (field, value) in minutes {
            if !value.is_finite() || value < 0.0 {
                return Err(ConfigError::invalid(field, format!("{value} is not a valid minute count")));
            }
        }

        let weights = [
            ("weights.impact", self.weights.impact),
            ("weights.shooting_efficiency", self.weights.shooting_efficiency),
            ("weights.usage", self.weights.usage),
            ("weights.sharpshooter", self.weights.sharpshooter),
            ("classifier.fading_stars.rel_net_rating_below", self.classifier.fading_stars.rel_net_rating_below),
            ("classifier.passives.rel_net_rating_below", self.classifier.passives.rel_net_rating_below),
            ("classifier.bargains.rel_net_rating_above", self.classifier.bargains.rel_net_rating_above),
        ];
        for (field, value) in weights {
            if !value.is_finite() {
                return Err(ConfigError::invalid(field, "must be a finite number"));
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_default_values() {
        let config = AuditConfig::default();
        assert_eq!(config.season, "2025-26");
        assert_eq!(config.classifier.min_games, 16);
        assert_eq!(config.league.avg_true_shooting, 0.58);
        assert_eq!(config.league.avg_three_point, 0.36);
        assert_eq!(config.classifier.rotation_minutes, 20.0);
        assert_eq!(config.classifier.elite_minutes, 28.0);
        assert_eq!(config.classifier.toxic.limit, 5);
        assert_eq!(config.classifier.bargains.limit, 10);
        assert_eq!(config.classifier.bargains.salary_below, Decimal::from(15_000_000));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_alias_table_layers_extra_entries() {
        let config = AuditConfig {
            extra_aliases: vec![
                AliasEntry::new("Bub Carrington", "Carlton Carrington"),
                AliasEntry::new("Cameron Thomas", "Cameron Thomas"),
            ],
            ..Default::default()
        };
        let table = config.alias_table();
        assert_eq!(table.get("Bub Carrington"), Some("Carlton Carrington"));
        assert_eq!(table.get("Cameron Thomas"), Some("Cameron Thomas"));
        assert_eq!(table.get("Jimmy Butler"), Some("Jimmy Butler III"));
    }

    #[test]
    fn test_validate_rejects_bad_values() {
        let mut config = AuditConfig::default();
        config.league.avg_true_shooting = 58.0;
        assert!(matches!(
            config.validate(),
            Err(ConfigError::Invalid { field: "league.avg_true_shooting", .. })
        ));

        let mut config = AuditConfig::default();
        config.classifier.rotation_minutes = -1.0;
        assert!(config.validate().is_err());

        let config = AuditConfig { season: " ".to_string(), ..Default::default() };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_zero_cap_is_valid() {
        let mut config = AuditConfig::default();
        config.classifier.elite.limit = 0;
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_load_from_file() {
        let mut file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
        writeln!(
            file,
            r#"
season = "2024-25"

[league]
avg_true_shooting = 0.57

[classifier]
min_games = 20

[classifier.bargains]
limit = 3
salary_below = 12000000

[[extra_aliases]]
raw = "Moe Wagner"
canonical = "Moritz Wagner"
"#
        )
        .unwrap();

        let config = AuditConfig::load(Some(file.path())).unwrap();
        assert_eq!(config.season, "2024-25");
        assert_eq!(config.league.avg_true_shooting, 0.57);
        // Untouched keys keep their defaults
        assert_eq!(config.league.avg_three_point, 0.36);
        assert_eq!(config.classifier.min_games, 20);
        assert_eq!(config.classifier.rotation_minutes, 20.0);
        assert_eq!(config.classifier.bargains.limit, 3);
        assert_eq!(config.classifier.bargains.salary_below, Decimal::from(12_000_000));
        assert_eq!(config.classifier.toxic.salary_above, Decimal::from(20_000_000));
        assert_eq!(config.alias_table().get("Moe Wagner"), Some("Moritz Wagner"));
        assert_eq!(config.alias_table().get("Jimmy Butler"), Some("Jimmy Butler III"));
    }

    #[test]
    fn test_load_rejects_invalid_file_values() {
        let mut file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
        writeln!(file, "[league]\navg_three_point = 36.0").unwrap();
        assert!(matches!(
            AuditConfig::load(Some(file.path())),
            Err(ConfigError::Invalid { field: "league.avg_three_point", .. })
        ));
    }

    #[test]
    fn test_missing_file_is_an_error() {
        let result = AuditConfig::load(Some(Path::new("/nonexistent/salary-audit.toml")));
        assert!(matches!(result, Err(ConfigError::Load(_))));
    }
}
