use crate::config::{LeagueConstants, ScoreWeights};
use crate::models::*;

/// Compute the additive terms of the performance score
///
/// ```text
/// score = PIE * 100
///       + relative net rating
///       + (TS% - league TS%) * 100
///       + USG% * 20
///       + (3P% - league 3P%) * 3PA per game * 15
/// ```
///
/// The multipliers shown are the default [`ScoreWeights`].
pub fn breakdown(inputs: &ScoreInputs, league: &LeagueConstants, weights: &ScoreWeights) -> ScoreBreakdown {
    ScoreBreakdown {
        impact: inputs.player_impact_estimate * weights.impact,
        relative_net_rating: inputs.relative_net_rating,
        shooting_efficiency: (inputs.true_shooting_pct - league.avg_true_shooting) * weights.shooting_efficiency,
        usage: inputs.usage_pct * weights.usage,
        // Sharpshooter term: accuracy above average only counts with volume
        sharpshooter: (inputs.three_point_pct - league.avg_three_point)
            * inputs.three_point_attempts_per_game
            * weights.sharpshooter,
    }
}

/// Performance score for one set of inputs
pub fn score(inputs: &ScoreInputs, league: &LeagueConstants, weights: &ScoreWeights) -> f64 {
    breakdown(inputs, league, weights).total()
}

/// Season three-point attempts spread over games played; zero games gives zero
pub fn three_point_attempts_per_game(stats: &PlayerStatRecord) -> f64 {
    if stats.games_played == 0 {
        return 0.0;
    }
    stats.three_point_attempts as f64 / stats.games_played as f64
}

/// Player net rating with the team's own net rating taken out
pub fn relative_net_rating(stats: &PlayerStatRecord, team: &TeamStatRecord) -> f64 {
    stats.net_rating - team.net_rating
}

/// Score calculator bound to one run's league constants and weights
#[derive(Debug, Clone)]
pub struct ScoreCalculator {
    league: LeagueConstants,
    weights: ScoreWeights,
}

impl ScoreCalculator {
    /// Create a new score calculator
    pub fn new(league: LeagueConstants, weights: ScoreWeights) -> Self {
        Self { league, weights }
    }

    pub fn league(&self) -> &LeagueConstants {
        &self.league
    }

    pub fn weights(&self) -> &ScoreWeights {
        &self.weights
    }

    pub fn score(&self, inputs: &ScoreInputs) -> f64 {
        score(inputs, &self.league, &self.weights)
    }

    /// Attach team context and derived fields to a reconciled player
    pub fn score_player(&self, player: ReconciledPlayer, team: &TeamStatRecord) -> ScoredPlayer {
        let relative_net_rating = relative_net_rating(&player.stats, team);
        let three_point_attempts_per_game = three_point_attempts_per_game(&player.stats);

        let inputs = ScoreInputs {
            player_impact_estimate: player.stats.player_impact_estimate,
            relative_net_rating,
            true_shooting_pct: player.stats.true_shooting_pct,
            usage_pct: player.stats.usage_pct,
            three_point_pct: player.stats.three_point_pct,
            three_point_attempts_per_game,
        };
        let breakdown = breakdown(&inputs, &self.league, &self.weights);

        ScoredPlayer {
            salary: player.salary,
            stats: player.stats,
            team: team.clone(),
            matched_by: player.matched_by,
            relative_net_rating,
            three_point_attempts_per_game,
            score: breakdown.total(),
            breakdown,
        }
    }
}

impl Default for ScoreCalculator {
    fn default() -> Self {
        Self::new(LeagueConstants::default(), ScoreWeights::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::fixtures::stat_record;
    use player_registry::MatchKind;
    use rust_decimal::Decimal;

    const TOLERANCE: f64 = 1e-9;

    fn reconciled(stats: PlayerStatRecord) -> ReconciledPlayer {
        ReconciledPlayer {
            salary: PlayerSalaryRecord::new(stats.canonical_name.clone(), Decimal::from(25_000_000)),
            stats,
            matched_by: MatchKind::Exact,
        }
    }

    #[test]
    fn test_league_average_player() {
        // Average shooting, so only impact, net rating and usage contribute
        let calculator = ScoreCalculator::default();
        let team = TeamStatRecord::new(10, "Denver Nuggets", 1.0);
        let player = calculator.score_player(reconciled(stat_record(1, "Average Joe", 10)), &team);

        assert!((player.relative_net_rating - 1.0).abs() < TOLERANCE);
        assert!((player.three_point_attempts_per_game - 5.0).abs() < TOLERANCE);
        assert!((player.breakdown.impact - 10.0).abs() < TOLERANCE);
        assert!(player.breakdown.shooting_efficiency.abs() < TOLERANCE);
        assert!((player.breakdown.usage - 4.0).abs() < TOLERANCE);
        assert!(player.breakdown.sharpshooter.abs() < TOLERANCE);
        assert!((player.score - 15.0).abs() < TOLERANCE);
    }

    #[test]
    fn test_full_formula() {
        let inputs = ScoreInputs {
            player_impact_estimate: 0.20,
            relative_net_rating: -3.0,
            true_shooting_pct: 0.62,
            usage_pct: 0.30,
            three_point_pct: 0.40,
            three_point_attempts_per_game: 8.0,
        };
        // 20 - 3 + 4 + 6 + 0.04 * 8 * 15
        let expected = 20.0 - 3.0 + 4.0 + 6.0 + 4.8;
        let actual = score(&inputs, &LeagueConstants::default(), &ScoreWeights::default());
        assert!((actual - expected).abs() < TOLERANCE);
    }

    #[test]
    fn test_sharpshooter_term_scales_with_volume() {
        let low_volume = ScoreInputs {
            player_impact_estimate: 0.0,
            relative_net_rating: 0.0,
            true_shooting_pct: 0.58,
            usage_pct: 0.0,
            three_point_pct: 0.45,
            three_point_attempts_per_game: 0.5,
        };
        let high_volume = ScoreInputs { three_point_attempts_per_game: 10.0, ..low_volume };

        let league = LeagueConstants::default();
        let weights = ScoreWeights::default();
        let low = breakdown(&low_volume, &league, &weights).sharpshooter;
        let high = breakdown(&high_volume, &league, &weights).sharpshooter;
        assert!((low - 0.675).abs() < TOLERANCE);
        assert!((high - 13.5).abs() < TOLERANCE);
    }

    #[test]
    fn test_zero_games_guard() {
        let mut stats = stat_record(1, "Did Not Play", 10);
        stats.games_played = 0;
        assert_eq!(three_point_attempts_per_game(&stats), 0.0);
    }

    #[test]
    fn test_custom_constants() {
        let calculator = ScoreCalculator::new(
            LeagueConstants { avg_true_shooting: 0.50, avg_three_point: 0.30 },
            ScoreWeights { impact: 0.0, shooting_efficiency: 10.0, usage: 0.0, sharpshooter: 1.0 },
        );
        let inputs = ScoreInputs {
            player_impact_estimate: 0.15,
            relative_net_rating: 0.0,
            true_shooting_pct: 0.60,
            usage_pct: 0.25,
            three_point_pct: 0.40,
            three_point_attempts_per_game: 5.0,
        };
        assert!((calculator.score(&inputs) - 1.5).abs() < TOLERANCE);
    }

    #[test]
    fn test_score_is_deterministic() {
        let calculator = ScoreCalculator::default();
        let team = TeamStatRecord::new(10, "Denver Nuggets", -4.2);
        let first = calculator.score_player(reconciled(stat_record(7, "Repeat", 10)), &team);
        let second = calculator.score_player(reconciled(stat_record(7, "Repeat", 10)), &team);
        assert_eq!(first.score.to_bits(), second.score.to_bits());
        assert!((calculator.score(&first.inputs()) - first.score).abs() < TOLERANCE);
    }
}
