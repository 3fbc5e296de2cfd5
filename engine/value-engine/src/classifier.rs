use crate::config::ClassifierConfig;
use crate::models::ScoredPlayer;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use tracing::info;

/// Report categories, in evaluation order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Category {
    /// Expensive, high-usage players, worst scores first
    Toxic,
    /// Max-contract players with negative relative impact
    FadingStars,
    /// Well-paid low-usage players without positive impact
    NegativeImpactPassives,
    /// Max-contract players with heavy minutes, best first
    Elite,
    /// Cheap contracts with strong relative impact, best first
    Bargains,
}

/// Direction a category is sorted by score
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortOrder {
    WorstFirst,
    BestFirst,
}

impl Category {
    /// Fixed evaluation order
    pub const ALL: [Category; 5] = [
        Category::Toxic,
        Category::FadingStars,
        Category::NegativeImpactPassives,
        Category::Elite,
        Category::Bargains,
    ];

    pub fn title(&self) -> &'static str {
        match self {
            Category::Toxic => "Toxic contracts (high usage, high cost)",
            Category::FadingStars => "Fading stars (expensive and inefficient)",
            Category::NegativeImpactPassives => "Negative-impact passives",
            Category::Elite => "Elite (MVP level)",
            Category::Bargains => "Bargains (best value for money)",
        }
    }

    pub fn sort_order(&self) -> SortOrder {
        match self {
            Category::Toxic | Category::FadingStars | Category::NegativeImpactPassives => SortOrder::WorstFirst,
            Category::Elite | Category::Bargains => SortOrder::BestFirst,
        }
    }

    /// Whether the category takes part in cascading exclusion
    ///
    /// The three "overpaid" tables share one pool: a player selected by an
    /// earlier one cannot appear in a later one. Elite and Bargains always
    /// look at the full eligible set, so they may repeat a player already
    /// listed as a fading star.
    pub fn is_exclusive(&self) -> bool {
        matches!(self, Category::Toxic | Category::FadingStars | Category::NegativeImpactPassives)
    }
}

/// The five category tables of one run
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FiveCategoryReport {
    pub toxic: Vec<ScoredPlayer>,
    pub fading_stars: Vec<ScoredPlayer>,
    pub negative_impact_passives: Vec<ScoredPlayer>,
    pub elite: Vec<ScoredPlayer>,
    pub bargains: Vec<ScoredPlayer>,
}

impl FiveCategoryReport {
    pub fn get(&self, category: Category) -> &[ScoredPlayer] {
        match category {
            Category::Toxic => &self.toxic,
            Category::FadingStars => &self.fading_stars,
            Category::NegativeImpactPassives => &self.negative_impact_passives,
            Category::Elite => &self.elite,
            Category::Bargains => &self.bargains,
        }
    }

    fn slot(&mut self, category: Category) -> &mut Vec<ScoredPlayer> {
        match category {
            Category::Toxic => &mut self.toxic,
            Category::FadingStars => &mut self.fading_stars,
            Category::NegativeImpactPassives => &mut self.negative_impact_passives,
            Category::Elite => &mut self.elite,
            Category::Bargains => &mut self.bargains,
        }
    }

    /// Categories with their members, in evaluation order
    pub fn iter(&self) -> impl Iterator<Item = (Category, &[ScoredPlayer])> {
        Category::ALL.into_iter().map(move |category| (category, self.get(category)))
    }

    pub fn is_empty(&self) -> bool {
        self.iter().all(|(_, players)| players.is_empty())
    }
}

/// Splits scored players into the five contract-value categories
#[derive(Debug, Clone, Default)]
pub struct Classifier {
    config: ClassifierConfig,
}

impl Classifier {
    pub fn new(config: ClassifierConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &ClassifierConfig {
        &self.config
    }

    /// Players with enough games to be classified at all
    pub fn is_eligible(&self, player: &ScoredPlayer) -> bool {
        player.games_played() >= self.config.min_games
    }

    /// Threshold predicate of a category, ignoring exclusion and caps
    pub fn matches(&self, category: Category, player: &ScoredPlayer) -> bool {
        let cfg = &self.config;
        let in_rotation = player.minutes() >= cfg.rotation_minutes;

        match category {
            Category::Toxic => {
                player.salary() > cfg.toxic.salary_above
                    && player.usage_pct() > cfg.toxic.usage_above
                    && in_rotation
            }
            Category::FadingStars => {
                player.salary() > cfg.fading_stars.salary_above
                    && player.relative_net_rating < cfg.fading_stars.rel_net_rating_below
                    && in_rotation
            }
            Category::NegativeImpactPassives => {
                player.salary() > cfg.passives.salary_above
                    && player.usage_pct() <= cfg.passives.usage_at_most
                    && player.relative_net_rating < cfg.passives.rel_net_rating_below
                    && in_rotation
            }
            Category::Elite => {
                player.salary() > cfg.elite.salary_above && player.minutes() >= cfg.elite_minutes
            }
            Category::Bargains => {
                player.salary() < cfg.bargains.salary_below
                    && player.relative_net_rating > cfg.bargains.rel_net_rating_above
                    && in_rotation
            }
        }
    }

    pub fn limit(&self, category: Category) -> usize {
        match category {
            Category::Toxic => self.config.toxic.limit,
            Category::FadingStars => self.config.fading_stars.limit,
            Category::NegativeImpactPassives => self.config.passives.limit,
            Category::Elite => self.config.elite.limit,
            Category::Bargains => self.config.bargains.limit,
        }
    }

    /// Classify players into the five tables
    ///
    /// Order is fixed: Toxic, Fading Stars, Passives, Elite, Bargains. Only
    /// the members actually selected (after the cap) are claimed, so a
    /// player cut from the Toxic table can still land in Fading Stars.
    pub fn classify(&self, players: &[ScoredPlayer]) -> FiveCategoryReport {
        let eligible: Vec<&ScoredPlayer> = players.iter().filter(|p| self.is_eligible(p)).collect();

        let mut claimed: HashSet<i32> = HashSet::new();
        let mut report = FiveCategoryReport::default();

        for category in Category::ALL {
            let selected = self.select(category, &eligible, &claimed);
            if category.is_exclusive() {
                claimed.extend(selected.iter().map(ScoredPlayer::player_id));
            }
            *report.slot(category) = selected;
        }

        info!(
            "Classified {} eligible players: toxic {}, fading stars {}, passives {}, elite {}, bargains {}",
            eligible.len(),
            report.toxic.len(),
            report.fading_stars.len(),
            report.negative_impact_passives.len(),
            report.elite.len(),
            report.bargains.len()
        );

        report
    }

    fn select(&self, category: Category, eligible: &[&ScoredPlayer], claimed: &HashSet<i32>) -> Vec<ScoredPlayer> {
        let mut members: Vec<&ScoredPlayer> = eligible
            .iter()
            .copied()
            .filter(|p| !(category.is_exclusive() && claimed.contains(&p.player_id())))
            .filter(|p| self.matches(category, p))
            .collect();

        // Stable sort: equal scores keep input order
        match category.sort_order() {
            SortOrder::WorstFirst => members.sort_by(|a, b| a.score.total_cmp(&b.score)),
            SortOrder::BestFirst => members.sort_by(|a, b| b.score.total_cmp(&a.score)),
        }
        members.truncate(self.limit(category));
        members.into_iter().cloned().collect()
    }
}

/// Classify with a one-off classifier
pub fn classify(players: &[ScoredPlayer], config: &ClassifierConfig) -> FiveCategoryReport {
    Classifier::new(config.clone()).classify(players)
}
