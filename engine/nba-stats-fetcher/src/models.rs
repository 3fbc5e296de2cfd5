use anyhow::{anyhow, Context, Result};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::{HashMap, HashSet};
use tracing::{info, warn};
use value_engine::{PlayerStatRecord, TeamStatRecord};

/// Envelope of a stats.nba.com dashboard response
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct StatsResponse {
    #[serde(rename = "resultSets")]
    pub result_sets: Vec<ResultSet>,
}

/// One header/rows table inside a response
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct ResultSet {
    pub name: String,

    pub headers: Vec<String>,

    #[serde(rename = "rowSet")]
    pub row_set: Vec<Vec<Value>>,
}

/// Everything the audit needs from the stats feed
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StatsBundle {
    pub players: Vec<PlayerStatRecord>,
    pub teams: Vec<TeamStatRecord>,
}

pub const PLAYER_STATS_SET: &str = "LeagueDashPlayerStats";
pub const TEAM_STATS_SET: &str = "LeagueDashTeamStats";

impl StatsResponse {
    /// Result set by name, falling back to the first set
    pub fn result_set(&self, name: &str) -> Result<&ResultSet> {
        self.result_sets
            .iter()
            .find(|set| set.name == name)
            .or_else(|| self.result_sets.first())
            .ok_or_else(|| anyhow!("Response has no result sets (expected {})", name))
    }
}

impl ResultSet {
    /// Position of a header, case-sensitive as published
    pub fn column(&self, header: &str) -> Result<usize> {
        self.headers
            .iter()
            .position(|h| h == header)
            .ok_or_else(|| anyhow!("Result set {} has no {} column", self.name, header))
    }

    pub fn len(&self) -> usize {
        self.row_set.len()
    }

    pub fn is_empty(&self) -> bool {
        self.row_set.is_empty()
    }
}

fn cell<'a>(row: &'a [Value], index: usize, field: &str) -> Result<&'a Value> {
    match row.get(index) {
        None | Some(Value::Null) => Err(anyhow!("{} is missing", field)),
        Some(value) => Ok(value),
    }
}

fn cell_f64(row: &[Value], index: usize, field: &str) -> Result<f64> {
    cell(row, index, field)?
        .as_f64()
        .ok_or_else(|| anyhow!("{} is not numeric", field))
}

fn cell_i32(row: &[Value], index: usize, field: &str) -> Result<i32> {
    let value = cell(row, index, field)?
        .as_i64()
        .ok_or_else(|| anyhow!("{} is not an integer", field))?;
    i32::try_from(value).with_context(|| format!("{} out of range: {}", field, value))
}

/// Counts sometimes arrive as floats (`72.0`); anything fractional or negative is rejected
fn cell_count(row: &[Value], index: usize, field: &str) -> Result<u32> {
    let value = cell_f64(row, index, field)?;
    if value < 0.0 || value.fract() != 0.0 || value > u32::MAX as f64 {
        return Err(anyhow!("{} is not a non-negative count: {}", field, value));
    }
    Ok(value as u32)
}

fn cell_string(row: &[Value], index: usize, field: &str) -> Result<String> {
    cell(row, index, field)?
        .as_str()
        .map(str::to_string)
        .ok_or_else(|| anyhow!("{} is not text", field))
}

struct AdvancedColumns {
    player_id: usize,
    name: usize,
    team_id: usize,
    games_played: usize,
    minutes: usize,
    usage_pct: usize,
    true_shooting_pct: usize,
    player_impact_estimate: usize,
    net_rating: usize,
}

struct ShootingColumns {
    player_id: usize,
    makes: usize,
    attempts: usize,
    pct: usize,
}

#[derive(Debug, Clone, Copy)]
struct ThreePointTotals {
    makes: u32,
    attempts: u32,
    pct: f64,
}

impl AdvancedColumns {
    fn locate(set: &ResultSet) -> Result<Self> {
        Ok(Self {
            player_id: set.column("PLAYER_ID")?,
            name: set.column("PLAYER_NAME")?,
            team_id: set.column("TEAM_ID")?,
            games_played: set.column("GP")?,
            minutes: set.column("MIN")?,
            usage_pct: set.column("USG_PCT")?,
            true_shooting_pct: set.column("TS_PCT")?,
            player_impact_estimate: set.column("PIE")?,
            net_rating: set.column("NET_RATING")?,
        })
    }
}

impl ShootingColumns {
    fn locate(set: &ResultSet) -> Result<Self> {
        Ok(Self {
            player_id: set.column("PLAYER_ID")?,
            makes: set.column("FG3M")?,
            attempts: set.column("FG3A")?,
            pct: set.column("FG3_PCT")?,
        })
    }

    fn parse(&self, row: &[Value]) -> Result<(i32, ThreePointTotals)> {
        Ok((
            cell_i32(row, self.player_id, "PLAYER_ID")?,
            ThreePointTotals {
                makes: cell_count(row, self.makes, "FG3M")?,
                attempts: cell_count(row, self.attempts, "FG3A")?,
                pct: cell_f64(row, self.pct, "FG3_PCT")?,
            },
        ))
    }
}

/// Join the Advanced (per game) and Base (totals) player dashboards on
/// PLAYER_ID. Players without a Base row, and rows with null or malformed
/// cells, are dropped with a warning. The first row per player wins.
pub fn parse_player_stats(advanced: &StatsResponse, base: &StatsResponse) -> Result<Vec<PlayerStatRecord>> {
    let advanced_set = advanced.result_set(PLAYER_STATS_SET).context("Advanced player stats")?;
    let base_set = base.result_set(PLAYER_STATS_SET).context("Base player stats")?;
    let columns = AdvancedColumns::locate(advanced_set)?;
    let shooting_columns = ShootingColumns::locate(base_set)?;

    let mut shooting: HashMap<i32, ThreePointTotals> = HashMap::new();
    for row in &base_set.row_set {
        match shooting_columns.parse(row) {
            Ok((player_id, totals)) => {
                shooting.entry(player_id).or_insert(totals);
            }
            Err(e) => warn!("Skipping base stats row: {:#}", e),
        }
    }

    let mut seen = HashSet::new();
    let mut records = Vec::with_capacity(advanced_set.len());
    let mut missing_base = 0;

    for row in &advanced_set.row_set {
        let player_id = match cell_i32(row, columns.player_id, "PLAYER_ID") {
            Ok(id) => id,
            Err(e) => {
                warn!("Skipping advanced stats row: {:#}", e);
                continue;
            }
        };
        if !seen.insert(player_id) {
            warn!("Duplicate advanced stats row for player {}", player_id);
            continue;
        }
        let Some(totals) = shooting.get(&player_id) else {
            missing_base += 1;
            continue;
        };

        match parse_player_row(row, &columns, player_id, totals) {
            Ok(record) => records.push(record),
            Err(e) => warn!("Skipping player {}: {:#}", player_id, e),
        }
    }

    if missing_base > 0 {
        warn!("{} players had no base stats row and were dropped", missing_base);
    }
    info!("Parsed {} player stat records", records.len());
    Ok(records)
}

fn parse_player_row(
    row: &[Value],
    columns: &AdvancedColumns,
    player_id: i32,
    totals: &ThreePointTotals,
) -> Result<PlayerStatRecord> {
    Ok(PlayerStatRecord {
        player_id,
        canonical_name: cell_string(row, columns.name, "PLAYER_NAME")?,
        team_id: cell_i32(row, columns.team_id, "TEAM_ID")?,
        games_played: cell_count(row, columns.games_played, "GP")?,
        minutes: cell_f64(row, columns.minutes, "MIN")?,
        usage_pct: cell_f64(row, columns.usage_pct, "USG_PCT")?,
        true_shooting_pct: cell_f64(row, columns.true_shooting_pct, "TS_PCT")?,
        player_impact_estimate: cell_f64(row, columns.player_impact_estimate, "PIE")?,
        net_rating: cell_f64(row, columns.net_rating, "NET_RATING")?,
        three_point_attempts: totals.attempts,
        three_point_makes: totals.makes,
        three_point_pct: totals.pct,
    })
}

/// Team net ratings from the Advanced team dashboard
pub fn parse_team_stats(teams: &StatsResponse) -> Result<Vec<TeamStatRecord>> {
    let set = teams.result_set(TEAM_STATS_SET).context("Team stats")?;
    let team_id = set.column("TEAM_ID")?;
    let team_name = set.column("TEAM_NAME")?;
    let net_rating = set.column("NET_RATING")?;

    let mut records = Vec::with_capacity(set.len());
    for row in &set.row_set {
        let parsed = (|| -> Result<TeamStatRecord> {
            Ok(TeamStatRecord {
                team_id: cell_i32(row, team_id, "TEAM_ID")?,
                team_name: cell_string(row, team_name, "TEAM_NAME")?,
                net_rating: cell_f64(row, net_rating, "NET_RATING")?,
            })
        })();
        match parsed {
            Ok(record) => records.push(record),
            Err(e) => warn!("Skipping team stats row: {:#}", e),
        }
    }

    info!("Parsed {} team stat records", records.len());
    Ok(records)
}

impl StatsBundle {
    pub fn from_responses(advanced: &StatsResponse, base: &StatsResponse, teams: &StatsResponse) -> Result<Self> {
        Ok(Self {
            players: parse_player_stats(advanced, base)?,
            teams: parse_team_stats(teams)?,
        })
    }
}
