//! Console rendering of an audit report.
//!
//! Numbers use the European convention: `.` groups thousands and `,` is the
//! decimal separator.

use colored::*;
use rust_decimal::Decimal;
use value_engine::{AuditReport, ReportStatus, ScoredPlayer};

const BANNER_WIDTH: usize = 60;
const EMPTY_CATEGORY: &str = "(no player meets the criteria)";
const HEADERS: [&str; 8] = ["Player", "Salary", "USG%", "TS%", "3P%", "PIE", "Rel Net", "Score"];

/// 35000000 -> "35.000.000"
pub fn format_salary(salary: Decimal) -> String {
    let whole = salary.round_dp(0).trunc();
    let digits = whole.abs().to_string();
    let grouped = group_thousands(&digits);
    if whole.is_sign_negative() && !whole.is_zero() {
        format!("-{}", grouped)
    } else {
        grouped
    }
}

fn group_thousands(digits: &str) -> String {
    let len = digits.len();
    let mut out = String::with_capacity(len + len / 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (len - i) % 3 == 0 {
            out.push('.');
        }
        out.push(c);
    }
    out
}

/// 0.30 -> "30,0%"
pub fn format_pct(fraction: f64) -> String {
    if !fraction.is_finite() {
        return "-".to_string();
    }
    format!("{:.1}%", fraction * 100.0).replace('.', ",")
}

/// -3.0 -> "-3,0"
pub fn format_decimal(value: f64) -> String {
    if !value.is_finite() {
        return "-".to_string();
    }
    format!("{:.1}", value).replace('.', ",")
}

fn row(player: &ScoredPlayer) -> [String; 8] {
    [
        player.name().to_string(),
        format_salary(player.salary()),
        format_pct(player.stats.usage_pct),
        format_pct(player.stats.true_shooting_pct),
        format_pct(player.stats.three_point_pct),
        format_pct(player.stats.player_impact_estimate),
        format_decimal(player.relative_net_rating),
        format_decimal(player.score),
    ]
}

/// Fixed-width table, player names left-aligned and numbers right-aligned
pub fn render_table(players: &[ScoredPlayer]) -> String {
    if players.is_empty() {
        return EMPTY_CATEGORY.to_string();
    }

    let rows: Vec<[String; 8]> = players.iter().map(row).collect();
    let mut widths = HEADERS.map(|h| h.chars().count());
    for cells in &rows {
        for (width, cell) in widths.iter_mut().zip(cells.iter()) {
            *width = (*width).max(cell.chars().count());
        }
    }

    let render_line = |cells: &[String]| -> String {
        cells
            .iter()
            .zip(widths.iter())
            .enumerate()
            .map(|(i, (cell, width))| {
                let pad = width - cell.chars().count();
                if i == 0 {
                    format!("{}{}", cell, " ".repeat(pad))
                } else {
                    format!("{}{}", " ".repeat(pad), cell)
                }
            })
            .collect::<Vec<_>>()
            .join("  ")
            .trim_end()
            .to_string()
    };

    let header: Vec<String> = HEADERS.iter().map(|h| h.to_string()).collect();
    let mut lines = vec![render_line(&header[..])];
    lines.extend(rows.iter().map(|cells| render_line(&cells[..])));
    lines.join("\n")
}

/// Print the banner, the five tables and the run summary to stdout
pub fn print_report(report: &AuditReport) {
    let rule = "=".repeat(BANNER_WIDTH);
    println!("\n{}", rule);
    println!("{}", format!("  SALARY AUDIT {}", report.season).cyan().bold());
    println!("  generated {}", report.generated_at.format("%Y-%m-%d %H:%M UTC"));
    println!("{}", rule);

    if report.status == ReportStatus::NoData {
        println!("{}", "No salary or stat data was available for this season.".red());
    }

    for (index, (category, players)) in report.categories.iter().enumerate() {
        println!("\n{}", format!("--- {}. {} ---", index + 1, category.title()).yellow().bold());
        println!("{}", render_table(players));
    }

    println!("\n{}", summary(report).dimmed());
    for rejection in &report.rejections {
        println!("{}", format!("  rejected {}: {}", rejection.name, rejection.reason).dimmed());
    }
}

fn summary(report: &AuditReport) -> String {
    let c = &report.counters;
    format!(
        "{} salary rows, {} matched, {} unmatched, {} duplicates, {} rejected, {} without team, {} below min games, {} scored",
        c.salary_records, c.matched, c.unmatched, c.duplicates, c.rejected, c.missing_team, c.below_min_games, c.scored
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;
    use value_engine::{
        AuditConfig, AuditEngine, PlayerSalaryRecord, PlayerStatRecord, ScoreCalculator, TeamStatRecord,
    };

    fn scored(name: &str, salary: i64, usage: f64) -> ScoredPlayer {
        let stats = PlayerStatRecord {
            player_id: 1,
            canonical_name: name.to_string(),
            team_id: 10,
            games_played: 50,
            minutes: 25.0,
            usage_pct: usage,
            true_shooting_pct: 0.55,
            player_impact_estimate: 0.08,
            net_rating: -1.0,
            three_point_attempts: 100,
            three_point_makes: 30,
            three_point_pct: 0.30,
        };
        let reconciled = value_engine::ReconciledPlayer {
            salary: PlayerSalaryRecord::new(name, Decimal::from(salary)),
            stats,
            matched_by: value_engine::MatchKind::Exact,
        };
        ScoreCalculator::default().score_player(reconciled, &TeamStatRecord::new(10, "Team", 2.0))
    }

    #[test]
    fn test_format_salary() {
        assert_eq!(format_salary(Decimal::from(35_000_000)), "35.000.000");
        assert_eq!(format_salary(Decimal::from(999)), "999");
        assert_eq!(format_salary(Decimal::from(1_000)), "1.000");
        assert_eq!(format_salary(Decimal::from_str("2500000.75").unwrap()), "2.500.001");
        assert_eq!(format_salary(Decimal::ZERO), "0");
        assert_eq!(format_salary(Decimal::from(-1_500_000)), "-1.500.000");
    }

    #[test]
    fn test_format_pct_and_decimal() {
        assert_eq!(format_pct(0.30), "30,0%");
        assert_eq!(format_pct(0.6634), "66,3%");
        assert_eq!(format_decimal(-3.0), "-3,0");
        assert_eq!(format_decimal(12.345), "12,3");
        assert_eq!(format_decimal(f64::NAN), "-");
    }

    #[test]
    fn test_empty_table() {
        assert_eq!(render_table(&[]), EMPTY_CATEGORY);
    }

    #[test]
    fn test_table_layout() {
        let players = vec![scored("Jo", 35_000_000, 0.30), scored("Much Longer Name", 1_000_000, 0.125)];
        let table = render_table(&players);
        let lines: Vec<&str> = table.lines().collect();

        assert_eq!(lines.len(), 3);
        assert!(lines[0].starts_with("Player"));
        assert!(lines[1].starts_with("Jo "));
        assert!(lines[1].contains("35.000.000"));
        assert!(lines[1].contains("30,0%"));
        assert!(lines[1].contains("-3,0"));
        assert!(lines[2].contains(" 1.000.000"));
        assert!(lines[2].contains("12,5%"));
    }

    #[test]
    fn test_summary_mentions_counters() {
        let report = AuditEngine::new(AuditConfig::default()).run(&[], &[], &[]);
        assert_eq!(report.status, ReportStatus::NoData);
        assert!(summary(&report).starts_with("0 salary rows"));
    }
}
