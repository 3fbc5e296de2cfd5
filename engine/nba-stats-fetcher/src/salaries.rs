use anyhow::{Context, Result};
use csv::{ReaderBuilder, StringRecord};
use rust_decimal::Decimal;
use std::collections::HashSet;
use std::path::Path;
use std::str::FromStr;
use tracing::{debug, info, warn};
use value_engine::PlayerSalaryRecord;

const PLAYER_FALLBACK_COLUMN: usize = 1;
const SALARY_FALLBACK_COLUMN: usize = 3;

/// Read and parse a salary sheet from disk
pub async fn load_salaries(path: impl AsRef<Path>, season: &str) -> Result<Vec<PlayerSalaryRecord>> {
    let path = path.as_ref();
    let bytes = tokio::fs::read(path)
        .await
        .with_context(|| format!("Failed to read salary sheet {}", path.display()))?;
    parse_salaries(&bytes, season).with_context(|| format!("Failed to parse salary sheet {}", path.display()))
}

/// Parse a salary sheet exported from a public salary site.
///
/// The export carries banner lines above the real header, repeats the header
/// every few rows and mangles accented names. Bytes that are not UTF-8 come
/// back as `?` so the registry's wildcard step can repair the name.
pub fn parse_salaries(bytes: &[u8], season: &str) -> Result<Vec<PlayerSalaryRecord>> {
    let text = String::from_utf8_lossy(bytes).replace(char::REPLACEMENT_CHARACTER, "?");

    let mut reader = ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_reader(text.as_bytes());

    let mut rows = Vec::new();
    for record in reader.records() {
        rows.push(record.context("Malformed CSV row")?);
    }

    let header_index = rows
        .iter()
        .position(is_header_row)
        .context("No header row with a Player column found")?;
    let header = &rows[header_index];

    let player_column = player_column(header);
    let salary_column = salary_column(header, season);
    let player_header = header.get(player_column).unwrap_or_default().trim().to_string();
    debug!(
        "Salary sheet header at row {}: player column {}, salary column {}",
        header_index, player_column, salary_column
    );

    let mut seen = HashSet::new();
    let mut records = Vec::new();
    let mut unparsable = 0;

    for row in &rows[header_index + 1..] {
        let name = row.get(player_column).unwrap_or_default().trim();
        if name.is_empty() || name == player_header {
            continue;
        }

        let raw_salary = row.get(salary_column).unwrap_or_default();
        let Some(salary) = parse_money(raw_salary) else {
            unparsable += 1;
            continue;
        };

        if seen.insert(name.to_string()) {
            records.push(PlayerSalaryRecord::new(name, salary));
        }
    }

    if unparsable > 0 {
        warn!("{} salary rows had no parsable amount", unparsable);
    }
    info!("Parsed {} salary records", records.len());
    Ok(records)
}

fn is_header_row(row: &StringRecord) -> bool {
    let has = |needle: &str| row.iter().any(|field| field.contains(needle));
    has("Player") && (has("Salary") || has("Tm"))
}

fn player_column(header: &StringRecord) -> usize {
    header
        .iter()
        .position(|h| h.trim() == "Player")
        .or_else(|| header.iter().position(|h| h.contains("Player")))
        .unwrap_or(PLAYER_FALLBACK_COLUMN)
}

fn salary_column(header: &StringRecord, season: &str) -> usize {
    let markers = season_years(season);
    header
        .iter()
        .position(|h| markers.iter().any(|year| h.contains(year.as_str())))
        .unwrap_or(SALARY_FALLBACK_COLUMN)
}

/// "2025-26" -> ["2025", "2026"]
fn season_years(season: &str) -> Vec<String> {
    let Some((start, end)) = season.split_once('-') else {
        return vec![season.to_string()];
    };
    let mut years = vec![start.to_string()];
    match start.get(..start.len().saturating_sub(end.len())) {
        Some(century) if !century.is_empty() => years.push(format!("{}{}", century, end)),
        _ => years.push(end.to_string()),
    }
    years
}

/// "$35,000,000" -> 35000000
fn parse_money(raw: &str) -> Option<Decimal> {
    let cleaned: String = raw.chars().filter(|c| *c != '$' && *c != ',').collect();
    let cleaned = cleaned.trim();
    if cleaned.is_empty() {
        return None;
    }
    Decimal::from_str(cleaned).ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    const SHEET: &str = "\
Player Salaries,,,,\n\
Rk,Player,Tm,2025-26,2026-27\n\
1,Stephen Curry,GSW,\"$59,606,817\",\n\
2,Nikola Jokic,DEN,\"$55,224,526\",\"$59,033,114\"\n\
Rk,Player,Tm,2025-26,2026-27\n\
3,Joel Embiid,PHI,\"$55,224,526\",\n\
4,Nikola Jokic,DEN,\"$1,000\",\n\
5,Two Way Guy,MEM,,\n";

    #[test]
    fn test_parse_sheet() {
        let records = parse_salaries(SHEET.as_bytes(), "2025-26").unwrap();
        let names: Vec<_> = records.iter().map(|r| r.raw_name.as_str()).collect();

        // Banner skipped, repeated header dropped, duplicate keeps first, blank salary dropped
        assert_eq!(names, vec!["Stephen Curry", "Nikola Jokic", "Joel Embiid"]);
        assert_eq!(records[1].salary, Decimal::from(55_224_526));
    }

    #[test]
    fn test_invalid_bytes_become_wildcards() {
        let mut bytes = b"Player,Tm,Salary 2025\nAlperen \xDEeng\xFCn,HOU,\"$22,000,000\"\n".to_vec();
        bytes.extend_from_slice(b"Luka Doncic,LAL,\"$45,999,660\"\n");

        let records = parse_salaries(&bytes, "2025-26").unwrap();
        assert_eq!(records[0].raw_name, "Alperen ?eng?n");
        assert_eq!(records[0].salary, Decimal::from(22_000_000));
        assert_eq!(records[1].raw_name, "Luka Doncic");
    }

    #[test]
    fn test_fallback_columns() {
        // No exact "Player" header and no year marker: partial match and index 3
        let sheet = "Rk,Player Name,Tm,Salary\n1,Jalen Brunson,NYK,\"$24,960,001\"\n";
        let records = parse_salaries(sheet.as_bytes(), "2025-26").unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].raw_name, "Jalen Brunson");
        assert_eq!(records[0].salary, Decimal::from(24_960_001));
    }

    #[test]
    fn test_missing_header_is_an_error() {
        assert!(parse_salaries(b"a,b,c\n1,2,3\n", "2025-26").is_err());
    }

    #[test]
    fn test_season_years() {
        assert_eq!(season_years("2025-26"), vec!["2025", "2026"]);
        assert_eq!(season_years("2024"), vec!["2024"]);
    }

    #[test]
    fn test_parse_money() {
        assert_eq!(parse_money("$1,234,567"), Some(Decimal::from(1_234_567)));
        assert_eq!(parse_money(" 2500000.50 "), Some(Decimal::from_str("2500000.50").unwrap()));
        assert_eq!(parse_money("n/a"), None);
        assert_eq!(parse_money(""), None);
    }

    #[tokio::test]
    async fn test_load_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(SHEET.as_bytes()).unwrap();

        let records = load_salaries(file.path(), "2025-26").await.unwrap();
        assert_eq!(records.len(), 3);
        assert!(load_salaries("/nonexistent/salaries.csv", "2025-26").await.is_err());
    }
}
