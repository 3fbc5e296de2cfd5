use crate::models::{StatsBundle, StatsResponse};
use anyhow::{Context, Result};
use std::path::Path;
use tracing::info;

/// Read one saved dashboard response
pub async fn read_response(path: impl AsRef<Path>) -> Result<StatsResponse> {
    let path = path.as_ref();
    let bytes = tokio::fs::read(path)
        .await
        .with_context(|| format!("Failed to read snapshot {}", path.display()))?;
    serde_json::from_slice(&bytes).with_context(|| format!("Failed to parse snapshot {}", path.display()))
}

/// Save a dashboard response in the shape `read_response` accepts
pub async fn write_response(path: impl AsRef<Path>, response: &StatsResponse) -> Result<()> {
    let path = path.as_ref();
    let json = serde_json::to_vec_pretty(response).context("Failed to serialize snapshot")?;
    tokio::fs::write(path, json)
        .await
        .with_context(|| format!("Failed to write snapshot {}", path.display()))?;
    info!("Wrote snapshot {}", path.display());
    Ok(())
}

/// Build the stats bundle from saved responses instead of the network
pub async fn load_snapshot(
    advanced: impl AsRef<Path>,
    base: impl AsRef<Path>,
    teams: impl AsRef<Path>,
) -> Result<StatsBundle> {
    let advanced = read_response(advanced).await?;
    let base = read_response(base).await?;
    let teams = read_response(teams).await?;
    StatsBundle::from_responses(&advanced, &base, &teams)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::fixtures::*;

    #[tokio::test]
    async fn test_load_snapshot() {
        let dir = tempfile::tempdir().unwrap();
        let advanced = dir.path().join("advanced.json");
        let base = dir.path().join("base.json");
        let teams = dir.path().join("teams.json");
        std::fs::write(&advanced, advanced_json().to_string()).unwrap();
        std::fs::write(&base, base_json().to_string()).unwrap();
        std::fs::write(&teams, teams_json().to_string()).unwrap();

        let bundle = load_snapshot(&advanced, &base, &teams).await.unwrap();
        assert_eq!(bundle.players.len(), 2);
        assert_eq!(bundle.teams.len(), 3);
    }

    #[tokio::test]
    async fn test_write_then_read() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("teams.json");
        write_response(&path, &response(teams_json())).await.unwrap();

        let reread = read_response(&path).await.unwrap();
        assert_eq!(reread.result_sets[0].name, "LeagueDashTeamStats");
        assert_eq!(reread.result_sets[0].len(), 3);
    }

    #[tokio::test]
    async fn test_malformed_snapshot() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("broken.json");
        std::fs::write(&path, "{\"resultSets\": 3}").unwrap();

        let err = read_response(&path).await.unwrap_err();
        assert!(format!("{:#}", err).contains("broken.json"));
        assert!(read_response(dir.path().join("missing.json")).await.is_err());
    }
}
