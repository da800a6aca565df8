//! Team-level batting, pitching and fielding aggregates.

use serde_json::json;
use tracing::{info, instrument};

use super::fan_out;
use crate::catalogs::{self, Catalog};
use crate::data_fetcher::provider::{StatKind, StatsProvider, TableRequest};
use crate::error::AppError;
use crate::pipeline::range::SeasonRange;
use crate::table::Table;

const TEAM_IDENTITY: &[&str] = &["teamIDfg", "Team", "Season"];
const TEAM_KEY: &[&str] = &["Team", "Season"];

fn output_columns(catalog: &Catalog) -> Vec<&'static str> {
    TEAM_IDENTITY
        .iter()
        .copied()
        .chain(catalog.columns())
        .collect()
}

async fn fetch_team_aggregates<P>(
    provider: &P,
    range: &SeasonRange,
    kind: StatKind,
    catalog: &Catalog,
) -> Result<Table, AppError>
where
    P: StatsProvider + ?Sized,
{
    let stacked = fan_out(
        provider,
        catalog.name,
        range.seasons(),
        |&season| TableRequest::TeamStats { kind, season },
        |&season, table| {
            table
                .with_constant("Season", json!(season))
                .select_catalog(catalog.name, TEAM_IDENTITY, catalog)
        },
    )
    .await?;
    Ok(stacked.or_empty(output_columns(catalog)))
}

/// Team pitching aggregates, one row per team and season.
#[instrument(skip(provider))]
pub async fn fetch_team_pitching<P>(provider: &P, range: &SeasonRange) -> Result<Table, AppError>
where
    P: StatsProvider + ?Sized,
{
    info!("Fetching team pitching for {range}");
    fetch_team_aggregates(provider, range, StatKind::Pitching, &catalogs::PITCHING).await
}

/// Team batting aggregates with the batting park factor from the historical
/// team registry and the team's wins and losses from team pitching.
///
/// Teams missing from either side keep their row with null `BPF`, `W`, `L`.
#[instrument(skip(provider))]
pub async fn fetch_team_batting<P>(provider: &P, range: &SeasonRange) -> Result<Table, AppError>
where
    P: StatsProvider + ?Sized,
{
    info!("Fetching team batting for {range}");
    let batting =
        fetch_team_aggregates(provider, range, StatKind::Batting, &catalogs::HITTING).await?;

    let registry = provider.fetch_table(&TableRequest::HistoricalTeams).await?;
    let park_factors = registry
        .select("historical teams", &["teamIDBR", "yearID", "BPF"])?
        .rename(&[("teamIDBR", "Team"), ("yearID", "Season")]);

    let records = fetch_team_pitching(provider, range)
        .await?
        .select("team pitching", &["Team", "Season", "W", "L"])?;

    batting
        .left_join(&park_factors, TEAM_KEY, "team batting park factors")?
        .left_join(&records, TEAM_KEY, "team batting records")
}

/// Team fielding aggregates in the fixed team fielding layout.
///
/// The provider's own team label is discarded; `Team` comes from the team
/// batting table of the same season, matched on `teamIDfg`.
#[instrument(skip(provider))]
pub async fn fetch_team_fielding<P>(provider: &P, range: &SeasonRange) -> Result<Table, AppError>
where
    P: StatsProvider + ?Sized,
{
    info!("Fetching team fielding for {range}");
    let catalog = &catalogs::TEAM_FIELDING;

    let mut parts = Vec::with_capacity(range.len());
    for season in range.seasons() {
        let fielding = provider
            .fetch_table(&TableRequest::TeamStats {
                kind: StatKind::Fielding,
                season,
            })
            .await?;
        if fielding.is_shapeless() {
            continue;
        }

        let teams = provider
            .fetch_table(&TableRequest::TeamStats {
                kind: StatKind::Batting,
                season,
            })
            .await?
            .select("team batting", &["teamIDfg", "Team"])?;

        let part = fielding
            .drop_columns(&["Team"])
            .left_join(&teams, &["teamIDfg"], catalog.name)?
            .with_constant("Season", json!(season))
            .select_catalog(catalog.name, TEAM_IDENTITY, catalog)?;
        parts.push(part);
    }

    Ok(Table::concat(parts).or_empty(output_columns(catalog)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing_utils::{MockProvider, TableBuilder};
    use serde_json::Value;

    fn range(start: i32, end: i32) -> SeasonRange {
        SeasonRange::with_latest(start, end, 2024).unwrap()
    }

    fn team_table(catalog: &Catalog, teams: &[(i64, &str)], extra: &[&str]) -> Table {
        let mut columns = vec!["teamIDfg", "Team"];
        columns.extend(catalog.columns().map(|column| -> &str { column }));
        columns.extend(extra.iter().copied());
        let mut builder = TableBuilder::new(columns.clone());
        for (id, team) in teams {
            builder = builder.row(columns.iter().map(|column| match *column {
                "teamIDfg" => json!(id),
                "Team" => json!(team),
                "W" => json!(90 + id),
                "L" => json!(72 - id),
                _ => json!(0.5),
            }));
        }
        builder.build()
    }

    fn historical_teams() -> Table {
        TableBuilder::new(["yearID", "teamIDBR", "BPF"])
            .row([json!(2022), json!("NYY"), json!(99)])
            .row([json!(2022), json!("BOS"), json!(105)])
            .row([json!(2023), json!("NYY"), json!(100)])
            .build()
    }

    fn provider() -> MockProvider {
        MockProvider::new()
            .with_table(TableRequest::HistoricalTeams, historical_teams())
            .with_responder(|request| match request {
                TableRequest::TeamStats {
                    kind: StatKind::Batting,
                    ..
                } => Some(Ok(team_table(
                    &catalogs::HITTING,
                    &[(9, "NYY"), (3, "BOS"), (30, "SFG")],
                    &[],
                ))),
                TableRequest::TeamStats {
                    kind: StatKind::Pitching,
                    ..
                } => Some(Ok(team_table(
                    &catalogs::PITCHING,
                    &[(9, "NYY"), (3, "BOS")],
                    &[],
                ))),
                TableRequest::TeamStats {
                    kind: StatKind::Fielding,
                    ..
                } => Some(Ok(team_table(
                    &catalogs::TEAM_FIELDING,
                    &[(9, "Yankees"), (3, "Red Sox")],
                    &[],
                ))),
                _ => None,
            })
    }

    #[tokio::test]
    async fn test_team_batting_adds_park_factor_and_record() {
        let provider = provider();
        let batting = fetch_team_batting(&provider, &range(2022, 2022))
            .await
            .unwrap();

        assert_eq!(batting.len(), 3);
        assert_eq!(&batting.columns()[..3], &["teamIDfg", "Team", "Season"]);
        let tail: Vec<&str> = batting.columns()[batting.width() - 3..]
            .iter()
            .map(String::as_str)
            .collect();
        assert_eq!(tail, vec!["BPF", "W", "L"]);

        let nyy = batting.row(0).unwrap();
        assert_eq!(nyy.get("BPF"), &json!(99));
        assert_eq!(nyy.get("W"), &json!(99));
        assert_eq!(nyy.get("Season"), &json!(2022));

        let sfg = batting.row(2).unwrap();
        assert_eq!(sfg.get("BPF"), &Value::Null);
        assert_eq!(sfg.get("W"), &Value::Null);
    }

    #[tokio::test]
    async fn test_team_batting_is_per_season() {
        let provider = provider();
        let batting = fetch_team_batting(&provider, &range(2022, 2023))
            .await
            .unwrap();

        assert_eq!(batting.len(), 6);
        let nyy_2023 = batting.row(3).unwrap();
        assert_eq!(nyy_2023.get("Season"), &json!(2023));
        assert_eq!(nyy_2023.get("BPF"), &json!(100));
    }

    #[tokio::test]
    async fn test_team_fielding_takes_team_from_batting() {
        let provider = provider();
        let fielding = fetch_team_fielding(&provider, &range(2022, 2022))
            .await
            .unwrap();

        assert_eq!(fielding.len(), 2);
        assert_eq!(fielding.width(), 3 + catalogs::TEAM_FIELDING.len());
        assert_eq!(fielding.row(0).unwrap().get("Team"), &json!("NYY"));
        assert_eq!(fielding.row(1).unwrap().get("Team"), &json!("BOS"));
    }

    #[tokio::test]
    async fn test_team_pitching_layout() {
        let provider = provider();
        let pitching = fetch_team_pitching(&provider, &range(2021, 2022))
            .await
            .unwrap();

        assert_eq!(pitching.len(), 4);
        assert_eq!(pitching.width(), 3 + catalogs::PITCHING.len());
    }
}
