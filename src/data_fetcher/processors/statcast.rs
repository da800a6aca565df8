//! Statcast batted-ball, expected-stat and pitch arsenal peripherals.

use serde_json::json;
use tracing::{debug, info, instrument};

use crate::config::Qualification;
use crate::constants::STATCAST_FIRST_SEASON;
use crate::data_fetcher::provider::{ArsenalMetric, PlayerRole, StatsProvider, TableRequest};
use crate::error::AppError;
use crate::pipeline::range::SeasonRange;
use crate::table::Table;

/// Player name columns Statcast repeats on every leaderboard.
const NAME_COLUMNS: &[&str] = &["last_name", "first_name", "last_name, first_name", "year"];

const KEY: &[&str] = &["key_mlbam"];

/// Renames the Statcast player id to `key_mlbam` and drops name columns.
fn normalize(table: Table, id_column: &str) -> Table {
    table
        .rename(&[(id_column, "key_mlbam")])
        .drop_columns(NAME_COLUMNS)
}

async fn fetch_season<P>(
    provider: &P,
    role: PlayerRole,
    season: i32,
    qualification: &Qualification,
) -> Result<Table, AppError>
where
    P: StatsProvider + ?Sized,
{
    let (min_bbe, min_pa) = match role {
        PlayerRole::Batter => (
            qualification.statcast_batter_min_bbe,
            qualification.statcast_batter_min_pa,
        ),
        PlayerRole::Pitcher => (
            qualification.statcast_pitcher_min_bbe,
            qualification.statcast_pitcher_min_pa,
        ),
    };

    let exit_velo = provider
        .fetch_table(&TableRequest::StatcastExitVelo {
            role,
            season,
            min_bbe,
        })
        .await?;
    if exit_velo.is_shapeless() {
        return Ok(exit_velo);
    }

    let expected = provider
        .fetch_table(&TableRequest::StatcastExpected {
            role,
            season,
            min_pa,
        })
        .await?;

    let mut peripherals = normalize(exit_velo, "player_id").left_join(
        &normalize(expected, "player_id"),
        KEY,
        "statcast expected stats",
    )?;

    if role == PlayerRole::Pitcher {
        for metric in [ArsenalMetric::AverageSpeed, ArsenalMetric::AverageSpin] {
            let arsenal = provider
                .fetch_table(&TableRequest::StatcastArsenal {
                    season,
                    min_pitches: qualification.statcast_min_pitches,
                    metric,
                })
                .await?;
            peripherals = peripherals.left_join(
                &normalize(arsenal, "pitcher"),
                KEY,
                "statcast pitch arsenal",
            )?;
        }
    }

    Ok(peripherals.with_constant("Season", json!(season)))
}

/// Statcast peripherals for every season in `range`, keyed by
/// `(key_mlbam, Season)`.
///
/// Batters get exit velocity and barrels joined with expected stats.
/// Pitchers additionally get average speed and spin per pitch type. Seasons
/// before Statcast tracking began are not requested.
#[instrument(skip(provider, qualification))]
pub async fn fetch_statcast<P>(
    provider: &P,
    range: &SeasonRange,
    role: PlayerRole,
    qualification: &Qualification,
) -> Result<Table, AppError>
where
    P: StatsProvider + ?Sized,
{
    info!("Fetching Statcast {} peripherals for {range}", role.as_str());

    let mut parts = Vec::new();
    for season in range.seasons() {
        if season < STATCAST_FIRST_SEASON {
            debug!("Skipping Statcast {} for {season}", role.as_str());
            continue;
        }
        let part = fetch_season(provider, role, season, qualification).await?;
        if !part.is_shapeless() {
            parts.push(part);
        }
    }

    Ok(Table::concat(parts).or_empty(["key_mlbam", "Season"]))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing_utils::{MockProvider, TableBuilder};

    fn range(start: i32, end: i32) -> SeasonRange {
        SeasonRange::with_latest(start, end, 2024).unwrap()
    }

    fn provider() -> MockProvider {
        MockProvider::new().with_responder(|request| {
            let table = match request {
                TableRequest::StatcastExitVelo { .. } => {
                    TableBuilder::new(["last_name, first_name", "player_id", "avg_hit_speed"])
                        .row([json!("Judge, Aaron"), json!(592450), json!(95.9)])
                        .row([json!("Cole, Gerrit"), json!(543037), json!(88.1)])
                        .build()
                }
                TableRequest::StatcastExpected { season, .. } => {
                    TableBuilder::new(["last_name, first_name", "player_id", "year", "est_woba"])
                        .row([json!("Judge, Aaron"), json!(592450), json!(season), json!(0.45)])
                        .build()
                }
                TableRequest::StatcastArsenal {
                    metric: ArsenalMetric::AverageSpeed,
                    ..
                } => TableBuilder::new(["last_name", "first_name", "pitcher", "ff_avg_speed"])
                    .row([json!("Cole"), json!("Gerrit"), json!(543037), json!(97.8)])
                    .build(),
                TableRequest::StatcastArsenal {
                    metric: ArsenalMetric::AverageSpin,
                    ..
                } => TableBuilder::new(["last_name", "first_name", "pitcher", "ff_avg_spin"])
                    .row([json!("Cole"), json!("Gerrit"), json!(543037), json!(2431)])
                    .build(),
                _ => return None,
            };
            Some(Ok(table))
        })
    }

    #[tokio::test]
    async fn test_batter_peripherals_join_expected_stats() {
        let provider = provider();
        let statcast = fetch_statcast(
            &provider,
            &range(2022, 2022),
            PlayerRole::Batter,
            &Qualification::default(),
        )
        .await
        .unwrap();

        assert_eq!(
            statcast.columns(),
            &["key_mlbam", "avg_hit_speed", "est_woba", "Season"]
        );
        assert_eq!(statcast.row(0).unwrap().get("est_woba"), &json!(0.45));
        assert!(statcast.row(1).unwrap().get("est_woba").is_null());
        assert_eq!(provider.call_count(), 2);
        assert_eq!(
            provider.requests()[0],
            TableRequest::StatcastExitVelo {
                role: PlayerRole::Batter,
                season: 2022,
                min_bbe: 1,
            }
        );
    }

    #[tokio::test]
    async fn test_pitcher_arsenal_uses_requested_season() {
        let provider = provider();
        let statcast = fetch_statcast(
            &provider,
            &range(2021, 2021),
            PlayerRole::Pitcher,
            &Qualification::default(),
        )
        .await
        .unwrap();

        assert!(statcast.has_column("ff_avg_speed"));
        assert!(statcast.has_column("ff_avg_spin"));
        assert_eq!(statcast.row(1).unwrap().get("ff_avg_spin"), &json!(2431));
        assert!(provider.requests().iter().all(|request| match request {
            TableRequest::StatcastExitVelo { season, .. }
            | TableRequest::StatcastExpected { season, .. }
            | TableRequest::StatcastArsenal { season, .. } => *season == 2021,
            _ => false,
        }));
        assert_eq!(provider.call_count(), 4);
    }

    #[tokio::test]
    async fn test_pre_statcast_seasons_are_not_requested() {
        let provider = provider();
        let statcast = fetch_statcast(
            &provider,
            &range(2013, 2015),
            PlayerRole::Batter,
            &Qualification::default(),
        )
        .await
        .unwrap();

        assert_eq!(provider.call_count(), 2);
        assert!(statcast.rows().all(|r| r.get("Season") == &json!(2015)));
    }
}
