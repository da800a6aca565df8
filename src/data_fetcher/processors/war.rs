//! Baseball-Reference WAR tables.

use serde_json::json;
use tracing::{info, instrument};

use crate::data_fetcher::provider::{PlayerRole, StatsProvider, TableRequest};
use crate::error::AppError;
use crate::pipeline::range::SeasonRange;
use crate::table::Table;
use crate::teams::current_abbreviation;

const DROPPED: &[&str] = &["name_common", "player_ID", "age", "lg_ID"];

/// WAR rows for `range`, keyed by `(key_mlbam, Season, Team)`.
///
/// The provider serves every season at once; rows outside the range are
/// discarded here. Era team codes (`MON`, `FLA`, ...) are replaced by the
/// franchise's current abbreviation to match the stats tables.
#[instrument(skip(provider))]
pub async fn fetch_war<P>(
    provider: &P,
    range: &SeasonRange,
    role: PlayerRole,
) -> Result<Table, AppError>
where
    P: StatsProvider + ?Sized,
{
    info!("Fetching {} WAR for {range}", role.as_str());
    let war = provider.fetch_table(&TableRequest::War { role }).await?;
    if war.is_shapeless() {
        return Ok(Table::new(["key_mlbam", "Season", "Team"]));
    }
    war.require_columns("war", &["mlb_ID", "year_ID", "team_ID"])?;

    let table = war
        .filter(|row| {
            row.get_i64("year_ID")
                .and_then(|season| i32::try_from(season).ok())
                .is_some_and(|season| range.contains(season))
        })
        .rename(&[
            ("mlb_ID", "key_mlbam"),
            ("year_ID", "Season"),
            ("team_ID", "Team"),
        ])
        .drop_columns(DROPPED)
        .with_derived("Team", |row| {
            Ok(match row.get_str("Team") {
                Some(code) => json!(current_abbreviation(code)),
                None => row.get("Team").clone(),
            })
        })?;

    info!("Kept {} of {} WAR rows", table.len(), war.len());
    Ok(table)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing_utils::{MockProvider, TableBuilder};
    use serde_json::json;

    #[tokio::test]
    async fn test_war_is_restricted_and_renamed() {
        let provider = MockProvider::new().with_table(
            TableRequest::War {
                role: PlayerRole::Batter,
            },
            TableBuilder::new([
                "name_common",
                "age",
                "mlb_ID",
                "player_ID",
                "year_ID",
                "team_ID",
                "lg_ID",
                "WAR",
            ])
            .row([
                json!("Aaron Judge"),
                json!(29),
                json!(592450),
                json!("judgeaa01"),
                json!(2021),
                json!("NYY"),
                json!("AL"),
                json!(5.5),
            ])
            .row([
                json!("Aaron Judge"),
                json!(30),
                json!(592450),
                json!("judgeaa01"),
                json!(2022),
                json!("NYY"),
                json!("AL"),
                json!(10.6),
            ])
            .build(),
        );

        let war = fetch_war(
            &provider,
            &SeasonRange::with_latest(2022, 2023, 2024).unwrap(),
            PlayerRole::Batter,
        )
        .await
        .unwrap();

        assert_eq!(war.columns(), &["key_mlbam", "Season", "Team", "WAR"]);
        assert_eq!(war.len(), 1);
        assert_eq!(war.row(0).unwrap().get("WAR"), &json!(10.6));
    }

    #[tokio::test]
    async fn test_era_team_codes_are_normalized() {
        let provider = MockProvider::new().with_table(
            TableRequest::War {
                role: PlayerRole::Pitcher,
            },
            TableBuilder::new(["mlb_ID", "year_ID", "team_ID", "WAR"])
                .row([json!(5001), json!(2003), json!("MON"), json!(5.4)])
                .row([json!(5002), json!(2003), json!("FLA"), json!(2.1)])
                .row([json!(5003), json!(2003), json!("NYY"), json!(1.0)])
                .build(),
        );

        let war = fetch_war(
            &provider,
            &SeasonRange::with_latest(2003, 2003, 2024).unwrap(),
            PlayerRole::Pitcher,
        )
        .await
        .unwrap();

        let teams: Vec<_> = war.rows().filter_map(|row| row.get_str("Team")).collect();
        assert_eq!(teams, vec!["WSN", "MIA", "NYY"]);
    }
}
