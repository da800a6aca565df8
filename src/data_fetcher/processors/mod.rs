pub mod game_logs;
pub mod player_stats;
pub mod standings;
pub mod statcast;
pub mod team_stats;
pub mod war;

use tracing::debug;

use crate::data_fetcher::provider::{StatsProvider, TableRequest};
use crate::error::AppError;
use crate::table::Table;

pub use game_logs::{elapsed_minutes, fetch_game_logs, split_game_date};
pub use player_stats::{BATTING, FIELDING, PITCHING, StatDomain, fetch_player_stats};
pub use standings::fetch_standings;
pub use statcast::fetch_statcast;
pub use team_stats::{fetch_team_batting, fetch_team_fielding, fetch_team_pitching};
pub use war::fetch_war;

/// Issues one request per partition, shapes each response and stacks the
/// results in partition order.
///
/// Requests are sequential. The first failure aborts the fan-out and is
/// returned as is. Responses without any rows or columns are skipped, so a
/// fan-out in which every partition came back empty yields a shapeless table.
pub async fn fan_out<P, I, T, R, S>(
    provider: &P,
    label: &str,
    partitions: I,
    mut request_for: R,
    mut shape: S,
) -> Result<Table, AppError>
where
    P: StatsProvider + ?Sized,
    I: IntoIterator<Item = T>,
    R: FnMut(&T) -> TableRequest,
    S: FnMut(&T, Table) -> Result<Table, AppError>,
{
    let mut parts = Vec::new();
    for partition in partitions {
        let request = request_for(&partition);
        let table = provider.fetch_table(&request).await?;
        if table.is_shapeless() {
            debug!("{label}: {request} returned no rows");
            continue;
        }
        parts.push(shape(&partition, table)?);
    }

    let stacked = Table::concat(parts);
    debug!(
        "{label}: stacked {} rows x {} columns",
        stacked.len(),
        stacked.width()
    );
    Ok(stacked)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data_fetcher::provider::StatKind;
    use crate::testing_utils::{MockProvider, TableBuilder};
    use serde_json::json;

    fn team_request(season: &i32) -> TableRequest {
        TableRequest::TeamStats {
            kind: StatKind::Batting,
            season: *season,
        }
    }

    #[tokio::test]
    async fn test_fan_out_preserves_partition_order() {
        let provider = MockProvider::new().with_responder(|request| match request {
            TableRequest::TeamStats { season, .. } => Some(Ok(TableBuilder::new(["Team"])
                .row([json!(format!("T{season}"))])
                .build())),
            _ => None,
        });

        let stacked = fan_out(&provider, "test", [2021, 2019, 2020], team_request, |season, t| {
            Ok(t.with_constant("Season", json!(season)))
        })
        .await
        .unwrap();

        let seasons: Vec<i64> = stacked.rows().filter_map(|r| r.get_i64("Season")).collect();
        assert_eq!(seasons, vec![2021, 2019, 2020]);
        assert_eq!(provider.call_count(), 3);
    }

    #[tokio::test]
    async fn test_fan_out_stops_at_first_failure() {
        let provider = MockProvider::new().with_responder(|request| match request {
            TableRequest::TeamStats { season: 2020, .. } => {
                Some(Err(AppError::api_server_error(500, "boom", "mock://2020")))
            }
            TableRequest::TeamStats { .. } => Some(Ok(TableBuilder::new(["Team"]).build())),
            _ => None,
        });

        let result = fan_out(&provider, "test", [2019, 2020, 2021], team_request, |_, t| Ok(t)).await;

        assert!(matches!(result, Err(AppError::ApiServerError { status: 500, .. })));
        assert_eq!(provider.call_count(), 2);
    }

    #[tokio::test]
    async fn test_fan_out_skips_shapeless_responses() {
        let provider = MockProvider::new().with_responder(|_| Some(Ok(Table::default())));

        let stacked = fan_out(&provider, "test", [2019, 2020], team_request, |_, _| {
            Err(AppError::data_source("shape should not run"))
        })
        .await
        .unwrap();

        assert!(stacked.is_shapeless());
    }
}
