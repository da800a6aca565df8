//! Per-game schedule and results logs.

use chrono::NaiveDate;
use serde_json::{Value, json};
use tracing::{info, instrument};

use crate::data_fetcher::provider::{StatsProvider, TableRequest};
use crate::error::AppError;
use crate::pipeline::range::SeasonRange;
use crate::table::{Row, Table, key_of};

const SCHEDULE_COLUMNS: &[&str] = &["Date", "Tm", "Opp", "R", "RA", "Time", "D/N", "Attendance"];

/// Output layout of the game log table.
pub const GAME_LOG_COLUMNS: &[&str] = &[
    "Day",
    "Month",
    "Season",
    "Tm",
    "Opp",
    "R",
    "RA",
    "R_tot",
    "R_diff",
    "Time",
    "D/N",
    "Attendance",
];

/// Splits a schedule date such as `"Sunday, Apr 2"` or `"Monday, Jul 4 (2)"`
/// into zero-padded day and month strings (`"02"`, `"04"`).
pub fn split_game_date(date: &str, season: i32) -> Result<(String, String), AppError> {
    let malformed = || AppError::datetime_parse_error(format!("unrecognized game date '{date}'"));

    let (_, month_day) = date.split_once(',').ok_or_else(malformed)?;
    let mut parts = month_day.split_whitespace();
    let month = parts.next().ok_or_else(malformed)?;
    let day = parts.next().ok_or_else(malformed)?;

    let parsed = NaiveDate::parse_from_str(&format!("{season} {month} {day}"), "%Y %b %d")
        .map_err(|e| AppError::datetime_parse_error(format!("game date '{date}': {e}")))?;

    Ok((
        parsed.format("%d").to_string(),
        parsed.format("%m").to_string(),
    ))
}

/// Converts a game duration such as `"3:05"` into elapsed minutes.
pub fn elapsed_minutes(time: &str) -> Result<i64, AppError> {
    let malformed =
        || AppError::datetime_parse_error(format!("unrecognized game duration '{time}'"));

    let (hours, minutes) = time.trim().split_once(':').ok_or_else(malformed)?;
    let hours: i64 = hours.parse().map_err(|_| malformed())?;
    let minutes: i64 = minutes.parse().map_err(|_| malformed())?;
    if !(0..60).contains(&minutes) || hours < 0 {
        return Err(malformed());
    }
    Ok(hours * 60 + minutes)
}

fn runs(row: &Row<'_>) -> Option<(i64, i64)> {
    Some((row.get_i64("R")?, row.get_i64("RA")?))
}

fn derive_game_fields(table: Table, season: i32) -> Result<Table, AppError> {
    table
        .with_constant("Season", json!(season))
        .with_derived("R_tot", |row| {
            Ok(runs(&row).map_or(Value::Null, |(r, ra)| json!(r + ra)))
        })?
        .with_derived("R_diff", |row| {
            Ok(runs(&row).map_or(Value::Null, |(r, ra)| json!((r - ra).abs())))
        })?
        .with_derived("Day", |row| {
            date_part(&row, season).map(|parts| parts.map_or(Value::Null, |(day, _)| json!(day)))
        })?
        .with_derived("Month", |row| {
            date_part(&row, season)
                .map(|parts| parts.map_or(Value::Null, |(_, month)| json!(month)))
        })?
        .with_derived("Time", |row| match row.get("Time") {
            Value::Null => Ok(Value::Null),
            Value::String(time) => elapsed_minutes(time).map(|minutes| json!(minutes)),
            other => Err(AppError::datetime_parse_error(format!(
                "unrecognized game duration {other}"
            ))),
        })
}

fn date_part(row: &Row<'_>, season: i32) -> Result<Option<(String, String)>, AppError> {
    match row.get_str("Date") {
        Some(date) => split_game_date(date, season).map(Some),
        None if row.get("Date").is_null() => Ok(None),
        None => Err(AppError::datetime_parse_error(format!(
            "unrecognized game date {}",
            row.get("Date")
        ))),
    }
}

/// Team codes playing in `season` according to the historical team registry,
/// in registry order.
fn teams_for_season(registry: &Table, season: i32) -> Result<Vec<String>, AppError> {
    registry.require_columns("historical teams", &["yearID", "teamIDBR"])?;
    let mut teams: Vec<String> = Vec::new();
    for row in registry.rows() {
        if row.get_i64("yearID") != Some(i64::from(season)) {
            continue;
        }
        if let Some(team) = key_of(row.get("teamIDBR")) {
            if !teams.contains(&team) {
                teams.push(team);
            }
        }
    }
    if teams.is_empty() {
        return Err(AppError::data_source(format!(
            "historical team registry lists no teams for {season}"
        )));
    }
    Ok(teams)
}

/// Fetches every team's schedule and results for every season in `range`.
///
/// Each game appears once per participating team, from that team's point of
/// view (`Tm`). Derived fields: `R_tot = R + RA`, `R_diff = |R - RA|`,
/// `Time` in minutes, and `Day`/`Month` split out of the date.
#[instrument(skip(provider))]
pub async fn fetch_game_logs<P>(provider: &P, range: &SeasonRange) -> Result<Table, AppError>
where
    P: StatsProvider + ?Sized,
{
    info!("Fetching game logs for {range}");
    let registry = provider.fetch_table(&TableRequest::HistoricalTeams).await?;

    let mut parts = Vec::new();
    for season in range.seasons() {
        for team in teams_for_season(&registry, season)? {
            let schedule = provider
                .fetch_table(&TableRequest::Schedule { season, team })
                .await?;
            if schedule.is_shapeless() {
                continue;
            }
            schedule.require_columns("schedule", SCHEDULE_COLUMNS)?;
            parts.push(derive_game_fields(schedule, season)?.select("game logs", GAME_LOG_COLUMNS)?);
        }
    }

    let logs = Table::concat(parts).or_empty(GAME_LOG_COLUMNS.iter().copied());
    info!("Fetched {} game log rows for {range}", logs.len());
    Ok(logs)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing_utils::{MockProvider, TableBuilder};

    fn range(start: i32, end: i32) -> SeasonRange {
        SeasonRange::with_latest(start, end, 2024).unwrap()
    }

    fn schedule(team: &str, games: &[(&str, &str, Value, Value, Value)]) -> Table {
        let mut builder = TableBuilder::new(SCHEDULE_COLUMNS.iter().copied());
        for (date, opp, r, ra, time) in games {
            builder = builder.row([
                json!(date),
                json!(team),
                json!(opp),
                r.clone(),
                ra.clone(),
                time.clone(),
                json!("D"),
                json!(40123),
            ]);
        }
        builder.build()
    }

    #[test]
    fn test_split_game_date() {
        assert_eq!(
            split_game_date("Sunday, Apr 2", 2023).unwrap(),
            ("02".to_string(), "04".to_string())
        );
        assert_eq!(
            split_game_date("Monday, Jul 4 (2)", 2022).unwrap(),
            ("04".to_string(), "07".to_string())
        );
        assert_eq!(
            split_game_date("Saturday, Sep 30", 2023).unwrap(),
            ("30".to_string(), "09".to_string())
        );
        assert!(matches!(
            split_game_date("Apr 2", 2023),
            Err(AppError::DateTimeParse(_))
        ));
        assert!(split_game_date("Sunday, Foo 2", 2023).is_err());
    }

    #[test]
    fn test_elapsed_minutes() {
        assert_eq!(elapsed_minutes("3:05").unwrap(), 185);
        assert_eq!(elapsed_minutes("2:59").unwrap(), 179);
        assert!(elapsed_minutes("305").is_err());
        assert!(elapsed_minutes("3:75").is_err());
        assert!(elapsed_minutes("x:10").is_err());
    }

    #[tokio::test]
    async fn test_game_log_derived_fields() {
        let provider = MockProvider::new()
            .with_table(
                TableRequest::HistoricalTeams,
                TableBuilder::new(["yearID", "teamIDBR"])
                    .row([json!(2023), json!("NYY")])
                    .build(),
            )
            .with_table(
                TableRequest::Schedule {
                    season: 2023,
                    team: "NYY".to_string(),
                },
                schedule(
                    "NYY",
                    &[
                        ("Thursday, Mar 30", "SFG", json!(7), json!(3), json!("3:05")),
                        ("Friday, Apr 7", "BAL", json!(2.0), json!(5.0), json!("2:41")),
                        ("Saturday, Apr 8", "BAL", Value::Null, Value::Null, Value::Null),
                    ],
                ),
            );

        let logs = fetch_game_logs(&provider, &range(2023, 2023)).await.unwrap();

        assert_eq!(logs.columns(), GAME_LOG_COLUMNS);
        assert_eq!(logs.len(), 3);

        let opener = logs.row(0).unwrap();
        assert_eq!(opener.get("R_tot"), &json!(10));
        assert_eq!(opener.get("R_diff"), &json!(4));
        assert_eq!(opener.get("Time"), &json!(185));
        assert_eq!(opener.get("Day"), &json!("30"));
        assert_eq!(opener.get("Month"), &json!("03"));
        assert_eq!(opener.get("Season"), &json!(2023));

        let loss = logs.row(1).unwrap();
        assert_eq!(loss.get("R_diff"), &json!(3));
        assert_eq!(loss.get("Day"), &json!("07"));

        let postponed = logs.row(2).unwrap();
        assert!(postponed.get("R_tot").is_null());
        assert!(postponed.get("Time").is_null());
    }

    #[tokio::test]
    async fn test_malformed_time_fails_the_fetch() {
        let provider = MockProvider::new()
            .with_table(
                TableRequest::HistoricalTeams,
                TableBuilder::new(["yearID", "teamIDBR"])
                    .row([json!(2023), json!("NYY")])
                    .build(),
            )
            .with_responder(|request| match request {
                TableRequest::Schedule { .. } => Some(Ok(schedule(
                    "NYY",
                    &[("Thursday, Mar 30", "SFG", json!(1), json!(0), json!("late"))],
                ))),
                _ => None,
            });

        let err = fetch_game_logs(&provider, &range(2023, 2023)).await.unwrap_err();
        assert!(matches!(err, AppError::DateTimeParse(_)));
    }

    #[tokio::test]
    async fn test_one_schedule_request_per_registry_team() {
        let provider = MockProvider::new()
            .with_table(
                TableRequest::HistoricalTeams,
                TableBuilder::new(["yearID", "teamIDBR"])
                    .row([json!(2022), json!("NYY")])
                    .row([json!(2022), json!("BOS")])
                    .row([json!(2023), json!("NYY")])
                    .build(),
            )
            .with_responder(|request| match request {
                TableRequest::Schedule { .. } => Some(Ok(Table::default())),
                _ => None,
            });

        let logs = fetch_game_logs(&provider, &range(2022, 2023)).await.unwrap();
        assert!(logs.is_empty());
        assert_eq!(logs.columns(), GAME_LOG_COLUMNS);
        // registry + 2 teams in 2022 + 1 team in 2023
        assert_eq!(provider.call_count(), 4);
    }

    #[tokio::test]
    async fn test_season_missing_from_registry_is_data_source_error() {
        let provider = MockProvider::new().with_table(
            TableRequest::HistoricalTeams,
            TableBuilder::new(["yearID", "teamIDBR"])
                .row([json!(2022), json!("NYY")])
                .build(),
        );

        let err = fetch_game_logs(&provider, &range(2023, 2023)).await.unwrap_err();
        assert!(matches!(err, AppError::DataSource(_)));
    }
}
