//! Team standings and park factors from the historical team registry.

use serde_json::{Value, json};
use tracing::{info, instrument};

use crate::data_fetcher::provider::{StatsProvider, TableRequest};
use crate::error::AppError;
use crate::pipeline::range::SeasonRange;
use crate::table::Table;

const REGISTRY_COLUMNS: &[&str] = &[
    "teamIDBR", "name", "yearID", "divID", "Rank", "W", "L", "BPF", "PPF",
];

pub const STANDINGS_COLUMNS: &[&str] = &[
    "Team", "TeamName", "Season", "Division", "Rank", "W", "L", "BPF", "PPF",
];

fn division_name(code: &str) -> Option<&'static str> {
    match code.trim() {
        "E" => Some("EAST"),
        "C" => Some("CENTRAL"),
        "W" => Some("WEST"),
        _ => None,
    }
}

/// One row per team and season in `range`, seasons ascending.
#[instrument(skip(provider))]
pub async fn fetch_standings<P>(provider: &P, range: &SeasonRange) -> Result<Table, AppError>
where
    P: StatsProvider + ?Sized,
{
    info!("Fetching standings for {range}");
    let registry = provider.fetch_table(&TableRequest::HistoricalTeams).await?;
    if registry.is_shapeless() {
        return Ok(Table::new(STANDINGS_COLUMNS.iter().copied()));
    }
    registry.require_columns("historical teams", REGISTRY_COLUMNS)?;

    let by_season = range.seasons().map(|season| {
        registry.filter(|row| row.get_i64("yearID") == Some(i64::from(season)))
    });

    let standings = Table::concat(by_season.collect::<Vec<_>>())
        .with_derived("divID", |row| {
            Ok(row
                .get_str("divID")
                .and_then(division_name)
                .map_or(Value::Null, |division| json!(division)))
        })?
        .select("historical teams", REGISTRY_COLUMNS)?
        .rename(&[
            ("teamIDBR", "Team"),
            ("name", "TeamName"),
            ("yearID", "Season"),
            ("divID", "Division"),
        ]);

    info!("Fetched {} standings rows for {range}", standings.len());
    Ok(standings)
}
