//! Player leaderboards for batting, pitching and fielding.
//!
//! The three domains differ only in their [`StatDomain`] descriptor; one
//! routine fetches all of them.

use serde_json::{Value, json};
use tracing::{debug, info, instrument};

use super::fan_out;
use crate::catalogs::{self, Catalog};
use crate::data_fetcher::provider::{StatKind, StatsProvider, TableRequest};
use crate::error::AppError;
use crate::pipeline::range::SeasonRange;
use crate::table::Table;
use crate::teams::{team_abbreviation, team_indices};

/// Describes one player leaderboard domain.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StatDomain {
    pub kind: StatKind,
    /// Identity and tagging columns leading the output, in output order.
    pub identity: &'static [&'static str],
    pub catalog: &'static Catalog,
    /// Query once per team index instead of once league-wide.
    pub per_team: bool,
}

/// Identity columns some leaderboards leave out; filled with nulls when absent.
const OPTIONAL_IDENTITY: &[&str] = &["Age"];

pub const BATTING: StatDomain = StatDomain {
    kind: StatKind::Batting,
    identity: &["key_fangraphs", "Name", "Age", "Team", "G", "Season"],
    catalog: &catalogs::HITTING,
    per_team: true,
};

pub const PITCHING: StatDomain = StatDomain {
    kind: StatKind::Pitching,
    identity: &["key_fangraphs", "Name", "Age", "Team", "Season", "G", "GS"],
    catalog: &catalogs::PITCHING,
    per_team: true,
};

pub const FIELDING: StatDomain = StatDomain {
    kind: StatKind::Fielding,
    identity: &["key_fangraphs", "Name", "Team", "Season"],
    catalog: &catalogs::FIELDING,
    per_team: false,
};

impl StatDomain {
    /// Output columns: identity columns followed by the catalog.
    pub fn columns(&self) -> Vec<&'static str> {
        self.identity
            .iter()
            .copied()
            .chain(self.catalog.columns())
            .collect()
    }

    fn label(&self) -> &'static str {
        self.catalog.name
    }
}

/// Fetches a player leaderboard for every season in `range`.
///
/// Team-scoped domains issue one request per season and team index, with
/// the team abbreviation stamped on every row. Rows come back season-major,
/// then in team index order.
#[instrument(skip(provider), fields(domain = domain.label()))]
pub async fn fetch_player_stats<P>(
    provider: &P,
    range: &SeasonRange,
    domain: &StatDomain,
    minimum: u32,
) -> Result<Table, AppError>
where
    P: StatsProvider + ?Sized,
{
    info!(
        "Fetching {} leaderboards for {range} ({} >= {minimum})",
        domain.label(),
        domain.kind.threshold_field()
    );

    let partitions: Vec<(i32, Option<u8>)> = if domain.per_team {
        range
            .seasons()
            .flat_map(|season| team_indices().map(move |team| (season, Some(team))))
            .collect()
    } else {
        range.seasons().map(|season| (season, None)).collect()
    };

    let stacked = fan_out(
        provider,
        domain.label(),
        partitions,
        |&(season, team)| TableRequest::PlayerStats {
            kind: domain.kind,
            season,
            team,
            minimum,
        },
        |&(season, team), table| shape_leaderboard(domain, season, team, table),
    )
    .await?;

    let stats = stacked.or_empty(domain.columns());
    info!("Fetched {} {} rows for {range}", stats.len(), domain.label());
    Ok(stats)
}

fn shape_leaderboard(
    domain: &StatDomain,
    season: i32,
    team: Option<u8>,
    table: Table,
) -> Result<Table, AppError> {
    let mut table = table
        .rename(&[("IDfg", "key_fangraphs")])
        .with_constant("Season", json!(season));

    for column in OPTIONAL_IDENTITY {
        if domain.identity.contains(column) && !table.has_column(column) {
            debug!("{} leaderboard for {season} has no {column} column", domain.label());
            table = table.with_constant(column, Value::Null);
        }
    }

    if let Some(index) = team {
        let abbreviation = team_abbreviation(index).ok_or_else(|| {
            AppError::data_source(format!("no team abbreviation for index {index}"))
        })?;
        table = table.with_constant("Team", json!(abbreviation));
    }

    table.select_catalog(domain.label(), domain.identity, domain.catalog)
}
