//! The seam between the pipeline and the upstream statistics providers.
//!
//! Every upstream query is described by a [`TableRequest`]; a
//! [`StatsProvider`] turns a request into a [`Table`]. The HTTP provider,
//! the per-run memo and the test mock all implement the same trait.

use std::fmt;
use std::future::Future;

use crate::error::AppError;
use crate::table::Table;

/// Statistical domain of a FanGraphs player or team query.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StatKind {
    Batting,
    Pitching,
    Fielding,
}

impl StatKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            StatKind::Batting => "batting",
            StatKind::Pitching => "pitching",
            StatKind::Fielding => "fielding",
        }
    }

    /// Field the provider applies the qualification minimum to.
    pub fn threshold_field(&self) -> &'static str {
        match self {
            StatKind::Batting => "PA",
            StatKind::Pitching => "IP",
            StatKind::Fielding => "Inn",
        }
    }
}

/// Side of the ball for Statcast and WAR tables.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PlayerRole {
    Batter,
    Pitcher,
}

impl PlayerRole {
    pub fn as_str(&self) -> &'static str {
        match self {
            PlayerRole::Batter => "batter",
            PlayerRole::Pitcher => "pitcher",
        }
    }
}

/// Per-pitch-type aggregate reported by the Statcast arsenal endpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ArsenalMetric {
    AverageSpeed,
    AverageSpin,
}

impl ArsenalMetric {
    pub fn as_str(&self) -> &'static str {
        match self {
            ArsenalMetric::AverageSpeed => "avg_speed",
            ArsenalMetric::AverageSpin => "avg_spin",
        }
    }
}

/// One upstream query.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum TableRequest {
    /// FanGraphs player leaderboard for one season, optionally one team.
    PlayerStats {
        kind: StatKind,
        season: i32,
        team: Option<u8>,
        minimum: u32,
    },
    /// FanGraphs team aggregates for one season.
    TeamStats { kind: StatKind, season: i32 },
    /// Chadwick Bureau identifier register (bulk).
    Register,
    /// Lahman people table (bulk).
    People,
    /// Lahman teams table (bulk).
    HistoricalTeams,
    /// Baseball-Reference schedule and results for one team-season.
    Schedule { season: i32, team: String },
    StatcastExitVelo {
        role: PlayerRole,
        season: i32,
        min_bbe: u32,
    },
    StatcastExpected {
        role: PlayerRole,
        season: i32,
        min_pa: u32,
    },
    StatcastArsenal {
        season: i32,
        min_pitches: u32,
        metric: ArsenalMetric,
    },
    /// Baseball-Reference WAR table (bulk, all seasons).
    War { role: PlayerRole },
}

impl TableRequest {
    /// Name of the upstream source serving this request.
    pub fn source(&self) -> &'static str {
        match self {
            TableRequest::PlayerStats { .. } | TableRequest::TeamStats { .. } => "FanGraphs",
            TableRequest::Register => "Chadwick",
            TableRequest::People | TableRequest::HistoricalTeams => "Lahman",
            TableRequest::Schedule { .. } | TableRequest::War { .. } => "Baseball-Reference",
            TableRequest::StatcastExitVelo { .. }
            | TableRequest::StatcastExpected { .. }
            | TableRequest::StatcastArsenal { .. } => "Statcast",
        }
    }

    /// Bulk requests return a provider's whole universe with no filters.
    pub fn is_bulk(&self) -> bool {
        matches!(
            self,
            TableRequest::Register
                | TableRequest::People
                | TableRequest::HistoricalTeams
                | TableRequest::War { .. }
        )
    }
}

impl fmt::Display for TableRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TableRequest::PlayerStats {
                kind,
                season,
                team,
                minimum,
            } => {
                write!(f, "FanGraphs {} {season}", kind.as_str())?;
                if let Some(team) = team {
                    write!(f, " team {team}")?;
                }
                write!(f, " ({} >= {minimum})", kind.threshold_field())
            }
            TableRequest::TeamStats { kind, season } => {
                write!(f, "FanGraphs team {} {season}", kind.as_str())
            }
            TableRequest::Register => write!(f, "Chadwick register"),
            TableRequest::People => write!(f, "Lahman people"),
            TableRequest::HistoricalTeams => write!(f, "Lahman teams"),
            TableRequest::Schedule { season, team } => {
                write!(f, "Baseball-Reference schedule {team} {season}")
            }
            TableRequest::StatcastExitVelo { role, season, .. } => {
                write!(f, "Statcast {} exit velocity {season}", role.as_str())
            }
            TableRequest::StatcastExpected { role, season, .. } => {
                write!(f, "Statcast {} expected stats {season}", role.as_str())
            }
            TableRequest::StatcastArsenal { season, metric, .. } => {
                write!(f, "Statcast pitch arsenal {} {season}", metric.as_str())
            }
            TableRequest::War { role } => {
                write!(f, "Baseball-Reference {} WAR", role.as_str())
            }
        }
    }
}

/// Anything that can answer a [`TableRequest`] with a table.
///
/// Implementations must not retry: a failed request is reported to the
/// caller, which aborts the whole assembly.
pub trait StatsProvider {
    fn fetch_table(
        &self,
        request: &TableRequest,
    ) -> impl Future<Output = Result<Table, AppError>>;
}

impl<P: StatsProvider + ?Sized> StatsProvider for &P {
    fn fetch_table(
        &self,
        request: &TableRequest,
    ) -> impl Future<Output = Result<Table, AppError>> {
        (**self).fetch_table(request)
    }
}
