//! Test utilities: an in-memory [`StatsProvider`], a table builder and a
//! synthetic league that answers every provider request.

use std::collections::HashMap;
use std::sync::{Mutex, PoisonError};

use serde_json::{Value, json};

use crate::catalogs::{self, Catalog};
use crate::constants::FIRST_SUPPORTED_SEASON;
use crate::data_fetcher::provider::{PlayerRole, StatKind, StatsProvider, TableRequest};
use crate::error::AppError;
use crate::table::{Record, Table};
use crate::teams::team_abbreviation;

type Responder = Box<dyn Fn(&TableRequest) -> Option<Result<Table, AppError>> + Send + Sync>;

/// In-memory provider with canned tables per request.
///
/// Canned tables are consulted first, then the responder. A request neither
/// answers fails with `ApiNotFound`. Every request is recorded, including
/// failed ones.
#[derive(Default)]
pub struct MockProvider {
    tables: HashMap<TableRequest, Table>,
    responder: Option<Responder>,
    requests: Mutex<Vec<TableRequest>>,
}

impl MockProvider {
    pub fn new() -> Self {
        Self::default()
    }

    /// Answers `request` with `table`.
    pub fn with_table(mut self, request: TableRequest, table: Table) -> Self {
        self.tables.insert(request, table);
        self
    }

    /// Answers requests without a canned table. Returning `None` falls
    /// through to `ApiNotFound`.
    pub fn with_responder<F>(mut self, responder: F) -> Self
    where
        F: Fn(&TableRequest) -> Option<Result<Table, AppError>> + Send + Sync + 'static,
    {
        self.responder = Some(Box::new(responder));
        self
    }

    /// Requests received so far, in arrival order.
    pub fn requests(&self) -> Vec<TableRequest> {
        self.requests
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    pub fn call_count(&self) -> usize {
        self.requests
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    /// Number of received requests matching `predicate`.
    pub fn count_where<F>(&self, predicate: F) -> usize
    where
        F: Fn(&TableRequest) -> bool,
    {
        self.requests
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .iter()
            .filter(|request| predicate(request))
            .count()
    }
}

impl StatsProvider for MockProvider {
    async fn fetch_table(&self, request: &TableRequest) -> Result<Table, AppError> {
        self.requests
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(request.clone());

        if let Some(table) = self.tables.get(request) {
            return Ok(table.clone());
        }
        if let Some(result) = self.responder.as_ref().and_then(|respond| respond(request)) {
            return result;
        }
        Err(AppError::api_not_found(format!("mock://{request}")))
    }
}

/// Builds a [`Table`] row by row.
pub struct TableBuilder {
    table: Table,
}

impl TableBuilder {
    pub fn new<I, S>(columns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            table: Table::new(columns),
        }
    }

    pub fn row<I>(mut self, cells: I) -> Self
    where
        I: IntoIterator<Item = Value>,
    {
        self.table.push_row(cells.into_iter().collect());
        self
    }

    pub fn build(self) -> Table {
        self.table
    }
}

/// A player in a [`LeagueFixture`].
#[derive(Debug, Clone, PartialEq)]
pub struct FixturePlayer {
    pub key_fangraphs: i64,
    /// `None` keeps the player out of the identifier register.
    pub key_mlbam: Option<i64>,
    pub name: String,
    /// FanGraphs team index.
    pub team: u8,
    pub bats: bool,
    pub pitches: bool,
}

impl FixturePlayer {
    pub fn key_bbref(&self) -> String {
        format!("fix{:05}01", self.key_fangraphs)
    }

    pub fn key_retro(&self) -> String {
        format!("fix{:05}", self.key_fangraphs)
    }

    fn team_abbreviation(&self) -> &'static str {
        team_abbreviation(self.team).unwrap_or("UNK")
    }

    fn plays(&self, role: PlayerRole) -> bool {
        match role {
            PlayerRole::Batter => self.bats,
            PlayerRole::Pitcher => self.pitches,
        }
    }

    fn split_name(&self) -> (&str, &str) {
        self.name.split_once(' ').unwrap_or((self.name.as_str(), ""))
    }
}

/// A synthetic league answering every [`TableRequest`] with tables shaped
/// like the real providers' responses.
///
/// Each player plays every season for the same team. Leaderboards carry
/// every catalog column (zero-filled); team registry rows exist for every
/// team with at least one player.
#[derive(Debug, Clone, Default)]
pub struct LeagueFixture {
    players: Vec<FixturePlayer>,
}

/// Last season the fixture's historical tables cover.
const FIXTURE_LAST_SEASON: i32 = 2030;

impl LeagueFixture {
    pub fn new() -> Self {
        Self::default()
    }

    fn with_player(
        mut self,
        key_fangraphs: i64,
        key_mlbam: Option<i64>,
        name: &str,
        team: u8,
        bats: bool,
        pitches: bool,
    ) -> Self {
        self.players.push(FixturePlayer {
            key_fangraphs,
            key_mlbam,
            name: name.to_string(),
            team,
            bats,
            pitches,
        });
        self
    }

    pub fn batter(self, key_fangraphs: i64, key_mlbam: i64, name: &str, team: u8) -> Self {
        self.with_player(key_fangraphs, Some(key_mlbam), name, team, true, false)
    }

    pub fn pitcher(self, key_fangraphs: i64, key_mlbam: i64, name: &str, team: u8) -> Self {
        self.with_player(key_fangraphs, Some(key_mlbam), name, team, false, true)
    }

    pub fn two_way(self, key_fangraphs: i64, key_mlbam: i64, name: &str, team: u8) -> Self {
        self.with_player(key_fangraphs, Some(key_mlbam), name, team, true, true)
    }

    /// A batter the identifier register does not know.
    pub fn unregistered_batter(self, key_fangraphs: i64, name: &str, team: u8) -> Self {
        self.with_player(key_fangraphs, None, name, team, true, false)
    }

    pub fn players(&self) -> &[FixturePlayer] {
        &self.players
    }

    /// Players appearing in leaderboards of `kind`, in fixture order.
    pub fn players_for(&self, kind: StatKind) -> impl Iterator<Item = &FixturePlayer> {
        self.players.iter().filter(move |player| match kind {
            StatKind::Batting => player.bats,
            StatKind::Pitching => player.pitches,
            StatKind::Fielding => true,
        })
    }

    /// Distinct team indices with at least one player, ascending.
    pub fn teams(&self) -> Vec<u8> {
        let mut teams: Vec<u8> = self.players.iter().map(|player| player.team).collect();
        teams.sort_unstable();
        teams.dedup();
        teams
    }

    /// A provider backed by this league.
    pub fn provider(self) -> MockProvider {
        MockProvider::new().with_responder(move |request| Some(Ok(self.table_for(request))))
    }

    /// The table the league serves for `request`.
    pub fn table_for(&self, request: &TableRequest) -> Table {
        let records = match request {
            TableRequest::PlayerStats {
                kind, season, team, ..
            } => self.leaderboard(*kind, *season, *team),
            TableRequest::TeamStats { kind, season } => self.team_stats(*kind, *season),
            TableRequest::Register => self.register(),
            TableRequest::People => self.people(),
            TableRequest::HistoricalTeams => self.historical_teams(),
            TableRequest::Schedule { season, team } => schedule(*season, team),
            TableRequest::StatcastExitVelo { role, season, .. } => {
                self.statcast(*role, *season, |player, record| {
                    let (first, last) = player.split_name();
                    record.insert("last_name".into(), json!(last));
                    record.insert("first_name".into(), json!(first));
                    record.insert("attempts".into(), json!(250));
                    record.insert("avg_hit_speed".into(), json!(91.4));
                    record.insert("brl_percent".into(), json!(12.5));
                })
            }
            TableRequest::StatcastExpected { role, season, .. } => {
                self.statcast(*role, *season, |player, record| {
                    let (first, last) = player.split_name();
                    record.insert("last_name, first_name".into(), json!(format!("{last}, {first}")));
                    record.insert("pa".into(), json!(400));
                    record.insert("est_ba".into(), json!(0.271));
                    record.insert("est_woba".into(), json!(0.352));
                })
            }
            TableRequest::StatcastArsenal { season, metric, .. } => {
                let column = format!("ff_{}", metric.as_str());
                self.statcast(PlayerRole::Pitcher, *season, |_, record| {
                    if let Some(id) = record.remove("player_id") {
                        record.insert("pitcher".into(), id);
                    }
                    record.insert(column.clone(), json!(95));
                })
            }
            TableRequest::War { role } => self.war(*role),
        };
        Table::from_records(records)
    }

    fn leaderboard(&self, kind: StatKind, season: i32, team: Option<u8>) -> Vec<Record> {
        let catalog = match kind {
            StatKind::Batting => &catalogs::HITTING,
            StatKind::Pitching => &catalogs::PITCHING,
            StatKind::Fielding => &catalogs::FIELDING,
        };
        self.players_for(kind)
            .filter(|player| team.is_none_or(|team| player.team == team))
            .map(|player| {
                let mut record = Record::new();
                record.insert("IDfg".into(), json!(player.key_fangraphs));
                record.insert("Name".into(), json!(player.name));
                record.insert("Age".into(), json!(season - 1995));
                record.insert("G".into(), json!(150));
                record.insert("GS".into(), json!(if player.pitches { 30 } else { 0 }));
                if team.is_none() {
                    record.insert("Team".into(), json!(player.team_abbreviation()));
                }
                zero_fill(&mut record, catalog);
                record
            })
            .collect()
    }

    fn team_stats(&self, kind: StatKind, season: i32) -> Vec<Record> {
        let catalog = match kind {
            StatKind::Batting => &catalogs::HITTING,
            StatKind::Pitching => &catalogs::PITCHING,
            StatKind::Fielding => &catalogs::TEAM_FIELDING,
        };
        self.teams()
            .into_iter()
            .map(|team| {
                let mut record = Record::new();
                record.insert("teamIDfg".into(), json!(team));
                record.insert("Team".into(), json!(team_abbreviation(team).unwrap_or("UNK")));
                zero_fill(&mut record, catalog);
                if kind == StatKind::Pitching {
                    record.insert("W".into(), json!(81 + i64::from(team) + i64::from(season % 2)));
                    record.insert("L".into(), json!(81 - i64::from(team) - i64::from(season % 2)));
                }
                record
            })
            .collect()
    }

    fn register(&self) -> Vec<Record> {
        self.players
            .iter()
            .filter_map(|player| {
                let key_mlbam = player.key_mlbam?;
                let (first, last) = player.split_name();
                let mut record = Record::new();
                record.insert("name_last".into(), json!(last));
                record.insert("name_first".into(), json!(first));
                record.insert("key_mlbam".into(), json!(key_mlbam));
                record.insert("key_retro".into(), json!(player.key_retro()));
                record.insert("key_bbref".into(), json!(player.key_bbref()));
                record.insert("key_fangraphs".into(), json!(player.key_fangraphs));
                record.insert("mlb_played_first".into(), json!(2015));
                record.insert("mlb_played_last".into(), json!(2024));
                Some(record)
            })
            .collect()
    }

    fn people(&self) -> Vec<Record> {
        self.players
            .iter()
            .map(|player| {
                let (first, last) = player.split_name();
                let mut record = Record::new();
                record.insert("playerID".into(), json!(player.key_bbref()));
                record.insert("birthYear".into(), json!(1990));
                record.insert("birthCountry".into(), json!("USA"));
                record.insert("deathYear".into(), Value::Null);
                record.insert("nameFirst".into(), json!(first));
                record.insert("nameLast".into(), json!(last));
                record.insert("weight".into(), json!(220));
                record.insert("height".into(), json!(75));
                record.insert("bats".into(), json!("R"));
                record.insert("throws".into(), json!("R"));
                record.insert("retroID".into(), json!(player.key_retro()));
                record.insert("bbrefID".into(), json!(player.key_bbref()));
                record
            })
            .collect()
    }

    fn historical_teams(&self) -> Vec<Record> {
        let teams = self.teams();
        let mut records = Vec::new();
        for season in FIRST_SUPPORTED_SEASON..=FIXTURE_LAST_SEASON {
            for (rank, team) in teams.iter().enumerate() {
                let abbreviation = team_abbreviation(*team).unwrap_or("UNK");
                let league = if *team <= 14 { "AL" } else { "NL" };
                let division = ["E", "C", "W"][usize::from(*team) % 3];
                let mut record = Record::new();
                record.insert("yearID".into(), json!(season));
                record.insert("lgID".into(), json!(league));
                record.insert("teamID".into(), json!(abbreviation));
                record.insert("franchID".into(), json!(abbreviation));
                record.insert("divID".into(), json!(division));
                record.insert("Rank".into(), json!(rank + 1));
                record.insert("W".into(), json!(90 - rank));
                record.insert("L".into(), json!(72 + rank));
                record.insert("name".into(), json!(format!("{abbreviation} Fixture Club")));
                record.insert("BPF".into(), json!(100 + rank));
                record.insert("PPF".into(), json!(100 - rank));
                record.insert("teamIDBR".into(), json!(abbreviation));
                records.push(record);
            }
        }
        records
    }

    fn statcast<F>(&self, role: PlayerRole, season: i32, mut decorate: F) -> Vec<Record>
    where
        F: FnMut(&FixturePlayer, &mut Record),
    {
        self.players
            .iter()
            .filter(|player| player.plays(role))
            .filter_map(|player| {
                let key_mlbam = player.key_mlbam?;
                let mut record = Record::new();
                record.insert("player_id".into(), json!(key_mlbam));
                record.insert("year".into(), json!(season));
                decorate(player, &mut record);
                Some(record)
            })
            .collect()
    }

    fn war(&self, role: PlayerRole) -> Vec<Record> {
        let mut records = Vec::new();
        for player in self.players.iter().filter(|player| player.plays(role)) {
            let Some(key_mlbam) = player.key_mlbam else {
                continue;
            };
            for season in FIRST_SUPPORTED_SEASON..=FIXTURE_LAST_SEASON {
                let mut record = Record::new();
                record.insert("name_common".into(), json!(player.name));
                record.insert("age".into(), json!(season - 1990));
                record.insert("mlb_ID".into(), json!(key_mlbam));
                record.insert("player_ID".into(), json!(player.key_bbref()));
                record.insert("year_ID".into(), json!(season));
                record.insert("team_ID".into(), json!(player.team_abbreviation()));
                record.insert("lg_ID".into(), json!("AL"));
                record.insert("WAR".into(), json!(2.5));
                records.push(record);
            }
        }
        records
    }
}

fn zero_fill(record: &mut Record, catalog: &Catalog) {
    for column in catalog.required {
        record.entry(column.to_string()).or_insert(json!(0));
    }
}

/// Two games per team-season: a 7-3 win on `"Sunday, Apr 2"` and a 2-5 loss
/// in the second game of a doubleheader on `"Monday, Jul 4 (2)"`.
fn schedule(season: i32, team: &str) -> Vec<Record> {
    [
        ("Sunday, Apr 2", 7, 3, "3:05", "D"),
        ("Monday, Jul 4 (2)", 2, 5, "2:48", "N"),
    ]
    .into_iter()
    .enumerate()
    .map(|(game, (date, runs, allowed, time, day_night))| {
        let mut record = Record::new();
        record.insert("Gm#".into(), json!(game + 1));
        record.insert("Date".into(), json!(date));
        record.insert("Tm".into(), json!(team));
        record.insert("Home_Away".into(), Value::Null);
        record.insert("Opp".into(), json!("OPP"));
        record.insert("W/L".into(), json!(if runs > allowed { "W" } else { "L" }));
        record.insert("R".into(), json!(runs));
        record.insert("RA".into(), json!(allowed));
        record.insert("Time".into(), json!(time));
        record.insert("D/N".into(), json!(day_night));
        record.insert("Attendance".into(), json!(30000 + season));
        record
    })
    .collect()
}
