//! Assembles the batting, pitching and master datasets.

use serde::Serialize;
use tracing::{info, instrument};

use super::biography::build_biography;
use super::identity::resolve_identities;
use super::range::SeasonRange;
use crate::config::Qualification;
use crate::data_fetcher::cache::CachedProvider;
use crate::data_fetcher::processors::{
    self, StatDomain, fetch_game_logs, fetch_player_stats, fetch_standings, fetch_statcast,
    fetch_team_batting, fetch_team_fielding, fetch_team_pitching, fetch_war,
};
use crate::data_fetcher::provider::{PlayerRole, StatsProvider, TableRequest};
use crate::error::AppError;
use crate::table::Table;

/// Tables produced for one side of the ball.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PlayerTables {
    /// Season statistics, one row per player, season and team.
    pub stats: Table,
    pub statcast: Table,
    pub war: Table,
    /// Team aggregates for the same side.
    pub team: Table,
    pub bio: Table,
    pub ids: Table,
}

impl PlayerTables {
    pub fn tables(&self) -> Vec<(&'static str, &Table)> {
        vec![
            ("stats", &self.stats),
            ("statcast", &self.statcast),
            ("war", &self.war),
            ("team", &self.team),
            ("bio", &self.bio),
            ("ids", &self.ids),
        ]
    }
}

/// Every dataset for a season range.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MasterTables {
    pub batting: Table,
    pub pitching: Table,
    pub batting_statcast: Table,
    pub pitching_statcast: Table,
    pub batting_war: Table,
    pub pitching_war: Table,
    pub team_batting: Table,
    pub team_pitching: Table,
    pub team_fielding: Table,
    /// Player fielding, restricted to players with an identity row.
    pub fielding: Table,
    pub bio: Table,
    pub ids: Table,
    pub game_logs: Table,
    pub standings: Table,
}

impl MasterTables {
    pub fn tables(&self) -> Vec<(&'static str, &Table)> {
        vec![
            ("batting", &self.batting),
            ("pitching", &self.pitching),
            ("batting_statcast", &self.batting_statcast),
            ("pitching_statcast", &self.pitching_statcast),
            ("batting_war", &self.batting_war),
            ("pitching_war", &self.pitching_war),
            ("team_batting", &self.team_batting),
            ("team_pitching", &self.team_pitching),
            ("team_fielding", &self.team_fielding),
            ("fielding", &self.fielding),
            ("bio", &self.bio),
            ("ids", &self.ids),
            ("game_logs", &self.game_logs),
            ("standings", &self.standings),
        ]
    }
}

#[derive(Debug, Clone, Copy)]
enum Side {
    Batting,
    Pitching,
}

impl Side {
    fn domain(self) -> &'static StatDomain {
        match self {
            Side::Batting => &processors::BATTING,
            Side::Pitching => &processors::PITCHING,
        }
    }

    fn role(self) -> PlayerRole {
        match self {
            Side::Batting => PlayerRole::Batter,
            Side::Pitching => PlayerRole::Pitcher,
        }
    }

    fn minimum(self, qualification: &Qualification) -> u32 {
        match self {
            Side::Batting => qualification.batting_min_pa,
            Side::Pitching => qualification.pitching_min_ip,
        }
    }
}

/// Builds datasets from a [`StatsProvider`].
///
/// Each call validates its season range before issuing any request and
/// memoizes provider tables for the duration of that call only.
pub struct Assembler<P> {
    provider: P,
    qualification: Qualification,
}

impl<P: StatsProvider> Assembler<P> {
    pub fn new(provider: P) -> Self {
        Self::with_qualification(provider, Qualification::default())
    }

    pub fn with_qualification(provider: P, qualification: Qualification) -> Self {
        Self {
            provider,
            qualification,
        }
    }

    pub fn provider(&self) -> &P {
        &self.provider
    }

    pub fn qualification(&self) -> &Qualification {
        &self.qualification
    }

    /// Batting statistics, Statcast, WAR, team batting, biographies and
    /// identities for `start..=end`.
    #[instrument(skip(self))]
    pub async fn gen_batting(&self, start: i32, end: i32) -> Result<PlayerTables, AppError> {
        let range = SeasonRange::new(start, end)?;
        self.player_tables(&range, Side::Batting).await
    }

    /// Pitching counterpart of [`Assembler::gen_batting`].
    #[instrument(skip(self))]
    pub async fn gen_pitching(&self, start: i32, end: i32) -> Result<PlayerTables, AppError> {
        let range = SeasonRange::new(start, end)?;
        self.player_tables(&range, Side::Pitching).await
    }

    /// Every dataset for `start..=end`, with one identity and one biography
    /// table shared by batters and pitchers.
    #[instrument(skip(self))]
    pub async fn master(&self, start: i32, end: i32) -> Result<MasterTables, AppError> {
        let range = SeasonRange::new(start, end)?;
        self.master_in(&range).await
    }

    async fn player_tables(
        &self,
        range: &SeasonRange,
        side: Side,
    ) -> Result<PlayerTables, AppError> {
        info!("Assembling {side:?} tables for {range}");
        let memo = CachedProvider::new(&self.provider);

        let stats = self.season_stats(&memo, range, side).await?;
        let ids = self.identities(&memo, &stats).await?;
        let bio = self.biography(&memo, &ids).await?;
        let stats = attach_mlbam(stats, &ids)?;
        let (statcast, war) = self.peripherals(&memo, range, side, &stats).await?;
        let team = match side {
            Side::Batting => fetch_team_batting(&memo, range).await?,
            Side::Pitching => fetch_team_pitching(&memo, range).await?,
        };

        info!("Assembled {side:?} tables for {range} ({})", memo.stats().await);
        Ok(PlayerTables {
            stats,
            statcast,
            war,
            team,
            bio,
            ids,
        })
    }

    async fn master_in(&self, range: &SeasonRange) -> Result<MasterTables, AppError> {
        info!("Assembling master tables for {range}");
        let memo = CachedProvider::new(&self.provider);

        let batting = self.season_stats(&memo, range, Side::Batting).await?;
        let pitching = self.season_stats(&memo, range, Side::Pitching).await?;

        let players = Table::concat([
            batting.select("batting", PLAYER_ROW_COLUMNS)?,
            pitching.select("pitching", PLAYER_ROW_COLUMNS)?,
        ]);
        let ids = self.identities(&memo, &players).await?;
        let bio = self.biography(&memo, &ids).await?;

        let batting = attach_mlbam(batting, &ids)?;
        let pitching = attach_mlbam(pitching, &ids)?;
        let (batting_statcast, batting_war) =
            self.peripherals(&memo, range, Side::Batting, &batting).await?;
        let (pitching_statcast, pitching_war) = self
            .peripherals(&memo, range, Side::Pitching, &pitching)
            .await?;

        let team_batting = fetch_team_batting(&memo, range).await?;
        let team_pitching = fetch_team_pitching(&memo, range).await?;
        let team_fielding = fetch_team_fielding(&memo, range).await?;

        let fielding = fetch_player_stats(
            &memo,
            range,
            &processors::FIELDING,
            self.qualification.fielding_min_inn,
        )
        .await?
        .semi_join(&ids, &["key_fangraphs"], "fielding")?;

        let game_logs = fetch_game_logs(&memo, range).await?;
        let standings = fetch_standings(&memo, range).await?;

        info!("Assembled master tables for {range} ({})", memo.stats().await);
        Ok(MasterTables {
            batting,
            pitching,
            batting_statcast,
            pitching_statcast,
            batting_war,
            pitching_war,
            team_batting,
            team_pitching,
            team_fielding,
            fielding,
            bio,
            ids,
            game_logs,
            standings,
        })
    }

    async fn season_stats<Q>(
        &self,
        provider: &Q,
        range: &SeasonRange,
        side: Side,
    ) -> Result<Table, AppError>
    where
        Q: StatsProvider + ?Sized,
    {
        fetch_player_stats(
            provider,
            range,
            side.domain(),
            side.minimum(&self.qualification),
        )
        .await
    }

    async fn identities<Q>(&self, provider: &Q, players: &Table) -> Result<Table, AppError>
    where
        Q: StatsProvider + ?Sized,
    {
        let register = provider.fetch_table(&TableRequest::Register).await?;
        resolve_identities(players, &register)
    }

    async fn biography<Q>(&self, provider: &Q, ids: &Table) -> Result<Table, AppError>
    where
        Q: StatsProvider + ?Sized,
    {
        let people = provider.fetch_table(&TableRequest::People).await?;
        build_biography(ids, &people)
    }

    /// Statcast and WAR tables keyed off the player rows in `stats`.
    async fn peripherals<Q>(
        &self,
        provider: &Q,
        range: &SeasonRange,
        side: Side,
        stats: &Table,
    ) -> Result<(Table, Table), AppError>
    where
        Q: StatsProvider + ?Sized,
    {
        let statcast = fetch_statcast(provider, range, side.role(), &self.qualification).await?;
        let statcast = stats
            .select("statcast keys", &["key_mlbam", "Season"])?
            .distinct()
            .left_join(&statcast, &["key_mlbam", "Season"], "statcast")?;

        let war = fetch_war(provider, range, side.role()).await?;
        let war = stats
            .select("war keys", &["key_mlbam", "Season", "Team"])?
            .left_join(&war, &["key_mlbam", "Season", "Team"], "war")?;

        Ok((statcast, war))
    }
}

const PLAYER_ROW_COLUMNS: &[&str] = &["key_fangraphs", "Name", "Team", "Season"];

/// Inserts `key_mlbam` right after `key_fangraphs`.
fn attach_mlbam(stats: Table, ids: &Table) -> Result<Table, AppError> {
    let keys = ids.select("identities", &["key_fangraphs", "key_mlbam"])?;
    let joined = stats.left_join(&keys, &["key_fangraphs"], "statistics identities")?;

    let mut order: Vec<&str> = Vec::with_capacity(joined.width());
    for column in stats.columns() {
        order.push(column);
        if column == "key_fangraphs" {
            order.push("key_mlbam");
        }
    }
    joined.select("statistics", &order)
}
