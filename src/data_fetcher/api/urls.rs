//! URL building utilities for the provider endpoints

use crate::data_fetcher::provider::{PlayerRole, StatKind, TableRequest};

/// Builds the endpoint URL for a FanGraphs player leaderboard.
///
/// # Example
/// ```
/// use baseball_depot::data_fetcher::api::build_player_stats_url;
/// use baseball_depot::data_fetcher::StatKind;
///
/// let url = build_player_stats_url("https://api.example.com", StatKind::Batting, 2023, Some(9), 10);
/// assert_eq!(url, "https://api.example.com/fangraphs/batting?season=2023&qual=10&team=9");
/// ```
pub fn build_player_stats_url(
    api_domain: &str,
    kind: StatKind,
    season: i32,
    team: Option<u8>,
    minimum: u32,
) -> String {
    let mut url = format!(
        "{api_domain}/fangraphs/{}?season={season}&qual={minimum}",
        kind.as_str()
    );
    if let Some(team) = team {
        url.push_str(&format!("&team={team}"));
    }
    url
}

/// Builds the endpoint URL for FanGraphs team aggregates.
///
/// # Example
/// ```
/// use baseball_depot::data_fetcher::api::build_team_stats_url;
/// use baseball_depot::data_fetcher::StatKind;
///
/// let url = build_team_stats_url("https://api.example.com", StatKind::Fielding, 2021);
/// assert_eq!(url, "https://api.example.com/fangraphs/team-fielding?season=2021");
/// ```
pub fn build_team_stats_url(api_domain: &str, kind: StatKind, season: i32) -> String {
    format!("{api_domain}/fangraphs/team-{}?season={season}", kind.as_str())
}

/// Builds the Baseball-Reference schedule URL for one team-season.
pub fn build_schedule_url(api_domain: &str, season: i32, team: &str) -> String {
    format!("{api_domain}/bref/schedule?season={season}&team={team}")
}

fn statcast_prefix(api_domain: &str, role: PlayerRole) -> String {
    format!("{api_domain}/statcast/{}", role.as_str())
}

/// Builds the URL for any [`TableRequest`].
pub fn build_table_url(api_domain: &str, request: &TableRequest) -> String {
    match request {
        TableRequest::PlayerStats {
            kind,
            season,
            team,
            minimum,
        } => build_player_stats_url(api_domain, *kind, *season, *team, *minimum),
        TableRequest::TeamStats { kind, season } => {
            build_team_stats_url(api_domain, *kind, *season)
        }
        TableRequest::Register => format!("{api_domain}/chadwick/register"),
        TableRequest::People => format!("{api_domain}/lahman/people"),
        TableRequest::HistoricalTeams => format!("{api_domain}/lahman/teams"),
        TableRequest::Schedule { season, team } => build_schedule_url(api_domain, *season, team),
        TableRequest::StatcastExitVelo {
            role,
            season,
            min_bbe,
        } => format!(
            "{}-exitvelo-barrels?season={season}&min_bbe={min_bbe}",
            statcast_prefix(api_domain, *role)
        ),
        TableRequest::StatcastExpected {
            role,
            season,
            min_pa,
        } => format!(
            "{}-expected-stats?season={season}&min_pa={min_pa}",
            statcast_prefix(api_domain, *role)
        ),
        TableRequest::StatcastArsenal {
            season,
            min_pitches,
            metric,
        } => format!(
            "{api_domain}/statcast/pitcher-arsenal?season={season}&min_pitches={min_pitches}&metric={}",
            metric.as_str()
        ),
        TableRequest::War { role } => {
            let side = match role {
                PlayerRole::Batter => "batting",
                PlayerRole::Pitcher => "pitching",
            };
            format!("{api_domain}/bref/war-{side}")
        }
    }
}
