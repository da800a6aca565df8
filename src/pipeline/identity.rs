//! Canonical player identities.
//!
//! Every player row the leaderboards produce is keyed by `key_fangraphs`.
//! The identifier register maps that key onto the Statcast (`key_mlbam`),
//! Retrosheet (`key_retro`) and Baseball-Reference (`key_bbref`) keys.
//! Players the register does not know keep their row with null keys.

use tracing::{debug, info, instrument, warn};

use crate::error::AppError;
use crate::table::Table;

pub const IDENTITY_COLUMNS: &[&str] = &[
    "key_fangraphs",
    "Name",
    "Team",
    "key_mlbam",
    "key_retro",
    "key_bbref",
    "debut",
    "recent_season",
];

const PLAYER_COLUMNS: &[&str] = &["key_fangraphs", "Name", "Team"];

/// One row per player, carrying the team of the player's latest season.
///
/// Rows are ordered by `Season` descending with ties kept in input order, so
/// the first row per `key_fangraphs` wins. Without a `Season` column the
/// first occurrence wins.
fn latest_team_per_player(players: &Table) -> Result<Table, AppError> {
    let ordered = if players.has_column("Season") {
        players.sort_by(|a, b| b.get_i64("Season").cmp(&a.get_i64("Season")))
    } else {
        players.clone()
    };
    ordered
        .distinct_on("players", &["key_fangraphs"])?
        .select("players", PLAYER_COLUMNS)
}

/// Resolves every distinct player in `players` to a canonical identity row.
///
/// `players` must carry `key_fangraphs`, `Name` and `Team`. The output has
/// exactly one row per distinct `key_fangraphs` in the input, in order of
/// each player's latest season.
#[instrument(skip(players, register))]
pub fn resolve_identities(players: &Table, register: &Table) -> Result<Table, AppError> {
    players.require_columns("players", PLAYER_COLUMNS)?;
    if register.is_empty() {
        return Err(AppError::data_source(
            "identifier register returned no rows",
        ));
    }
    register.require_columns("register", &["key_fangraphs"])?;

    let distinct = latest_team_per_player(players)?;
    debug!(
        "Resolving {} distinct players from {} player rows",
        distinct.len(),
        players.len()
    );

    let register = register
        .clone()
        .rename(&[
            ("mlb_played_first", "debut"),
            ("mlb_played_last", "recent_season"),
        ])
        .drop_columns(&["name_first", "name_last"]);

    let identities = distinct
        .left_join(&register, &["key_fangraphs"], "register")?
        .distinct_on("identities", &["key_fangraphs"])?
        .select("identities", IDENTITY_COLUMNS)?;

    let unresolved = identities
        .rows()
        .filter(|row| row.get("key_mlbam").is_null())
        .count();
    if unresolved > 0 {
        warn!("{unresolved} players have no register entry and keep null keys");
    }
    info!("Resolved {} player identities", identities.len());
    Ok(identities)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing_utils::TableBuilder;
    use serde_json::json;

    fn register() -> Table {
        TableBuilder::new([
            "name_last",
            "name_first",
            "key_mlbam",
            "key_retro",
            "key_bbref",
            "key_fangraphs",
            "mlb_played_first",
            "mlb_played_last",
        ])
        .row([
            json!("Judge"),
            json!("Aaron"),
            json!(592450),
            json!("judga001"),
            json!("judgeaa01"),
            json!(15640),
            json!(2016),
            json!(2023),
        ])
        .row([
            json!("Ohtani"),
            json!("Shohei"),
            json!(660271),
            json!("ohtas001"),
            json!("ohtansh01"),
            json!(19755),
            json!(2018),
            json!(2023),
        ])
        .build()
    }

    fn players() -> Table {
        TableBuilder::new(["key_fangraphs", "Name", "Team", "Season"])
            .row([json!(19755), json!("Shohei Ohtani"), json!("LAA"), json!(2022)])
            .row([json!(15640), json!("Aaron Judge"), json!("NYY"), json!(2022)])
            .row([json!(19755), json!("Shohei Ohtani"), json!("LAD"), json!(2024)])
            .row([json!(30000), json!("Unknown Rookie"), json!("SEA"), json!(2023)])
            .build()
    }

    #[test]
    fn test_resolve_one_row_per_player_with_latest_team() {
        let ids = resolve_identities(&players(), &register()).unwrap();

        assert_eq!(ids.columns(), IDENTITY_COLUMNS);
        assert_eq!(ids.len(), 3);

        let ohtani = ids
            .rows()
            .find(|r| r.get("key_fangraphs") == &json!(19755))
            .unwrap();
        assert_eq!(ohtani.get("Team"), &json!("LAD"));
        assert_eq!(ohtani.get("key_mlbam"), &json!(660271));
        assert_eq!(ohtani.get("debut"), &json!(2018));
        assert_eq!(ohtani.get("recent_season"), &json!(2023));
    }

    #[test]
    fn test_unregistered_player_keeps_null_keys() {
        let ids = resolve_identities(&players(), &register()).unwrap();
        let rookie = ids
            .rows()
            .find(|r| r.get("key_fangraphs") == &json!(30000))
            .unwrap();
        assert_eq!(rookie.get("Name"), &json!("Unknown Rookie"));
        assert!(rookie.get("key_mlbam").is_null());
        assert!(rookie.get("key_bbref").is_null());
    }

    #[test]
    fn test_resolve_is_idempotent() {
        let first = resolve_identities(&players(), &register()).unwrap();
        let second = resolve_identities(&players(), &register()).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_empty_register_is_data_source_error() {
        let empty = Table::new(register().columns().to_vec());
        let err = resolve_identities(&players(), &empty).unwrap_err();
        assert!(matches!(err, AppError::DataSource(_)));
    }

    #[test]
    fn test_missing_player_column_is_schema_mismatch() {
        let players = TableBuilder::new(["key_fangraphs", "Name"])
            .row([json!(15640), json!("Aaron Judge")])
            .build();
        let err = resolve_identities(&players, &register()).unwrap_err();
        assert!(matches!(err, AppError::SchemaMismatch { ref column, .. } if column == "Team"));
    }

    #[test]
    fn test_duplicate_register_rows_do_not_duplicate_players() {
        let mut register = register();
        register.push_row(register.row(0).unwrap().cells().to_vec());
        let ids = resolve_identities(&players(), &register).unwrap();
        assert_eq!(ids.len(), 3);
    }
}
