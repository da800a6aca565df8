//! Biographical records for resolved players.

use tracing::{info, instrument};

use crate::catalogs::DROP_BIO;
use crate::error::AppError;
use crate::table::Table;

/// Attaches the people registry's demographic columns to each identity.
///
/// The join runs on `key_bbref`; players the registry does not know keep
/// their row with null demographics. The output has as many rows as
/// `identities` and omits the alternate registry keys.
#[instrument(skip(identities, people))]
pub fn build_biography(identities: &Table, people: &Table) -> Result<Table, AppError> {
    identities.require_columns("identities", &["key_bbref"])?;
    if people.is_empty() {
        return Err(AppError::data_source("people registry returned no rows"));
    }
    people.require_columns("people", &["playerID"])?;

    let people = people
        .clone()
        .rename(&[("playerID", "key_bbref")])
        .drop_columns(DROP_BIO);

    let bio = identities
        .left_join(&people, &["key_bbref"], "people")?
        .drop_columns(&["key_retro", "key_bbref"]);

    info!("Built {} biographical records", bio.len());
    Ok(bio)
}
