//! Key-based joins between tables.
//!
//! Join keys are compared by their normalized text form so that a player id
//! reported as `12345` by one provider and `12345.0` by another still match.
//! Null keys never match anything.

use serde_json::Value;
use std::collections::HashMap;
use tracing::{debug, warn};

use super::{Cell, Row, Table};
use crate::error::AppError;

/// Normalized join key of a cell, `None` for nulls and blank strings.
pub fn key_of(cell: &Cell) -> Option<String> {
    match cell {
        Value::Null => None,
        Value::Number(n) => {
            if let Some(i) = n.as_i64() {
                Some(i.to_string())
            } else if let Some(u) = n.as_u64() {
                Some(u.to_string())
            } else {
                n.as_f64().map(|f| {
                    if f.is_finite() && f.fract() == 0.0 {
                        format!("{}", f as i64)
                    } else {
                        f.to_string()
                    }
                })
            }
        }
        Value::String(s) => {
            let trimmed = s.trim();
            (!trimmed.is_empty()).then(|| trimmed.to_string())
        }
        Value::Bool(b) => Some(b.to_string()),
        other => Some(other.to_string()),
    }
}

fn row_key(row: &Row<'_>, on: &[&str]) -> Option<Vec<String>> {
    on.iter().map(|column| key_of(row.get(column))).collect()
}

impl Table {
    /// Left join on `on`. Every left row is kept exactly once: the right side
    /// is reduced to its first row per key, and unmatched rows get nulls.
    ///
    /// Right-hand columns that already exist on the left are not copied.
    pub fn left_join(&self, right: &Table, on: &[&str], label: &str) -> Result<Table, AppError> {
        self.require_columns(label, on)?;
        right.require_columns(label, on)?;

        let extra: Vec<(usize, String)> = right
            .columns()
            .iter()
            .enumerate()
            .filter(|(_, column)| !on.contains(&column.as_str()))
            .filter(|(_, column)| {
                let clash = self.has_column(column);
                if clash {
                    debug!("{label}: keeping left-hand values for shared column '{column}'");
                }
                !clash
            })
            .map(|(index, column)| (index, column.clone()))
            .collect();

        let mut index: HashMap<Vec<String>, usize> = HashMap::new();
        let mut duplicates = 0usize;
        for (position, row) in right.rows().enumerate() {
            if let Some(key) = row_key(&row, on) {
                if index.contains_key(&key) {
                    duplicates += 1;
                } else {
                    index.insert(key, position);
                }
            }
        }
        if duplicates > 0 {
            warn!(
                "{label}: {duplicates} right-hand rows share a join key with an earlier row and were ignored"
            );
        }

        let mut columns: Vec<String> = self.columns().to_vec();
        columns.extend(extra.iter().map(|(_, column)| column.clone()));
        let mut joined = Table::new(columns);

        let mut matched = 0usize;
        for row in self.rows() {
            let partner = row_key(&row, on)
                .and_then(|key| index.get(&key).copied())
                .and_then(|position| right.row(position));
            if partner.is_some() {
                matched += 1;
            }

            let mut cells = row.cells().to_vec();
            for (column_index, _) in &extra {
                let value = partner
                    .map(|p| p.cells()[*column_index].clone())
                    .unwrap_or(Value::Null);
                cells.push(value);
            }
            joined.push_row(cells);
        }

        debug!(
            "{label}: left join matched {matched}/{} rows on {:?}",
            self.len(),
            on
        );
        Ok(joined)
    }

    /// Keeps the left rows whose key appears in `right`.
    pub fn semi_join(&self, right: &Table, on: &[&str], label: &str) -> Result<Table, AppError> {
        self.require_columns(label, on)?;
        right.require_columns(label, on)?;

        let keys: std::collections::HashSet<Vec<String>> =
            right.rows().filter_map(|row| row_key(&row, on)).collect();

        Ok(self.filter(|row| row_key(&row, on).is_some_and(|key| keys.contains(&key))))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn stats() -> Table {
        let mut table = Table::new(["key_fangraphs", "Name"]);
        table.push_row(vec![json!(15640), json!("Aaron Judge")]);
        table.push_row(vec![json!(19755), json!("Shohei Ohtani")]);
        table.push_row(vec![json!(99999), json!("Unregistered Prospect")]);
        table.push_row(vec![Value::Null, json!("No Id")]);
        table
    }

    fn register() -> Table {
        let mut table = Table::new(["key_fangraphs", "key_mlbam", "Name"]);
        table.push_row(vec![json!(15640.0), json!(592450), json!("Judge, Aaron")]);
        table.push_row(vec![json!("19755"), json!(660271), json!("Ohtani, Shohei")]);
        table.push_row(vec![json!(19755), json!(1), json!("Duplicate")]);
        table
    }

    #[test]
    fn test_key_of_normalizes_numbers_and_strings() {
        assert_eq!(key_of(&json!(12)), Some("12".to_string()));
        assert_eq!(key_of(&json!(12.0)), Some("12".to_string()));
        assert_eq!(key_of(&json!(" 12 ")), Some("12".to_string()));
        assert_eq!(key_of(&json!(1.5)), Some("1.5".to_string()));
        assert_eq!(key_of(&json!("")), None);
        assert_eq!(key_of(&Value::Null), None);
    }

    #[test]
    fn test_left_join_keeps_every_left_row_once() {
        let joined = stats()
            .left_join(&register(), &["key_fangraphs"], "register")
            .unwrap();

        assert_eq!(joined.len(), 4);
        assert_eq!(joined.columns(), &["key_fangraphs", "Name", "key_mlbam"]);
        assert_eq!(joined.row(0).unwrap().get("key_mlbam"), &json!(592450));
        // first right row wins for duplicated keys
        assert_eq!(joined.row(1).unwrap().get("key_mlbam"), &json!(660271));
        // left-hand Name is not overwritten
        assert_eq!(joined.row(1).unwrap().get("Name"), &json!("Shohei Ohtani"));
        assert!(joined.row(2).unwrap().get("key_mlbam").is_null());
        assert!(joined.row(3).unwrap().get("key_mlbam").is_null());
    }

    #[test]
    fn test_left_join_requires_key_columns() {
        let right = Table::new(["key_mlbam"]);
        let err = stats()
            .left_join(&right, &["key_fangraphs"], "register")
            .unwrap_err();
        assert!(matches!(err, AppError::SchemaMismatch { .. }));
    }

    #[test]
    fn test_left_join_on_composite_key() {
        let mut left = Table::new(["key_mlbam", "Season", "Team"]);
        left.push_row(vec![json!(1), json!(2022), json!("NYY")]);
        left.push_row(vec![json!(1), json!(2023), json!("NYY")]);
        let mut right = Table::new(["key_mlbam", "Season", "Team", "WAR"]);
        right.push_row(vec![json!(1), json!(2023), json!("NYY"), json!(5.5)]);

        let joined = left
            .left_join(&right, &["key_mlbam", "Season", "Team"], "war")
            .unwrap();
        assert!(joined.row(0).unwrap().get("WAR").is_null());
        assert_eq!(joined.row(1).unwrap().get("WAR"), &json!(5.5));
    }

    #[test]
    fn test_semi_join_filters_to_known_keys() {
        let filtered = stats()
            .semi_join(&register(), &["key_fangraphs"], "register")
            .unwrap();
        assert_eq!(filtered.len(), 2);
        assert_eq!(filtered.columns(), stats().columns());
    }
}
