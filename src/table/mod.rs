//! Column-ordered tables of provider cells.
//!
//! Every dataset the pipeline produces is a [`Table`]: an ordered list of
//! column names and rows of JSON-like cells. Transformations never mutate a
//! table in place from the caller's point of view; they borrow and return a
//! new table, or consume `self` and hand back the transformed value.

pub mod join;

use serde::Serialize;
use serde_json::{Map, Value};
use std::cmp::Ordering;
use std::collections::HashSet;

use crate::catalogs::Catalog;
use crate::error::AppError;

pub use join::key_of;

/// A single table cell. Provider payloads are JSON so cells are JSON values.
pub type Cell = Value;

/// A row keyed by column name, the shape providers return.
pub type Record = Map<String, Value>;

static NULL: Cell = Value::Null;

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Table {
    columns: Vec<String>,
    rows: Vec<Vec<Cell>>,
}

/// Borrowed view of one table row with by-name access.
#[derive(Debug, Clone, Copy)]
pub struct Row<'a> {
    columns: &'a [String],
    cells: &'a [Cell],
}

impl<'a> Row<'a> {
    /// Cell value for `column`, null when the column does not exist.
    pub fn get(&self, column: &str) -> &'a Cell {
        self.columns
            .iter()
            .position(|c| c == column)
            .and_then(|i| self.cells.get(i))
            .unwrap_or(&NULL)
    }

    pub fn cells(&self) -> &'a [Cell] {
        self.cells
    }

    /// Integer value of a cell, accepting integral floats and numeric strings.
    pub fn get_i64(&self, column: &str) -> Option<i64> {
        match self.get(column) {
            Value::Number(n) => n
                .as_i64()
                .or_else(|| n.as_f64().filter(|f| f.fract() == 0.0).map(|f| f as i64)),
            Value::String(s) => s.trim().parse().ok(),
            _ => None,
        }
    }

    pub fn get_str(&self, column: &str) -> Option<&'a str> {
        self.get(column).as_str()
    }
}

impl Table {
    /// Creates an empty table with the given columns.
    pub fn new<I, S>(columns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            columns: columns.into_iter().map(Into::into).collect(),
            rows: Vec::new(),
        }
    }

    /// Builds a table from records. Columns appear in first-seen order and
    /// records missing a column get a null cell.
    pub fn from_records(records: Vec<Record>) -> Self {
        let mut columns: Vec<String> = Vec::new();
        let mut seen: HashSet<String> = HashSet::new();
        for record in &records {
            for key in record.keys() {
                if seen.insert(key.clone()) {
                    columns.push(key.clone());
                }
            }
        }

        let rows = records
            .into_iter()
            .map(|mut record| {
                columns
                    .iter()
                    .map(|c| record.remove(c).unwrap_or(Value::Null))
                    .collect()
            })
            .collect();

        Self { columns, rows }
    }

    pub fn to_records(&self) -> Vec<Record> {
        self.rows
            .iter()
            .map(|cells| {
                self.columns
                    .iter()
                    .cloned()
                    .zip(cells.iter().cloned())
                    .collect()
            })
            .collect()
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    /// Number of rows.
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Number of columns.
    pub fn width(&self) -> usize {
        self.columns.len()
    }

    pub fn column_index(&self, column: &str) -> Option<usize> {
        self.columns.iter().position(|c| c == column)
    }

    pub fn has_column(&self, column: &str) -> bool {
        self.column_index(column).is_some()
    }

    pub fn rows(&self) -> impl Iterator<Item = Row<'_>> {
        self.rows.iter().map(|cells| Row {
            columns: &self.columns,
            cells,
        })
    }

    pub fn row(&self, index: usize) -> Option<Row<'_>> {
        self.rows.get(index).map(|cells| Row {
            columns: &self.columns,
            cells,
        })
    }

    /// All values of one column, `None` if the column does not exist.
    pub fn column_values(&self, column: &str) -> Option<Vec<&Cell>> {
        let index = self.column_index(column)?;
        Some(self.rows.iter().map(|cells| &cells[index]).collect())
    }

    /// Appends a row. Short rows are padded with nulls.
    pub fn push_row(&mut self, mut cells: Vec<Cell>) {
        debug_assert!(
            cells.len() <= self.columns.len(),
            "row has {} cells for {} columns",
            cells.len(),
            self.columns.len()
        );
        cells.resize(self.columns.len(), Value::Null);
        self.rows.push(cells);
    }

    /// True for a table built from an empty record list. Such a table carries
    /// no schema at all, so column checks pass vacuously.
    pub fn is_shapeless(&self) -> bool {
        self.columns.is_empty() && self.rows.is_empty()
    }

    /// Gives a shapeless table the `columns` schema; other tables pass through.
    pub fn or_empty<I, S>(self, columns: I) -> Table
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        if self.is_shapeless() {
            Table::new(columns)
        } else {
            self
        }
    }

    /// Fails with a schema mismatch naming the first missing column.
    pub fn require_columns(&self, table: &str, columns: &[&str]) -> Result<(), AppError> {
        if self.is_shapeless() {
            return Ok(());
        }
        match columns.iter().find(|c| !self.has_column(c)) {
            Some(missing) => Err(AppError::schema_mismatch(table, *missing)),
            None => Ok(()),
        }
    }

    /// Projects the table onto `columns`, in that order.
    pub fn select(&self, table: &str, columns: &[&str]) -> Result<Table, AppError> {
        self.project(table, columns, &[])
    }

    /// Projects onto leading identity columns followed by a catalog.
    /// Required columns must exist; the catalog's optional columns are
    /// null-filled when absent.
    pub fn select_catalog(
        &self,
        table: &str,
        leading: &[&str],
        catalog: &Catalog,
    ) -> Result<Table, AppError> {
        let required: Vec<&str> = leading
            .iter()
            .copied()
            .chain(catalog.required.iter().copied())
            .collect();
        self.project(table, &required, catalog.optional)
    }

    fn project(&self, table: &str, required: &[&str], optional: &[&str]) -> Result<Table, AppError> {
        self.require_columns(table, required)?;

        let indices: Vec<Option<usize>> = required
            .iter()
            .chain(optional.iter())
            .map(|c| self.column_index(c))
            .collect();

        let rows = self
            .rows
            .iter()
            .map(|cells| {
                indices
                    .iter()
                    .map(|i| i.map(|i| cells[i].clone()).unwrap_or(Value::Null))
                    .collect()
            })
            .collect();

        Ok(Table {
            columns: required
                .iter()
                .chain(optional.iter())
                .map(|c| c.to_string())
                .collect(),
            rows,
        })
    }

    /// Renames columns. Pairs naming an absent column are ignored.
    pub fn rename(mut self, renames: &[(&str, &str)]) -> Table {
        for (from, to) in renames {
            if let Some(index) = self.column_index(from) {
                self.columns[index] = to.to_string();
            }
        }
        self
    }

    /// Removes columns. Names that are not present are ignored.
    pub fn drop_columns(mut self, columns: &[&str]) -> Table {
        let keep: Vec<bool> = self
            .columns
            .iter()
            .map(|c| !columns.contains(&c.as_str()))
            .collect();

        let mut flags = keep.iter();
        self.columns.retain(|_| *flags.next().unwrap_or(&true));
        for cells in &mut self.rows {
            let mut flags = keep.iter();
            cells.retain(|_| *flags.next().unwrap_or(&true));
        }
        self
    }

    /// Sets `column` to `value` on every row, adding the column if needed.
    pub fn with_constant(self, column: &str, value: Cell) -> Table {
        let len = self.len();
        self.set_column(column, vec![value; len])
    }

    /// Adds (or replaces) a column computed from each row.
    pub fn with_derived<F>(self, column: &str, mut derive: F) -> Result<Table, AppError>
    where
        F: FnMut(Row<'_>) -> Result<Cell, AppError>,
    {
        let values = self.rows().map(&mut derive).collect::<Result<Vec<_>, _>>()?;
        Ok(self.set_column(column, values))
    }

    fn set_column(mut self, column: &str, values: Vec<Cell>) -> Table {
        match self.column_index(column) {
            Some(index) => {
                for (cells, value) in self.rows.iter_mut().zip(values) {
                    cells[index] = value;
                }
            }
            None => {
                self.columns.push(column.to_string());
                for (cells, value) in self.rows.iter_mut().zip(values) {
                    cells.push(value);
                }
            }
        }
        self
    }

    /// Keeps the rows matching `predicate`.
    pub fn filter<F>(&self, mut predicate: F) -> Table
    where
        F: FnMut(Row<'_>) -> bool,
    {
        let rows = self
            .rows()
            .filter(|row| predicate(*row))
            .map(|row| row.cells.to_vec())
            .collect();
        Table {
            columns: self.columns.clone(),
            rows,
        }
    }

    /// Stable sort of the rows.
    pub fn sort_by<F>(&self, mut compare: F) -> Table
    where
        F: FnMut(Row<'_>, Row<'_>) -> Ordering,
    {
        let mut order: Vec<usize> = (0..self.rows.len()).collect();
        order.sort_by(|&a, &b| {
            let left = Row {
                columns: &self.columns,
                cells: &self.rows[a],
            };
            let right = Row {
                columns: &self.columns,
                cells: &self.rows[b],
            };
            compare(left, right)
        });
        Table {
            columns: self.columns.clone(),
            rows: order.into_iter().map(|i| self.rows[i].clone()).collect(),
        }
    }

    /// Stacks tables vertically. Columns are unioned in first-seen order and
    /// rows from tables lacking a column get nulls.
    pub fn concat<I>(tables: I) -> Table
    where
        I: IntoIterator<Item = Table>,
    {
        let mut result = Table::default();
        for table in tables {
            if result.is_shapeless() {
                result = table;
                continue;
            }

            for column in &table.columns {
                if !result.has_column(column) {
                    result.columns.push(column.clone());
                    for cells in &mut result.rows {
                        cells.push(Value::Null);
                    }
                }
            }

            let positions: Vec<usize> = result
                .columns
                .iter()
                .map(|c| table.column_index(c).unwrap_or(usize::MAX))
                .collect();

            for cells in table.rows {
                let row = positions
                    .iter()
                    .map(|&i| cells.get(i).cloned().unwrap_or(Value::Null))
                    .collect();
                result.rows.push(row);
            }
        }
        result
    }

    /// Keeps the first row for each distinct combination of `keys`.
    /// Null key cells compare equal to each other.
    pub fn distinct_on(&self, table: &str, keys: &[&str]) -> Result<Table, AppError> {
        self.require_columns(table, keys)?;
        let mut seen: HashSet<Vec<Option<String>>> = HashSet::new();
        Ok(self.filter(|row| {
            let signature = keys.iter().map(|k| key_of(row.get(k))).collect();
            seen.insert(signature)
        }))
    }

    /// Removes fully duplicated rows, keeping the first occurrence.
    pub fn distinct(&self) -> Table {
        let mut seen: HashSet<Vec<String>> = HashSet::new();
        self.filter(|row| seen.insert(row.cells().iter().map(Value::to_string).collect()))
    }
}
