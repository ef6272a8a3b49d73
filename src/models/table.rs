use std::collections::{BTreeSet, HashSet};

use statrs::statistics::{Data, Median};

use crate::error::ForestError;

/// Name of the key column shared by every source table.
pub const COUNTRY_COLUMN: &str = "country";

/// One row of a raw source table: the country key plus one cell per numeric column.
#[derive(Debug, Clone, PartialEq)]
pub struct RawRow {
    pub country: String,
    /// Cells aligned with [`RawTable::columns`]; `None` marks a missing value.
    pub values: Vec<Option<f64>>,
}

/// A loaded source table, before any domain typing.
///
/// The table remembers which columns have already been converted from hectares
/// to square kilometers so a second conversion can be refused.
#[derive(Debug, Clone, PartialEq)]
pub struct RawTable {
    /// Name used in diagnostics (usually the file stem)
    pub name: String,
    columns: Vec<String>,
    rows: Vec<RawRow>,
    converted: BTreeSet<String>,
}

impl RawTable {
    /// Create an empty table with the given numeric column names.
    pub fn new(name: impl Into<String>, columns: Vec<String>) -> Self {
        Self {
            name: name.into(),
            columns,
            rows: Vec::new(),
            converted: BTreeSet::new(),
        }
    }

    /// Append a row. The number of cells must match the number of columns.
    pub fn push_row(
        &mut self,
        country: impl Into<String>,
        values: Vec<Option<f64>>,
    ) -> Result<(), ForestError> {
        let country = country.into();
        if values.len() != self.columns.len() {
            return Err(ForestError::InvalidData(format!(
                "{} row {} ({country}): expected {} values, got {}",
                self.name,
                self.rows.len() + 1,
                self.columns.len(),
                values.len()
            )));
        }
        self.rows.push(RawRow { country, values });
        Ok(())
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn rows(&self) -> &[RawRow] {
        &self.rows
    }

    pub(crate) fn rows_mut(&mut self) -> &mut [RawRow] {
        &mut self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Position of a column by exact name.
    pub fn column_index(&self, column: &str) -> Option<usize> {
        self.columns.iter().position(|c| c == column)
    }

    pub fn has_column(&self, column: &str) -> bool {
        self.column_index(column).is_some()
    }

    /// Cell lookup by row and column name. `None` if the column is absent or the cell is empty.
    pub fn value(&self, row: &RawRow, column: &str) -> Option<f64> {
        self.column_index(column).and_then(|i| row.values[i])
    }

    /// Columns whose header parses as a calendar year, with their positions.
    pub fn year_columns(&self) -> Vec<(i32, usize)> {
        self.columns
            .iter()
            .enumerate()
            .filter_map(|(i, c)| c.trim().parse::<i32>().ok().map(|year| (year, i)))
            .collect()
    }

    /// Whether `column` has already been converted to square kilometers.
    pub fn is_converted(&self, column: &str) -> bool {
        self.converted.contains(column)
    }

    pub(crate) fn mark_converted(&mut self, column: &str) {
        self.converted.insert(column.to_string());
    }

    /// Remove rows that exactly repeat an earlier row. Returns the number removed.
    pub fn drop_duplicates(&mut self) -> usize {
        let before = self.rows.len();
        let mut seen: HashSet<(String, Vec<Option<u64>>)> = HashSet::new();
        self.rows.retain(|row| {
            let key = (
                row.country.clone(),
                row.values.iter().map(|v| v.map(f64::to_bits)).collect(),
            );
            seen.insert(key)
        });
        before - self.rows.len()
    }

    /// Replace missing cells with the median of their column.
    ///
    /// Columns named in `skip` and columns with no values at all are left
    /// untouched. Returns the number of cells filled.
    pub fn fill_missing_with_median(&mut self, skip: &[&str]) -> usize {
        let mut filled = 0;
        for col in 0..self.columns.len() {
            if skip.contains(&self.columns[col].as_str()) {
                continue;
            }
            let present: Vec<f64> = self.rows.iter().filter_map(|r| r.values[col]).collect();
            if present.is_empty() || present.len() == self.rows.len() {
                continue;
            }
            let median = Data::new(present).median();
            for row in &mut self.rows {
                if row.values[col].is_none() {
                    row.values[col] = Some(median);
                    filled += 1;
                }
            }
        }
        filled
    }
}
