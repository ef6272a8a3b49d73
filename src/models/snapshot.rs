use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use super::table::{RawRow, RawTable};
use crate::error::ForestError;

pub const AREA_COLUMN: &str = "area";
pub const PERCENT_2000_COLUMN: &str = "two_thousand_percent";
pub const PERCENT_2010_COLUMN: &str = "two_thousand_ten_percent";
pub const DELTA_PERCENT_COLUMN: &str = "delta_percent";
pub const DELTA_AREA_COLUMN: &str = "delta_area";

/// Allowed gap between `delta_percent` and the difference of the two observations.
/// Source figures are rounded to two decimals.
const DELTA_TOLERANCE: f64 = 0.05;

/// Forest cover observations for one country in 2000 and 2010.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CountrySnapshot {
    pub country: String,
    /// Total land area in square kilometers
    pub area_km2: f64,
    /// Forest cover in 2000 as a percentage of land area
    pub forest_percent_2000: f64,
    /// Forest cover in 2010 as a percentage of land area
    pub forest_percent_2010: f64,
    /// 2000 value minus 2010 value; positive means forest was lost
    pub delta_percent: f64,
    /// Forest area change in square kilometers; positive means forest was lost
    pub delta_area_km2: f64,
}

impl CountrySnapshot {
    /// Build a snapshot from a cleaned, unit-converted row.
    ///
    /// `delta_percent` and `delta_area` are derived when their columns are
    /// absent or their cells are empty.
    pub fn from_row(table: &RawTable, row: &RawRow) -> Result<Self, ForestError> {
        if !table.is_converted(AREA_COLUMN) {
            return Err(ForestError::InvalidData(format!(
                "{}: column '{AREA_COLUMN}' must be converted to km2 before building snapshots",
                table.name
            )));
        }

        let required = |column: &str| {
            table.value(row, column).ok_or_else(|| {
                ForestError::InvalidData(format!(
                    "{} ({}): missing value for '{column}'",
                    table.name, row.country
                ))
            })
        };

        let area_km2 = required(AREA_COLUMN)?;
        let forest_percent_2000 = required(PERCENT_2000_COLUMN)?;
        let forest_percent_2010 = required(PERCENT_2010_COLUMN)?;
        let delta_percent = table
            .value(row, DELTA_PERCENT_COLUMN)
            .unwrap_or(forest_percent_2000 - forest_percent_2010);
        let delta_area_km2 = table
            .value(row, DELTA_AREA_COLUMN)
            .unwrap_or(area_km2 * delta_percent / 100.0);

        let snapshot = CountrySnapshot {
            country: row.country.trim().to_string(),
            area_km2,
            forest_percent_2000,
            forest_percent_2010,
            delta_percent,
            delta_area_km2,
        };
        snapshot.validate()?;
        Ok(snapshot)
    }

    /// Check value ranges and the delta invariant.
    pub fn validate(&self) -> Result<(), ForestError> {
        if self.country.is_empty() {
            return Err(ForestError::InvalidData(
                "Country name must not be empty".to_string(),
            ));
        }
        if !self.area_km2.is_finite() || self.area_km2 < 0.0 {
            return Err(ForestError::InvalidData(format!(
                "{}: area must be non-negative, got {}",
                self.country, self.area_km2
            )));
        }
        for (year, pct) in [
            (2000, self.forest_percent_2000),
            (2010, self.forest_percent_2010),
        ] {
            if !(0.0..=100.0).contains(&pct) {
                return Err(ForestError::InvalidData(format!(
                    "{}: forest cover {year} must be between 0 and 100, got {pct}",
                    self.country
                )));
            }
        }
        let expected = self.forest_percent_2000 - self.forest_percent_2010;
        if (self.delta_percent - expected).abs() > DELTA_TOLERANCE {
            return Err(ForestError::InvalidData(format!(
                "{}: delta_percent {} does not match 2000 - 2010 ({expected:.2})",
                self.country, self.delta_percent
            )));
        }
        Ok(())
    }

    /// Forest area in 2000 (km²).
    pub fn forest_area_2000_km2(&self) -> f64 {
        self.area_km2 * self.forest_percent_2000 / 100.0
    }

    /// Forest area in 2010 (km²).
    pub fn forest_area_2010_km2(&self) -> f64 {
        self.area_km2 * self.forest_percent_2010 / 100.0
    }

    /// True if the country lost forest cover between 2000 and 2010.
    pub fn is_loss(&self) -> bool {
        self.delta_percent > 0.0
    }

    /// True if the country gained forest cover between 2000 and 2010.
    pub fn is_gain(&self) -> bool {
        self.delta_percent < 0.0
    }
}

/// Normalized lookup key: countries match case-insensitively.
pub(crate) fn country_key(country: &str) -> String {
    country.trim().to_lowercase()
}

/// All country snapshots in input order, indexed by case-insensitive name.
#[derive(Debug, Clone, Default)]
pub struct SnapshotTable {
    snapshots: Vec<CountrySnapshot>,
    index: HashMap<String, usize>,
}

impl SnapshotTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a snapshot. Returns `false` (and keeps the existing entry) when the
    /// country is already present.
    pub fn insert(&mut self, snapshot: CountrySnapshot) -> bool {
        let key = country_key(&snapshot.country);
        if self.index.contains_key(&key) {
            return false;
        }
        self.index.insert(key, self.snapshots.len());
        self.snapshots.push(snapshot);
        true
    }

    pub fn get(&self, country: &str) -> Option<&CountrySnapshot> {
        self.index
            .get(&country_key(country))
            .map(|&i| &self.snapshots[i])
    }

    pub fn iter(&self) -> impl Iterator<Item = &CountrySnapshot> {
        self.snapshots.iter()
    }

    pub fn as_slice(&self) -> &[CountrySnapshot] {
        &self.snapshots
    }

    pub fn len(&self) -> usize {
        self.snapshots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.snapshots.is_empty()
    }
}
