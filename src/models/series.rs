use std::collections::{BTreeMap, HashMap};

use serde::{Deserialize, Serialize};

use super::snapshot::country_key;

/// Provenance of a value in a forest cover series.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DataType {
    /// Observed measurement window (2000-2010)
    Real,
    /// Derived from the 2000-2010 trend (2011-2025)
    Interpolated,
    /// Long-range forecast passed through from the prediction table (2026-2075)
    Prediction,
}

impl std::fmt::Display for DataType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DataType::Real => write!(f, "real"),
            DataType::Interpolated => write!(f, "interpolated"),
            DataType::Prediction => write!(f, "prediction"),
        }
    }
}

/// Forest cover percentage by calendar year, ordered by year.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct YearSeries {
    values: BTreeMap<i32, f64>,
}

impl YearSeries {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, year: i32) -> Option<f64> {
        self.values.get(&year).copied()
    }

    /// Set the value for `year`, returning the previous value if any.
    pub fn insert(&mut self, year: i32, forest_percent: f64) -> Option<f64> {
        self.values.insert(year, forest_percent)
    }

    pub fn contains(&self, year: i32) -> bool {
        self.values.contains_key(&year)
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// All `(year, value)` pairs in ascending year order.
    pub fn iter(&self) -> impl Iterator<Item = (i32, f64)> + '_ {
        self.values.iter().map(|(&y, &v)| (y, v))
    }

    /// Pairs with `start <= year <= end`, ascending.
    pub fn range(&self, start: i32, end: i32) -> impl Iterator<Item = (i32, f64)> + '_ {
        self.values.range(start..=end).map(|(&y, &v)| (y, v))
    }

    pub fn first_year(&self) -> Option<i32> {
        self.values.keys().next().copied()
    }

    pub fn last_year(&self) -> Option<i32> {
        self.values.keys().next_back().copied()
    }
}

impl FromIterator<(i32, f64)> for YearSeries {
    fn from_iter<I: IntoIterator<Item = (i32, f64)>>(iter: I) -> Self {
        Self {
            values: iter.into_iter().collect(),
        }
    }
}

/// One year of a country's series with its provenance and derived forest area.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClassifiedYearEntry {
    pub year: i32,
    pub forest_cover_percent: f64,
    pub data_type: DataType,
    /// Forest area in km² implied by the country's land area
    pub forest_area_km2: f64,
}

/// A country's classified series over a requested year range.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CountryTimeSeries {
    pub country: String,
    pub area_km2: f64,
    pub baseline_2000: f64,
    pub baseline_2010: f64,
    pub entries: Vec<ClassifiedYearEntry>,
}

impl CountryTimeSeries {
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Entries of a single provenance.
    pub fn entries_of(&self, data_type: DataType) -> impl Iterator<Item = &ClassifiedYearEntry> {
        self.entries.iter().filter(move |e| e.data_type == data_type)
    }
}

/// Derived series for every country, keyed case-insensitively.
#[derive(Debug, Clone, Default)]
pub struct SeriesTable {
    series: HashMap<String, YearSeries>,
}

impl SeriesTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, country: &str, series: YearSeries) -> Option<YearSeries> {
        self.series.insert(country_key(country), series)
    }

    pub fn get(&self, country: &str) -> Option<&YearSeries> {
        self.series.get(&country_key(country))
    }

    pub fn contains(&self, country: &str) -> bool {
        self.series.contains_key(&country_key(country))
    }

    pub fn len(&self) -> usize {
        self.series.len()
    }

    pub fn is_empty(&self) -> bool {
        self.series.is_empty()
    }
}
