use std::collections::{HashMap, HashSet};

use tracing::{debug, info, warn};

use crate::analysis::{
    convert_hectares_to_km2, CoverAnalyzer, InterpolationConfig, TrainingSample,
    TrendInterpolator, AREA_COLUMNS, FIRST_YEAR, LAST_YEAR,
};
use crate::error::ForestError;
use crate::io::TableSource;
use crate::models::{
    country_key, CountrySnapshot, RawTable, SeriesTable, SnapshotTable, YearSeries,
    DELTA_AREA_COLUMN, DELTA_PERCENT_COLUMN, PERCENT_2000_COLUMN, PERCENT_2010_COLUMN,
};

/// Snapshot table plus the derived per-country series, built once and then read-only.
#[derive(Debug, Clone)]
pub struct CoverDataset {
    snapshots: SnapshotTable,
    series: SeriesTable,
    has_long_range: bool,
}

impl CoverDataset {
    /// Load both tables from `source` and derive every series.
    ///
    /// An unavailable long-range table is not an error: series then stop at the
    /// end of the interpolation horizon.
    pub fn load(
        source: &dyn TableSource,
        config: &InterpolationConfig,
    ) -> Result<Self, ForestError> {
        let snapshot_table = source.load_snapshot_table()?;
        let long_range = match source.load_long_range_table() {
            Ok(table) => Some(table),
            Err(ForestError::SourceUnavailable(reason)) => {
                warn!(%reason, "long-range table unavailable, series end at {}", config.horizon_end);
                None
            }
            Err(e) => return Err(e),
        };
        Self::build(snapshot_table, long_range, config)
    }

    /// Clean, convert, and derive from already-loaded raw tables.
    pub fn build(
        snapshot_table: RawTable,
        long_range: Option<RawTable>,
        config: &InterpolationConfig,
    ) -> Result<Self, ForestError> {
        let interpolator = TrendInterpolator::new(config.clone())?;

        let snapshot_table = prepare_snapshot_table(snapshot_table)?;
        let snapshots = build_snapshots(&snapshot_table)?;

        let has_long_range = long_range.is_some();
        let long_range = match long_range {
            Some(table) => long_range_series(prepare_long_range_table(table)?)?,
            None => Vec::new(),
        };
        let long_range_index: HashMap<String, usize> = long_range
            .iter()
            .enumerate()
            .map(|(i, (country, _))| (country_key(country), i))
            .collect();

        let mut series = SeriesTable::new();
        for snapshot in snapshots.iter() {
            let mut base = long_range_index
                .get(&country_key(&snapshot.country))
                .map(|&i| long_range[i].1.clone())
                .unwrap_or_default();
            base.insert(config.real_year_a, snapshot.forest_percent_2000);
            base.insert(config.real_year_b, snapshot.forest_percent_2010);
            series.insert(&snapshot.country, derive(&interpolator, &snapshot.country, base)?);
        }
        for (country, base) in &long_range {
            if series.contains(country) {
                continue;
            }
            debug!(%country, "country only present in long-range table");
            series.insert(country, derive(&interpolator, country, base.clone())?);
        }

        info!(
            countries = snapshots.len(),
            series = series.len(),
            has_long_range,
            "forest cover dataset ready"
        );
        Ok(Self {
            snapshots,
            series,
            has_long_range,
        })
    }

    pub fn snapshots(&self) -> &SnapshotTable {
        &self.snapshots
    }

    pub fn series(&self) -> &SeriesTable {
        &self.series
    }

    /// Whether long-range predictions were available when the dataset was built.
    pub fn has_long_range(&self) -> bool {
        self.has_long_range
    }

    pub fn analyzer(&self) -> CoverAnalyzer<'_> {
        CoverAnalyzer::new(&self.snapshots, &self.series)
    }

    /// One training sample per country.
    pub fn training_samples(&self) -> Vec<TrainingSample> {
        self.snapshots.iter().map(TrainingSample::from).collect()
    }
}

/// Interpolate, keeping the series as-is when a baseline year is missing.
fn derive(
    interpolator: &TrendInterpolator,
    country: &str,
    base: YearSeries,
) -> Result<YearSeries, ForestError> {
    match interpolator.interpolate(&base) {
        Ok(series) => {
            debug!(%country, years = series.len(), "derived series");
            Ok(series)
        }
        Err(ForestError::MissingBaseline { year }) => {
            warn!(%country, year, "missing baseline, interpolated years skipped");
            Ok(base)
        }
        Err(e) => Err(e),
    }
}

fn prepare_snapshot_table(mut table: RawTable) -> Result<RawTable, ForestError> {
    let dropped = table.drop_duplicates();
    let recovered = recover_observations(&mut table);
    // deltas are derived from the observations in `CountrySnapshot::from_row`
    let filled = table.fill_missing_with_median(&[DELTA_PERCENT_COLUMN, DELTA_AREA_COLUMN]);
    if dropped > 0 || recovered > 0 || filled > 0 {
        info!(table = %table.name, dropped, recovered, filled, "cleaned snapshot table");
    }
    convert_hectares_to_km2(&mut table, AREA_COLUMNS)?;
    Ok(table)
}

/// Complete missing 2000/2010 observations from the stated `delta_percent`.
///
/// A single missing observation is recovered exactly. When both are missing the
/// stated deltas are cleared so they get re-derived from the median-filled
/// observations. Returns the number of cells recovered.
fn recover_observations(table: &mut RawTable) -> usize {
    let (Some(p2000), Some(p2010)) = (
        table.column_index(PERCENT_2000_COLUMN),
        table.column_index(PERCENT_2010_COLUMN),
    ) else {
        return 0;
    };
    let delta = table.column_index(DELTA_PERCENT_COLUMN);
    let delta_area = table.column_index(DELTA_AREA_COLUMN);

    let mut recovered = 0;
    for row in table.rows_mut() {
        let stated = delta.and_then(|i| row.values[i]);
        match (row.values[p2000], row.values[p2010], stated) {
            (Some(v2000), None, Some(d)) => {
                row.values[p2010] = Some(v2000 - d);
                recovered += 1;
            }
            (None, Some(v2010), Some(d)) => {
                row.values[p2000] = Some(v2010 + d);
                recovered += 1;
            }
            (None, None, _) => {
                debug!(country = %row.country, "no observations, stated deltas dropped");
                for idx in [delta, delta_area].into_iter().flatten() {
                    row.values[idx] = None;
                }
            }
            _ => {}
        }
    }
    recovered
}

fn prepare_long_range_table(mut table: RawTable) -> Result<RawTable, ForestError> {
    let dropped = table.drop_duplicates();
    if dropped > 0 {
        info!(table = %table.name, dropped, "removed duplicate long-range rows");
    }
    convert_hectares_to_km2(&mut table, AREA_COLUMNS)?;
    Ok(table)
}

fn build_snapshots(table: &RawTable) -> Result<SnapshotTable, ForestError> {
    let mut snapshots = SnapshotTable::new();
    for row in table.rows() {
        let snapshot = CountrySnapshot::from_row(table, row)?;
        let country = snapshot.country.clone();
        if !snapshots.insert(snapshot) {
            warn!(table = %table.name, %country, "duplicate country, keeping first row");
        }
    }
    Ok(snapshots)
}

/// Per-country year series from the long-range table, in input order.
fn long_range_series(table: RawTable) -> Result<Vec<(String, YearSeries)>, ForestError> {
    let (in_window, outside): (Vec<_>, Vec<_>) = table
        .year_columns()
        .into_iter()
        .partition(|(year, _)| (FIRST_YEAR..=LAST_YEAR).contains(year));
    if !outside.is_empty() {
        warn!(
            table = %table.name,
            ignored = outside.len(),
            "year columns outside {FIRST_YEAR}-{LAST_YEAR} ignored"
        );
    }

    let mut result: Vec<(String, YearSeries)> = Vec::with_capacity(table.len());
    let mut seen = HashSet::new();
    for (row_number, row) in table.rows().iter().enumerate() {
        let country = row.country.trim();
        if !seen.insert(country_key(country)) {
            warn!(table = %table.name, %country, "duplicate country, keeping first row");
            continue;
        }
        let mut series = YearSeries::new();
        for &(year, idx) in &in_window {
            let Some(value) = row.values[idx] else {
                continue;
            };
            if !(0.0..=100.0).contains(&value) {
                return Err(ForestError::InvalidData(format!(
                    "{} row {} ({country}), year {year}: forest cover must be between 0 and 100, got {value}",
                    table.name,
                    row_number + 1
                )));
            }
            series.insert(year, value);
        }
        result.push((country.to_string(), series));
    }
    Ok(result)
}
