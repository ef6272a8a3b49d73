use super::classifier::{classify, validate_year_range};
use crate::error::ForestError;
use crate::models::{
    ClassifiedYearEntry, CountrySnapshot, CountryTimeSeries, SeriesTable, SnapshotTable,
    YearSeries,
};

fn lookup<'a>(
    country: &str,
    snapshots: &'a SnapshotTable,
    series: &'a SeriesTable,
) -> Result<(&'a CountrySnapshot, &'a YearSeries), ForestError> {
    let not_found = || ForestError::NotFound(format!("Country '{country}' not found"));
    let snapshot = snapshots.get(country).ok_or_else(not_found)?;
    let year_series = series.get(country).ok_or_else(not_found)?;
    Ok((snapshot, year_series))
}

fn entry(
    snapshot: &CountrySnapshot,
    year: i32,
    percent: f64,
) -> Result<ClassifiedYearEntry, ForestError> {
    Ok(ClassifiedYearEntry {
        year,
        forest_cover_percent: percent,
        data_type: classify(year)?,
        forest_area_km2: snapshot.area_km2 * percent / 100.0,
    })
}

/// Build the classified series for `country` over `[start_year, end_year]`.
///
/// Years missing from the stored series are omitted rather than zero-filled.
pub fn assemble(
    country: &str,
    start_year: i32,
    end_year: i32,
    snapshots: &SnapshotTable,
    series: &SeriesTable,
) -> Result<CountryTimeSeries, ForestError> {
    validate_year_range(start_year, end_year)?;
    let (snapshot, year_series) = lookup(country, snapshots, series)?;

    let entries = year_series
        .range(start_year, end_year)
        .map(|(year, percent)| entry(snapshot, year, percent))
        .collect::<Result<Vec<_>, _>>()?;

    Ok(CountryTimeSeries {
        country: snapshot.country.clone(),
        area_km2: snapshot.area_km2,
        baseline_2000: snapshot.forest_percent_2000,
        baseline_2010: snapshot.forest_percent_2010,
        entries,
    })
}

/// Single-year lookup for `country`.
pub fn year_entry(
    country: &str,
    year: i32,
    snapshots: &SnapshotTable,
    series: &SeriesTable,
) -> Result<ClassifiedYearEntry, ForestError> {
    classify(year)?;
    let (snapshot, year_series) = lookup(country, snapshots, series)?;
    let percent = year_series.get(year).ok_or_else(|| {
        ForestError::NotFound(format!("No value for {} in {year}", snapshot.country))
    })?;
    entry(snapshot, year, percent)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::DataType;
    use assert_approx_eq::assert_approx_eq;

    fn sources() -> (SnapshotTable, SeriesTable) {
        let mut snapshots = SnapshotTable::new();
        snapshots.insert(CountrySnapshot {
            country: "Brazil".to_string(),
            area_km2: 8_000_000.0,
            forest_percent_2000: 50.0,
            forest_percent_2010: 40.0,
            delta_percent: 10.0,
            delta_area_km2: 800_000.0,
        });
        snapshots.insert(CountrySnapshot {
            country: "Chile".to_string(),
            area_km2: 700_000.0,
            forest_percent_2000: 20.0,
            forest_percent_2010: 22.0,
            delta_percent: -2.0,
            delta_area_km2: -14_000.0,
        });

        let mut series = SeriesTable::new();
        let mut brazil: YearSeries = (2011..=2025).map(|y| (y, 35.0)).collect();
        brazil.insert(2000, 50.0);
        brazil.insert(2010, 40.0);
        brazil.insert(2030, 30.0);
        brazil.insert(2075, 20.0);
        series.insert("Brazil", brazil);
        (snapshots, series)
    }

    #[test]
    fn test_full_range_matches_present_years() {
        let (snapshots, series) = sources();
        let result = assemble("brazil", 2000, 2075, &snapshots, &series).unwrap();
        assert_eq!(result.country, "Brazil");
        assert_eq!(result.len(), 2 + 15 + 2);
        for e in &result.entries {
            assert_eq!(e.data_type, classify(e.year).unwrap());
        }
        let years: Vec<i32> = result.entries.iter().map(|e| e.year).collect();
        let mut sorted = years.clone();
        sorted.sort();
        assert_eq!(years, sorted);
    }

    #[test]
    fn test_sub_range_and_area() {
        let (snapshots, series) = sources();
        let result = assemble("Brazil", 2010, 2012, &snapshots, &series).unwrap();
        assert_eq!(result.len(), 3);
        assert_eq!(result.entries[0].data_type, DataType::Real);
        assert_approx_eq!(result.entries[0].forest_area_km2, 3_200_000.0, 1e-6);
        assert_eq!(result.entries[1].data_type, DataType::Interpolated);
        assert_approx_eq!(result.entries[1].forest_area_km2, 2_800_000.0, 1e-6);
    }

    #[test]
    fn test_missing_years_are_omitted() {
        let (snapshots, series) = sources();
        let result = assemble("Brazil", 2026, 2074, &snapshots, &series).unwrap();
        assert_eq!(result.len(), 1);
        assert_eq!(result.entries[0].year, 2030);
        assert_eq!(result.entries[0].data_type, DataType::Prediction);
    }

    #[test]
    fn test_not_found_in_either_source() {
        let (snapshots, series) = sources();
        let err = assemble("Atlantis", 2000, 2010, &snapshots, &series).unwrap_err();
        assert!(matches!(err, ForestError::NotFound(_)));
        // Chile has a snapshot but no series
        let err = assemble("Chile", 2000, 2010, &snapshots, &series).unwrap_err();
        assert!(matches!(err, ForestError::NotFound(_)));
    }

    #[test]
    fn test_invalid_range() {
        let (snapshots, series) = sources();
        assert!(matches!(
            assemble("Brazil", 2020, 2010, &snapshots, &series),
            Err(ForestError::InvalidYear(_))
        ));
        assert!(matches!(
            assemble("Brazil", 1990, 2010, &snapshots, &series),
            Err(ForestError::InvalidYear(_))
        ));
    }

    #[test]
    fn test_result_is_independent_copy() {
        let (snapshots, series) = sources();
        let mut result = assemble("Brazil", 2000, 2010, &snapshots, &series).unwrap();
        result.entries[0].forest_cover_percent = 0.0;
        assert_eq!(series.get("Brazil").unwrap().get(2000), Some(50.0));
    }

    #[test]
    fn test_year_entry() {
        let (snapshots, series) = sources();
        let e = year_entry("BRAZIL", 2075, &snapshots, &series).unwrap();
        assert_eq!(e.forest_cover_percent, 20.0);
        assert_eq!(e.data_type, DataType::Prediction);
        assert!(matches!(
            year_entry("Brazil", 2050, &snapshots, &series),
            Err(ForestError::NotFound(_))
        ));
        assert!(matches!(
            year_entry("Brazil", 2076, &snapshots, &series),
            Err(ForestError::InvalidYear(_))
        ));
    }
}
