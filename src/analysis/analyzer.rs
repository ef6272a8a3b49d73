use crate::analysis::{assemble, top_countries, year_entry, TopDirection};
use crate::error::ForestError;
use crate::models::{
    ClassifiedYearEntry, CountrySnapshot, CountryTimeSeries, SeriesTable, SnapshotTable,
};

/// Query API over a loaded snapshot table and its derived series.
pub struct CoverAnalyzer<'a> {
    snapshots: &'a SnapshotTable,
    series: &'a SeriesTable,
}

impl<'a> CoverAnalyzer<'a> {
    pub fn new(snapshots: &'a SnapshotTable, series: &'a SeriesTable) -> Self {
        Self { snapshots, series }
    }

    /// Country names in input order.
    pub fn countries(&self) -> Vec<String> {
        self.snapshots.iter().map(|s| s.country.clone()).collect()
    }

    /// Snapshot for one country (case-insensitive).
    pub fn get_snapshot(&self, country: &str) -> Result<CountrySnapshot, ForestError> {
        self.snapshots
            .get(country)
            .cloned()
            .ok_or_else(|| ForestError::NotFound(format!("Country '{country}' not found")))
    }

    /// Up to `n` countries with the largest loss or gain.
    pub fn get_top(&self, n: usize, direction: TopDirection) -> Vec<CountrySnapshot> {
        top_countries(self.snapshots.as_slice(), n, direction)
    }

    /// Classified series for `country` between two years, inclusive.
    pub fn get_series(
        &self,
        country: &str,
        start_year: i32,
        end_year: i32,
    ) -> Result<CountryTimeSeries, ForestError> {
        assemble(country, start_year, end_year, self.snapshots, self.series)
    }

    /// Classified value for `country` in `year`.
    pub fn get_year(&self, country: &str, year: i32) -> Result<ClassifiedYearEntry, ForestError> {
        year_entry(country, year, self.snapshots, self.series)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{DataType, YearSeries};

    fn tables() -> (SnapshotTable, SeriesTable) {
        let mut snapshots = SnapshotTable::new();
        let mut series = SeriesTable::new();
        for (name, p2000, p2010) in [("Brazil", 60.0, 55.0), ("Peru", 40.0, 42.0), ("Chad", 9.0, 8.0)] {
            snapshots.insert(CountrySnapshot {
                country: name.to_string(),
                area_km2: 500.0,
                forest_percent_2000: p2000,
                forest_percent_2010: p2010,
                delta_percent: p2000 - p2010,
                delta_area_km2: 5.0 * (p2000 - p2010),
            });
            let s: YearSeries = vec![(2000, p2000), (2010, p2010), (2040, p2010 - 1.0)]
                .into_iter()
                .collect();
            series.insert(name, s);
        }
        (snapshots, series)
    }

    #[test]
    fn test_countries_in_input_order() {
        let (snapshots, series) = tables();
        let analyzer = CoverAnalyzer::new(&snapshots, &series);
        assert_eq!(analyzer.countries(), vec!["Brazil", "Peru", "Chad"]);
    }

    #[test]
    fn test_get_snapshot() {
        let (snapshots, series) = tables();
        let analyzer = CoverAnalyzer::new(&snapshots, &series);
        assert_eq!(analyzer.get_snapshot("peru").unwrap().forest_percent_2010, 42.0);
        assert!(matches!(
            analyzer.get_snapshot("Narnia"),
            Err(ForestError::NotFound(_))
        ));
    }

    #[test]
    fn test_get_top_matches_standalone() {
        let (snapshots, series) = tables();
        let analyzer = CoverAnalyzer::new(&snapshots, &series);
        let from_analyzer = analyzer.get_top(5, TopDirection::Loss);
        let from_standalone = top_countries(snapshots.as_slice(), 5, TopDirection::Loss);
        assert_eq!(from_analyzer, from_standalone);
        assert_eq!(from_analyzer[0].country, "Brazil");
    }

    #[test]
    fn test_get_series_and_year() {
        let (snapshots, series) = tables();
        let analyzer = CoverAnalyzer::new(&snapshots, &series);
        let ts = analyzer.get_series("Chad", 2000, 2075).unwrap();
        assert_eq!(ts.len(), 3);
        let entry = analyzer.get_year("Chad", 2040).unwrap();
        assert_eq!(entry.data_type, DataType::Prediction);
        assert_eq!(entry.forest_cover_percent, 7.0);
    }
}
