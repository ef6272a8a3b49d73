mod csv_io;
mod json_io;

use std::path::PathBuf;

use crate::error::ForestError;
use crate::models::RawTable;

pub use csv_io::{read_table, read_table_from_bytes, write_series_csv, write_series_csv_to};
pub use json_io::{to_json, write_json};

/// Supplier of the two raw source tables, with areas still in hectares.
pub trait TableSource {
    /// Per-country snapshot rows.
    fn load_snapshot_table(&self) -> Result<RawTable, ForestError>;

    /// Year-indexed long-range table.
    ///
    /// Returns [`ForestError::SourceUnavailable`] when there is no such table.
    fn load_long_range_table(&self) -> Result<RawTable, ForestError>;
}

/// Both tables read from CSV files.
#[derive(Debug, Clone)]
pub struct CsvSource {
    pub snapshot_path: PathBuf,
    pub long_range_path: Option<PathBuf>,
}

impl CsvSource {
    pub fn new(snapshot_path: impl Into<PathBuf>, long_range_path: Option<PathBuf>) -> Self {
        Self {
            snapshot_path: snapshot_path.into(),
            long_range_path,
        }
    }
}

impl TableSource for CsvSource {
    fn load_snapshot_table(&self) -> Result<RawTable, ForestError> {
        read_table(&self.snapshot_path)
    }

    fn load_long_range_table(&self) -> Result<RawTable, ForestError> {
        let path = self.long_range_path.as_ref().ok_or_else(|| {
            ForestError::SourceUnavailable("no long-range table configured".to_string())
        })?;
        if !path.exists() {
            return Err(ForestError::SourceUnavailable(format!(
                "{} does not exist",
                path.display()
            )));
        }
        read_table(path)
    }
}

/// Tables already held in memory.
#[derive(Debug, Clone)]
pub struct MemorySource {
    pub snapshot: RawTable,
    pub long_range: Option<RawTable>,
}

impl TableSource for MemorySource {
    fn load_snapshot_table(&self) -> Result<RawTable, ForestError> {
        Ok(self.snapshot.clone())
    }

    fn load_long_range_table(&self) -> Result<RawTable, ForestError> {
        self.long_range.clone().ok_or_else(|| {
            ForestError::SourceUnavailable("no long-range table supplied".to_string())
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SNAPSHOT_CSV: &str = "\
country,area,two_thousand_percent,two_thousand_ten_percent,delta_percent
Brazil,851576700,65.0,62.0,3.0
";

    #[test]
    fn test_csv_source_without_long_range() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("snap.csv");
        std::fs::write(&path, SNAPSHOT_CSV).unwrap();

        let source: &dyn TableSource = &CsvSource::new(&path, None);
        assert_eq!(source.load_snapshot_table().unwrap().len(), 1);
        assert!(matches!(
            source.load_long_range_table(),
            Err(ForestError::SourceUnavailable(_))
        ));
    }

    #[test]
    fn test_csv_source_missing_long_range_file() {
        let dir = tempfile::tempdir().unwrap();
        let source = CsvSource::new(
            dir.path().join("snap.csv"),
            Some(dir.path().join("absent.csv")),
        );
        assert!(matches!(
            source.load_long_range_table(),
            Err(ForestError::SourceUnavailable(_))
        ));
        // a missing snapshot file is a hard error
        assert!(matches!(
            source.load_snapshot_table(),
            Err(ForestError::Csv(_))
        ));
    }

    #[test]
    fn test_memory_source() {
        let table = read_table_from_bytes(SNAPSHOT_CSV.as_bytes(), "snap").unwrap();
        let source = MemorySource {
            snapshot: table.clone(),
            long_range: None,
        };
        assert_eq!(source.load_snapshot_table().unwrap(), table);
        assert!(source.load_long_range_table().is_err());
    }
}
