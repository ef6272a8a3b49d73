use std::path::Path;

use serde::Serialize;

use crate::error::ForestError;

/// Serialize any report value to a JSON string.
pub fn to_json<T: Serialize + ?Sized>(value: &T, pretty: bool) -> Result<String, ForestError> {
    let content = if pretty {
        serde_json::to_string_pretty(value)?
    } else {
        serde_json::to_string(value)?
    };
    Ok(content)
}

/// Write any report value (series, snapshots, metrics) to a JSON file.
pub fn write_json<T: Serialize + ?Sized>(
    value: &T,
    path: impl AsRef<Path>,
    pretty: bool,
) -> Result<(), ForestError> {
    std::fs::write(path.as_ref(), to_json(value, pretty)?)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{ClassifiedYearEntry, CountryTimeSeries, DataType};

    fn series() -> CountryTimeSeries {
        CountryTimeSeries {
            country: "Peru".to_string(),
            area_km2: 1_285_216.0,
            baseline_2000: 54.0,
            baseline_2010: 53.0,
            entries: vec![ClassifiedYearEntry {
                year: 2015,
                forest_cover_percent: 52.6,
                data_type: DataType::Interpolated,
                forest_area_km2: 676_023.6,
            }],
        }
    }

    #[test]
    fn test_to_json_fields() {
        let json = to_json(&series(), false).unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value["country"], "Peru");
        assert_eq!(value["entries"][0]["data_type"], "interpolated");
        assert_eq!(value["entries"][0]["year"], 2015);
    }

    #[test]
    fn test_write_json_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("peru.json");
        write_json(&series(), &path, true).unwrap();
        let content = std::fs::read_to_string(&path).unwrap();
        assert!(content.contains('\n'));
        let loaded: CountryTimeSeries = serde_json::from_str(&content).unwrap();
        assert_eq!(loaded, series());
    }
}
