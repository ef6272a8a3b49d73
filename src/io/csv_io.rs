use std::io::{Read, Write};
use std::path::Path;

use crate::error::ForestError;
use crate::models::{CountryTimeSeries, DataType, RawTable, COUNTRY_COLUMN};

fn reader_builder() -> csv::ReaderBuilder {
    let mut builder = csv::ReaderBuilder::new();
    builder.has_headers(true).flexible(true).trim(csv::Trim::All);
    builder
}

fn parse_cell(raw: &str) -> Option<Result<f64, std::num::ParseFloatError>> {
    let raw = raw.trim();
    if raw.is_empty() || raw.eq_ignore_ascii_case("nan") || raw.eq_ignore_ascii_case("na") {
        return None;
    }
    Some(raw.parse::<f64>())
}

fn parse_table<R: Read>(rdr: &mut csv::Reader<R>, name: &str) -> Result<RawTable, ForestError> {
    let headers = rdr.headers()?.clone();
    let country_idx = headers
        .iter()
        .position(|h| h.eq_ignore_ascii_case(COUNTRY_COLUMN))
        .ok_or_else(|| {
            ForestError::InvalidData(format!("{name}: missing '{COUNTRY_COLUMN}' column"))
        })?;
    let numeric: Vec<(usize, String)> = headers
        .iter()
        .enumerate()
        .filter(|&(i, _)| i != country_idx)
        .map(|(i, h)| (i, h.to_string()))
        .collect();

    let mut table = RawTable::new(name, numeric.iter().map(|(_, h)| h.clone()).collect());

    for (row_number, record) in rdr.records().enumerate() {
        let record = record?;
        let country = record.get(country_idx).unwrap_or("").to_string();
        if country.is_empty() {
            return Err(ForestError::InvalidData(format!(
                "{name} row {}: empty country",
                row_number + 1
            )));
        }

        let mut values = Vec::with_capacity(numeric.len());
        for (idx, column) in &numeric {
            let value = match record.get(*idx).and_then(parse_cell) {
                None => None,
                Some(Ok(v)) if v.is_finite() => Some(v),
                Some(_) => {
                    return Err(ForestError::InvalidData(format!(
                        "{name} row {} ({country}), column '{column}': invalid number '{}'",
                        row_number + 1,
                        record.get(*idx).unwrap_or("")
                    )));
                }
            };
            values.push(value);
        }
        table.push_row(country, values)?;
    }

    Ok(table)
}

/// Read a country-keyed numeric table from a CSV file.
///
/// The `country` column is required; every other column is numeric and empty
/// or `NaN` cells are kept as missing values.
pub fn read_table(path: impl AsRef<Path>) -> Result<RawTable, ForestError> {
    let path = path.as_ref();
    let mut rdr = reader_builder().from_path(path)?;
    let name = path
        .file_stem()
        .map(|s| s.to_string_lossy().to_string())
        .unwrap_or_else(|| "Unknown".to_string());
    parse_table(&mut rdr, &name)
}

/// Read a country-keyed numeric table from CSV bytes.
pub fn read_table_from_bytes(data: &[u8], name: &str) -> Result<RawTable, ForestError> {
    let mut rdr = reader_builder().from_reader(data);
    parse_table(&mut rdr, name)
}

#[derive(Debug, serde::Serialize)]
struct SeriesRow<'a> {
    country: &'a str,
    year: i32,
    forest_cover_percent: f64,
    data_type: DataType,
    forest_area_km2: f64,
}

/// Write a classified series as CSV, one row per year.
pub fn write_series_csv_to<W: Write>(
    series: &CountryTimeSeries,
    writer: W,
) -> Result<(), ForestError> {
    let mut wtr = csv::Writer::from_writer(writer);
    for entry in &series.entries {
        wtr.serialize(SeriesRow {
            country: &series.country,
            year: entry.year,
            forest_cover_percent: entry.forest_cover_percent,
            data_type: entry.data_type,
            forest_area_km2: entry.forest_area_km2,
        })?;
    }
    wtr.flush()?;
    Ok(())
}

/// Write a classified series to a CSV file.
pub fn write_series_csv(
    series: &CountryTimeSeries,
    path: impl AsRef<Path>,
) -> Result<(), ForestError> {
    let file = std::fs::File::create(path.as_ref())?;
    write_series_csv_to(series, file)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::ClassifiedYearEntry;

    const SNAPSHOT_CSV: &str = "\
country,area,two_thousand_percent,two_thousand_ten_percent,delta_percent
Brazil,851576700,65.0,62.0,3.0
Chile, 75610000 ,21.5,,-1.0
";

    #[test]
    fn test_read_from_bytes() {
        let table = read_table_from_bytes(SNAPSHOT_CSV.as_bytes(), "Deforestation").unwrap();
        assert_eq!(table.name, "Deforestation");
        assert_eq!(table.len(), 2);
        assert_eq!(
            table.columns(),
            &[
                "area",
                "two_thousand_percent",
                "two_thousand_ten_percent",
                "delta_percent"
            ]
        );
        assert_eq!(table.rows()[1].country, "Chile");
        assert_eq!(table.rows()[1].values[0], Some(75_610_000.0));
        assert_eq!(table.rows()[1].values[2], None);
    }

    #[test]
    fn test_country_column_anywhere() {
        let csv = "area,Country,2030\n100,Peru,40\n";
        let table = read_table_from_bytes(csv.as_bytes(), "t").unwrap();
        assert_eq!(table.rows()[0].country, "Peru");
        assert_eq!(table.columns(), &["area", "2030"]);
        assert_eq!(table.year_columns(), vec![(2030, 1)]);
    }

    #[test]
    fn test_short_rows_are_missing_values() {
        let csv = "country,area,2000\nPeru,100\n";
        let table = read_table_from_bytes(csv.as_bytes(), "t").unwrap();
        assert_eq!(table.rows()[0].values, vec![Some(100.0), None]);
    }

    #[test]
    fn test_nan_cell_is_missing() {
        let csv = "country,area\nPeru,NaN\n";
        let table = read_table_from_bytes(csv.as_bytes(), "t").unwrap();
        assert_eq!(table.rows()[0].values, vec![None]);
    }

    #[test]
    fn test_missing_country_column() {
        let csv = "nation,area\nPeru,1\n";
        let err = read_table_from_bytes(csv.as_bytes(), "t").unwrap_err();
        assert!(matches!(err, ForestError::InvalidData(_)));
    }

    #[test]
    fn test_invalid_number_has_context() {
        let csv = "country,area\nPeru,1\nChile,lots\n";
        let err = read_table_from_bytes(csv.as_bytes(), "t").unwrap_err();
        let msg = err.to_string();
        assert!(msg.contains("row 2"));
        assert!(msg.contains("Chile"));
        assert!(msg.contains("area"));
    }

    #[test]
    fn test_empty_country_rejected() {
        let csv = "country,area\n,1\n";
        assert!(read_table_from_bytes(csv.as_bytes(), "t").is_err());
    }

    #[test]
    fn test_read_table_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("Deforestation.csv");
        std::fs::write(&path, SNAPSHOT_CSV).unwrap();
        let table = read_table(&path).unwrap();
        assert_eq!(table.name, "Deforestation");
        assert_eq!(table.len(), 2);
    }

    #[test]
    fn test_write_series_csv() {
        let series = CountryTimeSeries {
            country: "Brazil".to_string(),
            area_km2: 100.0,
            baseline_2000: 50.0,
            baseline_2010: 40.0,
            entries: vec![
                ClassifiedYearEntry {
                    year: 2010,
                    forest_cover_percent: 40.0,
                    data_type: DataType::Real,
                    forest_area_km2: 40.0,
                },
                ClassifiedYearEntry {
                    year: 2030,
                    forest_cover_percent: 30.0,
                    data_type: DataType::Prediction,
                    forest_area_km2: 30.0,
                },
            ],
        };
        let mut buf = Vec::new();
        write_series_csv_to(&series, &mut buf).unwrap();
        let text = String::from_utf8(buf).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(
            lines[0],
            "country,year,forest_cover_percent,data_type,forest_area_km2"
        );
        assert_eq!(lines[1], "Brazil,2010,40.0,real,40.0");
        assert_eq!(lines[2], "Brazil,2030,30.0,prediction,30.0");
    }
}
