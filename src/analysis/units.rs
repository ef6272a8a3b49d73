use crate::error::ForestError;
use crate::models::RawTable;

/// Area columns reported in hectares by the source tables.
pub const AREA_COLUMNS: &[&str] = &[
    "area",
    "two_thousand_area",
    "two_thousand_ten_area",
    "delta_area",
];

/// Hectares per square kilometer.
pub const HECTARES_PER_KM2: f64 = 100.0;

/// Convert the named columns from hectares to square kilometers.
///
/// Columns absent from the table are skipped. Converting a column twice is an
/// error, so a table can only ever hold hectare or km² values for that column.
/// Returns the names of the columns that were converted.
pub fn convert_hectares_to_km2(
    table: &mut RawTable,
    columns: &[&str],
) -> Result<Vec<String>, ForestError> {
    if let Some(already) = columns.iter().find(|c| table.is_converted(c)) {
        return Err(ForestError::InvalidData(format!(
            "{}: column '{already}' is already in km2",
            table.name
        )));
    }

    let mut converted = Vec::new();
    for column in columns {
        let Some(idx) = table.column_index(column) else {
            continue;
        };
        for row in table.rows_mut() {
            if let Some(v) = row.values[idx].as_mut() {
                *v /= HECTARES_PER_KM2;
            }
        }
        table.mark_converted(column);
        converted.push(column.to_string());
    }
    Ok(converted)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn table() -> RawTable {
        let mut t = RawTable::new(
            "units",
            vec![
                "area".into(),
                "two_thousand_percent".into(),
                "delta_area".into(),
            ],
        );
        t.push_row("Brazil", vec![Some(851_576_700.0), Some(65.0), Some(2500.0)])
            .unwrap();
        t.push_row("Chile", vec![Some(7_435_500.0), Some(21.0), None])
            .unwrap();
        t
    }

    #[test]
    fn test_converts_area_columns_only() {
        let mut t = table();
        let converted = convert_hectares_to_km2(&mut t, AREA_COLUMNS).unwrap();
        assert_eq!(converted, vec!["area".to_string(), "delta_area".to_string()]);
        assert_eq!(t.rows()[0].values[0], Some(8_515_767.0));
        assert_eq!(t.rows()[0].values[1], Some(65.0));
        assert_eq!(t.rows()[0].values[2], Some(25.0));
        assert_eq!(t.rows()[1].values[2], None);
    }

    #[test]
    fn test_absent_columns_are_noop() {
        let mut t = table();
        let converted = convert_hectares_to_km2(&mut t, &["two_thousand_area"]).unwrap();
        assert!(converted.is_empty());
        assert_eq!(t.rows()[0].values[0], Some(851_576_700.0));
    }

    #[test]
    fn test_second_conversion_rejected() {
        let mut t = table();
        convert_hectares_to_km2(&mut t, AREA_COLUMNS).unwrap();
        let err = convert_hectares_to_km2(&mut t, &["area"]).unwrap_err();
        assert!(matches!(err, ForestError::InvalidData(_)));
        // values unchanged by the rejected call
        assert_eq!(t.rows()[0].values[0], Some(8_515_767.0));
    }

    #[test]
    fn test_conversion_marks_table() {
        let mut t = table();
        assert!(!t.is_converted("area"));
        convert_hectares_to_km2(&mut t, &["area"]).unwrap();
        assert!(t.is_converted("area"));
        assert!(!t.is_converted("delta_area"));
    }
}
