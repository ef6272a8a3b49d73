use crate::error::ForestError;
use crate::models::DataType;

/// First year covered by any series.
pub const FIRST_YEAR: i32 = 2000;
/// Last year of the observed window.
pub const LAST_REAL_YEAR: i32 = 2010;
/// Last year derived from the observed trend.
pub const LAST_INTERPOLATED_YEAR: i32 = 2025;
/// Last year covered by the long-range prediction table.
pub const LAST_YEAR: i32 = 2075;

/// Label a year by where its value comes from.
///
/// # Examples
///
/// ```
/// use forest_cover_analyzer::analysis::classify;
/// use forest_cover_analyzer::models::DataType;
///
/// assert_eq!(classify(2010).unwrap(), DataType::Real);
/// assert_eq!(classify(2011).unwrap(), DataType::Interpolated);
/// assert_eq!(classify(2026).unwrap(), DataType::Prediction);
/// assert!(classify(2076).is_err());
/// ```
pub fn classify(year: i32) -> Result<DataType, ForestError> {
    match year {
        FIRST_YEAR..=LAST_REAL_YEAR => Ok(DataType::Real),
        2011..=LAST_INTERPOLATED_YEAR => Ok(DataType::Interpolated),
        2026..=LAST_YEAR => Ok(DataType::Prediction),
        _ => Err(ForestError::InvalidYear(format!(
            "{year} is outside {FIRST_YEAR}-{LAST_YEAR}"
        ))),
    }
}

/// Check a requested year range against the supported window.
pub fn validate_year_range(start_year: i32, end_year: i32) -> Result<(), ForestError> {
    classify(start_year)?;
    classify(end_year)?;
    if start_year > end_year {
        return Err(ForestError::InvalidYear(format!(
            "start year {start_year} is after end year {end_year}"
        )));
    }
    Ok(())
}
