use serde::{Deserialize, Serialize};

use super::classifier::{FIRST_YEAR, LAST_INTERPOLATED_YEAR, LAST_REAL_YEAR};
use crate::error::ForestError;
use crate::models::YearSeries;

/// Parameters for bridging the observed window into the long-range forecast.
///
/// A `moderating_factor` of 0.85 shrinks the extrapolated annual rate by 15%
/// per decade after the last observation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct InterpolationConfig {
    pub moderating_factor: f64,
    /// First observed year used for the trend
    pub real_year_a: i32,
    /// Last observed year; projections are anchored on its value
    pub real_year_b: i32,
    pub horizon_start: i32,
    pub horizon_end: i32,
}

impl Default for InterpolationConfig {
    fn default() -> Self {
        Self {
            moderating_factor: 0.85,
            real_year_a: 2000,
            real_year_b: 2010,
            horizon_start: 2011,
            horizon_end: 2025,
        }
    }
}

impl InterpolationConfig {
    pub fn validate(&self) -> Result<(), ForestError> {
        if !(self.moderating_factor > 0.0 && self.moderating_factor <= 1.0) {
            return Err(ForestError::Config(format!(
                "moderating_factor must be in (0, 1], got {}",
                self.moderating_factor
            )));
        }
        let ordered = self.real_year_a < self.real_year_b
            && self.real_year_b < self.horizon_start
            && self.horizon_start <= self.horizon_end;
        if !ordered {
            return Err(ForestError::Config(format!(
                "interpolation years must satisfy a < b < start <= end, got {} {} {} {}",
                self.real_year_a, self.real_year_b, self.horizon_start, self.horizon_end
            )));
        }
        if self.real_year_a < FIRST_YEAR || self.real_year_b > LAST_REAL_YEAR {
            return Err(ForestError::Config(format!(
                "baseline years must lie within {FIRST_YEAR}-{LAST_REAL_YEAR}, got {} and {}",
                self.real_year_a, self.real_year_b
            )));
        }
        // projections must stay inside the years labeled interpolated
        if self.horizon_start <= LAST_REAL_YEAR || self.horizon_end > LAST_INTERPOLATED_YEAR {
            return Err(ForestError::Config(format!(
                "interpolation horizon must lie within {}-{LAST_INTERPOLATED_YEAR}, got {}-{}",
                LAST_REAL_YEAR + 1,
                self.horizon_start,
                self.horizon_end
            )));
        }
        Ok(())
    }
}

/// Projects a decaying trend from two observed years across a horizon.
#[derive(Debug, Clone, Default)]
pub struct TrendInterpolator {
    config: InterpolationConfig,
}

impl TrendInterpolator {
    pub fn new(config: InterpolationConfig) -> Result<Self, ForestError> {
        config.validate()?;
        Ok(Self { config })
    }

    pub fn config(&self) -> &InterpolationConfig {
        &self.config
    }

    /// Values at the two baseline years.
    fn baselines(&self, series: &YearSeries) -> Result<(f64, f64), ForestError> {
        let (a, b) = (self.config.real_year_a, self.config.real_year_b);
        let value_a = series
            .get(a)
            .ok_or(ForestError::MissingBaseline { year: a })?;
        let value_b = series
            .get(b)
            .ok_or(ForestError::MissingBaseline { year: b })?;
        Ok((value_a, value_b))
    }

    fn rate_between(&self, value_a: f64, value_b: f64) -> f64 {
        (value_b - value_a) / f64::from(self.config.real_year_b - self.config.real_year_a)
    }

    /// Annual change between the two baseline years.
    pub fn annual_rate(&self, series: &YearSeries) -> Result<f64, ForestError> {
        let (value_a, value_b) = self.baselines(series)?;
        Ok(self.rate_between(value_a, value_b))
    }

    /// Projected value for `year`, `years_elapsed` years after the last observation.
    fn project(&self, anchor: f64, annual_rate: f64, year: i32) -> f64 {
        let years_elapsed = f64::from(year - self.config.real_year_b);
        let decay = self.config.moderating_factor.powf(years_elapsed / 10.0);
        let projected = anchor + annual_rate * decay * years_elapsed;
        projected.clamp(0.0, 100.0)
    }

    /// Return a copy of `series` with every horizon year replaced by its projection.
    ///
    /// The input is left untouched. Fails with [`ForestError::MissingBaseline`]
    /// when either baseline year is absent; callers may keep the original series.
    ///
    /// # Examples
    ///
    /// ```
    /// use forest_cover_analyzer::analysis::TrendInterpolator;
    /// use forest_cover_analyzer::models::YearSeries;
    ///
    /// let series: YearSeries = vec![(2000, 50.0), (2010, 40.0)].into_iter().collect();
    /// let projected = TrendInterpolator::default().interpolate(&series).unwrap();
    /// assert!((projected.get(2020).unwrap() - 31.5).abs() < 1e-9);
    /// ```
    pub fn interpolate(&self, series: &YearSeries) -> Result<YearSeries, ForestError> {
        let (value_a, anchor) = self.baselines(series)?;
        let annual_rate = self.rate_between(value_a, anchor);

        let mut projected = series.clone();
        for year in self.config.horizon_start..=self.config.horizon_end {
            projected.insert(year, self.project(anchor, annual_rate, year));
        }
        Ok(projected)
    }
}
