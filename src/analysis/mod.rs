mod analyzer;
mod assembler;
mod classifier;
mod interpolation;
mod predictor;
mod ranking;
mod units;

pub use analyzer::CoverAnalyzer;
pub use assembler::{assemble, year_entry};
pub use classifier::{
    classify, validate_year_range, FIRST_YEAR, LAST_INTERPOLATED_YEAR, LAST_REAL_YEAR, LAST_YEAR,
};
pub use interpolation::{InterpolationConfig, TrendInterpolator};
pub use predictor::{CoverPredictor, ModelKind, ModelMetrics, RegressionPredictor, TrainingSample};
pub use ranking::{top_countries, TopDirection};
pub use units::{convert_hectares_to_km2, AREA_COLUMNS, HECTARES_PER_KM2};
