pub mod analysis;
pub mod config;
pub mod context;
pub mod dataset;
pub mod error;
pub mod io;
pub mod models;
pub mod visualization;

pub use analysis::{CoverAnalyzer, InterpolationConfig, ModelKind, TopDirection};
pub use config::Settings;
pub use context::{DataContext, PredictionService};
pub use dataset::CoverDataset;
pub use error::ForestError;
pub use io::{CsvSource, TableSource};
pub use models::{ClassifiedYearEntry, CountrySnapshot, CountryTimeSeries, DataType};
