use thiserror::Error;

/// Errors that can occur while loading, deriving, or querying forest cover data.
#[derive(Error, Debug)]
pub enum ForestError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Config error: {0}")]
    Config(String),

    #[error("Parse error: {0}")]
    ParseError(String),

    #[error("Validation error: {0}")]
    ValidationError(String),

    /// A source table holds content that cannot be turned into a dataset.
    #[error("Invalid data: {0}")]
    InvalidData(String),

    #[error("Analysis error: {0}")]
    AnalysisError(String),

    #[error("Insufficient data: {0}")]
    InsufficientData(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Invalid year: {0}")]
    InvalidYear(String),

    /// A baseline year needed for trend interpolation is absent from the series.
    #[error("Missing baseline: year {year} is not present in the series")]
    MissingBaseline { year: i32 },

    #[error("Model not trained: {0}")]
    UntrainedModel(String),

    #[error("Source unavailable: {0}")]
    SourceUnavailable(String),
}

impl ForestError {
    /// Whether the error was caused by the request rather than by the data or environment.
    ///
    /// Faults in the source tables or settings are server-side even when they
    /// surface while answering a request.
    pub fn is_client_error(&self) -> bool {
        matches!(
            self,
            ForestError::NotFound(_)
                | ForestError::InvalidYear(_)
                | ForestError::ParseError(_)
                | ForestError::ValidationError(_)
        )
    }
}

impl From<toml::de::Error> for ForestError {
    fn from(e: toml::de::Error) -> Self {
        ForestError::Config(e.to_string())
    }
}
