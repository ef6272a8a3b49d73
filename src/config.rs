use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::analysis::{InterpolationConfig, ModelKind};
use crate::error::ForestError;

/// File locations of the two source tables.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DataSettings {
    pub snapshot_path: Option<PathBuf>,
    pub long_range_path: Option<PathBuf>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PredictorSettings {
    pub default_model: ModelKind,
}

impl Default for PredictorSettings {
    fn default() -> Self {
        Self {
            default_model: ModelKind::LinearRegression,
        }
    }
}

/// Settings file contents. Every section is optional.
///
/// ```toml
/// [data]
/// snapshot_path = "data/deforestation.csv"
/// long_range_path = "data/forest_predictions.csv"
///
/// [interpolation]
/// moderating_factor = 0.85
///
/// [predictor]
/// default_model = "mean_change"
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub data: DataSettings,
    pub interpolation: InterpolationConfig,
    pub predictor: PredictorSettings,
}

impl Settings {
    pub fn from_toml_str(content: &str) -> Result<Self, ForestError> {
        let settings: Settings = toml::from_str(content)?;
        settings.interpolation.validate()?;
        Ok(settings)
    }

    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ForestError> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|e| {
            ForestError::Config(format!("cannot read {}: {e}", path.display()))
        })?;
        let mut settings = Self::from_toml_str(&content)?;
        // relative data paths are resolved against the settings file
        if let Some(dir) = path.parent() {
            settings.data.resolve_relative_to(dir);
        }
        Ok(settings)
    }
}

impl DataSettings {
    fn resolve_relative_to(&mut self, dir: &Path) {
        for path in [&mut self.snapshot_path, &mut self.long_range_path]
            .into_iter()
            .flatten()
        {
            if path.is_relative() {
                *path = dir.join(&*path);
            }
        }
    }
}
