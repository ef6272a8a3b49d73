use serde::{Deserialize, Serialize};
use statrs::statistics::Statistics;

use crate::error::ForestError;
use crate::models::CountrySnapshot;

/// One training observation: 2000 cover, land area, and the observed 2010 cover.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TrainingSample {
    pub forest_percent_2000: f64,
    pub area_km2: f64,
    pub forest_percent_2010: f64,
}

impl From<&CountrySnapshot> for TrainingSample {
    fn from(s: &CountrySnapshot) -> Self {
        Self {
            forest_percent_2000: s.forest_percent_2000,
            area_km2: s.area_km2,
            forest_percent_2010: s.forest_percent_2010,
        }
    }
}

/// Regression model used to predict 2010 cover.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ModelKind {
    /// Least squares on 2000 cover and land area
    LinearRegression,
    /// 2000 cover minus the mean observed change
    MeanChange,
}

impl ModelKind {
    pub const ALL: [ModelKind; 2] = [ModelKind::LinearRegression, ModelKind::MeanChange];
}

impl std::fmt::Display for ModelKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ModelKind::LinearRegression => write!(f, "linear_regression"),
            ModelKind::MeanChange => write!(f, "mean_change"),
        }
    }
}

impl std::str::FromStr for ModelKind {
    type Err = ForestError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "linear_regression" | "linear" | "lin" => Ok(ModelKind::LinearRegression),
            "mean_change" | "mean" => Ok(ModelKind::MeanChange),
            _ => Err(ForestError::ParseError(format!(
                "Unknown model: '{s}'. Use linear_regression or mean_change"
            ))),
        }
    }
}

/// Goodness of fit on the training set.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelMetrics {
    pub model: ModelKind,
    pub r_squared: f64,
    pub rmse: f64,
    pub mae: f64,
    pub n_samples: usize,
}

/// Contract for the 2000 → 2010 cover predictor.
pub trait CoverPredictor {
    /// Fit every model to the samples, replacing any earlier fit.
    fn fit(&mut self, samples: &[TrainingSample]) -> Result<(), ForestError>;

    /// Predict 2010 cover (percent) from 2000 cover and land area.
    fn predict(
        &self,
        forest_percent_2000: f64,
        area_km2: f64,
        model: ModelKind,
    ) -> Result<f64, ForestError>;

    fn is_trained(&self) -> bool;
}

#[derive(Debug, Clone, Copy, PartialEq)]
struct LinearFit {
    intercept: f64,
    coef_percent: f64,
    coef_area: f64,
}

impl LinearFit {
    fn eval(&self, percent: f64, area: f64) -> f64 {
        self.intercept + self.coef_percent * percent + self.coef_area * area
    }
}

#[derive(Debug, Clone, PartialEq)]
struct TrainedState {
    linear: LinearFit,
    mean_change: f64,
    metrics: Vec<ModelMetrics>,
}

/// Ordinary least squares and mean-change baseline behind [`CoverPredictor`].
///
/// # Examples
///
/// ```
/// use forest_cover_analyzer::analysis::{CoverPredictor, ModelKind, RegressionPredictor, TrainingSample};
///
/// let samples: Vec<TrainingSample> = [(50.0, 100.0, 45.0), (30.0, 400.0, 28.0), (70.0, 250.0, 63.0)]
///     .iter()
///     .map(|&(p, a, q)| TrainingSample { forest_percent_2000: p, area_km2: a, forest_percent_2010: q })
///     .collect();
/// let mut predictor = RegressionPredictor::new();
/// predictor.fit(&samples).unwrap();
/// let p = predictor.predict(60.0, 200.0, ModelKind::MeanChange).unwrap();
/// assert!((p - 55.333333).abs() < 1e-4);
/// ```
#[derive(Debug, Clone, Default)]
pub struct RegressionPredictor {
    state: Option<TrainedState>,
}

impl RegressionPredictor {
    pub fn new() -> Self {
        Self::default()
    }

    /// Training-set metrics for each model, once fitted.
    pub fn metrics(&self) -> Result<&[ModelMetrics], ForestError> {
        self.state
            .as_ref()
            .map(|s| s.metrics.as_slice())
            .ok_or_else(untrained)
    }
}

fn untrained() -> ForestError {
    ForestError::UntrainedModel("call fit() before predict()".to_string())
}

fn validate_inputs(forest_percent_2000: f64, area_km2: f64) -> Result<(), ForestError> {
    if !(0.0..=100.0).contains(&forest_percent_2000) {
        return Err(ForestError::ValidationError(format!(
            "forest cover must be between 0 and 100, got {forest_percent_2000}"
        )));
    }
    if !area_km2.is_finite() || area_km2 < 0.0 {
        return Err(ForestError::ValidationError(format!(
            "area must be non-negative, got {area_km2}"
        )));
    }
    Ok(())
}

/// Two-feature least squares via the centered normal equations.
fn fit_linear(samples: &[TrainingSample]) -> Result<LinearFit, ForestError> {
    let x1: Vec<f64> = samples.iter().map(|s| s.forest_percent_2000).collect();
    let x2: Vec<f64> = samples.iter().map(|s| s.area_km2).collect();
    let y: Vec<f64> = samples.iter().map(|s| s.forest_percent_2010).collect();
    let (m1, m2, my) = (x1.iter().mean(), x2.iter().mean(), y.iter().mean());

    let (mut s11, mut s22, mut s12, mut s1y, mut s2y) = (0.0, 0.0, 0.0, 0.0, 0.0);
    for i in 0..samples.len() {
        let (d1, d2, dy) = (x1[i] - m1, x2[i] - m2, y[i] - my);
        s11 += d1 * d1;
        s22 += d2 * d2;
        s12 += d1 * d2;
        s1y += d1 * dy;
        s2y += d2 * dy;
    }

    let det = s11 * s22 - s12 * s12;
    if det.abs() <= 1e-12 * s11 * s22 {
        return Err(ForestError::AnalysisError(
            "Singular design matrix: training features are collinear or constant".to_string(),
        ));
    }
    let coef_percent = (s22 * s1y - s12 * s2y) / det;
    let coef_area = (s11 * s2y - s12 * s1y) / det;
    Ok(LinearFit {
        intercept: my - coef_percent * m1 - coef_area * m2,
        coef_percent,
        coef_area,
    })
}

fn score(model: ModelKind, actual: &[f64], predicted: &[f64]) -> ModelMetrics {
    let n = actual.len();
    let residuals: Vec<f64> = actual.iter().zip(predicted).map(|(a, p)| a - p).collect();
    let ss_res: f64 = residuals.iter().map(|r| r * r).sum();
    let ss_tot = actual.iter().variance() * (n as f64 - 1.0);
    let r_squared = if ss_tot > 0.0 { 1.0 - ss_res / ss_tot } else { 0.0 };
    ModelMetrics {
        model,
        r_squared,
        rmse: (ss_res / n as f64).sqrt(),
        mae: residuals.iter().map(|r| r.abs()).mean(),
        n_samples: n,
    }
}

impl CoverPredictor for RegressionPredictor {
    fn fit(&mut self, samples: &[TrainingSample]) -> Result<(), ForestError> {
        if samples.len() < 3 {
            return Err(ForestError::InsufficientData(format!(
                "Need at least 3 countries to train, got {}",
                samples.len()
            )));
        }
        for s in samples {
            validate_inputs(s.forest_percent_2000, s.area_km2)?;
        }

        let linear = fit_linear(samples)?;
        let mean_change = samples
            .iter()
            .map(|s| s.forest_percent_2000 - s.forest_percent_2010)
            .mean();

        let actual: Vec<f64> = samples.iter().map(|s| s.forest_percent_2010).collect();
        let linear_pred: Vec<f64> = samples
            .iter()
            .map(|s| linear.eval(s.forest_percent_2000, s.area_km2).clamp(0.0, 100.0))
            .collect();
        let mean_pred: Vec<f64> = samples
            .iter()
            .map(|s| (s.forest_percent_2000 - mean_change).clamp(0.0, 100.0))
            .collect();

        let metrics = vec![
            score(ModelKind::LinearRegression, &actual, &linear_pred),
            score(ModelKind::MeanChange, &actual, &mean_pred),
        ];
        tracing::info!(
            samples = samples.len(),
            linear_r2 = metrics[0].r_squared,
            "trained forest cover predictor"
        );

        self.state = Some(TrainedState {
            linear,
            mean_change,
            metrics,
        });
        Ok(())
    }

    fn predict(
        &self,
        forest_percent_2000: f64,
        area_km2: f64,
        model: ModelKind,
    ) -> Result<f64, ForestError> {
        let state = self.state.as_ref().ok_or_else(untrained)?;
        validate_inputs(forest_percent_2000, area_km2)?;
        let raw = match model {
            ModelKind::LinearRegression => state.linear.eval(forest_percent_2000, area_km2),
            ModelKind::MeanChange => forest_percent_2000 - state.mean_change,
        };
        Ok(raw.clamp(0.0, 100.0))
    }

    fn is_trained(&self) -> bool {
        self.state.is_some()
    }
}
