use std::sync::{Mutex, OnceLock, PoisonError, RwLock};

use tracing::{debug, info};

use crate::analysis::{
    CoverAnalyzer, CoverPredictor, InterpolationConfig, ModelKind, ModelMetrics,
    RegressionPredictor,
};
use crate::dataset::CoverDataset;
use crate::error::ForestError;
use crate::io::TableSource;

/// Owns the table source and the lazily loaded dataset.
///
/// The first call to [`DataContext::dataset`] loads and derives everything;
/// concurrent first callers wait on the same load. Later calls read the
/// cached dataset without locking. A failed load is not cached.
pub struct DataContext {
    source: Box<dyn TableSource + Send + Sync>,
    config: InterpolationConfig,
    dataset: OnceLock<CoverDataset>,
    init_lock: Mutex<()>,
}

impl std::fmt::Debug for DataContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DataContext")
            .field("config", &self.config)
            .field("initialized", &self.is_initialized())
            .finish()
    }
}

impl DataContext {
    pub fn new(
        source: impl TableSource + Send + Sync + 'static,
        config: InterpolationConfig,
    ) -> Result<Self, ForestError> {
        config.validate()?;
        Ok(Self {
            source: Box::new(source),
            config,
            dataset: OnceLock::new(),
            init_lock: Mutex::new(()),
        })
    }

    pub fn config(&self) -> &InterpolationConfig {
        &self.config
    }

    pub fn is_initialized(&self) -> bool {
        self.dataset.get().is_some()
    }

    /// The loaded dataset, loading it on first use.
    pub fn dataset(&self) -> Result<&CoverDataset, ForestError> {
        if let Some(ds) = self.dataset.get() {
            return Ok(ds);
        }
        let _guard = self
            .init_lock
            .lock()
            .unwrap_or_else(PoisonError::into_inner);
        if let Some(ds) = self.dataset.get() {
            return Ok(ds);
        }
        info!("loading forest cover tables");
        let loaded = CoverDataset::load(self.source.as_ref(), &self.config)?;
        Ok(self.dataset.get_or_init(|| loaded))
    }

    pub fn analyzer(&self) -> Result<CoverAnalyzer<'_>, ForestError> {
        Ok(self.dataset()?.analyzer())
    }

    /// Drop the cached dataset; the next access reloads from the source.
    pub fn reset(&mut self) {
        if self.dataset.take().is_some() {
            debug!("dataset cache cleared");
        }
    }
}

/// Lazily trained predictor shared between callers.
///
/// Training happens on the first prediction. If it fails the error is
/// returned and the next call tries again.
#[derive(Debug, Default)]
pub struct PredictionService<P = RegressionPredictor> {
    predictor: RwLock<P>,
}

impl<P: CoverPredictor> PredictionService<P> {
    pub fn new(predictor: P) -> Self {
        Self {
            predictor: RwLock::new(predictor),
        }
    }

    pub fn is_trained(&self) -> bool {
        self.predictor
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .is_trained()
    }

    /// Fit on every snapshot of the dataset, replacing any earlier fit.
    pub fn train(&self, dataset: &CoverDataset) -> Result<(), ForestError> {
        let samples = dataset.training_samples();
        let mut predictor = self
            .predictor
            .write()
            .unwrap_or_else(PoisonError::into_inner);
        predictor.fit(&samples)
    }

    /// Train from `context` unless already trained.
    pub fn ensure_trained(&self, context: &DataContext) -> Result<(), ForestError> {
        if self.is_trained() {
            return Ok(());
        }
        let dataset = context.dataset()?;
        let mut predictor = self
            .predictor
            .write()
            .unwrap_or_else(PoisonError::into_inner);
        if !predictor.is_trained() {
            predictor.fit(&dataset.training_samples())?;
        }
        Ok(())
    }

    pub fn predict(
        &self,
        context: &DataContext,
        forest_percent_2000: f64,
        area_km2: f64,
        model: ModelKind,
    ) -> Result<f64, ForestError> {
        self.ensure_trained(context)?;
        self.predictor
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .predict(forest_percent_2000, area_km2, model)
    }
}

impl PredictionService<RegressionPredictor> {
    /// Training-set metrics, training first if needed.
    pub fn metrics(&self, context: &DataContext) -> Result<Vec<ModelMetrics>, ForestError> {
        self.ensure_trained(context)?;
        let predictor = self
            .predictor
            .read()
            .unwrap_or_else(PoisonError::into_inner);
        Ok(predictor.metrics()?.to_vec())
    }
}
