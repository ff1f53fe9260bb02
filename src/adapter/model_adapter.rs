use crate::{
    Matrix,
    Estimator,
    Family,
    Scorer,
    TaskKind,
    AdapterConfig,
    common::CancellationToken,
    metadata::{CalibrationTable, ColumnRoles},
};
use super::builder::ModelAdapterBuilder;

use std::cell::OnceCell;
use std::fmt;


/// Externally supplied held-out data.
/// It is consumed by the first `fit` that needs a validation pair
/// and released when that `fit` returns.
#[derive(Debug, Clone)]
pub struct HeldOut {
    /// Held-out rows.
    pub x: Matrix,
    /// Held-out targets.
    pub y: Vec<f64>,
}


/// Wraps an [`Estimator`] behind one uniform contract.
///
/// The adapter classifies the estimator into a [`Family`] once,
/// shapes every input the way that family accepts it,
/// picks a training strategy, and normalizes what comes back.
///
/// # Example
/// ```no_run
/// use model_atc::prelude::*;
///
/// # fn run(estimator: Box<dyn Estimator>, x: Matrix, y: Vec<f64>) -> model_atc::Result<()> {
/// let mut adapter = ModelAdapter::builder(estimator)
///     .task(TaskKind::Regressor)
///     .min_step_improvement(1e-3)
///     .build()?;
///
/// adapter.fit(&x, &y)?;
/// let predictions = adapter.predict(&x)?;
/// # Ok(())
/// # }
/// ```
pub struct ModelAdapter {
    pub(crate) estimator: Box<dyn Estimator>,
    pub(crate) family: OnceCell<Family>,
    pub(crate) config: AdapterConfig,
    pub(crate) feature_names: Vec<String>,
    pub(crate) column_roles: Option<ColumnRoles>,
    pub(crate) scorer: Option<Box<dyn Scorer>>,
    pub(crate) held_out: Option<HeldOut>,
    pub(crate) interval_predictors: Vec<(String, ModelAdapter)>,
    pub(crate) uncertainty_model: Option<Box<dyn Estimator>>,
    pub(crate) calibration: Option<CalibrationTable>,
    pub(crate) cancel: CancellationToken,
}


impl ModelAdapter {
    /// Start building an adapter around `estimator`.
    pub fn builder(estimator: Box<dyn Estimator>) -> ModelAdapterBuilder {
        ModelAdapterBuilder::new(estimator)
    }


    /// Construct an adapter with default settings for `task`.
    pub fn new(estimator: Box<dyn Estimator>, task: TaskKind) -> Self {
        Self {
            estimator,
            family: OnceCell::new(),
            config: AdapterConfig { task, ..AdapterConfig::default() },
            feature_names: Vec::new(),
            column_roles: None,
            scorer: None,
            held_out: None,
            interval_predictors: Vec::new(),
            uncertainty_model: None,
            calibration: None,
            cancel: CancellationToken::new(),
        }
    }


    /// The family of the wrapped estimator.
    ///
    /// The family is derived on first use,
    /// from the family name of the configuration if one was given,
    /// and from the estimator's name otherwise.
    /// It never changes afterwards,
    /// even when `fit` replaces the estimator.
    pub fn family(&self) -> Family {
        *self.family.get_or_init(|| {
            let name = self.config.family_name.as_deref()
                .unwrap_or_else(|| self.estimator.name());
            Family::from_name(name)
        })
    }


    /// The wrapped estimator.
    pub fn estimator(&self) -> &dyn Estimator {
        self.estimator.as_ref()
    }


    /// Consume the adapter and return the wrapped estimator.
    pub fn into_estimator(self) -> Box<dyn Estimator> {
        self.estimator
    }


    /// Classification or regression.
    pub fn task(&self) -> TaskKind {
        self.config.task
    }


    /// The configuration.
    pub fn config(&self) -> &AdapterConfig {
        &self.config
    }


    /// Training-time column names.
    pub fn feature_names(&self) -> &[String] {
        &self.feature_names[..]
    }


    /// Column roles, if any were supplied.
    pub fn column_roles(&self) -> Option<&ColumnRoles> {
        self.column_roles.as_ref()
    }


    /// Returns `true` while externally supplied held-out data
    /// is still attached.
    pub fn has_held_out(&self) -> bool {
        self.held_out.is_some()
    }


    /// Names of the interval predictors, in order.
    pub fn interval_names(&self) -> Vec<&str> {
        self.interval_predictors.iter()
            .map(|(name, _)| name.as_str())
            .collect()
    }


    /// A handle that interrupts a running `fit`.
    ///
    /// The interrupted fit returns normally and keeps
    /// the best model it had captured.
    pub fn cancellation_token(&self) -> CancellationToken {
        self.cancel.clone()
    }
}


impl fmt::Debug for ModelAdapter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ModelAdapter")
            .field("estimator", &self.estimator.name())
            .field("family", &self.family.get())
            .field("task", &self.config.task)
            .field("n_features", &self.feature_names.len())
            .field("interval_predictors", &self.interval_names())
            .field("has_uncertainty_model", &self.uncertainty_model.is_some())
            .finish()
    }
}
