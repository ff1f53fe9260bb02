use crate::{
    Matrix,
    Estimator,
    Scorer,
    TaskKind,
    AdapterConfig,
    common::CancellationToken,
    error::{AtcError, Result},
    metadata::{CalibrationTable, ColumnRoles},
};
use super::model_adapter::{HeldOut, ModelAdapter};

use std::cell::OnceCell;
use std::path::PathBuf;


/// A struct that builds [`ModelAdapter`].
/// `ModelAdapterBuilder` keeps the parameters for constructing it.
///
/// # Example
///
/// ```no_run
/// use model_atc::prelude::*;
///
/// # fn run(estimator: Box<dyn Estimator>, x_test: Matrix, y_test: Vec<f64>) -> model_atc::Result<()> {
/// let adapter = ModelAdapter::builder(estimator)
///     .task(TaskKind::Classifier)
///     .feature_names(["age", "city=lyon", "city=paris"])
///     .held_out(x_test, y_test)
///     .hp_search(true)
///     .build()?;
/// # Ok(())
/// # }
/// ```
pub struct ModelAdapterBuilder {
    estimator: Box<dyn Estimator>,
    config: AdapterConfig,
    feature_names: Vec<String>,
    column_roles: Option<ColumnRoles>,
    scorer: Option<Box<dyn Scorer>>,
    held_out: Option<HeldOut>,
    interval_predictors: Vec<(String, ModelAdapter)>,
    uncertainty_model: Option<Box<dyn Estimator>>,
    calibration: Option<CalibrationTable>,
}


impl ModelAdapterBuilder {
    /// Construct a new instance of `ModelAdapterBuilder`.
    /// By default, the adapter is a classifier with
    /// the settings of [`AdapterConfig::default`].
    pub fn new(estimator: Box<dyn Estimator>) -> Self {
        Self {
            estimator,
            config: AdapterConfig::default(),
            feature_names: Vec::new(),
            column_roles: None,
            scorer: None,
            held_out: None,
            interval_predictors: Vec::new(),
            uncertainty_model: None,
            calibration: None,
        }
    }


    /// Replace every scalar setting at once.
    pub fn config(mut self, config: AdapterConfig) -> Self {
        self.config = config;
        self
    }


    /// Set the task. Default is `TaskKind::Classifier`.
    pub fn task(mut self, task: TaskKind) -> Self {
        self.config.task = task;
        self
    }


    /// Classify the estimator by `name` instead of its own name.
    pub fn family_name<S: ToString>(mut self, name: S) -> Self {
        self.config.family_name = Some(name.to_string());
        self
    }


    /// Set the training-time column names.
    pub fn feature_names<I, S>(mut self, names: I) -> Self
        where I: IntoIterator<Item = S>,
              S: ToString,
    {
        self.feature_names = names.into_iter()
            .map(|name| name.to_string())
            .collect();
        self
    }


    /// Set the column roles.
    /// Without them, feature verification is disabled.
    pub fn column_roles(mut self, roles: ColumnRoles) -> Self {
        self.column_roles = Some(roles);
        self
    }


    /// Score with `scorer` instead of the estimator's native score.
    pub fn scorer<S>(mut self, scorer: S) -> Self
        where S: Scorer + 'static
    {
        self.scorer = Some(Box::new(scorer));
        self
    }


    /// Validate on `(x, y)` instead of a split of the training data.
    pub fn held_out(mut self, x: Matrix, y: Vec<f64>) -> Self {
        self.held_out = Some(HeldOut { x, y });
        self
    }


    /// Pass categorical column positions to CatBoost and LightGBM.
    pub fn keep_cat_features(mut self, flag: bool) -> Self {
        self.config.keep_cat_features = flag;
        self
    }


    /// Mark the adapter as trained inside a hyperparameter search.
    pub fn hp_search(mut self, flag: bool) -> Self {
        self.config.hp_search = flag;
        self
    }


    /// Forwarded to deep-learning network builders.
    pub fn feature_learning(mut self, flag: bool) -> Self {
        self.config.feature_learning = flag;
        self
    }


    /// Mark the adapter as an interval predictor in training.
    pub fn training_prediction_intervals(mut self, flag: bool) -> Self {
        self.config.training_prediction_intervals = flag;
        self
    }


    /// Minimal score gain a gradient boosting step has to achieve.
    /// Default is `1e-4`.
    pub fn min_step_improvement(mut self, delta: f64) -> Self {
        self.config.min_step_improvement = delta;
        self
    }


    /// Use the reduced gradient boosting schedule.
    pub fn fast_search(mut self, flag: bool) -> Self {
        self.config.fast_search = flag;
        self
    }


    /// Directory for temporary deep-learning checkpoints.
    pub fn checkpoint_dir<P: Into<PathBuf>>(mut self, dir: P) -> Self {
        self.config.checkpoint_dir = Some(dir.into());
        self
    }


    /// Seed of the held-out split.
    pub fn seed(mut self, seed: u64) -> Self {
        self.config.seed = Some(seed);
        self
    }


    /// Append an interval predictor named `name`.
    pub fn interval_predictor<S: ToString>(
        mut self,
        name: S,
        predictor: ModelAdapter,
    ) -> Self
    {
        self.interval_predictors.push((name.to_string(), predictor));
        self
    }


    /// Attach the uncertainty model.
    pub fn uncertainty_model(mut self, model: Box<dyn Estimator>) -> Self {
        self.uncertainty_model = Some(model);
        self
    }


    /// Attach the calibration table used with the uncertainty model.
    pub fn calibration(mut self, table: CalibrationTable) -> Self {
        self.calibration = Some(table);
        self
    }


    /// Build a `ModelAdapter`.
    /// This method consumes `self`.
    pub fn build(self) -> Result<ModelAdapter> {
        let delta = self.config.min_step_improvement;
        if !delta.is_finite() || delta < 0.0 {
            return Err(AtcError::config(format!(
                "`min_step_improvement` must be a non-negative number, got {delta}"
            )));
        }

        if let Some(held_out) = &self.held_out {
            let n_rows = held_out.x.n_rows();
            if n_rows != held_out.y.len() || n_rows == 0 {
                return Err(AtcError::Shape {
                    expected: format!("{} held-out rows", held_out.y.len()),
                    actual: format!("{n_rows} rows"),
                });
            }
        }

        if self.calibration.is_some() && self.uncertainty_model.is_none() {
            return Err(AtcError::config(
                "A calibration table needs an uncertainty model"
            ));
        }

        let adapter = ModelAdapter {
            estimator: self.estimator,
            family: OnceCell::new(),
            config: self.config,
            feature_names: self.feature_names,
            column_roles: self.column_roles,
            scorer: self.scorer,
            held_out: self.held_out,
            interval_predictors: self.interval_predictors,
            uncertainty_model: self.uncertainty_model,
            calibration: self.calibration,
            cancel: CancellationToken::new(),
        };
        Ok(adapter)
    }
}
