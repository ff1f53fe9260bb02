//! Provides `Estimator` trait.

use crate::{
    Matrix,
    TaskKind,
    error::{AtcError, Result},
};
use super::options::{FitOptions, FitStatus, PredictOptions};
use super::output::NativeOutput;

use std::path::Path;


/// The trait [`Estimator`] is the contract a third-party model
/// has to satisfy to be wrapped by [`ModelAdapter`](crate::ModelAdapter).
///
/// You need to implement [`Estimator::name`], [`Estimator::fit`],
/// [`Estimator::predict`], [`Estimator::score`]
/// and [`Estimator::clone_box`].
/// The remaining methods are optional capabilities.
/// Their default bodies report the capability as absent,
/// and the adapter falls back accordingly.
pub trait Estimator {
    /// The declared type name, e.g. `"LGBMRegressor"`.
    /// The adapter derives the [`Family`](crate::Family) from it.
    fn name(&self) -> &str;


    /// Native fit.
    /// Long-running implementations should check `options.cancel`
    /// between iterations and return `FitStatus::Interrupted`.
    fn fit(&mut self, x: &Matrix, y: &[f64], options: &FitOptions<'_>)
        -> Result<FitStatus>;


    /// Native point prediction.
    fn predict(&self, x: &Matrix, options: &PredictOptions)
        -> Result<NativeOutput>;


    /// Native class probabilities, one row per input row.
    /// Returns `Ok(None)` if the estimator has no probability method.
    fn predict_proba(&self, _x: &Matrix, _options: &PredictOptions)
        -> Result<Option<Vec<Vec<f64>>>>
    {
        Ok(None)
    }


    /// Native score. Higher is better.
    fn score(&self, x: &Matrix, y: &[f64]) -> Result<f64>;


    /// Deep copy of `self`.
    fn clone_box(&self) -> Box<dyn Estimator>;


    /// The current estimator count, if the model has one.
    fn n_estimators(&self) -> Option<usize> {
        None
    }


    /// Set the estimator count.
    /// With `warm_start`, the next `fit` keeps the already fitted
    /// estimators and only adds new ones.
    fn set_n_estimators(&mut self, _n_estimators: usize, _warm_start: bool)
        -> Result<()>
    {
        Err(AtcError::unsupported(format!(
            "`{}` has no estimator count", self.name()
        )))
    }


    /// The best iteration recorded by native early stopping.
    fn best_iteration(&self) -> Option<usize> {
        None
    }


    /// Override the training loss, e.g. `"MultiClass"`.
    fn set_loss_function(&mut self, loss: &str) -> Result<()> {
        Err(AtcError::unsupported(format!(
            "`{}` cannot switch its loss to `{loss}`", self.name()
        )))
    }


    /// Build the trainable network for an input of `n_cols` columns.
    ///
    /// Deep-learning placeholders only know their hyperparameters
    /// until the first `fit` reveals the input width.
    /// Returns `Ok(None)` for estimators that are ready as they are.
    fn build_network(
        &self,
        _n_cols: usize,
        _task: TaskKind,
        _feature_learning: bool,
    ) -> Result<Option<Box<dyn Estimator>>>
    {
        Ok(None)
    }


    /// Replace the current state with the one saved at `path`
    /// by a checkpointing fit.
    fn restore_checkpoint(&mut self, path: &Path) -> Result<()> {
        Err(AtcError::unsupported(format!(
            "`{}` cannot restore the checkpoint {}",
            self.name(), path.display()
        )))
    }
}


impl Clone for Box<dyn Estimator> {
    fn clone(&self) -> Self {
        self.clone_box()
    }
}


impl std::fmt::Debug for dyn Estimator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Estimator({})", self.name())
    }
}
