use crate::{
    Matrix,
    common::CancellationToken,
};

use std::fmt;
use std::path::Path;


/// Result of a native fit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FitStatus {
    /// Training ran to its own stopping criterion.
    Completed,
    /// Training stopped because cancellation was requested.
    /// The estimator keeps whatever state it reached.
    Interrupted,
}


/// Quantity watched by native early stopping.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Monitor {
    /// Loss on the validation pair.
    ValidationLoss,
    /// The evaluation metric on the validation pair.
    EvalMetric,
}


/// Native early stopping settings.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EarlyStopping {
    /// Rounds (or epochs) without improvement before stopping.
    pub patience: usize,
    /// What is watched.
    pub monitor: Monitor,
}


/// Evaluation metrics the adapter asks for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EvalMetric {
    /// Root mean squared error.
    Rmse,
    /// Quantile loss, used when the model is trained
    /// to predict intervals.
    Quantile,
    /// Log-loss for two classes.
    BinaryLogloss,
    /// Log-loss for more than two classes.
    MultiLogloss,
}


impl EvalMetric {
    /// The metric name as LightGBM spells it.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Rmse => "rmse",
            Self::Quantile => "quantile",
            Self::BinaryLogloss => "binary_logloss",
            Self::MultiLogloss => "multi_logloss",
        }
    }
}


impl fmt::Display for EvalMetric {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}


/// The validation pair handed to a native fit.
#[derive(Debug, Clone, Copy)]
pub struct Validation<'a> {
    /// Held-out rows.
    pub x: &'a Matrix,
    /// Held-out targets.
    pub y: &'a [f64],
    /// Where the pair comes from, used in native logs.
    pub name: &'a str,
}


/// Options passed to [`Estimator::fit`](crate::Estimator::fit).
/// `FitOptions::default()` asks for a plain fit.
#[derive(Debug, Clone, Default)]
pub struct FitOptions<'a> {
    /// Validation pair for native early stopping.
    pub validation: Option<Validation<'a>>,
    /// Native early stopping.
    pub early_stopping: Option<EarlyStopping>,
    /// Metric evaluated on `validation`.
    pub eval_metric: Option<EvalMetric>,
    /// Positions of categorical columns.
    pub categorical_features: Option<&'a [usize]>,
    /// Stop as soon as the loss becomes `NaN`.
    pub terminate_on_nan: bool,
    /// Save the best state seen so far to this file.
    pub checkpoint: Option<&'a Path>,
    /// Print native progress.
    pub verbose: bool,
    /// Cancellation requested by the caller.
    pub cancel: Option<&'a CancellationToken>,
}


impl FitOptions<'_> {
    /// Returns `true` if cancellation was requested.
    pub fn is_cancelled(&self) -> bool {
        self.cancel.is_some_and(|token| token.is_cancelled())
    }
}


/// Options passed to the native prediction methods.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PredictOptions {
    /// Number of boosting iterations to use.
    /// `Some(0)` means "all of them" for LightGBM.
    pub num_iteration: Option<usize>,
}
