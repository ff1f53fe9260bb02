//! Estimator families.
//!
//! Every branch the adapter takes is decided by the [`Family`]
//! of the wrapped estimator.
//! The family is derived once from the estimator's declared type name.

use serde::{Serialize, Deserialize};

use crate::{
    Matrix,
    error::Result,
};

use std::borrow::Cow;
use std::fmt;


/// Estimator count that asks LightGBM models
/// to search it with early stopping.
pub const LGBM_SEARCH_N_ESTIMATORS: usize = 2000;


/// Names of linear regressors that cannot take sparse input.
const SPARSE_LINEAR_NAMES: [&str; 4] = [
    "BayesianRidge",
    "LassoLars",
    "OrthogonalMatchingPursuit",
    "ARDRegression",
];


/// Names of linear classifiers that are densified before `fit`.
const LINEAR_CLASSIFIER_NAMES: [&str; 5] = [
    "Perceptron",
    "PassiveAggressiveClassifier",
    "SGDClassifier",
    "RidgeClassifier",
    "LogisticRegression",
];


/// The dispatch category of a wrapped estimator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Family {
    /// Neural networks built lazily from a placeholder
    /// (`DeepLearning*`).
    DeepLearning,
    /// `XGB*`. Needs a constant bias column.
    XGBoost,
    /// `LGBM*`.
    LightGBM,
    /// `CatBoost*`.
    CatBoost,
    /// `GradientBoosting*`. Trained by searching its estimator count.
    GradientBoosting,
    /// Linear regressors that reject sparse input.
    SparseLinear,
    /// Linear classifiers that are densified for training only.
    LinearClassifier,
    /// Anything else. Plain fit and predict.
    Generic,
}


impl Family {
    /// Classify an estimator by its declared type name.
    pub fn from_name<S: AsRef<str>>(name: S) -> Self {
        let name = name.as_ref();
        if name.starts_with("DeepLearning") {
            Self::DeepLearning
        } else if name.starts_with("XGB") {
            Self::XGBoost
        } else if name.starts_with("LGBM") {
            Self::LightGBM
        } else if name.starts_with("CatBoost") {
            Self::CatBoost
        } else if name.starts_with("GradientBoosting") {
            Self::GradientBoosting
        } else if SPARSE_LINEAR_NAMES.contains(&name) {
            Self::SparseLinear
        } else if LINEAR_CLASSIFIER_NAMES.contains(&name) {
            Self::LinearClassifier
        } else {
            Self::Generic
        }
    }


    /// Returns `true` if `self` wants a raw dense array
    /// wherever the input is a frame or sparse.
    #[inline(always)]
    pub fn wants_dense(&self) -> bool {
        matches!(
            self,
            Self::DeepLearning
                | Self::SparseLinear
                | Self::GradientBoosting
                | Self::CatBoost
                | Self::LightGBM
        )
    }


    /// Returns `true` if `self` needs the constant bias column.
    #[inline(always)]
    pub fn wants_bias_column(&self) -> bool {
        matches!(self, Self::XGBoost)
    }


    /// Returns `true` if `score` must densify sparse input.
    #[inline(always)]
    pub fn scores_dense_only(&self) -> bool {
        matches!(self, Self::GradientBoosting | Self::SparseLinear)
    }


    /// Shape `x` the way this family accepts it for prediction.
    ///
    /// The caller's matrix is never modified.
    /// If nothing has to change, the borrowed matrix is returned.
    pub fn shape_input<'a>(&self, x: &'a Matrix) -> Result<Cow<'a, Matrix>> {
        if self.wants_bias_column() {
            let ones = vec![1.0; x.n_rows()];
            return Ok(Cow::Owned(x.append_column(&ones[..])?));
        }

        if self.wants_dense() && !matches!(x, Matrix::Dense(_)) {
            return Ok(Cow::Owned(Matrix::Dense(x.to_dense()?)));
        }

        Ok(Cow::Borrowed(x))
    }


    /// Shape `x` the way this family accepts it for training.
    /// This coincides with [`Family::shape_input`]
    /// except that linear classifiers are also densified.
    pub fn shape_fit_input<'a>(&self, x: &'a Matrix)
        -> Result<Cow<'a, Matrix>>
    {
        match (self, x) {
            (Self::LinearClassifier, Matrix::Sparse(m)) => {
                Ok(Cow::Owned(Matrix::Dense(m.to_dense())))
            },
            _ => self.shape_input(x),
        }
    }


    /// Shape `x` for `score`.
    pub fn shape_score_input<'a>(&self, x: &'a Matrix)
        -> Result<Cow<'a, Matrix>>
    {
        match x {
            Matrix::Sparse(m) if self.scores_dense_only() => {
                Ok(Cow::Owned(Matrix::Dense(m.to_dense())))
            },
            _ => Ok(Cow::Borrowed(x)),
        }
    }


    /// The family name.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::DeepLearning => "DeepLearning",
            Self::XGBoost => "XGBoost",
            Self::LightGBM => "LightGBM",
            Self::CatBoost => "CatBoost",
            Self::GradientBoosting => "GradientBoosting",
            Self::SparseLinear => "SparseLinear",
            Self::LinearClassifier => "LinearClassifier",
            Self::Generic => "Generic",
        }
    }
}


impl fmt::Display for Family {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
