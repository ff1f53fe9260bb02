#![warn(missing_docs)]

//! 
//! A crate that wraps heterogeneous estimators behind one contract.
//! 
//! A model-selection pipeline hands its estimators to a [`ModelAdapter`]
//! (the "Air Traffic Controller")
//! and calls `fit`, `predict`, `predict_proba`, `score` and `transform`
//! without caring which library the estimator comes from.
//! 
//! The adapter classifies every estimator into a [`Family`]
//! and routes each call through the rules of that family.
//! 
//! - Input shaping
//!     Sparse matrices and data frames are densified for the families
//!     that cannot take them, and XGBoost models get a constant
//!     bias column.
//! 
//! - Training strategies
//!     Deep-learning and LightGBM models are trained with native
//!     early stopping on a held-out set.
//!     Gradient boosting models are trained by searching their
//!     estimator count with warm starts.
//!     Everything else is fitted as it is.
//! 
//! - Output normalization
//!     A single input row yields a bare value,
//!     and probabilities always carry one entry per class.

pub mod error;
pub mod common;
pub mod sample;
pub mod estimator;
pub mod metadata;
pub mod scorer;
pub mod config;
pub mod prediction;
pub mod checkpoint;
pub mod adapter;
pub mod prelude;


pub use error::{AtcError, Result};
pub use common::{TaskKind, CancellationToken};

pub use sample::{Matrix, DenseMatrix, SparseMatrix, Value};
pub use sample::{train_test_split, Split};

pub use estimator::{
    Estimator,
    Family,
    FitOptions,
    FitStatus,
    PredictOptions,
    EarlyStopping,
    EvalMetric,
    Monitor,
    Validation,
    NativeOutput,
};

pub use metadata::{
    ColumnRole,
    ColumnRoles,
    FeatureSource,
    CalibrationBucket,
    CalibrationTable,
};

pub use scorer::{Scorer, NegRmse, NegLogLoss};
pub use config::AdapterConfig;
pub use prediction::{Prediction, Probabilities, Intervals, ReturnType};

pub use adapter::{
    ModelAdapter,
    ModelAdapterBuilder,
    HeldOut,
    FeatureReport,
};
