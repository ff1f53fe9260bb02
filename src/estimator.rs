//! The `Estimator` trait that wraps third-party models,
//! and the family table that decides how each of them is fed.

/// Provides the `Estimator` trait.
pub mod core;

/// Options passed to the native `fit`/`predict`.
pub mod options;

/// Raw outputs returned by estimators.
pub mod output;

/// Estimator families and the input shaping policy.
pub mod family;

pub use self::core::Estimator;
pub use self::options::{
    FitOptions,
    FitStatus,
    PredictOptions,
    EarlyStopping,
    EvalMetric,
    Monitor,
    Validation,
};
pub use self::output::NativeOutput;
pub use self::family::Family;
