//! Exports the adapter, the estimator contract and the data types.
//! 
pub use crate::adapter::{
    ModelAdapter,
    ModelAdapterBuilder,
    HeldOut,
    FeatureReport,
};


pub use crate::estimator::{
    // Estimator trait
    Estimator,
    Family,

    // Native call options
    FitOptions,
    FitStatus,
    PredictOptions,
    EarlyStopping,
    EvalMetric,
    Monitor,
    Validation,
    NativeOutput,
};


pub use crate::sample::{
    Matrix,
    DenseMatrix,
    SparseMatrix,
    Value,
};


pub use crate::metadata::{
    ColumnRole,
    ColumnRoles,
    FeatureSource,
    CalibrationTable,
};


pub use crate::prediction::{
    Prediction,
    Probabilities,
    Intervals,
    ReturnType,
};


pub use crate::common::{TaskKind, CancellationToken};
pub use crate::config::AdapterConfig;
pub use crate::scorer::Scorer;
