//! Metadata produced by the surrounding pipeline:
//! column roles, the calibration table for uncertainty predictions,
//! and the sources feature verification reads from.

pub(crate) mod column_role;
pub(crate) mod feature_source;
pub(crate) mod calibration;

pub use column_role::{ColumnRole, ColumnRoles};
pub use feature_source::FeatureSource;
pub use calibration::{CalibrationBucket, CalibrationTable};
