//! Input matrices accepted by the adapter.
//!
//! A [`Matrix`] is either a named-column [`polars::prelude::DataFrame`],
//! a row-major dense array, or a CSR sparse matrix.
//! Estimators disagree on which of these they accept,
//! so the adapter converts between them before every call.

// Provides the dense row-major matrix.
pub(crate) mod dense;
// Provides the CSR sparse matrix.
pub(crate) mod sparse;
// Provides the enumeration of input representations.
pub(crate) mod matrix;
// Provides the hold-out split.
pub(crate) mod split;
// Provides prediction values.
pub(crate) mod value;


pub use dense::DenseMatrix;
pub use sparse::SparseMatrix;
pub use matrix::Matrix;
pub use split::{train_test_split, Split};
pub use value::Value;
