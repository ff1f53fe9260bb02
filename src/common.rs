//! Defines some common types used in this library.

/// Defines machine learning tasks.
pub(crate) mod task;

/// Defines some checker functions.
pub(crate) mod checker;

/// Defines the cancellation token for long-running fits.
pub(crate) mod cancel;

pub use task::TaskKind;
pub use cancel::CancellationToken;
