//! The Air Traffic Controller: [`ModelAdapter`] wraps an [`Estimator`]
//! and routes every call through the rules of the estimator's
//! [`Family`].
//!
//! [`Estimator`]: crate::Estimator
//! [`Family`]: crate::Family

mod model_adapter;
mod builder;
mod fit;
mod schedule;
mod progress;
mod predict;
mod intervals;
mod uncertainty;
mod features;

pub use model_adapter::{ModelAdapter, HeldOut};
pub use builder::ModelAdapterBuilder;
pub use features::FeatureReport;
pub use schedule::{n_estimators_schedule, GB_PATIENCE};
