//! Scalar configuration of [`ModelAdapter`](crate::ModelAdapter).

use serde::{Serialize, Deserialize};

use crate::{
    TaskKind,
    error::Result,
};

use std::path::PathBuf;


/// Default threshold a gradient boosting step has to beat.
pub const DEFAULT_MIN_STEP_IMPROVEMENT: f64 = 1e-4;


/// Every scalar knob of the adapter.
///
/// The struct can be read from JSON, and every field has a default,
/// so a partial document is fine:
/// ```
/// use model_atc::AdapterConfig;
///
/// let config = AdapterConfig::from_json(r#"{"task": "regressor", "hp_search": true}"#)
///     .unwrap();
/// assert!(config.hp_search);
/// assert_eq!(config.min_step_improvement, 1e-4);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AdapterConfig {
    /// Classification or regression.
    pub task: TaskKind,
    /// Family name that overrides the estimator's own name.
    pub family_name: Option<String>,
    /// Pass categorical column positions to CatBoost and LightGBM.
    pub keep_cat_features: bool,
    /// The adapter is trained inside a hyperparameter search.
    /// Shorter patience, no checkpoint, no progress output.
    pub hp_search: bool,
    /// Forwarded to deep-learning network builders.
    pub feature_learning: bool,
    /// The model is trained as an interval predictor.
    pub training_prediction_intervals: bool,
    /// Minimal score gain of a gradient boosting search step.
    pub min_step_improvement: f64,
    /// Use the reduced gradient boosting schedule.
    pub fast_search: bool,
    /// Directory for temporary deep-learning checkpoints.
    /// Defaults to the system temporary directory.
    pub checkpoint_dir: Option<PathBuf>,
    /// Seed of the held-out split. `None` draws from entropy.
    pub seed: Option<u64>,
}


impl Default for AdapterConfig {
    fn default() -> Self {
        Self {
            task: TaskKind::Classifier,
            family_name: None,
            keep_cat_features: false,
            hp_search: false,
            feature_learning: false,
            training_prediction_intervals: false,
            min_step_improvement: DEFAULT_MIN_STEP_IMPROVEMENT,
            fast_search: false,
            checkpoint_dir: None,
            seed: None,
        }
    }
}


impl AdapterConfig {
    /// Parse a configuration from JSON.
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }


    /// Whether progress should be printed.
    #[inline(always)]
    pub(crate) fn verbose(&self) -> bool {
        !self.hp_search
    }


    pub(crate) fn checkpoint_dir(&self) -> PathBuf {
        self.checkpoint_dir
            .clone()
            .unwrap_or_else(std::env::temp_dir)
    }
}
