use serde::{Serialize, Deserialize};

use crate::error::AtcError;

use std::fmt;
use std::str::FromStr;


/// The kind of task the wrapped estimator solves.
/// The task kind is fixed when the adapter is constructed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TaskKind {
    /// Classification. Targets are class indices `0`, `1`, ..., `K-1`.
    Classifier,
    /// Regression.
    Regressor,
}


impl TaskKind {
    /// Returns `true` if `self` is `TaskKind::Classifier`.
    #[inline(always)]
    pub fn is_classifier(&self) -> bool {
        matches!(self, Self::Classifier)
    }


    /// The name used in configuration files.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Classifier => "classifier",
            Self::Regressor => "regressor",
        }
    }
}


impl Default for TaskKind {
    fn default() -> Self {
        Self::Classifier
    }
}


impl fmt::Display for TaskKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}


impl FromStr for TaskKind {
    type Err = AtcError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "classifier" => Ok(Self::Classifier),
            "regressor" => Ok(Self::Regressor),
            other => Err(AtcError::config(format!(
                "Unknown task kind `{other}`. \
                 Expected `classifier` or `regressor`."
            ))),
        }
    }
}


/// Number of distinct class labels in `y`.
/// Labels are compared by their bit pattern so that `NaN` counts once.
#[inline(always)]
pub(crate) fn n_distinct(y: &[f64]) -> usize {
    y.iter()
        .map(|yi| yi.to_bits())
        .collect::<std::collections::HashSet<_>>()
        .len()
}
