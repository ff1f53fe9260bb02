use serde::{Serialize, Deserialize};

use std::fmt;


/// A single prediction.
/// Regressors return numbers, classifiers may return either
/// numeric class indices or string labels.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Value {
    /// A numeric prediction or class index.
    Number(f64),
    /// A class label.
    Label(String),
}


impl Value {
    /// Returns the number, `None` for labels.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Self::Number(v) => Some(*v),
            Self::Label(_) => None,
        }
    }


    /// Returns the label, `None` for numbers.
    pub fn as_label(&self) -> Option<&str> {
        match self {
            Self::Number(_) => None,
            Self::Label(s) => Some(s),
        }
    }
}


impl From<f64> for Value {
    fn from(v: f64) -> Self {
        Self::Number(v)
    }
}


impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Self::Label(s.to_string())
    }
}


impl From<String> for Value {
    fn from(s: String) -> Self {
        Self::Label(s)
    }
}


impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Number(v) => write!(f, "{v}"),
            Self::Label(s) => write!(f, "{s}"),
        }
    }
}
