//! Normalized outputs of [`ModelAdapter`](crate::ModelAdapter).

use polars::prelude::*;

use crate::{
    Value,
    error::{AtcError, Result},
};

use std::str::FromStr;


/// Output of [`ModelAdapter::predict`](crate::ModelAdapter::predict).
///
/// A single input row yields a bare `Scalar`,
/// never a one-element container.
#[derive(Debug, Clone, PartialEq)]
pub enum Prediction {
    /// The prediction for a single row.
    Scalar(Value),
    /// One prediction per row.
    Vector(Vec<Value>),
    /// Several outputs per row.
    Matrix(Vec<Vec<Value>>),
}


impl Prediction {
    /// Number of predicted rows.
    pub fn len(&self) -> usize {
        match self {
            Self::Scalar(_) => 1,
            Self::Vector(values) => values.len(),
            Self::Matrix(rows) => rows.len(),
        }
    }


    /// Returns `true` if there is no prediction.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }


    /// Returns the scalar, `None` for containers.
    pub fn as_scalar(&self) -> Option<&Value> {
        match self {
            Self::Scalar(v) => Some(v),
            _ => None,
        }
    }


    /// One value per row.
    /// Fails for multi-output predictions.
    pub fn into_values(self) -> Result<Vec<Value>> {
        match self {
            Self::Scalar(v) => Ok(vec![v]),
            Self::Vector(values) => Ok(values),
            Self::Matrix(_) => Err(AtcError::unsupported(
                "A multi-output prediction has no single value per row"
            )),
        }
    }


    /// One number per row.
    /// Fails for labels and multi-output predictions.
    pub fn to_f64_vec(&self) -> Result<Vec<f64>> {
        self.clone()
            .into_values()?
            .into_iter()
            .map(|v| v.as_f64().ok_or_else(|| AtcError::invalid_input(
                format!("Expected a numeric prediction, got `{v}`")
            )))
            .collect()
    }
}


/// Output of [`ModelAdapter::predict_proba`](crate::ModelAdapter::predict_proba).
#[derive(Debug, Clone, PartialEq)]
pub enum Probabilities {
    /// Class probabilities of a single row.
    Single(Vec<f64>),
    /// Class probabilities of each row.
    Many(Vec<Vec<f64>>),
}


impl Probabilities {
    /// The rows, whatever the number of rows.
    pub fn into_rows(self) -> Vec<Vec<f64>> {
        match self {
            Self::Single(row) => vec![row],
            Self::Many(rows) => rows,
        }
    }
}


/// Shapes [`ModelAdapter::predict_intervals`](crate::ModelAdapter::predict_intervals)
/// can return.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReturnType {
    /// `prediction` and every interval predictor by name.
    Dict,
    /// A data frame with one column per predictor.
    Frame,
    /// A flat list for one row, row-major lists otherwise.
    List,
}


impl FromStr for ReturnType {
    type Err = AtcError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "dict" => Ok(Self::Dict),
            "df" | "dataframe" => Ok(Self::Frame),
            "list" => Ok(Self::List),
            other => Err(AtcError::config(format!(
                "Unsupported return type `{other}`. Please pass in a return type \
                 of one of the following: [\"dict\", \"dataframe\", \"df\", \"list\"]"
            ))),
        }
    }
}


/// Output of [`ModelAdapter::predict_intervals`](crate::ModelAdapter::predict_intervals).
#[derive(Debug, Clone)]
pub enum Intervals {
    /// `("prediction", base)` followed by each interval predictor.
    Dict(Vec<(String, Prediction)>),
    /// Column `prediction` followed by one column per interval predictor.
    Frame(DataFrame),
    /// Base prediction followed by each interval prediction, for one row.
    List(Vec<Value>),
    /// The same, one row per input row.
    Rows(Vec<Vec<Value>>),
}


impl Intervals {
    /// The entry named `name` of a `Dict`.
    pub fn get(&self, name: &str) -> Option<&Prediction> {
        match self {
            Self::Dict(entries) => entries.iter()
                .find(|(key, _)| key == name)
                .map(|(_, p)| p),
            _ => None,
        }
    }
}


/// Build a column out of values.
/// Numbers become `Float64`, anything else `Utf8`.
pub(crate) fn values_to_series(name: &str, values: &[Value]) -> Series {
    let numbers = values.iter()
        .map(|v| v.as_f64())
        .collect::<Option<Vec<_>>>();
    match numbers {
        Some(numbers) => Series::new(name, numbers),
        None => {
            let labels = values.iter()
                .map(|v| v.to_string())
                .collect::<Vec<_>>();
            Series::new(name, labels)
        },
    }
}
