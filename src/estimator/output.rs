use crate::Value;


/// What a native `predict` returns.
#[derive(Debug, Clone, PartialEq)]
pub enum NativeOutput {
    /// One value per input row.
    Flat(Vec<Value>),
    /// One row of values per input row.
    /// Some libraries wrap every prediction in a one-element row.
    Nested(Vec<Vec<Value>>),
}


impl NativeOutput {
    /// Number of predicted rows.
    pub fn len(&self) -> usize {
        match self {
            Self::Flat(values) => values.len(),
            Self::Nested(rows) => rows.len(),
        }
    }


    /// Returns `true` if there is no prediction.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}


impl From<Vec<f64>> for NativeOutput {
    fn from(values: Vec<f64>) -> Self {
        Self::Flat(values.into_iter().map(Value::Number).collect())
    }
}


impl From<Vec<Value>> for NativeOutput {
    fn from(values: Vec<Value>) -> Self {
        Self::Flat(values)
    }
}
