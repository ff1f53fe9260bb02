use serde::{Serialize, Deserialize};

use std::collections::BTreeMap;
use std::fmt;


/// Mapping from column name to its role.
pub type ColumnRoles = BTreeMap<String, ColumnRole>;


/// The role a column plays in the training data.
/// Unknown spellings are kept as `Other`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum ColumnRole {
    /// One-hot encoded as `name=value`.
    Categorical,
    /// The target column.
    Output,
    /// Present in the data but not used.
    Ignore,
    /// A date column, expanded into `<name>_day_part` and friends.
    Date,
    /// A free-text column.
    Nlp,
    /// Anything else.
    Other(String),
}


impl ColumnRole {
    /// The name used in column descriptions.
    pub fn as_str(&self) -> &str {
        match self {
            Self::Categorical => "categorical",
            Self::Output => "output",
            Self::Ignore => "ignore",
            Self::Date => "date",
            Self::Nlp => "nlp",
            Self::Other(s) => s,
        }
    }
}


impl From<&str> for ColumnRole {
    fn from(s: &str) -> Self {
        match s {
            "categorical" => Self::Categorical,
            "output" => Self::Output,
            "ignore" => Self::Ignore,
            "date" => Self::Date,
            "nlp" => Self::Nlp,
            other => Self::Other(other.to_string()),
        }
    }
}


impl From<String> for ColumnRole {
    fn from(s: String) -> Self {
        Self::from(s.as_str())
    }
}


impl From<ColumnRole> for String {
    fn from(role: ColumnRole) -> Self {
        role.as_str().to_string()
    }
}


impl fmt::Display for ColumnRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
