use polars::prelude::*;

use crate::error::Result;

use std::collections::{BTreeMap, BTreeSet, HashMap};


/// Prediction-time data that feature verification can inspect.
pub trait FeatureSource {
    /// Names of the columns present.
    fn column_names(&self) -> BTreeSet<String>;


    /// Distinct values of `column` rendered as strings.
    /// Returns `Ok(None)` if the column is absent.
    fn distinct_values(&self, column: &str) -> Result<Option<BTreeSet<String>>>;
}


impl FeatureSource for DataFrame {
    fn column_names(&self) -> BTreeSet<String> {
        self.get_column_names()
            .into_iter()
            .map(|name| name.to_string())
            .collect()
    }


    fn distinct_values(&self, column: &str) -> Result<Option<BTreeSet<String>>> {
        let Ok(series) = self.column(column) else {
            return Ok(None);
        };
        let series = series.cast(&DataType::Utf8)?;
        let values = series.utf8()?
            .into_iter()
            .map(|v| v.unwrap_or("null").to_string())
            .collect();
        Ok(Some(values))
    }
}


impl FeatureSource for HashMap<String, String> {
    fn column_names(&self) -> BTreeSet<String> {
        self.keys().cloned().collect()
    }


    fn distinct_values(&self, column: &str) -> Result<Option<BTreeSet<String>>> {
        Ok(self.get(column).map(|v| BTreeSet::from([v.clone()])))
    }
}


impl FeatureSource for BTreeMap<String, String> {
    fn column_names(&self) -> BTreeSet<String> {
        self.keys().cloned().collect()
    }


    fn distinct_values(&self, column: &str) -> Result<Option<BTreeSet<String>>> {
        Ok(self.get(column).map(|v| BTreeSet::from([v.clone()])))
    }
}
