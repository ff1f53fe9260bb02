use serde::{Serialize, Deserialize};

use crate::error::{AtcError, Result};

use std::collections::BTreeMap;


/// One bucket of the calibration table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CalibrationBucket {
    /// Upper threshold of the predicted uncertainty probability.
    pub max_proba: f64,
    /// Calibration values attached to predictions in this bucket.
    #[serde(flatten)]
    pub fields: BTreeMap<String, f64>,
}


/// Buckets ordered by ascending `max_proba`.
///
/// A probability falls into the first bucket whose threshold
/// it does not exceed.
/// Probabilities above the last threshold saturate to the last bucket.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "Vec<CalibrationBucket>", into = "Vec<CalibrationBucket>")]
pub struct CalibrationTable {
    buckets: Vec<CalibrationBucket>,
}


impl CalibrationTable {
    /// Construct a table. The buckets are sorted by `max_proba`.
    /// Fails if there is no bucket, or if the buckets do not
    /// share the same field names.
    pub fn new(mut buckets: Vec<CalibrationBucket>) -> Result<Self> {
        let Some(first) = buckets.first() else {
            return Err(AtcError::config("The calibration table is empty"));
        };
        let keys = first.fields.keys().collect::<Vec<_>>();
        let consistent = buckets.iter()
            .all(|b| b.fields.keys().eq(keys.iter().copied()));
        if !consistent {
            return Err(AtcError::config(
                "Every calibration bucket must carry the same fields"
            ));
        }
        if buckets.iter().any(|b| b.max_proba.is_nan()) {
            return Err(AtcError::config("`max_proba` must not be NaN"));
        }

        buckets.sort_by(|a, b| a.max_proba.total_cmp(&b.max_proba));
        Ok(Self { buckets })
    }


    /// Parse a table from a JSON array of buckets.
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }


    /// Returns the buckets in ascending order.
    pub fn buckets(&self) -> &[CalibrationBucket] {
        &self.buckets[..]
    }


    /// Names of the calibration fields, `max_proba` excluded.
    pub fn field_names(&self) -> Vec<&str> {
        self.buckets[0].fields.keys().map(|k| k.as_str()).collect()
    }


    /// Returns the bucket `proba` falls into.
    pub fn lookup(&self, proba: f64) -> &CalibrationBucket {
        self.buckets.iter()
            .find(|bucket| proba <= bucket.max_proba)
            .unwrap_or_else(|| &self.buckets[self.buckets.len() - 1])
    }
}


impl TryFrom<Vec<CalibrationBucket>> for CalibrationTable {
    type Error = AtcError;

    fn try_from(buckets: Vec<CalibrationBucket>) -> Result<Self> {
        Self::new(buckets)
    }
}


impl From<CalibrationTable> for Vec<CalibrationBucket> {
    fn from(table: CalibrationTable) -> Self {
        table.buckets
    }
}


#[cfg(test)]
mod tests {
    use super::*;

    fn table() -> CalibrationTable {
        CalibrationTable::from_json(r#"[
            {"max_proba": 0.8, "avg_error": 3.0},
            {"max_proba": 0.2, "avg_error": 1.0},
            {"max_proba": 0.5, "avg_error": 2.0}
        ]"#).unwrap()
    }

    #[test]
    fn lookup_takes_first_bucket_not_exceeded() {
        let table = table();
        assert_eq!(table.lookup(0.0).fields["avg_error"], 1.0);
        assert_eq!(table.lookup(0.2).fields["avg_error"], 1.0);
        assert_eq!(table.lookup(0.21).fields["avg_error"], 2.0);
        assert_eq!(table.lookup(0.79).fields["avg_error"], 3.0);
    }

    #[test]
    fn lookup_saturates_above_last_threshold() {
        assert_eq!(table().lookup(0.95).fields["avg_error"], 3.0);
    }

    #[test]
    fn rejects_inconsistent_fields() {
        let buckets = vec![
            CalibrationBucket {
                max_proba: 0.5,
                fields: BTreeMap::from([("a".to_string(), 1.0)]),
            },
            CalibrationBucket {
                max_proba: 1.0,
                fields: BTreeMap::from([("b".to_string(), 1.0)]),
            },
        ];
        assert!(CalibrationTable::new(buckets).is_err());
    }
}
