//! Consistency checks between training and prediction features.

use colored::Colorize;
use tracing::{debug, warn};

use crate::{
    error::Result,
    metadata::{ColumnRole, FeatureSource},
};
use super::model_adapter::ModelAdapter;

use std::collections::BTreeSet;
use std::fmt;


const DATE_MARKER: &str = "day_part";
const NLP_MARKER: &str = "nlp_";
const SEPARATOR: char = '=';


/// Result of [`ModelAdapter::verify_features`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FeatureReport {
    /// Features the model was trained on
    /// that the prediction data lacks.
    pub training_not_prediction: BTreeSet<String>,
    /// Features of the prediction data
    /// that were not part of the training data.
    pub prediction_not_training: BTreeSet<String>,
    /// Prediction-only features whose role is `ignore`.
    pub ignored: BTreeSet<String>,
}


impl FeatureReport {
    /// Returns `true` if both feature sets agree.
    pub fn is_consistent(&self) -> bool {
        self.training_not_prediction.is_empty()
            && self.prediction_not_training.is_empty()
    }
}


impl fmt::Display for FeatureReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.training_not_prediction.is_empty() {
            writeln!(
                f,
                "{}",
                "All of the features this model was trained on \
                 are included in the prediction data".green()
            )?;
        } else {
            writeln!(
                f,
                "{}\n{:?}",
                "Features this model was trained on \
                 that are not present in the prediction data:".bold().red(),
                self.training_not_prediction,
            )?;
        }

        if self.prediction_not_training.is_empty() && self.ignored.is_empty() {
            writeln!(
                f,
                "{}",
                "All of the features in the prediction data \
                 were in this model's training data".green()
            )?;
        } else {
            writeln!(
                f,
                "{}\n{:?}",
                "Features available in the prediction data \
                 that were not part of the training data:".bold().yellow(),
                self.prediction_not_training,
            )?;
            if !self.ignored.is_empty() {
                writeln!(
                    f,
                    "{}\n{:?}",
                    "Features in the prediction data \
                     that were ignored at training time:".bold(),
                    self.ignored,
                )?;
            }
        }
        Ok(())
    }
}


/// Strip the `=value` suffix of one-hot encoded names.
pub(crate) fn remove_categorical_values<I, S>(features: I) -> BTreeSet<String>
    where I: IntoIterator<Item = S>,
          S: AsRef<str>,
{
    features.into_iter()
        .map(|feature| {
            let feature = feature.as_ref();
            match feature.find(SEPARATOR) {
                Some(idx) => feature[..idx].to_string(),
                None => feature.to_string(),
            }
        })
        .collect()
}


/// The raw date column of a `<raw>_day_part` key.
/// The character right before the marker is dropped.
fn raw_date_name(key: &str) -> Option<&str> {
    let idx = key.find(DATE_MARKER)?;
    let prefix = &key[..idx];
    let (last, _) = prefix.char_indices().last()?;
    Some(&prefix[..last]).filter(|name| !name.is_empty())
}


impl ModelAdapter {
    /// Compare the training features with those of `data`.
    ///
    /// Categorical columns of `data` are expanded to the
    /// `name=value` features they were one-hot encoded into,
    /// and date parts are collapsed back to their raw date column.
    /// With `raw_features_only`, the `=value` suffixes are stripped
    /// from the reported names.
    ///
    /// Returns `Ok(None)` if no column roles were supplied.
    pub fn verify_features<S>(&self, data: &S, raw_features_only: bool)
        -> Result<Option<FeatureReport>>
        where S: FeatureSource + ?Sized
    {
        let Some(roles) = self.column_roles.as_ref() else {
            warn!(
                "feature verification needs column roles, \
                 pass them to the builder to enable it"
            );
            return Ok(None);
        };

        let mut prediction_features = data.column_names();
        let mut categorical_names = BTreeSet::new();
        let mut date_names = BTreeSet::new();

        for (key, role) in roles.iter() {
            if key.contains(DATE_MARKER) {
                if let Some(raw) = raw_date_name(key) {
                    date_names.insert(raw.to_string());
                }
                continue;
            }

            match role {
                ColumnRole::Categorical => match data.distinct_values(key)? {
                    Some(values) => {
                        for value in values {
                            prediction_features.insert(format!("{key}{SEPARATOR}{value}"));
                        }
                        categorical_names.insert(key.clone());
                    },
                    None => {
                        warn!(
                            column = key.as_str(),
                            "a categorical column is not present in the prediction data"
                        );
                    },
                },
                ColumnRole::Output => {
                    prediction_features.remove(key);
                },
                _ => {},
            }
        }

        let prediction_features = prediction_features
            .difference(&categorical_names)
            .cloned()
            .collect::<BTreeSet<_>>();

        let mut training_features = self.feature_names.iter()
            .filter(|feature| !date_names.iter().any(|raw| feature.contains(raw.as_str())))
            .cloned()
            .collect::<BTreeSet<_>>();
        training_features.extend(date_names.iter().cloned());

        let nlp_features = training_features.iter()
            .filter(|feature| feature.contains(NLP_MARKER))
            .cloned()
            .collect::<Vec<_>>();
        if let Some(example) = nlp_features.first() {
            warn!(
                example = example.as_str(),
                "found text features in the training data, \
                 their values are not verified"
            );
            for feature in nlp_features.iter() {
                training_features.remove(feature);
            }
        }

        let mut training_not_prediction = training_features
            .difference(&prediction_features)
            .cloned()
            .collect::<BTreeSet<_>>();
        let mut prediction_not_training = prediction_features
            .difference(&training_features)
            .cloned()
            .collect::<BTreeSet<_>>();

        if raw_features_only {
            training_not_prediction = remove_categorical_values(&training_not_prediction);
            prediction_not_training = remove_categorical_values(&prediction_not_training);
        }

        let ignored = prediction_not_training.iter()
            .filter(|feature| roles.get(feature.as_str()) == Some(&ColumnRole::Ignore))
            .cloned()
            .collect::<BTreeSet<_>>();
        prediction_not_training.retain(|feature| !ignored.contains(feature));

        let report = FeatureReport {
            training_not_prediction,
            prediction_not_training,
            ignored,
        };
        debug!(
            n_training_not_prediction = report.training_not_prediction.len(),
            n_prediction_not_training = report.prediction_not_training.len(),
            "verified features"
        );
        if self.config.verbose() {
            println!("{report}");
        }
        Ok(Some(report))
    }


    /// Positions of the categorical columns in the training features.
    /// `None` unless categorical features are kept.
    pub(crate) fn categorical_feature_indices(&self) -> Option<Vec<usize>> {
        if !self.config.keep_cat_features { return None; }
        let roles = self.column_roles.as_ref()?;

        let indices = roles.iter()
            .filter(|(_, role)| **role == ColumnRole::Categorical)
            .filter_map(|(name, _)| {
                let position = self.feature_names.iter().position(|f| f == name);
                if position.is_none() {
                    warn!(
                        column = name.as_str(),
                        "a categorical column is not a training feature, skipping it"
                    );
                }
                position
            })
            .collect();
        Some(indices)
    }
}
