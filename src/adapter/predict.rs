use tracing::debug;

use crate::{
    Matrix,
    Family,
    Value,
    SparseMatrix,
    error::{AtcError, Result},
    estimator::{NativeOutput, PredictOptions},
    prediction::{Prediction, Probabilities},
};
use super::model_adapter::ModelAdapter;


impl ModelAdapter {
    /// Predict `x`.
    ///
    /// A single input row yields [`Prediction::Scalar`].
    /// Native outputs that wrap every prediction in a one-element row
    /// are flattened.
    pub fn predict(&self, x: &Matrix) -> Result<Prediction> {
        let family = self.family();
        let shaped = family.shape_input(x)?;

        let options = match family {
            // `0` asks LightGBM for every iteration.
            Family::LightGBM => PredictOptions {
                num_iteration: Some(self.estimator.best_iteration().unwrap_or(0)),
            },
            _ => PredictOptions::default(),
        };

        let output = self.estimator.predict(&shaped, &options)?;
        drop(shaped);

        let n_rows = x.n_rows();
        if output.len() != n_rows {
            return Err(AtcError::Shape {
                expected: format!("{n_rows} predictions"),
                actual: format!("{} predictions", output.len()),
            });
        }

        let prediction = match flatten(output) {
            NativeOutput::Flat(mut values) if n_rows == 1 => {
                Prediction::Scalar(values.remove(0))
            },
            NativeOutput::Flat(values) => Prediction::Vector(values),
            NativeOutput::Nested(rows) => Prediction::Matrix(rows),
        };
        Ok(prediction)
    }


    /// Class probabilities of `x`.
    ///
    /// Estimators without a probability method fall back to
    /// their point predictions, which must be `0` or `1`.
    /// A single probability column `p` is expanded to `[1 - p, p]`.
    /// A single input row yields [`Probabilities::Single`].
    pub fn predict_proba(&self, x: &Matrix) -> Result<Probabilities> {
        let family = self.family();
        let shaped = family.shape_input(x)?;

        let options = match family {
            Family::LightGBM => PredictOptions {
                num_iteration: self.estimator.best_iteration(),
            },
            _ => PredictOptions::default(),
        };

        let rows = match self.estimator.predict_proba(&shaped, &options)? {
            Some(rows) => rows,
            None => {
                debug!(
                    estimator = self.estimator.name(),
                    "no native probabilities, falling back to `predict`"
                );
                let output = self.estimator.predict(&shaped, &options)?;
                probabilities_from_predictions(output)?
            },
        };
        drop(shaped);

        let n_rows = x.n_rows();
        if rows.len() != n_rows {
            return Err(AtcError::Shape {
                expected: format!("{n_rows} probability rows"),
                actual: format!("{} probability rows", rows.len()),
            });
        }

        let mut rows = expand_single_column(rows);
        if n_rows == 1 {
            return Ok(Probabilities::Single(rows.remove(0)));
        }
        Ok(Probabilities::Many(rows))
    }


    /// Score the adapter on `(x, y)`. Higher is better.
    ///
    /// A custom scorer receives the adapter itself.
    /// Otherwise the native score is returned.
    pub fn score(&self, x: &Matrix, y: &[f64]) -> Result<f64> {
        let shaped = self.family().shape_score_input(x)?;
        match &self.scorer {
            Some(scorer) => scorer.score(self, &shaped, y),
            None => self.estimator.score(&shaped, y),
        }
    }


    /// Append the predictions of `x` to `x` as one more column.
    /// The result is sparse.
    pub fn transform(&self, x: &Matrix) -> Result<SparseMatrix> {
        let predicted = self.predict(x)?.to_f64_vec()?;
        x.to_sparse()?.append_column(&predicted[..])
    }


    /// Returns `x` unchanged.
    pub fn transform_only(x: Matrix) -> Matrix {
        x
    }
}


/// Flatten the rows of a nested output when each holds one value.
fn flatten(output: NativeOutput) -> NativeOutput {
    match output {
        NativeOutput::Nested(rows) if rows.iter().all(|row| row.len() == 1) => {
            let values = rows.into_iter()
                .flatten()
                .collect::<Vec<_>>();
            NativeOutput::Flat(values)
        },
        other => other,
    }
}


fn probabilities_from_predictions(output: NativeOutput) -> Result<Vec<Vec<f64>>> {
    match output {
        NativeOutput::Flat(values) => values.iter()
            .map(|value| match value.as_f64() {
                Some(p) if p == 1.0 => Ok(vec![0.0, 1.0]),
                Some(p) if p == 0.0 => Ok(vec![1.0, 0.0]),
                _ => Err(AtcError::unsupported(format!(
                    "Cannot turn the prediction `{value}` into probabilities. \
                     Only `0` and `1` are supported"
                ))),
            })
            .collect(),
        NativeOutput::Nested(rows) => rows.iter()
            .map(|row| row.iter().map(numeric).collect())
            .collect(),
    }
}


fn numeric(value: &Value) -> Result<f64> {
    value.as_f64()
        .ok_or_else(|| AtcError::invalid_input(format!(
            "Expected a probability, got `{value}`"
        )))
}


fn expand_single_column(rows: Vec<Vec<f64>>) -> Vec<Vec<f64>> {
    if rows.is_empty() || rows.iter().any(|row| row.len() != 1) {
        return rows;
    }
    rows.into_iter()
        .map(|row| vec![1.0 - row[0], row[0]])
        .collect()
}
