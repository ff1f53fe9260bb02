use polars::prelude::*;
use tracing::{debug, error};

use crate::{
    Matrix,
    error::{AtcError, Result},
    estimator::PredictOptions,
    prediction::values_to_series,
};
use super::model_adapter::ModelAdapter;


const BASE_PREDICTION_NAME: &str = "base_prediction";
const UNCERTAINTY_NAME: &str = "uncertainty_prediction";


impl ModelAdapter {
    /// Predict how uncertain the predictions of `x` are.
    ///
    /// The base prediction is appended to `x` as one more column,
    /// and the uncertainty model's positive-class probability
    /// of that input is returned.
    /// The frame holds `base_prediction`, `uncertainty_prediction`,
    /// and one column per calibration field
    /// if a calibration table was set.
    pub fn predict_uncertainty(&self, x: &Matrix) -> Result<DataFrame> {
        let Some(model) = self.uncertainty_model.as_ref() else {
            error!("this model was not trained to predict uncertainties");
            return Err(AtcError::config(
                "This model was not trained to predict uncertainties"
            ));
        };

        let base = self.predict(x)?.into_values()?;
        let numbers = base.iter()
            .map(|v| v.as_f64().ok_or_else(|| AtcError::invalid_input(format!(
                "The base prediction `{v}` cannot be used as a feature"
            ))))
            .collect::<Result<Vec<_>>>()?;

        let combined = Matrix::Sparse(x.to_sparse()?.append_column(&numbers[..])?);
        let probas = model.predict_proba(&combined, &PredictOptions::default())?
            .ok_or_else(|| AtcError::unsupported(format!(
                "The uncertainty model `{}` has no probability method",
                model.name()
            )))?;

        let uncertainty = probas.iter()
            .map(|row| row.get(1).copied().ok_or_else(|| AtcError::Shape {
                expected: "2 class probabilities".to_string(),
                actual: format!("{} class probabilities", row.len()),
            }))
            .collect::<Result<Vec<_>>>()?;

        let mut columns = vec![
            values_to_series(BASE_PREDICTION_NAME, &base[..]),
            Series::new(UNCERTAINTY_NAME, &uncertainty[..]),
        ];

        if let Some(table) = self.calibration.as_ref() {
            let buckets = uncertainty.iter()
                .map(|&p| table.lookup(p))
                .collect::<Vec<_>>();
            for field in table.field_names() {
                let values = buckets.iter()
                    .map(|bucket| bucket.fields.get(field).copied().unwrap_or(f64::NAN))
                    .collect::<Vec<_>>();
                columns.push(Series::new(field, values));
            }
            debug!(n_fields = table.field_names().len(), "attached calibration fields");
        }

        Ok(DataFrame::new(columns)?)
    }


    /// Native score of the uncertainty model on `(x, y)`.
    pub fn score_uncertainty(&self, x: &Matrix, y: &[f64]) -> Result<f64> {
        match self.uncertainty_model.as_ref() {
            Some(model) => model.score(x, y),
            None => Err(AtcError::config(
                "This model was not trained to predict uncertainties"
            )),
        }
    }
}
