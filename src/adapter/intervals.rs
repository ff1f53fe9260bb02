use polars::prelude::*;
use tracing::error;

use crate::{
    Matrix,
    Value,
    error::{AtcError, Result},
    prediction::{values_to_series, Intervals, Prediction, ReturnType},
};
use super::model_adapter::ModelAdapter;


const BASE_PREDICTION_NAME: &str = "prediction";


impl ModelAdapter {
    /// Predict `x` with the adapter and with every interval predictor.
    ///
    /// Without `return_type`, a single row yields [`Intervals::Dict`]
    /// and several rows yield [`Intervals::Frame`].
    /// Fails with a configuration error if no interval predictor was set.
    pub fn predict_intervals(&self, x: &Matrix, return_type: Option<ReturnType>)
        -> Result<Intervals>
    {
        if self.interval_predictors.is_empty() {
            error!("this model was not trained to predict intervals");
            return Err(AtcError::config(
                "This model was not trained to predict intervals"
            ));
        }

        let mut entries = Vec::with_capacity(self.interval_predictors.len() + 1);
        entries.push((BASE_PREDICTION_NAME.to_string(), self.predict(x)?));
        for (name, predictor) in self.interval_predictors.iter() {
            entries.push((name.clone(), predictor.predict(x)?));
        }

        let n_rows = x.n_rows();
        let return_type = return_type.unwrap_or(
            if n_rows == 1 { ReturnType::Dict } else { ReturnType::Frame }
        );

        let intervals = match return_type {
            ReturnType::Dict => Intervals::Dict(entries),
            ReturnType::Frame => Intervals::Frame(into_frame(entries)?),
            ReturnType::List if n_rows == 1 => {
                let values = entries.into_iter()
                    .map(|(_, p)| into_scalar(p))
                    .collect::<Result<Vec<_>>>()?;
                Intervals::List(values)
            },
            ReturnType::List => {
                let columns = entries.into_iter()
                    .map(|(_, p)| p.into_values())
                    .collect::<Result<Vec<_>>>()?;
                let rows = (0..n_rows)
                    .map(|i| columns.iter().map(|c| c[i].clone()).collect())
                    .collect();
                Intervals::Rows(rows)
            },
        };
        Ok(intervals)
    }
}


fn into_scalar(prediction: Prediction) -> Result<Value> {
    match prediction {
        Prediction::Scalar(v) => Ok(v),
        other => {
            let mut values = other.into_values()?;
            if values.len() != 1 {
                return Err(AtcError::Shape {
                    expected: "1 prediction".to_string(),
                    actual: format!("{} predictions", values.len()),
                });
            }
            Ok(values.remove(0))
        },
    }
}


fn into_frame(entries: Vec<(String, Prediction)>) -> Result<DataFrame> {
    let columns = entries.into_iter()
        .map(|(name, prediction)| {
            let values = prediction.into_values()?;
            Ok(values_to_series(&name, &values[..]))
        })
        .collect::<Result<Vec<_>>>()?;
    Ok(DataFrame::new(columns)?)
}
