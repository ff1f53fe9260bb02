//! Custom scorers.
//!
//! A scorer receives the adapter itself as the estimator,
//! so scoring goes through the adapter's own prediction logic.

use crate::{
    Matrix,
    ModelAdapter,
    error::Result,
};


/// A trait that scores a fitted adapter on `(x, y)`.
/// Higher is better.
pub trait Scorer {
    /// Score `model` on `(x, y)`.
    fn score(&self, model: &ModelAdapter, x: &Matrix, y: &[f64]) -> Result<f64>;
}


impl<F> Scorer for F
    where F: Fn(&ModelAdapter, &Matrix, &[f64]) -> Result<f64>
{
    fn score(&self, model: &ModelAdapter, x: &Matrix, y: &[f64]) -> Result<f64> {
        self(model, x, y)
    }
}


/// Negated root mean squared error of `model.predict(x)`.
#[derive(Debug, Clone, Copy, Default)]
pub struct NegRmse;


impl Scorer for NegRmse {
    fn score(&self, model: &ModelAdapter, x: &Matrix, y: &[f64]) -> Result<f64> {
        let predictions = model.predict(x)?.to_f64_vec()?;
        let n_sample = y.len() as f64;
        let mse = predictions.iter()
            .zip(y)
            .map(|(p, t)| (p - t).powi(2))
            .sum::<f64>()
            / n_sample;
        Ok(-mse.sqrt())
    }
}


/// Negated binary log-loss of `model.predict_proba(x)`.
#[derive(Debug, Clone, Copy, Default)]
pub struct NegLogLoss;


const EPS: f64 = 1e-15;


impl Scorer for NegLogLoss {
    fn score(&self, model: &ModelAdapter, x: &Matrix, y: &[f64]) -> Result<f64> {
        let probas = model.predict_proba(x)?.into_rows();
        let n_sample = y.len() as f64;
        let loss = probas.iter()
            .zip(y)
            .map(|(row, &t)| {
                let k = t as usize;
                let p = row.get(k).copied().unwrap_or(0.0).clamp(EPS, 1.0 - EPS);
                -p.ln()
            })
            .sum::<f64>()
            / n_sample;
        Ok(-loss)
    }
}
