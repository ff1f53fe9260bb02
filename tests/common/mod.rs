//! Scripted estimators shared by the integration tests.
#![allow(dead_code)]

use model_atc::prelude::*;
use model_atc::checkpoint::{load_json, save_json};
use model_atc::Result;

use std::cell::RefCell;
use std::path::Path;
use std::rc::Rc;


/// What a native `fit` received.
#[derive(Debug, Clone, Default)]
pub struct FitRecord {
    pub n_rows: usize,
    pub n_cols: usize,
    pub sparse: bool,
    pub validation: Option<(String, usize, usize)>,
    pub early_stopping: Option<EarlyStopping>,
    pub eval_metric: Option<EvalMetric>,
    pub categorical: Option<Vec<usize>>,
    pub terminate_on_nan: bool,
    pub checkpoint: bool,
    pub verbose: bool,
}


impl FitRecord {
    fn new(x: &Matrix, options: &FitOptions<'_>) -> Self {
        let (n_rows, n_cols) = x.shape();
        Self {
            n_rows,
            n_cols,
            sparse: x.is_sparse(),
            validation: options.validation.map(|v| {
                let (r, c) = v.x.shape();
                (v.name.to_string(), r, c)
            }),
            early_stopping: options.early_stopping,
            eval_metric: options.eval_metric,
            categorical: options.categorical_features.map(|c| c.to_vec()),
            terminate_on_nan: options.terminate_on_nan,
            checkpoint: options.checkpoint.is_some(),
            verbose: options.verbose,
        }
    }
}


/// Calls seen by the estimators of one test.
#[derive(Debug, Default)]
pub struct Journal {
    pub fits: Vec<FitRecord>,
    /// `(n_rows, n_cols, sparse, options)` of each `predict`.
    pub predicts: Vec<(usize, usize, bool, PredictOptions)>,
    pub losses: Vec<String>,
    pub warm_starts: Vec<bool>,
    /// `(n_cols, task, feature_learning)` of each network build.
    pub networks: Vec<(usize, TaskKind, bool)>,
}


pub type SharedJournal = Rc<RefCell<Journal>>;


pub fn journal() -> SharedJournal {
    Rc::new(RefCell::new(Journal::default()))
}


/// Predicts the mean of the training targets plus `offset`.
#[derive(Debug, Clone)]
pub struct MeanModel {
    pub name: String,
    pub mean: f64,
    pub offset: f64,
    pub n_estimators: Option<usize>,
    pub best_iteration: Option<usize>,
    pub journal: SharedJournal,
}


impl MeanModel {
    pub fn new<S: ToString>(name: S, journal: &SharedJournal) -> Self {
        Self {
            name: name.to_string(),
            mean: 0.0,
            offset: 0.0,
            n_estimators: None,
            best_iteration: None,
            journal: Rc::clone(journal),
        }
    }


    pub fn fixed<S: ToString>(name: S, mean: f64, journal: &SharedJournal) -> Self {
        Self { mean, ..Self::new(name, journal) }
    }


    pub fn boxed(self) -> Box<dyn Estimator> {
        Box::new(self)
    }
}


impl Estimator for MeanModel {
    fn name(&self) -> &str {
        &self.name
    }


    fn fit(&mut self, x: &Matrix, y: &[f64], options: &FitOptions<'_>)
        -> Result<FitStatus>
    {
        self.journal.borrow_mut().fits.push(FitRecord::new(x, options));
        self.mean = y.iter().sum::<f64>() / y.len() as f64;
        Ok(FitStatus::Completed)
    }


    fn predict(&self, x: &Matrix, options: &PredictOptions)
        -> Result<NativeOutput>
    {
        let (n_rows, n_cols) = x.shape();
        self.journal.borrow_mut()
            .predicts
            .push((n_rows, n_cols, x.is_sparse(), *options));
        Ok(vec![self.mean + self.offset; n_rows].into())
    }


    fn score(&self, _x: &Matrix, y: &[f64]) -> Result<f64> {
        let mae = y.iter()
            .map(|t| (t - self.mean).abs())
            .sum::<f64>()
            / y.len() as f64;
        Ok(-mae)
    }


    fn clone_box(&self) -> Box<dyn Estimator> {
        Box::new(self.clone())
    }


    fn n_estimators(&self) -> Option<usize> {
        self.n_estimators
    }


    fn best_iteration(&self) -> Option<usize> {
        self.best_iteration
    }


    fn set_loss_function(&mut self, loss: &str) -> Result<()> {
        self.journal.borrow_mut().losses.push(loss.to_string());
        Ok(())
    }
}


/// How [`ThresholdClassifier`] reports probabilities.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProbaMode {
    /// `[1 - p, p]`.
    TwoColumns,
    /// `[p]`.
    SingleColumn,
    /// No probability method.
    Absent,
}


/// Predicts `positive` when the first feature exceeds `0.5`.
/// The probability of the positive class is the first feature
/// clamped to `[0, 1]`.
#[derive(Debug, Clone)]
pub struct ThresholdClassifier {
    pub mode: ProbaMode,
    pub positive: f64,
}


impl ThresholdClassifier {
    pub fn boxed(mode: ProbaMode) -> Box<dyn Estimator> {
        Box::new(Self { mode, positive: 1.0 })
    }


    fn first_feature(x: &Matrix) -> Result<Vec<f64>> {
        let dense = x.to_dense()?;
        Ok(dense.rows().map(|row| row[0]).collect())
    }
}


impl Estimator for ThresholdClassifier {
    fn name(&self) -> &str {
        "RandomForestClassifier"
    }


    fn fit(&mut self, _x: &Matrix, _y: &[f64], _options: &FitOptions<'_>)
        -> Result<FitStatus>
    {
        Ok(FitStatus::Completed)
    }


    fn predict(&self, x: &Matrix, _options: &PredictOptions)
        -> Result<NativeOutput>
    {
        let predictions = Self::first_feature(x)?
            .into_iter()
            .map(|v| if v > 0.5 { self.positive } else { 0.0 })
            .collect::<Vec<_>>();
        Ok(predictions.into())
    }


    fn predict_proba(&self, x: &Matrix, _options: &PredictOptions)
        -> Result<Option<Vec<Vec<f64>>>>
    {
        let probas = Self::first_feature(x)?
            .into_iter()
            .map(|v| v.clamp(0.0, 1.0));
        let rows = match self.mode {
            ProbaMode::TwoColumns => probas.map(|p| vec![1.0 - p, p]).collect(),
            ProbaMode::SingleColumn => probas.map(|p| vec![p]).collect(),
            ProbaMode::Absent => return Ok(None),
        };
        Ok(Some(rows))
    }


    fn score(&self, x: &Matrix, y: &[f64]) -> Result<f64> {
        let predictions = Self::first_feature(x)?;
        let correct = predictions.iter()
            .zip(y)
            .filter(|(v, t)| (**v > 0.5) == (**t > 0.5))
            .count();
        Ok(correct as f64 / y.len() as f64)
    }


    fn clone_box(&self) -> Box<dyn Estimator> {
        Box::new(self.clone())
    }
}


/// A gradient boosting model whose held-out score is
/// `score_fn(n_estimators)`.
#[derive(Clone)]
pub struct ScriptedBoosting {
    pub n_estimators: usize,
    pub score_fn: Rc<dyn Fn(usize) -> f64>,
    /// Cancel the fit once this many fits have run.
    pub cancel_after: Option<usize>,
    pub journal: SharedJournal,
}


impl ScriptedBoosting {
    pub fn boxed<F>(score_fn: F, journal: &SharedJournal) -> Box<dyn Estimator>
        where F: Fn(usize) -> f64 + 'static
    {
        Box::new(Self {
            n_estimators: 100,
            score_fn: Rc::new(score_fn),
            cancel_after: None,
            journal: Rc::clone(journal),
        })
    }


    pub fn cancelling<F>(score_fn: F, after: usize, journal: &SharedJournal)
        -> Box<dyn Estimator>
        where F: Fn(usize) -> f64 + 'static
    {
        Box::new(Self {
            n_estimators: 100,
            score_fn: Rc::new(score_fn),
            cancel_after: Some(after),
            journal: Rc::clone(journal),
        })
    }
}


impl Estimator for ScriptedBoosting {
    fn name(&self) -> &str {
        "GradientBoostingRegressor"
    }


    fn fit(&mut self, x: &Matrix, _y: &[f64], options: &FitOptions<'_>)
        -> Result<FitStatus>
    {
        let n_fits = {
            let mut journal = self.journal.borrow_mut();
            journal.fits.push(FitRecord::new(x, options));
            journal.fits.len()
        };
        if self.cancel_after == Some(n_fits) {
            if let Some(token) = options.cancel {
                token.cancel();
            }
        }
        Ok(FitStatus::Completed)
    }


    fn predict(&self, x: &Matrix, _options: &PredictOptions)
        -> Result<NativeOutput>
    {
        Ok(vec![self.n_estimators as f64; x.n_rows()].into())
    }


    fn score(&self, _x: &Matrix, _y: &[f64]) -> Result<f64> {
        Ok((self.score_fn)(self.n_estimators))
    }


    fn clone_box(&self) -> Box<dyn Estimator> {
        Box::new(self.clone())
    }


    fn n_estimators(&self) -> Option<usize> {
        Some(self.n_estimators)
    }


    fn set_n_estimators(&mut self, n_estimators: usize, warm_start: bool)
        -> Result<()>
    {
        self.n_estimators = n_estimators;
        self.journal.borrow_mut().warm_starts.push(warm_start);
        Ok(())
    }
}


/// A deep-learning placeholder that knows only its hyperparameters.
#[derive(Debug, Clone)]
pub struct NetworkPlaceholder {
    pub epochs: usize,
    pub best_epoch: usize,
    pub interrupt_at: Option<usize>,
    pub journal: SharedJournal,
}


impl NetworkPlaceholder {
    pub fn boxed(epochs: usize, best_epoch: usize, journal: &SharedJournal)
        -> Box<dyn Estimator>
    {
        Box::new(Self {
            epochs,
            best_epoch,
            interrupt_at: None,
            journal: Rc::clone(journal),
        })
    }
}


impl Estimator for NetworkPlaceholder {
    fn name(&self) -> &str {
        "DeepLearningRegressor"
    }


    fn fit(&mut self, _x: &Matrix, _y: &[f64], _options: &FitOptions<'_>)
        -> Result<FitStatus>
    {
        Err(model_atc::AtcError::Estimator("the network was not built".into()))
    }


    fn predict(&self, _x: &Matrix, _options: &PredictOptions)
        -> Result<NativeOutput>
    {
        Err(model_atc::AtcError::Estimator("the network was not built".into()))
    }


    fn score(&self, _x: &Matrix, _y: &[f64]) -> Result<f64> {
        Err(model_atc::AtcError::Estimator("the network was not built".into()))
    }


    fn clone_box(&self) -> Box<dyn Estimator> {
        Box::new(self.clone())
    }


    fn build_network(&self, n_cols: usize, task: TaskKind, feature_learning: bool)
        -> Result<Option<Box<dyn Estimator>>>
    {
        self.journal.borrow_mut()
            .networks
            .push((n_cols, task, feature_learning));
        Ok(Some(Box::new(Network {
            n_cols,
            epochs: self.epochs,
            best_epoch: self.best_epoch,
            interrupt_at: self.interrupt_at,
            epoch: 0,
            restored: false,
            journal: Rc::clone(&self.journal),
        })))
    }
}


/// The network built by [`NetworkPlaceholder`].
/// Its state is the last epoch it trained;
/// the checkpoint holds `best_epoch`.
#[derive(Debug, Clone)]
pub struct Network {
    pub n_cols: usize,
    pub epochs: usize,
    pub best_epoch: usize,
    pub interrupt_at: Option<usize>,
    pub epoch: usize,
    pub restored: bool,
    pub journal: SharedJournal,
}


impl Estimator for Network {
    fn name(&self) -> &str {
        "DeepLearningNetwork"
    }


    fn fit(&mut self, x: &Matrix, _y: &[f64], options: &FitOptions<'_>)
        -> Result<FitStatus>
    {
        self.journal.borrow_mut().fits.push(FitRecord::new(x, options));
        for epoch in 1..=self.epochs {
            self.epoch = epoch;
            if epoch == self.best_epoch {
                if let Some(path) = options.checkpoint {
                    save_json(path, &epoch)?;
                }
            }
            if self.interrupt_at == Some(epoch) {
                if let Some(token) = options.cancel {
                    token.cancel();
                }
            }
            if options.is_cancelled() {
                return Ok(FitStatus::Interrupted);
            }
        }
        Ok(FitStatus::Completed)
    }


    fn predict(&self, x: &Matrix, _options: &PredictOptions)
        -> Result<NativeOutput>
    {
        Ok(vec![self.epoch as f64; x.n_rows()].into())
    }


    fn score(&self, _x: &Matrix, _y: &[f64]) -> Result<f64> {
        Ok(self.epoch as f64)
    }


    fn clone_box(&self) -> Box<dyn Estimator> {
        Box::new(self.clone())
    }


    fn restore_checkpoint(&mut self, path: &Path) -> Result<()> {
        self.epoch = load_json(path)?;
        self.restored = true;
        Ok(())
    }
}


/// Positive-class probability is the last column divided by `10`.
#[derive(Debug, Clone)]
pub struct LastColumnUncertainty {
    pub journal: SharedJournal,
}


impl Estimator for LastColumnUncertainty {
    fn name(&self) -> &str {
        "RandomForestClassifier"
    }


    fn fit(&mut self, _x: &Matrix, _y: &[f64], _options: &FitOptions<'_>)
        -> Result<FitStatus>
    {
        Ok(FitStatus::Completed)
    }


    fn predict(&self, x: &Matrix, _options: &PredictOptions)
        -> Result<NativeOutput>
    {
        Ok(vec![0.0; x.n_rows()].into())
    }


    fn predict_proba(&self, x: &Matrix, options: &PredictOptions)
        -> Result<Option<Vec<Vec<f64>>>>
    {
        let (n_rows, n_cols) = x.shape();
        self.journal.borrow_mut()
            .predicts
            .push((n_rows, n_cols, x.is_sparse(), *options));
        let dense = x.to_dense()?;
        let rows = dense.rows()
            .map(|row| {
                let p = (row[n_cols - 1] / 10.0).clamp(0.0, 1.0);
                vec![1.0 - p, p]
            })
            .collect();
        Ok(Some(rows))
    }


    fn score(&self, _x: &Matrix, _y: &[f64]) -> Result<f64> {
        Ok(0.75)
    }


    fn clone_box(&self) -> Box<dyn Estimator> {
        Box::new(self.clone())
    }
}


/// A `n_rows x n_cols` dense matrix whose entry `(i, j)` is `i + j / 10`.
pub fn dense(n_rows: usize, n_cols: usize) -> Matrix {
    let rows = (0..n_rows)
        .map(|i| (0..n_cols).map(|j| i as f64 + j as f64 / 10.0).collect())
        .collect::<Vec<Vec<f64>>>();
    Matrix::Dense(DenseMatrix::from_rows(rows).unwrap())
}


/// A sparse identity-like matrix with `n_rows` rows and `n_cols` columns.
pub fn sparse(n_rows: usize, n_cols: usize) -> Matrix {
    let triplets = (0..n_rows).map(|i| (i, i % n_cols, 1.0));
    Matrix::Sparse(SparseMatrix::from_triplets(n_rows, n_cols, triplets).unwrap())
}


pub fn targets(n: usize) -> Vec<f64> {
    (0..n).map(|i| i as f64).collect()
}
