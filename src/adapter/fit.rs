//! Training strategies.
//!
//! - plain delegation,
//! - native early stopping on a held-out pair (deep learning, LightGBM),
//! - a search over the estimator count (gradient boosting).

use tracing::{debug, info, warn};

use crate::{
    Matrix,
    Family,
    TaskKind,
    checkpoint::CheckpointFile,
    common::{checker, task::n_distinct},
    error::Result,
    estimator::{
        EarlyStopping,
        Estimator,
        EvalMetric,
        FitOptions,
        FitStatus,
        Monitor,
        Validation,
        family::LGBM_SEARCH_N_ESTIMATORS,
    },
    sample::train_test_split,
};
use super::model_adapter::{HeldOut, ModelAdapter};
use super::schedule::{n_estimators_schedule, GB_PATIENCE};
use super::progress;

use std::borrow::Cow;


/// Fraction of the training rows held out when no pair is supplied.
const HOLD_OUT_FRACTION: f64 = 0.15;

/// Early stopping patience of LightGBM, in boosting rounds.
const LGBM_PATIENCE: usize = 100;

/// Early stopping patience of deep learning, in epochs.
const DL_PATIENCE: usize = 25;
const DL_PATIENCE_HP_SEARCH: usize = 5;

/// Starting point of the best held-out score.
const INITIAL_BEST_SCORE: f64 = -10_000_000_000.0;

const USER_HELD_OUT_NAME: &str = "X_test_the_user_passed_in";
const RANDOM_HELD_OUT_NAME: &str = "random_holdout_set_from_training_data";


/// Training rows and the validation pair of one `fit`.
struct FitData<'a> {
    x_train: Cow<'a, Matrix>,
    y_train: Cow<'a, [f64]>,
    x_test: Matrix,
    y_test: Vec<f64>,
    eval_name: &'static str,
}


impl FitData<'_> {
    fn validation(&self) -> Validation<'_> {
        Validation {
            x: &self.x_test,
            y: &self.y_test[..],
            name: self.eval_name,
        }
    }
}


impl ModelAdapter {
    /// Fit the wrapped estimator on `(x, y)`.
    ///
    /// `y` must be non-empty and have one entry per row of `x`.
    /// The family of the estimator decides how `x` is shaped
    /// and which training strategy runs.
    /// A cancelled fit returns `Ok` and keeps the best model seen so far.
    /// Externally supplied held-out data is released before returning.
    pub fn fit(&mut self, x: &Matrix, y: &[f64]) -> Result<&mut Self> {
        checker::check_fit_input(x, y)?;

        let family = self.family();
        info!(
            family = %family,
            estimator = self.estimator.name(),
            n_rows = x.n_rows(),
            n_cols = x.shape().1,
            "fitting"
        );

        let shaped = family.shape_fit_input(x)?;
        let result = match family {
            Family::DeepLearning => self.fit_deep_learning(&shaped, y),
            Family::LightGBM => self.fit_lightgbm(&shaped, y),
            Family::CatBoost => self.fit_catboost(&shaped, y),
            Family::GradientBoosting => self.fit_gradient_boosting(&shaped, y),
            Family::XGBoost
                | Family::SparseLinear
                | Family::LinearClassifier
                | Family::Generic => self.fit_plain(&shaped, y),
        };

        // Shaped copies of the training data can be large.
        drop(shaped);
        self.release_fit_resources();

        result?;
        Ok(self)
    }


    fn release_fit_resources(&mut self) {
        if self.held_out.take().is_some() {
            debug!("released the held-out data");
        }
        self.cancel.reset();
    }


    fn fit_plain(&mut self, x: &Matrix, y: &[f64]) -> Result<()> {
        let options = FitOptions {
            verbose: self.config.verbose(),
            cancel: Some(&self.cancel),
            ..FitOptions::default()
        };
        let status = self.estimator.fit(x, y, &options)?;
        log_interrupted(status);
        Ok(())
    }


    fn fit_catboost(&mut self, x: &Matrix, y: &[f64]) -> Result<()> {
        if self.config.task.is_classifier() && n_distinct(y) > 2 {
            debug!("more than two classes, switching CatBoost to `MultiClass`");
            self.estimator.set_loss_function("MultiClass")?;
        }

        let categorical = self.categorical_feature_indices();
        let options = FitOptions {
            categorical_features: categorical.as_deref(),
            verbose: self.config.verbose(),
            cancel: Some(&self.cancel),
            ..FitOptions::default()
        };
        let status = self.estimator.fit(x, y, &options)?;
        log_interrupted(status);
        Ok(())
    }


    fn fit_lightgbm(&mut self, x: &Matrix, y: &[f64]) -> Result<()> {
        let categorical = self.categorical_feature_indices();
        let verbose = self.config.verbose();

        let search = self.estimator.n_estimators() == Some(LGBM_SEARCH_N_ESTIMATORS);
        if !search {
            let options = FitOptions {
                categorical_features: categorical.as_deref(),
                verbose,
                cancel: Some(&self.cancel),
                ..FitOptions::default()
            };
            let status = self.estimator.fit(x, y, &options)?;
            log_interrupted(status);
            return Ok(());
        }

        let data = self.take_fit_data(Family::LightGBM, x, y)?;
        let metric = self.eval_metric(&data.y_test[..]);
        debug!(eval_metric = %metric, eval_name = data.eval_name, "LightGBM early stopping");

        let options = FitOptions {
            validation: Some(data.validation()),
            early_stopping: Some(EarlyStopping {
                patience: LGBM_PATIENCE,
                monitor: Monitor::EvalMetric,
            }),
            eval_metric: Some(metric),
            categorical_features: categorical.as_deref(),
            verbose,
            cancel: Some(&self.cancel),
            ..FitOptions::default()
        };
        let status = self.estimator.fit(&data.x_train, &data.y_train, &options)?;
        log_interrupted(status);
        info!(best_iteration = ?self.estimator.best_iteration(), "LightGBM finished");

        drop(data);
        Ok(())
    }


    fn fit_deep_learning(&mut self, x: &Matrix, y: &[f64]) -> Result<()> {
        // The network can only be sized now that the input width is known.
        let n_cols = x.shape().1;
        let network = self.estimator.build_network(
            n_cols, self.config.task, self.config.feature_learning,
        )?;
        if let Some(network) = network {
            debug!(n_cols, network = network.name(), "built the network");
            self.estimator = network;
        }

        let hp_search = self.config.hp_search;
        let patience = if hp_search { DL_PATIENCE_HP_SEARCH } else { DL_PATIENCE };
        let verbose = !hp_search;

        let data = self.take_fit_data(Family::DeepLearning, x, y)?;
        if verbose {
            info!(
                patience,
                eval_name = data.eval_name,
                "training stops early once the validation loss has not \
                 improved for {patience} epochs"
            );
        }

        let checkpoint = (!hp_search)
            .then(|| CheckpointFile::new(self.config.checkpoint_dir()));
        let metric = self.eval_metric(&data.y_test[..]);
        let options = FitOptions {
            validation: Some(data.validation()),
            early_stopping: Some(EarlyStopping {
                patience,
                monitor: Monitor::ValidationLoss,
            }),
            eval_metric: Some(metric),
            terminate_on_nan: true,
            checkpoint: checkpoint.as_ref().map(|c| c.path()),
            verbose,
            cancel: Some(&self.cancel),
            ..FitOptions::default()
        };
        let status = self.estimator.fit(&data.x_train, &data.y_train, &options)?;
        drop(data);

        if status == FitStatus::Interrupted {
            warn!(
                "stopping training because cancellation was requested, \
                 falling back to the best checkpoint"
            );
        }

        if let Some(checkpoint) = &checkpoint {
            if checkpoint.exists() {
                match self.estimator.restore_checkpoint(checkpoint.path()) {
                    Ok(()) => debug!(path = %checkpoint.path().display(), "restored the best checkpoint"),
                    // An interrupted fit keeps the model in its latest form.
                    Err(e) if status == FitStatus::Interrupted => {
                        warn!(error = %e, "could not restore the checkpoint, keeping the latest model");
                    },
                    Err(e) => return Err(e),
                }
            } else {
                warn!("no checkpoint was written, keeping the latest model");
            }
        }
        // Dropping `checkpoint` removes the file.
        Ok(())
    }


    fn fit_gradient_boosting(&mut self, x: &Matrix, y: &[f64]) -> Result<()> {
        let data = self.take_fit_data(Family::GradientBoosting, x, y)?;
        let schedule = n_estimators_schedule(self.config.fast_search);
        let verbose = self.config.verbose();
        let delta = self.config.min_step_improvement;

        let mut best_score = INITIAL_BEST_SCORE;
        let mut best_model: Option<Box<dyn Estimator>> = None;
        let mut n_worse_rounds = 0_usize;

        if verbose { progress::print_search_header(data.eval_name); }

        for (step, &n_estimators) in schedule.iter().enumerate() {
            // The first step always runs so that a model gets fitted.
            if step > 0 && self.cancel.is_cancelled() {
                info!("heard cancellation, keeping the best gradient boosting model");
                break;
            }

            let warm_start = step > 0;
            self.estimator.set_n_estimators(n_estimators, warm_start)?;

            let options = FitOptions {
                cancel: Some(&self.cancel),
                ..FitOptions::default()
            };
            let status = self.estimator.fit(&data.x_train, &data.y_train, &options)?;
            if status == FitStatus::Interrupted {
                info!("heard cancellation, keeping the best gradient boosting model");
                break;
            }

            let score = self.held_out_score(&data.x_test, &data.y_test[..])?;
            let improved = score - delta > best_score;
            if improved {
                best_score = score;
                n_worse_rounds = 0;
                best_model = Some(self.estimator.clone_box());
            } else {
                n_worse_rounds += 1;
            }

            debug!(n_estimators, score, n_worse_rounds, "gradient boosting step");
            if verbose { progress::print_search_step(n_estimators, score, improved); }

            if n_worse_rounds >= GB_PATIENCE { break; }
        }
        drop(data);

        // No scored step means the first fit was interrupted,
        // the partially fitted estimator is kept.
        if let Some(best_model) = best_model {
            self.estimator = best_model;
        }
        let n_estimators = self.estimator.n_estimators();
        info!(?n_estimators, best_score, "gradient boosting search finished");
        if verbose { progress::print_search_summary(n_estimators, best_score); }
        Ok(())
    }


    /// Score of the current estimator on the held-out pair.
    /// Interval predictors are scored natively.
    /// A failing custom scorer falls back to the native score.
    fn held_out_score(&self, x: &Matrix, y: &[f64]) -> Result<f64> {
        if self.config.training_prediction_intervals {
            return self.estimator.score(x, y);
        }
        match &self.scorer {
            Some(scorer) => match scorer.score(self, x, y) {
                Ok(score) => Ok(score),
                Err(e) => {
                    debug!(error = %e, "custom scorer failed, using the native score");
                    self.estimator.score(x, y)
                },
            },
            None => self.estimator.score(x, y),
        }
    }


    /// Evaluation metric for native early stopping.
    fn eval_metric(&self, y_test: &[f64]) -> EvalMetric {
        match self.config.task {
            TaskKind::Regressor if self.config.training_prediction_intervals => {
                EvalMetric::Quantile
            },
            TaskKind::Regressor => EvalMetric::Rmse,
            TaskKind::Classifier if n_distinct(y_test) > 2 => {
                EvalMetric::MultiLogloss
            },
            TaskKind::Classifier => EvalMetric::BinaryLogloss,
        }
    }


    /// Take the held-out pair out of `self`, or split one off `(x, y)`.
    fn take_fit_data<'a>(&mut self, family: Family, x: &'a Matrix, y: &'a [f64])
        -> Result<FitData<'a>>
    {
        match self.held_out.take() {
            Some(HeldOut { x: x_test, y: y_test }) => {
                checker::check_n_rows(&x_test, y_test.len())?;
                let x_test = shape_owned(family, x_test)?;
                Ok(FitData {
                    x_train: Cow::Borrowed(x),
                    y_train: Cow::Borrowed(y),
                    x_test,
                    y_test,
                    eval_name: USER_HELD_OUT_NAME,
                })
            },
            None => {
                let split = train_test_split(x, y, HOLD_OUT_FRACTION, self.config.seed)?;
                debug!(
                    n_train = split.y_train.len(),
                    n_test = split.y_test.len(),
                    "split off a random held-out set"
                );
                Ok(FitData {
                    x_train: Cow::Owned(split.x_train),
                    y_train: Cow::Owned(split.y_train),
                    x_test: split.x_test,
                    y_test: split.y_test,
                    eval_name: RANDOM_HELD_OUT_NAME,
                })
            },
        }
    }
}


/// Shape an owned matrix, reusing it when no conversion is needed.
fn shape_owned(family: Family, x: Matrix) -> Result<Matrix> {
    let shaped = match family.shape_fit_input(&x)? {
        Cow::Owned(m) => Some(m),
        Cow::Borrowed(_) => None,
    };
    Ok(shaped.unwrap_or(x))
}


#[inline(always)]
fn log_interrupted(status: FitStatus) {
    if status == FitStatus::Interrupted {
        warn!("training was interrupted, keeping the model in its latest form");
    }
}
