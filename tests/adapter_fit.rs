mod common;

use model_atc::prelude::*;
use model_atc::{AtcError, Result};
use model_atc::adapter::GB_PATIENCE;
use common::*;

use std::rc::Rc;


/// Tests for the gradient boosting search.
#[cfg(test)]
pub mod gradient_boosting {
    use super::*;

    fn fit(estimator: Box<dyn Estimator>) -> ModelAdapter {
        let mut adapter = ModelAdapter::builder(estimator)
            .task(TaskKind::Regressor)
            .fast_search(true)
            .hp_search(true)
            .seed(7)
            .build()
            .unwrap();
        adapter.fit(&dense(40, 3), &targets(40)).unwrap();
        adapter
    }

    #[test]
    fn monotonic_scores_keep_the_last_count() {
        let journal = journal();
        let adapter = fit(ScriptedBoosting::boxed(|n| n as f64, &journal));

        assert_eq!(adapter.estimator().n_estimators(), Some(247));

        let journal = journal.borrow();
        assert_eq!(journal.fits.len(), 124);
        assert!(!journal.warm_starts[0]);
        assert!(journal.warm_starts[1..].iter().all(|&w| w));
    }

    #[test]
    fn flat_scores_stop_after_patience() {
        let journal = journal();
        let adapter = fit(ScriptedBoosting::boxed(|_| 0.0, &journal));

        assert_eq!(journal.borrow().fits.len(), 1 + GB_PATIENCE);
        assert_eq!(adapter.estimator().n_estimators(), Some(1));
    }

    #[test]
    fn custom_scorer_sees_the_adapter() {
        let journal = journal();
        let estimator = ScriptedBoosting::boxed(|n| n as f64, &journal);
        let scorer = |model: &ModelAdapter, x: &Matrix, _y: &[f64]| -> Result<f64> {
            let predicted = model.predict(x)?.to_f64_vec()?;
            Ok(-(predicted[0] - 10.0).powi(2))
        };
        let mut adapter = ModelAdapter::builder(estimator)
            .task(TaskKind::Regressor)
            .scorer(scorer)
            .fast_search(true)
            .hp_search(true)
            .seed(3)
            .build()
            .unwrap();
        adapter.fit(&dense(40, 3), &targets(40)).unwrap();

        assert_eq!(adapter.estimator().n_estimators(), Some(10));
        assert_eq!(journal.borrow().fits.len(), 10 + GB_PATIENCE);
    }

    #[test]
    fn failing_scorer_falls_back_to_native_score() {
        let journal = journal();
        let estimator = ScriptedBoosting::boxed(|n| n as f64, &journal);
        let scorer = |_: &ModelAdapter, _: &Matrix, _: &[f64]| -> Result<f64> {
            Err(AtcError::Estimator("scorer failure".into()))
        };
        let mut adapter = ModelAdapter::builder(estimator)
            .task(TaskKind::Regressor)
            .scorer(scorer)
            .fast_search(true)
            .hp_search(true)
            .build()
            .unwrap();
        adapter.fit(&dense(40, 3), &targets(40)).unwrap();

        assert_eq!(adapter.estimator().n_estimators(), Some(247));
    }

    #[test]
    fn cancellation_keeps_the_best_snapshot() {
        let journal = journal();
        let adapter = fit(ScriptedBoosting::cancelling(|n| n as f64, 5, &journal));

        assert_eq!(journal.borrow().fits.len(), 5);
        assert_eq!(adapter.estimator().n_estimators(), Some(5));
        assert!(!adapter.cancellation_token().is_cancelled());
    }

    #[test]
    fn cancelled_before_the_start_still_fits_once() {
        let journal = journal();
        let mut adapter = ModelAdapter::builder(ScriptedBoosting::boxed(|n| n as f64, &journal))
            .task(TaskKind::Regressor)
            .fast_search(true)
            .hp_search(true)
            .build()
            .unwrap();
        adapter.cancellation_token().cancel();
        adapter.fit(&dense(40, 3), &targets(40)).unwrap();

        assert_eq!(journal.borrow().fits.len(), 1);
        assert_eq!(adapter.estimator().n_estimators(), Some(1));
        assert!(!adapter.cancellation_token().is_cancelled());
    }

    #[test]
    fn sparse_input_is_densified() {
        let journal = journal();
        let mut adapter = ModelAdapter::builder(ScriptedBoosting::boxed(|_| 0.0, &journal))
            .task(TaskKind::Regressor)
            .hp_search(true)
            .build()
            .unwrap();
        adapter.fit(&sparse(20, 3), &targets(20)).unwrap();

        // 85/15 split of 20 rows.
        let journal = journal.borrow();
        assert!(journal.fits.iter().all(|f| !f.sparse && f.n_rows == 17));
    }
}


/// Tests for deep-learning fits.
#[cfg(test)]
pub mod deep_learning {
    use super::*;

    #[test]
    fn network_is_built_and_best_checkpoint_restored() {
        let dir = tempfile::tempdir().unwrap();
        let journal = journal();
        let mut adapter = ModelAdapter::builder(NetworkPlaceholder::boxed(10, 3, &journal))
            .task(TaskKind::Regressor)
            .checkpoint_dir(dir.path())
            .seed(1)
            .build()
            .unwrap();
        adapter.fit(&sparse(20, 4), &targets(20)).unwrap();

        assert_eq!(adapter.estimator().name(), "DeepLearningNetwork");
        assert_eq!(adapter.family(), Family::DeepLearning);

        let record = journal.borrow().fits[0].clone();
        assert_eq!((record.n_rows, record.n_cols, record.sparse), (17, 4, false));
        assert_eq!(
            record.validation,
            Some(("random_holdout_set_from_training_data".to_string(), 3, 4))
        );
        assert_eq!(
            record.early_stopping,
            Some(EarlyStopping { patience: 25, monitor: Monitor::ValidationLoss })
        );
        assert_eq!(record.eval_metric, Some(EvalMetric::Rmse));
        assert!(record.terminate_on_nan);
        assert!(record.checkpoint);

        let predicted = adapter.predict(&dense(2, 4)).unwrap();
        assert_eq!(predicted, Prediction::Vector(vec![3.0.into(), 3.0.into()]));

        let n_files = std::fs::read_dir(dir.path()).unwrap().count();
        assert_eq!(n_files, 0);
    }

    #[test]
    fn classifier_network_gets_a_logloss() {
        let cases = [
            (vec![0.0, 1.0, 1.0], EvalMetric::BinaryLogloss),
            (vec![0.0, 1.0, 2.0], EvalMetric::MultiLogloss),
        ];
        for (y_test, expected) in cases {
            let journal = journal();
            let mut adapter = ModelAdapter::builder(NetworkPlaceholder::boxed(4, 2, &journal))
                .task(TaskKind::Classifier)
                .feature_learning(true)
                .hp_search(true)
                .held_out(dense(3, 2), y_test)
                .build()
                .unwrap();
            let y = (0..20).map(|i| (i % 2) as f64).collect::<Vec<_>>();
            adapter.fit(&dense(20, 2), &y).unwrap();

            let journal = journal.borrow();
            assert_eq!(journal.networks, vec![(2, TaskKind::Classifier, true)]);

            let record = &journal.fits[0];
            assert_eq!(record.eval_metric, Some(expected));
            assert_eq!(record.n_rows, 20);
            assert_eq!(
                record.validation,
                Some(("X_test_the_user_passed_in".to_string(), 3, 2))
            );
            assert_eq!(
                record.early_stopping,
                Some(EarlyStopping { patience: 5, monitor: Monitor::ValidationLoss })
            );
        }
    }

    #[test]
    fn hp_search_has_short_patience_and_no_checkpoint() {
        let journal = journal();
        let mut adapter = ModelAdapter::builder(NetworkPlaceholder::boxed(10, 3, &journal))
            .task(TaskKind::Regressor)
            .hp_search(true)
            .build()
            .unwrap();
        adapter.fit(&dense(20, 2), &targets(20)).unwrap();

        let record = journal.borrow().fits[0].clone();
        assert_eq!(record.early_stopping.map(|e| e.patience), Some(5));
        assert!(!record.checkpoint);
        assert!(!record.verbose);

        // Nothing to restore, the latest epoch is kept.
        let predicted = adapter.predict(&dense(1, 2)).unwrap();
        assert_eq!(predicted, Prediction::Scalar(10.0.into()));
    }

    #[test]
    fn interruption_falls_back_to_the_checkpoint() {
        let dir = tempfile::tempdir().unwrap();
        let journal = journal();
        let placeholder = NetworkPlaceholder {
            epochs: 10,
            best_epoch: 3,
            interrupt_at: Some(5),
            journal: Rc::clone(&journal),
        };
        let mut adapter = ModelAdapter::builder(Box::new(placeholder))
            .task(TaskKind::Regressor)
            .checkpoint_dir(dir.path())
            .build()
            .unwrap();
        adapter.fit(&dense(20, 2), &targets(20)).unwrap();

        let predicted = adapter.predict(&dense(1, 2)).unwrap();
        assert_eq!(predicted, Prediction::Scalar(3.0.into()));
        assert!(!adapter.cancellation_token().is_cancelled());
        assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 0);
    }

    #[test]
    fn missing_checkpoint_keeps_the_latest_state() {
        let dir = tempfile::tempdir().unwrap();
        let journal = journal();
        // `best_epoch = 0` is never reached, so nothing is saved.
        let mut adapter = ModelAdapter::builder(NetworkPlaceholder::boxed(4, 0, &journal))
            .task(TaskKind::Regressor)
            .checkpoint_dir(dir.path())
            .build()
            .unwrap();
        adapter.fit(&dense(20, 2), &targets(20)).unwrap();

        let predicted = adapter.predict(&dense(1, 2)).unwrap();
        assert_eq!(predicted, Prediction::Scalar(4.0.into()));
    }
}


/// Tests for LightGBM fits.
#[cfg(test)]
pub mod lightgbm {
    use super::*;

    fn searching(name: &str, journal: &SharedJournal) -> Box<dyn Estimator> {
        let mut model = MeanModel::new(name, journal);
        model.n_estimators = Some(2000);
        model.boxed()
    }

    #[test]
    fn search_uses_the_supplied_held_out_set() {
        let journal = journal();
        let mut adapter = ModelAdapter::builder(searching("LGBMRegressor", &journal))
            .task(TaskKind::Regressor)
            .held_out(dense(4, 3), targets(4))
            .build()
            .unwrap();
        assert!(adapter.has_held_out());
        adapter.fit(&dense(10, 3), &targets(10)).unwrap();
        assert!(!adapter.has_held_out());

        let record = journal.borrow().fits[0].clone();
        assert_eq!(record.n_rows, 10);
        assert_eq!(
            record.validation,
            Some(("X_test_the_user_passed_in".to_string(), 4, 3))
        );
        assert_eq!(
            record.early_stopping,
            Some(EarlyStopping { patience: 100, monitor: Monitor::EvalMetric })
        );
        assert_eq!(record.eval_metric, Some(EvalMetric::Rmse));
        assert!(record.verbose);
    }

    #[test]
    fn interval_training_uses_quantile_loss() {
        let journal = journal();
        let mut adapter = ModelAdapter::builder(searching("LGBMRegressor", &journal))
            .task(TaskKind::Regressor)
            .training_prediction_intervals(true)
            .build()
            .unwrap();
        adapter.fit(&dense(20, 3), &targets(20)).unwrap();

        assert_eq!(journal.borrow().fits[0].eval_metric, Some(EvalMetric::Quantile));
    }

    #[test]
    fn classifier_metric_follows_the_class_count() {
        let journal = journal();
        let mut adapter = ModelAdapter::builder(searching("LGBMClassifier", &journal))
            .held_out(dense(3, 2), vec![0.0, 1.0, 2.0])
            .build()
            .unwrap();
        adapter.fit(&dense(6, 2), &[0.0, 1.0, 2.0, 0.0, 1.0, 2.0]).unwrap();

        let mut adapter = ModelAdapter::builder(searching("LGBMClassifier", &journal))
            .held_out(dense(2, 2), vec![0.0, 1.0])
            .build()
            .unwrap();
        adapter.fit(&dense(6, 2), &[0.0, 1.0, 0.0, 0.0, 1.0, 1.0]).unwrap();

        let journal = journal.borrow();
        assert_eq!(journal.fits[0].eval_metric, Some(EvalMetric::MultiLogloss));
        assert_eq!(journal.fits[1].eval_metric, Some(EvalMetric::BinaryLogloss));
    }

    #[test]
    fn other_counts_fit_plainly() {
        let journal = journal();
        let mut adapter = ModelAdapter::builder(MeanModel::new("LGBMRegressor", &journal).boxed())
            .task(TaskKind::Regressor)
            .hp_search(true)
            .build()
            .unwrap();
        adapter.fit(&sparse(10, 3), &targets(10)).unwrap();

        let record = journal.borrow().fits[0].clone();
        assert_eq!(record.validation, None);
        assert_eq!(record.n_rows, 10);
        assert!(!record.sparse);
        assert!(!record.verbose);
    }
}


/// Tests for plain fits.
#[cfg(test)]
pub mod plain {
    use super::*;

    #[test]
    fn catboost_switches_to_multiclass() {
        let journal = journal();
        let mut adapter = ModelAdapter::builder(MeanModel::new("CatBoostClassifier", &journal).boxed())
            .build()
            .unwrap();
        adapter.fit(&dense(6, 2), &[0.0, 1.0, 2.0, 0.0, 1.0, 2.0]).unwrap();
        assert_eq!(journal.borrow().losses, vec!["MultiClass".to_string()]);

        let journal = common::journal();
        let mut adapter = ModelAdapter::builder(MeanModel::new("CatBoostClassifier", &journal).boxed())
            .build()
            .unwrap();
        adapter.fit(&dense(4, 2), &[0.0, 1.0, 1.0, 0.0]).unwrap();
        assert!(journal.borrow().losses.is_empty());
    }

    #[test]
    fn catboost_receives_categorical_positions() {
        let journal = journal();
        let roles = ColumnRoles::from([
            ("city".to_string(), ColumnRole::Categorical),
            ("ghost".to_string(), ColumnRole::Categorical),
            ("price".to_string(), ColumnRole::Output),
        ]);
        let mut adapter = ModelAdapter::builder(MeanModel::new("CatBoostRegressor", &journal).boxed())
            .task(TaskKind::Regressor)
            .feature_names(["age", "city", "height"])
            .column_roles(roles)
            .keep_cat_features(true)
            .build()
            .unwrap();
        adapter.fit(&sparse(6, 3), &targets(6)).unwrap();

        let record = journal.borrow().fits[0].clone();
        assert_eq!(record.categorical, Some(vec![1]));
        assert!(!record.sparse);
    }

    #[test]
    fn categorical_positions_need_the_flag() {
        let journal = journal();
        let roles = ColumnRoles::from([("city".to_string(), ColumnRole::Categorical)]);
        let mut adapter = ModelAdapter::builder(MeanModel::new("CatBoostRegressor", &journal).boxed())
            .task(TaskKind::Regressor)
            .feature_names(["age", "city"])
            .column_roles(roles)
            .build()
            .unwrap();
        adapter.fit(&dense(4, 2), &targets(4)).unwrap();

        assert_eq!(journal.borrow().fits[0].categorical, None);
    }

    #[test]
    fn xgboost_trains_with_a_bias_column() {
        let journal = journal();
        let mut adapter = ModelAdapter::builder(MeanModel::new("XGBRegressor", &journal).boxed())
            .task(TaskKind::Regressor)
            .build()
            .unwrap();
        adapter.fit(&sparse(5, 3), &targets(5)).unwrap();

        let record = journal.borrow().fits[0].clone();
        assert_eq!((record.n_rows, record.n_cols), (5, 4));
        assert!(record.sparse);
    }

    #[test]
    fn linear_classifiers_train_dense() {
        let journal = journal();
        let mut adapter = ModelAdapter::builder(MeanModel::new("SGDClassifier", &journal).boxed())
            .build()
            .unwrap();
        adapter.fit(&sparse(4, 3), &[0.0, 1.0, 0.0, 1.0]).unwrap();
        adapter.predict(&sparse(4, 3)).unwrap();

        let journal = journal.borrow();
        assert!(!journal.fits[0].sparse);
        assert!(journal.predicts[0].2);
    }

    #[test]
    fn held_out_data_is_released() {
        let journal = journal();
        let mut adapter = ModelAdapter::builder(MeanModel::new("LinearRegression", &journal).boxed())
            .task(TaskKind::Regressor)
            .held_out(dense(2, 2), targets(2))
            .build()
            .unwrap();
        assert!(adapter.has_held_out());
        adapter.fit(&dense(4, 2), &targets(4)).unwrap();
        assert!(!adapter.has_held_out());
    }

    #[test]
    fn family_override_wins() {
        let journal = journal();
        let adapter = ModelAdapter::builder(MeanModel::new("MyBooster", &journal).boxed())
            .family_name("XGBRegressor")
            .build()
            .unwrap();
        assert_eq!(adapter.family(), Family::XGBoost);
    }

    #[test]
    fn invalid_targets_are_rejected() {
        let journal = journal();
        let mut adapter = ModelAdapter::new(
            MeanModel::new("LinearRegression", &journal).boxed(),
            TaskKind::Regressor,
        );

        let empty = adapter.fit(&dense(0, 2), &[]);
        assert!(matches!(empty, Err(AtcError::InvalidInput(_))));

        let mismatch = adapter.fit(&dense(3, 2), &targets(2));
        assert!(matches!(mismatch, Err(AtcError::Shape { .. })));
        assert!(journal.borrow().fits.is_empty());
    }
}
