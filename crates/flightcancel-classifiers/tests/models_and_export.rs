mod common;

use flightcancel_classifiers::comparison::ModelComparison;
use flightcancel_classifiers::config::{default_models, ModelConfig, ModelType};
use flightcancel_classifiers::data_handling::{train_test_split, TrainTestSplit};
use flightcancel_classifiers::error::ClassifierError;
use flightcancel_classifiers::evaluation::{train_and_evaluate, ModelEvaluation};
use flightcancel_classifiers::export::{export_results, ResultTable};
use flightcancel_classifiers::metrics::{ClassificationReport, ConfusionMatrix, MetricRecord};
use flightcancel_classifiers::models::build_model;
use ndarray::Array1;

use common::synthetic_dataset;

// ---------------------------------------------------------------------------
// Models
// ---------------------------------------------------------------------------

#[test]
fn every_default_model_trains_and_predicts() {
    let dataset = synthetic_dataset(200, 4, 11);
    let split = train_test_split(&dataset, 0.2, 42, true).unwrap();

    for config in default_models() {
        let mut model = build_model(config, 42);
        let evaluation = train_and_evaluate(model.as_mut(), &split).unwrap();

        assert_eq!(evaluation.predictions.len(), split.n_test());
        assert_eq!(evaluation.confusion_matrix.total(), split.n_test());
        for value in evaluation.metrics.values() {
            assert!((0.0..=1.0).contains(&value), "{}: {}", evaluation.name, value);
        }
        // the clusters only overlap on a narrow band of DepDelay
        assert!(evaluation.metrics.accuracy > 0.8, "{}", evaluation.name);

        if let Some(probabilities) = &evaluation.probabilities {
            assert_eq!(probabilities.len(), split.n_test());
            assert!(probabilities.iter().all(|p| (0.0..=1.0).contains(p)));
        }
    }
}

#[test]
fn model_names_follow_display_names() {
    let names: Vec<String> = default_models()
        .into_iter()
        .map(|config| build_model(config, 42).name().to_string())
        .collect();
    assert_eq!(
        names,
        vec!["Logistic Regression", "Decision Tree", "Random Forest", "SVM"]
    );
}

#[test]
fn random_forest_is_reproducible_for_a_seed() {
    let dataset = synthetic_dataset(150, 3, 12);
    let split = train_test_split(&dataset, 0.2, 42, true).unwrap();
    let config = ModelConfig::new(ModelType::RandomForest {
        n_estimators: 15,
        bootstrap_proportion: 1.0,
        max_depth: Some(4),
        split_criterion: Default::default(),
    });

    let mut first = build_model(config.clone(), 42);
    let mut second = build_model(config, 42);
    let a = train_and_evaluate(first.as_mut(), &split).unwrap();
    let b = train_and_evaluate(second.as_mut(), &split).unwrap();
    assert_eq!(a.predictions, b.predictions);
}

#[test]
fn predicting_before_fit_fails() {
    let dataset = synthetic_dataset(20, 2, 13);
    for config in default_models() {
        let model = build_model(config, 42);
        assert!(model.predict(&dataset.x).is_err());
    }
}

// ---------------------------------------------------------------------------
// Metrics
// ---------------------------------------------------------------------------

#[test]
fn f1_is_harmonic_mean_of_precision_and_recall() {
    let truth = [true, true, true, false, false, false, false, true];
    let preds = [true, false, true, true, false, false, false, true];
    let cm = ConfusionMatrix::from_predictions(&preds, &truth).unwrap();
    let record = MetricRecord::from_confusion_matrix("Decision Tree", &cm);

    assert!((record.precision - 0.75).abs() < 1e-12);
    assert!((record.recall - 0.75).abs() < 1e-12);
    let expected = 2.0 * record.precision * record.recall / (record.precision + record.recall);
    assert!((record.f1 - expected).abs() < 1e-12);
    assert!((record.accuracy - 0.75).abs() < 1e-12);
}

// ---------------------------------------------------------------------------
// Export
// ---------------------------------------------------------------------------

fn fixed_evaluation(name: &str, predictions: Vec<bool>, truth: &[bool]) -> ModelEvaluation {
    let confusion_matrix = ConfusionMatrix::from_predictions(&predictions, truth).unwrap();
    ModelEvaluation {
        name: name.to_string(),
        predictions: Array1::from_vec(predictions),
        probabilities: None,
        metrics: MetricRecord::from_confusion_matrix(name, &confusion_matrix),
        report: ClassificationReport::from_confusion_matrix(&confusion_matrix),
        confusion_matrix,
    }
}

fn five_row_scenario() -> (TrainTestSplit, Vec<ModelEvaluation>) {
    // 25 rows with test_size 0.2 leaves exactly 5 test rows
    let dataset = synthetic_dataset(25, 5, 14);
    let split = train_test_split(&dataset, 0.2, 42, true).unwrap();
    assert_eq!(split.n_test(), 5);

    let truth = split.y_test.to_vec();
    let flipped: Vec<bool> = truth.iter().map(|v| !v).collect();
    let evaluations = vec![
        fixed_evaluation("Logistic Regression", truth.clone(), &truth),
        fixed_evaluation("Decision Tree", vec![false; 5], &truth),
        fixed_evaluation("Random Forest", vec![true; 5], &truth),
        fixed_evaluation("SVM", flipped, &truth),
    ];
    (split, evaluations)
}

#[test]
fn results_table_has_one_row_per_test_example() {
    let (split, evaluations) = five_row_scenario();
    let table = ResultTable::assemble(&split, &evaluations).unwrap();

    assert_eq!(table.nrows(), 5);
    assert_eq!(table.ncols(), 2 + 4 + 16);
    assert_eq!(table.columns[0], "Test_Index");
    assert_eq!(table.columns[1], "Actual");
    assert_eq!(table.columns[2], "Logistic Regression_Prediction");
    assert_eq!(table.columns[5], "SVM_Prediction");
    assert_eq!(table.columns[6], "Logistic Regression_Accuracy");
    assert_eq!(table.columns[9], "Logistic Regression_F1");
    assert_eq!(table.columns[21], "SVM_F1");
}

#[test]
fn exported_csv_repeats_metrics_on_every_row() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("classification_results.csv");
    let (split, evaluations) = five_row_scenario();
    let table = ResultTable::assemble(&split, &evaluations).unwrap();

    assert!(export_results(&table, &path));

    let mut reader = csv::Reader::from_path(&path).unwrap();
    let headers = reader.headers().unwrap().clone();
    assert_eq!(headers.len(), 22);
    let accuracy_col = headers
        .iter()
        .position(|h| h == "Decision Tree_Accuracy")
        .unwrap();

    let rows: Vec<csv::StringRecord> = reader.records().map(|r| r.unwrap()).collect();
    assert_eq!(rows.len(), 5);
    let first = rows[0][accuracy_col].to_string();
    assert!(rows.iter().all(|row| row[accuracy_col] == first));

    for (pos, row) in rows.iter().enumerate() {
        assert_eq!(row[0], split.test_index[pos].to_string());
        assert_eq!(row[1], (split.y_test[pos] as u8).to_string());
        // the perfect model repeats the actual label
        assert_eq!(row[2], row[1]);
    }
    let perfect: f64 = rows[0][6].parse().unwrap();
    assert_eq!(perfect, 1.0);
}

#[test]
fn failed_export_is_reported_not_raised() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("missing_dir").join("results.csv");
    let (split, evaluations) = five_row_scenario();
    let table = ResultTable::assemble(&split, &evaluations).unwrap();

    assert!(!export_results(&table, &path));
    assert!(!path.exists());
}

#[test]
fn assemble_rejects_short_predictions() {
    let (split, mut evaluations) = five_row_scenario();
    evaluations[3].predictions = Array1::from_vec(vec![true; 4]);
    assert!(ResultTable::assemble(&split, &evaluations).is_err());
}

#[test]
fn assemble_rejects_repeated_model_names() {
    let (split, mut evaluations) = five_row_scenario();
    evaluations[3].name = "Decision Tree".to_string();

    let err = ResultTable::assemble(&split, &evaluations).unwrap_err();
    assert!(matches!(
        err.downcast_ref::<ClassifierError>(),
        Some(ClassifierError::DuplicateModelName(name)) if name == "Decision Tree"
    ));
}

#[test]
fn preview_rounds_metrics() {
    let (split, evaluations) = five_row_scenario();
    let table = ResultTable::assemble(&split, &evaluations).unwrap();
    let preview = table.preview(3);
    assert!(preview.ends_with("[5 rows x 22 columns]"));
    // header + 3 rows + shape line
    assert_eq!(preview.lines().count(), 5);
    assert!(preview.contains("1.0000"));
}

#[test]
fn comparison_follows_evaluation_order() {
    let (_, evaluations) = five_row_scenario();
    let records: Vec<MetricRecord> = evaluations.iter().map(|e| e.metrics.clone()).collect();
    let comparison = ModelComparison::from_records(&records);
    assert_eq!(
        comparison.model_names(),
        vec!["Logistic Regression", "Decision Tree", "Random Forest", "SVM"]
    );
    assert_eq!(comparison.get("SVM").unwrap().accuracy, 0.0);
}
