//! Integration tests for the classify run configuration.

use std::path::PathBuf;

use flightcancel_classifiers::config::{ModelConfig, ModelType};
use flightcancel_classifiers::error::ClassifierError;
use flightcancel_cli::classifiers::classify::classify::{
    classify_command, load_classify_config, run_classification, ClassifyConfig,
};

fn parse(args: &[&str]) -> ClassifyConfig {
    let matches = classify_command()
        .try_get_matches_from(std::iter::once("classify").chain(args.iter().copied()))
        .unwrap();
    ClassifyConfig::from_arguments(&matches).unwrap()
}

// ---------------------------------------------------------------------------
// ClassifyConfig defaults & serialization
// ---------------------------------------------------------------------------

#[test]
fn classify_config_default_values() {
    let cfg = ClassifyConfig::default();
    assert_eq!(cfg.data_path, PathBuf::from("flight_data_engineered.csv"));
    assert_eq!(cfg.target_column, "Cancelled");
    assert_eq!(cfg.output_file, PathBuf::from("classification_results.csv"));
    assert!((cfg.test_size - 0.2).abs() < 1e-12);
    assert_eq!(cfg.seed, 42);
    assert!(cfg.stratify);
    assert!(!cfg.show_plots);
    let names: Vec<&str> = cfg.models.iter().map(|m| m.display_name()).collect();
    assert_eq!(
        names,
        vec!["Logistic Regression", "Decision Tree", "Random Forest", "SVM"]
    );
}

#[test]
fn classify_config_round_trips_json() {
    let cfg = ClassifyConfig::default();
    let json = serde_json::to_string(&cfg).unwrap();
    let cfg2: ClassifyConfig = serde_json::from_str(&json).unwrap();
    assert_eq!(cfg.models, cfg2.models);
    assert_eq!(cfg.data_path, cfg2.data_path);
    assert_eq!(cfg.report_file, cfg2.report_file);
}

#[test]
fn partial_config_file_fills_defaults() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("classify.json");
    std::fs::write(
        &path,
        r#"{
            "data_path": "other.csv",
            "seed": 7,
            "models": [
                { "name": "Shallow Tree", "DecisionTree": {
                    "max_depth": 3, "min_weight_split": 2.0,
                    "min_weight_leaf": 1.0, "split_criterion": "entropy" } }
            ]
        }"#,
    )
    .unwrap();

    let cfg = load_classify_config(&path).unwrap();
    assert_eq!(cfg.data_path, PathBuf::from("other.csv"));
    assert_eq!(cfg.seed, 7);
    assert_eq!(cfg.target_column, "Cancelled");
    assert_eq!(cfg.models.len(), 1);
    assert_eq!(cfg.models[0].display_name(), "Shallow Tree");
    assert!(matches!(
        cfg.models[0].model_type,
        ModelType::DecisionTree { max_depth: Some(3), .. }
    ));
}

#[test]
fn malformed_config_file_errors() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("classify.json");
    std::fs::write(&path, "{ not json").unwrap();
    assert!(load_classify_config(&path).is_err());
}

// ---------------------------------------------------------------------------
// Command line overrides
// ---------------------------------------------------------------------------

#[test]
fn no_arguments_keep_defaults() {
    let cfg = parse(&[]);
    assert_eq!(cfg.seed, 42);
    assert_eq!(cfg.models.len(), 4);
    assert!(cfg.report_file.is_some());
}

#[test]
fn flags_override_defaults() {
    let cfg = parse(&[
        "--data",
        "flights.tsv",
        "--test-size",
        "0.25",
        "--seed",
        "3",
        "--models",
        "svm,forest",
        "--no-stratify",
        "--no-report",
        "--ignore",
        "FlightDate,TailNum",
    ]);
    assert_eq!(cfg.data_path, PathBuf::from("flights.tsv"));
    assert!((cfg.test_size - 0.25).abs() < 1e-12);
    assert_eq!(cfg.seed, 3);
    assert!(!cfg.stratify);
    assert!(cfg.report_file.is_none());
    assert_eq!(cfg.ignore_columns, vec!["FlightDate", "TailNum"]);
    let names: Vec<&str> = cfg.models.iter().map(|m| m.display_name()).collect();
    assert_eq!(names, vec!["SVM", "Random Forest"]);
}

#[test]
fn flags_override_config_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("classify.json");
    std::fs::write(&path, r#"{ "seed": 7, "output_file": "from_file.csv" }"#).unwrap();

    let cfg = parse(&[path.to_str().unwrap(), "--seed", "11"]);
    assert_eq!(cfg.seed, 11);
    assert_eq!(cfg.output_file, PathBuf::from("from_file.csv"));
}

#[test]
fn unknown_model_name_is_rejected() {
    let matches = classify_command()
        .try_get_matches_from(["classify", "--models", "knn"])
        .unwrap();
    assert!(ClassifyConfig::from_arguments(&matches).is_err());
}

// ---------------------------------------------------------------------------
// Run validation
// ---------------------------------------------------------------------------

#[test]
fn repeated_model_names_fail_before_training() {
    let dir = tempfile::tempdir().unwrap();
    let data = dir.path().join("flights.csv");
    let mut rows = String::from("DepDelay,Cancelled\n");
    for i in 0..20 {
        rows.push_str(&format!("{},{}\n", i, (i % 4 == 0) as u8));
    }
    std::fs::write(&data, rows).unwrap();

    let output = dir.path().join("results.csv");
    let cfg = ClassifyConfig {
        data_path: data,
        output_file: output.clone(),
        models: vec![
            ModelConfig::new(ModelType::decision_tree()),
            ModelConfig::new(ModelType::decision_tree()),
        ],
        plot_dir: None,
        report_file: None,
        ..ClassifyConfig::default()
    };

    let err = run_classification(&cfg).unwrap_err();
    assert!(matches!(
        err.downcast_ref::<ClassifierError>(),
        Some(ClassifierError::DuplicateModelName(name)) if name == "Decision Tree"
    ));
    assert!(!output.exists());
}

#[test]
fn renamed_duplicate_models_are_accepted() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("classify.json");
    std::fs::write(
        &path,
        r#"{ "models": [
            { "DecisionTree": { "max_depth": null, "min_weight_split": 2.0,
                "min_weight_leaf": 1.0, "split_criterion": "gini" } },
            { "name": "Shallow Tree", "DecisionTree": { "max_depth": 2,
                "min_weight_split": 2.0, "min_weight_leaf": 1.0, "split_criterion": "gini" } }
        ] }"#,
    )
    .unwrap();

    let cfg = load_classify_config(&path).unwrap();
    assert!(flightcancel_classifiers::config::ensure_unique_names(&cfg.models).is_ok());
}
