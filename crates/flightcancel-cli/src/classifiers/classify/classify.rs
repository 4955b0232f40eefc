//! Configuration and driver for one classification run.
use std::path::{Path, PathBuf};
use std::str::FromStr;

use anyhow::{bail, Context, Result};
use clap::{Arg, ArgAction, ArgMatches, Command, ValueHint};
use plotly::Plot;
use serde::{Deserialize, Serialize};

use flightcancel_classifiers::comparison::ModelComparison;
use flightcancel_classifiers::config::{default_models, ensure_unique_names, ModelConfig, ModelType};
use flightcancel_classifiers::data_handling::{train_test_split, FlightDataset, TrainTestSplit};
use flightcancel_classifiers::evaluation::{train_and_evaluate, ModelEvaluation};
use flightcancel_classifiers::export::{export_results, ResultTable};
use flightcancel_classifiers::io::{read_flight_csv_with_config, CsvReaderConfig};
use flightcancel_classifiers::metrics::MetricRecord;
use flightcancel_classifiers::models::build_model;
use flightcancel_classifiers::report::plots::{
    plot_confusion_matrix, plot_metric_comparison, plot_score_histogram,
};
use flightcancel_classifiers::report::save_plot_html;

use super::report::write_run_report;

/// Parameters of a classification run.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ClassifyConfig {
    pub data_path: PathBuf,
    pub target_column: String,
    pub output_file: PathBuf,
    pub test_size: f64,
    pub seed: u64,
    pub stratify: bool,
    pub models: Vec<ModelConfig>,
    /// Columns excluded from the feature set (matched case-insensitively)
    pub ignore_columns: Vec<String>,
    /// Directory receiving one HTML file per figure; `None` skips writing them
    pub plot_dir: Option<PathBuf>,
    pub show_plots: bool,
    pub report_file: Option<PathBuf>,
}

impl Default for ClassifyConfig {
    fn default() -> Self {
        Self {
            data_path: PathBuf::from("flight_data_engineered.csv"),
            target_column: "Cancelled".to_string(),
            output_file: PathBuf::from("classification_results.csv"),
            test_size: 0.2,
            seed: 42,
            stratify: true,
            models: default_models(),
            ignore_columns: Vec::new(),
            plot_dir: Some(PathBuf::from("plots")),
            show_plots: false,
            report_file: Some(PathBuf::from("flightcancel_report.html")),
        }
    }
}

impl ClassifyConfig {
    /// Build the run configuration from the parsed `classify` arguments:
    /// the optional JSON file first, then the command line overrides.
    /// Without a file the defaults are echoed to stderr before any override
    /// is applied.
    pub fn from_arguments(matches: &ArgMatches) -> Result<Self> {
        let mut config = match matches.get_one::<PathBuf>("config") {
            Some(path) => {
                eprintln!("[flightcancel] Using config: {:?}", path);
                load_classify_config(path)?
            }
            None => {
                eprintln!("[flightcancel] No config provided; using defaults.");
                let defaults = ClassifyConfig::default();
                let default_json = serde_json::to_string_pretty(&defaults).unwrap_or_default();
                eprintln!("[flightcancel] Default config:\n{}", default_json);
                defaults
            }
        };

        if let Some(path) = matches.get_one::<PathBuf>("data") {
            config.data_path = path.clone();
        }
        if let Some(target) = matches.get_one::<String>("target") {
            config.target_column = target.clone();
        }
        if let Some(path) = matches.get_one::<PathBuf>("output_file") {
            config.output_file = path.clone();
        }
        if let Some(&test_size) = matches.get_one::<f64>("test_size") {
            config.test_size = test_size;
        }
        if let Some(&seed) = matches.get_one::<u64>("seed") {
            config.seed = seed;
        }
        if let Some(models) = matches.get_many::<String>("models") {
            config.models = models
                .map(|name| ModelType::from_str(name).map(ModelConfig::new))
                .collect::<std::result::Result<Vec<_>, _>>()
                .map_err(anyhow::Error::msg)?;
        }
        if let Some(columns) = matches.get_many::<String>("ignore") {
            config.ignore_columns = columns.cloned().collect();
        }
        if let Some(dir) = matches.get_one::<PathBuf>("plot_dir") {
            config.plot_dir = Some(dir.clone());
        }
        if matches.get_flag("no_stratify") {
            config.stratify = false;
        }
        if matches.get_flag("show_plots") {
            config.show_plots = true;
        }
        if matches.get_flag("no_report") {
            config.report_file = None;
        }

        Ok(config)
    }
}

/// Load a run configuration from a JSON file. Missing fields take their
/// default values.
pub fn load_classify_config<P: AsRef<Path>>(path: P) -> Result<ClassifyConfig> {
    let content = std::fs::read_to_string(&path)
        .with_context(|| format!("Failed to read config: {}", path.as_ref().display()))?;
    let config: ClassifyConfig = serde_json::from_str(&content)
        .with_context(|| format!("Failed to parse config: {}", path.as_ref().display()))?;
    Ok(config)
}

/// The `classify` subcommand definition.
pub fn classify_command() -> Command {
    Command::new("classify")
        .about("Train, evaluate and compare cancellation classifiers on an engineered dataset")
        .arg(
            Arg::new("config")
                .help("Path to a JSON run configuration")
                .required(false)
                .value_parser(clap::value_parser!(PathBuf))
                .value_hint(ValueHint::FilePath),
        )
        .arg(
            Arg::new("data")
                .short('d')
                .long("data")
                .help("Engineered input data (*.csv or *.tsv). Overrides the config file.")
                .value_parser(clap::value_parser!(PathBuf))
                .value_hint(ValueHint::FilePath),
        )
        .arg(
            Arg::new("target")
                .short('t')
                .long("target")
                .help("Name of the binary target column")
                .value_parser(clap::builder::NonEmptyStringValueParser::new()),
        )
        .arg(
            Arg::new("output_file")
                .short('o')
                .long("output")
                .help("CSV file receiving per-row predictions and metrics")
                .value_parser(clap::value_parser!(PathBuf))
                .value_hint(ValueHint::FilePath),
        )
        .arg(
            Arg::new("test_size")
                .long("test-size")
                .help("Fraction of rows held out for testing, in (0, 1)")
                .value_parser(clap::value_parser!(f64)),
        )
        .arg(
            Arg::new("seed")
                .long("seed")
                .help("Seed for the split and the random forest")
                .value_parser(clap::value_parser!(u64)),
        )
        .arg(
            Arg::new("models")
                .short('m')
                .long("models")
                .help("Comma separated models to compare: logistic, tree, forest, svm")
                .value_delimiter(',')
                .num_args(1..)
                .value_hint(ValueHint::Other),
        )
        .arg(
            Arg::new("ignore")
                .long("ignore")
                .help("Comma separated columns to exclude from the features")
                .value_delimiter(',')
                .num_args(1..),
        )
        .arg(
            Arg::new("plot_dir")
                .long("plot-dir")
                .help("Directory receiving the figures as HTML files")
                .value_parser(clap::value_parser!(PathBuf))
                .value_hint(ValueHint::DirPath),
        )
        .arg(
            Arg::new("no_stratify")
                .long("no-stratify")
                .help("Split without preserving the label proportions")
                .action(ArgAction::SetTrue),
        )
        .arg(
            Arg::new("show_plots")
                .long("show-plots")
                .help("Open every figure in the default browser")
                .action(ArgAction::SetTrue),
        )
        .arg(
            Arg::new("no_report")
                .long("no-report")
                .help("Disable HTML report generation.")
                .action(ArgAction::SetTrue),
        )
}

/// Outcome of a completed run.
#[derive(Debug)]
pub struct RunSummary {
    pub n_rows: usize,
    pub n_train: usize,
    pub n_test: usize,
    pub comparison: ModelComparison,
    pub output_file: PathBuf,
    /// `false` when writing the results CSV failed
    pub exported: bool,
    pub plot_files: Vec<PathBuf>,
    pub report_file: Option<PathBuf>,
}

/// A rendered figure and the file stem it is saved under.
pub(crate) struct Figure {
    /// Display name of the model the figure belongs to; `None` for
    /// figures covering every model
    pub model: Option<String>,
    pub stem: String,
    pub plot: Plot,
}

/// Load, split, train and evaluate every configured model, compare them and
/// export the per-row results.
///
/// Load, split and model errors abort the run. Failing to write the results
/// CSV, a figure or the report is logged and the run still succeeds.
pub fn run_classification(config: &ClassifyConfig) -> Result<RunSummary> {
    if config.models.is_empty() {
        bail!("No models configured");
    }
    ensure_unique_names(&config.models).context("Invalid model configuration")?;

    let reader_config = CsvReaderConfig {
        target_column: config.target_column.clone(),
        ignore_columns: config.ignore_columns.clone(),
        ..CsvReaderConfig::default()
    };
    let dataset = read_flight_csv_with_config(&config.data_path, &reader_config)?;
    dataset.log_input_data_summary();

    let split = train_test_split(&dataset, config.test_size, config.seed, config.stratify)?;
    split.log_split_summary();
    println!(
        "Training set: {} rows, test set: {} rows",
        split.n_train(),
        split.n_test()
    );
    println!();

    let mut evaluations: Vec<ModelEvaluation> = Vec::with_capacity(config.models.len());
    let mut figures: Vec<Figure> = Vec::new();
    for model_config in &config.models {
        let mut model = build_model(model_config.clone(), config.seed);
        let evaluation = train_and_evaluate(model.as_mut(), &split)?;
        evaluation.print_report();
        figures.extend(model_figures(&evaluation, &split));
        evaluations.push(evaluation);
    }

    let records: Vec<MetricRecord> = evaluations.iter().map(|e| e.metrics.clone()).collect();
    let comparison = ModelComparison::from_records(&records);
    println!("Model Comparison:");
    println!("{}", comparison);
    figures.push(Figure {
        model: None,
        stem: "model_comparison".to_string(),
        plot: plot_metric_comparison(&records),
    });

    let plot_files = render_figures(&figures, config);

    let table = ResultTable::assemble(&split, &evaluations)?;
    let exported = export_results(&table, &config.output_file);
    println!();
    println!("Results preview:");
    println!("{}", table.preview(5));

    let report_file = config.report_file.as_ref().and_then(|path| {
        match write_run_report(path, config, &dataset, &split, &evaluations, &comparison, &figures) {
            Ok(()) => Some(path.clone()),
            Err(e) => {
                log::warn!("Failed to write report: {:#}", e);
                None
            }
        }
    });

    Ok(RunSummary {
        n_rows: dataset.nrows(),
        n_train: split.n_train(),
        n_test: split.n_test(),
        comparison,
        output_file: config.output_file.clone(),
        exported,
        plot_files,
        report_file,
    })
}

fn model_figures(evaluation: &ModelEvaluation, split: &TrainTestSplit) -> Vec<Figure> {
    let mut figures = vec![Figure {
        model: Some(evaluation.name.clone()),
        stem: format!("confusion_matrix_{}", evaluation.name),
        plot: plot_confusion_matrix(&evaluation.confusion_matrix, &evaluation.name),
    }];
    if let Some(probabilities) = &evaluation.probabilities {
        let title = format!("Score Distribution - {}", evaluation.name);
        match plot_score_histogram(probabilities, &split.y_test, &title) {
            Ok(plot) => figures.push(Figure {
                model: Some(evaluation.name.clone()),
                stem: format!("score_distribution_{}", evaluation.name),
                plot,
            }),
            Err(e) => log::warn!("Skipping score histogram for {}: {}", evaluation.name, e),
        }
    }
    figures
}

/// Write every figure into the plot directory and open them when requested.
fn render_figures(figures: &[Figure], config: &ClassifyConfig) -> Vec<PathBuf> {
    let mut written = Vec::new();
    for figure in figures {
        match &config.plot_dir {
            Some(dir) => match save_plot_html(&figure.plot, dir, &figure.stem, config.show_plots) {
                Ok(path) => written.push(path),
                Err(e) => log::warn!("Failed to write plot {}: {:#}", figure.stem, e),
            },
            None if config.show_plots => figure.plot.show(),
            None => {}
        }
    }
    if let Some(dir) = &config.plot_dir {
        log::info!("Wrote {} figures to {}", written.len(), dir.display());
    }
    written
}

pub(crate) fn dataset_overview(dataset: &FlightDataset, split: &TrainTestSplit) -> Vec<(String, String)> {
    let (negatives, positives) = dataset.class_counts();
    vec![
        ("Rows".to_string(), dataset.nrows().to_string()),
        ("Features".to_string(), dataset.n_features().to_string()),
        ("Target".to_string(), dataset.target_name.clone()),
        (
            "Not cancelled".to_string(),
            format!("{} ({:.2}%)", negatives, 100.0 - dataset.positive_fraction() * 100.0),
        ),
        (
            "Cancelled".to_string(),
            format!("{} ({:.2}%)", positives, dataset.positive_fraction() * 100.0),
        ),
        ("Training rows".to_string(), split.n_train().to_string()),
        ("Test rows".to_string(), split.n_test().to_string()),
    ]
}
