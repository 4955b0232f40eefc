//! HTML run report for `flightcancel classify`.
use std::path::Path;

use anyhow::Result;
use maud::html;

use flightcancel_classifiers::comparison::ModelComparison;
use flightcancel_classifiers::data_handling::{FlightDataset, TrainTestSplit};
use flightcancel_classifiers::evaluation::ModelEvaluation;
use flightcancel_classifiers::metrics::METRIC_NAMES;
use flightcancel_classifiers::report::{Report, ReportSection};

use super::classify::{dataset_overview, ClassifyConfig, Figure};

pub(crate) fn write_run_report(
    path: &Path,
    config: &ClassifyConfig,
    dataset: &FlightDataset,
    split: &TrainTestSplit,
    evaluations: &[ModelEvaluation],
    comparison: &ModelComparison,
    figures: &[Figure],
) -> Result<()> {
    let mut report = Report::new(
        "flightcancel",
        env!("CARGO_PKG_VERSION"),
        "Flight Cancellation Classifier Comparison",
    );

    let mut overview = ReportSection::new("Overview");
    overview.add_content(html! {
        p { "Input: " code { (config.data_path.display()) } }
        table {
            @for (key, value) in dataset_overview(dataset, split) {
                tr { th { (key) } td { (value) } }
            }
        }
    });
    report.add_section(overview);

    let mut comparison_section = ReportSection::new("Model Comparison");
    comparison_section.add_content(html! {
        table {
            tr {
                th { "Model" }
                @for metric in METRIC_NAMES { th { (metric) } }
            }
            @for record in comparison.records() {
                tr {
                    td { (record.model) }
                    @for value in record.values() { td { (format!("{:.4}", value)) } }
                }
            }
        }
    });
    if let Some(figure) = figures.iter().find(|f| f.model.is_none()) {
        comparison_section.add_plot(&figure.plot);
    }
    report.add_section(comparison_section);

    for evaluation in evaluations {
        let mut section = ReportSection::new(&evaluation.name);
        section.add_content(html! {
            pre { (evaluation.report.to_string()) }
        });
        for figure in figures_for_model(figures, &evaluation.name) {
            section.add_plot(&figure.plot);
        }
        report.add_section(section);
    }

    let mut config_section = ReportSection::new("Configuration");
    let config_json = serde_json::to_string_pretty(config)?;
    config_section.add_content(html! {
        pre { (config_json) }
    });
    report.add_section(config_section);

    report.save_to_file(path)
}

fn figures_for_model<'a>(figures: &'a [Figure], model: &'a str) -> impl Iterator<Item = &'a Figure> {
    figures
        .iter()
        .filter(move |f| f.model.as_deref() == Some(model))
}
