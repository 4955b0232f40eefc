use ndarray::Array1;
use plotly::common::{ColorScale, ColorScalePalette};
use plotly::layout::{Axis, BarMode, Layout};
use plotly::{Bar, HeatMap, Histogram, Plot};

use crate::metrics::{ConfusionMatrix, MetricRecord, METRIC_NAMES};

const CLASS_NAMES: [&str; 2] = ["Not Cancelled", "Cancelled"];

/// Heatmap of a 2x2 confusion matrix. Rows are actual labels, columns are
/// predicted labels; "Not Cancelled" is drawn on top.
pub fn plot_confusion_matrix(cm: &ConfusionMatrix, model: &str) -> Plot {
    let [[tn, fp], [fn_, tp]] = cm.as_grid();

    // plotly draws the first heatmap row at the bottom
    let y = vec![CLASS_NAMES[1], CLASS_NAMES[0]];
    let z = vec![vec![fn_, tp], vec![tn, fp]];

    let trace = HeatMap::new(CLASS_NAMES.to_vec(), y, z)
        .name(model)
        .color_scale(ColorScale::Palette(ColorScalePalette::Blues));

    let layout = Layout::new()
        .title(format!("Confusion Matrix - {}", model).as_str())
        .x_axis(Axis::new().title("Predicted"))
        .y_axis(Axis::new().title("Actual"));

    let mut plot = Plot::new();
    plot.add_trace(trace);
    plot.set_layout(layout);
    plot
}

/// Grouped bar chart: one group per model, one bar per metric.
pub fn plot_metric_comparison(records: &[MetricRecord]) -> Plot {
    let models: Vec<String> = records.iter().map(|r| r.model.clone()).collect();

    let mut plot = Plot::new();
    for (m, metric) in METRIC_NAMES.iter().enumerate() {
        let values: Vec<f64> = records.iter().map(|r| r.values()[m]).collect();
        plot.add_trace(Bar::new(models.clone(), values).name(metric));
    }

    plot.set_layout(
        Layout::new()
            .title("Model Performance Comparison")
            .bar_mode(BarMode::Group)
            .x_axis(Axis::new().title("Model"))
            .y_axis(Axis::new().title("Score")),
    );
    plot
}

/// Plot overlaid histograms of the positive-class probability for cancelled
/// and not-cancelled test rows.
pub fn plot_score_histogram(
    probabilities: &Array1<f64>,
    labels: &Array1<bool>,
    title: &str,
) -> Result<Plot, String> {
    if probabilities.len() != labels.len() {
        return Err(format!(
            "Scores and labels must have the same length ({} vs {})",
            probabilities.len(),
            labels.len()
        ));
    }

    let mut scores_cancelled = Vec::new();
    let mut scores_not_cancelled = Vec::new();
    for (&score, &label) in probabilities.iter().zip(labels.iter()) {
        if label {
            scores_cancelled.push(score);
        } else {
            scores_not_cancelled.push(score);
        }
    }

    let trace_not_cancelled = Histogram::new(scores_not_cancelled)
        .name(CLASS_NAMES[0])
        .opacity(0.6);
    let trace_cancelled = Histogram::new(scores_cancelled)
        .name(CLASS_NAMES[1])
        .opacity(0.6);

    let layout = Layout::new()
        .title(title)
        .bar_mode(BarMode::Overlay)
        .x_axis(Axis::new().title("P(cancelled)"))
        .y_axis(Axis::new().title("Count"));

    let mut plot = Plot::new();
    plot.add_trace(trace_not_cancelled);
    plot.add_trace(trace_cancelled);
    plot.set_layout(layout);

    Ok(plot)
}
