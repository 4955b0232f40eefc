//! Fit a model on the training subset and score it on the test subset.
use std::time::Instant;

use anyhow::{Context, Result};
use ndarray::Array1;

use crate::data_handling::TrainTestSplit;
use crate::error::ClassifierError;
use crate::metrics::{ClassificationReport, ConfusionMatrix, MetricRecord};
use crate::models::ClassifierModel;

/// Everything a run keeps about one fitted model.
#[derive(Debug, Clone)]
pub struct ModelEvaluation {
    pub name: String,
    /// Predicted label for each test row, aligned with `TrainTestSplit::test_index`
    pub predictions: Array1<bool>,
    /// Positive-class probabilities when the model provides them
    pub probabilities: Option<Array1<f64>>,
    pub confusion_matrix: ConfusionMatrix,
    pub metrics: MetricRecord,
    pub report: ClassificationReport,
}

impl ModelEvaluation {
    pub fn print_report(&self) {
        println!("===== {} =====", self.name);
        println!(
            "Accuracy: {:.4}  Precision: {:.4}  Recall: {:.4}  F1: {:.4}",
            self.metrics.accuracy, self.metrics.precision, self.metrics.recall, self.metrics.f1
        );
        println!();
        println!("Classification Report:");
        println!("{}", self.report);
        let [[tn, fp], [fn_, tp]] = self.confusion_matrix.as_grid();
        println!("Confusion Matrix (rows = actual, columns = predicted):");
        println!("  [[{:>6} {:>6}]", tn, fp);
        println!("   [{:>6} {:>6}]]", fn_, tp);
        println!();
    }
}

/// Fit `model` on the training rows of `split`, predict the test rows and
/// compute the metrics. Errors from fitting or predicting propagate.
pub fn train_and_evaluate(
    model: &mut dyn ClassifierModel,
    split: &TrainTestSplit,
) -> Result<ModelEvaluation> {
    let name = model.name().to_string();
    log::info!("Training {} on {} rows", name, split.n_train());

    let start = Instant::now();
    model
        .fit(&split.x_train, &split.y_train)
        .with_context(|| format!("Training {} failed", name))?;
    log::debug!("{}: fit took {:?}", name, start.elapsed());

    let start = Instant::now();
    let (predictions, probabilities) = model
        .predict_with_proba(&split.x_test)
        .with_context(|| format!("Prediction with {} failed", name))?;
    log::debug!("{}: predict took {:?}", name, start.elapsed());

    if predictions.len() != split.n_test() {
        return Err(ClassifierError::LengthMismatch {
            expected: split.n_test(),
            found: predictions.len(),
        }
        .into());
    }

    let confusion_matrix = ConfusionMatrix::from_predictions(
        &predictions.to_vec(),
        &split.y_test.to_vec(),
    )?;
    let metrics = MetricRecord::from_confusion_matrix(&name, &confusion_matrix);
    let report = ClassificationReport::from_confusion_matrix(&confusion_matrix);

    log::info!(
        "{}: accuracy={:.4} precision={:.4} recall={:.4} f1={:.4}",
        name,
        metrics.accuracy,
        metrics.precision,
        metrics.recall,
        metrics.f1
    );

    Ok(ModelEvaluation {
        name,
        predictions,
        probabilities,
        confusion_matrix,
        metrics,
        report,
    })
}
