//! Binary classification metrics.
//!
//! The positive class is a cancelled flight (`true`). Ratios with a zero
//! denominator evaluate to 0.0.
use std::fmt;

use anyhow::Result;

use crate::error::ClassifierError;

/// Confusion matrix for binary classification
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ConfusionMatrix {
    /// Not cancelled, predicted not cancelled
    pub tn: usize,
    /// Not cancelled, predicted cancelled
    pub fp: usize,
    /// Cancelled, predicted not cancelled
    pub fn_: usize,
    /// Cancelled, predicted cancelled
    pub tp: usize,
}

impl ConfusionMatrix {
    /// Create from predictions and ground truth labels
    pub fn from_predictions(predictions: &[bool], ground_truth: &[bool]) -> Result<Self> {
        if predictions.len() != ground_truth.len() {
            return Err(ClassifierError::LengthMismatch {
                expected: ground_truth.len(),
                found: predictions.len(),
            }
            .into());
        }

        let mut matrix = Self::default();
        for (&pred, &truth) in predictions.iter().zip(ground_truth.iter()) {
            match (truth, pred) {
                (false, false) => matrix.tn += 1,
                (false, true) => matrix.fp += 1,
                (true, false) => matrix.fn_ += 1,
                (true, true) => matrix.tp += 1,
            }
        }
        Ok(matrix)
    }

    pub fn total(&self) -> usize {
        self.tn + self.fp + self.fn_ + self.tp
    }

    /// Rows are actual labels, columns predicted labels, both ordered
    /// (not cancelled, cancelled).
    pub fn as_grid(&self) -> [[usize; 2]; 2] {
        [[self.tn, self.fp], [self.fn_, self.tp]]
    }

    pub fn accuracy(&self) -> f64 {
        ratio(self.tp + self.tn, self.total())
    }

    pub fn precision(&self) -> f64 {
        ratio(self.tp, self.tp + self.fp)
    }

    pub fn recall(&self) -> f64 {
        ratio(self.tp, self.tp + self.fn_)
    }

    pub fn f1_score(&self) -> f64 {
        harmonic_mean(self.precision(), self.recall())
    }

    /// Precision of the negative class: TN / (TN + FN)
    pub fn negative_predictive_value(&self) -> f64 {
        ratio(self.tn, self.tn + self.fn_)
    }

    /// Recall of the negative class: TN / (TN + FP)
    pub fn specificity(&self) -> f64 {
        ratio(self.tn, self.tn + self.fp)
    }
}

fn ratio(numerator: usize, denominator: usize) -> f64 {
    if denominator == 0 {
        return 0.0;
    }
    numerator as f64 / denominator as f64
}

fn harmonic_mean(a: f64, b: f64) -> f64 {
    let denom = a + b;
    if denom == 0.0 {
        return 0.0;
    }
    2.0 * a * b / denom
}

/// Metric names in export order.
pub const METRIC_NAMES: [&str; 4] = ["Accuracy", "Precision", "Recall", "F1"];

/// Aggregate scores of one model on the test subset.
#[derive(Debug, Clone, PartialEq)]
pub struct MetricRecord {
    pub model: String,
    pub accuracy: f64,
    pub precision: f64,
    pub recall: f64,
    pub f1: f64,
}

impl MetricRecord {
    pub fn from_confusion_matrix(model: &str, cm: &ConfusionMatrix) -> Self {
        MetricRecord {
            model: model.to_string(),
            accuracy: cm.accuracy(),
            precision: cm.precision(),
            recall: cm.recall(),
            f1: cm.f1_score(),
        }
    }

    /// Scores in `METRIC_NAMES` order.
    pub fn values(&self) -> [f64; 4] {
        [self.accuracy, self.precision, self.recall, self.f1]
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ClassMetrics {
    pub precision: f64,
    pub recall: f64,
    pub f1_score: f64,
    pub support: usize,
}

/// Per-class precision/recall/F1/support with overall accuracy and the
/// macro and support-weighted averages.
#[derive(Debug, Clone)]
pub struct ClassificationReport {
    pub not_cancelled: ClassMetrics,
    pub cancelled: ClassMetrics,
    pub accuracy: f64,
    pub macro_avg: ClassMetrics,
    pub weighted_avg: ClassMetrics,
}

impl ClassificationReport {
    pub fn from_confusion_matrix(cm: &ConfusionMatrix) -> Self {
        let not_cancelled = ClassMetrics {
            precision: cm.negative_predictive_value(),
            recall: cm.specificity(),
            f1_score: harmonic_mean(cm.negative_predictive_value(), cm.specificity()),
            support: cm.tn + cm.fp,
        };
        let cancelled = ClassMetrics {
            precision: cm.precision(),
            recall: cm.recall(),
            f1_score: cm.f1_score(),
            support: cm.tp + cm.fn_,
        };

        let total = cm.total();
        let macro_avg = ClassMetrics {
            precision: (not_cancelled.precision + cancelled.precision) / 2.0,
            recall: (not_cancelled.recall + cancelled.recall) / 2.0,
            f1_score: (not_cancelled.f1_score + cancelled.f1_score) / 2.0,
            support: total,
        };
        let weighted = |a: f64, b: f64| {
            if total == 0 {
                0.0
            } else {
                (a * not_cancelled.support as f64 + b * cancelled.support as f64) / total as f64
            }
        };
        let weighted_avg = ClassMetrics {
            precision: weighted(not_cancelled.precision, cancelled.precision),
            recall: weighted(not_cancelled.recall, cancelled.recall),
            f1_score: weighted(not_cancelled.f1_score, cancelled.f1_score),
            support: total,
        };

        ClassificationReport {
            not_cancelled,
            cancelled,
            accuracy: cm.accuracy(),
            macro_avg,
            weighted_avg,
        }
    }
}

impl fmt::Display for ClassificationReport {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        writeln!(
            f,
            "{:>20} {:>10} {:>10} {:>10} {:>10}",
            "", "precision", "recall", "f1-score", "support"
        )?;
        writeln!(f)?;
        for (label, m) in [("0 (not cancelled)", &self.not_cancelled), ("1 (cancelled)", &self.cancelled)] {
            writeln!(
                f,
                "{:>20} {:>10.2} {:>10.2} {:>10.2} {:>10}",
                label, m.precision, m.recall, m.f1_score, m.support
            )?;
        }
        writeln!(f)?;
        writeln!(
            f,
            "{:>20} {:>10} {:>10} {:>10.2} {:>10}",
            "accuracy", "", "", self.accuracy, self.macro_avg.support
        )?;
        for (label, m) in [("macro avg", &self.macro_avg), ("weighted avg", &self.weighted_avg)] {
            writeln!(
                f,
                "{:>20} {:>10.2} {:>10.2} {:>10.2} {:>10}",
                label, m.precision, m.recall, m.f1_score, m.support
            )?;
        }
        Ok(())
    }
}
