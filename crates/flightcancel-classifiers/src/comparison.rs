//! Side-by-side table of the per-model metrics.
use std::fmt;

use crate::metrics::{MetricRecord, METRIC_NAMES};

/// Metric table keyed by model name, in the order the models were run.
///
/// This is presentation only: no ranking or best-model choice is derived.
#[derive(Debug, Clone, Default)]
pub struct ModelComparison {
    records: Vec<MetricRecord>,
}

impl ModelComparison {
    pub fn from_records(records: &[MetricRecord]) -> Self {
        ModelComparison {
            records: records.to_vec(),
        }
    }

    pub fn records(&self) -> &[MetricRecord] {
        &self.records
    }

    pub fn get(&self, model: &str) -> Option<&MetricRecord> {
        self.records.iter().find(|r| r.model == model)
    }

    pub fn model_names(&self) -> Vec<&str> {
        self.records.iter().map(|r| r.model.as_str()).collect()
    }
}

impl fmt::Display for ModelComparison {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let width = self
            .records
            .iter()
            .map(|r| r.model.len())
            .max()
            .unwrap_or(5)
            .max("Model".len());

        write!(f, "{:<width$}", "Model", width = width)?;
        for metric in METRIC_NAMES {
            write!(f, " {:>10}", metric)?;
        }
        writeln!(f)?;
        for record in &self.records {
            write!(f, "{:<width$}", record.model, width = width)?;
            for value in record.values() {
                write!(f, " {:>10.4}", value)?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}
