//! Wide per-row results table and its CSV export.
//!
//! One row per test example: the original row index, the true label, one
//! predicted label per model, then every model's four metrics repeated on
//! every row.
use std::collections::HashSet;
use std::fmt::Write as _;
use std::fs::File;
use std::io::BufWriter;
use std::path::Path;

use anyhow::{Context, Result};

use crate::data_handling::TrainTestSplit;
use crate::error::ClassifierError;
use crate::evaluation::ModelEvaluation;
use crate::metrics::METRIC_NAMES;

#[derive(Debug, Clone, PartialEq)]
pub enum Cell {
    Index(usize),
    Label(bool),
    Metric(f64),
}

impl Cell {
    fn render(&self) -> String {
        match self {
            Cell::Index(i) => i.to_string(),
            Cell::Label(label) => (*label as u8).to_string(),
            Cell::Metric(value) => value.to_string(),
        }
    }

    fn render_short(&self) -> String {
        match self {
            Cell::Metric(value) => format!("{:.4}", value),
            other => other.render(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct ResultTable {
    pub columns: Vec<String>,
    pub rows: Vec<Vec<Cell>>,
}

impl ResultTable {
    /// Assemble the table from the split and the per-model evaluations, in
    /// evaluation order. Evaluation names must be unique.
    pub fn assemble(split: &TrainTestSplit, evaluations: &[ModelEvaluation]) -> Result<Self> {
        let n_test = split.n_test();
        let mut names = HashSet::new();
        for evaluation in evaluations {
            if !names.insert(evaluation.name.as_str()) {
                return Err(ClassifierError::DuplicateModelName(evaluation.name.clone()).into());
            }
        }
        for evaluation in evaluations {
            if evaluation.predictions.len() != n_test {
                return Err(ClassifierError::LengthMismatch {
                    expected: n_test,
                    found: evaluation.predictions.len(),
                })
                .with_context(|| format!("Predictions of {} do not cover the test set", evaluation.name));
            }
        }

        let mut columns = vec!["Test_Index".to_string(), "Actual".to_string()];
        for evaluation in evaluations {
            columns.push(format!("{}_Prediction", evaluation.name));
        }
        for evaluation in evaluations {
            for metric in METRIC_NAMES {
                columns.push(format!("{}_{}", evaluation.name, metric));
            }
        }

        let metric_cells: Vec<Cell> = evaluations
            .iter()
            .flat_map(|e| e.metrics.values())
            .map(Cell::Metric)
            .collect();

        let rows = (0..n_test)
            .map(|i| {
                let mut row = Vec::with_capacity(columns.len());
                row.push(Cell::Index(split.test_index[i]));
                row.push(Cell::Label(split.y_test[i]));
                for evaluation in evaluations {
                    row.push(Cell::Label(evaluation.predictions[i]));
                }
                row.extend(metric_cells.iter().cloned());
                row
            })
            .collect();

        Ok(ResultTable { columns, rows })
    }

    pub fn nrows(&self) -> usize {
        self.rows.len()
    }

    pub fn ncols(&self) -> usize {
        self.columns.len()
    }

    /// Write the table as CSV with a header row.
    pub fn write_csv<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let path = path.as_ref();
        let file = File::create(path)
            .with_context(|| format!("Failed to create output file: {}", path.display()))?;
        let mut writer = csv::WriterBuilder::new().from_writer(BufWriter::new(file));

        writer.write_record(&self.columns)?;
        for row in &self.rows {
            writer.write_record(row.iter().map(Cell::render))?;
        }
        writer
            .flush()
            .with_context(|| format!("Failed to flush output file: {}", path.display()))?;
        Ok(())
    }

    /// First `n` rows as text, metrics rounded to four decimals.
    pub fn preview(&self, n: usize) -> String {
        let rendered: Vec<Vec<String>> = self
            .rows
            .iter()
            .take(n)
            .map(|row| row.iter().map(Cell::render_short).collect())
            .collect();
        let widths: Vec<usize> = self
            .columns
            .iter()
            .enumerate()
            .map(|(c, name)| {
                rendered
                    .iter()
                    .map(|row| row[c].len())
                    .max()
                    .unwrap_or(0)
                    .max(name.len())
            })
            .collect();

        let mut out = String::new();
        for (name, width) in self.columns.iter().zip(&widths) {
            let _ = write!(out, "{:>width$} ", name, width = width);
        }
        out = out.trim_end().to_string();
        out.push('\n');
        for row in &rendered {
            let line: Vec<String> = row
                .iter()
                .zip(&widths)
                .map(|(cell, width)| format!("{:>width$}", cell, width = width))
                .collect();
            out.push_str(&line.join(" "));
            out.push('\n');
        }
        let _ = write!(out, "[{} rows x {} columns]", self.nrows(), self.ncols());
        out
    }
}

/// Write `table` to `path`. A failed write is logged and reported through
/// the return value instead of aborting the run.
pub fn export_results<P: AsRef<Path>>(table: &ResultTable, path: P) -> bool {
    let path = path.as_ref();
    match table.write_csv(path) {
        Ok(()) => {
            log::info!(
                "Wrote {} result rows ({} columns) to {}",
                table.nrows(),
                table.ncols(),
                path.display()
            );
            println!("Results saved to {}", path.display());
            true
        }
        Err(e) => {
            log::error!("Failed to export results: {:#}", e);
            println!("Error saving results to {}: {:#}", path.display(), e);
            false
        }
    }
}
