//! Data structures and helpers for holding and partitioning the dataset.
//!
//! This module defines `FlightDataset`, the in-memory feature matrix with its
//! binary cancellation labels, the console summaries printed after loading,
//! and the seeded (optionally stratified) train/test split.
use std::fmt::Write as _;

use anyhow::{bail, Result};
use ndarray::{Array1, Array2, Axis};
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;

use crate::error::ClassifierError;

/// How a column's raw text was interpreted while loading.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColumnKind {
    Numeric,
    /// `true`/`false` text mapped to 1.0/0.0
    Boolean,
    /// The binary target column
    Label,
}

impl ColumnKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ColumnKind::Numeric => "float64",
            ColumnKind::Boolean => "bool",
            ColumnKind::Label => "label",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnSummary {
    pub name: String,
    pub kind: ColumnKind,
    pub non_null: usize,
}

#[derive(Debug, Clone)]
pub struct FlightDataset {
    /// Feature matrix, one row per flight
    pub x: Array2<f64>,
    /// `true` when the flight was cancelled
    pub y: Array1<bool>,
    /// Position of each row among the data rows of the source file
    pub row_index: Vec<usize>,
    pub feature_names: Vec<String>,
    pub target_name: String,
    pub schema: Vec<ColumnSummary>,
}

impl FlightDataset {
    pub fn new(
        x: Array2<f64>,
        y: Array1<bool>,
        feature_names: Vec<String>,
        target_name: &str,
    ) -> Result<Self> {
        if x.nrows() != y.len() {
            return Err(ClassifierError::LengthMismatch {
                expected: x.nrows(),
                found: y.len(),
            }
            .into());
        }
        if x.ncols() != feature_names.len() {
            bail!(
                "Feature matrix has {} columns but {} feature names were given",
                x.ncols(),
                feature_names.len()
            );
        }

        let n_rows = x.nrows();
        let mut schema: Vec<ColumnSummary> = feature_names
            .iter()
            .map(|name| ColumnSummary {
                name: name.clone(),
                kind: ColumnKind::Numeric,
                non_null: n_rows,
            })
            .collect();
        schema.push(ColumnSummary {
            name: target_name.to_string(),
            kind: ColumnKind::Label,
            non_null: n_rows,
        });

        Ok(FlightDataset {
            x,
            y,
            row_index: (0..n_rows).collect(),
            feature_names,
            target_name: target_name.to_string(),
            schema,
        })
    }

    pub fn with_schema(mut self, schema: Vec<ColumnSummary>) -> Self {
        self.schema = schema;
        self
    }

    pub fn nrows(&self) -> usize {
        self.x.nrows()
    }

    pub fn n_features(&self) -> usize {
        self.x.ncols()
    }

    /// Number of (not cancelled, cancelled) rows.
    pub fn class_counts(&self) -> (usize, usize) {
        let positives = self.y.iter().filter(|&&v| v).count();
        (self.y.len() - positives, positives)
    }

    pub fn positive_fraction(&self) -> f64 {
        if self.y.is_empty() {
            return 0.0;
        }
        self.class_counts().1 as f64 / self.y.len() as f64
    }

    pub fn log_input_data_summary(&self) {
        println!("----- Input Data Summary -----");
        println!(
            "Info: {} rows, {} feature columns plus target '{}'",
            self.nrows(),
            self.n_features(),
            self.target_name
        );
        println!();
        println!("{}", self.preview(5));
        println!("{}", self.schema_info());
        println!("{}", self.class_distribution());
        println!("-------------------------------");
    }

    /// First `n` rows as a fixed-width text table. Wide tables show the
    /// first and last few feature columns only.
    pub fn preview(&self, n: usize) -> String {
        const EDGE_COLUMNS: usize = 4;

        let n_features = self.n_features();
        let shown: Vec<Option<usize>> = if n_features > EDGE_COLUMNS * 2 {
            (0..EDGE_COLUMNS)
                .map(Some)
                .chain(std::iter::once(None))
                .chain((n_features - EDGE_COLUMNS..n_features).map(Some))
                .collect()
        } else {
            (0..n_features).map(Some).collect()
        };

        let mut out = String::new();
        let _ = write!(out, "{:>6}", "");
        for col in &shown {
            match col {
                Some(c) => {
                    let _ = write!(out, " {:>14}", truncate(&self.feature_names[*c], 14));
                }
                None => out.push_str("    ..."),
            }
        }
        let _ = writeln!(out, " {:>10}", truncate(&self.target_name, 10));

        for row in 0..n.min(self.nrows()) {
            let _ = write!(out, "{:>6}", self.row_index[row]);
            for col in &shown {
                match col {
                    Some(c) => {
                        let _ = write!(out, " {:>14.4}", self.x[(row, *c)]);
                    }
                    None => out.push_str("    ..."),
                }
            }
            let _ = writeln!(out, " {:>10}", self.y[row] as u8);
        }
        let _ = write!(
            out,
            "[{} rows x {} columns]",
            self.nrows(),
            n_features + 1
        );
        out
    }

    pub fn schema_info(&self) -> String {
        let mut out = String::new();
        let _ = writeln!(out, "Data columns (total {} columns):", self.schema.len());
        let _ = writeln!(out, " {:>3}  {:<32} {:>14}  {}", "#", "Column", "Non-Null Count", "Kind");
        for (i, column) in self.schema.iter().enumerate() {
            let _ = writeln!(
                out,
                " {:>3}  {:<32} {:>14}  {}",
                i,
                truncate(&column.name, 32),
                format!("{} non-null", column.non_null),
                column.kind.as_str()
            );
        }
        out
    }

    pub fn class_distribution(&self) -> String {
        let (negatives, positives) = self.class_counts();
        let total = self.nrows().max(1) as f64;
        format!(
            "Class distribution ({}):\n  0 (not cancelled): {:>8} ({:.2}%)\n  1 (cancelled):     {:>8} ({:.2}%)",
            self.target_name,
            negatives,
            negatives as f64 / total * 100.0,
            positives,
            positives as f64 / total * 100.0
        )
    }
}

fn truncate(s: &str, width: usize) -> String {
    if s.chars().count() <= width {
        s.to_string()
    } else {
        let mut t: String = s.chars().take(width.saturating_sub(1)).collect();
        t.push('~');
        t
    }
}

/// Train/test partition of a `FlightDataset`.
#[derive(Debug, Clone)]
pub struct TrainTestSplit {
    pub x_train: Array2<f64>,
    pub x_test: Array2<f64>,
    pub y_train: Array1<bool>,
    pub y_test: Array1<bool>,
    /// Original row index of each training row
    pub train_index: Vec<usize>,
    /// Original row index of each test row
    pub test_index: Vec<usize>,
}

impl TrainTestSplit {
    pub fn n_train(&self) -> usize {
        self.y_train.len()
    }

    pub fn n_test(&self) -> usize {
        self.y_test.len()
    }

    pub fn log_split_summary(&self) {
        let train_pos = self.y_train.iter().filter(|&&v| v).count();
        let test_pos = self.y_test.iter().filter(|&&v| v).count();
        log::info!(
            "Split into {} training rows ({} cancelled) and {} test rows ({} cancelled)",
            self.n_train(),
            train_pos,
            self.n_test(),
            test_pos
        );
    }
}

/// Split `dataset` into train and test subsets.
///
/// `n_test = ceil(test_size * n)` rows go to the test subset. With `stratify`
/// the per-class test quotas follow the class proportions of the full
/// dataset. The assignment is fully determined by `seed`; the row order
/// inside each subset is shuffled.
///
/// # Arguments
///
/// * `dataset` - The rows to partition
/// * `test_size` - Fraction of rows held out for testing, in (0, 1)
/// * `seed` - Seed for the shuffling RNG
/// * `stratify` - Preserve label proportions in both subsets
pub fn train_test_split(
    dataset: &FlightDataset,
    test_size: f64,
    seed: u64,
    stratify: bool,
) -> Result<TrainTestSplit> {
    if !(test_size > 0.0 && test_size < 1.0) {
        return Err(ClassifierError::InvalidTestSize(test_size).into());
    }

    let n_samples = dataset.nrows();
    let n_test = (test_size * n_samples as f64).ceil() as usize;
    let n_train = n_samples.saturating_sub(n_test);
    if n_test == 0 || n_train == 0 {
        bail!(
            "With {} rows and test_size={}, the resulting train set would be empty",
            n_samples,
            test_size
        );
    }

    let mut rng = StdRng::seed_from_u64(seed);

    let (mut train_idx, mut test_idx) = if stratify {
        stratified_indices(&dataset.y, n_test, &mut rng)?
    } else {
        let mut indices: Vec<usize> = (0..n_samples).collect();
        indices.shuffle(&mut rng);
        let train = indices.split_off(n_test);
        (train, indices)
    };

    train_idx.shuffle(&mut rng);
    test_idx.shuffle(&mut rng);

    log::debug!(
        "train_test_split: n={} n_train={} n_test={} seed={} stratify={}",
        n_samples,
        train_idx.len(),
        test_idx.len(),
        seed,
        stratify
    );

    Ok(TrainTestSplit {
        x_train: dataset.x.select(Axis(0), &train_idx),
        x_test: dataset.x.select(Axis(0), &test_idx),
        y_train: dataset.y.select(Axis(0), &train_idx),
        y_test: dataset.y.select(Axis(0), &test_idx),
        train_index: train_idx.iter().map(|&i| dataset.row_index[i]).collect(),
        test_index: test_idx.iter().map(|&i| dataset.row_index[i]).collect(),
    })
}

/// Returns (train, test) positions with per-class test quotas proportional
/// to the class sizes.
fn stratified_indices(
    y: &Array1<bool>,
    n_test: usize,
    rng: &mut StdRng,
) -> Result<(Vec<usize>, Vec<usize>)> {
    let n_samples = y.len();

    // index 0 holds the negatives, index 1 the positives
    let mut members: [Vec<usize>; 2] = [Vec::new(), Vec::new()];
    for (i, &label) in y.iter().enumerate() {
        members[label as usize].push(i);
    }

    for (class, rows) in members.iter().enumerate() {
        if rows.is_empty() {
            return Err(ClassifierError::SingleClass(class == 0).into());
        }
        if rows.len() < 2 {
            return Err(ClassifierError::InsufficientClassMembers(class == 1, rows.len()).into());
        }
    }

    let n_train = n_samples - n_test;
    if n_test < members.len() || n_train < members.len() {
        bail!(
            "Stratified split needs at least {} rows on each side, got {} train / {} test",
            members.len(),
            n_train,
            n_test
        );
    }

    let exact: Vec<f64> = members
        .iter()
        .map(|rows| n_test as f64 * rows.len() as f64 / n_samples as f64)
        .collect();
    let mut quotas: Vec<usize> = exact.iter().map(|v| v.floor() as usize).collect();

    let mut leftover = n_test - quotas.iter().sum::<usize>();
    let mut by_remainder: Vec<usize> = (0..members.len()).collect();
    // stable sort keeps class order on ties
    by_remainder.sort_by(|&a, &b| {
        let ra = exact[a] - exact[a].floor();
        let rb = exact[b] - exact[b].floor();
        rb.partial_cmp(&ra).unwrap_or(std::cmp::Ordering::Equal)
    });
    // every class keeps at least one training row; the caps sum to
    // n - 2 >= n_test, so the loop always terminates
    for &class in by_remainder.iter().cycle() {
        if leftover == 0 {
            break;
        }
        if quotas[class] < members[class].len() - 1 {
            quotas[class] += 1;
            leftover -= 1;
        }
    }

    let mut train = Vec::with_capacity(n_train);
    let mut test = Vec::with_capacity(n_test);
    for (class, rows) in members.iter_mut().enumerate() {
        rows.shuffle(rng);
        test.extend_from_slice(&rows[..quotas[class]]);
        train.extend_from_slice(&rows[quotas[class]..]);
    }

    Ok((train, test))
}
