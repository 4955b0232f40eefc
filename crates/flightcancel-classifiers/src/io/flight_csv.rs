//! Engineered flight dataset CSV/TSV reader.
use std::collections::HashSet;
use std::path::Path;

use anyhow::{anyhow, Context, Result};
use csv::StringRecord;
use ndarray::{Array1, Array2};

use crate::data_handling::{ColumnKind, ColumnSummary, FlightDataset};
use crate::error::ClassifierError;

/// Configuration for reading the engineered dataset.
#[derive(Debug, Clone)]
pub struct CsvReaderConfig {
    /// Column name holding the binary cancellation label.
    pub target_column: String,
    /// Optional list of feature columns to load (in order).
    /// When `None`, all non-target columns are treated as features.
    pub feature_columns: Option<Vec<String>>,
    /// Columns to ignore when auto-selecting features.
    pub ignore_columns: Vec<String>,
    /// Field delimiter. When `None`, `.tsv` paths use tabs and everything
    /// else uses commas.
    pub delimiter: Option<u8>,
}

impl Default for CsvReaderConfig {
    fn default() -> Self {
        Self {
            target_column: "Cancelled".to_string(),
            feature_columns: None,
            ignore_columns: Vec::new(),
            delimiter: None,
        }
    }
}

impl CsvReaderConfig {
    pub fn with_target(target_column: &str) -> Self {
        Self {
            target_column: target_column.to_string(),
            ..Self::default()
        }
    }
}

/// Read the engineered dataset with the default configuration.
pub fn read_flight_csv<P: AsRef<Path>>(path: P) -> Result<FlightDataset> {
    read_flight_csv_with_config(path, &CsvReaderConfig::default())
}

/// Read the engineered dataset using a custom configuration.
///
/// A missing file is reported as `ClassifierError::DataFileNotFound`; every
/// other problem (missing target column, malformed cells, ragged rows) is a
/// contextual `anyhow` error.
pub fn read_flight_csv_with_config<P: AsRef<Path>>(
    path: P,
    config: &CsvReaderConfig,
) -> Result<FlightDataset> {
    let path = path.as_ref();
    if !path.is_file() {
        log::error!("Data file not found: {}", path.display());
        return Err(ClassifierError::DataFileNotFound(path.to_path_buf()).into());
    }

    let delimiter = config.delimiter.unwrap_or_else(|| {
        let is_tsv = path
            .extension()
            .map(|e| e.eq_ignore_ascii_case("tsv"))
            .unwrap_or(false);
        if is_tsv {
            b'\t'
        } else {
            b','
        }
    });

    let mut reader = csv::ReaderBuilder::new()
        .delimiter(delimiter)
        .has_headers(true)
        .trim(csv::Trim::All)
        .from_path(path)
        .with_context(|| format!("Failed to open data file: {}", path.display()))?;

    let headers = reader
        .headers()
        .context("Failed to read CSV header row")?
        .clone();

    let target_idx = find_column(&headers, &config.target_column)
        .ok_or_else(|| ClassifierError::MissingColumn(config.target_column.clone()))?;

    let feature_indices = resolve_feature_indices(&headers, config, target_idx)?;
    if feature_indices.is_empty() {
        return Err(anyhow!("No feature columns detected in CSV header"));
    }

    let mut features = Vec::new();
    let mut labels = Vec::new();
    let mut kinds = vec![ColumnKind::Numeric; feature_indices.len()];

    for (row_idx, result) in reader.records().enumerate() {
        let record = result.with_context(|| format!("Failed to read row {}", row_idx + 1))?;

        let raw_label = record
            .get(target_idx)
            .ok_or_else(|| anyhow!("Missing target value at row {}", row_idx + 1))?;
        let label = parse_label(raw_label).ok_or_else(|| {
            anyhow!(
                "Invalid target value '{}' in column '{}' at row {}",
                raw_label,
                config.target_column,
                row_idx + 1
            )
        })?;
        labels.push(label);

        for (col, &idx) in feature_indices.iter().enumerate() {
            let value = record
                .get(idx)
                .ok_or_else(|| anyhow!("Missing feature value at row {}", row_idx + 1))?;
            let (parsed, kind) = parse_feature(value).ok_or_else(|| {
                anyhow!(
                    "Invalid feature '{}' value '{}' at row {}",
                    headers.get(idx).unwrap_or(""),
                    value,
                    row_idx + 1
                )
            })?;
            if kind == ColumnKind::Boolean {
                kinds[col] = ColumnKind::Boolean;
            }
            features.push(parsed);
        }
    }

    let n_samples = labels.len();
    if n_samples == 0 {
        return Err(anyhow!("Data file {} contains no data rows", path.display()));
    }
    let n_features = feature_indices.len();
    let x = Array2::from_shape_vec((n_samples, n_features), features)
        .context("Failed to build feature matrix")?;
    let y = Array1::from_vec(labels);

    let feature_names: Vec<String> = feature_indices
        .iter()
        .map(|&idx| headers.get(idx).unwrap_or("").to_string())
        .collect();

    let mut schema: Vec<ColumnSummary> = feature_names
        .iter()
        .zip(kinds)
        .map(|(name, kind)| ColumnSummary {
            name: name.clone(),
            kind,
            non_null: n_samples,
        })
        .collect();
    schema.push(ColumnSummary {
        name: headers.get(target_idx).unwrap_or("").to_string(),
        kind: ColumnKind::Label,
        non_null: n_samples,
    });

    log::info!(
        "Loaded {} rows with {} features from {}",
        n_samples,
        n_features,
        path.display()
    );

    Ok(FlightDataset::new(x, y, feature_names, &config.target_column)?.with_schema(schema))
}

fn find_column(headers: &StringRecord, name: &str) -> Option<usize> {
    headers
        .iter()
        .position(|header| header.eq_ignore_ascii_case(name))
}

fn resolve_feature_indices(
    headers: &StringRecord,
    config: &CsvReaderConfig,
    target_idx: usize,
) -> Result<Vec<usize>> {
    if let Some(names) = &config.feature_columns {
        let mut indices = Vec::with_capacity(names.len());
        for name in names {
            let idx = find_column(headers, name)
                .ok_or_else(|| ClassifierError::MissingColumn(name.clone()))?;
            indices.push(idx);
        }
        return Ok(indices);
    }

    let ignore: HashSet<String> = config
        .ignore_columns
        .iter()
        .map(|name| name.to_ascii_lowercase())
        .collect();

    Ok(headers
        .iter()
        .enumerate()
        .filter(|(idx, header)| {
            *idx != target_idx && !ignore.contains(&header.to_ascii_lowercase())
        })
        .map(|(idx, _)| idx)
        .collect())
}

/// Parse a target cell. Numbers map to `value != 0`, plus the usual
/// true/false spellings.
pub(crate) fn parse_label(value: &str) -> Option<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "true" | "yes" => Some(true),
        "false" | "no" => Some(false),
        other => other
            .parse::<f64>()
            .ok()
            .filter(|v| v.is_finite())
            .map(|v| v != 0.0),
    }
}

/// Parse a feature cell into a number. One-hot encoded `true`/`false` cells
/// become 1.0/0.0.
pub(crate) fn parse_feature(value: &str) -> Option<(f64, ColumnKind)> {
    let trimmed = value.trim();
    if trimmed.eq_ignore_ascii_case("true") {
        return Some((1.0, ColumnKind::Boolean));
    }
    if trimmed.eq_ignore_ascii_case("false") {
        return Some((0.0, ColumnKind::Boolean));
    }
    trimmed
        .parse::<f64>()
        .ok()
        .filter(|v| v.is_finite())
        .map(|v| (v, ColumnKind::Numeric))
}
