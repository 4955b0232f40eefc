#![allow(dead_code)]
use std::fmt::Write as _;

use flightcancel_classifiers::data_handling::FlightDataset;
use ndarray::{Array1, Array2};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Two noisy, overlapping clusters: every `period`-th row is cancelled.
pub fn synthetic_dataset(n: usize, period: usize, seed: u64) -> FlightDataset {
    let mut rng = StdRng::seed_from_u64(seed);
    let mut values = Vec::with_capacity(n * 3);
    let mut labels = Vec::with_capacity(n);
    for i in 0..n {
        let cancelled = i % period == 0;
        let centre = if cancelled { 2.0 } else { -0.5 };
        values.push(centre + rng.gen_range(-1.5..1.5));
        values.push(rng.gen_range(0.0..1.0));
        values.push(if rng.gen_bool(0.3) { 1.0 } else { 0.0 });
        labels.push(cancelled);
    }
    let x = Array2::from_shape_vec((n, 3), values).unwrap();
    let y = Array1::from_vec(labels);
    FlightDataset::new(
        x,
        y,
        vec![
            "DepDelay".to_string(),
            "Distance_scaled".to_string(),
            "Airline_DL".to_string(),
        ],
        "Cancelled",
    )
    .unwrap()
}

/// Same data rendered as the engineered CSV the loader expects, with the
/// one-hot column spelled as `True`/`False`.
pub fn dataset_csv(dataset: &FlightDataset) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "{},{}", dataset.feature_names.join(","), dataset.target_name);
    for (row, &label) in dataset.x.rows().into_iter().zip(dataset.y.iter()) {
        let one_hot = if row[2] == 1.0 { "True" } else { "False" };
        let _ = writeln!(out, "{},{},{},{}", row[0], row[1], one_hot, label as u8);
    }
    out
}
