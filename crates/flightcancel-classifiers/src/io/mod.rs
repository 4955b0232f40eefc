//! IO utilities for loading the engineered flight dataset.

pub mod flight_csv;

pub use flight_csv::{read_flight_csv, read_flight_csv_with_config, CsvReaderConfig};
