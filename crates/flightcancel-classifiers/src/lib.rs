//! flightcancel-classifiers: train and compare binary classifiers for
//! flight-cancellation prediction.
//!
//! The crate covers each stage of a single batch run: loading a
//! pre-engineered CSV, a seeded stratified train/test split, four linfa-backed
//! model wrappers behind one trait, metric computation, comparison tables,
//! plotly figures with an HTML report, and the wide results export.
pub mod comparison;
pub mod config;
pub mod data_handling;
pub mod error;
pub mod evaluation;
pub mod export;
pub mod io;
pub mod metrics;
pub mod models;
pub mod report;
