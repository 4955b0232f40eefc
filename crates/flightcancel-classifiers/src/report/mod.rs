//! Reporting and plotting helpers.
//!
//! Plot helpers convert metrics into `plotly::Plot` figures; `report`
//! assembles figures and text blocks into a standalone HTML page.
pub mod plots;
pub mod report;

pub use report::{save_plot_html, Report, ReportSection};
