//! Report pipeline for sweep-table analysis
//!
//! Drives `wardsweep_core` through the fixed stage sequence (load, describe,
//! aggregate, average over time, correlate, pivot) and owns everything with
//! an output policy: logging, workbook/CSV export and plot rendering.

pub mod export;
pub mod logging;
pub mod pipeline;
pub mod plot;

pub use logging::init_logging;
