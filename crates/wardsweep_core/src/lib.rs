//! Analysis library for agent-based simulation sweep output
//!
//! This crate ingests the tabular "table" output of a BehaviorSpace-style
//! simulation sweep and derives report artifacts from it:
//! - Descriptive statistics per numeric column
//! - Per-run aggregates (sum/mean/max/min per outcome)
//! - Mean trajectories over simulation steps, across runs
//! - Pearson correlations between input parameters and outcomes
//! - Pivot tables over parameter levels, including derived per-patient rates
//!
//! The binary crate (`wardsweep`) drives these stages in order and handles
//! export and plotting. Everything here is pure computation over the loaded
//! [`Table`], producing [`Sheet`] values ready for serialization.

#![warn(clippy::all)]

// ============================================================================
// Core modules
// ============================================================================

pub mod aggregate;
pub mod columns;
pub mod correlate;
pub mod describe;
pub mod error;
pub mod pivot;
pub mod stats;
pub mod timeseries;

// ============================================================================
// Type definition modules
// ============================================================================

pub mod sheet;
pub mod table;
pub mod value;

// ============================================================================
// Test modules
// ============================================================================

#[cfg(test)]
mod tests;

// ============================================================================
// Public re-exports for convenience
// ============================================================================

pub use error::LoadError;
pub use sheet::{Cell, Sheet};
pub use table::{Column, Table};
pub use value::{GroupKey, Value};
