//! Mean trajectories over simulation steps
//!
//! Averages each tracked outcome per step value across all runs sharing that
//! step. The whole stage is skipped when the step column is absent or none
//! of the tracked outcomes are present.

use std::collections::BTreeMap;

use crate::columns;
use crate::sheet::{Cell, Sheet};
use crate::stats;
use crate::table::Table;

/// Mean of each tracked column at one step.
#[derive(Debug, Clone)]
pub struct TimePoint {
    pub step: f64,
    pub means: Vec<Option<f64>>,
}

/// Step-ordered mean trajectories, one series per tracked outcome.
#[derive(Debug, Clone)]
pub struct TimeSeries {
    /// Tracked outcome names, aligned with `TimePoint::means`.
    pub columns: Vec<String>,
    pub points: Vec<TimePoint>,
}

impl TimeSeries {
    pub fn to_sheet(&self) -> Sheet {
        let mut header = vec![columns::STEP_COLUMN.to_string()];
        header.extend(self.columns.iter().cloned());
        let mut sheet = Sheet::new(header);
        for point in &self.points {
            let mut row = vec![Cell::number(point.step)];
            row.extend(point.means.iter().map(|m| Cell::opt_number(*m)));
            sheet.push_row(row);
        }
        sheet
    }

    /// (step, mean) pairs for one tracked column, skipping undefined means.
    pub fn series(&self, column_index: usize) -> Vec<(f64, f64)> {
        self.points
            .iter()
            .filter_map(|p| p.means[column_index].map(|m| (p.step, m)))
            .collect()
    }
}

/// Compute mean-per-step trajectories for the tracked outcome columns.
///
/// Rows whose step value fails numeric coercion are excluded. Returns `None`
/// when the stage is skipped entirely.
pub fn mean_over_time(table: &Table) -> Option<TimeSeries> {
    let step_col = table.column(columns::STEP_COLUMN)?;
    let tracked = table.present(columns::TIME_COLUMNS);
    if tracked.is_empty() {
        return None;
    }

    let mut groups: BTreeMap<u64, (f64, Vec<usize>)> = BTreeMap::new();
    for (row, cell) in step_col.cells.iter().enumerate() {
        if let Some(step) = cell.as_number() {
            groups
                .entry(step.to_bits())
                .or_insert_with(|| (step, Vec::new()))
                .1
                .push(row);
        }
    }
    // Bit patterns of non-negative floats sort like the floats themselves;
    // steps are non-negative counters, but sort defensively anyway.
    let mut ordered: Vec<(f64, Vec<usize>)> = groups.into_values().collect();
    ordered.sort_by(|a, b| a.0.total_cmp(&b.0));

    let tracked_cols: Vec<_> = tracked
        .iter()
        .map(|name| table.column(name).expect("present() filtered"))
        .collect();

    let points = ordered
        .into_iter()
        .map(|(step, rows)| {
            let means = tracked_cols
                .iter()
                .map(|col| {
                    let xs: Vec<f64> = rows
                        .iter()
                        .filter_map(|&r| col.cells[r].as_number())
                        .collect();
                    stats::mean(&xs)
                })
                .collect();
            TimePoint { step, means }
        })
        .collect();

    Some(TimeSeries {
        columns: tracked.iter().map(|s| s.to_string()).collect(),
        points,
    })
}
