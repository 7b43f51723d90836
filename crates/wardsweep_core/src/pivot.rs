//! Pivot tables over parameter levels
//!
//! Three independent cross-tabulations of mean outcome values, each skipped
//! when its grouping parameter is absent from the table. The total-patients
//! pivot additionally summarizes the derived rate columns, which the caller
//! inserts beforehand ([`crate::table::Table::push_rate_columns`]).

use crate::aggregate::group_rows;
use crate::columns;
use crate::sheet::{Cell, Sheet};
use crate::stats;
use crate::table::Table;
use crate::value::GroupKey;

/// Two-way pivot: antibiotic strength level × cleaning effectiveness,
/// mean of each present metric per combination. `None` unless both
/// parameter columns are present.
pub fn strength_by_cleaning(table: &Table) -> Option<Sheet> {
    if !table.has_column(columns::STRENGTH_COLUMN) {
        return None;
    }
    let cleaning = table.column(columns::CLEANING_COLUMN)?;
    let metrics = table.present(columns::PIVOT_METRICS);

    // Distinct column-axis levels, ascending.
    let mut levels: Vec<GroupKey> = Vec::new();
    for cell in &cleaning.cells {
        if let Some(key) = GroupKey::from_value(cell)
            && !levels.contains(&key)
        {
            levels.push(key);
        }
    }
    levels.sort();

    let mut header = vec![columns::STRENGTH_COLUMN.to_string()];
    for metric in &metrics {
        for level in &levels {
            header.push(format!("{metric} @ {}={level}", columns::CLEANING_COLUMN));
        }
    }
    let mut sheet = Sheet::new(header);

    let row_groups = group_rows(table, columns::STRENGTH_COLUMN)?;
    for (row_key, rows) in &row_groups {
        let mut out = vec![row_key.to_cell()];
        for metric in &metrics {
            let metric_col = table.column(metric).expect("present() filtered");
            for level in &levels {
                let xs: Vec<f64> = rows
                    .iter()
                    .filter(|&&r| GroupKey::from_value(&cleaning.cells[r]).as_ref() == Some(level))
                    .filter_map(|&r| metric_col.cells[r].as_number())
                    .collect();
                out.push(Cell::opt_number(stats::mean(&xs)));
            }
        }
        sheet.push_row(out);
    }
    Some(sheet)
}

/// One-way pivot by antibiotic administration period.
pub fn by_admin_period(table: &Table) -> Option<Sheet> {
    let metrics = table.present(columns::PIVOT_METRICS);
    one_way(table, columns::ADMIN_PERIOD_COLUMN, &metrics)
}

/// One-way pivot by total patients, with the derived rate columns included
/// in the metric set when present.
pub fn by_total_patients(table: &Table) -> Option<Sheet> {
    if !table.has_column(columns::TOTAL_PATIENTS) {
        return None;
    }
    let mut metrics = table.present(columns::PIVOT_METRICS);
    let rate_names: Vec<&str> = columns::RATE_COLUMNS.iter().map(|&(r, _)| r).collect();
    metrics.extend(table.present(&rate_names));
    one_way(table, columns::TOTAL_PATIENTS, &metrics)
}

/// Shared one-way pivot: rows = distinct key values ascending, cells = mean
/// of each metric within the group.
fn one_way(table: &Table, key_column: &str, metrics: &[&str]) -> Option<Sheet> {
    let groups = group_rows(table, key_column)?;

    let mut header = vec![key_column.to_string()];
    header.extend(metrics.iter().map(|m| m.to_string()));
    let mut sheet = Sheet::new(header);

    for (key, rows) in &groups {
        let mut out = vec![key.to_cell()];
        for metric in metrics {
            let col = table.column(metric).expect("metrics filtered to present");
            let xs: Vec<f64> = rows
                .iter()
                .filter_map(|&r| col.cells[r].as_number())
                .collect();
            out.push(Cell::opt_number(stats::mean(&xs)));
        }
        sheet.push_row(out);
    }
    Some(sheet)
}
