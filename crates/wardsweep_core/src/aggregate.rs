//! Per-run aggregation
//!
//! Groups the table by the run identifier column and applies the declared
//! aggregation plan ([`crate::columns::RUN_AGGREGATIONS`]) to each outcome,
//! restricted to the columns actually present.

use std::collections::BTreeMap;

use crate::columns;
use crate::sheet::{Cell, Sheet};
use crate::table::Table;
use crate::value::GroupKey;

/// One aggregate statistic over a group of numeric values.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AggStat {
    Sum,
    Mean,
    Max,
    Min,
}

impl AggStat {
    pub fn label(self) -> &'static str {
        match self {
            AggStat::Sum => "sum",
            AggStat::Mean => "mean",
            AggStat::Max => "max",
            AggStat::Min => "min",
        }
    }

    /// Apply to the values of one group, skipping coercion failures.
    /// Empty groups yield `None`.
    pub fn apply(self, xs: &[f64]) -> Option<f64> {
        if xs.is_empty() {
            return None;
        }
        Some(match self {
            AggStat::Sum => xs.iter().sum(),
            AggStat::Mean => xs.iter().sum::<f64>() / xs.len() as f64,
            AggStat::Max => xs.iter().copied().fold(f64::NEG_INFINITY, f64::max),
            AggStat::Min => xs.iter().copied().fold(f64::INFINITY, f64::min),
        })
    }
}

/// Which statistics to compute for one outcome column.
#[derive(Debug, Clone, Copy)]
pub struct AggSpec {
    pub column: &'static str,
    pub stats: &'static [AggStat],
}

/// Group row indices by the values of one column, ascending by key.
/// Rows with a missing key are excluded.
pub fn group_rows(table: &Table, key_column: &str) -> Option<BTreeMap<GroupKey, Vec<usize>>> {
    let col = table.column(key_column)?;
    let mut groups: BTreeMap<GroupKey, Vec<usize>> = BTreeMap::new();
    for (row, cell) in col.cells.iter().enumerate() {
        if let Some(key) = GroupKey::from_value(cell) {
            groups.entry(key).or_default().push(row);
        }
    }
    Some(groups)
}

/// Per-run summary sheet: one row per distinct run identifier, one column
/// per (outcome, statistic) pair of the plan. `None` when the run column is
/// absent.
pub fn run_summary(table: &Table) -> Option<Sheet> {
    let groups = group_rows(table, columns::RUN_COLUMN)?;

    let plan: Vec<AggSpec> = columns::RUN_AGGREGATIONS
        .iter()
        .filter(|spec| table.has_column(spec.column))
        .copied()
        .collect();

    let mut header = vec![columns::RUN_COLUMN.to_string()];
    for spec in &plan {
        for stat in spec.stats {
            header.push(format!("{} ({})", spec.column, stat.label()));
        }
    }

    let mut sheet = Sheet::new(header);
    for (key, rows) in &groups {
        let mut out = vec![key.to_cell()];
        for spec in &plan {
            let col = table.column(spec.column).expect("plan filtered to present");
            let xs: Vec<f64> = rows
                .iter()
                .filter_map(|&r| col.cells[r].as_number())
                .collect();
            for stat in spec.stats {
                out.push(Cell::opt_number(stat.apply(&xs)));
            }
        }
        sheet.push_row(out);
    }
    Some(sheet)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn table_from(body: &str) -> Table {
        let preamble = "p1\np2\np3\np4\np5\np6\n";
        Table::from_sweep_text(&format!("{preamble}{body}")).unwrap()
    }

    #[test]
    fn test_agg_stats() {
        let xs = [1.0, 2.0, 4.0];
        assert_eq!(AggStat::Sum.apply(&xs), Some(7.0));
        assert_eq!(AggStat::Mean.apply(&xs), Some(7.0 / 3.0));
        assert_eq!(AggStat::Max.apply(&xs), Some(4.0));
        assert_eq!(AggStat::Min.apply(&xs), Some(1.0));
        assert_eq!(AggStat::Sum.apply(&[]), None);
    }

    #[test]
    fn test_one_row_per_distinct_run() {
        let table = table_from(
            "\"[run number]\",\"total-patients\",\"patient-deaths\"\n\
             1,10,1\n\
             2,20,0\n\
             1,12,2\n\
             3,8,1\n",
        );
        let sheet = run_summary(&table).unwrap();
        assert_eq!(sheet.n_rows(), 3);

        // Runs come out ascending; run 1 aggregates both its rows.
        assert_eq!(sheet.rows[0][0], Cell::Number(1.0));
        let mean_col = sheet
            .header
            .iter()
            .position(|h| h == "total-patients (mean)")
            .unwrap();
        assert_eq!(sheet.rows[0][mean_col], Cell::Number(11.0));
        let deaths_sum = sheet
            .header
            .iter()
            .position(|h| h == "patient-deaths (sum)")
            .unwrap();
        assert_eq!(sheet.rows[0][deaths_sum], Cell::Number(3.0));
    }

    #[test]
    fn test_missing_run_value_excluded() {
        let table = table_from(
            "\"[run number]\",\"total-patients\"\n\
             1,10\n\
             ,99\n\
             2,20\n",
        );
        let sheet = run_summary(&table).unwrap();
        assert_eq!(sheet.n_rows(), 2);
    }

    #[test]
    fn test_absent_outcome_columns_skipped() {
        let table = table_from("\"[run number]\",\"total-patients\"\n1,10\n");
        let sheet = run_summary(&table).unwrap();
        // Only the run column and the three total-patients stats remain.
        assert_eq!(
            sheet.header,
            vec![
                "[run number]",
                "total-patients (mean)",
                "total-patients (max)",
                "total-patients (min)",
            ]
        );
    }

    #[test]
    fn test_no_run_column_skips_stage() {
        let table = table_from("\"total-patients\"\n10\n");
        assert!(run_summary(&table).is_none());
    }
}
