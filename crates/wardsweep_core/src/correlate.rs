//! Input→outcome correlation matrix
//!
//! Pearson correlations between every input parameter and every outcome,
//! computed pairwise-complete: a row is excluded from a pair's computation
//! only when either of that pair's values fails numeric coercion. Columns
//! without variability are dropped up front; a constant column would yield
//! an undefined coefficient against every partner.

use crate::columns;
use crate::sheet::{Cell, Sheet};
use crate::stats;
use crate::table::Table;

/// Inputs × outcomes matrix of Pearson coefficients.
///
/// `cells[i][o]` pairs `inputs[i]` with `outcomes[o]`; `None` marks a pair
/// with too few complete observations.
#[derive(Debug, Clone)]
pub struct CorrelationMatrix {
    pub inputs: Vec<String>,
    pub outcomes: Vec<String>,
    pub cells: Vec<Vec<Option<f64>>>,
}

impl CorrelationMatrix {
    pub fn is_empty(&self) -> bool {
        self.inputs.is_empty() || self.outcomes.is_empty()
    }

    pub fn to_sheet(&self) -> Sheet {
        let mut header = vec!["input".to_string()];
        header.extend(self.outcomes.iter().cloned());
        let mut sheet = Sheet::new(header);
        for (input, row) in self.inputs.iter().zip(&self.cells) {
            let mut cells = vec![Cell::text(input.clone())];
            cells.extend(row.iter().map(|r| Cell::opt_number(*r)));
            sheet.push_row(cells);
        }
        sheet
    }
}

/// Build the correlation matrix for the declared input and outcome lists.
///
/// Callers normalize boolean-text inputs first
/// ([`Table::normalize_boolean_columns`]); text that still fails coercion
/// here simply contributes no observations.
pub fn input_outcome_correlations(table: &Table) -> CorrelationMatrix {
    let inputs = variable_columns(table, columns::INPUT_COLUMNS);
    let outcomes = variable_columns(table, columns::OUTCOME_COLUMNS);

    let input_series: Vec<Vec<Option<f64>>> = inputs
        .iter()
        .map(|name| table.column(name).expect("filtered to present").numbers())
        .collect();
    let outcome_series: Vec<Vec<Option<f64>>> = outcomes
        .iter()
        .map(|name| table.column(name).expect("filtered to present").numbers())
        .collect();

    let cells = input_series
        .iter()
        .map(|xs| {
            outcome_series
                .iter()
                .map(|ys| pairwise_pearson(xs, ys))
                .collect()
        })
        .collect();

    CorrelationMatrix {
        inputs: inputs.into_iter().map(String::from).collect(),
        outcomes: outcomes.into_iter().map(String::from).collect(),
        cells,
    }
}

/// Present columns whose coerced sample standard deviation is strictly
/// positive.
fn variable_columns<'a>(table: &Table, names: &[&'a str]) -> Vec<&'a str> {
    table
        .present(names)
        .into_iter()
        .filter(|name| {
            let xs = table
                .column(name)
                .expect("present() filtered")
                .numeric_values();
            stats::sample_std(&xs).is_some_and(|s| s > 0.0)
        })
        .collect()
}

/// Pearson over the rows where both sides coerce.
fn pairwise_pearson(xs: &[Option<f64>], ys: &[Option<f64>]) -> Option<f64> {
    let mut a = Vec::new();
    let mut b = Vec::new();
    for (x, y) in xs.iter().zip(ys.iter()) {
        if let (Some(x), Some(y)) = (x, y) {
            a.push(*x);
            b.push(*y);
        }
    }
    stats::pearson(&a, &b)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn table_from(body: &str) -> Table {
        let preamble = "p1\np2\np3\np4\np5\np6\n";
        Table::from_sweep_text(&format!("{preamble}{body}")).unwrap()
    }

    #[test]
    fn test_constant_columns_excluded() {
        // cleaning-effectiveness is constant; it must not appear at all.
        let table = table_from(
            "\"cleaning-effectiveness\",\"cleaning-frequency\",\"patient-deaths\"\n\
             0.5,1,3\n\
             0.5,2,2\n\
             0.5,3,1\n",
        );
        let m = input_outcome_correlations(&table);
        assert_eq!(m.inputs, vec!["cleaning-frequency"]);
        assert_eq!(m.outcomes, vec!["patient-deaths"]);
    }

    #[test]
    fn test_exact_linear_dependence_is_unity() {
        let table = table_from(
            "\"antibiotic-strength-level\",\"patient-deaths\",\"total-recovered\"\n\
             1,2,9\n\
             2,4,7\n\
             3,6,5\n\
             4,8,3\n",
        );
        let m = input_outcome_correlations(&table);
        let deaths = m.outcomes.iter().position(|o| o == "patient-deaths").unwrap();
        let recovered = m.outcomes.iter().position(|o| o == "total-recovered").unwrap();
        assert_eq!(m.cells[0][deaths], Some(1.0));
        assert_eq!(m.cells[0][recovered], Some(-1.0));
    }

    #[test]
    fn test_bounded_coefficients() {
        let table = table_from(
            "\"cleaning-frequency\",\"total-mutations\"\n\
             1,5\n2,3\n3,8\n4,1\n5,9\n",
        );
        let m = input_outcome_correlations(&table);
        for row in &m.cells {
            for cell in row.iter().flatten() {
                assert!((-1.0..=1.0).contains(cell));
            }
        }
    }

    #[test]
    fn test_pairwise_complete_ignores_bad_rows_locally() {
        // The "oops" row only drops out of pairs involving total-mutations.
        let table = table_from(
            "\"cleaning-frequency\",\"patient-deaths\",\"total-mutations\"\n\
             1,2,oops\n\
             2,4,4\n\
             3,6,5\n\
             4,8,6\n",
        );
        let m = input_outcome_correlations(&table);
        let deaths = m.outcomes.iter().position(|o| o == "patient-deaths").unwrap();
        let mutations = m.outcomes.iter().position(|o| o == "total-mutations").unwrap();
        // deaths uses all 4 rows and is exactly linear in the input.
        assert_eq!(m.cells[0][deaths], Some(1.0));
        // mutations uses the 3 complete rows, also exactly linear there.
        assert_eq!(m.cells[0][mutations], Some(1.0));
    }

    #[test]
    fn test_boolean_input_after_normalization() {
        let mut table = table_from(
            "\"antibiotic-application\",\"patient-deaths\"\n\
             true,4\n\
             false,1\n\
             true,4\n\
             false,1\n",
        );
        table.normalize_boolean_columns(columns::INPUT_COLUMNS);
        let m = input_outcome_correlations(&table);
        assert_eq!(m.inputs, vec!["antibiotic-application"]);
        assert_eq!(m.cells[0][0], Some(1.0));
    }

    #[test]
    fn test_sheet_layout() {
        let table = table_from(
            "\"cleaning-frequency\",\"patient-deaths\"\n1,1\n2,2\n",
        );
        let sheet = input_outcome_correlations(&table).to_sheet();
        assert_eq!(sheet.header, vec!["input", "patient-deaths"]);
        assert_eq!(sheet.rows[0][0], Cell::text("cleaning-frequency"));
        assert_eq!(sheet.rows[0][1], Cell::Number(1.0));
    }
}
