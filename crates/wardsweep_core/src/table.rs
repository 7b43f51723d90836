//! The loaded sweep table
//!
//! A BehaviorSpace "table" file starts with a fixed-size metadata preamble
//! (experiment name, timestamp, dimensions...) that is not CSV. The loader
//! discards those lines, takes the next line as the header row, and infers
//! cell types while reading the remainder.

use std::path::Path;

use rustc_hash::FxHashMap;
use tracing::debug;

use crate::columns;
use crate::error::LoadError;
use crate::sheet::{Cell, Sheet};
use crate::value::Value;

/// Number of non-tabular metadata lines before the header row.
pub const PREAMBLE_LINES: usize = 6;

/// One named column of the table.
#[derive(Debug, Clone)]
pub struct Column {
    pub name: String,
    pub cells: Vec<Value>,
}

impl Column {
    /// Row-aligned numeric coercion of every cell.
    pub fn numbers(&self) -> Vec<Option<f64>> {
        self.cells.iter().map(Value::as_number).collect()
    }

    /// All cells that coerce to a number, in row order.
    pub fn numeric_values(&self) -> Vec<f64> {
        self.cells.iter().filter_map(Value::as_number).collect()
    }

    /// True when the column holds numbers only (missing cells allowed) and
    /// at least one number is present.
    pub fn is_numeric(&self) -> bool {
        let mut any = false;
        for cell in &self.cells {
            match cell {
                Value::Number(_) => any = true,
                Value::Missing => {}
                Value::Text(_) => return false,
            }
        }
        any
    }
}

/// Row-oriented dataset with named columns, loaded once.
///
/// Immutable after load except for the two documented derivation steps:
/// [`Table::normalize_boolean_columns`] and [`Table::push_ratio_column`].
/// Stages that read derived columns rely on those running first.
#[derive(Debug, Clone)]
pub struct Table {
    columns: Vec<Column>,
    index: FxHashMap<String, usize>,
    n_rows: usize,
}

impl Table {
    /// Load a sweep table file, skipping the metadata preamble.
    pub fn load(path: &Path) -> Result<Table, LoadError> {
        let text = std::fs::read_to_string(path)?;
        Table::from_sweep_text(&text)
    }

    /// Parse sweep-table text: 6 preamble lines, then a CSV header + rows.
    pub fn from_sweep_text(text: &str) -> Result<Table, LoadError> {
        let body = skip_preamble(text, PREAMBLE_LINES)?;
        if body.trim().is_empty() {
            return Err(LoadError::MissingHeader);
        }

        let mut reader = csv::ReaderBuilder::new()
            .has_headers(true)
            .flexible(true)
            .from_reader(body.as_bytes());

        let header = reader.headers()?.clone();
        let mut columns: Vec<Column> = header
            .iter()
            .map(|name| Column {
                name: name.to_string(),
                cells: Vec::new(),
            })
            .collect();

        let mut n_rows = 0;
        for record in reader.records() {
            let record = record?;
            for (col, field) in columns.iter_mut().zip(record.iter()) {
                col.cells.push(Value::parse(field));
            }
            // Short records leave trailing columns missing.
            for col in columns.iter_mut().skip(record.len()) {
                col.cells.push(Value::Missing);
            }
            n_rows += 1;
        }

        let index = columns
            .iter()
            .enumerate()
            .map(|(i, c)| (c.name.clone(), i))
            .collect();

        Ok(Table {
            columns,
            index,
            n_rows,
        })
    }

    pub fn n_rows(&self) -> usize {
        self.n_rows
    }

    pub fn n_columns(&self) -> usize {
        self.columns.len()
    }

    pub fn header(&self) -> Vec<&str> {
        self.columns.iter().map(|c| c.name.as_str()).collect()
    }

    pub fn column(&self, name: &str) -> Option<&Column> {
        self.index.get(name).map(|&i| &self.columns[i])
    }

    pub fn has_column(&self, name: &str) -> bool {
        self.index.contains_key(name)
    }

    pub fn columns(&self) -> &[Column] {
        &self.columns
    }

    /// Intersect a reference column list with the columns actually present.
    /// Absent names narrow the working set; they are reported at debug level
    /// and never an error.
    pub fn present<'a>(&self, names: &[&'a str]) -> Vec<&'a str> {
        let (present, absent): (Vec<&str>, Vec<&str>) =
            names.iter().partition(|n| self.has_column(n));
        if !absent.is_empty() {
            debug!(skipped = ?absent, "reference columns not present in table");
        }
        present
    }

    /// Map input columns holding only the text values "true"/"false" to
    /// numeric 1/0 in place. Returns the names of the converted columns.
    pub fn normalize_boolean_columns(&mut self, names: &[&str]) -> Vec<String> {
        let mut converted = Vec::new();
        for name in names {
            let Some(&i) = self.index.get(*name) else {
                continue;
            };
            let col = &self.columns[i];
            let all_boolean = col
                .cells
                .iter()
                .filter(|c| !c.is_missing())
                .all(|c| matches!(c.as_text(), Some("true") | Some("false")));
            let any_text = col.cells.iter().any(|c| c.as_text().is_some());
            if !all_boolean || !any_text {
                continue;
            }
            for cell in &mut self.columns[i].cells {
                *cell = match cell.as_text() {
                    Some("true") => Value::Number(1.0),
                    Some("false") => Value::Number(0.0),
                    _ => Value::Missing,
                };
            }
            converted.push(name.to_string());
        }
        converted
    }

    /// Append a derived column `numerator / denominator` per row.
    ///
    /// A zero denominator, or either side failing numeric coercion, yields a
    /// missing cell rather than an error. No-op when either source column is
    /// absent or a column with `name` already exists.
    pub fn push_ratio_column(&mut self, name: &str, numerator: &str, denominator: &str) {
        if self.has_column(name) {
            return;
        }
        let (Some(num), Some(den)) = (self.column(numerator), self.column(denominator)) else {
            return;
        };
        let cells: Vec<Value> = num
            .numbers()
            .into_iter()
            .zip(den.numbers())
            .map(|(n, d)| match (n, d) {
                (Some(_), Some(d)) if d == 0.0 => Value::Missing,
                (Some(n), Some(d)) => Value::Number(n / d),
                _ => Value::Missing,
            })
            .collect();
        self.index.insert(name.to_string(), self.columns.len());
        self.columns.push(Column {
            name: name.to_string(),
            cells,
        });
    }

    /// First `n` rows of the raw table as an output sheet.
    pub fn sample_sheet(&self, n: usize) -> Sheet {
        let take = n.min(self.n_rows);
        let mut sheet = Sheet::new(self.columns.iter().map(|c| c.name.clone()).collect());
        for row in 0..take {
            let cells: Vec<Cell> = self.columns.iter().map(|c| c.cells[row].to_cell()).collect();
            sheet.push_row(cells);
        }
        sheet
    }

    /// Convenience for the derived rate columns over `total-patients`.
    pub fn push_rate_columns(&mut self) -> Vec<String> {
        let mut added = Vec::new();
        for &(rate, numerator) in columns::RATE_COLUMNS {
            if self.has_column(numerator) && self.has_column(columns::TOTAL_PATIENTS) {
                self.push_ratio_column(rate, numerator, columns::TOTAL_PATIENTS);
                if self.has_column(rate) {
                    added.push(rate.to_string());
                }
            }
        }
        added
    }
}

fn skip_preamble(text: &str, lines: usize) -> Result<&str, LoadError> {
    let mut rest = text;
    for skipped in 0..lines {
        match rest.find('\n') {
            Some(pos) => rest = &rest[pos + 1..],
            None => {
                return Err(LoadError::TruncatedPreamble {
                    lines_found: skipped + if rest.is_empty() { 0 } else { 1 },
                    lines_expected: lines,
                });
            }
        }
    }
    Ok(rest)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write as _;

    pub(crate) const PREAMBLE: &str = "\
\"BehaviorSpace results\"\n\
\"BacteriaSim.nlogo\"\n\
\"experiment\"\n\
\"08/23/2026 10:00:00\"\n\
\"min-pxcor\",\"max-pxcor\"\n\
\"-16\",\"16\"\n";

    fn small_table() -> Table {
        let text = format!(
            "{PREAMBLE}\
\"[run number]\",\"total-patients\",\"antibiotic-application\"\n\
1,10,true\n\
1,12,true\n\
2,8,false\n"
        );
        Table::from_sweep_text(&text).unwrap()
    }

    #[test]
    fn test_header_matches_line_seven() {
        let table = small_table();
        assert_eq!(
            table.header(),
            vec!["[run number]", "total-patients", "antibiotic-application"]
        );
        assert_eq!(table.n_rows(), 3);
    }

    #[test]
    fn test_load_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("table.csv");
        let mut f = std::fs::File::create(&path).unwrap();
        write!(f, "{PREAMBLE}\"[run number]\",\"x\"\n1,2\n").unwrap();
        drop(f);

        let table = Table::load(&path).unwrap();
        assert_eq!(table.header(), vec!["[run number]", "x"]);
        assert_eq!(table.n_rows(), 1);
    }

    #[test]
    fn test_missing_file_is_fatal() {
        let err = Table::load(Path::new("/nonexistent/table.csv")).unwrap_err();
        assert!(matches!(err, LoadError::Io(_)));
    }

    #[test]
    fn test_truncated_preamble() {
        let err = Table::from_sweep_text("only\ntwo lines").unwrap_err();
        assert!(matches!(err, LoadError::TruncatedPreamble { .. }));
    }

    #[test]
    fn test_preamble_without_header() {
        let text = "a\nb\nc\nd\ne\nf\n";
        let err = Table::from_sweep_text(text).unwrap_err();
        assert!(matches!(err, LoadError::MissingHeader));
    }

    #[test]
    fn test_present_narrows_silently() {
        let table = small_table();
        let got = table.present(&["total-patients", "no-such-column"]);
        assert_eq!(got, vec!["total-patients"]);
    }

    #[test]
    fn test_boolean_normalization() {
        let mut table = small_table();
        let converted = table.normalize_boolean_columns(&["antibiotic-application"]);
        assert_eq!(converted, vec!["antibiotic-application"]);

        let col = table.column("antibiotic-application").unwrap();
        assert_eq!(col.numeric_values(), vec![1.0, 1.0, 0.0]);
    }

    #[test]
    fn test_boolean_normalization_skips_numeric_columns() {
        let mut table = small_table();
        let converted = table.normalize_boolean_columns(&["total-patients"]);
        assert!(converted.is_empty());
        assert!(table.column("total-patients").unwrap().is_numeric());
    }

    #[test]
    fn test_ratio_column_zero_denominator_is_missing() {
        let text = format!(
            "{PREAMBLE}\
\"patient-deaths\",\"total-patients\"\n\
2,10\n\
1,0\n"
        );
        let mut table = Table::from_sweep_text(&text).unwrap();
        table.push_ratio_column("mortality-rate", "patient-deaths", "total-patients");

        let col = table.column("mortality-rate").unwrap();
        assert_eq!(col.cells[0], Value::Number(0.2));
        assert!(col.cells[1].is_missing());
    }

    #[test]
    fn test_sample_sheet_truncates() {
        let table = small_table();
        let sheet = table.sample_sheet(2);
        assert_eq!(sheet.n_rows(), 2);
        assert_eq!(sheet.header[0], "[run number]");
    }
}
