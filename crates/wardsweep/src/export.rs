//! Workbook export with per-artifact CSV fallback
//!
//! Every artifact goes through one operation: try to place it as a named
//! sheet in the shared workbook, and on any workbook failure write the same
//! content as a standalone CSV instead. Export failures are local; the
//! pipeline never aborts because a sheet could not be written.
//!
//! The workbook is assembled in memory and saved once at the end, so both
//! per-sheet errors and a failed save route through the same fallback.

use std::path::PathBuf;

use rust_xlsxwriter::{Workbook, Worksheet, XlsxError};
use tracing::{info, warn};
use wardsweep_core::{Cell, Sheet};

struct Artifact {
    sheet_name: String,
    fallback_path: PathBuf,
    sheet: Sheet,
}

/// Collects sheets for one workbook file and flushes them on [`Exporter::finish`].
pub struct Exporter {
    workbook_path: PathBuf,
    pending: Vec<Artifact>,
}

impl Exporter {
    pub fn new(workbook_path: PathBuf) -> Exporter {
        Exporter {
            workbook_path,
            pending: Vec::new(),
        }
    }

    /// Queue a sheet for the workbook, remembering where its CSV fallback
    /// would go.
    pub fn add(&mut self, sheet_name: &str, fallback_path: PathBuf, sheet: Sheet) {
        self.pending.push(Artifact {
            sheet_name: sheet_name.to_string(),
            fallback_path,
            sheet,
        });
    }

    /// Write the workbook; downgrade any failure to CSV fallbacks.
    ///
    /// Returns the number of sheets that ended up in the saved workbook
    /// (zero when everything fell back to CSV).
    pub fn finish(self) -> usize {
        if self.pending.is_empty() {
            return 0;
        }

        let mut workbook = Workbook::new();
        let mut in_workbook: Vec<&Artifact> = Vec::new();
        for artifact in &self.pending {
            match write_sheet(&mut workbook, &artifact.sheet_name, &artifact.sheet) {
                Ok(()) => in_workbook.push(artifact),
                Err(e) => {
                    warn!(
                        sheet = artifact.sheet_name,
                        error = %e,
                        "sheet write failed; falling back to CSV"
                    );
                    write_fallback(artifact);
                }
            }
        }

        if in_workbook.is_empty() {
            return 0;
        }
        match workbook.save(&self.workbook_path) {
            Ok(()) => {
                info!(
                    path = %self.workbook_path.display(),
                    sheets = in_workbook.len(),
                    "wrote workbook"
                );
                in_workbook.len()
            }
            Err(e) => {
                warn!(
                    path = %self.workbook_path.display(),
                    error = %e,
                    "workbook save failed; falling back to CSVs"
                );
                for artifact in in_workbook {
                    write_fallback(artifact);
                }
                0
            }
        }
    }
}

// Builds the worksheet standalone and pushes it only on success, so a bad
// name or cell never leaves a half-written sheet in the workbook.
fn write_sheet(workbook: &mut Workbook, name: &str, sheet: &Sheet) -> Result<(), XlsxError> {
    let mut worksheet = Worksheet::new();
    worksheet.set_name(name)?;
    for (col, title) in sheet.header.iter().enumerate() {
        worksheet.write_string(0, col as u16, title)?;
    }
    for (r, row) in sheet.rows.iter().enumerate() {
        for (c, cell) in row.iter().enumerate() {
            let (row_i, col_i) = ((r + 1) as u32, c as u16);
            match cell {
                Cell::Number(n) if n.is_finite() => {
                    worksheet.write_number(row_i, col_i, *n)?;
                }
                // Spreadsheets have no numeric infinity; store the text.
                Cell::Number(n) => {
                    worksheet.write_string(row_i, col_i, n.to_string())?;
                }
                Cell::Text(s) => {
                    worksheet.write_string(row_i, col_i, s)?;
                }
                Cell::Empty => {}
            }
        }
    }
    workbook.push_worksheet(worksheet);
    Ok(())
}

fn write_fallback(artifact: &Artifact) {
    match artifact.sheet.write_csv(&artifact.fallback_path) {
        Ok(()) => info!(
            path = %artifact.fallback_path.display(),
            "wrote fallback CSV"
        ),
        Err(e) => warn!(
            path = %artifact.fallback_path.display(),
            error = %e,
            "fallback CSV write failed"
        ),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_sheet() -> Sheet {
        let mut sheet = Sheet::new(vec!["run".to_string(), "deaths".to_string()]);
        sheet.push_row(vec![Cell::Number(1.0), Cell::Number(3.0)]);
        sheet.push_row(vec![Cell::Number(2.0), Cell::Empty]);
        sheet
    }

    #[test]
    fn test_workbook_written_on_success() {
        let dir = tempfile::tempdir().unwrap();
        let workbook_path = dir.path().join("analysis-summary.xlsx");
        let fallback = dir.path().join("run_summary.csv");

        let mut exporter = Exporter::new(workbook_path.clone());
        exporter.add("Run Summary", fallback.clone(), sample_sheet());
        assert_eq!(exporter.finish(), 1);

        assert!(workbook_path.exists());
        assert!(!fallback.exists());
    }

    #[test]
    fn test_save_failure_downgrades_to_csv() {
        let dir = tempfile::tempdir().unwrap();
        // Unwritable workbook path: parent directory does not exist.
        let workbook_path = dir.path().join("no-such-dir").join("analysis-summary.xlsx");
        let fallback = dir.path().join("run_summary.csv");

        let sheet = sample_sheet();
        let expected_csv = sheet.to_csv_string();

        let mut exporter = Exporter::new(workbook_path.clone());
        exporter.add("Run Summary", fallback.clone(), sheet);
        assert_eq!(exporter.finish(), 0);

        assert!(!workbook_path.exists());
        // The fallback carries the exact content the sheet would have had.
        assert_eq!(std::fs::read_to_string(&fallback).unwrap(), expected_csv);
    }

    #[test]
    fn test_invalid_sheet_name_falls_back_locally() {
        let dir = tempfile::tempdir().unwrap();
        let workbook_path = dir.path().join("analysis-summary.xlsx");
        let good_fallback = dir.path().join("good.csv");
        // Worksheet names may not contain ':'.
        let bad_fallback = dir.path().join("bad.csv");

        let mut exporter = Exporter::new(workbook_path.clone());
        exporter.add("Good", good_fallback.clone(), sample_sheet());
        exporter.add("Bad:Name", bad_fallback.clone(), sample_sheet());
        assert_eq!(exporter.finish(), 1);

        assert!(workbook_path.exists());
        assert!(!good_fallback.exists());
        assert!(bad_fallback.exists());

        // The rejected sheet leaves no stray worksheet in the workbook: only
        // one worksheet part exists in the saved file (zip entry names are
        // stored verbatim).
        let bytes = std::fs::read(&workbook_path).unwrap();
        let stray = b"worksheets/sheet2.xml";
        assert!(!bytes.windows(stray.len()).any(|w| w == stray));
    }

    #[test]
    fn test_empty_exporter_is_a_no_op() {
        let exporter = Exporter::new(PathBuf::from("/nonexistent/wb.xlsx"));
        assert_eq!(exporter.finish(), 0);
    }
}
