//! Output table model
//!
//! Every artifact the pipeline produces (run summary, sample, correlation
//! matrix, pivots, time series) is materialized as a [`Sheet`] before export,
//! so the exporter has one uniform "write this somewhere" operation.

use std::io::Write;
use std::path::Path;

use serde::{Serialize, Serializer};

/// A single cell of an output sheet.
///
/// `Empty` stands for an undefined value (e.g. a rate with a zero
/// denominator) and serializes as an empty field.
#[derive(Debug, Clone, PartialEq)]
pub enum Cell {
    Number(f64),
    Text(String),
    Empty,
}

impl Serialize for Cell {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Cell::Number(n) => serializer.serialize_f64(*n),
            Cell::Text(s) => serializer.serialize_str(s),
            Cell::Empty => serializer.serialize_none(),
        }
    }
}

impl Cell {
    pub fn text(s: impl Into<String>) -> Cell {
        Cell::Text(s.into())
    }

    /// Number cell, with NaN collapsed to `Empty`.
    pub fn number(n: f64) -> Cell {
        if n.is_nan() { Cell::Empty } else { Cell::Number(n) }
    }

    /// Optional number, `None` and NaN both collapse to `Empty`.
    pub fn opt_number(n: Option<f64>) -> Cell {
        match n {
            Some(n) => Cell::number(n),
            None => Cell::Empty,
        }
    }
}

/// A named-column table ready for export.
#[derive(Debug, Clone)]
pub struct Sheet {
    pub header: Vec<String>,
    pub rows: Vec<Vec<Cell>>,
}

impl Sheet {
    pub fn new(header: Vec<String>) -> Sheet {
        Sheet {
            header,
            rows: Vec::new(),
        }
    }

    pub fn push_row(&mut self, row: Vec<Cell>) {
        debug_assert_eq!(row.len(), self.header.len());
        self.rows.push(row);
    }

    pub fn n_rows(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Serialize as CSV to any writer, via the serde-aware csv serializer
    /// (empty cells become empty fields).
    pub fn write_csv_to<W: Write>(&self, writer: W) -> Result<(), csv::Error> {
        let mut wtr = csv::Writer::from_writer(writer);
        wtr.serialize(&self.header)?;
        for row in &self.rows {
            wtr.serialize(row)?;
        }
        wtr.flush()?;
        Ok(())
    }

    /// Write the sheet as a standalone CSV file.
    pub fn write_csv(&self, path: &Path) -> Result<(), csv::Error> {
        let file = std::fs::File::create(path).map_err(csv::Error::from)?;
        self.write_csv_to(file)
    }

    /// CSV serialization as a string, used by tests and fallback comparison.
    pub fn to_csv_string(&self) -> String {
        let mut buf = Vec::new();
        // Writing to a Vec cannot fail.
        self.write_csv_to(&mut buf).expect("in-memory CSV write");
        String::from_utf8(buf).expect("CSV output is UTF-8")
    }
}
