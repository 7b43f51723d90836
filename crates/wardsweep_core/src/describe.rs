//! Descriptive summary of numeric columns

use crate::stats;
use crate::table::Table;

/// Count/mean/std/min/quartiles/max for one numeric column.
#[derive(Debug, Clone)]
pub struct ColumnSummary {
    pub name: String,
    pub count: usize,
    pub mean: Option<f64>,
    pub std: Option<f64>,
    pub min: Option<f64>,
    pub q25: Option<f64>,
    pub median: Option<f64>,
    pub q75: Option<f64>,
    pub max: Option<f64>,
}

/// Summarize every numeric column of the table.
///
/// Columns containing any text cell are skipped; an empty table yields an
/// empty summary rather than an error.
pub fn describe(table: &Table) -> Vec<ColumnSummary> {
    table
        .columns()
        .iter()
        .filter(|c| c.is_numeric())
        .map(|col| {
            let mut xs = col.numeric_values();
            xs.sort_by(f64::total_cmp);
            ColumnSummary {
                name: col.name.clone(),
                count: xs.len(),
                mean: stats::mean(&xs),
                std: stats::sample_std(&xs),
                min: xs.first().copied(),
                q25: stats::percentile(&xs, 0.25),
                median: stats::percentile(&xs, 0.50),
                q75: stats::percentile(&xs, 0.75),
                max: xs.last().copied(),
            }
        })
        .collect()
}

/// Aligned text rendering for console output.
pub fn render_text(summaries: &[ColumnSummary]) -> String {
    if summaries.is_empty() {
        return "no numeric columns\n".to_string();
    }
    let fmt_opt = |v: Option<f64>| match v {
        Some(v) => format!("{v:.4}"),
        None => "-".to_string(),
    };
    let mut rows: Vec<[String; 9]> = vec![[
        "column".into(),
        "count".into(),
        "mean".into(),
        "std".into(),
        "min".into(),
        "25%".into(),
        "50%".into(),
        "75%".into(),
        "max".into(),
    ]];
    for s in summaries {
        rows.push([
            s.name.clone(),
            s.count.to_string(),
            fmt_opt(s.mean),
            fmt_opt(s.std),
            fmt_opt(s.min),
            fmt_opt(s.q25),
            fmt_opt(s.median),
            fmt_opt(s.q75),
            fmt_opt(s.max),
        ]);
    }
    let mut widths = [0usize; 9];
    for row in &rows {
        for (w, field) in widths.iter_mut().zip(row.iter()) {
            *w = (*w).max(field.len());
        }
    }
    let mut out = String::new();
    for row in &rows {
        for (i, (field, &w)) in row.iter().zip(widths.iter()).enumerate() {
            if i > 0 {
                out.push_str("  ");
            }
            if i == 0 {
                out.push_str(&format!("{field:<w$}"));
            } else {
                out.push_str(&format!("{field:>w$}"));
            }
        }
        out.push('\n');
    }
    out
}
