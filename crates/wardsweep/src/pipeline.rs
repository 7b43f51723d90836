//! The analysis pipeline, top to bottom
//!
//! Load → describe → per-run aggregates → mean trajectories → correlations →
//! pivots → export. Loading is the only fatal step; every artifact write is
//! guarded individually. The table is mutated in place exactly twice, and
//! the ordering here is load-bearing: boolean normalization must precede the
//! correlation stage, rate derivation must precede the total-patients pivot.

use std::path::Path;

use tracing::{debug, info, warn};
use wardsweep_core::{aggregate, columns, correlate, describe, pivot, timeseries};
use wardsweep_core::table::Table;

use crate::export::Exporter;
use crate::plot;

/// Run the whole pipeline over one sweep table file.
pub fn run(input: &Path, out_dir: &Path) -> color_eyre::Result<()> {
    info!(input = %input.display(), "loading sweep table");
    let mut table = Table::load(input)?;
    info!(
        rows = table.n_rows(),
        columns = table.n_columns(),
        "sweep table loaded"
    );

    // Descriptive summary goes to the console.
    let summaries = describe::describe(&table);
    print!("{}", describe::render_text(&summaries));

    let mut exporter = Exporter::new(out_dir.join("analysis-summary.xlsx"));

    match aggregate::run_summary(&table) {
        Some(sheet) => {
            info!(runs = sheet.n_rows(), "computed per-run summary");
            exporter.add("Run Summary", out_dir.join("run_summary.csv"), sheet);
        }
        None => info!("run column absent; skipping run summary"),
    }
    exporter.add(
        "Sample (first 200)",
        out_dir.join("table_sample.csv"),
        table.sample_sheet(200),
    );

    match timeseries::mean_over_time(&table) {
        Some(ts) => {
            let csv_path = out_dir.join("mean_over_time.csv");
            match ts.to_sheet().write_csv(&csv_path) {
                Ok(()) => info!(path = %csv_path.display(), "wrote mean-over-time CSV"),
                Err(e) => warn!(error = %e, "mean-over-time CSV write failed"),
            }
            let png = out_dir.join("plot_mean_over_time.png");
            match plot::mean_over_time(&ts, &png) {
                Ok(()) => info!(path = %png.display(), "wrote trajectory plot"),
                Err(e) => warn!(error = %e, "trajectory plot failed"),
            }
        }
        None => info!("step column or tracked outcomes absent; skipping trajectories"),
    }

    // Mutation 1: boolean-text inputs become 1/0 before correlating.
    let converted = table.normalize_boolean_columns(columns::INPUT_COLUMNS);
    if !converted.is_empty() {
        debug!(?converted, "normalized boolean input columns");
    }

    let matrix = correlate::input_outcome_correlations(&table);
    exporter.add(
        "Input→Outcome (corr)",
        out_dir.join("input_outcome_correlations.csv"),
        matrix.to_sheet(),
    );
    if matrix.is_empty() {
        info!("no variable input/outcome pairs; skipping correlation heatmap");
    } else {
        let png = out_dir.join("plot_input_outcome_correlations.png");
        match plot::correlation_heatmap(&matrix, &png) {
            Ok(()) => info!(path = %png.display(), "wrote correlation heatmap"),
            Err(e) => warn!(error = %e, "correlation heatmap failed"),
        }
    }

    match pivot::strength_by_cleaning(&table) {
        Some(sheet) => exporter.add(
            "Strength x Cleaning",
            out_dir.join("pivot_strength_cleaning.csv"),
            sheet,
        ),
        None => info!("strength/cleaning parameter absent; skipping pivot"),
    }
    match pivot::by_admin_period(&table) {
        Some(sheet) => exporter.add(
            "Admin Period",
            out_dir.join("pivot_admin_period.csv"),
            sheet,
        ),
        None => info!("administration-period parameter absent; skipping pivot"),
    }

    // Mutation 2: derived per-patient rates before the total-patients pivot.
    let added = table.push_rate_columns();
    if !added.is_empty() {
        debug!(?added, "derived rate columns");
    }
    match pivot::by_total_patients(&table) {
        Some(sheet) => exporter.add(
            "Total Patients (rates)",
            out_dir.join("pivot_total_patients_rates.csv"),
            sheet,
        ),
        None => info!("total-patients column absent; skipping rates pivot"),
    }

    exporter.finish();
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write as _;

    const PREAMBLE: &str = "\
\"BehaviorSpace results\"\n\
\"BacteriaSim.nlogo\"\n\
\"experiment\"\n\
\"08/23/2026 10:00:00\"\n\
\"min-pxcor\",\"max-pxcor\"\n\
\"-16\",\"16\"\n";

    fn write_sweep_file(dir: &Path) -> std::path::PathBuf {
        let path = dir.join("table.csv");
        let mut f = std::fs::File::create(&path).unwrap();
        write!(
            f,
            "{PREAMBLE}\"[run number]\",\"[step]\",\"antibiotic-strength-level\",\
             \"cleaning-effectiveness\",\"total-patients\",\"patient-deaths\"\n"
        )
        .unwrap();
        for run in 1..=2 {
            for step in 0..=1 {
                writeln!(f, "{run},{step},{run},0.5,{},{run}", 10 * run).unwrap();
            }
        }
        path
    }

    #[test]
    fn test_end_to_end_produces_artifacts() {
        let dir = tempfile::tempdir().unwrap();
        let input = write_sweep_file(dir.path());

        run(&input, dir.path()).unwrap();

        // The time-series CSV is always written when the step column exists.
        let csv = std::fs::read_to_string(dir.path().join("mean_over_time.csv")).unwrap();
        assert!(csv.starts_with("[step],"));

        // Either the workbook or every fallback CSV must exist.
        let workbook = dir.path().join("analysis-summary.xlsx");
        let fallback = dir.path().join("run_summary.csv");
        assert!(workbook.exists() || fallback.exists());
    }

    #[test]
    fn test_missing_input_is_fatal() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("no-table.csv");
        assert!(run(&missing, dir.path()).is_err());
    }
}
