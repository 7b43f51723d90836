//! Static plot rendering
//!
//! Two artifacts: the multi-series mean-over-time line plot and the
//! annotated input→outcome correlation heatmap. Rendering failures are
//! reported by the caller and never abort the pipeline.

use std::error::Error;
use std::path::Path;

use plotters::prelude::*;
use plotters::style::FontTransform;
use plotters::style::text_anchor::{HPos, Pos, VPos};
use wardsweep_core::correlate::CorrelationMatrix;
use wardsweep_core::timeseries::TimeSeries;

/// Overlaid line plot: one series per tracked outcome, x = step, y = mean.
pub fn mean_over_time(ts: &TimeSeries, path: &Path) -> Result<(), Box<dyn Error>> {
    let mut x_min = f64::INFINITY;
    let mut x_max = f64::NEG_INFINITY;
    let mut y_min = f64::INFINITY;
    let mut y_max = f64::NEG_INFINITY;
    for point in &ts.points {
        x_min = x_min.min(point.step);
        x_max = x_max.max(point.step);
        for m in point.means.iter().flatten() {
            y_min = y_min.min(*m);
            y_max = y_max.max(*m);
        }
    }
    if !x_min.is_finite() || !y_min.is_finite() {
        return Err("no plottable points in time series".into());
    }
    let (x_min, x_max) = pad_range(x_min, x_max);
    let (y_min, y_max) = pad_range(y_min, y_max);

    let root = BitMapBackend::new(path, (1600, 1000)).into_drawing_area();
    root.fill(&WHITE)?;

    let mut chart = ChartBuilder::on(&root)
        .caption("Mean outcomes over time across runs", ("sans-serif", 36))
        .margin(20)
        .x_label_area_size(60)
        .y_label_area_size(80)
        .build_cartesian_2d(x_min..x_max, y_min..y_max)?;

    chart
        .configure_mesh()
        .x_desc("step")
        .y_desc("mean value")
        .draw()?;

    for (i, name) in ts.columns.iter().enumerate() {
        let color = Palette99::pick(i).to_rgba();
        chart
            .draw_series(LineSeries::new(ts.series(i), color.stroke_width(2)))?
            .label(name.clone())
            .legend(move |(x, y)| {
                PathElement::new(vec![(x, y), (x + 20, y)], color.stroke_width(2))
            });
    }

    chart
        .configure_series_labels()
        .background_style(WHITE.mix(0.85))
        .border_style(BLACK)
        .position(SeriesLabelPosition::UpperRight)
        .draw()?;

    root.present()?;
    Ok(())
}

/// Annotated heatmap of the correlation matrix. Cells excluded by the
/// variance filter never reach here; cells with too few complete pairs are
/// drawn neutral and annotated "N/A".
pub fn correlation_heatmap(matrix: &CorrelationMatrix, path: &Path) -> Result<(), Box<dyn Error>> {
    if matrix.is_empty() {
        return Err("correlation matrix has no rows or columns".into());
    }

    const CELL_W: u32 = 150;
    const CELL_H: u32 = 48;
    const LEFT: u32 = 340;
    const TOP: u32 = 70;
    const BOTTOM: u32 = 320;
    const RIGHT: u32 = 30;

    let n_rows = matrix.inputs.len() as u32;
    let n_cols = matrix.outcomes.len() as u32;
    let width = LEFT + n_cols * CELL_W + RIGHT;
    let height = TOP + n_rows * CELL_H + BOTTOM;

    let root = BitMapBackend::new(path, (width, height)).into_drawing_area();
    root.fill(&WHITE)?;

    root.draw(&Text::new(
        "Input→Outcome Correlations (Pearson)",
        (LEFT as i32, 24),
        ("sans-serif", 28).into_font(),
    ))?;

    let annot_style =
        TextStyle::from(("sans-serif", 18).into_font()).pos(Pos::new(HPos::Center, VPos::Center));
    let row_style =
        TextStyle::from(("sans-serif", 18).into_font()).pos(Pos::new(HPos::Right, VPos::Center));
    let col_style =
        TextStyle::from(("sans-serif", 16).into_font().transform(FontTransform::Rotate90))
            .pos(Pos::new(HPos::Left, VPos::Center));

    for (r, input) in matrix.inputs.iter().enumerate() {
        let y0 = (TOP + r as u32 * CELL_H) as i32;
        root.draw(&Text::new(
            shorten(input, 42),
            (LEFT as i32 - 10, y0 + CELL_H as i32 / 2),
            row_style.clone(),
        ))?;

        for (c, coeff) in matrix.cells[r].iter().enumerate() {
            let x0 = (LEFT + c as u32 * CELL_W) as i32;
            let (x1, y1) = (x0 + CELL_W as i32, y0 + CELL_H as i32);

            let fill = match coeff {
                Some(r) => diverging_color(*r),
                None => RGBColor(224, 224, 224),
            };
            root.draw(&Rectangle::new([(x0, y0), (x1, y1)], fill.filled()))?;
            root.draw(&Rectangle::new([(x0, y0), (x1, y1)], BLACK.stroke_width(1)))?;

            let annot = match coeff {
                Some(r) => format!("{r:.2}"),
                None => "N/A".to_string(),
            };
            root.draw(&Text::new(
                annot,
                (x0 + CELL_W as i32 / 2, y0 + CELL_H as i32 / 2),
                annot_style.clone(),
            ))?;
        }
    }

    let grid_bottom = (TOP + n_rows * CELL_H) as i32;
    for (c, outcome) in matrix.outcomes.iter().enumerate() {
        let cx = (LEFT + c as u32 * CELL_W) as i32 + CELL_W as i32 / 2;
        root.draw(&Text::new(
            shorten(outcome, 40),
            (cx, grid_bottom + 10),
            col_style.clone(),
        ))?;
    }

    root.present()?;
    Ok(())
}

/// Linear blue–white–red scale over [-1, 1].
fn diverging_color(r: f64) -> RGBColor {
    let t = r.clamp(-1.0, 1.0);
    let lerp = |a: u8, b: u8, f: f64| (a as f64 + (b as f64 - a as f64) * f).round() as u8;
    let (blue, white, red) = ((59, 76, 192), (255, 255, 255), (180, 4, 38));
    if t < 0.0 {
        let f = t + 1.0; // 0 at -1, 1 at 0
        RGBColor(
            lerp(blue.0, white.0, f),
            lerp(blue.1, white.1, f),
            lerp(blue.2, white.2, f),
        )
    } else {
        RGBColor(
            lerp(white.0, red.0, t),
            lerp(white.1, red.1, t),
            lerp(white.2, red.2, t),
        )
    }
}

fn pad_range(min: f64, max: f64) -> (f64, f64) {
    if min == max {
        (min - 0.5, max + 0.5)
    } else {
        let pad = (max - min) * 0.03;
        (min - pad, max + pad)
    }
}

fn shorten(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        s.to_string()
    } else {
        let head: String = s.chars().take(max.saturating_sub(1)).collect();
        format!("{head}…")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_diverging_color_endpoints() {
        assert_eq!(diverging_color(-1.0), RGBColor(59, 76, 192));
        assert_eq!(diverging_color(0.0), RGBColor(255, 255, 255));
        assert_eq!(diverging_color(1.0), RGBColor(180, 4, 38));
        // Out-of-range coefficients clamp instead of wrapping.
        assert_eq!(diverging_color(5.0), diverging_color(1.0));
    }

    #[test]
    fn test_pad_range_degenerate() {
        assert_eq!(pad_range(3.0, 3.0), (2.5, 3.5));
        let (lo, hi) = pad_range(0.0, 10.0);
        assert!(lo < 0.0 && hi > 10.0);
    }

    #[test]
    fn test_shorten_keeps_short_names() {
        assert_eq!(shorten("patient-deaths", 40), "patient-deaths");
        let long = "x".repeat(60);
        let short = shorten(&long, 40);
        assert_eq!(short.chars().count(), 40);
        assert!(short.ends_with('…'));
    }
}
