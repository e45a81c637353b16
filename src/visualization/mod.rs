//! Visualization of signal tables.
//!
//! Every column of a [`Table`] is drawn as a line against row index using
//! the plotters library. No text is rendered, so no system fonts are needed.

use std::path::Path;

use plotters::prelude::*;
use plotters_bitmap::BitMapBackend;
use thiserror::Error;

use crate::config::PlotConfig;
use crate::core::table::Table;

/// Errors that can occur during visualization.
#[derive(Error, Debug)]
pub enum VisualizationError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Plotting error: {0}")]
    PlottingError(String),

    #[error("Empty table")]
    EmptyTable,
}

/// Result type for visualization operations.
pub type Result<T> = std::result::Result<T, VisualizationError>;

/// Color palette cycled through by column.
const SERIES_COLORS: &[(u8, u8, u8)] = &[
    (228, 26, 28),   // Red
    (55, 126, 184),  // Blue
    (77, 175, 74),   // Green
    (152, 78, 163),  // Purple
    (255, 127, 0),   // Orange
    (166, 86, 40),   // Brown
    (247, 129, 191), // Pink
    (153, 153, 153), // Gray
    (0, 206, 209),   // Turquoise
    (138, 43, 226),  // Blue Violet
];

/// Color used for the zero baseline.
const BASELINE_COLOR: (u8, u8, u8) = (200, 200, 200);

fn series_color(column: usize) -> RGBColor {
    let c = SERIES_COLORS[column % SERIES_COLORS.len()];
    RGBColor(c.0, c.1, c.2)
}

/// Plot every column of `table` as a line series and save as PNG.
///
/// # Arguments
///
/// * `output_path` - Path to save the PNG image
/// * `table` - The table to draw
/// * `config` - Image size and stroke width
pub fn plot_table(output_path: &Path, table: &Table, config: &PlotConfig) -> Result<()> {
    if table.is_empty() {
        return Err(VisualizationError::EmptyTable);
    }

    if let Some(parent) = output_path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)?;
        }
    }

    let (y_min, y_max) = compute_bounds(table);
    let y_padding = (y_max - y_min) * 0.05;
    let x_max = (table.n_rows().saturating_sub(1)).max(1) as f64;

    let root = BitMapBackend::new(output_path, (config.width, config.height))
        .into_drawing_area();

    root.fill(&WHITE)
        .map_err(|e| VisualizationError::PlottingError(e.to_string()))?;

    let mut chart = ChartBuilder::on(&root)
        .margin(10)
        .build_cartesian_2d(0.0..x_max, (y_min - y_padding)..(y_max + y_padding))
        .map_err(|e| VisualizationError::PlottingError(e.to_string()))?;

    let baseline = RGBColor(BASELINE_COLOR.0, BASELINE_COLOR.1, BASELINE_COLOR.2);
    chart
        .draw_series(LineSeries::new(
            [(0.0, 0.0), (x_max, 0.0)],
            baseline.stroke_width(1),
        ))
        .map_err(|e| VisualizationError::PlottingError(e.to_string()))?;

    for (column, values) in table.columns().iter().enumerate() {
        let style = series_color(column).stroke_width(config.line_width);
        chart
            .draw_series(LineSeries::new(
                values.iter().enumerate().map(|(row, &v)| (row as f64, v)),
                style,
            ))
            .map_err(|e| VisualizationError::PlottingError(e.to_string()))?;
    }

    root.present()
        .map_err(|e| VisualizationError::PlottingError(e.to_string()))?;

    Ok(())
}

/// Compute the min/max over all finite values, always including zero.
fn compute_bounds(table: &Table) -> (f64, f64) {
    let mut y_min = 0.0_f64;
    let mut y_max = 0.0_f64;

    for &v in table.columns().iter().flatten() {
        if !v.is_finite() {
            continue;
        }
        if v < y_min { y_min = v; }
        if v > y_max { y_max = v; }
    }

    if (y_max - y_min).abs() < f64::EPSILON {
        y_min -= 1.0;
        y_max += 1.0;
    }

    (y_min, y_max)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_compute_bounds_includes_zero() {
        let table = Table::from_columns(vec![vec![2.0, 5.0], vec![3.0, 1.0]]).unwrap();
        assert_eq!(compute_bounds(&table), (0.0, 5.0));
    }

    #[test]
    fn test_compute_bounds_flat() {
        let table = Table::from_columns(vec![vec![0.0, 0.0]]).unwrap();
        assert_eq!(compute_bounds(&table), (-1.0, 1.0));
    }

    #[test]
    fn test_series_color_cycles() {
        let first = series_color(0);
        let wrapped = series_color(SERIES_COLORS.len());
        assert_eq!((first.0, first.1, first.2), (wrapped.0, wrapped.1, wrapped.2));
    }

    #[test]
    fn test_plot_empty_table() {
        let table = Table::from_columns(Vec::new()).unwrap();
        let result = plot_table(Path::new("unused.png"), &table, &PlotConfig::default());
        assert!(matches!(result, Err(VisualizationError::EmptyTable)));
    }
}
