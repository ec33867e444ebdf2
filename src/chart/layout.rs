//! Chart dimensions, margins and the fixed geometry derived from them.

use crate::chart::color::{ColorRamp, INFERNO};
use bon::Builder;

/// Space between the SVG edge and the plotting area, in pixels.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Margins {
    pub top: f64,
    pub right: f64,
    pub bottom: f64,
    pub left: f64,
}

impl Margins {
    pub fn new(top: f64, right: f64, bottom: f64, left: f64) -> Self {
        Self {
            top,
            right,
            bottom,
            left,
        }
    }
}

impl Default for Margins {
    fn default() -> Self {
        Self::new(30.0, 50.0, 200.0, 120.0)
    }
}

/// Everything that varies between heatmap renderings.
///
/// All fields have defaults matching the full-size chart with legend, so only
/// the differences need to be set.
///
/// # Examples
///
/// ```
/// use climate_heatmap::{ChartConfig, Margins};
///
/// let compact = ChartConfig::builder()
///     .width(900.0)
///     .height(500.0)
///     .margins(Margins::new(20.0, 20.0, 60.0, 100.0))
///     .show_legend(false)
///     .build();
/// assert_eq!(compact.inner_width(), 780.0);
/// assert!(!compact.show_legend);
/// ```
#[derive(Debug, Clone, Builder)]
pub struct ChartConfig {
    /// Total SVG width in pixels.
    #[builder(default = 1200.0)]
    pub width: f64,
    /// Total SVG height in pixels.
    #[builder(default = 800.0)]
    pub height: f64,
    #[builder(default)]
    pub margins: Margins,
    /// Draw the color legend below the x axis.
    #[builder(default = true)]
    pub show_legend: bool,
    /// Number of swatches in the legend strip.
    #[builder(default = 1000)]
    pub legend_steps: usize,
    /// Approximate number of ticks on the year axis and the legend axis.
    #[builder(default = 10)]
    pub tick_count: usize,
    #[builder(default = &INFERNO)]
    pub palette: &'static ColorRamp,
    #[builder(into, default = String::from("Monthly Global Land-Surface Temperature"))]
    pub title: String,
}

impl Default for ChartConfig {
    fn default() -> Self {
        Self::builder().build()
    }
}

impl ChartConfig {
    pub fn inner_width(&self) -> f64 {
        self.width - self.margins.left - self.margins.right
    }

    pub fn inner_height(&self) -> f64 {
        self.height - self.margins.top - self.margins.bottom
    }

    /// Pixel range of the year axis.
    pub fn x_range(&self) -> (f64, f64) {
        (self.margins.left, self.width - self.margins.right)
    }

    /// Pixel range of the month axis.
    pub fn y_range(&self) -> (f64, f64) {
        (self.margins.top, self.height - self.margins.bottom)
    }

    /// Width of one cell: the inner width shared by `max_year - min_year` years.
    ///
    /// A single-year dataset is treated as spanning one year.
    pub fn cell_width(&self, year_extent: (i32, i32)) -> f64 {
        let span = (year_extent.1 - year_extent.0).max(1);
        self.inner_width() / span as f64
    }

    /// Height of one cell: the inner height split into twelve months.
    pub fn cell_height(&self) -> f64 {
        self.inner_height() / 12.0
    }

    pub fn legend_width(&self) -> f64 {
        self.inner_width() / 2.0
    }

    /// Top-left corner of the legend group, centered horizontally near the bottom.
    pub fn legend_origin(&self) -> (f64, f64) {
        (
            self.width / 2.0 - self.legend_width() / 2.0,
            self.height - 80.0,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_match_full_size_chart() {
        let config = ChartConfig::default();
        assert_eq!(config.width, 1200.0);
        assert_eq!(config.height, 800.0);
        assert_eq!(config.margins, Margins::new(30.0, 50.0, 200.0, 120.0));
        assert!(config.show_legend);
        assert_eq!(config.legend_steps, 1000);
        assert_eq!(config.palette.name(), "inferno");
        assert_eq!(config.inner_width(), 1030.0);
        assert_eq!(config.inner_height(), 570.0);
        assert_eq!(config.x_range(), (120.0, 1150.0));
        assert_eq!(config.y_range(), (30.0, 600.0));
    }

    #[test]
    fn test_cell_geometry() {
        let config = ChartConfig::default();
        assert_eq!(config.cell_width((1753, 2015)), 1030.0 / 262.0);
        assert_eq!(config.cell_height(), 47.5);
    }

    #[test]
    fn test_single_year_does_not_divide_by_zero() {
        let config = ChartConfig::default();
        assert_eq!(config.cell_width((1900, 1900)), 1030.0);
    }

    #[test]
    fn test_legend_is_centered() {
        let config = ChartConfig::default();
        assert_eq!(config.legend_width(), 515.0);
        assert_eq!(config.legend_origin(), (342.5, 720.0));
    }
}
