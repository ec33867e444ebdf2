//! Turns a [`Dataset`] into heatmap geometry and writes it out as SVG or as a
//! self-contained HTML page.
//!
//! Every cell is a `rect.cell` carrying `data-month` (zero-based), `data-year`
//! and `data-temp` (the raw variance). These attribute names are relied on by
//! external checkers and must not change.

use crate::chart::color::Rgb;
use crate::chart::error::ChartError;
use crate::chart::layout::ChartConfig;
use crate::chart::scale::{BandScale, LinearScale, TimeScale};
use crate::chart::tooltip::{HoverState, TooltipContent};
use crate::types::dataset::{Dataset, MonthlyRecord};
use chrono::{Datelike, Month};
use log::debug;
use std::fmt::Write;

const TICK_SIZE: f64 = 6.0;
const TICK_PADDING: f64 = 3.0;
const LEGEND_BAR_HEIGHT: f64 = 30.0;

/// One rectangle of the heatmap.
#[derive(Debug, Clone, PartialEq)]
pub struct Cell {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
    pub fill: Rgb,
    /// Zero-based month, `data-month`.
    pub month_index: u32,
    /// `data-year`.
    pub year: i32,
    /// Raw variance, `data-temp`.
    pub variance: f64,
    pub tooltip: TooltipContent,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LegendSwatch {
    pub x: f64,
    pub width: f64,
    pub fill: Rgb,
}

/// The color legend: a strip of swatches over an axis in degrees.
#[derive(Debug, Clone, PartialEq)]
pub struct Legend {
    /// Translation of the legend group.
    pub origin: (f64, f64),
    pub width: f64,
    /// Variance extent of the dataset, before rounding for the axis.
    pub domain: (f64, f64),
    /// Axis scale, domain rounded outward to tick values.
    pub scale: LinearScale,
    pub swatches: Vec<LegendSwatch>,
}

/// Scales and records for one dataset, ready to render.
#[derive(Debug, Clone)]
pub struct HeatmapChart {
    config: ChartConfig,
    base_temperature: f64,
    records: Vec<MonthlyRecord>,
    year_extent: (i32, i32),
    variance_extent: (f64, f64),
    x_scale: TimeScale,
    y_scale: BandScale<Month>,
    color_scale: LinearScale,
}

impl HeatmapChart {
    /// Derives the scales for `dataset`.
    ///
    /// # Errors
    ///
    /// [`ChartError::EmptyDataset`] when there is nothing to draw,
    /// [`ChartError::InvalidMonth`] when an entry's month is not a calendar month, and
    /// [`ChartError::InvalidYear`] when its year is outside `chrono`'s date range.
    pub fn new(dataset: &Dataset, config: ChartConfig) -> Result<Self, ChartError> {
        let records = dataset.records()?;
        let year_extent = dataset.year_extent().ok_or(ChartError::EmptyDataset)?;
        let variance_extent = dataset
            .variance_extent()
            .ok_or(ChartError::EmptyDataset)?;

        let first = records
            .iter()
            .map(|r| r.year_start)
            .min()
            .ok_or(ChartError::EmptyDataset)?;
        let last = records
            .iter()
            .map(|r| r.year_start)
            .max()
            .ok_or(ChartError::EmptyDataset)?;

        let x_scale = TimeScale::new((first, last), config.x_range());
        let y_scale = BandScale::new(records.iter().map(|r| r.month), config.y_range());
        let color_scale = LinearScale::new(variance_extent, (0.0, 1.0));

        Ok(Self {
            config,
            base_temperature: dataset.base_temperature,
            records,
            year_extent,
            variance_extent,
            x_scale,
            y_scale,
            color_scale,
        })
    }

    pub fn config(&self) -> &ChartConfig {
        &self.config
    }

    pub fn x_scale(&self) -> &TimeScale {
        &self.x_scale
    }

    pub fn y_scale(&self) -> &BandScale<Month> {
        &self.y_scale
    }

    /// `(min, max)` variance across the dataset.
    pub fn variance_extent(&self) -> (f64, f64) {
        self.variance_extent
    }

    /// Where `variance` falls on the palette, `0` at the minimum and `1` at the maximum.
    pub fn color_position(&self, variance: f64) -> f64 {
        self.color_scale.scale(variance)
    }

    pub fn color(&self, variance: f64) -> Rgb {
        self.config.palette.sample(self.color_position(variance))
    }

    /// `Base temperature: 8.66℃`
    pub fn description(&self) -> String {
        format!("Base temperature: {}℃", self.base_temperature)
    }

    /// The cells in dataset order.
    pub fn cells(&self) -> Vec<Cell> {
        let width = self.config.cell_width(self.year_extent);
        let height = self.config.cell_height();
        self.records
            .iter()
            .map(|record| Cell {
                x: self.x_scale.scale(record.year_start),
                y: self
                    .y_scale
                    .scale(record.month)
                    .unwrap_or(self.config.margins.top),
                width,
                height,
                fill: self.color(record.variance),
                month_index: record.month_index(),
                year: record.year_number(),
                variance: record.variance,
                tooltip: TooltipContent::new(
                    self.base_temperature,
                    record.variance,
                    record.label(),
                    record.year_number(),
                ),
            })
            .collect()
    }

    /// The legend, or `None` when it is switched off.
    pub fn legend(&self) -> Option<Legend> {
        if !self.config.show_legend {
            return None;
        }
        let width = self.config.legend_width();
        let steps = self.config.legend_steps.max(1);
        let step_width = width / steps as f64;
        let swatches = self
            .config
            .palette
            .swatches(steps)
            .into_iter()
            .enumerate()
            .map(|(i, fill)| LegendSwatch {
                x: step_width * i as f64,
                // One pixel of overlap between neighbours.
                width: step_width + 1.0,
                fill,
            })
            .collect();
        Some(Legend {
            origin: self.config.legend_origin(),
            width,
            domain: self.variance_extent,
            scale: LinearScale::new(self.variance_extent, (0.0, width))
                .nice(self.config.tick_count),
            swatches,
        })
    }

    /// A standalone SVG document. Cells carry a `<title>` with the tooltip text.
    pub fn render_svg(&self) -> Result<String, ChartError> {
        let mut out = String::new();
        self.write_svg(&mut out, true)?;
        debug!(
            "Rendered SVG with {} cells ({} bytes)",
            self.records.len(),
            out.len()
        );
        Ok(out)
    }

    /// An HTML page with the title, description, chart and a tooltip element that
    /// follows the pointer over the cells.
    pub fn render_page(&self) -> Result<String, ChartError> {
        let mut svg = String::new();
        self.write_svg(&mut svg, false)?;

        let mut out = String::new();
        writeln!(out, "<!DOCTYPE html>")?;
        writeln!(out, "<html lang=\"en\">")?;
        writeln!(out, "<head>")?;
        writeln!(out, "<meta charset=\"utf-8\">")?;
        writeln!(out, "<title>{}</title>", escape(&self.config.title))?;
        writeln!(out, "<style>{}</style>", PAGE_STYLE)?;
        writeln!(out, "</head>")?;
        writeln!(out, "<body>")?;
        writeln!(out, "<h1 id=\"title\">{}</h1>", escape(&self.config.title))?;
        writeln!(out, "<p id=\"description\">{}</p>", escape(&self.description()))?;
        writeln!(out, "<div class=\"chart\">")?;
        out.push_str(&svg);
        writeln!(
            out,
            "<div class=\"tooltip\" id=\"tooltip\" style=\"opacity: 0\"></div>"
        )?;
        writeln!(out, "</div>")?;
        writeln!(out, "<script>{}</script>", HoverState::script())?;
        writeln!(out, "</body>")?;
        writeln!(out, "</html>")?;
        debug!(
            "Rendered page with {} cells ({} bytes)",
            self.records.len(),
            out.len()
        );
        Ok(out)
    }

    fn write_svg(&self, out: &mut String, standalone: bool) -> Result<(), ChartError> {
        let config = &self.config;
        write!(
            out,
            "<svg xmlns=\"http://www.w3.org/2000/svg\" class=\"svg\" width=\"{}\" height=\"{}\">",
            config.width, config.height
        )?;
        writeln!(out)?;

        if standalone {
            writeln!(
                out,
                "<text id=\"title\" x=\"{}\" y=\"{}\" text-anchor=\"middle\" font-size=\"18\">{}</text>",
                config.width / 2.0,
                config.margins.top / 2.0 + 6.0,
                escape(&config.title)
            )?;
            writeln!(
                out,
                "<text id=\"description\" x=\"{}\" y=\"{}\" text-anchor=\"end\" font-size=\"12\">{}</text>",
                config.width - config.margins.right,
                config.margins.top / 2.0 + 6.0,
                escape(&self.description())
            )?;
        }

        self.write_x_axis(out)?;
        self.write_y_axis(out)?;
        self.write_axis_labels(out)?;
        self.write_cells(out, standalone)?;
        if let Some(legend) = self.legend() {
            write_legend(out, &legend, config.tick_count)?;
        }
        writeln!(out, "</svg>")?;
        Ok(())
    }

    fn write_x_axis(&self, out: &mut String) -> Result<(), ChartError> {
        let (x0, x1) = self.x_scale.range();
        writeln!(
            out,
            "<g id=\"x-axis\" class=\"axis-bottom\" transform=\"translate(0, {})\" {}>",
            self.config.height - self.config.margins.bottom,
            AXIS_ATTRS
        )?;
        writeln!(
            out,
            "<path class=\"domain\" stroke=\"currentColor\" d=\"M{x0},{TICK_SIZE}V0H{x1}V{TICK_SIZE}\"></path>"
        )?;
        for tick in self.x_scale.year_ticks(self.config.tick_count) {
            write_bottom_tick(out, self.x_scale.scale(tick), &format!("{:04}", tick.year()))?;
        }
        writeln!(out, "</g>")?;
        Ok(())
    }

    fn write_y_axis(&self, out: &mut String) -> Result<(), ChartError> {
        let (y0, y1) = self.config.y_range();
        writeln!(
            out,
            "<g id=\"y-axis\" class=\"axis-left\" transform=\"translate({}, 0)\" {}>",
            self.config.margins.left, AXIS_ATTRS
        )?;
        writeln!(
            out,
            "<path class=\"domain\" stroke=\"currentColor\" d=\"M-{TICK_SIZE},{y0}H0V{y1}H-{TICK_SIZE}\"></path>"
        )?;
        let half_band = self.y_scale.bandwidth() / 2.0;
        for &month in self.y_scale.domain() {
            let Some(y) = self.y_scale.scale(month) else {
                continue;
            };
            writeln!(
                out,
                "<g class=\"tick\" transform=\"translate(0,{})\"><line stroke=\"currentColor\" x2=\"-{TICK_SIZE}\"></line><text fill=\"currentColor\" x=\"-{}\" dy=\"0.32em\" text-anchor=\"end\">{}</text></g>",
                y + half_band,
                TICK_SIZE + TICK_PADDING,
                month.name()
            )?;
        }
        writeln!(out, "</g>")?;
        Ok(())
    }

    fn write_axis_labels(&self, out: &mut String) -> Result<(), ChartError> {
        let config = &self.config;
        writeln!(
            out,
            "<text class=\"axis-label\" text-anchor=\"middle\" x=\"{}\" y=\"{}\">Year</text>",
            config.width / 2.0,
            config.height + config.margins.top - config.margins.bottom + 15.0
        )?;
        writeln!(
            out,
            "<text class=\"axis-label\" text-anchor=\"middle\" x=\"{}\" y=\"{}\" transform=\"rotate(-90)\">Month</text>",
            (-config.height + config.margins.bottom + config.margins.top) / 2.0,
            config.margins.left / 3.0
        )?;
        Ok(())
    }

    fn write_cells(&self, out: &mut String, with_titles: bool) -> Result<(), ChartError> {
        writeln!(out, "<g class=\"cells\">")?;
        for cell in self.cells() {
            write!(
                out,
                "<rect class=\"cell\" data-month=\"{}\" data-year=\"{}\" data-temp=\"{}\" x=\"{}\" y=\"{}\" width=\"{}\" height=\"{}\" fill=\"{}\" data-tooltip=\"{}\"",
                cell.month_index,
                cell.year,
                cell.variance,
                cell.x,
                cell.y,
                cell.width,
                cell.height,
                cell.fill,
                escape(&cell.tooltip.html())
            )?;
            if with_titles {
                writeln!(out, "><title>{}</title></rect>", escape(&cell.tooltip.text()))?;
            } else {
                writeln!(out, "></rect>")?;
            }
        }
        writeln!(out, "</g>")?;
        Ok(())
    }
}

const AXIS_ATTRS: &str =
    "fill=\"none\" font-size=\"10\" font-family=\"sans-serif\" text-anchor=\"middle\"";

const PAGE_STYLE: &str = "body { font-family: sans-serif; text-align: center; } \
.chart { position: relative; display: inline-block; } \
.cell:hover { stroke: #000; stroke-width: 1; } \
.tooltip { position: absolute; pointer-events: none; padding: 8px; background: rgba(255, 255, 255, 0.9); \
border: 1px solid #ccc; border-radius: 4px; font-size: 12px; text-align: left; }";

fn write_bottom_tick(out: &mut String, x: f64, label: &str) -> Result<(), ChartError> {
    writeln!(
        out,
        "<g class=\"tick\" transform=\"translate({},0)\"><line stroke=\"currentColor\" y2=\"{TICK_SIZE}\"></line><text fill=\"currentColor\" y=\"{}\" dy=\"0.71em\">{}</text></g>",
        x,
        TICK_SIZE + TICK_PADDING,
        label
    )?;
    Ok(())
}

fn write_legend(out: &mut String, legend: &Legend, tick_count: usize) -> Result<(), ChartError> {
    writeln!(
        out,
        "<g id=\"legend\" transform=\"translate({}, {})\">",
        legend.origin.0, legend.origin.1
    )?;
    let (x0, x1) = legend.scale.range();
    writeln!(out, "<g class=\"axis-bottom\" {}>", AXIS_ATTRS)?;
    writeln!(
        out,
        "<path class=\"domain\" stroke=\"currentColor\" d=\"M{x0},{TICK_SIZE}V0H{x1}V{TICK_SIZE}\"></path>"
    )?;
    for tick in legend.scale.ticks(tick_count) {
        write_bottom_tick(out, legend.scale.scale(tick), &degrees(tick))?;
    }
    writeln!(out, "</g>")?;
    writeln!(
        out,
        "<text text-anchor=\"middle\" x=\"{}\" y=\"50\">Temperature variance</text>",
        legend.width / 2.0
    )?;
    for swatch in &legend.swatches {
        writeln!(
            out,
            "<rect width=\"{}\" height=\"{LEGEND_BAR_HEIGHT}\" x=\"{}\" y=\"-{LEGEND_BAR_HEIGHT}\" fill=\"{}\"></rect>",
            swatch.width, swatch.x, swatch.fill
        )?;
    }
    writeln!(out, "</g>")?;
    Ok(())
}

/// Tick label in degrees. Negative zero prints as `0℃`.
fn degrees(value: f64) -> String {
    let value = if value == 0.0 { 0.0 } else { value };
    format!("{}℃", value)
}

/// Escapes text for use in element content and double-quoted attributes.
fn escape(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            _ => escaped.push(c),
        }
    }
    escaped
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chart::color::INFERNO;
    use crate::types::dataset::MonthlyVariance;

    fn dataset() -> Dataset {
        let mut monthly_variance = Vec::new();
        for year in 1753..=1760 {
            for month in 1..=12u32 {
                let variance = ((year - 1753) as f64 * 0.25) - (month as f64 * 0.1);
                monthly_variance.push(MonthlyVariance { year, month, variance });
            }
        }
        Dataset {
            base_temperature: 8.66,
            monthly_variance,
        }
    }

    fn chart() -> HeatmapChart {
        HeatmapChart::new(&dataset(), ChartConfig::default()).unwrap()
    }

    #[test]
    fn test_empty_dataset_is_rejected() {
        let empty = Dataset {
            base_temperature: 8.66,
            monthly_variance: vec![],
        };
        assert!(matches!(
            HeatmapChart::new(&empty, ChartConfig::default()),
            Err(ChartError::EmptyDataset)
        ));
    }

    #[test]
    fn test_cell_x_is_monotonic_in_year() {
        let mut cells = chart().cells();
        cells.sort_by_key(|c| c.year);
        for pair in cells.windows(2) {
            assert!(pair[0].x <= pair[1].x, "{:?} after {:?}", pair[1], pair[0]);
        }
        assert_eq!(cells.first().map(|c| c.x), Some(120.0));
        assert_eq!(cells.last().map(|c| c.x), Some(1150.0));
    }

    #[test]
    fn test_cell_attributes_follow_dataset() {
        let data = dataset();
        let cells = chart().cells();
        assert_eq!(cells.len(), data.monthly_variance.len());
        for (cell, raw) in cells.iter().zip(&data.monthly_variance) {
            assert_eq!(cell.month_index, raw.month - 1);
            assert_eq!(cell.year, raw.year);
            assert_eq!(cell.variance, raw.variance);
        }
    }

    #[test]
    fn test_cell_geometry() {
        let cells = chart().cells();
        assert_eq!(cells[0].width, 1030.0 / 7.0);
        assert_eq!(cells[0].height, 47.5);
        assert_eq!(cells[0].y, 30.0);
        assert_eq!(cells[11].y, 30.0 + 11.0 * 47.5);
    }

    #[test]
    fn test_extreme_variances_hit_palette_ends() {
        let chart = chart();
        let (min, max) = chart.variance_extent();
        assert_eq!(chart.color_position(min), 0.0);
        assert_eq!(chart.color_position(max), 1.0);
        assert_eq!(chart.color(min), INFERNO.sample(0.0));
        assert_eq!(chart.color(max), INFERNO.sample(1.0));

        let cells = chart.cells();
        let coldest = cells.iter().find(|c| c.variance == min).unwrap();
        let hottest = cells.iter().find(|c| c.variance == max).unwrap();
        assert_eq!(coldest.fill.to_string(), "#000004");
        assert_eq!(hottest.fill.to_string(), "#fcffa4");
    }

    #[test]
    fn test_legend_domain_is_variance_extent() {
        let chart = chart();
        let legend = chart.legend().unwrap();
        assert_eq!(legend.domain, chart.variance_extent());
        let (lo, hi) = legend.scale.domain();
        assert!(lo <= legend.domain.0 && hi >= legend.domain.1);
        assert_eq!(legend.swatches.len(), 1000);
        assert_eq!(legend.origin, (342.5, 720.0));
    }

    #[test]
    fn test_legend_can_be_disabled() {
        let config = ChartConfig::builder().show_legend(false).build();
        let chart = HeatmapChart::new(&dataset(), config).unwrap();
        assert!(chart.legend().is_none());
        assert!(!chart.render_svg().unwrap().contains("id=\"legend\""));
    }

    #[test]
    fn test_svg_contains_contract_elements() {
        let svg = chart().render_svg().unwrap();
        assert!(svg.starts_with("<svg"));
        for id in ["title", "description", "x-axis", "y-axis", "legend"] {
            assert!(svg.contains(&format!("id=\"{}\"", id)), "missing #{}", id);
        }
        assert!(svg.contains(
            "<rect class=\"cell\" data-month=\"0\" data-year=\"1753\" data-temp=\"-0.1\""
        ));
        assert_eq!(svg.matches("class=\"cell\"").count(), 96);
        assert!(svg.contains(">January</text>"));
        assert!(svg.contains(">December</text>"));
        assert!(svg.contains("Base temperature: 8.66℃"));
        assert!(svg.contains("<title>Land-surface temperature: 8.560℃"));
    }

    #[test]
    fn test_page_wires_tooltip() {
        let page = chart().render_page().unwrap();
        assert!(page.contains("id=\"tooltip\""));
        assert!(page.contains("<p id=\"description\">Base temperature: 8.66℃</p>"));
        assert!(page.contains("addEventListener(\"mouseover\""));
        assert!(page.contains("addEventListener(\"mouseout\""));
        assert!(page.contains("data-tooltip=\"Land-surface temperature: &lt;b&gt;8.560℃&lt;/b&gt;"));
        assert!(!page.contains("<title>Land-surface"));
        assert_eq!(page.matches("id=\"description\"").count(), 1);
    }

    #[test]
    fn test_page_cells_carry_what_hover_state_shows() {
        let chart = chart();
        let page = chart.render_page().unwrap();
        assert!(page.contains(&HoverState::script()));

        let cells = chart.cells();
        let mut hover = HoverState::new(cells.len());
        let index = 17;
        let cell = &cells[index];
        hover.mouse_over(index, cell);
        let tooltip = hover.tooltip();

        let rect = page
            .lines()
            .filter(|line| line.starts_with("<rect class=\"cell\""))
            .nth(index)
            .unwrap();
        let attr = |name: &str| {
            let start = rect.find(&format!(" {}=\"", name)).unwrap() + name.len() + 3;
            let len = rect[start..].find('"').unwrap();
            rect[start..start + len].to_string()
        };
        let x: f64 = attr("x").parse().unwrap();
        let y: f64 = attr("y").parse().unwrap();
        assert_eq!(x + crate::chart::tooltip::TOOLTIP_OFFSET_X, tooltip.left);
        assert_eq!(y, tooltip.top);
        assert_eq!(attr("data-year"), tooltip.data_year.unwrap().to_string());
        assert_eq!(attr("data-tooltip"), escape(&tooltip.html));
    }

    #[test]
    fn test_degree_labels() {
        assert_eq!(degrees(-0.0), "0℃");
        assert_eq!(degrees(-2.0), "-2℃");
        assert_eq!(degrees(0.5), "0.5℃");
    }

    #[test]
    fn test_escape() {
        assert_eq!(escape("<b>a & \"b\"</b>"), "&lt;b&gt;a &amp; &quot;b&quot;&lt;/b&gt;");
    }
}
