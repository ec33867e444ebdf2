//! Fetch the global land-surface temperature dataset and render it as a heatmap:
//! one cell per year and month, colored by the month's deviation from the base
//! temperature, with axes, a color legend and hover tooltips.

mod chart;
mod dataset;
mod error;
mod heatmap;
mod types;
mod utils;

pub use error::HeatmapError;
pub use heatmap::*;

pub use chart::color::{ColorRamp, Rgb, INFERNO, VIRIDIS};
pub use chart::layout::{ChartConfig, Margins};
pub use chart::render::{Cell, HeatmapChart, Legend, LegendSwatch};
pub use chart::scale::{extent, ticks, BandScale, LinearScale, TimeScale};
pub use chart::tooltip::{HoverState, TooltipContent, TooltipView};

pub use dataset::loader::{DatasetLoader, DEFAULT_DATASET_URL};
pub use types::dataset::{Dataset, MonthlyRecord, MonthlyVariance, Year};

pub use chart::error::ChartError;
pub use dataset::error::DatasetError;
