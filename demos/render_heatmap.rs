//! demos/render_heatmap.rs
//!
//! Fetches the global temperature dataset and writes two charts: the full-size
//! HTML page with legend, and a compact SVG without one.
//!
//! To run this example:
//! cargo run --example render_heatmap

use climate_heatmap::{ChartConfig, Heatmap, Margins, OutputFormat};
use std::error::Error;

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    println!("Fetching temperature dataset...");
    let heatmap = Heatmap::new().await?;

    let page = heatmap.render_to_file().path("heatmap.html").call().await?;
    println!("Wrote {}", page.display());

    let compact = ChartConfig::builder()
        .width(1000.0)
        .height(500.0)
        .margins(Margins::new(30.0, 30.0, 60.0, 110.0))
        .show_legend(false)
        .build();
    let svg = heatmap
        .render_to_file()
        .path("heatmap-compact.svg")
        .config(compact)
        .format(OutputFormat::Svg)
        .call()
        .await?;
    println!("Wrote {}", svg.display());

    Ok(())
}
