//! The main entry point: fetch the temperature dataset and render it as a heatmap.

use crate::chart::layout::ChartConfig;
use crate::chart::render::HeatmapChart;
use crate::dataset::loader::{DatasetLoader, DEFAULT_DATASET_URL};
use crate::error::HeatmapError;
use crate::types::dataset::Dataset;
use crate::utils::{ensure_cache_dir_exists, get_cache_dir};
use bon::bon;
use log::info;
use std::path::{Path, PathBuf};

/// What a render produces.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputFormat {
    /// A standalone `<svg>` document. Tooltips are the cells' `<title>` text.
    Svg,
    /// An HTML page with title, description, the chart and a hover tooltip.
    #[default]
    Page,
}

/// Client that downloads the dataset (with a local cache) and renders charts from it.
///
/// # Examples
///
/// ```no_run
/// # use climate_heatmap::{Heatmap, HeatmapError, ChartConfig};
/// # #[tokio::main]
/// # async fn main() -> Result<(), HeatmapError> {
/// let heatmap = Heatmap::new().await?;
///
/// // Full-size chart with legend, written as an HTML page.
/// heatmap.render_to_file().path("heatmap.html").call().await?;
///
/// // A smaller SVG without a legend.
/// let config = ChartConfig::builder().width(900.0).height(500.0).show_legend(false).build();
/// let svg = heatmap
///     .render()
///     .config(config)
///     .format(climate_heatmap::OutputFormat::Svg)
///     .call()
///     .await?;
/// assert!(svg.starts_with("<svg"));
/// # Ok(())
/// # }
/// ```
pub struct Heatmap {
    loader: DatasetLoader,
}

#[bon]
impl Heatmap {
    /// Creates a client caching downloads in `cache_folder`, creating it if needed.
    ///
    /// # Errors
    ///
    /// Returns [`HeatmapError::CacheDirCreation`] if the directory cannot be created.
    pub async fn with_cache_folder(cache_folder: PathBuf) -> Result<Self, HeatmapError> {
        ensure_cache_dir_exists(&cache_folder)
            .await
            .map_err(|e| HeatmapError::CacheDirCreation(cache_folder.clone(), e))?;
        Ok(Self {
            loader: DatasetLoader::new(&cache_folder),
        })
    }

    /// Creates a client using the platform cache directory
    /// (e.g. `~/.cache/climate_heatmap_cache` on Linux).
    ///
    /// # Errors
    ///
    /// Returns [`HeatmapError::CacheDirResolution`] if there is no cache directory
    /// on this platform, or [`HeatmapError::CacheDirCreation`] if it cannot be created.
    pub async fn new() -> Result<Self, HeatmapError> {
        let cache_folder = get_cache_dir().map_err(HeatmapError::CacheDirResolution)?;
        Self::with_cache_folder(cache_folder).await
    }

    /// Loads the dataset.
    ///
    /// * `.url(&str)`: Optional. Where to fetch the JSON from. Defaults to the public dataset.
    /// * `.refresh(bool)`: Optional. Ignore a cached copy and download again. Defaults to `false`.
    ///
    /// # Errors
    ///
    /// Returns [`HeatmapError::Dataset`] for network, HTTP, parse and cache failures.
    #[builder]
    pub async fn dataset(
        &self,
        url: Option<&str>,
        refresh: Option<bool>,
    ) -> Result<Dataset, HeatmapError> {
        let url = url.unwrap_or(DEFAULT_DATASET_URL);
        let dataset = self.loader.load(url, refresh.unwrap_or(false)).await?;
        Ok(dataset)
    }

    /// Loads the dataset and renders it.
    ///
    /// * `.url(&str)`: Optional. Dataset location, see [`Heatmap::dataset`].
    /// * `.refresh(bool)`: Optional. Bypass the cache. Defaults to `false`.
    /// * `.config(ChartConfig)`: Optional. Dimensions, margins and legend. Defaults to [`ChartConfig::default`].
    /// * `.format(OutputFormat)`: Optional. Defaults to [`OutputFormat::Page`].
    ///
    /// # Errors
    ///
    /// [`HeatmapError::Dataset`] if loading fails, [`HeatmapError::Chart`] if the
    /// dataset cannot be charted (empty, a month outside 1..=12, or an unrepresentable year).
    #[builder]
    pub async fn render(
        &self,
        url: Option<&str>,
        refresh: Option<bool>,
        config: Option<ChartConfig>,
        format: Option<OutputFormat>,
    ) -> Result<String, HeatmapError> {
        let dataset = self
            .dataset()
            .maybe_url(url)
            .maybe_refresh(refresh)
            .call()
            .await?;
        render_dataset(&dataset, config.unwrap_or_default(), format.unwrap_or_default())
    }

    /// Loads the dataset, renders it and writes the result to `path`.
    ///
    /// Takes the same optional arguments as [`Heatmap::render`].
    ///
    /// # Errors
    ///
    /// As [`Heatmap::render`], plus [`HeatmapError::OutputWrite`] if the file cannot be written.
    #[builder]
    pub async fn render_to_file(
        &self,
        #[builder(into)] path: PathBuf,
        url: Option<&str>,
        refresh: Option<bool>,
        config: Option<ChartConfig>,
        format: Option<OutputFormat>,
    ) -> Result<PathBuf, HeatmapError> {
        let output = self
            .render()
            .maybe_url(url)
            .maybe_refresh(refresh)
            .maybe_config(config)
            .maybe_format(format)
            .call()
            .await?;
        write_output(&path, &output).await?;
        Ok(path)
    }
}

/// Renders an already loaded dataset.
pub fn render_dataset(
    dataset: &Dataset,
    config: ChartConfig,
    format: OutputFormat,
) -> Result<String, HeatmapError> {
    let chart = HeatmapChart::new(dataset, config)?;
    let output = match format {
        OutputFormat::Svg => chart.render_svg()?,
        OutputFormat::Page => chart.render_page()?,
    };
    Ok(output)
}

async fn write_output(path: &Path, output: &str) -> Result<(), HeatmapError> {
    tokio::fs::write(path, output)
        .await
        .map_err(|e| HeatmapError::OutputWrite(path.to_path_buf(), e))?;
    info!("Wrote {} bytes to {}", output.len(), path.display());
    Ok(())
}
