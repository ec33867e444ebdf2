use crate::chart::error::ChartError;
use crate::dataset::error::DatasetError;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum HeatmapError {
    #[error(transparent)]
    Dataset(#[from] DatasetError),

    #[error(transparent)]
    Chart(#[from] ChartError),

    #[error("Failed to create cache directory '{0}'")]
    CacheDirCreation(PathBuf, #[source] std::io::Error),

    #[error("Failed to determine cache directory")]
    CacheDirResolution(#[source] std::io::Error),

    #[error("Failed to write chart to '{0}'")]
    OutputWrite(PathBuf, #[source] std::io::Error),
}
