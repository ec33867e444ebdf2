use crate::dataset::error::DatasetError;
use crate::types::dataset::Dataset;
use bincode::config::{Configuration, Fixint, LittleEndian};
use futures_util::TryStreamExt;
use log::{info, warn};
use reqwest::Client;
use std::io;
use std::path::{Path, PathBuf};
use tokio::io::AsyncReadExt;
use tokio_util::io::StreamReader;

pub const DEFAULT_DATASET_URL: &str =
    "https://raw.githubusercontent.com/freeCodeCamp/ProjectReferenceData/master/global-temperature.json";
const BINCODE_CONFIG: Configuration<LittleEndian, Fixint> =
    bincode::config::standard().with_fixed_int_encoding();
const MAX_CACHE_NAME_LEN: usize = 120;

/// FNV-1a over the URL bytes. Stable across platforms and builds, unlike `DefaultHasher`.
fn url_hash(url: &str) -> u64 {
    url.bytes().fold(0xcbf2_9ce4_8422_2325_u64, |hash, byte| {
        (hash ^ u64::from(byte)).wrapping_mul(0x0000_0100_0000_01b3)
    })
}

/// Downloads the dataset and keeps a bincode copy of it in the cache directory.
#[derive(Debug, Clone)]
pub struct DatasetLoader {
    cache_dir: PathBuf,
    download_client: Client,
}

impl DatasetLoader {
    pub fn new(cache_dir: &Path) -> Self {
        Self {
            cache_dir: cache_dir.to_path_buf(),
            download_client: Client::new(),
        }
    }

    /// Cache file for a dataset URL.
    ///
    /// The name is the URL without its scheme, with every character outside
    /// `[A-Za-z0-9_-]` replaced by `_`, followed by a hash of the full URL. Two
    /// URLs only share a cache file if they are identical.
    pub fn cache_path(&self, url: &str) -> PathBuf {
        let without_scheme = url.split_once("://").map_or(url, |(_, rest)| rest);
        let mut name: String = without_scheme
            .trim_end_matches('/')
            .chars()
            .map(|c| if c.is_ascii_alphanumeric() || c == '-' || c == '_' { c } else { '_' })
            .collect();
        name.truncate(MAX_CACHE_NAME_LEN);
        if name.is_empty() {
            name.push_str("dataset");
        }
        self.cache_dir
            .join(format!("{}-{:016x}.bin", name, url_hash(url)))
    }

    /// Returns the cached dataset for `url` if there is one, otherwise downloads it
    /// and writes the cache. `refresh` skips the cache lookup.
    pub async fn load(&self, url: &str, refresh: bool) -> Result<Dataset, DatasetError> {
        let cache_file = self.cache_path(url);

        if !refresh && tokio::fs::metadata(&cache_file).await.is_ok() {
            info!("Cache hit for dataset {} at {:?}", url, cache_file);
            let path_clone = cache_file.clone();
            return tokio::task::spawn_blocking(move || Self::read_cache(&path_clone)).await?;
        }

        warn!("Cache miss for dataset {}. Downloading.", url);
        let dataset = self.fetch(url).await?;
        Self::write_cache(&dataset, &cache_file).await?;
        Ok(dataset)
    }

    /// Downloads and parses the dataset, bypassing the cache entirely.
    pub async fn fetch(&self, url: &str) -> Result<Dataset, DatasetError> {
        info!("Downloading dataset from {}", url);
        let response = self
            .download_client
            .get(url)
            .send()
            .await
            .map_err(|e| DatasetError::NetworkRequest(url.to_string(), e))?;

        let response = match response.error_for_status() {
            Ok(resp) => resp,
            Err(e) => {
                warn!("HTTP error for {}: {:?}", url, e);
                return Err(if let Some(status) = e.status() {
                    DatasetError::HttpStatus {
                        url: url.to_string(),
                        status,
                        source: e,
                    }
                } else {
                    DatasetError::NetworkRequest(url.to_string(), e)
                });
            }
        };

        let stream = response.bytes_stream().map_err(io::Error::other);
        let mut reader = StreamReader::new(stream);
        let mut body = Vec::new();
        reader.read_to_end(&mut body).await?;

        let parse_start = std::time::Instant::now();
        let dataset =
            tokio::task::spawn_blocking(move || Dataset::from_json_slice(&body)).await??;
        info!(
            "Parsed {} monthly entries in {:?}",
            dataset.monthly_variance.len(),
            parse_start.elapsed()
        );
        Ok(dataset)
    }

    fn read_cache(cache_path: &Path) -> Result<Dataset, DatasetError> {
        let bytes = std::fs::read(cache_path)
            .map_err(|e| DatasetError::CacheRead(cache_path.to_path_buf(), e))?;
        let (dataset, _) = bincode::serde::decode_from_slice::<Dataset, _>(&bytes, BINCODE_CONFIG)
            .map_err(|e| DatasetError::CacheDecode(cache_path.to_path_buf(), Box::new(e)))?;
        Ok(dataset)
    }

    async fn write_cache(dataset: &Dataset, cache_path: &Path) -> Result<(), DatasetError> {
        let owned = dataset.clone();
        let bytes = tokio::task::spawn_blocking(move || {
            bincode::serde::encode_to_vec(&owned, BINCODE_CONFIG)
                .map_err(|e| DatasetError::CacheEncode(Box::new(e)))
        })
        .await??;
        tokio::fs::write(cache_path, &bytes)
            .await
            .map_err(|e| DatasetError::CacheWrite(cache_path.to_path_buf(), e))?;
        info!(
            "Wrote dataset cache ({} bytes) to {}",
            bytes.len(),
            cache_path.display()
        );
        Ok(())
    }
}
