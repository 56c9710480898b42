use common::types::config::Config;
use common::util::logging::run_with_spinner_async;
use log::{debug, info, warn};
use reqwest::{StatusCode, Url};
use std::fmt;
use std::fmt::Display;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tokio::fs;

/// Seconds to wait after each successive HTTP 429 response.
pub const RETRY_DELAYS: [u64; 5] = [1, 1, 2, 3, 5];

/// Downloads remote files into `{cache_dir}/{provider}/{file name}`.
#[derive(Debug, Clone)]
pub struct Fetcher {
    cache_dir: PathBuf,
    client: reqwest::Client,
    retry_delays: Vec<Duration>,
}

impl Fetcher {
    pub fn new(cache_dir: impl Into<PathBuf>) -> Self {
        Self {
            cache_dir: cache_dir.into(),
            client: reqwest::Client::new(),
            retry_delays: RETRY_DELAYS.iter().map(|s| Duration::from_secs(*s)).collect(),
        }
    }

    pub fn from_config(config: &Config) -> Self {
        Self::new(&config.cache_path)
    }

    pub fn with_retry_delays(mut self, delays: Vec<Duration>) -> Self {
        self.retry_delays = delays;
        self
    }

    pub fn cache_dir(&self) -> &Path {
        &self.cache_dir
    }

    pub fn path_for(&self, provider: &str, url: &str) -> Result<PathBuf, FetchError> {
        let parsed = Url::parse(url).map_err(|_| FetchError::NoFileName(url.to_string()))?;
        let file_name = parsed
            .path_segments()
            .and_then(|mut segments| segments.next_back())
            .filter(|name| !name.is_empty())
            .ok_or_else(|| FetchError::NoFileName(url.to_string()))?;

        Ok(self.cache_dir.join(provider).join(file_name))
    }

    /// Return the path of the cached copy of `url`, downloading it first if it
    /// is missing or `force` is set.
    pub async fn fetch(&self, provider: &str, url: &str, force: bool) -> Result<PathBuf, FetchError> {
        let path = self.path_for(provider, url)?;
        if path.exists() && !force {
            debug!(target: "fetch", "Using cached {}", path.display());
            return Ok(path);
        }

        let task = format!("Downloading {url}");
        let content = run_with_spinner_async("fetch", &task, self.download(url)).await?;

        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).await?;
        }
        fs::write(&path, content).await?;
        info!(target: "fetch", "Wrote {}", path.display());

        Ok(path)
    }

    async fn download(&self, url: &str) -> Result<Vec<u8>, FetchError> {
        let mut delays = self.retry_delays.iter();
        loop {
            let response = self.client.get(url).send().await?;
            if response.status() != StatusCode::TOO_MANY_REQUESTS {
                let response = response.error_for_status()?;
                return Ok(response.bytes().await?.to_vec());
            }

            match delays.next() {
                Some(delay) => {
                    warn!(target: "fetch", "Rate limited by {}; retrying in {:?}", url, delay);
                    tokio::time::sleep(*delay).await;
                }
                None => return Err(FetchError::RateLimited(url.to_string())),
            }
        }
    }
}

#[derive(thiserror::Error, Debug)]
pub enum FetchError {
    Reqwest(#[from] reqwest::Error),
    File(#[from] std::io::Error),
    RateLimited(String),
    NoFileName(String),
}

impl Display for FetchError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            FetchError::Reqwest(err) => write!(f, "{}", err),
            FetchError::File(err) => write!(f, "{}", err),
            FetchError::RateLimited(url) => write!(f, "Still rate limited by {} after retrying", url),
            FetchError::NoFileName(url) => write!(f, "Cannot determine a file name for {}", url),
        }
    }
}
