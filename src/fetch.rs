//! Network fetch used by the `download:` directive.

use std::fs;
use std::path::Path;
use std::time::Duration;

use log::{debug, info};

use crate::error::{YangError, YangResult};

/// Downloads a URL to a destination path.
pub trait Fetcher {
    fn fetch(&self, url: &str, destination: &Path) -> YangResult<()>;
}

/// Blocking HTTP(S) fetcher.
#[derive(Debug, Clone, Default)]
pub struct HttpFetcher {
    timeout: Option<Duration>,
}

impl HttpFetcher {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.timeout = timeout;
        self
    }
}

impl Fetcher for HttpFetcher {
    fn fetch(&self, url: &str, destination: &Path) -> YangResult<()> {
        let download_error = |message: String| YangError::DownloadError {
            url: url.to_string(),
            message,
        };

        // `None` disables reqwest's 30s default.
        let client = reqwest::blocking::Client::builder()
            .timeout(self.timeout)
            .build()
            .map_err(|e| download_error(e.to_string()))?;

        info!("Fetching {}", url);
        let response = client.get(url).send().map_err(|e| download_error(e.to_string()))?;
        if !response.status().is_success() {
            return Err(download_error(format!("HTTP {}", response.status())));
        }

        let bytes = response.bytes().map_err(|e| download_error(e.to_string()))?;
        fs::write(destination, &bytes)?;
        debug!("Wrote {} bytes to {}", bytes.len(), destination.display());
        Ok(())
    }
}
