//! Snapshot data sources.
//!
//! Stops and routes are each read from a JSON array, either a local file or
//! an http(s) URL.

use std::fmt;
use std::path::PathBuf;
use std::time::Duration;

use serde::de::DeserializeOwned;
use tracing::{debug, info};

use crate::domain::{Route, Stop};

use super::error::StoreError;
use super::transit::TransitStore;

/// Default request timeout for remote sources.
const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Where one collection of records lives.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Source {
    File(PathBuf),
    Url(String),
}

impl Source {
    /// Parse a source location. `http://` and `https://` prefixes select a
    /// URL; anything else is a file path.
    pub fn parse(s: &str) -> Result<Self, StoreError> {
        let s = s.trim();
        if s.is_empty() {
            return Err(StoreError::InvalidSource("location must not be empty".into()));
        }

        let lower = s.to_ascii_lowercase();
        if lower.starts_with("http://") || lower.starts_with("https://") {
            Ok(Source::Url(s.to_string()))
        } else {
            Ok(Source::File(PathBuf::from(s)))
        }
    }

    /// Read and decode the records.
    pub async fn fetch<T: DeserializeOwned>(&self, http: &reqwest::Client) -> Result<T, StoreError> {
        let body = match self {
            Source::File(path) => {
                tokio::fs::read_to_string(path)
                    .await
                    .map_err(|source| StoreError::Io {
                        path: path.clone(),
                        source,
                    })?
            }
            Source::Url(url) => {
                let response = http.get(url).send().await?;
                let status = response.status();
                if !status.is_success() {
                    return Err(StoreError::Status {
                        url: url.clone(),
                        status: status.as_u16(),
                    });
                }
                response.text().await?
            }
        };

        debug!(source = %self, bytes = body.len(), "read source");

        serde_json::from_str(&body).map_err(|e| StoreError::Json {
            location: self.to_string(),
            message: e.to_string(),
        })
    }
}

impl fmt::Display for Source {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Source::File(path) => write!(f, "{}", path.display()),
            Source::Url(url) => f.write_str(url),
        }
    }
}

/// Loads complete snapshots from a pair of sources.
#[derive(Debug, Clone)]
pub struct SnapshotLoader {
    stops: Source,
    routes: Source,
    http: reqwest::Client,
}

impl SnapshotLoader {
    /// Create a loader for the given stop and route sources.
    pub fn new(stops: Source, routes: Source) -> Result<Self, StoreError> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(DEFAULT_TIMEOUT_SECS))
            .build()?;

        Ok(Self {
            stops,
            routes,
            http,
        })
    }

    /// Read both sources concurrently and build a validated store.
    pub async fn load(&self) -> Result<TransitStore, StoreError> {
        let (stops, routes) = futures::try_join!(
            self.stops.fetch::<Vec<Stop>>(&self.http),
            self.routes.fetch::<Vec<Route>>(&self.http),
        )?;

        info!(
            stops = stops.len(),
            routes = routes.len(),
            "loaded snapshot"
        );

        TransitStore::new(stops, routes)
    }
}
