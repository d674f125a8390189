//! Option list and usage frequency providers

use crate::domain::{Catalog, Frequency};
use crate::error::{ProdlogError, Result};
use crate::infrastructure::{FileSystemRepository, WorkspaceRepository};
use reqwest::Client;
use serde::Deserialize;
use std::fs;
use std::time::Duration;

const LISTS_CACHE: &str = "cache/lists.json";

fn is_url(source: &str) -> bool {
    source.starts_with("http://") || source.starts_with("https://")
}

/// Loads operator/machine/operation lists.
///
/// Falls back from the configured source to the last cached copy, and from
/// there to empty lists. Never fails.
#[derive(Debug, Clone)]
pub struct ListProvider {
    repository: FileSystemRepository,
    source: String,
    client: Client,
}

impl ListProvider {
    pub fn new(
        repository: FileSystemRepository,
        source: impl Into<String>,
        timeout: Duration,
    ) -> Result<Self> {
        Ok(ListProvider {
            repository,
            source: source.into(),
            client: Client::builder().timeout(timeout).build()?,
        })
    }

    pub async fn load(&self) -> Catalog {
        match self.fetch_source().await {
            Ok(catalog) => {
                if let Err(e) = self.repository.write_record(LISTS_CACHE, &catalog) {
                    tracing::warn!(error = %e, "could not refresh cached lists");
                }
                catalog
            }
            Err(e) => {
                tracing::warn!(source = %self.source, error = %e, "lists unavailable, trying cache");
                self.repository
                    .read_record::<Catalog>(LISTS_CACHE)
                    .unwrap_or_else(|| {
                        tracing::warn!("no cached lists, continuing with empty lists");
                        Catalog::default()
                    })
            }
        }
    }

    async fn fetch_source(&self) -> Result<Catalog> {
        if is_url(&self.source) {
            let catalog = self
                .client
                .get(&self.source)
                .send()
                .await?
                .error_for_status()?
                .json::<Catalog>()
                .await?;
            return Ok(catalog);
        }

        let path = self.repository.root().join(&self.source);
        let contents = fs::read_to_string(&path).map_err(|e| {
            ProdlogError::Storage(format!("could not read {}: {}", path.display(), e))
        })?;
        Ok(serde_json::from_str(&contents)?)
    }
}

#[derive(Debug, Deserialize)]
struct FrequencyResponse {
    #[serde(default)]
    success: bool,
    #[serde(default)]
    frequency: Option<Frequency>,
}

/// Usage counts from `GET {api_base}/api/frequency`; optional everywhere it is used
#[derive(Debug, Clone)]
pub struct FrequencyProvider {
    client: Client,
    base_url: String,
}

impl FrequencyProvider {
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Result<Self> {
        Ok(FrequencyProvider {
            client: Client::builder().timeout(timeout).build()?,
            base_url: base_url.into(),
        })
    }

    pub async fn fetch(&self) -> Option<Frequency> {
        let url = format!("{}/api/frequency", self.base_url.trim_end_matches('/'));
        match self.try_fetch(&url).await {
            Ok(freq) => freq,
            Err(e) => {
                tracing::warn!(%url, error = %e, "frequency data not available");
                None
            }
        }
    }

    async fn try_fetch(&self, url: &str) -> Result<Option<Frequency>> {
        let body: FrequencyResponse = self
            .client
            .get(url)
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;

        Ok(if body.success { body.frequency } else { None })
    }
}
