//! HTTP retrieval of sealed blobs.

use anyhow::Context;
use keepsake_core::RetrievalError;
use reqwest::header::{CACHE_CONTROL, PRAGMA};
use std::time::Duration;

/// Plain-GET fetcher for sealed blobs.
///
/// Every request carries no-cache headers: the encrypted payload must never
/// be served stale. Failures use the transport's own semantics only; there
/// are no retries here.
#[derive(Debug, Clone)]
pub struct BlobFetcher {
    client: reqwest::Client,
}

impl BlobFetcher {
    pub fn new(timeout: Duration) -> anyhow::Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .context("building HTTP client")?;
        Ok(Self { client })
    }

    /// GET the blob at `url` into memory.
    pub async fn fetch(&self, url: &str) -> Result<Vec<u8>, RetrievalError> {
        let response = self
            .client
            .get(url)
            .header(CACHE_CONTROL, "no-cache")
            .header(PRAGMA, "no-cache")
            .send()
            .await
            .map_err(|e| RetrievalError::Network {
                url: url.to_string(),
                reason: e.to_string(),
            })?;

        let status = response.status();
        if !status.is_success() {
            return Err(RetrievalError::Status {
                status: status.as_u16(),
                url: url.to_string(),
            });
        }

        let body = response.bytes().await.map_err(|e| RetrievalError::Network {
            url: url.to_string(),
            reason: e.to_string(),
        })?;

        tracing::debug!(url, bytes = body.len(), "fetched sealed blob");
        Ok(body.to_vec())
    }
}
