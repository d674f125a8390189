//! Remote batch sink: `POST {api_base}/api/logs/batch`

use crate::domain::LogEntry;
use crate::error::{ProdlogError, Result};
use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// What the sink reported for an accepted batch
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SinkReceipt {
    pub inserted: usize,
}

/// Append-only endpoint taking a whole batch in one request
#[async_trait]
pub trait BatchSink: Send + Sync {
    async fn send(&self, logs: &[LogEntry]) -> Result<SinkReceipt>;
}

#[derive(Serialize)]
struct BatchRequest<'a> {
    logs: &'a [LogEntry],
}

#[derive(Debug, Deserialize)]
struct BatchResponse {
    #[serde(default)]
    success: bool,
    #[serde(default)]
    inserted: Option<usize>,
    #[serde(default)]
    error: Option<String>,
    #[serde(default)]
    errors: Vec<serde_json::Value>,
}

impl BatchResponse {
    /// Failure response, unless the server reports rows it already stored
    fn into_failure(self, status: StatusCode, sent: usize) -> ProdlogError {
        match self.inserted {
            Some(inserted) if inserted > 0 => ProdlogError::PartialAcceptance { sent, inserted },
            _ => ProdlogError::SinkRejected {
                status: status.as_u16(),
                message: self.failure_message(),
            },
        }
    }

    fn failure_message(&self) -> String {
        let base = self
            .error
            .clone()
            .unwrap_or_else(|| "Server did not confirm success".to_string());
        if self.errors.is_empty() {
            base
        } else {
            format!("{} ({} entries failed)", base, self.errors.len())
        }
    }
}

/// Turn a raw sink response into a receipt or a submission error.
pub fn classify_response(status: StatusCode, body: &str, sent: usize) -> Result<SinkReceipt> {
    let body = body.trim();

    if !status.is_success() {
        let message = match serde_json::from_str::<BatchResponse>(body) {
            Ok(parsed) => return Err(parsed.into_failure(status, sent)),
            Err(_) if body.is_empty() => "no response body".to_string(),
            Err(_) => body.to_string(),
        };
        return Err(ProdlogError::SinkRejected {
            status: status.as_u16(),
            message,
        });
    }

    // Some proxies answer 204 or an empty 200 on success
    if status == StatusCode::NO_CONTENT || body.is_empty() {
        return Ok(SinkReceipt { inserted: sent });
    }

    let parsed: BatchResponse = serde_json::from_str(body).map_err(|e| {
        ProdlogError::MalformedResponse(format!("HTTP {}: {}", status.as_u16(), e))
    })?;

    if !parsed.success {
        return Err(parsed.into_failure(status, sent));
    }

    Ok(SinkReceipt {
        inserted: parsed.inserted.unwrap_or(sent),
    })
}

/// BatchSink over HTTP
#[derive(Debug, Clone)]
pub struct HttpSink {
    client: Client,
    base_url: String,
}

impl HttpSink {
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Result<Self> {
        let client = Client::builder().timeout(timeout).build()?;
        Ok(HttpSink {
            client,
            base_url: base_url.into(),
        })
    }

    fn url(&self) -> String {
        format!("{}/api/logs/batch", self.base_url.trim_end_matches('/'))
    }
}

#[async_trait]
impl BatchSink for HttpSink {
    async fn send(&self, logs: &[LogEntry]) -> Result<SinkReceipt> {
        let url = self.url();
        tracing::debug!(%url, count = logs.len(), "posting batch");

        let response = self
            .client
            .post(&url)
            .json(&BatchRequest { logs })
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await?;
        classify_response(status, &body, logs.len())
    }
}
