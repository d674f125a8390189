//! Submit use case: deliver one draft batch to the sink, then clear it

use crate::domain::DraftKey;
use crate::error::{ProdlogError, Result};
use crate::infrastructure::{BatchSink, DraftStore, PreferenceStore};
use std::time::Duration;

/// Outcome of a submission that the sink fully accepted
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SubmitReceipt {
    pub sent: usize,
    pub inserted: usize,
}

/// Sends a draft batch and deletes it only after the sink confirms every entry.
///
/// Any failure leaves the batch and preferences exactly as they were.
pub struct BatchSubmitter<'a, D, P, S: ?Sized> {
    drafts: &'a D,
    prefs: &'a P,
    sink: &'a S,
    timeout: Option<Duration>,
}

impl<'a, D, P, S> BatchSubmitter<'a, D, P, S>
where
    D: DraftStore,
    P: PreferenceStore,
    S: BatchSink + ?Sized,
{
    pub fn new(drafts: &'a D, prefs: &'a P, sink: &'a S) -> Self {
        BatchSubmitter {
            drafts,
            prefs,
            sink,
            timeout: None,
        }
    }

    /// Bound the whole sink call; expiry counts as a failure
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    pub async fn submit(&self, key: &DraftKey) -> Result<SubmitReceipt> {
        let logs = self.drafts.list_all(key)?;
        if logs.is_empty() {
            tracing::info!(%key, "nothing to submit");
            return Ok(SubmitReceipt {
                sent: 0,
                inserted: 0,
            });
        }

        let sent = logs.len();
        tracing::info!(%key, sent, "submitting batch");

        let receipt = match self.timeout {
            Some(limit) => tokio::time::timeout(limit, self.sink.send(&logs))
                .await
                .map_err(|_| ProdlogError::Timeout(limit))??,
            None => self.sink.send(&logs).await?,
        };

        if receipt.inserted < sent {
            return Err(ProdlogError::PartialAcceptance {
                sent,
                inserted: receipt.inserted,
            });
        }

        self.drafts.clear(key)?;
        if let Err(e) = self.prefs.clear() {
            tracing::warn!(error = %e, "batch submitted but preferences were not cleared");
        }

        tracing::info!(%key, inserted = receipt.inserted, "batch accepted");
        Ok(SubmitReceipt {
            sent,
            inserted: receipt.inserted,
        })
    }
}
