//! Pending batches use case

use crate::domain::DraftKey;
use crate::error::Result;
use crate::infrastructure::DraftStore;

/// An unsubmitted draft batch and how many entries it holds
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingBatch {
    pub key: DraftKey,
    pub count: usize,
}

/// List non-empty draft batches, oldest date first.
pub fn pending_batches<D: DraftStore>(drafts: &D) -> Result<Vec<PendingBatch>> {
    let mut batches = Vec::new();
    for key in drafts.keys()? {
        let count = drafts.list_all(&key)?.len();
        if count > 0 {
            batches.push(PendingBatch { key, count });
        }
    }
    Ok(batches)
}
