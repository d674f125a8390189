//! Durable draft batches, one JSON record per (date, shift)

use crate::domain::{DraftKey, LogEntry};
use crate::error::{ProdlogError, Result};
use crate::infrastructure::FileSystemRepository;

/// Not-yet-submitted entries keyed by date and shift.
///
/// Every mutating call is persisted before it returns.
pub trait DraftStore {
    /// Add `entry` as the last element of the batch
    fn append(&self, key: &DraftKey, entry: LogEntry) -> Result<usize>;

    fn replace_at(&self, key: &DraftKey, index: usize, entry: LogEntry) -> Result<()>;

    /// Remove one element; the caller confirms destructive intent beforehand
    fn remove_at(&self, key: &DraftKey, index: usize) -> Result<LogEntry>;

    /// Snapshot of the batch in insertion order; empty when absent
    fn list_all(&self, key: &DraftKey) -> Result<Vec<LogEntry>>;

    /// Drop the whole batch
    fn clear(&self, key: &DraftKey) -> Result<()>;

    /// Keys of every batch currently on disk
    fn keys(&self) -> Result<Vec<DraftKey>>;
}

/// DraftStore backed by `.prodlog/drafts/<date>_<shift>.json`
#[derive(Debug, Clone)]
pub struct FileDraftStore {
    repository: FileSystemRepository,
}

impl FileDraftStore {
    pub fn new(repository: FileSystemRepository) -> Self {
        FileDraftStore { repository }
    }

    fn record(key: &DraftKey) -> String {
        format!("drafts/{}.json", key.record_name())
    }

    fn load(&self, key: &DraftKey) -> Vec<LogEntry> {
        self.repository
            .read_record(&Self::record(key))
            .unwrap_or_default()
    }

    /// Current batch for a read-modify-write. A batch that exists but cannot
    /// be read is an error: writing over it would drop its entries.
    fn load_for_update(&self, key: &DraftKey) -> Result<Vec<LogEntry>> {
        let record = Self::record(key);
        match self.repository.load_record(&record) {
            Ok(entries) => Ok(entries.unwrap_or_default()),
            Err(e) => Err(ProdlogError::Storage(format!(
                "draft {} is unreadable and was left untouched ({}): {}",
                key,
                self.repository.record_path(&record).display(),
                e
            ))),
        }
    }

    fn store(&self, key: &DraftKey, entries: &[LogEntry]) -> Result<()> {
        self.repository
            .write_record(&Self::record(key), entries)
            .map_err(|e| ProdlogError::Storage(format!("could not save draft {}: {}", key, e)))
    }
}

impl DraftStore for FileDraftStore {
    fn append(&self, key: &DraftKey, entry: LogEntry) -> Result<usize> {
        let mut entries = self.load_for_update(key)?;
        entries.push(entry);
        self.store(key, &entries)?;

        let index = entries.len() - 1;
        tracing::info!(%key, index, "draft entry appended");
        Ok(index)
    }

    fn replace_at(&self, key: &DraftKey, index: usize, entry: LogEntry) -> Result<()> {
        let mut entries = self.load_for_update(key)?;
        let len = entries.len();
        let slot = entries
            .get_mut(index)
            .ok_or(ProdlogError::IndexOutOfRange { index, len })?;
        *slot = entry;
        self.store(key, &entries)?;

        tracing::info!(%key, index, "draft entry replaced");
        Ok(())
    }

    fn remove_at(&self, key: &DraftKey, index: usize) -> Result<LogEntry> {
        let mut entries = self.load_for_update(key)?;
        if index >= entries.len() {
            return Err(ProdlogError::IndexOutOfRange {
                index,
                len: entries.len(),
            });
        }
        let removed = entries.remove(index);
        self.store(key, &entries)?;

        tracing::info!(%key, index, "draft entry removed");
        Ok(removed)
    }

    fn list_all(&self, key: &DraftKey) -> Result<Vec<LogEntry>> {
        Ok(self.load(key))
    }

    fn clear(&self, key: &DraftKey) -> Result<()> {
        self.repository
            .remove_record(&Self::record(key))
            .map_err(|e| ProdlogError::Storage(format!("could not clear draft {}: {}", key, e)))?;
        tracing::info!(%key, "draft batch cleared");
        Ok(())
    }

    fn keys(&self) -> Result<Vec<DraftKey>> {
        Ok(self
            .repository
            .list_records("drafts")
            .iter()
            .filter_map(|name| DraftKey::from_record_name(name))
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{ClockTime, Period, Shift};
    use crate::infrastructure::WorkspaceRepository;
    use chrono::NaiveDate;
    use std::fs;
    use tempfile::TempDir;

    fn workspace() -> (TempDir, FileSystemRepository) {
        let temp = TempDir::new().unwrap();
        let repo = FileSystemRepository::new(temp.path().to_path_buf());
        repo.initialize().unwrap();
        (temp, repo)
    }

    fn key() -> DraftKey {
        DraftKey::new(NaiveDate::from_ymd_opt(2025, 1, 17).unwrap(), Shift::First)
    }

    fn entry(job: &str) -> LogEntry {
        LogEntry {
            id: None,
            date: key().date,
            shift: key().shift,
            operator: "Asha".to_string(),
            machine: "CNC-1".to_string(),
            operation: "Milling".to_string(),
            qty: 5,
            job_card_no: job.to_string(),
            sr_no: None,
            description: "Bracket".to_string(),
            start_time: ClockTime::typed(6, Period::AM),
            end_time: ClockTime::typed(6, Period::PM),
            duration: 12,
            remark1: String::new(),
            remark2: String::new(),
        }
    }

    fn jobs(entries: &[LogEntry]) -> Vec<&str> {
        entries.iter().map(|e| e.job_card_no.as_str()).collect()
    }

    #[test]
    fn test_append_then_list_returns_entry_last() {
        let (_temp, repo) = workspace();
        let store = FileDraftStore::new(repo.clone());

        assert_eq!(store.append(&key(), entry("A")).unwrap(), 0);
        assert_eq!(store.append(&key(), entry("B")).unwrap(), 1);

        let all = store.list_all(&key()).unwrap();
        assert_eq!(all.last(), Some(&entry("B")));
        assert_eq!(jobs(&all), vec!["A", "B"]);
    }

    #[test]
    fn test_append_survives_new_store_instance() {
        let (_temp, repo) = workspace();
        FileDraftStore::new(repo.clone()).append(&key(), entry("A")).unwrap();

        let reopened = FileDraftStore::new(repo.clone());
        assert_eq!(reopened.list_all(&key()).unwrap(), vec![entry("A")]);
    }

    #[test]
    fn test_remove_preserves_order() {
        let (_temp, repo) = workspace();
        let store = FileDraftStore::new(repo.clone());
        for job in ["A", "B", "C", "D"] {
            store.append(&key(), entry(job)).unwrap();
        }

        let removed = store.remove_at(&key(), 1).unwrap();
        assert_eq!(removed.job_card_no, "B");

        let all = store.list_all(&key()).unwrap();
        assert_eq!(jobs(&all), vec!["A", "C", "D"]);
    }

    #[test]
    fn test_replace_round_trip() {
        let (_temp, repo) = workspace();
        let store = FileDraftStore::new(repo.clone());
        store.append(&key(), entry("A")).unwrap();
        store.append(&key(), entry("B")).unwrap();

        let mut replacement = entry("B2");
        replacement.qty = 99;
        store.replace_at(&key(), 1, replacement.clone()).unwrap();

        assert_eq!(store.list_all(&key()).unwrap()[1], replacement);
    }

    #[test]
    fn test_index_out_of_range() {
        let (_temp, repo) = workspace();
        let store = FileDraftStore::new(repo.clone());
        store.append(&key(), entry("A")).unwrap();

        match store.replace_at(&key(), 1, entry("X")).unwrap_err() {
            ProdlogError::IndexOutOfRange { index: 1, len: 1 } => {}
            other => panic!("Expected IndexOutOfRange, got {:?}", other),
        }
        assert!(matches!(
            store.remove_at(&key(), 5),
            Err(ProdlogError::IndexOutOfRange { index: 5, len: 1 })
        ));
        assert_eq!(jobs(&store.list_all(&key()).unwrap()), vec!["A"]);
    }

    #[test]
    fn test_keys_are_isolated() {
        let (_temp, repo) = workspace();
        let store = FileDraftStore::new(repo.clone());
        let other = DraftKey::new(key().date, Shift::Second);

        store.append(&key(), entry("A")).unwrap();
        store.append(&other, entry("Z")).unwrap();

        assert_eq!(jobs(&store.list_all(&key()).unwrap()), vec!["A"]);
        assert_eq!(jobs(&store.list_all(&other).unwrap()), vec!["Z"]);
        assert_eq!(store.keys().unwrap(), vec![key(), other]);
    }

    #[test]
    fn test_clear_removes_batch_and_tolerates_absent() {
        let (_temp, repo) = workspace();
        let store = FileDraftStore::new(repo.clone());
        store.append(&key(), entry("A")).unwrap();

        store.clear(&key()).unwrap();
        assert!(store.list_all(&key()).unwrap().is_empty());
        store.clear(&key()).unwrap();
        assert!(store.keys().unwrap().is_empty());
    }

    #[test]
    fn test_corrupt_batch_reads_as_empty() {
        let (_temp, repo) = workspace();
        let store = FileDraftStore::new(repo.clone());
        let path = repo.record_path(&format!("drafts/{}.json", key().record_name()));
        fs::write(path, "[{\"broken\": ").unwrap();

        assert!(store.list_all(&key()).unwrap().is_empty());
    }

    #[test]
    fn test_unreadable_batch_is_never_overwritten() {
        let (_temp, repo) = workspace();
        let store = FileDraftStore::new(repo.clone());
        store.append(&key(), entry("A")).unwrap();
        store.append(&key(), entry("B")).unwrap();

        let path = repo.record_path(&format!("drafts/{}.json", key().record_name()));
        let damaged = fs::read_to_string(&path)
            .unwrap()
            .replacen("06:00 PM", "06:30 PM", 1);
        fs::write(&path, &damaged).unwrap();

        assert!(matches!(
            store.append(&key(), entry("C")),
            Err(ProdlogError::Storage(_))
        ));
        assert!(matches!(
            store.replace_at(&key(), 0, entry("X")),
            Err(ProdlogError::Storage(_))
        ));
        assert!(matches!(
            store.remove_at(&key(), 0),
            Err(ProdlogError::Storage(_))
        ));
        assert_eq!(fs::read_to_string(&path).unwrap(), damaged);
    }
}
