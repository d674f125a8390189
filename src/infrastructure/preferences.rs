//! Last-used date, shift and time window

use crate::domain::Preferences;
use crate::error::{ProdlogError, Result};
use crate::infrastructure::FileSystemRepository;

const PREFS_RECORD: &str = "prefs.json";

/// Single last-write-wins preferences record
pub trait PreferenceStore {
    fn save(&self, prefs: &Preferences) -> Result<()>;

    /// Stored preferences; unreadable data counts as absent
    fn load(&self) -> Option<Preferences>;

    fn clear(&self) -> Result<()>;
}

#[derive(Debug, Clone)]
pub struct FilePreferenceStore {
    repository: FileSystemRepository,
}

impl FilePreferenceStore {
    pub fn new(repository: FileSystemRepository) -> Self {
        FilePreferenceStore { repository }
    }
}

impl PreferenceStore for FilePreferenceStore {
    fn save(&self, prefs: &Preferences) -> Result<()> {
        self.repository
            .write_record(PREFS_RECORD, prefs)
            .map_err(|e| ProdlogError::Storage(format!("could not save preferences: {}", e)))
    }

    fn load(&self) -> Option<Preferences> {
        self.repository.read_record(PREFS_RECORD)
    }

    fn clear(&self) -> Result<()> {
        self.repository.remove_record(PREFS_RECORD)
    }
}
