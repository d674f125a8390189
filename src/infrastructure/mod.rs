//! Infrastructure layer - External I/O and persistence

pub mod config;
pub mod drafts;
pub mod lists;
pub mod preferences;
pub mod repository;
pub mod sink;

pub use config::Config;
pub use drafts::{DraftStore, FileDraftStore};
pub use lists::{FrequencyProvider, ListProvider};
pub use preferences::{FilePreferenceStore, PreferenceStore};
pub use repository::{FileSystemRepository, WorkspaceRepository};
pub use sink::{BatchSink, HttpSink, SinkReceipt};
