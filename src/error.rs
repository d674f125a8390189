//! Error types for prodlog

use std::path::PathBuf;
use std::time::Duration;
use thiserror::Error;

/// Main error type for prodlog
#[derive(Debug, Error)]
pub enum ProdlogError {
    #[error("Not a prodlog directory: {0}")]
    NotProdlogDirectory(PathBuf),

    #[error("Invalid date: '{0}' (expected YYYY-MM-DD)")]
    InvalidDate(String),

    #[error("Invalid time: '{0}'")]
    InvalidTime(String),

    #[error("Invalid shift: {0}")]
    InvalidShift(String),

    #[error("Unknown {category}: '{value}'")]
    UnknownOption { category: String, value: String },

    #[error("Entry not saved: {0}")]
    Validation(String),

    #[error("No entry at index {index} (batch has {len} entries)")]
    IndexOutOfRange { index: usize, len: usize },

    #[error("Refusing to delete entry {0} without confirmation")]
    ConfirmationRequired(usize),

    #[error("Date and shift must be selected first")]
    MissingSessionKey,

    #[error("Storage error: {0}")]
    Storage(String),

    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("Submission timed out after {0:?}")]
    Timeout(Duration),

    #[error("Server rejected the batch (HTTP {status}): {message}")]
    SinkRejected { status: u16, message: String },

    #[error("Server returned an invalid response: {0}")]
    MalformedResponse(String),

    #[error("Server accepted only {inserted} of {sent} entries")]
    PartialAcceptance { sent: usize, inserted: usize },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("TOML deserialization error: {0}")]
    TomlDeserialize(#[from] toml::de::Error),

    #[error("TOML serialization error: {0}")]
    TomlSerialize(#[from] toml::ser::Error),
}

impl ProdlogError {
    /// Get the exit code for this error
    pub fn exit_code(&self) -> i32 {
        match self {
            ProdlogError::NotProdlogDirectory(_) => 2,
            ProdlogError::Validation(_) => 3,
            ProdlogError::Network(_)
            | ProdlogError::Timeout(_)
            | ProdlogError::SinkRejected { .. }
            | ProdlogError::MalformedResponse(_)
            | ProdlogError::PartialAcceptance { .. } => 4,
            _ => 1,
        }
    }

    /// Whether the draft batch was kept because of this error and a retry is possible
    pub fn is_submission_failure(&self) -> bool {
        self.exit_code() == 4
    }

    /// Get a user-friendly error message with suggestions
    pub fn display_with_suggestions(&self) -> String {
        match self {
            ProdlogError::NotProdlogDirectory(path) => {
                format!(
                    "Not a prodlog directory: {}\n\n\
                    Suggestions:\n\
                    • Run 'prodlog init' in this directory to create a workspace\n\
                    • Navigate to an existing prodlog directory\n\
                    • Set PRODLOG_ROOT environment variable to your workspace path",
                    path.display()
                )
            }
            ProdlogError::InvalidDate(_) => {
                format!(
                    "{}\n\n\
                    Dates must be ISO formatted.\n\
                    Example: prodlog date 2025-01-17",
                    self
                )
            }
            ProdlogError::InvalidTime(_) => {
                format!(
                    "{}\n\n\
                    Valid times: 6AM, 6 pm, 06:00 PM (whole hours only)\n\
                    Example: prodlog time --start 7AM --end 3PM",
                    self
                )
            }
            ProdlogError::UnknownOption { category, .. } => {
                format!(
                    "{}\n\n\
                    Suggestions:\n\
                    • Use 'prodlog options {}' to see the valid names\n\
                    • Names are matched case-insensitively",
                    self, category
                )
            }
            ProdlogError::MissingSessionKey => {
                format!(
                    "{}\n\n\
                    Example: prodlog date 2025-01-17 && prodlog shift first",
                    self
                )
            }
            ProdlogError::ConfirmationRequired(index) => {
                format!("{}\n\nRe-run with --yes: prodlog delete {} --yes", self, index)
            }
            ProdlogError::PartialAcceptance { inserted, .. } => {
                format!(
                    "Could not submit logs: {}\n\n\
                    Your entries are still saved locally, but {} of them are already \
                    stored on the server.\n\
                    Check the server before submitting again, or those entries will be duplicated.",
                    self, inserted
                )
            }
            err if err.is_submission_failure() => {
                format!(
                    "Could not submit logs: {}\n\n\
                    Your entries are still saved locally.\n\
                    Run 'prodlog submit' again once the server is reachable.",
                    err
                )
            }
            _ => self.to_string(),
        }
    }
}

/// Result type using ProdlogError
pub type Result<T> = std::result::Result<T, ProdlogError>;
