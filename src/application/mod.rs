//! Application layer - Use cases and orchestration

pub mod init;
pub mod lifecycle;
pub mod manage_config;
pub mod pending;
pub mod submit;

pub use lifecycle::{Bound, EntryLifecycle, SaveOutcome};
pub use manage_config::ConfigService;
pub use pending::{pending_batches, PendingBatch};
pub use submit::{BatchSubmitter, SubmitReceipt};
