//! prodlog - Shop-floor production log entry
//!
//! Operators record per-shift production entries into local draft batches,
//! review and correct them, and submit each batch to a remote log server.
//! Drafts survive failed submissions and are only cleared once the server
//! accepts the whole batch.

pub mod application;
pub mod cli;
pub mod domain;
pub mod error;
pub mod infrastructure;

pub use error::ProdlogError;
