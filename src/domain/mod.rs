//! Domain layer - Business logic and domain models

pub mod catalog;
pub mod entry;
pub mod session;
pub mod shift;
pub mod time;
pub mod validation;

pub use catalog::{Catalog, Category, Frequency};
pub use entry::{parse_date, DraftKey, LogEntry, Preferences};
pub use session::{EditTarget, EntryDraft, FieldEdit, LifecycleState, Session};
pub use shift::Shift;
pub use time::{ClockTime, DurationPolicy, Period, TimeWindow, DURATION_POLICY};
pub use validation::{validate, Field, FieldError, ValidationReport};
