//! In-memory entry session: defaults carried between entries plus the form being filled

use crate::domain::catalog::Category;
use crate::domain::entry::{DraftKey, LogEntry, Preferences};
use crate::domain::shift::Shift;
use crate::domain::time::TimeWindow;
use chrono::NaiveDate;

/// Where the current entry form is in its lifecycle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LifecycleState {
    /// Nothing entered since the last save
    #[default]
    Empty,
    /// At least one field edited, not yet saved
    Selecting,
    /// An edited entry was written back to its batch
    Validated,
    /// The batch this session worked on was accepted by the sink
    Submitted,
}

/// Per-entry fields, cleared after every successful save
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EntryDraft {
    pub operator: Option<String>,
    pub machine: Option<String>,
    pub operation: Option<String>,
    pub qty: Option<u32>,
    pub job_card_no: String,
    pub sr_no: Option<u32>,
    pub description: String,
    pub remark1: String,
    pub remark2: String,
}

impl EntryDraft {
    pub fn selection(&self, category: Category) -> Option<&str> {
        match category {
            Category::Operator => self.operator.as_deref(),
            Category::Machine => self.machine.as_deref(),
            Category::Operation => self.operation.as_deref(),
        }
    }

    fn selection_mut(&mut self, category: Category) -> &mut Option<String> {
        match category {
            Category::Operator => &mut self.operator,
            Category::Machine => &mut self.machine,
            Category::Operation => &mut self.operation,
        }
    }

    fn from_entry(entry: &LogEntry) -> Self {
        EntryDraft {
            operator: Some(entry.operator.clone()),
            machine: Some(entry.machine.clone()),
            operation: Some(entry.operation.clone()),
            qty: Some(entry.qty),
            job_card_no: entry.job_card_no.clone(),
            sr_no: entry.sr_no,
            description: entry.description.clone(),
            remark1: entry.remark1.clone(),
            remark2: entry.remark2.clone(),
        }
    }
}

/// A single edit to the entry form
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldEdit {
    /// Pick a value; picking the current value again deselects it
    Select(Category, String),
    Qty(u32),
    /// +/- stepper on quantity, never below zero
    StepQty(i64),
    JobCardNo(String),
    SrNo(Option<u32>),
    Description(String),
    Remark1(String),
    Remark2(String),
}

/// The stored entry an edit session will write back to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EditTarget {
    pub key: DraftKey,
    pub index: usize,
}

/// Session state passed explicitly into every lifecycle operation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Session {
    pub date: Option<NaiveDate>,
    pub shift: Option<Shift>,
    pub window: TimeWindow,
    pub draft: EntryDraft,
    state: LifecycleState,
    editing: Option<EditTarget>,
}

impl Session {
    /// Fresh session with no stored preferences
    pub fn new(today: NaiveDate) -> Self {
        Session {
            date: Some(today),
            shift: None,
            window: Shift::First.default_window(),
            draft: EntryDraft::default(),
            state: LifecycleState::Empty,
            editing: None,
        }
    }

    /// Seed a session from stored preferences; a missing date falls back to `today`
    pub fn from_preferences(prefs: &Preferences, today: NaiveDate) -> Self {
        Session {
            date: prefs.date.or(Some(today)),
            shift: prefs.shift,
            window: prefs.window(),
            ..Session::new(today)
        }
    }

    pub fn state(&self) -> LifecycleState {
        self.state
    }

    /// Batch element being edited, if in edit mode
    pub fn editing(&self) -> Option<EditTarget> {
        self.editing
    }

    pub fn key(&self) -> Option<DraftKey> {
        Some(DraftKey::new(self.date?, self.shift?))
    }

    pub fn preferences(&self) -> Preferences {
        Preferences {
            date: self.date,
            shift: self.shift,
            start_hour: self.window.start.hour(),
            start_period: self.window.start.period(),
            end_hour: self.window.end.hour(),
            end_period: self.window.end.period(),
        }
    }

    /// Select a shift and reset the window to that shift's default
    pub fn select_shift(&mut self, shift: Shift) {
        self.shift = Some(shift);
        self.window = shift.default_window();
    }

    pub fn apply(&mut self, edit: FieldEdit) {
        let draft = &mut self.draft;
        match edit {
            FieldEdit::Select(category, value) => {
                let slot = draft.selection_mut(category);
                if slot.as_deref() == Some(value.as_str()) {
                    *slot = None;
                } else {
                    *slot = Some(value);
                }
            }
            FieldEdit::Qty(qty) => draft.qty = Some(qty),
            FieldEdit::StepQty(delta) => {
                let current = draft.qty.unwrap_or(0) as i64;
                draft.qty = Some((current + delta).clamp(0, u32::MAX as i64) as u32);
            }
            FieldEdit::JobCardNo(value) => draft.job_card_no = value,
            FieldEdit::SrNo(value) => draft.sr_no = value,
            FieldEdit::Description(value) => draft.description = value,
            FieldEdit::Remark1(value) => draft.remark1 = value,
            FieldEdit::Remark2(value) => draft.remark2 = value,
        }
        self.state = LifecycleState::Selecting;
    }

    /// Build the entry to persist. Returns `None` while any required field is missing.
    pub fn build_entry(&self) -> Option<LogEntry> {
        let draft = &self.draft;
        Some(LogEntry {
            id: None,
            date: self.date?,
            shift: self.shift?,
            operator: draft.operator.clone()?,
            machine: draft.machine.clone()?,
            operation: draft.operation.clone()?,
            qty: draft.qty?,
            job_card_no: draft.job_card_no.trim().to_string(),
            sr_no: draft.sr_no,
            description: draft.description.trim().to_string(),
            start_time: self.window.start,
            end_time: self.window.end,
            duration: self.window.duration(),
            remark1: draft.remark1.trim().to_string(),
            remark2: draft.remark2.trim().to_string(),
        })
    }

    /// Populate the form from a stored entry and enter edit mode for `target`
    pub(crate) fn load_for_edit(&mut self, target: EditTarget, entry: &LogEntry) {
        self.date = Some(entry.date);
        self.shift = Some(entry.shift);
        self.window = entry.window();
        self.draft = EntryDraft::from_entry(entry);
        self.editing = Some(target);
        self.state = LifecycleState::Selecting;
    }

    /// Clear per-entry fields after an append; date, shift and window stay
    pub(crate) fn reset_after_append(&mut self) {
        self.draft = EntryDraft::default();
        self.state = LifecycleState::Empty;
    }

    /// Leave edit mode after the edited entry was written back
    pub(crate) fn finish_edit(&mut self) {
        self.draft = EntryDraft::default();
        self.editing = None;
        self.state = LifecycleState::Validated;
    }

    /// The batch was accepted; the next session has to pick date and shift again
    pub fn mark_submitted(&mut self) {
        self.draft = EntryDraft::default();
        self.editing = None;
        self.date = None;
        self.shift = None;
        self.state = LifecycleState::Submitted;
    }
}
