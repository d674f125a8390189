//! Entry lifecycle use case: create, edit in place and delete draft entries

use crate::domain::{
    validate, ClockTime, EditTarget, FieldEdit, LogEntry, Session, Shift, ValidationReport,
};
use crate::error::{ProdlogError, Result};
use crate::infrastructure::{DraftStore, PreferenceStore};
use chrono::NaiveDate;

/// Which end of the time window an operation targets
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Bound {
    Start,
    End,
}

/// Result of a save attempt
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SaveOutcome {
    /// New entry added at `index`; the form was cleared for the next entry
    Appended { index: usize, entry: LogEntry },
    /// Edited entry written back at `index`; edit mode ended
    Replaced { index: usize, entry: LogEntry },
    /// Nothing persisted; the session is unchanged
    Rejected(ValidationReport),
}

/// Orchestrates entry operations over the draft and preference stores.
///
/// Holds no state of its own: every operation receives the session explicitly.
pub struct EntryLifecycle<D, P> {
    drafts: D,
    prefs: P,
}

impl<D: DraftStore, P: PreferenceStore> EntryLifecycle<D, P> {
    pub fn new(drafts: D, prefs: P) -> Self {
        EntryLifecycle { drafts, prefs }
    }

    pub fn drafts(&self) -> &D {
        &self.drafts
    }

    pub fn prefs(&self) -> &P {
        &self.prefs
    }

    /// Seed a session from stored preferences (read once per session)
    pub fn start_session(&self, today: NaiveDate) -> Session {
        match self.prefs.load() {
            Some(prefs) => Session::from_preferences(&prefs, today),
            None => Session::new(today),
        }
    }

    // Losing one preference write is preferable to failing the operation
    fn remember(&self, session: &Session) {
        if let Err(e) = self.prefs.save(&session.preferences()) {
            tracing::warn!(error = %e, "could not save preferences");
        }
    }

    pub fn set_date(&self, session: &mut Session, date: NaiveDate) {
        session.date = Some(date);
        self.remember(session);
    }

    /// Select a shift; the window resets to the shift's default
    pub fn set_shift(&self, session: &mut Session, shift: Shift) {
        session.select_shift(shift);
        self.remember(session);
    }

    /// Stepper control: wraps past 12 and 1
    pub fn step_hour(&self, session: &mut Session, bound: Bound, delta: i32) {
        let slot = Self::bound_mut(session, bound);
        *slot = slot.step(delta);
        self.remember(session);
    }

    /// Typed hour: clamps into 1..=12
    pub fn type_hour(&self, session: &mut Session, bound: Bound, hour: i64) {
        let slot = Self::bound_mut(session, bound);
        *slot = slot.with_hour(hour);
        self.remember(session);
    }

    pub fn set_time(&self, session: &mut Session, bound: Bound, time: ClockTime) {
        *Self::bound_mut(session, bound) = time;
        self.remember(session);
    }

    pub fn toggle_period(&self, session: &mut Session, bound: Bound) {
        let slot = Self::bound_mut(session, bound);
        *slot = slot.toggle_period();
        self.remember(session);
    }

    fn bound_mut(session: &mut Session, bound: Bound) -> &mut ClockTime {
        match bound {
            Bound::Start => &mut session.window.start,
            Bound::End => &mut session.window.end,
        }
    }

    pub fn edit(&self, session: &mut Session, edit: FieldEdit) {
        session.apply(edit);
    }

    /// Validate and persist the session's entry.
    ///
    /// Validation failures come back as [`SaveOutcome::Rejected`], never as `Err`.
    pub fn save(&self, session: &mut Session) -> Result<SaveOutcome> {
        let report = validate(session);
        if !report.is_valid() {
            tracing::debug!(errors = report.errors.len(), "entry rejected");
            return Ok(SaveOutcome::Rejected(report));
        }

        let entry = session
            .build_entry()
            .ok_or(ProdlogError::MissingSessionKey)?;
        let key = entry.key();

        match session.editing() {
            None => {
                let index = self.drafts.append(&key, entry.clone())?;
                session.reset_after_append();
                Ok(SaveOutcome::Appended { index, entry })
            }
            Some(target) if target.key == key => {
                self.drafts.replace_at(&key, target.index, entry.clone())?;
                session.finish_edit();
                Ok(SaveOutcome::Replaced {
                    index: target.index,
                    entry,
                })
            }
            Some(target) => {
                // Date or shift changed while editing: the entry moves batches.
                // Append first so an interruption duplicates rather than loses it.
                let index = self.drafts.append(&key, entry.clone())?;
                if let Err(e) = self.drafts.remove_at(&target.key, target.index) {
                    // The copy already exists; saving again must not append it twice
                    session.finish_edit();
                    return Err(ProdlogError::Storage(format!(
                        "entry was already copied to {} as [{}], but the original \
                         [{}] in {} could not be removed: {}",
                        key, index, target.index, target.key, e
                    )));
                }
                tracing::info!(from = %target.key, to = %key, "edited entry moved");
                session.finish_edit();
                Ok(SaveOutcome::Replaced { index, entry })
            }
        }
    }

    /// Load element `index` of the session's batch into the form for editing
    pub fn begin_edit(&self, session: &mut Session, index: usize) -> Result<LogEntry> {
        let key = session.key().ok_or(ProdlogError::MissingSessionKey)?;
        let entries = self.drafts.list_all(&key)?;
        let entry = entries
            .get(index)
            .cloned()
            .ok_or(ProdlogError::IndexOutOfRange {
                index,
                len: entries.len(),
            })?;

        session.load_for_edit(EditTarget { key, index }, &entry);
        Ok(entry)
    }

    /// Remove element `index` of the session's batch. `confirmed` must be true.
    pub fn delete(&self, session: &Session, index: usize, confirmed: bool) -> Result<LogEntry> {
        if !confirmed {
            return Err(ProdlogError::ConfirmationRequired(index));
        }
        let key = session.key().ok_or(ProdlogError::MissingSessionKey)?;
        self.drafts.remove_at(&key, index)
    }

    /// The session's draft batch, in entry order
    pub fn review(&self, session: &Session) -> Result<Vec<LogEntry>> {
        let key = session.key().ok_or(ProdlogError::MissingSessionKey)?;
        self.drafts.list_all(&key)
    }
}
