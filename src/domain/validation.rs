//! Required-field rules for a log entry

use crate::domain::catalog::Category;
use crate::domain::session::Session;
use std::fmt;

/// Form field (or field group) an error is reported against
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Field {
    Date,
    Shift,
    Operator,
    Machine,
    Operation,
    Qty,
    JobCardNo,
    Description,
}

impl Field {
    pub fn as_str(&self) -> &'static str {
        match self {
            Field::Date => "date",
            Field::Shift => "shift",
            Field::Operator => "operator",
            Field::Machine => "machine",
            Field::Operation => "operation",
            Field::Qty => "qty",
            Field::JobCardNo => "jobCardNo",
            Field::Description => "description",
        }
    }
}

impl From<Category> for Field {
    fn from(category: Category) -> Self {
        match category {
            Category::Operator => Field::Operator,
            Category::Machine => Field::Machine,
            Category::Operation => Field::Operation,
        }
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldError {
    pub field: Field,
    pub message: &'static str,
}

/// Every rule violation found, in rule order
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ValidationReport {
    pub errors: Vec<FieldError>,
}

impl ValidationReport {
    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn fields(&self) -> Vec<Field> {
        self.errors.iter().map(|e| e.field).collect()
    }

    fn push(&mut self, field: Field, message: &'static str) {
        self.errors.push(FieldError { field, message });
    }
}

/// Check the session's current entry against all rules. Never short-circuits.
pub fn validate(session: &Session) -> ValidationReport {
    let draft = &session.draft;
    let mut report = ValidationReport::default();

    if session.date.is_none() {
        report.push(Field::Date, "Date is required");
    }

    if session.shift.is_none() {
        report.push(Field::Shift, "Shift must be selected");
    }

    for category in Category::ALL {
        if draft.selection(category).is_none() {
            let message = match category {
                Category::Operator => "Operator must be selected",
                Category::Machine => "Machine must be selected",
                Category::Operation => "Operation must be selected",
            };
            report.push(category.into(), message);
        }
    }

    match draft.qty {
        None => report.push(Field::Qty, "Quantity is required"),
        Some(0) => report.push(Field::Qty, "Quantity must be greater than 0"),
        Some(_) => {}
    }

    if draft.job_card_no.trim().is_empty() {
        report.push(Field::JobCardNo, "Job Card No is required");
    }

    if draft.description.trim().is_empty() {
        report.push(Field::Description, "Description is required");
    }

    report
}
