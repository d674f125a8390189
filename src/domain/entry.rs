//! Log entry records and the keys they are stored under

use crate::domain::shift::Shift;
use crate::domain::time::{ClockTime, Period, TimeWindow};
use crate::error::{ProdlogError, Result};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Parse a strict ISO calendar date (`YYYY-MM-DD`, zero-padded)
pub fn parse_date(input: &str) -> Result<NaiveDate> {
    let trimmed = input.trim();
    NaiveDate::parse_from_str(trimmed, "%Y-%m-%d")
        .ok()
        .filter(|date| date.format("%Y-%m-%d").to_string() == trimmed)
        .ok_or_else(|| ProdlogError::InvalidDate(input.to_string()))
}

/// A single production log line as it is stored locally and sent to the sink
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LogEntry {
    /// Assigned by the sink when absent
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub date: NaiveDate,
    pub shift: Shift,
    pub operator: String,
    pub machine: String,
    pub operation: String,
    pub qty: u32,
    pub job_card_no: String,
    #[serde(default)]
    pub sr_no: Option<u32>,
    pub description: String,
    pub start_time: ClockTime,
    pub end_time: ClockTime,
    pub duration: u32,
    #[serde(default)]
    pub remark1: String,
    #[serde(default)]
    pub remark2: String,
}

impl LogEntry {
    pub fn key(&self) -> DraftKey {
        DraftKey::new(self.date, self.shift)
    }

    pub fn window(&self) -> TimeWindow {
        TimeWindow::new(self.start_time, self.end_time)
    }
}

/// Identifies one draft batch: all entries for a date and shift
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct DraftKey {
    pub date: NaiveDate,
    pub shift: Shift,
}

impl DraftKey {
    pub fn new(date: NaiveDate, shift: Shift) -> Self {
        DraftKey { date, shift }
    }

    /// Name of the record this batch is stored under (`2025-01-17_First`)
    pub fn record_name(&self) -> String {
        format!("{}_{}", self.date.format("%Y-%m-%d"), self.shift)
    }

    /// Inverse of [`DraftKey::record_name`]
    pub fn from_record_name(name: &str) -> Option<Self> {
        let (date, shift) = name.split_once('_')?;
        let date = NaiveDate::parse_from_str(date, "%Y-%m-%d").ok()?;
        let shift = match shift {
            "First" => Shift::First,
            "Second" => Shift::Second,
            _ => return None,
        };
        Some(DraftKey::new(date, shift))
    }
}

impl fmt::Display for DraftKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {} shift", self.date.format("%Y-%m-%d"), self.shift)
    }
}

/// Last-used session defaults
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Preferences {
    #[serde(default)]
    pub date: Option<NaiveDate>,
    #[serde(default)]
    pub shift: Option<Shift>,
    pub start_hour: u8,
    pub start_period: Period,
    pub end_hour: u8,
    pub end_period: Period,
}

impl Preferences {
    pub fn window(&self) -> TimeWindow {
        TimeWindow::new(
            ClockTime::typed(self.start_hour as i64, self.start_period),
            ClockTime::typed(self.end_hour as i64, self.end_period),
        )
    }
}
