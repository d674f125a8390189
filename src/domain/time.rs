//! Shift clock arithmetic: 12h/24h conversion, hour stepping and durations

use crate::error::{ProdlogError, Result};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::OnceLock;

/// How a window whose start equals its end is reported.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DurationPolicy {
    /// start == end is a full 24 hour shift
    FullDay,
    /// start == end is a zero-length entry
    Zero,
}

/// The zero-duration policy used throughout the application.
pub const DURATION_POLICY: DurationPolicy = DurationPolicy::FullDay;

/// Half of the day a 12-hour clock value belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Period {
    AM,
    PM,
}

impl Period {
    pub fn toggle(self) -> Self {
        match self {
            Period::AM => Period::PM,
            Period::PM => Period::AM,
        }
    }

    fn parse(s: &str) -> Option<Self> {
        match s.to_ascii_uppercase().as_str() {
            "AM" => Some(Period::AM),
            "PM" => Some(Period::PM),
            _ => None,
        }
    }
}

impl fmt::Display for Period {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Period::AM => write!(f, "AM"),
            Period::PM => write!(f, "PM"),
        }
    }
}

/// Convert a 12-hour clock hour (1..=12) to its 24-hour equivalent (0..=23).
pub fn to_24(hour12: u8, period: Period) -> u8 {
    debug_assert!(
        (1..=12).contains(&hour12),
        "hour {} is outside the 12-hour dial",
        hour12
    );
    match (period, hour12) {
        (Period::AM, 12) => 0,
        (Period::AM, h) => h,
        (Period::PM, 12) => 12,
        (Period::PM, h) => h + 12,
    }
}

/// Wrap an hour that was stepped past either end of the dial.
pub fn normalize_hour(h: i32) -> u8 {
    if h < 1 {
        12
    } else if h > 12 {
        1
    } else {
        h as u8
    }
}

/// Clamp a typed hour into the dial range.
pub fn clamp_hour(h: i64) -> u8 {
    h.clamp(1, 12) as u8
}

/// A whole hour on a 12-hour clock. The hour is always in 1..=12.
///
/// Serialized as `"HH:00 AM"`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct ClockTime {
    hour: u8,
    period: Period,
}

fn clock_regex() -> &'static Regex {
    static REGEX: OnceLock<Regex> = OnceLock::new();
    REGEX.get_or_init(|| Regex::new(r"^(\d{1,2})(?::(\d{2}))?\s*([AaPp][Mm])$").unwrap())
}

impl ClockTime {
    /// Build from a typed hour, clamping it into 1..=12.
    pub fn typed(hour: i64, period: Period) -> Self {
        ClockTime {
            hour: clamp_hour(hour),
            period,
        }
    }

    pub fn hour(&self) -> u8 {
        self.hour
    }

    pub fn period(&self) -> Period {
        self.period
    }

    pub fn hour24(&self) -> u8 {
        to_24(self.hour, self.period)
    }

    /// Press the +/- stepper `delta` times (wraps, period unchanged).
    pub fn step(self, delta: i32) -> Self {
        let mut hour = self.hour;
        for _ in 0..(delta % 12).unsigned_abs() {
            hour = normalize_hour(hour as i32 + delta.signum());
        }
        ClockTime {
            hour,
            period: self.period,
        }
    }

    pub fn with_hour(self, hour: i64) -> Self {
        ClockTime::typed(hour, self.period)
    }

    pub fn toggle_period(self) -> Self {
        ClockTime {
            hour: self.hour,
            period: self.period.toggle(),
        }
    }

    /// Parse `6PM`, `6 pm` or `06:00 PM`. Minutes other than `00` are rejected.
    pub fn parse(input: &str) -> Result<Self> {
        let trimmed = input.trim();
        let invalid = || ProdlogError::InvalidTime(input.to_string());

        let caps = clock_regex().captures(trimmed).ok_or_else(invalid)?;
        if let Some(minutes) = caps.get(2) {
            if minutes.as_str() != "00" {
                return Err(invalid());
            }
        }
        let hour: i64 = caps[1].parse().map_err(|_| invalid())?;
        let period = Period::parse(&caps[3]).ok_or_else(invalid)?;

        Ok(ClockTime::typed(hour, period))
    }
}

impl fmt::Display for ClockTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:02}:00 {}", self.hour, self.period)
    }
}

impl TryFrom<String> for ClockTime {
    type Error = ProdlogError;

    fn try_from(value: String) -> Result<Self> {
        ClockTime::parse(&value)
    }
}

impl From<ClockTime> for String {
    fn from(value: ClockTime) -> Self {
        value.to_string()
    }
}

/// Start and end of a shift window
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimeWindow {
    pub start: ClockTime,
    pub end: ClockTime,
}

impl TimeWindow {
    pub fn new(start: ClockTime, end: ClockTime) -> Self {
        TimeWindow { start, end }
    }

    /// Elapsed whole hours under [`DURATION_POLICY`]
    pub fn duration(&self) -> u32 {
        duration(self.start, self.end)
    }
}

/// Elapsed whole hours from `start` to `end`, wrapping past midnight.
pub fn duration(start: ClockTime, end: ClockTime) -> u32 {
    duration_with(DURATION_POLICY, start, end)
}

pub fn duration_with(policy: DurationPolicy, start: ClockTime, end: ClockTime) -> u32 {
    let mut d = end.hour24() as i32 - start.hour24() as i32;
    if d < 0 {
        d += 24;
    }
    if d == 0 && policy == DurationPolicy::FullDay {
        d = 24;
    }
    d as u32
}

#[cfg(test)]
mod tests {
    use super::*;

    fn at(hour: i64, period: Period) -> ClockTime {
        ClockTime::typed(hour, period)
    }

    #[test]
    fn test_to_24_table() {
        assert_eq!(to_24(12, Period::AM), 0);
        assert_eq!(to_24(12, Period::PM), 12);
        for h in 1..=11 {
            assert_eq!(to_24(h, Period::AM), h);
            assert_eq!(to_24(h, Period::PM), h + 12);
        }
    }

    #[test]
    #[cfg(debug_assertions)]
    #[should_panic(expected = "outside the 12-hour dial")]
    fn test_to_24_rejects_hours_off_the_dial() {
        to_24(13, Period::PM);
    }

    #[test]
    fn test_normalize_hour_wraps() {
        assert_eq!(normalize_hour(0), 12);
        assert_eq!(normalize_hour(13), 1);
        for h in 1..=12 {
            assert_eq!(normalize_hour(h), h as u8);
            // Idempotent
            assert_eq!(normalize_hour(normalize_hour(h) as i32), h as u8);
        }
    }

    #[test]
    fn test_typed_hour_clamps_instead_of_wrapping() {
        assert_eq!(at(0, Period::AM).hour(), 1);
        assert_eq!(at(13, Period::AM).hour(), 12);
        assert_eq!(at(99, Period::PM).hour(), 12);
        assert_eq!(at(-4, Period::PM).hour(), 1);
    }

    #[test]
    fn test_step_wraps() {
        assert_eq!(at(12, Period::AM).step(1).hour(), 1);
        assert_eq!(at(1, Period::AM).step(-1).hour(), 12);
        assert_eq!(at(5, Period::PM).step(1), at(6, Period::PM));
        assert_eq!(at(3, Period::PM).step(-4), at(11, Period::PM));
        assert_eq!(at(9, Period::AM).step(27), at(12, Period::AM));
    }

    #[test]
    fn test_duration_simple_and_wrapping() {
        assert_eq!(duration(at(6, Period::AM), at(6, Period::PM)), 12);
        assert_eq!(duration(at(6, Period::PM), at(6, Period::AM)), 12);
        assert_eq!(duration(at(10, Period::PM), at(2, Period::AM)), 4);
        assert_eq!(duration(at(12, Period::AM), at(1, Period::AM)), 1);
    }

    #[test]
    fn test_equal_bounds_is_full_day() {
        assert_eq!(duration(at(8, Period::AM), at(8, Period::AM)), 24);
        assert_eq!(
            duration_with(DurationPolicy::Zero, at(8, Period::AM), at(8, Period::AM)),
            0
        );
    }

    #[test]
    fn test_duration_range_over_all_pairs() {
        let mut all = Vec::new();
        for period in [Period::AM, Period::PM] {
            for h in 1..=12 {
                all.push(at(h, period));
            }
        }
        for start in &all {
            for end in &all {
                let d = duration(*start, *end);
                assert!((1..=24).contains(&d), "{} -> {} gave {}", start, end, d);
            }
        }
    }

    #[test]
    fn test_display_format() {
        assert_eq!(at(6, Period::AM).to_string(), "06:00 AM");
        assert_eq!(at(11, Period::PM).to_string(), "11:00 PM");
    }

    #[test]
    fn test_parse_accepts_common_forms() {
        assert_eq!(ClockTime::parse("6PM").unwrap(), at(6, Period::PM));
        assert_eq!(ClockTime::parse("6 pm").unwrap(), at(6, Period::PM));
        assert_eq!(ClockTime::parse("06:00 AM").unwrap(), at(6, Period::AM));
        assert_eq!(ClockTime::parse(" 12:00 am ").unwrap(), at(12, Period::AM));
        // Typed hours clamp
        assert_eq!(ClockTime::parse("15PM").unwrap(), at(12, Period::PM));
    }

    #[test]
    fn test_parse_invalid() {
        assert!(ClockTime::parse("").is_err());
        assert!(ClockTime::parse("6").is_err());
        assert!(ClockTime::parse("6:30 PM").is_err());
        assert!(ClockTime::parse("noon").is_err());
    }

    #[test]
    fn test_serde_uses_display_form() {
        let json = serde_json::to_string(&at(7, Period::PM)).unwrap();
        assert_eq!(json, "\"07:00 PM\"");
        let back: ClockTime = serde_json::from_str(&json).unwrap();
        assert_eq!(back, at(7, Period::PM));
        assert!(serde_json::from_str::<ClockTime>("\"25:00 XM\"").is_err());
    }

    #[test]
    fn test_toggle_period() {
        assert_eq!(at(6, Period::AM).toggle_period(), at(6, Period::PM));
        assert_eq!(Period::PM.toggle(), Period::AM);
    }
}
