//! Shift definitions and their default time windows

use crate::domain::time::{ClockTime, Period, TimeWindow};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Production shifts. An unselected shift is represented as `Option::None`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Shift {
    /// Day shift, 6 AM to 6 PM
    First,
    /// Night shift, 6 PM to 6 AM
    Second,
}

impl Shift {
    /// Window a shift starts out with when it is selected
    pub fn default_window(&self) -> TimeWindow {
        let six_am = ClockTime::typed(6, Period::AM);
        let six_pm = ClockTime::typed(6, Period::PM);

        match self {
            Shift::First => TimeWindow::new(six_am, six_pm),
            Shift::Second => TimeWindow::new(six_pm, six_am),
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Shift::First => "First",
            Shift::Second => "Second",
        }
    }
}

impl fmt::Display for Shift {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Shift {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "first" | "1" => Ok(Shift::First),
            "second" | "2" => Ok(Shift::Second),
            _ => Err(format!(
                "Invalid shift: '{}'. Valid shifts are: first, second",
                s
            )),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_first_shift_is_twelve_hours() {
        let window = Shift::First.default_window();
        assert_eq!(window.start, ClockTime::typed(6, Period::AM));
        assert_eq!(window.end, ClockTime::typed(6, Period::PM));
        assert_eq!(window.duration(), 12);
    }

    #[test]
    fn test_second_shift_wraps_midnight() {
        let window = Shift::Second.default_window();
        assert_eq!(window.start, ClockTime::typed(6, Period::PM));
        assert_eq!(window.end, ClockTime::typed(6, Period::AM));
        assert_eq!(window.duration(), 12);
    }

    #[test]
    fn test_parse_shift() {
        assert_eq!("first".parse::<Shift>().unwrap(), Shift::First);
        assert_eq!("Second".parse::<Shift>().unwrap(), Shift::Second);
        assert_eq!("2".parse::<Shift>().unwrap(), Shift::Second);
        assert!("third".parse::<Shift>().is_err());
    }

    #[test]
    fn test_serde_names() {
        assert_eq!(serde_json::to_string(&Shift::First).unwrap(), "\"First\"");
        let s: Shift = serde_json::from_str("\"Second\"").unwrap();
        assert_eq!(s, Shift::Second);
    }
}
