//! Clock time and day-type handling for the service schedule.
//!
//! The schedule encodes times of day as HHMM integers (`1543` is 15:43).
//! This module validates those values and converts them to minutes since
//! midnight, which is what schedule lookups compare against.

use std::fmt;
use std::str::FromStr;

use chrono::{Datelike, NaiveDate, NaiveTime, Timelike, Weekday};
use serde::Serialize;

/// Error returned when parsing an invalid HHMM clock time.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid clock time: {reason}")]
pub struct InvalidClockTime {
    reason: &'static str,
}

impl InvalidClockTime {
    fn new(reason: &'static str) -> Self {
        Self { reason }
    }
}

/// Convert an HHMM integer to minutes since midnight.
///
/// No validation is done: `1575` becomes `15 * 60 + 75`.
pub const fn hhmm_to_minutes(hhmm: u32) -> u32 {
    (hhmm / 100) * 60 + hhmm % 100
}

/// Parse a numeric HHMM string of 1 to 4 ASCII digits.
///
/// Only the shape is checked. `"1575"` parses to `1575` even though it is
/// not a valid time of day. Parsing a [`ClockTime`] adds the range checks.
pub fn parse_hhmm_digits(s: &str) -> Result<u32, InvalidClockTime> {
    let s = s.trim();
    if s.is_empty() || s.len() > 4 {
        return Err(InvalidClockTime::new("expected 1 to 4 digits"));
    }
    if !s.bytes().all(|b| b.is_ascii_digit()) {
        return Err(InvalidClockTime::new("expected digits only"));
    }
    s.parse()
        .map_err(|_| InvalidClockTime::new("expected digits only"))
}

/// A validated time of day in HHMM form.
///
/// # Examples
///
/// ```
/// use everline_tracker::domain::ClockTime;
///
/// let t = ClockTime::from_hhmm(1543).unwrap();
/// assert_eq!(t.minutes_since_midnight(), 943);
/// assert_eq!(t.to_string(), "15:43");
///
/// let early: ClockTime = "0530".parse().unwrap();
/// assert_eq!(early.hhmm(), 530);
///
/// assert!(ClockTime::from_hhmm(2400).is_err());
/// assert!(ClockTime::from_hhmm(1260).is_err());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ClockTime {
    hour: u8,
    minute: u8,
}

impl ClockTime {
    /// Create a clock time from hour and minute components.
    pub fn new(hour: u32, minute: u32) -> Result<Self, InvalidClockTime> {
        if hour > 23 {
            return Err(InvalidClockTime::new("hour must be 0-23"));
        }
        if minute > 59 {
            return Err(InvalidClockTime::new("minute must be 0-59"));
        }
        Ok(Self {
            hour: hour as u8,
            minute: minute as u8,
        })
    }

    /// Create a clock time from an HHMM integer such as `1543`.
    pub fn from_hhmm(hhmm: u32) -> Result<Self, InvalidClockTime> {
        Self::new(hhmm / 100, hhmm % 100)
    }

    /// Create a clock time from minutes since midnight.
    pub fn from_minutes(minutes: u32) -> Result<Self, InvalidClockTime> {
        if minutes >= 24 * 60 {
            return Err(InvalidClockTime::new("minutes must be below 1440"));
        }
        Self::new(minutes / 60, minutes % 60)
    }

    /// Returns the hour (0-23).
    pub fn hour(&self) -> u32 {
        u32::from(self.hour)
    }

    /// Returns the minute (0-59).
    pub fn minute(&self) -> u32 {
        u32::from(self.minute)
    }

    /// Returns the HHMM integer form.
    pub fn hhmm(&self) -> u32 {
        self.hour() * 100 + self.minute()
    }

    /// Returns minutes elapsed since midnight.
    pub fn minutes_since_midnight(&self) -> u32 {
        self.hour() * 60 + self.minute()
    }
}

impl From<NaiveTime> for ClockTime {
    fn from(time: NaiveTime) -> Self {
        Self {
            hour: time.hour() as u8,
            minute: time.minute() as u8,
        }
    }
}

impl FromStr for ClockTime {
    type Err = InvalidClockTime;

    /// Parse a numeric HHMM string. Leading zeros are optional, so `"530"`
    /// and `"0530"` are the same time.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_hhmm(parse_hhmm_digits(s)?)
    }
}

impl fmt::Display for ClockTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:02}:{:02}", self.hour, self.minute)
    }
}

impl Serialize for ClockTime {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

/// Service pattern for a calendar day.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum DayType {
    Weekday,
    /// Weekends and public holidays.
    Weekend,
}

impl DayType {
    /// Map a weekend flag onto a day-type.
    pub fn from_weekend_flag(is_weekend: bool) -> Self {
        if is_weekend {
            DayType::Weekend
        } else {
            DayType::Weekday
        }
    }

    /// Day-type for a calendar date. Saturday and Sunday are weekend days.
    ///
    /// Public holidays are not known here; callers that know a date is a
    /// holiday should use [`DayType::Weekend`] directly.
    pub fn for_date(date: NaiveDate) -> Self {
        match date.weekday() {
            Weekday::Sat | Weekday::Sun => DayType::Weekend,
            _ => DayType::Weekday,
        }
    }
}

impl fmt::Display for DayType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DayType::Weekday => f.write_str("weekday"),
            DayType::Weekend => f.write_str("weekend"),
        }
    }
}


#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        /// Valid HHMM values agree with the unchecked conversion
        #[test]
        fn minutes_match_unchecked(hour in 0u32..24, minute in 0u32..60) {
            let t = ClockTime::new(hour, minute).unwrap();
            prop_assert_eq!(t.minutes_since_midnight(), hhmm_to_minutes(t.hhmm()));
        }

        /// Minutes since midnight roundtrip through from_minutes
        #[test]
        fn minutes_roundtrip(minutes in 0u32..1440) {
            let t = ClockTime::from_minutes(minutes).unwrap();
            prop_assert_eq!(t.minutes_since_midnight(), minutes);
        }

        /// Ordering follows minutes since midnight
        #[test]
        fn ordering_matches_minutes(a in 0u32..1440, b in 0u32..1440) {
            let ta = ClockTime::from_minutes(a).unwrap();
            let tb = ClockTime::from_minutes(b).unwrap();
            prop_assert_eq!(ta.cmp(&tb), a.cmp(&b));
        }
    }
}
