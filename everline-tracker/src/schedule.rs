//! Service interval schedule.
//!
//! The Everline publishes how often trains run for each part of the day,
//! with separate tables for weekdays and weekends. A lookup takes a clock
//! time and a day-type and returns the interval in minutes, or `None`
//! when no service is scheduled.

use std::fmt;

use serde::Serialize;

use crate::domain::{
    ClockTime, DayType, InvalidClockTime, hhmm_to_minutes, parse_hhmm_digits,
};

/// Error building a schedule from ranges.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ScheduleError {
    /// A range endpoint is not a valid HHMM time
    #[error("invalid range endpoint {0:04}")]
    InvalidEndpoint(u16),

    /// A range ends before it starts
    #[error("range {start:04}-{end:04} ends before it starts")]
    Reversed { start: u16, end: u16 },
}

/// An inclusive `[start, end]` span of the day with its service interval.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimeRange {
    start: u16,
    end: u16,
    interval: Option<u32>,
}

impl TimeRange {
    /// Build a range from HHMM endpoints.
    ///
    /// # Panics
    ///
    /// Panics if an endpoint is not a valid HHMM time or the range is
    /// reversed. Only used for compiled-in tables; [`TimeRange::try_new`]
    /// is the public constructor.
    pub(crate) const fn new(start: u16, end: u16, interval: Option<u32>) -> Self {
        assert!(is_valid_hhmm(start), "range start is not a valid HHMM time");
        assert!(is_valid_hhmm(end), "range end is not a valid HHMM time");
        assert!(start <= end, "range ends before it starts");
        Self {
            start,
            end,
            interval,
        }
    }

    /// Build a range from HHMM endpoints, validating them.
    pub fn try_new(start: u16, end: u16, interval: Option<u32>) -> Result<Self, ScheduleError> {
        for endpoint in [start, end] {
            if !is_valid_hhmm(endpoint) {
                return Err(ScheduleError::InvalidEndpoint(endpoint));
            }
        }
        if start > end {
            return Err(ScheduleError::Reversed { start, end });
        }
        Ok(Self {
            start,
            end,
            interval,
        })
    }

    /// Start of the range in HHMM form.
    pub fn start(&self) -> u16 {
        self.start
    }

    /// End of the range (inclusive) in HHMM form.
    pub fn end(&self) -> u16 {
        self.end
    }

    /// Minutes between trains, or `None` when no service runs.
    pub fn interval(&self) -> Option<u32> {
        self.interval
    }

    fn start_minutes(&self) -> u32 {
        hhmm_to_minutes(u32::from(self.start))
    }

    /// One past the last minute covered.
    fn end_minutes_exclusive(&self) -> u32 {
        hhmm_to_minutes(u32::from(self.end)) + 1
    }

    /// Whether `minutes` since midnight falls inside this range.
    pub fn contains(&self, minutes: u32) -> bool {
        self.start_minutes() <= minutes && minutes < self.end_minutes_exclusive()
    }
}

const fn is_valid_hhmm(hhmm: u16) -> bool {
    hhmm / 100 <= 23 && hhmm % 100 <= 59
}

const WEEKDAY_RANGES: [TimeRange; 8] = [
    TimeRange::new(0, 459, None),
    TimeRange::new(530, 659, Some(10)),
    TimeRange::new(700, 859, Some(3)),
    TimeRange::new(900, 1659, Some(6)),
    TimeRange::new(1700, 1959, Some(4)),
    TimeRange::new(2000, 2059, Some(6)),
    TimeRange::new(2100, 2159, Some(6)),
    TimeRange::new(2200, 2359, Some(10)),
];

const WEEKEND_RANGES: [TimeRange; 4] = [
    TimeRange::new(0, 459, None),
    TimeRange::new(530, 659, Some(10)),
    TimeRange::new(700, 2059, Some(6)),
    TimeRange::new(2100, 2359, Some(10)),
];

/// A contiguous span of minutes, inclusive at both ends.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct MinuteSpan {
    pub first: u32,
    pub last: u32,
}

impl fmt::Display for MinuteSpan {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{:02}:{:02}-{:02}:{:02}",
            self.first / 60,
            self.first % 60,
            self.last / 60,
            self.last % 60
        )
    }
}

/// Coverage of a day by a schedule's ranges.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct CoverageReport {
    /// Minutes no range covers. Lookups there return `None`.
    pub gaps: Vec<MinuteSpan>,
    /// Minutes covered by more than one range. The range listed first wins.
    pub overlaps: Vec<MinuteSpan>,
}

impl CoverageReport {
    pub fn is_complete(&self) -> bool {
        self.gaps.is_empty() && self.overlaps.is_empty()
    }
}

/// Ordered time ranges for one day-type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Schedule {
    ranges: Vec<TimeRange>,
}

impl Schedule {
    /// Build a schedule from ranges made by [`TimeRange::try_new`].
    ///
    /// Ranges are checked in the given order and the first match wins, so
    /// where two ranges overlap the one listed first decides.
    pub fn new(ranges: Vec<TimeRange>) -> Self {
        Self { ranges }
    }

    pub fn ranges(&self) -> &[TimeRange] {
        &self.ranges
    }

    /// The first range containing `minutes` since midnight.
    pub fn range_at(&self, minutes: u32) -> Option<&TimeRange> {
        self.ranges.iter().find(|r| r.contains(minutes))
    }

    /// Interval at `minutes` since midnight, `None` outside service.
    pub fn interval_at(&self, minutes: u32) -> Option<u32> {
        self.range_at(minutes).and_then(TimeRange::interval)
    }

    /// Report the gaps and overlaps across 00:00-23:59.
    pub fn validate(&self) -> CoverageReport {
        const DAY_END: u32 = 24 * 60;

        let mut sorted = self.ranges.clone();
        sorted.sort_by_key(TimeRange::start_minutes);

        let mut report = CoverageReport::default();
        let mut cursor = 0;

        for range in &sorted {
            let start = range.start_minutes();
            let end = range.end_minutes_exclusive();

            if start > cursor {
                report.gaps.push(MinuteSpan {
                    first: cursor,
                    last: start - 1,
                });
            } else if start < cursor {
                report.overlaps.push(MinuteSpan {
                    first: start,
                    last: end.min(cursor) - 1,
                });
            }
            cursor = cursor.max(end);
        }

        if cursor < DAY_END {
            report.gaps.push(MinuteSpan {
                first: cursor,
                last: DAY_END - 1,
            });
        }

        report
    }
}

/// Interval lookup across both day-types.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScheduleLookup {
    weekday: Schedule,
    weekend: Schedule,
}

impl ScheduleLookup {
    /// The published Everline timetable.
    pub fn everline() -> Self {
        Self::new(
            Schedule::new(WEEKDAY_RANGES.to_vec()),
            Schedule::new(WEEKEND_RANGES.to_vec()),
        )
    }

    pub fn new(weekday: Schedule, weekend: Schedule) -> Self {
        Self { weekday, weekend }
    }

    pub fn schedule(&self, day_type: DayType) -> &Schedule {
        match day_type {
            DayType::Weekday => &self.weekday,
            DayType::Weekend => &self.weekend,
        }
    }

    /// Interval in minutes for an HHMM clock value such as `1543`.
    ///
    /// The value is converted as `hh * 60 + mm` without further checks.
    /// Returns `None` when no service is scheduled.
    ///
    /// # Examples
    ///
    /// ```
    /// use everline_tracker::domain::DayType;
    /// use everline_tracker::schedule::ScheduleLookup;
    ///
    /// let lookup = ScheduleLookup::everline();
    /// assert_eq!(lookup.interval_minutes(1543, DayType::Weekday), Some(6));
    /// assert_eq!(lookup.interval_minutes(300, DayType::Weekday), None);
    /// assert_eq!(lookup.interval_minutes(2100, DayType::Weekend), Some(10));
    /// ```
    pub fn interval_minutes(&self, clock_time: u32, day_type: DayType) -> Option<u32> {
        self.schedule(day_type)
            .interval_at(hhmm_to_minutes(clock_time))
    }

    /// Interval in minutes for an HHMM string such as `"1543"` or `"530"`.
    ///
    /// The string must be 1 to 4 ASCII digits. Its value then goes through
    /// the same unchecked conversion as [`ScheduleLookup::interval_minutes`],
    /// so `"1575"` and `1575` always give the same answer.
    pub fn interval_minutes_str(
        &self,
        clock_time: &str,
        day_type: DayType,
    ) -> Result<Option<u32>, InvalidClockTime> {
        let hhmm = parse_hhmm_digits(clock_time)?;
        Ok(self.interval_minutes(hhmm, day_type))
    }

    /// Interval in minutes for a validated clock time.
    pub fn interval_for(&self, time: ClockTime, day_type: DayType) -> Option<u32> {
        self.schedule(day_type)
            .interval_at(time.minutes_since_midnight())
    }

    /// Coverage reports for both day-types.
    pub fn coverage(&self) -> [(DayType, CoverageReport); 2] {
        [
            (DayType::Weekday, self.weekday.validate()),
            (DayType::Weekend, self.weekend.validate()),
        ]
    }
}

impl Default for ScheduleLookup {
    fn default() -> Self {
        Self::everline()
    }
}


#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    fn day_type() -> impl Strategy<Value = DayType> {
        prop_oneof![Just(DayType::Weekday), Just(DayType::Weekend)]
    }

    proptest! {
        /// Raw HHMM and validated clock lookups agree for every valid time
        #[test]
        fn raw_and_typed_agree(minutes in 0u32..1440, day in day_type()) {
            let lookup = ScheduleLookup::everline();
            let t = ClockTime::from_minutes(minutes).unwrap();
            prop_assert_eq!(
                lookup.interval_minutes(t.hhmm(), day),
                lookup.interval_for(t, day)
            );
        }

        /// Numeric strings and integers give the same interval
        #[test]
        fn string_and_integer_agree(hhmm in 0u32..10000, day in day_type()) {
            let lookup = ScheduleLookup::everline();
            prop_assert_eq!(
                lookup.interval_minutes_str(&hhmm.to_string(), day),
                Ok(lookup.interval_minutes(hhmm, day))
            );
            prop_assert_eq!(
                lookup.interval_minutes_str(&format!("{hhmm:04}"), day),
                Ok(lookup.interval_minutes(hhmm, day))
            );
        }

        /// Service runs from 05:30 to midnight every day
        #[test]
        fn service_hours(minutes in 0u32..1440, day in day_type()) {
            let lookup = ScheduleLookup::everline();
            let t = ClockTime::from_minutes(minutes).unwrap();
            let interval = lookup.interval_for(t, day);
            prop_assert_eq!(interval.is_some(), minutes >= 330);
        }
    }
}
