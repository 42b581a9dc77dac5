//! Drive rate calculation.
//!
//! The drive rate is the share of a segment's expected travel time that a
//! train has already spent in it, as a percentage. It is derived from a
//! single feed snapshot; nothing is interpolated between polls.

use std::fmt;

use serde::{Serialize, Serializer};

use crate::domain::TrainRecord;
use crate::line::{LineError, StationTable};

/// A completion percentage in `[0, 100]` with at most two decimal places.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd)]
pub struct DriveRate(f64);

impl DriveRate {
    /// Nothing of the segment has elapsed.
    pub const ZERO: DriveRate = DriveRate(0.0);

    /// The train has arrived.
    pub const ARRIVED: DriveRate = DriveRate(100.0);

    /// Rate for `elapsed_secs` spent in a segment expected to take
    /// `duration_secs`.
    ///
    /// Rounded to two decimal places and clamped to 100. A zero duration
    /// yields [`DriveRate::ZERO`].
    ///
    /// # Examples
    ///
    /// ```
    /// use everline_tracker::progress::DriveRate;
    ///
    /// assert_eq!(DriveRate::from_elapsed(48, 96).percent(), 50.0);
    /// assert_eq!(DriveRate::from_elapsed(1, 3).percent(), 33.33);
    /// assert_eq!(DriveRate::from_elapsed(500, 96).percent(), 100.0);
    /// assert_eq!(DriveRate::from_elapsed(10, 0).percent(), 0.0);
    /// ```
    pub fn from_elapsed(elapsed_secs: u32, duration_secs: u32) -> Self {
        if duration_secs == 0 {
            return Self::ZERO;
        }
        let raw = f64::from(elapsed_secs) / f64::from(duration_secs) * 100.0;
        let rounded = (raw * 100.0).round() / 100.0;
        DriveRate(rounded.min(100.0))
    }

    /// The percentage value.
    pub fn percent(&self) -> f64 {
        self.0
    }
}

impl fmt::Display for DriveRate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.2}%", self.0)
    }
}

impl Serialize for DriveRate {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_f64(self.0)
    }
}

/// A batch item with its derived drive rate attached.
#[derive(Debug, Clone)]
pub struct Enriched<T> {
    pub item: T,
    pub drive_rate: DriveRate,
}

/// A batch item whose drive rate could not be derived.
#[derive(Debug, Clone)]
pub struct Rejected<T> {
    /// Position of the item in the input batch.
    pub position: usize,
    pub item: T,
    pub error: LineError,
}

/// Result of enriching a batch: every item ends up in exactly one list.
#[derive(Debug, Clone)]
pub struct BatchOutcome<T> {
    /// Enriched items, in input order.
    pub enriched: Vec<Enriched<T>>,
    /// Items that were skipped, in input order.
    pub rejected: Vec<Rejected<T>>,
}

impl<T> Default for BatchOutcome<T> {
    fn default() -> Self {
        Self {
            enriched: Vec::new(),
            rejected: Vec::new(),
        }
    }
}

/// Derives drive rates from train records using a station table.
#[derive(Debug, Clone, Copy)]
pub struct TrainProgressCalculator<'a> {
    table: &'a StationTable,
}

impl<'a> TrainProgressCalculator<'a> {
    pub fn new(table: &'a StationTable) -> Self {
        Self { table }
    }

    /// Drive rate for a single record.
    ///
    /// A train at the destination of its leg is always at 100%. Otherwise
    /// the rate compares the elapsed time with the travel time of the
    /// segment leaving the current station.
    pub fn compute_drive_rate(&self, record: &TrainRecord) -> Result<DriveRate, LineError> {
        let index = self.table.station_index(&record.station, record.direction)?;

        if record.at_destination() {
            return Ok(DriveRate::ARRIVED);
        }

        let duration = self.table.segment_duration(record.direction, index);
        Ok(DriveRate::from_elapsed(record.elapsed_secs, duration))
    }

    /// Enrich every item of a poll batch independently.
    ///
    /// An item whose station cannot be resolved is moved to
    /// [`BatchOutcome::rejected`]; the rest of the batch is unaffected.
    pub fn enrich_batch<T, I>(&self, items: I) -> BatchOutcome<T>
    where
        T: AsRef<TrainRecord>,
        I: IntoIterator<Item = T>,
    {
        let mut outcome = BatchOutcome::default();

        for (position, item) in items.into_iter().enumerate() {
            match self.compute_drive_rate(item.as_ref()) {
                Ok(drive_rate) => outcome.enriched.push(Enriched { item, drive_rate }),
                Err(error) => outcome.rejected.push(Rejected {
                    position,
                    item,
                    error,
                }),
            }
        }

        outcome
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{Direction, StationCode, TrainStatus};
    use crate::line::{DOWNWARD_SEGMENT_SECS, SEGMENT_COUNT};

    fn record(direction: Direction, elapsed: u32, station: u16, destination: u16) -> TrainRecord {
        TrainRecord {
            direction,
            elapsed_secs: elapsed,
            status: TrainStatus::Start,
            station: StationCode::new(station),
            destination: StationCode::new(destination),
        }
    }

    #[test]
    fn half_way_through_first_upward_segment() {
        let table = StationTable::everline();
        let calc = TrainProgressCalculator::new(&table);

        // Y124 → Y123 takes 96s upward
        let rate = calc
            .compute_drive_rate(&record(Direction::Upward, 48, 124, 110))
            .unwrap();
        assert_eq!(rate.percent(), 50.0);
    }

    #[test]
    fn rounds_to_two_decimals() {
        let table = StationTable::everline();
        let calc = TrainProgressCalculator::new(&table);

        // Y110 → Y111 takes 89s downward: 30 / 89 = 33.7078...
        let rate = calc
            .compute_drive_rate(&record(Direction::Downward, 30, 110, 124))
            .unwrap();
        assert_eq!(rate.percent(), 33.71);
    }

    #[test]
    fn clamped_when_overdue() {
        let table = StationTable::everline();
        let calc = TrainProgressCalculator::new(&table);

        let rate = calc
            .compute_drive_rate(&record(Direction::Downward, 1_000, 115, 124))
            .unwrap();
        assert_eq!(rate, DriveRate::ARRIVED);
    }

    #[test]
    fn at_destination_is_arrived_regardless_of_elapsed() {
        let table = StationTable::everline();
        let calc = TrainProgressCalculator::new(&table);

        for elapsed in [0, 1, 50, 10_000] {
            let rate = calc
                .compute_drive_rate(&record(Direction::Upward, elapsed, 110, 110))
                .unwrap();
            assert_eq!(rate, DriveRate::ARRIVED);
        }

        // Short-turning train reaching a mid-line destination
        let rate = calc
            .compute_drive_rate(&record(Direction::Downward, 0, 117, 117))
            .unwrap();
        assert_eq!(rate, DriveRate::ARRIVED);
    }

    #[test]
    fn terminal_without_matching_destination_is_zero() {
        let table = StationTable::everline();
        let calc = TrainProgressCalculator::new(&table);

        // At Y124 heading downward, no segment remains
        let rate = calc
            .compute_drive_rate(&record(Direction::Downward, 40, 124, 123))
            .unwrap();
        assert_eq!(rate, DriveRate::ZERO);
        assert!(!rate.percent().is_nan());
    }

    #[test]
    fn zero_duration_segment_is_zero() {
        let mut downward = DOWNWARD_SEGMENT_SECS;
        downward[3] = 0;
        let table = StationTable::with_durations([60; SEGMENT_COUNT], downward);
        let calc = TrainProgressCalculator::new(&table);

        let rate = calc
            .compute_drive_rate(&record(Direction::Downward, 25, 113, 124))
            .unwrap();
        assert_eq!(rate, DriveRate::ZERO);
    }

    #[test]
    fn unknown_station_is_an_error() {
        let table = StationTable::everline();
        let calc = TrainProgressCalculator::new(&table);

        let err = calc
            .compute_drive_rate(&record(Direction::Upward, 10, 300, 110))
            .unwrap_err();
        assert_eq!(
            err,
            LineError::StationNotFound {
                code: StationCode::new(300),
                direction: Direction::Upward,
            }
        );
    }

    #[test]
    fn batch_isolates_bad_record() {
        let table = StationTable::everline();
        let calc = TrainProgressCalculator::new(&table);

        let batch = vec![
            record(Direction::Upward, 48, 124, 110),
            record(Direction::Downward, 10, 999, 124),
            record(Direction::Downward, 89, 110, 124),
            record(Direction::Upward, 3, 110, 110),
        ];

        let outcome = calc.enrich_batch(batch);

        assert_eq!(outcome.enriched.len(), 3);
        assert_eq!(outcome.rejected.len(), 1);

        let rates: Vec<f64> = outcome
            .enriched
            .iter()
            .map(|e| e.drive_rate.percent())
            .collect();
        assert_eq!(rates, vec![50.0, 100.0, 100.0]);

        let rejected = &outcome.rejected[0];
        assert_eq!(rejected.position, 1);
        assert_eq!(rejected.item.station, StationCode::new(999));
    }

    #[test]
    fn enrichment_preserves_record() {
        let table = StationTable::everline();
        let calc = TrainProgressCalculator::new(&table);

        let original = record(Direction::Downward, 20, 118, 124);
        let outcome = calc.enrich_batch([original.clone()]);
        assert_eq!(outcome.enriched[0].item, original);
    }

    #[test]
    fn empty_batch() {
        let table = StationTable::everline();
        let calc = TrainProgressCalculator::new(&table);

        let outcome = calc.enrich_batch(Vec::<TrainRecord>::new());
        assert!(outcome.enriched.is_empty());
        assert!(outcome.rejected.is_empty());
    }

    #[test]
    fn display() {
        assert_eq!(DriveRate::from_elapsed(1, 3).to_string(), "33.33%");
        assert_eq!(
            serde_json::to_string(&DriveRate::from_elapsed(1, 8)).unwrap(),
            "12.5"
        );
    }
}

#[cfg(test)]
mod proptests {
    use super::*;
    use crate::domain::{Direction, StationCode, TrainStatus};
    use crate::line::{SEGMENT_COUNT, STATION_COUNT};
    use proptest::prelude::*;

    fn direction() -> impl Strategy<Value = Direction> {
        prop_oneof![Just(Direction::Upward), Just(Direction::Downward)]
    }

    proptest! {
        /// Rate never exceeds 100 and is never negative or NaN
        #[test]
        fn always_in_range(elapsed in any::<u32>(), duration in any::<u32>()) {
            let rate = DriveRate::from_elapsed(elapsed, duration).percent();
            prop_assert!(!rate.is_nan());
            prop_assert!((0.0..=100.0).contains(&rate));
        }

        /// More elapsed time never lowers the rate
        #[test]
        fn monotonic_in_elapsed(a in 0u32..100_000, b in 0u32..100_000, duration in 1u32..1_000) {
            let (lo, hi) = if a <= b { (a, b) } else { (b, a) };
            prop_assert!(
                DriveRate::from_elapsed(lo, duration) <= DriveRate::from_elapsed(hi, duration)
            );
        }

        /// Every station on the line resolves in both directions
        #[test]
        fn every_line_station_resolves(
            dir in direction(),
            station in 0usize..STATION_COUNT,
            elapsed in 0u32..10_000,
        ) {
            let table = StationTable::everline();
            let calc = TrainProgressCalculator::new(&table);
            let code = table.stations()[station].code;
            let record = TrainRecord {
                direction: dir,
                elapsed_secs: elapsed,
                status: TrainStatus::Stop,
                station: code,
                destination: StationCode::new(0),
            };
            let rate = calc.compute_drive_rate(&record).unwrap().percent();
            prop_assert!((0.0..=100.0).contains(&rate));
        }

        /// Published durations are returned exactly
        #[test]
        fn segment_durations_non_negative(dir in direction(), index in 0usize..SEGMENT_COUNT) {
            let table = StationTable::everline();
            prop_assert_eq!(table.segment_duration(dir, index), table.durations(dir)[index]);
            prop_assert!(table.segment_duration(dir, index) > 0);
        }
    }
}
