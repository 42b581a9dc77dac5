//! Train snapshot types: direction of travel, status, and the validated record.

use std::fmt;

use serde::Serialize;

use super::StationCode;

/// Direction of travel along the line.
///
/// Upward trains run from Jeondae-Everland (Y124) towards Giheung (Y110);
/// downward trains run the other way.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    Upward,
    Downward,
}

impl Direction {
    /// Parse the feed's `updownCode` value ("1" upward, "2" downward).
    pub fn from_wire(code: &str) -> Option<Self> {
        match code.trim() {
            "1" => Some(Direction::Upward),
            "2" => Some(Direction::Downward),
            _ => None,
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Direction::Upward => f.write_str("upward"),
            Direction::Downward => f.write_str("downward"),
        }
    }
}

/// Operating status reported for a train.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum TrainStatus {
    /// Out of service, returning to the depot.
    Return,
    /// Dwelling at a station.
    Stop,
    /// Departed and running towards the next station.
    Start,
}

impl TrainStatus {
    /// Parse the feed's `StatusCode` value.
    pub fn from_wire(code: &str) -> Option<Self> {
        match code.trim() {
            "1" => Some(TrainStatus::Return),
            "2" => Some(TrainStatus::Stop),
            "3" => Some(TrainStatus::Start),
            _ => None,
        }
    }
}

/// One validated snapshot of a train, as reported by a single poll.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TrainRecord {
    pub direction: Direction,
    /// Seconds spent in the current segment, as reported by the feed.
    pub elapsed_secs: u32,
    pub status: TrainStatus,
    /// Station the train is at, or most recently departed from.
    pub station: StationCode,
    /// Terminus of the current leg.
    pub destination: StationCode,
}

impl TrainRecord {
    /// Whether the train is at the terminus of its current leg.
    pub fn at_destination(&self) -> bool {
        self.station == self.destination
    }
}

impl AsRef<TrainRecord> for TrainRecord {
    fn as_ref(&self) -> &TrainRecord {
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn direction_wire_codes() {
        assert_eq!(Direction::from_wire("1"), Some(Direction::Upward));
        assert_eq!(Direction::from_wire("2"), Some(Direction::Downward));
        assert_eq!(Direction::from_wire(" 2 "), Some(Direction::Downward));
        assert_eq!(Direction::from_wire("3"), None);
        assert_eq!(Direction::from_wire(""), None);
    }

    #[test]
    fn status_wire_codes() {
        assert_eq!(TrainStatus::from_wire("1"), Some(TrainStatus::Return));
        assert_eq!(TrainStatus::from_wire("2"), Some(TrainStatus::Stop));
        assert_eq!(TrainStatus::from_wire("3"), Some(TrainStatus::Start));
        assert_eq!(TrainStatus::from_wire("0"), None);
        assert_eq!(TrainStatus::from_wire("start"), None);
    }

    #[test]
    fn at_destination() {
        let mut record = TrainRecord {
            direction: Direction::Downward,
            elapsed_secs: 12,
            status: TrainStatus::Stop,
            station: StationCode::new(124),
            destination: StationCode::new(124),
        };
        assert!(record.at_destination());

        record.station = StationCode::new(123);
        assert!(!record.at_destination());
    }

    #[test]
    fn display_and_serialize() {
        assert_eq!(Direction::Upward.to_string(), "upward");
        assert_eq!(
            serde_json::to_string(&TrainStatus::Start).unwrap(),
            "\"start\""
        );
    }
}
