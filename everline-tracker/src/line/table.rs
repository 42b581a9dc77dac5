//! Static reference data for the Everline.

use serde::Serialize;

use crate::domain::{Direction, StationCode};

use super::error::LineError;

/// Number of stations on the line.
pub const STATION_COUNT: usize = 15;

/// Number of segments between consecutive stations.
pub const SEGMENT_COUNT: usize = STATION_COUNT - 1;

/// A station on the line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Station {
    pub code: StationCode,
    /// Korean station name.
    pub name: &'static str,
    /// Romanized name used on signage.
    pub display_name: &'static str,
}

impl Station {
    const fn new(number: u16, name: &'static str, display_name: &'static str) -> Self {
        Self {
            code: StationCode::new(number),
            name,
            display_name,
        }
    }
}

/// Stations in physical order, Giheung to Jeondae-Everland.
///
/// This is also the downward traversal order.
const STATIONS: [Station; STATION_COUNT] = [
    Station::new(110, "기흥", "Giheung"),
    Station::new(111, "강남대", "KANGNAM UNIV."),
    Station::new(112, "지석", "JISEOK"),
    Station::new(113, "어정", "EOJEONG"),
    Station::new(114, "동백", "DONGBAEK"),
    Station::new(115, "초당", "CHODANG"),
    Station::new(116, "삼가", "SAMGA"),
    Station::new(117, "시청·용인대", "Cityhall·Yongin Univ"),
    Station::new(118, "명지대", "MYONGJI UNIV."),
    Station::new(119, "김량장", "GIMYANGJANG"),
    Station::new(120, "용인중앙시장", "Yongin Jungang Market"),
    Station::new(121, "고진", "GOJIN"),
    Station::new(122, "보평", "BOPYEONG"),
    Station::new(123, "둔전", "DUNJEON"),
    Station::new(124, "전대·에버랜드", "JEONDAE·EVERLAND"),
];

/// Upward segment travel times in seconds, in upward order (Y124 → Y110).
pub const UPWARD_SEGMENT_SECS: [u32; SEGMENT_COUNT] =
    [96, 82, 77, 86, 122, 172, 79, 75, 62, 70, 76, 124, 85, 184];

/// Downward segment travel times in seconds, in downward order (Y110 → Y124).
pub const DOWNWARD_SEGMENT_SECS: [u32; SEGMENT_COUNT] =
    [89, 74, 78, 83, 121, 147, 79, 77, 64, 71, 102, 110, 77, 179];

/// Station list, directional orderings and segment travel times.
///
/// All lookups are pure. The table is built once and shared read-only.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StationTable {
    upward_secs: [u32; SEGMENT_COUNT],
    downward_secs: [u32; SEGMENT_COUNT],
}

impl StationTable {
    /// The Everline with its published segment travel times.
    pub fn everline() -> Self {
        Self::with_durations(UPWARD_SEGMENT_SECS, DOWNWARD_SEGMENT_SECS)
    }

    /// The Everline stations with custom segment travel times.
    ///
    /// Each array is in that direction's traversal order.
    pub fn with_durations(
        upward_secs: [u32; SEGMENT_COUNT],
        downward_secs: [u32; SEGMENT_COUNT],
    ) -> Self {
        Self {
            upward_secs,
            downward_secs,
        }
    }

    /// All stations in physical order.
    pub fn stations(&self) -> &[Station] {
        &STATIONS
    }

    /// Stations in the order a train travelling in `direction` visits them.
    pub fn sequence(&self, direction: Direction) -> impl Iterator<Item = &Station> + '_ {
        let forward = matches!(direction, Direction::Downward);
        (0..STATION_COUNT).map(move |i| {
            if forward {
                &STATIONS[i]
            } else {
                &STATIONS[STATION_COUNT - 1 - i]
            }
        })
    }

    /// Look up a station by code.
    pub fn station(&self, code: &StationCode) -> Result<&Station, LineError> {
        STATIONS
            .iter()
            .find(|s| s.code == *code)
            .ok_or(LineError::UnknownStation(*code))
    }

    /// Zero-based position of `code` in the direction's station sequence.
    pub fn station_index(
        &self,
        code: &StationCode,
        direction: Direction,
    ) -> Result<usize, LineError> {
        self.sequence(direction)
            .position(|s| s.code == *code)
            .ok_or(LineError::StationNotFound {
                code: *code,
                direction,
            })
    }

    /// Travel time in seconds from the station at `index` to the next one in
    /// `direction`.
    ///
    /// Indexes past the last segment (a train at its terminal) yield 0.
    pub fn segment_duration(&self, direction: Direction, index: usize) -> u32 {
        self.durations(direction).get(index).copied().unwrap_or(0)
    }

    /// The station a train at `code` reaches next, or `None` at the terminal.
    pub fn next_station(
        &self,
        code: &StationCode,
        direction: Direction,
    ) -> Result<Option<&Station>, LineError> {
        let index = self.station_index(code, direction)?;
        Ok(self.sequence(direction).nth(index + 1))
    }

    /// Korean name for a station code.
    pub fn name_for(&self, code: &StationCode) -> Result<&'static str, LineError> {
        self.station(code).map(|s| s.name)
    }

    /// Romanized name for a station code.
    pub fn display_name_for(&self, code: &StationCode) -> Result<&'static str, LineError> {
        self.station(code).map(|s| s.display_name)
    }

    /// Segment travel times for a direction, in its traversal order.
    pub fn durations(&self, direction: Direction) -> &[u32; SEGMENT_COUNT] {
        match direction {
            Direction::Upward => &self.upward_secs,
            Direction::Downward => &self.downward_secs,
        }
    }
}

impl Default for StationTable {
    fn default() -> Self {
        Self::everline()
    }
}
