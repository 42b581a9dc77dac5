//! Line lookup error types.

use crate::domain::{Direction, StationCode};

/// Errors from station table lookups.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum LineError {
    /// Code is well formed but not a station on this line
    #[error("station {0} is not on the line")]
    UnknownStation(StationCode),

    /// Code is absent from the direction's station sequence
    #[error("station {code} not found in {direction} sequence")]
    StationNotFound {
        code: StationCode,
        direction: Direction,
    },
}
