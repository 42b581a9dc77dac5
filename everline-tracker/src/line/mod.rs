//! Station table for the Everline.
//!
//! Holds the fifteen stations in physical order, the per-direction
//! traversal orders, and the travel time of every segment in each
//! direction. The data is compiled in and never changes at runtime.

mod error;
mod table;

pub use error::LineError;
pub use table::{
    DOWNWARD_SEGMENT_SECS, SEGMENT_COUNT, STATION_COUNT, Station, StationTable,
    UPWARD_SEGMENT_SECS,
};
