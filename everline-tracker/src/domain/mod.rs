//! Domain types for the Everline tracker.
//!
//! These types represent validated feed data. They enforce their invariants
//! at construction time, so code that receives them can trust their
//! validity.

mod station;
mod time;
mod train;

pub use station::{InvalidStationCode, StationCode};
pub use time::{ClockTime, DayType, InvalidClockTime, hhmm_to_minutes, parse_hhmm_digits};
pub use train::{Direction, TrainRecord, TrainStatus};
