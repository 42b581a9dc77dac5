//! Web layer for the Everline tracker.
//!
//! Provides JSON endpoints for the latest train positions, the station
//! list and the service interval timetable.

mod dto;
mod routes;
mod state;

pub use dto::*;
pub use routes::{AppError, create_router};
pub use state::AppState;
