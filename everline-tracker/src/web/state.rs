//! Application state for the web layer.

use std::sync::Arc;
use std::time::Duration;

use crate::line::StationTable;
use crate::poller::SnapshotSlot;
use crate::schedule::ScheduleLookup;

/// Shared application state.
///
/// Contains everything the handlers read. Nothing here is written by a
/// request; the snapshot slot is only written by the poller.
#[derive(Clone)]
pub struct AppState {
    /// Latest feed snapshot
    pub snapshots: SnapshotSlot,

    /// Station reference data
    pub table: Arc<StationTable>,

    /// Service interval timetable
    pub schedule: Arc<ScheduleLookup>,

    /// Snapshots older than this are flagged as stale
    pub stale_after: Duration,
}

impl AppState {
    /// Create a new app state.
    pub fn new(
        snapshots: SnapshotSlot,
        table: Arc<StationTable>,
        schedule: ScheduleLookup,
        stale_after: Duration,
    ) -> Self {
        Self {
            snapshots,
            table,
            schedule: Arc::new(schedule),
            stale_after,
        }
    }
}
