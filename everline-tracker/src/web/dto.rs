//! Data transfer objects for web requests and responses.

use serde::{Deserialize, Serialize};

use crate::domain::DayType;
use crate::feed::{ConvertedRecord, RawTrainRecord};
use crate::line::{Station, StationTable};
use crate::poller::{RejectedRecord, Snapshot};
use crate::progress::{DriveRate, Enriched};

/// Station list response.
#[derive(Debug, Serialize)]
pub struct StationsResponse {
    pub stations: Vec<Station>,
}

/// Latest train positions.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TrainsResponse {
    /// When the snapshot was fetched (RFC 3339)
    pub last_update: String,

    /// Whether the snapshot is older than the staleness threshold
    pub stale: bool,

    /// Number of records in the feed, including rejected ones
    pub train_count: usize,

    /// Enriched trains, in feed order
    pub trains: Vec<TrainResult>,

    /// Records that were skipped
    pub rejected: Vec<RejectedResult>,
}

/// A train as the feed sent it, plus derived fields.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TrainResult {
    /// Original feed fields, unchanged
    #[serde(flatten)]
    pub raw: RawTrainRecord,

    /// Share of the current segment completed, 0 to 100
    pub drive_rate: DriveRate,

    /// Korean name of the current station
    pub station_name: Option<&'static str>,

    /// Korean name of the destination
    pub destination_name: Option<&'static str>,
}

/// A skipped record.
#[derive(Debug, Serialize)]
pub struct RejectedResult {
    /// Position in the feed's `data` array
    pub index: usize,

    /// Why it was skipped
    pub reason: String,
}

/// Train count response.
#[derive(Debug, Serialize)]
pub struct CountResponse {
    pub count: usize,
}

/// Query for the interval lookup.
#[derive(Debug, Default, Deserialize)]
pub struct IntervalRequest {
    /// HHMM clock time (defaults to now)
    pub time: Option<String>,

    /// Whether to use the weekend timetable (defaults to today's day-type)
    pub weekend: Option<bool>,
}

/// Interval lookup response.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct IntervalResponse {
    /// Clock value the lookup used, as four HHMM digits
    pub time: String,
    pub day_type: DayType,

    /// Minutes between trains, null when no service runs
    pub interval_minutes: Option<u32>,
}

/// Error response.
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    /// Error message
    pub error: String,
}

// Conversion implementations

impl TrainResult {
    /// Build from an enriched record, resolving station names.
    pub fn from_enriched(train: &Enriched<ConvertedRecord>, table: &StationTable) -> Self {
        let record = &train.item.record;
        Self {
            raw: train.item.raw.clone(),
            drive_rate: train.drive_rate,
            station_name: table.name_for(&record.station).ok(),
            destination_name: table.name_for(&record.destination).ok(),
        }
    }
}

impl From<&RejectedRecord> for RejectedResult {
    fn from(rejected: &RejectedRecord) -> Self {
        Self {
            index: rejected.index,
            reason: rejected.reason.to_string(),
        }
    }
}

impl TrainsResponse {
    /// Build from a snapshot.
    pub fn from_snapshot(snapshot: &Snapshot, table: &StationTable, stale: bool) -> Self {
        Self {
            last_update: snapshot.fetched_at.to_rfc3339(),
            stale,
            train_count: snapshot.train_count(),
            trains: snapshot
                .trains
                .iter()
                .map(|t| TrainResult::from_enriched(t, table))
                .collect(),
            rejected: snapshot.rejected.iter().map(RejectedResult::from).collect(),
        }
    }
}
