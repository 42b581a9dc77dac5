//! Conversion from feed DTOs to domain types.
//!
//! Each record is converted on its own. A record that does not fit the
//! schema is rejected with a [`ConversionError`] while the remaining
//! records of the same payload still convert.

use serde_json::Value;
use tracing::warn;

use crate::domain::{Direction, StationCode, TrainRecord, TrainStatus};

use super::types::{FeedResponse, FeedScalar, RawTrainRecord};

/// Error during DTO to domain conversion.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConversionError {
    /// Record is not an object with the expected field types
    #[error("malformed record: {0}")]
    Schema(String),

    /// Missing required field
    #[error("missing required field: {0}")]
    MissingField(&'static str),

    /// Unrecognized `updownCode`
    #[error("unknown direction code: {0}")]
    UnknownDirection(String),

    /// Unrecognized `StatusCode`
    #[error("unknown status code: {0}")]
    UnknownStatus(String),

    /// `time` is not a non-negative number of seconds
    #[error("invalid elapsed time: {0}")]
    InvalidTime(String),

    /// Failed to parse a station code
    #[error("invalid station code: {0}")]
    InvalidStation(String),
}

/// A feed record that converted cleanly.
#[derive(Debug, Clone, PartialEq)]
pub struct ConvertedRecord {
    /// Position of the record in the feed's `data` array.
    pub index: usize,
    /// The record as the feed sent it.
    pub raw: RawTrainRecord,
    /// Validated domain form.
    pub record: TrainRecord,
}

impl AsRef<TrainRecord> for ConvertedRecord {
    fn as_ref(&self) -> &TrainRecord {
        &self.record
    }
}

/// Result of converting a whole payload.
#[derive(Debug, Clone, Default)]
pub struct ConvertedFeed {
    pub records: Vec<ConvertedRecord>,
    /// `(index, error)` for every record that failed to convert.
    pub rejected: Vec<(usize, ConversionError)>,
}

/// Convert every record in a payload, skipping the malformed ones.
pub fn convert_feed(response: &FeedResponse) -> ConvertedFeed {
    let mut converted = ConvertedFeed::default();

    for (index, value) in response.records().iter().enumerate() {
        match convert_value(value) {
            Ok((raw, record)) => {
                converted
                    .records
                    .push(ConvertedRecord { index, raw, record });
            }
            Err(e) => {
                warn!(index, error = %e, "skipping feed record");
                converted.rejected.push((index, e));
            }
        }
    }

    converted
}

/// Convert one raw JSON record.
pub fn convert_value(value: &Value) -> Result<(RawTrainRecord, TrainRecord), ConversionError> {
    let raw: RawTrainRecord = serde_json::from_value(value.clone())
        .map_err(|e| ConversionError::Schema(e.to_string()))?;
    let record = convert_record(&raw)?;
    Ok((raw, record))
}

/// Convert a deserialized record to the domain type.
pub fn convert_record(raw: &RawTrainRecord) -> Result<TrainRecord, ConversionError> {
    let direction = raw
        .updown_code
        .as_ref()
        .ok_or(ConversionError::MissingField("updownCode"))?;
    let direction = Direction::from_wire(&direction.as_text())
        .ok_or_else(|| ConversionError::UnknownDirection(direction.as_text().into_owned()))?;

    let elapsed = raw
        .time
        .as_ref()
        .ok_or(ConversionError::MissingField("time"))?;
    let elapsed_secs = parse_elapsed(elapsed)?;

    let status = raw
        .status_code
        .as_ref()
        .ok_or(ConversionError::MissingField("StatusCode"))?;
    let status = TrainStatus::from_wire(&status.as_text())
        .ok_or_else(|| ConversionError::UnknownStatus(status.as_text().into_owned()))?;

    let station = parse_station(raw.st_code.as_deref(), "StCode")?;
    let destination = parse_station(raw.dest_code.as_deref(), "DestCode")?;

    Ok(TrainRecord {
        direction,
        elapsed_secs,
        status,
        station,
        destination,
    })
}

/// Parse elapsed seconds.
///
/// Fractional values are truncated; the feed reports whole seconds but
/// occasionally as a decimal string.
fn parse_elapsed(value: &FeedScalar) -> Result<u32, ConversionError> {
    let invalid = || ConversionError::InvalidTime(value.as_text().into_owned());

    match value {
        FeedScalar::Integer(n) => u32::try_from(*n).map_err(|_| invalid()),
        FeedScalar::Float(x) => float_secs(*x).ok_or_else(invalid),
        FeedScalar::Text(s) => {
            let s = s.trim();
            match s.parse::<u32>() {
                Ok(n) => Ok(n),
                Err(_) => s
                    .parse::<f64>()
                    .ok()
                    .and_then(float_secs)
                    .ok_or_else(invalid),
            }
        }
    }
}

fn float_secs(x: f64) -> Option<u32> {
    if x.is_finite() && x >= 0.0 && x < f64::from(u32::MAX) {
        Some(x.trunc() as u32)
    } else {
        None
    }
}

fn parse_station(code: Option<&str>, field: &'static str) -> Result<StationCode, ConversionError> {
    let code = code.ok_or(ConversionError::MissingField(field))?;
    StationCode::parse_normalized(code)
        .map_err(|_| ConversionError::InvalidStation(code.to_string()))
}
