//! Everline real-time feed client.
//!
//! This module fetches the JSON payload that lists every train currently
//! on the line, and converts its records into validated domain types.
//!
//! Key characteristics of the feed:
//! - One request returns a snapshot of all trains; there is no push channel
//! - Codes are sent as strings ("1", "2", ...) but sometimes as numbers
//! - `time` is the number of seconds the train has spent in its current
//!   segment, reset at each station

mod client;
mod convert;
mod error;
mod mock;
mod source;
mod types;

pub use client::{DEFAULT_FEED_URL, FeedClient, FeedConfig};
pub use convert::{
    ConversionError, ConvertedFeed, ConvertedRecord, convert_feed, convert_record, convert_value,
};
pub use error::FeedError;
pub use mock::MockFeed;
pub use source::FeedSource;
pub use types::{FeedResponse, FeedScalar, RawTrainRecord};
