//! Everline feed response DTOs.
//!
//! These types map directly to the JSON served by the Everline real-time
//! endpoint. Field names follow the feed, which mixes camelCase and
//! PascalCase. Values the feed sends as strings sometimes arrive as
//! numbers, so scalar fields accept either.

use std::borrow::Cow;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Top-level feed payload.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct FeedResponse {
    /// Train records, one per train currently on the line.
    ///
    /// Kept as raw JSON so that a malformed record can be rejected on its
    /// own rather than failing the whole payload.
    #[serde(default)]
    pub data: Option<Vec<Value>>,

    /// Any other top-level fields.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl FeedResponse {
    /// The train records, empty if the feed sent none.
    pub fn records(&self) -> &[Value] {
        self.data.as_deref().unwrap_or(&[])
    }
}

/// A scalar that the feed may send either as a string or as a number.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(untagged)]
pub enum FeedScalar {
    Integer(i64),
    Float(f64),
    Text(String),
}

impl FeedScalar {
    /// Text form of the value, as the feed would have sent it as a string.
    pub fn as_text(&self) -> Cow<'_, str> {
        match self {
            FeedScalar::Integer(n) => Cow::Owned(n.to_string()),
            FeedScalar::Float(x) => Cow::Owned(x.to_string()),
            FeedScalar::Text(s) => Cow::Borrowed(s.as_str()),
        }
    }
}

/// One train as it appears in the feed's `data` array.
///
/// Fields the tracker does not interpret are kept in `extra` and written
/// back out unchanged.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct RawTrainRecord {
    /// "1" upward, "2" downward.
    #[serde(rename = "updownCode")]
    pub updown_code: Option<FeedScalar>,

    /// Seconds spent in the current segment.
    pub time: Option<FeedScalar>,

    /// "1" returning to depot, "2" stopped, "3" departed.
    #[serde(rename = "StatusCode")]
    pub status_code: Option<FeedScalar>,

    /// Current station code.
    #[serde(rename = "StCode")]
    pub st_code: Option<String>,

    /// Destination station code.
    #[serde(rename = "DestCode")]
    pub dest_code: Option<String>,

    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn deserialize_feed() {
        let json = r#"{
            "data": [
                {"updownCode": "1", "time": "35", "StatusCode": "3",
                 "StCode": "Y120", "DestCode": "Y110", "trainNo": "E17"}
            ],
            "updated": "2026-10-17 08:12:03"
        }"#;

        let response: FeedResponse = serde_json::from_str(json).unwrap();
        assert_eq!(response.records().len(), 1);
        assert!(response.extra.contains_key("updated"));

        let record: RawTrainRecord =
            serde_json::from_value(response.records()[0].clone()).unwrap();
        assert_eq!(record.updown_code, Some(FeedScalar::Text("1".into())));
        assert_eq!(record.st_code.as_deref(), Some("Y120"));
        assert_eq!(record.extra.get("trainNo"), Some(&Value::from("E17")));
    }

    #[test]
    fn missing_or_null_data_is_empty() {
        let response: FeedResponse = serde_json::from_str("{}").unwrap();
        assert!(response.records().is_empty());

        let response: FeedResponse = serde_json::from_str(r#"{"data": null}"#).unwrap();
        assert!(response.records().is_empty());
    }

    #[test]
    fn numeric_scalars() {
        let record: RawTrainRecord = serde_json::from_str(
            r#"{"updownCode": 2, "time": 41, "StatusCode": 2, "StCode": "Y111", "DestCode": "Y124"}"#,
        )
        .unwrap();
        assert_eq!(record.updown_code, Some(FeedScalar::Integer(2)));
        assert_eq!(record.time.as_ref().map(|t| t.as_text()).as_deref(), Some("41"));
    }

    #[test]
    fn extra_fields_roundtrip() {
        let json = r#"{"updownCode":"2","time":"0","StatusCode":"2","StCode":"Y110","DestCode":"Y124","carNo":"3"}"#;
        let record: RawTrainRecord = serde_json::from_str(json).unwrap();
        let value = serde_json::to_value(&record).unwrap();
        assert_eq!(value["carNo"], "3");
        assert_eq!(value["StCode"], "Y110");
        assert_eq!(value["updownCode"], "2");
    }
}
