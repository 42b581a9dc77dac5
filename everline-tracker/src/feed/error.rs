//! Feed client error types.

use std::fmt;

/// Errors from fetching the Everline feed.
#[derive(Debug)]
pub enum FeedError {
    /// HTTP request failed (connection refused, DNS, etc.)
    Http(reqwest::Error),

    /// Request did not complete within the configured timeout
    Timeout,

    /// JSON deserialization failed
    Json {
        message: String,
        body: Option<String>,
    },

    /// Feed returned an error status code
    ApiError { status: u16, message: String },

    /// Mock data could not be loaded
    Mock(String),
}

impl fmt::Display for FeedError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FeedError::Http(e) => write!(f, "HTTP error: {e}"),
            FeedError::Timeout => write!(f, "feed request timed out"),
            FeedError::Json { message, body } => {
                write!(f, "JSON parse error: {message}")?;
                if let Some(body) = body {
                    write!(f, " (body: {body})")?;
                }
                Ok(())
            }
            FeedError::ApiError { status, message } => {
                write!(f, "feed error {status}: {message}")
            }
            FeedError::Mock(msg) => write!(f, "mock feed: {msg}"),
        }
    }
}

impl std::error::Error for FeedError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            FeedError::Http(e) => Some(e),
            _ => None,
        }
    }
}

impl From<reqwest::Error> for FeedError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            FeedError::Timeout
        } else {
            FeedError::Http(err)
        }
    }
}
