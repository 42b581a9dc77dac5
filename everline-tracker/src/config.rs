//! Process configuration.
//!
//! Everything has a working default; environment variables override
//! individual settings.

use std::net::SocketAddr;
use std::time::Duration;

use crate::feed::FeedConfig;
use crate::poller::PollerConfig;

/// Feed URL override.
pub const ENV_FEED_URL: &str = "EVERLINE_FEED_URL";
/// Feed request timeout in seconds.
pub const ENV_TIMEOUT_SECS: &str = "EVERLINE_TIMEOUT_SECS";
/// Auto-update interval in milliseconds.
pub const ENV_POLL_INTERVAL_MS: &str = "EVERLINE_POLL_INTERVAL_MS";
/// Age in seconds after which a snapshot is reported stale.
pub const ENV_STALE_AFTER_SECS: &str = "EVERLINE_STALE_AFTER_SECS";
/// Address the HTTP API listens on.
pub const ENV_LISTEN_ADDR: &str = "EVERLINE_LISTEN_ADDR";
/// Path of a captured payload to serve instead of the live feed.
pub const ENV_MOCK_FEED: &str = "EVERLINE_MOCK_FEED";

/// Error reading configuration.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid value {value:?} for {key}: {reason}")]
pub struct ConfigError {
    pub key: &'static str,
    pub value: String,
    pub reason: String,
}

/// Top-level configuration for the tracker binary.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TrackerConfig {
    pub feed: FeedConfig,
    pub poller: PollerConfig,
    pub listen_addr: SocketAddr,
    /// Serve this captured payload instead of fetching the live feed.
    pub mock_feed: Option<String>,
}

impl Default for TrackerConfig {
    fn default() -> Self {
        Self {
            feed: FeedConfig::default(),
            poller: PollerConfig::default(),
            listen_addr: SocketAddr::from(([127, 0, 0, 1], 3000)),
            mock_feed: None,
        }
    }
}

impl TrackerConfig {
    /// Read overrides from the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Read overrides through `lookup`, which maps a variable name to its
    /// value. Unset variables keep their defaults.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();

        if let Some(url) = lookup(ENV_FEED_URL) {
            config.feed = config.feed.with_url(url);
        }

        if let Some(secs) = parse_var::<u64>(&lookup, ENV_TIMEOUT_SECS)? {
            config.feed = config.feed.with_timeout(secs);
        }

        if let Some(ms) = parse_var::<u64>(&lookup, ENV_POLL_INTERVAL_MS)? {
            if ms == 0 {
                return Err(ConfigError {
                    key: ENV_POLL_INTERVAL_MS,
                    value: ms.to_string(),
                    reason: "must be greater than zero".to_string(),
                });
            }
            config.poller = config.poller.with_interval(Duration::from_millis(ms));
        }

        if let Some(secs) = parse_var::<u64>(&lookup, ENV_STALE_AFTER_SECS)? {
            config.poller = config.poller.with_stale_after(Duration::from_secs(secs));
        }

        if let Some(addr) = parse_var::<SocketAddr>(&lookup, ENV_LISTEN_ADDR)? {
            config.listen_addr = addr;
        }

        config.mock_feed = lookup(ENV_MOCK_FEED).filter(|p| !p.is_empty());

        // The outer fetch guard must not cut off the HTTP client's own timeout
        let feed_timeout = Duration::from_secs(config.feed.timeout_secs);
        if config.poller.fetch_timeout < feed_timeout {
            config.poller = config.poller.with_fetch_timeout(feed_timeout);
        }

        Ok(config)
    }
}

fn parse_var<T>(
    lookup: &impl Fn(&str) -> Option<String>,
    key: &'static str,
) -> Result<Option<T>, ConfigError>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    let Some(value) = lookup(key) else {
        return Ok(None);
    };

    value.trim().parse().map(Some).map_err(|e: T::Err| ConfigError {
        key,
        value: value.clone(),
        reason: e.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key: &str| map.get(key).cloned()
    }

    #[test]
    fn defaults_without_environment() {
        let config = TrackerConfig::from_lookup(lookup(&[])).unwrap();
        assert_eq!(config, TrackerConfig::default());
        assert_eq!(config.listen_addr.to_string(), "127.0.0.1:3000");
        assert_eq!(config.poller.interval, Duration::from_secs(1));
        assert!(config.mock_feed.is_none());
    }

    #[test]
    fn overrides_apply() {
        let config = TrackerConfig::from_lookup(lookup(&[
            (ENV_FEED_URL, "http://localhost:9000/feed.json"),
            (ENV_TIMEOUT_SECS, "10"),
            (ENV_POLL_INTERVAL_MS, "2500"),
            (ENV_STALE_AFTER_SECS, "60"),
            (ENV_LISTEN_ADDR, "0.0.0.0:8080"),
            (ENV_MOCK_FEED, "data/api009.json"),
        ]))
        .unwrap();

        assert_eq!(config.feed.url, "http://localhost:9000/feed.json");
        assert_eq!(config.feed.timeout_secs, 10);
        assert_eq!(config.poller.interval, Duration::from_millis(2500));
        assert_eq!(config.poller.stale_after, Duration::from_secs(60));
        assert_eq!(config.poller.fetch_timeout, Duration::from_secs(10));
        assert_eq!(config.listen_addr.port(), 8080);
        assert_eq!(config.mock_feed.as_deref(), Some("data/api009.json"));
    }

    #[test]
    fn invalid_values_are_errors() {
        let err = TrackerConfig::from_lookup(lookup(&[(ENV_TIMEOUT_SECS, "three")])).unwrap_err();
        assert_eq!(err.key, ENV_TIMEOUT_SECS);
        assert_eq!(err.value, "three");

        let err = TrackerConfig::from_lookup(lookup(&[(ENV_LISTEN_ADDR, "localhost")])).unwrap_err();
        assert_eq!(err.key, ENV_LISTEN_ADDR);

        let err = TrackerConfig::from_lookup(lookup(&[(ENV_POLL_INTERVAL_MS, "0")])).unwrap_err();
        assert!(err.to_string().contains("greater than zero"));
    }
}
