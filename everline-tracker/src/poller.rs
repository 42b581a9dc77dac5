//! Periodic feed polling with a single-slot snapshot cache.
//!
//! The poller fetches the feed, converts and enriches the records, and
//! keeps only the latest successful result. A failed poll leaves the
//! previous snapshot in place. Readers get an `Arc<Snapshot>`, so they
//! never observe a half-written batch.
//!
//! At most one fetch runs at a time. Auto-update ticks that fire while a
//! fetch is still outstanding are skipped.

use std::sync::{Arc, Mutex};
use std::time::Duration;

use chrono::{DateTime, Local};
use tokio::sync::{Mutex as AsyncMutex, RwLock};
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tracing::{debug, info, warn};

use crate::feed::{
    ConversionError, ConvertedRecord, FeedError, FeedResponse, FeedSource, convert_feed,
};
use crate::line::{LineError, StationTable};
use crate::progress::{Enriched, TrainProgressCalculator};

/// Why a feed record did not make it into a snapshot.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RejectReason {
    #[error(transparent)]
    Conversion(#[from] ConversionError),

    #[error(transparent)]
    Line(#[from] LineError),
}

/// A feed record that was skipped.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RejectedRecord {
    /// Position in the feed's `data` array.
    pub index: usize,
    pub reason: RejectReason,
}

/// The outcome of one successful poll.
#[derive(Debug, Clone)]
pub struct Snapshot {
    /// When the payload was received.
    pub fetched_at: DateTime<Local>,
    /// Enriched trains, in feed order.
    pub trains: Vec<Enriched<ConvertedRecord>>,
    /// Skipped records, in feed order.
    pub rejected: Vec<RejectedRecord>,
}

impl Snapshot {
    /// Convert and enrich a payload.
    pub fn build(
        response: &FeedResponse,
        table: &StationTable,
        fetched_at: DateTime<Local>,
    ) -> Self {
        let converted = convert_feed(response);
        let outcome = TrainProgressCalculator::new(table).enrich_batch(converted.records);

        let mut rejected: Vec<RejectedRecord> = converted
            .rejected
            .into_iter()
            .map(|(index, e)| RejectedRecord {
                index,
                reason: e.into(),
            })
            .chain(outcome.rejected.into_iter().map(|r| {
                warn!(index = r.item.index, error = %r.error, "skipping train");
                RejectedRecord {
                    index: r.item.index,
                    reason: r.error.into(),
                }
            }))
            .collect();
        rejected.sort_by_key(|r| r.index);

        Self {
            fetched_at,
            trains: outcome.enriched,
            rejected,
        }
    }

    /// Number of records the feed reported, including skipped ones.
    pub fn train_count(&self) -> usize {
        self.trains.len() + self.rejected.len()
    }

    /// Whether the snapshot is older than `max_age` at `now`.
    pub fn is_stale(&self, now: DateTime<Local>, max_age: Duration) -> bool {
        match chrono::Duration::from_std(max_age) {
            Ok(max_age) => now.signed_duration_since(self.fetched_at) > max_age,
            Err(_) => false,
        }
    }
}

/// Shared slot holding the latest snapshot.
#[derive(Debug, Clone, Default)]
pub struct SnapshotSlot {
    inner: Arc<RwLock<Option<Arc<Snapshot>>>>,
}

impl SnapshotSlot {
    pub fn new() -> Self {
        Self::default()
    }

    /// The latest snapshot, if any poll has succeeded.
    pub async fn load(&self) -> Option<Arc<Snapshot>> {
        self.inner.read().await.clone()
    }

    /// Overwrite the slot.
    pub async fn store(&self, snapshot: Arc<Snapshot>) {
        *self.inner.write().await = Some(snapshot);
    }
}

/// Configuration for the poller.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PollerConfig {
    /// Time between auto-update ticks.
    pub interval: Duration,

    /// A fetch running longer than this is abandoned.
    pub fetch_timeout: Duration,

    /// Snapshots older than this are reported as stale.
    pub stale_after: Duration,
}

impl PollerConfig {
    /// Set the auto-update interval.
    pub fn with_interval(mut self, interval: Duration) -> Self {
        self.interval = interval;
        self
    }

    /// Set the fetch timeout.
    pub fn with_fetch_timeout(mut self, timeout: Duration) -> Self {
        self.fetch_timeout = timeout;
        self
    }

    /// Set the staleness threshold.
    pub fn with_stale_after(mut self, stale_after: Duration) -> Self {
        self.stale_after = stale_after;
        self
    }
}

impl Default for PollerConfig {
    fn default() -> Self {
        Self {
            interval: Duration::from_secs(1),
            fetch_timeout: Duration::from_secs(5),
            stale_after: Duration::from_secs(30),
        }
    }
}

struct PollerInner<S> {
    source: S,
    table: Arc<StationTable>,
    slot: SnapshotSlot,
    config: PollerConfig,
    fetch_lock: AsyncMutex<()>,
}

impl<S: FeedSource> PollerInner<S> {
    async fn poll_once(&self) -> Result<Arc<Snapshot>, FeedError> {
        // Serializes fetches: a second caller waits for the first to finish
        let _guard = self.fetch_lock.lock().await;

        let response = tokio::time::timeout(self.config.fetch_timeout, self.source.fetch())
            .await
            .map_err(|_| FeedError::Timeout)??;

        let snapshot = Arc::new(Snapshot::build(&response, &self.table, Local::now()));
        debug!(
            trains = snapshot.trains.len(),
            rejected = snapshot.rejected.len(),
            "feed snapshot built"
        );

        self.slot.store(Arc::clone(&snapshot)).await;
        Ok(snapshot)
    }

    async fn run(self: Arc<Self>) {
        let mut interval = tokio::time::interval(self.config.interval);
        interval.set_missed_tick_behavior(MissedTickBehavior::Skip);

        loop {
            interval.tick().await;
            if let Err(e) = self.poll_once().await {
                warn!(error = %e, "poll failed; keeping previous snapshot");
            }
        }
    }
}

/// Polls a feed source and holds the latest snapshot.
pub struct Poller<S> {
    inner: Arc<PollerInner<S>>,
    task: Arc<Mutex<Option<JoinHandle<()>>>>,
}

impl<S> Clone for Poller<S> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
            task: Arc::clone(&self.task),
        }
    }
}

impl<S: FeedSource> Poller<S> {
    pub fn new(source: S, table: Arc<StationTable>, config: PollerConfig) -> Self {
        Self {
            inner: Arc::new(PollerInner {
                source,
                table,
                slot: SnapshotSlot::new(),
                config,
                fetch_lock: AsyncMutex::new(()),
            }),
            task: Arc::new(Mutex::new(None)),
        }
    }

    /// Fetch once and replace the snapshot on success.
    ///
    /// On failure the previous snapshot is kept and the error returned.
    pub async fn poll_once(&self) -> Result<Arc<Snapshot>, FeedError> {
        self.inner.poll_once().await
    }

    /// Start polling in the background every `config.interval`.
    ///
    /// Returns `false` if auto-update is already running. Must be called
    /// from within a Tokio runtime.
    pub fn start_auto_update(&self) -> bool {
        let mut task = self.task.lock().unwrap_or_else(|e| e.into_inner());
        if task.as_ref().is_some_and(|handle| !handle.is_finished()) {
            return false;
        }

        let inner = Arc::clone(&self.inner);
        *task = Some(tokio::spawn(inner.run()));
        info!(interval = ?self.inner.config.interval, "auto-update started");
        true
    }

    /// Stop background polling. Returns `false` if it was not running.
    pub fn stop_auto_update(&self) -> bool {
        let mut task = self.task.lock().unwrap_or_else(|e| e.into_inner());
        match task.take() {
            Some(handle) if !handle.is_finished() => {
                handle.abort();
                info!("auto-update stopped");
                true
            }
            _ => false,
        }
    }

    /// The latest snapshot, if any poll has succeeded.
    pub async fn latest(&self) -> Option<Arc<Snapshot>> {
        self.inner.slot.load().await
    }

    /// When the latest snapshot was fetched.
    pub async fn last_update(&self) -> Option<DateTime<Local>> {
        self.latest().await.map(|s| s.fetched_at)
    }

    /// Number of trains in the latest snapshot.
    pub async fn train_count(&self) -> Option<usize> {
        self.latest().await.map(|s| s.train_count())
    }

    /// Handle to the snapshot slot, for readers that don't need the poller.
    pub fn slot(&self) -> SnapshotSlot {
        self.inner.slot.clone()
    }

    pub fn config(&self) -> &PollerConfig {
        &self.inner.config
    }
}
