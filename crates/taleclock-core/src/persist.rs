//! Persistence capabilities for the campaign clock.
//!
//! The clock never talks to storage directly. It holds a [`PersistSink`]
//! and calls it synchronously whenever the timestamp must be saved; the
//! sink is fire-and-forget. Storage backends implement
//! [`TimestampStore`], and [`spawn_persist_writer`] bridges the two with
//! a channel and a background task.
//!
//! ```text
//! SimulatedClock --persist_now--> ChannelSink --mpsc--> writer task --save--> TimestampStore
//! ```
//!
//! A failed save is logged and dropped. The next pause, skip, or
//! persistence interval will save again; the writer owns no retry loop.

use std::collections::BTreeMap;
use std::future::Future;
use std::sync::Arc;

use taleclock_types::{CampaignId, FictionalTimestamp};
use tokio::sync::{RwLock, mpsc};
use tokio::task::JoinHandle;
use tracing::{debug, warn};

/// Errors reported by a [`TimestampStore`].
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// The storage backend failed.
    #[error("timestamp store error: {message}")]
    Backend {
        /// Description of the backend failure.
        message: String,
    },
}

// ---------------------------------------------------------------------------
// Sink
// ---------------------------------------------------------------------------

/// Fire-and-forget capability the clock invokes to persist its timestamp.
///
/// Implementations must not block: the clock calls this while holding
/// its own lock.
pub trait PersistSink: Send + Sync {
    /// Hand `timestamp` off for persistence.
    fn persist_now(&self, timestamp: FictionalTimestamp);
}

impl<F> PersistSink for F
where
    F: Fn(FictionalTimestamp) + Send + Sync,
{
    fn persist_now(&self, timestamp: FictionalTimestamp) {
        self(timestamp);
    }
}

/// A [`PersistSink`] that forwards timestamps to a persist writer task.
#[derive(Debug, Clone)]
pub struct ChannelSink {
    tx: mpsc::UnboundedSender<FictionalTimestamp>,
}

impl PersistSink for ChannelSink {
    fn persist_now(&self, timestamp: FictionalTimestamp) {
        if self.tx.send(timestamp).is_err() {
            warn!(%timestamp, "persist writer has shut down, timestamp not saved");
        }
    }
}

// ---------------------------------------------------------------------------
// Store
// ---------------------------------------------------------------------------

/// Key-value storage for the last saved timestamp of each campaign.
pub trait TimestampStore: Send + Sync + 'static {
    /// Read the last saved timestamp for `campaign`, if any.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] if the backend cannot be read.
    fn load(
        &self,
        campaign: &CampaignId,
    ) -> impl Future<Output = Result<Option<FictionalTimestamp>, StoreError>> + Send;

    /// Save `timestamp` as the last saved timestamp for `campaign`.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] if the backend cannot be written.
    fn save(
        &self,
        campaign: &CampaignId,
        timestamp: FictionalTimestamp,
    ) -> impl Future<Output = Result<(), StoreError>> + Send;
}

/// Process-local [`TimestampStore`].
///
/// Used when no external store is configured, and in tests. Clones share
/// the same map.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    entries: Arc<RwLock<BTreeMap<CampaignId, FictionalTimestamp>>>,
}

impl MemoryStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }
}

impl TimestampStore for MemoryStore {
    async fn load(&self, campaign: &CampaignId) -> Result<Option<FictionalTimestamp>, StoreError> {
        Ok(self.entries.read().await.get(campaign).copied())
    }

    async fn save(
        &self,
        campaign: &CampaignId,
        timestamp: FictionalTimestamp,
    ) -> Result<(), StoreError> {
        self.entries.write().await.insert(campaign.clone(), timestamp);
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Restore + writer
// ---------------------------------------------------------------------------

/// Look up the last saved timestamp for `campaign`.
///
/// A failed lookup is logged and treated the same as a missing value, so
/// the clock falls back to its start date.
pub async fn restore_from_store<S: TimestampStore>(
    store: &S,
    campaign: &CampaignId,
) -> Option<FictionalTimestamp> {
    match store.load(campaign).await {
        Ok(stored) => stored,
        Err(e) => {
            warn!(campaign = %campaign, error = %e, "failed to restore timestamp, using start date");
            None
        }
    }
}

/// Spawn a background task that saves every timestamp sent through the
/// returned sink into `store` under `campaign`.
///
/// The task ends once every clone of the sink has been dropped and the
/// queue is drained.
pub fn spawn_persist_writer<S: TimestampStore>(
    store: S,
    campaign: CampaignId,
) -> (ChannelSink, JoinHandle<()>) {
    let (tx, mut rx) = mpsc::unbounded_channel::<FictionalTimestamp>();

    let handle = tokio::spawn(async move {
        while let Some(timestamp) = rx.recv().await {
            match store.save(&campaign, timestamp).await {
                Ok(()) => debug!(campaign = %campaign, %timestamp, "Timestamp persisted"),
                Err(e) => warn!(
                    campaign = %campaign,
                    %timestamp,
                    error = %e,
                    "failed to persist timestamp"
                ),
            }
        }
        debug!(campaign = %campaign, "Persist writer stopped");
    });

    (ChannelSink { tx }, handle)
}
