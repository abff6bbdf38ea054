//! `Dragonfly` (Redis-compatible) campaign timestamp storage.
//!
//! # Key Patterns
//!
//! | Pattern | Type | Description |
//! |---------|------|-------------|
//! | `campaign:{id}:last_game_timestamp` | JSON | Last saved fictional timestamp (RFC 3339 string) |

use fred::prelude::*;
use serde::Serialize;
use serde::de::DeserializeOwned;
use taleclock_core::persist::{StoreError, TimestampStore};
use taleclock_types::{CampaignId, FictionalTimestamp};
use tracing::debug;

use crate::error::DbError;

/// Connection handle to a `Dragonfly` (Redis-compatible) instance.
///
/// Wraps a [`fred::prelude::Client`] and stores one timestamp per
/// campaign. Cloning shares the underlying connection.
#[derive(Clone)]
pub struct DragonflyStore {
    client: Client,
}

impl std::fmt::Debug for DragonflyStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DragonflyStore").finish_non_exhaustive()
    }
}

impl DragonflyStore {
    /// Connect to `Dragonfly` at the given URL.
    ///
    /// The URL should follow the Redis URL scheme:
    /// `redis://host:port` or `redis://host:port/db`
    ///
    /// # Errors
    ///
    /// Returns [`DbError::Config`] if the URL cannot be parsed.
    /// Returns [`DbError::Dragonfly`] if the connection fails.
    pub async fn connect(url: &str) -> Result<Self, DbError> {
        let config = Config::from_url(url)
            .map_err(|e| DbError::Config(format!("Invalid Dragonfly URL: {e}")))?;

        let client = Builder::from_config(config).build()?;
        client.init().await?;

        tracing::info!("Connected to Dragonfly");
        Ok(Self { client })
    }

    /// Key holding the last saved timestamp of `campaign`.
    pub fn campaign_key(campaign: &CampaignId) -> String {
        format!("campaign:{campaign}:last_game_timestamp")
    }

    /// Read the last saved timestamp of `campaign`, if any.
    ///
    /// # Errors
    ///
    /// Returns [`DbError::Serialization`] if the stored value is not a
    /// timestamp.
    /// Returns [`DbError::Dragonfly`] if the read fails.
    pub async fn load_timestamp(
        &self,
        campaign: &CampaignId,
    ) -> Result<Option<FictionalTimestamp>, DbError> {
        self.get_json(&Self::campaign_key(campaign)).await
    }

    /// Overwrite the saved timestamp of `campaign`.
    ///
    /// # Errors
    ///
    /// Returns [`DbError::Dragonfly`] if the write fails.
    pub async fn save_timestamp(
        &self,
        campaign: &CampaignId,
        timestamp: FictionalTimestamp,
    ) -> Result<(), DbError> {
        self.set_json(&Self::campaign_key(campaign), &timestamp).await?;
        debug!(campaign = %campaign, timestamp = %timestamp, "Saved campaign timestamp");
        Ok(())
    }

    /// Forget the saved timestamp of `campaign`. The next restore starts
    /// from the configured start date.
    ///
    /// # Errors
    ///
    /// Returns [`DbError::Dragonfly`] if the delete fails.
    pub async fn clear_timestamp(&self, campaign: &CampaignId) -> Result<(), DbError> {
        let _: u32 = self.client.del(Self::campaign_key(campaign)).await?;
        Ok(())
    }

    async fn set_json<T: Serialize>(&self, key: &str, value: &T) -> Result<(), DbError> {
        let json = serde_json::to_string(value)?;
        let _: () = self.client.set(key, json.as_str(), None, None, false).await?;
        Ok(())
    }

    async fn get_json<T: DeserializeOwned>(&self, key: &str) -> Result<Option<T>, DbError> {
        let value: Option<String> = self.client.get(key).await?;
        value
            .map(|s| serde_json::from_str(&s).map_err(DbError::from))
            .transpose()
    }
}

impl TimestampStore for DragonflyStore {
    async fn load(&self, campaign: &CampaignId) -> Result<Option<FictionalTimestamp>, StoreError> {
        Ok(self.load_timestamp(campaign).await?)
    }

    async fn save(
        &self,
        campaign: &CampaignId,
        timestamp: FictionalTimestamp,
    ) -> Result<(), StoreError> {
        Ok(self.save_timestamp(campaign, timestamp).await?)
    }
}
