//! Integration tests for the `taleclock-db` data layer.
//!
//! These tests require a live Dragonfly instance. Run with:
//!
//! ```bash
//! docker compose up -d
//! cargo test -p taleclock-db -- --ignored
//! docker compose down
//! ```
//!
//! All tests are marked `#[ignore]` so they are skipped during normal
//! `cargo test` runs.

#![allow(
    clippy::expect_used,
    clippy::unwrap_used,
    clippy::items_after_statements,
    clippy::missing_panics_doc
)]

use chrono::{TimeZone, Utc};
use taleclock_core::persist::{TimestampStore, restore_from_store};
use taleclock_db::{DbError, DragonflyStore};
use taleclock_types::{CampaignId, FictionalTimestamp};

/// Dragonfly connection URL for the local Docker instance.
const DRAGONFLY_URL: &str = "redis://localhost:6379";

async fn setup_dragonfly() -> DragonflyStore {
    DragonflyStore::connect(DRAGONFLY_URL)
        .await
        .expect("Failed to connect to Dragonfly -- is Docker running?")
}

fn ts(h: u32, m: u32) -> FictionalTimestamp {
    FictionalTimestamp::from_datetime(Utc.with_ymd_and_hms(1492, 10, 12, h, m, 0).unwrap())
}

#[tokio::test]
#[ignore = "requires live Dragonfly instance (docker compose up -d)"]
async fn save_then_load_roundtrip() {
    let store = setup_dragonfly().await;
    let campaign = CampaignId::from("integration-roundtrip");

    store.save_timestamp(&campaign, ts(18, 45)).await.unwrap();
    let loaded = store.load_timestamp(&campaign).await.unwrap();
    assert_eq!(loaded, Some(ts(18, 45)));

    store.clear_timestamp(&campaign).await.unwrap();
}

#[tokio::test]
#[ignore = "requires live Dragonfly instance (docker compose up -d)"]
async fn later_save_overwrites() {
    let store = setup_dragonfly().await;
    let campaign = CampaignId::from("integration-overwrite");

    store.save(&campaign, ts(8, 0)).await.unwrap();
    store.save(&campaign, ts(9, 30)).await.unwrap();
    assert_eq!(store.load(&campaign).await.unwrap(), Some(ts(9, 30)));

    store.clear_timestamp(&campaign).await.unwrap();
}

#[tokio::test]
#[ignore = "requires live Dragonfly instance (docker compose up -d)"]
async fn missing_campaign_restores_nothing() {
    let store = setup_dragonfly().await;
    let campaign = CampaignId::from("integration-missing");
    store.clear_timestamp(&campaign).await.unwrap();

    assert_eq!(restore_from_store(&store, &campaign).await, None);
}

#[tokio::test]
#[ignore = "requires live Dragonfly instance (docker compose up -d)"]
async fn garbage_value_is_serialization_error() {
    let store = setup_dragonfly().await;
    let campaign = CampaignId::from("integration-garbage");

    // Write a non-timestamp through a raw client on the same key.
    use fred::prelude::*;
    let config = Config::from_url(DRAGONFLY_URL).unwrap();
    let client = Builder::from_config(config).build().unwrap();
    client.init().await.unwrap();
    let key = DragonflyStore::campaign_key(&campaign);
    let _: () = client
        .set(key.as_str(), "not json", None, None, false)
        .await
        .unwrap();

    let result = store.load_timestamp(&campaign).await;
    assert!(matches!(result, Err(DbError::Serialization(_))));
    assert_eq!(restore_from_store(&store, &campaign).await, None);

    store.clear_timestamp(&campaign).await.unwrap();
}

#[tokio::test]
#[ignore = "requires live Dragonfly instance (docker compose up -d)"]
async fn invalid_url_is_config_error() {
    let result = DragonflyStore::connect("not a url").await;
    assert!(matches!(result, Err(DbError::Config(_))));
}
