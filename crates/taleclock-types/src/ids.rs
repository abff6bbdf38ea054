//! Campaign identity.
//!
//! A campaign is the unit of persistence: every campaign owns exactly one
//! timeline, and its last saved fictional timestamp is stored under its
//! identity. The key is opaque to the clock -- the hosting application
//! decides what it looks like (a database id, a slug, a UUID string).

use serde::{Deserialize, Serialize};
use ts_rs::TS;

/// Opaque key scoping which stored timestamp a clock restores and saves.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS)]
#[serde(transparent)]
#[ts(export, export_to = "bindings/")]
pub struct CampaignId(String);

impl CampaignId {
    /// Create a campaign identity from any string-like key.
    pub fn new(key: impl Into<String>) -> Self {
        Self(key.into())
    }

    /// Return the key as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Default for CampaignId {
    fn default() -> Self {
        Self(String::from("default"))
    }
}

impl core::fmt::Display for CampaignId {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for CampaignId {
    fn from(key: &str) -> Self {
        Self(key.to_owned())
    }
}

impl From<String> for CampaignId {
    fn from(key: String) -> Self {
        Self(key)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn serializes_as_plain_string() {
        let id = CampaignId::new("ravenloft-42");
        let json = serde_json::to_string(&id).unwrap();
        assert_eq!(json, "\"ravenloft-42\"");
        let back: CampaignId = serde_json::from_str(&json).unwrap();
        assert_eq!(back, id);
    }

    #[test]
    fn display_is_the_raw_key() {
        assert_eq!(CampaignId::from("7").to_string(), "7");
    }
}
