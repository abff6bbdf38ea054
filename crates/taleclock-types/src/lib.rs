//! Shared type definitions for the Taleclock campaign clock.
//!
//! This crate is the single source of truth for the values that cross
//! crate boundaries: the fictional timestamp, the run state, the campaign
//! identity, and the display derivations the dashboard renders. Types
//! flow downstream to `TypeScript` via `ts-rs`.
//!
//! # Modules
//!
//! - [`ids`] -- Campaign identity key
//! - [`enums`] -- Run state, time-of-day label, AM/PM marker
//! - [`structs`] -- Fictional timestamp, clock state, clock face

pub mod enums;
pub mod ids;
pub mod structs;

// Re-export all public types at crate root for convenience.
pub use enums::{Meridiem, RunState, TimeOfDay};
pub use ids::CampaignId;
pub use structs::{ClockFace, ClockState, FictionalTimestamp};
