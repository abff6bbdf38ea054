//! Data layer for the Taleclock campaign clock (`Dragonfly`).
//!
//! `Dragonfly` (or any Redis-compatible server) holds the last saved
//! fictional timestamp of every campaign. The clock engine never talks to
//! it directly: [`DragonflyStore`] implements the core
//! [`TimestampStore`](taleclock_core::persist::TimestampStore) capability
//! and the persist writer task calls it.
//!
//! # Modules
//!
//! - [`dragonfly`] -- `Dragonfly` connection and campaign timestamp keys
//! - [`error`] -- Shared error types

pub mod dragonfly;
pub mod error;

// Re-export primary types for convenience.
pub use dragonfly::DragonflyStore;
pub use error::DbError;
