//! Control API server for the Taleclock campaign clock.
//!
//! Serves the clock's current state (with its display derivations) and
//! accepts the user operations: toggle, pause/resume around the skip
//! dialog, and skip time. Every request goes through the shared
//! [`ClockDriver`](taleclock_core::driver::ClockDriver), so HTTP requests
//! and scheduled ticks are serialized by the same lock.
//!
//! # Modules
//!
//! - [`error`] -- Error types and HTTP response conversion
//! - [`handlers`] -- REST endpoint handlers
//! - [`router`] -- Axum router construction
//! - [`server`] -- Server lifecycle (bind, serve, graceful shutdown)
//! - [`state`] -- Shared application state

pub mod error;
pub mod handlers;
pub mod router;
pub mod server;
pub mod state;
