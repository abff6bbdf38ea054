//! Shared application state for the control API.

use std::sync::Arc;

use taleclock_core::driver::ClockDriver;

/// State shared by every handler.
#[derive(Debug, Clone)]
pub struct AppState {
    /// The campaign clock. Also owned by the engine for shutdown.
    pub driver: Arc<ClockDriver>,
}

impl AppState {
    /// Wrap a shared driver.
    pub const fn new(driver: Arc<ClockDriver>) -> Self {
        Self { driver }
    }
}
