//! Error types for the engine binary.
//!
//! [`EngineError`] is the top-level error type that wraps all possible
//! failure modes during engine startup and shutdown.

/// Top-level error for the engine binary.
///
/// Each variant wraps a specific subsystem error, providing a single
/// error type that `main` can propagate with `?`.
#[derive(Debug, thiserror::Error)]
pub enum EngineError {
    /// Configuration loading failed.
    #[error("config error: {source}")]
    Config {
        /// The underlying config error.
        #[from]
        source: taleclock_core::config::ConfigError,
    },

    /// Clock settings were rejected.
    #[error("clock error: {source}")]
    Clock {
        /// The underlying clock error.
        #[from]
        source: taleclock_core::clock::ClockError,
    },

    /// Connecting to the timestamp store failed.
    #[error("store error: {source}")]
    Db {
        /// The underlying data layer error.
        #[from]
        source: taleclock_db::DbError,
    },

    /// Control API server failed to start or crashed.
    #[error("observer error: {source}")]
    Observer {
        /// The underlying server error.
        #[from]
        source: taleclock_observer::server::ServerError,
    },

    /// The persist writer task did not finish cleanly.
    #[error("persist writer error: {message}")]
    Writer {
        /// Description of the writer failure.
        message: String,
    },
}
