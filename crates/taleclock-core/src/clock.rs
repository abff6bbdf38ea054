//! The simulated clock engine.
//!
//! [`SimulatedClock`] is the single owner of a campaign's fictional
//! timestamp. It converts elapsed real time into elapsed fictional time,
//! tracks the run/pause state, decides when the timestamp must be handed
//! to the persistence sink, and applies manual skips.
//!
//! # Design Principles
//!
//! - The clock never reads the wall clock itself. Every operation that
//!   depends on real time receives the current monotonic [`Instant`], so
//!   the state machine is deterministic under test.
//! - Fictional time only moves forward: tick deltas saturate at zero and
//!   skip deltas are clamped to zero.
//! - All calendar arithmetic is checked. An overflow leaves the clock
//!   untouched and is reported as [`ClockError::TimestampOverflow`].
//!
//! # State Machine
//!
//! ```text
//! Stopped --toggle_run/resume--> Running --toggle_run/pause--> Stopped
//! Running --tick--> Running
//! Running/Stopped --skip_time--> (Stopped momentarily) --> Running
//! ```

use std::time::Duration;

use chrono::{DateTime, TimeDelta, Utc};
use taleclock_types::{CampaignId, ClockState, FictionalTimestamp, RunState};
use tokio::time::Instant;
use tracing::{debug, info, warn};

use crate::persist::PersistSink;

/// Errors that can occur during clock operations.
#[derive(Debug, thiserror::Error)]
pub enum ClockError {
    /// The fictional timestamp would leave the representable calendar.
    #[error("fictional timestamp overflow: cannot advance beyond the calendar range")]
    TimestampOverflow,

    /// Invalid clock settings (e.g. a negative time ratio).
    #[error("invalid clock configuration: {reason}")]
    InvalidConfig {
        /// Explanation of what is wrong with the configuration.
        reason: String,
    },
}

// ---------------------------------------------------------------------------
// Settings
// ---------------------------------------------------------------------------

/// Validated conversion and persistence constants for a clock.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ClockSettings {
    /// Fictional milliseconds advanced per real millisecond.
    fantasy_time_ratio: f64,

    /// Minimum fictional-time gap between automatic persistence calls.
    persistence_interval: TimeDelta,
}

impl ClockSettings {
    /// Default fictional-to-real time ratio (12 fictional seconds per real second).
    pub const DEFAULT_FANTASY_TIME_RATIO: f64 = 12.0;

    /// Default automatic persistence interval: 30 fictional minutes.
    pub const DEFAULT_PERSISTENCE_INTERVAL_MS: u64 = 1_800_000;

    /// Build settings from raw configuration values.
    ///
    /// # Errors
    ///
    /// Returns [`ClockError::InvalidConfig`] if the ratio is negative or
    /// not finite, or the persistence interval is zero or too large.
    pub fn new(fantasy_time_ratio: f64, persistence_interval_ms: u64) -> Result<Self, ClockError> {
        if !fantasy_time_ratio.is_finite() || fantasy_time_ratio < 0.0 {
            return Err(ClockError::InvalidConfig {
                reason: format!(
                    "fantasy_time_ratio must be a finite non-negative number, got {fantasy_time_ratio}"
                ),
            });
        }
        if persistence_interval_ms == 0 {
            return Err(ClockError::InvalidConfig {
                reason: "persistence_interval_ms must be at least 1".to_owned(),
            });
        }
        let persistence_interval = i64::try_from(persistence_interval_ms)
            .ok()
            .and_then(TimeDelta::try_milliseconds)
            .ok_or_else(|| ClockError::InvalidConfig {
                reason: format!("persistence_interval_ms {persistence_interval_ms} is out of range"),
            })?;

        Ok(Self {
            fantasy_time_ratio,
            persistence_interval,
        })
    }

    /// Fictional milliseconds advanced per real millisecond.
    pub const fn fantasy_time_ratio(&self) -> f64 {
        self.fantasy_time_ratio
    }

    /// Minimum fictional-time gap between automatic persistence calls.
    pub const fn persistence_interval(&self) -> TimeDelta {
        self.persistence_interval
    }

    /// Convert an elapsed real duration into elapsed fictional time.
    ///
    /// # Errors
    ///
    /// Returns [`ClockError::TimestampOverflow`] if the scaled duration
    /// does not fit in a [`TimeDelta`].
    pub fn fictional_elapsed(&self, real: Duration) -> Result<TimeDelta, ClockError> {
        let scaled = Duration::try_from_secs_f64(real.as_secs_f64() * self.fantasy_time_ratio)
            .map_err(|_err| ClockError::TimestampOverflow)?;
        TimeDelta::from_std(scaled).map_err(|_err| ClockError::TimestampOverflow)
    }
}

impl Default for ClockSettings {
    fn default() -> Self {
        Self {
            fantasy_time_ratio: Self::DEFAULT_FANTASY_TIME_RATIO,
            persistence_interval: TimeDelta::minutes(30),
        }
    }
}

// ---------------------------------------------------------------------------
// Tick outcome
// ---------------------------------------------------------------------------

/// Result of a single [`SimulatedClock::tick`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickOutcome {
    /// The clock is stopped. Nothing changed and the tick must not be
    /// rescheduled.
    Halted,
    /// Fictional time advanced.
    Advanced {
        /// Fictional time added by this tick.
        elapsed: TimeDelta,
        /// Whether the tick crossed the persistence interval and handed
        /// the timestamp to the sink.
        persisted: bool,
    },
}

// ---------------------------------------------------------------------------
// Simulated clock
// ---------------------------------------------------------------------------

/// The fictional timeline of one campaign.
pub struct SimulatedClock {
    /// Which campaign this timeline belongs to.
    campaign_id: CampaignId,

    /// Conversion and persistence constants.
    settings: ClockSettings,

    /// Current fictional timestamp.
    timestamp: FictionalTimestamp,

    /// Whether ticks advance the timestamp.
    run_state: RunState,

    /// Real instant of the last tick or of the transition into running.
    /// `None` while stopped.
    reference: Option<Instant>,

    /// Fictional timestamp last handed to the sink.
    checkpoint: FictionalTimestamp,

    /// Fire-and-forget persistence capability.
    sink: Box<dyn PersistSink>,
}

impl SimulatedClock {
    /// Create a clock for a campaign with no prior saved state.
    ///
    /// The timeline starts at `start_date`, stopped.
    pub fn new(
        campaign_id: CampaignId,
        settings: ClockSettings,
        start_date: DateTime<Utc>,
        sink: impl PersistSink + 'static,
    ) -> Self {
        Self::restore(campaign_id, settings, start_date, None, sink)
    }

    /// Create a clock from the outcome of a store lookup.
    ///
    /// A stored timestamp takes precedence over `start_date`. The clock
    /// starts stopped, with its persistence checkpoint at the initial
    /// timestamp.
    pub fn restore(
        campaign_id: CampaignId,
        settings: ClockSettings,
        start_date: DateTime<Utc>,
        stored: Option<FictionalTimestamp>,
        sink: impl PersistSink + 'static,
    ) -> Self {
        let restored = stored.is_some();
        let timestamp = stored.unwrap_or_else(|| FictionalTimestamp::from_datetime(start_date));

        info!(
            campaign = %campaign_id,
            timestamp = %timestamp,
            restored,
            "Campaign clock initialized"
        );

        Self {
            campaign_id,
            settings,
            timestamp,
            run_state: RunState::Stopped,
            reference: None,
            checkpoint: timestamp,
            sink: Box::new(sink),
        }
    }

    /// Flip between running and stopped. Returns the new state.
    ///
    /// Entering [`RunState::Running`] records `now` as the reference
    /// point, so the paused interval contributes no fictional time.
    /// Entering [`RunState::Stopped`] first counts the real time since
    /// the last tick, then hands the timestamp to the sink immediately.
    pub fn toggle_run(&mut self, now: Instant) -> RunState {
        match self.run_state {
            RunState::Stopped => self.start(now),
            RunState::Running => self.stop(now),
        }
        self.run_state
    }

    /// Stop the clock if it is running. Returns whether anything changed.
    ///
    /// Behaves like [`toggle_run`](Self::toggle_run) on a running clock and
    /// does nothing (in particular, does not persist) on a stopped one.
    pub fn pause(&mut self, now: Instant) -> bool {
        if self.run_state.is_running() {
            self.stop(now);
            true
        } else {
            false
        }
    }

    /// Start the clock if it is stopped. Returns whether anything changed.
    pub fn resume(&mut self, now: Instant) -> bool {
        if self.run_state.is_running() {
            false
        } else {
            self.start(now);
            true
        }
    }

    /// Advance fictional time by the real time elapsed since the last
    /// tick, scaled by the fantasy time ratio.
    ///
    /// A stopped clock is left untouched and reports
    /// [`TickOutcome::Halted`]. A running clock persists when the
    /// timestamp has moved at least one persistence interval past the
    /// checkpoint.
    ///
    /// # Errors
    ///
    /// Returns [`ClockError::TimestampOverflow`] if the new timestamp
    /// would leave the calendar. The clock is not modified in that case.
    pub fn tick(&mut self, now: Instant) -> Result<TickOutcome, ClockError> {
        if !self.run_state.is_running() || self.reference.is_none() {
            return Ok(TickOutcome::Halted);
        }

        let elapsed = self.advance_to(now)?;
        let timestamp = self.timestamp;

        let persisted = timestamp.since(self.checkpoint) >= self.settings.persistence_interval();
        if persisted {
            debug!(
                campaign = %self.campaign_id,
                timestamp = %timestamp,
                "Persistence interval reached"
            );
            self.persist();
        }

        Ok(TickOutcome::Advanced { elapsed, persisted })
    }

    /// Jump fictional time forward by `delta_minutes` and resume.
    ///
    /// Negative deltas are treated as zero. The clock is stopped for the
    /// duration of the update without the pause-persist side effect; the
    /// new timestamp is persisted exactly once, then the clock runs again
    /// with `now` as its reference point. Returns the new timestamp.
    ///
    /// # Errors
    ///
    /// Returns [`ClockError::TimestampOverflow`] if the skip would leave
    /// the calendar. The clock is not modified in that case.
    pub fn skip_time(
        &mut self,
        delta_minutes: i64,
        now: Instant,
    ) -> Result<FictionalTimestamp, ClockError> {
        let delta_minutes = delta_minutes.max(0);
        let timestamp = TimeDelta::try_minutes(delta_minutes)
            .and_then(|delta| self.timestamp.advanced_by(delta))
            .ok_or(ClockError::TimestampOverflow)?;

        self.run_state = RunState::Stopped;
        self.reference = None;
        self.timestamp = timestamp;
        self.persist();
        self.run_state = RunState::Running;
        self.reference = Some(now);

        info!(
            campaign = %self.campaign_id,
            delta_minutes,
            timestamp = %timestamp,
            "Time skipped"
        );

        Ok(timestamp)
    }

    /// Current fictional timestamp and run state. No side effects.
    pub const fn current_state(&self) -> ClockState {
        ClockState {
            timestamp: self.timestamp,
            run_state: self.run_state,
        }
    }

    /// Fictional timestamp last handed to the sink.
    pub const fn checkpoint(&self) -> FictionalTimestamp {
        self.checkpoint
    }

    /// The campaign this timeline belongs to.
    pub const fn campaign_id(&self) -> &CampaignId {
        &self.campaign_id
    }

    /// The clock's conversion and persistence constants.
    pub const fn settings(&self) -> &ClockSettings {
        &self.settings
    }

    fn start(&mut self, now: Instant) {
        self.run_state = RunState::Running;
        self.reference = Some(now);
        info!(campaign = %self.campaign_id, timestamp = %self.timestamp, "Clock running");
    }

    fn stop(&mut self, now: Instant) {
        if let Err(e) = self.advance_to(now) {
            warn!(
                campaign = %self.campaign_id,
                error = %e,
                "cannot count time since last tick, stopping at last timestamp"
            );
        }
        self.run_state = RunState::Stopped;
        self.reference = None;
        self.persist();
        info!(campaign = %self.campaign_id, timestamp = %self.timestamp, "Clock stopped");
    }

    /// Add the fictional time elapsed between the reference point and
    /// `now`. Leaves the clock untouched on overflow.
    fn advance_to(&mut self, now: Instant) -> Result<TimeDelta, ClockError> {
        let Some(reference) = self.reference else {
            return Ok(TimeDelta::zero());
        };

        let elapsed_real = now.saturating_duration_since(reference);
        let elapsed = self.settings.fictional_elapsed(elapsed_real)?;
        self.timestamp = self
            .timestamp
            .advanced_by(elapsed)
            .ok_or(ClockError::TimestampOverflow)?;
        self.reference = Some(now.max(reference));
        Ok(elapsed)
    }

    fn persist(&mut self) {
        self.sink.persist_now(self.timestamp);
        self.checkpoint = self.timestamp;
    }
}

impl core::fmt::Debug for SimulatedClock {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("SimulatedClock")
            .field("campaign_id", &self.campaign_id)
            .field("settings", &self.settings)
            .field("timestamp", &self.timestamp)
            .field("run_state", &self.run_state)
            .field("checkpoint", &self.checkpoint)
            .finish_non_exhaustive()
    }
}
