//! Repeating tick task for a [`SimulatedClock`].
//!
//! [`ClockDriver`] owns the clock behind a mutex together with the handle
//! of the scheduled tick task. User operations lock the clock, apply the
//! transition, and then arm or cancel the task before releasing the lock.
//!
//! # Cancellation
//!
//! Two mechanisms guard against a tick running after a pause:
//!
//! - The task handle is aborted while the clock lock is held, so a tick
//!   waiting for the lock never acquires it.
//! - A tick that does acquire the lock after a pause observes
//!   [`RunState::Stopped`], mutates nothing, and ends the loop.
//!
//! Only one tick task exists at a time and its iterations run
//! sequentially, so ticks never overlap. The task holds only a weak
//! reference to the clock: dropping the driver drops the clock (and its
//! persist sink) and the task ends on its next tick.

use std::sync::{Arc, Weak};
use std::time::Duration;

use taleclock_types::{ClockState, RunState};
use tokio::sync::Mutex;
use tokio::task::JoinHandle;
use tokio::time::{Instant, MissedTickBehavior};
use tracing::{error, info};

use crate::clock::{ClockError, SimulatedClock, TickOutcome};
use crate::skip::SkipRequest;

/// Clock plus the handle of its scheduled tick task.
#[derive(Debug)]
struct DriverInner {
    clock: SimulatedClock,
    ticker: Option<JoinHandle<()>>,
}

/// Owns a [`SimulatedClock`] and schedules its ticks while it runs.
#[derive(Debug)]
pub struct ClockDriver {
    inner: Arc<Mutex<DriverInner>>,
    refresh_interval: Duration,
}

impl ClockDriver {
    /// Wrap a freshly built (stopped) clock. Ticking starts on the first
    /// transition into [`RunState::Running`].
    pub fn new(clock: SimulatedClock, refresh_interval: Duration) -> Self {
        Self {
            inner: Arc::new(Mutex::new(DriverInner {
                clock,
                ticker: None,
            })),
            refresh_interval,
        }
    }

    /// Real time between ticks while running.
    pub const fn refresh_interval(&self) -> Duration {
        self.refresh_interval
    }

    /// Flip between running and stopped. Returns the new state.
    pub async fn toggle_run(&self) -> ClockState {
        let mut inner = self.inner.lock().await;
        let run_state = inner.clock.toggle_run(Instant::now());
        self.sync_ticker(&mut inner, run_state);
        inner.clock.current_state()
    }

    /// Stop the clock if it is running (e.g. the skip dialog opened).
    pub async fn pause(&self) -> ClockState {
        let mut inner = self.inner.lock().await;
        if inner.clock.pause(Instant::now()) {
            self.sync_ticker(&mut inner, RunState::Stopped);
        }
        inner.clock.current_state()
    }

    /// Start the clock if it is stopped (e.g. the skip dialog was cancelled).
    pub async fn resume(&self) -> ClockState {
        let mut inner = self.inner.lock().await;
        if inner.clock.resume(Instant::now()) {
            self.sync_ticker(&mut inner, RunState::Running);
        }
        inner.clock.current_state()
    }

    /// Sanitize `request`, skip that many minutes, and leave the clock
    /// running.
    ///
    /// # Errors
    ///
    /// Returns [`ClockError::TimestampOverflow`] if the skip would leave
    /// the calendar. The clock and its tick task are left as they were.
    pub async fn skip_time(&self, request: SkipRequest) -> Result<ClockState, ClockError> {
        let mut inner = self.inner.lock().await;
        if let Some(ticker) = inner.ticker.take() {
            ticker.abort();
        }
        let skipped = inner
            .clock
            .skip_time(request.total_minutes(), Instant::now());
        let run_state = inner.clock.current_state().run_state;
        self.sync_ticker(&mut inner, run_state);
        skipped.map(|_| inner.clock.current_state())
    }

    /// Current fictional timestamp and run state.
    pub async fn current_state(&self) -> ClockState {
        self.inner.lock().await.clock.current_state()
    }

    /// Pause (persisting the latest timestamp, including the time since
    /// the last tick) and cancel ticking.
    pub async fn shutdown(&self) -> ClockState {
        let state = self.pause().await;
        info!(timestamp = %state.timestamp, "Clock driver shut down");
        state
    }

    /// Arm or cancel the tick task to match `run_state`.
    fn sync_ticker(&self, inner: &mut DriverInner, run_state: RunState) {
        match run_state {
            RunState::Running => {
                if inner.ticker.as_ref().is_none_or(JoinHandle::is_finished) {
                    inner.ticker = Some(spawn_ticker(
                        Arc::downgrade(&self.inner),
                        self.refresh_interval,
                    ));
                }
            }
            RunState::Stopped => {
                if let Some(ticker) = inner.ticker.take() {
                    ticker.abort();
                }
            }
        }
    }
}

/// Spawn the repeating tick loop.
fn spawn_ticker(inner: Weak<Mutex<DriverInner>>, refresh_interval: Duration) -> JoinHandle<()> {
    tokio::spawn(async move {
        let mut interval = tokio::time::interval(refresh_interval);
        interval.set_missed_tick_behavior(MissedTickBehavior::Delay);

        loop {
            interval.tick().await;
            let Some(shared) = inner.upgrade() else {
                break;
            };
            let mut guard = shared.lock().await;
            match guard.clock.tick(Instant::now()) {
                Ok(TickOutcome::Advanced { .. }) => {}
                Ok(TickOutcome::Halted) => break,
                Err(e) => {
                    error!(error = %e, "tick failed, stopping clock");
                    guard.clock.pause(Instant::now());
                    guard.ticker = None;
                    break;
                }
            }
        }
    })
}
