//! Simulated campaign clock engine for Taleclock.
//!
//! This crate owns the fictional timeline: the conversion from elapsed
//! real time to elapsed fictional time, the run/pause state machine, the
//! persistence cadence, and manual time skips.
//!
//! # Modules
//!
//! - [`clock`] -- [`SimulatedClock`], the pure state machine driven by
//!   explicit real-time instants.
//! - [`driver`] -- [`ClockDriver`], which owns the clock and the repeating
//!   tick task and cancels it on pause.
//! - [`persist`] -- [`PersistSink`] and [`TimestampStore`] capabilities,
//!   the in-memory store, and the background persist writer.
//! - [`skip`] -- [`SkipRequest`] sanitizing for the skip-time form.
//! - [`config`] -- Configuration loading from `taleclock-config.yaml`.
//!
//! [`SimulatedClock`]: clock::SimulatedClock
//! [`ClockDriver`]: driver::ClockDriver
//! [`PersistSink`]: persist::PersistSink
//! [`TimestampStore`]: persist::TimestampStore
//! [`SkipRequest`]: skip::SkipRequest

pub mod clock;
pub mod config;
pub mod driver;
pub mod persist;
pub mod skip;
