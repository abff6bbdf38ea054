//! Core value structs: the fictional timestamp, the clock state snapshot,
//! and the clock face derived for display.

use chrono::{DateTime, Datelike, TimeDelta, Timelike, Utc};
use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::enums::{Meridiem, RunState, TimeOfDay};

// ---------------------------------------------------------------------------
// Fictional timestamp
// ---------------------------------------------------------------------------

/// A point on the campaign's fictional calendar.
///
/// Stored as an absolute UTC instant with nanosecond precision and
/// serialized as an RFC 3339 string. All arithmetic is checked: advancing
/// past the representable calendar returns `None` rather than wrapping.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS)]
#[serde(transparent)]
#[ts(export, export_to = "bindings/")]
pub struct FictionalTimestamp(DateTime<Utc>);

impl FictionalTimestamp {
    /// Wrap an instant as a fictional timestamp.
    pub const fn from_datetime(instant: DateTime<Utc>) -> Self {
        Self(instant)
    }

    /// Return the underlying instant.
    pub const fn as_datetime(self) -> DateTime<Utc> {
        self.0
    }

    /// Milliseconds since the Unix epoch.
    pub fn timestamp_millis(self) -> i64 {
        self.0.timestamp_millis()
    }

    /// Move the timestamp by `delta`, or `None` if the result would fall
    /// outside the representable calendar.
    pub fn advanced_by(self, delta: TimeDelta) -> Option<Self> {
        self.0.checked_add_signed(delta).map(Self)
    }

    /// Signed distance from `earlier` to `self`.
    pub fn since(self, earlier: Self) -> TimeDelta {
        self.0.signed_duration_since(earlier.0)
    }

    /// Derive the display fields for this timestamp.
    pub fn face(self) -> ClockFace {
        ClockFace::from_timestamp(self)
    }
}

impl From<DateTime<Utc>> for FictionalTimestamp {
    fn from(instant: DateTime<Utc>) -> Self {
        Self(instant)
    }
}

impl core::fmt::Display for FictionalTimestamp {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "{}", self.0.to_rfc3339())
    }
}

// ---------------------------------------------------------------------------
// Clock state
// ---------------------------------------------------------------------------

/// The read-only view of a clock: where fictional time stands and whether
/// it is moving.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct ClockState {
    /// Current fictional timestamp.
    pub timestamp: FictionalTimestamp,
    /// Whether the tick loop is scheduled.
    pub run_state: RunState,
}

impl ClockState {
    /// Whether fictional time is currently advancing.
    pub const fn is_running(&self) -> bool {
        self.run_state.is_running()
    }
}

// ---------------------------------------------------------------------------
// Clock face
// ---------------------------------------------------------------------------

/// Presentation fields derived from a [`FictionalTimestamp`].
///
/// The date renders as `day/month/year` and the time on a 12-hour clock
/// with an AM/PM marker. None of this is clock state; it is recomputed
/// from the timestamp whenever the dashboard asks.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct ClockFace {
    /// Day of the month (1-based).
    pub day: u32,
    /// Month number (1-based).
    pub month: u32,
    /// Calendar year.
    pub year: i32,
    /// Hour on the 12-hour clock (1 through 12).
    pub hour12: u32,
    /// Minute of the hour.
    pub minute: u32,
    /// AM/PM marker.
    pub meridiem: Meridiem,
    /// Coarse time-of-day label from the 24-hour hour.
    pub time_of_day: TimeOfDay,
    /// Rendered date, `day/month/year`.
    pub date_label: String,
    /// Rendered time, `hh:mm AM`.
    pub time_label: String,
}

impl ClockFace {
    /// Derive the face for a timestamp.
    pub fn from_timestamp(timestamp: FictionalTimestamp) -> Self {
        let instant = timestamp.as_datetime();
        let (is_pm, hour12) = instant.hour12();
        let meridiem = if is_pm { Meridiem::Pm } else { Meridiem::Am };
        let (day, month, year, minute) =
            (instant.day(), instant.month(), instant.year(), instant.minute());

        Self {
            day,
            month,
            year,
            hour12,
            minute,
            meridiem,
            time_of_day: TimeOfDay::from_hour(instant.hour()),
            date_label: format!("{day}/{month}/{year}"),
            time_label: format!("{hour12:02}:{minute:02} {meridiem}"),
        }
    }
}
