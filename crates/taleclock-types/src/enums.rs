//! Enumeration types for the campaign clock.

use serde::{Deserialize, Serialize};
use ts_rs::TS;

// ---------------------------------------------------------------------------
// Run state
// ---------------------------------------------------------------------------

/// Whether the clock's tick loop is scheduled.
///
/// A new clock always starts [`RunState::Stopped`].
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS,
)]
#[serde(rename_all = "snake_case")]
#[ts(export, export_to = "bindings/")]
pub enum RunState {
    /// Fictional time is frozen; no tick is scheduled.
    #[default]
    Stopped,
    /// Fictional time advances on every tick.
    Running,
}

impl RunState {
    /// Return the opposite state.
    pub const fn toggled(self) -> Self {
        match self {
            Self::Stopped => Self::Running,
            Self::Running => Self::Stopped,
        }
    }

    /// Whether this is [`RunState::Running`].
    pub const fn is_running(self) -> bool {
        matches!(self, Self::Running)
    }
}

// ---------------------------------------------------------------------------
// Time of day
// ---------------------------------------------------------------------------

/// Coarse time-of-day label derived from the fictional hour.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS)]
#[serde(rename_all = "snake_case")]
#[ts(export, export_to = "bindings/")]
pub enum TimeOfDay {
    /// Hours 0 through 11.
    Morning,
    /// Hours 12 through 17.
    Afternoon,
    /// Hours 18 through 23.
    Night,
}

impl TimeOfDay {
    /// Derive the label from a 24-hour clock hour.
    ///
    /// Hours past 23 are treated as night.
    pub const fn from_hour(hour: u32) -> Self {
        match hour {
            0..=11 => Self::Morning,
            12..=17 => Self::Afternoon,
            _ => Self::Night,
        }
    }

    /// Stable English label. Localization happens in the display layer.
    pub const fn label(self) -> &'static str {
        match self {
            Self::Morning => "Morning",
            Self::Afternoon => "Afternoon",
            Self::Night => "Night",
        }
    }
}

// ---------------------------------------------------------------------------
// Meridiem
// ---------------------------------------------------------------------------

/// AM/PM marker for the 12-hour clock rendering.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, TS)]
#[serde(rename_all = "snake_case")]
#[ts(export, export_to = "bindings/")]
pub enum Meridiem {
    /// Before noon.
    Am,
    /// Noon and after.
    Pm,
}

impl core::fmt::Display for Meridiem {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::Am => f.write_str("AM"),
            Self::Pm => f.write_str("PM"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn run_state_toggles() {
        assert_eq!(RunState::default(), RunState::Stopped);
        assert_eq!(RunState::Stopped.toggled(), RunState::Running);
        assert_eq!(RunState::Running.toggled(), RunState::Stopped);
        assert!(RunState::Running.is_running());
        assert!(!RunState::Stopped.is_running());
    }

    #[test]
    fn time_of_day_boundaries() {
        assert_eq!(TimeOfDay::from_hour(0), TimeOfDay::Morning);
        assert_eq!(TimeOfDay::from_hour(11), TimeOfDay::Morning);
        assert_eq!(TimeOfDay::from_hour(12), TimeOfDay::Afternoon);
        assert_eq!(TimeOfDay::from_hour(17), TimeOfDay::Afternoon);
        assert_eq!(TimeOfDay::from_hour(18), TimeOfDay::Night);
        assert_eq!(TimeOfDay::from_hour(23), TimeOfDay::Night);
    }

    #[test]
    fn meridiem_renders_upper_case() {
        assert_eq!(Meridiem::Am.to_string(), "AM");
        assert_eq!(Meridiem::Pm.to_string(), "PM");
    }
}
