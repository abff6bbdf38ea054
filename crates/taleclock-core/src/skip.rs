//! Skip-time request sanitizing.
//!
//! The skip-time form collects hours and minutes as free text. Whatever
//! the user typed, the clock only ever receives a non-negative number of
//! minutes: unparsable fields become zero, negative fields become zero,
//! and minutes are capped at 59.
//!
//! Deserialization is equally lenient. Each field accepts an integer, a
//! float (truncated), or a string (parsed like a form field); `null` and
//! any other value count as zero.

use serde::de::IgnoredAny;
use serde::{Deserialize, Deserializer};

/// Largest minutes value the form accepts.
const MAX_MINUTES: i64 = 59;

/// Hours and minutes to skip, as entered in the skip-time form.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
pub struct SkipRequest {
    /// Whole hours to skip.
    #[serde(default, deserialize_with = "lenient_int")]
    pub hours: i64,
    /// Additional minutes to skip.
    #[serde(default, deserialize_with = "lenient_int")]
    pub minutes: i64,
}

impl SkipRequest {
    /// Create a request from numeric fields.
    pub const fn new(hours: i64, minutes: i64) -> Self {
        Self { hours, minutes }
    }

    /// Parse the raw form fields. Each field yields its leading integer,
    /// or zero if it has none.
    pub fn from_form(hours: &str, minutes: &str) -> Self {
        Self {
            hours: parse_leading_int(hours),
            minutes: parse_leading_int(minutes),
        }
    }

    /// Clamp negative fields to zero and minutes to at most 59.
    pub fn sanitized(self) -> Self {
        Self {
            hours: self.hours.max(0),
            minutes: self.minutes.clamp(0, MAX_MINUTES),
        }
    }

    /// Total minutes to skip after sanitizing.
    pub fn total_minutes(self) -> i64 {
        let clean = self.sanitized();
        clean.hours.saturating_mul(60).saturating_add(clean.minutes)
    }
}

/// Any field value a client might send for a number.
#[derive(Deserialize)]
#[serde(untagged)]
enum LooseInt {
    Signed(i64),
    Unsigned(u64),
    Float(f64),
    Text(String),
    Other(IgnoredAny),
}

/// Deserialize a skip field without ever rejecting its value.
#[allow(clippy::cast_possible_truncation)]
fn lenient_int<'de, D>(deserializer: D) -> Result<i64, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match LooseInt::deserialize(deserializer)? {
        LooseInt::Signed(value) => value,
        LooseInt::Unsigned(value) => i64::try_from(value).unwrap_or(i64::MAX),
        // Saturating cast: truncates toward zero, NaN becomes 0.
        LooseInt::Float(value) => value as i64,
        LooseInt::Text(raw) => parse_leading_int(&raw),
        LooseInt::Other(_) => 0,
    })
}

/// Leading integer of `raw`: optional whitespace, optional sign, digits.
/// Anything else, or an out-of-range value, yields zero.
fn parse_leading_int(raw: &str) -> i64 {
    let trimmed = raw.trim_start();
    let sign_len = usize::from(trimmed.starts_with(['+', '-']));
    let digits_len = trimmed
        .get(sign_len..)
        .map_or(0, |rest| rest.chars().take_while(char::is_ascii_digit).count());

    sign_len
        .checked_add(digits_len)
        .and_then(|end| trimmed.get(..end))
        .filter(|_| digits_len > 0)
        .and_then(|number| number.parse::<i64>().ok())
        .unwrap_or(0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sums_hours_and_minutes() {
        assert_eq!(SkipRequest::new(1, 30).total_minutes(), 90);
        assert_eq!(SkipRequest::new(0, 0).total_minutes(), 0);
        assert_eq!(SkipRequest::new(24, 0).total_minutes(), 1440);
    }

    #[test]
    fn negatives_clamp_to_zero() {
        assert_eq!(SkipRequest::new(-3, 20).total_minutes(), 20);
        assert_eq!(SkipRequest::new(2, -5).total_minutes(), 120);
        assert_eq!(SkipRequest::new(-1, -1).total_minutes(), 0);
    }

    #[test]
    fn minutes_cap_at_fifty_nine() {
        assert_eq!(SkipRequest::new(0, 75).sanitized(), SkipRequest::new(0, 59));
    }

    #[test]
    fn huge_hours_saturate() {
        assert_eq!(SkipRequest::new(i64::MAX, 59).total_minutes(), i64::MAX);
    }

    #[test]
    fn form_fields_parse_like_a_number_input() {
        assert_eq!(SkipRequest::from_form("2", "15"), SkipRequest::new(2, 15));
        assert_eq!(SkipRequest::from_form("  3h", "07min"), SkipRequest::new(3, 7));
        assert_eq!(SkipRequest::from_form("", "abc"), SkipRequest::new(0, 0));
        assert_eq!(SkipRequest::from_form("-4", "+5"), SkipRequest::new(-4, 5));
        assert_eq!(SkipRequest::from_form("-", "+"), SkipRequest::new(0, 0));
        assert_eq!(SkipRequest::from_form("1.9", "99999999999999999999"), SkipRequest::new(1, 0));
    }

    fn from_yaml(body: &str) -> SkipRequest {
        serde_yml::from_str(body).unwrap_or_else(|_| SkipRequest::new(-1, -1))
    }

    #[test]
    fn deserializes_loose_field_values() {
        assert_eq!(from_yaml("{hours: abc, minutes: 30}"), SkipRequest::new(0, 30));
        assert_eq!(from_yaml("{hours: '1', minutes: '30'}"), SkipRequest::new(1, 30));
        assert_eq!(from_yaml("{hours: ~, minutes: 30}"), SkipRequest::new(0, 30));
        assert_eq!(from_yaml("{hours: 1.5, minutes: 0}"), SkipRequest::new(1, 0));
        assert_eq!(from_yaml("{hours: -2.9, minutes: true}"), SkipRequest::new(-2, 0));
        assert_eq!(from_yaml("{hours: [1], minutes: {a: 1}}"), SkipRequest::new(0, 0));
        assert_eq!(
            from_yaml("{hours: 18446744073709551615}"),
            SkipRequest::new(i64::MAX, 0)
        );
    }

    #[test]
    fn deserializes_with_missing_fields() {
        let req: SkipRequest = serde_yml::from_str("hours: 3").unwrap_or_default();
        assert_eq!(req, SkipRequest::new(3, 0));
    }
}
