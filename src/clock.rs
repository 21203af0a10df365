//! Mapping between wall-clock time and positions on the 24-hour dial.
//!
//! A [`TimePosition`] is the fraction of the day elapsed since midnight,
//! measured clockwise from the top of the circle. Positions always wrap
//! modulo 1.0, so midnight is both 0 and 1.

use chrono::{NaiveDate, NaiveDateTime, NaiveTime, TimeDelta, Timelike};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Seconds in one day
pub const SECONDS_PER_DAY: u32 = 24 * 60 * 60;

/// Hour slots on the dial
pub const HOURS_PER_DAY: usize = 24;

/// Fraction of a 24-hour day elapsed since midnight, always in `[0, 1)`.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default, Serialize, Deserialize)]
#[serde(from = "f64", into = "f64")]
pub struct TimePosition(f64);

impl TimePosition {
    /// Top of the dial
    pub const MIDNIGHT: TimePosition = TimePosition(0.0);

    /// Create a position, wrapping any real number into `[0, 1)`.
    /// Non-finite values fall back to midnight.
    #[must_use]
    pub fn new(value: f64) -> Self {
        if !value.is_finite() {
            return Self::MIDNIGHT;
        }
        let wrapped = value.rem_euclid(1.0);
        // rem_euclid can round up to exactly 1.0 for tiny negative inputs
        if wrapped >= 1.0 {
            Self::MIDNIGHT
        } else {
            Self(wrapped)
        }
    }

    /// Raw fraction of the day
    #[must_use]
    pub fn value(self) -> f64 {
        self.0
    }

    /// Hour slot this position falls in (nearest-hour floor).
    #[must_use]
    pub fn hour_index(self) -> usize {
        // value is in [0, 1), so the product is in [0, 24)
        ((self.0 * HOURS_PER_DAY as f64).floor() as usize) % HOURS_PER_DAY
    }

    /// Position at the start of the given hour slot
    #[must_use]
    pub fn from_hour(hour: usize) -> Self {
        Self::new(hour as f64 / HOURS_PER_DAY as f64)
    }

    /// Shift by a fraction of a day, wrapping around midnight
    #[must_use]
    pub fn offset(self, delta: f64) -> Self {
        Self::new(self.0 + delta)
    }
}

impl From<f64> for TimePosition {
    fn from(value: f64) -> Self {
        Self::new(value)
    }
}

impl From<TimePosition> for f64 {
    fn from(position: TimePosition) -> Self {
        position.0
    }
}

impl fmt::Display for TimePosition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.4}", self.0)
    }
}

/// Position of a wall-clock time on the dial: `(h*3600 + m*60 + s) / 86400`.
#[must_use]
pub fn position_from_time<T: Timelike>(time: &T) -> TimePosition {
    let seconds = time.hour() * 3600 + time.minute() * 60 + time.second();
    TimePosition::new(f64::from(seconds) / f64::from(SECONDS_PER_DAY))
}

/// Wall-clock time for a dial position on the reference day.
///
/// Seconds are dropped, so the result is truncated to the minute.
#[must_use]
pub fn time_from_position(position: TimePosition, reference_date: NaiveDate) -> NaiveDateTime {
    // round first so float error cannot drop a whole minute at a boundary;
    // positions just short of 1.0 stay in the last minute of the day
    let total_seconds = ((position.value() * f64::from(SECONDS_PER_DAY)).round() as i64)
        .min(i64::from(SECONDS_PER_DAY) - 1);
    let total_minutes = total_seconds / 60;
    reference_date.and_time(NaiveTime::MIN) + TimeDelta::minutes(total_minutes)
}

/// Position of "now", used to snap the dial back after a drag.
#[must_use]
pub fn current_position<T: Timelike>(now: &T) -> TimePosition {
    position_from_time(now)
}

/// Clock face text: `("6:05", "pm")`
#[must_use]
pub fn format_clock(time: &NaiveDateTime) -> (String, String) {
    (
        time.format("%-I:%M").to_string(),
        time.format("%P").to_string(),
    )
}

/// Time shown next to a solar event name, e.g. `"1:00 PM"`
#[must_use]
pub fn format_event_time(time: &NaiveDateTime) -> String {
    time.format("%-I:%M %p").to_string()
}

/// Compact lowercase time, e.g. `"6:30am"`
#[must_use]
pub fn format_short(time: &NaiveDateTime) -> String {
    time.format("%-I:%M%P").to_string()
}
