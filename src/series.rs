//! Fixed 24-slot hourly series indexed by local hour of day.

use crate::clock::{HOURS_PER_DAY, TimePosition};
use crate::{CircadianError, Result};
use serde::{Deserialize, Serialize};

/// Exactly 24 samples, index `i` holding the value for hour `i` (midnight = 0).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HourlySeries<T> {
    values: [T; HOURS_PER_DAY],
}

impl<T> HourlySeries<T> {
    #[must_use]
    pub fn new(values: [T; HOURS_PER_DAY]) -> Self {
        Self { values }
    }

    /// Sample for an hour slot; hours past 23 wrap around.
    #[must_use]
    pub fn get(&self, hour: usize) -> &T {
        &self.values[hour % HOURS_PER_DAY]
    }

    /// Nearest-hour-floor lookup, no interpolation
    #[must_use]
    pub fn value_at(&self, position: TimePosition) -> &T {
        self.get(position.hour_index())
    }

    #[must_use]
    pub fn values(&self) -> &[T; HOURS_PER_DAY] {
        &self.values
    }

    pub fn iter(&self) -> impl Iterator<Item = &T> {
        self.values.iter()
    }
}

impl<T: Clone> HourlySeries<T> {
    /// Build from a slice that must hold exactly 24 samples.
    pub fn try_from_slice(values: &[T]) -> Result<Self> {
        let values: [T; HOURS_PER_DAY] = values.to_vec().try_into().map_err(|v: Vec<T>| {
            CircadianError::validation(format!(
                "hourly series needs {HOURS_PER_DAY} samples, got {}",
                v.len()
            ))
        })?;
        Ok(Self { values })
    }

    /// Copy of this series with the given `(hour, value)` slots replaced.
    /// Slots not mentioned keep their current value.
    #[must_use]
    pub fn overlay<I>(&self, updates: I) -> Self
    where
        I: IntoIterator<Item = (usize, T)>,
    {
        let mut values = self.values.clone();
        for (hour, value) in updates {
            values[hour % HOURS_PER_DAY] = value;
        }
        Self { values }
    }
}

impl HourlySeries<f64> {
    /// Smallest sample; `fallback` if every sample is NaN
    #[must_use]
    pub fn min_or(&self, fallback: f64) -> f64 {
        self.values
            .iter()
            .copied()
            .filter(|v| !v.is_nan())
            .reduce(f64::min)
            .unwrap_or(fallback)
    }

    /// Largest sample; `fallback` if every sample is NaN
    #[must_use]
    pub fn max_or(&self, fallback: f64) -> f64 {
        self.values
            .iter()
            .copied()
            .filter(|v| !v.is_nan())
            .reduce(f64::max)
            .unwrap_or(fallback)
    }
}

impl<T> From<[T; HOURS_PER_DAY]> for HourlySeries<T> {
    fn from(values: [T; HOURS_PER_DAY]) -> Self {
        Self::new(values)
    }
}

impl<T: Default + Copy> Default for HourlySeries<T> {
    fn default() -> Self {
        Self {
            values: [T::default(); HOURS_PER_DAY],
        }
    }
}
