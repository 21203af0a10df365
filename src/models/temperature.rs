//! Temperature ring model

use crate::clock::TimePosition;
use crate::series::HourlySeries;
use serde::{Deserialize, Serialize};

/// Fallback lower bound in °F
pub const MIN_TEMPERATURE_F: f64 = 55.0;
/// Fallback upper bound in °F
pub const MAX_TEMPERATURE_F: f64 = 85.0;

/// Static day shown until the first forecast arrives
pub const DEFAULT_HOURLY_TEMPERATURES: [f64; 24] = [
    62.0, 60.0, 58.0, 57.0, 55.0, 56.0, // 12am-5am
    58.0, 60.0, 64.0, 68.0, 72.0, 76.0, // 6am-11am
    80.0, 83.0, 85.0, 84.0, 82.0, 78.0, // 12pm-5pm
    74.0, 70.0, 68.0, 66.0, 64.0, 62.0, // 6pm-11pm
];

/// Hourly temperatures in °F
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TemperatureModel {
    hourly: HourlySeries<f64>,
    current: f64,
}

impl Default for TemperatureModel {
    fn default() -> Self {
        Self {
            hourly: HourlySeries::new(DEFAULT_HOURLY_TEMPERATURES),
            current: 72.0,
        }
    }
}

impl TemperatureModel {
    #[must_use]
    pub fn hourly(&self) -> &HourlySeries<f64> {
        &self.hourly
    }

    pub fn set_hourly(&mut self, hourly: HourlySeries<f64>) {
        self.hourly = hourly;
    }

    #[must_use]
    pub fn value_at_position(&self, position: TimePosition) -> f64 {
        *self.hourly.value_at(position)
    }

    /// Move the current reading to `position` and return it
    pub fn update_from_position(&mut self, position: TimePosition) -> f64 {
        self.current = self.value_at_position(position);
        self.current
    }

    #[must_use]
    pub fn current(&self) -> f64 {
        self.current
    }

    /// Coldest hour, used as the low end of the ring gradient
    #[must_use]
    pub fn min_hourly(&self) -> f64 {
        self.hourly.min_or(MIN_TEMPERATURE_F)
    }

    /// Warmest hour, used as the high end of the ring gradient
    #[must_use]
    pub fn max_hourly(&self) -> f64 {
        self.hourly.max_or(MAX_TEMPERATURE_F)
    }

    /// Gradient weight in `[0, 1]` of a temperature between the day's bounds
    #[must_use]
    pub fn relative(&self, temperature: f64) -> f64 {
        let (min, max) = (self.min_hourly(), self.max_hourly());
        if max - min <= f64::EPSILON {
            return 0.5;
        }
        ((temperature - min) / (max - min)).clamp(0.0, 1.0)
    }

    /// Whole degrees, e.g. `"72°"`
    #[must_use]
    pub fn formatted(temperature: f64) -> String {
        format!("{}°", temperature.trunc() as i64)
    }
}
