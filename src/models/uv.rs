//! UV index ring model

use crate::clock::TimePosition;
use crate::series::HourlySeries;
use serde::{Deserialize, Serialize};
use std::fmt;

pub const MIN_UV_INDEX: f64 = 0.0;
pub const MAX_UV_INDEX: f64 = 11.0;

pub const DEFAULT_HOURLY_UV: [f64; 24] = [
    0.0, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0, // 12am-6am
    0.0, 1.0, 2.0, 4.0, 6.0, 9.0, // 7am-12pm
    10.0, 11.0, 10.0, 8.0, 6.0, 3.0, // 1pm-6pm
    1.0, 0.0, 0.0, 0.0, 0.0, // 7pm-11pm
];

/// Exposure bands with half-open bounds: `[0,3) [3,6) [6,8) [8,11) [11,∞)`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum UvRiskLevel {
    Low,
    Moderate,
    High,
    VeryHigh,
    Extreme,
}

impl UvRiskLevel {
    #[must_use]
    pub fn from_index(index: f64) -> Self {
        match index {
            i if i < 3.0 => UvRiskLevel::Low,
            i if i < 6.0 => UvRiskLevel::Moderate,
            i if i < 8.0 => UvRiskLevel::High,
            i if i < 11.0 => UvRiskLevel::VeryHigh,
            _ => UvRiskLevel::Extreme,
        }
    }

    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            UvRiskLevel::Low => "Low",
            UvRiskLevel::Moderate => "Moderate",
            UvRiskLevel::High => "High",
            UvRiskLevel::VeryHigh => "Very High",
            UvRiskLevel::Extreme => "Extreme",
        }
    }

    /// Colour name used for the band on the ring
    #[must_use]
    pub fn color(self) -> &'static str {
        match self {
            UvRiskLevel::Low => "green",
            UvRiskLevel::Moderate => "yellow",
            UvRiskLevel::High => "orange",
            UvRiskLevel::VeryHigh => "red",
            UvRiskLevel::Extreme => "purple",
        }
    }
}

impl fmt::Display for UvRiskLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Hourly UV index
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UvModel {
    hourly: HourlySeries<f64>,
    current: f64,
}

impl Default for UvModel {
    fn default() -> Self {
        Self {
            hourly: HourlySeries::new(DEFAULT_HOURLY_UV),
            current: 5.0,
        }
    }
}

impl UvModel {
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

    pub fn update_from_position(&mut self, position: TimePosition) -> f64 {
        self.current = self.value_at_position(position);
        self.current
    }

    #[must_use]
    pub fn current(&self) -> f64 {
        self.current
    }

    #[must_use]
    pub fn current_risk(&self) -> UvRiskLevel {
        UvRiskLevel::from_index(self.current)
    }

    #[must_use]
    pub fn min_hourly(&self) -> f64 {
        self.hourly.min_or(MIN_UV_INDEX)
    }

    #[must_use]
    pub fn max_hourly(&self) -> f64 {
        self.hourly.max_or(MAX_UV_INDEX)
    }
}
