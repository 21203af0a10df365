//! Rain ring model

use crate::clock::TimePosition;
use crate::periods::{ActivePeriod, PeriodRule, active_period_at, extract_periods};
use crate::series::HourlySeries;
use serde::{Deserialize, Serialize};

/// Probability above 10% counts as rain; intensity equals probability
pub const DEFAULT_RAIN_RULE: PeriodRule = PeriodRule {
    threshold: 0.1,
    ceiling: 1.0,
    max_merge_gap_hours: 0,
};

pub const DEFAULT_HOURLY_RAIN: [f64; 24] = [
    0.0, 0.0, 0.0, 0.0, 0.0, 0.0, // 12am-5am
    0.0, 0.0, 0.0, 0.0, 0.0, 0.0, // 6am-11am
    0.0, 0.7, 0.8, 0.6, 0.5, 0.0, // 12pm-5pm
    0.0, 0.0, 0.0, 0.0, 0.0, 0.0, // 6pm-11pm
];

/// Hourly precipitation probability (0-1) and its rain periods
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RainModel {
    hourly: HourlySeries<f64>,
    rule: PeriodRule,
    midnight_gap: f64,
    periods: Vec<ActivePeriod>,
    current: f64,
}

impl Default for RainModel {
    fn default() -> Self {
        Self::new(DEFAULT_RAIN_RULE)
    }
}

impl RainModel {
    #[must_use]
    pub fn new(rule: PeriodRule) -> Self {
        let mut model = Self {
            hourly: HourlySeries::new(DEFAULT_HOURLY_RAIN),
            rule,
            midnight_gap: 0.0,
            periods: Vec::new(),
            current: 0.0,
        };
        model.recompute();
        model
    }

    fn recompute(&mut self) {
        self.periods = extract_periods(&self.hourly, &self.rule, self.midnight_gap);
    }

    #[must_use]
    pub fn hourly(&self) -> &HourlySeries<f64> {
        &self.hourly
    }

    pub fn set_hourly(&mut self, hourly: HourlySeries<f64>) {
        self.hourly = hourly;
        self.recompute();
    }

    /// Reserved arc at midnight as a fraction of the ring
    pub fn set_midnight_gap(&mut self, gap: f64) {
        if gap != self.midnight_gap {
            self.midnight_gap = gap;
            self.recompute();
        }
    }

    #[must_use]
    pub fn midnight_gap(&self) -> f64 {
        self.midnight_gap
    }

    #[must_use]
    pub fn rule(&self) -> &PeriodRule {
        &self.rule
    }

    #[must_use]
    pub fn periods(&self) -> &[ActivePeriod] {
        &self.periods
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

    /// Rain period covering `position`, if any
    #[must_use]
    pub fn period_at(&self, position: TimePosition) -> Option<&ActivePeriod> {
        active_period_at(&self.periods, position)
    }

    /// Whole-percent chance, e.g. `"70% Chance"`
    #[must_use]
    pub fn formatted_probability(probability: f64) -> String {
        format!("{}% Chance", (probability * 100.0).round() as i64)
    }
}
