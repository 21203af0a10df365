//! Wind ring model

use crate::clock::TimePosition;
use crate::periods::{ActivePeriod, PeriodRule, active_period_at, extract_periods};
use crate::series::HourlySeries;
use serde::{Deserialize, Serialize};

/// Wind above 5 mph shows on the ring, 30 mph is full intensity, and calm
/// spells of up to three hours are bridged.
pub const DEFAULT_WIND_RULE: PeriodRule = PeriodRule {
    threshold: 5.0,
    ceiling: 30.0,
    max_merge_gap_hours: 3,
};

pub const DEFAULT_HOURLY_WIND_MPH: [f64; 24] = [
    2.0, 3.0, 3.0, 2.0, 2.0, 3.0, // 12am-5am
    4.0, 6.0, 8.0, 10.0, 12.0, 15.0, // 6am-11am
    18.0, 20.0, 22.0, 18.0, 15.0, 10.0, // 12pm-5pm
    8.0, 6.0, 4.0, 3.0, 2.0, 2.0, // 6pm-11pm
];

pub const DEFAULT_HOURLY_DIRECTIONS: [&str; 24] = [
    "N", "N", "NE", "NE", "NE", "E", //
    "E", "E", "SE", "SE", "S", "S", //
    "S", "SW", "SW", "W", "W", "NW", //
    "NW", "NW", "N", "N", "N", "N", //
];

/// Hourly wind speed (mph), compass direction labels and wind periods
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WindModel {
    speeds: HourlySeries<f64>,
    directions: HourlySeries<String>,
    rule: PeriodRule,
    midnight_gap: f64,
    periods: Vec<ActivePeriod>,
    current_speed: f64,
    current_direction: String,
}

impl Default for WindModel {
    fn default() -> Self {
        Self::new(DEFAULT_WIND_RULE)
    }
}

impl WindModel {
    #[must_use]
    pub fn new(rule: PeriodRule) -> Self {
        let mut model = Self {
            speeds: HourlySeries::new(DEFAULT_HOURLY_WIND_MPH),
            directions: HourlySeries::new(DEFAULT_HOURLY_DIRECTIONS.map(String::from)),
            rule,
            midnight_gap: 0.0,
            periods: Vec::new(),
            current_speed: 0.0,
            current_direction: "N".to_string(),
        };
        model.recompute();
        model
    }

    fn recompute(&mut self) {
        self.periods = extract_periods(&self.speeds, &self.rule, self.midnight_gap);
    }

    #[must_use]
    pub fn speeds(&self) -> &HourlySeries<f64> {
        &self.speeds
    }

    #[must_use]
    pub fn directions(&self) -> &HourlySeries<String> {
        &self.directions
    }

    /// Replace both series together so speed and direction stay aligned
    pub fn set_hourly(&mut self, speeds: HourlySeries<f64>, directions: HourlySeries<String>) {
        self.speeds = speeds;
        self.directions = directions;
        self.recompute();
    }

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

    /// Speed and direction for the hour containing `position`
    #[must_use]
    pub fn value_at_position(&self, position: TimePosition) -> (f64, &str) {
        (*self.speeds.value_at(position), self.directions.value_at(position).as_str())
    }

    pub fn update_from_position(&mut self, position: TimePosition) -> (f64, &str) {
        let (speed, direction) = self.value_at_position(position);
        let direction = direction.to_string();
        self.current_speed = speed;
        self.current_direction = direction;
        (self.current_speed, self.current_direction.as_str())
    }

    #[must_use]
    pub fn current_speed(&self) -> f64 {
        self.current_speed
    }

    #[must_use]
    pub fn current_direction(&self) -> &str {
        &self.current_direction
    }

    #[must_use]
    pub fn period_at(&self, position: TimePosition) -> Option<&ActivePeriod> {
        active_period_at(&self.periods, position)
    }

    /// Rounded speed with direction, e.g. `"15 mph NE"`
    #[must_use]
    pub fn formatted(speed: f64, direction: &str) -> String {
        format!("{} mph {direction}", speed.round() as i64)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_day_is_one_merged_period() {
        let model = WindModel::default();
        assert_eq!(model.periods().len(), 1);
        let period = model.periods()[0];
        assert_eq!((period.first_hour, period.last_hour), (7, 19));
        assert!((period.intensity - 22.0 / 30.0).abs() < 1e-12);
    }

    #[test]
    fn test_calm_spells_are_bridged() {
        let mut speeds = [0.0; 24];
        speeds[6] = 9.0;
        speeds[9] = 12.0; // two calm hours in between
        speeds[15] = 7.0; // five calm hours after
        let mut model = WindModel::default();
        let directions = model.directions().clone();
        model.set_hourly(HourlySeries::new(speeds), directions);

        let periods = model.periods();
        assert_eq!(periods.len(), 2);
        assert_eq!((periods[0].first_hour, periods[0].last_hour), (6, 9));
        assert_eq!((periods[1].first_hour, periods[1].last_hour), (15, 15));
    }

    #[test]
    fn test_direction_tracks_speed() {
        let mut model = WindModel::default();
        let (speed, direction) = model.update_from_position(TimePosition::from_hour(14));
        assert_eq!(speed, 22.0);
        assert_eq!(direction, "SW");
        assert_eq!(model.current_direction(), "SW");
        assert_eq!(model.current_speed(), 22.0);
        assert!(model.period_at(TimePosition::from_hour(14)).is_some());
        assert!(model.period_at(TimePosition::from_hour(2)).is_none());
    }

    #[test]
    fn test_update_replaces_previous_reading() {
        let mut model = WindModel::default();
        model.update_from_position(TimePosition::from_hour(14));
        let (speed, direction) = model.update_from_position(TimePosition::from_hour(2));
        assert_eq!((speed, direction), (3.0, "NE"));
        assert_eq!(model.current_speed(), 3.0);
        assert_eq!(model.current_direction(), "NE");
    }

    #[test]
    fn test_formatted() {
        assert_eq!(WindModel::formatted(14.6, "NE"), "15 mph NE");
    }
}
