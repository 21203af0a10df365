//! Daylight ring model: sunrise/sunset anchors and their solar events.

use crate::clock::{TimePosition, time_from_position};
use crate::solar::{SolarEvents, SunEvent};
use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

/// Owns the anchor pair; every setter rebuilds the full [`SolarEvents`].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DaylightModel {
    events: SolarEvents,
}

impl DaylightModel {
    /// Default 06:30 / 19:30 anchors on `reference_date`
    #[must_use]
    pub fn new(reference_date: NaiveDate) -> Self {
        Self {
            events: SolarEvents::with_defaults(reference_date),
        }
    }

    #[must_use]
    pub fn from_events(events: SolarEvents) -> Self {
        Self { events }
    }

    #[must_use]
    pub fn events(&self) -> &SolarEvents {
        &self.events
    }

    pub fn set_anchors(&mut self, sunrise: NaiveDateTime, sunset: NaiveDateTime) {
        self.events = SolarEvents::new(sunrise, sunset);
    }

    pub fn set_sunrise(&mut self, sunrise: NaiveDateTime) {
        self.set_anchors(sunrise, self.events.sunset());
    }

    pub fn set_sunset(&mut self, sunset: NaiveDateTime) {
        self.set_anchors(self.events.sunrise(), sunset);
    }

    /// Move sunrise to a dial position (minute precision, same day)
    pub fn set_sunrise_from_position(&mut self, position: TimePosition) {
        let day = self.events.sunrise().date();
        self.set_sunrise(time_from_position(position, day));
    }

    /// Move sunset to a dial position (minute precision, same day)
    pub fn set_sunset_from_position(&mut self, position: TimePosition) {
        let day = self.events.sunset().date();
        self.set_sunset(time_from_position(position, day));
    }

    #[must_use]
    pub fn event_for_position(&self, position: TimePosition) -> (SunEvent, String) {
        self.events.event_for_position(position)
    }

    #[must_use]
    pub fn formatted_range(&self) -> String {
        self.events.formatted_range()
    }
}
