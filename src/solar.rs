//! Solar events derived from a sunrise/sunset pair.
//!
//! Six events (first light, both golden hours, solar noon, last light and
//! solar midnight) are computed together from the two anchors. A
//! [`SolarEvents`] value is only ever built whole, so the derived times can
//! never go stale relative to the anchors.

use crate::clock::{
    TimePosition, format_event_time, format_short, position_from_time, time_from_position,
};
use crate::series::HourlySeries;
use chrono::{NaiveDate, NaiveDateTime, NaiveTime, TimeDelta, TimeZone, Timelike};
use serde::{Deserialize, Serialize};
use std::fmt;
use sunrise::{Coordinates, SolarDay, SolarEvent};
use tracing::{debug, warn};

/// Positions closer than this (about seven minutes) count as the event itself
pub const EVENT_TOLERANCE: f64 = 0.005;

/// How far past sunrise the morning golden hour bucket reaches (about an hour)
pub const MORNING_GOLDEN_SPAN: f64 = 0.04;

/// Named moment or period of the solar day.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SunEvent {
    FirstLight,
    MorningGoldenHour,
    Sunrise,
    SolarNoon,
    EveningGoldenHour,
    Sunset,
    LastLight,
    SolarMidnight,
    Night,
}

impl SunEvent {
    #[must_use]
    pub fn name(self) -> &'static str {
        match self {
            SunEvent::FirstLight => "First Light",
            SunEvent::MorningGoldenHour => "Morning Golden Hour",
            SunEvent::Sunrise => "Sunrise",
            SunEvent::SolarNoon => "Solar Noon",
            SunEvent::EveningGoldenHour => "Evening Golden Hour",
            SunEvent::Sunset => "Sunset",
            SunEvent::LastLight => "Last Light",
            SunEvent::SolarMidnight => "Solar Midnight",
            SunEvent::Night => "Night",
        }
    }
}

impl fmt::Display for SunEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Sunrise, sunset and the six events derived from them.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SolarEvents {
    sunrise: NaiveDateTime,
    sunset: NaiveDateTime,
    first_light: NaiveDateTime,
    golden_hour_morning: NaiveDateTime,
    solar_noon: NaiveDateTime,
    golden_hour_evening: NaiveDateTime,
    last_light: NaiveDateTime,
    solar_midnight: NaiveDateTime,
}

impl SolarEvents {
    /// Derive every event from the two anchors (expected on the same day).
    #[must_use]
    pub fn new(sunrise: NaiveDateTime, sunset: NaiveDateTime) -> Self {
        let next_sunrise = sunrise + TimeDelta::hours(24);
        let events = Self {
            sunrise,
            sunset,
            first_light: sunrise - TimeDelta::minutes(30),
            golden_hour_morning: sunrise,
            solar_noon: sunrise + (sunset - sunrise) / 2,
            golden_hour_evening: sunset - TimeDelta::minutes(60),
            last_light: sunset + TimeDelta::minutes(30),
            solar_midnight: sunset + (next_sunrise - sunset) / 2,
        };
        debug!(%sunrise, %sunset, solar_noon = %events.solar_noon, "calculated solar events");
        events
    }

    /// 06:30 sunrise and 19:30 sunset on `date`
    #[must_use]
    pub fn with_defaults(date: NaiveDate) -> Self {
        Self::new(at(date, 6, 30), at(date, 19, 30))
    }

    /// Sunrise and sunset for a location, in the location's local time.
    ///
    /// Falls back to 06:00 / 18:00 when the coordinates are invalid or the
    /// sun does not rise or set that day.
    #[must_use]
    pub fn for_location<Tz: TimeZone>(latitude: f64, longitude: f64, date: NaiveDate, tz: &Tz) -> Self {
        let local_event = |event: SolarEvent| -> Option<NaiveDateTime> {
            let coordinates = Coordinates::new(latitude, longitude)?;
            SolarDay::new(coordinates, date)
                .event_time(event)
                .map(|time| time.with_timezone(tz).naive_local())
        };

        let sunrise = local_event(SolarEvent::Sunrise).unwrap_or_else(|| {
            warn!(latitude, longitude, %date, "no sunrise found, using 6am");
            at(date, 6, 0)
        });
        let sunset = local_event(SolarEvent::Sunset).unwrap_or_else(|| {
            warn!(latitude, longitude, %date, "no sunset found, using 6pm");
            at(date, 18, 0)
        });

        Self::new(sunrise, sunset)
    }

    #[must_use]
    pub fn sunrise(&self) -> NaiveDateTime {
        self.sunrise
    }

    #[must_use]
    pub fn sunset(&self) -> NaiveDateTime {
        self.sunset
    }

    #[must_use]
    pub fn first_light(&self) -> NaiveDateTime {
        self.first_light
    }

    #[must_use]
    pub fn golden_hour_morning(&self) -> NaiveDateTime {
        self.golden_hour_morning
    }

    #[must_use]
    pub fn solar_noon(&self) -> NaiveDateTime {
        self.solar_noon
    }

    #[must_use]
    pub fn golden_hour_evening(&self) -> NaiveDateTime {
        self.golden_hour_evening
    }

    #[must_use]
    pub fn last_light(&self) -> NaiveDateTime {
        self.last_light
    }

    #[must_use]
    pub fn solar_midnight(&self) -> NaiveDateTime {
        self.solar_midnight
    }

    /// Time of a named event; `None` for [`SunEvent::Night`], which is a period
    #[must_use]
    pub fn time_of(&self, event: SunEvent) -> Option<NaiveDateTime> {
        match event {
            SunEvent::FirstLight => Some(self.first_light),
            SunEvent::MorningGoldenHour => Some(self.golden_hour_morning),
            SunEvent::Sunrise => Some(self.sunrise),
            SunEvent::SolarNoon => Some(self.solar_noon),
            SunEvent::EveningGoldenHour => Some(self.golden_hour_evening),
            SunEvent::Sunset => Some(self.sunset),
            SunEvent::LastLight => Some(self.last_light),
            SunEvent::SolarMidnight => Some(self.solar_midnight),
            SunEvent::Night => None,
        }
    }

    /// Dial position of a named event (time of day only)
    #[must_use]
    pub fn position_of(&self, event: SunEvent) -> Option<TimePosition> {
        self.time_of(event).map(|time| position_from_time(&time))
    }

    #[must_use]
    pub fn sunrise_position(&self) -> TimePosition {
        position_from_time(&self.sunrise)
    }

    #[must_use]
    pub fn sunset_position(&self) -> TimePosition {
        position_from_time(&self.sunset)
    }

    /// Named events in the order exact matches are checked
    fn named_positions(&self) -> [(SunEvent, f64); 8] {
        [
            SunEvent::FirstLight,
            SunEvent::MorningGoldenHour,
            SunEvent::Sunrise,
            SunEvent::SolarNoon,
            SunEvent::EveningGoldenHour,
            SunEvent::Sunset,
            SunEvent::LastLight,
            SunEvent::SolarMidnight,
        ]
        .map(|event| {
            let position = self.position_of(event).unwrap_or_default();
            (event, position.value())
        })
    }

    /// Classify a dial position into a solar event or event period.
    ///
    /// Returns the event and the position's time (minute precision) formatted
    /// like `"1:00 PM"`.
    #[must_use]
    pub fn event_for_position(&self, position: TimePosition) -> (SunEvent, String) {
        let time = time_from_position(position, self.sunrise.date());
        let label = format_event_time(&time);
        let p = position_from_time(&time).value();

        if let Some((event, _)) = self
            .named_positions()
            .into_iter()
            .find(|(_, named)| circular_distance(p, *named) < EVENT_TOLERANCE)
        {
            return (event, label);
        }

        // Measure everything from first light so events past midnight keep their order
        let first_light = self.position_of(SunEvent::FirstLight).unwrap_or_default().value();
        let since_first_light = |position: f64| (position - first_light).rem_euclid(1.0);
        let offset_of = |event: SunEvent| {
            since_first_light(self.position_of(event).unwrap_or_default().value())
        };

        let q = since_first_light(p);
        let sunrise = offset_of(SunEvent::Sunrise);
        let solar_noon = offset_of(SunEvent::SolarNoon);
        let golden_evening = offset_of(SunEvent::EveningGoldenHour);
        let sunset = offset_of(SunEvent::Sunset);
        let last_light = offset_of(SunEvent::LastLight);

        let event = if q > last_light {
            SunEvent::Night
        } else if q < sunrise {
            SunEvent::FirstLight
        } else if q < solar_noon {
            if q < sunrise + MORNING_GOLDEN_SPAN {
                SunEvent::MorningGoldenHour
            } else {
                SunEvent::Sunrise
            }
        } else if q < golden_evening {
            SunEvent::SolarNoon
        } else if q < sunset {
            SunEvent::EveningGoldenHour
        } else if q < last_light {
            SunEvent::Sunset
        } else {
            SunEvent::LastLight
        };
        (event, label)
    }

    /// Per-hour daylight: 0 at night, 0.5 in the sunrise hour and the hour
    /// before sunset, 1 in between.
    #[must_use]
    pub fn hourly_daylight_intensity(&self) -> HourlySeries<f64> {
        let sunrise_hour = self.sunrise.hour() as usize;
        let sunset_hour = self.sunset.hour() as usize;

        let mut values = [0.0; 24];
        for (hour, value) in values.iter_mut().enumerate() {
            *value = if hour < sunrise_hour || hour >= sunset_hour {
                0.0
            } else if hour == sunrise_hour || hour + 1 == sunset_hour {
                0.5
            } else {
                1.0
            };
        }
        HourlySeries::new(values)
    }

    /// Midpoint of the daylight arc, wrapping when sunrise falls after sunset
    #[must_use]
    pub fn peak_position(&self) -> TimePosition {
        let sunrise = self.sunrise_position().value();
        let sunset = self.sunset_position().value();
        if sunrise > sunset {
            TimePosition::new((sunrise + sunset + 1.0) / 2.0)
        } else {
            TimePosition::new((sunrise + sunset) / 2.0)
        }
    }

    /// Daylight range like `"6:30am - 7:30pm"`
    #[must_use]
    pub fn formatted_range(&self) -> String {
        format!("{} - {}", format_short(&self.sunrise), format_short(&self.sunset))
    }
}

fn at(date: NaiveDate, hour: u32, minute: u32) -> NaiveDateTime {
    let time = NaiveTime::from_hms_opt(hour, minute, 0).unwrap_or(NaiveTime::MIN);
    date.and_time(time)
}

fn circular_distance(a: f64, b: f64) -> f64 {
    let d = (a - b).abs();
    d.min(1.0 - d)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn day() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 3, 18).unwrap()
    }

    fn events() -> SolarEvents {
        SolarEvents::with_defaults(day())
    }

    fn hm(time: NaiveDateTime) -> (u32, u32) {
        (time.hour(), time.minute())
    }

    #[test]
    fn test_derived_events() {
        let events = events();
        assert_eq!(hm(events.first_light()), (6, 0));
        assert_eq!(hm(events.golden_hour_morning()), (6, 30));
        assert_eq!(hm(events.solar_noon()), (13, 0));
        assert_eq!(hm(events.golden_hour_evening()), (18, 30));
        assert_eq!(hm(events.last_light()), (20, 0));
        // halfway through the 11 hours between 19:30 and the next 06:30
        assert_eq!(hm(events.solar_midnight()), (1, 0));
        assert_eq!(events.solar_midnight().date(), day().succ_opt().unwrap());
        let midnight = events.position_of(SunEvent::SolarMidnight).unwrap();
        assert!((midnight.value() - 1.0 / 24.0).abs() < 1e-9);
    }

    #[test]
    fn test_exact_solar_noon() {
        let events = events();
        let noon = events.position_of(SunEvent::SolarNoon).unwrap();
        let (event, label) = events.event_for_position(noon);
        assert_eq!(event, SunEvent::SolarNoon);
        assert_eq!(event.name(), "Solar Noon");
        assert_eq!(label, "1:00 PM");
    }

    #[test]
    fn test_golden_hour_morning_wins_over_sunrise() {
        let events = events();
        let (event, _) = events.event_for_position(events.sunrise_position());
        assert_eq!(event, SunEvent::MorningGoldenHour);
    }

    #[rstest]
    #[case::deep_night(2, 30, SunEvent::Night)]
    #[case::late_night(22, 0, SunEvent::Night)]
    #[case::dawn(6, 15, SunEvent::FirstLight)]
    #[case::early_morning(7, 0, SunEvent::MorningGoldenHour)]
    #[case::late_morning(10, 0, SunEvent::Sunrise)]
    #[case::afternoon(15, 0, SunEvent::SolarNoon)]
    #[case::before_sunset(18, 50, SunEvent::EveningGoldenHour)]
    #[case::after_sunset(19, 45, SunEvent::Sunset)]
    #[case::near_solar_midnight(1, 3, SunEvent::SolarMidnight)]
    #[case::near_last_light(20, 5, SunEvent::LastLight)]
    fn test_event_buckets(#[case] hour: u32, #[case] minute: u32, #[case] expected: SunEvent) {
        let events = events();
        let position = position_from_time(&NaiveTime::from_hms_opt(hour, minute, 0).unwrap());
        assert_eq!(events.event_for_position(position).0, expected);
    }

    #[rstest]
    #[case::late_sunset_afternoon((4, 0), (23, 45), (15, 0), SunEvent::SolarNoon)]
    #[case::late_sunset_evening((4, 0), (23, 45), (23, 0), SunEvent::EveningGoldenHour)]
    #[case::late_sunset_after_midnight((4, 0), (23, 45), (0, 5), SunEvent::Sunset)]
    #[case::late_sunset_night((4, 0), (23, 45), (2, 30), SunEvent::Night)]
    #[case::early_sunrise_midday((0, 10), (21, 0), (12, 0), SunEvent::SolarNoon)]
    #[case::early_sunrise_dawn((0, 10), (21, 0), (23, 50), SunEvent::FirstLight)]
    #[case::early_sunrise_morning((0, 10), (21, 0), (0, 40), SunEvent::MorningGoldenHour)]
    #[case::early_sunrise_night((0, 10), (21, 0), (22, 0), SunEvent::Night)]
    fn test_event_buckets_across_midnight(
        #[case] sunrise: (u32, u32),
        #[case] sunset: (u32, u32),
        #[case] at_time: (u32, u32),
        #[case] expected: SunEvent,
    ) {
        let events = SolarEvents::new(at(day(), sunrise.0, sunrise.1), at(day(), sunset.0, sunset.1));
        let position =
            position_from_time(&NaiveTime::from_hms_opt(at_time.0, at_time.1, 0).unwrap());
        assert_eq!(events.event_for_position(position).0, expected);
    }

    #[test]
    fn test_daylight_intensity() {
        let intensity = events().hourly_daylight_intensity();
        assert_eq!(*intensity.get(5), 0.0);
        assert_eq!(*intensity.get(6), 0.5);
        assert_eq!(*intensity.get(12), 1.0);
        assert_eq!(*intensity.get(18), 0.5);
        assert_eq!(*intensity.get(19), 0.0);
    }

    #[test]
    fn test_peak_and_range() {
        let events = events();
        assert!((events.peak_position().value() - 13.0 / 24.0).abs() < 1e-9);
        assert_eq!(events.formatted_range(), "6:30am - 7:30pm");

        let wrapped = SolarEvents::new(day().and_hms_opt(20, 0, 0).unwrap(), day().and_hms_opt(4, 0, 0).unwrap());
        assert!(wrapped.peak_position().value().abs() < 1e-9);
    }

    #[test]
    fn test_for_location_uses_local_time() {
        let events = SolarEvents::for_location(46.8182, 8.2275, day(), &chrono_tz::Europe::Zurich);
        let sunrise = events.sunrise();
        let sunset = events.sunset();
        assert!((5..=7).contains(&sunrise.hour()), "sunrise {sunrise}");
        assert!((17..=19).contains(&sunset.hour()), "sunset {sunset}");
    }

    #[test]
    fn test_for_location_falls_back_on_bad_coordinates() {
        let events = SolarEvents::for_location(123.0, 8.0, day(), &chrono::Utc);
        assert_eq!(hm(events.sunrise()), (6, 0));
        assert_eq!(hm(events.sunset()), (18, 0));
    }
}
