//! Integration tests for the Circadian dial core

use chrono::{NaiveDate, NaiveDateTime, TimeZone, Timelike, Utc};
use circadian::clock::format_event_time;
use circadian::{
    ActiveRing, CircadianConfig, CircadianError, Dial, HourlySeries, Location, PeriodRule, SolarEvents,
    StaticProvider, SunEvent, TimePosition, UvRiskLevel, extract_periods, position_from_time,
    time_from_position,
};

fn day() -> NaiveDate {
    NaiveDate::from_ymd_opt(2025, 6, 1).unwrap()
}

fn at(hour: u32, minute: u32) -> NaiveDateTime {
    day().and_hms_opt(hour, minute, 0).unwrap()
}

/// Position/time mapping survives a round trip within a minute
#[test]
fn test_position_time_round_trip() {
    for (hour, minute, second) in [(0, 0, 0), (6, 30, 0), (13, 7, 59), (23, 59, 30)] {
        let time = day().and_hms_opt(hour, minute, second).unwrap();
        let back = time_from_position(position_from_time(&time), day());
        let drift = (time - back).num_seconds().abs();
        assert!(drift < 60, "{time} came back as {back}");
    }
}

/// Afternoon showers become one period at the highest probability
#[test]
fn test_rain_example_day() {
    let rain = HourlySeries::new([0.0; 24]).overlay([(13, 0.7), (14, 0.8), (15, 0.6), (16, 0.5)]);
    let rule = PeriodRule {
        threshold: 0.1,
        ceiling: 1.0,
        max_merge_gap_hours: 0,
    };

    let periods = extract_periods(&rain, &rule, 0.0);
    assert_eq!(periods.len(), 1);
    assert!((periods[0].start - 13.0 / 24.0).abs() < 1e-12);
    assert!((periods[0].end - 17.0 / 24.0).abs() < 1e-12);
    assert!((periods[0].intensity - 0.8).abs() < 1e-12);
}

/// Rain all day leaves the midnight gap free
#[test]
fn test_all_day_rain_splits_at_midnight_gap() {
    let rain = HourlySeries::new([0.9; 24]);
    let rule = PeriodRule {
        threshold: 0.1,
        ceiling: 1.0,
        max_merge_gap_hours: 0,
    };

    let periods = extract_periods(&rain, &rule, 0.01);
    assert_eq!(periods.len(), 2);
    assert!((periods[0].start - 0.01).abs() < 1e-12);
    assert!((periods[1].end - 0.99).abs() < 1e-12);
    assert!(periods[0].end <= periods[1].start);

    assert_eq!(extract_periods(&rain, &rule, 0.0).len(), 1);
    assert!(extract_periods(&HourlySeries::new([0.0; 24]), &rule, 0.01).is_empty());
}

/// Derived events for a 06:30 / 19:30 day
#[test]
fn test_solar_day() {
    let events = SolarEvents::new(at(6, 30), at(19, 30));
    assert_eq!(format_event_time(&events.first_light()), "6:00 AM");
    assert_eq!(format_event_time(&events.solar_noon()), "1:00 PM");
    assert_eq!(format_event_time(&events.golden_hour_evening()), "6:30 PM");
    assert_eq!(format_event_time(&events.last_light()), "8:00 PM");

    let noon = position_from_time(&events.solar_noon());
    assert_eq!(events.event_for_position(noon).0, SunEvent::SolarNoon);

    let dusk = position_from_time(&at(19, 0));
    let (event, label) = events.event_for_position(dusk);
    assert_eq!(event, SunEvent::EveningGoldenHour);
    assert_eq!(label, "7:00 PM");

    let small_hours = position_from_time(&at(3, 0));
    assert_eq!(events.event_for_position(small_hours).0, SunEvent::Night);
}

#[test]
fn test_uv_bands_are_half_open() {
    assert_eq!(UvRiskLevel::from_index(2.99), UvRiskLevel::Low);
    assert_eq!(UvRiskLevel::from_index(3.0), UvRiskLevel::Moderate);
    assert_eq!(UvRiskLevel::from_index(8.0), UvRiskLevel::VeryHigh);
    assert_eq!(UvRiskLevel::from_index(11.0), UvRiskLevel::Extreme);
}

const BUNDLE_JSON: &str = r#"{
    "timezone": "Europe/Zurich",
    "hourly": [
        {"timestamp": "2025-06-01T06:00:00Z", "temperature_f": 61.0, "uv_index": 2.0, "precipitation_chance": 0.0, "wind_speed_mph": 4.0, "wind_direction": "north"},
        {"timestamp": "2025-06-01T07:00:00Z", "temperature_f": 63.0, "uv_index": 3.0, "precipitation_chance": 0.0, "wind_speed_mph": 9.0, "wind_direction": "northwest"},
        {"timestamp": "2025-06-01T08:00:00Z", "temperature_f": 66.0, "uv_index": 5.0, "precipitation_chance": 0.4, "wind_speed_mph": 14.0, "wind_direction": "west"},
        {"timestamp": "2025-06-01T09:00:00Z", "temperature_f": 69.0, "uv_index": 6.0, "precipitation_chance": 0.6, "wind_speed_mph": 16.0, "wind_direction": "west"},
        {"timestamp": "2025-06-01T10:00:00Z", "temperature_f": 71.0, "uv_index": 7.0, "precipitation_chance": 0.2, "wind_speed_mph": 12.0, "wind_direction": "southwest"}
    ],
    "sunrise": "2025-06-01T03:35:00Z",
    "sunset": "2025-06-01T19:20:00Z"
}"#;

/// Loading a forecast, dragging the wind ring, and releasing it
#[tokio::test]
async fn test_dial_session() {
    let config = CircadianConfig::default();
    let mut dial = Dial::new(at(8, 10), &config);
    let provider = StaticProvider::from_json(BUNDLE_JSON).unwrap();
    let zurich = Location::new(47.3769, 8.5417, "Zurich");
    let now = Utc.with_ymd_and_hms(2025, 6, 1, 6, 10, 0).unwrap();

    dial.refresh(&provider, &zurich, now).await.unwrap();
    assert!(dial.status().error_message.is_none());

    // 06:00 UTC is 8am in Zurich
    let snapshot = dial.current_snapshot();
    assert_eq!(snapshot.temperature_text, "61°");
    assert_eq!(snapshot.wind_direction, "N");
    assert_eq!(snapshot.uv_risk, UvRiskLevel::Low);

    dial.begin_drag(ActiveRing::Wind);
    let calm = dial.update_from_position(TimePosition::from_hour(22));
    assert!(!calm.in_active_period);

    let snapshot = dial.update_from_position(TimePosition::from_hour(11));
    assert_eq!(snapshot.wind_text, "16 mph W");
    assert_eq!(snapshot.rain_text, "60% Chance");
    assert!(snapshot.in_active_period);
    assert!(snapshot.crossed_boundary);
    assert!(!snapshot.highlighted.is_empty());
    for pair in snapshot.highlighted.windows(2) {
        assert!(pair[0].end <= pair[1].start);
    }

    let sunrise = dial.daylight().events().sunrise();
    assert_eq!((sunrise.hour(), sunrise.minute()), (5, 35));

    let snapshot = dial.end_drag(at(8, 10));
    assert_eq!(snapshot.active_ring, None);
    assert_eq!(snapshot.time_text, "8:10");
    assert!(snapshot.highlighted.is_empty());
}

/// An unreadable bundle is rejected before it reaches the dial
#[test]
fn test_invalid_bundle_is_rejected() {
    let err = StaticProvider::from_json("not json").unwrap_err();
    assert!(matches!(err, CircadianError::Forecast { .. }));
    assert!(err.user_message().contains("previous data"));
}
