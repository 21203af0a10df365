//! Dial view state.
//!
//! [`Dial`] owns every ring model, the current position on the clock face,
//! and the ring being dragged. Each position update returns a
//! [`DialSnapshot`] with the values the view layer shows.

use crate::clock::{TimePosition, current_position, format_clock, time_from_position};
use crate::config::CircadianConfig;
use crate::models::{
    DaylightModel, Location, RainModel, TemperatureModel, UvModel, UvRiskLevel, WindModel,
};
use crate::periods::{ActivePeriod, crossed_boundary};
use crate::provider::{AlignedForecast, ForecastSeries, WeatherProvider, fetch_bundle};
use crate::ring::{ActiveRing, RingLayout};
use crate::solar::{SolarEvents, SunEvent};
use crate::Result;
use chrono::{DateTime, NaiveDateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

/// Outcome of the most recent forecast refresh
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RefreshStatus {
    pub last_updated: Option<DateTime<Utc>>,
    /// Message for the host to display; cleared by the next successful refresh
    pub error_message: Option<String>,
    pub location_name: Option<String>,
}

/// Geometry of one ring in the current drag state
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RingGeometry {
    pub size: f64,
    pub width: f64,
    /// Reserved arc at midnight as a fraction of the circumference
    pub midnight_gap: f64,
    pub visible: bool,
}

/// Everything shown for one dial position
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DialSnapshot {
    pub position: TimePosition,
    pub time: NaiveDateTime,
    /// `"3:45"`
    pub time_text: String,
    /// `"am"` or `"pm"`
    pub meridiem: String,
    pub active_ring: Option<ActiveRing>,
    pub temperature: f64,
    pub temperature_text: String,
    pub uv_index: f64,
    pub uv_risk: UvRiskLevel,
    pub rain_probability: f64,
    pub rain_text: String,
    pub wind_speed: f64,
    pub wind_direction: String,
    pub wind_text: String,
    pub sun_event: SunEvent,
    pub sun_event_time: String,
    /// Periods of the active rain or wind ring; empty for other rings
    pub highlighted: Vec<ActivePeriod>,
    pub in_active_period: bool,
    /// Whether this update moved into or out of a highlighted period
    pub crossed_boundary: bool,
}

#[derive(Debug, Clone)]
pub struct Dial {
    layout: RingLayout,
    temperature: TemperatureModel,
    uv: UvModel,
    rain: RainModel,
    wind: WindModel,
    daylight: DaylightModel,
    position: TimePosition,
    current_time: NaiveDateTime,
    active_ring: Option<ActiveRing>,
    status: RefreshStatus,
}

impl Dial {
    /// Dial showing the default day, positioned at `now` (local time)
    #[must_use]
    pub fn new(now: NaiveDateTime, config: &CircadianConfig) -> Self {
        let today = now.date();
        let daylight = match config.daylight.anchors() {
            Ok((sunrise, sunset)) => DaylightModel::from_events(SolarEvents::new(
                today.and_time(sunrise),
                today.and_time(sunset),
            )),
            Err(err) => {
                warn!(error = %err, "invalid daylight defaults, using 6:30am - 7:30pm");
                DaylightModel::new(today)
            }
        };

        let mut dial = Self {
            layout: config.layout,
            temperature: TemperatureModel::default(),
            uv: UvModel::default(),
            rain: RainModel::new(config.rain.into()),
            wind: WindModel::new(config.wind.into()),
            daylight,
            position: current_position(&now),
            current_time: now,
            active_ring: None,
            status: RefreshStatus::default(),
        };
        dial.apply_midnight_gaps();
        dial.refresh_current_values();
        dial
    }

    #[must_use]
    pub fn position(&self) -> TimePosition {
        self.position
    }

    #[must_use]
    pub fn current_time(&self) -> NaiveDateTime {
        self.current_time
    }

    #[must_use]
    pub fn active_ring(&self) -> Option<ActiveRing> {
        self.active_ring
    }

    #[must_use]
    pub fn layout(&self) -> &RingLayout {
        &self.layout
    }

    #[must_use]
    pub fn temperature(&self) -> &TemperatureModel {
        &self.temperature
    }

    #[must_use]
    pub fn uv(&self) -> &UvModel {
        &self.uv
    }

    #[must_use]
    pub fn rain(&self) -> &RainModel {
        &self.rain
    }

    #[must_use]
    pub fn wind(&self) -> &WindModel {
        &self.wind
    }

    #[must_use]
    pub fn daylight(&self) -> &DaylightModel {
        &self.daylight
    }

    /// Mutable daylight model for dragging the sunrise and sunset handles
    pub fn daylight_mut(&mut self) -> &mut DaylightModel {
        &mut self.daylight
    }

    #[must_use]
    pub fn status(&self) -> &RefreshStatus {
        &self.status
    }

    #[must_use]
    pub fn ring_geometry(&self, ring: ActiveRing) -> RingGeometry {
        RingGeometry {
            size: self.layout.ring_size(ring, self.active_ring),
            width: self.layout.ring_width(ring, self.active_ring),
            midnight_gap: self.layout.midnight_gap_fraction(ring, self.active_ring),
            visible: RingLayout::is_visible(ring, self.active_ring),
        }
    }

    /// Start dragging `ring`; it grows and the others hide.
    pub fn begin_drag(&mut self, ring: ActiveRing) {
        if self.active_ring == Some(ring) {
            return;
        }
        debug!(ring = %ring, "drag started");
        self.active_ring = Some(ring);
        self.apply_midnight_gaps();
    }

    /// Release the dragged ring and snap back to `now`.
    pub fn end_drag(&mut self, now: NaiveDateTime) -> DialSnapshot {
        debug!(ring = ?self.active_ring, "drag ended");
        self.active_ring = None;
        self.apply_midnight_gaps();

        let previous = self.position;
        self.position = current_position(&now);
        self.current_time = now;
        self.refresh_current_values();
        self.snapshot(Some(previous))
    }

    /// Move the dial to `position` and return what it shows there.
    ///
    /// The time is truncated to the minute on the current day.
    pub fn update_from_position(&mut self, position: impl Into<TimePosition>) -> DialSnapshot {
        let position = position.into();
        let previous = self.position;
        self.position = position;
        self.current_time = time_from_position(position, self.current_time.date());
        self.refresh_current_values();
        debug!(%position, time = %self.current_time, "dial moved");
        self.snapshot(Some(previous))
    }

    /// What the dial shows right now, without moving it
    #[must_use]
    pub fn current_snapshot(&self) -> DialSnapshot {
        self.snapshot(None)
    }

    /// Fetch a fresh forecast and apply it in one step.
    ///
    /// On failure the error is recorded in [`RefreshStatus::error_message`]
    /// and every series and anchor keeps its previous value.
    #[tracing::instrument(
        name = "refresh_dial",
        level = "debug",
        skip(self, provider, location),
        fields(location = %location.name)
    )]
    pub async fn refresh<P>(&mut self, provider: &P, location: &Location, now: DateTime<Utc>) -> Result<()>
    where
        P: WeatherProvider + ?Sized,
    {
        let aligned = match fetch_bundle(provider, location, now.date_naive()).await {
            Ok(bundle) => bundle.align(now, self.forecast_series()),
            Err(err) => Err(err),
        };

        match aligned {
            Ok(aligned) => {
                info!(
                    hours = aligned.hours_covered,
                    sunrise = %aligned.sunrise,
                    sunset = %aligned.sunset,
                    "applied forecast"
                );
                self.apply_forecast(aligned);
                self.status = RefreshStatus {
                    last_updated: Some(now),
                    error_message: None,
                    location_name: Some(location.name.clone()),
                };
                Ok(())
            }
            Err(err) => {
                warn!(error = %err, "forecast refresh failed, keeping previous data");
                self.status.error_message = Some(err.user_message());
                Err(err)
            }
        }
    }

    fn forecast_series(&self) -> ForecastSeries {
        ForecastSeries {
            temperature: self.temperature.hourly().clone(),
            uv: self.uv.hourly().clone(),
            rain: self.rain.hourly().clone(),
            wind_speed: self.wind.speeds().clone(),
            wind_direction: self.wind.directions().clone(),
        }
    }

    fn apply_forecast(&mut self, aligned: AlignedForecast) {
        let series = aligned.series;
        self.temperature.set_hourly(series.temperature);
        self.uv.set_hourly(series.uv);
        self.rain.set_hourly(series.rain);
        self.wind.set_hourly(series.wind_speed, series.wind_direction);
        self.daylight.set_anchors(aligned.sunrise, aligned.sunset);
        self.refresh_current_values();
    }

    fn apply_midnight_gaps(&mut self) {
        let active = self.active_ring;
        self.rain
            .set_midnight_gap(self.layout.midnight_gap_fraction(ActiveRing::Rain, active));
        self.wind
            .set_midnight_gap(self.layout.midnight_gap_fraction(ActiveRing::Wind, active));
    }

    fn refresh_current_values(&mut self) {
        let position = self.position;
        self.temperature.update_from_position(position);
        self.uv.update_from_position(position);
        self.rain.update_from_position(position);
        self.wind.update_from_position(position);
    }

    fn highlighted_periods(&self) -> &[ActivePeriod] {
        match self.active_ring {
            Some(ActiveRing::Rain) => self.rain.periods(),
            Some(ActiveRing::Wind) => self.wind.periods(),
            _ => &[],
        }
    }

    fn snapshot(&self, previous: Option<TimePosition>) -> DialSnapshot {
        let position = self.position;
        let (time_text, meridiem) = format_clock(&self.current_time);
        let (sun_event, sun_event_time) = self.daylight.event_for_position(position);
        let highlighted = self.highlighted_periods();

        let temperature = self.temperature.current();
        let rain_probability = self.rain.current();
        let wind_speed = self.wind.current_speed();
        let wind_direction = self.wind.current_direction().to_string();

        DialSnapshot {
            position,
            time: self.current_time,
            time_text,
            meridiem,
            active_ring: self.active_ring,
            temperature,
            temperature_text: TemperatureModel::formatted(temperature),
            uv_index: self.uv.current(),
            uv_risk: self.uv.current_risk(),
            rain_probability,
            rain_text: RainModel::formatted_probability(rain_probability),
            wind_speed,
            wind_text: WindModel::formatted(wind_speed, &wind_direction),
            wind_direction,
            sun_event,
            sun_event_time,
            in_active_period: highlighted.iter().any(|period| period.contains(position)),
            crossed_boundary: crossed_boundary(highlighted, previous, position),
            highlighted: highlighted.to_vec(),
        }
    }
}
