//! Weather provider boundary.
//!
//! A provider returns timestamped hourly samples and a sunrise/sunset pair.
//! [`ForecastBundle::align`] places the next 24 hours of samples into
//! hour-of-day slots so the dial models can take them wholesale.

use crate::clock::HOURS_PER_DAY;
use crate::models::Location;
use crate::series::HourlySeries;
use crate::solar::SolarEvents;
use crate::{CircadianError, Result};
use async_trait::async_trait;
use chrono::{DateTime, DurationRound, NaiveDate, NaiveDateTime, TimeDelta, Timelike, Utc};
use chrono_tz::Tz;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

/// One hour of forecast data as delivered by a provider
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HourlySample {
    /// Start of the hour, UTC
    pub timestamp: DateTime<Utc>,
    pub temperature_f: f64,
    pub uv_index: f64,
    /// Probability of precipitation in `[0, 1]`
    pub precipitation_chance: f64,
    pub wind_speed_mph: f64,
    /// Compass direction, abbreviated (`"NE"`) or spelled out (`"northeast"`)
    pub wind_direction: String,
}

/// Hourly samples together with the timezone they should be displayed in
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HourlyForecast {
    pub timezone: Tz,
    pub samples: Vec<HourlySample>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SunTimes {
    pub sunrise: DateTime<Utc>,
    pub sunset: DateTime<Utc>,
}

/// Everything one refresh needs
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ForecastBundle {
    pub timezone: Tz,
    pub hourly: Vec<HourlySample>,
    pub sunrise: DateTime<Utc>,
    pub sunset: DateTime<Utc>,
}

/// The five hourly series the dial displays
#[derive(Debug, Clone, PartialEq)]
pub struct ForecastSeries {
    pub temperature: HourlySeries<f64>,
    pub uv: HourlySeries<f64>,
    pub rain: HourlySeries<f64>,
    pub wind_speed: HourlySeries<f64>,
    pub wind_direction: HourlySeries<String>,
}

/// A bundle mapped onto the local day
#[derive(Debug, Clone, PartialEq)]
pub struct AlignedForecast {
    pub series: ForecastSeries,
    pub sunrise: NaiveDateTime,
    pub sunset: NaiveDateTime,
    /// Number of samples that fell inside the 24-hour window
    pub hours_covered: usize,
}

/// Source of forecast data for a location.
///
/// Implementations must be `Send + Sync` so a refresh can run on any executor.
#[async_trait]
pub trait WeatherProvider: Send + Sync {
    /// Hourly samples covering at least the next 24 hours
    async fn hourly_forecast(&self, location: &Location) -> Result<HourlyForecast>;

    /// Sunrise and sunset for `date`.
    ///
    /// The default computes them from the coordinates.
    async fn sun_times(&self, location: &Location, date: NaiveDate) -> Result<SunTimes> {
        if !location.is_valid() {
            return Err(CircadianError::validation(format!(
                "coordinates out of range: {}",
                location.format_coordinates()
            )));
        }
        let events = SolarEvents::for_location(location.latitude, location.longitude, date, &Utc);
        Ok(SunTimes {
            sunrise: events.sunrise().and_utc(),
            sunset: events.sunset().and_utc(),
        })
    }
}

/// Fetch hourly data and sun times concurrently and combine them.
pub async fn fetch_bundle<P>(provider: &P, location: &Location, date: NaiveDate) -> Result<ForecastBundle>
where
    P: WeatherProvider + ?Sized,
{
    let (forecast, sun) = futures::try_join!(
        provider.hourly_forecast(location),
        provider.sun_times(location, date)
    )?;

    Ok(ForecastBundle {
        timezone: forecast.timezone,
        hourly: forecast.samples,
        sunrise: sun.sunrise,
        sunset: sun.sunset,
    })
}

impl ForecastBundle {
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Place samples from the hour containing `now` up to 24 hours ahead at
    /// their local hour of day. Hours without a sample keep `prior` values.
    pub fn align(&self, now: DateTime<Utc>, prior: ForecastSeries) -> Result<AlignedForecast> {
        let window_start = now.duration_trunc(TimeDelta::hours(1)).unwrap_or(now);
        let window_end = window_start + TimeDelta::hours(HOURS_PER_DAY as i64);

        let in_window: Vec<(usize, &HourlySample)> = self
            .hourly
            .iter()
            .filter(|sample| sample.timestamp >= window_start && sample.timestamp < window_end)
            .map(|sample| {
                let hour = sample.timestamp.with_timezone(&self.timezone).hour() as usize;
                (hour, sample)
            })
            .collect();

        if in_window.len() < HOURS_PER_DAY {
            warn!(
                covered = in_window.len(),
                total = self.hourly.len(),
                "forecast does not cover the next 24 hours"
            );
        }

        let series = ForecastSeries {
            temperature: prior
                .temperature
                .overlay(in_window.iter().map(|(hour, s)| (*hour, s.temperature_f))),
            uv: prior
                .uv
                .overlay(in_window.iter().map(|(hour, s)| (*hour, s.uv_index.max(0.0)))),
            rain: prior.rain.overlay(
                in_window
                    .iter()
                    .map(|(hour, s)| (*hour, s.precipitation_chance.clamp(0.0, 1.0))),
            ),
            wind_speed: prior
                .wind_speed
                .overlay(in_window.iter().map(|(hour, s)| (*hour, s.wind_speed_mph.max(0.0)))),
            wind_direction: prior.wind_direction.overlay(
                in_window
                    .iter()
                    .map(|(hour, s)| (*hour, abbreviate_wind_direction(&s.wind_direction))),
            ),
        };

        let sunrise = self.sunrise.with_timezone(&self.timezone).naive_local();
        let sunset = self.sunset.with_timezone(&self.timezone).naive_local();
        if sunset <= sunrise {
            return Err(CircadianError::provider(format!(
                "sunset {sunset} is not after sunrise {sunrise}"
            )));
        }

        debug!(covered = in_window.len(), %sunrise, %sunset, "aligned forecast");

        Ok(AlignedForecast {
            series,
            sunrise,
            sunset,
            hours_covered: in_window.len(),
        })
    }
}

/// Provider serving a fixed bundle, e.g. one loaded from JSON
#[derive(Debug, Clone)]
pub struct StaticProvider {
    bundle: ForecastBundle,
}

impl StaticProvider {
    #[must_use]
    pub fn new(bundle: ForecastBundle) -> Self {
        Self { bundle }
    }

    pub fn from_json(json: &str) -> Result<Self> {
        ForecastBundle::from_json(json).map(Self::new)
    }
}

#[async_trait]
impl WeatherProvider for StaticProvider {
    async fn hourly_forecast(&self, _location: &Location) -> Result<HourlyForecast> {
        Ok(HourlyForecast {
            timezone: self.bundle.timezone,
            samples: self.bundle.hourly.clone(),
        })
    }

    async fn sun_times(&self, _location: &Location, _date: NaiveDate) -> Result<SunTimes> {
        Ok(SunTimes {
            sunrise: self.bundle.sunrise,
            sunset: self.bundle.sunset,
        })
    }
}

const SIXTEEN_POINTS: [&str; 16] = [
    "N", "NNE", "NE", "ENE", "E", "ESE", "SE", "SSE", "S", "SSW", "SW", "WSW", "W", "WNW", "NW",
    "NNW",
];

/// Short compass label for a provider direction.
///
/// Spelled-out names map to their abbreviation, labels that already are
/// abbreviations pass through, anything else becomes its first two letters.
#[must_use]
pub fn abbreviate_wind_direction(direction: &str) -> String {
    let trimmed = direction.trim();
    let abbreviation = match trimmed.to_lowercase().as_str() {
        "north" => "N",
        "northeast" => "NE",
        "east" => "E",
        "southeast" => "SE",
        "south" => "S",
        "southwest" => "SW",
        "west" => "W",
        "northwest" => "NW",
        _ => {
            let upper = trimmed.to_uppercase();
            if SIXTEEN_POINTS.contains(&upper.as_str()) {
                return upper;
            }
            return upper.chars().take(2).collect();
        }
    };
    abbreviation.to_string()
}

/// 16-point compass label for a bearing in degrees
#[must_use]
pub fn cardinal_from_degrees(degrees: f64) -> &'static str {
    let normalized = degrees.rem_euclid(360.0).round() as u16;
    match normalized {
        0..=11 | 349..=360 => "N",
        12..=33 => "NNE",
        34..=56 => "NE",
        57..=78 => "ENE",
        79..=101 => "E",
        102..=123 => "ESE",
        124..=146 => "SE",
        147..=168 => "SSE",
        169..=191 => "S",
        192..=213 => "SSW",
        214..=236 => "SW",
        237..=258 => "WSW",
        259..=281 => "W",
        282..=303 => "WNW",
        304..=326 => "NW",
        327..=348 => "NNW",
        _ => "N",
    }
}
