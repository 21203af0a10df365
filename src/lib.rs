//! Circadian - a 24-hour weather dial
//!
//! This library maps times of day to positions on a clock face, extracts
//! active rain and wind periods from hourly series, derives solar events from
//! a sunrise/sunset pair, and keeps the per-ring models the dial displays.

pub mod clock;
pub mod config;
pub mod dial;
pub mod error;
pub mod logging;
pub mod models;
pub mod periods;
pub mod provider;
pub mod ring;
pub mod series;
pub mod solar;

// Re-export core types for public API
pub use clock::{TimePosition, position_from_time, time_from_position};
pub use config::CircadianConfig;
pub use dial::{Dial, DialSnapshot, RefreshStatus};
pub use error::CircadianError;
pub use models::{
    DaylightModel, Location, RainModel, TemperatureModel, UvModel, UvRiskLevel, WindModel,
};
pub use periods::{ActivePeriod, PeriodRule, extract_periods};
pub use provider::{ForecastBundle, HourlySample, StaticProvider, WeatherProvider};
pub use ring::{ActiveRing, RingLayout};
pub use series::HourlySeries;
pub use solar::{SolarEvents, SunEvent};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Core result type used throughout the library
pub type Result<T> = std::result::Result<T, CircadianError>;
