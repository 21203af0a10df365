//! Configuration management for the Circadian dial
//!
//! Handles loading configuration from files and environment variables,
//! and validates ring geometry and threshold settings.

use crate::CircadianError;
use crate::models::rain::DEFAULT_RAIN_RULE;
use crate::models::wind::DEFAULT_WIND_RULE;
use crate::periods::PeriodRule;
use crate::ring::RingLayout;
use anyhow::{Context, Result};
use config::{Config, Environment, File};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Root configuration structure
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CircadianConfig {
    /// Ring geometry
    #[serde(default)]
    pub layout: RingLayout,
    /// Rain period thresholds
    #[serde(default)]
    pub rain: RainConfig,
    /// Wind period thresholds
    #[serde(default)]
    pub wind: WindConfig,
    /// Default daylight anchors used before the first forecast
    #[serde(default)]
    pub daylight: DaylightConfig,
    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Rain ring thresholds (precipitation probability)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RainConfig {
    /// Probabilities strictly above this value are active
    #[serde(default = "default_rain_threshold")]
    pub threshold: f64,
    /// Probability mapped to full intensity
    #[serde(default = "default_rain_ceiling")]
    pub ceiling: f64,
    /// Dry hours bridged between neighbouring periods
    #[serde(default = "default_rain_merge_gap")]
    pub max_merge_gap_hours: usize,
}

/// Wind ring thresholds (mph)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct WindConfig {
    /// Speeds strictly above this value are active
    #[serde(default = "default_wind_threshold")]
    pub threshold: f64,
    /// Speed mapped to full intensity
    #[serde(default = "default_wind_ceiling")]
    pub ceiling: f64,
    /// Calm hours bridged between neighbouring periods
    #[serde(default = "default_wind_merge_gap")]
    pub max_merge_gap_hours: usize,
}

/// Default sunrise/sunset shown until real data arrives
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DaylightConfig {
    /// Sunrise as `HH:MM`
    #[serde(default = "default_sunrise")]
    pub sunrise: String,
    /// Sunset as `HH:MM`
    #[serde(default = "default_sunset")]
    pub sunset: String,
}

/// Logging configuration settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level (error, warn, info, debug, trace)
    #[serde(default = "default_log_level")]
    pub level: String,
    /// Log format (pretty or json)
    #[serde(default = "default_log_format")]
    pub format: String,
}

// Default value functions
fn default_rain_threshold() -> f64 {
    DEFAULT_RAIN_RULE.threshold
}

fn default_rain_ceiling() -> f64 {
    DEFAULT_RAIN_RULE.ceiling
}

fn default_rain_merge_gap() -> usize {
    DEFAULT_RAIN_RULE.max_merge_gap_hours
}

fn default_wind_threshold() -> f64 {
    DEFAULT_WIND_RULE.threshold
}

fn default_wind_ceiling() -> f64 {
    DEFAULT_WIND_RULE.ceiling
}

fn default_wind_merge_gap() -> usize {
    DEFAULT_WIND_RULE.max_merge_gap_hours
}

fn default_sunrise() -> String {
    "06:30".to_string()
}

fn default_sunset() -> String {
    "19:30".to_string()
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_log_format() -> String {
    "pretty".to_string()
}

impl Default for CircadianConfig {
    fn default() -> Self {
        Self {
            layout: RingLayout::default(),
            rain: RainConfig::default(),
            wind: WindConfig::default(),
            daylight: DaylightConfig::default(),
            logging: LoggingConfig::default(),
        }
    }
}

impl Default for RainConfig {
    fn default() -> Self {
        Self {
            threshold: default_rain_threshold(),
            ceiling: default_rain_ceiling(),
            max_merge_gap_hours: default_rain_merge_gap(),
        }
    }
}

impl Default for WindConfig {
    fn default() -> Self {
        Self {
            threshold: default_wind_threshold(),
            ceiling: default_wind_ceiling(),
            max_merge_gap_hours: default_wind_merge_gap(),
        }
    }
}

impl Default for DaylightConfig {
    fn default() -> Self {
        Self {
            sunrise: default_sunrise(),
            sunset: default_sunset(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
        }
    }
}

impl From<RainConfig> for PeriodRule {
    fn from(value: RainConfig) -> Self {
        PeriodRule {
            threshold: value.threshold,
            ceiling: value.ceiling,
            max_merge_gap_hours: value.max_merge_gap_hours,
        }
    }
}

impl From<WindConfig> for PeriodRule {
    fn from(value: WindConfig) -> Self {
        PeriodRule {
            threshold: value.threshold,
            ceiling: value.ceiling,
            max_merge_gap_hours: value.max_merge_gap_hours,
        }
    }
}

impl DaylightConfig {
    /// Parsed `(sunrise, sunset)` times of day
    pub fn anchors(&self) -> Result<(chrono::NaiveTime, chrono::NaiveTime)> {
        let parse = |label: &str, value: &str| {
            chrono::NaiveTime::parse_from_str(value, "%H:%M").map_err(|_| {
                CircadianError::config(format!("Invalid {label} time '{value}', expected HH:MM"))
            })
        };
        Ok((parse("sunrise", &self.sunrise)?, parse("sunset", &self.sunset)?))
    }
}

impl CircadianConfig {
    /// Load configuration from file and environment variables
    pub fn load() -> Result<Self> {
        Self::load_from_path(None)
    }

    /// Load configuration from specified path
    pub fn load_from_path(config_path: Option<PathBuf>) -> Result<Self> {
        let mut builder = Config::builder();

        // Load from file if path is provided or use default location
        let config_file = config_path.unwrap_or_else(|| {
            Self::get_config_path().unwrap_or_else(|| PathBuf::from("config.toml"))
        });

        if config_file.exists() {
            builder = builder.add_source(
                File::from(config_file.clone())
                    .required(false)
                    .format(config::FileFormat::Toml),
            );
        }

        // Add environment variable overrides, e.g. CIRCADIAN_WIND__THRESHOLD
        builder = builder.add_source(
            Environment::with_prefix("CIRCADIAN")
                .prefix_separator("_")
                .separator("__")
                .try_parsing(true),
        );

        let settings = builder
            .build()
            .with_context(|| "Failed to build configuration")?;

        let mut config: CircadianConfig = settings
            .try_deserialize()
            .with_context(|| "Failed to deserialize configuration")?;

        config.apply_defaults();
        config.validate()?;

        Ok(config)
    }

    /// Get the default configuration file path
    #[must_use]
    pub fn get_config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("circadian").join("config.toml"))
    }

    /// Repair zeroed or empty values
    pub fn apply_defaults(&mut self) {
        let layout = RingLayout::default();
        if self.layout.base_size <= 0.0 {
            self.layout.base_size = layout.base_size;
        }
        if self.layout.ring_width <= 0.0 {
            self.layout.ring_width = layout.ring_width;
        }
        if self.rain.ceiling <= 0.0 {
            self.rain.ceiling = default_rain_ceiling();
        }
        if self.wind.ceiling <= 0.0 {
            self.wind.ceiling = default_wind_ceiling();
        }
        if self.daylight.sunrise.is_empty() {
            self.daylight.sunrise = default_sunrise();
        }
        if self.daylight.sunset.is_empty() {
            self.daylight.sunset = default_sunset();
        }
        if self.logging.level.is_empty() {
            self.logging.level = default_log_level();
        }
        if self.logging.format.is_empty() {
            self.logging.format = default_log_format();
        }
    }

    /// Validate all configuration settings
    pub fn validate(&self) -> Result<()> {
        self.validate_layout()?;
        self.validate_thresholds()?;
        self.validate_string_values()?;
        self.daylight.anchors()?;
        Ok(())
    }

    fn validate_layout(&self) -> Result<()> {
        let layout = &self.layout;
        let innermost = layout.ring_size(crate::ring::ActiveRing::Wind, None);
        if innermost <= 0.0 {
            return Err(CircadianError::config(format!(
                "Ring layout leaves no room for the inner rings (wind ring size {innermost})"
            ))
            .into());
        }

        if layout.midnight_gap < 0.0 || layout.midnight_gap_expanded < 0.0 {
            return Err(CircadianError::config("Midnight gap cannot be negative").into());
        }

        if layout.midnight_gap_expanded > layout.base_size {
            return Err(
                CircadianError::config("Midnight gap cannot exceed the ring size").into(),
            );
        }

        Ok(())
    }

    fn validate_thresholds(&self) -> Result<()> {
        if !(0.0..=1.0).contains(&self.rain.threshold) {
            return Err(CircadianError::config(
                "Rain threshold is a probability and must be between 0 and 1",
            )
            .into());
        }

        if self.wind.threshold < 0.0 {
            return Err(CircadianError::config("Wind threshold cannot be negative").into());
        }

        let merge_gaps = [
            ("rain", self.rain.max_merge_gap_hours),
            ("wind", self.wind.max_merge_gap_hours),
        ];
        for (name, merge_gap) in merge_gaps {
            if merge_gap > 23 {
                return Err(CircadianError::config(format!(
                    "{name} merge gap cannot exceed 23 hours"
                ))
                .into());
            }
        }

        Ok(())
    }

    /// Validate string configuration values
    fn validate_string_values(&self) -> Result<()> {
        let valid_log_levels = ["error", "warn", "info", "debug", "trace"];
        if !valid_log_levels.contains(&self.logging.level.as_str()) {
            return Err(CircadianError::config(format!(
                "Invalid log level '{}'. Must be one of: {}",
                self.logging.level,
                valid_log_levels.join(", ")
            ))
            .into());
        }

        let valid_log_formats = ["pretty", "json"];
        if !valid_log_formats.contains(&self.logging.format.as_str()) {
            return Err(CircadianError::config(format!(
                "Invalid log format '{}'. Must be one of: {}",
                self.logging.format,
                valid_log_formats.join(", ")
            ))
            .into());
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_default_config() {
        let config = CircadianConfig::default();
        assert_eq!(config.layout.base_size, 280.0);
        assert_eq!(config.rain.threshold, 0.1);
        assert_eq!(config.wind.threshold, 5.0);
        assert_eq!(config.wind.max_merge_gap_hours, 3);
        assert_eq!(config.logging.level, "info");
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_default_wind_keeps_its_own_rule() {
        let config = CircadianConfig::default();
        assert_eq!(PeriodRule::from(config.wind), DEFAULT_WIND_RULE);
        assert_eq!(PeriodRule::from(config.rain), DEFAULT_RAIN_RULE);
    }

    #[test]
    fn test_partial_wind_section_keeps_wind_defaults() {
        let mut file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
        writeln!(file, "[wind]\nthreshold = 7.0\n").unwrap();

        let config = CircadianConfig::load_from_path(Some(file.path().to_path_buf())).unwrap();
        assert_eq!(config.wind.threshold, 7.0);
        assert_eq!(config.wind.ceiling, 30.0);
        assert_eq!(config.wind.max_merge_gap_hours, 3);
        assert_eq!(config.rain.max_merge_gap_hours, 0);
    }

    #[test]
    fn test_config_validation_invalid_log_level() {
        let mut config = CircadianConfig::default();
        config.logging.level = "invalid".to_string();
        let result = config.validate();
        assert!(result.is_err());
        assert!(result.unwrap_err().to_string().contains("Invalid log level"));
    }

    #[test]
    fn test_config_validation_rain_threshold() {
        let mut config = CircadianConfig::default();
        config.rain.threshold = 1.5;
        let result = config.validate();
        assert!(result.unwrap_err().to_string().contains("Rain threshold"));
    }

    #[test]
    fn test_config_validation_layout() {
        let mut config = CircadianConfig::default();
        config.layout.ring_width = 40.0;
        let result = config.validate();
        assert!(result.unwrap_err().to_string().contains("no room"));
    }

    #[test]
    fn test_config_validation_daylight() {
        let mut config = CircadianConfig::default();
        config.daylight.sunset = "7pm".to_string();
        assert!(config.validate().unwrap_err().to_string().contains("sunset"));
    }

    #[test]
    fn test_apply_defaults_repairs_zeroes() {
        let mut config = CircadianConfig::default();
        config.layout.base_size = 0.0;
        config.wind.ceiling = 0.0;
        config.logging.format = String::new();
        config.apply_defaults();
        assert_eq!(config.layout.base_size, 280.0);
        assert_eq!(config.wind.ceiling, 30.0);
        assert_eq!(config.logging.format, "pretty");
    }

    #[test]
    fn test_load_from_file() {
        let mut file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
        writeln!(
            file,
            "[wind]\nthreshold = 8.0\nceiling = 40.0\nmax_merge_gap_hours = 2\n\n[layout]\nbase_size = 320.0\n"
        )
        .unwrap();

        let config = CircadianConfig::load_from_path(Some(file.path().to_path_buf())).unwrap();
        assert_eq!(config.wind.threshold, 8.0);
        assert_eq!(config.wind.max_merge_gap_hours, 2);
        assert_eq!(config.layout.base_size, 320.0);
        assert_eq!(config.layout.ring_width, 16.0);
        assert_eq!(config.rain.threshold, 0.1);
        assert_eq!(PeriodRule::from(config.wind).ceiling, 40.0);
    }

    #[test]
    fn test_config_path_generation() {
        if let Some(path) = CircadianConfig::get_config_path() {
            assert!(path.to_string_lossy().contains("circadian"));
            assert!(path.to_string_lossy().contains("config.toml"));
        }
    }
}
