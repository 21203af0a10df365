//! Error types and handling for the Circadian core

use thiserror::Error;

/// Main error type for the Circadian core
#[derive(Error, Debug)]
pub enum CircadianError {
    /// Configuration-related errors
    #[error("Configuration error: {message}")]
    Config { message: String },

    /// Weather or location provider failures
    #[error("Provider error: {message}")]
    Provider { message: String },

    /// Input validation errors
    #[error("Invalid input: {message}")]
    Validation { message: String },

    /// Forecast data that could not be decoded
    #[error("Invalid forecast data: {source}")]
    Forecast {
        #[from]
        source: serde_json::Error,
    },
}

impl CircadianError {
    /// Create a new configuration error
    pub fn config<S: Into<String>>(message: S) -> Self {
        Self::Config {
            message: message.into(),
        }
    }

    /// Create a new provider error
    pub fn provider<S: Into<String>>(message: S) -> Self {
        Self::Provider {
            message: message.into(),
        }
    }

    /// Create a new validation error
    pub fn validation<S: Into<String>>(message: S) -> Self {
        Self::Validation {
            message: message.into(),
        }
    }

    /// Get a user-friendly error message
    #[must_use]
    pub fn user_message(&self) -> String {
        match self {
            CircadianError::Config { message } => {
                format!("Configuration error: {message}. Please check your config file.")
            }
            CircadianError::Provider { message } => {
                format!("Failed to fetch weather: {message}")
            }
            CircadianError::Validation { message } => {
                format!("Invalid input: {message}")
            }
            CircadianError::Forecast { .. } => {
                "Could not read the forecast. Showing the previous data.".to_string()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_creation() {
        let config_err = CircadianError::config("bad ring width");
        assert!(matches!(config_err, CircadianError::Config { .. }));

        let provider_err = CircadianError::provider("location not available");
        assert!(matches!(provider_err, CircadianError::Provider { .. }));

        let validation_err = CircadianError::validation("series has 23 samples");
        assert!(matches!(validation_err, CircadianError::Validation { .. }));
    }

    #[test]
    fn test_user_messages() {
        let config_err = CircadianError::config("test");
        assert_eq!(
            config_err.user_message(),
            "Configuration error: test. Please check your config file."
        );

        let provider_err = CircadianError::provider("timeout");
        assert_eq!(provider_err.user_message(), "Failed to fetch weather: timeout");

        let validation_err = CircadianError::validation("test input");
        assert!(validation_err.user_message().contains("test input"));
    }

    #[test]
    fn test_json_error_conversion() {
        let json_err = serde_json::from_str::<f64>("not a number").unwrap_err();
        let err: CircadianError = json_err.into();
        assert!(matches!(err, CircadianError::Forecast { .. }));
        assert!(err.to_string().starts_with("Invalid forecast data"));
        assert!(err.user_message().contains("previous data"));
    }
}
