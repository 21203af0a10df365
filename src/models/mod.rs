//! Per-ring data models
//!
//! Each model owns one hourly series plus its domain constants and answers
//! lookups by dial position:
//! - Temperature: hourly °F with min/max bounds
//! - Daylight: sunrise/sunset anchors and the derived solar events
//! - UV: hourly index with risk bands
//! - Rain: hourly probability and its active periods
//! - Wind: hourly speed, direction labels and active periods
//!
//! Setters replace data wholesale and recompute anything derived before
//! returning, so readers always see a consistent model.

pub mod daylight;
pub mod location;
pub mod rain;
pub mod temperature;
pub mod uv;
pub mod wind;

// Re-export all public types for convenient access
pub use daylight::DaylightModel;
pub use location::Location;
pub use rain::RainModel;
pub use temperature::TemperatureModel;
pub use uv::{UvModel, UvRiskLevel};
pub use wind::WindModel;
