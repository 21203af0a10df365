//! Ring identity and geometry on the dial.
//!
//! Rings are nested from the outside in: temperature, daylight, UV, rain,
//! wind. While one ring is dragged it grows to the outer size and the
//! others are hidden.

use crate::CircadianError;
use serde::{Deserialize, Serialize};
use std::f64::consts::PI;
use std::fmt;
use std::str::FromStr;

/// The ring currently being dragged. "No ring" is `Option::None`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ActiveRing {
    Temperature,
    Daylight,
    Uv,
    Rain,
    Wind,
}

impl ActiveRing {
    /// Outermost first
    pub const ALL: [ActiveRing; 5] = [
        ActiveRing::Temperature,
        ActiveRing::Daylight,
        ActiveRing::Uv,
        ActiveRing::Rain,
        ActiveRing::Wind,
    ];

    /// Nesting depth, 0 for the outermost ring
    #[must_use]
    pub fn depth(self) -> u8 {
        match self {
            ActiveRing::Temperature => 0,
            ActiveRing::Daylight => 1,
            ActiveRing::Uv => 2,
            ActiveRing::Rain => 3,
            ActiveRing::Wind => 4,
        }
    }

    #[must_use]
    pub fn tag(self) -> &'static str {
        match self {
            ActiveRing::Temperature => "temperature",
            ActiveRing::Daylight => "daylight",
            ActiveRing::Uv => "uv",
            ActiveRing::Rain => "rain",
            ActiveRing::Wind => "wind",
        }
    }

    /// Whether the ring reserves a gap at midnight (the temperature ring is a closed loop)
    #[must_use]
    pub fn has_midnight_gap(self) -> bool {
        !matches!(self, ActiveRing::Temperature)
    }
}

impl fmt::Display for ActiveRing {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.tag())
    }
}

impl FromStr for ActiveRing {
    type Err = CircadianError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ActiveRing::ALL
            .into_iter()
            .find(|ring| ring.tag().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| CircadianError::validation(format!("unknown ring '{s}'")))
    }
}

/// Ring geometry in view points
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RingLayout {
    /// Diameter of the outermost ring
    #[serde(default = "default_base_size")]
    pub base_size: f64,
    /// Stroke width of an idle ring
    #[serde(default = "default_ring_width")]
    pub ring_width: f64,
    /// Space between neighbouring rings
    #[serde(default = "default_ring_spacing")]
    pub ring_spacing: f64,
    /// Extra stroke width while a ring is dragged
    #[serde(default = "default_active_width_boost")]
    pub active_width_boost: f64,
    /// Midnight gap length of an idle ring
    #[serde(default = "default_midnight_gap")]
    pub midnight_gap: f64,
    /// Midnight gap length while a ring is dragged
    #[serde(default = "default_midnight_gap_expanded")]
    pub midnight_gap_expanded: f64,
}

fn default_base_size() -> f64 {
    280.0
}

fn default_ring_width() -> f64 {
    16.0
}

fn default_ring_spacing() -> f64 {
    16.0
}

fn default_active_width_boost() -> f64 {
    4.0
}

fn default_midnight_gap() -> f64 {
    8.0
}

fn default_midnight_gap_expanded() -> f64 {
    12.0
}

impl Default for RingLayout {
    fn default() -> Self {
        Self {
            base_size: default_base_size(),
            ring_width: default_ring_width(),
            ring_spacing: default_ring_spacing(),
            active_width_boost: default_active_width_boost(),
            midnight_gap: default_midnight_gap(),
            midnight_gap_expanded: default_midnight_gap_expanded(),
        }
    }
}

impl RingLayout {
    /// Diameter of `ring`; the dragged ring grows to the outer size
    #[must_use]
    pub fn ring_size(&self, ring: ActiveRing, active: Option<ActiveRing>) -> f64 {
        if active == Some(ring) {
            return self.base_size;
        }
        let depth = f64::from(ring.depth());
        self.base_size - self.ring_width * 2.0 * depth - self.ring_spacing * depth
    }

    #[must_use]
    pub fn ring_width(&self, ring: ActiveRing, active: Option<ActiveRing>) -> f64 {
        if active == Some(ring) {
            self.ring_width + self.active_width_boost
        } else {
            self.ring_width
        }
    }

    /// Midnight gap of `ring` as a fraction of its circumference
    #[must_use]
    pub fn midnight_gap_fraction(&self, ring: ActiveRing, active: Option<ActiveRing>) -> f64 {
        if !ring.has_midnight_gap() {
            return 0.0;
        }
        let gap = if active == Some(ring) {
            self.midnight_gap_expanded
        } else {
            self.midnight_gap
        };
        let circumference = PI * self.ring_size(ring, active);
        if circumference <= 0.0 {
            return 0.0;
        }
        gap / circumference
    }

    /// All rings show while idle; during a drag only the dragged one does
    #[must_use]
    pub fn is_visible(ring: ActiveRing, active: Option<ActiveRing>) -> bool {
        active.is_none_or(|active| active == ring)
    }
}
