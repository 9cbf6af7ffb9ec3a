//! Seasonal modes for the background animation.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Datelike, Utc};
use serde::{Deserialize, Serialize};

/// Viewports narrower than this get half as many particles.
pub const NARROW_VIEWPORT_WIDTH: f64 = 768.0;

/// One of four mutually exclusive animation behaviour sets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Season {
    /// Falling sakura petals, pushed away by the pointer.
    Spring,
    /// Wandering fireflies, drawn toward the pointer.
    Summer,
    /// Tumbling leaves that swirl around the pointer.
    Autumn,
    /// Snow that the pointer blows about like wind.
    Winter,
}

impl Season {
    /// Season for a calendar month (1 = January).
    ///
    /// March–May is spring, June–August summer, September–November autumn,
    /// and everything else winter.
    pub fn from_month(month: u32) -> Self {
        match month {
            3..=5 => Season::Spring,
            6..=8 => Season::Summer,
            9..=11 => Season::Autumn,
            _ => Season::Winter,
        }
    }

    /// Pick the season for `now`, unless an override is configured.
    pub fn select(now: DateTime<Utc>, forced: Option<Season>) -> Self {
        forced.unwrap_or_else(|| Season::from_month(now.month()))
    }

    /// Size of the particle pool for a viewport of the given width.
    pub fn particle_count(&self, viewport_width: f64) -> usize {
        let base = if viewport_width < NARROW_VIEWPORT_WIDTH {
            30.0_f64
        } else {
            60.0_f64
        };
        let factor = match self {
            Season::Spring => 0.8,
            Season::Summer => 0.6,
            Season::Autumn => 0.7,
            Season::Winter => 1.5,
        };
        (base * factor).round() as usize
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Season::Spring => "spring",
            Season::Summer => "summer",
            Season::Autumn => "autumn",
            Season::Winter => "winter",
        }
    }
}

impl fmt::Display for Season {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown season: {0}")]
pub struct UnknownSeason(pub String);

impl FromStr for Season {
    type Err = UnknownSeason;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "spring" => Ok(Season::Spring),
            "summer" => Ok(Season::Summer),
            "autumn" | "fall" => Ok(Season::Autumn),
            "winter" => Ok(Season::Winter),
            other => Err(UnknownSeason(other.to_string())),
        }
    }
}
