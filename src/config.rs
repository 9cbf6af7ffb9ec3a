//! Runtime configuration, read from `FOLIO_*` environment variables.
//!
//! Every setting has a default, and unparseable values fall back to it, so a
//! bare `folio` invocation always starts.

use std::env;
use std::time::Duration;

use tracing::warn;

use crate::background::{BackgroundSettings, Season, Viewport};
use crate::data_sources::cache::DEFAULT_TTL;

pub const DEFAULT_PORT: u16 = 3000;
pub const DEFAULT_GITHUB_USER: &str = "kotaitos";
pub const DEFAULT_LEETCODE_USER: &str = "noai-kotaitos";
pub const DEFAULT_USER_AGENT: &str = "folio/0.1";

#[derive(Debug, Clone, PartialEq)]
pub struct AppConfig {
    pub port: u16,
    pub github_user: String,
    pub leetcode_user: String,
    /// Sent on every upstream request. GitHub rejects requests without one.
    pub user_agent: String,
    /// Upstream responses are reused for this long. Zero disables caching.
    pub cache_ttl: Duration,
    /// Debug override for the calendar season.
    pub forced_season: Option<Season>,
    /// `None` when the background animation is switched off.
    pub background: Option<BackgroundSettings>,
}

impl AppConfig {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build the config from any key lookup.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let text = |key: &str, default: &str| {
            lookup(key)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
                .unwrap_or_else(|| default.to_string())
        };

        let port = lookup("FOLIO_PORT")
            .and_then(|p| p.trim().parse().ok())
            .unwrap_or(DEFAULT_PORT);

        let cache_ttl = lookup("FOLIO_CACHE_TTL_SECS")
            .and_then(|s| s.trim().parse().ok())
            .map(Duration::from_secs)
            .unwrap_or(DEFAULT_TTL);

        let forced_season = lookup("FOLIO_SEASON")
            .filter(|s| !s.trim().is_empty())
            .and_then(|s| match s.parse::<Season>() {
                Ok(season) => Some(season),
                Err(e) => {
                    warn!(error = %e, "Ignoring FOLIO_SEASON, using the calendar");
                    None
                }
            });

        let background_enabled = lookup("FOLIO_BACKGROUND")
            .map(|v| !matches!(v.trim().to_ascii_lowercase().as_str(), "off" | "false" | "0"))
            .unwrap_or(true);

        let background = background_enabled.then(|| {
            let defaults = BackgroundSettings::default();
            let dimension = |key: &str, default: f64| {
                lookup(key)
                    .and_then(|v| v.trim().parse::<f64>().ok())
                    .filter(|v| v.is_finite() && *v > 0.0)
                    .unwrap_or(default)
            };
            let frame_period = lookup("FOLIO_FRAME_MILLIS")
                .and_then(|v| v.trim().parse::<u64>().ok())
                .filter(|ms| *ms > 0)
                .map(Duration::from_millis)
                .unwrap_or(defaults.frame_period);

            BackgroundSettings {
                viewport: Viewport {
                    width: dimension("FOLIO_VIEWPORT_WIDTH", defaults.viewport.width),
                    height: dimension("FOLIO_VIEWPORT_HEIGHT", defaults.viewport.height),
                },
                frame_period,
            }
        });

        Self {
            port,
            github_user: text("FOLIO_GITHUB_USER", DEFAULT_GITHUB_USER),
            leetcode_user: text("FOLIO_LEETCODE_USER", DEFAULT_LEETCODE_USER),
            user_agent: text("FOLIO_USER_AGENT", DEFAULT_USER_AGENT),
            cache_ttl,
            forced_season,
            background,
        }
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self::from_lookup(|_| None)
    }
}
