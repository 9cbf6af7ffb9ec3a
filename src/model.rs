//! Data models for the activity feed.
//!
//! Everything here is built fresh for each request, never persisted, and never
//! mutated after construction.

use std::num::IntErrorKind;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Number of feed pages. This is a product limit, not a data limit: the code
/// host may have more history, but page 6 is never offered.
pub const MAX_PAGE: u32 = 5;

/// Where an activity came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActivitySource {
    /// Git hosting activity (GitHub).
    CodeHost,
    /// Competitive-programming judge submissions (LeetCode).
    Judge,
}

impl ActivitySource {
    /// Get a human-readable label.
    pub fn label(&self) -> &'static str {
        match self {
            ActivitySource::CodeHost => "GitHub",
            ActivitySource::Judge => "LeetCode",
        }
    }
}

/// One entry of the unified feed, independent of where it came from.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UnifiedActivity {
    /// Identifier, prefixed by source so ids never collide across sources.
    pub id: String,

    /// Source system.
    pub source: ActivitySource,

    /// When the activity happened.
    pub timestamp: DateTime<Utc>,

    /// Short uppercase label such as "PUSH", "PR MERGED" or "SOLVED".
    pub category: String,

    /// Repository short name or problem title.
    pub title: String,

    /// One-line supplementary text (commit message, branch, language).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub detail: Option<String>,

    /// Outcome text, present only for non-success outcomes.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,

    /// Absolute outbound URL.
    pub link: String,
}

/// One page of the unified feed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ActivityPage {
    /// Entries, newest first.
    pub entries: Vec<UnifiedActivity>,

    /// The page actually served, after clamping.
    pub current_page: u32,

    /// Always [`MAX_PAGE`].
    pub total_pages: u32,
}

impl ActivityPage {
    pub fn has_prev(&self) -> bool {
        self.current_page > 1
    }

    pub fn has_next(&self) -> bool {
        self.current_page < self.total_pages
    }
}

/// Query parameters accepted by the feed endpoints.
///
/// `page` is kept as raw text so that junk like `?page=abc` falls back to the
/// first page instead of rejecting the request.
#[derive(Debug, Default, Deserialize)]
pub struct PageQuery {
    pub page: Option<String>,
}

impl PageQuery {
    /// The requested page number, before clamping. Missing or non-numeric
    /// input means page 1. Numbers too large for `i64` saturate, so they
    /// still clamp to the nearest end of the range.
    pub fn requested_page(&self) -> i64 {
        let Some(raw) = self.page.as_deref() else {
            return 1;
        };

        match raw.trim().parse::<i64>() {
            Ok(page) => page,
            Err(e) => match e.kind() {
                IntErrorKind::PosOverflow => i64::MAX,
                IntErrorKind::NegOverflow => i64::MIN,
                _ => 1,
            },
        }
    }
}

/// Clamp a requested page into `[1, MAX_PAGE]`.
pub fn clamp_page(requested: i64) -> u32 {
    requested.clamp(1, i64::from(MAX_PAGE)) as u32
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clamp_page_bounds() {
        assert_eq!(clamp_page(0), 1);
        assert_eq!(clamp_page(-7), 1);
        assert_eq!(clamp_page(1), 1);
        assert_eq!(clamp_page(3), 3);
        assert_eq!(clamp_page(5), 5);
        assert_eq!(clamp_page(99), 5);
        assert_eq!(clamp_page(i64::MAX), 5);
    }

    #[test]
    fn test_requested_page_parsing() {
        let q = |p: Option<&str>| PageQuery {
            page: p.map(str::to_string),
        };

        assert_eq!(q(None).requested_page(), 1);
        assert_eq!(q(Some("abc")).requested_page(), 1);
        assert_eq!(q(Some("")).requested_page(), 1);
        assert_eq!(q(Some("3")).requested_page(), 3);
        assert_eq!(q(Some("-2")).requested_page(), -2);
    }

    #[test]
    fn test_overflowing_page_saturates() {
        let q = |p: &str| PageQuery {
            page: Some(p.to_string()),
        };

        assert_eq!(q("99999999999999999999").requested_page(), i64::MAX);
        assert_eq!(q("-99999999999999999999").requested_page(), i64::MIN);
        assert_eq!(clamp_page(q("99999999999999999999").requested_page()), MAX_PAGE);
        assert_eq!(clamp_page(q("-99999999999999999999").requested_page()), 1);
    }

    #[test]
    fn test_page_navigation_flags() {
        let page = |current_page| ActivityPage {
            entries: vec![],
            current_page,
            total_pages: MAX_PAGE,
        };

        assert!(!page(1).has_prev());
        assert!(page(1).has_next());
        assert!(page(5).has_prev());
        assert!(!page(5).has_next());
    }

    #[test]
    fn test_source_serializes_snake_case() {
        assert_eq!(
            serde_json::to_string(&ActivitySource::CodeHost).unwrap(),
            "\"code_host\""
        );
        assert_eq!(ActivitySource::Judge.label(), "LeetCode");
    }
}
