//! Terminal-styled HTML rendering of the activity feed.
//!
//! The page lives in `templates/feed.html`: a prompt-style header, one line per
//! activity, and `[<PREV] n/5 [NEXT>]` page controls. Askama escapes every
//! interpolated value, so upstream text never reaches the page raw.

use askama::Template;

use crate::model::{ActivityPage, ActivitySource, UnifiedActivity};

/// Timestamp shown at the start of each row, e.g. `Oct 03, 14:05` (UTC).
const TIMESTAMP_FORMAT: &str = "%b %d, %H:%M";

/// One feed page, ready to render.
#[derive(Template)]
#[template(path = "feed.html")]
pub struct FeedTemplate {
    rows: Vec<FeedRow>,
    current_page: u32,
    total_pages: u32,
    /// Target of the `[<PREV]` link, if there is a previous page.
    prev_page: Option<u32>,
    next_page: Option<u32>,
}

/// Display fields for one activity line.
#[derive(Debug, Clone, PartialEq)]
pub struct FeedRow {
    pub source_class: &'static str,
    pub timestamp: String,
    pub label: &'static str,
    pub category: String,
    pub link: String,
    pub title: String,
    /// `- detail (status)`, or whichever half is present.
    pub note: Option<String>,
}

impl From<&ActivityPage> for FeedTemplate {
    fn from(page: &ActivityPage) -> Self {
        Self {
            rows: page.entries.iter().map(FeedRow::from).collect(),
            current_page: page.current_page,
            total_pages: page.total_pages,
            prev_page: page.has_prev().then(|| page.current_page - 1),
            next_page: page.has_next().then(|| page.current_page + 1),
        }
    }
}

impl From<&UnifiedActivity> for FeedRow {
    fn from(entry: &UnifiedActivity) -> Self {
        let note = match (&entry.detail, &entry.status) {
            (Some(detail), Some(status)) => Some(format!("- {} ({})", detail, status)),
            (Some(detail), None) => Some(format!("- {}", detail)),
            (None, Some(status)) => Some(format!("({})", status)),
            (None, None) => None,
        };

        Self {
            source_class: match entry.source {
                ActivitySource::CodeHost => "code_host",
                ActivitySource::Judge => "judge",
            },
            timestamp: entry.timestamp.format(TIMESTAMP_FORMAT).to_string(),
            label: entry.source.label(),
            category: entry.category.clone(),
            link: entry.link.clone(),
            title: entry.title.clone(),
            note,
        }
    }
}
