//! LeetCode recent-submissions client (the judge adapter).
//!
//! LeetCode has no REST endpoint for this; the public site queries its GraphQL
//! API with `recentSubmissionList`. There is no pagination: the service only
//! keeps a user's most recent submissions.
//!
//! # Failure policy
//!
//! [`LeetCodeClient::fetch_recent`] never fails. Any error is logged and the
//! result is empty.

use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::Deserialize;
use serde_json::json;
use tracing::{debug, warn};

use super::cache::ResponseCache;
use super::JudgeSource;
use crate::error::FetchError;

/// Base URL for LeetCode.
const LEETCODE_BASE: &str = "https://leetcode.com";

/// How many submissions to ask for. Matches the public client library default.
pub const RECENT_SUBMISSION_LIMIT: u32 = 20;

const RECENT_SUBMISSIONS_QUERY: &str = "query recentSubmissions($username: String!, $limit: Int) { \
    recentSubmissionList(username: $username, limit: $limit) { \
        title titleSlug timestamp statusDisplay lang \
    } \
}";

/// Client for a single user's recent LeetCode submissions.
#[derive(Clone)]
pub struct LeetCodeClient {
    client: reqwest::Client,
    base_url: String,
    username: String,
    user_agent: String,
    cache: ResponseCache<(), Vec<LeetCodeSubmission>>,
}

impl LeetCodeClient {
    /// Create a client for `username` against leetcode.com.
    pub fn new(username: &str, user_agent: &str, cache_ttl: Duration) -> Self {
        Self::with_base_url(LEETCODE_BASE, username, user_agent, cache_ttl)
    }

    /// Create a client with a custom base URL (for testing).
    pub fn with_base_url(
        base_url: &str,
        username: &str,
        user_agent: &str,
        cache_ttl: Duration,
    ) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
            username: username.to_string(),
            user_agent: user_agent.to_string(),
            cache: ResponseCache::new(cache_ttl),
        }
    }

    /// Fetch the most recent submissions, newest first as LeetCode returns them.
    pub async fn fetch_recent(&self) -> Vec<LeetCodeSubmission> {
        if let Some(submissions) = self.cache.get(&()).await {
            debug!(source = "leetcode", count = submissions.len(), "Cache hit");
            return submissions;
        }

        match self.try_fetch_recent().await {
            Ok(submissions) => {
                debug!(source = "leetcode", count = submissions.len(), "Fetched submissions");
                self.cache.insert((), submissions.clone()).await;
                submissions
            }
            Err(e) => {
                warn!(
                    source = "leetcode",
                    kind = e.kind(),
                    error = %e,
                    "Failed to fetch LeetCode activity"
                );
                Vec::new()
            }
        }
    }

    async fn try_fetch_recent(&self) -> Result<Vec<LeetCodeSubmission>, FetchError> {
        let url = format!("{}/graphql", self.base_url);
        let body = json!({
            "operationName": "recentSubmissions",
            "query": RECENT_SUBMISSIONS_QUERY,
            "variables": {
                "username": self.username,
                "limit": RECENT_SUBMISSION_LIMIT,
            },
        });

        let response = self
            .client
            .post(&url)
            .header(reqwest::header::USER_AGENT, &self.user_agent)
            .header(reqwest::header::REFERER, format!("{}/", self.base_url))
            .header(reqwest::header::ORIGIN, &self.base_url)
            .json(&body)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Upstream {
                status: status.as_u16(),
            });
        }

        let text = response.text().await?;
        decode_submissions(&text)
    }
}

#[async_trait]
impl JudgeSource for LeetCodeClient {
    async fn fetch_recent(&self) -> Vec<LeetCodeSubmission> {
        LeetCodeClient::fetch_recent(self).await
    }
}

// ============================================================================
// Response types
// ============================================================================

/// One submission as reported by LeetCode.
#[derive(Debug, Clone, PartialEq)]
pub struct LeetCodeSubmission {
    /// Epoch seconds exactly as the upstream encoded them.
    pub raw_timestamp: String,

    /// `raw_timestamp` as an absolute time.
    pub submitted_at: DateTime<Utc>,

    /// Problem title.
    pub title: String,

    /// URL slug of the problem.
    pub title_slug: String,

    /// Judge verdict, e.g. "Accepted" or "Wrong Answer".
    pub status_display: String,

    /// Submission language, e.g. "rust".
    pub lang: String,
}

/// LeetCode sends the timestamp as a string, but be lenient about numbers.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum EpochSeconds {
    Text(String),
    Number(i64),
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct WireSubmission {
    timestamp: EpochSeconds,
    #[serde(default)]
    title: String,
    #[serde(default)]
    title_slug: String,
    #[serde(default)]
    status_display: String,
    #[serde(default)]
    lang: String,
}

impl WireSubmission {
    fn into_submission(self) -> Option<LeetCodeSubmission> {
        let raw_timestamp = match self.timestamp {
            EpochSeconds::Text(s) => s.trim().to_string(),
            EpochSeconds::Number(n) => n.to_string(),
        };
        let seconds: i64 = raw_timestamp.parse().ok()?;
        let submitted_at = DateTime::from_timestamp(seconds, 0)?;

        Some(LeetCodeSubmission {
            raw_timestamp,
            submitted_at,
            title: self.title,
            title_slug: self.title_slug,
            status_display: self.status_display,
            lang: self.lang,
        })
    }
}

#[derive(Debug, Deserialize)]
struct GraphQlResponse {
    #[serde(default)]
    data: Option<RecentSubmissionsData>,
    #[serde(default)]
    errors: Option<Vec<GraphQlError>>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RecentSubmissionsData {
    #[serde(default)]
    recent_submission_list: Option<Vec<serde_json::Value>>,
}

#[derive(Debug, Deserialize)]
struct GraphQlError {
    #[serde(default)]
    message: String,
}

/// Decode a GraphQL response body into submissions.
///
/// A null submission list (unknown or private user) is an empty result, not an
/// error. Entries without a parseable timestamp are skipped.
pub fn decode_submissions(body: &str) -> Result<Vec<LeetCodeSubmission>, FetchError> {
    let response: GraphQlResponse = serde_json::from_str(body)?;

    if let Some(errors) = response.errors.filter(|errors| !errors.is_empty()) {
        let message = errors
            .into_iter()
            .map(|e| e.message)
            .collect::<Vec<_>>()
            .join("; ");
        return Err(FetchError::Api(message));
    }

    let values = response
        .data
        .and_then(|d| d.recent_submission_list)
        .unwrap_or_default();

    let mut submissions = Vec::with_capacity(values.len());
    for value in values {
        let parsed = serde_json::from_value::<WireSubmission>(value)
            .ok()
            .and_then(WireSubmission::into_submission);
        match parsed {
            Some(submission) => submissions.push(submission),
            None => warn!(source = "leetcode", "Skipping malformed submission"),
        }
    }

    Ok(submissions)
}
