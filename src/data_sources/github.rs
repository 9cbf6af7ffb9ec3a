//! GitHub public events client (the code-host adapter).
//!
//! Fetches one page of a user's public activity from the REST events API.
//! GitHub rejects requests without a `User-Agent`, so every call sets one.
//!
//! # API Reference
//!
//! See: <https://docs.github.com/en/rest/activity/events#list-public-events-for-a-user>
//!
//! # Failure policy
//!
//! [`GitHubClient::fetch_activity`] never fails. Transport errors, non-2xx
//! statuses and undecodable bodies are logged and turned into an empty page.

use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use tracing::{debug, warn};

use super::cache::ResponseCache;
use super::CodeHostSource;
use crate::error::FetchError;

/// Base URL for the GitHub REST API.
const GITHUB_API_BASE: &str = "https://api.github.com";

/// Number of events requested per page. GitHub allows up to 100; the feed
/// shows 30 at a time.
pub const EVENTS_PER_PAGE: u32 = 30;

/// Client for a single user's public GitHub event stream.
#[derive(Clone)]
pub struct GitHubClient {
    client: reqwest::Client,
    base_url: String,
    username: String,
    user_agent: String,
    cache: ResponseCache<u32, Vec<GitHubEvent>>,
}

impl GitHubClient {
    /// Create a client for `username` against the public GitHub API.
    pub fn new(username: &str, user_agent: &str, cache_ttl: Duration) -> Self {
        Self::with_base_url(GITHUB_API_BASE, username, user_agent, cache_ttl)
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

    /// Fetch one page of public events, newest first as GitHub returns them.
    ///
    /// `page` is passed through untouched; callers clamp it.
    pub async fn fetch_activity(&self, page: u32) -> Vec<GitHubEvent> {
        if let Some(events) = self.cache.get(&page).await {
            debug!(source = "github", page, count = events.len(), "Cache hit");
            return events;
        }

        match self.try_fetch_events(page).await {
            Ok(events) => {
                debug!(source = "github", page, count = events.len(), "Fetched events");
                self.cache.insert(page, events.clone()).await;
                events
            }
            Err(e) => {
                warn!(
                    source = "github",
                    page,
                    kind = e.kind(),
                    error = %e,
                    "Failed to fetch GitHub activity"
                );
                Vec::new()
            }
        }
    }

    async fn try_fetch_events(&self, page: u32) -> Result<Vec<GitHubEvent>, FetchError> {
        let url = format!(
            "{}/users/{}/events?per_page={}&page={}",
            self.base_url,
            urlencoding::encode(&self.username),
            EVENTS_PER_PAGE,
            page
        );

        let response = self
            .client
            .get(&url)
            .header(reqwest::header::USER_AGENT, &self.user_agent)
            .header(reqwest::header::ACCEPT, "application/vnd.github+json")
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Upstream {
                status: status.as_u16(),
            });
        }

        let body = response.text().await?;
        decode_events(&body)
    }
}

#[async_trait]
impl CodeHostSource for GitHubClient {
    async fn fetch_activity(&self, page: u32) -> Vec<GitHubEvent> {
        GitHubClient::fetch_activity(self, page).await
    }
}

// ============================================================================
// Response types
// ============================================================================

/// A GitHub event after decoding, with its payload resolved by kind.
#[derive(Debug, Clone, PartialEq)]
pub struct GitHubEvent {
    /// Upstream event identifier.
    pub id: String,

    /// When GitHub recorded the event.
    pub created_at: DateTime<Utc>,

    /// The repository the event happened in.
    pub repo: RepoRef,

    /// Kind-specific payload.
    pub kind: GitHubEventKind,
}

/// Repository reference attached to every event.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct RepoRef {
    /// Full name in `owner/repo` form.
    pub name: String,
}

/// The event kinds the feed knows how to describe.
///
/// Anything else is kept as [`GitHubEventKind::Other`] with its raw
/// discriminator so it can still be labelled.
#[derive(Debug, Clone, PartialEq)]
pub enum GitHubEventKind {
    Push(PushPayload),
    PullRequest(PullRequestPayload),
    Create,
    Issues(IssuesPayload),
    Watch,
    Fork,
    Release(ReleasePayload),
    Other(String),
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct PushPayload {
    #[serde(default)]
    pub commits: Vec<CommitRef>,

    /// Full ref that was pushed, e.g. `refs/heads/main`.
    #[serde(default, rename = "ref")]
    pub git_ref: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct CommitRef {
    #[serde(default)]
    pub message: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct PullRequestPayload {
    #[serde(default)]
    pub action: Option<String>,

    #[serde(default)]
    pub pull_request: Option<PullRequestRef>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct PullRequestRef {
    #[serde(default)]
    pub title: Option<String>,

    /// Only present on some payloads; absent means "unknown".
    #[serde(default)]
    pub merged: Option<bool>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct IssuesPayload {
    #[serde(default)]
    pub action: Option<String>,

    #[serde(default)]
    pub issue: Option<IssueRef>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct IssueRef {
    #[serde(default)]
    pub title: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct ReleasePayload {
    #[serde(default)]
    pub release: Option<ReleaseRef>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct ReleaseRef {
    #[serde(default)]
    pub tag_name: Option<String>,
}

/// Wire shape of one event before the payload is resolved.
#[derive(Debug, Deserialize)]
struct WireEvent {
    id: String,
    #[serde(rename = "type")]
    kind: String,
    created_at: DateTime<Utc>,
    repo: RepoRef,
    #[serde(default)]
    payload: serde_json::Value,
}

impl From<WireEvent> for GitHubEvent {
    fn from(wire: WireEvent) -> Self {
        let kind = match wire.kind.as_str() {
            "PushEvent" => GitHubEventKind::Push(payload_or_default(wire.payload)),
            "PullRequestEvent" => GitHubEventKind::PullRequest(payload_or_default(wire.payload)),
            "CreateEvent" => GitHubEventKind::Create,
            "IssuesEvent" => GitHubEventKind::Issues(payload_or_default(wire.payload)),
            "WatchEvent" => GitHubEventKind::Watch,
            "ForkEvent" => GitHubEventKind::Fork,
            "ReleaseEvent" => GitHubEventKind::Release(payload_or_default(wire.payload)),
            _ => GitHubEventKind::Other(wire.kind),
        };

        Self {
            id: wire.id,
            created_at: wire.created_at,
            repo: wire.repo,
            kind,
        }
    }
}

/// Payloads are untrusted: a shape we cannot read degrades to "no details".
fn payload_or_default<T: DeserializeOwned + Default>(payload: serde_json::Value) -> T {
    serde_json::from_value(payload).unwrap_or_default()
}

/// Decode a response body into events.
///
/// The body must be a JSON array. Individual entries missing an id, type,
/// timestamp or repository are skipped with a warning rather than failing the
/// whole page.
pub fn decode_events(body: &str) -> Result<Vec<GitHubEvent>, FetchError> {
    let values: Vec<serde_json::Value> = serde_json::from_str(body)?;

    let mut events = Vec::with_capacity(values.len());
    for value in values {
        match serde_json::from_value::<WireEvent>(value) {
            Ok(wire) => events.push(GitHubEvent::from(wire)),
            Err(e) => warn!(source = "github", error = %e, "Skipping malformed event"),
        }
    }

    Ok(events)
}
