//! Upstream activity sources.
//!
//! Each source wraps one third-party API and returns raw events exactly in the
//! order the upstream produced them. Sources fail soft: on any error they log a
//! warning and return an empty list, so one outage only thins the feed.
//!
//! # Data Sources
//!
//! - [`github`]: public GitHub events (code-host activity), paged
//! - [`leetcode`]: recent LeetCode submissions (judge activity), unpaged
//!
//! Both cache successful responses in a [`cache::ResponseCache`].

pub mod cache;
pub mod github;
pub mod leetcode;

use async_trait::async_trait;

pub use github::{GitHubClient, GitHubEvent};
pub use leetcode::{LeetCodeClient, LeetCodeSubmission};

/// A paged source of code-host events.
#[async_trait]
pub trait CodeHostSource: Send + Sync {
    /// Fetch one page of events. Never fails; errors yield an empty list.
    async fn fetch_activity(&self, page: u32) -> Vec<GitHubEvent>;
}

/// An unpaged source of judge submissions.
#[async_trait]
pub trait JudgeSource: Send + Sync {
    /// Fetch the most recent submissions. Never fails; errors yield an empty list.
    async fn fetch_recent(&self) -> Vec<LeetCodeSubmission>;
}
