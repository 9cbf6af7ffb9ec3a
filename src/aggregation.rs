//! Aggregation of code-host and judge activity into one feed.
//!
//! Both sources are queried concurrently and each may fail independently; a
//! source that is down simply contributes nothing. The merged feed is ordered
//! newest first.

use std::sync::Arc;

use tracing::{debug, instrument};

use crate::data_sources::{CodeHostSource, JudgeSource};
use crate::model::{ActivityPage, MAX_PAGE, UnifiedActivity, clamp_page};
use crate::normalize::{normalize_code_host_event, normalize_judge_event};

/// The unified activity feed.
#[derive(Clone)]
pub struct ActivityFeed {
    code_host: Arc<dyn CodeHostSource>,
    judge: Arc<dyn JudgeSource>,
}

impl ActivityFeed {
    /// Create a feed over the given sources.
    pub fn new(code_host: Arc<dyn CodeHostSource>, judge: Arc<dyn JudgeSource>) -> Self {
        Self { code_host, judge }
    }

    /// Build one page of the feed.
    ///
    /// `requested_page` is clamped into `[1, MAX_PAGE]`. The judge only keeps
    /// recent submissions, so it is consulted for the first page only. The
    /// two fetches run concurrently and are both awaited before merging.
    #[instrument(skip(self))]
    pub async fn get_activity_page(&self, requested_page: i64) -> ActivityPage {
        let current_page = clamp_page(requested_page);

        let (events, submissions) = tokio::join!(self.code_host.fetch_activity(current_page), async {
            if current_page == 1 {
                self.judge.fetch_recent().await
            } else {
                Vec::new()
            }
        });

        let code_host_entries = events.iter().map(normalize_code_host_event).collect();
        let judge_entries = submissions
            .iter()
            .enumerate()
            .map(|(index, submission)| normalize_judge_event(submission, index))
            .collect();

        let entries = merge_newest_first(code_host_entries, judge_entries);

        debug!(
            current_page,
            code_host_count = events.len(),
            judge_count = submissions.len(),
            "Activity page assembled"
        );

        ActivityPage {
            entries,
            current_page,
            total_pages: MAX_PAGE,
        }
    }
}

/// Concatenate code-host then judge entries and sort newest first.
///
/// The sort is stable, so on equal timestamps code-host entries stay ahead of
/// judge entries and each source keeps its own order.
pub fn merge_newest_first(
    code_host: Vec<UnifiedActivity>,
    judge: Vec<UnifiedActivity>,
) -> Vec<UnifiedActivity> {
    let mut merged = code_host;
    merged.extend(judge);
    merged.sort_by(|a, b| b.timestamp.cmp(&a.timestamp));
    merged
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data_sources::github::{GitHubEventKind, RepoRef};
    use crate::data_sources::{GitHubEvent, LeetCodeSubmission};
    use crate::model::ActivitySource;
    use async_trait::async_trait;
    use chrono::{DateTime, TimeZone, Utc};
    use std::sync::Mutex;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;
    use tokio::time::Instant;

    struct StubCodeHost {
        events: Vec<GitHubEvent>,
        pages: Mutex<Vec<u32>>,
    }

    #[async_trait]
    impl CodeHostSource for StubCodeHost {
        async fn fetch_activity(&self, page: u32) -> Vec<GitHubEvent> {
            self.pages.lock().unwrap().push(page);
            self.events.clone()
        }
    }

    struct StubJudge {
        submissions: Vec<LeetCodeSubmission>,
        calls: AtomicUsize,
    }

    #[async_trait]
    impl JudgeSource for StubJudge {
        async fn fetch_recent(&self) -> Vec<LeetCodeSubmission> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.submissions.clone()
        }
    }

    fn at(hour: u32, minute: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 5, 1, hour, minute, 0).unwrap()
    }

    fn github_event(id: &str, created_at: DateTime<Utc>) -> GitHubEvent {
        GitHubEvent {
            id: id.to_string(),
            created_at,
            repo: RepoRef {
                name: "octo/widgets".to_string(),
            },
            kind: GitHubEventKind::Fork,
        }
    }

    fn submission(submitted_at: DateTime<Utc>) -> LeetCodeSubmission {
        LeetCodeSubmission {
            raw_timestamp: submitted_at.timestamp().to_string(),
            submitted_at,
            title: "Two Sum".to_string(),
            title_slug: "two-sum".to_string(),
            status_display: "Accepted".to_string(),
            lang: "rust".to_string(),
        }
    }

    fn feed(
        events: Vec<GitHubEvent>,
        submissions: Vec<LeetCodeSubmission>,
    ) -> (ActivityFeed, Arc<StubCodeHost>, Arc<StubJudge>) {
        let code_host = Arc::new(StubCodeHost {
            events,
            pages: Mutex::new(Vec::new()),
        });
        let judge = Arc::new(StubJudge {
            submissions,
            calls: AtomicUsize::new(0),
        });
        let feed = ActivityFeed::new(code_host.clone(), judge.clone());
        (feed, code_host, judge)
    }

    #[tokio::test]
    async fn test_page_is_clamped() {
        let (feed, code_host, _) = feed(vec![], vec![]);

        assert_eq!(feed.get_activity_page(0).await.current_page, 1);
        assert_eq!(feed.get_activity_page(99).await.current_page, 5);
        assert_eq!(feed.get_activity_page(-3).await.current_page, 1);

        assert_eq!(*code_host.pages.lock().unwrap(), vec![1, 5, 1]);
    }

    #[tokio::test]
    async fn test_judge_only_queried_on_first_page() {
        let (feed, _, judge) = feed(vec![], vec![submission(at(9, 30))]);

        for page in 2..=5 {
            let result = feed.get_activity_page(page).await;
            assert!(result.entries.is_empty());
        }
        assert_eq!(judge.calls.load(Ordering::SeqCst), 0);

        let first = feed.get_activity_page(1).await;
        assert_eq!(first.entries.len(), 1);
        assert_eq!(judge.calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_newer_judge_event_comes_first() {
        let t100 = Utc.timestamp_opt(100, 0).unwrap();
        let t200 = Utc.timestamp_opt(200, 0).unwrap();
        let (feed, _, _) = feed(vec![github_event("1", t100)], vec![submission(t200)]);

        let page = feed.get_activity_page(1).await;

        assert_eq!(page.entries[0].source, ActivitySource::Judge);
        assert_eq!(page.entries[1].source, ActivitySource::CodeHost);
    }

    #[tokio::test]
    async fn test_equal_timestamps_keep_code_host_first() {
        let t = at(12, 0);
        let (feed, _, _) = feed(vec![github_event("1", t)], vec![submission(t)]);

        let page = feed.get_activity_page(1).await;

        assert_eq!(page.entries[0].source, ActivitySource::CodeHost);
        assert_eq!(page.entries[1].source, ActivitySource::Judge);
    }

    #[tokio::test]
    async fn test_end_to_end_ordering() {
        let (feed, _, _) = feed(
            vec![github_event("a", at(10, 0)), github_event("b", at(9, 0))],
            vec![submission(at(9, 30))],
        );

        let page = feed.get_activity_page(1).await;
        let times: Vec<_> = page.entries.iter().map(|e| e.timestamp).collect();

        assert_eq!(times, vec![at(10, 0), at(9, 30), at(9, 0)]);
        assert_eq!(page.total_pages, MAX_PAGE);
    }

    #[tokio::test]
    async fn test_both_sources_empty_is_valid() {
        let (feed, _, _) = feed(vec![], vec![]);

        let page = feed.get_activity_page(1).await;

        assert!(page.entries.is_empty());
        assert_eq!(page.current_page, 1);
    }

    #[tokio::test]
    async fn test_repeated_calls_are_identical() {
        let (feed, _, _) = feed(
            vec![github_event("a", at(10, 0))],
            vec![submission(at(9, 30)), submission(at(9, 30))],
        );

        let first = feed.get_activity_page(1).await;
        let second = feed.get_activity_page(1).await;

        assert_eq!(first, second);
        assert_eq!(
            serde_json::to_string(&first.entries).unwrap(),
            serde_json::to_string(&second.entries).unwrap()
        );
        // Same-second submissions still get distinct ids.
        assert_ne!(first.entries[1].id, first.entries[2].id);
    }

    struct SlowCodeHost(AtomicUsize);

    #[async_trait]
    impl CodeHostSource for SlowCodeHost {
        async fn fetch_activity(&self, _page: u32) -> Vec<GitHubEvent> {
            self.0.fetch_add(1, Ordering::SeqCst);
            tokio::time::sleep(Duration::from_millis(100)).await;
            Vec::new()
        }
    }

    struct SlowJudge(AtomicUsize);

    #[async_trait]
    impl JudgeSource for SlowJudge {
        async fn fetch_recent(&self) -> Vec<LeetCodeSubmission> {
            self.0.fetch_add(1, Ordering::SeqCst);
            tokio::time::sleep(Duration::from_millis(100)).await;
            Vec::new()
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_sources_are_fetched_concurrently() {
        let code_host = Arc::new(SlowCodeHost(AtomicUsize::new(0)));
        let judge = Arc::new(SlowJudge(AtomicUsize::new(0)));
        let feed = ActivityFeed::new(code_host.clone(), judge.clone());

        let started = Instant::now();
        feed.get_activity_page(1).await;
        let elapsed = started.elapsed();

        assert!(elapsed >= Duration::from_millis(100));
        assert!(elapsed < Duration::from_millis(200), "took {elapsed:?}");
        assert_eq!(code_host.0.load(Ordering::SeqCst), 1);
        assert_eq!(judge.0.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_merge_is_stable_within_source() {
        let t = at(8, 0);
        let mk = |id: &str, source| UnifiedActivity {
            id: id.to_string(),
            source,
            timestamp: t,
            category: "X".to_string(),
            title: "x".to_string(),
            detail: None,
            status: None,
            link: "https://example.com".to_string(),
        };

        let merged = merge_newest_first(
            vec![mk("gh-1", ActivitySource::CodeHost), mk("gh-2", ActivitySource::CodeHost)],
            vec![mk("lc-1", ActivitySource::Judge)],
        );
        let ids: Vec<_> = merged.iter().map(|e| e.id.as_str()).collect();

        assert_eq!(ids, vec!["gh-1", "gh-2", "lc-1"]);
    }
}
