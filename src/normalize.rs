//! Conversion of source-specific events into [`UnifiedActivity`].
//!
//! Normalization is pure: the same raw event always yields the same entry.

use crate::data_sources::github::GitHubEventKind;
use crate::data_sources::{GitHubEvent, LeetCodeSubmission};
use crate::model::{ActivitySource, UnifiedActivity};

const GITHUB_WEB_BASE: &str = "https://github.com";
const LEETCODE_PROBLEMS_BASE: &str = "https://leetcode.com/problems";

/// Verdict LeetCode reports for a passing submission. It is not shown.
const ACCEPTED_VERDICT: &str = "Accepted";

/// Convert a GitHub event into a feed entry.
pub fn normalize_code_host_event(event: &GitHubEvent) -> UnifiedActivity {
    UnifiedActivity {
        id: format!("gh-{}", event.id),
        source: ActivitySource::CodeHost,
        timestamp: event.created_at,
        category: code_host_category(&event.kind),
        title: repo_short_name(&event.repo.name).to_string(),
        detail: code_host_detail(&event.kind),
        status: None,
        link: format!("{}/{}", GITHUB_WEB_BASE, event.repo.name),
    }
}

/// Convert a LeetCode submission into a feed entry.
///
/// LeetCode gives submissions no stable id, so the id is built from the raw
/// timestamp and the submission's position in the response. Two submissions
/// in the same second only stay distinct while the upstream order is stable.
pub fn normalize_judge_event(submission: &LeetCodeSubmission, index: usize) -> UnifiedActivity {
    UnifiedActivity {
        id: format!("lc-{}-{}", submission.raw_timestamp, index),
        source: ActivitySource::Judge,
        timestamp: submission.submitted_at,
        category: "SOLVED".to_string(),
        title: submission.title.clone(),
        detail: non_empty(&submission.lang),
        status: non_empty(&submission.status_display)
            .filter(|verdict| verdict != ACCEPTED_VERDICT),
        link: format!("{}/{}/", LEETCODE_PROBLEMS_BASE, submission.title_slug),
    }
}

/// Short category label for a GitHub event kind.
pub fn code_host_category(kind: &GitHubEventKind) -> String {
    match kind {
        GitHubEventKind::Push(_) => "PUSH".to_string(),
        GitHubEventKind::PullRequest(p) => {
            let merged = p.pull_request.as_ref().and_then(|pr| pr.merged);
            match p.action.as_deref() {
                Some("closed") if merged == Some(false) => "PR CLOSED".to_string(),
                Some("closed") => "PR MERGED".to_string(),
                action => with_action("PR", action),
            }
        }
        GitHubEventKind::Create => "CREATE".to_string(),
        GitHubEventKind::Issues(p) => with_action("ISSUE", p.action.as_deref()),
        GitHubEventKind::Watch => "STAR".to_string(),
        GitHubEventKind::Fork => "FORK".to_string(),
        GitHubEventKind::Release(_) => "RELEASE".to_string(),
        GitHubEventKind::Other(kind) => kind
            .strip_suffix("Event")
            .unwrap_or(kind)
            .to_uppercase(),
    }
}

/// One-line detail for a GitHub event, if the payload carries one.
pub fn code_host_detail(kind: &GitHubEventKind) -> Option<String> {
    match kind {
        GitHubEventKind::Push(p) => p
            .commits
            .first()
            .and_then(|c| c.message.as_deref())
            .and_then(non_empty)
            .or_else(|| {
                p.git_ref
                    .as_deref()
                    .map(|r| r.strip_prefix("refs/heads/").unwrap_or(r))
                    .and_then(non_empty)
            }),
        GitHubEventKind::PullRequest(p) => p
            .pull_request
            .as_ref()
            .and_then(|pr| pr.title.as_deref())
            .and_then(non_empty),
        GitHubEventKind::Issues(p) => p
            .issue
            .as_ref()
            .and_then(|i| i.title.as_deref())
            .and_then(non_empty),
        GitHubEventKind::Release(p) => p
            .release
            .as_ref()
            .and_then(|r| r.tag_name.as_deref())
            .and_then(non_empty),
        _ => None,
    }
}

/// `owner/repo` -> `repo`; names without a separator are returned as is.
pub fn repo_short_name(full_name: &str) -> &str {
    match full_name.split_once('/') {
        Some((_, name)) if !name.is_empty() => name,
        _ => full_name,
    }
}

fn with_action(prefix: &str, action: Option<&str>) -> String {
    match action.filter(|a| !a.is_empty()) {
        Some(action) => format!("{} {}", prefix, action.to_uppercase()),
        None => prefix.to_string(),
    }
}

fn non_empty(s: &str) -> Option<String> {
    let trimmed = s.trim();
    (!trimmed.is_empty()).then(|| trimmed.to_string())
}
