//! Integration tests for folio API endpoints.
//!
//! These tests drive the real router with in-memory sources, so they cover the
//! full request/response cycle without touching the network.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use axum::http::StatusCode;
use axum_test::TestServer;
use chrono::{DateTime, TimeZone, Utc};
use serde_json::json;

use folio::aggregation::ActivityFeed;
use folio::api::{AppState, router};
use folio::background::{BackgroundHandle, BackgroundSettings, Season, Viewport};
use folio::data_sources::github::{GitHubEventKind, PushPayload, RepoRef};
use folio::data_sources::{CodeHostSource, GitHubEvent, JudgeSource, LeetCodeSubmission};

struct FixedCodeHost(Vec<GitHubEvent>);

#[async_trait]
impl CodeHostSource for FixedCodeHost {
    async fn fetch_activity(&self, _page: u32) -> Vec<GitHubEvent> {
        self.0.clone()
    }
}

struct FixedJudge(Vec<LeetCodeSubmission>);

#[async_trait]
impl JudgeSource for FixedJudge {
    async fn fetch_recent(&self) -> Vec<LeetCodeSubmission> {
        self.0.clone()
    }
}

fn at(hour: u32, minute: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 5, 1, hour, minute, 0).unwrap()
}

fn push(id: &str, created_at: DateTime<Utc>, message: &str) -> GitHubEvent {
    GitHubEvent {
        id: id.to_string(),
        created_at,
        repo: RepoRef {
            name: "octocat/folio".to_string(),
        },
        kind: GitHubEventKind::Push(PushPayload {
            commits: vec![folio::data_sources::github::CommitRef {
                message: Some(message.to_string()),
            }],
            git_ref: Some("refs/heads/main".to_string()),
        }),
    }
}

fn solved(submitted_at: DateTime<Utc>, status: &str) -> LeetCodeSubmission {
    LeetCodeSubmission {
        raw_timestamp: submitted_at.timestamp().to_string(),
        submitted_at,
        title: "Two Sum".to_string(),
        title_slug: "two-sum".to_string(),
        status_display: status.to_string(),
        lang: "rust".to_string(),
    }
}

fn create_test_server(
    events: Vec<GitHubEvent>,
    submissions: Vec<LeetCodeSubmission>,
    background: Option<Arc<BackgroundHandle>>,
) -> TestServer {
    let feed = ActivityFeed::new(
        Arc::new(FixedCodeHost(events)),
        Arc::new(FixedJudge(submissions)),
    );
    let state = AppState { feed, background };

    TestServer::new(router(state)).unwrap()
}

fn empty_server() -> TestServer {
    create_test_server(vec![], vec![], None)
}

fn background_handle() -> Arc<BackgroundHandle> {
    Arc::new(BackgroundHandle::spawn(
        Season::Spring,
        BackgroundSettings {
            viewport: Viewport {
                width: 640.0,
                height: 480.0,
            },
            frame_period: Duration::from_millis(1),
        },
    ))
}

#[tokio::test]
async fn test_health_endpoint() {
    let server = empty_server();

    let response = server.get("/health").await;

    response.assert_status_ok();
}

#[tokio::test]
async fn test_activity_merges_newest_first() {
    let server = create_test_server(
        vec![
            push("1", at(10, 0), "ship it"),
            push("2", at(9, 0), "first commit"),
        ],
        vec![solved(at(9, 30), "Accepted")],
        None,
    );

    let response = server.get("/activity").await;

    response.assert_status_ok();
    let body: serde_json::Value = response.json();
    assert_eq!(body["current_page"], 1);
    assert_eq!(body["total_pages"], 5);

    let entries = body["entries"].as_array().unwrap();
    assert_eq!(entries.len(), 3);
    assert_eq!(entries[0]["id"], "gh-1");
    assert_eq!(entries[1]["source"], "judge");
    assert_eq!(entries[1]["category"], "SOLVED");
    assert_eq!(entries[2]["id"], "gh-2");
    assert_eq!(entries[0]["detail"], "ship it");
    assert!(entries[1].get("status").is_none());
}

#[tokio::test]
async fn test_activity_page_is_clamped() {
    let server = empty_server();

    for (query, expected) in [
        ("0", 1),
        ("99", 5),
        ("-4", 1),
        ("abc", 1),
        ("", 1),
        ("3", 3),
        ("99999999999999999999", 5),
        ("-99999999999999999999", 1),
    ] {
        let response = server.get(&format!("/activity?page={}", query)).await;

        response.assert_status_ok();
        let body: serde_json::Value = response.json();
        assert_eq!(body["current_page"], expected, "page={query}");
    }
}

#[tokio::test]
async fn test_later_pages_skip_judge() {
    let server = create_test_server(
        vec![push("7", at(8, 0), "refactor")],
        vec![solved(at(9, 30), "Wrong Answer")],
        None,
    );

    let body: serde_json::Value = server.get("/activity?page=2").await.json();

    let entries = body["entries"].as_array().unwrap();
    assert_eq!(entries.len(), 1);
    assert_eq!(entries[0]["source"], "code_host");
}

#[tokio::test]
async fn test_feed_html_empty_state() {
    let server = empty_server();

    let response = server.get("/").await;

    response.assert_status_ok();
    let html = response.text();
    assert!(html.contains("No logs found."));
    assert!(html.contains("&gt; Activity.Recent --limit=30"));
    assert!(html.contains(">1/5<"));
    assert!(html.contains("href=\"/?page=2\""));
    assert!(!html.contains("href=\"/?page=0\""));
}

#[tokio::test]
async fn test_feed_html_renders_entries() {
    let server = create_test_server(
        vec![push("1", at(10, 0), "<b>bold</b> move")],
        vec![solved(at(9, 30), "Time Limit Exceeded")],
        None,
    );

    let html = server.get("/?page=1").await.text();

    assert!(html.contains("[May 01, 10:00]"));
    assert!(html.contains("github.com"));
    assert!(html.contains("leetcode.com"));
    assert!(html.contains("two-sum"));
    assert!(html.contains("(Time Limit Exceeded)"));
    assert!(html.contains("&lt;b&gt;bold"));
    assert!(!html.contains("<b>bold</b>"));
}

#[tokio::test]
async fn test_last_page_has_no_next_link() {
    let server = empty_server();

    let html = server.get("/?page=5").await.text();

    assert!(html.contains(">5/5<"));
    assert!(html.contains("href=\"/?page=4\""));
    assert!(!html.contains("href=\"/?page=6\""));
}

#[tokio::test]
async fn test_background_disabled() {
    let server = empty_server();

    server
        .get("/background/frame")
        .await
        .assert_status(StatusCode::SERVICE_UNAVAILABLE);
    server
        .get("/background.svg")
        .await
        .assert_status(StatusCode::SERVICE_UNAVAILABLE);
    server
        .post("/background/input")
        .json(&json!({ "type": "pointer_leave" }))
        .await
        .assert_status(StatusCode::SERVICE_UNAVAILABLE);
}

#[tokio::test]
async fn test_background_frame_and_svg() {
    let server = create_test_server(vec![], vec![], Some(background_handle()));

    let response = server.get("/background/frame").await;
    response.assert_status_ok();
    let body: serde_json::Value = response.json();
    assert_eq!(body["season"], "spring");
    assert_eq!(body["width"], 640.0);
    assert_eq!(body["sprites"].as_array().unwrap().len(), 24);
    assert_eq!(body["sprites"][0]["shape"]["kind"], "petal");

    let response = server.get("/background.svg").await;
    response.assert_status_ok();
    assert_eq!(response.header("content-type"), "image/svg+xml");
    assert!(response.text().starts_with("<svg"));
}

#[tokio::test]
async fn test_background_input_accepted() {
    let server = create_test_server(vec![], vec![], Some(background_handle()));

    for event in [
        json!({ "type": "pointer_move", "x": 100.0, "y": 120.0 }),
        json!({ "type": "pointer_down", "x": 100.0, "y": 120.0 }),
        json!({ "type": "pointer_leave" }),
        json!({ "type": "resize", "width": 320.0, "height": 240.0 }),
    ] {
        server
            .post("/background/input")
            .json(&event)
            .await
            .assert_status(StatusCode::ACCEPTED);
    }

    tokio::time::sleep(Duration::from_millis(30)).await;

    let body: serde_json::Value = server.get("/background/frame").await.json();
    assert_eq!(body["width"], 320.0);
    assert_eq!(body["height"], 240.0);
}

#[tokio::test]
async fn test_background_input_rejects_unknown_event() {
    let server = create_test_server(vec![], vec![], Some(background_handle()));

    let response = server
        .post("/background/input")
        .json(&json!({ "type": "scroll", "dy": 3 }))
        .await;

    assert!(response.status_code().is_client_error());
}
