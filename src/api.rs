//! HTTP API handlers for folio.
//!
//! # Endpoints
//!
//! - `GET /` - Terminal-styled HTML activity feed
//! - `GET /activity` - The same feed page as JSON
//! - `GET /health` - Health check
//! - `GET /background/frame` - Latest background animation frame as JSON
//! - `GET /background.svg` - Latest background animation frame as SVG
//! - `POST /background/input` - Pointer or resize event for the animation
//!
//! The feed endpoints never fail: an upstream outage shows up as fewer (or
//! no) entries, not as an error status. Both accept `?page=`, where missing
//! or non-numeric values mean page 1 and out-of-range values are clamped.

use std::sync::Arc;

use axum::{
    Json, Router,
    extract::{Query, State},
    http::{StatusCode, header},
    response::IntoResponse,
    routing::{get, post},
};
use tower::ServiceBuilder;
use tower_http::trace::TraceLayer;
use tracing::{info, instrument, warn};

use crate::aggregation::ActivityFeed;
use crate::background::{BackgroundHandle, Frame, InputEvent};
use crate::model::{ActivityPage, PageQuery};
use crate::render::FeedTemplate;

/// Application state shared across handlers.
#[derive(Clone)]
pub struct AppState {
    pub feed: ActivityFeed,
    /// `None` when the background animation is disabled.
    pub background: Option<Arc<BackgroundHandle>>,
}

/// Build the application router.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(get_feed_html))
        .route("/activity", get(get_activity))
        .route("/health", get(health_check))
        .route("/background/frame", get(get_background_frame))
        .route("/background.svg", get(get_background_svg))
        .route("/background/input", post(post_background_input))
        .layer(ServiceBuilder::new().layer(TraceLayer::new_for_http()))
        .with_state(state)
}

/// GET / - Render one page of the activity feed as HTML.
#[instrument(skip(state))]
pub async fn get_feed_html(
    State(state): State<AppState>,
    Query(query): Query<PageQuery>,
) -> FeedTemplate {
    let page = state.feed.get_activity_page(query.requested_page()).await;

    info!(
        page = page.current_page,
        entry_count = page.entries.len(),
        "Feed rendered"
    );

    FeedTemplate::from(&page)
}

/// GET /activity - One page of the activity feed as JSON.
///
/// # Response
///
/// ```json
/// {
///     "entries": [
///         {
///             "id": "gh-12345",
///             "source": "code_host",
///             "timestamp": "2024-01-15T10:00:00Z",
///             "category": "PUSH",
///             "title": "folio",
///             "detail": "fix pagination",
///             "link": "https://github.com/octocat/folio"
///         }
///     ],
///     "current_page": 1,
///     "total_pages": 5
/// }
/// ```
#[instrument(skip(state))]
pub async fn get_activity(
    State(state): State<AppState>,
    Query(query): Query<PageQuery>,
) -> Json<ActivityPage> {
    let page = state.feed.get_activity_page(query.requested_page()).await;

    info!(
        page = page.current_page,
        entry_count = page.entries.len(),
        "Activity queried"
    );

    Json(page)
}

/// GET /health - Simple health check endpoint.
pub async fn health_check() -> impl IntoResponse {
    StatusCode::OK
}

// ============================================================================
// Background animation handlers
// ============================================================================

fn background(state: &AppState) -> Result<&BackgroundHandle, StatusCode> {
    state.background.as_deref().ok_or_else(|| {
        warn!("Background animation not enabled");
        StatusCode::SERVICE_UNAVAILABLE
    })
}

/// GET /background/frame - The most recent animation frame.
#[instrument(skip(state))]
pub async fn get_background_frame(
    State(state): State<AppState>,
) -> Result<Json<Frame>, StatusCode> {
    let frame = background(&state)?.latest_frame();
    Ok(Json(Frame::clone(&frame)))
}

/// GET /background.svg - The most recent animation frame, drawn as SVG.
#[instrument(skip(state))]
pub async fn get_background_svg(
    State(state): State<AppState>,
) -> Result<impl IntoResponse, StatusCode> {
    let frame = background(&state)?.latest_frame();
    Ok(([(header::CONTENT_TYPE, "image/svg+xml")], frame.to_svg()))
}

/// POST /background/input - Queue a pointer or resize event.
///
/// # Request Body
///
/// ```json
/// { "type": "pointer_move", "x": 120.0, "y": 48.5 }
/// ```
///
/// Accepted types: `pointer_move`, `pointer_leave`, `pointer_down` and
/// `resize` (with `width` and `height`). The event is applied on the next
/// frame, so the response is `202 Accepted`.
#[instrument(skip(state))]
pub async fn post_background_input(
    State(state): State<AppState>,
    Json(event): Json<InputEvent>,
) -> StatusCode {
    let handle = match background(&state) {
        Ok(handle) => handle,
        Err(status) => return status,
    };

    if handle.send(event) {
        StatusCode::ACCEPTED
    } else {
        warn!(?event, "Background animation has stopped, input dropped");
        StatusCode::SERVICE_UNAVAILABLE
    }
}
