//! Folio - a terminal-styled activity feed.
//!
//! # API Endpoints
//!
//! - `GET /` - HTML activity feed (`?page=`)
//! - `GET /activity` - Activity feed as JSON (`?page=`)
//! - `GET /background/frame` - Latest background frame as JSON
//! - `GET /background.svg` - Latest background frame as SVG
//! - `POST /background/input` - Pointer and resize input for the background
//! - `GET /health` - Health check

use std::net::SocketAddr;
use std::sync::Arc;

use chrono::Utc;
use tokio::net::TcpListener;
use tracing::info;
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

use folio::aggregation::ActivityFeed;
use folio::api::{AppState, router};
use folio::background::{BackgroundHandle, Season};
use folio::config::AppConfig;
use folio::data_sources::{GitHubClient, LeetCodeClient};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing with environment filter
    tracing_subscriber::registry()
        .with(fmt::layer())
        .with(EnvFilter::from_default_env().add_directive("folio=info".parse()?))
        .init();

    let config = AppConfig::from_env();

    info!(
        port = config.port,
        github_user = %config.github_user,
        leetcode_user = %config.leetcode_user,
        cache_ttl_secs = config.cache_ttl.as_secs(),
        "Starting folio server"
    );

    let github = GitHubClient::new(&config.github_user, &config.user_agent, config.cache_ttl);
    let leetcode = LeetCodeClient::new(&config.leetcode_user, &config.user_agent, config.cache_ttl);
    let feed = ActivityFeed::new(Arc::new(github), Arc::new(leetcode));

    let background = config.background.map(|settings| {
        let season = Season::select(Utc::now(), config.forced_season);
        Arc::new(BackgroundHandle::spawn(season, settings))
    });
    if background.is_none() {
        info!("Background animation disabled");
    }

    let state = AppState { feed, background };
    let app = router(state);

    // Start server
    let addr = SocketAddr::from(([0, 0, 0, 0], config.port));
    let listener = TcpListener::bind(addr).await?;

    info!(%addr, "Folio is listening");

    axum::serve(listener, app).await?;

    Ok(())
}
