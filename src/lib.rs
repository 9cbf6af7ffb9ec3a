//! Folio - a terminal-styled activity feed.
//!
//! # Overview
//!
//! Folio merges public activity from a code host (GitHub events) and a
//! competitive-programming judge (LeetCode submissions) into one feed, newest
//! first, paginated over five pages. Each upstream is queried independently
//! and concurrently; an upstream that fails contributes nothing and the feed
//! still renders.
//!
//! Behind the feed runs a small seasonal particle animation (petals,
//! fireflies, leaves or snow) that reacts to pointer input.
//!
//! # Modules
//!
//! - [`data_sources`]: Upstream clients and their raw event types
//! - [`normalize`]: Raw events to [`model::UnifiedActivity`]
//! - [`aggregation`]: Concurrent fetch, merge and pagination
//! - [`render`]: HTML rendering of a feed page
//! - [`background`]: Seasonal particle simulation and its animation loop
//! - [`api`]: HTTP API handlers
//! - [`config`]: Environment configuration

pub mod aggregation;
pub mod api;
pub mod background;
pub mod config;
pub mod data_sources;
pub mod error;
pub mod model;
pub mod normalize;
pub mod render;
