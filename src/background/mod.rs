//! Seasonal particle background.
//!
//! A small physics loop behind the feed: petals in spring, fireflies in
//! summer, leaves in autumn and snow in winter. The season is picked from
//! the calendar month at startup unless overridden in config.
//!
//! Layers, bottom up:
//! - [`particle`]: one particle's spawn distribution, motion and expiry.
//! - [`simulation`]: the fixed-size pool and the render step.
//! - [`animation`]: the loop task that owns a simulation and takes input as
//!   messages.

pub mod animation;
pub mod frame;
pub mod input;
pub mod particle;
pub mod season;
pub mod simulation;

pub use animation::{BackgroundHandle, BackgroundSettings};
pub use frame::{Frame, Shape, Sprite};
pub use input::{FrameInput, InputEvent};
pub use particle::{Particle, Viewport};
pub use season::Season;
pub use simulation::Simulation;
