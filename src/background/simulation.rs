//! Fixed-size particle pool for one seasonal mode.

use std::time::Duration;

use rand::Rng;
use rand::SeedableRng;
use rand::rngs::StdRng;

use super::frame::{Frame, Shape, Sprite};
use super::input::FrameInput;
use super::particle::{Particle, Viewport};
use super::season::Season;

/// The particle pool and the rules that move it.
///
/// The pool size is fixed when the simulation is created: expired particles
/// are replaced in place, never removed.
pub struct Simulation<R = StdRng> {
    season: Season,
    viewport: Viewport,
    particles: Vec<Particle>,
    ticks: u64,
    rng: R,
}

impl Simulation<StdRng> {
    /// Create a simulation seeded from the operating system.
    pub fn new(season: Season, viewport: Viewport) -> Self {
        Self::with_rng(season, viewport, StdRng::from_entropy())
    }
}

impl<R: Rng> Simulation<R> {
    /// Create a simulation with an explicit random source.
    pub fn with_rng(season: Season, viewport: Viewport, mut rng: R) -> Self {
        let count = season.particle_count(viewport.width);
        let particles = (0..count)
            .map(|_| Particle::spawn(season, viewport, true, &mut rng))
            .collect();

        Self {
            season,
            viewport,
            particles,
            ticks: 0,
            rng,
        }
    }

    pub fn season(&self) -> Season {
        self.season
    }

    pub fn viewport(&self) -> Viewport {
        self.viewport
    }

    pub fn particles(&self) -> &[Particle] {
        &self.particles
    }

    pub fn ticks(&self) -> u64 {
        self.ticks
    }

    /// Change the visible area. The pool keeps its size; particles outside
    /// the new bounds are recycled on the next update.
    pub fn resize(&mut self, viewport: Viewport) {
        self.viewport = viewport;
    }

    /// One update pass: move every particle, then replace each one that
    /// expired during this pass with a fresh particle of the same season.
    pub fn tick(&mut self, input: &FrameInput, now: Duration) {
        let season = self.season;
        let viewport = self.viewport;

        for particle in &mut self.particles {
            particle.advance(season, input, now, &mut self.rng);
            if particle.is_expired(viewport) {
                *particle = Particle::spawn(season, viewport, false, &mut self.rng);
            }
        }

        self.ticks += 1;
    }

    /// Snapshot the pool as drawable sprites.
    pub fn render(&self) -> Frame {
        let sprites = self
            .particles
            .iter()
            .map(|p| Sprite {
                x: p.x,
                y: p.y,
                angle: p.angle,
                opacity: p.opacity,
                color: p.color.to_string(),
                shape: Shape::for_particle(self.season, p),
            })
            .collect();

        Frame {
            season: self.season,
            width: self.viewport.width,
            height: self.viewport.height,
            tick: self.ticks,
            sprites,
        }
    }
}
