//! A single simulated particle: spawning, per-tick motion and expiry.

use std::f64::consts::TAU;
use std::time::Duration;

use rand::Rng;
use serde::{Deserialize, Serialize};

use super::input::{FrameInput, Point};
use super::season::Season;

/// Pointer influence radius.
pub const POINTER_RADIUS: f64 = 150.0;

/// Click impulse radius.
pub const CLICK_RADIUS: f64 = 300.0;

/// How long a click keeps pushing particles away.
pub const CLICK_WINDOW: Duration = Duration::from_secs(1);

/// Peak click impulse, at the click point and the instant of the click.
pub const CLICK_STRENGTH: f64 = 15.0;

const SAKURA_COLORS: [&str; 2] = ["#ffd7e6", "#ffb7c5"];
const FIREFLY_COLOR: &str = "#ffd700";
const AUTUMN_COLORS: [&str; 5] = ["#d35400", "#e67e22", "#c0392b", "#f39c12", "#8e44ad"];
const SNOW_COLOR: &str = "#ffffff";

/// Firefly opacity never exceeds this.
const FIREFLY_MAX_OPACITY: f64 = 0.8;

/// Visible area of the animation.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Viewport {
    pub width: f64,
    pub height: f64,
}

/// Leaf outline, picked once when an autumn particle is spawned.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LeafShape {
    Oval,
    Diamond,
    Round,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Particle {
    pub x: f64,
    pub y: f64,
    pub vx: f64,
    pub vy: f64,
    pub size: f64,
    pub angle: f64,
    pub spin: f64,
    pub opacity: f64,
    /// Remaining life. Only fireflies consume it; it never goes below zero.
    pub life: f64,
    pub max_life: f64,
    pub color: &'static str,
    pub leaf: Option<LeafShape>,
}

impl Particle {
    /// Spawn a particle for `season`.
    ///
    /// `initial` particles are scattered over the whole viewport so the first
    /// frame is not empty; replacements enter from the top edge (fireflies
    /// always appear anywhere).
    pub fn spawn<R: Rng>(
        season: Season,
        viewport: Viewport,
        initial: bool,
        rng: &mut R,
    ) -> Self {
        let x = unit(rng) * viewport.width;
        let anywhere = unit(rng) * viewport.height;

        match season {
            Season::Spring => Self {
                x,
                y: if initial { anywhere } else { -10.0 },
                vx: between(rng, -0.25, 0.25),
                vy: between(rng, 0.5, 1.5),
                size: between(rng, 3.0, 7.0),
                angle: unit(rng) * TAU,
                spin: between(rng, -0.01, 0.01),
                opacity: between(rng, 0.3, 0.7),
                life: 100.0,
                max_life: 100.0,
                color: if unit(rng) > 0.5 {
                    SAKURA_COLORS[0]
                } else {
                    SAKURA_COLORS[1]
                },
                leaf: None,
            },
            Season::Summer => Self {
                x,
                y: anywhere,
                vx: between(rng, -0.4, 0.4),
                vy: between(rng, -0.4, 0.4),
                size: between(rng, 1.0, 3.0),
                angle: 0.0,
                spin: 0.0,
                opacity: 0.0,
                life: between(rng, 200.0, 500.0),
                max_life: 500.0,
                color: FIREFLY_COLOR,
                leaf: None,
            },
            Season::Autumn => Self {
                x,
                y: if initial { anywhere } else { -20.0 },
                vx: between(rng, -0.5, 0.5),
                vy: between(rng, 1.0, 2.5),
                size: between(rng, 4.0, 10.0),
                angle: unit(rng) * TAU,
                spin: between(rng, -0.025, 0.025),
                opacity: between(rng, 0.4, 0.9),
                life: 100.0,
                max_life: 100.0,
                color: AUTUMN_COLORS[rng.gen_range(0..AUTUMN_COLORS.len())],
                leaf: Some(match rng.gen_range(0..3) {
                    0 => LeafShape::Oval,
                    1 => LeafShape::Diamond,
                    _ => LeafShape::Round,
                }),
            },
            Season::Winter => Self {
                x,
                y: if initial { anywhere } else { -10.0 },
                vx: between(rng, -0.25, 0.25),
                vy: between(rng, 1.0, 3.0),
                size: between(rng, 1.0, 3.0),
                angle: 0.0,
                spin: 0.0,
                opacity: between(rng, 0.3, 0.8),
                life: 100.0,
                max_life: 100.0,
                color: SNOW_COLOR,
                leaf: None,
            },
        }
    }

    /// Advance one frame.
    ///
    /// Order: integrate velocity, pointer force, click impulse, winter
    /// damping, then the season's own drift.
    pub fn advance<R: Rng>(
        &mut self,
        season: Season,
        input: &FrameInput,
        now: Duration,
        rng: &mut R,
    ) {
        self.x += self.vx;
        self.y += self.vy;
        self.angle += self.spin;

        if let Some(pointer) = input.pointer {
            self.apply_pointer(season, pointer);
        }

        if let Some(click) = input.click {
            if let Some(age) = now.checked_sub(click.time).filter(|age| *age < CLICK_WINDOW) {
                self.apply_click(click.at, age);
            }
        }

        if season == Season::Winter {
            self.vx *= 0.95;
            self.vy = self.vy * 0.95 + between(rng, 1.0, 3.0) * 0.05;
        }

        match season {
            Season::Spring => {
                self.x += (self.y * 0.01 + self.angle).sin() * 0.3;
            }
            Season::Summer => self.wander(rng),
            Season::Autumn => {
                self.x += (self.y * 0.005).cos() * 0.2;
            }
            Season::Winter => {}
        }
    }

    fn apply_pointer(&mut self, season: Season, pointer: Point) {
        let dx = self.x - pointer.x;
        let dy = self.y - pointer.y;
        let dist = dx.hypot(dy);
        if dist <= 0.0 || dist >= POINTER_RADIUS {
            return;
        }

        let force = (POINTER_RADIUS - dist) / POINTER_RADIUS;
        let (ux, uy) = (dx / dist, dy / dist);

        match season {
            // Gentle repulsion.
            Season::Spring => {
                self.x += ux * force * 2.0;
                self.y += uy * force * 2.0;
            }
            // Slight attraction.
            Season::Summer => {
                self.x -= ux * force * 1.5;
                self.y -= uy * force * 1.5;
            }
            // Swirl: ease toward the same radius, rotated a little further.
            Season::Autumn => {
                let angle = dy.atan2(dx) + 0.1;
                let target_x = pointer.x + angle.cos() * dist;
                let target_y = pointer.y + angle.sin() * dist;
                self.x += (target_x - self.x) * 0.05;
                self.y += (target_y - self.y) * 0.05;
            }
            // Wind: nudges velocity, not position.
            Season::Winter => {
                self.vx += ux * force * 0.2;
                self.vy += uy * force * 0.2;
            }
        }
    }

    fn apply_click(&mut self, at: Point, age: Duration) {
        let dx = self.x - at.x;
        let dy = self.y - at.y;
        let dist = dx.hypot(dy);
        if dist <= 0.0 || dist >= CLICK_RADIUS {
            return;
        }

        let decay = 1.0 - age.as_secs_f64() / CLICK_WINDOW.as_secs_f64();
        let impulse = (CLICK_RADIUS - dist) / CLICK_RADIUS * decay * CLICK_STRENGTH;
        self.x += dx / dist * impulse;
        self.y += dy / dist * impulse;
    }

    /// Firefly behaviour: random walk capped at unit speed, fading in over the
    /// first fifth of its life and out over the last fifth.
    fn wander<R: Rng>(&mut self, rng: &mut R) {
        self.vx += between(rng, -0.1, 0.1);
        self.vy += between(rng, -0.1, 0.1);

        let speed = self.vx.hypot(self.vy);
        if speed > 1.0 {
            self.vx /= speed;
            self.vy /= speed;
        }

        self.opacity = if self.life > self.max_life * 0.8 {
            ((self.max_life - self.life) * 0.02).min(FIREFLY_MAX_OPACITY)
        } else if self.life < self.max_life * 0.2 {
            (self.life * 0.02).max(0.0)
        } else {
            (self.opacity + between(rng, -0.01, 0.01)).clamp(0.0, FIREFLY_MAX_OPACITY)
        };

        self.life = (self.life - 1.0).max(0.0);
    }

    /// Outside the area where a particle can still be seen.
    ///
    /// The top edge allows a little extra room because replacements spawn
    /// just above it.
    pub fn is_out_of_bounds(&self, viewport: Viewport) -> bool {
        self.y > viewport.height + 20.0
            || self.x < -20.0
            || self.x > viewport.width + 20.0
            || self.y < -30.0
    }

    pub fn is_expired(&self, viewport: Viewport) -> bool {
        self.life <= 0.0 || self.is_out_of_bounds(viewport)
    }
}

fn unit<R: Rng>(rng: &mut R) -> f64 {
    rng.gen_range(0.0..1.0)
}

fn between<R: Rng>(rng: &mut R, low: f64, high: f64) -> f64 {
    low + unit(rng) * (high - low)
}
