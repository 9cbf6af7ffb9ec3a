//! Render output of the background animation.
//!
//! A [`Frame`] is a list of sprites in draw order. It serialises to JSON for
//! clients that draw on their own canvas, and can render itself as SVG.

use std::f64::consts::PI;
use std::fmt::Write;

use serde::{Deserialize, Serialize};

use super::particle::{LeafShape, Particle};
use super::season::Season;

/// Blur radius of the firefly glow.
const GLOW_BLUR: f64 = 10.0;

/// What to draw for one particle, centred on the sprite's position.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Shape {
    /// Two mirrored curves meeting at the tips, `size` from centre to tip.
    Petal { size: f64 },
    /// Disc with a soft halo.
    Glow { radius: f64, blur: f64 },
    Oval { rx: f64, ry: f64 },
    Diamond { half_width: f64, half_height: f64 },
    Disc { radius: f64 },
}

impl Shape {
    pub fn for_particle(season: Season, p: &Particle) -> Self {
        match season {
            Season::Spring => Shape::Petal { size: p.size },
            Season::Summer => Shape::Glow {
                radius: p.size,
                blur: GLOW_BLUR,
            },
            Season::Autumn => match p.leaf.unwrap_or(LeafShape::Round) {
                LeafShape::Oval => Shape::Oval {
                    rx: p.size,
                    ry: p.size / 2.0,
                },
                LeafShape::Diamond => Shape::Diamond {
                    half_width: p.size / 1.5,
                    half_height: p.size,
                },
                LeafShape::Round => Shape::Disc {
                    radius: p.size / 2.0,
                },
            },
            Season::Winter => Shape::Disc { radius: p.size },
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Sprite {
    pub x: f64,
    pub y: f64,
    /// Rotation in radians.
    pub angle: f64,
    pub opacity: f64,
    pub color: String,
    pub shape: Shape,
}

/// One rendered animation frame.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Frame {
    pub season: Season,
    pub width: f64,
    pub height: f64,
    /// Number of update passes that produced this frame.
    pub tick: u64,
    pub sprites: Vec<Sprite>,
}

impl Frame {
    /// Render as a standalone SVG document.
    pub fn to_svg(&self) -> String {
        let mut svg = String::with_capacity(128 + self.sprites.len() * 160);
        let _ = write!(
            svg,
            "<svg xmlns=\"http://www.w3.org/2000/svg\" width=\"{w}\" height=\"{h}\" viewBox=\"0 0 {w} {h}\">",
            w = self.width,
            h = self.height
        );

        for sprite in &self.sprites {
            let _ = write!(
                svg,
                "<g transform=\"translate({:.2} {:.2}) rotate({:.2})\" fill=\"{}\" opacity=\"{:.3}\">",
                sprite.x,
                sprite.y,
                sprite.angle * 180.0 / PI,
                sprite.color,
                sprite.opacity
            );
            write_shape(&mut svg, &sprite.shape, &sprite.color);
            svg.push_str("</g>");
        }

        svg.push_str("</svg>");
        svg
    }
}

fn write_shape(svg: &mut String, shape: &Shape, color: &str) {
    let _ = match *shape {
        Shape::Petal { size: s } => {
            let h = s / 2.0;
            write!(
                svg,
                "<path d=\"M 0 {top:.2} C {h:.2} {nh:.2}, {h:.2} {h:.2}, 0 {s:.2} C {nh:.2} {h:.2}, {nh:.2} {nh:.2}, 0 {top:.2} Z\"/>",
                top = -s,
                h = h,
                nh = -h,
                s = s
            )
        }
        Shape::Glow { radius, blur } => write!(
            svg,
            "<circle r=\"{:.2}\" style=\"filter: drop-shadow(0 0 {:.0}px {})\"/>",
            radius, blur, color
        ),
        Shape::Oval { rx, ry } => write!(svg, "<ellipse rx=\"{:.2}\" ry=\"{:.2}\"/>", rx, ry),
        Shape::Diamond {
            half_width: w,
            half_height: h,
        } => write!(
            svg,
            "<polygon points=\"0,{:.2} {:.2},0 0,{:.2} {:.2},0\"/>",
            -h, w, h, -w
        ),
        Shape::Disc { radius } => write!(svg, "<circle r=\"{:.2}\"/>", radius),
    };
}
