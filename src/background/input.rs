//! Pointer input for the background animation.
//!
//! Input arrives as [`InputEvent`] messages. The animation loop drains them
//! into a [`FrameInput`] snapshot before each update pass, so a frame always
//! sees one consistent pointer state.

use std::time::Duration;

use serde::{Deserialize, Serialize};

/// A position in viewport coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

/// The most recent pointer-down.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Click {
    pub at: Point,
    /// Loop clock time when the press was observed.
    pub time: Duration,
}

/// Messages accepted by the animation loop.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum InputEvent {
    PointerMove { x: f64, y: f64 },
    PointerLeave,
    PointerDown { x: f64, y: f64 },
    Resize { width: f64, height: f64 },
}

/// Read-only input state for one frame.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct FrameInput {
    /// Last known pointer position, `None` while the pointer is outside.
    pub pointer: Option<Point>,
    pub click: Option<Click>,
}

impl FrameInput {
    /// Fold a pointer event into the snapshot. `now` is the loop clock.
    ///
    /// Resize events carry no pointer state and are ignored here.
    pub fn apply(&mut self, event: &InputEvent, now: Duration) {
        match *event {
            InputEvent::PointerMove { x, y } => self.pointer = Some(Point { x, y }),
            InputEvent::PointerLeave => self.pointer = None,
            InputEvent::PointerDown { x, y } => {
                self.click = Some(Click {
                    at: Point { x, y },
                    time: now,
                })
            }
            InputEvent::Resize { .. } => {}
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_apply_events() {
        let mut input = FrameInput::default();

        input.apply(&InputEvent::PointerMove { x: 1.0, y: 2.0 }, Duration::ZERO);
        assert_eq!(input.pointer, Some(Point { x: 1.0, y: 2.0 }));

        input.apply(
            &InputEvent::PointerDown { x: 5.0, y: 6.0 },
            Duration::from_millis(250),
        );
        let click = input.click.unwrap();
        assert_eq!(click.at, Point { x: 5.0, y: 6.0 });
        assert_eq!(click.time, Duration::from_millis(250));

        input.apply(&InputEvent::PointerLeave, Duration::from_millis(300));
        assert_eq!(input.pointer, None);
        assert!(input.click.is_some());
    }

    #[test]
    fn test_event_json_shape() {
        let event: InputEvent =
            serde_json::from_str(r#"{"type": "pointer_down", "x": 10, "y": 20.5}"#).unwrap();
        assert_eq!(event, InputEvent::PointerDown { x: 10.0, y: 20.5 });

        let leave: InputEvent = serde_json::from_str(r#"{"type": "pointer_leave"}"#).unwrap();
        assert_eq!(leave, InputEvent::PointerLeave);
    }
}
