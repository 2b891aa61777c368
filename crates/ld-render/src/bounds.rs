//! Screen-space rectangles and the edge anchors drop zones sit on.

use serde::{Deserialize, Serialize};

/// Which edge of a rectangle something is anchored to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Anchor {
    Top,
    Bottom,
    Left,
    Right,
}

impl Anchor {
    pub fn as_str(self) -> &'static str {
        match self {
            Anchor::Top => "top",
            Anchor::Bottom => "bottom",
            Anchor::Left => "left",
            Anchor::Right => "right",
        }
    }
}

/// Bounding box in viewport coordinates, as reported by the host
/// (`getBoundingClientRect`) or by the headless layout.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Bounds {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl Bounds {
    pub const fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    pub fn contains(&self, px: f32, py: f32) -> bool {
        px >= self.x && px <= self.x + self.width && py >= self.y && py <= self.y + self.height
    }

    pub fn center(&self) -> (f32, f32) {
        (self.x + self.width / 2.0, self.y + self.height / 2.0)
    }

    /// Midpoint of the given edge. Top/bottom points are centered
    /// horizontally; left/right points are centered vertically.
    pub fn anchor_point(&self, anchor: Anchor) -> (f32, f32) {
        let (cx, cy) = self.center();
        match anchor {
            Anchor::Top => (cx, self.y),
            Anchor::Bottom => (cx, self.y + self.height),
            Anchor::Left => (self.x, cy),
            Anchor::Right => (self.x + self.width, cy),
        }
    }
}
