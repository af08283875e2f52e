use serde::{Deserialize, Serialize};

use crate::coords::Viewport;
use crate::point::Point;

/// Axis-aligned box in screen space, anchored at its top-left corner.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct ScreenRect {
    pub left: f64,
    pub top: f64,
    pub width: f64,
    pub height: f64,
}

impl ScreenRect {
    /// Box of `width` x `height` centered on a world-space point.
    pub fn around(viewport: &Viewport, center: Point, width: f64, height: f64) -> Self {
        let top_left = viewport.world_to_screen(Point::new(
            center.x - width / 2.0,
            center.y + height / 2.0,
        ));
        Self {
            left: top_left.x,
            top: top_left.y,
            width,
            height,
        }
    }

    pub fn overlaps(&self, viewport: &Viewport) -> bool {
        self.left + self.width > 0.0
            && self.left < viewport.width
            && self.top + self.height > 0.0
            && self.top < viewport.height
    }
}

/// Whether a body's bounding box, centered at `center`, reaches into the
/// visible `[0, width] x [0, height]` screen area.
///
/// Conservative: a rotated outline may not actually reach the corner of its
/// box, so bodies just outside a corner can still report `true`.
pub fn overlaps_viewport(viewport: &Viewport, center: Point, width: f64, height: f64) -> bool {
    ScreenRect::around(viewport, center, width, height).overlaps(viewport)
}
