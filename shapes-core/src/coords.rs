//! World space has its origin at the viewport center with y growing upward.
//! Screen space has its origin at the top-left corner with y growing downward.
//!
//! Both directions take the viewport explicitly; callers snapshot it once per
//! frame so a resize between two calls cannot break the round trip.

use serde::{Deserialize, Serialize};

use crate::constants::{DEFAULT_VIEWPORT_HEIGHT, DEFAULT_VIEWPORT_WIDTH};
use crate::error::{ensure_positive, Operation, ShapeError};
use crate::point::Point;

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Viewport {
    pub width: f64,
    pub height: f64,
}

impl Default for Viewport {
    fn default() -> Self {
        Self {
            width: DEFAULT_VIEWPORT_WIDTH,
            height: DEFAULT_VIEWPORT_HEIGHT,
        }
    }
}

impl Viewport {
    pub fn new(width: f64, height: f64) -> Result<Self, ShapeError> {
        ensure_positive(Operation::Viewport, width)?;
        ensure_positive(Operation::Viewport, height)?;
        Ok(Self { width, height })
    }

    #[inline]
    pub fn half_width(&self) -> f64 {
        self.width / 2.0
    }

    #[inline]
    pub fn half_height(&self) -> f64 {
        self.height / 2.0
    }

    pub fn world_to_screen(&self, world: Point) -> Point {
        Point {
            x: self.half_width() + world.x,
            y: self.half_height() - world.y,
        }
    }

    pub fn screen_to_world(&self, screen: Point) -> Point {
        Point {
            x: screen.x - self.half_width(),
            y: self.half_height() - screen.y,
        }
    }

    /// Half-open containment: the right and bottom edges are outside.
    pub fn contains_screen_point(&self, screen: Point) -> bool {
        screen.x >= 0.0 && screen.x < self.width && screen.y >= 0.0 && screen.y < self.height
    }

    pub fn contains_world_point(&self, world: Point) -> bool {
        self.contains_screen_point(self.world_to_screen(world))
    }
}

pub fn world_to_screen(viewport: &Viewport, x: f64, y: f64) -> Point {
    viewport.world_to_screen(Point::new(x, y))
}

pub fn screen_to_world(viewport: &Viewport, x: f64, y: f64) -> Point {
    viewport.screen_to_world(Point::new(x, y))
}
