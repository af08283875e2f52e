use core::f64::consts::{FRAC_PI_2, TAU};

// Orientation
/// Heading of a freshly created vector: straight up in world space.
pub const DEFAULT_HEADING: f64 = FRAC_PI_2;
pub const DEFAULT_MAGNITUDE: f64 = 1.0;

/// Custom outlines are authored with "up" as their forward direction, which
/// sits a quarter turn away from the zero-angle x axis.
pub const AUTHORED_UP_OFFSET: f64 = FRAC_PI_2;

pub const FULL_TURN: f64 = TAU;

// Polygons
pub const MIN_VERTEX_COUNT: usize = 3;
pub const RECTANGLE_VERTEX_COUNT: usize = 4;

// Viewport used when a caller has nothing better (matches a 720p canvas).
pub const DEFAULT_VIEWPORT_WIDTH: f64 = 1280.0;
pub const DEFAULT_VIEWPORT_HEIGHT: f64 = 720.0;
