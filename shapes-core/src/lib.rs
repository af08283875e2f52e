//! Rigid 2D polygon bodies on a continuous plane.
//!
//! Bodies are positioned and oriented through an [`OrientedVector`], their
//! world-space outline is regenerated on every mutation, and any two outlines
//! can be tested for overlap with a bounding-circle pre-filter followed by the
//! Separating Axis Theorem.

pub mod body;
pub mod bounds;
pub mod collision;
pub mod constants;
pub mod coords;
pub mod error;
pub mod point;
pub mod segment;
pub mod template;
pub mod vector;

pub use body::PolygonBody;
pub use bounds::{overlaps_viewport, ScreenRect};
pub use collision::{is_colliding, Outline, Projection};
pub use coords::{screen_to_world, world_to_screen, Viewport};
pub use error::{Operation, ShapeError};
pub use point::Point;
pub use segment::Segment;
pub use template::{PolarOffset, VertexTemplate};
pub use vector::OrientedVector;
