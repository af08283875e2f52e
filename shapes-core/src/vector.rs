use serde::{Deserialize, Serialize};

use crate::constants::{DEFAULT_HEADING, DEFAULT_MAGNITUDE};
use crate::error::{ensure_finite, Operation, ShapeError};
use crate::point::Point;

/// An anchor point plus a heading.
///
/// `argument` is never wrapped into `[0, 2π)`: callers may accumulate turns
/// freely and every consumer goes through `sin`/`cos`. Mutators validate their
/// input first and leave the vector untouched on error.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct OrientedVector {
    origin: Point,
    argument: f64,
    magnitude: f64,
}

impl OrientedVector {
    /// Unit vector at `origin`, pointing up.
    pub fn new(origin: Point) -> Result<Self, ShapeError> {
        ensure_finite(Operation::Construct, &[origin.x, origin.y])?;
        Ok(Self {
            origin,
            argument: DEFAULT_HEADING,
            magnitude: DEFAULT_MAGNITUDE,
        })
    }

    pub fn with_heading(origin: Point, argument: f64) -> Result<Self, ShapeError> {
        let mut vector = Self::new(origin)?;
        vector.set_rotation(argument)?;
        Ok(vector)
    }

    pub fn origin(&self) -> Point {
        self.origin
    }

    pub fn argument(&self) -> f64 {
        self.argument
    }

    pub fn magnitude(&self) -> f64 {
        self.magnitude
    }

    /// Unit step along the current heading.
    pub fn direction(&self) -> Point {
        Point::from_angle(self.argument)
    }

    /// `origin + magnitude * (cos(argument), sin(argument))`.
    pub fn head(&self) -> Point {
        self.origin + self.direction() * self.magnitude
    }

    /// Moves the origin along the heading; negative values walk backward.
    pub fn walk(&mut self, displacement: f64) -> Result<(), ShapeError> {
        ensure_finite(Operation::Walk, &[displacement])?;
        self.origin += self.direction() * displacement;
        Ok(())
    }

    pub fn rotate(&mut self, delta: f64) -> Result<(), ShapeError> {
        ensure_finite(Operation::Rotate, &[delta])?;
        self.argument += delta;
        Ok(())
    }

    /// Points the heading at `(x, y)`.
    ///
    /// Looking at the origin itself yields `atan2(0, 0) == 0`, i.e. a heading
    /// along +x.
    pub fn look_at(&mut self, x: f64, y: f64) -> Result<(), ShapeError> {
        ensure_finite(Operation::LookAt, &[x, y])?;
        let bearing = (y - self.origin.y).atan2(x - self.origin.x);
        // Equivalent to rotate(bearing - argument), but `argument + (bearing -
        // argument)` is not exactly `bearing` in floating point.
        self.argument = bearing;
        Ok(())
    }

    pub fn move_to(&mut self, x: f64, y: f64) -> Result<(), ShapeError> {
        ensure_finite(Operation::MoveTo, &[x, y])?;
        self.origin = Point::new(x, y);
        Ok(())
    }

    pub fn set_rotation(&mut self, angle: f64) -> Result<(), ShapeError> {
        ensure_finite(Operation::SetRotation, &[angle])?;
        self.argument = angle;
        Ok(())
    }

    pub fn set_magnitude(&mut self, magnitude: f64) -> Result<(), ShapeError> {
        ensure_finite(Operation::SetMagnitude, &[magnitude])?;
        self.magnitude = magnitude;
        Ok(())
    }
}
