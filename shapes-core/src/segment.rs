use serde::{Deserialize, Serialize};

use crate::error::{ensure_finite, Operation, ShapeError};
use crate::point::Point;
use crate::vector::OrientedVector;

/// A straight line from `tail` to `head`.
///
/// Stored as an [`OrientedVector`] anchored at the tail whose magnitude is the
/// segment length, so the head is always derived and the two ends can never
/// disagree with the heading.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Segment {
    vector: OrientedVector,
}

impl Segment {
    pub fn new(tail: Point, head: Point) -> Result<Self, ShapeError> {
        ensure_finite(Operation::Construct, &[head.x, head.y])?;
        let mut vector = OrientedVector::new(tail)?;
        vector.set_rotation((head - tail).angle())?;
        vector.set_magnitude(tail.distance(head))?;
        Ok(Self { vector })
    }

    /// Segment of `length` starting at the vector's origin along its heading.
    pub fn from_vector(vector: OrientedVector, length: f64) -> Result<Self, ShapeError> {
        let mut vector = vector;
        vector.set_magnitude(length)?;
        Ok(Self { vector })
    }

    pub fn tail(&self) -> Point {
        self.vector.origin()
    }

    pub fn head(&self) -> Point {
        self.vector.head()
    }

    pub fn length(&self) -> f64 {
        self.vector.magnitude()
    }

    /// Angle of the segment relative to the +x axis.
    pub fn rotation(&self) -> f64 {
        self.vector.argument()
    }

    pub fn walk(&mut self, displacement: f64) -> Result<(), ShapeError> {
        self.vector.walk(displacement)
    }

    /// Rotates the head around the tail.
    pub fn rotate(&mut self, delta: f64) -> Result<(), ShapeError> {
        self.vector.rotate(delta)
    }

    pub fn look_at(&mut self, x: f64, y: f64) -> Result<(), ShapeError> {
        self.vector.look_at(x, y)
    }

    /// Moves the tail to `(x, y)`, keeping length and direction.
    pub fn move_to(&mut self, x: f64, y: f64) -> Result<(), ShapeError> {
        self.vector.move_to(x, y)
    }

    pub fn set_head(&mut self, x: f64, y: f64) -> Result<(), ShapeError> {
        *self = Self::new(self.tail(), Point::new(x, y))?;
        Ok(())
    }

    pub fn set_tail(&mut self, x: f64, y: f64) -> Result<(), ShapeError> {
        *self = Self::new(Point::new(x, y), self.head())?;
        Ok(())
    }
}
