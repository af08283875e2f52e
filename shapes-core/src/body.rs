use serde::Serialize;

use crate::bounds::overlaps_viewport;
use crate::collision::{self, Outline};
use crate::coords::Viewport;
use crate::error::{ensure_finite, Operation, ShapeError};
use crate::point::Point;
use crate::template::VertexTemplate;
use crate::vector::OrientedVector;

/// A rigid polygon placed on the plane by an [`OrientedVector`].
///
/// Two angles drive the outline: the vector's heading, which `look_at`,
/// `rotate` and `walk` work with, and `spin`, a self-rotation that never
/// changes where the body is facing. The outline is generated from
/// `heading + spin`. Only `set_rotation` resets the spin.
///
/// Every mutator regenerates the world vertices before returning, so reads
/// always reflect the latest change. A rejected mutation leaves the body as it
/// was.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct PolygonBody {
    orientation: OrientedVector,
    spin: f64,
    template: VertexTemplate,
    vertices: Vec<Point>,
}

impl PolygonBody {
    pub fn new(origin: Point, template: VertexTemplate) -> Result<Self, ShapeError> {
        template.validate()?;
        let mut body = Self {
            orientation: OrientedVector::new(origin)?,
            spin: 0.0,
            vertices: Vec::with_capacity(template.vertex_count()),
            template,
        };
        body.refresh();
        Ok(body)
    }

    /// Regular polygon whose circumscribed circle has diameter `width`.
    pub fn regular(origin: Point, vertex_count: usize, width: f64) -> Result<Self, ShapeError> {
        Self::new(origin, VertexTemplate::regular(vertex_count, width)?)
    }

    /// Custom outline given as offsets from the origin, with +y as forward.
    pub fn custom(origin: Point, offsets: &[Point]) -> Result<Self, ShapeError> {
        Self::new(origin, VertexTemplate::custom(offsets)?)
    }

    pub fn rectangle(origin: Point, width: f64, height: f64) -> Result<Self, ShapeError> {
        Self::new(origin, VertexTemplate::rectangle(width, height)?)
    }

    pub fn position(&self) -> Point {
        self.orientation.origin()
    }

    pub fn heading(&self) -> f64 {
        self.orientation.argument()
    }

    pub fn spin_angle(&self) -> f64 {
        self.spin
    }

    pub fn orientation(&self) -> &OrientedVector {
        &self.orientation
    }

    pub fn template(&self) -> &VertexTemplate {
        &self.template
    }

    pub fn vertices(&self) -> &[Point] {
        &self.vertices
    }

    pub fn width(&self) -> f64 {
        self.template.extents().0
    }

    pub fn height(&self) -> f64 {
        self.template.extents().1
    }

    pub fn max_extent(&self) -> f64 {
        let (width, height) = self.template.extents();
        width.max(height)
    }

    pub fn walk(&mut self, displacement: f64) -> Result<(), ShapeError> {
        self.orientation.walk(displacement)?;
        self.refresh();
        Ok(())
    }

    pub fn rotate(&mut self, delta: f64) -> Result<(), ShapeError> {
        self.orientation.rotate(delta)?;
        self.refresh();
        Ok(())
    }

    /// Adds to the self-rotation without touching the heading.
    pub fn spin(&mut self, delta: f64) -> Result<(), ShapeError> {
        ensure_finite(Operation::Spin, &[delta])?;
        self.spin += delta;
        self.refresh();
        Ok(())
    }

    pub fn look_at(&mut self, x: f64, y: f64) -> Result<(), ShapeError> {
        self.orientation.look_at(x, y)?;
        self.refresh();
        Ok(())
    }

    pub fn move_to(&mut self, x: f64, y: f64) -> Result<(), ShapeError> {
        self.orientation.move_to(x, y)?;
        self.refresh();
        Ok(())
    }

    /// Sets the heading absolutely and clears any spin, so the outline faces
    /// exactly `angle`.
    pub fn set_rotation(&mut self, angle: f64) -> Result<(), ShapeError> {
        self.orientation.set_rotation(angle)?;
        self.spin = 0.0;
        self.refresh();
        Ok(())
    }

    /// Only valid for regular polygons.
    pub fn set_vertex_count(&mut self, count: usize) -> Result<(), ShapeError> {
        let width = match &self.template {
            VertexTemplate::Regular { half_width, .. } => half_width * 2.0,
            _ => return Err(ShapeError::NotRegular),
        };
        self.template = VertexTemplate::regular(count, width)?;
        self.refresh();
        Ok(())
    }

    pub fn is_inside_viewport(&self, viewport: &Viewport) -> bool {
        overlaps_viewport(viewport, self.position(), self.width(), self.height())
    }

    pub fn is_colliding<T: Outline + ?Sized>(&self, other: &T) -> bool {
        collision::is_colliding(self, other)
    }

    fn refresh(&mut self) {
        let effective = self.orientation.argument() + self.spin;
        self.template
            .generate(self.orientation.origin(), effective, &mut self.vertices);
    }
}

impl Outline for PolygonBody {
    fn world_vertices(&self) -> &[Point] {
        &self.vertices
    }

    fn center(&self) -> Point {
        self.position()
    }

    fn max_extent(&self) -> f64 {
        PolygonBody::max_extent(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use core::f64::consts::{FRAC_PI_2, PI};

    const EPS: f64 = 1e-9;

    fn triangle_at(x: f64, y: f64) -> PolygonBody {
        PolygonBody::regular(Point::new(x, y), 3, 10.0).expect("triangle")
    }

    #[test]
    fn construction_rejects_too_few_vertices() {
        assert_eq!(
            PolygonBody::regular(Point::ORIGIN, 2, 10.0),
            Err(ShapeError::TooFewVertices { count: 2, min: 3 })
        );
        assert!(PolygonBody::custom(Point::ORIGIN, &[Point::new(1.0, 1.0)]).is_err());
        assert!(PolygonBody::regular(Point::new(f64::NAN, 0.0), 3, 10.0).is_err());
    }

    #[test]
    fn vertex_count_survives_every_mutation() {
        let mut body = PolygonBody::regular(Point::ORIGIN, 6, 40.0).expect("hexagon");
        assert_eq!(body.vertices().len(), 6);
        body.walk(12.0).expect("walk");
        body.rotate(0.4).expect("rotate");
        body.spin(1.1).expect("spin");
        body.look_at(-50.0, 80.0).expect("look");
        body.move_to(3.0, 3.0).expect("move");
        body.set_rotation(-2.0).expect("set rotation");
        assert_eq!(body.vertices().len(), 6);

        body.set_vertex_count(9).expect("nonagon");
        assert_eq!(body.vertices().len(), 9);
        assert_eq!(body.template().vertex_count(), 9);
        assert!((body.width() - 40.0).abs() < EPS);
    }

    #[test]
    fn set_vertex_count_guards() {
        let mut body = PolygonBody::regular(Point::ORIGIN, 5, 10.0).expect("pentagon");
        assert!(body.set_vertex_count(2).is_err());
        assert_eq!(body.vertices().len(), 5);

        let mut rect = PolygonBody::rectangle(Point::ORIGIN, 4.0, 2.0).expect("rect");
        assert_eq!(rect.set_vertex_count(6), Err(ShapeError::NotRegular));
    }

    #[test]
    fn spin_turns_outline_but_not_heading() {
        let mut spun = triangle_at(0.0, 0.0);
        let mut turned = triangle_at(0.0, 0.0);
        spun.spin(0.5).expect("spin");
        turned.rotate(0.5).expect("rotate");

        assert_eq!(spun.heading(), FRAC_PI_2);
        assert_eq!(spun.spin_angle(), 0.5);
        for (a, b) in spun.vertices().iter().zip(turned.vertices()) {
            assert!(a.distance(*b) < EPS);
        }

        // Walking still follows the heading, not the spun outline.
        spun.walk(10.0).expect("walk");
        assert!((spun.position().x).abs() < EPS);
        assert!((spun.position().y - 10.0).abs() < EPS);
    }

    #[test]
    fn set_rotation_clears_spin() {
        let mut body = triangle_at(0.0, 0.0);
        body.spin(0.5).expect("spin");
        body.set_rotation(0.0).expect("set rotation");
        assert_eq!(body.heading(), 0.0);
        assert_eq!(body.spin_angle(), 0.0);
        assert!(body.vertices()[0].distance(Point::new(5.0, 0.0)) < EPS);

        body.spin(0.25).expect("spin");
        assert!(body.set_rotation(f64::NAN).is_err());
        assert_eq!(body.spin_angle(), 0.25);
        body.set_rotation(PI).expect("set rotation");
        assert_eq!(body.spin_angle(), 0.0);
        assert!(body.vertices()[0].distance(Point::new(-5.0, 0.0)) < EPS);
    }

    #[test]
    fn move_to_preserves_heading() {
        let mut body = triangle_at(0.0, 0.0);
        body.rotate(1.0).expect("rotate");
        let heading = body.heading();
        body.move_to(-999.0, 123.0).expect("move");
        assert_eq!(body.heading(), heading);
        assert_eq!(body.position(), Point::new(-999.0, 123.0));
    }

    #[test]
    fn vertices_are_a_pure_function_of_pose() {
        let mut a = triangle_at(0.0, 0.0);
        a.walk(5.0).expect("walk");
        a.rotate(1.0).expect("rotate");
        a.spin(0.5).expect("spin");

        let mut b = triangle_at(0.0, 5.0);
        b.set_rotation(FRAC_PI_2 + 1.5).expect("set rotation");
        for (p, q) in a.vertices().iter().zip(b.vertices()) {
            assert!(p.distance(*q) < EPS);
        }
    }

    #[test]
    fn rejected_mutation_keeps_vertices() {
        let mut body = triangle_at(1.0, 1.0);
        let before = body.clone();
        assert!(body.walk(f64::NAN).is_err());
        assert!(body.spin(f64::INFINITY).is_err());
        assert!(body.look_at(0.0, f64::NAN).is_err());
        assert_eq!(body, before);
    }

    #[test]
    fn custom_body_extents_come_from_furthest_offset() {
        let body = PolygonBody::custom(
            Point::ORIGIN,
            &[
                Point::new(0.0, 120.0),
                Point::new(-20.0, 100.0),
                Point::new(-30.0, 0.0),
                Point::new(0.0, -50.0),
                Point::new(50.0, 0.0),
                Point::new(70.0, 150.0),
            ],
        )
        .expect("rock");
        let furthest = 70f64.hypot(150.0);
        assert!((body.width() - furthest * 2.0).abs() < EPS);
        assert_eq!(body.width(), body.height());
        assert_eq!(body.vertices().len(), 6);
    }

    #[test]
    fn viewport_check_uses_body_extents() {
        let viewport = Viewport::new(1280.0, 720.0).expect("viewport");
        assert!(triangle_at(0.0, 0.0).is_inside_viewport(&viewport));
        assert!(!triangle_at(10_000.0, 10_000.0).is_inside_viewport(&viewport));
    }
}
