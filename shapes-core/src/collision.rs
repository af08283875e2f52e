//! Two-phase convex polygon overlap test.
//!
//! Phase one compares center distance against the sum of both bodies' largest
//! extents. That sum is of diameters, not radii, so the filter is loose on
//! purpose and never rejects a real contact. Phase two is the Separating Axis
//! Theorem over every edge normal of both outlines.
//!
//! Touching outlines (projections meeting at exactly one value) count as
//! colliding. Both outlines must be convex with at least three vertices.

use crate::point::Point;

/// Anything that can present an ordered, closed world-space outline.
pub trait Outline {
    fn world_vertices(&self) -> &[Point];

    fn center(&self) -> Point;

    /// Largest bounding dimension (width or height).
    fn max_extent(&self) -> f64;
}

/// Closed interval of an outline projected onto an axis.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Projection {
    pub min: f64,
    pub max: f64,
}

impl Projection {
    /// Projects `vertices` onto `axis` with a plain dot product. The axis is
    /// not normalised; intervals are only ever compared on the same axis.
    pub fn onto(vertices: &[Point], axis: Point) -> Self {
        let mut min = f64::INFINITY;
        let mut max = f64::NEG_INFINITY;
        for vertex in vertices {
            let value = vertex.dot(axis);
            min = min.min(value);
            max = max.max(value);
        }
        Self { min, max }
    }

    /// Strictly disjoint; shared endpoints overlap.
    pub fn is_separated_from(&self, other: &Projection) -> bool {
        self.max < other.min || other.max < self.min
    }
}

/// Left-hand normal `(-e.y, e.x)` of every edge `v[i] -> v[i + 1]`, wrapping
/// the last vertex back to the first.
pub fn edge_normals(vertices: &[Point]) -> impl Iterator<Item = Point> + '_ {
    let count = vertices.len();
    (0..count).map(move |i| (vertices[(i + 1) % count] - vertices[i]).perp())
}

pub fn bounding_circles_overlap<A, B>(a: &A, b: &B) -> bool
where
    A: Outline + ?Sized,
    B: Outline + ?Sized,
{
    a.center().distance(b.center()) < a.max_extent() + b.max_extent()
}

/// True when some edge normal of either outline separates them.
pub fn separated_on_axes(a: &[Point], b: &[Point]) -> bool {
    edge_normals(a)
        .chain(edge_normals(b))
        .any(|axis| Projection::onto(a, axis).is_separated_from(&Projection::onto(b, axis)))
}

pub fn is_colliding<A, B>(a: &A, b: &B) -> bool
where
    A: Outline + ?Sized,
    B: Outline + ?Sized,
{
    if !bounding_circles_overlap(a, b) {
        return false;
    }
    !separated_on_axes(a.world_vertices(), b.world_vertices())
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Fixed {
        vertices: Vec<Point>,
        center: Point,
        extent: f64,
    }

    impl Outline for Fixed {
        fn world_vertices(&self) -> &[Point] {
            &self.vertices
        }

        fn center(&self) -> Point {
            self.center
        }

        fn max_extent(&self) -> f64 {
            self.extent
        }
    }

    fn square(cx: f64, cy: f64, side: f64) -> Fixed {
        let h = side / 2.0;
        Fixed {
            vertices: vec![
                Point::new(cx - h, cy - h),
                Point::new(cx + h, cy - h),
                Point::new(cx + h, cy + h),
                Point::new(cx - h, cy + h),
            ],
            center: Point::new(cx, cy),
            extent: side,
        }
    }

    #[test]
    fn projection_covers_all_vertices() {
        let sq = square(0.0, 0.0, 2.0);
        let projection = Projection::onto(&sq.vertices, Point::new(2.0, 0.0));
        assert_eq!(projection, Projection { min: -2.0, max: 2.0 });
    }

    #[test]
    fn shared_endpoint_is_not_a_separation() {
        let a = Projection { min: 0.0, max: 1.0 };
        let b = Projection { min: 1.0, max: 2.0 };
        assert!(!a.is_separated_from(&b));
        let c = Projection { min: 1.5, max: 2.0 };
        assert!(a.is_separated_from(&c));
        assert!(c.is_separated_from(&a));
    }

    #[test]
    fn edge_normals_wrap_around() {
        let sq = square(0.0, 0.0, 2.0);
        let normals: Vec<Point> = edge_normals(&sq.vertices).collect();
        assert_eq!(normals.len(), 4);
        // Closing edge: (-1, 1) -> (-1, -1) is (0, -2), normal (2, 0).
        assert_eq!(normals[3], Point::new(2.0, 0.0));
    }

    #[test]
    fn prefilter_rejects_far_bodies_before_sat() {
        // Vertices that would overlap, but the declared centers are far apart.
        let mut a = square(0.0, 0.0, 10.0);
        let b = square(0.0, 0.0, 10.0);
        a.center = Point::new(100.0, 0.0);
        assert!(!bounding_circles_overlap(&a, &b));
        assert!(!is_colliding(&a, &b));
    }

    #[test]
    fn sat_catches_prefilter_false_positive() {
        // Circles overlap but the squares have a clear gap along x.
        let a = square(0.0, 0.0, 10.0);
        let b = square(12.0, 0.0, 10.0);
        assert!(bounding_circles_overlap(&a, &b));
        assert!(separated_on_axes(&a.vertices, &b.vertices));
        assert!(!is_colliding(&a, &b));
    }

    #[test]
    fn touching_edges_collide() {
        let a = square(-25.0, 0.0, 50.0);
        let b = square(25.0, 0.0, 50.0);
        assert!(is_colliding(&a, &b));
    }

    #[test]
    fn contained_square_collides() {
        let outer = square(0.0, 0.0, 100.0);
        let inner = square(10.0, -10.0, 5.0);
        assert!(is_colliding(&outer, &inner));
        assert!(is_colliding(&inner, &outer));
    }
}
