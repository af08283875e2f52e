use serde::{Deserialize, Serialize};

use crate::constants::{AUTHORED_UP_OFFSET, FULL_TURN, MIN_VERTEX_COUNT, RECTANGLE_VERTEX_COUNT};
use crate::error::{ensure_finite, ensure_positive, Operation, ShapeError};
use crate::point::Point;

/// A template vertex in local polar form, computed once from its authored
/// Cartesian offset.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct PolarOffset {
    pub distance: f64,
    pub angle: f64,
}

impl PolarOffset {
    pub fn from_cartesian(offset: Point) -> Self {
        Self {
            distance: offset.length(),
            angle: offset.angle(),
        }
    }
}

/// How a body's outline is laid out around its origin.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum VertexTemplate {
    /// Regular n-gon with its first vertex on the heading.
    Regular { vertex_count: usize, half_width: f64 },
    /// Authored outline, "up" (+y) facing forward.
    Custom { offsets: Vec<PolarOffset> },
    /// Four corners of a `width` x `height` box, "up" facing forward.
    Rectangle { width: f64, height: f64 },
}

impl VertexTemplate {
    pub fn regular(vertex_count: usize, width: f64) -> Result<Self, ShapeError> {
        check_vertex_count(vertex_count)?;
        ensure_positive(Operation::Construct, width)?;
        Ok(Self::Regular {
            vertex_count,
            half_width: width / 2.0,
        })
    }

    pub fn custom(offsets: &[Point]) -> Result<Self, ShapeError> {
        check_vertex_count(offsets.len())?;
        for offset in offsets {
            ensure_finite(Operation::Construct, &[offset.x, offset.y])?;
        }
        let offsets: Vec<PolarOffset> = offsets
            .iter()
            .copied()
            .map(PolarOffset::from_cartesian)
            .collect();
        check_offset_distances(&offsets)?;
        Ok(Self::Custom { offsets })
    }

    pub fn rectangle(width: f64, height: f64) -> Result<Self, ShapeError> {
        ensure_positive(Operation::Construct, width)?;
        ensure_positive(Operation::Construct, height)?;
        Ok(Self::Rectangle { width, height })
    }

    /// Re-checks a template that did not come through a constructor, e.g. one
    /// deserialized from a scenario file.
    pub fn validate(&self) -> Result<(), ShapeError> {
        match self {
            Self::Regular {
                vertex_count,
                half_width,
            } => {
                check_vertex_count(*vertex_count)?;
                ensure_positive(Operation::Construct, *half_width)
            }
            Self::Custom { offsets } => {
                check_vertex_count(offsets.len())?;
                for offset in offsets {
                    ensure_finite(Operation::Construct, &[offset.distance, offset.angle])?;
                }
                check_offset_distances(offsets)
            }
            Self::Rectangle { width, height } => {
                ensure_positive(Operation::Construct, *width)?;
                ensure_positive(Operation::Construct, *height)
            }
        }
    }

    pub fn vertex_count(&self) -> usize {
        match self {
            Self::Regular { vertex_count, .. } => *vertex_count,
            Self::Custom { offsets } => offsets.len(),
            Self::Rectangle { .. } => RECTANGLE_VERTEX_COUNT,
        }
    }

    /// Bounding extents `(width, height)` used by the collision pre-filter and
    /// the viewport check.
    pub fn extents(&self) -> (f64, f64) {
        match self {
            Self::Regular { half_width, .. } => (half_width * 2.0, half_width * 2.0),
            Self::Custom { offsets } => {
                let furthest = offsets
                    .iter()
                    .map(|offset| offset.distance)
                    .fold(0.0, f64::max);
                (furthest * 2.0, furthest * 2.0)
            }
            Self::Rectangle { width, height } => (*width, *height),
        }
    }

    /// Writes the world-space outline for a body at `origin` facing
    /// `effective_angle` into `out`, replacing its contents.
    pub fn generate(&self, origin: Point, effective_angle: f64, out: &mut Vec<Point>) {
        out.clear();
        match self {
            Self::Regular {
                vertex_count,
                half_width,
            } => {
                let increment = FULL_TURN / *vertex_count as f64;
                out.extend((0..*vertex_count).map(|i| {
                    origin + Point::from_angle(i as f64 * increment + effective_angle) * *half_width
                }));
            }
            Self::Custom { offsets } => {
                out.extend(
                    offsets
                        .iter()
                        .map(|offset| place_authored(origin, effective_angle, *offset)),
                );
            }
            Self::Rectangle { width, height } => {
                // Rotation matrix instead of polar offsets: at the default
                // heading the angle is exactly zero and the corners land on
                // exact coordinates, which edge-to-edge contact relies on.
                let (hw, hh) = (width / 2.0, height / 2.0);
                let (sin, cos) = (effective_angle - AUTHORED_UP_OFFSET).sin_cos();
                out.extend(
                    [
                        Point::new(-hw, hh),
                        Point::new(-hw, -hh),
                        Point::new(hw, -hh),
                        Point::new(hw, hh),
                    ]
                    .into_iter()
                    .map(|corner| {
                        origin
                            + Point::new(
                                corner.x * cos - corner.y * sin,
                                corner.x * sin + corner.y * cos,
                            )
                    }),
                );
            }
        }
    }
}

fn place_authored(origin: Point, effective_angle: f64, offset: PolarOffset) -> Point {
    origin + Point::from_angle(offset.angle + effective_angle - AUTHORED_UP_OFFSET) * offset.distance
}

/// No negative radius, and at least one vertex off the origin.
fn check_offset_distances(offsets: &[PolarOffset]) -> Result<(), ShapeError> {
    if let Some(offset) = offsets.iter().find(|offset| offset.distance < 0.0) {
        return Err(ShapeError::InvalidSize {
            op: Operation::Construct,
            value: offset.distance,
        });
    }
    if offsets.iter().all(|offset| offset.distance == 0.0) {
        return Err(ShapeError::InvalidSize {
            op: Operation::Construct,
            value: 0.0,
        });
    }
    Ok(())
}

fn check_vertex_count(count: usize) -> Result<(), ShapeError> {
    if count < MIN_VERTEX_COUNT {
        return Err(ShapeError::TooFewVertices {
            count,
            min: MIN_VERTEX_COUNT,
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use core::f64::consts::FRAC_PI_2;

    const EPS: f64 = 1e-9;

    fn assert_points_close(actual: &[Point], expected: &[Point]) {
        assert_eq!(actual.len(), expected.len());
        for (a, e) in actual.iter().zip(expected) {
            assert!(a.distance(*e) < EPS, "expected {expected:?}, got {actual:?}");
        }
    }

    #[test]
    fn regular_square_facing_up_has_vertex_on_heading() {
        let template = VertexTemplate::regular(4, 20.0).expect("square");
        let mut out = Vec::new();
        template.generate(Point::new(5.0, 5.0), FRAC_PI_2, &mut out);
        assert_points_close(
            &out,
            &[
                Point::new(5.0, 15.0),
                Point::new(-5.0, 5.0),
                Point::new(5.0, -5.0),
                Point::new(15.0, 5.0),
            ],
        );
    }

    #[test]
    fn custom_outline_at_default_heading_reproduces_authored_offsets() {
        let authored = [
            Point::new(0.0, 150.0),
            Point::new(-30.0, 0.0),
            Point::new(0.0, -50.0),
            Point::new(30.0, 0.0),
        ];
        let template = VertexTemplate::custom(&authored).expect("ship");
        let mut out = Vec::new();
        template.generate(Point::ORIGIN, FRAC_PI_2, &mut out);
        assert_points_close(&out, &authored);
        assert_eq!(template.extents(), (300.0, 300.0));
    }

    #[test]
    fn rectangle_corners_follow_heading() {
        let template = VertexTemplate::rectangle(40.0, 10.0).expect("rect");
        let mut out = Vec::new();
        template.generate(Point::ORIGIN, FRAC_PI_2, &mut out);
        assert_points_close(
            &out,
            &[
                Point::new(-20.0, 5.0),
                Point::new(-20.0, -5.0),
                Point::new(20.0, -5.0),
                Point::new(20.0, 5.0),
            ],
        );

        // A quarter turn to face +x lays the long side along y.
        template.generate(Point::ORIGIN, 0.0, &mut out);
        assert_points_close(
            &out,
            &[
                Point::new(5.0, 20.0),
                Point::new(-5.0, 20.0),
                Point::new(-5.0, -20.0),
                Point::new(5.0, -20.0),
            ],
        );
        assert_eq!(template.extents(), (40.0, 10.0));
    }

    #[test]
    fn rejects_degenerate_templates() {
        assert_eq!(
            VertexTemplate::regular(2, 10.0),
            Err(ShapeError::TooFewVertices { count: 2, min: 3 })
        );
        assert!(VertexTemplate::regular(5, 0.0).is_err());
        assert!(VertexTemplate::custom(&[Point::ORIGIN, Point::new(1.0, 0.0)]).is_err());
        assert!(VertexTemplate::custom(&[Point::ORIGIN; 3]).is_err());
        assert!(VertexTemplate::rectangle(10.0, f64::INFINITY).is_err());
    }

    #[test]
    fn deserialized_templates_are_revalidated() {
        let template: VertexTemplate =
            serde_json::from_str(r#"{"kind":"regular","vertex_count":1,"half_width":4.0}"#)
                .expect("json");
        assert!(template.validate().is_err());

        let template: VertexTemplate =
            serde_json::from_str(r#"{"kind":"rectangle","width":4.0,"height":2.0}"#).expect("json");
        assert!(template.validate().is_ok());
        assert_eq!(template.vertex_count(), 4);
    }

    #[test]
    fn custom_offsets_from_files_get_the_constructor_checks() {
        let collapsed = VertexTemplate::Custom {
            offsets: vec![
                PolarOffset {
                    distance: 0.0,
                    angle: 0.0,
                };
                3
            ],
        };
        assert_eq!(
            collapsed.validate(),
            Err(ShapeError::InvalidSize {
                op: Operation::Construct,
                value: 0.0,
            })
        );

        let inverted: VertexTemplate = serde_json::from_str(
            r#"{"kind":"custom","offsets":[
                {"distance":5.0,"angle":0.0},
                {"distance":-5.0,"angle":1.0},
                {"distance":5.0,"angle":2.0}]}"#,
        )
        .expect("json");
        assert_eq!(
            inverted.validate(),
            Err(ShapeError::InvalidSize {
                op: Operation::Construct,
                value: -5.0,
            })
        );

        let authored = VertexTemplate::custom(&[
            Point::ORIGIN,
            Point::new(0.0, 4.0),
            Point::new(3.0, 0.0),
        ])
        .expect("triangle");
        assert_eq!(authored.validate(), Ok(()));
    }
}
