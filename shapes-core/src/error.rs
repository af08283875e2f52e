use core::fmt;

/// Which mutator or constructor rejected its input.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Operation {
    Walk,
    Rotate,
    Spin,
    LookAt,
    MoveTo,
    SetRotation,
    SetMagnitude,
    SetVertexCount,
    Construct,
    Viewport,
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Walk => write!(f, "walk"),
            Self::Rotate => write!(f, "rotate"),
            Self::Spin => write!(f, "spin"),
            Self::LookAt => write!(f, "look_at"),
            Self::MoveTo => write!(f, "move_to"),
            Self::SetRotation => write!(f, "set_rotation"),
            Self::SetMagnitude => write!(f, "set_magnitude"),
            Self::SetVertexCount => write!(f, "set_vertex_count"),
            Self::Construct => write!(f, "construct"),
            Self::Viewport => write!(f, "viewport"),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum ShapeError {
    TooFewVertices { count: usize, min: usize },
    NonFinite { op: Operation, value: f64 },
    InvalidSize { op: Operation, value: f64 },
    NotRegular,
}

impl fmt::Display for ShapeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::TooFewVertices { count, min } => {
                write!(f, "polygon needs at least {min} vertices, got {count}")
            }
            Self::NonFinite { op, value } => {
                write!(f, "{op}: non-finite input {value}")
            }
            Self::InvalidSize { op, value } => {
                write!(f, "{op}: size must be positive and finite, got {value}")
            }
            Self::NotRegular => write!(f, "vertex count can only change on a regular polygon"),
        }
    }
}

impl std::error::Error for ShapeError {}

/// Rejects NaN and infinities before they reach any stored field.
#[inline]
pub(crate) fn ensure_finite(op: Operation, values: &[f64]) -> Result<(), ShapeError> {
    match values.iter().find(|value| !value.is_finite()) {
        Some(&value) => Err(ShapeError::NonFinite { op, value }),
        None => Ok(()),
    }
}

#[inline]
pub(crate) fn ensure_positive(op: Operation, value: f64) -> Result<(), ShapeError> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(ShapeError::InvalidSize { op, value })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn finite_check_reports_first_offender() {
        let err = ensure_finite(Operation::MoveTo, &[1.0, f64::NAN, f64::INFINITY])
            .expect_err("nan must be rejected");
        match err {
            ShapeError::NonFinite { op, value } => {
                assert_eq!(op, Operation::MoveTo);
                assert!(value.is_nan());
            }
            other => panic!("unexpected error {other:?}"),
        }
        assert!(ensure_finite(Operation::Walk, &[0.0, -3.5]).is_ok());
    }

    #[test]
    fn display_names_the_operation() {
        let err = ShapeError::NonFinite {
            op: Operation::LookAt,
            value: f64::INFINITY,
        };
        assert_eq!(err.to_string(), "look_at: non-finite input inf");
        assert_eq!(
            ShapeError::TooFewVertices { count: 2, min: 3 }.to_string(),
            "polygon needs at least 3 vertices, got 2"
        );
    }

    #[test]
    fn positive_check_rejects_zero_and_nan() {
        assert!(ensure_positive(Operation::Construct, 0.0).is_err());
        assert!(ensure_positive(Operation::Construct, -1.0).is_err());
        assert!(ensure_positive(Operation::Construct, f64::NAN).is_err());
        assert!(ensure_positive(Operation::Construct, 0.5).is_ok());
    }
}
