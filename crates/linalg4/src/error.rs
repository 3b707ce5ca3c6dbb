//! Error taxonomy shared by the value types and the array bridge.
//!
//! Every fallible operation validates before writing, so an `Err` leaves the
//! receiver exactly as it was.

use std::fmt;

use crate::scalar::DType;

/// Which index of an access was out of range.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Axis {
    Component,
    Row,
    Column,
}

impl fmt::Display for Axis {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Axis::Component => f.write_str("component"),
            Axis::Row => f.write_str("row"),
            Axis::Column => f.write_str("column"),
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub enum LinalgError {
    /// Buffer or argument list does not have the fixed dimensionality.
    Shape { expected: Vec<usize>, got: Vec<usize> },
    /// Row, column or component index outside `[0, 3]`.
    Index { axis: Axis, index: isize },
    /// External element type is not `float32`/`float64`.
    Dtype { found: DType },
    /// Runtime-typed operands were instantiated over different precisions.
    PrecisionMismatch { lhs: DType, rhs: DType },
    /// Buffer descriptor addresses bytes it does not own.
    Stride { reason: String },
    /// Text could not be read as a vector or matrix.
    Parse { reason: String },
}

impl LinalgError {
    pub(crate) fn shape(expected: &[usize], got: &[usize]) -> Self {
        Self::Shape {
            expected: expected.to_vec(),
            got: got.to_vec(),
        }
    }

    pub(crate) fn stride(reason: impl Into<String>) -> Self {
        Self::Stride {
            reason: reason.into(),
        }
    }

    pub(crate) fn parse(reason: impl Into<String>) -> Self {
        Self::Parse {
            reason: reason.into(),
        }
    }
}

impl fmt::Display for LinalgError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Shape { expected, got } => {
                write!(f, "shape error: expected {expected:?}, got {got:?}")
            }
            Self::Index { axis, index } => {
                write!(f, "index error: {axis} index {index} outside [0, 3]")
            }
            Self::Dtype { found } => write!(
                f,
                "dtype error: {found} is not a supported precision (float32, float64)"
            ),
            Self::PrecisionMismatch { lhs, rhs } => write!(
                f,
                "precision mismatch: {lhs} operand combined with {rhs} operand"
            ),
            Self::Stride { reason } => write!(f, "invalid strides: {reason}"),
            Self::Parse { reason } => write!(f, "parse error: {reason}"),
        }
    }
}

impl std::error::Error for LinalgError {}

pub type Result<T> = std::result::Result<T, LinalgError>;

/// Map a signed index onto `0..4`; negative values are errors, not wraparound.
#[inline]
pub(crate) fn check_index(axis: Axis, index: isize) -> Result<usize> {
    if (0..4).contains(&index) {
        Ok(index as usize)
    } else {
        Err(LinalgError::Index { axis, index })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn check_index_bounds() {
        assert_eq!(check_index(Axis::Row, 0), Ok(0));
        assert_eq!(check_index(Axis::Row, 3), Ok(3));
        assert_eq!(
            check_index(Axis::Column, 4),
            Err(LinalgError::Index {
                axis: Axis::Column,
                index: 4
            })
        );
        assert!(check_index(Axis::Component, -1).is_err());
    }

    #[test]
    fn messages_name_expected_and_actual() {
        let msg = LinalgError::shape(&[4, 4], &[3, 4]).to_string();
        assert!(msg.contains("[4, 4]") && msg.contains("[3, 4]"));
        let msg = LinalgError::Dtype {
            found: DType::Int32,
        }
        .to_string();
        assert!(msg.contains("int32"));
    }
}
