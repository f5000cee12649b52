use thiserror::Error;

use crate::dtype::DType;

/// All errors returned by `numkern-core`.
///
/// Every variant is raised synchronously at the failed precondition. Kernels
/// check shapes and operator support before allocating their output, so an
/// `Err` never leaves a partially written result behind.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CoreError {
    /// Operand shapes are not compatible: non-broadcastable elementwise
    /// operands, a transpose destination of the wrong shape, or cumulative
    /// input and output of different extents.
    #[error("shape mismatch: expected {expected:?}, got {got:?}")]
    ShapeMismatch {
        expected: Vec<usize>,
        got: Vec<usize>,
    },

    /// A dimension index is outside `0..ndim`.
    #[error("dimension {dim} out of range for array with {ndim} dimensions")]
    DimensionOutOfRange { dim: usize, ndim: usize },

    /// A shape specification is invalid for the requested operation.
    #[error("invalid shape {shape:?}: {reason}")]
    InvalidShape {
        shape: Vec<usize>,
        reason: &'static str,
    },

    /// A multi-dimensional or linear index is out of bounds.
    #[error("index {index:?} out of bounds for shape {shape:?}")]
    IndexOutOfBounds {
        index: Vec<usize>,
        shape: Vec<usize>,
    },

    /// The operator has no definition for the element type.
    #[error("operator `{op}` is not supported for element type {dtype}")]
    UnsupportedOperation { op: &'static str, dtype: DType },

    /// Integer division, modulus or remainder by zero.
    #[error("integer division by zero")]
    DivisionByZero,

    /// The operation is not supported for the given input.
    #[error("invalid argument: {reason}")]
    InvalidArgument { reason: &'static str },

    /// A dynamically typed array does not hold the requested element type.
    #[error("element type mismatch: expected {expected}, got {got}")]
    TypeMismatch { expected: DType, got: DType },

    /// A kernel tuning knob could not be parsed or is out of range.
    #[error("invalid value {value:?} for configuration key {key}")]
    InvalidConfig { key: &'static str, value: String },
}

/// Convenience alias used throughout `numkern-core`.
pub type Result<T> = std::result::Result<T, CoreError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_shape_mismatch() {
        let e = CoreError::ShapeMismatch {
            expected: vec![3, 2],
            got: vec![2, 3],
        };
        assert_eq!(e.to_string(), "shape mismatch: expected [3, 2], got [2, 3]");
    }

    #[test]
    fn test_display_unsupported() {
        let e = CoreError::UnsupportedOperation {
            op: "xor",
            dtype: DType::Float64,
        };
        assert_eq!(
            e.to_string(),
            "operator `xor` is not supported for element type float64"
        );
    }

    #[test]
    fn test_display_dimension_out_of_range() {
        let e = CoreError::DimensionOutOfRange { dim: 3, ndim: 2 };
        assert!(e.to_string().contains("dimension 3"));
    }
}
