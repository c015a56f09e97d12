//! Error types for matrix and ket operations.

use core::fmt;
use thiserror::Error;

/// The operation whose shape precondition was violated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operation {
    /// Matrix product `A·B`, requiring `A.cols == B.rows`.
    MatrixMultiply,
    /// Elementwise ket addition.
    KetAdd,
    /// Elementwise ket subtraction.
    KetSubtract,
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MatrixMultiply => f.write_str("matrix multiply"),
            Self::KetAdd => f.write_str("ket add"),
            Self::KetSubtract => f.write_str("ket subtract"),
        }
    }
}

/// Errors raised by `Matrix` and `Ket` operations.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum MathError {
    /// Operand dimensions disagree.
    #[error("Dimension mismatch in {operation}: expected {expected}, got {actual}")]
    DimensionMismatch {
        operation: Operation,
        expected: usize,
        actual: usize,
    },

    /// Matrix element access outside the stored extents.
    #[error("Index ({row}, {col}) out of bounds for {rows}x{cols} matrix")]
    IndexOutOfBounds {
        row: usize,
        col: usize,
        rows: usize,
        cols: usize,
    },

    /// Ket element access outside the stored length.
    #[error("Index {index} out of bounds for ket of size {size}")]
    KetIndexOutOfBounds { index: usize, size: usize },

    /// Gate column count differs from the target ket's length.
    #[error("Cannot apply a gate with {matrix_cols} columns to a ket of size {ket_size}")]
    ShapeMismatch { matrix_cols: usize, ket_size: usize },

    /// A literal row list whose rows disagree in length.
    #[error("Row {row} has {actual} elements, expected {expected}")]
    RaggedRows {
        row: usize,
        expected: usize,
        actual: usize,
    },
}

/// Result type for matrix and ket operations.
pub type Result<T> = std::result::Result<T, MathError>;
