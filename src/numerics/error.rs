// src/numerics/error.rs
// Error type shared by matrix construction, cell access and arithmetic.

/// Errors that can occur while constructing or operating on a matrix.
///
/// Every variant is raised synchronously, before any worker thread is
/// spawned and before any cell of a result is written.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum MatrixError {
    /// Construction received a cell count that does not match the requested
    /// shape, or exactly one of the two dimensions was zero.
    #[error("wrong dimensions in constructor: {rows}x{cols} with {len} cells")]
    BadShape { rows: usize, cols: usize, len: usize },

    /// The operand shapes are incompatible for the attempted operation.
    #[error(
        "wrong dimensions for {op}: left is {left_rows}x{left_cols}, \
         right is {right_rows}x{right_cols}"
    )]
    DimensionMismatch {
        op: &'static str,
        left_rows: usize,
        left_cols: usize,
        right_rows: usize,
        right_cols: usize,
    },

    /// Trace was requested on a non-square matrix.
    #[error("matrix is not square ({rows}x{cols}), trace cannot be calculated")]
    NotSquare { rows: usize, cols: usize },

    /// A 1-based cell access fell outside `[1, rows] x [1, cols]`.
    #[error("cell ({row}, {col}) is not in the bounds of a {rows}x{cols} matrix")]
    OutOfRange {
        row: usize,
        col: usize,
        rows: usize,
        cols: usize,
    },

    /// Backing storage for the requested cell count could not be reserved.
    #[error("bad allocation of matrix: failed to reserve {cells} cells")]
    AllocationFailed { cells: usize },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages_name_the_shapes() {
        let err = MatrixError::DimensionMismatch {
            op: "addition",
            left_rows: 2,
            left_cols: 2,
            right_rows: 1,
            right_cols: 2,
        };
        assert_eq!(
            err.to_string(),
            "wrong dimensions for addition: left is 2x2, right is 1x2"
        );

        let err = MatrixError::OutOfRange {
            row: 3,
            col: 1,
            rows: 2,
            cols: 2,
        };
        assert_eq!(
            err.to_string(),
            "cell (3, 1) is not in the bounds of a 2x2 matrix"
        );

        let err = MatrixError::BadShape {
            rows: 2,
            cols: 3,
            len: 5,
        };
        assert_eq!(
            err.to_string(),
            "wrong dimensions in constructor: 2x3 with 5 cells"
        );
    }
}
