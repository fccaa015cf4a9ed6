use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum CurveError {
    #[error("invalid argument: {0}")]
    InvalidArgument(String),
    #[error("shape mismatch: {lhs_rows}x{lhs_cols} vs {rhs_rows}x{rhs_cols} ({operation})")]
    ShapeMismatch {
        operation: &'static str,
        lhs_rows: usize,
        lhs_cols: usize,
        rhs_rows: usize,
        rhs_cols: usize,
    },
    #[error("domain mismatch: [{lhs_start}, {lhs_end}] and [{rhs_start}, {rhs_end}] do not overlap")]
    DomainMismatch {
        lhs_start: f64,
        lhs_end: f64,
        rhs_start: f64,
        rhs_end: f64,
    },
    #[error("{what} index {index} out of range (size {size})")]
    IndexOutOfRange {
        what: &'static str,
        index: usize,
        size: usize,
    },
}

impl CurveError {
    pub fn invalid_argument(message: impl Into<String>) -> CurveError {
        CurveError::InvalidArgument(message.into())
    }

    pub fn segment_out_of_range(index: usize, size: usize) -> CurveError {
        CurveError::IndexOutOfRange { what: "segment", index, size }
    }

    pub fn row_out_of_range(index: usize, size: usize) -> CurveError {
        CurveError::IndexOutOfRange { what: "row", index, size }
    }

    pub fn col_out_of_range(index: usize, size: usize) -> CurveError {
        CurveError::IndexOutOfRange { what: "column", index, size }
    }
}
