use thiserror::Error;

#[derive(Error, Debug)]
pub enum FactorError {
    #[error("Dimension mismatch: expected {expected}, got {got} in {context}")]
    DimensionMismatch {
        expected: usize,
        got: usize,
        context: String,
    },

    #[error("Matrix is not positive definite (pivot {index} = {pivot:.3e})")]
    NotPositiveDefinite { index: usize, pivot: f64 },

    #[error("Singular pivot: D[{index}] is zero and a later row divides by it")]
    SingularPivot { index: usize },

    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),

    #[error("Data error: {0}")]
    Data(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
}

impl FactorError {
    /// True when the input was well-formed but numerically unsuitable, so the
    /// caller may retry with [`force_ldl`](crate::cholesky::force_ldl).
    pub fn is_recoverable(&self) -> bool {
        matches!(
            self,
            FactorError::NotPositiveDefinite { .. } | FactorError::SingularPivot { .. }
        )
    }
}

pub type Result<T> = std::result::Result<T, FactorError>;
