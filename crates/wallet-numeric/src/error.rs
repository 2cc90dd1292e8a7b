use thiserror::Error;

/// 256-bit arithmetic and decimal-parsing errors.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum NumericError {
    #[error("numeric overflow: {0}")]
    NumericOverflow(String),

    #[error("invalid input: {0}")]
    InvalidInput(String),
}
