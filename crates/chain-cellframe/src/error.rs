use thiserror::Error;

/// Cellframe chain operation errors.
#[derive(Debug, Error)]
pub enum CellframeError {
    #[error("invalid input: {0}")]
    InvalidInput(String),

    #[error("numeric overflow: {0}")]
    NumericOverflow(String),

    #[error("insufficient funds: available {available}, required {required}")]
    InsufficientFunds { available: String, required: String },

    #[error("key error: {0}")]
    KeyError(String),

    #[error("io error: {0}")]
    IoError(String),

    #[error("rpc error: {0}")]
    RpcError(String),

    #[error("node rejected transaction: {0}")]
    NodeRejected(String),

    #[error("wallet is protected (encrypted); cannot be read by this core")]
    ProtectedWallet,

    #[error("not found: {0}")]
    NotFound(String),
}

impl From<wallet_numeric::NumericError> for CellframeError {
    fn from(err: wallet_numeric::NumericError) -> Self {
        match err {
            wallet_numeric::NumericError::NumericOverflow(msg) => {
                CellframeError::NumericOverflow(msg)
            }
            wallet_numeric::NumericError::InvalidInput(msg) => CellframeError::InvalidInput(msg),
        }
    }
}

impl From<pq_crypto::PqError> for CellframeError {
    fn from(err: pq_crypto::PqError) -> Self {
        match err {
            pq_crypto::PqError::KeyError(msg) => CellframeError::KeyError(msg),
            pq_crypto::PqError::InvalidInput(msg) => CellframeError::InvalidInput(msg),
        }
    }
}
