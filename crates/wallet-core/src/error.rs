use thiserror::Error;

/// The core's error taxonomy, shared across chains and propagated to the
/// adapter boundary as-is.
#[derive(Debug, Error)]
pub enum WalletError {
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

impl From<wallet_numeric::NumericError> for WalletError {
    fn from(err: wallet_numeric::NumericError) -> Self {
        match err {
            wallet_numeric::NumericError::NumericOverflow(msg) => WalletError::NumericOverflow(msg),
            wallet_numeric::NumericError::InvalidInput(msg) => WalletError::InvalidInput(msg),
        }
    }
}

impl From<pq_crypto::PqError> for WalletError {
    fn from(err: pq_crypto::PqError) -> Self {
        match err {
            pq_crypto::PqError::KeyError(msg) => WalletError::KeyError(msg),
            pq_crypto::PqError::InvalidInput(msg) => WalletError::InvalidInput(msg),
        }
    }
}

impl From<chain_cellframe::error::CellframeError> for WalletError {
    fn from(err: chain_cellframe::error::CellframeError) -> Self {
        use chain_cellframe::error::CellframeError as E;
        match err {
            E::InvalidInput(msg) => WalletError::InvalidInput(msg),
            E::NumericOverflow(msg) => WalletError::NumericOverflow(msg),
            E::InsufficientFunds { available, required } => {
                WalletError::InsufficientFunds { available, required }
            }
            E::KeyError(msg) => WalletError::KeyError(msg),
            E::IoError(msg) => WalletError::IoError(msg),
            E::RpcError(msg) => WalletError::RpcError(msg),
            E::NodeRejected(msg) => WalletError::NodeRejected(msg),
            E::ProtectedWallet => WalletError::ProtectedWallet,
            E::NotFound(msg) => WalletError::NotFound(msg),
        }
    }
}

/// `EthError`'s variant set doesn't line up 1:1 with the core taxonomy, so
/// this mapping is a considered judgment call rather than a mechanical
/// rename: anything about a malformed key/address/transaction is
/// `InvalidInput`, signing/key-material failures are `KeyError`, and
/// everything RPC-shaped keeps its name.
impl From<chain_eth::error::EthError> for WalletError {
    fn from(err: chain_eth::error::EthError) -> Self {
        use chain_eth::error::EthError as E;
        match err {
            E::InvalidPrivateKey(msg) => WalletError::KeyError(msg),
            E::InvalidPublicKey(msg) => WalletError::KeyError(msg),
            E::InvalidAddress(msg) => WalletError::InvalidInput(msg),
            E::TransactionBuildError(msg) => WalletError::InvalidInput(msg),
            E::EncodingError(msg) => WalletError::InvalidInput(msg),
            E::UnsupportedChain(chain_id) => {
                WalletError::InvalidInput(format!("unsupported chain id: {chain_id}"))
            }
            E::SigningError(msg) => WalletError::KeyError(msg),
            E::RpcError(msg) => WalletError::RpcError(msg),
            E::NodeRejected(msg) => WalletError::NodeRejected(msg),
        }
    }
}
