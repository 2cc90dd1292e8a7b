use serde::{Deserialize, Serialize};

/// Supported blockchain networks.
///
/// `Ethereum` stands for the whole EVM family; the concrete network is
/// selected at the transaction/adapter level via `chain_id`, not by adding
/// a `Chain` variant per EVM deployment (see `chain_eth::chains`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Chain {
    Cellframe,
    Ethereum,
}

impl Chain {
    /// BIP-44 coin type for this chain. Cellframe derives from the raw
    /// mnemonic string (§4.4), not from a BIP-44 path, so it has none.
    pub fn coin_type(&self) -> Option<u32> {
        match self {
            Chain::Cellframe => None,
            Chain::Ethereum => Some(60),
        }
    }

    /// Which curve/signature primitive this chain signs with.
    pub fn curve(&self) -> CurveType {
        match self {
            Chain::Cellframe => CurveType::Dilithium,
            Chain::Ethereum => CurveType::Secp256k1,
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            Chain::Cellframe => "Cellframe",
            Chain::Ethereum => "Ethereum",
        }
    }

    pub fn symbol(&self) -> &'static str {
        match self {
            Chain::Cellframe => "CELL",
            Chain::Ethereum => "ETH",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CurveType {
    Secp256k1,
    Dilithium,
}

/// Derived address for a specific chain.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DerivedAddress {
    pub chain: Chain,
    pub address: String,
    pub derivation_path: String,
}

/// Wallet metadata (non-sensitive, safe to persist alongside a keystore).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WalletMetadata {
    pub name: String,
    pub created_at: u64,
    pub chains: Vec<Chain>,
    pub has_passphrase: bool,
}
