//! Per-chain address derivation.
//!
//! Ethereum derives through a uniform BIP-39 seed and BIP-32 path. Cellframe
//! does not: its seed rule is `SHA3-256(mnemonic_with_spaces)` applied
//! directly to the mnemonic string, deliberately not BIP-39. The two chains
//! therefore get distinct entry points rather than a single
//! `derive_address(seed, chain, ...)` dispatch over a shared seed buffer.

use crate::error::WalletError;
use crate::hd_derivation;
use crate::types::{Chain, DerivedAddress};

/// Derive an Ethereum address from a BIP-39 seed.
pub fn derive_eth_address(seed: &[u8], account: u32, index: u32) -> Result<DerivedAddress, WalletError> {
    let key = hd_derivation::derive_secp256k1_key(seed, account, index)?;
    let address = chain_eth::address::pubkey_bytes_to_eth_address(&key.public_key_compressed)?;

    Ok(DerivedAddress {
        chain: Chain::Ethereum,
        address,
        derivation_path: key.derivation_path.clone(),
    })
}

/// Derive a Cellframe wallet directly from the mnemonic string (not its
/// BIP-39 seed). Returns the full wallet, since the address alone would
/// discard the keypair the caller needs to sign with.
pub fn derive_cellframe_wallet(
    mnemonic: &str,
    name: &str,
    net_id: u64,
) -> chain_cellframe::wallet::CellframeWallet {
    chain_cellframe::wallet::derive_from_mnemonic(mnemonic, name, net_id)
}

/// Validate an address for a given chain.
pub fn validate_address(address: &str, chain: Chain) -> bool {
    match chain {
        Chain::Ethereum => chain_eth::address::validate_address(address).unwrap_or(false),
        Chain::Cellframe => chain_cellframe::address::validate_address(address),
    }
}
