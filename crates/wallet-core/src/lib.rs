//! Chain-agnostic wallet core: mnemonic/seed handling, per-chain key
//! derivation, address validation, wallet file formats, and the
//! [`adapter::BlockchainAdapter`] contract the Cellframe and Ethereum
//! adapters both implement.

pub mod address;
pub mod adapter;
pub mod error;
pub mod hd_derivation;
pub mod mnemonic;
pub mod types;
pub mod wallet;

use zeroize::Zeroize;

use error::WalletError;
use types::{Chain, DerivedAddress};

/// Generate a new 24-word BIP-39 mnemonic.
pub fn generate_mnemonic() -> Result<String, WalletError> {
    mnemonic::generate_mnemonic()
}

/// Validate a mnemonic phrase (word-list membership and checksum).
pub fn validate_mnemonic(phrase: &str) -> bool {
    mnemonic::validate_mnemonic(phrase)
}

/// Check if a single word is in the BIP-39 word list.
pub fn is_valid_bip39_word(word: &str) -> bool {
    mnemonic::is_valid_word(word)
}

/// Derive seed bytes from mnemonic + passphrase.
pub fn mnemonic_to_seed(mnemonic_phrase: &str, passphrase: &str) -> Result<Vec<u8>, WalletError> {
    mnemonic::mnemonic_to_seed(mnemonic_phrase, passphrase)
}

/// Derive an Ethereum address straight from a mnemonic, going through its
/// BIP-39 seed.
pub fn derive_eth_address_from_mnemonic(
    mnemonic_phrase: &str,
    passphrase: &str,
    account: u32,
    index: u32,
) -> Result<DerivedAddress, WalletError> {
    let mut seed = mnemonic::mnemonic_to_seed(mnemonic_phrase, passphrase)?;
    let result = address::derive_eth_address(&seed, account, index);
    seed.zeroize();
    result
}

/// Derive a Cellframe wallet straight from a mnemonic string (not its
/// BIP-39 seed — see [`address::derive_cellframe_wallet`]).
pub fn derive_cellframe_wallet_from_mnemonic(
    mnemonic_phrase: &str,
    name: &str,
    net_id: u64,
) -> chain_cellframe::wallet::CellframeWallet {
    address::derive_cellframe_wallet(mnemonic_phrase, name, net_id)
}

/// Validate an address for a given chain.
pub fn validate_address(addr: &str, chain: Chain) -> bool {
    address::validate_address(addr, chain)
}

/// Sign an arbitrary message with EIP-191 `personal_sign`. Returns a
/// 65-byte signature (`r || s || v`).
pub fn sign_eth_message(mut seed: Vec<u8>, account: u32, index: u32, message: &[u8]) -> Result<Vec<u8>, WalletError> {
    let key = hd_derivation::derive_secp256k1_key(&seed, account, index)?;
    let sig = chain_eth::transaction::sign_message(message, &key.private_key)?;
    seed.zeroize();
    Ok(sig)
}

/// Compute a Keccak-256 hash.
pub fn keccak256(data: &[u8]) -> Vec<u8> {
    use sha3::{Digest, Keccak256};
    Keccak256::digest(data).to_vec()
}

/// Recover an uncompressed secp256k1 public key from a 65-byte signature
/// and a 32-byte message hash. Returns a 65-byte uncompressed public key
/// (`0x04 || x || y`).
pub fn recover_eth_pubkey(signature: &[u8], message_hash: &[u8]) -> Result<Vec<u8>, WalletError> {
    use k256::ecdsa::{RecoveryId, Signature, VerifyingKey};

    if signature.len() != 65 {
        return Err(WalletError::InvalidInput("signature must be 65 bytes".into()));
    }
    if message_hash.len() != 32 {
        return Err(WalletError::InvalidInput("message hash must be 32 bytes".into()));
    }

    let r_s = &signature[..64];
    let v = signature[64];
    let recovery_id = if v >= 27 { v - 27 } else { v };

    let sig = Signature::from_slice(r_s).map_err(|e| WalletError::KeyError(format!("invalid signature: {e}")))?;
    let recid = RecoveryId::from_byte(recovery_id).ok_or_else(|| WalletError::KeyError("invalid recovery id".into()))?;

    let recovered_key = VerifyingKey::recover_from_prehash(message_hash, &sig, recid)
        .map_err(|e| WalletError::KeyError(format!("recovery failed: {e}")))?;

    Ok(recovered_key.to_encoded_point(false).as_bytes().to_vec())
}

#[cfg(test)]
mod tests {
    use super::*;

    const TEST_MNEMONIC: &str = "abandon abandon abandon abandon abandon abandon abandon abandon abandon abandon abandon about";

    #[test]
    fn derive_eth_address_from_mnemonic_is_deterministic() {
        let a1 = derive_eth_address_from_mnemonic(TEST_MNEMONIC, "", 0, 0).unwrap();
        let a2 = derive_eth_address_from_mnemonic(TEST_MNEMONIC, "", 0, 0).unwrap();
        assert_eq!(a1.address, a2.address);
    }

    #[test]
    fn derive_cellframe_wallet_from_mnemonic_is_deterministic() {
        let w1 = derive_cellframe_wallet_from_mnemonic(TEST_MNEMONIC, "w", 0x0404202200000000);
        let w2 = derive_cellframe_wallet_from_mnemonic(TEST_MNEMONIC, "w", 0x0404202200000000);
        assert_eq!(w1.address, w2.address);
    }

    #[test]
    fn keccak256_matches_known_vector() {
        let digest = keccak256(b"");
        assert_eq!(
            hex::encode(digest),
            "c5d2460186f7233c927e7db2dcc703c0e500b653ca82273b7bfad8045d85a470"
        );
    }

    #[test]
    fn recover_eth_pubkey_round_trips_through_sign_message() {
        let mut seed = mnemonic_to_seed(TEST_MNEMONIC, "").unwrap();
        let key = hd_derivation::derive_secp256k1_key(&seed, 0, 0).unwrap();
        seed.zeroize();

        let message = b"hello";
        let sig = chain_eth::transaction::sign_message(message, &key.private_key).unwrap();

        let digest = {
            use sha3::{Digest, Keccak256};
            let prefixed = format!("\x19Ethereum Signed Message:\n{}", message.len());
            let mut hasher = Keccak256::new();
            hasher.update(prefixed.as_bytes());
            hasher.update(message);
            hasher.finalize()
        };

        let recovered = recover_eth_pubkey(&sig, &digest).unwrap();
        assert_eq!(recovered, key.public_key_uncompressed);
    }

    #[test]
    fn recover_eth_pubkey_rejects_wrong_lengths() {
        assert!(recover_eth_pubkey(&[0u8; 10], &[0u8; 32]).is_err());
        assert!(recover_eth_pubkey(&[0u8; 65], &[0u8; 10]).is_err());
    }
}
