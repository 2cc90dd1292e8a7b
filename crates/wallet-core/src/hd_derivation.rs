use bip32::{DerivationPath, XPrv};
use k256::ecdsa::SigningKey;
use zeroize::Zeroize;

use crate::error::WalletError;

/// BIP-44 derivation path for the Ethereum/EVM family:
/// `m/44'/60'/account'/0/index`. Every EVM chain id shares this one path;
/// the chain is selected at the transaction level, not here.
fn derivation_path(account: u32, index: u32) -> String {
    format!("m/44'/60'/{account}'/0/{index}")
}

/// Derive a secp256k1 private key from a BIP-39 seed via BIP-32.
pub fn derive_secp256k1_key(seed: &[u8], account: u32, index: u32) -> Result<DerivedKey, WalletError> {
    let path_str = derivation_path(account, index);

    let path: DerivationPath = path_str
        .parse()
        .map_err(|e: bip32::Error| WalletError::KeyError(e.to_string()))?;

    let xprv = XPrv::derive_from_path(seed, &path).map_err(|e| WalletError::KeyError(e.to_string()))?;

    let private_key_bytes: [u8; 32] = xprv.to_bytes();
    let signing_key = SigningKey::from_bytes(&private_key_bytes.into())
        .map_err(|e| WalletError::KeyError(e.to_string()))?;

    let verifying_key = signing_key.verifying_key();
    let public_key_compressed: [u8; 33] = verifying_key
        .to_sec1_bytes()
        .as_ref()
        .try_into()
        .map_err(|_| WalletError::KeyError("invalid public key length".into()))?;

    let public_key_uncompressed: [u8; 65] = verifying_key
        .to_encoded_point(false)
        .as_bytes()
        .try_into()
        .map_err(|_| WalletError::KeyError("invalid uncompressed public key".into()))?;

    Ok(DerivedKey {
        private_key: private_key_bytes,
        public_key_compressed,
        public_key_uncompressed,
        derivation_path: path_str,
    })
}

/// Derived secp256k1 key (Ethereum). Zeroizes the private key on drop.
pub struct DerivedKey {
    pub private_key: [u8; 32],
    pub public_key_compressed: [u8; 33],
    pub public_key_uncompressed: [u8; 65],
    pub derivation_path: String,
}

impl Drop for DerivedKey {
    fn drop(&mut self) {
        self.private_key.zeroize();
    }
}
