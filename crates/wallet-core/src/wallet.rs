//! Ethereum JSON keystore handling. Cellframe's `.dwallet` container lives
//! in `chain_cellframe::wallet` and is reused as-is; this module covers the
//! Ethereum-side keystore format the core is additionally responsible for.

use serde::{Deserialize, Serialize};

use crate::error::WalletError;

/// Unencrypted Ethereum keystore record. The private key is stored in the
/// clear; callers are responsible for protecting the file at rest beyond
/// the owner-only POSIX permission this module sets.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EthKeystore {
    pub version: u32,
    pub address: String,
    pub private_key: String,
    pub created_at: u64,
    pub blockchain: String,
    pub network: String,
}

impl EthKeystore {
    pub fn new(address: String, private_key: [u8; 32], created_at: u64) -> Self {
        EthKeystore {
            version: 1,
            address,
            private_key: hex::encode(private_key),
            created_at,
            blockchain: "ethereum".to_string(),
            network: "mainnet".to_string(),
        }
    }
}

/// Serialize a keystore to disk, restricting permissions to owner-only on
/// POSIX systems — the same pattern `chain_cellframe::wallet::save_to_file`
/// uses for `.dwallet` files.
pub fn save_to_file(keystore: &EthKeystore, path: &std::path::Path) -> Result<(), WalletError> {
    let json = serde_json::to_string_pretty(keystore)
        .map_err(|e| WalletError::IoError(format!("keystore serialization failed: {e}")))?;
    std::fs::write(path, json).map_err(|e| WalletError::IoError(e.to_string()))?;

    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        std::fs::set_permissions(path, std::fs::Permissions::from_mode(0o600))
            .map_err(|e| WalletError::IoError(e.to_string()))?;
    }

    Ok(())
}

/// Load and parse a keystore file.
pub fn load_from_file(path: &std::path::Path) -> Result<EthKeystore, WalletError> {
    let json = std::fs::read_to_string(path).map_err(|e| WalletError::IoError(e.to_string()))?;
    serde_json::from_str(&json)
        .map_err(|e| WalletError::InvalidInput(format!("malformed keystore: {e}")))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keystore_round_trips_through_json() {
        let keystore = EthKeystore::new(
            "0x5aAeb6053F3E94C9b9A09f33669435E7Ef1BeAed".to_string(),
            [0x11; 32],
            1_700_000_000,
        );
        let json = serde_json::to_string(&keystore).unwrap();
        let parsed: EthKeystore = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed.address, keystore.address);
        assert_eq!(parsed.private_key, keystore.private_key);
        assert_eq!(parsed.blockchain, "ethereum");
        assert_eq!(parsed.network, "mainnet");
        assert_eq!(parsed.version, 1);
    }

    #[test]
    fn save_to_file_sets_owner_only_permissions() {
        let keystore = EthKeystore::new(
            "0x5aAeb6053F3E94C9b9A09f33669435E7Ef1BeAed".to_string(),
            [0x22; 32],
            1_700_000_000,
        );
        let dir = std::env::temp_dir().join(format!("wallet-core-eth-keystore-test-{}", std::process::id()));
        std::fs::create_dir_all(&dir).unwrap();
        let path = dir.join("test.json");

        save_to_file(&keystore, &path).unwrap();
        let loaded = load_from_file(&path).unwrap();
        assert_eq!(loaded.address, keystore.address);

        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            let mode = std::fs::metadata(&path).unwrap().permissions().mode();
            assert_eq!(mode & 0o777, 0o600);
        }

        std::fs::remove_dir_all(&dir).ok();
    }

    #[test]
    fn load_rejects_malformed_json() {
        let dir = std::env::temp_dir().join(format!("wallet-core-eth-keystore-bad-{}", std::process::id()));
        std::fs::create_dir_all(&dir).unwrap();
        let path = dir.join("bad.json");
        std::fs::write(&path, "not json").unwrap();

        assert!(load_from_file(&path).is_err());
        std::fs::remove_dir_all(&dir).ok();
    }
}
