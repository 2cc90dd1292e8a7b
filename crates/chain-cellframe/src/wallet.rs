use zeroize::Zeroizing;

use crate::address;
use crate::error::CellframeError;
use crate::keyframe::{self, KIND_DILITHIUM};

const MAGIC: &[u8; 8] = b"DWALLET\0";
const HEADER_LEN: usize = 23;
const CERT_HEADER: [u8; 8] = [0x00, 0x00, 0x00, 0x00, 0x01, 0x00, 0x00, 0x00];
const CERT_PADDING_LEN: usize = 89;

/// An in-memory Cellframe wallet: a derived or loaded Dilithium keypair and
/// its address. `sk_serialized` is `None` for protected (v2) wallets.
pub struct CellframeWallet {
    pub name: String,
    pub address: String,
    pub protected: bool,
    pub pk_serialized: Vec<u8>,
    pub sk_serialized: Option<Zeroizing<Vec<u8>>>,
}

/// Derive a wallet deterministically from a 32-byte seed.
pub fn derive_from_seed(seed: &[u8; 32], name: &str, net_id: u64) -> CellframeWallet {
    let (pk_raw, sk_raw) = pq_crypto::dilithium_keypair_from_seed(seed);
    let pk_serialized = keyframe::frame(&pk_raw, KIND_DILITHIUM);
    let sk_serialized = keyframe::frame(&sk_raw, KIND_DILITHIUM);
    let wallet_address = address::compose_address(&pk_serialized, net_id);

    CellframeWallet {
        name: name.to_string(),
        address: wallet_address,
        protected: false,
        pk_serialized,
        sk_serialized: Some(Zeroizing::new(sk_serialized)),
    }
}

/// Derive a wallet from a mnemonic string using the Cellframe seed rule:
/// `seed = SHA3-256(mnemonic_with_spaces)`. This is explicitly not BIP-39.
pub fn derive_from_mnemonic(mnemonic: &str, name: &str, net_id: u64) -> CellframeWallet {
    let seed = pq_crypto::sha3_256(mnemonic.as_bytes());
    derive_from_seed(&seed, name, net_id)
}

/// Load a `.dwallet` file's bytes. Returns a protected wallet (no keys, no
/// address) if the file is a v2 (encrypted) container.
pub fn load(bytes: &[u8], net_id: u64) -> Result<CellframeWallet, CellframeError> {
    if bytes.len() < HEADER_LEN {
        return Err(CellframeError::IoError(
            "wallet file shorter than its header".into(),
        ));
    }
    if &bytes[0..8] != MAGIC {
        return Err(CellframeError::InvalidInput(
            "wallet file magic mismatch".into(),
        ));
    }

    let version = u32::from_le_bytes(bytes[8..12].try_into().unwrap());
    let name_length = u16::from_le_bytes(bytes[21..23].try_into().unwrap()) as usize;

    if version == 2 {
        return Ok(CellframeWallet {
            name: String::new(),
            address: String::new(),
            protected: true,
            pk_serialized: Vec::new(),
            sk_serialized: None,
        });
    }
    if version != 1 {
        return Err(CellframeError::InvalidInput(format!(
            "unsupported wallet version {version}"
        )));
    }

    let name_start = HEADER_LEN;
    let name_end = name_start + name_length;
    if bytes.len() < name_end {
        return Err(CellframeError::IoError(
            "wallet file truncated before name".into(),
        ));
    }
    let name = String::from_utf8_lossy(&bytes[name_start..name_end]).into_owned();

    let pk_offset = HEADER_LEN + name_length + 8 + CERT_PADDING_LEN;
    if bytes.len() < pk_offset + 8 {
        return Err(CellframeError::IoError(
            "wallet file truncated before public key length".into(),
        ));
    }
    let pk_total_length =
        u64::from_le_bytes(bytes[pk_offset..pk_offset + 8].try_into().unwrap()) as usize;
    if bytes.len() < pk_offset + pk_total_length {
        return Err(CellframeError::IoError(
            "wallet file truncated before end of public key".into(),
        ));
    }
    let pk_serialized = bytes[pk_offset..pk_offset + pk_total_length].to_vec();

    let sk_offset = pk_offset + pk_total_length;
    if bytes.len() < sk_offset + 8 {
        return Err(CellframeError::IoError(
            "wallet file truncated before private key length".into(),
        ));
    }
    let sk_total_length =
        u64::from_le_bytes(bytes[sk_offset..sk_offset + 8].try_into().unwrap()) as usize;
    if bytes.len() < sk_offset + sk_total_length {
        return Err(CellframeError::IoError(
            "wallet file truncated before end of private key".into(),
        ));
    }
    let sk_serialized = bytes[sk_offset..sk_offset + sk_total_length].to_vec();

    let wallet_address = address::compose_address(&pk_serialized, net_id);

    Ok(CellframeWallet {
        name,
        address: wallet_address,
        protected: false,
        pk_serialized,
        sk_serialized: Some(Zeroizing::new(sk_serialized)),
    })
}

/// Serialize this wallet to the v1 `.dwallet` byte layout. Fails for
/// protected wallets, which carry no key material to write.
pub fn write_v1(wallet: &CellframeWallet) -> Result<Vec<u8>, CellframeError> {
    let sk_serialized = wallet
        .sk_serialized
        .as_ref()
        .ok_or(CellframeError::ProtectedWallet)?;

    let name_bytes = wallet.name.as_bytes();
    if name_bytes.len() > 64 {
        return Err(CellframeError::InvalidInput(
            "wallet name exceeds 64 bytes".into(),
        ));
    }

    let mut out = Vec::with_capacity(
        HEADER_LEN
            + name_bytes.len()
            + CERT_HEADER.len()
            + CERT_PADDING_LEN
            + wallet.pk_serialized.len()
            + sk_serialized.len(),
    );

    out.extend_from_slice(MAGIC);
    out.extend_from_slice(&1u32.to_le_bytes());
    out.push(0u8); // type
    out.extend_from_slice(&[0u8; 8]);
    out.extend_from_slice(&(name_bytes.len() as u16).to_le_bytes());

    out.extend_from_slice(name_bytes);
    out.extend_from_slice(&CERT_HEADER);
    out.extend_from_slice(&[0u8; CERT_PADDING_LEN]);
    out.extend_from_slice(&wallet.pk_serialized);
    out.extend_from_slice(sk_serialized);

    Ok(out)
}

/// Write a v1 wallet to disk, restricting permissions to owner-only on
/// POSIX systems.
pub fn save_to_file(wallet: &CellframeWallet, path: &std::path::Path) -> Result<(), CellframeError> {
    let bytes = write_v1(wallet)?;
    std::fs::write(path, &bytes).map_err(|e| CellframeError::IoError(e.to_string()))?;

    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        std::fs::set_permissions(path, std::fs::Permissions::from_mode(0o600))
            .map_err(|e| CellframeError::IoError(e.to_string()))?;
    }

    Ok(())
}
