use crate::error::CellframeError;

const SIG_TYPE_DILITHIUM: u32 = 0x0102;
const PREFIX_LEN: usize = 45;
const ADDRESS_LEN: usize = 77;

/// Compose a 77-byte Cellframe address from a serialized public key and
/// network id, then base58-encode it.
///
/// `serialized_pubkey` is the SDK-framed form (`[len:u64][kind:u32][raw]`),
/// not the raw Dilithium public key — the address hash commits to the
/// framed bytes.
pub fn compose_address(serialized_pubkey: &[u8], net_id: u64) -> String {
    let key_hash = pq_crypto::sha3_256(serialized_pubkey);

    let mut prefix = [0u8; PREFIX_LEN];
    prefix[0] = 0;
    prefix[1..9].copy_from_slice(&net_id.to_le_bytes());
    prefix[9..13].copy_from_slice(&SIG_TYPE_DILITHIUM.to_le_bytes());
    prefix[13..45].copy_from_slice(&key_hash);

    let checksum = pq_crypto::sha3_256(&prefix);

    let mut packed = [0u8; ADDRESS_LEN];
    packed[..PREFIX_LEN].copy_from_slice(&prefix);
    packed[PREFIX_LEN..].copy_from_slice(&checksum);

    bs58::encode(packed).into_string()
}

/// A decoded 77-byte Cellframe address structure.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecodedAddress {
    pub version: u8,
    pub net_id: u64,
    pub sig_type: u32,
    pub key_hash: [u8; 32],
    pub checksum: [u8; 32],
}

/// Validate a base58 Cellframe address string and return its raw 77-byte
/// packed form (for embedding in OUT/OUT_EXT item addr fields).
///
/// Checks the 100-110 character length gate, exact 77-byte decoded length,
/// zero version byte, and that `checksum` matches SHA3-256 of the first 45
/// bytes.
pub fn decode_to_raw(address: &str) -> Result<[u8; ADDRESS_LEN], CellframeError> {
    if address.len() < 100 || address.len() > 110 {
        return Err(CellframeError::InvalidInput(format!(
            "address length {} out of range 100..=110",
            address.len()
        )));
    }

    let packed = bs58::decode(address)
        .into_vec()
        .map_err(|e| CellframeError::InvalidInput(format!("base58 decode failed: {e}")))?;

    if packed.len() != ADDRESS_LEN {
        return Err(CellframeError::InvalidInput(format!(
            "decoded address must be {ADDRESS_LEN} bytes, got {}",
            packed.len()
        )));
    }

    if packed[0] != 0 {
        return Err(CellframeError::InvalidInput(format!(
            "unexpected address version {}",
            packed[0]
        )));
    }

    let expected_checksum = pq_crypto::sha3_256(&packed[..PREFIX_LEN]);
    if packed[PREFIX_LEN..] != expected_checksum {
        return Err(CellframeError::InvalidInput(
            "address checksum mismatch".into(),
        ));
    }

    let mut raw = [0u8; ADDRESS_LEN];
    raw.copy_from_slice(&packed);
    Ok(raw)
}

/// Decode a trusted, fixed protocol address (e.g. the network fee
/// collector) to its raw 77-byte form.
///
/// Unlike [`decode_to_raw`] this does not gate on a zero version byte: fixed
/// system addresses can carry a non-zero version (the network fee collector
/// constant is version 1) while still checksumming correctly over their
/// first 45 bytes. Only use this for addresses baked into the binary, never
/// for user-supplied recipient/sender strings.
pub fn decode_fixed_raw(address: &str) -> Result<[u8; ADDRESS_LEN], CellframeError> {
    if address.len() < 100 || address.len() > 110 {
        return Err(CellframeError::InvalidInput(format!(
            "address length {} out of range 100..=110",
            address.len()
        )));
    }

    let packed = bs58::decode(address)
        .into_vec()
        .map_err(|e| CellframeError::InvalidInput(format!("base58 decode failed: {e}")))?;

    if packed.len() != ADDRESS_LEN {
        return Err(CellframeError::InvalidInput(format!(
            "decoded address must be {ADDRESS_LEN} bytes, got {}",
            packed.len()
        )));
    }

    let expected_checksum = pq_crypto::sha3_256(&packed[..PREFIX_LEN]);
    if packed[PREFIX_LEN..] != expected_checksum {
        return Err(CellframeError::InvalidInput(
            "address checksum mismatch".into(),
        ));
    }

    let mut raw = [0u8; ADDRESS_LEN];
    raw.copy_from_slice(&packed);
    Ok(raw)
}

/// Validate and decode a base58 Cellframe address string into its fields.
pub fn validate_and_decode(address: &str) -> Result<DecodedAddress, CellframeError> {
    let packed = decode_to_raw(address)?;

    let net_id = u64::from_le_bytes(packed[1..9].try_into().unwrap());
    let sig_type = u32::from_le_bytes(packed[9..13].try_into().unwrap());
    let mut key_hash = [0u8; 32];
    key_hash.copy_from_slice(&packed[13..45]);
    let mut checksum = [0u8; 32];
    checksum.copy_from_slice(&packed[45..77]);

    Ok(DecodedAddress {
        version: packed[0],
        net_id,
        sig_type,
        key_hash,
        checksum,
    })
}

/// Validate a Cellframe address string without returning the decoded form.
pub fn validate_address(address: &str) -> bool {
    validate_and_decode(address).is_ok()
}
