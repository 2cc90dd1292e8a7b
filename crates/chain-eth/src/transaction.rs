use alloy_rlp::{Encodable, RlpEncodable};
use k256::ecdsa::signature::hazmat::PrehashSigner;
use k256::ecdsa::{RecoveryId, Signature, SigningKey};
use sha3::{Digest, Keccak256};
use wallet_numeric::U256;
use zeroize::Zeroize;

use crate::erc20;
use crate::error::EthError;

/// An unsigned legacy (pre-EIP-1559) Ethereum transaction, signed per
/// EIP-155 (chain id folded into `v` and into the signing preimage).
#[derive(Debug, Clone)]
pub struct EthTransaction {
    pub chain_id: u64,
    pub nonce: u64,
    pub gas_price: U256,
    pub gas_limit: u64,
    /// Recipient address as a 0x-prefixed hex string.
    pub to: String,
    pub value: U256,
    /// Calldata (empty for simple ETH transfers).
    pub data: Vec<u8>,
}

/// A signed legacy Ethereum transaction ready for broadcast.
pub struct SignedEthTransaction {
    /// RLP-encoded signed transaction bytes.
    pub raw_tx: Vec<u8>,
    /// Transaction hash as a 0x-prefixed hex string.
    pub tx_hash: String,
}

/// Builds an unsigned legacy ETH transfer transaction.
pub fn build_transfer(
    chain_id: u64,
    nonce: u64,
    to: &str,
    value_wei: U256,
    gas_price: U256,
    gas_limit: u64,
) -> Result<EthTransaction, EthError> {
    validate_to_address(to)?;

    Ok(EthTransaction {
        chain_id,
        nonce,
        gas_price,
        gas_limit,
        to: to.to_string(),
        value: value_wei,
        data: Vec::new(),
    })
}

/// Builds an unsigned legacy ERC-20 token transfer transaction.
///
/// The calldata is automatically encoded using `transfer(address,uint256)`.
pub fn build_erc20_transfer(
    chain_id: u64,
    nonce: u64,
    token_contract: &str,
    to: &str,
    amount: [u8; 32],
    gas_price: U256,
    gas_limit: u64,
) -> Result<EthTransaction, EthError> {
    validate_to_address(token_contract)?;

    let calldata = erc20::encode_transfer(to, amount)?;

    Ok(EthTransaction {
        chain_id,
        nonce,
        gas_price,
        gas_limit,
        to: token_contract.to_string(),
        value: U256::zero(),
        data: calldata,
    })
}

/// Signs a legacy transaction with the given secp256k1 private key.
///
/// EIP-155 signing process:
/// 1. RLP-encode `[nonce, gas_price, gas_limit, to, value, data, chain_id, 0, 0]`.
/// 2. Keccak-256 hash that preimage.
/// 3. Sign the hash with the private key using k256.
/// 4. `v = recovery_id + chain_id * 2 + 35`.
/// 5. RLP-encode `[nonce, gas_price, gas_limit, to, value, data, v, r, s]`.
pub fn sign_transaction(
    tx: &EthTransaction,
    private_key: &[u8; 32],
) -> Result<SignedEthTransaction, EthError> {
    let unsigned_payload = encode_unsigned_tx(tx)?;
    let msg_hash = Keccak256::digest(&unsigned_payload);

    let mut key_bytes = *private_key;
    let signing_key = SigningKey::from_bytes((&key_bytes).into())
        .map_err(|e| EthError::InvalidPrivateKey(e.to_string()))?;
    key_bytes.zeroize();

    let (signature, recovery_id): (Signature, RecoveryId) = signing_key
        .sign_prehash(msg_hash.as_slice())
        .map_err(|e| EthError::SigningError(e.to_string()))?;

    let r_bytes: [u8; 32] = signature.r().to_bytes().into();
    let s_bytes: [u8; 32] = signature.s().to_bytes().into();
    let v = recovery_id.to_byte() as u64 + tx.chain_id * 2 + 35;

    let signed_fields = SignedTxFields {
        nonce: tx.nonce,
        gas_price: RlpU256(tx.gas_price),
        gas_limit: tx.gas_limit,
        to: parse_to_bytes(&tx.to)?,
        value: RlpU256(tx.value),
        data: tx.data.clone(),
        v,
        r: RlpU256(U256::from_be_bytes(&r_bytes).expect("32 bytes always fit")),
        s: RlpU256(U256::from_be_bytes(&s_bytes).expect("32 bytes always fit")),
    };

    let mut rlp_buf = Vec::new();
    signed_fields.encode(&mut rlp_buf);

    let tx_hash = Keccak256::digest(&rlp_buf);
    let tx_hash_hex = format!("0x{}", hex::encode(tx_hash));

    Ok(SignedEthTransaction {
        raw_tx: rlp_buf,
        tx_hash: tx_hash_hex,
    })
}

/// Signs an arbitrary message using EIP-191 personal_sign.
///
/// The message is hashed as: keccak256("\x19Ethereum Signed Message:\n" + len(message) + message)
/// Returns the 65-byte signature (r[32] + s[32] + v[1]) where v is 27 or 28.
pub fn sign_message(message: &[u8], private_key: &[u8; 32]) -> Result<Vec<u8>, EthError> {
    let prefix = format!("\x19Ethereum Signed Message:\n{}", message.len());
    let mut hasher = Keccak256::new();
    hasher.update(prefix.as_bytes());
    hasher.update(message);
    let msg_hash = hasher.finalize();

    let mut key_bytes = *private_key;
    let signing_key = SigningKey::from_bytes((&key_bytes).into())
        .map_err(|e| EthError::InvalidPrivateKey(e.to_string()))?;
    key_bytes.zeroize();

    let (signature, recovery_id): (Signature, RecoveryId) = signing_key
        .sign_prehash(msg_hash.as_slice())
        .map_err(|e| EthError::SigningError(e.to_string()))?;

    let mut sig = Vec::with_capacity(65);
    sig.extend_from_slice(&signature.r().to_bytes());
    sig.extend_from_slice(&signature.s().to_bytes());
    sig.push(recovery_id.is_y_odd() as u8 + 27);
    Ok(sig)
}

/// Encodes the unsigned legacy transaction's EIP-155 signing preimage:
/// `rlp([nonce, gas_price, gas_limit, to, value, data, chain_id, 0, 0])`.
pub fn encode_unsigned_tx(tx: &EthTransaction) -> Result<Vec<u8>, EthError> {
    let unsigned_fields = UnsignedTxFields {
        nonce: tx.nonce,
        gas_price: RlpU256(tx.gas_price),
        gas_limit: tx.gas_limit,
        to: parse_to_bytes(&tx.to)?,
        value: RlpU256(tx.value),
        data: tx.data.clone(),
        chain_id: tx.chain_id,
        empty_r: 0u8,
        empty_s: 0u8,
    };

    let mut payload = Vec::new();
    unsigned_fields.encode(&mut payload);
    Ok(payload)
}

// ---------------------------------------------------------------------------
// RLP-encodable structures
// ---------------------------------------------------------------------------

/// EIP-155 signing-preimage fields (chain id replaces `v`, `r`=`s`=0).
#[derive(RlpEncodable)]
struct UnsignedTxFields {
    nonce: u64,
    gas_price: RlpU256,
    gas_limit: u64,
    to: RlpAddress,
    value: RlpU256,
    data: Vec<u8>,
    chain_id: u64,
    empty_r: u8,
    empty_s: u8,
}

/// Final broadcast-form legacy transaction fields.
#[derive(RlpEncodable)]
struct SignedTxFields {
    nonce: u64,
    gas_price: RlpU256,
    gas_limit: u64,
    to: RlpAddress,
    value: RlpU256,
    data: Vec<u8>,
    v: u64,
    r: RlpU256,
    s: RlpU256,
}

/// Wrapper for a 20-byte Ethereum address that implements `Encodable`.
#[derive(Debug, Clone)]
struct RlpAddress([u8; 20]);

impl Encodable for RlpAddress {
    fn encode(&self, out: &mut dyn alloy_rlp::BufMut) {
        self.0.as_slice().encode(out);
    }

    fn length(&self) -> usize {
        self.0.as_slice().length()
    }
}

/// Wrapper for a 256-bit integer that RLP-encodes as minimal big-endian
/// bytes with leading zeros stripped (standard RLP integer encoding).
#[derive(Debug, Clone)]
struct RlpU256(U256);

impl Encodable for RlpU256 {
    fn encode(&self, out: &mut dyn alloy_rlp::BufMut) {
        self.0.to_minimal_be_bytes().as_slice().encode(out);
    }

    fn length(&self) -> usize {
        self.0.to_minimal_be_bytes().as_slice().length()
    }
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// Parses a 0x-prefixed hex address string into the RLP wrapper.
fn parse_to_bytes(address: &str) -> Result<RlpAddress, EthError> {
    let hex_str = address
        .strip_prefix("0x")
        .or_else(|| address.strip_prefix("0X"))
        .ok_or_else(|| EthError::InvalidAddress("address must start with 0x".into()))?;

    if hex_str.len() != 40 {
        return Err(EthError::InvalidAddress(format!(
            "expected 40 hex characters, got {}",
            hex_str.len()
        )));
    }

    let bytes =
        hex::decode(hex_str).map_err(|e| EthError::InvalidAddress(format!("invalid hex: {e}")))?;

    let mut addr = [0u8; 20];
    addr.copy_from_slice(&bytes);
    Ok(RlpAddress(addr))
}

/// Validates that a "to" address is well-formed.
fn validate_to_address(address: &str) -> Result<(), EthError> {
    let _ = parse_to_bytes(address)?;
    Ok(())
}
