//! Façade over the post-quantum and classical cryptographic primitives the
//! wallet core is built on: Dilithium MODE-1 signing, SHA3-256/SHAKE256/
//! Keccak-256 hashing, and secp256k1 recoverable ECDSA.
//!
//! `dilithium_keypair_from_seed` needs deterministic keygen (the wallet
//! derivation path requires the same mnemonic to always yield the same
//! keypair); see `DESIGN.md` for why that reaches into `pqc_dilithium`'s
//! `dilithium_kat`-gated seeded API rather than its public random-only one.

mod error;

pub use error::PqError;

use k256::ecdsa::signature::hazmat::PrehashSigner;
use k256::ecdsa::{RecoveryId, Signature, SigningKey};
use sha3::digest::{ExtendableOutput, Update, XofReader};
use sha3::{Digest, Keccak256, Sha3_256, Shake256};
use zeroize::Zeroize;

/// Raw, framing-agnostic Dilithium MODE-1 public key bytes.
pub fn dilithium_public_key_bytes() -> usize {
    pqc_dilithium::PUBLICKEYBYTES
}

/// Raw, framing-agnostic Dilithium MODE-1 secret key bytes.
pub fn dilithium_secret_key_bytes() -> usize {
    pqc_dilithium::SECRETKEYBYTES
}

/// Raw, framing-agnostic Dilithium MODE-1 detached signature bytes.
pub fn dilithium_signature_bytes() -> usize {
    pqc_dilithium::SIGNBYTES
}

/// Deterministically derives a Dilithium MODE-1 keypair from a 32-byte
/// seed. The same seed always yields the same `(pk_raw, sk_raw)`.
pub fn dilithium_keypair_from_seed(seed: &[u8; 32]) -> (Vec<u8>, Vec<u8>) {
    let mut pk = vec![0u8; pqc_dilithium::PUBLICKEYBYTES];
    let mut sk = vec![0u8; pqc_dilithium::SECRETKEYBYTES];
    pqc_dilithium::crypto_sign_keypair(&mut pk, &mut sk, Some(seed));
    (pk, sk)
}

/// Produces a detached Dilithium MODE-1 signature over `msg`.
pub fn dilithium_sign_detached(sk_raw: &[u8], msg: &[u8]) -> Result<Vec<u8>, PqError> {
    if sk_raw.len() != pqc_dilithium::SECRETKEYBYTES {
        return Err(PqError::KeyError(format!(
            "secret key must be {} bytes, got {}",
            pqc_dilithium::SECRETKEYBYTES,
            sk_raw.len()
        )));
    }
    let mut sig = vec![0u8; pqc_dilithium::SIGNBYTES];
    pqc_dilithium::crypto_sign_signature(&mut sig, msg, sk_raw);
    Ok(sig)
}

/// Verifies a detached Dilithium MODE-1 signature.
pub fn dilithium_verify_detached(sig: &[u8], msg: &[u8], pk_raw: &[u8]) -> Result<(), PqError> {
    pqc_dilithium::crypto_sign_verify(sig, msg, pk_raw)
        .map_err(|_| PqError::KeyError("signature verification failed".into()))
}

/// SHA3-256 of `bytes`.
pub fn sha3_256(bytes: &[u8]) -> [u8; 32] {
    let digest = Sha3_256::digest(bytes);
    let mut out = [0u8; 32];
    out.copy_from_slice(&digest);
    out
}

/// SHAKE256 extendable-output hash of `bytes`, truncated/extended to
/// `out_len` bytes.
pub fn shake256(bytes: &[u8], out_len: usize) -> Vec<u8> {
    let mut hasher = Shake256::default();
    hasher.update(bytes);
    let mut reader = hasher.finalize_xof();
    let mut out = vec![0u8; out_len];
    reader.read(&mut out);
    out
}

/// Keccak-256 of `bytes` (Ethereum's hash function, distinct from the final
/// SHA3-256 standard).
pub fn keccak_256(bytes: &[u8]) -> [u8; 32] {
    let digest = Keccak256::digest(bytes);
    let mut out = [0u8; 32];
    out.copy_from_slice(&digest);
    out
}

/// secp256k1 recoverable ECDSA signature over a pre-hashed 32-byte message.
/// Returns `(r, s, recovery_id)`.
pub fn secp256k1_sign_recoverable(
    sk: &[u8; 32],
    hash: &[u8; 32],
) -> Result<([u8; 32], [u8; 32], u8), PqError> {
    let mut key_bytes = *sk;
    let signing_key = SigningKey::from_bytes((&key_bytes).into())
        .map_err(|e| PqError::KeyError(e.to_string()))?;
    key_bytes.zeroize();

    let (signature, recovery_id): (Signature, RecoveryId) = signing_key
        .sign_prehash(hash)
        .map_err(|e| PqError::KeyError(e.to_string()))?;

    let r: [u8; 32] = signature.r().to_bytes().into();
    let s: [u8; 32] = signature.s().to_bytes().into();
    Ok((r, s, recovery_id.to_byte()))
}

/// Derives the uncompressed secp256k1 public key (65 bytes, `0x04` prefix)
/// for a 32-byte private key.
pub fn secp256k1_pubkey_from_sk(sk: &[u8; 32]) -> Result<[u8; 65], PqError> {
    let mut key_bytes = *sk;
    let signing_key = SigningKey::from_bytes((&key_bytes).into())
        .map_err(|e| PqError::KeyError(e.to_string()))?;
    key_bytes.zeroize();

    let verifying_key = signing_key.verifying_key();
    let encoded = verifying_key.to_encoded_point(false);
    let bytes = encoded.as_bytes();

    let mut out = [0u8; 65];
    out.copy_from_slice(bytes);
    Ok(out)
}
