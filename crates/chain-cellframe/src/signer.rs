use crate::error::CellframeError;
use crate::keyframe;

const DAP_SIGN_TYPE_DILITHIUM: u32 = 0x0102;
const DAP_SIGN_HASH_TYPE_SHA3_256: u8 = 0x01;
const SIG_SERIALIZE_TYPE: u32 = 1;
/// Spec's literal attached-form padding: the primitive's detached signature
/// is padded with 32 zero bytes to build the "attached form" the SDK's wire
/// format expects, regardless of the underlying primitive's exact size.
const ATTACHED_FORM_PAD: usize = 32;

/// Sign `signing_data` (the transaction builder's zero-items-size form)
/// and return the complete `dap_sign_t` envelope to be wrapped by a SIG
/// item.
pub fn sign_transaction(
    signing_data: &[u8],
    sk_serialized: &[u8],
    pk_serialized: &[u8],
) -> Result<Vec<u8>, CellframeError> {
    let hash = pq_crypto::sha3_256(signing_data);

    let sk_raw = keyframe::unframe(sk_serialized);
    let pk_raw = keyframe::unframe(pk_serialized);

    let detached_sig = pq_crypto::dilithium_sign_detached(sk_raw, &hash)?;

    let mut attached_sig = detached_sig;
    attached_sig.resize(attached_sig.len() + ATTACHED_FORM_PAD, 0);

    let serialized_sig = serialize_signature(&attached_sig);
    let serialized_pk = keyframe::frame(pk_raw, keyframe::KIND_DILITHIUM);

    Ok(build_dap_sign(&serialized_pk, &serialized_sig))
}

/// `{total_len:u64, type:u32=1, payload_len:u64, payload}`.
fn serialize_signature(attached_sig: &[u8]) -> Vec<u8> {
    let payload_len = attached_sig.len() as u64;
    let total_len = 20 + payload_len;

    let mut out = Vec::with_capacity(20 + attached_sig.len());
    out.extend_from_slice(&total_len.to_le_bytes());
    out.extend_from_slice(&SIG_SERIALIZE_TYPE.to_le_bytes());
    out.extend_from_slice(&payload_len.to_le_bytes());
    out.extend_from_slice(attached_sig);
    out
}

/// `{type:u32, hash_type:u8, pad:u8, sign_size:u32, pkey_size:u32, pk, sig}`.
fn build_dap_sign(serialized_pk: &[u8], serialized_sig: &[u8]) -> Vec<u8> {
    let mut out = Vec::with_capacity(14 + serialized_pk.len() + serialized_sig.len());
    out.extend_from_slice(&DAP_SIGN_TYPE_DILITHIUM.to_le_bytes());
    out.push(DAP_SIGN_HASH_TYPE_SHA3_256);
    out.push(0u8); // pad
    out.extend_from_slice(&(serialized_sig.len() as u32).to_le_bytes());
    out.extend_from_slice(&(serialized_pk.len() as u32).to_le_bytes());
    out.extend_from_slice(serialized_pk);
    out.extend_from_slice(serialized_sig);
    out
}

/// Verify a `dap_sign_t` envelope against the data that was signed.
pub fn verify_transaction(signing_data: &[u8], dap_sign: &[u8]) -> Result<(), CellframeError> {
    if dap_sign.len() < 14 {
        return Err(CellframeError::InvalidInput(
            "dap_sign_t shorter than its header".into(),
        ));
    }
    let sign_size = u32::from_le_bytes(dap_sign[6..10].try_into().unwrap()) as usize;
    let pkey_size = u32::from_le_bytes(dap_sign[10..14].try_into().unwrap()) as usize;

    let pk_start = 14;
    let pk_end = pk_start + pkey_size;
    let sig_end = pk_end + sign_size;
    if dap_sign.len() < sig_end {
        return Err(CellframeError::InvalidInput(
            "dap_sign_t truncated relative to its declared sizes".into(),
        ));
    }

    let serialized_pk = &dap_sign[pk_start..pk_end];
    let serialized_sig = &dap_sign[pk_end..sig_end];

    if serialized_sig.len() < 20 {
        return Err(CellframeError::InvalidInput(
            "serialized signature shorter than its header".into(),
        ));
    }
    let payload_len = u64::from_le_bytes(serialized_sig[12..20].try_into().unwrap()) as usize;
    if serialized_sig.len() < 20 + payload_len {
        return Err(CellframeError::InvalidInput(
            "serialized signature truncated".into(),
        ));
    }
    let attached_sig = &serialized_sig[20..20 + payload_len];
    let detached_len = attached_sig.len().saturating_sub(ATTACHED_FORM_PAD);
    let detached_sig = &attached_sig[..detached_len];

    let pk_raw = keyframe::unframe(serialized_pk);
    let hash = pq_crypto::sha3_256(signing_data);

    pq_crypto::dilithium_verify_detached(detached_sig, &hash, pk_raw)?;
    Ok(())
}
