//! `[len:u64][kind:u32][raw]` framing used for serialized Dilithium keys
//! (§3) and, recursively, for the signature payload inside `dap_sign_t`.

pub const KIND_DILITHIUM: u32 = 1;

/// Wrap `raw` in the `[total_length:u64][kind:u32][raw]` envelope.
/// `total_length` is the envelope's own total size (12 + `raw.len()`).
pub fn frame(raw: &[u8], kind: u32) -> Vec<u8> {
    let total_length = (12 + raw.len()) as u64;
    let mut out = Vec::with_capacity(raw.len() + 12);
    out.extend_from_slice(&total_length.to_le_bytes());
    out.extend_from_slice(&kind.to_le_bytes());
    out.extend_from_slice(raw);
    out
}

/// Strip the `[len][kind]` envelope if present; detected by checking
/// whether the declared length field equals the buffer length. Returns the
/// raw key bytes either way (pass-through if unframed).
pub fn unframe(bytes: &[u8]) -> &[u8] {
    if bytes.len() >= 12 {
        let declared_len = u64::from_le_bytes(bytes[0..8].try_into().unwrap());
        if declared_len == bytes.len() as u64 {
            return &bytes[12..];
        }
    }
    bytes
}
