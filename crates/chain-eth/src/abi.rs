//! Minimal ABI encoding for EVM function calls.
//!
//! This module provides just enough ABI encoding to build ERC-20 and similar
//! contract call data without pulling in a full ABI parser.

/// A single ABI-encoded parameter.
#[derive(Debug, Clone)]
pub enum AbiParam {
    /// A 20-byte Ethereum address, left-padded to 32 bytes.
    Address([u8; 20]),
    /// A 256-bit unsigned integer as a big-endian 32-byte array.
    Uint256([u8; 32]),
    /// Dynamic bytes (currently encoded inline as a 32-byte right-padded word
    /// for short values; callers must ensure data fits in 32 bytes for
    /// static-style encoding).
    Bytes(Vec<u8>),
}

/// Encodes a function call with the given 4-byte selector and ABI parameters.
///
/// The output is `selector || encode(params[0]) || encode(params[1]) || ...`
/// where each parameter is encoded as a 32-byte ABI word.
///
/// # Parameters
///
/// - `selector`: The 4-byte function selector (e.g., `0xa9059cbb` for ERC-20
///   `transfer`).
/// - `params`: Slice of [`AbiParam`] values to encode after the selector.
pub fn encode_function_call(selector: [u8; 4], params: &[AbiParam]) -> Vec<u8> {
    let mut data = Vec::with_capacity(4 + params.len() * 32);
    data.extend_from_slice(&selector);

    for param in params {
        data.extend_from_slice(&encode_param(param));
    }

    data
}

/// Encodes a single [`AbiParam`] as a 32-byte ABI word.
fn encode_param(param: &AbiParam) -> [u8; 32] {
    match param {
        AbiParam::Address(addr) => {
            // Left-pad: 12 zero bytes + 20 address bytes.
            let mut word = [0u8; 32];
            word[12..].copy_from_slice(addr);
            word
        }
        AbiParam::Uint256(value) => {
            // Already a 32-byte big-endian integer.
            *value
        }
        AbiParam::Bytes(bytes) => {
            // Right-pad: data + trailing zero bytes.
            let mut word = [0u8; 32];
            let len = bytes.len().min(32);
            word[..len].copy_from_slice(&bytes[..len]);
            word
        }
    }
}
