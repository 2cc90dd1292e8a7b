use crate::abi::{encode_function_call, AbiParam};
use crate::error::EthError;

/// Function selector for `transfer(address,uint256)`: `0xa9059cbb`.
const TRANSFER_SELECTOR: [u8; 4] = [0xa9, 0x05, 0x9c, 0xbb];

/// Function selector for `balanceOf(address)`: `0x70a08231`.
const BALANCE_OF_SELECTOR: [u8; 4] = [0x70, 0xa0, 0x82, 0x31];

/// Function selector for `approve(address,uint256)`: `0x095ea7b3`.
const APPROVE_SELECTOR: [u8; 4] = [0x09, 0x5e, 0xa7, 0xb3];

/// Parses a 0x-prefixed hex address string into a 20-byte array.
fn parse_address(address: &str) -> Result<[u8; 20], EthError> {
    let hex_str = address.strip_prefix("0x").or_else(|| address.strip_prefix("0X")).ok_or_else(
        || EthError::InvalidAddress("address must start with 0x".into()),
    )?;

    if hex_str.len() != 40 {
        return Err(EthError::InvalidAddress(format!(
            "expected 40 hex characters, got {}",
            hex_str.len()
        )));
    }

    let bytes = hex::decode(hex_str)
        .map_err(|e| EthError::InvalidAddress(format!("invalid hex: {e}")))?;

    let mut addr = [0u8; 20];
    addr.copy_from_slice(&bytes);
    Ok(addr)
}

/// Encodes an ERC-20 `transfer(address,uint256)` call.
///
/// # Parameters
///
/// - `to`: The recipient address (0x-prefixed hex string).
/// - `amount`: The transfer amount as a big-endian 32-byte uint256.
///
/// # Returns
///
/// The complete calldata (4-byte selector + 64 bytes of ABI-encoded params).
pub fn encode_transfer(to: &str, amount: [u8; 32]) -> Result<Vec<u8>, EthError> {
    let addr = parse_address(to)?;
    let params = [AbiParam::Address(addr), AbiParam::Uint256(amount)];
    Ok(encode_function_call(TRANSFER_SELECTOR, &params))
}

/// Encodes an ERC-20 `balanceOf(address)` call.
///
/// # Parameters
///
/// - `owner`: The address to query (0x-prefixed hex string).
///
/// # Returns
///
/// The complete calldata (4-byte selector + 32 bytes of ABI-encoded address).
pub fn encode_balance_of(owner: &str) -> Result<Vec<u8>, EthError> {
    let addr = parse_address(owner)?;
    let params = [AbiParam::Address(addr)];
    Ok(encode_function_call(BALANCE_OF_SELECTOR, &params))
}

/// Encodes an ERC-20 `approve(address,uint256)` call.
///
/// # Parameters
///
/// - `spender`: The spender address (0x-prefixed hex string).
/// - `amount`: The approval amount as a big-endian 32-byte uint256.
///
/// # Returns
///
/// The complete calldata (4-byte selector + 64 bytes of ABI-encoded params).
pub fn encode_approve(spender: &str, amount: [u8; 32]) -> Result<Vec<u8>, EthError> {
    let addr = parse_address(spender)?;
    let params = [AbiParam::Address(addr), AbiParam::Uint256(amount)];
    Ok(encode_function_call(APPROVE_SELECTOR, &params))
}

/// Decodes a single uint256 return value from ABI-encoded data.
///
/// Useful for decoding the return value of `balanceOf` and similar view
/// functions that return a single uint256.
pub fn decode_uint256(data: &[u8]) -> Result<[u8; 32], EthError> {
    if data.len() < 32 {
        return Err(EthError::EncodingError(format!(
            "expected at least 32 bytes for uint256, got {}",
            data.len()
        )));
    }

    let mut result = [0u8; 32];
    result.copy_from_slice(&data[..32]);
    Ok(result)
}
