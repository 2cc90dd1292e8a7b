//! Ethereum/EVM chain support for the messenger's wallet core.
//!
//! This crate provides:
//! - Ethereum address derivation from secp256k1 public keys (with EIP-55 checksums)
//! - Legacy EIP-155 transaction building and signing
//! - ERC-20 token interaction encoding (transfer, approve, balanceOf)
//! - Minimal ABI encoding utilities
//! - A JSON-RPC adapter (nonce/gas discovery, balances, broadcast, history)

pub mod abi;
pub mod adapter;
pub mod address;
pub mod erc20;
pub mod error;
pub mod transaction;
