//! Cross-crate integration tests exercising the full pipeline:
//! mnemonic -> derive key -> sign transaction -> verify output.
//!
//! These tests use the public API of wallet_core to catch regressions at
//! crate boundaries.

use wallet_core::adapter::{AdapterRegistry, CellframeAdapterImpl, EthAdapterImpl};
use wallet_core::types::Chain;
use wallet_core::*;

const TEST_MNEMONIC: &str =
    "abandon abandon abandon abandon abandon abandon abandon abandon abandon abandon abandon about";
const BACKBONE_NET_ID: u64 = 0x0404202200000000;

// ─── ETH: mnemonic -> derive -> sign -> verify ─────────────────────

#[test]
fn eth_full_pipeline_native_transfer() {
    let mnemonic = generate_mnemonic().unwrap();
    assert!(validate_mnemonic(&mnemonic));

    let addr = derive_eth_address_from_mnemonic(&mnemonic, "", 0, 0).unwrap();
    assert!(addr.address.starts_with("0x"));
    assert_eq!(addr.address.len(), 42);
    assert!(validate_address(&addr.address, Chain::Ethereum));

    let seed = mnemonic_to_seed(&mnemonic, "").unwrap();
    let key = hd_derivation::derive_secp256k1_key(&seed, 0, 0).unwrap();

    let tx = chain_eth::transaction::build_transfer(
        1,
        0,
        "0x000000000000000000000000000000000000dEaD",
        wallet_numeric::from_amount_string("1").unwrap(),
        wallet_numeric::U256::from_u64(50_000_000_000),
        21_000,
    )
    .unwrap();
    let signed = chain_eth::transaction::sign_transaction(&tx, &key.private_key).unwrap();

    assert!(signed.tx_hash.starts_with("0x"));
    assert_eq!(signed.tx_hash.len(), 66);
    assert!(signed.raw_tx.len() > 100);
}

#[test]
fn eth_full_pipeline_erc20_transfer() {
    let seed = mnemonic_to_seed(TEST_MNEMONIC, "").unwrap();
    let key = hd_derivation::derive_secp256k1_key(&seed, 0, 0).unwrap();
    let usdc_contract = "0xA0b86991c6218b36c1d19D4a2e9Eb0cE3606eB48";

    let amount = wallet_numeric::from_amount_string("100").unwrap().to_be_bytes32();
    let tx = chain_eth::transaction::build_erc20_transfer(
        1,
        5,
        usdc_contract,
        "0x000000000000000000000000000000000000dEaD",
        amount,
        wallet_numeric::U256::from_u64(30_000_000_000),
        100_000,
    )
    .unwrap();
    assert_eq!(tx.to, usdc_contract);
    assert_eq!(tx.value, wallet_numeric::U256::zero());

    let signed = chain_eth::transaction::sign_transaction(&tx, &key.private_key).unwrap();
    assert!(signed.tx_hash.starts_with("0x"));
}

#[test]
fn eth_message_sign_and_recover_round_trips() {
    let seed = mnemonic_to_seed(TEST_MNEMONIC, "").unwrap();
    let key = hd_derivation::derive_secp256k1_key(&seed, 0, 0).unwrap();

    let message = b"sign into wallet";
    let sig = sign_eth_message(seed, 0, 0, message).unwrap();

    let digest = {
        use sha3::{Digest, Keccak256};
        let prefixed = format!("\x19Ethereum Signed Message:\n{}", message.len());
        let mut hasher = Keccak256::new();
        hasher.update(prefixed.as_bytes());
        hasher.update(message);
        hasher.finalize()
    };
    let recovered = recover_eth_pubkey(&sig, &digest).unwrap();
    assert_eq!(recovered, key.public_key_uncompressed);
}

// ─── Cellframe: mnemonic -> wallet -> address, deterministic across the
// same mnemonic and independent of any BIP-39 seed path ───────────────

#[test]
fn cellframe_wallet_derivation_is_deterministic() {
    let wallet1 = derive_cellframe_wallet_from_mnemonic(TEST_MNEMONIC, "main", BACKBONE_NET_ID);
    let wallet2 = derive_cellframe_wallet_from_mnemonic(TEST_MNEMONIC, "main", BACKBONE_NET_ID);

    assert_eq!(wallet1.address, wallet2.address);
    assert!(validate_address(&wallet1.address, Chain::Cellframe));
    assert!(!wallet1.protected);
}

#[test]
fn cellframe_wallet_differs_by_mnemonic() {
    let mnemonic_a = generate_mnemonic().unwrap();
    let mnemonic_b = generate_mnemonic().unwrap();
    assert_ne!(mnemonic_a, mnemonic_b);

    let wallet_a = derive_cellframe_wallet_from_mnemonic(&mnemonic_a, "main", BACKBONE_NET_ID);
    let wallet_b = derive_cellframe_wallet_from_mnemonic(&mnemonic_b, "main", BACKBONE_NET_ID);
    assert_ne!(wallet_a.address, wallet_b.address);
}

// ─── Adapter registry: both chains register under one table and are
// reachable by name and by chain ────────────────────────────────────

#[test]
fn adapter_registry_holds_both_chains() {
    let registry = AdapterRegistry::new();
    registry.register(std::sync::Arc::new(CellframeAdapterImpl::new(
        "cellframe-backbone",
        chain_cellframe::config::CellframeNetworkConfig::backbone(),
    )));
    registry.register(std::sync::Arc::new(EthAdapterImpl::new(
        "ethereum-mainnet",
        "http://localhost:8545",
        1,
    )));

    let cellframe = registry.by_name("cellframe-backbone").unwrap();
    assert_eq!(cellframe.chain(), Chain::Cellframe);
    let address = derive_cellframe_wallet_from_mnemonic(TEST_MNEMONIC, "main", BACKBONE_NET_ID).address;
    assert!(cellframe.validate_address(&address));

    let ethereum = registry.by_name("ethereum-mainnet").unwrap();
    assert_eq!(ethereum.chain(), Chain::Ethereum);
    assert_eq!(registry.by_chain(Chain::Ethereum).len(), 1);
    assert_eq!(registry.by_chain(Chain::Cellframe).len(), 1);
}

// ─── Ethereum keystore file round trip ─────────────────────────────

#[test]
fn eth_keystore_file_round_trips_and_matches_derived_address() {
    let seed = mnemonic_to_seed(TEST_MNEMONIC, "").unwrap();
    let key = hd_derivation::derive_secp256k1_key(&seed, 0, 0).unwrap();
    let addr = derive_eth_address_from_mnemonic(TEST_MNEMONIC, "", 0, 0).unwrap();

    let keystore = wallet::EthKeystore::new(addr.address.clone(), key.private_key, 1_700_000_000);
    let dir = std::env::temp_dir().join(format!("wallet-core-pipeline-test-{}", std::process::id()));
    std::fs::create_dir_all(&dir).unwrap();
    let path = dir.join("eth.json");

    wallet::save_to_file(&keystore, &path).unwrap();
    let loaded = wallet::load_from_file(&path).unwrap();

    assert_eq!(loaded.address, addr.address);
    assert_eq!(loaded.private_key, hex::encode(key.private_key));

    std::fs::remove_dir_all(&dir).ok();
}
