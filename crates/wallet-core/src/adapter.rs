//! The polymorphic blockchain adapter: a uniform contract (`balance`,
//! `estimate_fee`, `send`, `send_from_wallet`, `tx_status`,
//! `validate_address`, `history`) implemented once per chain (§3
//! "Adapter descriptor", §4.7, §4.9), plus the process-wide registry
//! adapters self-register into at init (§4.10).

use std::path::Path;
use std::sync::Arc;
use std::time::{SystemTime, UNIX_EPOCH};

use async_trait::async_trait;
use dashmap::DashMap;
use once_cell::sync::Lazy;

use crate::error::WalletError;
use crate::types::Chain;
use crate::wallet::EthKeystore;

/// Gas/fee speed tier. Cellframe's fees are fixed protocol constants (§4.7)
/// and ignore this; only the Ethereum adapter scales by it (§4.9).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Speed {
    Slow,
    Normal,
    Fast,
}

/// Outcome of a transaction-status lookup, unified across chains.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TxStatus {
    Success,
    NotFound,
}

/// A single history entry, unified across chains.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TxRecord {
    pub hash: String,
    pub status: String,
    pub timestamp: u64,
    pub token: String,
    pub amount: String,
    pub is_outgoing: bool,
    pub other_address: String,
}

/// The uniform contract every chain adapter implements (§3). Higher-level
/// code is chain-agnostic above this boundary.
#[async_trait]
pub trait BlockchainAdapter: Send + Sync {
    fn name(&self) -> &str;
    fn chain(&self) -> Chain;

    /// Adapters are constructed ready to use; `init` exists for chains that
    /// need a connectivity check or warm-up step. Default: no-op.
    async fn init(&self) -> Result<(), WalletError> {
        Ok(())
    }

    /// Default: no-op. Adapters holding no unmanaged resources need not
    /// override this.
    async fn cleanup(&self) -> Result<(), WalletError> {
        Ok(())
    }

    async fn balance(&self, address: &str, token: &str) -> Result<String, WalletError>;
    async fn estimate_fee(&self, speed: Speed) -> Result<(String, String), WalletError>;
    async fn send(
        &self,
        from: &str,
        to: &str,
        amount: &str,
        token: &str,
        privkey: &[u8],
        speed: Speed,
    ) -> Result<String, WalletError>;
    async fn send_from_wallet(
        &self,
        path: &Path,
        to: &str,
        amount: &str,
        token: &str,
        net: &str,
        speed: Speed,
    ) -> Result<String, WalletError>;
    async fn tx_status(&self, hash: &str) -> Result<TxStatus, WalletError>;
    fn validate_address(&self, address: &str) -> bool;
    async fn history(&self, address: &str, token: &str) -> Result<Vec<TxRecord>, WalletError>;
}

fn now_unix() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or(0)
}

/// Cellframe adapter, wrapping `chain_cellframe::adapter::CellframeAdapter`.
pub struct CellframeAdapterImpl {
    name: String,
    inner: chain_cellframe::adapter::CellframeAdapter,
    config: chain_cellframe::config::CellframeNetworkConfig,
}

impl CellframeAdapterImpl {
    pub fn new(name: impl Into<String>, config: chain_cellframe::config::CellframeNetworkConfig) -> Self {
        CellframeAdapterImpl {
            name: name.into(),
            inner: chain_cellframe::adapter::CellframeAdapter::new(config.clone()),
            config,
        }
    }

    fn is_native(token: &str) -> bool {
        token.is_empty() || token.eq_ignore_ascii_case("CELL")
    }

    async fn send_with_wallet(
        &self,
        wallet: &chain_cellframe::wallet::CellframeWallet,
        to: &str,
        amount: &str,
        token: &str,
    ) -> Result<String, WalletError> {
        let amount_u256 = wallet_numeric::from_amount_string(amount)?;
        let ts = now_unix();
        if Self::is_native(token) {
            Ok(self.inner.send_native(wallet, to, &amount_u256, ts).await?)
        } else {
            Ok(self.inner.send_token(wallet, to, &amount_u256, token, ts).await?)
        }
    }
}

#[async_trait]
impl BlockchainAdapter for CellframeAdapterImpl {
    fn name(&self) -> &str {
        &self.name
    }

    fn chain(&self) -> Chain {
        Chain::Cellframe
    }

    async fn balance(&self, address: &str, token: &str) -> Result<String, WalletError> {
        let token = if token.is_empty() { "CELL" } else { token };
        Ok(self.inner.balance(address, token).await?)
    }

    async fn estimate_fee(&self, _speed: Speed) -> Result<(String, String), WalletError> {
        let (fees, overflow) = self.config.network_fee.add_carry(&self.config.validator_fee);
        if overflow {
            return Err(WalletError::NumericOverflow("network + validator fee overflowed".into()));
        }
        Ok((wallet_numeric::format_amount(&fees), "0".to_string()))
    }

    async fn send(
        &self,
        from: &str,
        to: &str,
        amount: &str,
        token: &str,
        privkey: &[u8],
        _speed: Speed,
    ) -> Result<String, WalletError> {
        let seed: [u8; 32] = privkey
            .try_into()
            .map_err(|_| WalletError::KeyError("Cellframe send expects a 32-byte derivation seed".into()))?;
        let wallet = chain_cellframe::wallet::derive_from_seed(&seed, "", self.config.net_id);
        if wallet.address != from {
            return Err(WalletError::KeyError(
                "derived address does not match the declared sender".into(),
            ));
        }
        self.send_with_wallet(&wallet, to, amount, token).await
    }

    async fn send_from_wallet(
        &self,
        path: &Path,
        to: &str,
        amount: &str,
        token: &str,
        net: &str,
        _speed: Speed,
    ) -> Result<String, WalletError> {
        if !net.is_empty() && !net.eq_ignore_ascii_case(&self.config.net_name) {
            return Err(WalletError::InvalidInput(format!("unsupported network: {net}")));
        }
        let bytes = std::fs::read(path).map_err(|e| WalletError::IoError(e.to_string()))?;
        let wallet = chain_cellframe::wallet::load(&bytes, self.config.net_id)?;
        self.send_with_wallet(&wallet, to, amount, token).await
    }

    async fn tx_status(&self, hash: &str) -> Result<TxStatus, WalletError> {
        Ok(match self.inner.tx_status(hash).await? {
            chain_cellframe::adapter::TxStatus::Success => TxStatus::Success,
            chain_cellframe::adapter::TxStatus::NotFound => TxStatus::NotFound,
        })
    }

    fn validate_address(&self, address: &str) -> bool {
        chain_cellframe::address::validate_address(address)
    }

    async fn history(&self, address: &str, token: &str) -> Result<Vec<TxRecord>, WalletError> {
        let records = self.inner.history(address).await?;
        Ok(records
            .into_iter()
            .filter(|r| token.is_empty() || r.token.eq_ignore_ascii_case(token))
            .map(|r| TxRecord {
                hash: r.hash,
                status: r.status,
                timestamp: r.timestamp,
                token: r.token,
                amount: r.amount,
                is_outgoing: r.is_outgoing,
                other_address: r.other_address,
            })
            .collect())
    }
}

fn map_speed(speed: Speed) -> chain_eth::adapter::GasSpeed {
    match speed {
        Speed::Slow => chain_eth::adapter::GasSpeed::Slow,
        Speed::Normal => chain_eth::adapter::GasSpeed::Normal,
        Speed::Fast => chain_eth::adapter::GasSpeed::Fast,
    }
}

/// Ethereum/EVM adapter, wrapping `chain_eth::adapter::EthAdapter`. One
/// instance is one network (`chain_id`); EVM sidechains register as
/// separate adapters under separate names.
pub struct EthAdapterImpl {
    name: String,
    inner: chain_eth::adapter::EthAdapter,
    chain_id: u64,
}

impl EthAdapterImpl {
    pub fn new(name: impl Into<String>, rpc_url: impl Into<String>, chain_id: u64) -> Self {
        EthAdapterImpl {
            name: name.into(),
            inner: chain_eth::adapter::EthAdapter::new(rpc_url),
            chain_id,
        }
    }

    pub fn with_explorer(mut self, explorer_api_url: impl Into<String>) -> Self {
        self.inner = self.inner.with_explorer(explorer_api_url);
        self
    }

    fn is_native(token: &str) -> bool {
        token.is_empty() || token.eq_ignore_ascii_case("ETH")
    }

    fn amount_to_u256_bytes32(amount: &str) -> Result<[u8; 32], WalletError> {
        let value = wallet_numeric::from_amount_string(amount)?;
        Ok(value.to_be_bytes32())
    }

    async fn send_with_privkey(
        &self,
        from: &str,
        to: &str,
        amount: &str,
        token: &str,
        private_key: &[u8; 32],
        speed: Speed,
    ) -> Result<String, WalletError> {
        let derived = derive_eth_address_from_privkey(private_key)?;
        if !derived.eq_ignore_ascii_case(from) {
            return Err(WalletError::KeyError(
                "derived address does not match the declared sender".into(),
            ));
        }

        let nonce = self.inner.nonce(from).await?;
        let gas_price = self.inner.gas_price(map_speed(speed)).await?;

        let tx = if Self::is_native(token) {
            let value = wallet_numeric::from_amount_string(amount)?;
            chain_eth::transaction::build_transfer(self.chain_id, nonce, to, value, gas_price, 21_000)?
        } else {
            let amount_bytes = Self::amount_to_u256_bytes32(amount)?;
            self.inner
                .build_erc20_send(self.chain_id, nonce, token, to, amount_bytes, gas_price)?
        };

        let signed = chain_eth::transaction::sign_transaction(&tx, private_key)?;
        Ok(self.inner.broadcast(&signed).await?)
    }
}

fn derive_eth_address_from_privkey(private_key: &[u8; 32]) -> Result<String, WalletError> {
    use k256::ecdsa::SigningKey;
    let signing_key = SigningKey::from_bytes(private_key.into()).map_err(|e| WalletError::KeyError(e.to_string()))?;
    let verifying_key = signing_key.verifying_key();
    let uncompressed: [u8; 65] = verifying_key
        .to_encoded_point(false)
        .as_bytes()
        .try_into()
        .map_err(|_| WalletError::KeyError("invalid uncompressed public key".into()))?;
    Ok(chain_eth::address::pubkey_to_eth_address(&uncompressed)?)
}

#[async_trait]
impl BlockchainAdapter for EthAdapterImpl {
    fn name(&self) -> &str {
        &self.name
    }

    fn chain(&self) -> Chain {
        Chain::Ethereum
    }

    async fn balance(&self, address: &str, token: &str) -> Result<String, WalletError> {
        if Self::is_native(token) {
            Ok(self.inner.balance(address).await?)
        } else {
            Ok(self.inner.token_balance(token, address, 18).await?)
        }
    }

    async fn estimate_fee(&self, speed: Speed) -> Result<(String, String), WalletError> {
        let gas_price = self.inner.gas_price(map_speed(speed)).await?;
        let fee = gas_price.mul_checked(&wallet_numeric::U256::from_u64(21_000)).0;
        Ok((wallet_numeric::format_amount(&fee), wallet_numeric::format_amount(&gas_price)))
    }

    async fn send(
        &self,
        from: &str,
        to: &str,
        amount: &str,
        token: &str,
        privkey: &[u8],
        speed: Speed,
    ) -> Result<String, WalletError> {
        let private_key: [u8; 32] = privkey
            .try_into()
            .map_err(|_| WalletError::KeyError("Ethereum send expects a 32-byte private key".into()))?;
        self.send_with_privkey(from, to, amount, token, &private_key, speed).await
    }

    async fn send_from_wallet(
        &self,
        path: &Path,
        to: &str,
        amount: &str,
        token: &str,
        net: &str,
        speed: Speed,
    ) -> Result<String, WalletError> {
        let keystore: EthKeystore = crate::wallet::load_from_file(path)?;
        if !net.is_empty() && !net.eq_ignore_ascii_case(&keystore.network) {
            return Err(WalletError::InvalidInput(format!("unsupported network: {net}")));
        }
        let key_bytes =
            hex::decode(&keystore.private_key).map_err(|e| WalletError::KeyError(format!("malformed keystore key: {e}")))?;
        let private_key: [u8; 32] = key_bytes
            .as_slice()
            .try_into()
            .map_err(|_| WalletError::KeyError("keystore private key must be 32 bytes".into()))?;
        self.send_with_privkey(&keystore.address, to, amount, token, &private_key, speed)
            .await
    }

    async fn tx_status(&self, hash: &str) -> Result<TxStatus, WalletError> {
        Ok(match self.inner.tx_status(hash).await? {
            chain_eth::adapter::TxStatus::Success => TxStatus::Success,
            chain_eth::adapter::TxStatus::NotFound => TxStatus::NotFound,
        })
    }

    fn validate_address(&self, address: &str) -> bool {
        chain_eth::address::validate_address(address).unwrap_or(false)
    }

    async fn history(&self, address: &str, _token: &str) -> Result<Vec<TxRecord>, WalletError> {
        let records = self.inner.history(address).await?;
        Ok(records
            .into_iter()
            .map(|r| TxRecord {
                hash: r.hash,
                status: r.status,
                timestamp: r.timestamp,
                token: r.token,
                amount: r.amount,
                is_outgoing: r.is_outgoing,
                other_address: r.other_address,
            })
            .collect())
    }
}

/// Process-wide adapter table, indexed by name (§4.10). Populated during
/// initialization and read-only thereafter; `DashMap` gives interior
/// mutability without a caller-visible lock for the read path.
pub struct AdapterRegistry {
    by_name: DashMap<String, Arc<dyn BlockchainAdapter>>,
}

impl Default for AdapterRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl AdapterRegistry {
    pub fn new() -> Self {
        AdapterRegistry { by_name: DashMap::new() }
    }

    /// Registers an adapter under its own name. Adapters may register in
    /// any order; re-registering a name replaces the previous entry.
    pub fn register(&self, adapter: Arc<dyn BlockchainAdapter>) {
        self.by_name.insert(adapter.name().to_string(), adapter);
    }

    pub fn by_name(&self, name: &str) -> Option<Arc<dyn BlockchainAdapter>> {
        self.by_name.get(name).map(|entry| entry.value().clone())
    }

    /// All adapters registered for a given chain, in no particular order.
    pub fn by_chain(&self, chain: Chain) -> Vec<Arc<dyn BlockchainAdapter>> {
        self.by_name
            .iter()
            .filter(|entry| entry.value().chain() == chain)
            .map(|entry| entry.value().clone())
            .collect()
    }

    pub fn len(&self) -> usize {
        self.by_name.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_name.is_empty()
    }
}

/// The process-wide registry singleton.
pub static REGISTRY: Lazy<AdapterRegistry> = Lazy::new(AdapterRegistry::new);

#[cfg(test)]
mod tests {
    use super::*;

    fn cellframe_adapter() -> CellframeAdapterImpl {
        CellframeAdapterImpl::new("cellframe-backbone", chain_cellframe::config::CellframeNetworkConfig::backbone())
    }

    fn eth_adapter() -> EthAdapterImpl {
        EthAdapterImpl::new("ethereum-mainnet", "http://localhost:8545", 1)
    }

    #[test]
    fn tx_status_variants_are_distinct() {
        assert_ne!(TxStatus::Success, TxStatus::NotFound);
    }

    #[tokio::test]
    async fn cellframe_estimate_fee_ignores_speed_and_matches_config() {
        let adapter = cellframe_adapter();
        let (slow, _) = adapter.estimate_fee(Speed::Slow).await.unwrap();
        let (fast, _) = adapter.estimate_fee(Speed::Fast).await.unwrap();
        assert_eq!(slow, fast);
        assert_eq!(slow, "0.0021");
    }

    #[test]
    fn cellframe_validate_address() {
        let adapter = cellframe_adapter();
        assert!(!adapter.validate_address("not-an-address"));
    }

    #[test]
    fn eth_validate_address() {
        let adapter = eth_adapter();
        assert!(adapter.validate_address("0x5aAeb6053F3E94C9b9A09f33669435E7Ef1BeAed"));
        assert!(!adapter.validate_address("not-an-address"));
    }

    #[test]
    fn derive_eth_address_from_privkey_matches_known_vector() {
        let mut key = [0u8; 32];
        key[31] = 1;
        let address = derive_eth_address_from_privkey(&key).unwrap();
        assert_eq!(address, "0x7E5F4552091A69125d5DfCb7b8C2659029395Bdf");
    }

    #[test]
    fn registry_register_and_lookup_by_name() {
        let registry = AdapterRegistry::new();
        registry.register(Arc::new(cellframe_adapter()));
        registry.register(Arc::new(eth_adapter()));

        assert_eq!(registry.len(), 2);
        assert!(registry.by_name("cellframe-backbone").is_some());
        assert!(registry.by_name("ethereum-mainnet").is_some());
        assert!(registry.by_name("unknown").is_none());
    }

    #[test]
    fn registry_lookup_by_chain() {
        let registry = AdapterRegistry::new();
        registry.register(Arc::new(cellframe_adapter()));
        registry.register(Arc::new(eth_adapter()));

        assert_eq!(registry.by_chain(Chain::Cellframe).len(), 1);
        assert_eq!(registry.by_chain(Chain::Ethereum).len(), 1);
    }

    #[test]
    fn registry_registration_order_does_not_matter() {
        let registry = AdapterRegistry::new();
        registry.register(Arc::new(eth_adapter()));
        registry.register(Arc::new(cellframe_adapter()));
        assert_eq!(registry.len(), 2);
    }
}
