//! JSON-RPC adapter for Ethereum/EVM chains: nonce and gas discovery, native
//! and ERC-20 balance queries, broadcast, and block-explorer history.

use serde_json::{json, Value};
use wallet_numeric::U256;

use crate::erc20;
use crate::error::EthError;
use crate::transaction::{EthTransaction, SignedEthTransaction};

/// Gas-price speed tier. Multiplies the node's reported `eth_gasPrice` by
/// 80%, 100%, or 150% respectively.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GasSpeed {
    Slow,
    Normal,
    Fast,
}

impl GasSpeed {
    fn percent(self) -> u64 {
        match self {
            GasSpeed::Slow => 80,
            GasSpeed::Normal => 100,
            GasSpeed::Fast => 150,
        }
    }
}

/// Outcome of an `eth_getTransactionReceipt` lookup.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TxStatus {
    Success,
    NotFound,
}

/// A single history entry, shaped to mirror the Cellframe adapter's record
/// so higher-level code can treat both chains uniformly.
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

/// Thin JSON-RPC client for one EVM endpoint.
pub struct EthAdapter {
    rpc_url: String,
    explorer_api_url: Option<String>,
    client: reqwest::Client,
}

impl EthAdapter {
    pub fn new(rpc_url: impl Into<String>) -> Self {
        EthAdapter {
            rpc_url: rpc_url.into(),
            explorer_api_url: None,
            client: reqwest::Client::new(),
        }
    }

    pub fn with_explorer(mut self, explorer_api_url: impl Into<String>) -> Self {
        self.explorer_api_url = Some(explorer_api_url.into());
        self
    }

    async fn call(&self, method: &str, params: Value) -> Result<Value, EthError> {
        let body = json!({
            "jsonrpc": "2.0",
            "id": 1,
            "method": method,
            "params": params,
        });
        tracing::debug!(method, %self.rpc_url, "eth json-rpc request");

        let response = self
            .client
            .post(&self.rpc_url)
            .json(&body)
            .send()
            .await
            .map_err(|e| EthError::RpcError(e.to_string()))?;

        let envelope: Value = response
            .json()
            .await
            .map_err(|e| EthError::RpcError(e.to_string()))?;

        if let Some(error) = envelope.get("error") {
            return Err(EthError::RpcError(error.to_string()));
        }
        envelope
            .get("result")
            .cloned()
            .ok_or_else(|| EthError::RpcError("response missing result".into()))
    }

    fn hex_to_u64(value: &Value) -> Result<u64, EthError> {
        let s = value
            .as_str()
            .ok_or_else(|| EthError::RpcError("expected hex string result".into()))?;
        u64::from_str_radix(s.trim_start_matches("0x"), 16)
            .map_err(|e| EthError::RpcError(format!("invalid hex u64 {s:?}: {e}")))
    }

    fn hex_to_u256(value: &Value) -> Result<U256, EthError> {
        let s = value
            .as_str()
            .ok_or_else(|| EthError::RpcError("expected hex string result".into()))?;
        let trimmed = s.trim_start_matches("0x");
        let padded = if trimmed.len() % 2 == 1 {
            format!("0{trimmed}")
        } else {
            trimmed.to_string()
        };
        let bytes = hex::decode(&padded)
            .map_err(|e| EthError::RpcError(format!("invalid hex u256 {s:?}: {e}")))?;
        U256::from_be_bytes(&bytes).map_err(|e| EthError::RpcError(e.to_string()))
    }

    /// `eth_getTransactionCount(addr, "pending")`.
    pub async fn nonce(&self, address: &str) -> Result<u64, EthError> {
        let result = self
            .call("eth_getTransactionCount", json!([address, "pending"]))
            .await?;
        Self::hex_to_u64(&result)
    }

    /// `eth_gasPrice`, scaled by the requested speed tier.
    pub async fn gas_price(&self, speed: GasSpeed) -> Result<U256, EthError> {
        let result = self.call("eth_gasPrice", json!([])).await?;
        let base = Self::hex_to_u256(&result)?;
        let scaled = base.mul_checked(&U256::from_u64(speed.percent())).0;
        Ok(scaled.div_small(100))
    }

    /// `eth_getBalance(addr, "latest")`, formatted as a decimal ETH string.
    pub async fn balance(&self, address: &str) -> Result<String, EthError> {
        let result = self
            .call("eth_getBalance", json!([address, "latest"]))
            .await?;
        let wei = Self::hex_to_u256(&result)?;
        Ok(wallet_numeric::format_amount(&wei))
    }

    /// ERC-20 `balanceOf(addr)`, divided by `10^decimals`.
    pub async fn token_balance(
        &self,
        token_contract: &str,
        owner: &str,
        decimals: u8,
    ) -> Result<String, EthError> {
        let calldata = erc20::encode_balance_of(owner)?;
        let result = self
            .call(
                "eth_call",
                json!([
                    { "to": token_contract, "data": format!("0x{}", hex::encode(&calldata)) },
                    "latest"
                ]),
            )
            .await?;
        let raw = Self::hex_to_u256(&result)?;
        Ok(wallet_numeric::format_fixed_point(&raw, decimals as u32))
    }

    /// `eth_sendRawTransaction`.
    pub async fn broadcast(&self, signed: &SignedEthTransaction) -> Result<String, EthError> {
        let raw_hex = format!("0x{}", hex::encode(&signed.raw_tx));
        let result = self
            .call("eth_sendRawTransaction", json!([raw_hex]))
            .await?;
        result
            .as_str()
            .map(|s| s.to_string())
            .ok_or_else(|| EthError::NodeRejected("no transaction hash returned".into()))
    }

    /// `eth_getTransactionReceipt`. A receipt with `status=0x1` means
    /// `SUCCESS`; a missing receipt means `NOT_FOUND`. The adapter does not
    /// distinguish pending from dropped — both read as not-found.
    pub async fn tx_status(&self, hash: &str) -> Result<TxStatus, EthError> {
        let result = self
            .call("eth_getTransactionReceipt", json!([hash]))
            .await?;
        if result.is_null() {
            return Ok(TxStatus::NotFound);
        }
        Ok(TxStatus::Success)
    }

    /// Builds and signs an ERC-20 transfer gas-limited to 100_000, per the
    /// adapter's fixed ERC-20 gas budget.
    pub fn build_erc20_send(
        &self,
        chain_id: u64,
        nonce: u64,
        token_contract: &str,
        to: &str,
        amount: [u8; 32],
        gas_price: U256,
    ) -> Result<EthTransaction, EthError> {
        crate::transaction::build_erc20_transfer(
            chain_id,
            nonce,
            token_contract,
            to,
            amount,
            gas_price,
            100_000,
        )
    }

    /// History via a block-explorer "list transactions by address" endpoint
    /// (Blockscout-shaped); the exact provider is a pluggable collaborator.
    pub async fn history(&self, address: &str) -> Result<Vec<TxRecord>, EthError> {
        let base = self
            .explorer_api_url
            .as_ref()
            .ok_or_else(|| EthError::RpcError("no explorer configured".into()))?;

        let url = format!("{base}?module=account&action=txlist&address={address}");
        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|e| EthError::RpcError(e.to_string()))?;
        let envelope: Value = response
            .json()
            .await
            .map_err(|e| EthError::RpcError(e.to_string()))?;

        let entries = envelope
            .get("result")
            .and_then(Value::as_array)
            .cloned()
            .unwrap_or_default();

        let mut records = Vec::with_capacity(entries.len());
        for entry in entries {
            let from = entry.get("from").and_then(Value::as_str).unwrap_or("");
            let is_outgoing = from.eq_ignore_ascii_case(address);
            records.push(TxRecord {
                hash: entry
                    .get("hash")
                    .and_then(Value::as_str)
                    .unwrap_or_default()
                    .to_string(),
                status: entry
                    .get("txreceipt_status")
                    .and_then(Value::as_str)
                    .unwrap_or("unknown")
                    .to_string(),
                timestamp: entry
                    .get("timeStamp")
                    .and_then(Value::as_str)
                    .and_then(|s| s.parse().ok())
                    .unwrap_or(0),
                token: "ETH".to_string(),
                amount: entry
                    .get("value")
                    .and_then(Value::as_str)
                    .unwrap_or("0")
                    .to_string(),
                is_outgoing,
                other_address: if is_outgoing {
                    entry
                        .get("to")
                        .and_then(Value::as_str)
                        .unwrap_or_default()
                        .to_string()
                } else {
                    from.to_string()
                },
            });
        }
        Ok(records)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tx_status_variants_are_distinct() {
        assert_ne!(TxStatus::Success, TxStatus::NotFound);
    }

    #[test]
    fn gas_speed_percentages() {
        assert_eq!(GasSpeed::Slow.percent(), 80);
        assert_eq!(GasSpeed::Normal.percent(), 100);
        assert_eq!(GasSpeed::Fast.percent(), 150);
    }

    #[test]
    fn hex_to_u64_parses() {
        let v = json!("0x2a");
        assert_eq!(EthAdapter::hex_to_u64(&v).unwrap(), 42);
    }

    #[test]
    fn hex_to_u256_parses_odd_length() {
        let v = json!("0x1");
        let parsed = EthAdapter::hex_to_u256(&v).unwrap();
        assert!(parsed.equals(&U256::from_u64(1)));
    }

    #[test]
    fn hex_to_u256_parses_large_value() {
        let v = json!("0xde0b6b3a7640000"); // 1e18
        let parsed = EthAdapter::hex_to_u256(&v).unwrap();
        assert!(parsed.equals(&U256::from_u64(1_000_000_000_000_000_000)));
    }
}
