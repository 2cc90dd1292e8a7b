//! JSON-RPC adapter for Cellframe: balance/UTXO/history queries, UTXO
//! selection, transaction assembly and submission.

use serde_json::{json, Value};
use wallet_numeric::U256;

use crate::address;
use crate::config::CellframeNetworkConfig;
use crate::error::CellframeError;
use crate::signer;
use crate::transaction::TxBuilder;
use crate::utxo::{select_utxos, Utxo, UtxoSelection};
use crate::wallet::CellframeWallet;

/// Outcome of `tx;dump` status lookup.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TxStatus {
    Success,
    NotFound,
}

/// A single history entry, shaped to mirror the Ethereum adapter's record.
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

/// Thin JSON-RPC client for one Cellframe node.
pub struct CellframeAdapter {
    config: CellframeNetworkConfig,
    client: reqwest::Client,
}

impl CellframeAdapter {
    pub fn new(config: CellframeNetworkConfig) -> Self {
        CellframeAdapter {
            config,
            client: reqwest::Client::new(),
        }
    }

    async fn call(&self, method: &str, params: Value) -> Result<Value, CellframeError> {
        let body = json!({
            "jsonrpc": "2.0",
            "id": 1,
            "method": method,
            "params": params,
        });
        tracing::debug!(method, net = %self.config.net_name, "cellframe json-rpc request");

        let response = self
            .client
            .post(&self.config.rpc_url)
            .json(&body)
            .send()
            .await
            .map_err(|e| CellframeError::RpcError(e.to_string()))?;

        let envelope: Value = response
            .json()
            .await
            .map_err(|e| CellframeError::RpcError(e.to_string()))?;

        if let Some(error) = envelope.get("error") {
            return Err(CellframeError::RpcError(error.to_string()));
        }
        envelope
            .get("result")
            .cloned()
            .ok_or_else(|| CellframeError::RpcError("response missing result".into()))
    }

    /// `wallet;info;-net NET;-addr A;-token T`. Empty or malformed
    /// responses yield `"0"` rather than failing.
    pub async fn balance(&self, address: &str, token: &str) -> Result<String, CellframeError> {
        let result = self
            .call(
                "wallet;info",
                json!(["-net", self.config.net_name, "-addr", address, "-token", token]),
            )
            .await
            .unwrap_or(Value::Null);

        let balance = result
            .get(0)
            .and_then(|outer| outer.get(0))
            .and_then(|entry| entry.get("balance"))
            .and_then(Value::as_str);

        Ok(balance.unwrap_or("0").to_string())
    }

    /// `ledger;list;outs_all`, parsed into `Utxo` records in RPC-returned
    /// order.
    pub async fn fetch_utxos(
        &self,
        address: &str,
        token: &str,
    ) -> Result<Vec<Utxo>, CellframeError> {
        let result = self
            .call(
                "ledger;list;outs_all",
                json!(["-net", self.config.net_name, "-addr", address, "-token", token]),
            )
            .await?;

        let outs = result
            .get(0)
            .and_then(|entry| entry.get(0))
            .and_then(|entry| entry.get("outs"))
            .and_then(Value::as_array)
            .cloned()
            .unwrap_or_default();

        let mut utxos = Vec::with_capacity(outs.len());
        for out in outs {
            let prev_hash_hex = out
                .get("prev_hash")
                .and_then(Value::as_str)
                .ok_or_else(|| CellframeError::RpcError("UTXO missing prev_hash".into()))?;
            let prev_hash_bytes = hex::decode(prev_hash_hex.trim_start_matches("0x"))
                .map_err(|e| CellframeError::RpcError(format!("invalid prev_hash hex: {e}")))?;
            if prev_hash_bytes.len() != 32 {
                return Err(CellframeError::RpcError(
                    "UTXO prev_hash is not 32 bytes".into(),
                ));
            }
            let mut prev_hash = [0u8; 32];
            prev_hash.copy_from_slice(&prev_hash_bytes);

            let idx = out
                .get("idx")
                .and_then(Value::as_u64)
                .ok_or_else(|| CellframeError::RpcError("UTXO missing idx".into()))?
                as u32;

            let value_str = out
                .get("value")
                .and_then(Value::as_str)
                .ok_or_else(|| CellframeError::RpcError("UTXO missing value".into()))?;
            let value = wallet_numeric::scan_uninteger(value_str)
                .map_err(|e| CellframeError::RpcError(format!("invalid UTXO value: {e}")))?;

            utxos.push(Utxo {
                prev_hash,
                idx,
                value,
            });
        }
        Ok(utxos)
    }

    /// Submits the final transaction bytes via `tx_create_json`.
    pub async fn submit(&self, final_tx: &[u8]) -> Result<String, CellframeError> {
        let result = self
            .call("tx_create_json", json!({ "tx": hex::encode(final_tx) }))
            .await?;

        let created = result
            .get("tx_create")
            .and_then(Value::as_bool)
            .unwrap_or(false);
        if !created {
            return Err(CellframeError::NodeRejected(
                result.to_string(),
            ));
        }
        result
            .get("hash")
            .and_then(Value::as_str)
            .map(|s| s.to_string())
            .ok_or_else(|| CellframeError::NodeRejected("no hash in response".into()))
    }

    /// `tx;dump`. A successful response means `SUCCESS`; absence means
    /// `NOT_FOUND`.
    pub async fn tx_status(&self, hash: &str) -> Result<TxStatus, CellframeError> {
        match self.call("tx;dump", json!(["-hash", hash])).await {
            Ok(_) => Ok(TxStatus::Success),
            Err(_) => Ok(TxStatus::NotFound),
        }
    }

    /// `tx;history;-addr A`. Skips the first two meta elements and maps
    /// each record using the `tx_type == "recv"` discriminator.
    pub async fn history(&self, address: &str) -> Result<Vec<TxRecord>, CellframeError> {
        let result = self
            .call(
                "tx;history",
                json!(["-net", self.config.net_name, "-addr", address]),
            )
            .await?;

        let entries = result.as_array().cloned().unwrap_or_default();
        let records_raw = entries.into_iter().skip(2);

        let mut records = Vec::new();
        for entry in records_raw {
            let tx_type = entry.get("tx_type").and_then(Value::as_str).unwrap_or("");
            let is_outgoing = tx_type != "recv";
            records.push(TxRecord {
                hash: entry
                    .get("hash")
                    .and_then(Value::as_str)
                    .unwrap_or_default()
                    .to_string(),
                status: entry
                    .get("status")
                    .and_then(Value::as_str)
                    .unwrap_or("unknown")
                    .to_string(),
                timestamp: entry.get("timestamp").and_then(Value::as_u64).unwrap_or(0),
                token: entry
                    .get("token")
                    .and_then(Value::as_str)
                    .unwrap_or("CELL")
                    .to_string(),
                amount: entry
                    .get("amount")
                    .and_then(Value::as_str)
                    .unwrap_or("0")
                    .to_string(),
                is_outgoing,
                other_address: entry
                    .get("address")
                    .and_then(Value::as_str)
                    .unwrap_or_default()
                    .to_string(),
            });
        }
        Ok(records)
    }

    /// Sends a native CELL amount from `wallet` to `to_address`. Selects
    /// UTXOs covering `amount + network_fee + validator_fee`, builds and
    /// signs the transaction in the mandated output order (recipient, fee
    /// collector, change, fee), and submits it.
    pub async fn send_native(
        &self,
        wallet: &CellframeWallet,
        to_address: &str,
        amount: &U256,
        ts_created: u64,
    ) -> Result<String, CellframeError> {
        let utxos = self.fetch_utxos(&wallet.address, "CELL").await?;
        let final_data = build_native_send(
            &self.config,
            wallet,
            to_address,
            amount,
            &utxos,
            ts_created,
        )?;
        self.submit(&final_data).await
    }

    /// Sends a non-native token amount. Two independent UTXO selections:
    /// token UTXOs covering `amount`, CELL UTXOs covering
    /// `network_fee + validator_fee`.
    pub async fn send_token(
        &self,
        wallet: &CellframeWallet,
        to_address: &str,
        amount: &U256,
        ticker: &str,
        ts_created: u64,
    ) -> Result<String, CellframeError> {
        let token_utxos = self.fetch_utxos(&wallet.address, ticker).await?;
        let cell_utxos = self.fetch_utxos(&wallet.address, "CELL").await?;
        let final_data = build_token_send(
            &self.config,
            wallet,
            to_address,
            amount,
            ticker,
            &token_utxos,
            &cell_utxos,
            ts_created,
        )?;
        self.submit(&final_data).await
    }
}

/// Builds and signs a native CELL send transaction (recipient, fee
/// collector, change, fee — in that order) from a caller-supplied UTXO
/// list. Pure and network-free; `send_native` is a thin RPC wrapper around
/// this.
pub fn build_native_send(
    config: &CellframeNetworkConfig,
    wallet: &CellframeWallet,
    to_address: &str,
    amount: &U256,
    utxos: &[Utxo],
    ts_created: u64,
) -> Result<Vec<u8>, CellframeError> {
    let sk_serialized = wallet
        .sk_serialized
        .as_ref()
        .ok_or(CellframeError::ProtectedWallet)?;

    let (fees, fees_overflow) = config.network_fee.add_carry(&config.validator_fee);
    if fees_overflow {
        return Err(CellframeError::NumericOverflow("fees overflowed".into()));
    }
    let (required, required_overflow) = amount.add_carry(&fees);
    if required_overflow {
        return Err(CellframeError::NumericOverflow(
            "amount + fees overflowed U256".into(),
        ));
    }

    let UtxoSelection {
        selected,
        total: total_input,
    } = select_utxos(utxos, &required)?;

    let recipient_raw = address::decode_to_raw(to_address)?;
    let collector_raw = address::decode_fixed_raw(&config.fee_collector_address)?;
    let sender_raw = address::decode_to_raw(&wallet.address)?;

    let (change, underflow) = total_input.sub_borrow(&required);
    if underflow {
        return Err(CellframeError::NumericOverflow(
            "change computation underflowed".into(),
        ));
    }

    let mut builder = TxBuilder::new(ts_created);
    for utxo in &selected {
        builder.add_in(&utxo.prev_hash, utxo.idx);
    }
    builder.add_out(amount, &recipient_raw);
    builder.add_out(&config.network_fee, &collector_raw);
    if !change.is_zero() {
        builder.add_out(&change, &sender_raw);
    }
    builder.add_fee(&config.validator_fee);

    let signing_data = builder.get_signing_data();
    let dap_sign = signer::sign_transaction(&signing_data, sk_serialized, &wallet.pk_serialized)?;
    builder.add_signature(&dap_sign);

    Ok(builder.get_final_data())
}

/// Builds and signs a non-native token send transaction from caller-supplied
/// token and CELL UTXO lists. Pure and network-free.
#[allow(clippy::too_many_arguments)]
pub fn build_token_send(
    config: &CellframeNetworkConfig,
    wallet: &CellframeWallet,
    to_address: &str,
    amount: &U256,
    ticker: &str,
    token_utxos: &[Utxo],
    cell_utxos: &[Utxo],
    ts_created: u64,
) -> Result<Vec<u8>, CellframeError> {
    let sk_serialized = wallet
        .sk_serialized
        .as_ref()
        .ok_or(CellframeError::ProtectedWallet)?;

    let (fees, fees_overflow) = config.network_fee.add_carry(&config.validator_fee);
    if fees_overflow {
        return Err(CellframeError::NumericOverflow("fees overflowed".into()));
    }

    let token_selection = select_utxos(token_utxos, amount)?;
    let cell_selection = select_utxos(cell_utxos, &fees)?;

    let recipient_raw = address::decode_to_raw(to_address)?;
    let collector_raw = address::decode_fixed_raw(&config.fee_collector_address)?;
    let sender_raw = address::decode_to_raw(&wallet.address)?;

    let (token_change, token_underflow) = token_selection.total.sub_borrow(amount);
    if token_underflow {
        return Err(CellframeError::NumericOverflow(
            "token change underflowed".into(),
        ));
    }
    let (cell_change, cell_underflow) = cell_selection.total.sub_borrow(&fees);
    if cell_underflow {
        return Err(CellframeError::NumericOverflow(
            "cell change underflowed".into(),
        ));
    }

    let mut builder = TxBuilder::new(ts_created);
    for utxo in &token_selection.selected {
        builder.add_in(&utxo.prev_hash, utxo.idx);
    }
    for utxo in &cell_selection.selected {
        builder.add_in(&utxo.prev_hash, utxo.idx);
    }

    builder.add_out_ext(amount, &recipient_raw, ticker)?;
    builder.add_out_ext(&config.network_fee, &collector_raw, "CELL")?;
    if !token_change.is_zero() {
        builder.add_out_ext(&token_change, &sender_raw, ticker)?;
    }
    if !cell_change.is_zero() {
        builder.add_out_ext(&cell_change, &sender_raw, "CELL")?;
    }
    builder.add_fee(&config.validator_fee);

    let signing_data = builder.get_signing_data();
    let dap_sign = signer::sign_transaction(&signing_data, sk_serialized, &wallet.pk_serialized)?;
    builder.add_signature(&dap_sign);

    Ok(builder.get_final_data())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::wallet::derive_from_seed;

    #[test]
    fn tx_status_variants_are_distinct() {
        assert_ne!(TxStatus::Success, TxStatus::NotFound);
    }

    fn utxo(byte: u8, value: u64) -> Utxo {
        Utxo {
            prev_hash: [byte; 32],
            idx: 0,
            value: U256::from_u64(value),
        }
    }

    #[test]
    fn native_send_with_one_sufficient_utxo_has_four_items() {
        let config = CellframeNetworkConfig::backbone();
        let wallet = derive_from_seed(&[1u8; 32], "sender", config.net_id);
        let recipient = derive_from_seed(&[2u8; 32], "recipient", config.net_id);

        let amount = U256::from_u64(1_000_000_000_000_000_000);
        let utxos = vec![utxo(9, 2_000_000_000_000_000_000)];

        let final_data = build_native_send(
            &config,
            &wallet,
            &recipient.address,
            &amount,
            &utxos,
            1_700_000_000,
        )
        .unwrap();

        // IN + OUT(recipient) + OUT(fee collector) + OUT(change) + OUT_COND(fee) + SIG.
        // items_len isn't directly exposed on final bytes; re-derive by rebuilding
        // signing data length and checking item ordering via byte scan.
        assert!(final_data.len() > 12);
        let items_size = u32::from_le_bytes(final_data[8..12].try_into().unwrap()) as usize;
        assert_eq!(items_size, final_data.len() - 12);

        // First item after header is an IN (type 0x00).
        assert_eq!(final_data[12], crate::transaction::ITEM_TYPE_IN);
    }

    #[test]
    fn native_send_exact_amount_omits_change_output() {
        let config = CellframeNetworkConfig::backbone();
        let wallet = derive_from_seed(&[3u8; 32], "sender", config.net_id);
        let recipient = derive_from_seed(&[4u8; 32], "recipient", config.net_id);

        let (fees, _) = config.network_fee.add_carry(&config.validator_fee);
        let amount = U256::from_u64(1_000_000_000_000_000_000);
        let (exact_utxo_value, _) = amount.add_carry(&fees);
        let utxos = vec![Utxo {
            prev_hash: [5u8; 32],
            idx: 0,
            value: exact_utxo_value,
        }];

        let final_data = build_native_send(
            &config,
            &wallet,
            &recipient.address,
            &amount,
            &utxos,
            1_700_000_000,
        )
        .unwrap();

        assert!(final_data.len() > 12);
    }

    #[test]
    fn native_send_insufficient_funds_reports_amounts() {
        let config = CellframeNetworkConfig::backbone();
        let wallet = derive_from_seed(&[6u8; 32], "sender", config.net_id);
        let recipient = derive_from_seed(&[7u8; 32], "recipient", config.net_id);

        let amount = U256::from_u64(10_000_000_000_000_000); // 0.01 CELL
        let utxos = vec![
            utxo(1, 1_000_000_000_000_000),
            utxo(2, 2_000_000_000_000_000),
            utxo(3, 2_000_000_000_000_000),
        ]; // totals 0.005 CELL

        let result = build_native_send(
            &config,
            &wallet,
            &recipient.address,
            &amount,
            &utxos,
            1_700_000_000,
        );

        match result {
            Err(CellframeError::InsufficientFunds { available, required }) => {
                assert_eq!(available, "0.005");
                assert_eq!(required, "0.0121");
            }
            other => panic!("expected InsufficientFunds, got {other:?}"),
        }
    }

    #[test]
    fn token_send_with_two_token_utxos_and_cell_fee_utxo_has_token_and_cell_change() {
        let config = CellframeNetworkConfig::backbone();
        let wallet = derive_from_seed(&[8u8; 32], "sender", config.net_id);
        let recipient = derive_from_seed(&[9u8; 32], "recipient", config.net_id);

        let amount = U256::from_u64(100);
        let token_utxos = vec![utxo(10, 60), utxo(11, 60)];
        let cell_utxos = vec![utxo(12, 1_000_000_000_000_000_000)];

        let final_data = build_token_send(
            &config,
            &wallet,
            &recipient.address,
            &amount,
            "TOKEN",
            &token_utxos,
            &cell_utxos,
            1_700_000_000,
        )
        .unwrap();

        let items_size = u32::from_le_bytes(final_data[8..12].try_into().unwrap()) as usize;
        assert_eq!(items_size, final_data.len() - 12);
        assert_eq!(final_data[12], crate::transaction::ITEM_TYPE_IN);
    }

    #[test]
    fn send_from_protected_wallet_is_rejected() {
        let config = CellframeNetworkConfig::backbone();
        let mut wallet = derive_from_seed(&[13u8; 32], "sender", config.net_id);
        wallet.sk_serialized = None;
        let recipient = derive_from_seed(&[14u8; 32], "recipient", config.net_id);

        let amount = U256::from_u64(1);
        let utxos = vec![utxo(1, 1_000_000_000_000_000_000)];

        let result = build_native_send(
            &config,
            &wallet,
            &recipient.address,
            &amount,
            &utxos,
            1_700_000_000,
        );
        assert!(matches!(result, Err(CellframeError::ProtectedWallet)));
    }
}
