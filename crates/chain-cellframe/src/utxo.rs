use wallet_numeric::U256;

use crate::error::CellframeError;

/// A single unspent transaction output.
#[derive(Debug, Clone)]
pub struct Utxo {
    pub prev_hash: [u8; 32],
    pub idx: u32,
    pub value: U256,
}

/// Result of UTXO selection: the chosen set and its aggregate value.
#[derive(Debug, Clone)]
pub struct UtxoSelection {
    pub selected: Vec<Utxo>,
    pub total: U256,
}

/// Select UTXOs to cover `required`, iterating in the order given (the
/// order the RPC returned them in) and stopping as soon as the running sum
/// reaches `required`. No fee-aware optimization, no smallest/largest-first
/// heuristic — this mirrors the upstream behavior deliberately (changing it
/// would change which UTXOs a given send consumes for the same ledger
/// state).
pub fn select_utxos(utxos: &[Utxo], required: &U256) -> Result<UtxoSelection, CellframeError> {
    let mut selected = Vec::new();
    let mut total = U256::zero();

    for utxo in utxos {
        let (sum, overflow) = total.add_carry(&utxo.value);
        if overflow {
            return Err(CellframeError::NumericOverflow(
                "UTXO running sum overflowed U256".into(),
            ));
        }
        total = sum;
        selected.push(utxo.clone());

        if total >= *required {
            return Ok(UtxoSelection { selected, total });
        }
    }

    Err(CellframeError::InsufficientFunds {
        available: wallet_numeric::format_amount(&total),
        required: wallet_numeric::format_amount(required),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn utxo(byte: u8, idx: u32, value: u64) -> Utxo {
        Utxo {
            prev_hash: [byte; 32],
            idx,
            value: U256::from_u64(value),
        }
    }

    #[test]
    fn selects_single_sufficient_utxo() {
        let utxos = vec![utxo(1, 0, 3_000_000_000_000_000_000)];
        let required = U256::from_u64(1_000_000_000_000_000_000);
        let selection = select_utxos(&utxos, &required).unwrap();
        assert_eq!(selection.selected.len(), 1);
        assert_eq!(selection.total, U256::from_u64(3_000_000_000_000_000_000));
    }

    #[test]
    fn selects_in_given_order_not_by_size() {
        let utxos = vec![utxo(1, 0, 1), utxo(2, 0, 100), utxo(3, 0, 1)];
        let required = U256::from_u64(50);
        let selection = select_utxos(&utxos, &required).unwrap();
        // Must stop after the first two in order, not cherry-pick the 100.
        assert_eq!(selection.selected.len(), 2);
        assert_eq!(selection.selected[0].prev_hash[0], 1);
        assert_eq!(selection.selected[1].prev_hash[0], 2);
    }

    #[test]
    fn insufficient_funds_reports_available_and_required() {
        let utxos = vec![utxo(1, 0, 1_000_000_000_000_000), utxo(2, 0, 2_000_000_000_000_000)];
        let required = U256::from_u64(10_000_000_000_000_000);
        let result = select_utxos(&utxos, &required);
        match result {
            Err(CellframeError::InsufficientFunds { available, required }) => {
                assert_eq!(available, "0.003");
                assert_eq!(required, "0.01");
            }
            other => panic!("expected InsufficientFunds, got {other:?}"),
        }
    }

    #[test]
    fn empty_utxo_list_fails() {
        let required = U256::from_u64(1);
        let result = select_utxos(&[], &required);
        assert!(result.is_err());
    }

    #[test]
    fn exact_match_stops_immediately() {
        let utxos = vec![utxo(1, 0, 500), utxo(2, 0, 500)];
        let required = U256::from_u64(500);
        let selection = select_utxos(&utxos, &required).unwrap();
        assert_eq!(selection.selected.len(), 1);
    }
}
