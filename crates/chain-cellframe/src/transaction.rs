use wallet_numeric::U256;

use crate::error::CellframeError;

const HEADER_LEN: usize = 12;
const ADDR_LEN: usize = 77;
const OUT_COND_UNION_LEN: usize = 272;

pub const ITEM_TYPE_IN: u8 = 0x00;
pub const ITEM_TYPE_OUT: u8 = 0x12;
pub const ITEM_TYPE_OUT_EXT: u8 = 0x11;
pub const ITEM_TYPE_OUT_COND: u8 = 0x61;
pub const ITEM_TYPE_TSD: u8 = 0x80;
pub const ITEM_TYPE_SIG: u8 = 0x30;

const OUT_COND_FEE_SUBTYPE: u8 = 0x04;

/// Append-only byte-exact builder for the Cellframe wire transaction
/// format. Item order is caller-controlled — see the adapter for the
/// consensus-observable ordering rule (recipient, fee collector, change,
/// [tsd], fee).
pub struct TxBuilder {
    buffer: Vec<u8>,
}

impl TxBuilder {
    /// Start a new transaction with `tx_items_size` zeroed in its header.
    pub fn new(ts_created: u64) -> Self {
        let mut buffer = Vec::with_capacity(256);
        buffer.extend_from_slice(&ts_created.to_le_bytes());
        buffer.extend_from_slice(&0u32.to_le_bytes());
        TxBuilder { buffer }
    }

    /// Append an IN item: type, 32-byte previous tx hash, dynamic padding
    /// to the next 4-byte boundary, then the previous output index.
    pub fn add_in(&mut self, prev_hash: &[u8; 32], prev_idx: u32) {
        self.buffer.push(ITEM_TYPE_IN);
        self.buffer.extend_from_slice(prev_hash);
        let pad = (4 - (self.buffer.len() % 4)) % 4;
        self.buffer.resize(self.buffer.len() + pad, 0);
        self.buffer.extend_from_slice(&prev_idx.to_le_bytes());
    }

    /// Append an OUT item: type, value, recipient address (77 bytes).
    pub fn add_out(&mut self, value: &U256, addr: &[u8; ADDR_LEN]) {
        self.buffer.push(ITEM_TYPE_OUT);
        self.buffer.extend_from_slice(&value.to_bytes());
        self.buffer.extend_from_slice(addr);
    }

    /// Append an OUT_EXT item: type, value, address, 10-byte ticker.
    pub fn add_out_ext(
        &mut self,
        value: &U256,
        addr: &[u8; ADDR_LEN],
        ticker: &str,
    ) -> Result<(), CellframeError> {
        let ticker_bytes = ticker.as_bytes();
        if ticker_bytes.len() > 10 {
            return Err(CellframeError::InvalidInput(format!(
                "ticker {ticker:?} exceeds 10 bytes"
            )));
        }
        let mut padded_ticker = [0u8; 10];
        padded_ticker[..ticker_bytes.len()].copy_from_slice(ticker_bytes);

        self.buffer.push(ITEM_TYPE_OUT_EXT);
        self.buffer.extend_from_slice(&value.to_bytes());
        self.buffer.extend_from_slice(addr);
        self.buffer.extend_from_slice(&padded_ticker);
        Ok(())
    }

    /// Append the 340-byte OUT_COND validator-fee item.
    pub fn add_fee(&mut self, value: &U256) {
        self.buffer.push(ITEM_TYPE_OUT_COND);
        self.buffer.push(OUT_COND_FEE_SUBTYPE);
        self.buffer.extend_from_slice(&value.to_bytes());
        self.buffer.resize(self.buffer.len() + 6, 0); // pad
        self.buffer.extend_from_slice(&0u64.to_le_bytes()); // ts_expires
        self.buffer.extend_from_slice(&0u64.to_le_bytes()); // srv_uid
        self.buffer.resize(self.buffer.len() + 8, 0); // pad
        self.buffer.resize(self.buffer.len() + OUT_COND_UNION_LEN, 0);
        self.buffer.extend_from_slice(&0u32.to_le_bytes()); // tsd_size
    }

    /// Append a TSD item wrapping `data` tagged with `inner_type`.
    pub fn add_tsd(&mut self, inner_type: u16, data: &[u8]) -> Result<(), CellframeError> {
        if data.is_empty() {
            return Err(CellframeError::InvalidInput(
                "data_size zero for TSD".into(),
            ));
        }
        let inner_size = (6 + data.len()) as u64;

        self.buffer.push(ITEM_TYPE_TSD);
        self.buffer.resize(self.buffer.len() + 7, 0);
        self.buffer.extend_from_slice(&inner_size.to_le_bytes());
        self.buffer.extend_from_slice(&inner_type.to_le_bytes());
        self.buffer
            .extend_from_slice(&(data.len() as u32).to_le_bytes());
        self.buffer.extend_from_slice(data);
        Ok(())
    }

    /// Append the SIG item wrapping a complete `dap_sign_t` byte blob.
    pub fn add_signature(&mut self, dap_sign: &[u8]) {
        self.buffer.push(ITEM_TYPE_SIG);
        self.buffer.push(1u8); // version
        self.buffer
            .extend_from_slice(&(dap_sign.len() as u32).to_le_bytes());
        self.buffer.extend_from_slice(dap_sign);
    }

    /// A copy of the current buffer with `tx_items_size` zeroed — the form
    /// the signer hashes.
    pub fn get_signing_data(&self) -> Vec<u8> {
        let mut copy = self.buffer.clone();
        copy[8..12].copy_from_slice(&0u32.to_le_bytes());
        copy
    }

    /// A copy of the current buffer with `tx_items_size` set to the actual
    /// item-bytes length — the form submitted to the network.
    pub fn get_final_data(&self) -> Vec<u8> {
        let mut copy = self.buffer.clone();
        let items_size = (copy.len() - HEADER_LEN) as u32;
        copy[8..12].copy_from_slice(&items_size.to_le_bytes());
        copy
    }

    /// Number of item bytes appended so far (excludes the 12-byte header).
    pub fn items_len(&self) -> usize {
        self.buffer.len() - HEADER_LEN
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn recipient_addr() -> [u8; 77] {
        [0x42u8; 77]
    }

    #[test]
    fn new_builder_has_zeroed_header() {
        let builder = TxBuilder::new(1_700_000_000);
        assert_eq!(builder.buffer.len(), HEADER_LEN);
        assert_eq!(&builder.buffer[8..12], &0u32.to_le_bytes());
    }

    #[test]
    fn add_in_pads_to_four_byte_boundary() {
        let mut builder = TxBuilder::new(0);
        builder.add_in(&[0xAA; 32], 7);
        // header(12) + type(1) + hash(32) = 45, pad to 48, + idx(4) = 52
        assert_eq!(builder.buffer.len(), 52);
        assert_eq!(builder.buffer[52 - 4..52], 7u32.to_le_bytes());
    }

    #[test]
    fn add_in_dynamic_padding_depends_on_prior_items() {
        let mut builder = TxBuilder::new(0);
        builder.add_in(&[0x01; 32], 0); // first IN consumes 52 bytes total
        let len_before = builder.buffer.len();
        builder.add_in(&[0x02; 32], 1);
        // second IN: type(1)+hash(32) added to len_before -> compute expected pad
        let len_after_type_hash = len_before + 33;
        let pad = (4 - (len_after_type_hash % 4)) % 4;
        assert_eq!(builder.buffer.len(), len_after_type_hash + pad + 4);
    }

    #[test]
    fn add_out_has_no_padding() {
        let mut builder = TxBuilder::new(0);
        let value = U256::from_u64(1_000_000_000_000_000_000);
        builder.add_out(&value, &recipient_addr());
        assert_eq!(builder.items_len(), 1 + 32 + 77);
    }

    #[test]
    fn add_out_ext_includes_ticker() {
        let mut builder = TxBuilder::new(0);
        let value = U256::from_u64(100);
        builder
            .add_out_ext(&value, &recipient_addr(), "CELL")
            .unwrap();
        assert_eq!(builder.items_len(), 1 + 32 + 77 + 10);
    }

    #[test]
    fn add_out_ext_rejects_oversized_ticker() {
        let mut builder = TxBuilder::new(0);
        let value = U256::from_u64(1);
        let result = builder.add_out_ext(&value, &recipient_addr(), "WAYTOOLONGTICKER");
        assert!(result.is_err());
    }

    #[test]
    fn add_fee_is_340_bytes() {
        let mut builder = TxBuilder::new(0);
        builder.add_fee(&U256::from_u64(2_000_000_000_000_000));
        assert_eq!(builder.items_len(), 340);
    }

    #[test]
    fn add_tsd_rejects_empty_data() {
        let mut builder = TxBuilder::new(0);
        let result = builder.add_tsd(1, &[]);
        assert!(result.is_err());
    }

    #[test]
    fn add_tsd_size_matches_formula() {
        let mut builder = TxBuilder::new(0);
        let data = vec![0xFFu8; 20];
        builder.add_tsd(3, &data).unwrap();
        assert_eq!(builder.items_len(), 16 + 6 + 20);
    }

    #[test]
    fn add_signature_wraps_dap_sign_bytes() {
        let mut builder = TxBuilder::new(0);
        let dap_sign = vec![0x99u8; 3306];
        builder.add_signature(&dap_sign);
        assert_eq!(builder.items_len(), 6 + 3306);
    }

    #[test]
    fn signing_data_has_zero_items_size_always() {
        let mut builder = TxBuilder::new(42);
        builder.add_in(&[0u8; 32], 0);
        builder.add_out(&U256::from_u64(5), &recipient_addr());
        let signing = builder.get_signing_data();
        assert_eq!(&signing[8..12], &0u32.to_le_bytes());
        assert_eq!(signing.len(), builder.buffer.len());
    }

    #[test]
    fn final_data_has_correct_items_size() {
        let mut builder = TxBuilder::new(42);
        builder.add_in(&[0u8; 32], 0);
        builder.add_out(&U256::from_u64(5), &recipient_addr());
        let finalized = builder.get_final_data();
        let items_size = u32::from_le_bytes(finalized[8..12].try_into().unwrap());
        assert_eq!(items_size as usize, builder.items_len());
    }

    #[test]
    fn final_and_signing_forms_differ_only_in_header() {
        let mut builder = TxBuilder::new(7);
        builder.add_out(&U256::from_u64(1), &recipient_addr());
        let signing = builder.get_signing_data();
        let finalized = builder.get_final_data();
        assert_eq!(signing[..8], finalized[..8]);
        assert_eq!(signing[12..], finalized[12..]);
        assert_ne!(signing[8..12], finalized[8..12]);
    }
}
