//! Little-endian 256-bit arithmetic and the decimal/fixed-point parsers
//! used throughout the wallet core to move amounts between display strings
//! and the 256-bit datoshi values Cellframe transactions carry.

mod error;
mod u256;

pub use error::NumericError;
pub use u256::U256;

use std::sync::OnceLock;

/// Number of fractional digits in one CELL (`1 CELL = 10^18 datoshi`).
pub const DATOSHI_DECIMALS: usize = 18;

/// Longest decimal digit sequence `scan_uninteger` will accept.
pub const MAX_DECIMAL_DIGITS: usize = 78;

fn pow10_table() -> &'static [U256; MAX_DECIMAL_DIGITS] {
    static TABLE: OnceLock<[U256; MAX_DECIMAL_DIGITS]> = OnceLock::new();
    TABLE.get_or_init(|| {
        let mut table = [U256::zero(); MAX_DECIMAL_DIGITS];
        table[0] = U256::from_u64(1);
        let ten = U256::from_u64(10);
        for i in 1..MAX_DECIMAL_DIGITS {
            let (product, overflow) = table[i - 1].mul_checked(&ten);
            debug_assert!(!overflow, "10^{i} must fit in 256 bits");
            table[i] = product;
        }
        table
    })
}

/// Parses an unsigned decimal digit string into a [`U256`].
///
/// Right-to-left: digit at position `i` (counting from the least
/// significant digit) is multiplied by the precomputed `10^i` and
/// accumulated. Any per-digit multiplication or accumulation overflow
/// fails with [`NumericError::NumericOverflow`].
pub fn scan_uninteger(digits: &str) -> Result<U256, NumericError> {
    if digits.is_empty() {
        return Err(NumericError::InvalidInput("empty digit sequence".into()));
    }
    if digits.len() > MAX_DECIMAL_DIGITS {
        return Err(NumericError::InvalidInput(format!(
            "digit sequence of length {} exceeds {MAX_DECIMAL_DIGITS}",
            digits.len()
        )));
    }
    if !digits.bytes().all(|b| b.is_ascii_digit()) {
        return Err(NumericError::InvalidInput(format!(
            "{digits:?} is not a decimal digit sequence"
        )));
    }

    let table = pow10_table();
    let mut sum = U256::zero();
    for (i, byte) in digits.bytes().rev().enumerate() {
        let digit = (byte - b'0') as u64;
        if digit == 0 {
            continue;
        }
        let (term, mul_overflow) = U256::from_u64(digit).mul_checked(&table[i]);
        if mul_overflow {
            return Err(NumericError::NumericOverflow(format!(
                "digit {digit} at position {i} overflows"
            )));
        }
        let (new_sum, add_overflow) = sum.add_carry(&term);
        if add_overflow {
            return Err(NumericError::NumericOverflow(
                "accumulated sum overflows 256 bits".into(),
            ));
        }
        sum = new_sum;
    }
    Ok(sum)
}

/// Parses a `"D"` or `"D.F"` amount string (`F` at most 18 digits) into
/// datoshi (`amount * 10^18`), per the SDK's fixed-point convention.
pub fn from_amount_string(amount: &str) -> Result<U256, NumericError> {
    let (whole, frac) = match amount.split_once('.') {
        Some((w, f)) => (w, f),
        None => (amount, ""),
    };
    if whole.is_empty() {
        return Err(NumericError::InvalidInput(
            "missing whole-number part".into(),
        ));
    }
    if frac.len() > DATOSHI_DECIMALS {
        return Err(NumericError::InvalidInput(format!(
            "fractional part {frac:?} exceeds {DATOSHI_DECIMALS} digits"
        )));
    }
    let mut combined = String::with_capacity(whole.len() + DATOSHI_DECIMALS);
    combined.push_str(whole);
    combined.push_str(frac);
    for _ in frac.len()..DATOSHI_DECIMALS {
        combined.push('0');
    }
    scan_uninteger(&combined)
}

/// Renders a datoshi value back to a `"D"` or `"D.F"` string, trimming
/// trailing fractional zeros (the inverse of [`from_amount_string`]).
pub fn format_amount(value: &U256) -> String {
    format_fixed_point(value, DATOSHI_DECIMALS as u32)
}

/// Renders a value carrying `decimals` implicit fractional digits (e.g. an
/// ERC-20 balance) as a `"D"` or `"D.F"` string, trimming trailing zeros.
pub fn format_fixed_point(value: &U256, decimals: u32) -> String {
    let decimals = decimals as usize;
    let digits = value.to_string();
    let padded = if digits.len() <= decimals {
        let mut s = "0".repeat(decimals - digits.len() + 1);
        s.push_str(&digits);
        s
    } else {
        digits
    };
    let split_at = padded.len() - decimals;
    let whole = &padded[..split_at];
    let frac = padded[split_at..].trim_end_matches('0');

    let whole_trimmed = whole.trim_start_matches('0');
    let whole_out = if whole_trimmed.is_empty() {
        "0"
    } else {
        whole_trimmed
    };

    if frac.is_empty() {
        whole_out.to_string()
    } else {
        format!("{whole_out}.{frac}")
    }
}
