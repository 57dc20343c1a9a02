//! Parsing of free-text recipient and amount lists.
//!
//! Amount strings are base-10 decimals scaled to integer base units by the
//! token's decimal count. All amount arithmetic is U256; floats never touch
//! token quantities.

use anyhow::{anyhow, Result};
use ethers::types::{Address, U256};
use ethers::utils::{parse_units, ParseUnits};

/// Split raw text on one-or-more commas/newlines, trim each entry, and drop
/// empties. Order is preserved; it pairs recipients with amounts positionally.
pub fn parse_list(raw: &str) -> Vec<String> {
    raw.split(|c| c == ',' || c == '\n')
        .map(str::trim)
        .filter(|entry| !entry.is_empty())
        .map(str::to_string)
        .collect()
}

/// Scale a decimal string to an integer number of base units using `decimals`
/// fractional digits. Handles the full 256-bit range without precision loss.
pub fn parse_amount(raw: &str, decimals: u8) -> Result<U256> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(anyhow!("amount cannot be empty"));
    }

    match parse_units(trimmed, decimals as u32) {
        Ok(ParseUnits::U256(value)) => Ok(value),
        Ok(ParseUnits::I256(_)) => Err(anyhow!("amount cannot be negative: {}", trimmed)),
        Err(e) => Err(anyhow!("invalid amount '{}': {}", trimmed, e)),
    }
}

/// Lenient amount parsing for live estimation: unparsable entries become zero
/// and zero amounts are dropped, so a half-typed line never aborts the
/// estimate.
pub fn parse_amounts_lenient(raw: &str, decimals: u8) -> Vec<U256> {
    parse_list(raw)
        .iter()
        .map(|entry| parse_amount(entry, decimals).unwrap_or_else(|_| U256::zero()))
        .filter(|amount| !amount.is_zero())
        .collect()
}

/// Strict amount parsing for submission: any unparsable entry aborts with an
/// error naming the offending input. Zero amounts are still dropped.
pub fn parse_amounts_strict(raw: &str, decimals: u8) -> Result<Vec<U256>> {
    let mut amounts = Vec::new();
    for (pos, entry) in parse_list(raw).iter().enumerate() {
        let amount =
            parse_amount(entry, decimals).map_err(|e| anyhow!("entry {}: {}", pos + 1, e))?;
        if !amount.is_zero() {
            amounts.push(amount);
        }
    }
    Ok(amounts)
}

/// Parse recipient entries into checked addresses, naming the offending entry
/// on failure.
pub fn parse_recipients(raw: &str) -> Result<Vec<Address>> {
    let mut recipients = Vec::new();
    for (pos, entry) in parse_list(raw).iter().enumerate() {
        let address: Address = entry
            .parse()
            .map_err(|_| anyhow!("entry {}: invalid address: {}", pos + 1, entry))?;
        recipients.push(address);
    }
    Ok(recipients)
}

/// Exact sum of base-unit amounts. Zero for an empty slice, error if the sum
/// overflows 256 bits.
pub fn total(amounts: &[U256]) -> Result<U256> {
    amounts.iter().try_fold(U256::zero(), |acc, amount| {
        acc.checked_add(*amount)
            .ok_or_else(|| anyhow!("amount total overflows 256 bits"))
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn addr(byte: u8) -> String {
        format!("{:?}", Address::repeat_byte(byte))
    }

    // ==================== parse_list tests ====================

    #[test]
    fn test_parse_list_commas_and_newlines() {
        let entries = parse_list("0xAAA, 0xBBB\n0xCCC");
        assert_eq!(entries, vec!["0xAAA", "0xBBB", "0xCCC"]);
    }

    #[test]
    fn test_parse_list_collapses_repeated_separators() {
        let entries = parse_list("a,,\n\n,b");
        assert_eq!(entries, vec!["a", "b"]);
    }

    #[test]
    fn test_parse_list_trims_whitespace_and_crlf() {
        let entries = parse_list("  a \r\n b ,c ");
        assert_eq!(entries, vec!["a", "b", "c"]);
    }

    #[test]
    fn test_parse_list_empty_input() {
        assert!(parse_list("").is_empty());
        assert!(parse_list(" \n , \n ").is_empty());
    }

    #[test]
    fn test_parse_list_idempotent() {
        let raw = "0xAAA, 0xBBB\n\n0xCCC,";
        let once = parse_list(raw);
        let twice = parse_list(&once.join(","));
        assert_eq!(once, twice);
    }

    // ==================== parse_amount tests ====================

    #[test]
    fn test_parse_amount_whole_units() {
        let result = parse_amount("1", 18).unwrap();
        assert_eq!(result, U256::exp10(18));
    }

    #[test]
    fn test_parse_amount_zero_decimals() {
        let result = parse_amount("1000", 0).unwrap();
        assert_eq!(result, U256::from(1000u64));
    }

    #[test]
    fn test_parse_amount_fractional() {
        let result = parse_amount("1.5", 6).unwrap();
        assert_eq!(result, U256::from(1_500_000u64));
    }

    #[test]
    fn test_parse_amount_smallest_unit() {
        let result = parse_amount("0.000000000000000001", 18).unwrap();
        assert_eq!(result, U256::one());
    }

    #[test]
    fn test_parse_amount_max_256_bit_magnitude() {
        // U256::MAX scaled down by 18 decimals, written as a decimal string.
        let raw = "115792089237316195423570985008687907853269984665640564039457.584007913129639935";
        let result = parse_amount(raw, 18).unwrap();
        assert_eq!(result, U256::MAX);
    }

    #[test]
    fn test_parse_amount_rejects_garbage() {
        assert!(parse_amount("abc", 18).is_err());
        assert!(parse_amount("1.2.3", 18).is_err());
    }

    #[test]
    fn test_parse_amount_rejects_empty() {
        let err = parse_amount("   ", 18).unwrap_err();
        assert!(err.to_string().contains("empty"));
    }

    #[test]
    fn test_parse_amount_rejects_negative() {
        let err = parse_amount("-1", 18).unwrap_err();
        assert!(err.to_string().contains("negative"));
    }

    #[test]
    fn test_parse_amount_rejects_excess_precision() {
        // Three fractional digits cannot be represented with two decimals.
        assert!(parse_amount("1.001", 2).is_err());
    }

    // ==================== lenient / strict parsing tests ====================

    #[test]
    fn test_parse_amounts_lenient_zero_fills_bad_entries() {
        let amounts = parse_amounts_lenient("1000,abc,2000", 0);
        assert_eq!(amounts, vec![U256::from(1000u64), U256::from(2000u64)]);
    }

    #[test]
    fn test_parse_amounts_lenient_drops_zeros() {
        let amounts = parse_amounts_lenient("0,5,0.0", 2);
        assert_eq!(amounts, vec![U256::from(500u64)]);
    }

    #[test]
    fn test_parse_amounts_strict_names_offending_entry() {
        let err = parse_amounts_strict("1000,abc,2000", 0).unwrap_err();
        let message = err.to_string();
        assert!(message.contains("entry 2"));
        assert!(message.contains("abc"));
    }

    #[test]
    fn test_parse_amounts_strict_drops_zeros() {
        let amounts = parse_amounts_strict("0,1000", 0).unwrap();
        assert_eq!(amounts, vec![U256::from(1000u64)]);
    }

    // ==================== parse_recipients tests ====================

    #[test]
    fn test_parse_recipients_mixed_separators() {
        let raw = format!("{}, {}\n{}", addr(0xaa), addr(0xbb), addr(0xcc));
        let recipients = parse_recipients(&raw).unwrap();
        assert_eq!(recipients.len(), 3);
        assert_eq!(recipients[0], Address::repeat_byte(0xaa));
        assert_eq!(recipients[2], Address::repeat_byte(0xcc));
    }

    #[test]
    fn test_parse_recipients_invalid_entry() {
        let raw = format!("{},nonsense", addr(0x11));
        let err = parse_recipients(&raw).unwrap_err();
        assert!(err.to_string().contains("entry 2"));
    }

    // ==================== total tests ====================

    #[test]
    fn test_total_empty_is_zero() {
        assert_eq!(total(&[]).unwrap(), U256::zero());
    }

    #[test]
    fn test_total_exact_sum() {
        let amounts = vec![
            U256::from(1000u64),
            U256::from(2000u64),
            U256::from(3000u64),
        ];
        assert_eq!(total(&amounts).unwrap(), U256::from(6000u64));
    }

    #[test]
    fn test_total_beyond_64_bit_range() {
        let amounts = vec![U256::from(u64::MAX), U256::from(u64::MAX), U256::one()];
        let expected = U256::from(u64::MAX) * U256::from(2u64) + U256::one();
        assert_eq!(total(&amounts).unwrap(), expected);
        assert!(total(&amounts).unwrap() > U256::from(u64::MAX));
    }

    #[test]
    fn test_total_overflow_is_an_error() {
        let amounts = vec![U256::MAX, U256::one()];
        assert!(total(&amounts).is_err());
    }

    // ==================== positional pairing example ====================

    #[test]
    fn test_recipients_and_amounts_pair_positionally() {
        let recipients_raw = format!("{}, {}\n{}", addr(0xaa), addr(0xbb), addr(0xcc));
        let amounts_raw = "1000,2000,3000";

        let recipients = parse_recipients(&recipients_raw).unwrap();
        let amounts = parse_amounts_strict(amounts_raw, 0).unwrap();

        assert_eq!(recipients.len(), 3);
        assert_eq!(amounts.len(), 3);
        assert_eq!(total(&amounts).unwrap(), U256::from(6000u64));
    }
}
