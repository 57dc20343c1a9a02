//! Formatting helpers for the GUI.

use ethers::types::{Address, TxHash, U256};

/// Format a base-unit amount as a human-readable decimal using the token's
/// decimal count.
pub fn format_token_amount(amount: U256, decimals: u8) -> String {
    ethers::utils::format_units(amount, decimals as u32)
        .unwrap_or_else(|_| amount.to_string())
}

/// Shorten an address for display: 0x1234...abcd
pub fn shorten_address(address: Address) -> String {
    let full = format!("{:?}", address);
    format!("{}...{}", &full[..6], &full[full.len() - 4..])
}

/// Full 0x-prefixed hex of a transaction hash, for explorer URLs and logs.
pub fn tx_hash_hex(tx_hash: TxHash) -> String {
    format!("0x{}", hex::encode(tx_hash.as_bytes()))
}

#[cfg(test)]
mod tests {
    use super::*;

    // ==================== format_token_amount tests ====================

    #[test]
    fn test_format_token_amount_whole() {
        let amount = U256::exp10(18);
        assert_eq!(format_token_amount(amount, 18), "1.000000000000000000");
    }

    #[test]
    fn test_format_token_amount_six_decimals() {
        assert_eq!(format_token_amount(U256::from(1_500_000u64), 6), "1.500000");
    }

    #[test]
    fn test_format_token_amount_two_decimals() {
        assert_eq!(format_token_amount(U256::from(6000u64), 2), "60.00");
    }

    // ==================== address / hash display tests ====================

    #[test]
    fn test_shorten_address() {
        let short = shorten_address(Address::repeat_byte(0xab));
        assert_eq!(short, "0xabab...abab");
    }

    #[test]
    fn test_tx_hash_hex() {
        let hash = TxHash::repeat_byte(0x01);
        let text = tx_hash_hex(hash);
        assert_eq!(text.len(), 2 + 64);
        assert!(text.starts_with("0x0101"));
    }
}
