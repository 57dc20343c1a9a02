//! Common types shared across modules.

use ethers::prelude::*;

/// ERC20 token metadata as read from the chain.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TokenDescriptor {
    pub address: Address,
    pub name: String,
    pub symbol: String,
    pub decimals: u8,
}

impl TokenDescriptor {
    /// Fallback descriptor used when any metadata read fails.
    pub fn unknown(address: Address) -> Self {
        Self {
            address,
            name: "Unknown Token".to_string(),
            symbol: "UNKN".to_string(),
            decimals: 18,
        }
    }
}

/// Outcome of a confirmed airdrop submission.
#[derive(Debug, Clone)]
pub struct AirdropReceipt {
    pub tx_hash: TxHash,
    pub block_number: Option<u64>,
    pub gas_used: u64,
    /// Set when an approval transaction was needed before the transfer.
    pub approval_tx_hash: Option<TxHash>,
}
