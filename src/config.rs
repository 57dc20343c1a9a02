use anyhow::Result;
use ethers::providers::{Http, Provider};
use std::env;
use std::sync::Arc;
use url::Url;

/// A predefined EVM-compatible network with label, chain ID, native token, and default RPC.
#[derive(Clone, Debug)]
pub struct EvmNetwork {
    pub label: &'static str,
    pub chain_id: u64,
    pub native_token: &'static str,
    pub default_rpc: &'static str,
}

impl EvmNetwork {
    pub const fn new(
        label: &'static str,
        chain_id: u64,
        native_token: &'static str,
        default_rpc: &'static str,
    ) -> Self {
        Self {
            label,
            chain_id,
            native_token,
            default_rpc,
        }
    }
}

/// Networks selectable in the UI. Chains without a deployed airdrop sender
/// contract still appear here; submitting on them surfaces the
/// unsupported-network error instead of a chain call.
pub const NETWORKS: &[EvmNetwork] = &[
    EvmNetwork::new("Anvil", 31337, "ETH", "http://127.0.0.1:8545"),
    EvmNetwork::new("Sepolia", 11155111, "ETH", "https://ethereum-sepolia-rpc.publicnode.com"),
    EvmNetwork::new("ZkSync Era", 324, "ETH", "https://mainnet.era.zksync.io"),
    EvmNetwork::new("Avalanche Fuji", 43113, "AVAX", "https://api.avax-test.network/ext/bc/C/rpc"),
    EvmNetwork::new("Ethereum", 1, "ETH", "https://ethereum-rpc.publicnode.com"),
    EvmNetwork::new("Base", 8453, "ETH", "https://mainnet.base.org"),
];

/// Find a network by chain ID
pub fn find_network_by_chain_id(chain_id: u64) -> Option<&'static EvmNetwork> {
    NETWORKS.iter().find(|n| n.chain_id == chain_id)
}

/// Find the index of a network in NETWORKS by chain ID
pub fn find_network_index(chain_id: u64) -> Option<usize> {
    NETWORKS.iter().position(|n| n.chain_id == chain_id)
}

/// Get the block explorer URL for a given chain ID
/// Returns the base URL for transaction/address lookups
pub fn get_block_explorer_url(chain_id: u64) -> Option<&'static str> {
    match chain_id {
        1 => Some("https://etherscan.io"),
        11155111 => Some("https://sepolia.etherscan.io"),
        324 => Some("https://explorer.zksync.io"),
        43113 => Some("https://testnet.snowtrace.io"),
        8453 => Some("https://basescan.org"),
        _ => None,
    }
}

/// Get the full URL to view a transaction on the block explorer
pub fn get_tx_explorer_url(chain_id: u64, tx_hash: &str) -> Option<String> {
    get_block_explorer_url(chain_id).map(|base| format!("{}/tx/{}", base, tx_hash))
}

#[derive(Clone)]
pub struct Config {
    pub rpc_url: String,
    pub chain_id: u64,
    // Overrides for custom networks
    pub native_token_override: Option<String>,
    pub label_override: Option<String>,
}

impl Config {
    pub fn new(rpc_url: String, chain_id: u64) -> Self {
        Self {
            rpc_url,
            chain_id,
            native_token_override: None,
            label_override: None,
        }
    }

    /// Build a config for a built-in network, honoring a per-chain RPC
    /// override from the environment (`TSEND_RPC_<chain_id>`).
    pub fn from_network(network: &EvmNetwork) -> Self {
        let rpc_url = env::var(format!("TSEND_RPC_{}", network.chain_id))
            .unwrap_or_else(|_| network.default_rpc.to_string());
        Self::new(rpc_url, network.chain_id)
    }

    pub fn native_token(&self) -> &str {
        if let Some(ref token) = self.native_token_override {
            token.as_str()
        } else {
            find_network_by_chain_id(self.chain_id)
                .map(|n| n.native_token)
                .unwrap_or("ETH")
        }
    }

    pub fn network_label(&self) -> &str {
        if let Some(ref label) = self.label_override {
            label.as_str()
        } else {
            find_network_by_chain_id(self.chain_id)
                .map(|n| n.label)
                .unwrap_or("Unknown")
        }
    }

    pub async fn get_provider(&self) -> Result<Arc<Provider<Http>>> {
        let url = Url::parse(&self.rpc_url)?;
        let provider = Provider::<Http>::try_from(url.as_str())?;
        Ok(Arc::new(provider))
    }
}

impl Default for Config {
    fn default() -> Self {
        // Default to Sepolia - the GUI switches networks from the selector
        if let Some(sepolia) = find_network_by_chain_id(11155111) {
            Self::from_network(sepolia)
        } else {
            Self::new("https://rpc.sepolia.org".to_string(), 11155111)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // ==================== find_network_by_chain_id tests ====================

    #[test]
    fn test_find_network_by_chain_id_sepolia() {
        let network = find_network_by_chain_id(11155111);
        assert!(network.is_some());
        let network = network.unwrap();
        assert_eq!(network.label, "Sepolia");
        assert_eq!(network.native_token, "ETH");
    }

    #[test]
    fn test_find_network_by_chain_id_fuji() {
        let network = find_network_by_chain_id(43113);
        assert!(network.is_some());
        assert_eq!(network.unwrap().native_token, "AVAX");
    }

    #[test]
    fn test_find_network_by_chain_id_not_found() {
        assert!(find_network_by_chain_id(999999).is_none());
    }

    #[test]
    fn test_find_network_index_anvil_first() {
        assert_eq!(find_network_index(31337), Some(0));
    }

    // ==================== explorer URL tests ====================

    #[test]
    fn test_get_block_explorer_url_known_chains() {
        assert_eq!(
            get_block_explorer_url(11155111),
            Some("https://sepolia.etherscan.io")
        );
        assert_eq!(
            get_block_explorer_url(324),
            Some("https://explorer.zksync.io")
        );
    }

    #[test]
    fn test_get_block_explorer_url_local_chain_has_none() {
        assert!(get_block_explorer_url(31337).is_none());
    }

    #[test]
    fn test_get_tx_explorer_url() {
        let url = get_tx_explorer_url(11155111, "0xabc").unwrap();
        assert_eq!(url, "https://sepolia.etherscan.io/tx/0xabc");
        assert!(get_tx_explorer_url(31337, "0xabc").is_none());
    }

    // ==================== Config tests ====================

    #[test]
    fn test_config_native_token_builtin() {
        let config = Config::new("http://127.0.0.1:8545".to_string(), 31337);
        assert_eq!(config.native_token(), "ETH");
    }

    #[test]
    fn test_config_native_token_override() {
        let mut config = Config::new("https://example.com".to_string(), 999999);
        config.native_token_override = Some("CUSTOM".to_string());
        assert_eq!(config.native_token(), "CUSTOM");
    }

    #[test]
    fn test_config_native_token_unknown_defaults_to_eth() {
        let config = Config::new("https://example.com".to_string(), 999999);
        assert_eq!(config.native_token(), "ETH");
    }

    #[test]
    fn test_config_network_label_builtin() {
        let config = Config::new("https://mainnet.base.org".to_string(), 8453);
        assert_eq!(config.network_label(), "Base");
    }

    #[test]
    fn test_config_network_label_unknown() {
        let config = Config::new("https://example.com".to_string(), 999999);
        assert_eq!(config.network_label(), "Unknown");
    }

    #[test]
    fn test_config_default_is_sepolia() {
        let config = Config::default();
        assert_eq!(config.chain_id, 11155111);
    }
}
