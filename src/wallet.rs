//! Wallet session built from a locally held private key.
//!
//! The key is read from the `AIRDROP_PRIVATE_KEY` environment variable
//! (loaded from `.env` at startup). Without a key the form runs read-only.

use crate::config::Config;
use anyhow::{Context, Result};
use ethers::middleware::SignerMiddleware;
use ethers::prelude::*;
use ethers::signers::{LocalWallet, Signer};
use std::sync::Arc;

pub const PRIVATE_KEY_ENV: &str = "AIRDROP_PRIVATE_KEY";

/// A connected signing session for one network.
#[derive(Clone)]
pub struct WalletSession {
    pub address: Address,
    pub client: Arc<SignerMiddleware<Provider<Http>, LocalWallet>>,
}

impl std::fmt::Debug for WalletSession {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WalletSession")
            .field("address", &self.address)
            .finish()
    }
}

/// Connect a signing session for the configured network, or `Ok(None)` when
/// no key is present in the environment.
pub async fn connect(config: &Config) -> Result<Option<WalletSession>> {
    let raw_key = match std::env::var(PRIVATE_KEY_ENV) {
        Ok(value) => value,
        Err(_) => return Ok(None),
    };

    let signer: LocalWallet = raw_key
        .trim()
        .trim_start_matches("0x")
        .parse()
        .context("AIRDROP_PRIVATE_KEY is not a valid private key")?;
    let signer = signer.with_chain_id(config.chain_id);
    let address = signer.address();

    let provider = config.get_provider().await?;
    let client = Arc::new(SignerMiddleware::new(provider.as_ref().clone(), signer));

    Ok(Some(WalletSession { address, client }))
}
