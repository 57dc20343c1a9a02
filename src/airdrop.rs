//! The airdrop pipeline: validate form input, secure the ERC20 approval, and
//! submit the batch transfer to the sender contract as one transaction.
//!
//! Every failure is terminal for the attempt; nothing here retries. The
//! caller re-enables the form when the job settles, success or not.

use crate::config::Config;
use crate::erc20;
use crate::operation_log;
use crate::parse;
use crate::sender;
use crate::types::AirdropReceipt;
use crate::wallet::WalletSession;
use anyhow::{anyhow, Result};
use ethers::prelude::*;
use ethers::providers::{Http, Provider};
use thiserror::Error;
use tokio::sync::mpsc::UnboundedSender;
use tracing::{debug, info, warn};

/// Receipt polling cadence and cap. Batch transfers can take a while to mine.
const RECEIPT_POLL_INTERVAL_MS: u64 = 500;
const RECEIPT_POLL_MAX_ATTEMPTS: u32 = 120;

/// Errors surfaced by the submission pipeline.
#[derive(Debug, Error)]
pub enum AirdropError {
    #[error("{0}")]
    InvalidInput(String),
    #[error("no airdrop sender contract configured for chain {0}")]
    UnsupportedNetwork(u64),
    #[error("rpc error: {0}")]
    Rpc(String),
    #[error("failed to read current allowance: {0}")]
    AllowanceRead(String),
    #[error("approval failed: {0}")]
    Approval(String),
    #[error("transaction failed: {0}")]
    Transaction(String),
}

/// Progress notifications streamed to the UI while a submission runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubmitPhase {
    Validating,
    CheckingAllowance,
    Approving,
    Submitting,
    Confirming { tx_hash: TxHash },
}

impl SubmitPhase {
    pub fn display_text(&self) -> &'static str {
        match self {
            SubmitPhase::Validating => "Validating inputs...",
            SubmitPhase::CheckingAllowance => "Checking allowance...",
            SubmitPhase::Approving => "Approving token, waiting for confirmation...",
            SubmitPhase::Submitting => "Sending airdrop transaction...",
            SubmitPhase::Confirming { .. } => "Waiting for confirmation...",
        }
    }
}

/// Read-only snapshot of the form, taken when the user submits. Decimals come
/// from the token descriptor current at that moment.
#[derive(Debug, Clone)]
pub struct FormSnapshot {
    pub token_address: String,
    pub recipients_raw: String,
    pub amounts_raw: String,
    pub decimals: u8,
}

/// A batch that passed validation and is ready to go on-chain.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidatedBatch {
    pub token: Address,
    pub recipients: Vec<Address>,
    pub amounts: Vec<U256>,
    pub total: U256,
    pub sender_contract: Address,
}

/// Re-derive the recipient and amount lists from raw text and enforce the
/// positional pairing contract. Runs before any chain call; lists that
/// diverge in length are rejected, never re-paired.
pub fn validate(chain_id: u64, snapshot: &FormSnapshot) -> Result<ValidatedBatch, AirdropError> {
    let sender_contract =
        sender::sender_address(chain_id).ok_or(AirdropError::UnsupportedNetwork(chain_id))?;

    let token: Address = snapshot.token_address.trim().parse().map_err(|_| {
        AirdropError::InvalidInput(format!(
            "invalid token address: {}",
            snapshot.token_address.trim()
        ))
    })?;

    let recipients = parse::parse_recipients(&snapshot.recipients_raw)
        .map_err(|e| AirdropError::InvalidInput(format!("recipients: {}", e)))?;
    let amounts = parse::parse_amounts_strict(&snapshot.amounts_raw, snapshot.decimals)
        .map_err(|e| AirdropError::InvalidInput(format!("amounts: {}", e)))?;

    if recipients.is_empty() || amounts.is_empty() || recipients.len() != amounts.len() {
        return Err(AirdropError::InvalidInput(format!(
            "recipient and amount lists must be non-empty and matched ({} recipients, {} amounts)",
            recipients.len(),
            amounts.len()
        )));
    }

    let total =
        parse::total(&amounts).map_err(|e| AirdropError::InvalidInput(e.to_string()))?;

    Ok(ValidatedBatch {
        token,
        recipients,
        amounts,
        total,
        sender_contract,
    })
}

/// Whether the current allowance forces an approval transaction first.
pub fn needs_approval(approved: U256, required: U256) -> bool {
    approved < required
}

/// Run one submission attempt end to end: validate, secure the approval, send
/// the batch transfer, and wait for its receipt.
pub async fn run(
    config: Config,
    session: WalletSession,
    snapshot: FormSnapshot,
    progress: UnboundedSender<SubmitPhase>,
) -> Result<AirdropReceipt, AirdropError> {
    let _ = progress.send(SubmitPhase::Validating);
    let batch = validate(config.chain_id, &snapshot)?;

    info!(
        "Airdrop: token {:?}, {} recipients, total {} base units, sender contract {:?}",
        batch.token,
        batch.recipients.len(),
        batch.total,
        batch.sender_contract
    );

    let provider = config
        .get_provider()
        .await
        .map_err(|e| AirdropError::Rpc(e.to_string()))?;

    let _ = progress.send(SubmitPhase::CheckingAllowance);
    let approved = erc20::allowance(&provider, batch.token, session.address, batch.sender_contract)
        .await
        .map_err(|e| AirdropError::AllowanceRead(e.to_string()))?;
    debug!(
        "Allowance {} for spender {:?}, required {}",
        approved, batch.sender_contract, batch.total
    );

    let approval_tx_hash = if needs_approval(approved, batch.total) {
        let _ = progress.send(SubmitPhase::Approving);
        let tx_hash = approve(&provider, &session, &batch).await?;
        Some(tx_hash)
    } else {
        debug!("Allowance sufficient, skipping approval");
        None
    };

    let _ = progress.send(SubmitPhase::Submitting);
    let calldata = sender::encode_airdrop_call(
        batch.token,
        &batch.recipients,
        &batch.amounts,
        batch.total,
    )
    .map_err(|e| AirdropError::Transaction(e.to_string()))?;
    let tx = TransactionRequest::new()
        .to(batch.sender_contract)
        .from(session.address)
        .data(calldata);
    let pending = session
        .client
        .send_transaction(tx, None)
        .await
        .map_err(|e| AirdropError::Transaction(e.to_string()))?;
    let tx_hash = *pending;
    info!("Airdrop transaction sent: {:?}", tx_hash);

    let _ = progress.send(SubmitPhase::Confirming { tx_hash });
    let receipt = wait_for_receipt(&provider, tx_hash)
        .await
        .map_err(|e| AirdropError::Transaction(e.to_string()))?;
    if receipt.status != Some(1u64.into()) {
        return Err(AirdropError::Transaction(format!(
            "airdrop transaction reverted: {:?}",
            tx_hash
        )));
    }

    let block_number = receipt.block_number.map(|n| n.as_u64());
    let gas_used = receipt.gas_used.map(|g| g.as_u64()).unwrap_or(0);
    info!(
        "Airdrop confirmed! Tx: {:?}, Block: {:?}, Gas: {:?}",
        tx_hash, block_number, gas_used
    );

    log_airdrop(
        &config,
        &batch,
        snapshot.decimals,
        tx_hash,
        approval_tx_hash,
        block_number,
        gas_used,
    );

    Ok(AirdropReceipt {
        tx_hash,
        block_number,
        gas_used,
        approval_tx_hash,
    })
}

/// Send the approval for exactly the batch total and wait for its receipt.
async fn approve(
    provider: &Provider<Http>,
    session: &WalletSession,
    batch: &ValidatedBatch,
) -> Result<TxHash, AirdropError> {
    let calldata = erc20::encode_approve_call(batch.sender_contract, batch.total)
        .map_err(|e| AirdropError::Approval(e.to_string()))?;
    let tx = TransactionRequest::new()
        .to(batch.token)
        .from(session.address)
        .data(calldata);
    let pending = session
        .client
        .send_transaction(tx, None)
        .await
        .map_err(|e| AirdropError::Approval(e.to_string()))?;
    let tx_hash = *pending;
    info!("Approval transaction sent: {:?}", tx_hash);

    let receipt = wait_for_receipt(provider, tx_hash)
        .await
        .map_err(|e| AirdropError::Approval(e.to_string()))?;
    if receipt.status != Some(1u64.into()) {
        return Err(AirdropError::Approval(format!(
            "approval transaction reverted: {:?}",
            tx_hash
        )));
    }
    info!("Approval confirmed in block {:?}", receipt.block_number);

    Ok(tx_hash)
}

/// Lenient gas estimation for the live form: every missing piece or failure
/// yields `None`. Nothing here surfaces an error to the user; the estimate
/// simply becomes unavailable.
pub async fn estimate_gas(
    config: Config,
    from: Option<Address>,
    snapshot: FormSnapshot,
) -> Option<U256> {
    let from = from?;
    let sender_contract = sender::sender_address(config.chain_id)?;
    let token: Address = snapshot.token_address.trim().parse().ok()?;

    let amounts = parse::parse_amounts_lenient(&snapshot.amounts_raw, snapshot.decimals);
    let recipients = parse::parse_recipients(&snapshot.recipients_raw).ok()?;
    if amounts.is_empty() || recipients.is_empty() || amounts.len() != recipients.len() {
        return None;
    }
    let total = parse::total(&amounts).ok()?;

    let provider = config.get_provider().await.ok()?;
    match sender::estimate_airdrop_gas(
        &provider,
        sender_contract,
        from,
        token,
        &recipients,
        &amounts,
        total,
    )
    .await
    {
        Ok(gas) => Some(gas),
        Err(e) => {
            debug!("Gas estimation failed: {}", e);
            None
        }
    }
}

/// Poll for a transaction receipt: fixed interval, bounded attempts.
async fn wait_for_receipt(
    provider: &Provider<Http>,
    tx_hash: TxHash,
) -> Result<TransactionReceipt> {
    let mut attempts = 0;
    loop {
        if let Ok(Some(receipt)) = provider.get_transaction_receipt(tx_hash).await {
            return Ok(receipt);
        }
        attempts += 1;
        if attempts >= RECEIPT_POLL_MAX_ATTEMPTS {
            return Err(anyhow!(
                "timeout waiting for transaction receipt {:?}",
                tx_hash
            ));
        }
        tokio::time::sleep(std::time::Duration::from_millis(RECEIPT_POLL_INTERVAL_MS)).await;
    }
}

/// Append a structured record of the confirmed airdrop to the operation log.
fn log_airdrop(
    config: &Config,
    batch: &ValidatedBatch,
    decimals: u8,
    tx_hash: TxHash,
    approval_tx_hash: Option<TxHash>,
    block_number: Option<u64>,
    gas_used: u64,
) {
    let distribution_lines = batch
        .recipients
        .iter()
        .zip(batch.amounts.iter())
        .enumerate()
        .map(|(i, (address, amount))| {
            let human = ethers::utils::format_units(*amount, decimals as u32)
                .unwrap_or_else(|_| amount.to_string());
            format!("{}. {:?} -> {}", i + 1, address, human)
        })
        .collect::<Vec<_>>()
        .join("\n");

    let approval_info = match approval_tx_hash {
        Some(hash) => format!("\nApproval tx: {:?}", hash),
        None => String::new(),
    };

    let details = format!(
        "Airdrop executed\nToken: {:?}\nSender contract: {:?}\nRecipients: {}\n{}\nTotal: {} base units{}\nTx hash: {:?}\nBlock: {:?}\nGas used: {:?}",
        batch.token,
        batch.sender_contract,
        batch.recipients.len(),
        distribution_lines,
        batch.total,
        approval_info,
        tx_hash,
        block_number,
        gas_used
    );

    if let Err(e) = operation_log::append_log("ERC20 Airdrop", config.chain_id, details) {
        warn!("Failed to write operation log: {}", e);
    }
}
