//! The per-chain airdrop sender contract and its `airdropERC20` call.
//!
//! The sender contract pulls the approved total from the caller and fans it
//! out to every recipient in a single transaction.

use anyhow::Result;
use ethers::abi::{Function, Param, ParamType, StateMutability, Token};
use ethers::prelude::*;
use ethers::providers::{Http, Provider};

/// Deployed airdrop sender contracts, per chain.
/// The Anvil entry is the default first-deploy address of a local node.
const SENDER_CONTRACTS: &[(u64, &str)] = &[
    (31337, "0x5FbDB2315678afecb367f032d93F642f64180aa3"),
    (11155111, "0xa27c5C77DA713f410F9b15d4B0c52CAe597a973a"),
    (324, "0x7e645867722D14b16a33AcE767823c0d6c4fEa21"),
    (43113, "0x2e6EaE270Bd9e2247Cbd5BAfEDA9a5f48cB0fA12"),
];

/// Look up the airdrop sender contract for a chain. `None` means the network
/// is unsupported and no chain call should be made.
pub fn sender_address(chain_id: u64) -> Option<Address> {
    SENDER_CONTRACTS
        .iter()
        .find(|(id, _)| *id == chain_id)
        .map(|(_, addr)| {
            addr.parse()
                .expect("sender contract constant is invalid - this is a programming error")
        })
}

/// ABI definition of airdropERC20(address token, address[] recipients, uint256[] amounts, uint256 total)
#[allow(deprecated)]
fn airdrop_erc20_function() -> Function {
    Function {
        name: "airdropERC20".to_string(),
        inputs: vec![
            Param {
                name: "token".to_string(),
                kind: ParamType::Address,
                internal_type: None,
            },
            Param {
                name: "recipients".to_string(),
                kind: ParamType::Array(Box::new(ParamType::Address)),
                internal_type: None,
            },
            Param {
                name: "amounts".to_string(),
                kind: ParamType::Array(Box::new(ParamType::Uint(256))),
                internal_type: None,
            },
            Param {
                name: "total".to_string(),
                kind: ParamType::Uint(256),
                internal_type: None,
            },
        ],
        outputs: vec![],
        constant: None,
        state_mutability: StateMutability::NonPayable,
    }
}

/// Four-byte selector of the airdropERC20 function.
pub fn airdrop_selector() -> [u8; 4] {
    airdrop_erc20_function().short_signature()
}

/// ABI-encode an airdropERC20 call for the given batch.
pub fn encode_airdrop_call(
    token: Address,
    recipients: &[Address],
    amounts: &[U256],
    total: U256,
) -> Result<Bytes> {
    let func = airdrop_erc20_function();
    let recipient_tokens: Vec<Token> = recipients.iter().map(|a| Token::Address(*a)).collect();
    let amount_tokens: Vec<Token> = amounts.iter().map(|a| Token::Uint(*a)).collect();
    let calldata = func.encode_input(&[
        Token::Address(token),
        Token::Array(recipient_tokens),
        Token::Array(amount_tokens),
        Token::Uint(total),
    ])?;
    Ok(Bytes::from(calldata))
}

/// Ask the node for a gas estimate of the batch call as `from` would send it.
/// A revert during estimation surfaces as an error.
pub async fn estimate_airdrop_gas(
    provider: &Provider<Http>,
    sender_contract: Address,
    from: Address,
    token: Address,
    recipients: &[Address],
    amounts: &[U256],
    total: U256,
) -> Result<U256> {
    let calldata = encode_airdrop_call(token, recipients, amounts, total)?;
    let tx = TransactionRequest::new()
        .to(sender_contract)
        .from(from)
        .data(calldata);
    let gas = provider.estimate_gas(&tx.into(), None).await?;
    Ok(gas)
}

/// Check whether a contract's bytecode carries the airdropERC20 selector.
/// The selector appears in the code as part of the function dispatch.
pub async fn check_sender_compatible(
    provider: &Provider<Http>,
    contract_address: Address,
) -> Result<bool> {
    let code = provider.get_code(contract_address, None).await?;

    if code.is_empty() {
        return Ok(false);
    }

    let selector = airdrop_selector();
    Ok(code.as_ref().windows(4).any(|w| w == selector))
}

#[cfg(test)]
mod tests {
    use super::*;

    // ==================== sender_address tests ====================

    #[test]
    fn test_sender_address_known_chains() {
        assert!(sender_address(31337).is_some());
        assert!(sender_address(11155111).is_some());
        assert!(sender_address(324).is_some());
        assert!(sender_address(43113).is_some());
    }

    #[test]
    fn test_sender_address_unknown_chain() {
        assert!(sender_address(1).is_none());
        assert!(sender_address(999999).is_none());
    }

    #[test]
    fn test_sender_address_anvil_default_deploy() {
        let addr = sender_address(31337).unwrap();
        let expected: Address = "0x5FbDB2315678afecb367f032d93F642f64180aa3"
            .parse()
            .unwrap();
        assert_eq!(addr, expected);
    }

    // ==================== calldata encoding tests ====================

    #[test]
    fn test_encode_airdrop_call_selector_prefix() {
        let token = Address::repeat_byte(0x11);
        let recipients = vec![Address::repeat_byte(0xaa), Address::repeat_byte(0xbb)];
        let amounts = vec![U256::from(1u64), U256::from(2u64)];
        let calldata = encode_airdrop_call(token, &recipients, &amounts, U256::from(3u64)).unwrap();

        assert_eq!(&calldata[..4], airdrop_selector());
    }

    #[test]
    fn test_encode_airdrop_call_length() {
        let token = Address::repeat_byte(0x11);
        let recipients = vec![Address::repeat_byte(0xaa), Address::repeat_byte(0xbb)];
        let amounts = vec![U256::from(1u64), U256::from(2u64)];
        let calldata = encode_airdrop_call(token, &recipients, &amounts, U256::from(3u64)).unwrap();

        // 4 head words (token, recipients offset, amounts offset, total) plus
        // two dynamic arrays of (length word + 2 elements) each.
        assert_eq!(calldata.len(), 4 + 32 * (4 + 3 + 3));
    }

    #[test]
    fn test_encode_airdrop_call_empty_arrays() {
        let calldata =
            encode_airdrop_call(Address::zero(), &[], &[], U256::zero()).unwrap();
        // Head words plus two empty-array length words.
        assert_eq!(calldata.len(), 4 + 32 * 6);
    }

    #[test]
    fn test_airdrop_selector_is_stable() {
        assert_eq!(airdrop_selector(), airdrop_selector());
        assert_ne!(airdrop_selector(), [0u8; 4]);
    }
}
