//! Raw-ABI ERC20 calls: metadata reads, allowance, and approval.
//!
//! Function objects are hand-built rather than generated; the form only
//! touches five entry points of the standard.

use crate::types::TokenDescriptor;
use anyhow::{anyhow, Result};
use ethers::abi::{Function, Param, ParamType, StateMutability, Token};
use ethers::prelude::*;
use ethers::providers::{Http, Provider};
use tracing::warn;

#[allow(deprecated)]
fn view_function(name: &str, inputs: Vec<(&str, ParamType)>, output: ParamType) -> Function {
    Function {
        name: name.to_string(),
        inputs: inputs
            .into_iter()
            .map(|(param_name, kind)| Param {
                name: param_name.to_string(),
                kind,
                internal_type: None,
            })
            .collect(),
        outputs: vec![Param {
            name: String::new(),
            kind: output,
            internal_type: None,
        }],
        constant: None,
        state_mutability: StateMutability::View,
    }
}

/// ABI definition of approve(address spender, uint256 amount) -> bool
#[allow(deprecated)]
fn approve_function() -> Function {
    Function {
        name: "approve".to_string(),
        inputs: vec![
            Param {
                name: "spender".to_string(),
                kind: ParamType::Address,
                internal_type: None,
            },
            Param {
                name: "amount".to_string(),
                kind: ParamType::Uint(256),
                internal_type: None,
            },
        ],
        outputs: vec![Param {
            name: String::new(),
            kind: ParamType::Bool,
            internal_type: None,
        }],
        constant: None,
        state_mutability: StateMutability::NonPayable,
    }
}

/// Execute a read-only contract call and decode its output.
async fn call(
    provider: &Provider<Http>,
    to: Address,
    func: &Function,
    args: &[Token],
) -> Result<Vec<Token>> {
    let calldata = func.encode_input(args)?;
    let tx = TransactionRequest::new().to(to).data(calldata);
    let output = provider.call(&tx.into(), None).await?;
    Ok(func.decode_output(output.as_ref())?)
}

/// Fetch name/symbol/decimals for a token. Three independent reads; any
/// failure collapses the descriptor to the Unknown Token defaults.
pub async fn fetch_token_descriptor(provider: &Provider<Http>, token: Address) -> TokenDescriptor {
    match try_fetch_descriptor(provider, token).await {
        Ok(descriptor) => descriptor,
        Err(e) => {
            warn!("Failed to fetch token metadata for {:?}: {}", token, e);
            TokenDescriptor::unknown(token)
        }
    }
}

async fn try_fetch_descriptor(
    provider: &Provider<Http>,
    token: Address,
) -> Result<TokenDescriptor> {
    let name_func = view_function("name", vec![], ParamType::String);
    let name = match call(provider, token, &name_func, &[]).await?.into_iter().next() {
        Some(Token::String(value)) => value,
        other => return Err(anyhow!("unexpected name() return: {:?}", other)),
    };

    let symbol_func = view_function("symbol", vec![], ParamType::String);
    let symbol = match call(provider, token, &symbol_func, &[]).await?.into_iter().next() {
        Some(Token::String(value)) => value,
        other => return Err(anyhow!("unexpected symbol() return: {:?}", other)),
    };

    let decimals_func = view_function("decimals", vec![], ParamType::Uint(8));
    let decimals = match call(provider, token, &decimals_func, &[]).await?.into_iter().next() {
        Some(Token::Uint(value)) => value.low_u32() as u8,
        other => return Err(anyhow!("unexpected decimals() return: {:?}", other)),
    };

    Ok(TokenDescriptor {
        address: token,
        name,
        symbol,
        decimals,
    })
}

/// Read the quantity `owner` has authorized `spender` to transfer.
pub async fn allowance(
    provider: &Provider<Http>,
    token: Address,
    owner: Address,
    spender: Address,
) -> Result<U256> {
    let func = view_function(
        "allowance",
        vec![
            ("owner", ParamType::Address),
            ("spender", ParamType::Address),
        ],
        ParamType::Uint(256),
    );
    let output = call(
        provider,
        token,
        &func,
        &[Token::Address(owner), Token::Address(spender)],
    )
    .await?;

    match output.into_iter().next() {
        Some(Token::Uint(value)) => Ok(value),
        other => Err(anyhow!("unexpected allowance() return: {:?}", other)),
    }
}

/// ABI-encode an approve(spender, amount) call.
pub fn encode_approve_call(spender: Address, amount: U256) -> Result<Bytes> {
    let func = approve_function();
    let calldata = func.encode_input(&[Token::Address(spender), Token::Uint(amount)])?;
    Ok(Bytes::from(calldata))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_encode_approve_call_shape() {
        let spender = Address::repeat_byte(0x22);
        let calldata = encode_approve_call(spender, U256::from(1000u64)).unwrap();

        // selector + two words
        assert_eq!(calldata.len(), 4 + 32 * 2);
        assert_eq!(&calldata[..4], approve_function().short_signature());
    }

    #[test]
    fn test_encode_approve_call_embeds_amount() {
        let calldata = encode_approve_call(Address::zero(), U256::from(0x0102u64)).unwrap();
        // Amount is the last word, big-endian.
        assert_eq!(calldata[calldata.len() - 2], 0x01);
        assert_eq!(calldata[calldata.len() - 1], 0x02);
    }

    #[test]
    fn test_view_function_selectors_match_standard() {
        // keccak("decimals()")[..4] = 0x313ce567
        let decimals = view_function("decimals", vec![], ParamType::Uint(8));
        assert_eq!(decimals.short_signature(), [0x31, 0x3c, 0xe5, 0x67]);

        // keccak("allowance(address,address)")[..4] = 0xdd62ed3e
        let allowance_func = view_function(
            "allowance",
            vec![
                ("owner", ParamType::Address),
                ("spender", ParamType::Address),
            ],
            ParamType::Uint(256),
        );
        assert_eq!(allowance_func.short_signature(), [0xdd, 0x62, 0xed, 0x3e]);
    }

    #[test]
    fn test_approve_selector_matches_standard() {
        // keccak("approve(address,uint256)")[..4] = 0x095ea7b3
        assert_eq!(
            approve_function().short_signature(),
            [0x09, 0x5e, 0xa7, 0xb3]
        );
    }
}
