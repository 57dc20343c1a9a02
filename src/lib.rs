//! Tsend - batch ERC20 airdrop utility.
//!
//! The pipeline modules (`parse`, `erc20`, `sender`, `airdrop`) are
//! UI-independent; the `gui` module renders the airdrop form on top of them.

pub mod airdrop;
pub mod config;
pub mod draft;
pub mod erc20;
pub mod estimate;
pub mod gui;
pub mod import;
pub mod operation_log;
pub mod parse;
pub mod sender;
pub mod types;
pub mod wallet;
