//! Draft persistence for the airdrop form.
//!
//! The three raw text fields survive restarts: written on every edit, read
//! once at startup, never expired.

use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;

const DRAFT_FILE: &str = "airdrop_draft.json";

/// Raw form text as last typed, not validated.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct Draft {
    #[serde(default)]
    pub token_address: String,
    #[serde(default)]
    pub recipients: String,
    #[serde(default)]
    pub amounts: String,
}

/// Get the directory where app data is stored (same as the operation log)
fn app_data_dir() -> PathBuf {
    if let Some(config_dir) = dirs::config_dir() {
        let app_dir = config_dir.join("tsend");
        if !app_dir.exists() {
            let _ = fs::create_dir_all(&app_dir);
        }
        app_dir
    } else {
        // Fall back to current directory
        PathBuf::from(".")
    }
}

fn draft_path() -> PathBuf {
    app_data_dir().join(DRAFT_FILE)
}

impl Draft {
    /// Read the saved draft; a missing or unreadable file yields empty fields.
    pub fn load() -> Self {
        match fs::read_to_string(draft_path()) {
            Ok(contents) => serde_json::from_str(&contents).unwrap_or_default(),
            Err(_) => Self::default(),
        }
    }

    /// Persist the current field contents. Called on every edit.
    pub fn save(&self) -> Result<()> {
        let contents = serde_json::to_string_pretty(self)?;
        fs::write(draft_path(), contents)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_draft_round_trips_through_json() {
        let draft = Draft {
            token_address: "0x70997970C51812dc3A010C7d01b50e0d17dc79C8".to_string(),
            recipients: "0xaaa,0xbbb".to_string(),
            amounts: "100\n200".to_string(),
        };
        let json = serde_json::to_string(&draft).unwrap();
        let restored: Draft = serde_json::from_str(&json).unwrap();
        assert_eq!(draft, restored);
    }

    #[test]
    fn test_draft_missing_keys_default_to_empty() {
        let draft: Draft = serde_json::from_str("{}").unwrap();
        assert_eq!(draft, Draft::default());
    }
}
