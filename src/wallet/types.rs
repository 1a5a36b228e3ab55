//! Core types for wallet discovery
//!
//! Defines registry entries, connected accounts and execution results.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::sui::address::SuiAddress;

/// Wallet-standard feature: connect and expose accounts
pub const FEATURE_CONNECT: &str = "standard:connect";

/// Wallet-standard feature: sign and execute a transaction
pub const FEATURE_SIGN_AND_EXECUTE: &str = "sui:signAndExecuteTransaction";

/// Wallet entry from wallets.json registry
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WalletEntry {
    /// Display name reported by the wallet: "Sui Wallet"
    pub name: String,

    /// Base URL of the wallet bridge
    pub endpoint: String,

    /// Chains the wallet serves ("sui:testnet"); empty means any
    #[serde(default)]
    pub chains: Vec<String>,

    /// Supported wallet-standard features; empty means all
    #[serde(default)]
    pub features: Vec<String>,

    /// When the wallet was registered
    pub added_at: DateTime<Utc>,

    /// User notes about this wallet
    #[serde(default)]
    pub notes: String,
}

impl WalletEntry {
    pub fn new(name: impl Into<String>, endpoint: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            endpoint: endpoint.into(),
            chains: Vec::new(),
            features: Vec::new(),
            added_at: Utc::now(),
            notes: String::new(),
        }
    }

    /// Check if this wallet serves the given chain
    pub fn supports_chain(&self, chain: &str) -> bool {
        self.chains.is_empty() || self.chains.iter().any(|c| c == chain)
    }

    /// Check if this wallet advertises a feature
    pub fn supports_feature(&self, feature: &str) -> bool {
        self.features.is_empty() || self.features.iter().any(|f| f == feature)
    }
}

/// Wallet registry file structure
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WalletRegistry {
    /// Registry format version
    #[serde(default = "default_version")]
    pub version: String,

    /// Wallet entries, in discovery order
    #[serde(default)]
    pub wallets: Vec<WalletEntry>,
}

fn default_version() -> String {
    "1.0".to_string()
}

impl Default for WalletRegistry {
    fn default() -> Self {
        Self {
            version: default_version(),
            wallets: Vec::new(),
        }
    }
}

/// Account exposed by a connected wallet
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WalletAccount {
    pub address: SuiAddress,
    #[serde(default)]
    pub public_key: Option<String>,
    #[serde(default)]
    pub chains: Vec<String>,
    #[serde(default)]
    pub label: Option<String>,
}

/// Result of a wallet sign-and-execute request
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExecutionResult {
    /// Transaction digest
    pub digest: String,
    /// Base64 BCS effects, when the wallet returns them
    #[serde(default)]
    pub effects: Option<String>,
}
