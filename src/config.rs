//! Configuration loading and validation

use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::Path;

use crate::error::Error;
use crate::sui::{Network, SuiAddress};

/// Main configuration structure
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub network: NetworkConfig,
    #[serde(default)]
    pub contract: ContractConfig,
    #[serde(default)]
    pub wallet: WalletConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct NetworkConfig {
    /// mainnet, testnet, devnet or localnet
    #[serde(default = "default_network")]
    pub name: String,
    /// Overrides the public fullnode for the selected network
    #[serde(default = "default_rpc_url")]
    pub rpc_url: Option<String>,
    #[serde(default = "default_timeout_ms")]
    pub timeout_ms: u64,
    #[serde(default = "default_max_retries")]
    pub max_retries: u32,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ContractConfig {
    /// Published package id. Required.
    #[serde(default = "default_package_id")]
    pub package_id: String,
    /// Shared handle registry
    #[serde(default = "default_registry_id")]
    pub registry_id: Option<String>,
    #[serde(default)]
    pub registry_version: Option<u64>,
    /// Shared events object
    #[serde(default = "default_events_id")]
    pub events_id: Option<String>,
    #[serde(default)]
    pub events_version: Option<u64>,
    /// Gas budget set on built transactions (wallet estimates when unset)
    #[serde(default)]
    pub gas_budget: Option<u64>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct WalletConfig {
    /// Path to wallets.json
    #[serde(default = "default_wallet_registry")]
    pub registry_path: String,
    /// Wallet name fragment to select
    #[serde(default = "default_preferred_wallet")]
    pub preferred: String,
    #[serde(default = "default_wallet_timeout_ms")]
    pub request_timeout_ms: u64,
}

impl Default for NetworkConfig {
    fn default() -> Self {
        Self {
            name: default_network(),
            rpc_url: default_rpc_url(),
            timeout_ms: default_timeout_ms(),
            max_retries: default_max_retries(),
        }
    }
}

impl Default for ContractConfig {
    fn default() -> Self {
        Self {
            package_id: default_package_id(),
            registry_id: default_registry_id(),
            registry_version: None,
            events_id: default_events_id(),
            events_version: None,
            gas_budget: None,
        }
    }
}

impl Default for WalletConfig {
    fn default() -> Self {
        Self {
            registry_path: default_wallet_registry(),
            preferred: default_preferred_wallet(),
            request_timeout_ms: default_wallet_timeout_ms(),
        }
    }
}

// Default value functions
fn default_network() -> String {
    std::env::var("SUI_NETWORK").unwrap_or_else(|_| Network::default().to_string())
}

fn default_rpc_url() -> Option<String> {
    std::env::var("SUI_RPC_URL").ok()
}

fn default_timeout_ms() -> u64 {
    30000
}

fn default_max_retries() -> u32 {
    3
}

fn default_package_id() -> String {
    std::env::var("PACKAGE_ID").unwrap_or_default()
}

fn default_registry_id() -> Option<String> {
    std::env::var("REGISTRY_ID").ok()
}

fn default_events_id() -> Option<String> {
    std::env::var("EVENTS_ID").ok()
}

fn default_wallet_registry() -> String {
    "wallets.json".to_string()
}

fn default_preferred_wallet() -> String {
    "Sui Wallet".to_string()
}

fn default_wallet_timeout_ms() -> u64 {
    120000
}

impl Config {
    /// Load configuration from file and environment variables
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();

        let settings = config::Config::builder()
            // Load from file if exists
            .add_source(config::File::from(path).required(false))
            // Override with environment variables (prefix PROFILES)
            .add_source(
                config::Environment::with_prefix("PROFILES")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()
            .context("Failed to build configuration")?;

        let config: Config = settings
            .try_deserialize()
            .context("Failed to deserialize configuration")?;

        // Validate configuration
        config.validate()?;

        Ok(config)
    }

    /// Validate configuration values
    fn validate(&self) -> Result<()> {
        if self.contract.package_id.trim().is_empty() {
            return Err(Error::MissingEnvVar(
                "PACKAGE_ID (or contract.package_id in the config file)".to_string(),
            )
            .into());
        }

        SuiAddress::parse(&self.contract.package_id).context("Invalid contract.package_id")?;

        if let Some(id) = &self.contract.registry_id {
            SuiAddress::parse(id).context("Invalid contract.registry_id")?;
        }

        if let Some(id) = &self.contract.events_id {
            SuiAddress::parse(id).context("Invalid contract.events_id")?;
        }

        self.network
            .name
            .parse::<Network>()
            .context("Invalid network.name")?;

        if let Some(rpc_url) = &self.network.rpc_url {
            url::Url::parse(rpc_url)
                .with_context(|| format!("Invalid network.rpc_url: {}", rpc_url))?;
        }

        if self.network.timeout_ms == 0 {
            anyhow::bail!("network.timeout_ms must be positive");
        }

        if self.wallet.request_timeout_ms == 0 {
            anyhow::bail!("wallet.request_timeout_ms must be positive");
        }

        if self.wallet.preferred.trim().is_empty() {
            anyhow::bail!("wallet.preferred cannot be empty");
        }

        if self.contract.gas_budget == Some(0) {
            tracing::warn!("contract.gas_budget is 0, transactions will be rejected by the network");
        }

        Ok(())
    }

    /// Selected network
    pub fn network(&self) -> Network {
        self.network.name.parse().unwrap_or_default()
    }

    /// Fullnode URL (override or the network's public fullnode)
    pub fn rpc_url(&self) -> String {
        self.network
            .rpc_url
            .clone()
            .unwrap_or_else(|| self.network().fullnode_url().to_string())
    }

    /// Package id as an address
    pub fn package_id(&self) -> crate::Result<SuiAddress> {
        SuiAddress::parse(&self.contract.package_id)
    }

    /// Registry id, required by create/delete
    pub fn registry_id(&self) -> crate::Result<&str> {
        self.contract
            .registry_id
            .as_deref()
            .ok_or_else(|| Error::Config("contract.registry_id is not set (REGISTRY_ID)".to_string()))
    }

    /// Events id, required by create/update/delete/verify
    pub fn events_id(&self) -> crate::Result<&str> {
        self.contract
            .events_id
            .as_deref()
            .ok_or_else(|| Error::Config("contract.events_id is not set (EVENTS_ID)".to_string()))
    }

    /// Get masked configuration for display (hide secrets)
    pub fn masked_display(&self) -> String {
        format!(
            r#"Configuration:
  Network:
    name: {}
    rpc_url: {}
    timeout: {}ms
    max_retries: {}
  Contract:
    package_id: {}
    registry: {} (version: {})
    events: {} (version: {})
    gas_budget: {}
  Wallet:
    registry: {}
    preferred: {}
"#,
            self.network(),
            mask_url(&self.rpc_url()),
            self.network.timeout_ms,
            self.network.max_retries,
            self.contract.package_id,
            display_opt(&self.contract.registry_id),
            display_opt(&self.contract.registry_version),
            display_opt(&self.contract.events_id),
            display_opt(&self.contract.events_version),
            display_opt(&self.contract.gas_budget),
            self.wallet.registry_path,
            self.wallet.preferred,
        )
    }
}

fn display_opt<T: std::fmt::Display>(value: &Option<T>) -> String {
    value
        .as_ref()
        .map(|v| v.to_string())
        .unwrap_or_else(|| "(not set)".to_string())
}

/// Mask URL for display (hide API keys in query params)
pub fn mask_url(url: &str) -> String {
    if let Some(idx) = url.find('?') {
        format!("{}?***", &url[..idx])
    } else {
        url.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn sample() -> Config {
        Config {
            network: NetworkConfig {
                name: "devnet".to_string(),
                rpc_url: None,
                timeout_ms: 1000,
                max_retries: 1,
            },
            contract: ContractConfig {
                package_id: "0x5c1e".to_string(),
                registry_id: Some("0xa1".to_string()),
                registry_version: Some(3),
                events_id: None,
                events_version: None,
                gas_budget: None,
            },
            wallet: WalletConfig {
                registry_path: "wallets.json".to_string(),
                preferred: "Sui Wallet".to_string(),
                request_timeout_ms: 1000,
            },
        }
    }

    #[test]
    fn test_valid_config() {
        let config = sample();
        assert!(config.validate().is_ok());
        assert_eq!(config.network(), Network::Devnet);
        assert_eq!(config.rpc_url(), "https://fullnode.devnet.sui.io:443");
        assert!(config.registry_id().is_ok());
        assert!(config.events_id().is_err());
    }

    #[test]
    fn test_missing_package_id_fails() {
        let mut config = sample();
        config.contract.package_id = String::new();
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("PACKAGE_ID"));
    }

    #[test]
    fn test_invalid_values_fail() {
        let mut config = sample();
        config.contract.package_id = "0xnothex".to_string();
        assert!(config.validate().is_err());

        let mut config = sample();
        config.network.name = "moonnet".to_string();
        assert!(config.validate().is_err());

        let mut config = sample();
        config.network.rpc_url = Some("not a url".to_string());
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_rpc_override() {
        let mut config = sample();
        config.network.rpc_url = Some("http://127.0.0.1:9000".to_string());
        assert_eq!(config.rpc_url(), "http://127.0.0.1:9000");
    }

    #[test]
    fn test_load_from_file() {
        let mut file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
        writeln!(
            file,
            r#"
[network]
name = "localnet"
timeout_ms = 5000

[contract]
package_id = "0xbeef"
events_id = "0xe1"
events_version = 7
"#
        )
        .unwrap();

        let config = Config::load(file.path()).unwrap();
        assert_eq!(config.network(), Network::Localnet);
        assert_eq!(config.network.timeout_ms, 5000);
        assert_eq!(config.contract.events_version, Some(7));
        assert_eq!(
            config.package_id().unwrap(),
            SuiAddress::parse("0xbeef").unwrap()
        );
    }

    #[test]
    fn test_mask_url() {
        assert_eq!(
            mask_url("https://rpc.example.com?key=secret"),
            "https://rpc.example.com?***"
        );
        assert_eq!(mask_url("https://rpc.example.com"), "https://rpc.example.com");
    }
}
