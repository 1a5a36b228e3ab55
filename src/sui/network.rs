//! Sui network selection

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Public Sui networks with a known fullnode
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Network {
    Mainnet,
    #[default]
    Testnet,
    Devnet,
    Localnet,
}

impl Network {
    /// Public fullnode JSON-RPC URL for this network
    pub fn fullnode_url(&self) -> &'static str {
        match self {
            Network::Mainnet => "https://fullnode.mainnet.sui.io:443",
            Network::Testnet => "https://fullnode.testnet.sui.io:443",
            Network::Devnet => "https://fullnode.devnet.sui.io:443",
            Network::Localnet => "http://127.0.0.1:9000",
        }
    }

    /// Wallet-standard chain identifier (`sui:<network>`)
    pub fn chain_id(&self) -> String {
        format!("sui:{}", self)
    }
}

impl fmt::Display for Network {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Network::Mainnet => write!(f, "mainnet"),
            Network::Testnet => write!(f, "testnet"),
            Network::Devnet => write!(f, "devnet"),
            Network::Localnet => write!(f, "localnet"),
        }
    }
}

impl FromStr for Network {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "mainnet" => Ok(Network::Mainnet),
            "testnet" => Ok(Network::Testnet),
            "devnet" => Ok(Network::Devnet),
            "localnet" | "local" => Ok(Network::Localnet),
            other => Err(Error::InvalidNetwork(other.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_network() {
        assert_eq!("mainnet".parse::<Network>().unwrap(), Network::Mainnet);
        assert_eq!(" TestNet ".parse::<Network>().unwrap(), Network::Testnet);
        assert_eq!("local".parse::<Network>().unwrap(), Network::Localnet);
        assert!("moonnet".parse::<Network>().is_err());
    }

    #[test]
    fn test_default_is_testnet() {
        assert_eq!(Network::default(), Network::Testnet);
        assert_eq!(
            Network::default().fullnode_url(),
            "https://fullnode.testnet.sui.io:443"
        );
    }

    #[test]
    fn test_chain_id() {
        assert_eq!(Network::Devnet.chain_id(), "sui:devnet");
    }
}
