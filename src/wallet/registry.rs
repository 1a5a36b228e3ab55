//! Wallet registry and selection
//!
//! Loads the wallet registry from wallets.json and picks the wallet to
//! connect. A missing file is an empty registry, which selects nothing.

use std::fmt;
use std::path::Path;

use tracing::{debug, info, warn};

use crate::error::{Error, Result};

use super::types::{WalletEntry, WalletRegistry};

/// Outcome of looking up a wallet in the registry
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum WalletSelection<'a> {
    /// A matching wallet is available to connect
    Detected(&'a WalletEntry),
    /// Nothing matched (or the registry is empty)
    NoWalletDetected,
}

impl<'a> WalletSelection<'a> {
    pub fn wallet(&self) -> Option<&'a WalletEntry> {
        match self {
            WalletSelection::Detected(entry) => Some(entry),
            WalletSelection::NoWalletDetected => None,
        }
    }

    pub fn is_detected(&self) -> bool {
        matches!(self, WalletSelection::Detected(_))
    }

    /// Text for the connect prompt: "Connect Sui Wallet" / "No wallet detected"
    pub fn label(&self) -> String {
        match self {
            WalletSelection::Detected(entry) => format!("Connect {}", entry.name),
            WalletSelection::NoWalletDetected => "No wallet detected".to_string(),
        }
    }
}

impl fmt::Display for WalletSelection<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.label())
    }
}

/// Pick the first wallet whose name contains `pattern`
pub fn select_wallet<'a>(registry: &'a WalletRegistry, pattern: &str) -> WalletSelection<'a> {
    match registry.wallets.iter().find(|w| w.name.contains(pattern)) {
        Some(entry) => {
            debug!("Selected wallet {} ({})", entry.name, entry.endpoint);
            WalletSelection::Detected(entry)
        }
        None => {
            debug!(
                "No wallet matching '{}' among {} entries",
                pattern,
                registry.wallets.len()
            );
            WalletSelection::NoWalletDetected
        }
    }
}

impl WalletRegistry {
    /// Load registry from a wallets.json path
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            warn!("{} not found, using empty wallet registry", path.display());
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(path)
            .map_err(|e| Error::WalletRegistry(format!("Failed to read {}: {}", path.display(), e)))?;

        let registry: WalletRegistry = serde_json::from_str(&content)
            .map_err(|e| Error::WalletRegistry(format!("Failed to parse {}: {}", path.display(), e)))?;

        info!("Loaded {} wallet entries", registry.wallets.len());
        Ok(registry)
    }

    /// Save registry to a wallets.json path
    pub fn save(&self, path: &Path) -> Result<()> {
        let json = serde_json::to_string_pretty(self)
            .map_err(|e| Error::WalletRegistry(format!("Failed to serialize registry: {}", e)))?;

        std::fs::write(path, json)
            .map_err(|e| Error::WalletRegistry(format!("Failed to write {}: {}", path.display(), e)))?;

        info!("Saved wallet registry");
        Ok(())
    }

    /// Get wallet entry by exact name
    pub fn get(&self, name: &str) -> Option<&WalletEntry> {
        self.wallets.iter().find(|w| w.name == name)
    }

    /// Add a new wallet to the registry
    pub fn add(&mut self, entry: WalletEntry) -> Result<()> {
        if self.get(&entry.name).is_some() {
            return Err(Error::WalletRegistry(format!(
                "Wallet already exists: {}",
                entry.name
            )));
        }

        url::Url::parse(&entry.endpoint).map_err(|e| {
            Error::WalletRegistry(format!("Invalid endpoint for {}: {}", entry.name, e))
        })?;

        self.wallets.push(entry);
        Ok(())
    }

    /// Remove a wallet from the registry
    pub fn remove(&mut self, name: &str) -> Result<WalletEntry> {
        let idx = self
            .wallets
            .iter()
            .position(|w| w.name == name)
            .ok_or_else(|| Error::WalletNotFound(name.to_string()))?;

        Ok(self.wallets.remove(idx))
    }

    pub fn is_empty(&self) -> bool {
        self.wallets.is_empty()
    }
}
