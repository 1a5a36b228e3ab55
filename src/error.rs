//! Error types for the profile client

use thiserror::Error;

/// Result type alias using our custom Error
pub type Result<T> = std::result::Result<T, Error>;

/// Main error type for the profile client
#[derive(Error, Debug)]
pub enum Error {
    // Configuration errors
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Missing environment variable: {0}")]
    MissingEnvVar(String),

    #[error("Unknown network: {0} (expected mainnet, testnet, devnet or localnet)")]
    InvalidNetwork(String),

    // Address / encoding errors
    #[error("Invalid Sui address: {0}")]
    InvalidAddress(String),

    #[error("Transaction build failed: {0}")]
    TransactionBuild(String),

    // RPC errors
    #[error("RPC error: {0}")]
    Rpc(String),

    #[error("RPC timeout after {0}ms")]
    RpcTimeout(u64),

    #[error("RPC connection failed: {0}")]
    RpcConnection(String),

    #[error("RPC returned error {code}: {message}")]
    RpcResponse { code: i64, message: String },

    #[error("Object not found: {0}")]
    ObjectNotFound(String),

    // Wallet errors
    #[error("Wallet not found: {0}")]
    WalletNotFound(String),

    #[error("Wallet connection failed: {0}")]
    WalletConnection(String),

    #[error("Wallet rejected request: {0}")]
    WalletRejected(String),

    #[error("Wallet registry error: {0}")]
    WalletRegistry(String),

    // Serialization errors
    #[error("Serialization error: {0}")]
    Serialization(String),

    #[error("Deserialization error: {0}")]
    Deserialization(String),
}

impl Error {
    /// Check if this error is retryable (transient)
    pub fn is_retryable(&self) -> bool {
        match self {
            Error::Rpc(_) | Error::RpcTimeout(_) | Error::RpcConnection(_) => true,
            // -32603 is the JSON-RPC "internal error" a busy fullnode answers with
            Error::RpcResponse { code, .. } => *code == -32603,
            _ => false,
        }
    }
}

// Conversion from reqwest errors
impl From<reqwest::Error> for Error {
    fn from(e: reqwest::Error) -> Self {
        if e.is_connect() {
            Error::RpcConnection(e.to_string())
        } else if e.is_decode() {
            Error::Deserialization(e.to_string())
        } else {
            Error::Rpc(e.to_string())
        }
    }
}

// Conversion from serde_json errors
impl From<serde_json::Error> for Error {
    fn from(e: serde_json::Error) -> Self {
        Error::Serialization(e.to_string())
    }
}
