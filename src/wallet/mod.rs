//! Wallet discovery and connection
//!
//! Provides the wallet side of the client:
//! - Registry of known wallets (wallets.json)
//! - Selection of the wallet to connect
//! - Connect and sign-and-execute through the wallet bridge
//!
//! # Architecture
//!
//! ```text
//! WalletRegistry → select_wallet → HttpWalletProvider → wallet bridge
//!                                        ↑
//!                                 TransactionBlock
//! ```

pub mod provider;
pub mod registry;
pub mod types;

pub use provider::{HttpWalletProvider, WalletProvider};
pub use registry::{select_wallet, WalletSelection};
pub use types::{ExecutionResult, WalletAccount, WalletEntry, WalletRegistry};
