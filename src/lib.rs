//! Sui Profiles Library
//!
//! Transaction builders and chain access for the `profiles` Move package.

pub mod cli;
pub mod client;
pub mod config;
pub mod error;
pub mod sui;
pub mod transaction;
pub mod wallet;

// Re-export commonly used types
pub use config::Config;
pub use error::{Error, Result};
