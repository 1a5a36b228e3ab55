//! Sui primitives used by the profile client
//!
//! Addresses, networks, pure argument encoding and the fixed
//! `profiles` contract surface.

pub mod address;
pub mod network;
pub mod program;
pub mod pure;

// Re-export commonly used types
pub use address::{normalize_address, SuiAddress};
pub use network::Network;
pub use program::{EntryPoint, Targets, MODULE};
pub use pure::PureValue;
