//! Fullnode access
//!
//! One [`SuiClient`] is built from config and shared by every query.

pub mod rpc;
pub mod types;

pub use rpc::{RpcSettings, SuiClient};
pub use types::{DynamicFieldInfo, Page, SuiObjectData, SuiObjectResponse, TransactionBlockResponse};
