//! Fullnode JSON-RPC request and response types

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// JSON-RPC 2.0 request envelope
#[derive(Debug, Clone, Serialize)]
pub struct RpcRequest<'a> {
    pub jsonrpc: &'static str,
    pub id: u64,
    pub method: &'a str,
    pub params: Value,
}

impl<'a> RpcRequest<'a> {
    pub fn new(id: u64, method: &'a str, params: Value) -> Self {
        Self {
            jsonrpc: "2.0",
            id,
            method,
            params,
        }
    }
}

/// JSON-RPC 2.0 response envelope
#[derive(Debug, Clone, Deserialize)]
pub struct RpcResponse<T> {
    #[serde(default)]
    pub id: Option<Value>,
    pub result: Option<T>,
    pub error: Option<RpcErrorObject>,
}

/// JSON-RPC error object
#[derive(Debug, Clone, Deserialize)]
pub struct RpcErrorObject {
    pub code: i64,
    pub message: String,
    #[serde(default)]
    pub data: Option<Value>,
}

/// Which parts of an object the fullnode should return
#[derive(Debug, Clone, Copy, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ObjectDataOptions {
    pub show_type: bool,
    pub show_owner: bool,
    pub show_content: bool,
}

impl ObjectDataOptions {
    /// Content and owner, used for single object lookups
    pub fn content_and_owner() -> Self {
        Self {
            show_type: true,
            show_owner: true,
            show_content: true,
        }
    }

    /// Content only, used for owned object listings
    pub fn content() -> Self {
        Self {
            show_type: true,
            show_owner: false,
            show_content: true,
        }
    }
}

/// Object data returned by `sui_getObject`
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SuiObjectData {
    pub object_id: String,
    pub version: String,
    pub digest: String,
    #[serde(rename = "type", default)]
    pub object_type: Option<String>,
    #[serde(default)]
    pub owner: Option<Value>,
    #[serde(default)]
    pub content: Option<Value>,
}

impl SuiObjectData {
    /// Fields of a Move object, if content was requested
    pub fn fields(&self) -> Option<&Value> {
        self.content.as_ref().and_then(|c| c.get("fields"))
    }

    /// Initial shared version, for shared objects
    pub fn initial_shared_version(&self) -> Option<u64> {
        let shared = self.owner.as_ref()?.get("Shared")?;
        let version = shared.get("initial_shared_version")?;
        version
            .as_u64()
            .or_else(|| version.as_str().and_then(|s| s.parse().ok()))
    }
}

/// Response of `sui_getObject` / entries of owned object pages
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SuiObjectResponse {
    #[serde(default)]
    pub data: Option<SuiObjectData>,
    #[serde(default)]
    pub error: Option<Value>,
}

/// Dynamic field entry from `suix_getDynamicFields`
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DynamicFieldInfo {
    pub name: Value,
    #[serde(default)]
    pub bcs_name: Option<String>,
    #[serde(rename = "type")]
    pub field_type: String,
    pub object_type: String,
    pub object_id: String,
    pub version: Value,
    pub digest: String,
}

/// Paginated result
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Page<T> {
    pub data: Vec<T>,
    #[serde(default)]
    pub next_cursor: Option<Value>,
    #[serde(default)]
    pub has_next_page: bool,
}

/// Response of `sui_executeTransactionBlock`
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransactionBlockResponse {
    pub digest: String,
    #[serde(default)]
    pub effects: Option<Value>,
    #[serde(default)]
    pub errors: Option<Vec<String>>,
}

impl TransactionBlockResponse {
    /// Execution status from effects (`success` / `failure`)
    pub fn status(&self) -> Option<&str> {
        self.effects
            .as_ref()?
            .get("status")?
            .get("status")?
            .as_str()
    }
}
