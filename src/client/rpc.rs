//! Fullnode JSON-RPC client
//!
//! Read calls retry transient failures with exponential backoff.
//! Transaction execution is sent exactly once.

use std::sync::atomic::{AtomicU32, AtomicU64, Ordering};
use std::time::Duration;

use backoff::{future::retry, ExponentialBackoff};
use reqwest::{Client, StatusCode};
use serde::de::DeserializeOwned;
use serde_json::{json, Value};
use tracing::{debug, info, warn};

use crate::config::Config;
use crate::error::{Error, Result};
use crate::sui::address::SuiAddress;

use super::types::{
    DynamicFieldInfo, ObjectDataOptions, Page, RpcRequest, RpcResponse, SuiObjectData,
    SuiObjectResponse, TransactionBlockResponse,
};

/// Upper bound on pages followed by the `get_all_*` helpers
pub const MAX_PAGES: usize = 50;

/// Connection settings for the fullnode client
#[derive(Debug, Clone)]
pub struct RpcSettings {
    pub url: String,
    pub timeout_ms: u64,
    pub max_retries: u32,
}

impl RpcSettings {
    pub fn from_config(config: &Config) -> Self {
        Self {
            url: config.rpc_url(),
            timeout_ms: config.network.timeout_ms,
            max_retries: config.network.max_retries,
        }
    }

    /// Retry pacing; the number of attempts is capped by `max_retries`
    fn backoff(&self) -> ExponentialBackoff {
        let initial = Duration::from_millis(200);
        ExponentialBackoff {
            initial_interval: initial,
            max_interval: initial * 8,
            max_elapsed_time: None,
            ..Default::default()
        }
    }
}

/// Shared client for one fullnode
pub struct SuiClient {
    http: Client,
    settings: RpcSettings,
    next_id: AtomicU64,
}

impl SuiClient {
    pub fn new(settings: RpcSettings) -> Result<Self> {
        let http = Client::builder()
            .timeout(Duration::from_millis(settings.timeout_ms))
            .build()
            .map_err(|e| Error::RpcConnection(format!("Failed to build HTTP client: {}", e)))?;

        info!("Sui client initialized for {}", settings.url);

        Ok(Self {
            http,
            settings,
            next_id: AtomicU64::new(1),
        })
    }

    pub fn from_config(config: &Config) -> Result<Self> {
        Self::new(RpcSettings::from_config(config))
    }

    /// Fetch one object with content and owner
    pub async fn get_object(&self, id: &str) -> Result<SuiObjectData> {
        let id = SuiAddress::parse(id)?;
        let response: SuiObjectResponse = self
            .read(
                "sui_getObject",
                json!([id, ObjectDataOptions::content_and_owner()]),
            )
            .await?;

        match response.data {
            Some(data) => Ok(data),
            None => {
                if let Some(error) = response.error {
                    debug!("getObject {} error: {}", id, error);
                }
                Err(Error::ObjectNotFound(id.to_string()))
            }
        }
    }

    /// Initial shared version of a shared object
    pub async fn shared_version(&self, id: &str) -> Result<u64> {
        let object = self.get_object(id).await?;
        object
            .initial_shared_version()
            .ok_or_else(|| Error::TransactionBuild(format!("{} is not a shared object", id)))
    }

    /// One page of objects owned by `owner` with the given struct type
    pub async fn get_owned_by_type(
        &self,
        owner: &str,
        struct_type: &str,
        cursor: Option<Value>,
    ) -> Result<Page<SuiObjectResponse>> {
        let owner = SuiAddress::parse(owner)?;
        let query = json!({
            "filter": { "StructType": struct_type },
            "options": ObjectDataOptions::content(),
        });

        self.read("suix_getOwnedObjects", json!([owner, query, cursor, Value::Null]))
            .await
    }

    /// All objects owned by `owner` with the given struct type
    pub async fn get_all_owned_by_type(
        &self,
        owner: &str,
        struct_type: &str,
    ) -> Result<Vec<SuiObjectData>> {
        let mut objects = Vec::new();
        let mut cursor = None;

        for _ in 0..MAX_PAGES {
            let page = self.get_owned_by_type(owner, struct_type, cursor).await?;
            objects.extend(page.data.into_iter().filter_map(|entry| entry.data));

            if !page.has_next_page || page.next_cursor.is_none() {
                return Ok(objects);
            }
            cursor = page.next_cursor;
        }

        warn!(
            "Stopped after {} pages of {} objects for {}",
            MAX_PAGES, struct_type, owner
        );
        Ok(objects)
    }

    /// One page of dynamic fields under `parent_id`
    pub async fn get_dynamic_fields(
        &self,
        parent_id: &str,
        cursor: Option<Value>,
    ) -> Result<Page<DynamicFieldInfo>> {
        let parent = SuiAddress::parse(parent_id)?;
        self.read("suix_getDynamicFields", json!([parent, cursor, Value::Null]))
            .await
    }

    /// All dynamic fields under `parent_id`
    pub async fn get_all_dynamic_fields(&self, parent_id: &str) -> Result<Vec<DynamicFieldInfo>> {
        let mut fields = Vec::new();
        let mut cursor = None;

        for _ in 0..MAX_PAGES {
            let page = self.get_dynamic_fields(parent_id, cursor).await?;
            fields.extend(page.data);

            if !page.has_next_page || page.next_cursor.is_none() {
                return Ok(fields);
            }
            cursor = page.next_cursor;
        }

        warn!("Stopped after {} pages of fields for {}", MAX_PAGES, parent_id);
        Ok(fields)
    }

    /// Execute already-signed transaction bytes (base64)
    pub async fn execute_transaction_block(
        &self,
        tx_bytes: &str,
        signatures: &[String],
    ) -> Result<TransactionBlockResponse> {
        let options = json!({ "showEffects": true });
        info!("Executing transaction via {}", self.settings.url);
        self.call(
            "sui_executeTransactionBlock",
            json!([tx_bytes, signatures, options, "WaitForLocalExecution"]),
        )
        .await
    }

    /// Chain identifier, used as a health check
    pub async fn chain_identifier(&self) -> Result<String> {
        self.read("sui_getChainIdentifier", json!([])).await
    }

    /// Read-only call, retried up to `max_retries` times on transient errors
    async fn read<T: DeserializeOwned>(&self, method: &str, params: Value) -> Result<T> {
        let max_retries = self.settings.max_retries;
        let attempts = AtomicU32::new(0);

        let result = retry(self.settings.backoff(), || {
            let attempt = attempts.fetch_add(1, Ordering::Relaxed);
            let params = params.clone();
            async move {
                match self.call(method, params).await {
                    Ok(value) => Ok(value),
                    Err(e) if e.is_retryable() && attempt < max_retries => {
                        warn!(
                            "Retryable RPC error on {} (attempt {}/{}): {}",
                            method,
                            attempt + 1,
                            max_retries + 1,
                            e
                        );
                        Err(backoff::Error::transient(e))
                    }
                    Err(e) => Err(backoff::Error::permanent(e)),
                }
            }
        })
        .await?;

        Ok(result)
    }

    /// Single JSON-RPC call
    async fn call<T: DeserializeOwned>(&self, method: &str, params: Value) -> Result<T> {
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        let request = RpcRequest::new(id, method, params);
        debug!("RPC {} #{}", method, id);

        let response = self
            .http
            .post(&self.settings.url)
            .json(&request)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    Error::RpcTimeout(self.settings.timeout_ms)
                } else {
                    Error::from(e)
                }
            })?;

        let status = response.status();
        if status.is_server_error() || status == StatusCode::TOO_MANY_REQUESTS {
            return Err(Error::Rpc(format!("{} returned HTTP {}", method, status)));
        }

        let body: RpcResponse<T> = response.json().await?;
        decode_response(method, body)
    }
}

/// Turn a JSON-RPC envelope into a result
fn decode_response<T>(method: &str, response: RpcResponse<T>) -> Result<T> {
    if let Some(error) = response.error {
        return Err(Error::RpcResponse {
            code: error.code,
            message: error.message,
        });
    }

    response
        .result
        .ok_or_else(|| Error::Deserialization(format!("{} returned neither result nor error", method)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use httpmock::prelude::*;
    use serde_json::json;

    const OWNER: &str = "0x00000000000000000000000000000000000000000000000000000000000000a1";

    fn settings(url: String) -> RpcSettings {
        RpcSettings {
            url,
            timeout_ms: 200,
            max_retries: 2,
        }
    }

    fn ok(result: Value) -> Value {
        json!({ "jsonrpc": "2.0", "id": 1, "result": result })
    }

    fn object_entry(id: &str) -> Value {
        json!({ "data": { "objectId": id, "version": "1", "digest": "d" } })
    }

    #[test]
    fn test_decode_result() {
        let response: RpcResponse<String> =
            serde_json::from_str(r#"{"jsonrpc":"2.0","id":1,"result":"4c78adac"}"#).unwrap();
        assert_eq!(decode_response("sui_getChainIdentifier", response).unwrap(), "4c78adac");
    }

    #[test]
    fn test_decode_error() {
        let response: RpcResponse<String> = serde_json::from_str(
            r#"{"jsonrpc":"2.0","id":1,"error":{"code":-32602,"message":"Invalid params"}}"#,
        )
        .unwrap();
        let err = decode_response("sui_getObject", response).unwrap_err();
        assert!(matches!(err, Error::RpcResponse { code: -32602, .. }));
        assert!(!err.is_retryable());
    }

    #[test]
    fn test_decode_empty_envelope() {
        let response: RpcResponse<String> =
            serde_json::from_str(r#"{"jsonrpc":"2.0","id":1}"#).unwrap();
        assert!(matches!(
            decode_response("sui_getObject", response),
            Err(Error::Deserialization(_))
        ));
    }

    #[test]
    fn test_backoff_has_no_deadline() {
        let backoff = settings("http://127.0.0.1:9".to_string()).backoff();
        assert_eq!(backoff.max_elapsed_time, None);
    }

    #[tokio::test]
    async fn test_invalid_ids_fail_before_network() {
        let client = SuiClient::new(settings("http://127.0.0.1:9".to_string())).unwrap();
        assert!(matches!(
            client.get_object("0xnot-hex").await,
            Err(Error::InvalidAddress(_))
        ));
        assert!(matches!(
            client.get_dynamic_fields("", None).await,
            Err(Error::InvalidAddress(_))
        ));
    }

    #[tokio::test]
    async fn test_owned_objects_query_and_cursor() {
        let server = MockServer::start_async().await;
        let struct_type = "0x5c1e::profiles::Profile";

        let first = server
            .mock_async(|when, then| {
                when.method(POST)
                    .path("/")
                    .json_body_partial(r#"{"id": 1, "method": "suix_getOwnedObjects"}"#)
                    .body_contains(format!(r#""filter":{{"StructType":"{}"}}"#, struct_type))
                    .body_contains(r#""showContent":true"#);
                then.status(200).json_body(ok(json!({
                    "data": [object_entry("0x1")],
                    "nextCursor": "c1",
                    "hasNextPage": true
                })));
            })
            .await;

        let second = server
            .mock_async(|when, then| {
                when.method(POST)
                    .path("/")
                    .json_body_partial(r#"{"id": 2, "method": "suix_getOwnedObjects"}"#)
                    .body_contains(r#""c1""#);
                then.status(200).json_body(ok(json!({
                    "data": [object_entry("0x2"), { "error": { "code": "deleted" } }],
                    "nextCursor": null,
                    "hasNextPage": false
                })));
            })
            .await;

        let client = SuiClient::new(settings(server.base_url())).unwrap();
        let objects = client.get_all_owned_by_type(OWNER, struct_type).await.unwrap();

        first.assert_async().await;
        second.assert_async().await;
        let ids: Vec<_> = objects.iter().map(|o| o.object_id.as_str()).collect();
        assert_eq!(ids, vec!["0x1", "0x2"]);
    }

    #[tokio::test]
    async fn test_dynamic_fields_stop_at_page_cap() {
        let server = MockServer::start_async().await;
        let endless = server
            .mock_async(|when, then| {
                when.method(POST)
                    .path("/")
                    .json_body_partial(r#"{"method": "suix_getDynamicFields"}"#);
                then.status(200).json_body(ok(json!({
                    "data": [],
                    "nextCursor": "again",
                    "hasNextPage": true
                })));
            })
            .await;

        let client = SuiClient::new(settings(server.base_url())).unwrap();
        let fields = client.get_all_dynamic_fields(OWNER).await.unwrap();

        assert!(fields.is_empty());
        endless.assert_hits_async(MAX_PAGES).await;
    }

    #[tokio::test]
    async fn test_rpc_error_is_not_retried() {
        let server = MockServer::start_async().await;
        let mock = server
            .mock_async(|when, then| {
                when.method(POST).path("/");
                then.status(200).json_body(json!({
                    "jsonrpc": "2.0",
                    "id": 1,
                    "error": { "code": -32602, "message": "Invalid params" }
                }));
            })
            .await;

        let client = SuiClient::new(settings(server.base_url())).unwrap();
        let err = client.chain_identifier().await.unwrap_err();

        assert!(matches!(err, Error::RpcResponse { code: -32602, .. }));
        mock.assert_hits_async(1).await;
    }

    #[tokio::test]
    async fn test_server_error_retries_then_gives_up() {
        let server = MockServer::start_async().await;
        let mock = server
            .mock_async(|when, then| {
                when.method(POST).path("/");
                then.status(503);
            })
            .await;

        let client = SuiClient::new(settings(server.base_url())).unwrap();
        let err = client.chain_identifier().await.unwrap_err();

        assert!(matches!(err, Error::Rpc(_)));
        // first attempt plus max_retries
        mock.assert_hits_async(3).await;
    }

    #[tokio::test]
    async fn test_rate_limit_is_retried() {
        let server = MockServer::start_async().await;
        let limited = server
            .mock_async(|when, then| {
                when.method(POST).path("/").json_body_partial(r#"{"id": 1}"#);
                then.status(429).body("Too Many Requests");
            })
            .await;
        let answered = server
            .mock_async(|when, then| {
                when.method(POST).path("/").json_body_partial(r#"{"id": 2}"#);
                then.status(200).json_body(ok(json!("4c78adac")));
            })
            .await;

        let client = SuiClient::new(settings(server.base_url())).unwrap();
        assert_eq!(client.chain_identifier().await.unwrap(), "4c78adac");

        limited.assert_async().await;
        answered.assert_async().await;
    }

    #[tokio::test]
    async fn test_timed_out_read_is_retried() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(POST).path("/").json_body_partial(r#"{"id": 1}"#);
                then.status(200)
                    .delay(Duration::from_millis(1000))
                    .json_body(ok(json!("late")));
            })
            .await;
        let answered = server
            .mock_async(|when, then| {
                when.method(POST).path("/").json_body_partial(r#"{"id": 2}"#);
                then.status(200).json_body(ok(json!("4c78adac")));
            })
            .await;

        let client = SuiClient::new(settings(server.base_url())).unwrap();
        assert_eq!(client.chain_identifier().await.unwrap(), "4c78adac");
        answered.assert_async().await;
    }

    #[tokio::test]
    async fn test_execute_is_sent_once() {
        let server = MockServer::start_async().await;
        let mock = server
            .mock_async(|when, then| {
                when.method(POST)
                    .path("/")
                    .json_body_partial(r#"{"method": "sui_executeTransactionBlock"}"#)
                    .body_contains(r#""WaitForLocalExecution""#);
                then.status(503);
            })
            .await;

        let client = SuiClient::new(settings(server.base_url())).unwrap();
        let result = client
            .execute_transaction_block("AAAA", &["sig".to_string()])
            .await;

        assert!(matches!(result, Err(Error::Rpc(_))));
        mock.assert_hits_async(1).await;
    }

    #[tokio::test]
    async fn test_shared_version_from_owner() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(POST)
                    .path("/")
                    .json_body_partial(r#"{"method": "sui_getObject"}"#);
                then.status(200).json_body(ok(json!({
                    "data": {
                        "objectId": "0xe1",
                        "version": "42",
                        "digest": "d",
                        "owner": { "Shared": { "initial_shared_version": 11 } }
                    }
                })));
            })
            .await;

        let client = SuiClient::new(settings(server.base_url())).unwrap();
        assert_eq!(client.shared_version("0xe1").await.unwrap(), 11);
    }
}
