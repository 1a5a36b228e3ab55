//! Wallet providers
//!
//! Key material never leaves the wallet. A provider only exposes the
//! connect action and hands built transactions over for signing and
//! execution.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};
use url::Url;

use crate::error::{Error, Result};
use crate::sui::address::SuiAddress;
use crate::transaction::TransactionBlock;

use super::types::{
    ExecutionResult, WalletAccount, WalletEntry, FEATURE_CONNECT, FEATURE_SIGN_AND_EXECUTE,
};

/// A wallet that can connect and sign on the user's behalf
#[async_trait]
pub trait WalletProvider: Send + Sync {
    /// Wallet display name
    fn name(&self) -> &str;

    /// Ask the wallet for access; returns the accounts it exposes
    async fn connect(&self) -> Result<Vec<WalletAccount>>;

    /// Sign and execute `tx` from `account` on `chain`
    async fn sign_and_execute(
        &self,
        tx: &TransactionBlock,
        account: &WalletAccount,
        chain: &str,
    ) -> Result<ExecutionResult>;
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct ConnectRequest<'a> {
    chains: Vec<&'a str>,
}

#[derive(Debug, Deserialize)]
struct ConnectResponse {
    #[serde(default)]
    accounts: Vec<WalletAccount>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct SignAndExecuteRequest<'a> {
    /// Serialized transaction JSON
    transaction: String,
    account: SuiAddress,
    chain: &'a str,
}

#[derive(Debug, Deserialize)]
struct BridgeError {
    error: String,
}

/// Wallet reached through a local HTTP bridge
///
/// The bridge implements `POST /connect` and `POST /sign-and-execute`.
pub struct HttpWalletProvider {
    entry: WalletEntry,
    base: Url,
    http: Client,
}

impl HttpWalletProvider {
    pub fn new(entry: WalletEntry, timeout_ms: u64) -> Result<Self> {
        let mut base = Url::parse(&entry.endpoint).map_err(|e| {
            Error::WalletConnection(format!("Invalid endpoint for {}: {}", entry.name, e))
        })?;

        // join() replaces the last segment unless the path ends with '/'
        if !base.path().ends_with('/') {
            let path = format!("{}/", base.path());
            base.set_path(&path);
        }

        let http = Client::builder()
            .timeout(Duration::from_millis(timeout_ms))
            .build()
            .map_err(|e| Error::WalletConnection(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self { entry, base, http })
    }

    pub fn entry(&self) -> &WalletEntry {
        &self.entry
    }

    fn endpoint(&self, path: &str) -> Result<Url> {
        self.base
            .join(path)
            .map_err(|e| Error::WalletConnection(format!("Invalid bridge path {}: {}", path, e)))
    }

    fn require_feature(&self, feature: &str) -> Result<()> {
        if self.entry.supports_feature(feature) {
            Ok(())
        } else {
            Err(Error::WalletConnection(format!(
                "{} does not support {}",
                self.entry.name, feature
            )))
        }
    }

    async fn post<B: Serialize + ?Sized, T: for<'de> Deserialize<'de>>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<T> {
        let url = self.endpoint(path)?;
        debug!("Wallet bridge request: {}", url);

        let response = self
            .http
            .post(url)
            .json(body)
            .send()
            .await
            .map_err(|e| Error::WalletConnection(format!("{}: {}", self.entry.name, e)))?;

        let status = response.status();
        let text = response
            .text()
            .await
            .map_err(|e| Error::WalletConnection(format!("{}: {}", self.entry.name, e)))?;

        if !status.is_success() {
            return Err(bridge_error(status, &text));
        }

        serde_json::from_str(&text)
            .map_err(|e| Error::Deserialization(format!("Wallet bridge response: {}", e)))
    }
}

/// Map a failed bridge response to an error
fn bridge_error(status: StatusCode, body: &str) -> Error {
    let message = serde_json::from_str::<BridgeError>(body)
        .map(|e| e.error)
        .unwrap_or_else(|_| body.trim().to_string());

    if status.is_client_error() {
        Error::WalletRejected(message)
    } else {
        Error::WalletConnection(format!("HTTP {}: {}", status, message))
    }
}

#[async_trait]
impl WalletProvider for HttpWalletProvider {
    fn name(&self) -> &str {
        &self.entry.name
    }

    async fn connect(&self) -> Result<Vec<WalletAccount>> {
        self.require_feature(FEATURE_CONNECT)?;

        let request = ConnectRequest {
            chains: self.entry.chains.iter().map(String::as_str).collect(),
        };
        let response: ConnectResponse = self.post("connect", &request).await?;

        if response.accounts.is_empty() {
            return Err(Error::WalletConnection(format!(
                "{} returned no accounts",
                self.entry.name
            )));
        }

        info!(
            "Connected to {} ({} accounts)",
            self.entry.name,
            response.accounts.len()
        );
        Ok(response.accounts)
    }

    async fn sign_and_execute(
        &self,
        tx: &TransactionBlock,
        account: &WalletAccount,
        chain: &str,
    ) -> Result<ExecutionResult> {
        self.require_feature(FEATURE_SIGN_AND_EXECUTE)?;

        if !self.entry.supports_chain(chain) {
            return Err(Error::WalletConnection(format!(
                "{} does not serve {}",
                self.entry.name, chain
            )));
        }

        let request = SignAndExecuteRequest {
            transaction: tx.serialize()?,
            account: account.address,
            chain,
        };

        let result: ExecutionResult = self.post("sign-and-execute", &request).await?;
        info!("Wallet executed transaction {}", result.digest);
        Ok(result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use httpmock::prelude::*;
    use serde_json::json;

    fn provider(endpoint: &str) -> HttpWalletProvider {
        HttpWalletProvider::new(WalletEntry::new("Sui Wallet", endpoint), 500).unwrap()
    }

    fn account() -> WalletAccount {
        WalletAccount {
            address: SuiAddress::parse("0x2").unwrap(),
            public_key: None,
            chains: vec![],
            label: None,
        }
    }

    #[test]
    fn test_endpoint_join_keeps_base_path() {
        let p = provider("http://127.0.0.1:5173/bridge");
        assert_eq!(
            p.endpoint("connect").unwrap().as_str(),
            "http://127.0.0.1:5173/bridge/connect"
        );

        let p = provider("http://127.0.0.1:5173");
        assert_eq!(
            p.endpoint("sign-and-execute").unwrap().as_str(),
            "http://127.0.0.1:5173/sign-and-execute"
        );
    }

    #[test]
    fn test_invalid_endpoint() {
        let result = HttpWalletProvider::new(WalletEntry::new("Broken", "::nope"), 500);
        assert!(matches!(result, Err(Error::WalletConnection(_))));
    }

    #[test]
    fn test_bridge_error_mapping() {
        let rejected = bridge_error(StatusCode::FORBIDDEN, r#"{"error":"User rejected"}"#);
        assert!(matches!(rejected, Error::WalletRejected(ref m) if m == "User rejected"));

        let failed = bridge_error(StatusCode::BAD_GATEWAY, "upstream down");
        assert!(matches!(failed, Error::WalletConnection(_)));
    }

    #[test]
    fn test_sign_request_carries_serialized_transaction() {
        let tx = TransactionBlock::new();
        let request = SignAndExecuteRequest {
            transaction: tx.serialize().unwrap(),
            account: account().address,
            chain: "sui:testnet",
        };

        let json = serde_json::to_value(&request).unwrap();
        assert_eq!(json["chain"], "sui:testnet");
        let inner: serde_json::Value =
            serde_json::from_str(json["transaction"].as_str().unwrap()).unwrap();
        assert_eq!(inner["version"], 2);
    }

    #[tokio::test]
    async fn test_unsupported_feature_fails_before_request() {
        let mut entry = WalletEntry::new("Viewer", "http://127.0.0.1:9");
        entry.features = vec![FEATURE_CONNECT.to_string()];
        let p = HttpWalletProvider::new(entry, 500).unwrap();

        let err = p
            .sign_and_execute(&TransactionBlock::new(), &account(), "sui:testnet")
            .await
            .unwrap_err();
        assert!(matches!(err, Error::WalletConnection(_)));
    }

    #[tokio::test]
    async fn test_wrong_chain_fails_before_request() {
        let mut entry = WalletEntry::new("Sui Wallet", "http://127.0.0.1:9");
        entry.chains = vec!["sui:mainnet".to_string()];
        let p = HttpWalletProvider::new(entry, 500).unwrap();

        let err = p
            .sign_and_execute(&TransactionBlock::new(), &account(), "sui:testnet")
            .await
            .unwrap_err();
        assert!(err.to_string().contains("sui:testnet"));
    }

    #[tokio::test]
    async fn test_connect_then_sign_and_execute() {
        let server = MockServer::start_async().await;
        let connect = server
            .mock_async(|when, then| {
                when.method(POST)
                    .path("/bridge/connect")
                    .json_body(json!({ "chains": ["sui:testnet"] }));
                then.status(200).json_body(json!({
                    "accounts": [{ "address": "0x2", "label": "main" }]
                }));
            })
            .await;
        let execute = server
            .mock_async(|when, then| {
                when.method(POST)
                    .path("/bridge/sign-and-execute")
                    .json_body_partial(r#"{"chain": "sui:testnet"}"#)
                    .body_contains(r#"\"version\":2"#);
                then.status(200).json_body(json!({ "digest": "9xQ" }));
            })
            .await;

        let mut entry = WalletEntry::new("Sui Wallet", server.url("/bridge"));
        entry.chains = vec!["sui:testnet".to_string()];
        let p = HttpWalletProvider::new(entry, 1000).unwrap();

        let accounts = p.connect().await.unwrap();
        let expected = WalletAccount {
            label: Some("main".to_string()),
            ..account()
        };
        assert_eq!(accounts, vec![expected]);

        let result = p
            .sign_and_execute(&TransactionBlock::new(), &accounts[0], "sui:testnet")
            .await
            .unwrap();
        assert_eq!(result.digest, "9xQ");
        assert!(result.effects.is_none());

        connect.assert_async().await;
        execute.assert_async().await;
    }

    #[tokio::test]
    async fn test_user_rejection_maps_to_rejected() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(POST).path("/sign-and-execute");
                then.status(403).json_body(json!({ "error": "User rejected the request" }));
            })
            .await;

        let p = provider(&server.base_url());
        let err = p
            .sign_and_execute(&TransactionBlock::new(), &account(), "sui:testnet")
            .await
            .unwrap_err();
        assert!(matches!(err, Error::WalletRejected(ref m) if m == "User rejected the request"));
    }

    #[tokio::test]
    async fn test_connect_without_accounts_fails() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(POST).path("/connect");
                then.status(200).json_body(json!({ "accounts": [] }));
            })
            .await;

        let err = provider(&server.base_url()).connect().await.unwrap_err();
        assert!(matches!(err, Error::WalletConnection(_)));
    }

    #[tokio::test]
    async fn test_bridge_failure_maps_to_connection_error() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(POST).path("/connect");
                then.status(502).body("bad gateway");
            })
            .await;

        let err = provider(&server.base_url()).connect().await.unwrap_err();
        assert!(matches!(err, Error::WalletConnection(ref m) if m.contains("bad gateway")));
    }
}
