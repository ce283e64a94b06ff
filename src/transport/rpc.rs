//! Forwards wallet requests verbatim to a JSON-RPC node that manages its own
//! accounts.

use super::WalletTransport;
use crate::chain::{map_transport_error, parse_url, HttpProvider};
use crate::core::methods::wallet as methods;
use crate::error::{codes, BridgeError, Result};
use alloy::primitives::Address;
use alloy::providers::{Provider, ProviderBuilder};
use async_trait::async_trait;
use serde_json::{json, Value};
use std::borrow::Cow;
use url::Url;

#[derive(Clone, Debug)]
pub struct RpcWalletTransport {
    url: Url,
    provider: HttpProvider,
}

impl RpcWalletTransport {
    pub fn new(url: &str) -> Result<Self> {
        let url = parse_url(url)?;
        let provider = ProviderBuilder::new().on_http(url.clone());
        Ok(Self { url, provider })
    }

    pub fn url(&self) -> &Url { &self.url }

    async fn raw(&self, method: &str, params: Value) -> Result<Value> {
        self.provider
            .raw_request::<Value, Value>(Cow::Owned(method.to_string()), params)
            .await
            .map_err(|e| map_transport_error(e, method))
    }
}

#[async_trait]
impl WalletTransport for RpcWalletTransport {
    /// `eth_requestAccounts`, or `eth_accounts` on nodes that do not know
    /// the former. A user refusal is returned as is.
    async fn accounts(&self) -> Result<Vec<Address>> {
        let value = match self.raw(methods::REQUEST_ACCOUNTS, json!([])).await {
            Ok(v) => v,
            Err(BridgeError::Rejected { code: codes::METHOD_NOT_FOUND | codes::UNSUPPORTED_METHOD, .. }) => {
                self.raw(methods::ACCOUNTS, json!([])).await?
            }
            Err(e) => return Err(e),
        };
        serde_json::from_value(value).map_err(|e| BridgeError::Connectivity(format!("{}: {e}", methods::ACCOUNTS)))
    }

    async fn request(&self, method: &str, params: Value) -> Result<Value> {
        tracing::debug!(url = %self.url, method, "forward wallet request");
        self.raw(method, params).await
    }
}
