//! Scripted in-memory wallet. Records every request it receives.

use super::WalletTransport;
use crate::error::{codes, BridgeError, Result};
use alloy::primitives::Address;
use async_trait::async_trait;
use serde_json::Value;
use std::collections::HashMap;
use std::sync::Mutex;

#[derive(Debug, Clone, PartialEq)]
pub struct RecordedRequest {
    pub method: String,
    pub params: Value,
}

#[derive(Debug, Default)]
pub struct RecordingTransport {
    accounts: Vec<Address>,
    accounts_error: Option<BridgeError>,
    responses: HashMap<String, Result<Value>>,
    requests: Mutex<Vec<RecordedRequest>>,
}

impl RecordingTransport {
    pub fn new(accounts: Vec<Address>) -> Self { Self { accounts, ..Default::default() } }

    pub fn respond(mut self, method: &str, value: Value) -> Self {
        self.responses.insert(method.to_string(), Ok(value));
        self
    }

    pub fn reject(mut self, method: &str, code: i64, message: &str) -> Self {
        self.responses.insert(method.to_string(), Err(BridgeError::rejected(code, message)));
        self
    }

    pub fn fail_accounts(mut self, err: BridgeError) -> Self {
        self.accounts_error = Some(err);
        self
    }

    pub fn requests(&self) -> Vec<RecordedRequest> {
        self.requests.lock().map(|r| r.clone()).unwrap_or_default()
    }
}

#[async_trait]
impl WalletTransport for RecordingTransport {
    async fn accounts(&self) -> Result<Vec<Address>> {
        match &self.accounts_error {
            Some(e) => Err(e.clone()),
            None => Ok(self.accounts.clone()),
        }
    }

    async fn request(&self, method: &str, params: Value) -> Result<Value> {
        if let Ok(mut r) = self.requests.lock() {
            r.push(RecordedRequest { method: method.to_string(), params });
        }
        self.responses
            .get(method)
            .cloned()
            .unwrap_or_else(|| Err(BridgeError::rejected(codes::UNSUPPORTED_METHOD, format!("unsupported method {method}"))))
    }
}
