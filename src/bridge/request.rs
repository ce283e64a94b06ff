//! Request payloads built by the dispatcher.

use alloy::primitives::{Address, Bytes, U256};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

/// `eth_sendTransaction` parameter object: `{to, from, value, data}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransactionRequest {
    pub to: Address,
    pub from: Address,
    #[serde(default)]
    pub value: U256,
    #[serde(default)]
    pub data: Bytes,
}

impl TransactionRequest {
    /// Zero-value contract call.
    pub fn call(to: Address, from: Address, data: Bytes) -> Self {
        Self { to, from, value: U256::ZERO, data }
    }

    pub fn params(&self) -> Value { json!([self]) }
}

/// `eth_signTypedData_v4` request: `[address, typedDataJson]`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SignRequest {
    pub address: Address,
    pub typed_data: String,
}

impl SignRequest {
    pub fn new(address: Address, typed_data: impl Into<String>) -> Self {
        Self { address, typed_data: typed_data.into() }
    }

    pub fn params(&self) -> Value { json!([self.address.to_string(), self.typed_data]) }
}
