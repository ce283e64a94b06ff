//! Error types for wallet bridge operations.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

/// EIP-1193 provider error codes.
pub mod codes {
    pub const USER_REJECTED: i64 = 4001;
    pub const UNAUTHORIZED: i64 = 4100;
    pub const UNSUPPORTED_METHOD: i64 = 4200;
    pub const DISCONNECTED: i64 = 4900;
    pub const METHOD_NOT_FOUND: i64 = -32601;
    pub const INVALID_PARAMS: i64 = -32602;
    pub const INTERNAL: i64 = -32603;
}

pub type Result<T> = std::result::Result<T, BridgeError>;

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum BridgeError {
    /// RPC or wallet endpoint unreachable.
    #[error("connectivity: {0}")]
    Connectivity(String),
    /// No selected address, wallet not connected, or signer mismatch.
    #[error("authorization: {0}")]
    Authorization(String),
    /// The wallet or node answered with an error object.
    #[error("rejected (code {code}): {message}")]
    Rejected { code: i64, message: String },
    /// Malformed ABI, arguments, or typed data.
    #[error("encoding: {0}")]
    Encoding(String),
    /// Illegal session lifecycle transition.
    #[error("invalid state: {0}")]
    State(String),
    #[error("config: {0}")]
    Config(String),
}

impl BridgeError {
    /// Stable identifier exposed to host applications.
    pub fn code(&self) -> &'static str {
        match self {
            BridgeError::Connectivity(_) => "connectivity",
            BridgeError::Authorization(_) => "authorization",
            BridgeError::Rejected { .. } => "rejected",
            BridgeError::Encoding(_) => "encoding",
            BridgeError::State(_) => "invalid_state",
            BridgeError::Config(_) => "config",
        }
    }

    pub fn rejected(code: i64, message: impl Into<String>) -> Self {
        BridgeError::Rejected { code, message: message.into() }
    }

    pub fn is_user_rejection(&self) -> bool {
        matches!(self, BridgeError::Rejected { code, .. } if *code == codes::USER_REJECTED)
    }
}

/// JSON-RPC style error object carried by a failed request outcome.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RpcErrorObject {
    pub code: i64,
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<Value>,
}

impl From<&BridgeError> for RpcErrorObject {
    fn from(err: &BridgeError) -> Self {
        let code = match err {
            BridgeError::Rejected { code, .. } => *code,
            BridgeError::Authorization(_) => codes::UNAUTHORIZED,
            BridgeError::Connectivity(_) => codes::DISCONNECTED,
            BridgeError::Encoding(_) => codes::INVALID_PARAMS,
            BridgeError::State(_) | BridgeError::Config(_) => codes::INTERNAL,
        };
        let message = match err {
            BridgeError::Rejected { message, .. } => message.clone(),
            other => other.to_string(),
        };
        Self { code, message, data: Some(Value::String(err.code().into())) }
    }
}

impl From<RpcErrorObject> for BridgeError {
    fn from(obj: RpcErrorObject) -> Self {
        BridgeError::Rejected { code: obj.code, message: obj.message }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn codes_are_stable() {
        assert_eq!(BridgeError::Connectivity("x".into()).code(), "connectivity");
        assert_eq!(BridgeError::Authorization("x".into()).code(), "authorization");
        assert_eq!(BridgeError::rejected(4001, "no").code(), "rejected");
        assert_eq!(BridgeError::Encoding("x".into()).code(), "encoding");
        assert_eq!(BridgeError::State("x".into()).code(), "invalid_state");
        assert_eq!(BridgeError::Config("x".into()).code(), "config");
    }

    #[test]
    fn rejection_keeps_wallet_code() {
        let err = BridgeError::rejected(codes::USER_REJECTED, "User denied");
        assert!(err.is_user_rejection());
        let obj = RpcErrorObject::from(&err);
        assert_eq!(obj.code, 4001);
        assert_eq!(obj.message, "User denied");
        assert_eq!(BridgeError::from(obj), err);
    }

    #[test]
    fn authorization_maps_to_unauthorized() {
        let obj = RpcErrorObject::from(&BridgeError::Authorization("no address".into()));
        assert_eq!(obj.code, codes::UNAUTHORIZED);
        assert_eq!(obj.data, Some(Value::String("authorization".into())));
    }
}
