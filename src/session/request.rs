//! Request outcomes delivered through `request_result`.

use crate::error::{BridgeError, RpcErrorObject};
use serde::{Deserialize, Serialize};
use serde_json::Value;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RequestOutcome {
    Success(Value),
    Error(RpcErrorObject),
}

impl RequestOutcome {
    pub fn is_error(&self) -> bool { matches!(self, RequestOutcome::Error(_)) }

    pub fn result(&self) -> Option<&Value> {
        match self { RequestOutcome::Success(v) => Some(v), RequestOutcome::Error(_) => None }
    }

    pub fn error(&self) -> Option<&RpcErrorObject> {
        match self { RequestOutcome::Error(e) => Some(e), RequestOutcome::Success(_) => None }
    }
}

impl From<&Result<Value, BridgeError>> for RequestOutcome {
    fn from(r: &Result<Value, BridgeError>) -> Self {
        match r {
            Ok(v) => RequestOutcome::Success(v.clone()),
            Err(e) => RequestOutcome::Error(RpcErrorObject::from(e)),
        }
    }
}

/// Payload of the session's "request result received" event.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RequestResult {
    pub id: u64,
    pub method: String,
    pub outcome: RequestOutcome,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn outcome_serializes_like_json_rpc() {
        let ok = RequestResult { id: 1, method: "eth_accounts".into(), outcome: RequestOutcome::Success(json!(["0x1"])) };
        assert_eq!(serde_json::to_value(&ok).unwrap()["outcome"], json!({"success": ["0x1"]}));

        let err: Result<Value, BridgeError> = Err(BridgeError::rejected(4001, "User rejected the request."));
        let outcome = RequestOutcome::from(&err);
        assert!(outcome.is_error());
        assert_eq!(outcome.error().unwrap().code, 4001);
        assert!(outcome.result().is_none());
    }
}
