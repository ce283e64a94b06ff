//! EIP-712 typed data validation and hashing.

use crate::error::{BridgeError, Result};
use alloy::dyn_abi::TypedData;
use alloy::primitives::B256;

pub fn parse(json: &str) -> Result<TypedData> {
    serde_json::from_str(json).map_err(|e| BridgeError::Encoding(format!("invalid typed data: {e}")))
}

pub fn signing_hash(json: &str) -> Result<B256> {
    hash(&parse(json)?)
}

pub fn hash(typed: &TypedData) -> Result<B256> {
    typed
        .eip712_signing_hash()
        .map_err(|e| BridgeError::Encoding(format!("typed data '{}': {e}", typed.primary_type)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bridge::fixtures::MAIL_TYPED_DATA;

    #[test]
    fn sample_mail_parses_and_hashes() {
        let typed = parse(MAIL_TYPED_DATA).unwrap();
        assert_eq!(typed.primary_type, "Mail");
        assert_eq!(typed.domain.name.as_deref(), Some("Ether Mail"));
        let h1 = signing_hash(MAIL_TYPED_DATA).unwrap();
        let h2 = hash(&typed).unwrap();
        assert_eq!(h1, h2);
        assert_ne!(h1, B256::ZERO);
    }

    #[test]
    fn message_changes_hash() {
        let edited = MAIL_TYPED_DATA.replace("Hello, ChainSafe!", "Hello, world!");
        assert_ne!(signing_hash(MAIL_TYPED_DATA).unwrap(), signing_hash(&edited).unwrap());
    }

    #[test]
    fn rejects_garbage() {
        assert_eq!(signing_hash("{\"foo\":1}").unwrap_err().code(), "encoding");
        assert_eq!(signing_hash("not json").unwrap_err().code(), "encoding");
    }
}
