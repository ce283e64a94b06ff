//! In-process wallet backed by a private key.
//!
//! Signs typed data locally and broadcasts transactions through an RPC node.
//! Requests naming another account are refused with 4100 (unauthorized).

use super::WalletTransport;
use crate::bridge::TransactionRequest;
use crate::chain::{map_transport_error, parse_url, typed_data};
use crate::core::methods::wallet as methods;
use crate::error::{codes, BridgeError, Result};
use alloy::network::{EthereumWallet, TransactionBuilder};
use alloy::primitives::Address;
use alloy::providers::{Provider, ProviderBuilder};
use alloy::rpc::types::TransactionRequest as RpcTransactionRequest;
use alloy::signers::Signer;
use alloy_signer_local::PrivateKeySigner;
use async_trait::async_trait;
use serde_json::{json, Value};
use url::Url;

#[derive(Clone, Debug)]
pub struct LocalWalletTransport {
    signer: PrivateKeySigner,
    rpc_url: Option<Url>,
}

impl LocalWalletTransport {
    pub fn new(signer: PrivateKeySigner) -> Self { Self { signer, rpc_url: None } }

    /// Node used to broadcast `eth_sendTransaction`.
    pub fn with_rpc_url(mut self, url: &str) -> Result<Self> {
        self.rpc_url = Some(parse_url(url)?);
        Ok(self)
    }

    pub fn address(&self) -> Address { self.signer.address() }

    fn check_account(&self, address: Address) -> Result<()> {
        if address != self.signer.address() {
            return Err(BridgeError::rejected(
                codes::UNAUTHORIZED,
                format!("account {address} is not managed by this wallet"),
            ));
        }
        Ok(())
    }

    async fn sign_typed_data(&self, params: &Value) -> Result<Value> {
        let (address, payload) = match params.as_array().map(Vec::as_slice) {
            Some([address, payload]) => (address, payload),
            _ => return Err(invalid_params("expected [address, typedData]")),
        };
        let address: Address = address
            .as_str()
            .and_then(|s| s.parse().ok())
            .ok_or_else(|| invalid_params("first parameter must be an address"))?;
        self.check_account(address)?;

        // Wallets accept the payload either as a JSON string or inline.
        let hash = match payload {
            Value::String(s) => typed_data::signing_hash(s)?,
            other => typed_data::signing_hash(&other.to_string())?,
        };
        let signature = self
            .signer
            .sign_hash(&hash)
            .await
            .map_err(|e| BridgeError::rejected(codes::INTERNAL, e.to_string()))?;
        Ok(json!(format!("0x{}", hex::encode(signature.as_bytes()))))
    }

    async fn send_transaction(&self, params: &Value) -> Result<Value> {
        let tx: TransactionRequest = params
            .get(0)
            .cloned()
            .ok_or_else(|| invalid_params("expected [transaction]"))
            .and_then(|v| serde_json::from_value(v).map_err(|e| invalid_params(&e.to_string())))?;
        self.check_account(tx.from)?;
        let url = self
            .rpc_url
            .clone()
            .ok_or_else(|| BridgeError::Config("local wallet has no rpc url for broadcasting".into()))?;

        let request = RpcTransactionRequest::default()
            .with_from(tx.from)
            .with_to(tx.to)
            .with_value(tx.value)
            .with_input(tx.data.clone());
        let provider = ProviderBuilder::new().wallet(EthereumWallet::from(self.signer.clone())).on_http(url);
        let pending = provider
            .send_transaction(request)
            .await
            .map_err(|e| map_transport_error(e, methods::SEND_TRANSACTION))?;
        let hash = format!("0x{}", hex::encode(pending.tx_hash()));
        tracing::info!(%hash, to = %tx.to, "transaction broadcast");
        Ok(json!(hash))
    }
}

fn invalid_params(msg: &str) -> BridgeError { BridgeError::rejected(codes::INVALID_PARAMS, msg) }

#[async_trait]
impl WalletTransport for LocalWalletTransport {
    async fn accounts(&self) -> Result<Vec<Address>> { Ok(vec![self.signer.address()]) }

    async fn request(&self, method: &str, params: Value) -> Result<Value> {
        match method {
            methods::ACCOUNTS | methods::REQUEST_ACCOUNTS => Ok(json!([self.signer.address()])),
            methods::SIGN_TYPED_DATA_V4 => self.sign_typed_data(&params).await,
            methods::SEND_TRANSACTION => self.send_transaction(&params).await,
            other => Err(BridgeError::rejected(codes::UNSUPPORTED_METHOD, format!("unsupported method {other}"))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bridge::fixtures::MAIL_TYPED_DATA;
    use alloy::primitives::Signature;

    fn wallet() -> LocalWalletTransport { LocalWalletTransport::new(PrivateKeySigner::random()) }

    #[tokio::test]
    async fn typed_data_signature_recovers_to_signer() {
        let w = wallet();
        let sig = w
            .request(methods::SIGN_TYPED_DATA_V4, json!([w.address().to_string(), MAIL_TYPED_DATA]))
            .await
            .unwrap();
        let bytes = hex::decode(sig.as_str().unwrap().trim_start_matches("0x")).unwrap();
        assert_eq!(bytes.len(), 65);
        let signature = Signature::try_from(bytes.as_slice()).unwrap();
        let hash = typed_data::signing_hash(MAIL_TYPED_DATA).unwrap();
        assert_eq!(signature.recover_address_from_prehash(&hash).unwrap(), w.address());
    }

    #[tokio::test]
    async fn foreign_account_is_unauthorized() {
        let w = wallet();
        let other = Address::repeat_byte(7).to_string();
        let err = w.request(methods::SIGN_TYPED_DATA_V4, json!([other, MAIL_TYPED_DATA])).await.unwrap_err();
        assert!(matches!(err, BridgeError::Rejected { code: codes::UNAUTHORIZED, .. }));
    }

    #[tokio::test]
    async fn send_without_rpc_url_is_config_error() {
        let w = wallet();
        let tx = TransactionRequest::call(Address::repeat_byte(1), w.address(), vec![1u8, 2, 3].into());
        let err = w.request(methods::SEND_TRANSACTION, tx.params()).await.unwrap_err();
        assert_eq!(err.code(), "config");
    }

    #[tokio::test]
    async fn accounts_and_unknown_methods() {
        let w = wallet();
        assert_eq!(w.accounts().await.unwrap(), vec![w.address()]);
        let err = w.request("personal_sign", json!([])).await.unwrap_err();
        assert_eq!(err, BridgeError::rejected(codes::UNSUPPORTED_METHOD, "unsupported method personal_sign"));
        let err = w.request(methods::SIGN_TYPED_DATA_V4, json!(["0x01"])).await.unwrap_err();
        assert_eq!(err.code(), "rejected");
    }
}
