//! Wallet event bridge & request dispatcher
//!
//! Re-exposes a [`WalletSession`]'s events under neutral names and offers two
//! convenience operations that build a request and hand it to the session.
//!
//! ```text
//! WalletSession.authorized      ──▶ WalletBridge.wallet_connected
//! WalletSession.disconnected    ──▶ WalletBridge.wallet_disconnected
//! WalletSession.ready           ──▶ WalletBridge.wallet_ready
//! WalletSession.paused          ──▶ WalletBridge.wallet_paused
//! WalletSession.request_result  ──▶ WalletBridge.transaction_result (sender kept)
//!
//! send_transaction(): gas price → calldata → transaction_sent → eth_sendTransaction
//! sign():             typed data → sign_send → eth_signTypedData_v4
//! ```
//!
//! Subscriptions are held only between [`WalletBridge::activate`] and
//! [`WalletBridge::deactivate`] (or drop).

pub mod fixtures;
mod request;

pub use request::{SignRequest, TransactionRequest};

use crate::chain::{typed_data, AbiEncoder, ChainRpc, HttpChainRpc, JsonAbiEncoder};
use crate::config::{BridgeConfig, ContractCall};
use crate::core::methods::{bridge_events as names, wallet as methods};
use crate::core::{EventHub, Sender, Subscription};
use crate::error::{BridgeError, Result};
use crate::session::{LifecycleEvent, RequestResult, WalletSession};
use crate::transport::{DeepLink, LoggedDeepLink};
use alloy::primitives::Address;
use serde_json::Value;
use std::sync::{Arc, Mutex};

pub struct BridgeEvents {
    pub wallet_connected: EventHub<()>,
    pub wallet_disconnected: EventHub<()>,
    pub wallet_ready: EventHub<()>,
    pub wallet_paused: EventHub<()>,
    pub sign_send: EventHub<()>,
    pub transaction_sent: EventHub<()>,
    pub transaction_result: EventHub<RequestResult>,
}

impl Default for BridgeEvents {
    fn default() -> Self {
        Self {
            wallet_connected: EventHub::new(names::WALLET_CONNECTED),
            wallet_disconnected: EventHub::new(names::WALLET_DISCONNECTED),
            wallet_ready: EventHub::new(names::WALLET_READY),
            wallet_paused: EventHub::new(names::WALLET_PAUSED),
            sign_send: EventHub::new(names::SIGN_SEND),
            transaction_sent: EventHub::new(names::TRANSACTION_SENT),
            transaction_result: EventHub::new(names::TRANSACTION_RESULT),
        }
    }
}

impl BridgeEvents {
    /// Bridge event that mirrors a session lifecycle event.
    pub fn for_lifecycle(&self, event: LifecycleEvent) -> &EventHub<()> {
        match event {
            LifecycleEvent::Authorized => &self.wallet_connected,
            LifecycleEvent::Disconnected => &self.wallet_disconnected,
            LifecycleEvent::Ready => &self.wallet_ready,
            LifecycleEvent::Paused => &self.wallet_paused,
        }
    }
}

pub struct WalletBridge {
    sender: Sender,
    session: Arc<WalletSession>,
    rpc: Arc<dyn ChainRpc>,
    encoder: Arc<dyn AbiEncoder>,
    deep_link: Option<Arc<dyn DeepLink>>,
    contract_call: ContractCall,
    typed_data: String,
    events: Arc<BridgeEvents>,
    subscriptions: Mutex<Vec<Subscription>>,
}

impl WalletBridge {
    /// Bridge with the JSON ABI encoder and the sample mint call / typed data.
    pub fn new(session: Arc<WalletSession>, rpc: Arc<dyn ChainRpc>) -> Self {
        Self {
            sender: Sender::new("wallet-bridge"),
            session,
            rpc,
            encoder: Arc::new(JsonAbiEncoder),
            deep_link: None,
            contract_call: ContractCall::sample_mint(),
            typed_data: fixtures::MAIL_TYPED_DATA.to_string(),
            events: Arc::new(BridgeEvents::default()),
            subscriptions: Mutex::new(Vec::new()),
        }
    }

    /// Bridge over an HTTP chain RPC, with call, payload and deep link taken from config.
    pub fn from_config(config: &BridgeConfig, session: Arc<WalletSession>) -> Result<Self> {
        let rpc = Arc::new(HttpChainRpc::new(&config.rpc_url)?);
        let mut bridge = Self::new(session, rpc)
            .with_name(&config.name)
            .with_contract_call(config.contract_call.clone())
            .with_typed_data(config.typed_data.clone());
        if let Some(target) = &config.deep_link_target {
            bridge = bridge.with_deep_link(Arc::new(LoggedDeepLink::new(&config.deep_link_base, target)?));
        }
        Ok(bridge)
    }

    pub fn with_name(mut self, name: &str) -> Self { self.sender = Sender::new(name); self }
    pub fn with_encoder(mut self, encoder: Arc<dyn AbiEncoder>) -> Self { self.encoder = encoder; self }
    pub fn with_deep_link(mut self, link: Arc<dyn DeepLink>) -> Self { self.deep_link = Some(link); self }
    pub fn with_contract_call(mut self, call: ContractCall) -> Self { self.contract_call = call; self }
    pub fn with_typed_data(mut self, json: impl Into<String>) -> Self { self.typed_data = json.into(); self }

    pub fn sender(&self) -> &Sender { &self.sender }
    pub fn session(&self) -> &Arc<WalletSession> { &self.session }
    pub fn events(&self) -> &BridgeEvents { &self.events }
    pub fn contract_call(&self) -> &ContractCall { &self.contract_call }

    // Activation

    /// Subscribe to the session's four lifecycle events and its request
    /// results. Returns false if already active.
    pub fn activate(&self) -> bool {
        let mut subs = self.subscriptions.lock().unwrap_or_else(|p| p.into_inner());
        if !subs.is_empty() {
            return false;
        }
        let session_events = self.session.events();
        for event in LifecycleEvent::ALL {
            let (events, sender) = (self.events.clone(), self.sender.clone());
            subs.push(session_events.lifecycle(event).subscribe(move |_, _| {
                events.for_lifecycle(event).emit(&sender, &());
            }));
        }
        let events = self.events.clone();
        subs.push(session_events.request_result.subscribe(move |sender, result| {
            events.transaction_result.emit(sender, result);
        }));
        tracing::debug!(bridge = %self.sender, session = %self.session.sender(), "bridge activated");
        true
    }

    /// Release every session subscription. Returns how many were released.
    pub fn deactivate(&self) -> usize {
        let released: Vec<Subscription> = {
            let mut subs = self.subscriptions.lock().unwrap_or_else(|p| p.into_inner());
            std::mem::take(&mut *subs)
        };
        let n = released.len();
        drop(released);
        if n > 0 {
            tracing::debug!(bridge = %self.sender, released = n, "bridge deactivated");
        }
        n
    }

    pub fn is_active(&self) -> bool {
        self.subscriptions.lock().map(|s| !s.is_empty()).unwrap_or(false)
    }

    // Operations

    pub async fn connect(&self) -> Result<Address> { self.session.connect().await }

    /// Opens the wallet app when a deep link transport is configured; `Ok(None)` otherwise.
    pub fn open_deep_link(&self) -> Result<Option<String>> {
        match &self.deep_link {
            Some(link) => link.open().map(Some),
            None => Ok(None),
        }
    }

    /// Send the configured contract call through the wallet.
    pub async fn send_transaction(&self) -> Result<Value> {
        self.send_contract_call(&self.contract_call).await
    }

    pub async fn send_contract_call(&self, call: &ContractCall) -> Result<Value> {
        let from = self.submitting_address()?;

        let gas_price = self.rpc.gas_price().await?;
        tracing::info!(gas_price, "current gas price");

        let data = self.encoder.calldata(&call.abi_json, &call.method, &call.args)?;
        if data.is_empty() {
            return Err(BridgeError::Encoding(format!("empty calldata for '{}'", call.method)));
        }
        tracing::info!(method = %call.method, data = %data, "contract data");

        let tx = TransactionRequest::call(call.address, from, data);
        self.events.transaction_sent.emit(&self.sender, &());
        self.session.request(methods::SEND_TRANSACTION, tx.params()).await
    }

    /// Ask the wallet to sign the configured EIP-712 payload.
    pub async fn sign(&self) -> Result<Value> {
        self.sign_typed_data(&self.typed_data).await
    }

    /// Selected address of a session that can take a request right now.
    fn submitting_address(&self) -> Result<Address> {
        let address = self.session.require_address()?;
        let state = self.session.state();
        if !state.is_live() {
            return Err(BridgeError::Authorization(format!("wallet session is {state}")));
        }
        Ok(address)
    }

    pub async fn sign_typed_data(&self, json: &str) -> Result<Value> {
        let address = self.submitting_address()?;
        typed_data::parse(json)?;
        let request = SignRequest::new(address, json);
        self.events.sign_send.emit(&self.sender, &());
        self.session.request(methods::SIGN_TYPED_DATA_V4, request.params()).await
    }
}

impl std::fmt::Debug for WalletBridge {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WalletBridge")
            .field("sender", &self.sender)
            .field("session", &self.session)
            .field("active", &self.is_active())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::transport::RecordingTransport;

    fn session() -> Arc<WalletSession> { Arc::new(WalletSession::new(Arc::new(RecordingTransport::default()))) }

    #[test]
    fn lifecycle_maps_to_neutral_names() {
        let events = BridgeEvents::default();
        let names: Vec<_> = LifecycleEvent::ALL.iter().map(|e| events.for_lifecycle(*e).name()).collect();
        assert_eq!(names, vec!["wallet_connected", "wallet_disconnected", "wallet_ready", "wallet_paused"]);
    }

    #[test]
    fn from_config_wires_deep_link_and_call() {
        let config = BridgeConfig::new()
            .with_name("mint-bridge")
            .with_rpc_url("http://127.0.0.1:8545")
            .with_deep_link_target("https://example.org/mint");
        let bridge = WalletBridge::from_config(&config, session()).unwrap();
        assert_eq!(bridge.sender().as_str(), "mint-bridge");
        assert_eq!(bridge.contract_call(), &ContractCall::sample_mint());
        assert_eq!(
            bridge.open_deep_link().unwrap().as_deref(),
            Some("https://metamask.app.link/dapp/example.org/mint")
        );
    }

    #[test]
    fn from_config_rejects_bad_rpc_url() {
        let config = BridgeConfig::new().with_rpc_url("not a url");
        assert_eq!(WalletBridge::from_config(&config, session()).unwrap_err().code(), "config");
    }
}
