//! Wallet session - connection state, selected address, lifecycle events
//!
//! A session is constructed explicitly and shared by handle (`Arc`). It owns
//! one listener registry per event; bridges hold [`Subscription`] guards into
//! those registries.
//!
//! # Events
//!
//! | Hub | Payload | Raised when |
//! |-----|---------|-------------|
//! | `authorized` | `()` | `connect()` obtained an account |
//! | `disconnected` | `()` | `disconnect()` on a non-disconnected session |
//! | `ready` | `()` | after `authorized`, and on `resume()` |
//! | `paused` | `()` | `pause()` |
//! | `request_result` | [`RequestResult`] | every `request()` completes, success or failure |
//!
//! [`Subscription`]: crate::core::Subscription

mod request;
mod state;

pub use request::{RequestOutcome, RequestResult};
pub use state::{ConnectionState, LifecycleEvent};

use crate::core::methods::session_events as names;
use crate::core::{EventHub, Sender};
use crate::error::{BridgeError, Result};
use crate::transport::WalletTransport;
use alloy::primitives::Address;
use serde_json::Value;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, RwLock};

pub struct SessionEvents {
    pub authorized: EventHub<()>,
    pub disconnected: EventHub<()>,
    pub ready: EventHub<()>,
    pub paused: EventHub<()>,
    pub request_result: EventHub<RequestResult>,
}

impl Default for SessionEvents {
    fn default() -> Self {
        Self {
            authorized: EventHub::new(names::AUTHORIZED),
            disconnected: EventHub::new(names::DISCONNECTED),
            ready: EventHub::new(names::READY),
            paused: EventHub::new(names::PAUSED),
            request_result: EventHub::new(names::REQUEST_RESULT),
        }
    }
}

impl SessionEvents {
    pub fn lifecycle(&self, event: LifecycleEvent) -> &EventHub<()> {
        match event {
            LifecycleEvent::Authorized => &self.authorized,
            LifecycleEvent::Disconnected => &self.disconnected,
            LifecycleEvent::Ready => &self.ready,
            LifecycleEvent::Paused => &self.paused,
        }
    }

    /// Active subscriptions across all five hubs.
    pub fn subscription_count(&self) -> usize {
        LifecycleEvent::ALL.iter().map(|e| self.lifecycle(*e).len()).sum::<usize>() + self.request_result.len()
    }
}

#[derive(Debug, Default)]
struct SessionInner {
    state: ConnectionState,
    selected: Option<Address>,
}

pub struct WalletSession {
    sender: Sender,
    transport: Arc<dyn WalletTransport>,
    inner: RwLock<SessionInner>,
    next_request_id: AtomicU64,
    events: SessionEvents,
}

impl WalletSession {
    pub fn new(transport: Arc<dyn WalletTransport>) -> Self { Self::with_name("wallet-session", transport) }

    pub fn with_name(name: impl AsRef<str>, transport: Arc<dyn WalletTransport>) -> Self {
        Self {
            sender: Sender::new(name),
            transport,
            inner: RwLock::new(SessionInner::default()),
            next_request_id: AtomicU64::new(0),
            events: SessionEvents::default(),
        }
    }

    pub fn sender(&self) -> &Sender { &self.sender }
    pub fn events(&self) -> &SessionEvents { &self.events }
    pub fn subscription_count(&self) -> usize { self.events.subscription_count() }

    pub fn state(&self) -> ConnectionState {
        self.inner.read().map(|g| g.state).unwrap_or_default()
    }

    pub fn selected_address(&self) -> Option<Address> {
        self.inner.read().ok().and_then(|g| g.selected)
    }

    /// Switch the selected account (wallet-side account change).
    pub fn select_address(&self, address: Option<Address>) {
        if let Ok(mut g) = self.inner.write() {
            g.selected = address;
        }
    }

    /// Selected address, or an authorization failure.
    pub fn require_address(&self) -> Result<Address> {
        self.selected_address()
            .ok_or_else(|| BridgeError::Authorization("no wallet address selected".into()))
    }

    /// Ask the transport for accounts and walk connecting → connected → ready.
    /// A session that is already live returns its selected address unchanged.
    ///
    /// A failure drops the session to disconnected; if it was authorized
    /// before (reconnect from paused), `disconnected` is raised.
    pub async fn connect(&self) -> Result<Address> {
        if self.state().is_live() {
            if let Some(address) = self.selected_address() {
                return Ok(address);
            }
        }
        let previous = self.transition(ConnectionState::Connecting)?;
        let accounts = match self.transport.accounts().await {
            Ok(accounts) => accounts,
            Err(e) => {
                tracing::warn!(session = %self.sender, error = %e, "wallet connect failed");
                self.abort_connect(previous);
                return Err(e);
            }
        };
        let Some(address) = accounts.first().copied() else {
            self.abort_connect(previous);
            return Err(BridgeError::Authorization("wallet returned no accounts".into()));
        };
        // Address and state change together; a disconnect during the
        // accounts call leaves nothing selected.
        {
            let mut g = self.inner.write().map_err(|_| BridgeError::State("session lock".into()))?;
            if g.state != ConnectionState::Connecting {
                return Err(BridgeError::State(format!("{} -> {}", g.state, ConnectionState::Connected)));
            }
            g.state = ConnectionState::Connected;
            g.selected = Some(address);
        }
        self.raise(LifecycleEvent::Authorized);
        self.transition(ConnectionState::Ready)?;
        self.raise(LifecycleEvent::Ready);
        tracing::info!(session = %self.sender, %address, "wallet connected");
        Ok(address)
    }

    /// Returns false if the session was already disconnected.
    pub fn disconnect(&self) -> bool {
        {
            let Ok(mut g) = self.inner.write() else { return false };
            if g.state == ConnectionState::Disconnected {
                return false;
            }
            g.state = ConnectionState::Disconnected;
            g.selected = None;
        }
        self.raise(LifecycleEvent::Disconnected);
        true
    }

    pub fn pause(&self) -> Result<()> {
        self.transition(ConnectionState::Paused)?;
        self.raise(LifecycleEvent::Paused);
        Ok(())
    }

    pub fn resume(&self) -> Result<()> {
        if self.state() != ConnectionState::Paused {
            return Err(BridgeError::State(format!("cannot resume from {}", self.state())));
        }
        self.transition(ConnectionState::Ready)?;
        self.raise(LifecycleEvent::Ready);
        Ok(())
    }

    /// Submit a wallet request. The outcome is raised on `request_result`
    /// and also returned to the caller.
    pub async fn request(&self, method: &str, params: Value) -> Result<Value> {
        let id = self.next_request_id.fetch_add(1, Ordering::SeqCst) + 1;
        let state = self.state();
        tracing::info!(session = %self.sender, id, method, "wallet request");
        let result = if state.is_live() {
            self.transport.request(method, params).await
        } else {
            Err(BridgeError::Authorization(format!("wallet session is {}", state)))
        };
        if let Err(ref e) = result {
            tracing::warn!(session = %self.sender, id, method, code = e.code(), error = %e, "wallet request failed");
        }
        let payload = RequestResult { id, method: method.to_string(), outcome: RequestOutcome::from(&result) };
        self.events.request_result.emit(&self.sender, &payload);
        result
    }

    fn raise(&self, event: LifecycleEvent) {
        let n = self.events.lifecycle(event).emit(&self.sender, &());
        tracing::debug!(session = %self.sender, event = event.as_str(), listeners = n, "lifecycle event");
    }

    fn transition(&self, to: ConnectionState) -> Result<ConnectionState> {
        let mut g = self.inner.write().map_err(|_| BridgeError::State("session lock".into()))?;
        let from = g.state;
        if !from.can_transition(to) {
            return Err(BridgeError::State(format!("{} -> {}", from, to)));
        }
        g.state = to;
        tracing::debug!(session = %self.sender, %from, %to, "state transition");
        Ok(from)
    }

    /// Undo a failed `connect`. Only a session still in `Connecting` is
    /// touched; a concurrent `disconnect` has already raised its event.
    fn abort_connect(&self, previous: ConnectionState) {
        let dropped = match self.inner.write() {
            Ok(mut g) if g.state == ConnectionState::Connecting => {
                g.state = ConnectionState::Disconnected;
                g.selected = None;
                true
            }
            _ => false,
        };
        if dropped && previous != ConnectionState::Disconnected {
            self.raise(LifecycleEvent::Disconnected);
        }
    }
}

impl std::fmt::Debug for WalletSession {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WalletSession")
            .field("sender", &self.sender)
            .field("state", &self.state())
            .field("selected", &self.selected_address())
            .finish()
    }
}
