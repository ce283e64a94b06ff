//! Wallet transports - where a session's requests actually go
//!
//! | Transport | Backend |
//! |-----------|---------|
//! | [`RpcWalletTransport`] | JSON-RPC node with unlocked accounts (anvil, geth --dev) |
//! | [`LocalWalletTransport`] | in-process private key, broadcasts through an RPC URL |
//! | [`RecordingTransport`] | scripted responses, records every request |

mod deeplink;
mod local;
mod recording;
mod rpc;

pub use deeplink::{DeepLink, LoggedDeepLink};
pub use local::LocalWalletTransport;
pub use recording::{RecordedRequest, RecordingTransport};
pub use rpc::RpcWalletTransport;

use crate::error::Result;
use alloy::primitives::Address;
use async_trait::async_trait;
use serde_json::Value;

#[async_trait]
pub trait WalletTransport: Send + Sync {
    /// Accounts the wallet authorizes, selected account first.
    async fn accounts(&self) -> Result<Vec<Address>>;
    /// Generic EIP-1193 `request({method, params})`.
    async fn request(&self, method: &str, params: Value) -> Result<Value>;
}
