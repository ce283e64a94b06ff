//! Walletbridge: wallet event bridge and request dispatcher.
//!
//! # Architecture
//!
//! ```text
//! WalletBridge (bridge)
//!   │  re-fires session events under neutral names
//!   │  send_transaction() / sign() build requests
//!   │
//!   ├── WalletSession (session)
//!   │     ├── state machine: disconnected → connecting → connected → ready ⇄ paused
//!   │     ├── EventHub per event (core::events)
//!   │     └── WalletTransport (transport)
//!   │           ├── RpcWalletTransport   forwards to a node's accounts
//!   │           └── LocalWalletTransport signs with a local key
//!   │
//!   └── ChainRpc + AbiEncoder (chain)
//!         gas price, blocks, calldata, EIP-712 hashing
//! ```
//!
//! # Usage
//!
//! ```ignore
//! use walletbridge::{BridgeConfig, HdWallet, LocalWalletTransport, WalletBridge, WalletSession};
//! use std::sync::Arc;
//!
//! let wallet = HdWallet::from_phrase("abandon abandon ...")?;
//! let transport = LocalWalletTransport::new(wallet.signer(0)?).with_rpc_url(&config.rpc_url)?;
//! let session = Arc::new(WalletSession::new(Arc::new(transport)));
//! let bridge = WalletBridge::from_config(&BridgeConfig::from_env()?, session)?;
//!
//! bridge.activate();
//! bridge.connect().await?;
//! let hash = bridge.send_transaction().await?;
//! ```

pub mod bridge;
pub mod chain;
pub mod config;
pub mod core;
pub mod error;
pub mod identity;
pub mod logging;
pub mod runtime;
pub mod session;
pub mod transport;

pub use bridge::{BridgeEvents, SignRequest, TransactionRequest, WalletBridge};
pub use chain::{AbiEncoder, BlockSummary, ChainRpc, HttpChainRpc, JsonAbiEncoder};
pub use config::{BridgeConfig, ContractCall};
pub use core::{EventHub, Sender, Subscription};
pub use error::{BridgeError, Result, RpcErrorObject};
pub use identity::{HdAccount, HdWallet, WordCount};
pub use runtime::{install_signal_handlers, Shutdown};
pub use session::{ConnectionState, LifecycleEvent, RequestOutcome, RequestResult, WalletSession};
pub use transport::{DeepLink, LocalWalletTransport, LoggedDeepLink, RecordingTransport, RpcWalletTransport, WalletTransport};
