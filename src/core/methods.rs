//! JSON-RPC method and event name constants
//!
//! Centralized registry for every wallet/chain method the crate sends and
//! every event name it logs.

/// Wallet (EIP-1193) methods
pub mod wallet {
    pub const SEND_TRANSACTION: &str = "eth_sendTransaction";
    pub const SIGN_TYPED_DATA_V4: &str = "eth_signTypedData_v4";
    pub const REQUEST_ACCOUNTS: &str = "eth_requestAccounts";
    pub const ACCOUNTS: &str = "eth_accounts";
    pub const CHAIN_ID: &str = "eth_chainId";

    pub const ALL: &[&str] = &[SEND_TRANSACTION, SIGN_TYPED_DATA_V4, REQUEST_ACCOUNTS, ACCOUNTS, CHAIN_ID];
}

/// Chain RPC methods
pub mod chain {
    pub const GAS_PRICE: &str = "eth_gasPrice";
    pub const GET_BLOCK_BY_NUMBER: &str = "eth_getBlockByNumber";
}

/// Session event names
pub mod session_events {
    pub const AUTHORIZED: &str = "authorized";
    pub const DISCONNECTED: &str = "disconnected";
    pub const READY: &str = "ready";
    pub const PAUSED: &str = "paused";
    pub const REQUEST_RESULT: &str = "request_result";
}

/// Bridge event names
pub mod bridge_events {
    pub const WALLET_CONNECTED: &str = "wallet_connected";
    pub const WALLET_DISCONNECTED: &str = "wallet_disconnected";
    pub const WALLET_READY: &str = "wallet_ready";
    pub const WALLET_PAUSED: &str = "wallet_paused";
    pub const SIGN_SEND: &str = "sign_send";
    pub const TRANSACTION_SENT: &str = "transaction_sent";
    pub const TRANSACTION_RESULT: &str = "transaction_result";
}

/// Default BIP-44 derivation prefix for Ethereum accounts
pub const ETH_DERIVATION_PREFIX: &str = "m/44'/60'/0'/0";
