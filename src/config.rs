//! Bridge configuration - passed from higher layers or read from the environment

use crate::bridge::fixtures;
use crate::error::{BridgeError, Result};
use alloy::primitives::Address;
use std::path::Path;

pub const ENV_RPC_URL: &str = "WALLETBRIDGE_RPC_URL";
pub const ENV_CONTRACT: &str = "WALLETBRIDGE_CONTRACT";
pub const ENV_DEEP_LINK: &str = "WALLETBRIDGE_DEEP_LINK";

/// A contract method invocation: target, ABI, method name and string arguments.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContractCall {
    pub address: Address,
    pub abi_json: String,
    pub method: String,
    pub args: Vec<String>,
}

impl ContractCall {
    pub fn new(address: Address, abi_json: impl Into<String>, method: impl Into<String>) -> Self {
        Self { address, abi_json: abi_json.into(), method: method.into(), args: Vec::new() }
    }
    pub fn with_args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.args = args.into_iter().map(Into::into).collect();
        self
    }
    pub fn with_address(mut self, address: Address) -> Self { self.address = address; self }

    /// `safeMint(0xE519…3E4a, 3)` on the sample ERC-721.
    pub fn sample_mint() -> Self {
        Self::new(fixtures::CONTRACT_ADDRESS, fixtures::ERC721_ABI, fixtures::MINT_METHOD)
            .with_args([fixtures::MINT_RECIPIENT, fixtures::MINT_TOKEN_ID])
    }
}

/// Bridge configuration. Defaults are the sample endpoint, call and payload.
#[derive(Debug, Clone)]
pub struct BridgeConfig {
    pub name: String,
    pub rpc_url: String,
    pub contract_call: ContractCall,
    pub typed_data: String,
    pub deep_link_base: String,
    /// Dapp URL opened through the deep link; none disables the deep link.
    pub deep_link_target: Option<String>,
}

impl Default for BridgeConfig {
    fn default() -> Self {
        Self {
            name: "wallet-bridge".into(),
            rpc_url: fixtures::GOERLI_RPC_URL.into(),
            contract_call: ContractCall::sample_mint(),
            typed_data: fixtures::MAIL_TYPED_DATA.into(),
            deep_link_base: fixtures::METAMASK_DEEP_LINK.into(),
            deep_link_target: None,
        }
    }
}

impl BridgeConfig {
    pub fn new() -> Self { Self::default() }
    pub fn with_name(mut self, name: impl Into<String>) -> Self { self.name = name.into(); self }
    pub fn with_rpc_url(mut self, url: impl Into<String>) -> Self { self.rpc_url = url.into(); self }
    pub fn with_contract_call(mut self, call: ContractCall) -> Self { self.contract_call = call; self }
    pub fn with_typed_data(mut self, json: impl Into<String>) -> Self { self.typed_data = json.into(); self }
    pub fn with_deep_link_base(mut self, base: impl Into<String>) -> Self { self.deep_link_base = base.into(); self }
    pub fn with_deep_link_target(mut self, target: impl Into<String>) -> Self { self.deep_link_target = Some(target.into()); self }

    /// Defaults overridden by `WALLETBRIDGE_RPC_URL`, `WALLETBRIDGE_CONTRACT`
    /// (contract address) and `WALLETBRIDGE_DEEP_LINK` (dapp URL).
    pub fn from_env() -> Result<Self> {
        Self::new().apply_env()
    }

    pub fn apply_env(mut self) -> Result<Self> {
        if let Some(url) = env_value(ENV_RPC_URL) {
            self.rpc_url = url;
        }
        if let Some(contract) = env_value(ENV_CONTRACT) {
            let address = contract
                .parse::<Address>()
                .map_err(|e| BridgeError::Config(format!("{ENV_CONTRACT}: {e}")))?;
            self.contract_call = self.contract_call.with_address(address);
        }
        if let Some(target) = env_value(ENV_DEEP_LINK) {
            self.deep_link_target = Some(target);
        }
        Ok(self)
    }
}

fn env_value(key: &str) -> Option<String> {
    std::env::var(key).ok().map(|v| v.trim().to_string()).filter(|v| !v.is_empty())
}

/// Load `KEY=value` lines from a dotenv file without overriding variables
/// already set. Returns the number of variables set; a missing file is 0.
pub fn load_dotenv(path: impl AsRef<Path>) -> usize {
    let Ok(contents) = std::fs::read_to_string(path) else {
        return 0;
    };
    let mut set = 0;
    for line in contents.lines() {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }
        let line = line.strip_prefix("export ").unwrap_or(line);
        if let Some((key, value)) = line.split_once('=') {
            let key = key.trim();
            let value = value.trim().trim_matches('"');
            if !key.is_empty() && !value.is_empty() && std::env::var(key).is_err() {
                std::env::set_var(key, value);
                set += 1;
            }
        }
    }
    set
}
