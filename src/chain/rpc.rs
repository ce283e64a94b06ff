//! Chain RPC provider over HTTP JSON-RPC.

use crate::core::methods::chain as methods;
use crate::error::{BridgeError, Result};
use alloy::providers::fillers::{BlobGasFiller, ChainIdFiller, FillProvider, GasFiller, JoinFill, NonceFiller};
use alloy::providers::{Identity, Provider, ProviderBuilder, RootProvider};
use alloy::rpc::types::{BlockId, BlockNumberOrTag};
use alloy::transports::TransportError;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use url::Url;

pub type HttpProvider = FillProvider<
    JoinFill<Identity, JoinFill<GasFiller, JoinFill<BlobGasFiller, JoinFill<NonceFiller, ChainIdFiller>>>>,
    RootProvider,
>;

/// Latest-block view returned by [`ChainRpc::block`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BlockSummary {
    pub number: u64,
    pub hash: String,
    pub timestamp: u64,
    pub gas_limit: u64,
    pub gas_used: u64,
    pub base_fee_per_gas: Option<u64>,
    pub transaction_count: usize,
}

#[async_trait]
pub trait ChainRpc: Send + Sync {
    async fn block(&self) -> Result<BlockSummary>;
    /// Current gas price in wei.
    async fn gas_price(&self) -> Result<u128>;
}

pub fn parse_url(url: &str) -> Result<Url> {
    Url::parse(url).map_err(|e| BridgeError::Config(format!("invalid rpc url {url:?}: {e}")))
}

/// Node error responses become `Rejected` with the node's code; everything
/// else means the endpoint could not be reached or answered garbage.
pub(crate) fn map_transport_error(err: TransportError, method: &str) -> BridgeError {
    if let Some(payload) = err.as_error_resp() {
        return BridgeError::rejected(payload.code, payload.message.to_string());
    }
    BridgeError::Connectivity(format!("{method}: {err}"))
}

#[derive(Clone, Debug)]
pub struct HttpChainRpc {
    url: Url,
    provider: HttpProvider,
}

impl HttpChainRpc {
    pub fn new(url: &str) -> Result<Self> {
        let url = parse_url(url)?;
        let provider = ProviderBuilder::new().on_http(url.clone());
        Ok(Self { url, provider })
    }

    pub fn url(&self) -> &Url { &self.url }
    pub fn provider(&self) -> &HttpProvider { &self.provider }
}

#[async_trait]
impl ChainRpc for HttpChainRpc {
    async fn block(&self) -> Result<BlockSummary> {
        let block = self
            .provider
            .get_block(BlockId::from(BlockNumberOrTag::Latest))
            .await
            .map_err(|e| map_transport_error(e, methods::GET_BLOCK_BY_NUMBER))?
            .ok_or_else(|| BridgeError::Connectivity(format!("{}: node returned no block", methods::GET_BLOCK_BY_NUMBER)))?;
        let header = &block.header;
        Ok(BlockSummary {
            number: header.number,
            hash: format!("0x{}", hex::encode(header.hash)),
            timestamp: header.timestamp,
            gas_limit: header.gas_limit,
            gas_used: header.gas_used,
            base_fee_per_gas: header.base_fee_per_gas,
            transaction_count: block.transactions.len(),
        })
    }

    async fn gas_price(&self) -> Result<u128> {
        let price = self.provider.get_gas_price().await.map_err(|e| map_transport_error(e, methods::GAS_PRICE))?;
        tracing::debug!(url = %self.url, price, "gas price");
        Ok(price)
    }
}
