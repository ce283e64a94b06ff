//! Chain-side collaborators: RPC provider, ABI encoder, EIP-712 typed data.

mod abi;
mod rpc;
pub mod typed_data;

pub use abi::{AbiEncoder, JsonAbiEncoder};
pub use rpc::{parse_url, BlockSummary, ChainRpc, HttpChainRpc, HttpProvider};
pub(crate) use rpc::map_transport_error;
