//! Sample call and payload used when no other is configured: mint token 3
//! of a Goerli ERC-721 to a fixed recipient, and sign the "Ether Mail"
//! EIP-712 message.

use alloy::primitives::{address, Address};

pub const GOERLI_RPC_URL: &str = "https://goerli.infura.io/v3/ADD_API_KEY";

pub const CONTRACT_ADDRESS: Address = address!("0x8A1643ABfd117E27CB59E4406c05834f3b1f305E");
pub const MINT_METHOD: &str = "safeMint";
pub const MINT_RECIPIENT: &str = "0xE51995Cdb3b1c109E0e6E67ab5aB31CDdBB83E4a";
pub const MINT_TOKEN_ID: &str = "3";

pub const ERC721_ABI: &str = include_str!("../../assets/erc721_abi.json");
pub const MAIL_TYPED_DATA: &str = include_str!("../../assets/mail_typed_data.json");

pub const METAMASK_DEEP_LINK: &str = "https://metamask.app.link/dapp/";
