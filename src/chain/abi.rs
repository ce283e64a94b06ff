//! Contract call data from a JSON ABI and string arguments.

use crate::error::{BridgeError, Result};
use alloy::dyn_abi::{DynSolValue, JsonAbiExt, Specifier};
use alloy::json_abi::{Function, JsonAbi};
use alloy::primitives::Bytes;

pub trait AbiEncoder: Send + Sync {
    /// Selector followed by the ABI-encoded arguments.
    fn calldata(&self, abi_json: &str, method: &str, args: &[String]) -> Result<Bytes>;
}

/// Encoder backed by alloy's dynamic ABI support. String arguments are
/// coerced to each parameter's Solidity type (`"3"` → `uint256`, hex → `address`, ...).
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonAbiEncoder;

impl AbiEncoder for JsonAbiEncoder {
    fn calldata(&self, abi_json: &str, method: &str, args: &[String]) -> Result<Bytes> {
        let abi: JsonAbi =
            serde_json::from_str(abi_json).map_err(|e| BridgeError::Encoding(format!("invalid ABI: {e}")))?;
        let function = select_function(&abi, method, args.len())?;
        let values = coerce_args(function, args)?;
        let data = function
            .abi_encode_input(&values)
            .map_err(|e| BridgeError::Encoding(format!("{}: {e}", function.signature())))?;
        tracing::debug!(signature = %function.signature(), bytes = data.len(), "encoded calldata");
        Ok(Bytes::from(data))
    }
}

/// Pick the overload of `method` taking exactly `arity` inputs.
fn select_function<'a>(abi: &'a JsonAbi, method: &str, arity: usize) -> Result<&'a Function> {
    let Some(overloads) = abi.function(method) else {
        let mut available: Vec<&str> = abi.functions.keys().map(String::as_str).collect();
        available.sort_unstable();
        return Err(BridgeError::Encoding(format!(
            "function '{method}' not found in ABI (available: {})",
            available.join(", ")
        )));
    };
    overloads.iter().find(|f| f.inputs.len() == arity).ok_or_else(|| {
        let arities: Vec<String> = overloads.iter().map(|f| f.inputs.len().to_string()).collect();
        BridgeError::Encoding(format!(
            "function '{method}' expects {} arguments, got {arity}",
            arities.join(" or ")
        ))
    })
}

fn coerce_args(function: &Function, args: &[String]) -> Result<Vec<DynSolValue>> {
    function
        .inputs
        .iter()
        .zip(args)
        .map(|(param, arg)| {
            let ty = param
                .resolve()
                .map_err(|e| BridgeError::Encoding(format!("parameter '{}': {e}", param.name)))?;
            ty.coerce_str(arg).map_err(|e| {
                BridgeError::Encoding(format!("argument '{}' = {arg:?} is not a valid {}: {e}", param.name, param.ty))
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bridge::fixtures::{ERC721_ABI, MINT_RECIPIENT};
    use alloy::primitives::{keccak256, Address, U256};

    fn args(values: &[&str]) -> Vec<String> { values.iter().map(|s| s.to_string()).collect() }

    #[test]
    fn encodes_safe_mint() {
        let data = JsonAbiEncoder.calldata(ERC721_ABI, "safeMint", &args(&[MINT_RECIPIENT, "3"])).unwrap();
        assert_eq!(data.len(), 4 + 32 * 2);
        assert_eq!(&data[..4], &keccak256("safeMint(address,uint256)")[..4]);

        let recipient: Address = MINT_RECIPIENT.parse().unwrap();
        assert_eq!(&data[4 + 12..4 + 32], recipient.as_slice());
        assert_eq!(U256::from_be_slice(&data[36..68]), U256::from(3));
    }

    #[test]
    fn picks_overload_by_arity() {
        let from = "0x0000000000000000000000000000000000000001";
        let three = JsonAbiEncoder.calldata(ERC721_ABI, "safeTransferFrom", &args(&[from, MINT_RECIPIENT, "1"])).unwrap();
        let four = JsonAbiEncoder
            .calldata(ERC721_ABI, "safeTransferFrom", &args(&[from, MINT_RECIPIENT, "1", "0x"]))
            .unwrap();
        assert_eq!(&three[..4], &keccak256("safeTransferFrom(address,address,uint256)")[..4]);
        assert_eq!(&four[..4], &keccak256("safeTransferFrom(address,address,uint256,bytes)")[..4]);
    }

    #[test]
    fn unknown_method_is_encoding_error() {
        let err = JsonAbiEncoder.calldata(ERC721_ABI, "burn", &args(&["1"])).unwrap_err();
        assert_eq!(err.code(), "encoding");
        assert!(err.to_string().contains("safeMint"));
    }

    #[test]
    fn wrong_arity_and_bad_argument() {
        let err = JsonAbiEncoder.calldata(ERC721_ABI, "safeMint", &args(&[MINT_RECIPIENT])).unwrap_err();
        assert!(err.to_string().contains("expects 2 arguments"));

        let err = JsonAbiEncoder.calldata(ERC721_ABI, "safeMint", &args(&["not-an-address", "3"])).unwrap_err();
        assert_eq!(err.code(), "encoding");
    }

    #[test]
    fn malformed_abi() {
        let err = JsonAbiEncoder.calldata("{not json", "safeMint", &[]).unwrap_err();
        assert_eq!(err.code(), "encoding");
    }
}
