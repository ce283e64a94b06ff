//! Identity - BIP-39 mnemonic and BIP-44 Ethereum accounts.
//!
//! The phrase is zeroized on drop; derived keys are only exposed through
//! [`HdAccount`] and [`HdWallet::signer`].

use crate::core::methods::ETH_DERIVATION_PREFIX;
use crate::error::{BridgeError, Result};
use alloy::primitives::Address;
use alloy_signer_local::coins_bip39::English;
use alloy_signer_local::{MnemonicBuilder, PrivateKeySigner};
use rand::RngCore;
use serde::Serialize;
use zeroize::{Zeroize, Zeroizing};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum WordCount {
    #[default]
    Twelve,
    Fifteen,
    Eighteen,
    TwentyOne,
    TwentyFour,
}

impl WordCount {
    pub fn words(self) -> usize {
        match self {
            WordCount::Twelve => 12,
            WordCount::Fifteen => 15,
            WordCount::Eighteen => 18,
            WordCount::TwentyOne => 21,
            WordCount::TwentyFour => 24,
        }
    }

    pub fn from_words(n: usize) -> Option<Self> {
        match n {
            12 => Some(WordCount::Twelve),
            15 => Some(WordCount::Fifteen),
            18 => Some(WordCount::Eighteen),
            21 => Some(WordCount::TwentyOne),
            24 => Some(WordCount::TwentyFour),
            _ => None,
        }
    }

    /// 32 bits of entropy per 3 words.
    fn entropy_len(self) -> usize { self.words() * 4 / 3 }
}

/// One derived account. `public_key` is the uncompressed SEC1 point, hex.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct HdAccount {
    pub index: u32,
    pub path: String,
    pub address: Address,
    pub public_key: String,
    pub private_key: String,
}

pub struct HdWallet {
    phrase: Zeroizing<String>,
}

impl HdWallet {
    /// Fresh English mnemonic from OS randomness.
    pub fn generate(words: WordCount) -> Result<Self> {
        let mut entropy = vec![0u8; words.entropy_len()];
        rand::rngs::OsRng.fill_bytes(&mut entropy);
        let mnemonic = bip39::Mnemonic::from_entropy(&entropy);
        entropy.zeroize();
        let mnemonic = mnemonic.map_err(|e| BridgeError::Config(format!("mnemonic: {e}")))?;
        Ok(Self { phrase: Zeroizing::new(mnemonic.to_string()) })
    }

    pub fn from_phrase(phrase: &str) -> Result<Self> {
        let mnemonic = bip39::Mnemonic::parse_in_normalized(bip39::Language::English, phrase.trim())
            .map_err(|e| BridgeError::Config(format!("mnemonic: {e}")))?;
        Ok(Self { phrase: Zeroizing::new(mnemonic.to_string()) })
    }

    pub fn phrase(&self) -> &str { &self.phrase }

    pub fn word_count(&self) -> usize { self.phrase.split_whitespace().count() }

    pub fn path(index: u32) -> String { format!("{ETH_DERIVATION_PREFIX}/{index}") }

    pub fn signer(&self, index: u32) -> Result<PrivateKeySigner> {
        MnemonicBuilder::<English>::default()
            .phrase(self.phrase.as_str())
            .derivation_path(Self::path(index))
            .map_err(|e| BridgeError::Config(format!("derivation path: {e}")))?
            .build()
            .map_err(|e| BridgeError::Config(format!("derive account {index}: {e}")))
    }

    pub fn account(&self, index: u32) -> Result<HdAccount> {
        let signer = self.signer(index)?;
        let key = signer.credential();
        let public_key = key.verifying_key().to_encoded_point(false);
        Ok(HdAccount {
            index,
            path: Self::path(index),
            address: signer.address(),
            public_key: hex::encode(public_key.as_bytes()),
            private_key: hex::encode(key.to_bytes()),
        })
    }
}

impl std::fmt::Debug for HdWallet {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HdWallet").field("words", &self.word_count()).finish_non_exhaustive()
    }
}
