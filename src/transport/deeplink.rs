//! Deep links into a mobile wallet app.

use crate::error::{BridgeError, Result};
use url::Url;

pub trait DeepLink: Send + Sync {
    /// Open the wallet app and return the URL that was opened.
    fn open(&self) -> Result<String>;
}

/// Builds `{base}{target}` and reports it through tracing; the host decides
/// how to hand the URL to the OS.
#[derive(Debug, Clone)]
pub struct LoggedDeepLink {
    url: Url,
}

impl LoggedDeepLink {
    pub fn new(base: &str, target: &str) -> Result<Self> {
        let raw = format!("{base}{}", target.trim_start_matches("https://").trim_start_matches("http://"));
        let url = Url::parse(&raw).map_err(|e| BridgeError::Config(format!("invalid deep link {raw:?}: {e}")))?;
        Ok(Self { url })
    }

    pub fn url(&self) -> &Url { &self.url }
}

impl DeepLink for LoggedDeepLink {
    fn open(&self) -> Result<String> {
        tracing::info!(url = %self.url, "open wallet deep link");
        Ok(self.url.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bridge::fixtures::METAMASK_DEEP_LINK;

    #[test]
    fn builds_dapp_link() {
        let link = LoggedDeepLink::new(METAMASK_DEEP_LINK, "https://example.org/mint").unwrap();
        assert_eq!(link.open().unwrap(), "https://metamask.app.link/dapp/example.org/mint");
    }

    #[test]
    fn rejects_bad_base() {
        assert_eq!(LoggedDeepLink::new("::", "x").unwrap_err().code(), "config");
    }
}
