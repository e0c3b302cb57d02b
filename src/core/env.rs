//! Credential sourcing.
//!
//! The process environment is read exactly once, by the CLI, into an
//! [`Environment`]. Everything below the CLI receives this struct instead of
//! calling `std::env` itself.

use std::fmt;

/// Values sourced from the process environment at startup.
#[derive(Clone, Default)]
pub struct Environment {
    /// Brokerage API key (`ALPACA_API_KEY`).
    pub api_key: String,
    /// Brokerage API secret (`ALPACA_SECRET_KEY`).
    pub api_secret: String,
    /// Brokerage base URL (`ALPACA_API_URL`).
    pub api_url: String,
    /// Hex-encoded ed25519 seed of the signer (`PRIVATE_KEY`).
    pub private_key: Option<String>,
    /// Chain RPC endpoint the signer is bound to (`SEPOLIA_RPC_URL`).
    pub rpc_url: Option<String>,
}

impl fmt::Debug for Environment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Environment")
            .field("api_key", &redact(&self.api_key))
            .field("api_secret", &redact(&self.api_secret))
            .field("api_url", &self.api_url)
            .field("private_key", &self.private_key.as_deref().map(redact))
            .field("rpc_url", &self.rpc_url)
            .finish()
    }
}

fn redact(value: &str) -> &'static str {
    if value.is_empty() {
        "<empty>"
    } else {
        "<redacted>"
    }
}
