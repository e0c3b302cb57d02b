//! Configuration file management.
//!
//! Handles reading and validating `oracle.toml`. The file is optional: every
//! field has a default, and provisioning checks separately that recipients
//! and gateways were actually configured.

use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;
use tracing::debug;

use crate::core::constants;
use crate::core::types::{DonId, PublicKey, SlotId};
use crate::core::validation::{validate_endpoint, validate_header_name};
use crate::error::{ConfigError, Result};

/// Project configuration stored in `oracle.toml`
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Config {
    /// Target network and its gateways
    #[serde(default)]
    pub network: NetworkConfig,
    /// Slot addressing for uploaded secrets
    #[serde(default)]
    pub secrets: SecretsConfig,
    /// Upstream brokerage request settings
    #[serde(default)]
    pub source: SourceConfig,
}

/// Network section.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct NetworkConfig {
    /// Network identifier
    pub don_id: DonId,
    /// On-chain router address, informational
    pub router_address: Option<String>,
    /// age public keys of the network's threshold key material
    pub recipients: Vec<PublicKey>,
    /// Gateway URLs secrets are uploaded to
    pub gateways: Vec<String>,
    /// Acknowledgements required; strict majority when unset
    pub quorum: Option<usize>,
    /// Per-gateway request timeout
    pub gateway_timeout_ms: u64,
}

impl Default for NetworkConfig {
    fn default() -> Self {
        Self {
            don_id: "fun-ethereum-sepolia-1".to_string(),
            router_address: None,
            recipients: Vec::new(),
            gateways: Vec::new(),
            quorum: None,
            gateway_timeout_ms: constants::DEFAULT_GATEWAY_TIMEOUT_MS,
        }
    }
}

impl NetworkConfig {
    /// Acknowledgements needed for a successful upload.
    pub fn quorum(&self) -> usize {
        self.quorum.unwrap_or(self.gateways.len() / 2 + 1)
    }

    /// Per-gateway timeout as a `Duration`.
    pub fn gateway_timeout(&self) -> Duration {
        Duration::from_millis(self.gateway_timeout_ms)
    }
}

/// Secrets section.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SecretsConfig {
    /// Slot the secrets are written to
    pub slot_id: SlotId,
    /// Lifetime of uploaded secrets
    pub ttl_minutes: u32,
}

impl Default for SecretsConfig {
    fn default() -> Self {
        Self {
            slot_id: 0,
            ttl_minutes: constants::DEFAULT_TTL_MINUTES,
        }
    }
}

/// Source section.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SourceConfig {
    /// Header carrying the API key
    pub key_header: String,
    /// Header carrying the API secret
    pub secret_header: String,
    /// Upstream request timeout
    pub timeout_ms: u64,
}

impl Default for SourceConfig {
    fn default() -> Self {
        Self {
            key_header: constants::DEFAULT_KEY_HEADER.to_string(),
            secret_header: constants::DEFAULT_SECRET_HEADER.to_string(),
            timeout_ms: constants::DEFAULT_FETCH_TIMEOUT_MS,
        }
    }
}

impl SourceConfig {
    /// Upstream timeout as a `Duration`.
    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }
}

impl Config {
    /// Load configuration, falling back to defaults if the file is absent
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::ReadFile` or `ConfigError::Parse` for an
    /// unreadable or malformed file, and validation errors otherwise.
    pub fn load(path: &Path) -> Result<Self> {
        debug!(path = %path.display(), "loading config");

        let config = if path.exists() {
            let contents = std::fs::read_to_string(path).map_err(ConfigError::ReadFile)?;
            toml::from_str(&contents).map_err(ConfigError::Parse)?
        } else {
            debug!("no config file, using defaults");
            Self::default()
        };

        debug!(
            gateways = config.network.gateways.len(),
            recipients = config.network.recipients.len(),
            slot = config.secrets.slot_id,
            "config loaded"
        );

        config.validate()?;
        Ok(config)
    }

    /// Validate the configuration structure and contents
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::InvalidValue` or `ConfigError::MissingField` on validation failure.
    pub fn validate(&self) -> Result<()> {
        use crate::core::cipher;

        debug!("validating config");

        if self.network.don_id.trim().is_empty() {
            return Err(ConfigError::MissingField { field: "network.don_id" }.into());
        }

        if let Some(address) = &self.network.router_address {
            let digits = address.strip_prefix("0x").unwrap_or("");
            if digits.len() != 40 || !digits.chars().all(|c| c.is_ascii_hexdigit()) {
                return Err(ConfigError::InvalidValue {
                    field: "network.router_address",
                    reason: format!("not a 20-byte hex address: {}", address),
                }
                .into());
            }
        }

        for key in &self.network.recipients {
            if cipher::parse_recipient(key).is_err() {
                return Err(ConfigError::InvalidValue {
                    field: "network.recipients",
                    reason: format!("invalid age public key: {}", key),
                }
                .into());
            }
        }

        for gateway in &self.network.gateways {
            validate_endpoint("network.gateways", gateway)?;
        }

        if let Some(quorum) = self.network.quorum {
            if quorum == 0 || quorum > self.network.gateways.len().max(1) {
                return Err(ConfigError::InvalidValue {
                    field: "network.quorum",
                    reason: format!(
                        "{} is outside 1..={} gateways",
                        quorum,
                        self.network.gateways.len()
                    ),
                }
                .into());
            }
        }

        if self.network.gateway_timeout_ms == 0 {
            return Err(ConfigError::InvalidValue {
                field: "network.gateway_timeout_ms",
                reason: "must be greater than zero".to_string(),
            }
            .into());
        }

        if self.secrets.ttl_minutes == 0 {
            return Err(ConfigError::InvalidValue {
                field: "secrets.ttl_minutes",
                reason: "must be greater than zero".to_string(),
            }
            .into());
        }

        validate_header_name("source.key_header", &self.source.key_header)?;
        validate_header_name("source.secret_header", &self.source.secret_header)?;

        if self.source.timeout_ms == 0 {
            return Err(ConfigError::InvalidValue {
                field: "source.timeout_ms",
                reason: "must be greater than zero".to_string(),
            }
            .into());
        }

        Ok(())
    }

    /// Check the fields provisioning cannot run without
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::MissingField` when no recipients or gateways
    /// are configured.
    pub fn require_provisioning(&self) -> Result<()> {
        if self.network.recipients.is_empty() {
            return Err(ConfigError::MissingField {
                field: "network.recipients",
            }
            .into());
        }
        if self.network.gateways.is_empty() {
            return Err(ConfigError::MissingField {
                field: "network.gateways",
            }
            .into());
        }
        Ok(())
    }
}
