//! Gateway upload protocol.
//!
//! A gateway accepts `POST <url>` with an [`UploadRequest`] JSON body and
//! answers with a [`GatewayAck`]. The network behind the gateway assigns
//! the secrets version; this side only reads it back.

use std::io::Read;
use std::time::Duration;

use reqwest::blocking::Client;
use reqwest::header::ACCEPT;
use reqwest::redirect::Policy;
use serde::{Deserialize, Serialize};
use tracing::{debug, trace};
use url::Url;

use crate::core::cipher::EncryptedSecrets;
use crate::core::transport::read_limited;
use crate::core::types::{SecretsVersion, SlotId};
use crate::error::{CipherError, DistributionError};

/// Longest gateway error body echoed back into reports.
const MAX_ERROR_BODY: usize = 512;

/// Upper bound on a gateway reply body.
pub const MAX_ACK_BYTES: usize = 64 * 1024;

/// Body of one upload call.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UploadRequest {
    pub slot_id: SlotId,
    pub ttl_minutes: u32,
    pub don_id: String,
    pub signer: String,
    /// Base64 of the sealed envelope.
    pub encrypted_secrets: String,
}

impl UploadRequest {
    /// Build the request for an envelope.
    ///
    /// # Errors
    ///
    /// Returns `CipherError` if the envelope cannot be serialized.
    pub fn new(
        blob: &EncryptedSecrets,
        slot_id: SlotId,
        ttl_minutes: u32,
    ) -> Result<Self, CipherError> {
        Ok(Self {
            slot_id,
            ttl_minutes,
            don_id: blob.don_id.clone(),
            signer: blob.signer.clone(),
            encrypted_secrets: blob.to_base64()?,
        })
    }
}

/// Gateway answer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GatewayAck {
    pub success: bool,
    #[serde(default)]
    pub version: Option<SecretsVersion>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error_message: Option<String>,
}

/// One gateway endpoint.
///
/// Implementations must bound every call with a timeout.
pub trait Gateway: Send + Sync {
    /// Gateway address, for reports.
    fn endpoint(&self) -> &str;

    /// Upload one request and return the version the network assigned.
    ///
    /// # Errors
    ///
    /// Returns a human-readable reason on transport failure, timeout, a
    /// non-2xx status or a rejected upload.
    fn upload(&self, request: &UploadRequest) -> Result<SecretsVersion, String>;
}

/// Gateway reached over HTTP(S).
pub struct HttpGateway {
    url: Url,
    label: String,
    client: Client,
}

impl HttpGateway {
    /// Create a gateway client with a hard per-request timeout.
    ///
    /// # Errors
    ///
    /// Returns `DistributionError::Client` if the HTTP client cannot be built.
    pub fn new(url: Url, timeout: Duration) -> Result<Self, DistributionError> {
        let client = Client::builder()
            .timeout(timeout)
            .connect_timeout(timeout)
            .redirect(Policy::none())
            .user_agent(concat!("position-oracle/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| DistributionError::Client(e.to_string()))?;
        Ok(Self {
            label: url.to_string(),
            url,
            client,
        })
    }
}

impl Gateway for HttpGateway {
    fn endpoint(&self) -> &str {
        &self.label
    }

    fn upload(&self, request: &UploadRequest) -> Result<SecretsVersion, String> {
        debug!(gateway = %self.url, slot = request.slot_id, "uploading secrets");

        let mut response = self
            .client
            .post(self.url.clone())
            .header(ACCEPT, "application/json")
            .json(request)
            .send()
            .map_err(|e| {
                if e.is_timeout() {
                    "request timed out".to_string()
                } else {
                    format!("request failed: {}", e)
                }
            })?;

        let status = response.status().as_u16();
        trace!(gateway = %self.url, status, "gateway responded");
        read_ack(status, &mut response)
    }
}

/// Read a gateway reply of at most [`MAX_ACK_BYTES`] and interpret it.
pub(crate) fn read_ack(status: u16, reply: &mut impl Read) -> Result<SecretsVersion, String> {
    let raw = read_limited(reply, MAX_ACK_BYTES)?;
    let body = String::from_utf8_lossy(&raw);

    if !(200..300).contains(&status) {
        return Err(format!("http {}: {}", status, truncate(&body)));
    }

    let ack: GatewayAck = serde_json::from_str(&body)
        .map_err(|e| format!("malformed gateway response: {}", e))?;
    interpret(ack)
}

/// Turn an acknowledgement into a version or a reason.
pub(crate) fn interpret(ack: GatewayAck) -> Result<SecretsVersion, String> {
    match ack {
        GatewayAck {
            success: true,
            version: Some(version),
            ..
        } => Ok(version),
        GatewayAck { success: true, .. } => Err("gateway accepted without a version".to_string()),
        GatewayAck { error_message, .. } => {
            Err(error_message.unwrap_or_else(|| "upload rejected".to_string()))
        }
    }
}

fn truncate(body: &str) -> &str {
    match body.char_indices().nth(MAX_ERROR_BODY) {
        Some((idx, _)) => &body[..idx],
        None => body,
    }
}
