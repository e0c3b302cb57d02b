//! Encrypted secrets envelope.
//!
//! The envelope is what leaves the machine: age ciphertext plus the signer
//! identity, a signature over the ciphertext, and the target network id. It
//! contains no plaintext and can be logged or stored freely.

use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use super::signer;
use crate::core::constants::ENVELOPE_VERSION;
use crate::error::CipherError;

/// Encrypted secrets tied to a signer and a network.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EncryptedSecrets {
    version: String,
    /// Target network identifier.
    pub don_id: String,
    /// Hex ed25519 public key of the signer.
    pub signer: String,
    /// Hex ed25519 signature over [`EncryptedSecrets::signed_message`].
    pub signature: String,
    /// ASCII-armored age ciphertext.
    pub ciphertext: String,
}

impl EncryptedSecrets {
    pub(crate) fn new(don_id: String, signer: String, signature: String, ciphertext: String) -> Self {
        Self {
            version: ENVELOPE_VERSION.to_string(),
            don_id,
            signer,
            signature,
            ciphertext,
        }
    }

    /// Bytes covered by the signature.
    ///
    /// The network id is bound in so a blob signed for one network cannot
    /// be replayed to another.
    pub fn signed_message(don_id: &str, ciphertext: &str) -> Vec<u8> {
        let mut message = Vec::with_capacity(don_id.len() + 1 + ciphertext.len());
        message.extend_from_slice(don_id.as_bytes());
        message.push(0);
        message.extend_from_slice(ciphertext.as_bytes());
        message
    }

    /// Check the signature against the embedded signer identity.
    ///
    /// # Errors
    ///
    /// Returns `CipherError::BadSignature` if verification fails.
    pub fn verify(&self) -> Result<(), CipherError> {
        signer::verify(
            &self.signer,
            &Self::signed_message(&self.don_id, &self.ciphertext),
            &self.signature,
        )
    }

    /// SHA-256 of the ciphertext, hex-encoded.
    pub fn fingerprint(&self) -> String {
        hex::encode(Sha256::digest(self.ciphertext.as_bytes()))
    }

    /// Serialize the envelope to a JSON string.
    ///
    /// # Errors
    ///
    /// Returns `CipherError::EncryptionFailed` if serialization fails.
    pub fn seal(&self) -> Result<String, CipherError> {
        serde_json::to_string(self).map_err(|e| {
            CipherError::EncryptionFailed(format!("failed to serialize envelope: {}", e))
        })
    }

    /// Base64 of the sealed envelope, the form gateways accept.
    ///
    /// # Errors
    ///
    /// Returns `CipherError::EncryptionFailed` if serialization fails.
    pub fn to_base64(&self) -> Result<String, CipherError> {
        Ok(BASE64.encode(self.seal()?))
    }

    /// Parse a sealed envelope.
    ///
    /// Returns `None` for anything that is not a JSON envelope of this
    /// format version.
    pub fn parse(sealed: &str) -> Option<Self> {
        let envelope: Self = serde_json::from_str(sealed).ok()?;
        if envelope.version == ENVELOPE_VERSION {
            Some(envelope)
        } else {
            None
        }
    }

    /// Parse the base64 form produced by [`EncryptedSecrets::to_base64`].
    pub fn from_base64(encoded: &str) -> Option<Self> {
        let raw = BASE64.decode(encoded.trim()).ok()?;
        Self::parse(std::str::from_utf8(&raw).ok()?)
    }
}
