//! Signer identity.
//!
//! The provisioning signer is an ed25519 key. Its public half is the signer
//! identity the network checks before accepting an upload.

use std::fmt;

use ed25519_dalek::{Signature, Signer as _, SigningKey, VerifyingKey};

use crate::core::env::Environment;
use crate::core::validation::validate_endpoint;
use crate::error::{CipherError, CredentialError};

/// Provisioning signer backed by an ed25519 key.
pub struct Signer {
    key: SigningKey,
    rpc_url: Option<String>,
}

impl Signer {
    /// Build the signer from a 32-byte hex seed, `0x` prefix optional.
    ///
    /// # Errors
    ///
    /// Returns `CredentialError::InvalidSignerKey` if the seed is not 64 hex
    /// digits.
    pub fn from_hex(seed: &str) -> Result<Self, CredentialError> {
        let trimmed = seed.trim();
        let digits = trimmed.strip_prefix("0x").unwrap_or(trimmed);
        let raw = zeroize::Zeroizing::new(
            hex::decode(digits).map_err(|e| CredentialError::InvalidSignerKey(e.to_string()))?,
        );
        let bytes: &[u8; 32] = raw.as_slice().try_into().map_err(|_| {
            CredentialError::InvalidSignerKey(format!("expected 32 bytes, got {}", raw.len()))
        })?;

        Ok(Self {
            key: SigningKey::from_bytes(bytes),
            rpc_url: None,
        })
    }

    /// Build the signer from `PRIVATE_KEY`, bound to `SEPOLIA_RPC_URL` if set.
    ///
    /// # Errors
    ///
    /// Returns `CredentialError::Missing` when no private key is set and
    /// `CredentialError::InvalidSignerKey` for a malformed key or RPC URL.
    pub fn from_environment(env: &Environment) -> Result<Self, CredentialError> {
        let seed = env
            .private_key
            .as_deref()
            .filter(|s| !s.trim().is_empty())
            .ok_or(CredentialError::Missing("privateKey"))?;
        let mut signer = Self::from_hex(seed)?;

        if let Some(rpc) = env.rpc_url.as_deref().filter(|s| !s.trim().is_empty()) {
            validate_endpoint("rpc_url", rpc)
                .map_err(|e| CredentialError::InvalidSignerKey(e.to_string()))?;
            signer.rpc_url = Some(rpc.to_string());
        }

        Ok(signer)
    }

    /// Hex-encoded public key.
    pub fn identity(&self) -> String {
        hex::encode(self.key.verifying_key().as_bytes())
    }

    /// RPC endpoint this signer was configured with.
    pub fn rpc_url(&self) -> Option<&str> {
        self.rpc_url.as_deref()
    }

    pub(crate) fn sign(&self, message: &[u8]) -> Signature {
        self.key.sign(message)
    }
}

impl fmt::Debug for Signer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Signer")
            .field("identity", &self.identity())
            .field("rpc_url", &self.rpc_url)
            .finish()
    }
}

/// Verify a hex signature from a hex signer identity.
///
/// # Errors
///
/// Returns `CipherError::BadSignature` if either value is malformed or the
/// signature does not match.
pub fn verify(identity: &str, message: &[u8], signature: &str) -> Result<(), CipherError> {
    let bad = || CipherError::BadSignature(identity.to_string());

    let key_bytes: [u8; 32] = hex::decode(identity)
        .ok()
        .and_then(|b| b.try_into().ok())
        .ok_or_else(bad)?;
    let sig_bytes: [u8; 64] = hex::decode(signature)
        .ok()
        .and_then(|b| b.try_into().ok())
        .ok_or_else(bad)?;

    let key = VerifyingKey::from_bytes(&key_bytes).map_err(|_| bad())?;
    key.verify_strict(message, &Signature::from_bytes(&sig_bytes))
        .map_err(|_| bad())
}
