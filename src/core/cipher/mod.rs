//! Secret encryption.
//!
//! Secrets are encrypted with age to the network's x25519 key material, then
//! the ciphertext is signed by the provisioning signer. The result is an
//! [`EncryptedSecrets`] envelope ready for distribution.

use ::age::x25519;
use tracing::{debug, info};
use zeroize::Zeroizing;

use crate::core::bundle::SecretBundle;
use crate::core::types::DonId;
use crate::error::CipherError;

mod age;
mod envelope;
mod signer;

pub use age::{parse_recipient, Age};
pub use envelope::EncryptedSecrets;
pub use signer::Signer;

/// Cryptographic backend trait.
///
/// Abstracts encryption and decryption so the envelope logic does not
/// depend on a particular scheme.
pub trait Cipher {
    /// Type representing a recipient public key.
    type Recipient;

    /// Type representing a private identity/key.
    type Identity;

    /// Encrypt plaintext for multiple recipients.
    ///
    /// # Errors
    ///
    /// Returns `CipherError` if encryption fails.
    fn encrypt(&self, plaintext: &[u8], recipients: &[Self::Recipient])
        -> Result<String, CipherError>;

    /// Decrypt an encrypted string using a private identity.
    ///
    /// # Errors
    ///
    /// Returns `CipherError` if decryption fails.
    fn decrypt(
        &self,
        encrypted: &str,
        identity: &Self::Identity,
    ) -> Result<Zeroizing<Vec<u8>>, CipherError>;

    /// Backend name for display/config.
    fn name(&self) -> &'static str;
}

/// The network's public encryption material.
pub struct NetworkKey {
    don_id: DonId,
    recipients: Vec<x25519::Recipient>,
}

impl NetworkKey {
    /// Parse the network's recipient keys.
    ///
    /// # Errors
    ///
    /// Returns `CipherError::NoRecipients` for an empty key list and
    /// `CipherError::InvalidPublicKey` for a malformed key.
    pub fn new(don_id: impl Into<DonId>, keys: &[String]) -> Result<Self, CipherError> {
        let don_id = don_id.into();
        if keys.is_empty() {
            return Err(CipherError::NoRecipients(don_id));
        }
        let recipients = keys
            .iter()
            .map(|k| parse_recipient(k))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self { don_id, recipients })
    }

    /// Network identifier.
    pub fn don_id(&self) -> &str {
        &self.don_id
    }
}

impl std::fmt::Debug for NetworkKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("NetworkKey")
            .field("don_id", &self.don_id)
            .field("recipients", &self.recipients.len())
            .finish()
    }
}

/// Encrypts secret bundles for one network with age.
pub struct SecretEncryptor {
    network: NetworkKey,
}

impl SecretEncryptor {
    /// Encryptor for `network`.
    pub fn new(network: NetworkKey) -> Self {
        Self { network }
    }

    /// Encrypt and sign a bundle.
    ///
    /// Ciphertext differs on every call; the signature lets the network
    /// check the signer before accepting the upload. No I/O is done and the
    /// plaintext is never logged.
    ///
    /// # Errors
    ///
    /// Returns `CipherError` if serialization or encryption fails.
    pub fn encrypt(
        &self,
        bundle: &SecretBundle,
        signer: &Signer,
    ) -> Result<EncryptedSecrets, CipherError> {
        debug!(
            backend = Age.name(),
            don_id = %self.network.don_id,
            recipients = self.network.recipients.len(),
            "encrypting secrets"
        );

        let plaintext = bundle.to_json()?;
        let ciphertext = Age.encrypt(&plaintext, &self.network.recipients)?;

        let message = EncryptedSecrets::signed_message(&self.network.don_id, &ciphertext);
        let signature = hex::encode(signer.sign(&message).to_bytes());
        let envelope = EncryptedSecrets::new(
            self.network.don_id.clone(),
            signer.identity(),
            signature,
            ciphertext,
        );

        info!(
            signer = %envelope.signer,
            fingerprint = %envelope.fingerprint(),
            "secrets encrypted"
        );
        Ok(envelope)
    }

    /// Node-side counterpart: verify the signer and decrypt.
    ///
    /// # Errors
    ///
    /// Returns `CipherError::BadSignature` when the envelope was not signed
    /// by its claimed signer, and `CipherError::DecryptionFailed` when the
    /// identity cannot open it or the network id does not match.
    pub fn decrypt(
        &self,
        envelope: &EncryptedSecrets,
        identity: &x25519::Identity,
    ) -> Result<SecretBundle, CipherError> {
        if envelope.don_id != self.network.don_id {
            return Err(CipherError::DecryptionFailed(format!(
                "envelope targets network {}, expected {}",
                envelope.don_id, self.network.don_id
            )));
        }
        envelope.verify()?;

        let plaintext = Age.decrypt(&envelope.ciphertext, identity)?;
        SecretBundle::from_json(&plaintext)
    }
}
