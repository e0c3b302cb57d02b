//! Secret bundle assembly.
//!
//! A [`SecretBundle`] holds the three credentials the job needs, keyed by
//! the names the job reads (`apiKey`, `apiSecret`, `apiUrl`). Plaintext is
//! zeroized on drop and never rendered by `Debug`.

use std::collections::BTreeMap;
use std::fmt;

use tracing::debug;
use zeroize::{Zeroize, Zeroizing};

use crate::core::constants::{API_KEY, API_SECRET, API_URL, POSITION_ENDPOINT};
use crate::core::env::Environment;
use crate::core::validation::validate_credential;
use crate::error::{CipherError, CredentialError};

/// Named credential strings for one provisioning run or one job.
#[derive(Clone, PartialEq, Eq)]
pub struct SecretBundle {
    values: BTreeMap<String, String>,
}

impl SecretBundle {
    /// Create a bundle from already-resolved values.
    ///
    /// No validation is done here: this is how the job receives whatever
    /// the network decrypted, blanks included.
    pub fn new(
        api_key: impl Into<String>,
        api_secret: impl Into<String>,
        api_url: impl Into<String>,
    ) -> Self {
        let mut values = BTreeMap::new();
        values.insert(API_KEY.to_string(), api_key.into());
        values.insert(API_SECRET.to_string(), api_secret.into());
        values.insert(API_URL.to_string(), api_url.into());
        Self { values }
    }

    /// Plain copy of the environment values with the endpoint resolved,
    /// without the non-empty checks of [`build_secret_bundle`].
    pub fn from_environment(env: &Environment) -> Self {
        Self::new(
            env.api_key.clone(),
            env.api_secret.clone(),
            resolve_url(&env.api_url),
        )
    }

    /// Brokerage API key, empty when absent.
    pub fn api_key(&self) -> &str {
        self.get(API_KEY).unwrap_or_default()
    }

    /// Brokerage API secret, empty when absent.
    pub fn api_secret(&self) -> &str {
        self.get(API_SECRET).unwrap_or_default()
    }

    /// Resolved position URL, empty when absent.
    pub fn api_url(&self) -> &str {
        self.get(API_URL).unwrap_or_default()
    }

    /// Look up a credential by name.
    pub fn get(&self, name: &str) -> Option<&str> {
        self.values.get(name).map(String::as_str)
    }

    /// Credential names, without values.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.values.keys().map(String::as_str)
    }

    /// Serialize to the JSON object that gets encrypted.
    pub fn to_json(&self) -> Result<Zeroizing<Vec<u8>>, CipherError> {
        serde_json::to_vec(&self.values)
            .map(Zeroizing::new)
            .map_err(|e| CipherError::EncryptionFailed(format!("failed to serialize secrets: {}", e)))
    }

    /// Parse a decrypted JSON object back into a bundle.
    pub fn from_json(bytes: &[u8]) -> Result<Self, CipherError> {
        let values: BTreeMap<String, String> = serde_json::from_slice(bytes).map_err(|e| {
            CipherError::DecryptionFailed(format!("decrypted secrets are not a JSON object: {}", e))
        })?;
        Ok(Self { values })
    }
}

impl Drop for SecretBundle {
    fn drop(&mut self) {
        for value in self.values.values_mut() {
            value.zeroize();
        }
    }
}

impl fmt::Debug for SecretBundle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SecretBundle")
            .field("names", &self.values.keys().collect::<Vec<_>>())
            .finish_non_exhaustive()
    }
}

/// Build the provisioning bundle from the environment.
///
/// The endpoint is the base URL with `/positions/TSLA` appended.
///
/// # Errors
///
/// Returns `CredentialError::Missing` if the API key, API secret or base
/// URL is blank. Nothing is encrypted in that case.
pub fn build_secret_bundle(env: &Environment) -> Result<SecretBundle, CredentialError> {
    validate_credential(API_KEY, &env.api_key)?;
    validate_credential(API_SECRET, &env.api_secret)?;
    validate_credential(API_URL, &env.api_url)?;

    let bundle = SecretBundle::from_environment(env);
    debug!(url = %bundle.api_url(), "secret bundle assembled");
    Ok(bundle)
}

fn resolve_url(base: &str) -> String {
    format!("{}{}", base.trim_end_matches('/'), POSITION_ENDPOINT)
}
