//! Input validation for provisioning inputs.
//!
//! Validates credential values and endpoint URLs at the boundary so deeper
//! code can assume well-formed input.

use url::Url;

use crate::error::{ConfigError, CredentialError};

/// Validate a credential value.
///
/// Credential values cannot be empty or whitespace-only.
///
/// # Arguments
///
/// * `name` - The credential name (for error messages)
/// * `value` - The value to validate
///
/// # Errors
///
/// Returns `CredentialError::Missing` if the value is blank.
pub fn validate_credential(name: &'static str, value: &str) -> Result<(), CredentialError> {
    if value.trim().is_empty() {
        return Err(CredentialError::Missing(name));
    }

    Ok(())
}

/// Validate an http(s) endpoint URL.
///
/// # Errors
///
/// Returns `ConfigError::InvalidValue` if the URL does not parse or uses a
/// scheme other than http or https.
pub fn validate_endpoint(field: &'static str, value: &str) -> Result<Url, ConfigError> {
    let url = Url::parse(value).map_err(|e| ConfigError::InvalidValue {
        field,
        reason: format!("{}: {}", value, e),
    })?;

    match url.scheme() {
        "http" | "https" => Ok(url),
        other => Err(ConfigError::InvalidValue {
            field,
            reason: format!("unsupported scheme '{}' in {}", other, value),
        }),
    }
}

/// Validate an HTTP header name.
///
/// # Errors
///
/// Returns `ConfigError::MissingField` for an empty name and
/// `ConfigError::InvalidValue` for characters outside the RFC 7230 token set.
pub fn validate_header_name(field: &'static str, name: &str) -> Result<(), ConfigError> {
    if name.is_empty() {
        return Err(ConfigError::MissingField { field });
    }

    const TOKEN_EXTRA: &str = "!#$%&'*+-.^_`|~";
    if let Some(ch) = name
        .chars()
        .find(|c| !c.is_ascii_alphanumeric() && !TOKEN_EXTRA.contains(*c))
    {
        return Err(ConfigError::InvalidValue {
            field,
            reason: format!("invalid character '{}' in header '{}'", ch, name),
        });
    }

    Ok(())
}
