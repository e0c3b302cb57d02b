//! Error types.
//!
//! One enum per subsystem, wrapped by [`Error`]. Every variant renders a
//! human-readable reason; job failures surface that string as the job's
//! error output.

use thiserror::Error;

/// Top-level error.
#[derive(Error, Debug)]
pub enum Error {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Credential(#[from] CredentialError),

    #[error(transparent)]
    Cipher(#[from] CipherError),

    #[error(transparent)]
    Distribution(#[from] DistributionError),

    #[error(transparent)]
    Job(#[from] JobError),

    #[error(transparent)]
    Codec(#[from] CodecError),

    #[error(transparent)]
    Ledger(#[from] LedgerError),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

/// Configuration loading and validation errors.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("failed to read config: {0}")]
    ReadFile(#[source] std::io::Error),

    #[error("failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("missing required field: {field}")]
    MissingField { field: &'static str },

    #[error("invalid value for {field}: {reason}")]
    InvalidValue { field: &'static str, reason: String },
}

/// Credential sourcing errors.
#[derive(Error, Debug)]
pub enum CredentialError {
    #[error("missing credential: {0}")]
    Missing(&'static str),

    #[error("invalid signer key: {0}")]
    InvalidSignerKey(String),
}

/// Encryption and envelope errors.
#[derive(Error, Debug)]
pub enum CipherError {
    #[error("encryption failed: {0}")]
    EncryptionFailed(String),

    #[error("decryption failed: {0}")]
    DecryptionFailed(String),

    #[error("armor failed: {0}")]
    ArmorFailed(String),

    #[error("invalid public key: {0}")]
    InvalidPublicKey(String),

    #[error("no recipients configured for network {0}")]
    NoRecipients(String),

    #[error("signature verification failed for signer {0}")]
    BadSignature(String),
}

/// Gateway distribution errors.
#[derive(Error, Debug)]
pub enum DistributionError {
    #[error("no gateways configured")]
    NoGateways,

    #[error("quorum of {required} cannot be met by {available} gateways")]
    UnreachableQuorum { required: usize, available: usize },

    #[error("failed to upload secrets: {reason}")]
    QuorumNotReached { reason: String },

    #[error("gateway client error: {0}")]
    Client(String),
}

/// Request execution failures.
///
/// The `Display` form is the job's error string.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum JobError {
    #[error("credentials not provided")]
    CredentialsNotProvided,

    #[error("fetch failed: {0}")]
    Fetch(String),

    #[error("invalid response shape")]
    InvalidResponse,

    #[error(transparent)]
    Encoding(#[from] CodecError),
}

/// Fixed-point encoding errors.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CodecError {
    #[error("cannot encode negative value: {0}")]
    Negative(String),

    #[error("value overflows 256-bit result: {0}")]
    Overflow(String),

    #[error("expected 32 bytes, got {0}")]
    Length(usize),

    #[error("invalid hex: {0}")]
    Hex(String),
}

/// Slot ledger errors.
#[derive(Error, Debug)]
pub enum LedgerError {
    #[error("failed to read ledger: {0}")]
    Read(#[source] std::io::Error),

    #[error("failed to write ledger: {0}")]
    Write(#[source] std::io::Error),

    #[error("failed to parse ledger: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("failed to serialize ledger: {0}")]
    Serialize(#[from] toml::ser::Error),

    #[error("no home directory for default ledger path")]
    NoHome,
}

pub type Result<T> = std::result::Result<T, Error>;
