//! position-oracle - Off-chain position feed for an oracle network.
//!
//! # Architecture
//!
//! ```text
//! src/
//! ├── cli/              # Command-line interface
//! │   ├── provision     # Encrypt and upload credentials
//! │   ├── simulate      # Run the job locally
//! │   ├── decode        # Decode a job result
//! │   ├── records       # Slot ledger listing
//! │   └── completions   # Shell completions
//! └── core/             # Core library components
//!     ├── bundle        # Credential bundle
//!     ├── cipher/       # Encryption and signing
//!     │   ├── mod       # Cipher trait, SecretEncryptor
//!     │   ├── age       # age encryption implementation
//!     │   ├── signer    # ed25519 signer identity
//!     │   └── envelope  # Signed ciphertext envelope
//!     ├── distribute/   # Quorum upload to gateways
//!     ├── executor      # Fetch, validate, encode
//!     ├── transport     # HTTP transport for the job
//!     ├── codec         # 32-byte result encoding
//!     ├── config        # oracle.toml
//!     └── ledger        # Per-slot version records
//! ```
//!
//! # Flow
//!
//! Provisioning: credentials → [`core::bundle::SecretBundle`] →
//! [`core::cipher::SecretEncryptor`] → [`core::distribute::SecretDistributor`].
//!
//! Execution: [`core::executor::RequestExecutor`] fetches the position,
//! validates it and encodes the market value with [`core::codec`].

pub mod cli;
pub mod core;
pub mod error;
