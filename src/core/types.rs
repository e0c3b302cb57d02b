//! Type aliases for domain concepts.
//!
//! Provides semantic type aliases to make function signatures more descriptive.

/// Slot addressing one encrypted-secrets record on the network.
pub type SlotId = u32;

/// Secrets version assigned by the network on upload.
pub type SecretsVersion = u64;

/// An age public key string (starts with "age1...").
///
/// The network's encryption key material.
pub type PublicKey = String;

/// Network identifier (e.g. `fun-ethereum-sepolia-1`).
pub type DonId = String;

/// Fixed-width big-endian job result.
pub type EncodedResult = [u8; 32];
