//! Core library components.
//!
//! Credential bundling, encryption for the oracle network, quorum upload
//! to its gateways, and the fetch-and-encode job itself.

pub mod bundle;
pub mod cipher;
pub mod codec;
pub mod config;
pub mod constants;
pub mod distribute;
pub mod env;
pub mod executor;
pub mod ledger;
pub mod transport;
pub mod types;
pub mod validation;
