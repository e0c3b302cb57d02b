//! Constants used throughout position-oracle.
//!
//! Centralizes magic strings and configuration values.

/// Configuration file name.
pub const CONFIG_FILE: &str = "oracle.toml";

/// Slot ledger file, relative to HOME.
pub const LEDGER_FILE: &str = ".position-oracle/records.toml";

/// Resource path appended to the brokerage base URL.
pub const POSITION_ENDPOINT: &str = "/positions/TSLA";

/// Secret bundle field names, as the job reads them.
pub const API_KEY: &str = "apiKey";
pub const API_SECRET: &str = "apiSecret";
pub const API_URL: &str = "apiUrl";

/// Header carrying the brokerage API key.
pub const DEFAULT_KEY_HEADER: &str = "APCA-API-KEY-ID";

/// Header carrying the brokerage API secret.
pub const DEFAULT_SECRET_HEADER: &str = "APCA-API-SECRET-KEY";

/// Upstream fetch timeout.
pub const DEFAULT_FETCH_TIMEOUT_MS: u64 = 9_000;

/// Per-gateway upload timeout.
pub const DEFAULT_GATEWAY_TIMEOUT_MS: u64 = 10_000;

/// Default secrets lifetime on the network (one day).
pub const DEFAULT_TTL_MINUTES: u32 = 1_440;

/// Fixed-point scale: two decimal digits.
pub const RESULT_SCALE: i64 = 2;

/// Width of the encoded job result.
pub const RESULT_BYTES: usize = 32;

/// Envelope format tag for encrypted secrets.
pub const ENVELOPE_VERSION: &str = "position-oracle-secrets-v1";
