//! Decode command - turn a job result back into a decimal.

use crate::cli::output;
use crate::core::codec;
use crate::error::Result;

/// Decode a hex job result and print the value.
pub fn execute(hex: &str) -> Result<()> {
    let bytes = codec::from_hex(hex)?;
    output::data(&codec::decode(&bytes).to_string());
    Ok(())
}
