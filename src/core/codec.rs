//! Fixed-point result codec.
//!
//! The job result is `round(value * 10^2)` serialized as a 32-byte
//! big-endian unsigned integer. Rounding is half-away-from-zero, so
//! `1234.565` becomes `123457`.

use bigdecimal::num_bigint::{BigInt, Sign};
use bigdecimal::{BigDecimal, RoundingMode};
use tracing::trace;

use crate::core::constants::{RESULT_BYTES, RESULT_SCALE};
use crate::core::types::EncodedResult;
use crate::error::CodecError;

/// Encode a decimal value as a fixed-point 32-byte big-endian integer.
///
/// # Errors
///
/// Returns `CodecError::Negative` for values below zero and
/// `CodecError::Overflow` when the scaled value needs more than 256 bits.
pub fn encode(value: &BigDecimal) -> Result<EncodedResult, CodecError> {
    let scaled = to_fixed_point(value)?;
    if scaled.bits() > (RESULT_BYTES * 8) as u64 {
        return Err(CodecError::Overflow(value.to_string()));
    }

    let (_, magnitude) = scaled.to_bytes_be();
    let mut out = [0u8; RESULT_BYTES];
    out[RESULT_BYTES - magnitude.len()..].copy_from_slice(&magnitude);

    trace!(value = %value, units = %scaled, "encoded result");
    Ok(out)
}

/// Decode a 32-byte big-endian result back to a two-decimal value.
pub fn decode(bytes: &EncodedResult) -> BigDecimal {
    BigDecimal::new(BigInt::from_bytes_be(Sign::Plus, bytes), RESULT_SCALE)
}

/// Decode from a slice, checking the width.
///
/// # Errors
///
/// Returns `CodecError::Length` unless exactly 32 bytes are given.
pub fn decode_slice(bytes: &[u8]) -> Result<BigDecimal, CodecError> {
    let fixed: &EncodedResult = bytes
        .try_into()
        .map_err(|_| CodecError::Length(bytes.len()))?;
    Ok(decode(fixed))
}

/// `0x`-prefixed hex form of an encoded result.
pub fn to_hex(bytes: &EncodedResult) -> String {
    format!("0x{}", hex::encode(bytes))
}

/// Parse a hex result, with or without the `0x` prefix.
///
/// # Errors
///
/// Returns `CodecError::Hex` for malformed input and `CodecError::Length`
/// when the decoded width is not 32 bytes.
pub fn from_hex(input: &str) -> Result<EncodedResult, CodecError> {
    let trimmed = input.trim();
    let digits = trimmed
        .strip_prefix("0x")
        .or_else(|| trimmed.strip_prefix("0X"))
        .unwrap_or(trimmed);
    let raw = hex::decode(digits).map_err(|e| CodecError::Hex(e.to_string()))?;
    let len = raw.len();
    raw.try_into().map_err(|_| CodecError::Length(len))
}

/// Scale by 10^2 and round half away from zero.
fn to_fixed_point(value: &BigDecimal) -> Result<BigInt, CodecError> {
    let (digits, scale) = value.as_bigint_and_exponent();
    if digits.sign() == Sign::Minus {
        return Err(CodecError::Negative(value.to_string()));
    }

    let scaled = BigDecimal::new(digits, scale - RESULT_SCALE);
    let (units, _) = scaled
        .with_scale_round(0, RoundingMode::HalfUp)
        .into_bigint_and_exponent();
    Ok(units)
}
