use crate::error::PriceError;
use alloy_primitives::U256;

/// Converts a non‑negative, finite `f64` into a `U256`, dropping any
/// fractional part.
pub fn f64_to_u256_floor(value: f64) -> Result<U256, PriceError> {
    // `TryFrom<f64>` rounds to nearest, floor first
    U256::try_from(value.floor()).map_err(|e| {
        PriceError::EncodingFailed(format!("cannot convert {value} to a 256-bit integer: {e}"))
    })
}
