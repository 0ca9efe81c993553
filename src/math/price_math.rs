use crate::error::PriceError;
use crate::math::math_helpers::f64_to_u256_floor;
use crate::math::tick_math::{MAX_TICK, MIN_TICK, ensure_tick_in_range};
use alloy_primitives::U256;

/// Base of the tick ladder: adjacent ticks differ in price by 0.01%.
pub const TICK_BASE: f64 = 1.0001;

/// Fixed‑point scale of prices returned by [`tick_to_price`] (18 decimals).
pub const PRICE_DECIMALS: usize = 18;
pub const PRICE_SCALE: U256 = U256::from_limbs([1_000_000_000_000_000_000, 0, 0, 0]);
const PRICE_SCALE_F64: f64 = 1e18;
/// Relative slack when matching a price to a tick boundary. Adjacent ticks
/// are 1e-4 apart, f64 rounding through the 18-decimal scale is ~1e-16.
const TICK_TOLERANCE: f64 = 1e-12;

/// Returns the tick whose price is the largest not above `price`, i.e.
/// `floor(ln(price) / ln(1.0001))`, with prices within 1e-12 (relative) of a
/// tick boundary counted as on it.
///
/// Prices at or below zero (and NaN) are rejected with `InvalidArgument`;
/// prices whose tick lies outside `[MIN_TICK, MAX_TICK]` with `OutOfRange`.
pub fn price_to_tick(price: f64) -> Result<i32, PriceError> {
    if price.is_nan() || price <= 0.0 {
        return Err(PriceError::invalid(format!(
            "price must be a positive number, got {price}"
        )));
    }

    let mut tick = (price.ln() / TICK_BASE.ln()).floor();

    // ln and powi round differently; settle on the tick whose `powi` price
    // is at or just below `price`, so prices from `tick_to_price` map back
    if tick.is_finite() && tick.abs() <= (MAX_TICK + 1) as f64 {
        let ceiling = price * (1.0 + TICK_TOLERANCE);
        if TICK_BASE.powi(tick as i32 + 1) <= ceiling {
            tick += 1.0;
        } else if TICK_BASE.powi(tick as i32) > ceiling {
            tick -= 1.0;
        }
    }

    if tick < MIN_TICK as f64 || tick > MAX_TICK as f64 {
        return Err(PriceError::out_of_range(format!(
            "price {price} is out of valid tick range"
        )));
    }

    Ok(tick as i32)
}

/// Returns `1.0001^tick` as a plain `f64`.
pub fn tick_to_price_f64(tick: i32) -> Result<f64, PriceError> {
    ensure_tick_in_range(tick)?;
    Ok(TICK_BASE.powi(tick))
}

/// Returns `1.0001^tick` as an 18‑decimal fixed‑point integer, floored.
///
/// `tick_to_price(0)` is `1_000_000_000_000_000_000`. The power is taken in
/// `f64`, so only the leading ~15 digits are meaningful and ticks near
/// `MIN_TICK` floor to zero.
pub fn tick_to_price(tick: i32) -> Result<U256, PriceError> {
    let price = tick_to_price_f64(tick)?;
    f64_to_u256_floor(price * PRICE_SCALE_F64)
}

/// Human readable price of token0 in units of token1 at `tick`, corrected
/// for the tokens' decimals.
pub fn tick_to_price_adjusted(tick: i32, decimals0: u8, decimals1: u8) -> Result<f64, PriceError> {
    let price = tick_to_price_f64(tick)? * 10f64.powi(decimals0 as i32 - decimals1 as i32);
    if !price.is_finite() {
        return Err(PriceError::out_of_range(format!(
            "price at tick {tick} with decimals {decimals0}/{decimals1} does not fit in f64"
        )));
    }
    Ok(price)
}

/// Renders an 18‑decimal fixed‑point value as a decimal string, e.g.
/// `1000100000000000000` becomes `"1.0001"`.
pub fn format_price_e18(price_e18: U256) -> String {
    let (whole, frac) = price_e18.div_rem(PRICE_SCALE);
    if frac.is_zero() {
        return whole.to_string();
    }
    let frac = format!("{:0>width$}", frac.to_string(), width = PRICE_DECIMALS);
    format!("{whole}.{}", frac.trim_end_matches('0'))
}
