use crate::error::PriceError;
use alloy_primitives::U256;

pub const MIN_TICK: i32 = -887272;
pub const MAX_TICK: i32 = -MIN_TICK;

/// Smallest `sqrtPriceX96` a pool accepts, the sqrt ratio at `MIN_TICK`.
pub const MIN_SQRT_RATIO: U256 = U256::from_limbs([4295128739, 0, 0, 0]);
/// One past the largest `sqrtPriceX96` a pool accepts, the sqrt ratio at `MAX_TICK`.
pub const MAX_SQRT_RATIO: U256 =
    U256::from_limbs([6743328256752651558, 17280870778742802505, 4294805859, 0]);

/// Returns `true` iff `tick` lies within `[MIN_TICK, MAX_TICK]`.
#[inline]
pub fn is_valid_tick(tick: i32) -> bool {
    (MIN_TICK..=MAX_TICK).contains(&tick)
}

/// Returns `true` iff a pool would accept `sqrt_price_x96` in `initialize`.
#[inline]
pub fn is_valid_sqrt_price(sqrt_price_x96: U256) -> bool {
    sqrt_price_x96 >= MIN_SQRT_RATIO && sqrt_price_x96 < MAX_SQRT_RATIO
}

pub(crate) fn ensure_tick_in_range(tick: i32) -> Result<(), PriceError> {
    if is_valid_tick(tick) {
        Ok(())
    } else {
        Err(PriceError::out_of_range(format!(
            "tick {tick} is outside [{MIN_TICK}, {MAX_TICK}]"
        )))
    }
}

/// Converts an arbitrary number into a tick.
///
/// Fails with `InvalidArgument` when `value` is not a finite integer and
/// with `OutOfRange` when it lies outside `[MIN_TICK, MAX_TICK]`.
pub fn checked_tick(value: f64) -> Result<i32, PriceError> {
    if !value.is_finite() || value.fract() != 0.0 {
        return Err(PriceError::invalid(format!(
            "tick must be an integer, got {value}"
        )));
    }
    if value < MIN_TICK as f64 || value > MAX_TICK as f64 {
        return Err(PriceError::out_of_range(format!(
            "tick {value} is outside [{MIN_TICK}, {MAX_TICK}]"
        )));
    }
    Ok(value as i32)
}

/// Rounds `tick` to the nearest multiple of `tick_spacing`.
///
/// Ties round half up (toward positive infinity), so `30` with spacing `60`
/// becomes `60` and `-30` becomes `0`. If the rounded tick falls outside
/// `[MIN_TICK, MAX_TICK]` it is pulled back by one spacing, which keeps the
/// result an exact multiple of the spacing inside the valid range.
pub fn nearest_usable_tick(tick: i32, tick_spacing: i32) -> Result<i32, PriceError> {
    if tick_spacing <= 0 {
        return Err(PriceError::invalid(format!(
            "tick spacing must be positive, got {tick_spacing}"
        )));
    }
    ensure_tick_in_range(tick)?;

    let tick = tick as i64;
    let spacing = tick_spacing as i64;

    let mut quotient = tick.div_euclid(spacing);
    if 2 * tick.rem_euclid(spacing) >= spacing {
        quotient += 1;
    }
    let mut rounded = quotient * spacing;

    if rounded < MIN_TICK as i64 {
        rounded += spacing;
    } else if rounded > MAX_TICK as i64 {
        rounded -= spacing;
    }

    Ok(rounded as i32)
}

/// Largest multiple of `tick_spacing` not above `tick`.
pub(crate) fn floor_to_spacing(tick: i32, tick_spacing: i32) -> i32 {
    tick.div_euclid(tick_spacing) * tick_spacing
}

/// Smallest multiple of `tick_spacing` not below `tick`.
pub(crate) fn ceil_to_spacing(tick: i32, tick_spacing: i32) -> i32 {
    let floor = floor_to_spacing(tick, tick_spacing);
    if floor == tick {
        floor
    } else {
        floor + tick_spacing
    }
}
