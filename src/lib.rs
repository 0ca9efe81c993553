//! Price, tick and `sqrtPriceX96` conversions for Uniswap V3 / SushiSwap V3
//! style concentrated‑liquidity pools.
//!
//! This crate exposes:
//! - Pure conversions (`math::*`) between reserve ratios, Q64.96 sqrt prices,
//!   ticks and 18‑decimal prices, plus tick spacing normalization.
//! - Fee tier, tick range and mint parameter helpers (`pool::*`).
//! - Network presets and JSON address files (`config`).
//! - Optional `onchain` helpers that read pool and position state through an
//!   alloy provider.
//!
//! # Examples
//!
//! ```
//! use clmm_price_utils::{
//!     Q96, encode_sqrt_price, nearest_usable_tick, price_to_tick, tick_to_price,
//! };
//!
//! // a 1:1 pool initializes at exactly 2^96
//! assert_eq!(encode_sqrt_price("100", "100").unwrap(), Q96);
//!
//! assert_eq!(price_to_tick(1.0).unwrap(), 0);
//! assert_eq!(tick_to_price(0).unwrap().to_string(), "1000000000000000000");
//! assert_eq!(nearest_usable_tick(59, 60).unwrap(), 60);
//! ```
//!
//! ## Picking a range for a new position
//! ```
//! use clmm_price_utils::pool::{fee_tier::FeeTier, position::TickRange};
//!
//! let range = TickRange::around_price(2.0, FeeTier::Medium, 0.1).unwrap();
//! assert!(range.is_aligned(FeeTier::Medium.tick_spacing()));
//! ```

pub use alloy_primitives::{Address, U256};

pub mod config;
pub mod error;
pub mod math;
pub mod pool;

pub use error::{ConfigError, Error, PriceError};
pub use math::price_math::{
    PRICE_SCALE, format_price_e18, price_to_tick, tick_to_price, tick_to_price_adjusted,
    tick_to_price_f64,
};
pub use math::sqrt_price_math::{
    Reserve, ReservePair, SQRT_PRICE_SCALE, decode_sqrt_price, encode_sqrt_price,
    encode_sqrt_price_from_amounts,
};
pub use math::tick_math::{
    MAX_SQRT_RATIO, MAX_TICK, MIN_SQRT_RATIO, MIN_TICK, checked_tick, is_valid_sqrt_price,
    is_valid_tick, nearest_usable_tick,
};

pub const RESOLUTION: u8 = 96;
/// `2^96`, the fixed‑point scale of `sqrtPriceX96`.
pub const Q96: U256 = U256::from_limbs([0, 4294967296, 0, 0]);
/// `2^192`, the scale of a squared `sqrtPriceX96`.
pub const Q192: U256 = U256::from_limbs([0, 0, 0, 1]);
