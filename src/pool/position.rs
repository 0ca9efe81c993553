use crate::error::PriceError;
use crate::math::price_math::{price_to_tick, tick_to_price_f64};
use crate::math::tick_math::{
    MAX_TICK, MIN_TICK, ceil_to_spacing, ensure_tick_in_range, floor_to_spacing,
};
use crate::pool::fee_tier::FeeTier;
use alloy_primitives::{Address, U256};
use std::fmt;

const BPS_DENOMINATOR: u32 = 10_000;

/// Width used by [`TickRange::around_price`] when none is given: ±10%.
pub const DEFAULT_RANGE_WIDTH: f64 = 0.1;
/// Default slippage tolerance for `amount{0,1}Min`, in basis points (0.5%).
pub const DEFAULT_SLIPPAGE_BPS: u32 = 50;

/// Orders a pair the way pools store it, `token0 < token1`. Addresses
/// compare as big-endian bytes, which is their numeric order.
pub fn sort_tokens(token_a: Address, token_b: Address) -> (Address, Address) {
    if token_a <= token_b {
        (token_a, token_b)
    } else {
        (token_b, token_a)
    }
}

/// Lowers `amount` by `slippage_bps` basis points, the minimum accepted by a
/// mint or swap.
pub fn amount_min(amount: U256, slippage_bps: u32) -> Result<U256, PriceError> {
    if slippage_bps > BPS_DENOMINATOR {
        return Err(PriceError::invalid(format!(
            "slippage must be at most {BPS_DENOMINATOR} bps, got {slippage_bps}"
        )));
    }
    let keep = U256::from(BPS_DENOMINATOR - slippage_bps);
    Ok(amount * keep / U256::from(BPS_DENOMINATOR))
}

/// A position's `[tick_lower, tick_upper)` bounds.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct TickRange {
    pub lower: i32,
    pub upper: i32,
}

impl TickRange {
    pub fn new(lower: i32, upper: i32) -> Result<Self, PriceError> {
        ensure_tick_in_range(lower)?;
        ensure_tick_in_range(upper)?;
        if lower >= upper {
            return Err(PriceError::invalid(format!(
                "invalid tick range: lower {lower} must be below upper {upper}"
            )));
        }
        Ok(Self { lower, upper })
    }

    /// The widest range a pool with `tick_spacing` accepts, e.g.
    /// `[-887220, 887220]` for spacing 60.
    pub fn full_range(tick_spacing: i32) -> Result<Self, PriceError> {
        if tick_spacing <= 0 || tick_spacing > MAX_TICK {
            return Err(PriceError::invalid(format!(
                "tick spacing must be in 1..={MAX_TICK}, got {tick_spacing}"
            )));
        }
        Self::new(
            ceil_to_spacing(MIN_TICK, tick_spacing),
            floor_to_spacing(MAX_TICK, tick_spacing),
        )
    }

    /// A range spanning `price * (1 - width)` to `price * (1 + width)`,
    /// widened outwards to the tier's tick spacing.
    pub fn around_price(price: f64, fee_tier: FeeTier, width: f64) -> Result<Self, PriceError> {
        if !(width > 0.0 && width < 1.0) {
            return Err(PriceError::invalid(format!(
                "range width must be in (0, 1), got {width}"
            )));
        }
        let spacing = fee_tier.tick_spacing();

        let lower = price_to_tick(price * (1.0 - width))?;
        // ceil of the upper bound, price_to_tick floors
        let upper_exact = price_to_tick(price * (1.0 + width))?;
        let upper = if tick_to_price_f64(upper_exact)? < price * (1.0 + width) {
            upper_exact + 1
        } else {
            upper_exact
        };

        let lower = floor_to_spacing(lower, spacing).max(ceil_to_spacing(MIN_TICK, spacing));
        let upper = ceil_to_spacing(upper, spacing).min(floor_to_spacing(MAX_TICK, spacing));
        Self::new(lower, upper)
    }

    /// Whether a pool at `tick` is earning fees on this range.
    #[inline]
    pub fn contains(&self, tick: i32) -> bool {
        tick >= self.lower && tick < self.upper
    }

    #[inline]
    pub fn is_aligned(&self, tick_spacing: i32) -> bool {
        tick_spacing > 0 && self.lower % tick_spacing == 0 && self.upper % tick_spacing == 0
    }

    /// `(price at lower, price at upper)` as plain floats.
    pub fn price_bounds(&self) -> Result<(f64, f64), PriceError> {
        Ok((tick_to_price_f64(self.lower)?, tick_to_price_f64(self.upper)?))
    }
}

impl fmt::Display for TickRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}, {})", self.lower, self.upper)
    }
}

/// Arguments of `NonfungiblePositionManager.mint`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MintParams {
    pub token0: Address,
    pub token1: Address,
    pub fee: u32,
    pub tick_lower: i32,
    pub tick_upper: i32,
    pub amount0_desired: U256,
    pub amount1_desired: U256,
    pub amount0_min: U256,
    pub amount1_min: U256,
    pub recipient: Address,
    /// Unix timestamp, seconds.
    pub deadline: u64,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum MintIssue {
    InvalidFeeTier(u32),
    TokensNotSorted,
    InvalidTickRange,
    TickNotAligned { tick: i32, tick_spacing: i32 },
    NoLiquidityProvided,
    MinimumExceedsDesired,
    DeadlineExpired { deadline: u64, now: u64 },
}

impl fmt::Display for MintIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MintIssue::InvalidFeeTier(fee) => write!(f, "invalid fee tier {fee}"),
            MintIssue::TokensNotSorted => f.write_str("token0 must sort below token1"),
            MintIssue::InvalidTickRange => f.write_str("invalid tick range"),
            MintIssue::TickNotAligned { tick, tick_spacing } => {
                write!(f, "tick {tick} is not a multiple of spacing {tick_spacing}")
            }
            MintIssue::NoLiquidityProvided => f.write_str("no liquidity provided"),
            MintIssue::MinimumExceedsDesired => f.write_str("minimum amount exceeds desired amount"),
            MintIssue::DeadlineExpired { deadline, now } => {
                write!(f, "deadline {deadline} expired (now {now})")
            }
        }
    }
}

impl MintParams {
    /// Checks the parameters the way the pool would, collecting every
    /// problem instead of stopping at the first.
    pub fn validate(&self, now: u64) -> Vec<MintIssue> {
        let mut issues = Vec::new();

        let fee_tier = FeeTier::from_pips(self.fee).ok();
        if fee_tier.is_none() {
            issues.push(MintIssue::InvalidFeeTier(self.fee));
        }

        if self.token0 >= self.token1 {
            issues.push(MintIssue::TokensNotSorted);
        }

        if TickRange::new(self.tick_lower, self.tick_upper).is_err() {
            issues.push(MintIssue::InvalidTickRange);
        }

        if let Some(tier) = fee_tier {
            let tick_spacing = tier.tick_spacing();
            for tick in [self.tick_lower, self.tick_upper] {
                if tick % tick_spacing != 0 {
                    issues.push(MintIssue::TickNotAligned { tick, tick_spacing });
                }
            }
        }

        if self.amount0_desired.is_zero() && self.amount1_desired.is_zero() {
            issues.push(MintIssue::NoLiquidityProvided);
        }

        if self.amount0_min > self.amount0_desired || self.amount1_min > self.amount1_desired {
            issues.push(MintIssue::MinimumExceedsDesired);
        }

        if self.deadline <= now {
            issues.push(MintIssue::DeadlineExpired {
                deadline: self.deadline,
                now,
            });
        }

        issues
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloy_primitives::address;

    const TOKEN_LO: Address = address!("0x18Ae0780D1d9325ce7fe45c68F6879b24Ff63FBe");
    const TOKEN_HI: Address = address!("0xb9B04519126d3d6D13FE9B5B69cF7e00A1eBFa49");

    fn mint_params() -> MintParams {
        MintParams {
            token0: TOKEN_LO,
            token1: TOKEN_HI,
            fee: 3000,
            tick_lower: -887220,
            tick_upper: 887220,
            amount0_desired: U256::from(1000u64),
            amount1_desired: U256::from(1000u64),
            amount0_min: U256::ZERO,
            amount1_min: U256::ZERO,
            recipient: TOKEN_LO,
            deadline: 1_700_000_600,
        }
    }

    #[test]
    fn sort_tokens_orders_by_numeric_value() {
        assert_eq!(sort_tokens(TOKEN_HI, TOKEN_LO), (TOKEN_LO, TOKEN_HI));
        assert_eq!(sort_tokens(TOKEN_LO, TOKEN_HI), (TOKEN_LO, TOKEN_HI));
        assert_eq!(sort_tokens(TOKEN_LO, TOKEN_LO), (TOKEN_LO, TOKEN_LO));

        // 0x..0100 is numerically above 0x..00ff
        let low = address!("0x00000000000000000000000000000000000000ff");
        let high = address!("0x0000000000000000000000000000000000000100");
        assert!(<alloy_primitives::U160 as From<alloy_primitives::Address>>::from(high) > <alloy_primitives::U160 as From<alloy_primitives::Address>>::from(low));
        assert_eq!(sort_tokens(high, low), (low, high));
    }

    #[test]
    fn amount_min_applies_slippage() {
        let amount = U256::from(1_000_000u64);
        assert_eq!(amount_min(amount, DEFAULT_SLIPPAGE_BPS).unwrap(), U256::from(995_000u64));
        assert_eq!(amount_min(amount, 0).unwrap(), amount);
        assert_eq!(amount_min(amount, 10_000).unwrap(), U256::ZERO);
        assert!(matches!(
            amount_min(amount, 10_001),
            Err(PriceError::InvalidArgument(_))
        ));
    }

    #[test]
    fn tick_range_new_validates() {
        assert!(TickRange::new(-60, 60).is_ok());
        assert!(matches!(
            TickRange::new(60, 60),
            Err(PriceError::InvalidArgument(_))
        ));
        assert!(matches!(
            TickRange::new(120, 60),
            Err(PriceError::InvalidArgument(_))
        ));
        assert!(matches!(
            TickRange::new(MIN_TICK - 1, 0),
            Err(PriceError::OutOfRange(_))
        ));
    }

    #[test]
    fn full_range_per_spacing() {
        assert_eq!(
            TickRange::full_range(60).unwrap(),
            TickRange {
                lower: -887220,
                upper: 887220
            }
        );
        assert_eq!(
            TickRange::full_range(200).unwrap(),
            TickRange {
                lower: -887200,
                upper: 887200
            }
        );
        assert_eq!(
            TickRange::full_range(1).unwrap(),
            TickRange {
                lower: MIN_TICK,
                upper: MAX_TICK
            }
        );
        assert!(TickRange::full_range(0).is_err());
    }

    #[test]
    fn around_price_is_aligned_and_brackets_price() {
        for tier in FeeTier::ALL {
            let range = TickRange::around_price(2.0, tier, DEFAULT_RANGE_WIDTH).unwrap();
            assert!(range.is_aligned(tier.tick_spacing()), "{tier}: {range}");

            let (low, high) = range.price_bounds().unwrap();
            assert!(low <= 1.8, "{tier}: {low}");
            assert!(high >= 2.2, "{tier}: {high}");
            assert!(range.contains(price_to_tick(2.0).unwrap()));
        }
    }

    #[test]
    fn around_price_at_one() {
        let range = TickRange::around_price(1.0, FeeTier::Medium, 0.1).unwrap();
        // ln(0.9)/ln(1.0001) = -1053.6, ln(1.1)/ln(1.0001) = 953.1
        assert_eq!(range, TickRange { lower: -1080, upper: 960 });
    }

    #[test]
    fn around_price_rejects_bad_width() {
        assert!(TickRange::around_price(1.0, FeeTier::Medium, 0.0).is_err());
        assert!(TickRange::around_price(1.0, FeeTier::Medium, 1.0).is_err());
        assert!(TickRange::around_price(-1.0, FeeTier::Medium, 0.1).is_err());
    }

    #[test]
    fn contains_is_half_open() {
        let range = TickRange::new(-60, 60).unwrap();
        assert!(range.contains(-60));
        assert!(range.contains(0));
        assert!(!range.contains(60));
        assert!(!range.contains(-61));
    }

    #[test]
    fn valid_mint_params_have_no_issues() {
        assert!(mint_params().validate(1_700_000_000).is_empty());
    }

    #[test]
    fn mint_params_collects_every_issue() {
        let params = MintParams {
            token0: TOKEN_HI,
            token1: TOKEN_LO,
            fee: 2500,
            tick_lower: 600,
            tick_upper: 60,
            amount0_desired: U256::ZERO,
            amount1_desired: U256::ZERO,
            deadline: 10,
            ..mint_params()
        };
        let issues = params.validate(20);
        assert_eq!(
            issues,
            vec![
                MintIssue::InvalidFeeTier(2500),
                MintIssue::TokensNotSorted,
                MintIssue::InvalidTickRange,
                MintIssue::NoLiquidityProvided,
                MintIssue::DeadlineExpired {
                    deadline: 10,
                    now: 20
                },
            ]
        );
    }

    #[test]
    fn mint_params_flags_unaligned_ticks() {
        let params = MintParams {
            tick_lower: -887272,
            ..mint_params()
        };
        assert_eq!(
            params.validate(0),
            vec![MintIssue::TickNotAligned {
                tick: -887272,
                tick_spacing: 60
            }]
        );
    }

    #[test]
    fn mint_params_flags_minimum_above_desired() {
        let params = MintParams {
            amount0_min: U256::from(2000u64),
            ..mint_params()
        };
        assert_eq!(params.validate(0), vec![MintIssue::MinimumExceedsDesired]);
    }
}
