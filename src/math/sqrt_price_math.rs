use crate::Q96;
use crate::error::PriceError;
use crate::math::math_helpers::f64_to_u256_floor;
use alloy_primitives::U256;
use std::fmt;
use std::str::FromStr;

/// Integer factor applied to the floating point square root before it is
/// lifted into Q96, so that `sqrt(ratio) * 2^96` is not formed in `f64`.
pub const SQRT_PRICE_SCALE: U256 = U256::from_limbs([1_000_000_000_000, 0, 0, 0]);
const SQRT_PRICE_SCALE_F64: f64 = 1e12;

/// A strictly positive token reserve.
///
/// Keeps the textual form it was built from next to its numeric value, so
/// that two reserves written identically compare equal without going through
/// floating point.
#[derive(Clone, Debug, PartialEq)]
pub struct Reserve {
    repr: String,
    value: f64,
}

impl Reserve {
    #[inline]
    pub fn value(&self) -> f64 {
        self.value
    }

    #[inline]
    pub fn as_str(&self) -> &str {
        &self.repr
    }
}

impl FromStr for Reserve {
    type Err = PriceError;

    /// Parses a decimal reserve amount.
    ///
    /// Empty, zero and negative inputs are rejected as `InvalidArgument`.
    /// Anything that is not a number at all is an `EncodingFailed`, as the
    /// failure only shows once the ratio is computed.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let repr = s.trim();
        if repr.is_empty() {
            return Err(PriceError::invalid("both reserves must be provided"));
        }

        let value: f64 = repr.parse().map_err(|_| {
            PriceError::EncodingFailed(format!("reserve `{repr}` is not a number"))
        })?;

        if value.is_nan() {
            return Err(PriceError::EncodingFailed(format!(
                "reserve `{repr}` is not a number"
            )));
        }
        if value <= 0.0 {
            return Err(PriceError::invalid(format!(
                "reserves must be positive numbers, got {repr}"
            )));
        }

        Ok(Self {
            repr: repr.to_owned(),
            value,
        })
    }
}

impl TryFrom<u128> for Reserve {
    type Error = PriceError;

    fn try_from(amount: u128) -> Result<Self, Self::Error> {
        if amount == 0 {
            return Err(PriceError::invalid("reserves must be positive numbers, got 0"));
        }
        Ok(Self {
            repr: amount.to_string(),
            value: amount as f64,
        })
    }
}

impl fmt::Display for Reserve {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.repr)
    }
}

/// The two reserves whose ratio `reserve1 / reserve0` is the pool price.
#[derive(Clone, Debug, PartialEq)]
pub struct ReservePair {
    pub reserve1: Reserve,
    pub reserve0: Reserve,
}

impl ReservePair {
    pub fn new(reserve1: Reserve, reserve0: Reserve) -> Self {
        Self { reserve1, reserve0 }
    }

    /// Parses both reserves from their decimal form.
    pub fn parse(reserve1: &str, reserve0: &str) -> Result<Self, PriceError> {
        let reserve1 = reserve1.parse::<Reserve>();
        let reserve0 = reserve0.parse::<Reserve>();
        // a missing reserve is reported before a malformed one
        match (reserve1, reserve0) {
            (Ok(reserve1), Ok(reserve0)) => Ok(Self { reserve1, reserve0 }),
            (Err(e @ PriceError::InvalidArgument(_)), _)
            | (_, Err(e @ PriceError::InvalidArgument(_))) => Err(e),
            (Err(e), _) | (_, Err(e)) => Err(e),
        }
    }

    /// Encodes this pair as a Q64.96 sqrt price, see [`encode_sqrt_price`].
    pub fn sqrt_price_x96(&self) -> Result<U256, PriceError> {
        if self.reserve1.repr == self.reserve0.repr {
            return Ok(Q96);
        }

        let ratio = self.reserve1.value / self.reserve0.value;
        let sqrt_ratio = ratio.sqrt();
        if !sqrt_ratio.is_finite() {
            return Err(PriceError::EncodingFailed(format!(
                "ratio {} / {} is not finite",
                self.reserve1, self.reserve0
            )));
        }

        let scaled = f64_to_u256_floor(sqrt_ratio * SQRT_PRICE_SCALE_F64)?;
        let product = scaled.checked_mul(Q96).ok_or_else(|| {
            PriceError::EncodingFailed(format!(
                "sqrt price for {} / {} overflows 256 bits",
                self.reserve1, self.reserve0
            ))
        })?;

        Ok(product / SQRT_PRICE_SCALE)
    }
}

/// Encodes the price `reserve1 / reserve0` as `sqrt(price) * 2^96`, the
/// value a pool expects in `initialize(sqrtPriceX96)`.
///
/// Identical reserves always encode to exactly `Q96`. Other ratios go through
/// an `f64` square root scaled by `1e12` before the integer multiply, which
/// keeps roughly twelve significant digits; extreme ratios lose more.
pub fn encode_sqrt_price(reserve1: &str, reserve0: &str) -> Result<U256, PriceError> {
    ReservePair::parse(reserve1, reserve0)?.sqrt_price_x96()
}

/// Integer variant of [`encode_sqrt_price`].
pub fn encode_sqrt_price_from_amounts(reserve1: u128, reserve0: u128) -> Result<U256, PriceError> {
    ReservePair::new(Reserve::try_from(reserve1)?, Reserve::try_from(reserve0)?).sqrt_price_x96()
}

/// Decodes a Q64.96 sqrt price back into `reserve1 / reserve0`.
///
/// An uninitialized pool reports a zero sqrt price, which decodes to `0.0`.
pub fn decode_sqrt_price(sqrt_price_x96: U256) -> f64 {
    let sqrt_price = f64::from(sqrt_price_x96) / f64::from(Q96);
    sqrt_price * sqrt_price
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::math::tick_math::{MAX_SQRT_RATIO, MIN_SQRT_RATIO};

    const Q96_STR: &str = "79228162514264337593543950336";

    #[test]
    fn encode_equal_reserves_is_exactly_q96() {
        assert_eq!(encode_sqrt_price("100", "100").unwrap().to_string(), Q96_STR);
        assert_eq!(encode_sqrt_price("1", "1").unwrap(), Q96);
        assert_eq!(encode_sqrt_price("0.5", "0.5").unwrap(), Q96);
        assert_eq!(
            encode_sqrt_price("123456789012345678901234567890", "123456789012345678901234567890")
                .unwrap(),
            Q96
        );
        assert_eq!(encode_sqrt_price_from_amounts(7, 7).unwrap(), Q96);
    }

    #[test]
    fn encode_equal_value_different_spelling_is_q96() {
        // falls through to the float path, ratio 1.0 is still exact
        assert_eq!(encode_sqrt_price("1", "1.0").unwrap(), Q96);
        assert_eq!(encode_sqrt_price("1e3", "1000").unwrap(), Q96);
    }

    #[test]
    fn encode_ratio_four_is_two_q96() {
        assert_eq!(encode_sqrt_price("4", "1").unwrap(), Q96 * U256::from(2u8));
        assert_eq!(encode_sqrt_price("1", "4").unwrap(), Q96 / U256::from(2u8));
        assert_eq!(
            encode_sqrt_price_from_amounts(100, 1).unwrap(),
            Q96 * U256::from(10u8)
        );
    }

    #[test]
    fn encode_irrational_ratio_is_close() {
        // floor(sqrt(2) * 2^96)
        let encoded = encode_sqrt_price("2", "1").unwrap();
        let expected = U256::from(112045541949572279837463876454u128);
        let diff = if encoded > expected {
            encoded - expected
        } else {
            expected - encoded
        };
        // twelve significant digits on a ~1.1e29 value
        assert!(diff < U256::from(100_000_000_000_000_000u128), "diff {diff}");
        assert!(encoded <= expected);
    }

    #[test]
    fn encode_tiny_ratio_floors_to_zero() {
        assert_eq!(encode_sqrt_price("1", "1e30").unwrap(), U256::ZERO);
    }

    #[test]
    fn encode_result_is_a_valid_pool_price_for_usual_ratios() {
        for (r1, r0) in [("1", "3000"), ("3000", "1"), ("1000000", "1"), ("1", "1000000")] {
            let encoded = encode_sqrt_price(r1, r0).unwrap();
            assert!(encoded >= MIN_SQRT_RATIO && encoded < MAX_SQRT_RATIO);
        }
    }

    #[test]
    fn encode_rejects_missing_zero_and_negative() {
        for (r1, r0) in [("", "1"), ("1", ""), ("0", "1"), ("1", "0"), ("-5", "1"), ("1", "-0.1")] {
            assert!(
                matches!(encode_sqrt_price(r1, r0), Err(PriceError::InvalidArgument(_))),
                "({r1}, {r0})"
            );
        }
        assert!(matches!(
            encode_sqrt_price_from_amounts(0, 1),
            Err(PriceError::InvalidArgument(_))
        ));
    }

    #[test]
    fn encode_wraps_non_numeric_input() {
        assert!(matches!(
            encode_sqrt_price("abc", "1"),
            Err(PriceError::EncodingFailed(_))
        ));
        assert!(matches!(
            encode_sqrt_price("1", "NaN"),
            Err(PriceError::EncodingFailed(_))
        ));
        assert!(matches!(
            encode_sqrt_price("1e308", "1e-308"),
            Err(PriceError::EncodingFailed(_))
        ));
    }

    #[test]
    fn encode_error_message_carries_cause() {
        let err = encode_sqrt_price("abc", "1").unwrap_err();
        assert_eq!(
            err.to_string(),
            "Failed to encode sqrt price: reserve `abc` is not a number"
        );
    }

    #[test]
    fn missing_reserve_reported_before_malformed() {
        assert!(matches!(
            ReservePair::parse("abc", ""),
            Err(PriceError::InvalidArgument(_))
        ));
    }

    #[test]
    fn decode_inverts_encode() {
        assert_eq!(decode_sqrt_price(Q96), 1.0);
        assert_eq!(decode_sqrt_price(U256::ZERO), 0.0);
        assert_eq!(decode_sqrt_price(Q96 * U256::from(2u8)), 4.0);

        let encoded = encode_sqrt_price("3000", "1").unwrap();
        let decoded = decode_sqrt_price(encoded);
        assert!((decoded - 3000.0).abs() / 3000.0 < 1e-9, "decoded {decoded}");
    }

    #[test]
    fn reserve_keeps_trimmed_repr() {
        let reserve: Reserve = " 42 ".parse().unwrap();
        assert_eq!(reserve.as_str(), "42");
        assert_eq!(reserve.value(), 42.0);
        assert_eq!(reserve.to_string(), "42");
    }
}
