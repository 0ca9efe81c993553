use crate::error::PriceError;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Fee tiers enabled on the V3 factories, in pips (hundredths of a basis point).
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "u32", into = "u32")]
pub enum FeeTier {
    /// 0.01%
    Lowest,
    /// 0.05%
    Low,
    /// 0.3%
    Medium,
    /// 1%
    High,
}

impl FeeTier {
    pub const ALL: [FeeTier; 4] = [FeeTier::Lowest, FeeTier::Low, FeeTier::Medium, FeeTier::High];

    pub fn from_pips(fee_pips: u32) -> Result<Self, PriceError> {
        match fee_pips {
            100 => Ok(FeeTier::Lowest),
            500 => Ok(FeeTier::Low),
            3000 => Ok(FeeTier::Medium),
            10000 => Ok(FeeTier::High),
            other => Err(PriceError::invalid(format!("invalid fee tier: {other}"))),
        }
    }

    #[inline]
    pub const fn pips(self) -> u32 {
        match self {
            FeeTier::Lowest => 100,
            FeeTier::Low => 500,
            FeeTier::Medium => 3000,
            FeeTier::High => 10000,
        }
    }

    /// Tick spacing the factory assigns to pools of this tier.
    #[inline]
    pub const fn tick_spacing(self) -> i32 {
        match self {
            FeeTier::Lowest => 1,
            FeeTier::Low => 10,
            FeeTier::Medium => 60,
            FeeTier::High => 200,
        }
    }

    /// Fee as a percentage, `3000` pips is `0.3`.
    #[inline]
    pub fn percent(self) -> f64 {
        self.pips() as f64 / 10_000.0
    }
}

impl TryFrom<u32> for FeeTier {
    type Error = PriceError;

    fn try_from(fee_pips: u32) -> Result<Self, Self::Error> {
        FeeTier::from_pips(fee_pips)
    }
}

impl From<FeeTier> for u32 {
    fn from(tier: FeeTier) -> u32 {
        tier.pips()
    }
}

impl fmt::Display for FeeTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({}%)", self.pips(), self.percent())
    }
}
