use crate::math::price_math::tick_to_price_adjusted;
use crate::math::sqrt_price_math::decode_sqrt_price;
use crate::pool::position::TickRange;
use alloy_primitives::{Address, U256};

#[cfg(feature = "onchain")]
use crate::config::NetworkConfig;
#[cfg(feature = "onchain")]
use crate::error::{Error, OnchainError};
#[cfg(feature = "onchain")]
use crate::pool::fee_tier::FeeTier;
#[cfg(feature = "onchain")]
use crate::pool::position::sort_tokens;
#[cfg(feature = "onchain")]
use alloy_primitives::aliases::U24;
#[cfg(feature = "onchain")]
use alloy_provider::Provider;
#[cfg(feature = "onchain")]
use alloy_sol_macro::sol;
#[cfg(feature = "onchain")]
use futures::try_join;
#[cfg(feature = "onchain")]
use std::sync::Arc;

#[cfg(feature = "onchain")]
sol! {
    #[sol(rpc)]
    interface IV3Factory {
        function getPool(address tokenA, address tokenB, uint24 fee) external view returns (address pool);
    }

    #[sol(rpc)]
    interface IV3Pool {
        function slot0() external view returns (
            uint160 sqrtPriceX96,
            int24 tick,
            uint16 observationIndex,
            uint16 observationCardinality,
            uint16 observationCardinalityNext,
            uint8 feeProtocol,
            bool unlocked
        );
        function liquidity() external view returns (uint128);
    }

    #[sol(rpc)]
    interface INonfungiblePositionManager {
        function positions(uint256 tokenId) external view returns (
            uint96 nonce,
            address operator,
            address token0,
            address token1,
            uint24 fee,
            int24 tickLower,
            int24 tickUpper,
            uint128 liquidity,
            uint256 feeGrowthInside0LastX128,
            uint256 feeGrowthInside1LastX128,
            uint128 tokensOwed0,
            uint128 tokensOwed1
        );
    }

    #[sol(rpc)]
    interface IERC20Metadata {
        function symbol() external view returns (string);
        function decimals() external view returns (uint8);
    }
}

#[cfg(feature = "onchain")]
pub type OnchainProvider<P> = Arc<P>;

/// Current price and in-range liquidity of a pool.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct PoolState {
    pub sqrt_price_x96: U256,
    pub tick: i32,
    pub liquidity: u128,
}

impl PoolState {
    /// A pool that was created but never had `initialize` called reports a
    /// zero sqrt price.
    #[inline]
    pub fn is_initialized(&self) -> bool {
        !self.sqrt_price_x96.is_zero()
    }

    /// `token1 / token0` decoded from the sqrt price.
    pub fn price(&self) -> f64 {
        decode_sqrt_price(self.sqrt_price_x96)
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TokenInfo {
    pub address: Address,
    pub symbol: String,
    pub decimals: u8,
}

/// A position record as stored by the position manager.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PositionInfo {
    pub token_id: U256,
    pub operator: Address,
    pub token0: Address,
    pub token1: Address,
    pub fee: u32,
    pub tick_lower: i32,
    pub tick_upper: i32,
    pub liquidity: u128,
    pub fee_growth_inside0_last_x128: U256,
    pub fee_growth_inside1_last_x128: U256,
    pub tokens_owed0: u128,
    pub tokens_owed1: u128,
}

impl PositionInfo {
    #[inline]
    pub fn range(&self) -> TickRange {
        TickRange {
            lower: self.tick_lower,
            upper: self.tick_upper,
        }
    }
}

/// Everything needed to report on a position: the record itself, its pool's
/// current state and both tokens.
#[derive(Clone, Debug, PartialEq)]
pub struct PositionSummary {
    pub position: PositionInfo,
    pub pool: Address,
    pub state: PoolState,
    pub token0: TokenInfo,
    pub token1: TokenInfo,
}

impl PositionSummary {
    #[inline]
    pub fn in_range(&self) -> bool {
        self.position.range().contains(self.state.tick)
    }

    /// Decimal-adjusted `token1 / token0` prices at the lower bound, the
    /// upper bound and the current tick.
    pub fn prices(&self) -> Result<(f64, f64, f64), crate::error::PriceError> {
        let (d0, d1) = (self.token0.decimals, self.token1.decimals);
        Ok((
            tick_to_price_adjusted(self.position.tick_lower, d0, d1)?,
            tick_to_price_adjusted(self.position.tick_upper, d0, d1)?,
            tick_to_price_adjusted(self.state.tick, d0, d1)?,
        ))
    }
}

/// Read-only access to the factory, pools and position manager of one
/// network.
#[cfg(feature = "onchain")]
pub struct PoolReader<P> {
    pub network: NetworkConfig,
    provider: OnchainProvider<P>,
    factory: IV3Factory::IV3FactoryInstance<OnchainProvider<P>>,
    position_manager: INonfungiblePositionManager::INonfungiblePositionManagerInstance<
        OnchainProvider<P>,
    >,
}

#[cfg(feature = "onchain")]
impl<P> PoolReader<P>
where
    P: Provider + Send + Sync + 'static,
{
    pub fn new(network: NetworkConfig, provider: OnchainProvider<P>) -> Self {
        let factory = IV3Factory::IV3FactoryInstance::new(network.contracts.factory, provider.clone());
        let position_manager =
            INonfungiblePositionManager::INonfungiblePositionManagerInstance::new(
                network.contracts.position_manager,
                provider.clone(),
            );

        Self {
            network,
            provider,
            factory,
            position_manager,
        }
    }

    pub async fn chain_id(&self) -> Result<u64, OnchainError> {
        self.provider
            .get_chain_id()
            .await
            .map_err(|e| OnchainError::FailedToGetChainId(e.to_string()))
    }

    /// Fails unless the node serves the configured network.
    pub async fn verify_chain(&self) -> Result<u64, Error> {
        let chain_id = self.chain_id().await?;
        log::debug!("connected to chain {chain_id}");
        self.network.expect_chain_id(chain_id)?;
        Ok(chain_id)
    }

    /// Returns the pool for the pair and fee tier, or `None` when the
    /// factory has not created it yet.
    pub async fn pool_address(
        &self,
        token_a: Address,
        token_b: Address,
        fee_tier: FeeTier,
    ) -> Result<Option<Address>, OnchainError> {
        let (token0, token1) = sort_tokens(token_a, token_b);

        let pool = self
            .factory
            .getPool(token0, token1, U24::from(fee_tier.pips()))
            .call()
            .await
            .map_err(|e| OnchainError::FailedToGetPool(e.to_string()))?;

        if pool.is_zero() {
            log::info!("no pool for {token0}/{token1} at fee {}", fee_tier.pips());
            Ok(None)
        } else {
            log::debug!("pool for {token0}/{token1} at fee {}: {pool}", fee_tier.pips());
            Ok(Some(pool))
        }
    }

    /// Fetches `slot0` and `liquidity` of a pool concurrently.
    pub async fn pool_state(&self, pool: Address) -> Result<PoolState, OnchainError> {
        let contract = IV3Pool::IV3PoolInstance::new(pool, self.provider.clone());

        let slot0_call = contract.slot0();
        let liquidity_call = contract.liquidity();

        let (slot0, liquidity) = try_join!(
            async {
                slot0_call
                    .call()
                    .await
                    .map_err(|e| OnchainError::FailedToGetSlot0(e.to_string()))
            },
            async {
                liquidity_call
                    .call()
                    .await
                    .map_err(|e| OnchainError::FailedToGetLiquidity(e.to_string()))
            },
        )?;

        Ok(PoolState {
            sqrt_price_x96: U256::from(slot0.sqrtPriceX96),
            tick: slot0.tick.as_i32(),
            liquidity,
        })
    }

    /// Looks up the pool for a pair and reads its state.
    pub async fn pool_state_for_pair(
        &self,
        token_a: Address,
        token_b: Address,
        fee_tier: FeeTier,
    ) -> Result<(Address, PoolState), OnchainError> {
        let pool = self
            .pool_address(token_a, token_b, fee_tier)
            .await?
            .ok_or_else(|| {
                let (token0, token1) = sort_tokens(token_a, token_b);
                OnchainError::PoolNotFound {
                    token0,
                    token1,
                    fee: fee_tier.pips(),
                }
            })?;
        let state = self.pool_state(pool).await?;
        Ok((pool, state))
    }

    pub async fn token_info(&self, token: Address) -> Result<TokenInfo, OnchainError> {
        let contract = IERC20Metadata::IERC20MetadataInstance::new(token, self.provider.clone());

        let symbol_call = contract.symbol();
        let decimals_call = contract.decimals();

        let (symbol, decimals) = try_join!(
            async {
                symbol_call
                    .call()
                    .await
                    .map_err(|e| OnchainError::FailedToGetToken(e.to_string()))
            },
            async {
                decimals_call
                    .call()
                    .await
                    .map_err(|e| OnchainError::FailedToGetToken(e.to_string()))
            },
        )?;

        Ok(TokenInfo {
            address: token,
            symbol,
            decimals,
        })
    }

    pub async fn position(&self, token_id: U256) -> Result<PositionInfo, OnchainError> {
        let position = self
            .position_manager
            .positions(token_id)
            .call()
            .await
            .map_err(|e| OnchainError::FailedToGetPosition(e.to_string()))?;

        Ok(PositionInfo {
            token_id,
            operator: position.operator,
            token0: position.token0,
            token1: position.token1,
            fee: position.fee.to::<u32>(),
            tick_lower: position.tickLower.as_i32(),
            tick_upper: position.tickUpper.as_i32(),
            liquidity: position.liquidity,
            fee_growth_inside0_last_x128: position.feeGrowthInside0LastX128,
            fee_growth_inside1_last_x128: position.feeGrowthInside1LastX128,
            tokens_owed0: position.tokensOwed0,
            tokens_owed1: position.tokensOwed1,
        })
    }

    /// Reads a position together with its pool state and token metadata.
    pub async fn position_summary(&self, token_id: U256) -> Result<PositionSummary, Error> {
        let position = self.position(token_id).await?;
        log::debug!(
            "position #{token_id}: {}/{} fee {} range [{}, {})",
            position.token0,
            position.token1,
            position.fee,
            position.tick_lower,
            position.tick_upper
        );

        let fee_tier = FeeTier::from_pips(position.fee)?;
        let (pool, state) = self
            .pool_state_for_pair(position.token0, position.token1, fee_tier)
            .await?;
        let (token0, token1) = try_join!(
            self.token_info(position.token0),
            self.token_info(position.token1)
        )?;

        Ok(PositionSummary {
            position,
            pool,
            state,
            token0,
            token1,
        })
    }
}
