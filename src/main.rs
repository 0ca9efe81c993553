use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use clmm_price_utils::config::{NetworkConfig, RPC_URL_ENV};
use clmm_price_utils::math::tick_math::checked_tick;
use clmm_price_utils::pool::fee_tier::FeeTier;
use clmm_price_utils::pool::position::{DEFAULT_RANGE_WIDTH, TickRange};
use clmm_price_utils::{
    U256, decode_sqrt_price, encode_sqrt_price, format_price_e18, is_valid_sqrt_price,
    nearest_usable_tick, price_to_tick, tick_to_price, tick_to_price_adjusted,
};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "clmm-price")]
#[command(about = "Tick and sqrtPriceX96 conversions for V3 style pools")]
struct Args {
    /// Built-in network preset (sepolia, katana)
    #[arg(short, long, default_value = "sepolia")]
    network: String,

    /// Network description file, replaces the preset
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Deployed token addresses to merge into the network's token list
    #[arg(long)]
    deployed: Option<PathBuf>,

    /// RPC URL, overrides the network's
    #[arg(long, env = RPC_URL_ENV)]
    rpc_url: Option<String>,

    /// Verbose logging
    #[arg(short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Encode reserve1 / reserve0 as sqrtPriceX96
    EncodeSqrtPrice { reserve1: String, reserve0: String },

    /// Decode a sqrtPriceX96 into reserve1 / reserve0
    DecodeSqrtPrice { sqrt_price_x96: String },

    /// Tick at or below a price
    PriceToTick {
        #[arg(allow_negative_numbers = true)]
        price: f64,
    },

    /// Price at a tick, 18 decimals
    TickToPrice {
        #[arg(allow_negative_numbers = true, value_parser = parse_tick)]
        tick: i32,

        /// Decimals of token0, with --decimals1 prints a human readable price
        #[arg(long, requires = "decimals1")]
        decimals0: Option<u8>,

        #[arg(long, requires = "decimals0")]
        decimals1: Option<u8>,
    },

    /// Round a tick to the nearest usable one
    NearestTick {
        #[arg(allow_negative_numbers = true, value_parser = parse_tick)]
        tick: i32,

        /// Tick spacing, defaults to the fee tier's
        #[arg(long)]
        spacing: Option<i32>,

        /// Fee tier in pips
        #[arg(long, default_value = "3000")]
        fee: u32,
    },

    /// Tick range around a price, aligned to the fee tier's spacing
    Range {
        price: f64,

        #[arg(long, default_value = "3000")]
        fee: u32,

        /// Relative half-width of the range
        #[arg(long, default_value_t = DEFAULT_RANGE_WIDTH)]
        width: f64,
    },

    /// Widest range for a fee tier
    FullRange {
        #[arg(long, default_value = "3000")]
        fee: u32,
    },

    /// Show whether a pool exists and its current state
    #[cfg(feature = "onchain")]
    CheckPool {
        /// Token name from the network config, or an address
        #[arg(long, default_value = "TokenA")]
        token_a: String,

        #[arg(long, default_value = "TokenB")]
        token_b: String,

        /// Fee tier in pips, defaults to the network's
        #[arg(long)]
        fee: Option<u32>,
    },

    /// Show a position's range, status and uncollected fees
    #[cfg(feature = "onchain")]
    QueryPosition {
        #[arg(env = "TOKEN_ID")]
        token_id: String,
    },
}

fn parse_tick(s: &str) -> Result<i32, String> {
    let value: f64 = s.parse().map_err(|_| format!("`{s}` is not a number"))?;
    checked_tick(value).map_err(|e| e.to_string())
}

/// Network flags only matter to commands that talk to a node.
#[cfg_attr(not(feature = "onchain"), allow(dead_code))]
fn load_network(args: &Args) -> Result<NetworkConfig> {
    let mut network = match &args.config {
        Some(path) => NetworkConfig::load(path)?,
        None => NetworkConfig::preset(&args.network)?,
    };
    if let Some(path) = &args.deployed {
        network = network.with_deployed_tokens(path)?;
    }
    if let Some(rpc_url) = &args.rpc_url {
        network = network.with_rpc_url(rpc_url.clone());
    }
    log::debug!("network {} (chain {})", network.name, network.chain_id);
    Ok(network)
}

fn main() -> Result<()> {
    let args = Args::parse();

    env_logger::Builder::from_env(
        env_logger::Env::default().default_filter_or(if args.verbose { "debug" } else { "warn" }),
    )
    .init();

    run(args)
}

fn run(args: Args) -> Result<()> {
    match &args.command {
        Command::EncodeSqrtPrice { reserve1, reserve0 } => {
            let sqrt_price_x96 = encode_sqrt_price(reserve1, reserve0)?;
            if !is_valid_sqrt_price(sqrt_price_x96) {
                log::warn!("{sqrt_price_x96} is outside the range a pool accepts");
            }
            println!("{sqrt_price_x96}");
        }
        Command::DecodeSqrtPrice { sqrt_price_x96 } => {
            let sqrt_price_x96: U256 = sqrt_price_x96
                .parse()
                .with_context(|| format!("invalid sqrtPriceX96 `{sqrt_price_x96}`"))?;
            println!("{}", decode_sqrt_price(sqrt_price_x96));
        }
        Command::PriceToTick { price } => {
            println!("{}", price_to_tick(*price)?);
        }
        Command::TickToPrice {
            tick,
            decimals0,
            decimals1,
        } => match (decimals0, decimals1) {
            (Some(d0), Some(d1)) => println!("{}", tick_to_price_adjusted(*tick, *d0, *d1)?),
            _ => {
                let price = tick_to_price(*tick)?;
                println!("{price} ({})", format_price_e18(price));
            }
        },
        Command::NearestTick { tick, spacing, fee } => {
            let spacing = match spacing {
                Some(spacing) => *spacing,
                None => FeeTier::from_pips(*fee)?.tick_spacing(),
            };
            println!("{}", nearest_usable_tick(*tick, spacing)?);
        }
        Command::Range { price, fee, width } => {
            let tier = FeeTier::from_pips(*fee)?;
            let range = TickRange::around_price(*price, tier, *width)?;
            let (low, high) = range.price_bounds()?;
            println!("tickLower: {}", range.lower);
            println!("tickUpper: {}", range.upper);
            println!("price range: {low:.6} to {high:.6}");
        }
        Command::FullRange { fee } => {
            let tier = FeeTier::from_pips(*fee)?;
            let range = TickRange::full_range(tier.tick_spacing())?;
            println!("tickLower: {}", range.lower);
            println!("tickUpper: {}", range.upper);
        }
        #[cfg(feature = "onchain")]
        Command::CheckPool {
            token_a,
            token_b,
            fee,
        } => {
            let network = load_network(&args)?;
            let token_a = resolve_token(&network, token_a)?;
            let token_b = resolve_token(&network, token_b)?;
            let fee_tier = match fee {
                Some(fee) => FeeTier::from_pips(*fee)?,
                None => network.default_fee_tier,
            };
            runtime()?.block_on(onchain::check_pool(network, token_a, token_b, fee_tier))?;
        }
        #[cfg(feature = "onchain")]
        Command::QueryPosition { token_id } => {
            let network = load_network(&args)?;
            let token_id: U256 = token_id
                .parse()
                .with_context(|| format!("invalid token id `{token_id}`"))?;
            runtime()?.block_on(onchain::query_position(network, token_id))?;
        }
    }

    Ok(())
}

#[cfg(feature = "onchain")]
fn runtime() -> Result<tokio::runtime::Runtime> {
    tokio::runtime::Runtime::new().context("failed to start async runtime")
}

#[cfg(feature = "onchain")]
fn resolve_token(
    network: &NetworkConfig,
    name_or_address: &str,
) -> Result<clmm_price_utils::Address> {
    match network.token(name_or_address) {
        Some(address) => Ok(address),
        None => anyhow::bail!("unknown token `{name_or_address}` on {}", network.name),
    }
}

#[cfg(feature = "onchain")]
mod onchain {
    use super::*;
    use alloy_provider::ProviderBuilder;
    use clmm_price_utils::Address;
    use clmm_price_utils::pool::v3_pool::PoolReader;
    use std::sync::Arc;

    fn connect(network: NetworkConfig) -> Result<PoolReader<impl alloy_provider::Provider>> {
        let url = network
            .rpc_url
            .parse()
            .with_context(|| format!("invalid RPC URL `{}`", network.rpc_url))?;
        let provider = ProviderBuilder::new().connect_http(url);
        Ok(PoolReader::new(network, Arc::new(provider)))
    }

    pub async fn check_pool(
        network: NetworkConfig,
        token_a: Address,
        token_b: Address,
        fee_tier: FeeTier,
    ) -> Result<()> {
        let reader = connect(network)?;
        reader.verify_chain().await?;

        println!("Checking pool on {}", reader.network.name);
        println!("TokenA: {token_a}");
        println!("TokenB: {token_b}");
        println!("Fee Tier: {fee_tier}\n");

        let Some(pool) = reader.pool_address(token_a, token_b, fee_tier).await? else {
            println!("Pool does not exist yet!");
            return Ok(());
        };
        println!("Pool exists at: {pool}\n");

        let state = reader.pool_state(pool).await?;
        if !state.is_initialized() {
            println!("Pool is not initialized");
            return Ok(());
        }

        println!("Liquidity: {}", state.liquidity);
        println!("Sqrt Price X96: {}", state.sqrt_price_x96);
        println!("Current Tick: {}", state.tick);
        println!("Price: {:.6}", state.price());
        println!(
            "Price (tick, 18 decimals): {}",
            format_price_e18(tick_to_price(state.tick)?)
        );
        Ok(())
    }

    pub async fn query_position(network: NetworkConfig, token_id: U256) -> Result<()> {
        let reader = connect(network)?;
        reader.verify_chain().await?;

        let summary = reader
            .position_summary(token_id)
            .await
            .with_context(|| format!("failed to query position #{token_id}"))?;
        let (lower, upper, current) = summary.prices()?;
        let (symbol0, symbol1) = (&summary.token0.symbol, &summary.token1.symbol);
        let position = &summary.position;

        println!("Position #{token_id}");
        println!("Operator: {}", position.operator);
        println!("Token0: {symbol0} ({})", position.token0);
        println!("Token1: {symbol1} ({})", position.token1);
        println!("Fee Tier: {}%", position.fee as f64 / 10_000.0);
        println!("Pool: {}\n", summary.pool);

        println!(
            "Tick Range: {} to {}",
            position.tick_lower, position.tick_upper
        );
        println!("Price Range: {lower:.6} to {upper:.6} {symbol1}/{symbol0}");
        println!("Current Tick: {}", summary.state.tick);
        println!("Current Price: {current:.6} {symbol1}/{symbol0}");
        println!(
            "Status: {}\n",
            if summary.in_range() {
                "in range"
            } else {
                "out of range"
            }
        );

        println!("Liquidity: {}", position.liquidity);
        println!("Uncollected {symbol0}: {}", position.tokens_owed0);
        println!("Uncollected {symbol1}: {}", position.tokens_owed1);
        println!(
            "Fee growth inside: {} / {}",
            position.fee_growth_inside0_last_x128, position.fee_growth_inside1_last_x128
        );
        Ok(())
    }
}
