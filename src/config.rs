//! Network and contract address configuration.
//!
//! Two networks are built in, Sepolia and the Katana Tatara fork. Either can
//! be replaced by a JSON file of the same shape, and token addresses written
//! by a token deployment (`{"TokenA": "0x..", "TokenB": "0x.."}`) can be
//! merged on top.

use crate::error::ConfigError;
use crate::pool::fee_tier::FeeTier;
use alloy_primitives::{Address, address};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

pub const SEPOLIA_CHAIN_ID: u64 = 11155111;
pub const KATANA_TATARA_CHAIN_ID: u64 = 471;

/// Environment variable that overrides a network's RPC URL.
pub const RPC_URL_ENV: &str = "CLMM_RPC_URL";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContractAddresses {
    pub factory: Address,
    pub position_manager: Address,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub swap_router: Option<Address>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub quoter: Option<Address>,
    pub weth: Address,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NetworkConfig {
    pub name: String,
    pub chain_id: u64,
    pub rpc_url: String,
    pub contracts: ContractAddresses,
    /// Token addresses by name, e.g. `TokenA`, `WETH`.
    #[serde(default)]
    pub tokens: BTreeMap<String, Address>,
    #[serde(default = "default_fee_tier")]
    pub default_fee_tier: FeeTier,
}

fn default_fee_tier() -> FeeTier {
    FeeTier::Medium
}

impl NetworkConfig {
    /// Uniswap V3 deployment on Sepolia.
    pub fn sepolia() -> Self {
        Self {
            name: "sepolia".to_owned(),
            chain_id: SEPOLIA_CHAIN_ID,
            rpc_url: "https://eth-sepolia.g.alchemy.com/v2/your-api-key".to_owned(),
            contracts: ContractAddresses {
                factory: address!("0x0227628f3F023bb0B980b67D528571c95c6DaC1c"),
                position_manager: address!("0x1238536071E1c677A632429e3655c799b22cDA52"),
                swap_router: Some(address!("0x3bFA4769FB09eefC5a80d6E87c3B9C650f7Ae48E")),
                quoter: Some(address!("0xEd1f6473345F45b75F8179591dd5bA1888cf2FB3")),
                weth: address!("0xfff9976782d46cc05630d1f6ebab18b2324d6b14"),
            },
            tokens: BTreeMap::from([
                (
                    "TokenA".to_owned(),
                    address!("0x18Ae0780D1d9325ce7fe45c68F6879b24Ff63FBe"),
                ),
                (
                    "TokenB".to_owned(),
                    address!("0xb9B04519126d3d6D13FE9B5B69cF7e00A1eBFa49"),
                ),
            ]),
            default_fee_tier: FeeTier::Medium,
        }
    }

    /// SushiSwap V3 deployment on a local Katana Tatara fork.
    pub fn katana_tatara() -> Self {
        let weth = address!("0x17B8Ee96E3bcB3b04b3e8334de4524520C51caB4");
        Self {
            name: "katana".to_owned(),
            chain_id: KATANA_TATARA_CHAIN_ID,
            rpc_url: "http://localhost:8545".to_owned(),
            contracts: ContractAddresses {
                factory: address!("0x9B3336186a38E1b6c21955d112dbb0343Ee061eE"),
                position_manager: address!("0x1400feFD6F9b897970f00Df6237Ff2B8b27Dc82C"),
                swap_router: Some(address!("0xAC4c6e212A361c968F1725b4d055b47E63F80b75")),
                quoter: None,
                weth,
            },
            tokens: BTreeMap::from([
                ("WETH".to_owned(), weth),
                (
                    "AUSD".to_owned(),
                    address!("0xa9012a055bd4e0eDfF8Ce09f960291C09D5322dC"),
                ),
            ]),
            default_fee_tier: FeeTier::Medium,
        }
    }

    /// Resolves a built-in network by name.
    pub fn preset(name: &str) -> Result<Self, ConfigError> {
        match name.to_ascii_lowercase().as_str() {
            "sepolia" => Ok(Self::sepolia()),
            "katana" | "katana-tatara" | "tatara" => Ok(Self::katana_tatara()),
            _ => Err(ConfigError::UnknownNetwork(name.to_owned())),
        }
    }

    /// Reads a full network description from a JSON file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        read_json(path.as_ref())
    }

    /// Merges token addresses from a deployment output file on top of the
    /// configured ones.
    pub fn with_deployed_tokens(mut self, path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let deployed: BTreeMap<String, Address> = read_json(path.as_ref())?;
        self.tokens.extend(deployed);
        Ok(self)
    }

    pub fn with_rpc_url(mut self, rpc_url: impl Into<String>) -> Self {
        self.rpc_url = rpc_url.into();
        self
    }

    /// Looks a token up by name, falling back to parsing `name_or_address`
    /// as a literal address.
    pub fn token(&self, name_or_address: &str) -> Option<Address> {
        self.tokens
            .get(name_or_address)
            .copied()
            .or_else(|| name_or_address.parse().ok())
    }

    /// Guards against talking to the wrong node.
    pub fn expect_chain_id(&self, actual: u64) -> Result<(), ConfigError> {
        if actual == self.chain_id {
            Ok(())
        } else {
            Err(ConfigError::WrongChain {
                network: self.name.clone(),
                expected: self.chain_id,
                actual,
            })
        }
    }
}

fn read_json<T: serde::de::DeserializeOwned>(path: &Path) -> Result<T, ConfigError> {
    let content = fs::read_to_string(path).map_err(|source| ConfigError::Io {
        path: path.display().to_string(),
        source,
    })?;
    serde_json::from_str(&content).map_err(|source| ConfigError::Parse {
        path: path.display().to_string(),
        source,
    })
}
