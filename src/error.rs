use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PriceError {
    #[error("Invalid argument - {0}")]
    InvalidArgument(String),
    #[error("Out of range - {0}")]
    OutOfRange(String),
    #[error("Failed to encode sqrt price: {0}")]
    EncodingFailed(String),
}

impl PriceError {
    pub(crate) fn invalid(msg: impl Into<String>) -> Self {
        Self::InvalidArgument(msg.into())
    }

    pub(crate) fn out_of_range(msg: impl Into<String>) -> Self {
        Self::OutOfRange(msg.into())
    }
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Config error - failed to read {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("Config error - failed to parse {path}: {source}")]
    Parse {
        path: String,
        #[source]
        source: serde_json::Error,
    },
    #[error("Config error - unknown network `{0}`")]
    UnknownNetwork(String),
    #[error("Config error - wrong chain id, expected {expected} ({network}), got {actual}")]
    WrongChain {
        network: String,
        expected: u64,
        actual: u64,
    },
}

#[cfg(feature = "onchain")]
#[derive(Debug, Error)]
pub enum OnchainError {
    #[error("Onchain error - failed to get chain id: {0}")]
    FailedToGetChainId(String),
    #[error("Onchain error - failed to get pool address: {0}")]
    FailedToGetPool(String),
    #[error("Onchain error - failed to get slot0: {0}")]
    FailedToGetSlot0(String),
    #[error("Onchain error - failed to get liquidity: {0}")]
    FailedToGetLiquidity(String),
    #[error("Onchain error - failed to get position: {0}")]
    FailedToGetPosition(String),
    #[error("Onchain error - failed to get token metadata: {0}")]
    FailedToGetToken(String),
    #[error("Onchain error - no pool for {token0}/{token1} at fee {fee}")]
    PoolNotFound {
        token0: alloy_primitives::Address,
        token1: alloy_primitives::Address,
        fee: u32,
    },
}

#[derive(Debug, Error)]
pub enum Error {
    #[error(transparent)]
    PriceError(#[from] crate::error::PriceError),

    #[error(transparent)]
    ConfigError(#[from] crate::error::ConfigError),

    #[cfg(feature = "onchain")]
    #[error(transparent)]
    OnchainError(#[from] crate::error::OnchainError),
}
