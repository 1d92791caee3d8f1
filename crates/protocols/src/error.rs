//! Errors raised by chain collaborators.

use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// The on-chain read an error came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ReadOperation {
    /// `PoolFactory.getFee(pool, stable)`.
    PoolFee,
    /// `Pool.getReserves()`.
    Reserves,
    /// `Pool.token0()`.
    Token0,
    /// `Pool.token1()`.
    Token1,
    /// `PoolFactory.getPool(tokenA, tokenB, stable)`.
    PoolLookup,
    /// `Router.getAmountsOut(amountIn, routes)`.
    AmountsOut,
    /// `ERC20.symbol()`.
    Symbol,
    /// `ERC20.decimals()`.
    Decimals,
}

impl ReadOperation {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::PoolFee => "getFee",
            Self::Reserves => "getReserves",
            Self::Token0 => "token0",
            Self::Token1 => "token1",
            Self::PoolLookup => "getPool",
            Self::AmountsOut => "getAmountsOut",
            Self::Symbol => "symbol",
            Self::Decimals => "decimals",
        }
    }
}

impl fmt::Display for ReadOperation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ChainError {
    #[error("{operation} failed for {address}: {message}")]
    ReadFailed {
        operation: ReadOperation,
        address: String,
        message: String,
    },

    #[error("{operation} timed out after {timeout_ms}ms for {address}")]
    Timeout {
        operation: ReadOperation,
        address: String,
        timeout_ms: u64,
    },

    #[error("invalid rpc endpoint {url}: {message}")]
    InvalidEndpoint { url: String, message: String },

    #[error("unsupported chain id {0}")]
    UnsupportedChain(u64),
}

impl ChainError {
    /// Which read failed, when the error came from a read.
    pub fn operation(&self) -> Option<ReadOperation> {
        match self {
            Self::ReadFailed { operation, .. } | Self::Timeout { operation, .. } => {
                Some(*operation)
            }
            Self::InvalidEndpoint { .. } | Self::UnsupportedChain(_) => None,
        }
    }

    pub fn is_timeout(&self) -> bool {
        matches!(self, Self::Timeout { .. })
    }
}

/// Errors loading network configuration.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    #[error("invalid value for {key}: {message}")]
    InvalidValue { key: String, message: String },
}
