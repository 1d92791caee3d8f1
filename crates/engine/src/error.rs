//! Quote failures.

use sellfee_domain::DomainError;
use sellfee_domain::value_objects::Address;
use sellfee_protocols::error::{ChainError, ReadOperation};
use thiserror::Error;

/// Every way a quote attempt can fail. None of them are retried.
#[derive(Debug, Error)]
pub enum QuoteError {
    #[error("invalid request: {0}")]
    InvalidRequest(DomainError),

    #[error("unsupported chain id {0}")]
    UnsupportedChain(u64),

    #[error("failed to resolve token {address}: {source}")]
    TokenResolutionFailed {
        address: Address,
        #[source]
        source: ChainError,
    },

    #[error("no route found from {token_in} to {token_out}")]
    NoRouteFound { token_in: Address, token_out: Address },

    #[error("token {token} not found in pool {pool}")]
    PathInconsistent { pool: Address, token: Address },

    #[error("{operation} read failed for {address}: {message}")]
    ChainReadFailed {
        operation: ReadOperation,
        address: String,
        message: String,
    },

    #[error("{operation} read timed out for {address}")]
    ReadTimeout {
        operation: ReadOperation,
        address: String,
    },

    #[error("pool {pool} cannot be priced: {source}")]
    InvalidPoolState {
        pool: Address,
        #[source]
        source: DomainError,
    },

    #[error("configuration error: {0}")]
    Configuration(String),
}

impl From<ChainError> for QuoteError {
    fn from(err: ChainError) -> Self {
        match err {
            ChainError::ReadFailed {
                operation,
                address,
                message,
            } => Self::ChainReadFailed {
                operation,
                address,
                message,
            },
            ChainError::Timeout {
                operation, address, ..
            } => Self::ReadTimeout { operation, address },
            ChainError::UnsupportedChain(chain_id) => Self::UnsupportedChain(chain_id),
            ChainError::InvalidEndpoint { .. } => Self::Configuration(err.to_string()),
        }
    }
}

impl QuoteError {
    /// Short message that is safe to show to the caller.
    pub fn reason(&self) -> String {
        match self {
            Self::InvalidRequest(e) => format!("Invalid request: {e}"),
            Self::UnsupportedChain(chain_id) => format!("Unsupported chain {chain_id}"),
            Self::TokenResolutionFailed { address, .. } => {
                format!("Could not resolve token {address}")
            }
            Self::NoRouteFound { .. } => "No quote found".to_string(),
            Self::PathInconsistent { .. } => {
                "Route does not match pool token ordering".to_string()
            }
            Self::ChainReadFailed { operation, .. } => format!("Chain read failed ({operation})"),
            Self::ReadTimeout { operation, .. } => format!("Chain read timed out ({operation})"),
            Self::InvalidPoolState { .. } => "Pool state cannot be priced".to_string(),
            Self::Configuration(_) => "Quote service is misconfigured".to_string(),
        }
    }

    /// Stable machine-readable code.
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::InvalidRequest(_) => "invalid_request",
            Self::UnsupportedChain(_) => "unsupported_chain",
            Self::TokenResolutionFailed { .. } => "token_resolution_failed",
            Self::NoRouteFound { .. } => "no_route_found",
            Self::PathInconsistent { .. } => "path_inconsistent",
            Self::ChainReadFailed { .. } => "chain_read_failed",
            Self::ReadTimeout { .. } => "read_timeout",
            Self::InvalidPoolState { .. } => "invalid_pool_state",
            Self::Configuration(_) => "configuration",
        }
    }
}
