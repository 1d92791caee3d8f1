//! Chain collaborators for sell-fee aware quoting.
//!
//! The quote engine only talks to the chain through the traits defined here:
//! - [`TokenResolver`] for ERC-20 metadata
//! - [`RouteFinder`] for best-effort route discovery
//! - [`ChainReader`] for pool, factory and router reads
//!
//! [`rpc::RpcProvider`] implements them over JSON-RPC and
//! [`memory::InMemoryChain`] over a pool snapshot.

/// Network registry and per-chain contract addresses.
pub mod config;
/// Solidity bindings.
pub mod contracts;
/// Error types.
pub mod error;
/// Snapshot-backed chain.
pub mod memory;
/// Prelude module for convenient imports.
pub mod prelude;
/// Factory/router based route discovery.
pub mod route_finder;
/// JSON-RPC client.
pub mod rpc;

use async_trait::async_trait;
use error::ChainError;
use sellfee_domain::entities::Token;
use sellfee_domain::route::{RouteHop, RouteQuote};
use sellfee_domain::value_objects::{Address, Reserves, TokenAmount};

#[async_trait]
pub trait TokenResolver: Send + Sync {
    async fn resolve_token(&self, chain_id: u64, address: &Address) -> Result<Token, ChainError>;
}

#[async_trait]
pub trait RouteFinder: Send + Sync {
    /// Best route between two tokens with naive (untaxed) amounts, `None` if no pool connects them.
    async fn find_route(
        &self,
        chain_id: u64,
        token_in: &Token,
        token_out: &Token,
        amount_in: TokenAmount,
    ) -> Result<Option<RouteQuote>, ChainError>;
}

/// Read-only chain access. Implementations must bound every call with a timeout.
#[async_trait]
pub trait ChainReader: Send + Sync {
    /// Trading fee of `pool` in basis points.
    async fn pool_fee(
        &self,
        factory: &Address,
        pool: &Address,
        stable: bool,
    ) -> Result<u32, ChainError>;

    async fn reserves(&self, pool: &Address) -> Result<Reserves, ChainError>;

    async fn token0(&self, pool: &Address) -> Result<Address, ChainError>;

    async fn token1(&self, pool: &Address) -> Result<Address, ChainError>;

    async fn get_pool(
        &self,
        factory: &Address,
        token_a: &Address,
        token_b: &Address,
        stable: bool,
    ) -> Result<Option<Address>, ChainError>;

    /// Router batch pricing: the input amount followed by the output of every hop.
    async fn amounts_out(
        &self,
        router: &Address,
        amount_in: TokenAmount,
        hops: &[RouteHop],
    ) -> Result<Vec<TokenAmount>, ChainError>;
}
