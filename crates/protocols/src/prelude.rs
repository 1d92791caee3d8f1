//! Prelude module for convenient imports.

pub use crate::config::{ChainConfig, NetworkRegistry};
pub use crate::error::{ChainError, ConfigError, ReadOperation};
pub use crate::memory::{ChainSnapshot, InMemoryChain, PoolFixture, TokenFixture};
pub use crate::route_finder::PairRouteFinder;
pub use crate::rpc::RpcProvider;
pub use crate::{ChainReader, RouteFinder, TokenResolver};
