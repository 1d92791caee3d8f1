//! Shared fixtures for engine tests.

use sellfee_domain::entities::Pool;
use sellfee_domain::quote::QuoteRequest;
use sellfee_domain::route::{RouteHop, RouteLeg};
use sellfee_domain::value_objects::{Address, TokenAmount};
use sellfee_protocols::config::{BASE_CHAIN_ID, ChainConfig};
use sellfee_protocols::memory::{ChainSnapshot, InMemoryChain, PoolFixture, TokenFixture};

pub const AGENT_KEY: u8 = 0x01;
pub const BASE: u8 = 0x02;
pub const USDC: u8 = 0x03;
pub const WETH: u8 = 0x04;
pub const PAIR: u8 = 0xa1;
pub const SECOND_POOL: u8 = 0xa2;
pub const OTHER_POOL: u8 = 0xa3;
pub const FACTORY: u8 = 0xf0;
pub const ROUTER: u8 = 0xf1;

pub fn addr(n: u8) -> Address {
    Address::parse(&format!("0x{:040x}", n)).unwrap()
}

pub fn factory() -> Address {
    addr(FACTORY)
}

pub fn router() -> Address {
    addr(ROUTER)
}

/// A leg through `pool` (stored as `from`/`to`) traversed from `from` to `to`.
pub fn leg(pool: u8, from: u8, to: u8, stable: bool) -> RouteLeg {
    RouteLeg {
        pool: Pool::new(addr(pool), addr(from), addr(to), stable),
        hop: RouteHop {
            from: addr(from),
            to: addr(to),
            stable,
            factory: factory(),
        },
    }
}

pub fn pool_fixture(pool: u8, token0: u8, token1: u8, reserve0: u64, reserve1: u64, fee_bps: u32) -> PoolFixture {
    PoolFixture {
        address: addr(pool),
        token0: addr(token0),
        token1: addr(token1),
        stable: false,
        reserve0: TokenAmount::from(reserve0),
        reserve1: TokenAmount::from(reserve1),
        fee_bps,
    }
}

pub fn snapshot(pools: Vec<PoolFixture>) -> ChainSnapshot {
    let token = |n: u8, symbol: &str, decimals: u8| TokenFixture {
        address: addr(n),
        symbol: symbol.to_string(),
        decimals,
    };
    ChainSnapshot {
        chain_id: BASE_CHAIN_ID,
        tokens: vec![
            token(AGENT_KEY, "AGENT", 18),
            token(BASE, "VIRTUAL", 18),
            token(USDC, "USDC", 6),
            token(WETH, "WETH", 18),
        ],
        pools,
    }
}

/// The taxed pool: 50M agent key tokens against 20M base tokens at 30 bps.
pub fn worked_example_chain() -> InMemoryChain {
    InMemoryChain::new(snapshot(vec![pool_fixture(
        PAIR, AGENT_KEY, BASE, 50_000_000, 20_000_000, 30,
    )]))
}

/// The taxed pool plus a deep base/USDC pool.
pub fn multi_hop_chain() -> InMemoryChain {
    InMemoryChain::new(snapshot(vec![
        pool_fixture(PAIR, AGENT_KEY, BASE, 50_000_000, 20_000_000, 30),
        pool_fixture(SECOND_POOL, BASE, USDC, 1_000_000_000, 2_000_000_000, 30),
    ]))
}

pub fn config() -> ChainConfig {
    ChainConfig {
        factory: factory(),
        router: router(),
        wrapped_native: addr(WETH),
        connectors: vec![addr(BASE)],
        ..ChainConfig::base()
    }
}

pub fn request(token_in: u8, token_out: u8, amount: u64, total_fee_percent: u32) -> QuoteRequest {
    QuoteRequest {
        chain_id: BASE_CHAIN_ID,
        token_in: addr(token_in),
        token_out: addr(token_out),
        token_in_amount: TokenAmount::from(amount),
        pair_address: addr(PAIR),
        agent_key_address: addr(AGENT_KEY),
        total_fee_percent,
    }
}
