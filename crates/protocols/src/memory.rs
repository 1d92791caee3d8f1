//! In-memory chain backed by a JSON snapshot of pools and tokens.
//!
//! Every pool is priced with the volatile constant-product curve after the
//! pool fee, the same way the router prices a volatile hop. Useful for
//! offline quoting and as a deterministic collaborator in tests.

use crate::error::{ChainError, ReadOperation};
use crate::{ChainReader, TokenResolver};
use async_trait::async_trait;
use sellfee_domain::entities::Token;
use sellfee_domain::math::constant_product::calculate_out_amount;
use sellfee_domain::math::fees::deduct_bps;
use sellfee_domain::route::RouteHop;
use sellfee_domain::value_objects::{Address, Reserves, TokenAmount};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::sync::Mutex;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TokenFixture {
    pub address: Address,
    pub symbol: String,
    pub decimals: u8,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PoolFixture {
    pub address: Address,
    pub token0: Address,
    pub token1: Address,
    #[serde(default)]
    pub stable: bool,
    pub reserve0: TokenAmount,
    pub reserve1: TokenAmount,
    pub fee_bps: u32,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChainSnapshot {
    pub chain_id: u64,
    #[serde(default)]
    pub tokens: Vec<TokenFixture>,
    #[serde(default)]
    pub pools: Vec<PoolFixture>,
}

/// A recorded `getAmountsOut` call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AmountsOutCall {
    pub amount_in: TokenAmount,
    pub hops: Vec<RouteHop>,
}

#[derive(Debug, Default)]
pub struct InMemoryChain {
    snapshot: ChainSnapshot,
    failures: HashSet<ReadOperation>,
    timeouts: HashSet<ReadOperation>,
    amounts_out_calls: Mutex<Vec<AmountsOutCall>>,
}

impl InMemoryChain {
    pub fn new(snapshot: ChainSnapshot) -> Self {
        Self {
            snapshot,
            failures: HashSet::new(),
            timeouts: HashSet::new(),
            amounts_out_calls: Mutex::new(Vec::new()),
        }
    }

    /// Makes every read of `operation` fail.
    #[must_use]
    pub fn with_failure(mut self, operation: ReadOperation) -> Self {
        self.failures.insert(operation);
        self
    }

    /// Makes every read of `operation` report an expired deadline.
    #[must_use]
    pub fn with_timeout(mut self, operation: ReadOperation) -> Self {
        self.timeouts.insert(operation);
        self
    }

    pub fn snapshot(&self) -> &ChainSnapshot {
        &self.snapshot
    }

    /// `getAmountsOut` calls seen so far, oldest first.
    pub fn amounts_out_calls(&self) -> Vec<AmountsOutCall> {
        self.amounts_out_calls
            .lock()
            .map(|calls| calls.clone())
            .unwrap_or_default()
    }

    fn check(&self, operation: ReadOperation, address: &Address) -> Result<(), ChainError> {
        if self.timeouts.contains(&operation) {
            return Err(ChainError::Timeout {
                operation,
                address: address.to_string(),
                timeout_ms: 0,
            });
        }
        if self.failures.contains(&operation) {
            return Err(ChainError::ReadFailed {
                operation,
                address: address.to_string(),
                message: "injected failure".to_string(),
            });
        }
        Ok(())
    }

    fn pool(&self, operation: ReadOperation, address: &Address) -> Result<&PoolFixture, ChainError> {
        self.check(operation, address)?;
        self.snapshot
            .pools
            .iter()
            .find(|p| &p.address == address)
            .ok_or_else(|| ChainError::ReadFailed {
                operation,
                address: address.to_string(),
                message: "execution reverted: no contract".to_string(),
            })
    }

    fn find_pool(&self, a: &Address, b: &Address, stable: bool) -> Option<&PoolFixture> {
        self.snapshot.pools.iter().find(|p| {
            p.stable == stable
                && ((&p.token0 == a && &p.token1 == b) || (&p.token0 == b && &p.token1 == a))
        })
    }

    fn price_hop(&self, router: &Address, amount_in: TokenAmount, hop: &RouteHop) -> Result<TokenAmount, ChainError> {
        let revert = |message: String| ChainError::ReadFailed {
            operation: ReadOperation::AmountsOut,
            address: router.to_string(),
            message,
        };

        let pool = self
            .find_pool(&hop.from, &hop.to, hop.stable)
            .ok_or_else(|| revert(format!("no pool for {} -> {}", hop.from, hop.to)))?;
        let (reserve_in, reserve_out) = if pool.token0 == hop.from {
            (pool.reserve0, pool.reserve1)
        } else {
            (pool.reserve1, pool.reserve0)
        };

        let after_fee = deduct_bps(amount_in, pool.fee_bps).map_err(|e| revert(e.to_string()))?;
        calculate_out_amount(after_fee, reserve_in, reserve_out).map_err(|e| revert(e.to_string()))
    }
}

#[async_trait]
impl ChainReader for InMemoryChain {
    async fn pool_fee(
        &self,
        _factory: &Address,
        pool: &Address,
        _stable: bool,
    ) -> Result<u32, ChainError> {
        Ok(self.pool(ReadOperation::PoolFee, pool)?.fee_bps)
    }

    async fn reserves(&self, pool: &Address) -> Result<Reserves, ChainError> {
        let pool = self.pool(ReadOperation::Reserves, pool)?;
        Ok(Reserves::new(pool.reserve0, pool.reserve1))
    }

    async fn token0(&self, pool: &Address) -> Result<Address, ChainError> {
        Ok(self.pool(ReadOperation::Token0, pool)?.token0.clone())
    }

    async fn token1(&self, pool: &Address) -> Result<Address, ChainError> {
        Ok(self.pool(ReadOperation::Token1, pool)?.token1.clone())
    }

    async fn get_pool(
        &self,
        factory: &Address,
        token_a: &Address,
        token_b: &Address,
        stable: bool,
    ) -> Result<Option<Address>, ChainError> {
        self.check(ReadOperation::PoolLookup, factory)?;
        Ok(self
            .find_pool(token_a, token_b, stable)
            .map(|p| p.address.clone()))
    }

    async fn amounts_out(
        &self,
        router: &Address,
        amount_in: TokenAmount,
        hops: &[RouteHop],
    ) -> Result<Vec<TokenAmount>, ChainError> {
        self.check(ReadOperation::AmountsOut, router)?;
        if let Ok(mut calls) = self.amounts_out_calls.lock() {
            calls.push(AmountsOutCall {
                amount_in,
                hops: hops.to_vec(),
            });
        }

        let mut amounts = Vec::with_capacity(hops.len() + 1);
        amounts.push(amount_in);
        let mut current = amount_in;
        for hop in hops {
            current = self.price_hop(router, current, hop)?;
            amounts.push(current);
        }
        Ok(amounts)
    }
}

#[async_trait]
impl TokenResolver for InMemoryChain {
    async fn resolve_token(&self, chain_id: u64, address: &Address) -> Result<Token, ChainError> {
        if chain_id != self.snapshot.chain_id {
            return Err(ChainError::UnsupportedChain(chain_id));
        }
        self.check(ReadOperation::Symbol, address)?;
        self.snapshot
            .tokens
            .iter()
            .find(|t| &t.address == address)
            .map(|t| Token::new(chain_id, t.address.clone(), t.symbol.clone(), t.decimals))
            .ok_or_else(|| ChainError::ReadFailed {
                operation: ReadOperation::Symbol,
                address: address.to_string(),
                message: "execution reverted".to_string(),
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn addr(n: u8) -> Address {
        Address::parse(&format!("0x{:040x}", n)).unwrap()
    }

    fn chain() -> InMemoryChain {
        InMemoryChain::new(ChainSnapshot {
            chain_id: 8453,
            tokens: vec![TokenFixture {
                address: addr(1),
                symbol: "AK".to_string(),
                decimals: 18,
            }],
            pools: vec![PoolFixture {
                address: addr(0xaa),
                token0: addr(1),
                token1: addr(2),
                stable: false,
                reserve0: TokenAmount::from(1_000u64),
                reserve1: TokenAmount::from(1_000u64),
                fee_bps: 0,
            }],
        })
    }

    fn hop(from: u8, to: u8) -> RouteHop {
        RouteHop {
            from: addr(from),
            to: addr(to),
            stable: false,
            factory: addr(0xff),
        }
    }

    #[tokio::test]
    async fn test_amounts_out_prices_both_directions() {
        let chain = chain();
        let out = chain
            .amounts_out(&addr(0xee), TokenAmount::from(10u64), &[hop(1, 2)])
            .await
            .unwrap();
        assert_eq!(out, vec![TokenAmount::from(10u64), TokenAmount::from(9u64)]);

        let back = chain
            .amounts_out(&addr(0xee), TokenAmount::from(10u64), &[hop(2, 1)])
            .await
            .unwrap();
        assert_eq!(back[1], TokenAmount::from(9u64));
        assert_eq!(chain.amounts_out_calls().len(), 2);
    }

    #[tokio::test]
    async fn test_missing_pool_reverts() {
        let err = chain()
            .amounts_out(&addr(0xee), TokenAmount::from(10u64), &[hop(1, 3)])
            .await
            .unwrap_err();
        assert_eq!(err.operation(), Some(ReadOperation::AmountsOut));
    }

    #[tokio::test]
    async fn test_injected_failure() {
        let chain = chain().with_failure(ReadOperation::Reserves);
        let err = chain.reserves(&addr(0xaa)).await.unwrap_err();
        assert_eq!(err.operation(), Some(ReadOperation::Reserves));
        assert!(chain.token0(&addr(0xaa)).await.is_ok());
    }

    #[tokio::test]
    async fn test_injected_timeout() {
        let chain = chain().with_timeout(ReadOperation::PoolFee);
        let err = chain.pool_fee(&addr(0xff), &addr(0xaa), false).await.unwrap_err();
        assert!(err.is_timeout());
        assert_eq!(err.operation(), Some(ReadOperation::PoolFee));
    }

    #[tokio::test]
    async fn test_get_pool_is_order_insensitive() {
        let chain = chain();
        let found = chain.get_pool(&addr(0xff), &addr(2), &addr(1), false).await.unwrap();
        assert_eq!(found, Some(addr(0xaa)));
        assert_eq!(
            chain.get_pool(&addr(0xff), &addr(1), &addr(2), true).await.unwrap(),
            None
        );
    }

    #[test]
    fn test_snapshot_from_json() {
        let raw = r#"{
            "chainId": 8453,
            "pools": [{
                "address": "0x00000000000000000000000000000000000000aa",
                "token0": "0x0000000000000000000000000000000000000001",
                "token1": "0x0000000000000000000000000000000000000002",
                "reserve0": "1000",
                "reserve1": "2000",
                "feeBps": 30
            }]
        }"#;
        let snapshot: ChainSnapshot = serde_json::from_str(raw).unwrap();
        assert_eq!(snapshot.pools[0].fee_bps, 30);
        assert!(!snapshot.pools[0].stable);
        assert!(snapshot.tokens.is_empty());
    }
}
