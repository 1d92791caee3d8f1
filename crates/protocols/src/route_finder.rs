//! Route discovery over factory pools.
//!
//! Candidate token paths are the direct pair and one hop through each
//! configured connector. Each hop may be served by the volatile or the stable
//! pool of the pair. Every combination is priced with the router and the
//! largest output wins.

use crate::config::ChainConfig;
use crate::error::ChainError;
use crate::{ChainReader, RouteFinder};
use async_trait::async_trait;
use sellfee_domain::entities::{Pool, Token};
use sellfee_domain::route::{Route, RouteHop, RouteLeg, RouteQuote};
use sellfee_domain::value_objects::{Address, TokenAmount};
use std::sync::Arc;
use tracing::{debug, info};

/// Route finder backed by `PoolFactory.getPool` and `Router.getAmountsOut`.
pub struct PairRouteFinder<R: ChainReader + ?Sized> {
    reader: Arc<R>,
    config: ChainConfig,
}

/// A hop served by a specific pool.
#[derive(Debug, Clone)]
struct PoolChoice {
    pool: Address,
    stable: bool,
}

impl<R: ChainReader + ?Sized> PairRouteFinder<R> {
    pub fn new(reader: Arc<R>, config: ChainConfig) -> Self {
        Self { reader, config }
    }

    /// Direct path first, then one path per usable connector.
    fn candidate_paths(&self, from: &Address, to: &Address) -> Vec<Vec<Address>> {
        let mut paths = vec![vec![from.clone(), to.clone()]];
        for connector in &self.config.connectors {
            if connector != from && connector != to {
                paths.push(vec![from.clone(), connector.clone(), to.clone()]);
            }
        }
        paths
    }

    /// Volatile and stable pools for a pair, whichever exist.
    async fn pools_for_pair(
        &self,
        token_a: &Address,
        token_b: &Address,
    ) -> Result<Vec<PoolChoice>, ChainError> {
        let factory = &self.config.factory;
        let (volatile, stable) = tokio::try_join!(
            self.reader.get_pool(factory, token_a, token_b, false),
            self.reader.get_pool(factory, token_a, token_b, true),
        )?;

        let mut choices = Vec::with_capacity(2);
        if let Some(pool) = volatile {
            choices.push(PoolChoice {
                pool,
                stable: false,
            });
        }
        if let Some(pool) = stable {
            choices.push(PoolChoice { pool, stable: true });
        }
        Ok(choices)
    }

    /// Every pool combination for a token path; empty when some hop has no pool.
    async fn expand_path(&self, path: &[Address]) -> Result<Vec<Vec<PoolChoice>>, ChainError> {
        let mut combos: Vec<Vec<PoolChoice>> = vec![Vec::new()];

        for pair in path.windows(2) {
            let choices = self.pools_for_pair(&pair[0], &pair[1]).await?;
            if choices.is_empty() {
                return Ok(Vec::new());
            }
            combos = combos
                .into_iter()
                .flat_map(|prefix| {
                    choices.iter().map(move |choice| {
                        let mut next = prefix.clone();
                        next.push(choice.clone());
                        next
                    })
                })
                .collect();
        }

        Ok(combos)
    }

    fn hops_for(&self, path: &[Address], choices: &[PoolChoice]) -> Vec<RouteHop> {
        path.windows(2)
            .zip(choices)
            .map(|(pair, choice)| RouteHop {
                from: pair[0].clone(),
                to: pair[1].clone(),
                stable: choice.stable,
                factory: self.config.factory.clone(),
            })
            .collect()
    }

    async fn load_pool(&self, choice: &PoolChoice) -> Result<Pool, ChainError> {
        let (token0, token1) = tokio::try_join!(
            self.reader.token0(&choice.pool),
            self.reader.token1(&choice.pool),
        )?;
        Ok(Pool::new(choice.pool.clone(), token0, token1, choice.stable))
    }
}

#[async_trait]
impl<R: ChainReader + ?Sized> RouteFinder for PairRouteFinder<R> {
    async fn find_route(
        &self,
        chain_id: u64,
        token_in: &Token,
        token_out: &Token,
        amount_in: TokenAmount,
    ) -> Result<Option<RouteQuote>, ChainError> {
        if chain_id != self.config.chain_id {
            return Err(ChainError::UnsupportedChain(chain_id));
        }

        let from = token_in.path_address();
        let to = token_out.path_address();
        let mut best: Option<(Vec<PoolChoice>, Vec<RouteHop>, TokenAmount)> = None;

        for path in self.candidate_paths(from, to) {
            for choices in self.expand_path(&path).await? {
                let hops = self.hops_for(&path, &choices);
                let amounts = match self
                    .reader
                    .amounts_out(&self.config.router, amount_in, &hops)
                    .await
                {
                    Ok(amounts) => amounts,
                    Err(e) if e.is_timeout() => return Err(e),
                    Err(e) => {
                        // Pools without liquidity revert; skip them.
                        debug!(error = %e, hops = hops.len(), "Candidate route not priceable");
                        continue;
                    }
                };

                let Some(amount_out) = amounts.last().copied() else {
                    continue;
                };
                if amount_out.is_zero() {
                    continue;
                }
                if best.as_ref().is_none_or(|(_, _, current)| amount_out > *current) {
                    best = Some((choices, hops, amount_out));
                }
            }
        }

        let Some((choices, hops, amount_out)) = best else {
            info!(token_in = %from, token_out = %to, "No route found");
            return Ok(None);
        };

        let mut legs = Vec::with_capacity(hops.len());
        for (choice, hop) in choices.iter().zip(hops) {
            legs.push(RouteLeg {
                pool: self.load_pool(choice).await?,
                hop,
            });
        }

        info!(
            token_in = %from,
            token_out = %to,
            hops = legs.len(),
            amount_out = %amount_out,
            "Route found"
        );

        Ok(Some(RouteQuote {
            route: Route::new(legs),
            amount_in,
            amount_out,
        }))
    }
}
