//! Path canonicalization.
//!
//! Pools only know `token0`/`token1`. Walking the route from the input token
//! recovers the direction of every hop, which the router needs and which the
//! sell-fee correction relies on.

use crate::error::QuoteError;
use crate::policy::HopStability;
use sellfee_domain::DomainError;
use sellfee_domain::entities::Pool;
use sellfee_domain::route::{Route, RouteHop};
use sellfee_domain::value_objects::Address;

/// Token path in swap order and the router hops derived from it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CanonicalRoute {
    pub tokens: Vec<Address>,
    pub hops: Vec<RouteHop>,
}

impl CanonicalRoute {
    /// Hops after the first pool.
    pub fn remaining_hops(&self) -> &[RouteHop] {
        self.hops.get(1..).unwrap_or(&[])
    }

    pub fn is_multi_hop(&self) -> bool {
        self.tokens.len() > 2
    }
}

/// Walks `pools` from `start`, appending the opposite token of each pool.
///
/// Fails with [`QuoteError::PathInconsistent`] on the first pool that does
/// not hold the current tail; nothing partial is returned.
pub fn token_path<'a, I>(start: &Address, pools: I) -> Result<Vec<Address>, QuoteError>
where
    I: IntoIterator<Item = &'a Pool>,
{
    let mut path = vec![start.clone()];

    for pool in pools {
        let tail = path.last().unwrap_or(start);
        let next = pool
            .other_token(tail)
            .map_err(|_| QuoteError::PathInconsistent {
                pool: pool.address.clone(),
                token: tail.clone(),
            })?
            .clone();
        path.push(next);
    }

    Ok(path)
}

/// One router hop per consecutive pair of `tokens`.
pub fn build_hops(
    tokens: &[Address],
    pools: &[Pool],
    factory: &Address,
    stability: HopStability,
) -> Vec<RouteHop> {
    tokens
        .windows(2)
        .zip(pools)
        .map(|(pair, pool)| RouteHop {
            from: pair[0].clone(),
            to: pair[1].clone(),
            stable: match stability {
                HopStability::ForceVolatile => false,
                HopStability::FromPool => pool.is_stable,
            },
            factory: factory.clone(),
        })
        .collect()
}

/// Canonicalizes `route` starting at `start` (the wrapped input token).
pub fn canonicalize(
    start: &Address,
    route: &Route,
    factory: &Address,
    stability: HopStability,
) -> Result<CanonicalRoute, QuoteError> {
    if let Err(DomainError::DiscontinuousRoute { index, to, .. }) = route.check_continuity() {
        return Err(QuoteError::PathInconsistent {
            pool: route.legs[index + 1].pool.address.clone(),
            token: to,
        });
    }

    let pools: Vec<Pool> = route.pools().cloned().collect();
    let tokens = token_path(start, &pools)?;
    let hops = build_hops(&tokens, &pools, factory, stability);

    Ok(CanonicalRoute { tokens, hops })
}
