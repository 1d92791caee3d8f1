//! Swap routes as consumed by a Solidly-style router.

use crate::entities::pool::Pool;
use crate::error::DomainError;
use crate::value_objects::address::Address;
use crate::value_objects::amount::TokenAmount;
use serde::{Deserialize, Serialize};

/// One router hop, in the shape `Router.getAmountsOut` accepts.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RouteHop {
    pub from: Address,
    pub to: Address,
    pub stable: bool,
    pub factory: Address,
}

/// A pool traversal together with the hop descriptor used to price it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RouteLeg {
    pub pool: Pool,
    pub hop: RouteHop,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Route {
    pub legs: Vec<RouteLeg>,
}

impl Route {
    pub fn new(legs: Vec<RouteLeg>) -> Self {
        Self { legs }
    }

    pub fn is_empty(&self) -> bool {
        self.legs.is_empty()
    }

    pub fn len(&self) -> usize {
        self.legs.len()
    }

    pub fn first_pool(&self) -> Option<&Pool> {
        self.legs.first().map(|leg| &leg.pool)
    }

    pub fn pools(&self) -> impl Iterator<Item = &Pool> {
        self.legs.iter().map(|leg| &leg.pool)
    }

    pub fn hops(&self) -> Vec<RouteHop> {
        self.legs.iter().map(|leg| leg.hop.clone()).collect()
    }

    /// Fails when a hop does not start where the previous one ended.
    pub fn check_continuity(&self) -> Result<(), DomainError> {
        for (index, pair) in self.legs.windows(2).enumerate() {
            if pair[0].hop.to != pair[1].hop.from {
                return Err(DomainError::DiscontinuousRoute {
                    index,
                    to: pair[0].hop.to.clone(),
                    next_from: pair[1].hop.from.clone(),
                });
            }
        }
        Ok(())
    }

    /// `from` of every hop followed by the final `to`.
    pub fn token_path(&self) -> Vec<Address> {
        let mut path: Vec<Address> = self.legs.iter().map(|leg| leg.hop.from.clone()).collect();
        if let Some(last) = self.legs.last() {
            path.push(last.hop.to.clone());
        }
        path
    }
}

/// Best-effort route with amounts priced by plain per-pool math, no transfer tax.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RouteQuote {
    pub route: Route,
    pub amount_in: TokenAmount,
    pub amount_out: TokenAmount,
}
