use crate::error::DomainError;
use crate::value_objects::address::Address;
use crate::value_objects::amount::TokenAmount;
use serde::{Deserialize, Serialize};

/// Point-in-time pool balances. Only valid for the block they were read at.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Reserves {
    pub reserve0: TokenAmount,
    pub reserve1: TokenAmount,
}

/// Reserves split by role for a sale of `token`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OrientedReserves {
    pub token_reserve: TokenAmount,
    pub base_reserve: TokenAmount,
}

impl Reserves {
    pub fn new(reserve0: impl Into<TokenAmount>, reserve1: impl Into<TokenAmount>) -> Self {
        Self {
            reserve0: reserve0.into(),
            reserve1: reserve1.into(),
        }
    }

    /// Orients the reserves around `token` given the pool's `token0`.
    pub fn oriented(&self, token0: &Address, token: &Address) -> OrientedReserves {
        if token0 == token {
            OrientedReserves {
                token_reserve: self.reserve0,
                base_reserve: self.reserve1,
            }
        } else {
            OrientedReserves {
                token_reserve: self.reserve1,
                base_reserve: self.reserve0,
            }
        }
    }

    pub fn ensure_non_empty(&self) -> Result<(), DomainError> {
        if self.reserve0.is_zero() || self.reserve1.is_zero() {
            return Err(DomainError::EmptyReserves);
        }
        Ok(())
    }
}
