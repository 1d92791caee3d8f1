use crate::error::DomainError;
use crate::value_objects::address::Address;
use serde::{Deserialize, Serialize};

/// Snapshot of a pair contract's identity. Re-read for every quote.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Pool {
    pub address: Address,
    pub token0: Address,
    pub token1: Address,
    pub is_stable: bool,
}

impl Pool {
    pub fn new(address: Address, token0: Address, token1: Address, is_stable: bool) -> Self {
        Self {
            address,
            token0,
            token1,
            is_stable,
        }
    }

    /// Token received when `token` is sold into this pool.
    pub fn other_token(&self, token: &Address) -> Result<&Address, DomainError> {
        if &self.token0 == token {
            Ok(&self.token1)
        } else if &self.token1 == token {
            Ok(&self.token0)
        } else {
            Err(DomainError::TokenNotInPool {
                pool: self.address.to_string(),
                token: token.to_string(),
            })
        }
    }
}
