use crate::value_objects::address::Address;
use serde::{Deserialize, Serialize};

pub const NATIVE_SYMBOL: &str = "ETH";
pub const NATIVE_DECIMALS: u8 = 18;

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Token {
    pub chain_id: u64,
    pub address: Address,
    pub symbol: String,
    pub decimals: u8,
    pub is_native: bool,
    /// Wrapped ERC-20 for the native currency; `None` for ordinary tokens.
    pub wrapped_address: Option<Address>,
}

impl Token {
    pub fn new(chain_id: u64, address: Address, symbol: impl Into<String>, decimals: u8) -> Self {
        Self {
            chain_id,
            address,
            symbol: symbol.into(),
            decimals,
            is_native: false,
            wrapped_address: None,
        }
    }

    /// Native currency sentinel. Pools only ever hold its wrapped form.
    pub fn native(chain_id: u64, wrapped: Address) -> Self {
        Self {
            chain_id,
            address: Address::zero(),
            symbol: NATIVE_SYMBOL.to_string(),
            decimals: NATIVE_DECIMALS,
            is_native: true,
            wrapped_address: Some(wrapped),
        }
    }

    /// Address this token takes inside a pool path.
    pub fn path_address(&self) -> &Address {
        self.wrapped_address.as_ref().unwrap_or(&self.address)
    }
}
