//! Quote request and result types.

use crate::error::DomainError;
use crate::math::fees::PER_MILLE;
use crate::route::RouteHop;
use crate::value_objects::address::Address;
use crate::value_objects::amount::TokenAmount;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuoteRequest {
    pub chain_id: u64,
    pub token_in: Address,
    pub token_out: Address,
    pub token_in_amount: TokenAmount,
    /// Pool whose sales are charged the transfer tax.
    pub pair_address: Address,
    /// Token that carries the transfer tax.
    pub agent_key_address: Address,
    /// Transfer tax in parts per thousand, e.g. 30 = 3%.
    pub total_fee_percent: u32,
}

impl QuoteRequest {
    pub fn validate(&self) -> Result<(), DomainError> {
        if self.token_in_amount.is_zero() {
            return Err(DomainError::InvalidAmount(
                "token_in_amount must be positive".to_string(),
            ));
        }
        if self.total_fee_percent > PER_MILLE {
            return Err(DomainError::FeeRateOutOfRange {
                value: self.total_fee_percent,
                max: PER_MILLE,
            });
        }
        if self.token_in == self.token_out {
            return Err(DomainError::IdenticalTokens(self.token_in.clone()));
        }
        Ok(())
    }

    /// True when the caller is selling the taxed token.
    pub fn is_sell(&self) -> bool {
        self.token_in == self.agent_key_address
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuoteResult {
    #[serde(rename = "quote")]
    pub amount_out: TokenAmount,
    pub path: Vec<RouteHop>,
    /// Whether the sell-fee correction replaced the router's naive amount.
    pub corrected: bool,
}
