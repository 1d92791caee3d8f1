use crate::value_objects::address::Address;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DomainError {
    #[error("invalid address: {0}")]
    InvalidAddress(String),

    #[error("invalid amount: {0}")]
    InvalidAmount(String),

    #[error("token_in and token_out are both {0}")]
    IdenticalTokens(Address),

    #[error("fee rate {value} exceeds {max}")]
    FeeRateOutOfRange { value: u32, max: u32 },

    #[error("pool has empty reserves")]
    EmptyReserves,

    #[error("token {token} is not part of pool {pool}")]
    TokenNotInPool { pool: String, token: String },

    #[error("arithmetic overflow")]
    Overflow,

    #[error("route is discontinuous at hop {index}: {to} != {next_from}")]
    DiscontinuousRoute {
        index: usize,
        to: Address,
        next_from: Address,
    },
}
