//! Domain types for sell-fee aware AMM quoting.
//!
//! Tokens, pools, reserves, routes and the integer math used to price a
//! taxed sale against a constant-product pool.

pub mod entities;
pub mod error;
pub mod math;
pub mod prelude;
pub mod quote;
pub mod route;
pub mod value_objects;

pub use error::DomainError;
