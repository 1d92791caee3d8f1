//! Sell-fee aware quoting on top of Solidly-style routers.
//!
//! The router's `getAmountsOut` ignores transfer taxes, so selling a taxed
//! token through its own pool is overquoted. [`QuoteEngine`] finds a route,
//! canonicalizes it into router hops and re-prices the taxed sale from live
//! pool reserves before forwarding it through the rest of the route.

pub mod canonical;
pub mod corrector;
pub mod engine;
pub mod error;
pub mod policy;
pub mod prelude;

#[cfg(test)]
mod test_support;

pub use engine::QuoteEngine;
pub use error::QuoteError;
