//! Prelude module for convenient imports.

pub use crate::entities::{Pool, Token};
pub use crate::error::DomainError;
pub use crate::math::constant_product::calculate_out_amount;
pub use crate::math::fees::{SellFeeBreakdown, sell_fee_breakdown};
pub use crate::quote::{QuoteRequest, QuoteResult};
pub use crate::route::{Route, RouteHop, RouteLeg, RouteQuote};
pub use crate::value_objects::{Address, OrientedReserves, Reserves, TokenAmount};
