//! Tokens and pools as seen by the quoter.

pub mod pool;
pub mod token;

pub use pool::Pool;
pub use token::Token;
