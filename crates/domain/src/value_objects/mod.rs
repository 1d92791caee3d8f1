pub mod address;
pub mod amount;
pub mod reserves;

pub use address::Address;
pub use amount::TokenAmount;
pub use reserves::{OrientedReserves, Reserves};
