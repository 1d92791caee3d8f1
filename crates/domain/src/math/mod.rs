pub mod constant_product;
pub mod fees;
