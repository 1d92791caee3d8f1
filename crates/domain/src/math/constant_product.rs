use crate::error::DomainError;
use crate::value_objects::amount::TokenAmount;
use primitive_types::{U256, U512};

/// Multiplies then floor-divides with a 512-bit intermediate so the product never wraps.
pub(crate) fn mul_div_floor(a: U256, b: U256, denominator: U256) -> Result<U256, DomainError> {
    if denominator.is_zero() {
        return Err(DomainError::EmptyReserves);
    }
    let quotient = a.full_mul(b) / U512::from(denominator);
    U256::try_from(quotient).map_err(|_| DomainError::Overflow)
}

/// Calculates the output amount for a given input amount in a constant product pool (x * y = k).
///
/// formula: dy = y * dx / (x + dx), rounded down as the pair contract does.
///
/// Any trading fee must already have been taken off `amount_in`.
pub fn calculate_out_amount(
    amount_in: TokenAmount,
    reserve_in: TokenAmount,
    reserve_out: TokenAmount,
) -> Result<TokenAmount, DomainError> {
    let amount_in = amount_in.0;
    let reserve_in = reserve_in.0;
    let reserve_out = reserve_out.0;

    if amount_in.is_zero() {
        return Ok(TokenAmount::zero());
    }
    if reserve_in.is_zero() || reserve_out.is_zero() {
        return Err(DomainError::EmptyReserves);
    }

    let denominator = reserve_in
        .checked_add(amount_in)
        .ok_or(DomainError::Overflow)?;

    mul_div_floor(amount_in, reserve_out, denominator).map(TokenAmount)
}
