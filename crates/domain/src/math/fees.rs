//! Transfer-tax and pool-fee deductions applied before a sale reaches the reserves.

use crate::error::DomainError;
use crate::math::constant_product::mul_div_floor;
use crate::value_objects::amount::TokenAmount;
use primitive_types::U256;

/// Denominator of `total_fee_percent` (parts per thousand).
pub const PER_MILLE: u32 = 1_000;
/// Denominator of pool fee rates (basis points).
pub const BPS_DENOMINATOR: u32 = 10_000;

/// Amount withheld as transfer tax: `floor(amount * per_mille / 1000)`.
pub fn transfer_tax(amount: TokenAmount, per_mille: u32) -> Result<TokenAmount, DomainError> {
    if per_mille > PER_MILLE {
        return Err(DomainError::FeeRateOutOfRange {
            value: per_mille,
            max: PER_MILLE,
        });
    }
    mul_div_floor(amount.0, U256::from(per_mille), U256::from(PER_MILLE)).map(TokenAmount)
}

/// `amount - floor(amount * bps / 10000)`.
pub fn deduct_bps(amount: TokenAmount, bps: u32) -> Result<TokenAmount, DomainError> {
    if bps > BPS_DENOMINATOR {
        return Err(DomainError::FeeRateOutOfRange {
            value: bps,
            max: BPS_DENOMINATOR,
        });
    }
    let fee = mul_div_floor(amount.0, U256::from(bps), U256::from(BPS_DENOMINATOR))?;
    Ok(TokenAmount(amount.0 - fee))
}

/// How a taxed sale is whittled down before it hits the pool.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SellFeeBreakdown {
    /// Withheld by the token contract.
    pub transfer_tax: TokenAmount,
    /// Kept by the pool as its trading fee.
    pub pool_fee: TokenAmount,
    /// What the constant-product curve actually sees.
    pub swap_input: TokenAmount,
}

/// Transfer tax first, then the pool fee on what is left.
pub fn sell_fee_breakdown(
    amount_in: TokenAmount,
    total_fee_per_mille: u32,
    pool_fee_bps: u32,
) -> Result<SellFeeBreakdown, DomainError> {
    let tax = transfer_tax(amount_in, total_fee_per_mille)?;
    let after_tax = TokenAmount(amount_in.0 - tax.0);
    let swap_input = deduct_bps(after_tax, pool_fee_bps)?;

    Ok(SellFeeBreakdown {
        transfer_tax: tax,
        pool_fee: TokenAmount(after_tax.0 - swap_input.0),
        swap_input,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_transfer_tax_bounds() {
        let amount = TokenAmount::from(1_000_000u64);
        assert_eq!(transfer_tax(amount, 0).unwrap(), TokenAmount::zero());
        assert_eq!(transfer_tax(amount, 1000).unwrap(), amount);
        assert!(transfer_tax(amount, 1001).is_err());
    }

    #[test]
    fn test_transfer_tax_floors() {
        // 999 * 30 / 1000 = 29.97 -> 29
        assert_eq!(
            transfer_tax(TokenAmount::from(999u64), 30).unwrap(),
            TokenAmount::from(29u64)
        );
    }

    #[test]
    fn test_deduct_bps() {
        // 970_000 * 30 / 10000 = 2_910
        assert_eq!(
            deduct_bps(TokenAmount::from(970_000u64), 30).unwrap(),
            TokenAmount::from(967_090u64)
        );
        assert!(deduct_bps(TokenAmount::from(1u64), 10_001).is_err());
    }

    #[test]
    fn test_sell_fee_breakdown_order() {
        let breakdown = sell_fee_breakdown(TokenAmount::from(1_000_000u64), 30, 30).unwrap();
        assert_eq!(breakdown.transfer_tax, TokenAmount::from(30_000u64));
        assert_eq!(breakdown.pool_fee, TokenAmount::from(2_910u64));
        assert_eq!(breakdown.swap_input, TokenAmount::from(967_090u64));
    }

    #[test]
    fn test_full_tax_leaves_nothing_to_swap() {
        let breakdown = sell_fee_breakdown(TokenAmount::from(12_345u64), 1000, 30).unwrap();
        assert_eq!(breakdown.transfer_tax, TokenAmount::from(12_345u64));
        assert!(breakdown.swap_input.is_zero());
    }
}
