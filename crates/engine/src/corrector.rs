//! Sell-fee correction of a naive router quote.
//!
//! A token with a transfer tax loses part of the input before it reaches the
//! pool, so the router's `getAmountsOut` overstates what a seller receives.
//! When the sale goes through the taxed pool, the first hop is re-priced from
//! live reserves and the result is forwarded through any remaining hops.

use crate::canonical::CanonicalRoute;
use crate::error::QuoteError;
use crate::policy::SingleHopPolicy;
use sellfee_domain::math::constant_product::calculate_out_amount;
use sellfee_domain::math::fees::{SellFeeBreakdown, sell_fee_breakdown};
use sellfee_domain::quote::QuoteRequest;
use sellfee_domain::route::RouteQuote;
use sellfee_domain::value_objects::{Address, OrientedReserves, TokenAmount};
use sellfee_protocols::ChainReader;
use sellfee_protocols::error::ReadOperation;
use std::sync::Arc;
use tracing::{debug, info};

/// Why the naive quote was kept.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PassthroughReason {
    /// The input token is not the taxed token.
    Buy,
    /// The route does not start at the taxed pool.
    UntaxedPool,
}

/// Intermediate values of a corrected sale.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SaleCorrection {
    pub breakdown: SellFeeBreakdown,
    pub pool_fee_bps: u32,
    pub reserves: OrientedReserves,
    /// Base token leaving the taxed pool.
    pub real_base_amount: TokenAmount,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Correction {
    Passthrough {
        amount_out: TokenAmount,
        reason: PassthroughReason,
    },
    Corrected {
        amount_out: TokenAmount,
        sale: SaleCorrection,
    },
}

impl Correction {
    pub fn amount_out(&self) -> TokenAmount {
        match self {
            Self::Passthrough { amount_out, .. } | Self::Corrected { amount_out, .. } => {
                *amount_out
            }
        }
    }

    pub fn is_corrected(&self) -> bool {
        matches!(self, Self::Corrected { .. })
    }
}

/// Re-prices sales of the taxed token through the taxed pool.
pub struct FeeAwareCorrector<R: ChainReader + ?Sized> {
    reader: Arc<R>,
    factory: Address,
    router: Address,
    single_hop: SingleHopPolicy,
}

impl<R: ChainReader + ?Sized> FeeAwareCorrector<R> {
    pub fn new(reader: Arc<R>, factory: Address, router: Address) -> Self {
        Self {
            reader,
            factory,
            router,
            single_hop: SingleHopPolicy::default(),
        }
    }

    #[must_use]
    pub fn with_single_hop_policy(mut self, policy: SingleHopPolicy) -> Self {
        self.single_hop = policy;
        self
    }

    /// Applies the first matching rule: buy, untaxed pool, or correction.
    ///
    /// # Errors
    /// Any failed read is returned tagged with its operation; no partial
    /// amount is ever produced.
    pub async fn correct(
        &self,
        request: &QuoteRequest,
        naive: &RouteQuote,
        canonical: &CanonicalRoute,
    ) -> Result<Correction, QuoteError> {
        if !request.is_sell() {
            return Ok(Correction::Passthrough {
                amount_out: naive.amount_out,
                reason: PassthroughReason::Buy,
            });
        }

        let first_pool = naive.route.first_pool().map(|pool| &pool.address);
        if first_pool != Some(&request.pair_address) {
            debug!(
                pair = %request.pair_address,
                first_pool = ?first_pool.map(Address::as_str),
                "Sale does not start at the taxed pool"
            );
            return Ok(Correction::Passthrough {
                amount_out: naive.amount_out,
                reason: PassthroughReason::UntaxedPool,
            });
        }

        let pair = &request.pair_address;
        let (pool_fee_bps, reserves, token0) = tokio::try_join!(
            self.reader.pool_fee(&self.factory, pair, false),
            self.reader.reserves(pair),
            self.reader.token0(pair),
        )?;

        let invalid = |source| QuoteError::InvalidPoolState {
            pool: pair.clone(),
            source,
        };
        reserves.ensure_non_empty().map_err(invalid)?;
        let oriented = reserves.oriented(&token0, &request.agent_key_address);

        let breakdown = sell_fee_breakdown(naive.amount_in, request.total_fee_percent, pool_fee_bps)
            .map_err(invalid)?;
        let real_base_amount = calculate_out_amount(
            breakdown.swap_input,
            oriented.token_reserve,
            oriented.base_reserve,
        )
        .map_err(invalid)?;

        let amount_out = if canonical.is_multi_hop() {
            self.forward(real_base_amount, canonical).await?
        } else {
            match self.single_hop {
                SingleHopPolicy::ReserveDerived => real_base_amount,
                SingleHopPolicy::NaiveRouter => naive.amount_out,
            }
        };

        info!(
            pair = %pair,
            amount_in = %naive.amount_in,
            transfer_tax = %breakdown.transfer_tax,
            pool_fee_bps,
            real_base_amount = %real_base_amount,
            naive_amount_out = %naive.amount_out,
            amount_out = %amount_out,
            "Applied sell-fee correction"
        );

        Ok(Correction::Corrected {
            amount_out,
            sale: SaleCorrection {
                breakdown,
                pool_fee_bps,
                reserves: oriented,
                real_base_amount,
            },
        })
    }

    /// Prices `amount` through every hop after the taxed pool.
    async fn forward(
        &self,
        amount: TokenAmount,
        canonical: &CanonicalRoute,
    ) -> Result<TokenAmount, QuoteError> {
        let amounts = self
            .reader
            .amounts_out(&self.router, amount, canonical.remaining_hops())
            .await?;

        amounts
            .last()
            .copied()
            .ok_or_else(|| QuoteError::ChainReadFailed {
                operation: ReadOperation::AmountsOut,
                address: self.router.to_string(),
                message: "router returned no amounts".to_string(),
            })
    }
}
