//! Quote orchestration: resolve, route, canonicalize, correct.

use crate::canonical::canonicalize;
use crate::corrector::FeeAwareCorrector;
use crate::error::QuoteError;
use crate::policy::CorrectionPolicy;
use sellfee_domain::entities::Token;
use sellfee_domain::quote::{QuoteRequest, QuoteResult};
use sellfee_domain::value_objects::Address;
use sellfee_protocols::config::ChainConfig;
use sellfee_protocols::route_finder::PairRouteFinder;
use sellfee_protocols::{ChainReader, RouteFinder, TokenResolver};
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Produces sell-fee aware quotes for one network.
///
/// Holds no per-request state; a single engine can serve concurrent requests.
#[derive(Clone)]
pub struct QuoteEngine {
    config: ChainConfig,
    resolver: Arc<dyn TokenResolver>,
    finder: Arc<dyn RouteFinder>,
    reader: Arc<dyn ChainReader>,
    policy: CorrectionPolicy,
}

impl QuoteEngine {
    pub fn new(
        config: ChainConfig,
        resolver: Arc<dyn TokenResolver>,
        finder: Arc<dyn RouteFinder>,
        reader: Arc<dyn ChainReader>,
    ) -> Self {
        Self {
            config,
            resolver,
            finder,
            reader,
            policy: CorrectionPolicy::default(),
        }
    }

    /// Engine whose token metadata, routes and pool reads all come from `chain`.
    pub fn from_chain<C>(config: ChainConfig, chain: Arc<C>) -> Self
    where
        C: ChainReader + TokenResolver + 'static,
    {
        let finder = Arc::new(PairRouteFinder::new(chain.clone(), config.clone()));
        Self::new(config, chain.clone(), finder, chain)
    }

    #[must_use]
    pub fn with_policy(mut self, policy: CorrectionPolicy) -> Self {
        self.policy = policy;
        self
    }

    pub fn config(&self) -> &ChainConfig {
        &self.config
    }

    pub fn policy(&self) -> CorrectionPolicy {
        self.policy
    }

    /// Computes the expected output of swapping `token_in_amount` of
    /// `token_in` into `token_out`, accounting for the transfer tax on sales
    /// of the agent key through `pair_address`.
    ///
    /// # Errors
    /// See [`QuoteError`]. Every failure is terminal for the request.
    pub async fn compute_quote(&self, request: &QuoteRequest) -> Result<QuoteResult, QuoteError> {
        let result = self.quote(request).await;
        if let Err(e) = &result {
            warn!(
                chain_id = request.chain_id,
                token_in = %request.token_in,
                token_out = %request.token_out,
                error_code = e.error_code(),
                error = %e,
                "Quote failed"
            );
        }
        result
    }

    async fn quote(&self, request: &QuoteRequest) -> Result<QuoteResult, QuoteError> {
        request.validate().map_err(QuoteError::InvalidRequest)?;
        if request.chain_id != self.config.chain_id {
            return Err(QuoteError::UnsupportedChain(request.chain_id));
        }

        let (token_in, token_out) = tokio::try_join!(
            self.resolve(&request.token_in),
            self.resolve(&request.token_out),
        )?;
        debug!(
            token_in = %token_in.symbol,
            token_out = %token_out.symbol,
            "Resolved tokens"
        );

        let naive = self
            .finder
            .find_route(request.chain_id, &token_in, &token_out, request.token_in_amount)
            .await?
            .filter(|quote| !quote.route.is_empty())
            .ok_or_else(|| QuoteError::NoRouteFound {
                token_in: request.token_in.clone(),
                token_out: request.token_out.clone(),
            })?;

        let canonical = canonicalize(
            token_in.path_address(),
            &naive.route,
            &self.config.factory,
            self.policy.hop_stability,
        )?;

        let corrector = FeeAwareCorrector::new(
            self.reader.clone(),
            self.config.factory.clone(),
            self.config.router.clone(),
        )
        .with_single_hop_policy(self.policy.single_hop);
        let correction = corrector.correct(request, &naive, &canonical).await?;

        info!(
            chain_id = request.chain_id,
            hops = canonical.hops.len(),
            naive_amount_out = %naive.amount_out,
            amount_out = %correction.amount_out(),
            corrected = correction.is_corrected(),
            "Quote computed"
        );

        Ok(QuoteResult {
            amount_out: correction.amount_out(),
            path: canonical.hops,
            corrected: correction.is_corrected(),
        })
    }

    /// The zero address stands for the native currency and is never resolved.
    async fn resolve(&self, address: &Address) -> Result<Token, QuoteError> {
        if address.is_zero() {
            return Ok(Token::native(
                self.config.chain_id,
                self.config.wrapped_native.clone(),
            ));
        }
        self.resolver
            .resolve_token(self.config.chain_id, address)
            .await
            .map_err(|source| QuoteError::TokenResolutionFailed {
                address: address.clone(),
                source,
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::policy::{HopStability, SingleHopPolicy};
    use crate::test_support::*;
    use async_trait::async_trait;
    use sellfee_domain::route::RouteQuote;
    use sellfee_domain::value_objects::TokenAmount;
    use sellfee_protocols::error::{ChainError, ReadOperation};
    use sellfee_protocols::memory::InMemoryChain;
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn engine(chain: InMemoryChain) -> QuoteEngine {
        QuoteEngine::from_chain(config(), Arc::new(chain))
    }

    /// Resolver that counts lookups and delegates to a snapshot chain.
    struct CountingResolver {
        inner: InMemoryChain,
        calls: AtomicUsize,
    }

    #[async_trait]
    impl TokenResolver for CountingResolver {
        async fn resolve_token(&self, chain_id: u64, address: &Address) -> Result<Token, ChainError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.inner.resolve_token(chain_id, address).await
        }
    }

    struct NoRoute;

    #[async_trait]
    impl RouteFinder for NoRoute {
        async fn find_route(
            &self,
            _chain_id: u64,
            _token_in: &Token,
            _token_out: &Token,
            _amount_in: TokenAmount,
        ) -> Result<Option<RouteQuote>, ChainError> {
            Ok(None)
        }
    }

    #[tokio::test]
    async fn test_sell_through_taxed_pool_is_corrected() {
        let result = engine(worked_example_chain())
            .compute_quote(&request(AGENT_KEY, BASE, 1_000_000, 30))
            .await
            .unwrap();

        assert!(result.corrected);
        assert_eq!(result.amount_out, TokenAmount::from(379_495u64));
        assert_eq!(result.path.len(), 1);
        assert_eq!(result.path[0].from, addr(AGENT_KEY));
        assert_eq!(result.path[0].to, addr(BASE));
        assert_eq!(result.path[0].factory, factory());
        assert!(!result.path[0].stable);
    }

    #[tokio::test]
    async fn test_buy_keeps_router_amount() {
        let chain = Arc::new(worked_example_chain());
        let result = QuoteEngine::from_chain(config(), chain.clone())
            .compute_quote(&request(BASE, AGENT_KEY, 1_000_000, 30))
            .await
            .unwrap();

        let naive = chain
            .amounts_out(&router(), TokenAmount::from(1_000_000u64), &result.path)
            .await
            .unwrap();
        assert!(!result.corrected);
        assert_eq!(Some(&result.amount_out), naive.last());
    }

    #[tokio::test]
    async fn test_multi_hop_sale_is_corrected() {
        let result = engine(multi_hop_chain())
            .compute_quote(&request(AGENT_KEY, USDC, 1_000_000, 30))
            .await
            .unwrap();

        assert!(result.corrected);
        let tokens: Vec<_> = result.path.iter().map(|h| h.to.clone()).collect();
        assert_eq!(tokens, vec![addr(BASE), addr(USDC)]);

        let untaxed = engine(multi_hop_chain())
            .compute_quote(&request(AGENT_KEY, USDC, 1_000_000, 0))
            .await
            .unwrap();
        assert!(result.amount_out < untaxed.amount_out);
    }

    #[tokio::test]
    async fn test_naive_router_policy_keeps_single_hop_amount() {
        let policy = CorrectionPolicy {
            single_hop: SingleHopPolicy::NaiveRouter,
            hop_stability: HopStability::ForceVolatile,
        };
        let result = engine(worked_example_chain())
            .with_policy(policy)
            .compute_quote(&request(AGENT_KEY, BASE, 1_000_000, 30))
            .await
            .unwrap();

        assert!(result.corrected);
        assert!(result.amount_out > TokenAmount::from(379_495u64));
    }

    #[tokio::test]
    async fn test_native_input_skips_resolver() {
        let mut snapshot = worked_example_chain().snapshot().clone();
        snapshot
            .pools
            .push(pool_fixture(SECOND_POOL, WETH, BASE, 1_000_000_000, 1_000_000_000, 30));
        let chain = Arc::new(InMemoryChain::new(snapshot.clone()));
        let resolver = Arc::new(CountingResolver {
            inner: InMemoryChain::new(snapshot),
            calls: AtomicUsize::new(0),
        });
        let finder = Arc::new(PairRouteFinder::new(chain.clone(), config()));
        let engine = QuoteEngine::new(config(), resolver.clone(), finder, chain);

        let result = engine
            .compute_quote(&request(0, BASE, 1_000_000, 30))
            .await
            .unwrap();

        assert_eq!(resolver.calls.load(Ordering::SeqCst), 1);
        assert!(!result.corrected);
        assert_eq!(result.path[0].from, addr(WETH));
    }

    #[tokio::test]
    async fn test_no_route_reason() {
        let chain = Arc::new(worked_example_chain());
        let engine = QuoteEngine::new(config(), chain.clone(), Arc::new(NoRoute), chain);

        let err = engine
            .compute_quote(&request(AGENT_KEY, USDC, 1_000_000, 30))
            .await
            .unwrap_err();
        assert!(matches!(err, QuoteError::NoRouteFound { .. }));
        assert_eq!(err.reason(), "No quote found");
    }

    #[tokio::test]
    async fn test_invalid_requests_rejected() {
        let engine = engine(worked_example_chain());

        let too_taxed = request(AGENT_KEY, BASE, 1_000_000, 1001);
        let zero = request(AGENT_KEY, BASE, 0, 30);
        let same_token = request(AGENT_KEY, AGENT_KEY, 1_000_000, 30);
        for req in [too_taxed, zero, same_token] {
            let err = engine.compute_quote(&req).await.unwrap_err();
            assert_eq!(err.error_code(), "invalid_request");
        }
    }

    #[tokio::test]
    async fn test_unsupported_chain() {
        let mut req = request(AGENT_KEY, BASE, 1_000_000, 30);
        req.chain_id = 1;
        let err = engine(worked_example_chain())
            .compute_quote(&req)
            .await
            .unwrap_err();
        assert!(matches!(err, QuoteError::UnsupportedChain(1)));
    }

    #[tokio::test]
    async fn test_unknown_token_fails_resolution() {
        let err = engine(worked_example_chain())
            .compute_quote(&request(AGENT_KEY, 0x77, 1_000_000, 30))
            .await
            .unwrap_err();
        match err {
            QuoteError::TokenResolutionFailed { address, .. } => assert_eq!(address, addr(0x77)),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[tokio::test]
    async fn test_route_pricing_timeout_is_read_timeout() {
        let chain = worked_example_chain().with_timeout(ReadOperation::AmountsOut);
        let err = engine(chain)
            .compute_quote(&request(AGENT_KEY, BASE, 1_000_000, 30))
            .await
            .unwrap_err();

        assert_eq!(err.error_code(), "read_timeout");
        assert_eq!(err.reason(), "Chain read timed out (getAmountsOut)");
    }

    #[tokio::test]
    async fn test_correction_read_timeout_is_read_timeout() {
        let chain = worked_example_chain().with_timeout(ReadOperation::Reserves);
        let err = engine(chain)
            .compute_quote(&request(AGENT_KEY, BASE, 1_000_000, 30))
            .await
            .unwrap_err();

        assert!(matches!(
            err,
            QuoteError::ReadTimeout {
                operation: ReadOperation::Reserves,
                ..
            }
        ));
        assert_eq!(err.error_code(), "read_timeout");
    }

    #[tokio::test]
    async fn test_read_failure_surfaces_operation() {
        let chain = worked_example_chain().with_failure(ReadOperation::Reserves);
        let err = engine(chain)
            .compute_quote(&request(AGENT_KEY, BASE, 1_000_000, 30))
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            QuoteError::ChainReadFailed {
                operation: ReadOperation::Reserves,
                ..
            }
        ));
    }
}
