//! JSON-RPC backed chain client.

use crate::config::ChainConfig;
use crate::contracts::{IERC20, IPool, IPoolFactory, IRouter};
use crate::error::{ChainError, ReadOperation};
use crate::{ChainReader, TokenResolver};
use alloy::primitives::{Address as EvmAddress, U256 as EvmU256};
use alloy::providers::RootProvider;
use alloy::rpc::client::RpcClient;
use alloy::transports::http::Http;
use async_trait::async_trait;
use primitive_types::U256;
use reqwest::Client;
use sellfee_domain::entities::Token;
use sellfee_domain::route::RouteHop;
use sellfee_domain::value_objects::{Address, Reserves, TokenAmount};
use std::fmt::Display;
use std::future::IntoFuture;
use std::time::Duration;
use tracing::debug;

const CONNECT_TIMEOUT: Duration = Duration::from_secs(5);

/// Read-only client for one network. Cheap to clone and safe to share across tasks.
#[derive(Clone)]
pub struct RpcProvider {
    provider: RootProvider,
    chain_id: u64,
    timeout: Duration,
}

impl RpcProvider {
    /// Creates a provider for the network described by `config`.
    ///
    /// # Errors
    /// Returns an error if the RPC URL cannot be parsed or the HTTP client cannot be built.
    pub fn connect(config: &ChainConfig) -> Result<Self, ChainError> {
        let invalid = |message: String| ChainError::InvalidEndpoint {
            url: config.rpc_url.clone(),
            message,
        };

        let url: reqwest::Url = config.rpc_url.parse().map_err(|e| invalid(format!("{e}")))?;
        let client = Client::builder()
            .connect_timeout(CONNECT_TIMEOUT)
            .build()
            .map_err(|e| invalid(e.to_string()))?;
        let http = Http::with_client(client, url);
        let rpc_client = RpcClient::new(http, false);

        Ok(Self {
            provider: RootProvider::new(rpc_client),
            chain_id: config.chain_id,
            timeout: config.read_timeout(),
        })
    }
}

/// Runs a read with a deadline, tagging failures with the operation and target address.
pub async fn with_timeout<T, E, F>(
    timeout: Duration,
    operation: ReadOperation,
    address: &Address,
    read: F,
) -> Result<T, ChainError>
where
    E: Display,
    F: IntoFuture<Output = Result<T, E>>,
{
    match tokio::time::timeout(timeout, read).await {
        Ok(Ok(value)) => Ok(value),
        Ok(Err(e)) => Err(ChainError::ReadFailed {
            operation,
            address: address.to_string(),
            message: e.to_string(),
        }),
        Err(_) => Err(ChainError::Timeout {
            operation,
            address: address.to_string(),
            timeout_ms: u64::try_from(timeout.as_millis()).unwrap_or(u64::MAX),
        }),
    }
}

fn to_evm_address(operation: ReadOperation, address: &Address) -> Result<EvmAddress, ChainError> {
    address
        .as_str()
        .parse::<EvmAddress>()
        .map_err(|e| ChainError::ReadFailed {
            operation,
            address: address.to_string(),
            message: e.to_string(),
        })
}

fn from_evm_address(
    operation: ReadOperation,
    target: &Address,
    value: EvmAddress,
) -> Result<Address, ChainError> {
    Address::parse(&value.to_string()).map_err(|e| ChainError::ReadFailed {
        operation,
        address: target.to_string(),
        message: e.to_string(),
    })
}

fn to_evm_amount(amount: TokenAmount) -> EvmU256 {
    EvmU256::from_be_bytes(amount.0.to_big_endian())
}

fn from_evm_amount(value: EvmU256) -> TokenAmount {
    TokenAmount(U256::from_big_endian(&value.to_be_bytes::<32>()))
}

fn to_router_route(hop: &RouteHop) -> Result<IRouter::Route, ChainError> {
    let op = ReadOperation::AmountsOut;
    Ok(IRouter::Route {
        from: to_evm_address(op, &hop.from)?,
        to: to_evm_address(op, &hop.to)?,
        stable: hop.stable,
        factory: to_evm_address(op, &hop.factory)?,
    })
}

#[async_trait]
impl ChainReader for RpcProvider {
    async fn pool_fee(
        &self,
        factory: &Address,
        pool: &Address,
        stable: bool,
    ) -> Result<u32, ChainError> {
        let op = ReadOperation::PoolFee;
        let contract = IPoolFactory::new(to_evm_address(op, factory)?, &self.provider);
        let call = contract.getFee(to_evm_address(op, pool)?, stable);
        let fee = with_timeout(self.timeout, ReadOperation::PoolFee, pool, call.call()).await?;

        u32::try_from(from_evm_amount(fee).0).map_err(|_| ChainError::ReadFailed {
            operation: ReadOperation::PoolFee,
            address: pool.to_string(),
            message: format!("fee {fee} does not fit in basis points"),
        })
    }

    async fn reserves(&self, pool: &Address) -> Result<Reserves, ChainError> {
        let contract = IPool::new(to_evm_address(ReadOperation::Reserves, pool)?, &self.provider);
        let call = contract.getReserves();
        let reserves =
            with_timeout(self.timeout, ReadOperation::Reserves, pool, call.call()).await?;

        Ok(Reserves::new(
            from_evm_amount(reserves.reserve0),
            from_evm_amount(reserves.reserve1),
        ))
    }

    async fn token0(&self, pool: &Address) -> Result<Address, ChainError> {
        let contract = IPool::new(to_evm_address(ReadOperation::Token0, pool)?, &self.provider);
        let call = contract.token0();
        let token = with_timeout(self.timeout, ReadOperation::Token0, pool, call.call()).await?;
        from_evm_address(ReadOperation::Token0, pool, token)
    }

    async fn token1(&self, pool: &Address) -> Result<Address, ChainError> {
        let contract = IPool::new(to_evm_address(ReadOperation::Token1, pool)?, &self.provider);
        let call = contract.token1();
        let token = with_timeout(self.timeout, ReadOperation::Token1, pool, call.call()).await?;
        from_evm_address(ReadOperation::Token1, pool, token)
    }

    async fn get_pool(
        &self,
        factory: &Address,
        token_a: &Address,
        token_b: &Address,
        stable: bool,
    ) -> Result<Option<Address>, ChainError> {
        let op = ReadOperation::PoolLookup;
        let contract = IPoolFactory::new(to_evm_address(op, factory)?, &self.provider);
        let call = contract.getPool(
            to_evm_address(op, token_a)?,
            to_evm_address(op, token_b)?,
            stable,
        );
        let pool =
            with_timeout(self.timeout, ReadOperation::PoolLookup, factory, call.call()).await?;

        if pool.is_zero() {
            return Ok(None);
        }
        from_evm_address(ReadOperation::PoolLookup, factory, pool).map(Some)
    }

    async fn amounts_out(
        &self,
        router: &Address,
        amount_in: TokenAmount,
        hops: &[RouteHop],
    ) -> Result<Vec<TokenAmount>, ChainError> {
        let routes = hops
            .iter()
            .map(to_router_route)
            .collect::<Result<Vec<_>, _>>()?;
        debug!(router = %router, amount_in = %amount_in, hops = routes.len(), "getAmountsOut");

        let contract = IRouter::new(
            to_evm_address(ReadOperation::AmountsOut, router)?,
            &self.provider,
        );
        let call = contract.getAmountsOut(to_evm_amount(amount_in), routes);
        let amounts =
            with_timeout(self.timeout, ReadOperation::AmountsOut, router, call.call()).await?;

        Ok(amounts.into_iter().map(from_evm_amount).collect())
    }
}

#[async_trait]
impl TokenResolver for RpcProvider {
    async fn resolve_token(&self, chain_id: u64, address: &Address) -> Result<Token, ChainError> {
        if chain_id != self.chain_id {
            return Err(ChainError::UnsupportedChain(chain_id));
        }

        let contract = IERC20::new(to_evm_address(ReadOperation::Symbol, address)?, &self.provider);
        let symbol_call = contract.symbol();
        let decimals_call = contract.decimals();

        let (symbol, decimals) = tokio::try_join!(
            with_timeout(self.timeout, ReadOperation::Symbol, address, symbol_call.call()),
            with_timeout(self.timeout, ReadOperation::Decimals, address, decimals_call.call()),
        )?;

        Ok(Token::new(chain_id, address.clone(), symbol, decimals))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::NetworkRegistry;

    fn pool() -> Address {
        Address::parse("0x00000000000000000000000000000000000000c3").unwrap()
    }

    #[tokio::test]
    async fn test_with_timeout_expires() {
        let err = with_timeout(
            Duration::from_millis(10),
            ReadOperation::Reserves,
            &pool(),
            std::future::pending::<Result<(), String>>(),
        )
        .await
        .unwrap_err();

        assert_eq!(
            err,
            ChainError::Timeout {
                operation: ReadOperation::Reserves,
                address: pool().to_string(),
                timeout_ms: 10,
            }
        );
    }

    #[tokio::test]
    async fn test_with_timeout_tags_read_failure() {
        let err = with_timeout(
            Duration::from_secs(1),
            ReadOperation::Token0,
            &pool(),
            async { Err::<(), _>("execution reverted") },
        )
        .await
        .unwrap_err();

        assert_eq!(err.operation(), Some(ReadOperation::Token0));
        assert!(err.to_string().contains("execution reverted"));
    }

    #[tokio::test]
    async fn test_with_timeout_passes_value() {
        let value = with_timeout(Duration::from_secs(1), ReadOperation::Symbol, &pool(), async {
            Ok::<_, String>(7u8)
        })
        .await
        .unwrap();
        assert_eq!(value, 7);
    }

    #[test]
    fn test_amount_conversion_preserves_value() {
        let amount = TokenAmount(U256::MAX - U256::from(12_345u64));
        assert_eq!(from_evm_amount(to_evm_amount(amount)), amount);
    }

    #[test]
    fn test_address_conversion_lowercases() {
        let weth = Address::parse("0x4200000000000000000000000000000000000006").unwrap();
        let evm = to_evm_address(ReadOperation::Token0, &weth).unwrap();
        let back = from_evm_address(ReadOperation::Token0, &pool(), evm).unwrap();
        assert_eq!(back, weth);
    }

    #[test]
    fn test_router_route_keeps_exact_addresses() {
        let hop = RouteHop {
            from: Address::parse("0x4200000000000000000000000000000000000006").unwrap(),
            to: Address::parse("0x833589fCD6eDb6E08f4c7C32D4f71b54bdA02913").unwrap(),
            stable: true,
            factory: pool(),
        };
        let route = to_router_route(&hop).unwrap();

        let usdc: EvmAddress = "0x833589fCD6eDb6E08f4c7C32D4f71b54bdA02913".parse().unwrap();
        assert_eq!(route.to, usdc);
        assert_ne!(route.from, EvmAddress::ZERO);
        assert_ne!(route.factory, EvmAddress::ZERO);
        assert!(route.stable);
    }

    #[test]
    fn test_connect_rejects_bad_url() {
        let mut config = NetworkRegistry::builtin().get(8453).unwrap().clone();
        config.rpc_url = "not a url".to_string();
        assert!(matches!(
            RpcProvider::connect(&config),
            Err(ChainError::InvalidEndpoint { .. })
        ));
    }

    #[tokio::test]
    async fn test_resolve_token_rejects_other_chain() {
        let config = NetworkRegistry::builtin().get(8453).unwrap().clone();
        let provider = RpcProvider::connect(&config).unwrap();
        let err = provider.resolve_token(1, &pool()).await.unwrap_err();
        assert_eq!(err, ChainError::UnsupportedChain(1));
    }
}
