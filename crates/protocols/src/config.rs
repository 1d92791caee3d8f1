//! Network registry: per-chain RPC endpoint and AMM contract addresses.

use crate::error::{ChainError, ConfigError};
use sellfee_domain::value_objects::Address;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::time::Duration;

/// Base mainnet chain id.
pub const BASE_CHAIN_ID: u64 = 8453;

/// Aerodrome PoolFactory on Base.
pub const AERODROME_FACTORY: &str = "0x420DD381b31aEf6683db6B902084cB0FFECe40Da";

/// Aerodrome Router on Base.
pub const AERODROME_ROUTER: &str = "0xcF77a3Ba9A5CA399B7c97c74d54e5b1Beb874E43";

/// WETH on OP-stack chains.
pub const BASE_WETH: &str = "0x4200000000000000000000000000000000000006";

/// Native USDC on Base.
pub const BASE_USDC: &str = "0x833589fCD6eDb6E08f4c7C32D4f71b54bdA02913";

pub const DEFAULT_BASE_RPC_URL: &str = "https://mainnet.base.org";

/// Default per-call timeout for chain reads.
pub const DEFAULT_READ_TIMEOUT_MS: u64 = 10_000;

/// Contracts and endpoint for one network.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChainConfig {
    pub chain_id: u64,
    pub name: String,
    pub rpc_url: String,
    pub factory: Address,
    pub router: Address,
    pub wrapped_native: Address,
    /// Intermediate tokens tried when no direct pool is good enough.
    pub connectors: Vec<Address>,
    pub read_timeout_ms: u64,
}

impl ChainConfig {
    /// Aerodrome on Base.
    pub fn base() -> Self {
        Self {
            chain_id: BASE_CHAIN_ID,
            name: "Base".to_string(),
            rpc_url: DEFAULT_BASE_RPC_URL.to_string(),
            factory: Address::parse(AERODROME_FACTORY).expect("Invalid factory address"),
            router: Address::parse(AERODROME_ROUTER).expect("Invalid router address"),
            wrapped_native: Address::parse(BASE_WETH).expect("Invalid WETH address"),
            connectors: vec![
                Address::parse(BASE_WETH).expect("Invalid WETH address"),
                Address::parse(BASE_USDC).expect("Invalid USDC address"),
            ],
            read_timeout_ms: DEFAULT_READ_TIMEOUT_MS,
        }
    }

    pub fn read_timeout(&self) -> Duration {
        Duration::from_millis(self.read_timeout_ms)
    }
}

/// Known networks keyed by chain id.
#[derive(Debug, Clone, Default)]
pub struct NetworkRegistry {
    chains: BTreeMap<u64, ChainConfig>,
}

impl NetworkRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry with the built-in networks and no overrides.
    pub fn builtin() -> Self {
        let mut registry = Self::new();
        registry.insert(ChainConfig::base());
        registry
    }

    /// Built-in networks overlaid with environment variables.
    ///
    /// * `RPC_URL_<CHAIN_ID>` - RPC endpoint
    /// * `CONNECTORS_<CHAIN_ID>` - comma-separated connector token addresses
    /// * `QUOTE_TIMEOUT_MS` - per-read timeout for every network
    pub fn from_env() -> Result<Self, ConfigError> {
        let mut registry = Self::builtin();
        registry.apply_overrides(|key| std::env::var(key).ok())?;
        Ok(registry)
    }

    /// Applies overrides from any key/value source.
    pub fn apply_overrides<F>(&mut self, lookup: F) -> Result<(), ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let timeout_ms = match lookup("QUOTE_TIMEOUT_MS") {
            Some(raw) => Some(parse_timeout("QUOTE_TIMEOUT_MS", &raw)?),
            None => None,
        };

        for (chain_id, config) in self.chains.iter_mut() {
            if let Some(url) = lookup(&format!("RPC_URL_{chain_id}")) {
                config.rpc_url = url;
            }

            let key = format!("CONNECTORS_{chain_id}");
            if let Some(raw) = lookup(&key) {
                config.connectors = parse_connectors(&key, &raw)?;
            }

            if let Some(ms) = timeout_ms {
                config.read_timeout_ms = ms;
            }
        }

        Ok(())
    }

    pub fn insert(&mut self, config: ChainConfig) {
        self.chains.insert(config.chain_id, config);
    }

    pub fn get(&self, chain_id: u64) -> Result<&ChainConfig, ChainError> {
        self.chains
            .get(&chain_id)
            .ok_or(ChainError::UnsupportedChain(chain_id))
    }

    pub fn iter(&self) -> impl Iterator<Item = &ChainConfig> {
        self.chains.values()
    }
}

fn parse_timeout(key: &str, raw: &str) -> Result<u64, ConfigError> {
    let ms: u64 = raw.trim().parse().map_err(|_| ConfigError::InvalidValue {
        key: key.to_string(),
        message: format!("'{raw}' is not a number of milliseconds"),
    })?;
    if ms == 0 {
        return Err(ConfigError::InvalidValue {
            key: key.to_string(),
            message: "must be > 0".to_string(),
        });
    }
    Ok(ms)
}

fn parse_connectors(key: &str, raw: &str) -> Result<Vec<Address>, ConfigError> {
    raw.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(|s| {
            Address::parse(s).map_err(|e| ConfigError::InvalidValue {
                key: key.to_string(),
                message: e.to_string(),
            })
        })
        .collect()
}
