//! Command Line Interface for the sell-fee aware quoter.
use anyhow::{Context, Result, bail};
use clap::{Parser, Subcommand};
use dotenv::dotenv;
use rust_decimal::Decimal;
use sellfee_domain::entities::token::NATIVE_DECIMALS;
use sellfee_domain::quote::{QuoteRequest, QuoteResult};
use sellfee_domain::value_objects::{Address, TokenAmount};
use sellfee_engine::{QuoteEngine, QuoteError};
use sellfee_engine::policy::{CorrectionPolicy, HopStability, SingleHopPolicy};
use sellfee_protocols::config::{BASE_CHAIN_ID, ChainConfig, NetworkRegistry};
use sellfee_protocols::memory::{ChainSnapshot, InMemoryChain};
use sellfee_protocols::rpc::RpcProvider;
use sellfee_protocols::{ChainReader, TokenResolver};
use serde_json::{Value, json};
use std::path::PathBuf;
use std::sync::Arc;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "sellfee-quoter")]
#[command(about = "Sell-fee aware swap quotes for Aerodrome pools", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Quote a swap, correcting sales of a taxed token through its pool
    Quote {
        /// Chain id of the network to quote on
        #[arg(long, default_value_t = BASE_CHAIN_ID)]
        chain_id: u64,

        /// Input token address (zero address for the native currency)
        #[arg(long)]
        token_in: Address,

        /// Output token address (zero address for the native currency)
        #[arg(long)]
        token_out: Address,

        /// Input amount in base units
        #[arg(short, long)]
        amount: TokenAmount,

        /// Pool that charges the transfer tax on sales
        #[arg(long)]
        pair: Address,

        /// Token that carries the transfer tax
        #[arg(long)]
        agent_key: Address,

        /// Transfer tax in parts per thousand (30 = 3%)
        #[arg(long, default_value_t = 0)]
        fee_percent: u32,

        /// Output of a sale that only crosses the taxed pool
        #[arg(long, default_value_t = SingleHopPolicy::ReserveDerived)]
        single_hop_policy: SingleHopPolicy,

        /// Stable flag written into the returned hops
        #[arg(long, default_value_t = HopStability::ForceVolatile)]
        hop_stability: HopStability,

        /// Quote against a JSON pool snapshot instead of the RPC endpoint
        #[arg(long)]
        snapshot: Option<PathBuf>,
    },
    /// List configured networks
    Networks,
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let registry = NetworkRegistry::from_env()?;

    match cli.command {
        Commands::Quote {
            chain_id,
            token_in,
            token_out,
            amount,
            pair,
            agent_key,
            fee_percent,
            single_hop_policy,
            hop_stability,
            snapshot,
        } => {
            let config = registry.get(chain_id)?.clone();
            let policy = CorrectionPolicy {
                single_hop: single_hop_policy,
                hop_stability,
            };
            let request = QuoteRequest {
                chain_id,
                token_in,
                token_out,
                token_in_amount: amount,
                pair_address: pair,
                agent_key_address: agent_key,
                total_fee_percent: fee_percent,
            };

            let outcome = match snapshot {
                Some(path) => {
                    let raw = std::fs::read_to_string(&path)
                        .with_context(|| format!("reading snapshot {}", path.display()))?;
                    let snapshot: ChainSnapshot = serde_json::from_str(&raw)
                        .with_context(|| format!("parsing snapshot {}", path.display()))?;
                    info!(
                        pools = snapshot.pools.len(),
                        tokens = snapshot.tokens.len(),
                        "Quoting against snapshot"
                    );
                    run_quote(config, Arc::new(InMemoryChain::new(snapshot)), policy, &request)
                        .await
                }
                None => {
                    info!(rpc_url = %config.rpc_url, "Quoting against RPC");
                    let provider = RpcProvider::connect(&config)?;
                    run_quote(config, Arc::new(provider), policy, &request).await
                }
            };

            match outcome {
                Ok(output) => println!("{}", serde_json::to_string_pretty(&output)?),
                Err(e) => {
                    println!("{}", serde_json::to_string_pretty(&render_error(&e))?);
                    bail!("quote failed: {e}");
                }
            }
        }
        Commands::Networks => {
            let networks: Vec<Value> = registry.iter().map(network_summary).collect();
            println!("{}", serde_json::to_string_pretty(&networks)?);
        }
    }

    Ok(())
}

async fn run_quote<C>(
    config: ChainConfig,
    chain: Arc<C>,
    policy: CorrectionPolicy,
    request: &QuoteRequest,
) -> Result<Value, QuoteError>
where
    C: ChainReader + TokenResolver + 'static,
{
    let engine = QuoteEngine::from_chain(config.clone(), chain.clone()).with_policy(policy);
    let result = engine.compute_quote(request).await?;
    let decimals = output_decimals(&config, chain.as_ref(), &request.token_out).await;
    Ok(render_quote(&result, decimals))
}

fn render_error(error: &QuoteError) -> Value {
    json!({
        "error": error.reason(),
        "code": error.error_code(),
    })
}

/// Decimals of the output token; `None` when its metadata cannot be read.
async fn output_decimals<R>(config: &ChainConfig, resolver: &R, token: &Address) -> Option<u8>
where
    R: TokenResolver + ?Sized,
{
    if token.is_zero() {
        return Some(NATIVE_DECIMALS);
    }
    resolver
        .resolve_token(config.chain_id, token)
        .await
        .ok()
        .map(|t| t.decimals)
}

fn render_quote(result: &QuoteResult, decimals: Option<u8>) -> Value {
    let mut output = json!(result);
    let display = decimals
        .and_then(|d| result.amount_out.to_decimal(d))
        .map(|d: Decimal| d.normalize().to_string());
    if let (Some(display), Some(map)) = (display, output.as_object_mut()) {
        map.insert("quoteDisplay".to_string(), Value::String(display));
    }
    output
}

fn network_summary(config: &ChainConfig) -> Value {
    json!({
        "chainId": config.chain_id,
        "name": config.name,
        "rpcUrl": config.rpc_url,
        "factory": config.factory,
        "router": config.router,
        "wrappedNative": config.wrapped_native,
        "connectors": config.connectors,
        "readTimeoutMs": config.read_timeout_ms,
    })
}
