//! Initialization of the DEX liquidity pool

use alloy::{
    network::TransactionBuilder, primitives::utils::format_ether, rpc::types::TransactionRequest,
    sol_types::SolCall,
};
use tracing::{info, warn};

use crate::{
    cli::InitDexArgs,
    client::ChainClient,
    constants::{BALLOONS_CONTRACT, DEX_CONTRACT, DEX_INIT_GAS_LIMIT},
    deployer::Deployer,
    errors::ScriptError,
    solidity::{IBalloons, IDEX},
    utils::parse_ether_amount,
};

/// What `init_dex` did
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InitDexOutcome {
    /// The pool already held liquidity, nothing was sent
    AlreadyInitialized,
    /// The allowance was approved and the pool seeded
    Initialized,
}

/// Approve the DEX to pull Balloons and seed its pool, unless it already holds liquidity
///
/// Two concurrent runs may both observe an empty pool; the DEX itself rejects the
/// second `init`.
pub async fn init_dex<C: ChainClient>(
    args: InitDexArgs,
    deployer: &Deployer<'_, C>,
) -> Result<InitDexOutcome, ScriptError> {
    let allowance = parse_ether_amount(&args.allowance)?;
    let liquidity = parse_ether_amount(&args.liquidity)?;

    let client = deployer.client();
    info!("Deployer: {:#x}", client.deployer());

    let (balloons, dex) = match (
        deployer.address_of(BALLOONS_CONTRACT),
        deployer.address_of(DEX_CONTRACT),
    ) {
        (Ok(balloons), Ok(dex)) => (balloons, dex),
        (Err(e), _) | (_, Err(e)) => {
            warn!("contract lookup failed, are Balloons and DEX deployed on this network?");
            return Err(e);
        }
    };
    info!("DEX address: {:#x}", dex);

    let query = TransactionRequest::default()
        .with_to(dex)
        .with_call(&IDEX::totalLiquidityCall {});
    let output = client.call(query).await?;
    let total_liquidity = IDEX::totalLiquidityCall::abi_decode_returns(&output)
        .map_err(|e| ScriptError::ContractInteraction(e.to_string()))?;
    info!("Current total liquidity: {}", total_liquidity);

    if !total_liquidity.is_zero() {
        info!("DEX already initialized");
        return Ok(InitDexOutcome::AlreadyInitialized);
    }

    info!("Approving DEX for {} BAL...", format_ether(allowance));
    let approve = TransactionRequest::default()
        .with_from(client.deployer())
        .with_to(balloons)
        .with_call(&IBalloons::approveCall {
            spender: dex,
            value: allowance,
        });
    client.send_and_confirm("approve", approve).await?;
    info!("Approved");

    info!("Initializing DEX with {} ETH...", format_ether(liquidity));
    let init = TransactionRequest::default()
        .with_from(client.deployer())
        .with_to(dex)
        .with_call(&IDEX::initCall { tokens: liquidity })
        .with_value(liquidity)
        .with_gas_limit(DEX_INIT_GAS_LIMIT);
    client.send_and_confirm("init", init).await?;

    info!("DEX initialized successfully");
    Ok(InitDexOutcome::Initialized)
}
