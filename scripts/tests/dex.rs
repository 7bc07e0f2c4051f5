use alloy::{
    primitives::{address, utils::parse_ether, Address, TxKind, U256},
    sol_types::SolCall,
};
use common::{decode_call, Fixture, MockChain, TEST_CHAIN_ID};
use eyre::Result;
use scripts::{
    cli::InitDexArgs,
    commands::{init_dex, InitDexOutcome},
    constants::{
        BALLOONS_CONTRACT, DEFAULT_DEX_ALLOWANCE, DEFAULT_DEX_LIQUIDITY, DEX_CONTRACT,
        DEX_INIT_GAS_LIMIT,
    },
    errors::ScriptError,
    solidity::{IBalloons, IDEX},
};

mod common;

const BALLOONS: Address = address!("0x5fbdb2315678afecb367f032d93f642f64180aa3");
const DEX: Address = address!("0xe7f1725e7734ce288f8367e1bb143e90bb3f0512");

fn init_dex_args() -> InitDexArgs {
    InitDexArgs {
        allowance: DEFAULT_DEX_ALLOWANCE.to_string(),
        liquidity: DEFAULT_DEX_LIQUIDITY.to_string(),
    }
}

/// A fixture with both Balloons and the DEX already deployed
fn dex_fixture() -> Result<Fixture> {
    let fixture = Fixture::new()?;
    fixture.seed_deployment(BALLOONS_CONTRACT, BALLOONS)?;
    fixture.seed_deployment(DEX_CONTRACT, DEX)?;
    Ok(fixture)
}

#[tokio::test]
async fn test_initialized_dex_is_left_alone() -> Result<()> {
    let fixture = dex_fixture()?;
    let chain = MockChain::new().with_total_liquidity(U256::from(5));
    let deployer = fixture.deployer(&chain).await?;

    let outcome = init_dex(init_dex_args(), &deployer).await?;

    assert_eq!(outcome, InitDexOutcome::AlreadyInitialized);
    assert!(chain.sent().is_empty());

    Ok(())
}

#[tokio::test]
async fn test_empty_dex_is_approved_then_initialized() -> Result<()> {
    let fixture = dex_fixture()?;
    let chain = MockChain::new();
    let deployer = fixture.deployer(&chain).await?;

    let outcome = init_dex(init_dex_args(), &deployer).await?;
    assert_eq!(outcome, InitDexOutcome::Initialized);

    let sent = chain.sent();
    assert_eq!(sent.len(), 2);

    // First the allowance...
    assert_eq!(sent[0].to, Some(TxKind::Call(BALLOONS)));
    let approve: IBalloons::approveCall = decode_call(&sent[0])?;
    assert_eq!(approve.spender, DEX);
    assert_eq!(approve.value, parse_ether("100")?);

    // ...then the pool seeding, paying the same amount of ether as tokens
    let liquidity = parse_ether("0.002")?;
    assert_eq!(sent[1].to, Some(TxKind::Call(DEX)));
    let init: IDEX::initCall = decode_call(&sent[1])?;
    assert_eq!(init.tokens, liquidity);
    assert_eq!(sent[1].value, Some(liquidity));
    assert_eq!(sent[1].gas, Some(DEX_INIT_GAS_LIMIT));

    Ok(())
}

#[tokio::test]
async fn test_missing_dex_deployment_fails() -> Result<()> {
    let fixture = Fixture::new()?;
    fixture.seed_deployment(BALLOONS_CONTRACT, BALLOONS)?;
    let chain = MockChain::new();
    let deployer = fixture.deployer(&chain).await?;

    let res = init_dex(init_dex_args(), &deployer).await;

    assert_eq!(
        res,
        Err(ScriptError::MissingDeployment(DEX_CONTRACT.to_string()))
    );
    assert!(chain.sent().is_empty());

    Ok(())
}

#[tokio::test]
async fn test_reverted_approve_skips_init() -> Result<()> {
    let fixture = dex_fixture()?;
    let chain = MockChain::new().reverting(IBalloons::approveCall::SELECTOR);
    let deployer = fixture.deployer(&chain).await?;

    let res = init_dex(init_dex_args(), &deployer).await;

    assert!(matches!(res, Err(ScriptError::ContractInteraction(_))));
    assert_eq!(chain.sent().len(), 1);

    Ok(())
}

#[tokio::test]
async fn test_init_against_hardhat_deploy_network() -> Result<()> {
    let fixture = Fixture::new()?;
    let network = fixture.write_hardhat_network(
        "localhost",
        TEST_CHAIN_ID,
        &[(BALLOONS_CONTRACT, BALLOONS), (DEX_CONTRACT, DEX)],
    )?;
    let chain = MockChain::new();
    let deployer = fixture.deployer_at(&network, &chain).await?;

    let outcome = init_dex(init_dex_args(), &deployer).await?;
    assert_eq!(outcome, InitDexOutcome::Initialized);

    let sent = chain.sent();
    assert_eq!(sent.len(), 2);
    assert_eq!(sent[0].to, Some(TxKind::Call(BALLOONS)));
    assert_eq!(sent[1].to, Some(TxKind::Call(DEX)));

    Ok(())
}

#[tokio::test]
async fn test_hardhat_deploy_network_on_other_chain_is_rejected() -> Result<()> {
    let fixture = Fixture::new()?;
    let network = fixture.write_hardhat_network(
        "sepolia",
        11155111,
        &[(BALLOONS_CONTRACT, BALLOONS), (DEX_CONTRACT, DEX)],
    )?;
    let chain = MockChain::new();

    let res = fixture.deployer_at(&network, &chain).await;
    assert!(res.is_err());
    assert!(chain.sent().is_empty());

    Ok(())
}
