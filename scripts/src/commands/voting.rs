//! Deployment of the zk voting contracts

use alloy::sol_types::SolValue;
use tracing::info;

use crate::{
    cli::DeployVotingArgs,
    client::ChainClient,
    constants::{LEAN_IMT_CONTRACT, POSEIDON_T3_CONTRACT, VERIFIER_CONTRACT, VOTING_CONTRACT},
    deployer::{DeployOptions, DeployedContract, Deployer},
    errors::ScriptError,
    utils::parse_address,
};

/// The contracts deployed by `deploy_voting`
#[derive(Debug, Clone)]
pub struct VotingDeployment {
    /// The Poseidon hash library
    pub poseidon_t3: DeployedContract,
    /// The Merkle tree library, linked against Poseidon
    pub lean_imt: DeployedContract,
    /// The proof verifier
    pub verifier: DeployedContract,
    /// The voting contract, linked against the Merkle tree library
    pub voting: DeployedContract,
}

/// Deploy the voting contract and everything it depends on
///
/// Each library address is taken from this run's deployments, so the chain of
/// links always points at the contracts just deployed (or reused).
pub async fn deploy_voting<C: ChainClient>(
    args: DeployVotingArgs,
    deployer: &mut Deployer<'_, C>,
) -> Result<VotingDeployment, ScriptError> {
    let owner = match args.owner.as_deref() {
        Some(owner) => parse_address(owner)?,
        None => deployer.client().deployer(),
    };

    let poseidon_t3 = deployer
        .deploy(POSEIDON_T3_CONTRACT, DeployOptions::default())
        .await?;

    let lean_imt = deployer
        .deploy(
            LEAN_IMT_CONTRACT,
            DeployOptions::default().with_library(POSEIDON_T3_CONTRACT, poseidon_t3.address),
        )
        .await?;

    let verifier = deployer
        .deploy(VERIFIER_CONTRACT, DeployOptions::default())
        .await?;

    let constructor_args = (owner, verifier.address, args.question).abi_encode_params();
    let voting = deployer
        .deploy(
            VOTING_CONTRACT,
            DeployOptions::with_args(constructor_args)
                .with_library(LEAN_IMT_CONTRACT, lean_imt.address),
        )
        .await?;

    info!("Voting contract deployed at: {:#x}", voting.address);

    Ok(VotingDeployment {
        poseidon_t3,
        lean_imt,
        verifier,
        voting,
    })
}
