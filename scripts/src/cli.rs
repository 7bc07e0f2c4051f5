//! Definitions of CLI arguments and commands for the challenge scripts

use std::path::{Path, PathBuf};

use clap::{Args, Parser, Subcommand};

use crate::{
    artifacts::ArtifactStore,
    commands::{deploy_rigged_roll, deploy_voting, export_abis, init_dex},
    constants::{
        DEFAULT_ABI_OUTPUT_PATH, DEFAULT_ARTIFACTS_DIR, DEFAULT_DEPLOYMENTS_PATH,
        DEFAULT_DEX_ALLOWANCE, DEFAULT_DEX_LIQUIDITY, DEFAULT_PKEY, DEFAULT_RIGGED_ROLL_FUNDING,
        DEFAULT_RPC_URL, DEFAULT_VOTING_QUESTION,
    },
    deployer::Deployer,
    deployments::Deployments,
    errors::ScriptError,
    utils::setup_client,
};

/// Scripts for deploying & initializing the challenge contracts
#[derive(Parser)]
pub struct Cli {
    /// Private key of the deployer, defaults to the first Anvil / Hardhat dev account
    #[arg(short, long, env = "PKEY", default_value = DEFAULT_PKEY, hide_default_value = true)]
    pub priv_key: String,

    /// Network RPC URL
    #[arg(short, long, env = "RPC_URL", default_value = DEFAULT_RPC_URL)]
    pub rpc_url: String,

    /// Path to the file recording deployed contract addresses, or to a hardhat-deploy
    /// network directory (`deployments/<network>`). `export-abis` also accepts the
    /// hardhat-deploy `deployments` root, exporting every network under it
    #[arg(short, long, env = "DEPLOYMENTS_PATH", default_value = DEFAULT_DEPLOYMENTS_PATH)]
    pub deployments_path: PathBuf,

    /// Directory containing the contracts' compilation artifacts
    #[arg(short, long, env = "ARTIFACTS_DIR", default_value = DEFAULT_ARTIFACTS_DIR)]
    pub artifacts_dir: PathBuf,

    /// The command to run
    #[command(subcommand)]
    pub command: Command,
}

/// The possible CLI commands
#[derive(Subcommand)]
pub enum Command {
    /// Deploy the RiggedRoll contract against the deployed DiceGame and fund it
    DeployRiggedRoll(DeployRiggedRollArgs),
    /// Seed the DEX with its initial liquidity, unless that was already done
    InitDex(InitDexArgs),
    /// Deploy the zk voting contracts along with the libraries they link against
    DeployVoting(DeployVotingArgs),
    /// Generate the frontend's TypeScript module of deployed addresses and ABIs
    ExportAbis(ExportAbisArgs),
}

impl Command {
    /// Run the command
    pub async fn run(
        self,
        priv_key: &str,
        rpc_url: &str,
        deployments_path: &Path,
        artifacts_dir: &Path,
    ) -> Result<(), ScriptError> {
        let artifacts = ArtifactStore::new(artifacts_dir);

        match self {
            Command::DeployRiggedRoll(args) => {
                let client = setup_client(priv_key, rpc_url).await?;
                let deployments = Deployments::load(deployments_path)?;
                let mut deployer = Deployer::new(&client, artifacts, deployments).await?;
                deploy_rigged_roll(args, &mut deployer).await?;
            }
            Command::InitDex(args) => {
                let client = setup_client(priv_key, rpc_url).await?;
                let deployments = Deployments::load(deployments_path)?;
                let deployer = Deployer::new(&client, artifacts, deployments).await?;
                init_dex(args, &deployer).await?;
            }
            Command::DeployVoting(args) => {
                let client = setup_client(priv_key, rpc_url).await?;
                let deployments = Deployments::load(deployments_path)?;
                let mut deployer = Deployer::new(&client, artifacts, deployments).await?;
                deploy_voting(args, &mut deployer).await?;
            }
            Command::ExportAbis(args) => {
                let books = Deployments::load_all(deployments_path)?;
                export_abis(args, &artifacts, &books)?;
            }
        }

        Ok(())
    }
}

/// Deploy and fund the RiggedRoll contract
#[derive(Args)]
pub struct DeployRiggedRollArgs {
    /// Amount of ether to send to RiggedRoll once deployed
    #[arg(short, long, default_value = DEFAULT_RIGGED_ROLL_FUNDING)]
    pub funding: String,

    /// Address to transfer ownership of RiggedRoll to, in hex
    #[arg(short, long)]
    pub new_owner: Option<String>,
}

/// Initialize the DEX liquidity pool
#[derive(Args)]
pub struct InitDexArgs {
    /// Amount of Balloons, in whole tokens, the DEX is allowed to pull
    #[arg(short, long, default_value = DEFAULT_DEX_ALLOWANCE)]
    pub allowance: String,

    /// Amount of ether (and of Balloons) to seed the pool with
    #[arg(short, long, default_value = DEFAULT_DEX_LIQUIDITY)]
    pub liquidity: String,
}

/// Deploy the voting contracts
#[derive(Args)]
pub struct DeployVotingArgs {
    /// The question put to vote
    #[arg(short, long, default_value = DEFAULT_VOTING_QUESTION)]
    pub question: String,

    /// Address of the owner of the voting contract in hex, defaults to the deployer
    #[arg(short, long)]
    pub owner: Option<String>,
}

/// Export deployed contract addresses and ABIs for the frontend
#[derive(Args)]
pub struct ExportAbisArgs {
    /// Path of the generated TypeScript module
    #[arg(short, long, default_value = DEFAULT_ABI_OUTPUT_PATH)]
    pub output: PathBuf,
}
