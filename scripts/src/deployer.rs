//! Deployment of contracts from their artifacts, recording the results in the
//! deployments book

use alloy::{
    network::TransactionBuilder,
    primitives::{keccak256, Address, TxHash},
    rpc::types::TransactionRequest,
};
use itertools::Itertools;
use tracing::info;

use crate::{
    artifacts::{ArtifactStore, Libraries},
    client::ChainClient,
    deployments::{DeploymentRecord, Deployments},
    errors::ScriptError,
};

/// Options for a single contract deployment
#[derive(Debug, Clone, Default)]
pub struct DeployOptions {
    /// The ABI-encoded constructor arguments
    pub args: Vec<u8>,
    /// The addresses of the libraries to link, keyed by library name
    pub libraries: Libraries,
}

impl DeployOptions {
    /// Deploy with the given ABI-encoded constructor arguments
    pub fn with_args(args: Vec<u8>) -> Self {
        Self {
            args,
            ..Default::default()
        }
    }

    /// Link the named library at `address`
    pub fn with_library(mut self, name: &str, address: Address) -> Self {
        self.libraries.insert(name.to_string(), address);
        self
    }
}

/// The result of a deployment
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeployedContract {
    /// The name of the contract
    pub name: String,
    /// The address of the contract
    pub address: Address,
    /// The creation transaction, if it is known
    pub transaction_hash: Option<TxHash>,
    /// Whether this run deployed the contract, as opposed to reusing an existing deployment
    pub newly_deployed: bool,
}

/// Deploys contracts by name on behalf of the client's deployer account
pub struct Deployer<'a, C> {
    /// The chain client
    client: &'a C,
    /// Where artifacts are loaded from
    artifacts: ArtifactStore,
    /// Where deployments are recorded
    deployments: Deployments,
}

impl<'a, C: ChainClient> Deployer<'a, C> {
    /// Create a deployer, pinning the deployments book to the client's chain
    pub async fn new(
        client: &'a C,
        artifacts: ArtifactStore,
        mut deployments: Deployments,
    ) -> Result<Self, ScriptError> {
        let chain_id = client.chain_id().await?;
        deployments.check_chain(chain_id)?;

        Ok(Self {
            client,
            artifacts,
            deployments,
        })
    }

    /// The chain client
    pub fn client(&self) -> &'a C {
        self.client
    }

    /// The artifact store
    pub fn artifacts(&self) -> &ArtifactStore {
        &self.artifacts
    }

    /// The deployments book
    pub fn deployments(&self) -> &Deployments {
        &self.deployments
    }

    /// The address of a previously deployed contract
    pub fn address_of(&self, name: &str) -> Result<Address, ScriptError> {
        self.deployments.address(name)
    }

    /// Deploy the named contract
    ///
    /// If the book already holds a deployment of the same init code and that address
    /// still has code on chain, the existing deployment is reused.
    pub async fn deploy(
        &mut self,
        name: &str,
        options: DeployOptions,
    ) -> Result<DeployedContract, ScriptError> {
        let artifact = self.artifacts.load(name)?;
        let init_code = artifact.init_code(&options.libraries, &options.args)?;
        let bytecode_hash = keccak256(&init_code);

        if let Some(existing) = self.deployments.get(name) {
            if existing.bytecode_hash == Some(bytecode_hash)
                && !self.client.get_code(existing.address).await?.is_empty()
            {
                info!("reusing \"{}\" at {:#x}", name, existing.address);
                return Ok(DeployedContract {
                    name: name.to_string(),
                    address: existing.address,
                    transaction_hash: existing.transaction_hash,
                    newly_deployed: false,
                });
            }
        }

        if !options.libraries.is_empty() {
            let libraries = options
                .libraries
                .iter()
                .map(|(lib, address)| format!("{} = {:#x}", lib, address))
                .join(", ");
            info!("linking \"{}\" against {}", name, libraries);
        }

        let tx = TransactionRequest::default()
            .with_from(self.client.deployer())
            .with_deploy_code(init_code);

        let receipt = self
            .client
            .send_and_confirm(&format!("deploying \"{}\"", name), tx)
            .await
            .map_err(|e| ScriptError::ContractDeployment(format!("{}: {}", name, e)))?;

        let address = receipt.contract_address.ok_or_else(|| {
            ScriptError::ContractDeployment(format!(
                "receipt of {} deployment has no contract address",
                name
            ))
        })?;
        info!(
            "deployed \"{}\" at {:#x} with {} gas",
            name, address, receipt.gas_used
        );

        self.deployments.insert(
            name,
            DeploymentRecord {
                address,
                transaction_hash: Some(receipt.transaction_hash),
                bytecode_hash: Some(bytecode_hash),
                libraries: options.libraries,
                abi: Some(artifact.abi),
            },
        );
        self.deployments.save()?;

        Ok(DeployedContract {
            name: name.to_string(),
            address,
            transaction_hash: Some(receipt.transaction_hash),
            newly_deployed: true,
        })
    }
}
