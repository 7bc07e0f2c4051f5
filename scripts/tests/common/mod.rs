//! Shared helpers for the script tests: a recording chain client and artifact fixtures

#![allow(dead_code)]

use std::{
    collections::HashMap,
    fs,
    path::{Path, PathBuf},
    sync::{Arc, Mutex},
};

use alloy::{
    primitives::{address, keccak256, Address, Bytes, TxHash, TxKind, U256},
    rpc::types::TransactionRequest,
    sol_types::{SolCall, SolValue},
};
use eyre::Result;
use scripts::{
    artifacts::ArtifactStore,
    client::{ChainClient, TxReceipt},
    constants::{
        LEAN_IMT_CONTRACT, POSEIDON_T3_CONTRACT, RIGGED_ROLL_CONTRACT, VERIFIER_CONTRACT,
        VOTING_CONTRACT,
    },
    deployer::Deployer,
    deployments::{DeploymentRecord, Deployments},
    errors::ScriptError,
    solidity::IDEX,
};
use serde_json::json;
use tempfile::TempDir;

/// The chain ID reported by the mock, that of a local Hardhat node
pub const TEST_CHAIN_ID: u64 = 31337;

/// The deployer account of the mock, the first Anvil dev account
pub const DEPLOYER: Address = address!("0xf39fd6e51aad88f6f4ce6ab8827279cfffb92266");

/// A solc library placeholder, always 20 bytes wide
pub const PLACEHOLDER: &str = "__$9f3c1a8e2b7d4c6f0a5e8b1d3c7f9a2e4b$__";

/// The byte offset at which fixtures place library placeholders
pub const LINK_OFFSET: usize = 2;

// --------------
// | Mock chain |
// --------------

/// A chain client that records every transaction it is asked to send
#[derive(Clone)]
pub struct MockChain {
    /// The recorded state, shared between clones
    state: Arc<Mutex<MockState>>,
}

/// The state behind a [`MockChain`]
#[derive(Default)]
struct MockState {
    /// Transactions in the order they were sent
    sent: Vec<TransactionRequest>,
    /// Receipts of the sent transactions
    receipts: HashMap<TxHash, TxReceipt>,
    /// Code of the contracts created so far
    code: HashMap<Address, Bytes>,
    /// The value returned by `DEX.totalLiquidity()`
    total_liquidity: U256,
    /// Calls with these selectors revert
    reverting: Vec<[u8; 4]>,
}

impl MockChain {
    /// An empty chain
    pub fn new() -> Self {
        Self {
            state: Arc::new(Mutex::new(MockState::default())),
        }
    }

    /// Report `value` as the DEX's total liquidity
    pub fn with_total_liquidity(self, value: U256) -> Self {
        self.state.lock().unwrap().total_liquidity = value;
        self
    }

    /// Revert every transaction calling the function with `selector`
    pub fn reverting(self, selector: [u8; 4]) -> Self {
        self.state.lock().unwrap().reverting.push(selector);
        self
    }

    /// The transactions sent so far
    pub fn sent(&self) -> Vec<TransactionRequest> {
        self.state.lock().unwrap().sent.clone()
    }
}

impl ChainClient for MockChain {
    fn deployer(&self) -> Address {
        DEPLOYER
    }

    async fn chain_id(&self) -> Result<u64, ScriptError> {
        Ok(TEST_CHAIN_ID)
    }

    async fn get_code(&self, address: Address) -> Result<Bytes, ScriptError> {
        let state = self.state.lock().unwrap();
        Ok(state.code.get(&address).cloned().unwrap_or_default())
    }

    async fn call(&self, tx: TransactionRequest) -> Result<Bytes, ScriptError> {
        let input = tx_input(&tx);
        if input.starts_with(&IDEX::totalLiquidityCall::SELECTOR) {
            let state = self.state.lock().unwrap();
            return Ok(state.total_liquidity.abi_encode().into());
        }

        Err(ScriptError::ContractInteraction(format!(
            "unexpected call {}",
            input
        )))
    }

    async fn send_transaction(&self, tx: TransactionRequest) -> Result<TxHash, ScriptError> {
        let mut state = self.state.lock().unwrap();
        let nonce = state.sent.len() as u64;
        let tx_hash = keccak256(nonce.to_be_bytes());
        let input = tx_input(&tx);

        let (contract_address, status) = match tx.to {
            Some(TxKind::Call(_)) => {
                let reverts = state
                    .reverting
                    .iter()
                    .any(|selector| input.starts_with(selector));
                (None, !reverts)
            }
            _ => {
                let address = DEPLOYER.create(nonce);
                state.code.insert(address, input);
                (Some(address), true)
            }
        };

        state.receipts.insert(
            tx_hash,
            TxReceipt {
                transaction_hash: tx_hash,
                block_number: Some(nonce + 1),
                gas_used: 21_000,
                contract_address,
                status,
            },
        );
        state.sent.push(tx);

        Ok(tx_hash)
    }

    async fn wait_for_receipt(&self, tx_hash: TxHash) -> Result<TxReceipt, ScriptError> {
        let state = self.state.lock().unwrap();
        state
            .receipts
            .get(&tx_hash)
            .cloned()
            .ok_or_else(|| ScriptError::ContractInteraction(format!("unknown tx {:#x}", tx_hash)))
    }
}

/// The calldata or init code of a transaction
pub fn tx_input(tx: &TransactionRequest) -> Bytes {
    tx.input.input().cloned().unwrap_or_default()
}

/// Decode the calldata of a transaction as a call to `T`
pub fn decode_call<T: SolCall>(tx: &TransactionRequest) -> Result<T> {
    Ok(T::abi_decode(&tx_input(tx))?)
}

// ------------
// | Fixtures |
// ------------

/// A scratch directory holding an artifacts tree and a deployments book
pub struct Fixture {
    /// The scratch directory, removed on drop
    pub dir: TempDir,
    /// The artifacts written by the fixture
    pub artifacts: ArtifactStore,
    /// The path of the deployments book
    pub deployments_path: PathBuf,
}

impl Fixture {
    /// Create a fixture holding the artifacts of every challenge contract
    pub fn new() -> Result<Self> {
        let dir = tempfile::tempdir()?;
        let artifacts_dir = dir.path().join("artifacts");
        fs::create_dir_all(&artifacts_dir)?;

        let fixture = Self {
            artifacts: ArtifactStore::new(&artifacts_dir),
            deployments_path: dir.path().join("deployments.json"),
            dir,
        };

        fixture.write_artifact(RIGGED_ROLL_CONTRACT, "0x6006", None)?;
        fixture.write_artifact(POSEIDON_T3_CONTRACT, "0x60016002", None)?;
        fixture.write_artifact(
            LEAN_IMT_CONTRACT,
            &format!("0x6003{}00", PLACEHOLDER),
            Some(POSEIDON_T3_CONTRACT),
        )?;
        fixture.write_artifact(VERIFIER_CONTRACT, "0x6004", None)?;
        fixture.write_artifact(
            VOTING_CONTRACT,
            &format!("0x6005{}", PLACEHOLDER),
            Some(LEAN_IMT_CONTRACT),
        )?;

        Ok(fixture)
    }

    /// Write a Hardhat-style artifact, optionally linking `library` at [`LINK_OFFSET`]
    pub fn write_artifact(&self, name: &str, bytecode: &str, library: Option<&str>) -> Result<()> {
        let link_references = match library {
            Some(lib) => json!({
                format!("contracts/{}.sol", lib): {
                    lib: [{ "start": LINK_OFFSET, "length": 20 }]
                }
            }),
            None => json!({}),
        };

        let artifact = json!({
            "_format": "hh-sol-artifact-1",
            "contractName": name,
            "sourceName": format!("contracts/{}.sol", name),
            "abi": [{ "type": "constructor", "inputs": [], "stateMutability": "nonpayable" }],
            "bytecode": bytecode,
            "linkReferences": link_references,
        });

        let dir = self
            .dir
            .path()
            .join("artifacts")
            .join("contracts")
            .join(format!("{}.sol", name));
        fs::create_dir_all(&dir)?;
        fs::write(dir.join(format!("{}.json", name)), artifact.to_string())?;

        Ok(())
    }

    /// Record a contract deployed by other tooling
    pub fn seed_deployment(&self, name: &str, address: Address) -> Result<()> {
        let mut deployments = self.deployments()?;
        deployments.check_chain(TEST_CHAIN_ID)?;
        deployments.insert(name, DeploymentRecord::from_address(address));
        deployments.save()?;
        Ok(())
    }

    /// Load the deployments book
    pub fn deployments(&self) -> Result<Deployments> {
        Ok(Deployments::load(&self.deployments_path)?)
    }

    /// Create a deployer over the fixture, submitting through `client`
    pub async fn deployer<'a>(&self, client: &'a MockChain) -> Result<Deployer<'a, MockChain>> {
        Ok(Deployer::new(client, self.artifacts.clone(), self.deployments()?).await?)
    }

    /// Write a hardhat-deploy network directory `deployments/<network>` holding the
    /// given contracts, as left behind by the project's own deploy scripts
    pub fn write_hardhat_network(
        &self,
        network: &str,
        chain_id: u64,
        contracts: &[(&str, Address)],
    ) -> Result<PathBuf> {
        let dir = self.dir.path().join("deployments").join(network);
        fs::create_dir_all(dir.join("solcInputs"))?;
        fs::write(dir.join(".chainId"), chain_id.to_string())?;

        for (name, address) in contracts {
            let deployment = json!({
                "address": address.to_checksum(None),
                "abi": [{ "type": "function", "name": "owner", "inputs": [], "outputs": [], "stateMutability": "view" }],
                "transactionHash": keccak256(name.as_bytes()),
                "receipt": { "status": 1, "from": DEPLOYER },
                "args": [],
                "numDeployments": 1,
                "solcInputHash": "1f9b8e0c4c5d3a27",
            });
            fs::write(dir.join(format!("{}.json", name)), deployment.to_string())?;
        }

        Ok(dir)
    }

    /// Create a deployer over the deployments book at `path`, submitting through `client`
    pub async fn deployer_at<'a>(
        &self,
        path: &Path,
        client: &'a MockChain,
    ) -> Result<Deployer<'a, MockChain>> {
        let deployments = Deployments::load(path)?;
        Ok(Deployer::new(client, self.artifacts.clone(), deployments).await?)
    }
}

/// The address of the `n`th contract the mock deployer creates on a fresh chain,
/// assuming every preceding transaction was a creation
pub fn nth_created(n: u64) -> Address {
    DEPLOYER.create(n)
}
