//! The deployments book, recording the address of each deployed contract by name
//!
//! A book is backed either by a single JSON file written by these scripts, or by a
//! hardhat-deploy network directory (`deployments/<network>/`) holding a `.chainId`
//! file and one `<Name>.json` file per contract.

use std::{
    collections::{BTreeMap, BTreeSet},
    fs,
    path::{Path, PathBuf},
};

use alloy::primitives::{Address, TxHash, B256};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::{
    constants::{ARTIFACT_EXTENSION, HARDHAT_CHAIN_ID_FILE},
    errors::ScriptError,
};

/// A deployed contract as recorded in the deployments book
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeploymentRecord {
    /// The address of the contract
    pub address: Address,
    /// The hash of the creation transaction
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub transaction_hash: Option<TxHash>,
    /// The keccak hash of the init code the contract was created with
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bytecode_hash: Option<B256>,
    /// The libraries linked into the contract
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub libraries: BTreeMap<String, Address>,
    /// The ABI of the contract, when the book carries it
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub abi: Option<Value>,
}

impl DeploymentRecord {
    /// A record carrying only an address, for contracts deployed by other tooling
    pub fn from_address(address: Address) -> Self {
        Self {
            address,
            transaction_hash: None,
            bytecode_hash: None,
            libraries: BTreeMap::new(),
            abi: None,
        }
    }
}

/// The on-disk layout of a deployments book file
#[derive(Debug, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
struct DeploymentsFile {
    /// The chain the deployments live on
    #[serde(default, skip_serializing_if = "Option::is_none")]
    chain_id: Option<u64>,
    /// The deployed contracts, keyed by name
    #[serde(default)]
    contracts: BTreeMap<String, DeploymentRecord>,
}

/// The fields read from a hardhat-deploy `<Name>.json` deployment file
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct HardhatDeployment {
    /// The address of the contract
    address: Address,
    /// The hash of the creation transaction
    #[serde(default)]
    transaction_hash: Option<TxHash>,
    /// The init code hash, present when these scripts wrote the file
    #[serde(default)]
    bytecode_hash: Option<B256>,
    /// The libraries linked into the contract
    #[serde(default)]
    libraries: BTreeMap<String, Address>,
    /// The ABI of the contract
    #[serde(default)]
    abi: Option<Value>,
}

impl From<HardhatDeployment> for DeploymentRecord {
    fn from(deployment: HardhatDeployment) -> Self {
        Self {
            address: deployment.address,
            transaction_hash: deployment.transaction_hash,
            bytecode_hash: deployment.bytecode_hash,
            libraries: deployment.libraries,
            abi: deployment.abi,
        }
    }
}

/// Where a deployments book is persisted
#[derive(Debug, Clone, PartialEq, Eq)]
enum Backing {
    /// A single JSON file
    File(PathBuf),
    /// A hardhat-deploy network directory
    Network(PathBuf),
}

/// A deployments book
#[derive(Debug)]
pub struct Deployments {
    /// Where the book is persisted
    backing: Backing,
    /// The current contents of the book
    file: DeploymentsFile,
    /// Contracts recorded since the book was loaded
    dirty: BTreeSet<String>,
}

impl Deployments {
    /// Load the book at `path`
    ///
    /// A directory is read as a hardhat-deploy network directory. Any other path is
    /// read as a book file, starting empty if the file does not exist.
    pub fn load(path: impl Into<PathBuf>) -> Result<Self, ScriptError> {
        let path = path.into();
        if path.is_dir() {
            return Self::load_network(path);
        }

        let file = if path.exists() {
            let contents = read_file(&path)?;
            serde_json::from_str(&contents)
                .map_err(|e| ScriptError::Serde(format!("{}: {}", path.display(), e)))?
        } else {
            DeploymentsFile::default()
        };

        Ok(Self {
            backing: Backing::File(path),
            file,
            dirty: BTreeSet::new(),
        })
    }

    /// Load every book under `path`
    ///
    /// A hardhat-deploy `deployments/` root yields one book per network directory,
    /// in directory name order. Anything else yields the single book at `path`.
    pub fn load_all(path: impl Into<PathBuf>) -> Result<Vec<Self>, ScriptError> {
        let path = path.into();
        if !path.is_dir() || path.join(HARDHAT_CHAIN_ID_FILE).is_file() {
            return Ok(vec![Self::load(path)?]);
        }

        let mut networks = list_dir(&path)?
            .into_iter()
            .filter(|entry| entry.join(HARDHAT_CHAIN_ID_FILE).is_file())
            .collect::<Vec<_>>();
        networks.sort();

        networks.into_iter().map(Self::load_network).collect()
    }

    /// Load a hardhat-deploy network directory
    fn load_network(dir: PathBuf) -> Result<Self, ScriptError> {
        let chain_id_path = dir.join(HARDHAT_CHAIN_ID_FILE);
        let chain_id = if chain_id_path.is_file() {
            let contents = read_file(&chain_id_path)?;
            let chain_id = contents.trim().parse::<u64>().map_err(|e| {
                ScriptError::Serde(format!("{}: {}", chain_id_path.display(), e))
            })?;
            Some(chain_id)
        } else {
            None
        };

        let mut contracts = BTreeMap::new();
        for path in list_dir(&dir)? {
            let Some(name) = deployment_name(&path) else {
                continue;
            };

            let contents = read_file(&path)?;
            let deployment: HardhatDeployment = serde_json::from_str(&contents)
                .map_err(|e| ScriptError::Serde(format!("{}: {}", path.display(), e)))?;
            contracts.insert(name, deployment.into());
        }

        Ok(Self {
            backing: Backing::Network(dir),
            file: DeploymentsFile {
                chain_id,
                contracts,
            },
            dirty: BTreeSet::new(),
        })
    }

    /// The chain the book is pinned to, if any
    pub fn chain_id(&self) -> Option<u64> {
        self.file.chain_id
    }

    /// Pin the book to `chain_id`, failing if it already belongs to another chain
    pub fn check_chain(&mut self, chain_id: u64) -> Result<(), ScriptError> {
        match self.file.chain_id {
            Some(recorded) if recorded != chain_id => Err(ScriptError::ChainMismatch {
                recorded,
                connected: chain_id,
            }),
            _ => {
                self.file.chain_id = Some(chain_id);
                Ok(())
            }
        }
    }

    /// The record of the named contract, if it has been deployed
    pub fn get(&self, name: &str) -> Option<&DeploymentRecord> {
        self.file.contracts.get(name)
    }

    /// The address of the named contract
    pub fn address(&self, name: &str) -> Result<Address, ScriptError> {
        self.get(name)
            .map(|record| record.address)
            .ok_or_else(|| ScriptError::MissingDeployment(name.to_string()))
    }

    /// Record a deployment, replacing any previous record under the same name
    pub fn insert(&mut self, name: &str, record: DeploymentRecord) {
        self.file.contracts.insert(name.to_string(), record);
        self.dirty.insert(name.to_string());
    }

    /// Iterate over the recorded deployments in name order
    pub fn contracts(&self) -> impl Iterator<Item = (&String, &DeploymentRecord)> {
        self.file.contracts.iter()
    }

    /// Write the book back to where it was loaded from
    pub fn save(&self) -> Result<(), ScriptError> {
        match &self.backing {
            Backing::File(path) => {
                let contents = serde_json::to_string_pretty(&self.file)
                    .map_err(|e| ScriptError::Serde(e.to_string()))?;
                write_file(path, &contents)
            }
            Backing::Network(dir) => self.save_network(dir),
        }
    }

    /// Write the `.chainId` file and every contract recorded since loading into a
    /// hardhat-deploy network directory
    ///
    /// Fields of an existing deployment file that the book does not track are kept.
    fn save_network(&self, dir: &Path) -> Result<(), ScriptError> {
        if let Some(chain_id) = self.file.chain_id {
            write_file(&dir.join(HARDHAT_CHAIN_ID_FILE), &chain_id.to_string())?;
        }

        for name in &self.dirty {
            let Some(record) = self.file.contracts.get(name) else {
                continue;
            };

            let path = dir.join(format!("{}.{}", name, ARTIFACT_EXTENSION));
            let mut deployment = if path.is_file() {
                match serde_json::from_str(&read_file(&path)?) {
                    Ok(Value::Object(fields)) => fields,
                    _ => Map::new(),
                }
            } else {
                Map::new()
            };

            let fields = serde_json::to_value(HardhatFields::from(record))
                .map_err(|e| ScriptError::Serde(e.to_string()))?;
            if let Value::Object(fields) = fields {
                deployment.extend(fields);
            }

            let contents = serde_json::to_string_pretty(&Value::Object(deployment))
                .map_err(|e| ScriptError::Serde(e.to_string()))?;
            write_file(&path, &contents)?;
        }

        Ok(())
    }
}

/// The fields of a hardhat-deploy deployment file written by these scripts
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct HardhatFields<'a> {
    /// The address of the contract
    address: Address,
    /// The hash of the creation transaction
    #[serde(skip_serializing_if = "Option::is_none")]
    transaction_hash: Option<TxHash>,
    /// The init code hash
    #[serde(skip_serializing_if = "Option::is_none")]
    bytecode_hash: Option<B256>,
    /// The libraries linked into the contract
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    libraries: BTreeMap<String, Address>,
    /// The ABI of the contract
    #[serde(skip_serializing_if = "Option::is_none")]
    abi: Option<&'a Value>,
}

impl<'a> From<&'a DeploymentRecord> for HardhatFields<'a> {
    fn from(record: &'a DeploymentRecord) -> Self {
        Self {
            address: record.address,
            transaction_hash: record.transaction_hash,
            bytecode_hash: record.bytecode_hash,
            libraries: record.libraries.clone(),
            abi: record.abi.as_ref(),
        }
    }
}

/// The contract name of a hardhat-deploy deployment file, `None` for any other
/// entry of a network directory (`.chainId`, `.migrations.json`, `solcInputs/`)
fn deployment_name(path: &Path) -> Option<String> {
    if !path.is_file() || path.extension()? != ARTIFACT_EXTENSION {
        return None;
    }

    let name = path.file_stem()?.to_str()?;
    (!name.starts_with('.')).then(|| name.to_string())
}

/// The entries of a directory
fn list_dir(dir: &Path) -> Result<Vec<PathBuf>, ScriptError> {
    let entries =
        fs::read_dir(dir).map_err(|e| ScriptError::ReadFile(format!("{}: {}", dir.display(), e)))?;

    entries
        .map(|entry| {
            entry
                .map(|entry| entry.path())
                .map_err(|e| ScriptError::ReadFile(format!("{}: {}", dir.display(), e)))
        })
        .collect()
}

/// Read a file to a string
fn read_file(path: &Path) -> Result<String, ScriptError> {
    fs::read_to_string(path).map_err(|e| ScriptError::ReadFile(format!("{}: {}", path.display(), e)))
}

/// Write a string to a file
fn write_file(path: &Path, contents: &str) -> Result<(), ScriptError> {
    fs::write(path, contents)
        .map_err(|e| ScriptError::WriteFile(format!("{}: {}", path.display(), e)))
}
