//! Definitions of errors that can occur during the execution of the challenge scripts

use std::{
    error::Error,
    fmt::{self, Display, Formatter},
};

/// Errors that can occur during the execution of the challenge scripts
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ScriptError {
    /// Error reading a file (artifact or deployments book)
    ReadFile(String),
    /// Error writing a file (deployments book or ABI export)
    WriteFile(String),
    /// Error parsing a contract compilation artifact
    ArtifactParsing(String),
    /// Error linking library addresses into a contract's bytecode
    Linking(String),
    /// Error initializing the RPC client
    ClientInitialization(String),
    /// Error constructing calldata or parsing a CLI-provided value
    CalldataConstruction(String),
    /// Error deploying a contract
    ContractDeployment(String),
    /// Error calling a contract method
    ContractInteraction(String),
    /// A contract looked up by name has no recorded deployment
    MissingDeployment(String),
    /// The deployments book belongs to a different chain than the one connected to
    ChainMismatch {
        /// The chain ID recorded in the deployments book
        recorded: u64,
        /// The chain ID reported by the RPC endpoint
        connected: u64,
    },
    /// Error de/serializing JSON
    Serde(String),
}

impl Display for ScriptError {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            ScriptError::ReadFile(s) => write!(f, "error reading file: {}", s),
            ScriptError::WriteFile(s) => write!(f, "error writing file: {}", s),
            ScriptError::ArtifactParsing(s) => write!(f, "error parsing artifact: {}", s),
            ScriptError::Linking(s) => write!(f, "error linking libraries: {}", s),
            ScriptError::ClientInitialization(s) => write!(f, "error initializing client: {}", s),
            ScriptError::CalldataConstruction(s) => write!(f, "error constructing calldata: {}", s),
            ScriptError::ContractDeployment(s) => write!(f, "error deploying contract: {}", s),
            ScriptError::ContractInteraction(s) => {
                write!(f, "error interacting with contract: {}", s)
            }
            ScriptError::MissingDeployment(s) => write!(f, "no deployment found for `{}`", s),
            ScriptError::ChainMismatch {
                recorded,
                connected,
            } => write!(
                f,
                "deployments were recorded on chain {} but the RPC endpoint is chain {}",
                recorded, connected
            ),
            ScriptError::Serde(s) => write!(f, "error de/serializing json: {}", s),
        }
    }
}

impl Error for ScriptError {}
