//! Generation of the frontend's TypeScript module of deployed contracts

use std::{fs, path::PathBuf};

use serde_json::{Map, Value};
use tracing::info;

use crate::{
    artifacts::ArtifactStore, cli::ExportAbisArgs, constants::ABI_MODULE_HEADER,
    deployments::Deployments, errors::ScriptError,
};

/// Write the address and ABI of every deployment in `books` to a TypeScript module,
/// keyed by chain ID and contract name. Returns the path written to.
///
/// A contract's ABI is taken from its deployment record when it carries one, and
/// from its compilation artifact otherwise. Books sharing a chain ID are merged,
/// later books taking precedence.
pub fn export_abis(
    args: ExportAbisArgs,
    artifacts: &ArtifactStore,
    books: &[Deployments],
) -> Result<PathBuf, ScriptError> {
    if books.is_empty() {
        return Err(ScriptError::ReadFile("no deployments found".to_string()));
    }

    let mut chains = Map::new();
    let mut num_contracts = 0;
    for deployments in books {
        let chain_id = deployments.chain_id().ok_or_else(|| {
            ScriptError::ReadFile("deployments book is not pinned to a chain yet".to_string())
        })?;

        let contracts = chains
            .entry(chain_id.to_string())
            .or_insert_with(|| Value::Object(Map::new()));
        let Value::Object(contracts) = contracts else {
            continue;
        };

        for (name, record) in deployments.contracts() {
            let abi = match &record.abi {
                Some(abi) => abi.clone(),
                None => artifacts.load(name)?.abi,
            };

            let mut contract = Map::new();
            contract.insert("address".to_string(), Value::String(record.address.to_string()));
            contract.insert("abi".to_string(), abi);
            contracts.insert(name.clone(), Value::Object(contract));
            num_contracts += 1;
        }
    }

    let num_chains = chains.len();
    let body = serde_json::to_string_pretty(&Value::Object(chains))
        .map_err(|e| ScriptError::Serde(e.to_string()))?;
    let module = format!(
        "{}const deployedContracts = {} as const;\n\nexport default deployedContracts satisfies GenericContractsDeclaration;\n",
        ABI_MODULE_HEADER, body
    );

    fs::write(&args.output, module)
        .map_err(|e| ScriptError::WriteFile(format!("{}: {}", args.output.display(), e)))?;
    info!(
        "wrote {} contract(s) on {} chain(s) to {}",
        num_contracts,
        num_chains,
        args.output.display()
    );

    Ok(args.output)
}
