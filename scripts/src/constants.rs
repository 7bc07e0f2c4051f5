//! Constants used in the challenge scripts

// ------------
// | Defaults |
// ------------

/// The default RPC endpoint, a local Hardhat or Anvil node
pub const DEFAULT_RPC_URL: &str = "http://127.0.0.1:8545";

/// The default deployer private key, the first default account in an Anvil node
pub const DEFAULT_PKEY: &str = "0xac0974bec39a17e36ba4a6b4d238ff944bacb478cbed5efcae784d7bf4f2ff80";

/// The default path of the deployments book
pub const DEFAULT_DEPLOYMENTS_PATH: &str = "deployments.json";

/// The default directory searched for compilation artifacts
pub const DEFAULT_ARTIFACTS_DIR: &str = "artifacts";

/// The default path of the generated TypeScript ABI module
pub const DEFAULT_ABI_OUTPUT_PATH: &str = "deployedContracts.ts";

// ------------------
// | Contract names |
// ------------------

/// The dice game contract, deployed ahead of the rigged roll
pub const DICE_GAME_CONTRACT: &str = "DiceGame";

/// The contract that predicts and wins dice game rolls
pub const RIGGED_ROLL_CONTRACT: &str = "RiggedRoll";

/// The ERC20 token traded on the DEX
pub const BALLOONS_CONTRACT: &str = "Balloons";

/// The decentralized exchange contract
pub const DEX_CONTRACT: &str = "DEX";

/// The Poseidon hash library used by the Merkle tree
pub const POSEIDON_T3_CONTRACT: &str = "PoseidonT3";

/// The lean incremental Merkle tree library
pub const LEAN_IMT_CONTRACT: &str = "LeanIMT";

/// The zero-knowledge proof verifier
pub const VERIFIER_CONTRACT: &str = "Verifier";

/// The voting contract
pub const VOTING_CONTRACT: &str = "Voting";

// ----------------------
// | Script parameters |
// ----------------------

/// The amount of ether sent to the rigged roll contract after deployment
pub const DEFAULT_RIGGED_ROLL_FUNDING: &str = "0.002";

/// The Balloons allowance granted to the DEX before initialization, in whole tokens
pub const DEFAULT_DEX_ALLOWANCE: &str = "100";

/// The amount of ether (and tokens) used to seed the DEX reserves
pub const DEFAULT_DEX_LIQUIDITY: &str = "0.002";

/// The gas limit attached to the DEX `init` transaction
pub const DEX_INIT_GAS_LIMIT: u64 = 200_000;

/// The question the voting contract is deployed with
pub const DEFAULT_VOTING_QUESTION: &str = "Should we build zk apps?";

// -----------------
// | Transactions |
// -----------------

/// The interval between polls for a transaction receipt, in milliseconds
pub const RECEIPT_POLL_INTERVAL_MS: u64 = 500;

/// The number of times to poll for a transaction receipt before giving up
pub const RECEIPT_POLL_ATTEMPTS: usize = 240;

// -------------
// | Artifacts |
// -------------

/// The extension of a compilation artifact
pub const ARTIFACT_EXTENSION: &str = "json";

/// The file holding the chain ID of a hardhat-deploy network directory
pub const HARDHAT_CHAIN_ID_FILE: &str = ".chainId";

/// The number of bytes in an Ethereum address
pub const NUM_BYTES_ADDRESS: usize = 20;

/// The header written at the top of the generated TypeScript ABI module
pub const ABI_MODULE_HEADER: &str = "/**\n * This file is autogenerated by challenge-scripts.\n * Do not edit it manually, re-run `challenge-scripts export-abis` instead.\n */\nimport { GenericContractsDeclaration } from \"~~/utils/scaffold-eth/contract\";\n\n";
