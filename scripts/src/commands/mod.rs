//! Implementations of the challenge scripts

mod abis;
mod dex;
mod dice;
mod voting;

pub use abis::export_abis;
pub use dex::{init_dex, InitDexOutcome};
pub use dice::deploy_rigged_roll;
pub use voting::{deploy_voting, VotingDeployment};
