//! Scripts for deploying and initializing the challenge smart contracts.

#![deny(missing_docs)]
#![deny(clippy::missing_docs_in_private_items)]

pub mod artifacts;
pub mod cli;
pub mod client;
pub mod commands;
pub mod constants;
pub mod deployer;
pub mod deployments;
pub mod errors;
pub mod solidity;
pub mod utils;
