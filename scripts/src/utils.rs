//! Utilities for the challenge scripts

use std::str::FromStr;

use alloy::{
    primitives::{utils::parse_ether, Address, U256},
    providers::{DynProvider, ProviderBuilder},
    signers::local::PrivateKeySigner,
    transports::http::reqwest::Url,
};
use tracing::info;

use crate::{
    client::{ChainClient, RpcClient},
    errors::ScriptError,
};

/// Sets up the RPC client, signing as the deployer account derived from `priv_key`
pub async fn setup_client(priv_key: &str, rpc_url: &str) -> Result<RpcClient, ScriptError> {
    let signer = PrivateKeySigner::from_str(priv_key)
        .map_err(|e| ScriptError::ClientInitialization(e.to_string()))?;
    let url = Url::parse(rpc_url).map_err(|e| ScriptError::ClientInitialization(e.to_string()))?;

    let deployer = signer.address();
    let provider = ProviderBuilder::new().wallet(signer).connect_http(url);
    let client = RpcClient::new(DynProvider::new(provider), deployer);

    let chain_id = client.chain_id().await?;
    info!("connected to chain {} as deployer {:#x}", chain_id, deployer);

    Ok(client)
}

/// Parse a hex-encoded address given on the command line
pub fn parse_address(address: &str) -> Result<Address, ScriptError> {
    Address::from_str(address)
        .map_err(|e| ScriptError::CalldataConstruction(format!("invalid address {}: {}", address, e)))
}

/// Parse a decimal ether amount (e.g. `"0.002"`) into wei
pub fn parse_ether_amount(amount: &str) -> Result<U256, ScriptError> {
    parse_ether(amount)
        .map_err(|e| ScriptError::CalldataConstruction(format!("invalid amount {}: {}", amount, e)))
}
