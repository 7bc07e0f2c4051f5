//! The chain client the scripts submit transactions through

use std::time::Duration;

use alloy::{
    network::{Ethereum, ReceiptResponse},
    primitives::{Address, Bytes, TxHash},
    providers::{DynProvider, Provider},
    rpc::types::TransactionRequest,
};
use tracing::info;

use crate::{
    constants::{RECEIPT_POLL_ATTEMPTS, RECEIPT_POLL_INTERVAL_MS},
    errors::ScriptError,
};

/// The fields of a transaction receipt the scripts look at
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TxReceipt {
    /// The hash of the transaction
    pub transaction_hash: TxHash,
    /// The block the transaction was included in
    pub block_number: Option<u64>,
    /// The gas used by the transaction
    pub gas_used: u64,
    /// The address of the contract created by the transaction, if any
    pub contract_address: Option<Address>,
    /// Whether the transaction succeeded
    pub status: bool,
}

/// A connection to a chain, signing as the deployer account
#[allow(async_fn_in_trait)]
pub trait ChainClient {
    /// The address of the deployer account
    fn deployer(&self) -> Address;

    /// The ID of the connected chain
    async fn chain_id(&self) -> Result<u64, ScriptError>;

    /// The code deployed at the given address, empty if there is none
    async fn get_code(&self, address: Address) -> Result<Bytes, ScriptError>;

    /// Execute a read-only call, returning its output
    async fn call(&self, tx: TransactionRequest) -> Result<Bytes, ScriptError>;

    /// Sign and broadcast a transaction, returning its hash
    async fn send_transaction(&self, tx: TransactionRequest) -> Result<TxHash, ScriptError>;

    /// Wait until the given transaction is included
    async fn wait_for_receipt(&self, tx_hash: TxHash) -> Result<TxReceipt, ScriptError>;

    /// Send a transaction and wait for it to succeed, logging its progress under `label`
    async fn send_and_confirm(
        &self,
        label: &str,
        tx: TransactionRequest,
    ) -> Result<TxReceipt, ScriptError> {
        let tx_hash = self.send_transaction(tx).await?;
        info!("{} tx sent: {:#x}", label, tx_hash);

        let receipt = self.wait_for_receipt(tx_hash).await?;
        if !receipt.status {
            return Err(ScriptError::ContractInteraction(format!(
                "{} tx {:#x} reverted",
                label, tx_hash
            )));
        }

        match receipt.block_number {
            Some(block) => info!("{} tx included in block {}", label, block),
            None => info!("{} tx included", label),
        }

        Ok(receipt)
    }
}

/// A [`ChainClient`] backed by a JSON-RPC provider with the deployer's wallet attached
#[derive(Clone)]
pub struct RpcClient {
    /// The provider, with signing and nonce management fillers
    provider: DynProvider<Ethereum>,
    /// The address of the signing account
    deployer: Address,
}

impl RpcClient {
    /// Wrap a provider whose wallet signs as `deployer`
    pub fn new(provider: DynProvider<Ethereum>, deployer: Address) -> Self {
        Self { provider, deployer }
    }
}

impl ChainClient for RpcClient {
    fn deployer(&self) -> Address {
        self.deployer
    }

    async fn chain_id(&self) -> Result<u64, ScriptError> {
        self.provider
            .get_chain_id()
            .await
            .map_err(|e| ScriptError::ClientInitialization(e.to_string()))
    }

    async fn get_code(&self, address: Address) -> Result<Bytes, ScriptError> {
        self.provider
            .get_code_at(address)
            .await
            .map_err(|e| ScriptError::ContractInteraction(e.to_string()))
    }

    async fn call(&self, tx: TransactionRequest) -> Result<Bytes, ScriptError> {
        self.provider
            .call(tx)
            .await
            .map_err(|e| ScriptError::ContractInteraction(e.to_string()))
    }

    async fn send_transaction(&self, tx: TransactionRequest) -> Result<TxHash, ScriptError> {
        let pending_tx = self
            .provider
            .send_transaction(tx)
            .await
            .map_err(|e| ScriptError::ContractInteraction(e.to_string()))?;

        Ok(*pending_tx.tx_hash())
    }

    async fn wait_for_receipt(&self, tx_hash: TxHash) -> Result<TxReceipt, ScriptError> {
        // Poll for the receipt rather than watching the pending transaction,
        // block subscriptions are not available over HTTP on every node
        for _ in 0..RECEIPT_POLL_ATTEMPTS {
            let maybe_receipt = self
                .provider
                .get_transaction_receipt(tx_hash)
                .await
                .map_err(|e| ScriptError::ContractInteraction(e.to_string()))?;

            if let Some(receipt) = maybe_receipt {
                return Ok(TxReceipt {
                    transaction_hash: receipt.transaction_hash(),
                    block_number: receipt.block_number(),
                    gas_used: receipt.gas_used(),
                    contract_address: receipt.contract_address(),
                    status: receipt.status(),
                });
            }

            tokio::time::sleep(Duration::from_millis(RECEIPT_POLL_INTERVAL_MS)).await;
        }

        Err(ScriptError::ContractInteraction(format!(
            "no receipt for tx {:#x} after {} attempts",
            tx_hash, RECEIPT_POLL_ATTEMPTS
        )))
    }
}
