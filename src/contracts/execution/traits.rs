use alloy::primitives::{Address, Bytes, TxHash};
use alloy::rpc::types::TransactionRequest;
use async_trait::async_trait;
use std::time::Duration;

use crate::error::StarportError;

/// Failure reported by a [`ChainClient`] call.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ClientError {
    /// The endpoint could not be reached or answered garbage.
    #[error("transport error: {0}")]
    Transport(String),
    /// The node answered with a JSON-RPC error unrelated to EVM execution.
    #[error("rpc error {code}: {message}")]
    Rpc { code: i64, message: String },
    /// EVM execution reverted; `reason` is decoded when the node returned it.
    #[error("execution reverted: {}", .reason.as_deref().unwrap_or("no reason given"))]
    Revert { reason: Option<String> },
}

impl ClientError {
    /// Map a failure that happened before anything was broadcast.
    pub fn into_pre_broadcast(self) -> StarportError {
        match self {
            ClientError::Transport(message) => StarportError::NodeUnavailable(message),
            ClientError::Rpc { message, .. } => StarportError::Rejected { reason: Some(message) },
            ClientError::Revert { reason } => StarportError::Rejected { reason },
        }
    }

    /// Map a failure of a read-only call.
    pub fn into_call_error(self) -> StarportError {
        match self {
            ClientError::Transport(message) => StarportError::NodeUnavailable(message),
            ClientError::Rpc { message, .. } => StarportError::CallReverted {
                reason: Some(message),
            },
            ClientError::Revert { reason } => StarportError::CallReverted { reason },
        }
    }
}

/// The parts of a transaction receipt the executors care about.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReceiptSummary {
    pub transaction_hash: TxHash,
    pub block_number: Option<u64>,
    pub gas_used: u64,
    pub status: bool,
}

/// Knobs for transaction submission.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExecutionSettings {
    /// Fixed gas limit; `None` asks the node for an estimate.
    pub gas_limit: Option<u64>,
    /// Delay between `eth_getTransactionReceipt` polls.
    pub receipt_poll_interval: Duration,
}

impl Default for ExecutionSettings {
    fn default() -> Self {
        Self {
            gas_limit: None,
            receipt_poll_interval: Duration::from_secs(1),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GasParams {
    pub gas_limit: u64,
    pub gas_price: u128,
}

/// JSON-RPC surface of one chain node, as used by the executors.
///
/// Every method is a single request; implementations must not retry.
#[async_trait]
pub trait ChainClient: Send + Sync {
    /// `eth_chainId`
    async fn chain_id(&self) -> Result<u64, ClientError>;

    /// `eth_getTransactionCount` at the latest block.
    async fn transaction_count(&self, account: Address) -> Result<u64, ClientError>;

    /// `eth_gasPrice`
    async fn gas_price(&self) -> Result<u128, ClientError>;

    /// `eth_estimateGas`
    async fn estimate_gas(&self, request: &TransactionRequest) -> Result<u64, ClientError>;

    /// `eth_call` at `block`, or at the latest block when `None`.
    async fn call(
        &self,
        request: &TransactionRequest,
        block: Option<u64>,
    ) -> Result<Bytes, ClientError>;

    /// `eth_sendRawTransaction`
    async fn send_raw_transaction(&self, encoded: &[u8]) -> Result<TxHash, ClientError>;

    /// `eth_getTransactionReceipt`; `None` while the transaction is pending.
    async fn transaction_receipt(
        &self,
        hash: TxHash,
    ) -> Result<Option<ReceiptSummary>, ClientError>;

    /// Get a human-readable description of this client
    fn description(&self) -> String;
}
