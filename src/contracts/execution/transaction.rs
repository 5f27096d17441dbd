use alloy::eips::eip2718::Encodable2718;
use alloy::network::TransactionBuilder;
use alloy::primitives::TxHash;
use alloy::rpc::types::TransactionRequest;
use tracing::{error, info, warn};

use super::account::SignedAccount;
use super::traits::{ChainClient, ClientError, ExecutionSettings, GasParams, ReceiptSummary};
use crate::contracts::abi::{ContractHandle, OperationDescriptor};
use crate::contracts::encoding::{CallArg, DynAbiEncoder};
use crate::error::{StarportError, StarportResult};
use crate::models::{TransactionOutcome, TransactionStatus};

/// Signs and submits state-changing calls against one bound contract.
///
/// Every submission is a single broadcast: nothing is retried, and the outcome
/// is decided by the first receipt the node reports.
pub struct TransactionExecutor<'a> {
    client: &'a dyn ChainClient,
    settings: &'a ExecutionSettings,
}

impl<'a> TransactionExecutor<'a> {
    pub fn new(client: &'a dyn ChainClient, settings: &'a ExecutionSettings) -> Self {
        Self { client, settings }
    }

    pub async fn submit(
        &self,
        handle: &ContractHandle,
        descriptor: &OperationDescriptor,
        account: &SignedAccount,
        args: &[CallArg],
    ) -> StarportResult<TransactionOutcome> {
        let method = handle.method(descriptor)?;
        let call_data = DynAbiEncoder::encode_call(&method, args)?;

        info!("🚀 Submitting {} on {}", method.signature(), handle.chain_name());
        info!("  Contract: {}", handle.address());
        info!("  Sender: {}", account.address());

        let reported = self
            .client
            .chain_id()
            .await
            .map_err(ClientError::into_pre_broadcast)?;
        if reported != handle.chain_id() {
            error!("❌ Node at {} reports chain {}", handle.rpc_endpoint(), reported);
            return Err(StarportError::ChainMismatch {
                configured: handle.chain_id(),
                reported,
            });
        }

        let nonce = self
            .client
            .transaction_count(account.address())
            .await
            .map_err(ClientError::into_pre_broadcast)?;

        let request = TransactionRequest::default()
            .with_from(account.address())
            .with_to(handle.address())
            .with_input(call_data)
            .with_chain_id(handle.chain_id())
            .with_nonce(nonce);

        let gas = self.gas_params(&request).await?;
        info!("  Nonce: {}", nonce);
        info!("  Gas limit: {}", gas.gas_limit);
        info!("  Gas price: {}", gas.gas_price);

        let envelope = request
            .clone()
            .with_gas_limit(gas.gas_limit)
            .with_gas_price(gas.gas_price)
            .build(&account.wallet())
            .await
            .map_err(|e| StarportError::Signing(e.to_string()))?;

        let hash = self
            .client
            .send_raw_transaction(&envelope.encoded_2718())
            .await
            .map_err(ClientError::into_pre_broadcast)?;

        info!("⏳ Transaction {} sent, waiting for receipt...", hash);
        let receipt = self.wait_for_receipt(hash).await?;

        if receipt.status {
            info!("✅ Transaction confirmed:");
            info!("  Transaction hash: {}", receipt.transaction_hash);
            info!("  Block number: {:?}", receipt.block_number);
            info!("  Gas used: {}", receipt.gas_used);

            return Ok(TransactionOutcome {
                chain: handle.chain_name().to_string(),
                method: method.signature(),
                transaction_hash: receipt.transaction_hash,
                status: TransactionStatus::Confirmed,
                revert_reason: None,
                block_number: receipt.block_number,
                gas_used: receipt.gas_used,
            });
        }

        let revert_reason = self.replay_revert_reason(&request, receipt.block_number).await;
        error!("❌ Transaction reverted");
        error!("  Transaction hash: {}", receipt.transaction_hash);
        error!("  Reason: {}", revert_reason.as_deref().unwrap_or("unknown"));

        Ok(TransactionOutcome {
            chain: handle.chain_name().to_string(),
            method: method.signature(),
            transaction_hash: receipt.transaction_hash,
            status: TransactionStatus::Reverted,
            revert_reason,
            block_number: receipt.block_number,
            gas_used: receipt.gas_used,
        })
    }

    async fn gas_params(&self, request: &TransactionRequest) -> StarportResult<GasParams> {
        let gas_limit = match self.settings.gas_limit {
            Some(limit) => limit,
            None => self
                .client
                .estimate_gas(request)
                .await
                .map_err(ClientError::into_pre_broadcast)?,
        };

        let gas_price = self
            .client
            .gas_price()
            .await
            .map_err(ClientError::into_pre_broadcast)?;

        Ok(GasParams { gas_limit, gas_price })
    }

    async fn wait_for_receipt(&self, hash: TxHash) -> StarportResult<ReceiptSummary> {
        loop {
            match self.client.transaction_receipt(hash).await {
                Ok(Some(receipt)) => return Ok(receipt),
                Ok(None) => tokio::time::sleep(self.settings.receipt_poll_interval).await,
                Err(e) => {
                    return Err(StarportError::NodeUnavailable(format!(
                        "receipt of {} unavailable: {}",
                        hash, e
                    )))
                }
            }
        }
    }

    /// Re-run the call at the block it was mined in to recover the revert reason.
    async fn replay_revert_reason(
        &self,
        request: &TransactionRequest,
        block: Option<u64>,
    ) -> Option<String> {
        match self.client.call(request, block).await {
            Err(ClientError::Revert { reason }) => reason,
            Err(e) => {
                warn!("⚠️ Could not replay reverted call: {}", e);
                None
            }
            Ok(_) => None,
        }
    }
}
