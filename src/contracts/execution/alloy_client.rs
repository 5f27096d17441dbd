use crate::contracts::execution::traits::{ChainClient, ClientError, ReceiptSummary};
use crate::error::{StarportError, StarportResult};
use alloy::{
    eips::BlockId,
    network::{Ethereum, ReceiptResponse},
    primitives::{Address, Bytes, TxHash},
    providers::{Provider, RootProvider},
    rpc::types::TransactionRequest,
    sol_types::decode_revert_reason,
    transports::{http::reqwest::Url, RpcError, TransportErrorKind},
};
use async_trait::async_trait;
use tracing::{debug, error, info};

/// [`ChainClient`] backed by an alloy HTTP provider.
///
/// The provider carries no fillers and no wallet: nonce, gas and signing are
/// handled explicitly by the transaction executor.
pub struct AlloyClient {
    endpoint: String,
    provider: RootProvider<Ethereum>,
}

impl AlloyClient {
    /// Create a client for `rpc_endpoint`. No request is sent until first use.
    pub fn connect(rpc_endpoint: &str) -> StarportResult<Self> {
        let url: Url = rpc_endpoint.parse().map_err(|e| {
            StarportError::InvalidConfig(format!("invalid rpc endpoint {}: {}", rpc_endpoint, e))
        })?;

        info!("🔧 AlloyClient ready for {}", rpc_endpoint);

        Ok(Self {
            endpoint: rpc_endpoint.to_string(),
            provider: RootProvider::new_http(url),
        })
    }
}

/// Sort an alloy RPC failure into transport trouble, a plain JSON-RPC error,
/// or an EVM revert (decoding the reason when the node returned revert data).
fn classify(error: RpcError<TransportErrorKind>) -> ClientError {
    let Some(payload) = error.as_error_resp() else {
        return ClientError::Transport(error.to_string());
    };

    if let Some(data) = payload.as_revert_data() {
        return ClientError::Revert {
            reason: decode_revert_reason(&data),
        };
    }

    let message = payload.message.to_string();
    if message.contains("revert") {
        let reason = message
            .split_once("reverted:")
            .map(|(_, reason)| reason.trim().to_string())
            .filter(|reason| !reason.is_empty());
        return ClientError::Revert { reason };
    }

    ClientError::Rpc {
        code: payload.code,
        message,
    }
}

#[async_trait]
impl ChainClient for AlloyClient {
    async fn chain_id(&self) -> Result<u64, ClientError> {
        self.provider.get_chain_id().await.map_err(classify)
    }

    async fn transaction_count(&self, account: Address) -> Result<u64, ClientError> {
        self.provider
            .get_transaction_count(account)
            .await
            .map_err(classify)
    }

    async fn gas_price(&self) -> Result<u128, ClientError> {
        self.provider.get_gas_price().await.map_err(classify)
    }

    async fn estimate_gas(&self, request: &TransactionRequest) -> Result<u64, ClientError> {
        self.provider
            .estimate_gas(request.clone())
            .await
            .map_err(classify)
    }

    async fn call(
        &self,
        request: &TransactionRequest,
        block: Option<u64>,
    ) -> Result<Bytes, ClientError> {
        let call = self.provider.call(request.clone());
        let result = match block {
            Some(number) => call.block(BlockId::number(number)).await,
            None => call.await,
        };

        result.map_err(|e| {
            let classified = classify(e);
            debug!("eth_call on {} failed: {}", self.endpoint, classified);
            classified
        })
    }

    async fn send_raw_transaction(&self, encoded: &[u8]) -> Result<TxHash, ClientError> {
        let pending = self
            .provider
            .send_raw_transaction(encoded)
            .await
            .map_err(|e| {
                let classified = classify(e);
                error!("❌ eth_sendRawTransaction failed on {}: {}", self.endpoint, classified);
                classified
            })?;

        Ok(*pending.tx_hash())
    }

    async fn transaction_receipt(
        &self,
        hash: TxHash,
    ) -> Result<Option<ReceiptSummary>, ClientError> {
        let receipt = self
            .provider
            .get_transaction_receipt(hash)
            .await
            .map_err(classify)?;

        Ok(receipt.map(|receipt| ReceiptSummary {
            transaction_hash: receipt.transaction_hash(),
            block_number: receipt.block_number(),
            gas_used: receipt.gas_used(),
            status: receipt.status(),
        }))
    }

    fn description(&self) -> String {
        format!("AlloyClient: HTTP JSON-RPC at {}", self.endpoint)
    }
}
