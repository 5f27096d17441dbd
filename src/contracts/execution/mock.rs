use alloy::primitives::{keccak256, Address, Bytes, TxHash};
use alloy::rpc::types::TransactionRequest;
use async_trait::async_trait;
use std::sync::Mutex;

use super::traits::{ChainClient, ClientError, ReceiptSummary};

/// Scripted in-memory node used by executor and service tests.
pub struct MockChainClient {
    pub chain_id: u64,
    pub call_result: Result<Bytes, ClientError>,
    pub estimate_result: Result<u64, ClientError>,
    pub nonce_error: Option<ClientError>,
    pub send_error: Option<ClientError>,
    pub receipt_status: bool,
    pub receipt_error: Option<ClientError>,
    /// Number of `None` answers before the receipt shows up.
    pub pending_polls: usize,
    /// Reason returned when the call is replayed at the receipt block.
    pub replay_revert: Option<String>,
    state: Mutex<MockState>,
}

#[derive(Default)]
struct MockState {
    rpcs: Vec<&'static str>,
    broadcasts: Vec<Vec<u8>>,
    calls: Vec<(TransactionRequest, Option<u64>)>,
    nonce: u64,
    polls: usize,
}

impl MockChainClient {
    pub fn new(chain_id: u64) -> Self {
        Self {
            chain_id,
            call_result: Ok(Bytes::new()),
            estimate_result: Ok(90_000),
            nonce_error: None,
            send_error: None,
            receipt_status: true,
            receipt_error: None,
            pending_polls: 0,
            replay_revert: None,
            state: Mutex::new(MockState::default()),
        }
    }

    pub fn rpcs(&self) -> Vec<&'static str> {
        self.state.lock().unwrap().rpcs.clone()
    }

    pub fn broadcasts(&self) -> Vec<Vec<u8>> {
        self.state.lock().unwrap().broadcasts.clone()
    }

    pub fn calls(&self) -> Vec<(TransactionRequest, Option<u64>)> {
        self.state.lock().unwrap().calls.clone()
    }

    fn record(&self, rpc: &'static str) {
        self.state.lock().unwrap().rpcs.push(rpc);
    }
}

#[async_trait]
impl ChainClient for MockChainClient {
    async fn chain_id(&self) -> Result<u64, ClientError> {
        self.record("eth_chainId");
        Ok(self.chain_id)
    }

    async fn transaction_count(&self, _account: Address) -> Result<u64, ClientError> {
        self.record("eth_getTransactionCount");
        if let Some(error) = &self.nonce_error {
            return Err(error.clone());
        }
        Ok(self.state.lock().unwrap().nonce)
    }

    async fn gas_price(&self) -> Result<u128, ClientError> {
        self.record("eth_gasPrice");
        Ok(1_000_000_000)
    }

    async fn estimate_gas(&self, _request: &TransactionRequest) -> Result<u64, ClientError> {
        self.record("eth_estimateGas");
        self.estimate_result.clone()
    }

    async fn call(
        &self,
        request: &TransactionRequest,
        block: Option<u64>,
    ) -> Result<Bytes, ClientError> {
        self.record("eth_call");
        self.state.lock().unwrap().calls.push((request.clone(), block));

        if block.is_some() {
            if let Some(reason) = &self.replay_revert {
                return Err(ClientError::Revert {
                    reason: Some(reason.clone()),
                });
            }
        }
        self.call_result.clone()
    }

    async fn send_raw_transaction(&self, encoded: &[u8]) -> Result<TxHash, ClientError> {
        self.record("eth_sendRawTransaction");
        if let Some(error) = &self.send_error {
            return Err(error.clone());
        }

        let mut state = self.state.lock().unwrap();
        state.broadcasts.push(encoded.to_vec());
        state.nonce += 1;
        Ok(keccak256(encoded))
    }

    async fn transaction_receipt(
        &self,
        hash: TxHash,
    ) -> Result<Option<ReceiptSummary>, ClientError> {
        self.record("eth_getTransactionReceipt");
        if let Some(error) = &self.receipt_error {
            return Err(error.clone());
        }

        let mut state = self.state.lock().unwrap();
        if state.polls < self.pending_polls {
            state.polls += 1;
            return Ok(None);
        }

        Ok(Some(ReceiptSummary {
            transaction_hash: hash,
            block_number: Some(7),
            gas_used: 52_000,
            status: self.receipt_status,
        }))
    }

    fn description(&self) -> String {
        format!("MockChainClient: chain {}", self.chain_id)
    }
}
