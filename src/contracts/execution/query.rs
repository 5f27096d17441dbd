use alloy::network::TransactionBuilder;
use alloy::rpc::types::TransactionRequest;
use tracing::{debug, info};

use super::traits::{ChainClient, ClientError};
use crate::contracts::abi::{ContractHandle, OperationDescriptor};
use crate::contracts::encoding::{CallArg, DynAbiEncoder};
use crate::error::{StarportError, StarportResult};
use crate::models::QueryResult;

/// Read-only calls at the latest block. Needs no signer and changes nothing.
pub struct QueryExecutor<'a> {
    client: &'a dyn ChainClient,
}

impl<'a> QueryExecutor<'a> {
    pub fn new(client: &'a dyn ChainClient) -> Self {
        Self { client }
    }

    pub async fn call(
        &self,
        handle: &ContractHandle,
        descriptor: &OperationDescriptor,
        args: &[CallArg],
    ) -> StarportResult<QueryResult> {
        let method = handle.method(descriptor)?;
        if !method.is_read_only() {
            return Err(StarportError::EncodingFailed(format!(
                "{} is not a view method",
                method.signature()
            )));
        }

        let call_data = DynAbiEncoder::encode_call(&method, args)?;
        let request = TransactionRequest::default()
            .with_to(handle.address())
            .with_input(call_data);

        info!("🔍 Calling {} on {}", method.signature(), handle.chain_name());

        let raw = self
            .client
            .call(&request, None)
            .await
            .map_err(ClientError::into_call_error)?;
        debug!("  Returned {} bytes", raw.len());

        let values = DynAbiEncoder::decode_output(&method, &raw)?;

        Ok(QueryResult {
            chain: handle.chain_name().to_string(),
            method: method.signature(),
            outputs: method.function.outputs.clone(),
            values,
        })
    }
}
