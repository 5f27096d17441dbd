use alloy::dyn_abi::{DynSolType, Specifier};
use alloy::json_abi::{Function, JsonAbi, Param, StateMutability};
use alloy::primitives::Address;
use std::path::Path;
use std::str::FromStr;
use tracing::{debug, info};

use super::descriptor::{OperationDescriptor, OperationKind};
use crate::config::NetworkConfig;
use crate::error::{StarportError, StarportResult};

/// A deployed Starport contract on one chain: address, decoded ABI and the
/// endpoint it lives behind. Holding a handle implies no open connection.
#[derive(Debug, Clone)]
pub struct ContractHandle {
    chain_name: String,
    chain_id: u64,
    rpc_endpoint: String,
    address: Address,
    abi: JsonAbi,
}

/// One ABI function with its parameter types resolved for dynamic encoding.
#[derive(Debug, Clone)]
pub struct MethodDescriptor {
    pub function: Function,
    pub input_types: Vec<DynSolType>,
    pub output_types: Vec<DynSolType>,
    pub mutability: StateMutability,
}

impl MethodDescriptor {
    fn from_function(function: &Function) -> StarportResult<Self> {
        let input_types = resolve_params(&function.name, &function.inputs)?;
        let output_types = resolve_params(&function.name, &function.outputs)?;

        Ok(Self {
            function: function.clone(),
            input_types,
            output_types,
            mutability: function.state_mutability,
        })
    }

    pub fn name(&self) -> &str {
        &self.function.name
    }

    pub fn signature(&self) -> String {
        self.function.signature()
    }

    pub fn is_read_only(&self) -> bool {
        matches!(self.mutability, StateMutability::View | StateMutability::Pure)
    }
}

fn resolve_params(method: &str, params: &[Param]) -> StarportResult<Vec<DynSolType>> {
    params
        .iter()
        .map(|param| {
            param.resolve().map_err(|e| {
                StarportError::EncodingFailed(format!(
                    "unsupported parameter type {} in {}: {}",
                    param.ty, method, e
                ))
            })
        })
        .collect()
}

impl ContractHandle {
    /// Build a handle from the text of a contract artifact (`{"abi": [...]}`).
    pub fn from_artifact(network: &NetworkConfig, raw: &str) -> StarportResult<Self> {
        let abi_error = |reason: String| StarportError::AbiLoad {
            path: network.abi_path.clone(),
            reason,
        };

        let document: serde_json::Value =
            serde_json::from_str(raw).map_err(|e| abi_error(format!("malformed JSON: {}", e)))?;

        let abi_value = document
            .get("abi")
            .ok_or_else(|| abi_error("missing `abi` field".to_string()))?;
        if !abi_value.is_array() {
            return Err(abi_error("`abi` field is not an array".to_string()));
        }

        let abi: JsonAbi = serde_json::from_value(abi_value.clone())
            .map_err(|e| abi_error(format!("malformed ABI: {}", e)))?;

        let address = Address::from_str(network.contract_address.trim()).map_err(|e| {
            abi_error(format!(
                "invalid contract address {}: {}",
                network.contract_address, e
            ))
        })?;

        Ok(Self {
            chain_name: network.chain_name.clone(),
            chain_id: network.chain_id,
            rpc_endpoint: network.rpc_endpoint.clone(),
            address,
            abi,
        })
    }

    pub fn chain_name(&self) -> &str {
        &self.chain_name
    }

    pub fn chain_id(&self) -> u64 {
        self.chain_id
    }

    pub fn rpc_endpoint(&self) -> &str {
        &self.rpc_endpoint
    }

    pub fn address(&self) -> Address {
        self.address
    }

    pub fn abi(&self) -> &JsonAbi {
        &self.abi
    }

    /// Check `descriptor` against the ABI and return the matching method.
    ///
    /// The method must exist with exactly `descriptor.arity` inputs (overloads are
    /// told apart by arity) and a query must target a `view` or `pure` method.
    pub fn method(&self, descriptor: &OperationDescriptor) -> StarportResult<MethodDescriptor> {
        let overloads = self.abi.function(descriptor.method).ok_or_else(|| {
            StarportError::EncodingFailed(format!(
                "method {} (operation {}) not found in ABI of chain {}",
                descriptor.method, descriptor.operation, self.chain_name
            ))
        })?;

        let mut candidates = overloads
            .iter()
            .filter(|function| function.inputs.len() == descriptor.arity);
        let function = match (candidates.next(), candidates.next()) {
            (Some(function), None) => function,
            (None, _) => {
                let arities: Vec<usize> = overloads.iter().map(|f| f.inputs.len()).collect();
                return Err(StarportError::EncodingFailed(format!(
                    "method {} takes {:?} argument(s), operation {} passes {}",
                    descriptor.method, arities, descriptor.operation, descriptor.arity
                )));
            }
            (Some(_), Some(_)) => {
                return Err(StarportError::EncodingFailed(format!(
                    "method {} has several overloads with {} argument(s)",
                    descriptor.method, descriptor.arity
                )));
            }
        };

        let method = MethodDescriptor::from_function(function)?;

        if descriptor.kind == OperationKind::Query && !method.is_read_only() {
            return Err(StarportError::EncodingFailed(format!(
                "operation {} is a query but {} is {:?}",
                descriptor.operation,
                method.signature(),
                method.mutability
            )));
        }

        debug!("Bound {} to {}", descriptor.operation, method.signature());
        Ok(method)
    }

    /// Every descriptor in `operations` must resolve against this ABI.
    pub fn check_operations(
        &self,
        abi_path: &Path,
        operations: &[OperationDescriptor],
    ) -> StarportResult<()> {
        for descriptor in operations {
            self.method(descriptor).map_err(|e| StarportError::AbiLoad {
                path: abi_path.to_path_buf(),
                reason: e.to_string(),
            })?;
        }
        Ok(())
    }
}

/// Loads contract artifacts and binds them to configured networks.
pub struct ContractBinding;

impl ContractBinding {
    /// Read the artifact named by `network.abi_path` and bind it to the
    /// configured contract address. Every entry of `operations` must match a
    /// method of the ABI. Performs no network I/O.
    pub fn bind(
        network: &NetworkConfig,
        operations: &[OperationDescriptor],
    ) -> StarportResult<ContractHandle> {
        let raw = read_artifact(&network.abi_path)?;
        let handle = ContractHandle::from_artifact(network, &raw)?;
        handle.check_operations(&network.abi_path, operations)?;

        info!("📜 Contract bound on {}", network.chain_name);
        info!("  Address: {}", handle.address());
        info!(
            "  ABI: {} ({} functions, {} operations)",
            network.abi_path.display(),
            handle.abi().functions.len(),
            operations.len()
        );

        Ok(handle)
    }
}

fn read_artifact(path: &Path) -> StarportResult<String> {
    std::fs::read_to_string(path).map_err(|e| StarportError::AbiLoad {
        path: path.to_path_buf(),
        reason: e.to_string(),
    })
}
