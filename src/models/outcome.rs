use alloy::dyn_abi::DynSolValue;
use alloy::json_abi::Param;
use alloy::primitives::TxHash;
use serde::Serialize;
use serde_json::Value;

#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum TransactionStatus {
    Confirmed,
    Reverted,
}

/// Result of a broadcast transaction after its first receipt.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct TransactionOutcome {
    pub chain: String,
    pub method: String,
    #[serde(rename = "transactionHash")]
    pub transaction_hash: TxHash,
    pub status: TransactionStatus,
    #[serde(rename = "revertReason", skip_serializing_if = "Option::is_none")]
    pub revert_reason: Option<String>,
    #[serde(rename = "blockNumber")]
    pub block_number: Option<u64>,
    #[serde(rename = "gasUsed")]
    pub gas_used: u64,
}

impl TransactionOutcome {
    pub fn is_confirmed(&self) -> bool {
        self.status == TransactionStatus::Confirmed
    }
}

/// Decoded return values of a read-only call, with the ABI outputs they map to.
#[derive(Debug, Clone, PartialEq)]
pub struct QueryResult {
    pub chain: String,
    pub method: String,
    pub outputs: Vec<Param>,
    pub values: Vec<DynSolValue>,
}

impl QueryResult {
    /// Render for printing: a single unnamed output becomes a bare value, named
    /// outputs become an object, anything else a positional array.
    pub fn to_json(&self) -> Value {
        match (self.values.as_slice(), self.outputs.first()) {
            ([value], Some(param)) if param.name.is_empty() => render(value, Some(param)),
            ([value], None) => render(value, None),
            (values, _) => named_or_positional(values, &self.outputs),
        }
    }
}

fn render(value: &DynSolValue, param: Option<&Param>) -> Value {
    match value {
        DynSolValue::Tuple(items) => {
            let components = param.map(|p| p.components.as_slice()).unwrap_or(&[]);
            named_or_positional(items, components)
        }
        DynSolValue::Array(items) | DynSolValue::FixedArray(items) => {
            Value::Array(items.iter().map(|item| render(item, param)).collect())
        }
        other => scalar(other),
    }
}

fn named_or_positional(values: &[DynSolValue], params: &[Param]) -> Value {
    let named = params.len() == values.len() && params.iter().all(|p| !p.name.is_empty());

    if named {
        Value::Object(
            params
                .iter()
                .zip(values)
                .map(|(param, value)| (param.name.clone(), render(value, Some(param))))
                .collect(),
        )
    } else {
        Value::Array(
            values
                .iter()
                .enumerate()
                .map(|(i, value)| render(value, params.get(i)))
                .collect(),
        )
    }
}

fn scalar(value: &DynSolValue) -> Value {
    match value {
        DynSolValue::Bool(flag) => Value::Bool(*flag),
        DynSolValue::Int(number, _) => Value::String(number.to_string()),
        DynSolValue::Uint(number, _) => Value::String(number.to_string()),
        DynSolValue::FixedBytes(word, size) => {
            Value::String(format!("0x{}", hex::encode(&word[..*size])))
        }
        DynSolValue::Address(address) => Value::String(address.to_checksum(None)),
        DynSolValue::Bytes(bytes) => Value::String(format!("0x{}", hex::encode(bytes))),
        DynSolValue::String(text) => Value::String(text.clone()),
        other => Value::String(format!("{:?}", other)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloy::primitives::{Address, U256};
    use serde_json::json;

    fn param(name: &str, ty: &str) -> Param {
        serde_json::from_value(json!({ "name": name, "type": ty })).unwrap()
    }

    #[test]
    fn test_single_unnamed_output_is_bare() {
        let result = QueryResult {
            chain: "local".into(),
            method: "diamondBalanceOf(address)".into(),
            outputs: vec![param("", "uint256")],
            values: vec![DynSolValue::Uint(U256::from(250u64), 256)],
        };

        assert_eq!(result.to_json(), json!("250"));
    }

    #[test]
    fn test_named_outputs_become_object() {
        let result = QueryResult {
            chain: "local".into(),
            method: "_dockedShips(uint256)".into(),
            outputs: vec![
                param("shipID", "uint256"),
                param("owner", "address"),
                param("homeChain", "string"),
            ],
            values: vec![
                DynSolValue::Uint(U256::ZERO, 256),
                DynSolValue::Address(Address::ZERO),
                DynSolValue::String(String::new()),
            ],
        };

        assert_eq!(
            result.to_json(),
            json!({
                "shipID": "0",
                "owner": "0x0000000000000000000000000000000000000000",
                "homeChain": ""
            })
        );
    }

    #[test]
    fn test_tuple_array_uses_component_names() {
        let output: Param = serde_json::from_value(json!({
            "name": "",
            "type": "tuple[]",
            "components": [
                { "name": "galaxy", "type": "string" },
                { "name": "starportId", "type": "string" }
            ]
        }))
        .unwrap();

        let result = QueryResult {
            chain: "local".into(),
            method: "starports()".into(),
            outputs: vec![output],
            values: vec![DynSolValue::Array(vec![DynSolValue::Tuple(vec![
                DynSolValue::String("andromeda".into()),
                DynSolValue::String("port-7".into()),
            ])])],
        };

        assert_eq!(result.to_json(), json!([{ "galaxy": "andromeda", "starportId": "port-7" }]));
    }

    #[test]
    fn test_outcome_serializes_status_lowercase() {
        let outcome = TransactionOutcome {
            chain: "local".into(),
            method: "settleReward(uint256)".into(),
            transaction_hash: TxHash::ZERO,
            status: TransactionStatus::Reverted,
            revert_reason: Some("Nothing to settle".into()),
            block_number: Some(12),
            gas_used: 30_000,
        };

        let rendered = serde_json::to_value(&outcome).unwrap();
        assert_eq!(rendered["status"], json!("reverted"));
        assert_eq!(rendered["revertReason"], json!("Nothing to settle"));
        assert!(!outcome.is_confirmed());
    }
}
