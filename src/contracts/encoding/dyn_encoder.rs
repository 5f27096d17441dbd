use alloy::dyn_abi::{DynSolType, DynSolValue, JsonAbiExt};
use tracing::{debug, info};

use super::traits::CallArg;
use crate::contracts::abi::MethodDescriptor;
use crate::error::{StarportError, StarportResult};

/// ABI encoder driven by the runtime-loaded JSON ABI.
///
/// Types come from the bound [`MethodDescriptor`], so the same code path serves
/// every catalog method without compile-time contract bindings.
pub struct DynAbiEncoder;

impl DynAbiEncoder {
    /// Coerce `args` to the method's input types and encode selector + arguments.
    pub fn encode_call(method: &MethodDescriptor, args: &[CallArg]) -> StarportResult<Vec<u8>> {
        if args.len() != method.input_types.len() {
            return Err(StarportError::EncodingFailed(format!(
                "{} expects {} argument(s), got {}",
                method.signature(),
                method.input_types.len(),
                args.len()
            )));
        }

        let values = args
            .iter()
            .zip(&method.input_types)
            .enumerate()
            .map(|(position, (arg, ty))| {
                coerce(arg, ty).map_err(|e| match e {
                    StarportError::EncodingFailed(reason) => StarportError::EncodingFailed(format!(
                        "argument {} of {}: {}",
                        position,
                        method.name(),
                        reason
                    )),
                    other => other,
                })
            })
            .collect::<StarportResult<Vec<DynSolValue>>>()?;

        let call_data = method
            .function
            .abi_encode_input(&values)
            .map_err(|e| StarportError::EncodingFailed(format!("{}: {}", method.signature(), e)))?;

        info!("🔧 Encoded {} ({} bytes)", method.signature(), call_data.len());
        debug!("  Call data: 0x{}", hex::encode(&call_data));

        Ok(call_data)
    }

    /// Decode raw return data into the method's outputs, positionally.
    pub fn decode_output(
        method: &MethodDescriptor,
        data: &[u8],
    ) -> StarportResult<Vec<DynSolValue>> {
        if method.output_types.is_empty() {
            return Ok(Vec::new());
        }

        let decoded = DynSolType::Tuple(method.output_types.clone())
            .abi_decode_params(data)
            .map_err(|e| {
                StarportError::DecodingFailed(format!(
                    "{} returned {} byte(s): {}",
                    method.signature(),
                    data.len(),
                    e
                ))
            })?;

        Ok(match decoded {
            DynSolValue::Tuple(values) => values,
            other => vec![other],
        })
    }

    /// Decode call data produced by [`DynAbiEncoder::encode_call`] back into values.
    #[cfg(test)]
    pub fn decode_input(
        method: &MethodDescriptor,
        call_data: &[u8],
    ) -> StarportResult<Vec<DynSolValue>> {
        if call_data.len() < 4 || call_data[..4] != method.function.selector()[..] {
            return Err(StarportError::DecodingFailed(format!(
                "call data does not start with the selector of {}",
                method.signature()
            )));
        }

        match DynSolType::Tuple(method.input_types.clone()).abi_decode_params(&call_data[4..]) {
            Ok(DynSolValue::Tuple(values)) => Ok(values),
            Ok(other) => Ok(vec![other]),
            Err(e) => Err(StarportError::DecodingFailed(e.to_string())),
        }
    }
}

fn coerce(arg: &CallArg, ty: &DynSolType) -> StarportResult<DynSolValue> {
    match (arg, ty) {
        (CallArg::Text(value), DynSolType::String) => Ok(DynSolValue::String(value.clone())),
        (CallArg::Text(value), ty) => ty.coerce_str(value.trim()).map_err(|e| {
            StarportError::EncodingFailed(format!("cannot read {:?} as {}: {}", value, ty, e))
        }),
        (CallArg::Tuple(items), DynSolType::Tuple(types)) => {
            if items.len() != types.len() {
                return Err(StarportError::EncodingFailed(format!(
                    "tuple {} expects {} field(s), got {}",
                    ty,
                    types.len(),
                    items.len()
                )));
            }
            let values = items
                .iter()
                .zip(types)
                .map(|(item, ty)| coerce(item, ty))
                .collect::<StarportResult<Vec<_>>>()?;
            Ok(DynSolValue::Tuple(values))
        }
        (CallArg::List(items), DynSolType::Array(inner)) => {
            let values = items
                .iter()
                .map(|item| coerce(item, inner))
                .collect::<StarportResult<Vec<_>>>()?;
            Ok(DynSolValue::Array(values))
        }
        (CallArg::List(items), DynSolType::FixedArray(inner, size)) => {
            if items.len() != *size {
                return Err(StarportError::EncodingFailed(format!(
                    "{} expects {} element(s), got {}",
                    ty,
                    size,
                    items.len()
                )));
            }
            let values = items
                .iter()
                .map(|item| coerce(item, inner))
                .collect::<StarportResult<Vec<_>>>()?;
            Ok(DynSolValue::FixedArray(values))
        }
        (arg, ty) => Err(StarportError::EncodingFailed(format!(
            "{} cannot be used as {}",
            arg.preview(),
            ty
        ))),
    }
}
