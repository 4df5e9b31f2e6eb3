//! Seed encoding: binding set -> fuzzer byte layout.
//!
//! The consuming fuzzer's harness decodes raw input as fixed-width
//! big-endian integers in signature order, concatenated with no padding or
//! separators. Encoding here must match that convention exactly.

use seedbridge_types::{BindingSet, BindingValue, Param, ParamType, Provenance, Seed, Target};
use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum EncodeError {
    /// A required signature parameter has no binding. Deterministic for a
    /// given raw output; never worth retrying.
    #[error("no binding for required parameter `{param}`")]
    IncompleteBinding { param: String },

    /// A bound value cannot be represented within the parameter's declared
    /// width or type.
    #[error("value for `{param}` does not fit in {bits} bits")]
    TypeMismatch { param: String, bits: u32 },
}

/// Encode a complete binding set into an immutable, `Formal`-tagged seed.
///
/// Bindings are looked up by name and serialized in the target's parameter
/// order, regardless of extraction order.
pub fn encode(target: &Target, bindings: &BindingSet) -> Result<Seed, EncodeError> {
    let mut bytes = Vec::with_capacity(target.encoded_width());

    for param in &target.params {
        let value = bindings
            .get(&param.name)
            .ok_or_else(|| EncodeError::IncompleteBinding {
                param: param.name.clone(),
            })?;
        encode_value(param, value, &mut bytes)?;
    }

    Ok(Seed::new(bytes, Provenance::Formal))
}

fn encode_value(param: &Param, value: &BindingValue, out: &mut Vec<u8>) -> Result<(), EncodeError> {
    let width = param.ty.byte_width();
    let mismatch = || EncodeError::TypeMismatch {
        param: param.name.clone(),
        bits: param.ty.bit_width(),
    };

    match value {
        BindingValue::Uint(v) => {
            let max_bits = match param.ty {
                // A boolean is one byte on the wire but only 0 or 1 is valid.
                ParamType::Bool => 1,
                _ => u64::from(param.ty.bit_width()),
            };
            if v.bits() > max_bits {
                return Err(mismatch());
            }
            let be = v.to_bytes_be();
            // BigUint emits minimal bytes; left-pad to the declared width.
            // Zero encodes as a single 0x00, which pads out the same way.
            let pad = width.saturating_sub(be.len());
            out.resize(out.len() + pad, 0);
            // `bits() <= width * 8` guarantees `be` fits, except the
            // zero case where `be` is [0] and width >= 1.
            out.extend_from_slice(&be[be.len().saturating_sub(width)..]);
        }
        BindingValue::Bytes(b) => {
            if b.len() != width {
                return Err(mismatch());
            }
            out.extend_from_slice(b);
        }
    }

    Ok(())
}
