//! # Serializer
//!
//! Encodes a [`Call`] against a [`Schema`] into the flat big-endian wire format.
//!
//! ## Invariants
//! - Arguments and struct fields are written in schema declaration order, never in the order
//!   the caller wrote them.
//! - Every declared argument and field must be supplied; nothing is defaulted.
//! - Integers are range-checked against the declared width before any byte is written for them.

use std::collections::HashMap;

use ctpack::Builtin;
use ctpack::Encoder;
use ctpack::Function;
use ctpack::Schema;
use ctpack::Struct;
use ctpack::Type;
use ctpack::discriminator;

use crate::error::SerializeError;
use crate::value::Call;
use crate::value::StructValue;
use crate::value::Value;

type Result<T> = std::result::Result<T, SerializeError>;

/// Encodes a full request: the function discriminator followed by its arguments.
pub fn encode_call(schema: &Schema, call: &Call) -> Result<Vec<u8>> {
    let func = schema
        .find_function(&call.function)
        .ok_or_else(|| SerializeError::UnknownFunction(call.function.clone()))?;
    encode_call_to(schema, func, call)
}

/// Encodes a request for an already resolved `func`. `call.function` is not consulted.
pub(crate) fn encode_call_to(schema: &Schema, func: &Function, call: &Call) -> Result<Vec<u8>> {
    let mut provided: HashMap<&str, &Value> = HashMap::with_capacity(call.args.len());
    for arg in &call.args {
        if func.arg(&arg.name).is_none() {
            return Err(SerializeError::UnknownArgument {
                function: func.name.clone(),
                arg: arg.name.clone(),
            });
        }
        provided.entry(arg.name.as_str()).or_insert(&arg.value);
    }

    let mut enc = Encoder::new();
    let hash = discriminator(&func.name);
    enc.u32(hash);

    for decl in &func.args {
        let value = provided
            .get(decl.name.as_str())
            .ok_or_else(|| SerializeError::MissingArgument {
                function: func.name.clone(),
                arg: decl.name.clone(),
            })?;
        encode_value(schema, &mut enc, &decl.ty, value)?;
    }

    tracing::debug!(
        function = %func.name,
        discriminator = hash,
        len = enc.len(),
        "encoded call"
    );
    Ok(enc.into_bytes())
}

/// Encodes one value as the declared type.
pub fn encode_value(schema: &Schema, enc: &mut Encoder, ty: &Type, value: &Value) -> Result<()> {
    match ty {
        Type::Builtin(b) => encode_builtin(enc, *b, value),
        Type::User(name) => {
            let st = schema
                .find_struct(name)
                .ok_or_else(|| SerializeError::UnknownStruct(name.clone()))?;
            match value {
                Value::Struct(sv) => encode_struct(schema, enc, st, sv),
                Value::Str(_) | Value::Int(_) | Value::UInt(_) => Err(SerializeError::TypeMismatch {
                    expected: format!("struct {}", st.name),
                    found: value.kind(),
                }),
            }
        }
    }
}

fn encode_struct(schema: &Schema, enc: &mut Encoder, st: &Struct, sv: &StructValue) -> Result<()> {
    if let Some(hint) = sv.name.as_deref() {
        if !hint.is_empty() && hint != st.name {
            return Err(SerializeError::StructNameMismatch {
                expected: st.name.clone(),
                found: hint.to_string(),
            });
        }
    }

    for field in &st.fields {
        let value = sv.get(&field.name).ok_or_else(|| SerializeError::MissingField {
            owner: st.name.clone(),
            field: field.name.clone(),
        })?;
        encode_value(schema, enc, &field.ty, value)?;
    }
    Ok(())
}

fn encode_builtin(enc: &mut Encoder, b: Builtin, value: &Value) -> Result<()> {
    match b {
        Builtin::String => match value {
            Value::Str(s) => {
                enc.str(s)?;
            }
            Value::Int(_) | Value::UInt(_) | Value::Struct(_) => return Err(mismatch(b, value)),
        },
        Builtin::Int32 => {
            let v = signed(b, value)?;
            let v = i32::try_from(v).map_err(|_| SerializeError::OutOfRange {
                ty: b.keyword(),
                value: v.to_string(),
            })?;
            enc.i32(v);
        }
        Builtin::Int64 => {
            let v = signed(b, value)?;
            enc.i64(v);
        }
        Builtin::Uint32 => {
            let v = unsigned(b, value)?;
            let v = u32::try_from(v).map_err(|_| SerializeError::OutOfRange {
                ty: b.keyword(),
                value: v.to_string(),
            })?;
            enc.u32(v);
        }
        Builtin::Uint64 => {
            let v = unsigned(b, value)?;
            enc.u64(v);
        }
    }
    Ok(())
}

/// Accepts any signed value or an unsigned value that fits in `i64`.
fn signed(b: Builtin, value: &Value) -> Result<i64> {
    match value {
        Value::Int(v) => Ok(*v),
        Value::UInt(v) => i64::try_from(*v).map_err(|_| SerializeError::OutOfRange {
            ty: b.keyword(),
            value: v.to_string(),
        }),
        Value::Str(_) | Value::Struct(_) => Err(mismatch(b, value)),
    }
}

/// Accepts a non-negative signed value or any unsigned value.
fn unsigned(b: Builtin, value: &Value) -> Result<u64> {
    match value {
        Value::Int(v) if *v < 0 => Err(SerializeError::NegativeUnsigned {
            ty: b.keyword(),
            value: *v,
        }),
        Value::Int(v) => Ok(v.unsigned_abs()),
        Value::UInt(v) => Ok(*v),
        Value::Str(_) | Value::Struct(_) => Err(mismatch(b, value)),
    }
}

fn mismatch(b: Builtin, value: &Value) -> SerializeError {
    SerializeError::TypeMismatch {
        expected: b.keyword().to_string(),
        found: value.kind(),
    }
}
