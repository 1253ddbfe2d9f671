//! # Deserializer
//!
//! Reads a reply buffer as a function's return type. The layout mirrors the serializer exactly:
//! big-endian integers, length-prefixed strings, struct fields in declaration order.

use std::fmt;

use ctpack::Builtin;
use ctpack::Cursor;
use ctpack::Function;
use ctpack::Schema;
use ctpack::Type;

use crate::error::DeserError;

type Result<T> = std::result::Result<T, DeserError>;

/// A decoded reply value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Reply {
    Str(String),
    /// `int32` and `int64` values.
    Int(i64),
    /// `uint32` and `uint64` values.
    UInt(u64),
    /// Fields in declaration order.
    Struct {
        name: String,
        fields: Vec<(String, Reply)>,
    },
}

impl Reply {
    pub fn field(&self, name: &str) -> Option<&Reply> {
        match self {
            Reply::Struct { fields, .. } => fields.iter().find(|(n, _)| n == name).map(|(_, v)| v),
            Reply::Str(_) | Reply::Int(_) | Reply::UInt(_) => None,
        }
    }
}

/// Renders `Name{a=1, b="x"}`. Strings are quoted verbatim, without escaping.
impl fmt::Display for Reply {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Reply::Str(s) => write!(f, "\"{}\"", s),
            Reply::Int(v) => write!(f, "{}", v),
            Reply::UInt(v) => write!(f, "{}", v),
            Reply::Struct { name, fields } => {
                write!(f, "{}{{", name)?;
                for (i, (field, value)) in fields.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{}={}", field, value)?;
                }
                f.write_str("}")
            }
        }
    }
}

/// Decodes a whole reply to `func`. The buffer must hold exactly one value.
pub fn decode_reply(schema: &Schema, func: &Function, bytes: &[u8]) -> Result<Reply> {
    let mut cursor = Cursor::new(bytes);
    let reply = decode_value(schema, &mut cursor, &func.return_type)?;
    if !cursor.is_empty() {
        return Err(DeserError::TrailingBytes(cursor.remaining()));
    }
    tracing::debug!(function = %func.name, len = bytes.len(), "decoded reply");
    Ok(reply)
}

/// Decodes a whole reply and renders it for display.
pub fn deserialize_to_string(schema: &Schema, func: &Function, bytes: &[u8]) -> Result<String> {
    decode_reply(schema, func, bytes).map(|reply| reply.to_string())
}

/// Reads one value of type `ty` from the cursor.
pub fn decode_value(schema: &Schema, cursor: &mut Cursor<'_>, ty: &Type) -> Result<Reply> {
    let mut open = Vec::new();
    decode_nested(schema, cursor, ty, &mut open)
}

/// `open` holds the structs currently being decoded, outermost first.
fn decode_nested<'s>(
    schema: &'s Schema,
    cursor: &mut Cursor<'_>,
    ty: &Type,
    open: &mut Vec<&'s str>,
) -> Result<Reply> {
    match ty {
        Type::Builtin(Builtin::String) => Ok(Reply::Str(cursor.read_str()?.to_string())),
        Type::Builtin(Builtin::Int32) => Ok(Reply::Int(i64::from(cursor.read::<i32>()?))),
        Type::Builtin(Builtin::Int64) => Ok(Reply::Int(cursor.read::<i64>()?)),
        Type::Builtin(Builtin::Uint32) => Ok(Reply::UInt(u64::from(cursor.read::<u32>()?))),
        Type::Builtin(Builtin::Uint64) => Ok(Reply::UInt(cursor.read::<u64>()?)),
        Type::User(name) => {
            let st = schema
                .find_struct(name)
                .ok_or_else(|| DeserError::UnknownStruct(name.clone()))?;
            // every field is mandatory, so a struct nested in itself has no finite encoding
            if open.contains(&st.name.as_str()) {
                return Err(DeserError::RecursiveStruct(st.name.clone()));
            }
            open.push(&st.name);

            let mut fields = Vec::with_capacity(st.fields.len());
            for field in &st.fields {
                let value = decode_nested(schema, cursor, &field.ty, open)?;
                fields.push((field.name.clone(), value));
            }
            open.pop();
            Ok(Reply::Struct {
                name: st.name.clone(),
                fields,
            })
        }
    }
}
