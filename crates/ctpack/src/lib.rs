//! # ctpack
//!
//! The schema language of the ct RPC client and the primitives of its wire format.
//!
//! ## Format
//!
//! - **Integers**: fixed width, big-endian (`int32`/`uint32`: 4 bytes, `int64`/`uint64`: 8 bytes).
//! - **Strings**: `[Len: u32 BE][UTF-8 bytes: Len]`.
//! - **Structs**: fields concatenated in declaration order. No tags, no padding.
//! - **Calls**: `[XXH32(name, seed 0): u32 BE]` followed by the arguments in declaration order.
//!
//! There is no outer length envelope; framing belongs to the transport.

pub mod cursor;
pub mod encoder;
pub mod parser;
pub mod scanner;
pub mod schema;
pub mod types;

pub use types::DecodeError;
pub use types::EncodeError;

pub use cursor::Cursor;
pub use cursor::FromBytes;
pub use encoder::Encoder;
pub use encoder::discriminator;

pub use parser::parse_schema;
pub use scanner::Scanner;

pub use schema::Arg;
pub use schema::Builtin;
pub use schema::Field;
pub use schema::Function;
pub use schema::Schema;
pub use schema::SchemaError;
pub use schema::Struct;
pub use schema::Type;

#[cfg(test)]
mod tests;
