//! # ctrpc
//!
//! The client side of the ct RPC protocol: call syntax, schema-driven encoding of requests,
//! decoding of replies, and schema-aware completion of partially typed calls.
//!
//! Every operation borrows a shared, immutable [`ctpack::Schema`]. Nothing here blocks except
//! [`Transport::call`].

mod complete;
mod decode;
mod encode;
mod error;
mod parse;
mod session;
mod transport;
mod value;


pub use crate::error::DeserError;
pub use crate::error::Error;
pub use crate::error::ParseError;
pub use crate::error::Result;
pub use crate::error::SerializeError;

pub use crate::value::Call;
pub use crate::value::NamedArg;
pub use crate::value::StructValue;
pub use crate::value::Value;

pub use crate::parse::parse_call;

pub use crate::encode::encode_call;
pub use crate::encode::encode_value;

pub use crate::decode::Reply;
pub use crate::decode::decode_reply;
pub use crate::decode::decode_value;
pub use crate::decode::deserialize_to_string;

pub use crate::complete::autocomplete;

pub use crate::session::Prepared;
pub use crate::session::Session;

pub use crate::transport::FnTransport;
pub use crate::transport::Transport;
pub use crate::transport::TransportError;
