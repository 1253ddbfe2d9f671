//! # Session
//!
//! Binds one shared schema to one transport and runs the per-line pipeline:
//! call text → [`Call`] → request bytes → transport → reply bytes → [`Reply`].

use std::sync::Arc;

use ctpack::Function;
use ctpack::Schema;

use crate::complete::autocomplete;
use crate::decode::Reply;
use crate::decode::decode_reply;
use crate::encode::encode_call_to;
use crate::error::Result;
use crate::error::SerializeError;
use crate::parse::parse_call;
use crate::transport::Transport;
use crate::value::Call;

/// A call that has been parsed and encoded but not yet sent.
#[derive(Debug, Clone)]
pub struct Prepared<'s> {
    pub call: Call,
    pub function: &'s Function,
    pub request: Vec<u8>,
}

pub struct Session<T> {
    schema: Arc<Schema>,
    transport: T,
}

impl<T: Transport> Session<T> {
    pub fn new(schema: Arc<Schema>, transport: T) -> Self {
        Self { schema, transport }
    }

    pub fn schema(&self) -> &Schema {
        &self.schema
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// Parses and encodes one line without touching the transport.
    pub fn prepare(&self, line: &str) -> Result<Prepared<'_>> {
        let call = parse_call(line)?;
        let function = self
            .schema
            .find_function(&call.function)
            .ok_or_else(|| SerializeError::UnknownFunction(call.function.clone()))?;
        let request = encode_call_to(&self.schema, function, &call)?;
        Ok(Prepared {
            call,
            function,
            request,
        })
    }

    /// Runs one full round trip.
    pub async fn execute(&self, line: &str) -> Result<Reply> {
        let prepared = self.prepare(line)?;
        let reply = self.transport.call(&prepared.request).await?;
        Ok(decode_reply(&self.schema, prepared.function, &reply)?)
    }

    /// Completes partially typed call text. Performs no I/O.
    pub fn complete(&self, text: &str) -> String {
        autocomplete(text, &self.schema)
    }
}
