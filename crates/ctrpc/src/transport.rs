//! # Transport Abstraction
//!
//! The seam between the codec and the network.
//!
//! - **Byte-Oriented**: a transport moves opaque request and reply buffers. It knows nothing about
//!   schemas or calls, and the codec knows nothing about framing.
//! - **Request-Response**: one request buffer yields one reply buffer.

use std::fmt;

/// Why a request buffer did not come back as a reply buffer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TransportError {
    /// The server could not be reached, or hung up before the reply was complete.
    ConnectionLost(String),
    /// No complete reply arrived within the configured deadline.
    Timeout,
    /// A request or reply of this many bytes cannot be carried in one frame.
    FrameTooLarge(usize),
    /// Any other socket failure.
    Io(String),
}

impl fmt::Display for TransportError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TransportError::ConnectionLost(why) => write!(f, "connection lost ({})", why),
            TransportError::Timeout => write!(f, "no reply before the deadline"),
            TransportError::FrameTooLarge(len) => write!(f, "frame of {} bytes is too large", len),
            TransportError::Io(why) => write!(f, "socket failure: {}", why),
        }
    }
}

impl std::error::Error for TransportError {}

type Result<T> = std::result::Result<T, TransportError>;

/// A mechanism to send a request buffer and receive the reply.
///
/// Object-safe, so sessions can hold a `Box<dyn Transport>`.
#[async_trait::async_trait]
pub trait Transport: Send + Sync {
    /// Sends a request and waits for its reply.
    ///
    /// # Invariants
    /// - Returns the raw reply bytes, with any framing removed.
    /// - Does not interpret the payload.
    async fn call(&self, payload: &[u8]) -> Result<Vec<u8>>;
}

#[async_trait::async_trait]
impl<T: Transport + ?Sized> Transport for Box<T> {
    async fn call(&self, payload: &[u8]) -> Result<Vec<u8>> {
        (**self).call(payload).await
    }
}

#[async_trait::async_trait]
impl<T: Transport + ?Sized> Transport for std::sync::Arc<T> {
    async fn call(&self, payload: &[u8]) -> Result<Vec<u8>> {
        (**self).call(payload).await
    }
}

/// A transport backed by a synchronous closure. Useful for loopback servers and tests.
pub struct FnTransport<F>
where
    F: Fn(&[u8]) -> Result<Vec<u8>> + Send + Sync,
{
    handler: F,
}

impl<F> FnTransport<F>
where
    F: Fn(&[u8]) -> Result<Vec<u8>> + Send + Sync,
{
    pub fn new(handler: F) -> Self {
        Self { handler }
    }
}

#[async_trait::async_trait]
impl<F> Transport for FnTransport<F>
where
    F: Fn(&[u8]) -> Result<Vec<u8>> + Send + Sync + 'static,
{
    async fn call(&self, payload: &[u8]) -> Result<Vec<u8>> {
        (self.handler)(payload)
    }
}
