//! # TCP Transport
//!
//! Carries request and reply buffers over one TCP connection, each framed as a 4-byte big-endian
//! length followed by that many bytes.
//!
//! ## Invariants
//! - At most one call is in flight; concurrent callers queue on the connection lock.
//! - A connection that failed or timed out mid-call is dropped, never reused. The next call
//!   reconnects.

use std::io;
use std::time::Duration;

use tokio::io::AsyncReadExt;
use tokio::io::AsyncWriteExt;
use tokio::net::TcpStream;
use tokio::sync::Mutex;

use ctrpc::Transport;
use ctrpc::TransportError;

/// Largest reply frame accepted from the server.
const MAX_FRAME: usize = 64 * 1024 * 1024;

pub struct TcpTransport {
    addr: String,
    timeout: Duration,
    stream: Mutex<Option<TcpStream>>,
}

impl TcpTransport {
    /// Does not connect; the first call does.
    pub fn new(addr: impl Into<String>, timeout: Duration) -> Self {
        Self {
            addr: addr.into(),
            timeout,
            stream: Mutex::new(None),
        }
    }

    async fn exchange(
        &self,
        slot: &mut Option<TcpStream>,
        payload: &[u8],
        len: u32,
    ) -> Result<Vec<u8>, TransportError> {
        if slot.is_none() {
            let stream = TcpStream::connect(&self.addr)
                .await
                .map_err(|e| TransportError::ConnectionLost(format!("{}: {}", self.addr, e)))?;
            tracing::debug!(addr = %self.addr, "connected");
            *slot = Some(stream);
        }
        let Some(stream) = slot.as_mut() else {
            return Err(TransportError::ConnectionLost(self.addr.clone()));
        };

        stream.write_all(&len.to_be_bytes()).await.map_err(io_error)?;
        stream.write_all(payload).await.map_err(io_error)?;
        stream.flush().await.map_err(io_error)?;

        let mut header = [0u8; 4];
        stream.read_exact(&mut header).await.map_err(io_error)?;
        let reply_len = u32::from_be_bytes(header) as usize;
        if reply_len > MAX_FRAME {
            return Err(TransportError::FrameTooLarge(reply_len));
        }

        let mut reply = vec![0u8; reply_len];
        stream.read_exact(&mut reply).await.map_err(io_error)?;
        Ok(reply)
    }
}

#[async_trait::async_trait]
impl Transport for TcpTransport {
    async fn call(&self, payload: &[u8]) -> Result<Vec<u8>, TransportError> {
        let len = u32::try_from(payload.len())
            .map_err(|_| TransportError::FrameTooLarge(payload.len()))?;

        let mut slot = self.stream.lock().await;
        let outcome = tokio::time::timeout(self.timeout, self.exchange(&mut slot, payload, len)).await;
        match outcome {
            Ok(Ok(reply)) => {
                tracing::trace!(sent = payload.len(), received = reply.len(), "tcp round trip");
                Ok(reply)
            }
            Ok(Err(e)) => {
                tracing::debug!(addr = %self.addr, error = %e, "dropping connection");
                *slot = None;
                Err(e)
            }
            Err(_) => {
                tracing::debug!(addr = %self.addr, "call timed out, dropping connection");
                *slot = None;
                Err(TransportError::Timeout)
            }
        }
    }
}

fn io_error(e: io::Error) -> TransportError {
    match e.kind() {
        io::ErrorKind::UnexpectedEof
        | io::ErrorKind::ConnectionReset
        | io::ErrorKind::ConnectionAborted
        | io::ErrorKind::BrokenPipe => TransportError::ConnectionLost(e.to_string()),
        _ => TransportError::Io(e.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use tokio::net::TcpListener;

    async fn read_frame(stream: &mut TcpStream) -> io::Result<Vec<u8>> {
        let mut header = [0u8; 4];
        stream.read_exact(&mut header).await?;
        let mut body = vec![0u8; u32::from_be_bytes(header) as usize];
        stream.read_exact(&mut body).await?;
        Ok(body)
    }

    async fn write_frame(stream: &mut TcpStream, body: &[u8]) -> io::Result<()> {
        stream.write_all(&(body.len() as u32).to_be_bytes()).await?;
        stream.write_all(body).await
    }

    /// Serves `per_conn` reversed-echo frames per connection, forever.
    async fn reverse_server(per_conn: usize) -> io::Result<String> {
        let listener = TcpListener::bind("127.0.0.1:0").await?;
        let addr = listener.local_addr()?.to_string();
        tokio::spawn(async move {
            while let Ok((mut stream, _)) = listener.accept().await {
                for _ in 0..per_conn {
                    let Ok(mut body) = read_frame(&mut stream).await else {
                        break;
                    };
                    body.reverse();
                    if write_frame(&mut stream, &body).await.is_err() {
                        break;
                    }
                }
            }
        });
        Ok(addr)
    }

    #[tokio::test]
    async fn test_round_trip_reuses_connection() -> anyhow::Result<()> {
        let addr = reverse_server(usize::MAX).await?;
        let transport = TcpTransport::new(addr, Duration::from_secs(2));

        assert_eq!(transport.call(&[1, 2, 3]).await?, vec![3, 2, 1]);
        assert_eq!(transport.call(&[]).await?, Vec::<u8>::new());
        Ok(())
    }

    #[tokio::test]
    async fn test_reconnects_after_peer_closes() -> anyhow::Result<()> {
        let addr = reverse_server(1).await?;
        let transport = TcpTransport::new(addr, Duration::from_secs(2));

        assert_eq!(transport.call(&[1, 2]).await?, vec![2, 1]);
        // the server hung up after one frame
        assert!(matches!(
            transport.call(&[3, 4]).await,
            Err(TransportError::ConnectionLost(_))
        ));
        assert_eq!(transport.call(&[5, 6]).await?, vec![6, 5]);
        Ok(())
    }

    #[tokio::test]
    async fn test_timeout() -> anyhow::Result<()> {
        let listener = TcpListener::bind("127.0.0.1:0").await?;
        let addr = listener.local_addr()?.to_string();
        tokio::spawn(async move {
            let mut held = Vec::new();
            while let Ok((stream, _)) = listener.accept().await {
                held.push(stream);
            }
        });

        let transport = TcpTransport::new(addr, Duration::from_millis(50));
        assert_eq!(transport.call(&[1]).await, Err(TransportError::Timeout));
        Ok(())
    }

    #[tokio::test]
    async fn test_connection_refused() -> anyhow::Result<()> {
        let listener = TcpListener::bind("127.0.0.1:0").await?;
        let addr = listener.local_addr()?.to_string();
        drop(listener);

        let transport = TcpTransport::new(addr, Duration::from_secs(2));
        assert!(matches!(
            transport.call(&[1]).await,
            Err(TransportError::ConnectionLost(_))
        ));
        Ok(())
    }
}
