//! TCP transport.

use std::io::{Read, Write};
use std::net::{Shutdown, TcpStream};
use std::time::Duration;

use tracing::debug;

use crate::error::{MessagingResult, TransportErrorKind};
use crate::services::ServiceInfo;

use super::{ByteTransport, Connector};

/// A transport over a connected TCP stream.
#[derive(Debug)]
pub struct TcpTransport {
    stream: Option<TcpStream>,
}

impl TcpTransport {
    /// Wrap an already connected stream (e.g. one returned by `accept`).
    pub fn new(stream: TcpStream) -> Self {
        Self {
            stream: Some(stream),
        }
    }

    fn stream(&mut self) -> MessagingResult<&mut TcpStream> {
        self.stream
            .as_mut()
            .ok_or_else(|| TransportErrorKind::Closed.into())
    }
}

impl ByteTransport for TcpTransport {
    fn read_exact(&mut self, len: usize) -> MessagingResult<Vec<u8>> {
        let stream = self.stream()?;
        // Grow with what arrives instead of trusting `len` up front.
        let mut buf = Vec::new();
        stream
            .take(len as u64)
            .read_to_end(&mut buf)
            .map_err(|e| TransportErrorKind::ReadFailed {
                expected: len,
                message: e.to_string(),
            })?;
        if buf.len() < len {
            return Err(TransportErrorKind::ReadFailed {
                expected: len,
                message: "connection closed by peer".to_string(),
            }
            .into());
        }
        Ok(buf)
    }

    fn write_all(&mut self, data: &[u8]) -> MessagingResult<()> {
        let stream = self.stream()?;
        stream
            .write_all(data)
            .and_then(|()| stream.flush())
            .map_err(|e| TransportErrorKind::WriteFailed {
                message: e.to_string(),
            })?;
        Ok(())
    }

    fn close(&mut self) {
        if let Some(stream) = self.stream.take() {
            // Peer may already be gone; nothing to do about it here.
            let _ = stream.shutdown(Shutdown::Both);
        }
    }

    fn is_open(&self) -> bool {
        self.stream.is_some()
    }
}

impl Drop for TcpTransport {
    fn drop(&mut self) {
        self.close();
    }
}

/// Opens a new TCP connection per exchange.
///
/// Without timeouts, reads and writes block indefinitely.
#[derive(Debug, Clone, Default)]
pub struct TcpConnector {
    read_timeout: Option<Duration>,
    write_timeout: Option<Duration>,
}

impl TcpConnector {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_read_timeout(mut self, timeout: Duration) -> Self {
        self.read_timeout = Some(timeout);
        self
    }

    pub fn with_write_timeout(mut self, timeout: Duration) -> Self {
        self.write_timeout = Some(timeout);
        self
    }
}

impl Connector for TcpConnector {
    type Transport = TcpTransport;

    fn connect(&self, info: &ServiceInfo) -> MessagingResult<TcpTransport> {
        let address = info.address();
        let connect_failed = |e: std::io::Error| TransportErrorKind::ConnectFailed {
            address: address.clone(),
            message: e.to_string(),
        };

        let stream = TcpStream::connect(&address).map_err(connect_failed)?;
        stream
            .set_read_timeout(self.read_timeout)
            .map_err(connect_failed)?;
        stream
            .set_write_timeout(self.write_timeout)
            .map_err(connect_failed)?;

        debug!(service = %info.service_name(), address = %address, "Connected");
        Ok(TcpTransport::new(stream))
    }
}
