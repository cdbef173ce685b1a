//! Byte transport abstraction.
//!
//! A transport is a blocking, bidirectional byte stream. The wire codec reads
//! exact byte counts from it and writes whole frames to it; it never sees
//! sockets directly. A [`Connector`] opens one fresh transport per exchange.

mod memory;
mod tcp;

pub use memory::{MemoryConnector, MemoryTransport};
pub use tcp::{TcpConnector, TcpTransport};

use crate::error::MessagingResult;
use crate::services::ServiceInfo;

/// A blocking byte stream.
pub trait ByteTransport {
    /// Read exactly `len` bytes, blocking until they arrive.
    fn read_exact(&mut self, len: usize) -> MessagingResult<Vec<u8>>;

    /// Write the whole buffer.
    fn write_all(&mut self, data: &[u8]) -> MessagingResult<()>;

    /// Close the transport. Further reads and writes fail.
    fn close(&mut self);

    /// Whether the transport is still usable.
    fn is_open(&self) -> bool;
}

impl<T: ByteTransport + ?Sized> ByteTransport for &mut T {
    fn read_exact(&mut self, len: usize) -> MessagingResult<Vec<u8>> {
        (**self).read_exact(len)
    }

    fn write_all(&mut self, data: &[u8]) -> MessagingResult<()> {
        (**self).write_all(data)
    }

    fn close(&mut self) {
        (**self).close()
    }

    fn is_open(&self) -> bool {
        (**self).is_open()
    }
}

impl<T: ByteTransport + ?Sized> ByteTransport for Box<T> {
    fn read_exact(&mut self, len: usize) -> MessagingResult<Vec<u8>> {
        (**self).read_exact(len)
    }

    fn write_all(&mut self, data: &[u8]) -> MessagingResult<()> {
        (**self).write_all(data)
    }

    fn close(&mut self) {
        (**self).close()
    }

    fn is_open(&self) -> bool {
        (**self).is_open()
    }
}

/// Opens transports to registered services.
pub trait Connector {
    type Transport: ByteTransport;

    /// Open a new connection to the service.
    fn connect(&self, info: &ServiceInfo) -> MessagingResult<Self::Transport>;
}
