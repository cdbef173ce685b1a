//! In-memory transport for tests and in-process exchanges.

use std::cell::{Cell, RefCell};
use std::collections::VecDeque;
use std::rc::Rc;

use crate::error::{MessagingResult, TransportErrorKind};
use crate::services::ServiceInfo;

use super::{ByteTransport, Connector};

#[derive(Debug, Default)]
struct Buffers {
    inbound: VecDeque<u8>,
    outbound: Vec<u8>,
}

/// A transport backed by in-memory buffers.
///
/// Clones share the same buffers but each has its own open/closed state, so
/// a test can keep a handle and inspect what was written after the original
/// has been closed and dropped.
#[derive(Debug, Clone)]
pub struct MemoryTransport {
    buffers: Rc<RefCell<Buffers>>,
    open: bool,
}

impl MemoryTransport {
    /// Create a transport whose reads return `inbound`.
    pub fn new(inbound: impl Into<Vec<u8>>) -> Self {
        let inbound: Vec<u8> = inbound.into();
        let buffers = Buffers {
            inbound: VecDeque::from(inbound),
            outbound: Vec::new(),
        };
        Self {
            buffers: Rc::new(RefCell::new(buffers)),
            open: true,
        }
    }

    /// A transport with nothing to read.
    pub fn empty() -> Self {
        Self::new(Vec::new())
    }

    /// Append bytes for later reads.
    pub fn push_inbound(&self, data: &[u8]) {
        self.buffers.borrow_mut().inbound.extend(data);
    }

    /// Everything written so far.
    pub fn written(&self) -> Vec<u8> {
        self.buffers.borrow().outbound.clone()
    }

    /// Bytes not yet read.
    pub fn remaining(&self) -> usize {
        self.buffers.borrow().inbound.len()
    }
}

impl ByteTransport for MemoryTransport {
    fn read_exact(&mut self, len: usize) -> MessagingResult<Vec<u8>> {
        if !self.open {
            return Err(TransportErrorKind::Closed.into());
        }
        let mut buffers = self.buffers.borrow_mut();
        if buffers.inbound.len() < len {
            return Err(TransportErrorKind::ReadFailed {
                expected: len,
                message: format!("only {} bytes available", buffers.inbound.len()),
            }
            .into());
        }
        Ok(buffers.inbound.drain(..len).collect())
    }

    fn write_all(&mut self, data: &[u8]) -> MessagingResult<()> {
        if !self.open {
            return Err(TransportErrorKind::Closed.into());
        }
        self.buffers.borrow_mut().outbound.extend_from_slice(data);
        Ok(())
    }

    fn close(&mut self) {
        self.open = false;
    }

    fn is_open(&self) -> bool {
        self.open
    }
}

/// Hands out clones of one [`MemoryTransport`] and counts connections.
#[derive(Debug)]
pub struct MemoryConnector {
    transport: MemoryTransport,
    refuse: bool,
    connects: Cell<usize>,
}

impl MemoryConnector {
    pub fn new(transport: MemoryTransport) -> Self {
        Self {
            transport,
            refuse: false,
            connects: Cell::new(0),
        }
    }

    /// A connector whose every connection attempt fails.
    pub fn refusing() -> Self {
        Self {
            transport: MemoryTransport::empty(),
            refuse: true,
            connects: Cell::new(0),
        }
    }

    /// Number of connection attempts made.
    pub fn connects(&self) -> usize {
        self.connects.get()
    }

    /// The shared transport handle.
    pub fn transport(&self) -> &MemoryTransport {
        &self.transport
    }
}

impl Connector for MemoryConnector {
    type Transport = MemoryTransport;

    fn connect(&self, info: &ServiceInfo) -> MessagingResult<MemoryTransport> {
        self.connects.set(self.connects.get() + 1);
        if self.refuse {
            return Err(TransportErrorKind::ConnectFailed {
                address: info.address(),
                message: "connection refused".to_string(),
            }
            .into());
        }
        Ok(self.transport.clone())
    }
}
