//! Sending messages to registered services.
//!
//! Each send opens a fresh connection, writes one frame and, for a two-way
//! send, blocks for one reply frame on the same connection. Failures are
//! logged and reported to the caller as `false`.

use tracing::{debug, error, trace};
use uuid::Uuid;

use crate::error::{MessagingError, MessagingResult, ProtocolErrorKind, ResolutionErrorKind};
use crate::protocol::{wire, MessageType};
use crate::services::{self, ServiceRegistry};
use crate::transport::{ByteTransport, Connector, TcpConnector};

use super::types::Message;

/// Open a transport to a registered service.
///
/// `registry` is `None` when messaging has not been initialized.
pub fn transport_for_service<C: Connector>(
    registry: Option<&ServiceRegistry>,
    connector: &C,
    service_name: &str,
) -> MessagingResult<C::Transport> {
    let registry = registry.ok_or(ResolutionErrorKind::NotInitialized)?;
    let info = registry.resolve(service_name)?;
    connector.connect(info)
}

impl Message {
    /// Send to a service in the process-wide registry without waiting for a
    /// reply. Marks this message one-way.
    pub fn send(&mut self, service_name: &str) -> bool {
        let registry = services::global();
        let exchange_id = Uuid::new_v4();
        let result = self.try_send(registry.as_deref(), &TcpConnector::new(), service_name);
        report(exchange_id, service_name, self.request_name(), result)
    }

    /// Send to a service in the process-wide registry and read its reply
    /// into `response`.
    pub fn send_with_response(&mut self, service_name: &str, response: &mut Message) -> bool {
        let registry = services::global();
        let exchange_id = Uuid::new_v4();
        let result = self.try_send_with_response(
            registry.as_deref(),
            &TcpConnector::new(),
            service_name,
            response,
        );
        report(exchange_id, service_name, self.request_name(), result)
    }

    /// One-way send through an explicit registry and connector.
    pub fn send_via<C: Connector>(
        &mut self,
        registry: &ServiceRegistry,
        connector: &C,
        service_name: &str,
    ) -> bool {
        let exchange_id = Uuid::new_v4();
        let result = self.try_send(Some(registry), connector, service_name);
        report(exchange_id, service_name, self.request_name(), result)
    }

    /// Two-way send through an explicit registry and connector.
    pub fn send_with_response_via<C: Connector>(
        &mut self,
        registry: &ServiceRegistry,
        connector: &C,
        service_name: &str,
        response: &mut Message,
    ) -> bool {
        let exchange_id = Uuid::new_v4();
        let result = self.try_send_with_response(Some(registry), connector, service_name, response);
        report(exchange_id, service_name, self.request_name(), result)
    }

    /// One-way send, returning the failure instead of logging it.
    pub fn try_send<C: Connector>(
        &mut self,
        registry: Option<&ServiceRegistry>,
        connector: &C,
        service_name: &str,
    ) -> MessagingResult<()> {
        let frame = self.sendable_frame(true)?;
        let mut transport = transport_for_service(registry, connector, service_name)?;
        self.mark_one_way();

        let result = write_frame(&mut transport, &frame);
        transport.close();
        result
    }

    /// Two-way send, returning the failure instead of logging it.
    ///
    /// `response` is only modified when a complete reply was read.
    pub fn try_send_with_response<C: Connector>(
        &mut self,
        registry: Option<&ServiceRegistry>,
        connector: &C,
        service_name: &str,
        response: &mut Message,
    ) -> MessagingResult<()> {
        let frame = self.sendable_frame(self.is_one_way())?;
        let mut transport = transport_for_service(registry, connector, service_name)?;

        let result = write_frame(&mut transport, &frame)
            .and_then(|()| response.read_from(&mut transport));
        transport.close();
        result
    }

    /// The frame to send, or why this message cannot be sent.
    fn sendable_frame(&self, one_way: bool) -> MessagingResult<Vec<u8>> {
        if self.message_type() == MessageType::Unknown {
            return Err(ProtocolErrorKind::UntypedMessage.into());
        }
        wire::encode_checked_frame(self.headers(), self.payload(), one_way)
    }
}

fn write_frame<T: ByteTransport>(transport: &mut T, frame: &[u8]) -> MessagingResult<()> {
    trace!(frame = %String::from_utf8_lossy(frame), "Writing frame");
    transport.write_all(frame)
}

/// Log the outcome of an exchange and collapse it to a flag.
fn report(
    exchange_id: Uuid,
    service_name: &str,
    request: &str,
    result: MessagingResult<()>,
) -> bool {
    match result {
        Ok(()) => {
            debug!(
                exchange_id = %exchange_id,
                service = %service_name,
                request = %request,
                "Message delivered"
            );
            true
        }
        Err(e) => {
            let stage = match &e {
                MessagingError::Resolution { .. } => "resolve",
                MessagingError::Transport { .. } => "transport",
                MessagingError::Protocol { .. } => "protocol",
                MessagingError::Config { .. } => "config",
            };
            error!(
                exchange_id = %exchange_id,
                service = %service_name,
                request = %request,
                stage,
                error = %e,
                "Unable to send message"
            );
            false
        }
    }
}
