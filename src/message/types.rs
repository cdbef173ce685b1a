//! The message type and its accessors.

use tracing::error;

use crate::error::{MessagingResult, TransportErrorKind};
use crate::protocol::wire::{self, DecodedFrame, KEY_REQUEST_NAME};
use crate::protocol::{KeyValuePairs, MessageType, Payload};
use crate::transport::ByteTransport;

/// A single request or response.
///
/// Build one per exchange with [`Message::new`], or get one back from
/// [`Message::reconstruct`] / a two-way send.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Message {
    headers: KeyValuePairs,
    payload: Payload,
    one_way: bool,
    service_name: Option<String>,
}

impl Message {
    /// Start an outbound message.
    ///
    /// A message of type [`MessageType::Unknown`] cannot be sent.
    pub fn new(request_name: impl Into<String>, message_type: MessageType) -> Self {
        Self {
            headers: KeyValuePairs::new().with(KEY_REQUEST_NAME, request_name),
            payload: Payload::empty(message_type),
            one_way: false,
            service_name: None,
        }
    }

    /// An untyped message, ready to be filled by a response.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Read a message from a transport.
    ///
    /// Returns `None` if there is no transport, it is closed, or the frame
    /// cannot be decoded.
    pub fn reconstruct<T: ByteTransport + ?Sized>(transport: Option<&mut T>) -> Option<Self> {
        let Some(transport) = transport else {
            error!("No transport given to reconstruct message");
            return None;
        };
        if !transport.is_open() {
            error!("Cannot reconstruct message from a closed transport");
            return None;
        }

        let mut message = Self::empty();
        match message.read_from(transport) {
            Ok(()) => Some(message),
            Err(e) => {
                error!(error = %e, "Failed to reconstruct message");
                None
            }
        }
    }

    /// Replace this message's state with the next frame read from `transport`.
    ///
    /// On failure the message is left untouched.
    pub fn read_from<T>(&mut self, transport: &mut T) -> MessagingResult<()>
    where
        T: ByteTransport + ?Sized,
    {
        if !transport.is_open() {
            return Err(TransportErrorKind::Closed.into());
        }
        let frame = wire::decode_frame(transport)?;
        self.apply_frame(frame);
        Ok(())
    }

    fn apply_frame(&mut self, frame: DecodedFrame) {
        self.headers = frame.headers;
        self.payload = frame.payload;
        self.one_way = frame.one_way;
    }

    /// Serialize and write this message, e.g. a reply on an accepted connection.
    pub fn write_to<T: ByteTransport + ?Sized>(&self, transport: &mut T) -> MessagingResult<()> {
        transport.write_all(&self.to_frame())
    }

    /// The frame for this message's current state.
    pub fn to_frame(&self) -> Vec<u8> {
        wire::encode_frame(&self.headers, &self.payload, self.one_way)
    }

    pub fn message_type(&self) -> MessageType {
        self.payload.message_type()
    }

    /// The request name, or `""` if unset.
    pub fn request_name(&self) -> &str {
        self.headers.get(KEY_REQUEST_NAME).unwrap_or("")
    }

    pub fn payload(&self) -> &Payload {
        &self.payload
    }

    /// The text payload, if this is a text message.
    pub fn text_payload(&self) -> Option<&str> {
        match &self.payload {
            Payload::Text(text) => Some(text.as_str()),
            _ => None,
        }
    }

    /// The key/value payload, if this is a key/value message.
    pub fn key_values_payload(&self) -> Option<&KeyValuePairs> {
        match &self.payload {
            Payload::KeyValues(kvp) => Some(kvp),
            _ => None,
        }
    }

    /// Replace the payload. The message takes the payload's type.
    pub fn set_payload(&mut self, payload: Payload) {
        self.payload = payload;
    }

    /// Set a text payload; the message becomes a text message.
    pub fn set_text_payload(&mut self, text: impl Into<String>) {
        self.payload = Payload::Text(text.into());
    }

    /// Set a key/value payload; the message becomes a key/value message.
    pub fn set_key_values_payload(&mut self, kvp: KeyValuePairs) {
        self.payload = Payload::KeyValues(kvp);
    }

    pub fn is_one_way(&self) -> bool {
        self.one_way
    }

    pub(crate) fn mark_one_way(&mut self) {
        self.one_way = true;
    }

    /// Get a header value.
    pub fn header(&self, key: &str) -> Option<&str> {
        self.headers.get(key)
    }

    /// All headers, including protocol metadata on a received message.
    pub fn headers(&self) -> &KeyValuePairs {
        &self.headers
    }

    /// Add a caller-defined header. Protocol keys are overwritten when the
    /// message is serialized.
    pub fn set_header(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.headers.insert(key, value);
    }

    /// Service a received message was addressed to, if the receiver set it.
    pub fn service_name(&self) -> Option<&str> {
        self.service_name.as_deref()
    }

    /// Tag a received message with the service that is handling it.
    pub fn with_service_name(mut self, service_name: impl Into<String>) -> Self {
        self.service_name = Some(service_name.into());
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::transport::MemoryTransport;

    #[test]
    fn test_new_seeds_request_header() {
        let message = Message::new("echo", MessageType::KeyValues);
        assert_eq!(message.request_name(), "echo");
        assert_eq!(message.message_type(), MessageType::KeyValues);
        assert_eq!(message.key_values_payload(), Some(&KeyValuePairs::new()));
        assert!(message.text_payload().is_none());
        assert!(!message.is_one_way());
    }

    #[test]
    fn test_empty_message() {
        let message = Message::empty();
        assert_eq!(message.request_name(), "");
        assert_eq!(message.message_type(), MessageType::Unknown);
        assert!(message.service_name().is_none());
    }

    #[test]
    fn test_set_payload_changes_type() {
        let mut message = Message::new("serverInfo", MessageType::Text);
        message.set_key_values_payload(KeyValuePairs::new().with("a", "1"));
        assert_eq!(message.message_type(), MessageType::KeyValues);
        message.set_text_payload("hi");
        assert_eq!(message.text_payload(), Some("hi"));
    }

    #[test]
    fn test_reconstruct_round_trip() {
        let mut message = Message::new("greet", MessageType::Text);
        message.set_text_payload("Hello there");
        message.mark_one_way();

        let mut transport = MemoryTransport::new(message.to_frame());
        let received = Message::reconstruct(Some(&mut transport)).unwrap();
        assert_eq!(received.request_name(), "greet");
        assert_eq!(received.message_type(), MessageType::Text);
        assert_eq!(received.text_payload(), Some("Hello there"));
        assert!(received.is_one_way());
    }

    #[test]
    fn test_reconstruct_without_transport() {
        assert!(Message::reconstruct::<MemoryTransport>(None).is_none());
    }

    #[test]
    fn test_reconstruct_from_closed_transport() {
        let message = Message::new("greet", MessageType::Text);
        let mut transport = MemoryTransport::new(message.to_frame());
        transport.close();
        assert!(Message::reconstruct(Some(&mut transport)).is_none());
    }

    #[test]
    fn test_reconstruct_malformed_header() {
        let mut transport = MemoryTransport::new(b"7         garbage".to_vec());
        assert!(Message::reconstruct(Some(&mut transport)).is_none());
    }

    #[test]
    fn test_failed_read_leaves_message_untouched() {
        let mut response = Message::new("keep", MessageType::Text);
        response.set_text_payload("original");
        let before = response.clone();

        let mut transport = MemoryTransport::new(b"0         ".to_vec());
        assert!(response.read_from(&mut transport).is_err());
        assert_eq!(response, before);
    }

    #[test]
    fn test_write_to_and_service_name() {
        let mut reply = Message::new("echo", MessageType::KeyValues);
        reply.set_key_values_payload(KeyValuePairs::new().with("firstName", "Mickey"));
        reply.set_header("server", "test");

        let mut transport = MemoryTransport::empty();
        reply.write_to(&mut transport).unwrap();

        let mut inbound = MemoryTransport::new(transport.written());
        let received = Message::reconstruct(Some(&mut inbound))
            .unwrap()
            .with_service_name("echo_service");
        assert_eq!(received.service_name(), Some("echo_service"));
        assert_eq!(received.header("server"), Some("test"));
        assert_eq!(
            received.key_values_payload().and_then(|kvp| kvp.get("firstName")),
            Some("Mickey")
        );
    }
}
