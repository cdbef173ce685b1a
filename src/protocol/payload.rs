//! Message payload variants.

use super::kvp::KeyValuePairs;

/// The type of a message, as carried in the `payload_type` header.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MessageType {
    /// No type set. Not valid for sending.
    Unknown,
    /// Plain text payload.
    Text,
    /// Flattened key/value payload.
    KeyValues,
}

impl MessageType {
    /// Header value for this type.
    pub fn as_header_value(&self) -> &'static str {
        match self {
            MessageType::Unknown => "unknown",
            MessageType::Text => "text",
            MessageType::KeyValues => "kvp",
        }
    }

    /// Resolve a `payload_type` header value. Anything unrecognized is `Unknown`.
    pub fn from_header_value(value: &str) -> Self {
        match value {
            "text" => MessageType::Text,
            "kvp" => MessageType::KeyValues,
            _ => MessageType::Unknown,
        }
    }
}

/// The body of a message. The variant is the message type.
///
/// An empty string or an empty mapping is an absent payload.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum Payload {
    #[default]
    Unknown,
    Text(String),
    KeyValues(KeyValuePairs),
}

impl Payload {
    /// An empty payload of the given type.
    pub fn empty(message_type: MessageType) -> Self {
        match message_type {
            MessageType::Unknown => Payload::Unknown,
            MessageType::Text => Payload::Text(String::new()),
            MessageType::KeyValues => Payload::KeyValues(KeyValuePairs::new()),
        }
    }

    pub fn message_type(&self) -> MessageType {
        match self {
            Payload::Unknown => MessageType::Unknown,
            Payload::Text(_) => MessageType::Text,
            Payload::KeyValues(_) => MessageType::KeyValues,
        }
    }

    /// Render the payload as it goes on the wire.
    pub fn render(&self) -> String {
        match self {
            Payload::Unknown => String::new(),
            Payload::Text(text) => text.clone(),
            Payload::KeyValues(kvp) => kvp.flatten(),
        }
    }

    /// Build a payload of the given type from its wire text.
    pub fn from_wire(message_type: MessageType, text: String) -> Self {
        match message_type {
            MessageType::Unknown => Payload::Unknown,
            MessageType::Text => Payload::Text(text),
            MessageType::KeyValues => Payload::KeyValues(KeyValuePairs::parse(&text)),
        }
    }
}
