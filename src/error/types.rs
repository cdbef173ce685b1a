//! Error types for msgwire.

use thiserror::Error;

/// Main error type for messaging operations.
#[derive(Error, Debug)]
pub enum MessagingError {
    /// Configuration-related errors.
    #[error("Configuration error: {message}")]
    Config { message: String },

    /// Service resolution errors.
    #[error("Resolution error: {kind}")]
    Resolution { kind: ResolutionErrorKind },

    /// Transport errors (connect, read, write).
    #[error("Transport error: {kind}")]
    Transport { kind: TransportErrorKind },

    /// Framing and parsing errors.
    #[error("Protocol error: {kind}")]
    Protocol { kind: ProtocolErrorKind },
}

impl MessagingError {
    /// Shorthand for a configuration error.
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
        }
    }
}

impl From<ResolutionErrorKind> for MessagingError {
    fn from(kind: ResolutionErrorKind) -> Self {
        Self::Resolution { kind }
    }
}

impl From<TransportErrorKind> for MessagingError {
    fn from(kind: TransportErrorKind) -> Self {
        Self::Transport { kind }
    }
}

impl From<ProtocolErrorKind> for MessagingError {
    fn from(kind: ProtocolErrorKind) -> Self {
        Self::Protocol { kind }
    }
}

/// Service resolution error kinds.
#[derive(Error, Debug)]
pub enum ResolutionErrorKind {
    #[error("Messaging not initialized")]
    NotInitialized,

    #[error("Service is not registered: {service}")]
    ServiceNotRegistered { service: String },
}

/// Transport error kinds.
#[derive(Error, Debug)]
pub enum TransportErrorKind {
    #[error("Unable to connect to {address}: {message}")]
    ConnectFailed { address: String, message: String },

    #[error("Transport is closed")]
    Closed,

    #[error("Read of {expected} bytes failed: {message}")]
    ReadFailed { expected: usize, message: String },

    #[error("Write failed: {message}")]
    WriteFailed { message: String },
}

/// Protocol error kinds.
#[derive(Error, Debug)]
pub enum ProtocolErrorKind {
    #[error("Invalid header length prefix: '{prefix}'")]
    InvalidLengthPrefix { prefix: String },

    #[error("Header length is empty")]
    EmptyHeader,

    #[error("Header contains no key/value pairs")]
    NoHeaderPairs,

    #[error("Unable to identify message type from header (payload_type: {value:?})")]
    UnknownPayloadType { value: Option<String> },

    #[error("{section} is not valid UTF-8")]
    InvalidUtf8 { section: &'static str },

    #[error("Payload too large: {size} bytes exceeds maximum of {max} bytes")]
    PayloadTooLarge { size: usize, max: usize },

    #[error("Header too large: {size} bytes exceeds maximum of {max} bytes")]
    HeaderTooLarge { size: usize, max: usize },

    #[error("Message has no type set")]
    UntypedMessage,
}

/// Result type alias for messaging operations.
pub type MessagingResult<T> = Result<T, MessagingError>;
