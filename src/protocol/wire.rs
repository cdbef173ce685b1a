//! Wire format for message framing.
//!
//! A frame is text:
//! ```text
//! [10 bytes: header length, decimal, right-padded with spaces]
//! [header: "k1=v1;k2=v2;..."]
//! [payload: payload_length bytes, text or "k1=v1;..."]
//! ```
//! The payload length travels inside the header; only the header is
//! length-prefixed.

use tracing::{debug, trace, warn};

use crate::error::{MessagingResult, ProtocolErrorKind};
use crate::transport::ByteTransport;

use super::kvp::KeyValuePairs;
use super::payload::{MessageType, Payload};

/// Width of the header length prefix.
pub const HEADER_LENGTH_PREFIX_WIDTH: usize = 10;

/// Largest payload a single frame may carry.
pub const MAX_SEGMENT_LENGTH: usize = 32767;

/// Largest header a frame may declare in its length prefix.
pub const MAX_HEADER_LENGTH: usize = MAX_SEGMENT_LENGTH;

pub const KEY_ONE_WAY: &str = "1way";
pub const KEY_PAYLOAD_LENGTH: &str = "payload_length";
pub const KEY_PAYLOAD_TYPE: &str = "payload_type";
pub const KEY_REQUEST_NAME: &str = "request";

pub const VALUE_TRUE: &str = "true";

/// Header and payload state recovered from a frame.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecodedFrame {
    pub headers: KeyValuePairs,
    pub payload: Payload,
    pub one_way: bool,
}

/// Encode a length as the fixed-width header prefix.
pub fn encode_length(len: usize) -> String {
    format!("{:<width$}", len, width = HEADER_LENGTH_PREFIX_WIDTH)
}

/// Parse a header length prefix. Only trailing spaces are stripped.
pub fn parse_length_prefix(prefix: &[u8]) -> MessagingResult<usize> {
    let invalid = || ProtocolErrorKind::InvalidLengthPrefix {
        prefix: String::from_utf8_lossy(prefix).into_owned(),
    };
    let text = std::str::from_utf8(prefix).map_err(|_| invalid())?;
    let len = text
        .trim_end_matches(' ')
        .parse::<usize>()
        .map_err(|_| invalid())?;
    Ok(len)
}

/// Read and parse the header length prefix from a transport.
pub fn decode_length<T: ByteTransport + ?Sized>(transport: &mut T) -> MessagingResult<usize> {
    let prefix = transport.read_exact(HEADER_LENGTH_PREFIX_WIDTH)?;
    parse_length_prefix(&prefix)
}

/// The headers as they go on the wire: caller headers plus protocol metadata.
fn wire_headers(
    headers: &KeyValuePairs,
    payload: &Payload,
    one_way: bool,
    payload_len: usize,
) -> KeyValuePairs {
    let mut wire = headers.clone();
    wire.insert(KEY_PAYLOAD_TYPE, payload.message_type().as_header_value());
    if one_way {
        wire.insert(KEY_ONE_WAY, VALUE_TRUE);
    }
    if !wire.contains_key(KEY_REQUEST_NAME) {
        wire.insert(KEY_REQUEST_NAME, "");
    }
    wire.insert(KEY_PAYLOAD_LENGTH, payload_len.to_string());
    wire
}

/// Flatten header and payload state into a frame.
///
/// Pure and deterministic: the same state always yields the same bytes.
/// No size check happens here; see [`encode_checked_frame`].
pub fn encode_frame(headers: &KeyValuePairs, payload: &Payload, one_way: bool) -> Vec<u8> {
    let body = payload.render();
    let header = wire_headers(headers, payload, one_way, body.len()).flatten();
    assemble_frame(&header, &body)
}

/// Like [`encode_frame`], but fails if the payload exceeds
/// [`MAX_SEGMENT_LENGTH`] or the header exceeds [`MAX_HEADER_LENGTH`].
pub fn encode_checked_frame(
    headers: &KeyValuePairs,
    payload: &Payload,
    one_way: bool,
) -> MessagingResult<Vec<u8>> {
    let body = payload.render();
    if body.len() > MAX_SEGMENT_LENGTH {
        return Err(ProtocolErrorKind::PayloadTooLarge {
            size: body.len(),
            max: MAX_SEGMENT_LENGTH,
        }
        .into());
    }

    let header = wire_headers(headers, payload, one_way, body.len()).flatten();
    if header.len() > MAX_HEADER_LENGTH {
        return Err(ProtocolErrorKind::HeaderTooLarge {
            size: header.len(),
            max: MAX_HEADER_LENGTH,
        }
        .into());
    }

    Ok(assemble_frame(&header, &body))
}

fn assemble_frame(header: &str, body: &str) -> Vec<u8> {
    let prefix = encode_length(header.len());
    let mut frame = Vec::with_capacity(prefix.len() + header.len() + body.len());
    frame.extend_from_slice(prefix.as_bytes());
    frame.extend_from_slice(header.as_bytes());
    frame.extend_from_slice(body.as_bytes());
    frame
}

/// Parse the declared payload length. Out of range or unparseable means no payload.
fn declared_payload_length(headers: &KeyValuePairs) -> Option<usize> {
    let raw = headers.get(KEY_PAYLOAD_LENGTH)?;
    match raw.parse::<usize>() {
        Ok(n) if n > 0 && n <= MAX_SEGMENT_LENGTH => Some(n),
        Ok(0) => None,
        _ => {
            warn!(payload_length = %raw, "Ignoring payload length outside 1..={}", MAX_SEGMENT_LENGTH);
            None
        }
    }
}

/// Read one frame from a transport.
///
/// Nothing partial is returned on failure.
pub fn decode_frame<T>(transport: &mut T) -> MessagingResult<DecodedFrame>
where
    T: ByteTransport + ?Sized,
{
    let header_len = decode_length(transport)?;
    trace!(header_len, "Header length prefix read");
    if header_len == 0 {
        return Err(ProtocolErrorKind::EmptyHeader.into());
    }
    if header_len > MAX_HEADER_LENGTH {
        return Err(ProtocolErrorKind::HeaderTooLarge {
            size: header_len,
            max: MAX_HEADER_LENGTH,
        }
        .into());
    }

    let header_bytes = transport.read_exact(header_len)?;
    let header_text = String::from_utf8(header_bytes)
        .map_err(|_| ProtocolErrorKind::InvalidUtf8 { section: "header" })?;

    let mut headers = KeyValuePairs::new();
    if headers.extend_from_flattened(&header_text) == 0 {
        return Err(ProtocolErrorKind::NoHeaderPairs.into());
    }

    let type_value = headers.get(KEY_PAYLOAD_TYPE);
    let message_type = type_value
        .map(MessageType::from_header_value)
        .unwrap_or(MessageType::Unknown);
    if message_type == MessageType::Unknown {
        return Err(ProtocolErrorKind::UnknownPayloadType {
            value: type_value.map(str::to_string),
        }
        .into());
    }

    let payload = match declared_payload_length(&headers) {
        Some(len) => {
            let bytes = transport.read_exact(len)?;
            let text = String::from_utf8(bytes)
                .map_err(|_| ProtocolErrorKind::InvalidUtf8 { section: "payload" })?;
            Payload::from_wire(message_type, text)
        }
        None => Payload::empty(message_type),
    };

    let one_way = headers.get(KEY_ONE_WAY) == Some(VALUE_TRUE);

    debug!(
        request = headers.get(KEY_REQUEST_NAME).unwrap_or(""),
        payload_type = message_type.as_header_value(),
        one_way,
        "Frame decoded"
    );

    Ok(DecodedFrame {
        headers,
        payload,
        one_way,
    })
}
