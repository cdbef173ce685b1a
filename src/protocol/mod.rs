//! Wire protocol module.
//!
//! Defines the payload types, key/value flattening and message framing for
//! socket communication.
//!
//! ## Wire Format
//!
//! Frames are text with a fixed-width header length prefix:
//! ```text
//! [10 bytes: header length, space-padded][k1=v1;k2=v2 header][payload]
//! ```

mod kvp;
mod payload;
pub mod wire;

pub use kvp::{KeyValuePairs, DELIMITER_KEY_VALUE, DELIMITER_PAIR};
pub use payload::{MessageType, Payload};
pub use wire::{
    decode_frame, encode_checked_frame, encode_frame, encode_length, DecodedFrame,
    MAX_HEADER_LENGTH, MAX_SEGMENT_LENGTH,
};
