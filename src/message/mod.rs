//! Messages and the send path.
//!
//! ## Example
//!
//! ```no_run
//! use msgwire::message::Message;
//! use msgwire::protocol::{KeyValuePairs, MessageType};
//!
//! msgwire::services::initialize("/etc/msgwire/msgwire.toml").unwrap();
//!
//! let mut message = Message::new("echo", MessageType::KeyValues);
//! message.set_key_values_payload(KeyValuePairs::new().with("firstName", "Mickey"));
//!
//! let mut response = Message::empty();
//! if message.send_with_response("echo_service", &mut response) {
//!     println!("{:?}", response.key_values_payload());
//! }
//! ```

mod send;
mod types;

pub use send::transport_for_service;
pub use types::Message;
