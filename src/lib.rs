//! msgwire Library
//!
//! Request/response messaging over stream sockets. A client builds a
//! [`message::Message`], resolves the target service through a
//! [`services::ServiceRegistry`], writes a self-describing text frame and,
//! for a two-way send, blocks for the reply on the same connection.

pub mod config;
pub mod error;
pub mod message;
pub mod protocol;
pub mod services;
pub mod transport;
