//! Service registry module.
//!
//! Maps logical service names to the host and port a message is sent to.
//! A [`ServiceRegistry`] can be built and passed around explicitly, or
//! installed once as the process-wide registry with [`initialize`].

mod global;
mod info;
mod registry;

pub use global::{global, initialize, install, is_initialized};
pub use info::ServiceInfo;
pub use registry::ServiceRegistry;
