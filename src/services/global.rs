//! Process-wide registry.
//!
//! Installed at most once; there is no reset.

use std::path::Path;
use std::sync::{Arc, OnceLock};

use tracing::{debug, info};

use crate::config::Settings;
use crate::error::MessagingError;

use super::registry::ServiceRegistry;

static REGISTRY: OnceLock<Arc<ServiceRegistry>> = OnceLock::new();

/// Read the configuration file and install its services as the process-wide
/// registry.
///
/// Fails if the file cannot be read or parsed, if no service could be
/// registered, or if a registry is already installed.
pub fn initialize<P: AsRef<Path>>(
    config_path: P,
) -> Result<Arc<ServiceRegistry>, MessagingError> {
    let config_path = config_path.as_ref();
    debug!(path = %config_path.display(), "Reading messaging configuration");
    let settings = Settings::load(config_path)?;
    let registry = ServiceRegistry::from_settings(&settings)?;
    install(registry)
}

/// Install a registry as the process-wide registry.
pub fn install(registry: ServiceRegistry) -> Result<Arc<ServiceRegistry>, MessagingError> {
    let registry = Arc::new(registry);
    REGISTRY
        .set(Arc::clone(&registry))
        .map_err(|_| MessagingError::config("messaging is already initialized"))?;
    info!(count = registry.count(), "Messaging initialized");
    Ok(registry)
}

/// Whether a process-wide registry has been installed.
pub fn is_initialized() -> bool {
    REGISTRY.get().is_some()
}

/// The process-wide registry, if installed.
pub fn global() -> Option<Arc<ServiceRegistry>> {
    REGISTRY.get().cloned()
}
