//! Service registry.
//!
//! Central table of service name to connection coordinates.

use std::collections::HashMap;

use tracing::{debug, info};

use crate::config::Settings;
use crate::error::{MessagingError, ResolutionErrorKind};

use super::info::ServiceInfo;

/// Registry of services a message can be sent to.
///
/// Populated during initialization and read-only afterwards.
#[derive(Debug, Clone, Default)]
pub struct ServiceRegistry {
    services: HashMap<String, ServiceInfo>,
}

impl ServiceRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a registry from the services in a configuration.
    ///
    /// Fails if no service could be registered.
    pub fn from_settings(settings: &Settings) -> Result<Self, MessagingError> {
        let mut registry = Self::new();
        for info in &settings.services {
            registry.register_service(info.service_name(), info.clone());
        }

        if registry.count() == 0 {
            return Err(MessagingError::config("no services registered"));
        }

        info!(count = registry.count(), "Service registry initialized");
        Ok(registry)
    }

    /// Register a service. A later registration under the same name replaces
    /// the earlier one.
    pub fn register_service(&mut self, service_name: impl Into<String>, info: ServiceInfo) {
        let service_name = service_name.into();
        debug!(service = %service_name, address = %info.address(), "Registering service");
        self.services.insert(service_name, info);
    }

    /// Check whether a service name is registered.
    pub fn is_service_registered(&self, service_name: &str) -> bool {
        self.services.contains_key(service_name)
    }

    /// Get the connection coordinates for a service.
    pub fn info_for_service(&self, service_name: &str) -> Option<&ServiceInfo> {
        self.services.get(service_name)
    }

    /// Look up a service, failing with a resolution error if it is unknown.
    pub fn resolve(&self, service_name: &str) -> Result<&ServiceInfo, MessagingError> {
        self.info_for_service(service_name).ok_or_else(|| {
            ResolutionErrorKind::ServiceNotRegistered {
                service: service_name.to_string(),
            }
            .into()
        })
    }

    /// List all registered service names.
    pub fn list(&self) -> Vec<&str> {
        self.services.keys().map(String::as_str).collect()
    }

    /// Get the count of registered services.
    pub fn count(&self) -> usize {
        self.services.len()
    }
}
