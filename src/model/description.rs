//! The document-level registry of services.

use std::sync::{Arc, Weak};

use parking_lot::RwLock;
use tracing::trace;

use super::properties::{Extensions, PropertiesHolder};
use super::service::ServiceInfo;
use crate::base::QName;

/// A contract document and the services it defines.
///
/// Holding the description keeps its services alive.
#[derive(Debug)]
pub struct DescriptionInfo {
    me: Weak<DescriptionInfo>,
    base_uri: RwLock<Option<String>>,
    services: RwLock<Vec<Arc<ServiceInfo>>>,
    extensions: Extensions,
}

impl DescriptionInfo {
    pub fn new() -> Arc<Self> {
        Arc::new_cyclic(|me| Self {
            me: me.clone(),
            base_uri: RwLock::default(),
            services: RwLock::default(),
            extensions: Extensions::new(),
        })
    }

    pub fn base_uri(&self) -> Option<String> {
        self.base_uri.read().clone()
    }

    pub fn set_base_uri(&self, base_uri: Option<String>) {
        *self.base_uri.write() = base_uri;
    }

    /// Register a service. A service with the same name is replaced.
    pub fn add_service(&self, service: Arc<ServiceInfo>) {
        service.set_description(self.me.clone());
        let name = service.name();
        let mut services = self.services.write();
        match services.iter_mut().find(|s| s.name() == name) {
            Some(slot) => *slot = service,
            None => services.push(service),
        }
        trace!(service = %name, "registered service");
    }

    pub fn service(&self, name: &QName) -> Option<Arc<ServiceInfo>> {
        self.services.read().iter().find(|s| s.name() == *name).cloned()
    }

    pub fn services(&self) -> Vec<Arc<ServiceInfo>> {
        self.services.read().clone()
    }
}

impl PropertiesHolder for DescriptionInfo {
    fn extensions(&self) -> &Extensions {
        &self.extensions
    }
}
