//! Concrete network endpoints.

use std::any::Any;
use std::sync::{Arc, Weak};

use parking_lot::RwLock;
use smol_str::SmolStr;

use super::binding::BindingInfo;
use super::interface::InterfaceInfo;
use super::properties::{Extensions, PropertiesHolder};
use super::service::ServiceInfo;
use crate::base::QName;

#[derive(Debug, Default)]
struct EndpointState {
    name: QName,
    transport_id: SmolStr,
    address: Option<String>,
    binding: Option<Arc<BindingInfo>>,
}

/// An addressable endpoint exposing the service over one binding.
#[derive(Debug)]
pub struct EndpointInfo {
    service: Weak<ServiceInfo>,
    state: RwLock<EndpointState>,
    extensions: Extensions,
}

impl EndpointInfo {
    /// Create an endpoint for `service`. Register it with
    /// [`ServiceInfo::add_endpoint`].
    pub fn new(service: &Arc<ServiceInfo>, transport_id: impl Into<SmolStr>, name: QName) -> Arc<Self> {
        Arc::new(Self {
            service: Arc::downgrade(service),
            state: RwLock::new(EndpointState {
                name,
                transport_id: transport_id.into(),
                ..EndpointState::default()
            }),
            extensions: Extensions::new(),
        })
    }

    pub fn name(&self) -> QName {
        self.state.read().name.clone()
    }

    pub fn set_name(&self, name: QName) {
        self.state.write().name = name;
    }

    pub fn transport_id(&self) -> SmolStr {
        self.state.read().transport_id.clone()
    }

    pub fn set_transport_id(&self, transport_id: impl Into<SmolStr>) {
        self.state.write().transport_id = transport_id.into();
    }

    pub fn address(&self) -> Option<String> {
        self.state.read().address.clone()
    }

    pub fn set_address(&self, address: Option<String>) {
        self.state.write().address = address;
    }

    pub fn binding(&self) -> Option<Arc<BindingInfo>> {
        self.state.read().binding.clone()
    }

    pub fn set_binding(&self, binding: Option<Arc<BindingInfo>>) {
        self.state.write().binding = binding;
    }

    pub fn service(&self) -> Option<Arc<ServiceInfo>> {
        self.service.upgrade()
    }

    pub fn interface(&self) -> Option<Arc<InterfaceInfo>> {
        self.service()?.interface()
    }
}

impl PropertiesHolder for EndpointInfo {
    fn extensions(&self) -> &Extensions {
        &self.extensions
    }

    /// Look in the endpoint, then its binding, then its service.
    fn traversed_extensor<T: Any + Send + Sync>(&self, default: Option<Arc<T>>) -> Option<Arc<T>> {
        self.extensions
            .extensor::<T>()
            .or_else(|| self.binding().and_then(|b| b.extensor::<T>()))
            .or_else(|| self.service().and_then(|s| s.extensor::<T>()))
            .or(default)
    }
}
