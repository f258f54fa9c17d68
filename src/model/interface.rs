//! The abstract operation set of a service (port type).

use std::sync::{Arc, Weak};

use indexmap::IndexMap;
use parking_lot::RwLock;
use tracing::trace;

use super::error::{ModelError, Result, require_name};
use super::operation::OperationInfo;
use super::properties::{Extensions, PropertiesHolder};
use super::service::ServiceInfo;
use crate::base::QName;

/// The operations of a service, keyed by name in declaration order.
#[derive(Debug)]
pub struct InterfaceInfo {
    me: Weak<InterfaceInfo>,
    name: QName,
    service: Weak<ServiceInfo>,
    operations: RwLock<IndexMap<QName, Arc<OperationInfo>>>,
    extensions: Extensions,
}

impl InterfaceInfo {
    pub(crate) fn new(service: Weak<ServiceInfo>, name: QName) -> Arc<Self> {
        Arc::new_cyclic(|me| Self {
            me: me.clone(),
            name,
            service,
            operations: RwLock::default(),
            extensions: Extensions::new(),
        })
    }

    pub fn name(&self) -> &QName {
        &self.name
    }

    pub fn service(&self) -> Option<Arc<ServiceInfo>> {
        self.service.upgrade()
    }

    /// Create and register an operation. Operation names are unique.
    pub fn add_operation(&self, name: QName) -> Result<Arc<OperationInfo>> {
        require_name(&name, "operation")?;
        let mut operations = self.operations.write();
        if operations.contains_key(&name) {
            return Err(ModelError::duplicate_operation(name, self.name.clone()));
        }
        let operation = OperationInfo::new(self.me.clone(), name.clone());
        trace!(interface = %self.name, operation = %name, "added operation");
        operations.insert(name, Arc::clone(&operation));
        Ok(operation)
    }

    pub fn operation(&self, name: &QName) -> Option<Arc<OperationInfo>> {
        self.operations.read().get(name).cloned()
    }

    /// All operations in declaration order.
    pub fn operations(&self) -> Vec<Arc<OperationInfo>> {
        self.operations.read().values().cloned().collect()
    }

    pub fn remove_operation(&self, name: &QName) -> Option<Arc<OperationInfo>> {
        self.operations.write().shift_remove(name)
    }
}

impl PropertiesHolder for InterfaceInfo {
    fn extensions(&self) -> &Extensions {
        &self.extensions
    }
}
