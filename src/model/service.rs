//! The service root.
//!
//! ## Ownership
//!
//! ```text
//! DescriptionInfo ──▶ ServiceInfo ──▶ InterfaceInfo ──▶ OperationInfo ──▶ MessageInfo ──▶ MessagePartInfo
//!                         │
//!                         ├──▶ BindingInfo ──▶ BindingOperationInfo ──▶ BindingMessageInfo
//!                         ├──▶ EndpointInfo
//!                         └──▶ SchemaInfo
//! ```
//!
//! Arrows are `Arc`; every node refers back to its owner through `Weak`, so
//! dropping the service releases the whole graph.
//!
//! ## Derived indexes
//!
//! The message index and the per-direction wrapper-element indexes are built
//! on first read and never patched. After changing the interface, call
//! [`ServiceInfo::refresh`] so readers see the change.

use std::sync::{Arc, Weak};

use indexmap::IndexMap;
use parking_lot::RwLock;
use rustc_hash::FxHashMap;
use tracing::{debug, trace};

use super::binding::{BindingInfo, BindingOperationInfo};
use super::cache::LazyIndex;
use super::description::DescriptionInfo;
use super::endpoint::EndpointInfo;
use super::interface::InterfaceInfo;
use super::message::{MessageDirection, MessageInfo};
use super::part::MessagePartInfo;
use super::properties::{Extensions, PropertiesHolder};
use super::schema::SchemaInfo;
use crate::base::QName;

/// Qualified name → message, over every operation's input and output.
pub type MessageIndex = IndexMap<QName, Arc<MessageInfo>>;

/// Wrapper element name → binding-operation consuming or producing it.
pub(crate) type WrapperIndex = FxHashMap<QName, Arc<BindingOperationInfo>>;

/// One logical service.
#[derive(Debug)]
pub struct ServiceInfo {
    me: Weak<ServiceInfo>,
    name: RwLock<QName>,
    target_namespace: RwLock<Option<String>>,
    description: RwLock<Weak<DescriptionInfo>>,
    interface: RwLock<Option<Arc<InterfaceInfo>>>,
    bindings: RwLock<Vec<Arc<BindingInfo>>>,
    endpoints: RwLock<Vec<Arc<EndpointInfo>>>,
    schemas: RwLock<Vec<Arc<SchemaInfo>>>,
    messages: LazyIndex<MessageIndex>,
    input_wrappers: LazyIndex<WrapperIndex>,
    output_wrappers: LazyIndex<WrapperIndex>,
    extensions: Extensions,
}

impl ServiceInfo {
    pub fn new(name: QName) -> Arc<Self> {
        Arc::new_cyclic(|me| Self {
            me: me.clone(),
            name: RwLock::new(name),
            target_namespace: RwLock::default(),
            description: RwLock::new(Weak::new()),
            interface: RwLock::default(),
            bindings: RwLock::default(),
            endpoints: RwLock::default(),
            schemas: RwLock::default(),
            messages: LazyIndex::new(),
            input_wrappers: LazyIndex::new(),
            output_wrappers: LazyIndex::new(),
            extensions: Extensions::new(),
        })
    }

    pub fn name(&self) -> QName {
        self.name.read().clone()
    }

    pub fn set_name(&self, name: QName) {
        *self.name.write() = name;
    }

    pub fn target_namespace(&self) -> Option<String> {
        self.target_namespace.read().clone()
    }

    pub fn set_target_namespace(&self, namespace: Option<String>) {
        *self.target_namespace.write() = namespace;
    }

    /// The description this service was registered with.
    pub fn description(&self) -> Option<Arc<DescriptionInfo>> {
        self.description.read().upgrade()
    }

    pub(crate) fn set_description(&self, description: Weak<DescriptionInfo>) {
        *self.description.write() = description;
    }

    // ── Interface ────────────────────────────────────────────────────

    /// Create the service's interface, replacing any previous one.
    pub fn create_interface(&self, name: QName) -> Arc<InterfaceInfo> {
        let interface = InterfaceInfo::new(self.me.clone(), name);
        *self.interface.write() = Some(Arc::clone(&interface));
        interface
    }

    pub fn interface(&self) -> Option<Arc<InterfaceInfo>> {
        self.interface.read().clone()
    }

    // ── Bindings ─────────────────────────────────────────────────────

    /// Register a binding. A binding with the same name is replaced.
    pub fn add_binding(&self, binding: Arc<BindingInfo>) {
        let name = binding.name();
        let mut bindings = self.bindings.write();
        match bindings.iter_mut().find(|b| b.name() == name) {
            Some(slot) => {
                trace!(service = %self.name(), binding = %name, "replaced binding");
                *slot = binding;
            }
            None => {
                trace!(service = %self.name(), binding = %name, "added binding");
                bindings.push(binding);
            }
        }
    }

    pub fn binding(&self, name: &QName) -> Option<Arc<BindingInfo>> {
        self.bindings.read().iter().find(|b| b.name() == *name).cloned()
    }

    pub fn bindings(&self) -> Vec<Arc<BindingInfo>> {
        self.bindings.read().clone()
    }

    pub fn remove_binding(&self, name: &QName) -> Option<Arc<BindingInfo>> {
        let mut bindings = self.bindings.write();
        let index = bindings.iter().position(|b| b.name() == *name)?;
        Some(bindings.remove(index))
    }

    // ── Endpoints ────────────────────────────────────────────────────

    /// Register an endpoint. An endpoint with the same name is replaced.
    pub fn add_endpoint(&self, endpoint: Arc<EndpointInfo>) {
        let name = endpoint.name();
        let mut endpoints = self.endpoints.write();
        match endpoints.iter_mut().find(|e| e.name() == name) {
            Some(slot) => *slot = endpoint,
            None => endpoints.push(endpoint),
        }
        trace!(service = %self.name(), endpoint = %name, "registered endpoint");
    }

    pub fn endpoint(&self, name: &QName) -> Option<Arc<EndpointInfo>> {
        self.endpoints.read().iter().find(|e| e.name() == *name).cloned()
    }

    pub fn endpoints(&self) -> Vec<Arc<EndpointInfo>> {
        self.endpoints.read().clone()
    }

    pub fn remove_endpoint(&self, name: &QName) -> Option<Arc<EndpointInfo>> {
        let mut endpoints = self.endpoints.write();
        let index = endpoints.iter().position(|e| e.name() == *name)?;
        Some(endpoints.remove(index))
    }

    // ── Schemas ──────────────────────────────────────────────────────

    pub fn add_schema(&self, schema: Arc<SchemaInfo>) {
        self.schemas.write().push(schema);
    }

    /// The first schema for `namespace`.
    pub fn schema(&self, namespace: &str) -> Option<Arc<SchemaInfo>> {
        self.schemas
            .read()
            .iter()
            .find(|s| s.namespace_uri() == namespace)
            .cloned()
    }

    pub fn schemas(&self) -> Vec<Arc<SchemaInfo>> {
        self.schemas.read().clone()
    }

    /// Every schema for `namespace`; a namespace may be split across documents.
    pub fn schemas_for(&self, namespace: &str) -> Vec<Arc<SchemaInfo>> {
        self.schemas
            .read()
            .iter()
            .filter(|s| s.namespace_uri() == namespace)
            .cloned()
            .collect()
    }

    /// The schema declaring the element or type a part refers to.
    pub fn schema_for_part(&self, part: &MessagePartInfo) -> Option<Arc<SchemaInfo>> {
        let qname = part.schema_qname()?;
        self.schema(qname.namespace())
    }

    // ── Messages ─────────────────────────────────────────────────────

    /// Every operation's input and output message by name.
    pub fn messages(&self) -> Arc<MessageIndex> {
        self.messages.get_or_build(|| self.index_messages())
    }

    pub fn message(&self, name: &QName) -> Option<Arc<MessageInfo>> {
        self.messages().get(name).cloned()
    }

    /// Rebuild the message index and drop the wrapper-element indexes.
    pub fn refresh(&self) {
        self.messages.rebuild(|| self.index_messages());
        self.input_wrappers.invalidate();
        self.output_wrappers.invalidate();
    }

    fn index_messages(&self) -> MessageIndex {
        let mut messages = MessageIndex::new();
        if let Some(interface) = self.interface() {
            for operation in interface.operations() {
                for message in [operation.input(), operation.output()].into_iter().flatten() {
                    messages.insert(message.name(), message);
                }
            }
        }
        debug!(service = %self.name(), messages = messages.len(), "indexed messages");
        messages
    }

    pub(crate) fn wrapper_index(&self, direction: MessageDirection) -> &LazyIndex<WrapperIndex> {
        match direction {
            MessageDirection::Input => &self.input_wrappers,
            MessageDirection::Output => &self.output_wrappers,
        }
    }
}

impl PropertiesHolder for ServiceInfo {
    fn extensions(&self) -> &Extensions {
        &self.extensions
    }
}
