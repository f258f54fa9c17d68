//! Abstract operations and their wrapped/unwrapped views.
//!
//! ## Two views of one operation
//!
//! ```text
//!  wrapped OperationInfo ──unwrapped──▶ unwrapped OperationInfo
//!        │      ▲                              │
//!        │      └──────wrapped (Weak)──────────┤
//!        ▼                                     ▼
//!   OperationMetadata (faults, properties, extensors) ◀── shared Arc
//! ```
//!
//! The wrapped view is what the contract declares: parameters bundled into a
//! single wrapper element. The unwrapped view promotes each child of the
//! wrapper to its own part. Both views hold the same `OperationMetadata`, so
//! a fault, property or extensor added through either is seen by both. Only
//! the input and output messages belong to each view separately.

use std::sync::{Arc, Weak};

use indexmap::IndexMap;
use parking_lot::RwLock;
use smol_str::SmolStr;
use tracing::{debug, trace};

use super::error::{ModelError, Result, require_name};
use super::interface::InterfaceInfo;
use super::message::{FaultInfo, MessageDirection, MessageInfo};
use super::properties::{Extensions, PropertiesHolder};
use crate::base::QName;

/// Metadata owned by the wrapped operation and shared with its unwrapped view.
#[derive(Debug)]
struct OperationMetadata {
    /// The wrapped operation; owner of every fault.
    owner: Weak<OperationInfo>,
    faults: RwLock<IndexMap<QName, Arc<FaultInfo>>>,
    extensions: Extensions,
}

#[derive(Debug, Default)]
struct OperationIo {
    input: Option<Arc<MessageInfo>>,
    input_name: Option<SmolStr>,
    output: Option<Arc<MessageInfo>>,
    output_name: Option<SmolStr>,
}

/// One abstract operation of an interface.
#[derive(Debug)]
pub struct OperationInfo {
    me: Weak<OperationInfo>,
    name: QName,
    interface: Weak<InterfaceInfo>,
    metadata: Arc<OperationMetadata>,
    io: RwLock<OperationIo>,
    parameter_ordering: RwLock<Option<Vec<String>>>,
    unwrapped: RwLock<Option<Arc<OperationInfo>>>,
    wrapped: Option<Weak<OperationInfo>>,
}

impl OperationInfo {
    pub(crate) fn new(interface: Weak<InterfaceInfo>, name: QName) -> Arc<Self> {
        Arc::new_cyclic(|me| Self {
            me: me.clone(),
            name,
            interface,
            metadata: Arc::new(OperationMetadata {
                owner: me.clone(),
                faults: RwLock::default(),
                extensions: Extensions::new(),
            }),
            io: RwLock::default(),
            parameter_ordering: RwLock::default(),
            unwrapped: RwLock::default(),
            wrapped: None,
        })
    }

    pub fn name(&self) -> &QName {
        &self.name
    }

    pub fn interface(&self) -> Option<Arc<InterfaceInfo>> {
        self.interface.upgrade()
    }

    // ── Messages ─────────────────────────────────────────────────────

    /// Create a message owned by this operation.
    ///
    /// The message is not attached; pass it to [`set_input`](Self::set_input)
    /// or [`set_output`](Self::set_output).
    pub fn create_message(&self, name: QName, direction: MessageDirection) -> Arc<MessageInfo> {
        MessageInfo::new(self.me.clone(), direction, name)
    }

    /// Attach (or clear) the input message.
    ///
    /// `name` is the name given to the input in the contract, if any; binding
    /// construction matches on it.
    pub fn set_input(&self, name: Option<&str>, message: Option<Arc<MessageInfo>>) {
        let mut io = self.io.write();
        io.input_name = name.map(SmolStr::new);
        io.input = message;
    }

    /// Attach (or clear) the output message.
    pub fn set_output(&self, name: Option<&str>, message: Option<Arc<MessageInfo>>) {
        let mut io = self.io.write();
        io.output_name = name.map(SmolStr::new);
        io.output = message;
    }

    pub fn input(&self) -> Option<Arc<MessageInfo>> {
        self.io.read().input.clone()
    }

    pub fn input_name(&self) -> Option<SmolStr> {
        self.io.read().input_name.clone()
    }

    pub fn has_input(&self) -> bool {
        self.io.read().input.is_some()
    }

    pub fn output(&self) -> Option<Arc<MessageInfo>> {
        self.io.read().output.clone()
    }

    pub fn output_name(&self) -> Option<SmolStr> {
        self.io.read().output_name.clone()
    }

    pub fn has_output(&self) -> bool {
        self.io.read().output.is_some()
    }

    /// An input and no output.
    pub fn is_one_way(&self) -> bool {
        let io = self.io.read();
        io.input.is_some() && io.output.is_none()
    }

    // ── Faults ───────────────────────────────────────────────────────

    /// Register a fault. Fault names are unique per operation.
    pub fn add_fault(&self, name: QName, message_name: QName) -> Result<Arc<FaultInfo>> {
        require_name(&name, "fault")?;
        let mut faults = self.metadata.faults.write();
        if faults.contains_key(&name) {
            return Err(ModelError::duplicate_fault(name, self.name.clone()));
        }
        let fault = FaultInfo::new(self.metadata.owner.clone(), name.clone(), message_name);
        trace!(operation = %self.name, fault = %name, "added fault");
        faults.insert(name, Arc::clone(&fault));
        Ok(fault)
    }

    pub fn fault(&self, name: &QName) -> Option<Arc<FaultInfo>> {
        self.metadata.faults.read().get(name).cloned()
    }

    pub fn faults(&self) -> Vec<Arc<FaultInfo>> {
        self.metadata.faults.read().values().cloned().collect()
    }

    pub fn has_faults(&self) -> bool {
        !self.metadata.faults.read().is_empty()
    }

    pub fn remove_fault(&self, name: &QName) -> Option<Arc<FaultInfo>> {
        self.metadata.faults.write().shift_remove(name)
    }

    // ── Parameter ordering ───────────────────────────────────────────

    pub fn parameter_ordering(&self) -> Option<Vec<String>> {
        self.parameter_ordering.read().clone()
    }

    pub fn set_parameter_ordering(&self, ordering: Option<Vec<String>>) {
        *self.parameter_ordering.write() = ordering;
    }

    // ── Wrapped / unwrapped views ────────────────────────────────────

    /// Create the unwrapped view of this operation and attach it.
    ///
    /// The view is built once: later calls return the attached view, so
    /// binding-operations built against it stay valid. A new view shares
    /// this operation's faults, properties and extensors and starts with
    /// no messages of its own.
    pub fn create_unwrapped_operation(&self) -> Arc<OperationInfo> {
        let mut slot = self.unwrapped.write();
        if let Some(existing) = slot.as_ref() {
            return Arc::clone(existing);
        }
        let unwrapped = Arc::new_cyclic(|me| Self {
            me: me.clone(),
            name: self.name.clone(),
            interface: self.interface.clone(),
            metadata: Arc::clone(&self.metadata),
            io: RwLock::default(),
            parameter_ordering: RwLock::new(self.parameter_ordering()),
            unwrapped: RwLock::default(),
            wrapped: Some(self.me.clone()),
        });
        *slot = Some(Arc::clone(&unwrapped));
        debug!(operation = %self.name, "created unwrapped operation");
        unwrapped
    }

    pub fn unwrapped_operation(&self) -> Option<Arc<OperationInfo>> {
        self.unwrapped.read().clone()
    }

    /// True when an unwrapped view exists.
    pub fn is_unwrapped_capable(&self) -> bool {
        self.unwrapped.read().is_some()
    }

    /// True for the unwrapped view itself.
    pub fn is_unwrapped(&self) -> bool {
        self.wrapped.is_some()
    }

    /// The operation this view was unwrapped from.
    pub fn wrapped_operation(&self) -> Option<Arc<OperationInfo>> {
        self.wrapped.as_ref()?.upgrade()
    }
}

impl PropertiesHolder for OperationInfo {
    fn extensions(&self) -> &Extensions {
        &self.metadata.extensions
    }
}
