//! Bindings: the protocol-specific shadow of the abstract operation graph.
//!
//! A [`BindingInfo`] holds one [`BindingOperationInfo`] per bound abstract
//! operation. Each binding-operation mirrors the operation's input, output and
//! faults with [`BindingMessageInfo`] / [`BindingFaultInfo`] nodes that carry
//! the binding's own extensors, and holds the abstract nodes by reference.
//!
//! ## Name matching
//!
//! [`BindingInfo::build_operation`] resolves a binding's `<operation>` entry
//! against the interface by operation name plus input/output names. A
//! contract may omit message names; in that case the conventional defaults
//! `<operation>Request` and `<operation>Response` are compared instead.

use std::sync::{Arc, OnceLock, Weak};

use indexmap::IndexMap;
use parking_lot::RwLock;
use smol_str::SmolStr;
use tracing::{debug, trace};

use super::container::MessageContainer;
use super::error::{ModelError, Result, require_name};
use super::interface::InterfaceInfo;
use super::message::{FaultInfo, MessageDirection, MessageInfo};
use super::operation::OperationInfo;
use super::part::MessagePartInfo;
use super::properties::{Extensions, PropertiesHolder};
use super::service::ServiceInfo;
use crate::base::QName;
use crate::base::constants::{DEFAULT_INPUT_SUFFIX, DEFAULT_OUTPUT_SUFFIX};

// ============================================================================
// BINDING
// ============================================================================

/// A concrete protocol/encoding binding of the service interface.
#[derive(Debug)]
pub struct BindingInfo {
    me: Weak<BindingInfo>,
    binding_id: SmolStr,
    name: RwLock<QName>,
    service: Weak<ServiceInfo>,
    operations: RwLock<IndexMap<QName, Arc<BindingOperationInfo>>>,
    extensions: Extensions,
}

impl BindingInfo {
    /// Create a binding for `service`. The binding is not registered until
    /// passed to [`ServiceInfo::add_binding`].
    pub fn new(service: &Arc<ServiceInfo>, binding_id: impl Into<SmolStr>, name: QName) -> Arc<Self> {
        Arc::new_cyclic(|me| Self {
            me: me.clone(),
            binding_id: binding_id.into(),
            name: RwLock::new(name),
            service: Arc::downgrade(service),
            operations: RwLock::default(),
            extensions: Extensions::new(),
        })
    }

    /// The protocol identifier (typically the binding extension namespace).
    pub fn binding_id(&self) -> &str {
        &self.binding_id
    }

    pub fn name(&self) -> QName {
        self.name.read().clone()
    }

    pub fn set_name(&self, name: QName) {
        *self.name.write() = name;
    }

    pub fn service(&self) -> Option<Arc<ServiceInfo>> {
        self.service.upgrade()
    }

    pub fn interface(&self) -> Option<Arc<InterfaceInfo>> {
        self.service()?.interface()
    }

    /// Find the abstract operation matching `name`, `input_name` and
    /// `output_name` and wrap it in a new binding-operation.
    ///
    /// The result is not registered; pass it to [`add_operation`](Self::add_operation).
    /// Returns `None` when no operation matches.
    pub fn build_operation(
        &self,
        name: &QName,
        input_name: Option<&str>,
        output_name: Option<&str>,
    ) -> Option<Arc<BindingOperationInfo>> {
        let interface = self.interface()?;
        let operation = interface.operations().into_iter().find(|op| {
            let local = op.name().local_part();
            op.name() == name
                && names_match(
                    op.input_name().as_deref(),
                    input_name,
                    &format!("{local}{DEFAULT_INPUT_SUFFIX}"),
                )
                && names_match(
                    op.output_name().as_deref(),
                    output_name,
                    &format!("{local}{DEFAULT_OUTPUT_SUFFIX}"),
                )
        })?;
        Some(self.create_operation(&operation))
    }

    /// Wrap `operation` in a new, unregistered binding-operation.
    pub fn create_operation(&self, operation: &Arc<OperationInfo>) -> Arc<BindingOperationInfo> {
        BindingOperationInfo::new(self.me.clone(), Arc::clone(operation), None)
    }

    /// Register a binding-operation under its operation name.
    pub fn add_operation(&self, operation: Arc<BindingOperationInfo>) -> Result<()> {
        let name = operation.name().clone();
        require_name(&name, "binding operation")?;
        let mut operations = self.operations.write();
        if operations.contains_key(&name) {
            return Err(ModelError::duplicate_operation(name, self.name()));
        }
        trace!(binding = %self.name(), operation = %name, "added binding operation");
        operations.insert(name, operation);
        Ok(())
    }

    pub fn operation(&self, name: &QName) -> Option<Arc<BindingOperationInfo>> {
        self.operations.read().get(name).cloned()
    }

    /// The binding view of an abstract operation.
    ///
    /// Matches on identity. If `operation` is the unwrapped view of a bound
    /// operation, the unwrapped binding-operation is returned.
    pub fn operation_for(&self, operation: &OperationInfo) -> Option<Arc<BindingOperationInfo>> {
        let operations = self.operations.read();
        for bop in operations.values() {
            if std::ptr::eq(Arc::as_ptr(bop.operation()), operation) {
                return Some(Arc::clone(bop));
            }
            if bop.is_unwrapped_capable() {
                if let Some(unwrapped) = bop.unwrapped_operation() {
                    if std::ptr::eq(Arc::as_ptr(unwrapped.operation()), operation) {
                        return Some(unwrapped);
                    }
                }
            }
        }
        None
    }

    pub fn operations(&self) -> Vec<Arc<BindingOperationInfo>> {
        self.operations.read().values().cloned().collect()
    }

    pub fn remove_operation(&self, name: &QName) -> Option<Arc<BindingOperationInfo>> {
        self.operations.write().shift_remove(name)
    }
}

impl PropertiesHolder for BindingInfo {
    fn extensions(&self) -> &Extensions {
        &self.extensions
    }
}

/// Compare a declared input/output name against the name a binding supplies.
///
/// An undeclared name matches anything. An omitted supplied name is replaced
/// by the conventional default. An empty supplied name is compared as is.
fn names_match(declared: Option<&str>, supplied: Option<&str>, default: &str) -> bool {
    match (declared, supplied) {
        (None, _) => true,
        (Some(declared), None) => declared == default,
        (Some(declared), Some(supplied)) => declared == supplied,
    }
}

// ============================================================================
// BINDING OPERATION
// ============================================================================

/// The binding view of one abstract operation.
#[derive(Debug)]
pub struct BindingOperationInfo {
    me: Weak<BindingOperationInfo>,
    binding: Weak<BindingInfo>,
    operation: Arc<OperationInfo>,
    input: Option<Arc<BindingMessageInfo>>,
    output: Option<Arc<BindingMessageInfo>>,
    faults: IndexMap<QName, Arc<BindingFaultInfo>>,
    unwrapped: OnceLock<Arc<BindingOperationInfo>>,
    wrapped: Option<Weak<BindingOperationInfo>>,
    extensions: Extensions,
}

impl BindingOperationInfo {
    fn new(
        binding: Weak<BindingInfo>,
        operation: Arc<OperationInfo>,
        wrapped: Option<Weak<BindingOperationInfo>>,
    ) -> Arc<Self> {
        Arc::new_cyclic(|me| {
            let input = operation
                .input()
                .map(|m| Arc::new(BindingMessageInfo::new(m, me.clone())));
            let output = operation
                .output()
                .map(|m| Arc::new(BindingMessageInfo::new(m, me.clone())));
            let faults = operation
                .faults()
                .into_iter()
                .map(|f| {
                    let name = f.fault_name().clone();
                    (name, Arc::new(BindingFaultInfo::new(f, me.clone())))
                })
                .collect();
            let unwrapped = operation
                .unwrapped_operation()
                .map(|op| OnceLock::from(Self::new(binding.clone(), op, Some(me.clone()))))
                .unwrap_or_default();
            Self {
                me: me.clone(),
                binding,
                operation,
                input,
                output,
                faults,
                unwrapped,
                wrapped,
                extensions: Extensions::new(),
            }
        })
    }

    /// The name of the abstract operation.
    pub fn name(&self) -> &QName {
        self.operation.name()
    }

    pub fn operation(&self) -> &Arc<OperationInfo> {
        &self.operation
    }

    pub fn binding(&self) -> Option<Arc<BindingInfo>> {
        self.binding.upgrade()
    }

    pub fn input(&self) -> Option<Arc<BindingMessageInfo>> {
        self.input.clone()
    }

    pub fn output(&self) -> Option<Arc<BindingMessageInfo>> {
        self.output.clone()
    }

    /// The binding message for `direction`.
    pub fn message(&self, direction: MessageDirection) -> Option<Arc<BindingMessageInfo>> {
        match direction {
            MessageDirection::Input => self.input(),
            MessageDirection::Output => self.output(),
        }
    }

    pub fn fault(&self, name: &QName) -> Option<Arc<BindingFaultInfo>> {
        self.faults.get(name).cloned()
    }

    pub fn faults(&self) -> Vec<Arc<BindingFaultInfo>> {
        self.faults.values().cloned().collect()
    }

    pub fn is_unwrapped_capable(&self) -> bool {
        self.operation.is_unwrapped_capable()
    }

    pub fn is_unwrapped(&self) -> bool {
        self.operation.is_unwrapped()
    }

    /// The unwrapped companion, if it has been built.
    pub fn unwrapped_operation(&self) -> Option<Arc<BindingOperationInfo>> {
        self.unwrapped.get().cloned()
    }

    /// Build the unwrapped companion if the abstract operation gained an
    /// unwrapped view after this binding-operation was created.
    ///
    /// Idempotent: the companion is built at most once.
    pub fn ensure_unwrapped_operation(&self) -> Option<Arc<BindingOperationInfo>> {
        if let Some(unwrapped) = self.unwrapped.get() {
            return Some(Arc::clone(unwrapped));
        }
        let unwrapped_op = self.operation.unwrapped_operation()?;
        let unwrapped = self.unwrapped.get_or_init(|| {
            debug!(operation = %self.name(), "built unwrapped binding operation");
            Self::new(self.binding.clone(), unwrapped_op, Some(self.me.clone()))
        });
        Some(Arc::clone(unwrapped))
    }

    /// For an unwrapped companion, the binding-operation it belongs to.
    pub fn wrapped_operation(&self) -> Option<Arc<BindingOperationInfo>> {
        self.wrapped.as_ref()?.upgrade()
    }
}

impl PropertiesHolder for BindingOperationInfo {
    fn extensions(&self) -> &Extensions {
        &self.extensions
    }
}

// ============================================================================
// BINDING MESSAGE / FAULT
// ============================================================================

/// The binding view of an operation's input or output.
#[derive(Debug)]
pub struct BindingMessageInfo {
    message: Arc<MessageInfo>,
    operation: Weak<BindingOperationInfo>,
    extensions: Extensions,
}

impl BindingMessageInfo {
    fn new(message: Arc<MessageInfo>, operation: Weak<BindingOperationInfo>) -> Self {
        Self {
            message,
            operation,
            extensions: Extensions::new(),
        }
    }

    pub fn message_info(&self) -> &Arc<MessageInfo> {
        &self.message
    }

    pub fn binding_operation(&self) -> Option<Arc<BindingOperationInfo>> {
        self.operation.upgrade()
    }

    pub fn direction(&self) -> MessageDirection {
        self.message.direction()
    }

    /// The parts of the abstract message.
    pub fn message_parts(&self) -> Vec<Arc<MessagePartInfo>> {
        self.message.message_parts()
    }
}

impl PropertiesHolder for BindingMessageInfo {
    fn extensions(&self) -> &Extensions {
        &self.extensions
    }
}

/// The binding view of an operation fault.
#[derive(Debug)]
pub struct BindingFaultInfo {
    fault: Arc<FaultInfo>,
    operation: Weak<BindingOperationInfo>,
    extensions: Extensions,
}

impl BindingFaultInfo {
    fn new(fault: Arc<FaultInfo>, operation: Weak<BindingOperationInfo>) -> Self {
        Self {
            fault,
            operation,
            extensions: Extensions::new(),
        }
    }

    pub fn fault_info(&self) -> &Arc<FaultInfo> {
        &self.fault
    }

    pub fn fault_name(&self) -> &QName {
        self.fault.fault_name()
    }

    pub fn binding_operation(&self) -> Option<Arc<BindingOperationInfo>> {
        self.operation.upgrade()
    }

    /// The parts of the abstract fault.
    pub fn message_parts(&self) -> Vec<Arc<MessagePartInfo>> {
        self.fault.message_parts()
    }
}

impl PropertiesHolder for BindingFaultInfo {
    fn extensions(&self) -> &Extensions {
        &self.extensions
    }
}
