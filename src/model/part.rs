//! Message parts: the individual parameters of a message or fault.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Weak};

use parking_lot::RwLock;

use super::message::{FaultInfo, MessageInfo};
use super::properties::{Extensions, PropertiesHolder};
use crate::base::QName;

/// Back-reference from a part to the container that owns it.
#[derive(Clone, Debug, Default)]
pub enum PartOwner {
    Message(Weak<MessageInfo>),
    Fault(Weak<FaultInfo>),
    #[default]
    Detached,
}

#[derive(Clone, Debug, Default)]
struct PartShape {
    is_element: bool,
    element_qname: Option<QName>,
    type_qname: Option<QName>,
    concrete_name: Option<QName>,
}

/// One named part of a message or fault.
///
/// The name is fixed when the part is registered, and so is the index of a
/// named part. Out-of-band parts move when named parts are appended after
/// them, so their index is atomic. The shape (element or type reference,
/// concrete wire name) is filled in afterwards by the builder and may be
/// read concurrently.
#[derive(Debug)]
pub struct MessagePartInfo {
    name: QName,
    index: AtomicUsize,
    owner: PartOwner,
    shape: RwLock<PartShape>,
    extensions: Extensions,
}

impl MessagePartInfo {
    pub(crate) fn new(name: QName, index: usize, owner: PartOwner) -> Self {
        Self {
            name,
            index: AtomicUsize::new(index),
            owner,
            shape: RwLock::default(),
            extensions: Extensions::new(),
        }
    }

    /// The declared name of the part.
    pub fn name(&self) -> &QName {
        &self.name
    }

    /// Position of the part within its container.
    pub fn index(&self) -> usize {
        self.index.load(Ordering::Acquire)
    }

    pub(crate) fn set_index(&self, index: usize) {
        self.index.store(index, Ordering::Release);
    }

    /// The name the part carries on the wire.
    ///
    /// Defaults to the declared name.
    pub fn concrete_name(&self) -> QName {
        self.shape
            .read()
            .concrete_name
            .clone()
            .unwrap_or_else(|| self.name.clone())
    }

    pub fn set_concrete_name(&self, name: QName) {
        self.shape.write().concrete_name = Some(name);
    }

    /// True when the part refers to a schema element rather than a type.
    pub fn is_element(&self) -> bool {
        self.shape.read().is_element
    }

    pub fn set_element(&self, is_element: bool) {
        self.shape.write().is_element = is_element;
    }

    pub fn element_qname(&self) -> Option<QName> {
        self.shape.read().element_qname.clone()
    }

    pub fn set_element_qname(&self, name: Option<QName>) {
        self.shape.write().element_qname = name;
    }

    pub fn type_qname(&self) -> Option<QName> {
        self.shape.read().type_qname.clone()
    }

    pub fn set_type_qname(&self, name: Option<QName>) {
        self.shape.write().type_qname = name;
    }

    /// The element name for element parts, else the type name.
    pub fn schema_qname(&self) -> Option<QName> {
        let shape = self.shape.read();
        if shape.is_element {
            shape.element_qname.clone()
        } else {
            shape.type_qname.clone()
        }
    }

    /// The message owning this part, if it is a message part.
    pub fn message(&self) -> Option<Arc<MessageInfo>> {
        match &self.owner {
            PartOwner::Message(m) => m.upgrade(),
            _ => None,
        }
    }

    /// The fault owning this part, if it is a fault part.
    pub fn fault(&self) -> Option<Arc<FaultInfo>> {
        match &self.owner {
            PartOwner::Fault(f) => f.upgrade(),
            _ => None,
        }
    }
}

impl PropertiesHolder for MessagePartInfo {
    fn extensions(&self) -> &Extensions {
        &self.extensions
    }
}
