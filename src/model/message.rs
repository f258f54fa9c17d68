//! Input/output messages and faults of an abstract operation.

use std::sync::{Arc, Weak};

use parking_lot::RwLock;

use super::container::{MessageContainer, MessagePartContainer};
use super::operation::OperationInfo;
use super::part::PartOwner;
use super::properties::{Extensions, PropertiesHolder};
use crate::base::QName;

/// Whether a message flows into or out of an operation.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum MessageDirection {
    Input,
    Output,
}

impl MessageDirection {
    pub fn is_input(self) -> bool {
        matches!(self, Self::Input)
    }

    pub fn is_output(self) -> bool {
        matches!(self, Self::Output)
    }
}

/// The payload shape of an operation's input or output.
#[derive(Debug)]
pub struct MessageInfo {
    name: RwLock<QName>,
    direction: MessageDirection,
    operation: Weak<OperationInfo>,
    parts: MessagePartContainer,
    extensions: Extensions,
}

impl MessageInfo {
    pub(crate) fn new(
        operation: Weak<OperationInfo>,
        direction: MessageDirection,
        name: QName,
    ) -> Arc<Self> {
        Arc::new_cyclic(|me| Self {
            name: RwLock::new(name),
            direction,
            operation,
            parts: MessagePartContainer::new(PartOwner::Message(me.clone())),
            extensions: Extensions::new(),
        })
    }

    pub fn name(&self) -> QName {
        self.name.read().clone()
    }

    pub fn set_name(&self, name: QName) {
        *self.name.write() = name;
    }

    pub fn direction(&self) -> MessageDirection {
        self.direction
    }
}

impl PropertiesHolder for MessageInfo {
    fn extensions(&self) -> &Extensions {
        &self.extensions
    }
}

impl MessageContainer for MessageInfo {
    fn part_container(&self) -> &MessagePartContainer {
        &self.parts
    }

    fn operation(&self) -> Option<Arc<OperationInfo>> {
        self.operation.upgrade()
    }
}

/// A fault an operation may raise.
///
/// Keyed in the operation's fault table by its fault name; the message name
/// identifies the payload shape and may change through [`set_name`](Self::set_name).
#[derive(Debug)]
pub struct FaultInfo {
    fault_name: QName,
    message_name: RwLock<QName>,
    operation: Weak<OperationInfo>,
    parts: MessagePartContainer,
    extensions: Extensions,
}

impl FaultInfo {
    pub(crate) fn new(
        operation: Weak<OperationInfo>,
        fault_name: QName,
        message_name: QName,
    ) -> Arc<Self> {
        Arc::new_cyclic(|me| Self {
            fault_name,
            message_name: RwLock::new(message_name),
            operation,
            parts: MessagePartContainer::new(PartOwner::Fault(me.clone())),
            extensions: Extensions::new(),
        })
    }

    pub fn fault_name(&self) -> &QName {
        &self.fault_name
    }

    /// The name of the fault's message.
    pub fn name(&self) -> QName {
        self.message_name.read().clone()
    }

    pub fn set_name(&self, name: QName) {
        *self.message_name.write() = name;
    }
}

impl PropertiesHolder for FaultInfo {
    fn extensions(&self) -> &Extensions {
        &self.extensions
    }
}

impl MessageContainer for FaultInfo {
    fn part_container(&self) -> &MessagePartContainer {
        &self.parts
    }

    fn operation(&self) -> Option<Arc<OperationInfo>> {
        self.operation.upgrade()
    }
}
