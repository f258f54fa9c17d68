//! Wrapper-element dispatch lookup.
//!
//! Routes an inbound wire element to the binding-operation that consumes it
//! (or, for responses, produces it). An unwrap-capable operation is keyed by
//! the first part of its message, which must be an element reference; later
//! parts such as attachments do not matter. Any other operation takes part
//! only when its message has exactly one part and that part is an element.
//!
//! The element → operation map is built once per service and direction and
//! is reset by [`ServiceInfo::refresh`].

use std::collections::hash_map::Entry;
use std::sync::Arc;

use tracing::{debug, warn};

use crate::base::QName;
use crate::model::{
    BindingOperationInfo, MessageContainer, MessageDirection, MessagePartInfo, ServiceInfo,
    WrapperIndex,
};

/// The binding-operation whose `direction` message is wrapped in `element`.
pub fn operation_for_wrapper_element(
    service: &ServiceInfo,
    element: &QName,
    direction: MessageDirection,
) -> Option<Arc<BindingOperationInfo>> {
    service
        .wrapper_index(direction)
        .get_or_build(|| index_wrappers(service, direction))
        .get(element)
        .cloned()
}

/// The wrapper element of a bare message: its only part, if that part is an
/// element.
pub fn wrapper_element(parts: &[Arc<MessagePartInfo>]) -> Option<QName> {
    match parts {
        [part] if part.is_element() => part.element_qname(),
        _ => None,
    }
}

fn index_wrappers(service: &ServiceInfo, direction: MessageDirection) -> WrapperIndex {
    let mut index = WrapperIndex::default();
    for binding in service.bindings() {
        for operation in binding.operations() {
            let Some(message) = operation.message(direction) else {
                continue;
            };
            let element = if operation.is_unwrapped_capable() {
                message
                    .message_info()
                    .message_part_by_index(0)
                    .filter(|part| part.is_element())
                    .and_then(|part| part.element_qname())
            } else {
                wrapper_element(&message.message_parts())
            };
            let Some(element) = element else {
                continue;
            };
            match index.entry(element) {
                Entry::Vacant(slot) => {
                    slot.insert(operation);
                }
                Entry::Occupied(slot) => {
                    // The same operation bound twice is expected; two
                    // operations sharing a wrapper cannot be told apart.
                    if !Arc::ptr_eq(slot.get().operation(), operation.operation()) {
                        warn!(
                            element = %slot.key(),
                            kept = %slot.get().name(),
                            ignored = %operation.name(),
                            "wrapper element claimed by two operations"
                        );
                    }
                }
            }
        }
    }
    debug!(service = %service.name(), ?direction, wrappers = index.len(), "indexed wrapper elements");
    index
}
