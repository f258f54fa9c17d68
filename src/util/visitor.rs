//! Visitor pattern for service model traversal.

use crate::model::{
    FaultInfo, InterfaceInfo, MessageContainer, MessageInfo, MessagePartInfo, OperationInfo,
    ServiceInfo,
};

/// Visitor trait for the abstract side of a service.
///
/// Implement this trait to act on nodes while [`walk`] traverses a service.
/// Default implementations are no-ops.
pub trait ServiceModelVisitor {
    fn begin_service(&mut self, _service: &ServiceInfo) {}
    fn end_service(&mut self, _service: &ServiceInfo) {}
    fn begin_interface(&mut self, _interface: &InterfaceInfo) {}
    fn end_interface(&mut self, _interface: &InterfaceInfo) {}
    fn begin_operation(&mut self, _operation: &OperationInfo) {}
    fn end_operation(&mut self, _operation: &OperationInfo) {}
    fn begin_message(&mut self, _message: &MessageInfo) {}
    fn end_message(&mut self, _message: &MessageInfo) {}
    fn begin_part(&mut self, _part: &MessagePartInfo) {}
    fn end_part(&mut self, _part: &MessagePartInfo) {}
    fn begin_fault(&mut self, _fault: &FaultInfo) {}
    fn end_fault(&mut self, _fault: &FaultInfo) {}
}

/// Walk `service` depth-first.
///
/// Each operation visits its input, output and faults, then its unwrapped
/// view (if any) before the operation ends.
pub fn walk<V: ServiceModelVisitor + ?Sized>(service: &ServiceInfo, visitor: &mut V) {
    visitor.begin_service(service);
    if let Some(interface) = service.interface() {
        visitor.begin_interface(&interface);
        for operation in interface.operations() {
            walk_operation(&operation, visitor);
        }
        visitor.end_interface(&interface);
    }
    visitor.end_service(service);
}

fn walk_operation<V: ServiceModelVisitor + ?Sized>(operation: &OperationInfo, visitor: &mut V) {
    visitor.begin_operation(operation);
    for message in [operation.input(), operation.output()].into_iter().flatten() {
        visitor.begin_message(&message);
        walk_parts(&*message, visitor);
        visitor.end_message(&message);
    }
    for fault in operation.faults() {
        visitor.begin_fault(&fault);
        walk_parts(&*fault, visitor);
        visitor.end_fault(&fault);
    }
    if let Some(unwrapped) = operation.unwrapped_operation() {
        walk_operation(&unwrapped, visitor);
    }
    visitor.end_operation(operation);
}

fn walk_parts<V: ServiceModelVisitor + ?Sized>(container: &impl MessageContainer, visitor: &mut V) {
    for part in container.message_parts() {
        visitor.begin_part(&part);
        visitor.end_part(&part);
    }
}
