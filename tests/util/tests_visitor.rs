//! Tests for walking a built service.

use svcmodel::{
    FaultInfo, InterfaceInfo, MessageInfo, MessagePartInfo, OperationInfo, ServiceInfo,
    ServiceModelVisitor, walk,
};

use crate::helpers::greeter::greeter;

#[derive(Default)]
struct Counter {
    services: usize,
    interfaces: usize,
    operations: usize,
    unwrapped: usize,
    messages: usize,
    parts: usize,
    faults: usize,
    depth: isize,
}

impl ServiceModelVisitor for Counter {
    fn begin_service(&mut self, _service: &ServiceInfo) {
        self.services += 1;
    }
    fn begin_interface(&mut self, _interface: &InterfaceInfo) {
        self.interfaces += 1;
    }
    fn begin_operation(&mut self, operation: &OperationInfo) {
        self.depth += 1;
        if operation.is_unwrapped() {
            self.unwrapped += 1;
        } else {
            self.operations += 1;
        }
    }
    fn end_operation(&mut self, _operation: &OperationInfo) {
        self.depth -= 1;
    }
    fn begin_message(&mut self, _message: &MessageInfo) {
        self.messages += 1;
    }
    fn begin_part(&mut self, _part: &MessagePartInfo) {
        self.parts += 1;
    }
    fn begin_fault(&mut self, _fault: &FaultInfo) {
        self.faults += 1;
    }
}

#[test]
fn test_walk_counts_greeter() {
    let g = greeter();
    let mut counter = Counter::default();
    walk(&g.service, &mut counter);

    assert_eq!(counter.services, 1);
    assert_eq!(counter.interfaces, 1);
    assert_eq!(counter.operations, 4);
    assert_eq!(counter.unwrapped, 1);
    // Seven wrapped messages plus the two unwrapped greetMe messages.
    assert_eq!(counter.messages, 9);
    // One part per message plus pingMe's fault detail.
    assert_eq!(counter.parts, 10);
    assert_eq!(counter.faults, 1);
    assert_eq!(counter.depth, 0);
}

#[test]
fn test_walk_through_trait_object() {
    let g = greeter();
    let mut counter = Counter::default();
    let visitor: &mut dyn ServiceModelVisitor = &mut counter;
    walk(&g.service, visitor);
    assert_eq!(counter.operations, 4);
}
