//! Tests for the service root: message index, endpoints, description.

use std::sync::Arc;

use svcmodel::{DescriptionInfo, EndpointInfo, MessageContainer, MessageDirection, PropertiesHolder};

use crate::helpers::greeter::{ADDRESS, HTTP_TRANSPORT, greeter, q, typed_message, types};

#[test]
fn test_message_index_covers_wrapped_messages() {
    let g = greeter();
    let messages = g.service.messages();
    // sayHi, greetMe and pingMe have two messages each; greetMeOneWay has one.
    assert_eq!(messages.len(), 7);
    let request = g.service.message(&q("greetMeRequest")).unwrap();
    assert!(Arc::ptr_eq(&request, &g.operation("greetMe").input().unwrap()));
    assert!(g.service.message(&q("greetMeOneWayResponse")).is_none());
}

#[test]
fn test_refresh_picks_up_new_operations() {
    let g = greeter();
    assert!(g.service.message(&q("pingAgainRequest")).is_none());

    let op = g.service.interface().unwrap().add_operation(q("pingAgain")).unwrap();
    op.set_input(
        None,
        Some(typed_message(&op, "pingAgainRequest", "in", types("MyStringType"), MessageDirection::Input)),
    );

    // The index is a snapshot until refreshed.
    assert!(g.service.message(&q("pingAgainRequest")).is_none());
    let before = g.service.messages();

    g.service.refresh();
    let after = g.service.messages();
    assert_eq!(after.len(), before.len() + 1);
    assert!(after.contains_key(&q("pingAgainRequest")));
}

#[test]
fn test_index_is_shared_between_reads() {
    let g = greeter();
    let first = g.service.messages();
    let second = g.service.messages();
    assert!(Arc::ptr_eq(&first, &second));
}

#[test]
fn test_endpoint_wiring() {
    let g = greeter();
    let endpoint = g.service.endpoint(&q("SoapPort")).unwrap();
    assert_eq!(endpoint.address().as_deref(), Some(ADDRESS));
    assert_eq!(endpoint.transport_id(), HTTP_TRANSPORT);
    assert!(Arc::ptr_eq(&endpoint.binding().unwrap(), &g.binding));
    assert!(Arc::ptr_eq(&endpoint.service().unwrap(), &g.service));
    assert_eq!(endpoint.interface().unwrap().name(), &q("Greeter"));
}

#[test]
fn test_endpoint_redefinition_replaces() {
    let g = greeter();
    let redefined = EndpointInfo::new(&g.service, HTTP_TRANSPORT, q("SoapPort"));
    redefined.set_address(Some("http://localhost:9001/SoapPort".into()));
    g.service.add_endpoint(redefined);

    assert_eq!(g.service.endpoints().len(), 1);
    assert!(g.service.endpoint(&q("SoapPort")).unwrap().binding().is_none());
}

#[test]
fn test_endpoint_traverses_scopes() {
    #[derive(Debug, PartialEq)]
    struct Addressing(&'static str);

    let g = greeter();
    assert!(g.endpoint.traversed_extensor::<Addressing>(None).is_none());

    g.service.add_extensor(Arc::new(Addressing("service")));
    assert_eq!(*g.endpoint.traversed_extensor::<Addressing>(None).unwrap(), Addressing("service"));

    g.binding.add_extensor(Arc::new(Addressing("binding")));
    assert_eq!(*g.endpoint.traversed_extensor::<Addressing>(None).unwrap(), Addressing("binding"));

    g.endpoint.add_extensor(Arc::new(Addressing("endpoint")));
    assert_eq!(*g.endpoint.traversed_extensor::<Addressing>(None).unwrap(), Addressing("endpoint"));
}

#[test]
fn test_binding_does_not_traverse_to_service() {
    #[derive(Debug)]
    struct Policy;

    let g = greeter();
    g.service.add_extensor(Arc::new(Policy));
    assert!(g.binding.traversed_extensor::<Policy>(None).is_none());
    assert!(g.binding.traversed_extensor(Some(Arc::new(Policy))).is_some());
}

#[test]
fn test_schema_for_part() {
    let g = greeter();
    let part = g.operation("sayHi").input().unwrap().first_message_part().unwrap();
    let schema = g.service.schema_for_part(&part).unwrap();
    assert!(schema.is_element_form_qualified());
    assert!(!schema.is_attribute_form_qualified());
}

#[test]
fn test_description_owns_services() {
    let g = greeter();
    let description = DescriptionInfo::new();
    description.add_service(Arc::clone(&g.service));
    let service = description.service(&q("SOAPService")).unwrap();
    assert!(Arc::ptr_eq(&service.description().unwrap(), &description));
    assert_eq!(service.target_namespace().as_deref(), Some(crate::helpers::greeter::NS));
}

#[test]
fn test_dropping_service_releases_graph() {
    let g = greeter();
    let interface = Arc::downgrade(&g.service.interface().unwrap());
    let binding = Arc::downgrade(&g.binding);
    let op = Arc::downgrade(&g.operation("greetMe"));
    drop(g);
    assert!(interface.upgrade().is_none());
    assert!(binding.upgrade().is_none());
    assert!(op.upgrade().is_none());
}
