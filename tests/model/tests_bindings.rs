//! Tests for binding construction and lookup.

use std::sync::Arc;

use rstest::rstest;
use svcmodel::{BindingInfo, MessageDirection, ModelError, PropertiesHolder, QName};

use crate::helpers::greeter::{SOAP_BINDING, greeter, q};

#[rstest]
#[case::defaults_substituted(None, None, None, None, true)]
#[case::declared_defaults(Some("echoRequest"), Some("echoResponse"), None, None, true)]
#[case::wrong_input_default(Some("echoInput"), None, None, None, false)]
#[case::wrong_output_default(None, Some("echoOutput"), None, None, false)]
#[case::explicit_names(Some("echoInput"), Some("echoOutput"), Some("echoInput"), Some("echoOutput"), true)]
#[case::explicit_mismatch(Some("echoInput"), None, Some("echoRequest"), None, false)]
#[case::empty_compared_literally(Some(""), None, Some(""), None, true)]
#[case::empty_not_defaulted(Some("echoRequest"), None, Some(""), None, false)]
fn test_build_operation_name_matching(
    #[case] declared_input: Option<&str>,
    #[case] declared_output: Option<&str>,
    #[case] input: Option<&str>,
    #[case] output: Option<&str>,
    #[case] matches: bool,
) {
    let g = greeter();
    let op = g.service.interface().unwrap().add_operation(q("echo")).unwrap();
    op.set_input(declared_input, Some(op.create_message(q("in"), MessageDirection::Input)));
    op.set_output(declared_output, Some(op.create_message(q("out"), MessageDirection::Output)));

    let built = g.binding.build_operation(&q("echo"), input, output);
    assert_eq!(built.is_some(), matches);
    if let Some(bop) = built {
        assert!(Arc::ptr_eq(bop.operation(), &op));
        // Building does not register.
        assert!(g.binding.operation(&q("echo")).is_none());
    }
}

#[test]
fn test_build_operation_unknown_name() {
    let g = greeter();
    assert!(g.binding.build_operation(&q("missing"), None, None).is_none());
}

#[test]
fn test_duplicate_binding_operation_rejected() {
    let g = greeter();
    let op = g.operation("sayHi");
    let err = g.binding.add_operation(g.binding.create_operation(&op)).unwrap_err();
    assert!(err.is_conflict());
    assert_eq!(err, ModelError::duplicate_operation(q("sayHi"), q("Greeter_SOAPBinding")));
    assert_eq!(g.binding.operations().len(), 4);
}

#[test]
fn test_duplicate_binding_replaces() {
    let g = greeter();
    let replacement = BindingInfo::new(&g.service, SOAP_BINDING, q("Greeter_SOAPBinding"));
    g.service.add_binding(Arc::clone(&replacement));

    assert_eq!(g.service.bindings().len(), 1);
    let current = g.service.binding(&q("Greeter_SOAPBinding")).unwrap();
    assert!(Arc::ptr_eq(&current, &replacement));
    assert!(current.operations().is_empty());
}

#[test]
fn test_binding_rename_then_readd() {
    let g = greeter();
    g.binding.set_name(q("Renamed"));
    assert!(g.service.binding(&q("Greeter_SOAPBinding")).is_none());
    assert!(g.service.binding(&q("Renamed")).is_some());
    assert!(g.service.remove_binding(&q("Renamed")).is_some());
    assert!(g.service.bindings().is_empty());
}

#[test]
fn test_lookup_from_abstract_operation() {
    let g = greeter();
    let wrapped = g.operation("greetMe");
    let unwrapped = wrapped.unwrapped_operation().unwrap();

    let bop = g.binding.operation_for(&wrapped).unwrap();
    assert!(!bop.is_unwrapped());
    assert!(Arc::ptr_eq(bop.operation(), &wrapped));

    let ubop = g.binding.operation_for(&unwrapped).unwrap();
    assert!(ubop.is_unwrapped());
    assert!(Arc::ptr_eq(ubop.operation(), &unwrapped));
    assert!(Arc::ptr_eq(&ubop.wrapped_operation().unwrap(), &bop));
    assert!(Arc::ptr_eq(&bop.unwrapped_operation().unwrap(), &ubop));
}

#[test]
fn test_lookup_from_foreign_operation_is_absent() {
    let g = greeter();
    let other = greeter();
    assert!(g.binding.operation_for(&other.operation("sayHi")).is_none());
}

#[test]
fn test_unwrapped_companion_only_when_capable() {
    let g = greeter();
    let say_hi = g.binding.operation(&q("sayHi")).unwrap();
    assert!(!say_hi.is_unwrapped_capable());
    assert!(say_hi.unwrapped_operation().is_none());
    assert!(say_hi.ensure_unwrapped_operation().is_none());
}

#[test]
fn test_ensure_unwrapped_operation_is_idempotent() {
    let g = greeter();
    let op = g.operation("sayHi");
    let bop = g.binding.operation(&q("sayHi")).unwrap();

    // The abstract operation gains its unwrapped view after binding.
    op.create_unwrapped_operation();
    assert!(bop.is_unwrapped_capable());
    assert!(bop.unwrapped_operation().is_none());

    let first = bop.ensure_unwrapped_operation().unwrap();
    let second = bop.ensure_unwrapped_operation().unwrap();
    assert!(Arc::ptr_eq(&first, &second));
    assert!(Arc::ptr_eq(&bop.unwrapped_operation().unwrap(), &first));
    assert!(Arc::ptr_eq(&first.binding().unwrap(), &g.binding));
}

#[test]
fn test_recreating_unwrapped_view_keeps_binding_lookup() {
    let g = greeter();
    let wrapped = g.operation("greetMe");
    let first = wrapped.unwrapped_operation().unwrap();
    let again = wrapped.create_unwrapped_operation();
    assert!(Arc::ptr_eq(&first, &again));

    let ubop = g.binding.operation_for(&again).unwrap();
    assert!(ubop.is_unwrapped());
    assert!(Arc::ptr_eq(ubop.operation(), &again));
}

#[test]
fn test_binding_messages_mirror_abstract_messages() {
    let g = greeter();
    let bop = g.binding.operation(&q("greetMe")).unwrap();
    let input = bop.input().unwrap();
    assert_eq!(input.direction(), MessageDirection::Input);
    assert!(Arc::ptr_eq(input.message_info(), &g.operation("greetMe").input().unwrap()));
    assert_eq!(input.message_parts().len(), 1);
    assert!(Arc::ptr_eq(&input.binding_operation().unwrap(), &bop));

    let ubop = bop.unwrapped_operation().unwrap();
    let uinput = ubop.input().unwrap();
    assert_eq!(uinput.message_parts()[0].name().local_part(), "requestType");
}

#[test]
fn test_binding_faults_keyed_by_fault_name() {
    let g = greeter();
    let bop = g.binding.operation(&q("pingMe")).unwrap();
    let fault = bop.fault(&q("pingMeFault")).unwrap();
    assert_eq!(fault.fault_name(), &q("pingMeFault"));
    assert_eq!(fault.message_parts().len(), 1);
    assert!(bop.fault(&q("PingMeFault")).is_none());
    assert!(bop.output().is_some());
}

#[test]
fn test_binding_extensors_are_separate_from_abstract_ones() {
    #[derive(Debug)]
    struct SoapBody;

    let g = greeter();
    let bop = g.binding.operation(&q("greetMe")).unwrap();
    bop.input().unwrap().add_extensor(Arc::new(SoapBody));

    assert!(bop.input().unwrap().extensor::<SoapBody>().is_some());
    assert!(bop.input().unwrap().message_info().extensors::<SoapBody>().is_none());
    assert!(bop.extensors::<SoapBody>().is_none());
}

#[test]
fn test_operation_without_name_rejected() {
    let g = greeter();
    let iface = g.service.interface().unwrap();
    assert_eq!(
        iface.add_operation(QName::new(crate::helpers::greeter::NS, "")).unwrap_err(),
        ModelError::name_required("operation")
    );
}

#[test]
fn test_binding_reaches_interface() {
    let g = greeter();
    assert_eq!(g.binding.binding_id(), SOAP_BINDING);
    assert_eq!(g.binding.interface().unwrap().name(), &q("Greeter"));
    assert!(g.binding.remove_operation(&q("sayHi")).is_some());
    assert!(g.binding.operation(&q("sayHi")).is_none());
}
