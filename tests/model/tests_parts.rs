//! Tests for message part indexing and lookup.

use std::sync::Arc;

use rstest::rstest;
use svcmodel::{MessageContainer, MessageDirection, ModelError, QName};

use crate::helpers::assertions::{assert_same_part, part_indexes, part_names};
use crate::helpers::greeter::{greeter, q};

fn empty_message() -> (crate::helpers::greeter::Greeter, Arc<svcmodel::MessageInfo>) {
    let g = greeter();
    let op = g.operation("sayHi");
    let message = op.create_message(q("scratch"), MessageDirection::Input);
    (g, message)
}

#[test]
fn test_readding_a_part_updates_in_place() {
    let (_g, message) = empty_message();
    let first = message.add_message_part(q("a")).unwrap();
    message.add_message_part(q("b")).unwrap();
    let again = message.add_message_part(q("a")).unwrap();

    assert_eq!(again.index(), first.index());
    assert_eq!(message.part_count(), 2);
    assert_eq!(part_names(&*message), vec!["a", "b"]);
    assert_same_part(&message.message_part(&q("a")).unwrap(), &again);
}

#[rstest]
#[case(0)]
#[case(1)]
#[case(3)]
fn test_out_of_band_parts_follow_named_parts(#[case] named: usize) {
    let (_g, message) = empty_message();
    for i in 0..named {
        message.add_message_part(q(&format!("p{i}"))).unwrap();
    }
    let attachments: Vec<_> = ["att0", "att1"]
        .iter()
        .map(|n| message.add_out_of_band_part(q(n)).unwrap())
        .collect();

    assert_eq!(attachments[0].index(), named);
    assert_eq!(attachments[1].index(), named + 1);
    for i in 0..named {
        let part = message.message_part_by_index(i).unwrap();
        assert!(!message.out_of_band_parts().iter().any(|p| Arc::ptr_eq(p, &part)));
    }
    assert_eq!(message.part_count(), named + 2);
    assert_eq!(part_indexes(&*message), (0..named + 2).collect::<Vec<_>>());
}

#[test]
fn test_named_part_added_after_attachment_stays_in_front() {
    let (_g, message) = empty_message();
    message.add_message_part(q("body")).unwrap();
    let attachment = message.add_out_of_band_part(q("att")).unwrap();
    let late = message.add_message_part(q("header")).unwrap();

    assert_eq!(late.index(), 1);
    assert_eq!(attachment.index(), 2);
    assert_eq!(part_names(&*message), vec!["body", "header", "att"]);
}

#[test]
fn test_lookup_by_concrete_name() {
    let (_g, message) = empty_message();
    let part = message.add_message_part(q("in")).unwrap();
    part.set_concrete_name(QName::new("", "arg0"));

    assert_same_part(&message.message_part(&QName::new("", "arg0")).unwrap(), &part);
    assert!(message.message_part(&q("arg0")).is_none());
}

#[test]
fn test_part_index_is_by_identity() {
    let (g, message) = empty_message();
    let mine = message.add_message_part(q("in")).unwrap();
    let other = g
        .operation("greetMe")
        .create_message(q("other"), MessageDirection::Input)
        .add_message_part(q("in"))
        .unwrap();

    assert_eq!(message.message_part_index(&mine), Some(0));
    assert_eq!(message.message_part_index(&other), None);
}

#[test]
fn test_unknown_index_is_absent() {
    let (_g, message) = empty_message();
    message.add_message_part(q("in")).unwrap();
    assert!(message.message_part_by_index(1).is_none());
    assert!(message.message_part(&q("missing")).is_none());
}

#[test]
fn test_part_without_name_rejected() {
    let (_g, message) = empty_message();
    assert_eq!(
        message.add_message_part(QName::default()).unwrap_err(),
        ModelError::name_required("message part")
    );
    assert!(message.add_out_of_band_part(QName::new(crate::helpers::greeter::NS, "")).is_err());
    assert_eq!(message.part_count(), 0);
}

#[test]
fn test_parts_know_their_message() {
    let g = greeter();
    let input = g.operation("greetMe").input().unwrap();
    let part = input.first_message_part().unwrap();
    assert!(Arc::ptr_eq(&part.message().unwrap(), &input));
    assert_eq!(part.schema_qname().unwrap().local_part(), "greetMe");
}
