//! Tests for concurrent reads and writes on a built model.

use std::sync::Arc;
use std::thread;

use svcmodel::{MessageDirection, PropertiesHolder, operation_for_wrapper_element};

use crate::helpers::greeter::{greeter, q, types};

#[derive(Debug)]
struct Tag(usize);

#[test]
fn test_extensor_appends_from_both_views_are_kept() {
    let g = greeter();
    let wrapped = g.operation("greetMe");
    let unwrapped = wrapped.unwrapped_operation().unwrap();

    thread::scope(|s| {
        for t in 0..8 {
            let target = if t % 2 == 0 { Arc::clone(&wrapped) } else { Arc::clone(&unwrapped) };
            s.spawn(move || {
                for i in 0..50 {
                    target.add_extensor(Arc::new(Tag(t * 1000 + i)));
                }
            });
        }
    });

    let mut seen: Vec<_> = wrapped.extensors::<Tag>().unwrap().iter().map(|t| t.0).collect();
    seen.sort_unstable();
    seen.dedup();
    assert_eq!(seen.len(), 400);
}

#[test]
fn test_concurrent_first_reads_share_one_index() {
    let g = greeter();
    let indexes: Vec<_> = thread::scope(|s| {
        let handles: Vec<_> = (0..8).map(|_| s.spawn(|| g.service.messages())).collect();
        handles.into_iter().map(|h| h.join().unwrap()).collect()
    });
    for index in &indexes[1..] {
        assert!(Arc::ptr_eq(index, &indexes[0]));
    }
}

#[test]
fn test_concurrent_wrapper_lookups_agree() {
    let g = greeter();
    let found: Vec<_> = thread::scope(|s| {
        let handles: Vec<_> = (0..8)
            .map(|_| {
                s.spawn(|| {
                    operation_for_wrapper_element(&g.service, &types("greetMe"), MessageDirection::Input)
                        .unwrap()
                })
            })
            .collect();
        handles.into_iter().map(|h| h.join().unwrap()).collect()
    });
    let expected = g.binding.operation(&q("greetMe")).unwrap();
    assert!(found.iter().all(|bop| Arc::ptr_eq(bop, &expected)));
}

#[test]
fn test_properties_written_while_reading() {
    let g = greeter();
    let op = g.operation("sayHi");
    thread::scope(|s| {
        let writer = s.spawn(|| {
            for i in 0..200 {
                op.set_property(format!("key{i}"), Some(Arc::new(i)));
            }
        });
        s.spawn(|| {
            for i in 0..200 {
                if let Some(v) = op.property_as::<i32>(&format!("key{i}")) {
                    assert_eq!(*v, i);
                }
            }
        });
        writer.join().unwrap();
    });
    assert!(op.has_property("key199"));
}
