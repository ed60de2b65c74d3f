// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

#![allow(clippy::uninlined_format_args)] // Test/bench code readability over pedantic
#![allow(clippy::missing_panics_doc)] // Tests/examples panic on failure

//! Freezing is transitive and every mutation path honours it.

mod common;

use common::{call_method, call_proto, get, int, kw, loader, new_message, strings};
use protobridge::{ErrorKind, Value};

fn populated(loader: &protobridge::Loader) -> Value {
    let sub = new_message(loader, "test.v3.Sub", &[kw("x", Value::Int(1))]);
    new_message(
        loader,
        "test.v3.M",
        &[
            kw("f_sub", sub),
            kw("r_string", strings(&["a"])),
            kw(
                "m_str_int",
                Value::dict(vec![(Value::from("k"), Value::Int(1))]).expect("dict"),
            ),
        ],
    )
}

#[test]
fn test_frozen_message_rejects_assignment() {
    let loader = loader();
    let m = populated(&loader);
    m.freeze();

    let err = m.set_field("f_int32", Value::Int(1)).expect_err("frozen");
    assert_eq!(err.to_string(), "cannot set field of frozen message");
    assert_eq!(err.kind(), ErrorKind::Frozen);
    // Reads still work.
    assert_eq!(int(&get(&get(&m, "f_sub"), "x")), 1);
}

#[test]
fn test_freeze_reaches_fields_read_later() {
    let loader = loader();
    let m = populated(&loader);
    m.freeze();

    let err = get(&m, "f_sub")
        .set_field("x", Value::Int(2))
        .expect_err("frozen sub");
    assert_eq!(err.to_string(), "cannot set field of frozen message");

    let err = call_method(&get(&m, "r_string"), "append", &[Value::from("b")])
        .expect_err("frozen list");
    assert_eq!(err.to_string(), "cannot append to frozen list");

    let err = get(&m, "m_str_int")
        .set_index(&Value::from("k"), Value::Int(2))
        .expect_err("frozen map");
    assert_eq!(err.to_string(), "cannot set item of frozen map");
}

#[test]
fn test_freeze_reaches_fields_read_earlier() {
    let loader = loader();
    let m = populated(&loader);
    let list = get(&m, "r_string");
    let map = get(&m, "m_str_int");
    let sub = get(&m, "f_sub");
    m.freeze();

    assert!(call_method(&list, "clear", &[]).is_err());
    assert!(call_method(&map, "pop", &[Value::from("k")]).is_err());
    assert!(sub.set_field("x", Value::Int(3)).is_err());
    assert_eq!(list.len().expect("len"), 1);
}

#[test]
fn test_frozen_module_operations() {
    let loader = loader();
    let m = populated(&loader);
    let other = populated(&loader);
    m.freeze();

    let err = call_proto(&loader, "clear", &[m.clone()], &[]).expect_err("clear");
    assert_eq!(err.to_string(), "cannot clear frozen message");
    let err = call_proto(&loader, "merge", &[m.clone(), other.clone()], &[])
        .expect_err("merge");
    assert_eq!(err.to_string(), "cannot merge into frozen message");
    assert!(call_proto(&loader, "set_defaults", &[m.clone()], &[]).is_err());

    // Frozen sources are fine, and clones come back mutable.
    call_proto(&loader, "merge", &[other, m.clone()], &[]).expect("merge from frozen");
    let copy = call_proto(&loader, "clone", &[m], &[]).expect("clone");
    copy.set_field("f_int32", Value::Int(5)).expect("clone is mutable");
}

#[test]
fn test_freeze_plain_containers() {
    let inner = Value::list(vec![Value::Int(1)]);
    let dict = Value::dict(vec![(Value::from("l"), inner.clone())]).expect("dict");
    dict.freeze();

    let err = inner
        .set_index(&Value::Int(0), Value::Int(2))
        .expect_err("nested list frozen");
    assert_eq!(err.kind(), ErrorKind::Frozen);
    assert!(dict.set_index(&Value::from("x"), Value::None).is_err());
}
