// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

#![allow(clippy::uninlined_format_args)] // Test/bench code readability over pedantic
#![allow(clippy::unreadable_literal)] // Large test constants
#![allow(clippy::missing_panics_doc)] // Tests/examples panic on failure
#![allow(clippy::similar_names)] // Test variable naming

//! Message construction, field access, oneofs, wrappers and value semantics.

mod common;

use common::{call_method, call_proto, get, int, kw, loader, new_message};
use protobridge::{BridgeError, CompareOp, ErrorKind, Value};

// ============================================================================
// Construction
// ============================================================================

#[test]
fn test_constructor_keywords() {
    let loader = loader();
    let m = new_message(
        &loader,
        "test.v3.M",
        &[kw("f_int32", Value::Int(3)), kw("f_string", Value::from("hi"))],
    );
    assert_eq!(int(&get(&m, "f_int32")), 3);
    assert_eq!(get(&m, "f_string").as_str(), Some("hi"));
    assert_eq!(m.type_name(), "test.v3.M");
}

#[test]
fn test_constructor_rejects_positional_and_unknown() {
    let loader = loader();
    let ty = Value::MessageType(loader.message_type("test.v3.M").expect("M"));

    let err = ty.call(&[Value::Int(1)], &[]).expect_err("positional");
    assert!(matches!(err, BridgeError::PositionalArguments { .. }));

    let err = ty
        .call(&[], &[kw("nope", Value::Int(1))])
        .expect_err("unknown keyword");
    assert_eq!(
        err.to_string(),
        "test.v3.M: unexpected keyword argument \"nope\""
    );

    let err = ty
        .call(&[], &[kw("f_int32", Value::from("x"))])
        .expect_err("bad value");
    assert_eq!(err.kind(), ErrorKind::Type);
}

#[test]
fn test_unknown_fields() {
    let loader = loader();
    let m = new_message(&loader, "test.v3.M", &[]);

    assert!(m.attr("nope").expect("attr").is_none());
    let err = m.set_field("nope", Value::Int(1)).expect_err("set unknown");
    assert_eq!(err.to_string(), "AttributeError: test.v3.M has no field \"nope\"");

    let names = m.attr_names();
    assert_eq!(names.first().map(String::as_str), Some("f_int32"));
    assert!(!names.iter().any(|n| n == "choice"));
    assert!(names.iter().any(|n| n == "o_sub"));
}

// ============================================================================
// Sub-messages and oneofs
// ============================================================================

#[test]
fn test_unset_submessage_reads_none() {
    let loader = loader();
    let m = new_message(&loader, "test.v3.M", &[]);
    assert!(get(&m, "f_sub").is_none());

    let sub = new_message(&loader, "test.v3.Sub", &[kw("x", Value::Int(1))]);
    m.set_field("f_sub", sub).expect("assign");
    assert_eq!(int(&get(&get(&m, "f_sub"), "x")), 1);

    m.set_field("f_sub", Value::None).expect("unset");
    assert!(get(&m, "f_sub").is_none());
}

#[test]
fn test_submessage_type_checked() {
    let loader = loader();
    let m = new_message(&loader, "test.v3.M", &[]);
    let node = new_message(&loader, "test.v3.Node", &[]);

    let err = m.set_field("f_sub", node).expect_err("wrong message type");
    assert_eq!(
        err.to_string(),
        "TypeError: message of type `test.v3.Node' can't be assigned to type `test.v3.Sub'."
    );
    assert!(m.set_field("f_sub", Value::Int(1)).is_err());
}

#[test]
fn test_oneof_switching() {
    let loader = loader();
    let m = new_message(&loader, "test.v3.M", &[]);
    assert!(get(&m, "o_string").is_none());
    assert!(get(&m, "o_sub").is_none());

    m.set_field("o_string", Value::from("a")).expect("select string");
    assert_eq!(get(&m, "o_string").as_str(), Some("a"));

    let sub = new_message(&loader, "test.v3.Sub", &[kw("x", Value::Int(4))]);
    m.set_field("o_sub", sub).expect("select sub");
    // The cached read of o_string must not survive the switch.
    assert!(get(&m, "o_string").is_none());
    assert_eq!(int(&get(&get(&m, "o_sub"), "x")), 4);
}

#[test]
fn test_recursive_type() {
    let loader = loader();
    let leaf = new_message(&loader, "test.v3.Node", &[kw("depth", Value::Int(2))]);
    let root = new_message(&loader, "test.v3.Node", &[kw("child", leaf)]);

    let child = get(&root, "child");
    assert_eq!(int(&get(&child, "depth")), 2);
    assert!(get(&child, "child").is_none());
    assert_eq!(int(&get(&root, "depth")), 0);
}

// ============================================================================
// Scalar wrappers
// ============================================================================

#[test]
fn test_wrapper_boxing() {
    let loader = loader();
    let m = new_message(&loader, "test.v3.M", &[]);

    m.set_field("w_int32", Value::Int(5)).expect("box int");
    let boxed = get(&m, "w_int32");
    assert_eq!(boxed.type_name(), "google.protobuf.Int32Value");
    assert_eq!(int(&get(&boxed, "value")), 5);

    m.set_field("w_string", Value::from("s")).expect("box string");
    assert_eq!(get(&get(&m, "w_string"), "value").as_str(), Some("s"));

    let err = m
        .set_field("w_int32", Value::Int(2147483648))
        .expect_err("boxed overflow");
    assert!(matches!(err, BridgeError::Overflow { .. }));
    assert!(m.set_field("w_int32", Value::from("5")).is_err());

    let explicit = new_message(
        &loader,
        "google.protobuf.Int32Value",
        &[kw("value", Value::Int(9))],
    );
    m.set_field("w_int32", explicit).expect("explicit wrapper");
    assert_eq!(int(&get(&get(&m, "w_int32"), "value")), 9);
}

// ============================================================================
// Value semantics
// ============================================================================

#[test]
fn test_assignment_copies() {
    let loader = loader();
    let m = new_message(&loader, "test.v3.M", &[]);
    let sub = new_message(&loader, "test.v3.Sub", &[kw("x", Value::Int(1))]);

    m.set_field("f_sub", sub.clone()).expect("assign");
    sub.set_field("x", Value::Int(2)).expect("mutate original");
    assert_eq!(int(&get(&get(&m, "f_sub"), "x")), 1);

    // Assigning the same field to two places yields independent copies.
    m.set_field("o_sub", get(&m, "f_sub")).expect("copy across fields");
    get(&m, "o_sub").set_field("x", Value::Int(3)).expect("edit copy");
    assert_eq!(int(&get(&get(&m, "f_sub"), "x")), 1);
    assert_eq!(int(&get(&get(&m, "o_sub"), "x")), 3);
}

#[test]
fn test_in_place_edits_are_flushed() {
    let loader = loader();
    let m = new_message(&loader, "test.v3.M", &[]);
    m.set_field("f_sub", new_message(&loader, "test.v3.Sub", &[]))
        .expect("assign");

    get(&m, "f_sub").set_field("x", Value::Int(7)).expect("nested set");
    call_method(&get(&m, "r_string"), "append", &[Value::from("z")]).expect("append");
    get(&m, "m_str_int")
        .set_index(&Value::from("k"), Value::Int(1))
        .expect("map set");

    assert_eq!(int(&get(&get(&m, "f_sub"), "x")), 7);
    let json = call_proto(&loader, "encode_json", &[m], &[]).expect("json");
    assert_eq!(
        json.as_str(),
        Some(r#"{"f_sub":{"x":7},"r_string":["z"],"m_str_int":{"k":1}}"#)
    );
}

#[test]
fn test_equality() {
    let loader = loader();
    let a = new_message(&loader, "test.v3.Sub", &[kw("x", Value::Int(1))]);
    let b = new_message(&loader, "test.v3.Sub", &[kw("x", Value::Int(1))]);
    let c = new_message(&loader, "test.v3.Sub", &[kw("x", Value::Int(2))]);
    let node = new_message(&loader, "test.v3.Node", &[]);

    assert!(a.equals(&b).expect("eq"));
    assert!(!a.equals(&c).expect("ne"));
    assert!(a.compare(CompareOp::Ne, &c).expect("!="));
    assert!(!a.equals(&node).expect("different types"));
    assert!(!a.equals(&Value::Int(1)).expect("non-message"));

    call_method(&get(&b, "values"), "append", &[Value::Int(5)]).expect("append");
    assert!(!a.equals(&b).expect("list differs"));
}

#[test]
fn test_ordering_and_hash_rejected() {
    let loader = loader();
    let a = new_message(&loader, "test.v3.Sub", &[]);
    let b = new_message(&loader, "test.v3.Sub", &[]);

    let err = a.compare(CompareOp::Lt, &b).expect_err("ordering");
    assert_eq!(
        err.to_string(),
        "TypeError: unsupported operation < for test.v3.Sub and test.v3.Sub"
    );
    let err = a.hash().expect_err("hash");
    assert_eq!(err.to_string(), "TypeError: unhashable type: test.v3.Sub");
}

#[test]
fn test_repr() {
    let loader = loader();
    let empty = new_message(&loader, "test.v3.Sub", &[]);
    assert_eq!(empty.to_string(), "<test.v3.Sub>");

    let sub = new_message(&loader, "test.v3.Sub", &[kw("x", Value::Int(1))]);
    let repr = sub.to_string();
    assert!(repr.starts_with("<test.v3.Sub "), "{}", repr);
    assert!(repr.contains("x"), "{}", repr);
    assert!(sub.truth());
}
