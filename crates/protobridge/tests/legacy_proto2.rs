// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

#![allow(clippy::uninlined_format_args)] // Test/bench code readability over pedantic
#![allow(clippy::missing_panics_doc)] // Tests/examples panic on failure

//! Proto2 `None` handling under the legacy and strict configurations.

mod common;

use common::{call_proto, get, int, kw, loader, loader_with, new_message};
use protobridge::{BridgeConfig, BridgeError, Value};

#[test]
fn test_legacy_none_unsets_scalars() {
    let loader = loader();
    let m = new_message(&loader, "test.v2.Legacy", &[kw("f_int32", Value::Int(7))]);
    assert_eq!(int(&get(&m, "f_int32")), 7);

    m.set_field("f_int32", Value::None).expect("unset");
    assert!(get(&m, "f_int32").is_none());
    assert!(get(&m, "f_string").is_none());

    // Unset fields stay out of the encoded form.
    let json = call_proto(&loader, "encode_json", &[m], &[]).expect("json");
    assert_eq!(json.as_str(), Some("{}"));
}

#[test]
fn test_legacy_none_deletes_map_keys() {
    let loader = loader();
    let m = new_message(&loader, "test.v2.Legacy", &[]);
    let map = get(&m, "m_str_int");

    map.set_index(&Value::from("a"), Value::Int(1)).expect("set");
    map.set_index(&Value::from("b"), Value::Int(2)).expect("set");
    map.set_index(&Value::from("a"), Value::None).expect("delete");
    assert_eq!(map.len().expect("len"), 1);
    assert!(!map.contains(&Value::from("a")).expect("in"));

    // Deleting an absent key is a no-op.
    map.set_index(&Value::from("zz"), Value::None).expect("absent");
    assert_eq!(map.len().expect("len"), 1);

    let dict = Value::dict(vec![
        (Value::from("x"), Value::Int(1)),
        (Value::from("y"), Value::None),
    ])
    .expect("dict");
    m.set_field("m_str_int", dict).expect("assign with None");
    assert_eq!(get(&m, "m_str_int").len().expect("len"), 1);
}

#[test]
fn test_legacy_repeated_rejects_none_elements() {
    let loader = loader();
    let m = new_message(&loader, "test.v2.Legacy", &[]);
    let err = m
        .set_field("r", Value::list(vec![Value::Int(1), Value::None]))
        .expect_err("None element");
    assert!(matches!(err, BridgeError::TypeMismatch { .. }));
}

#[test]
fn test_strict_mode_rejects_none() {
    let loader = loader_with(BridgeConfig::strict());
    let m = new_message(&loader, "test.v2.Legacy", &[]);

    // Unset proto2 scalars read their declared default.
    assert_eq!(int(&get(&m, "f_int32")), 42);
    assert_eq!(get(&m, "f_string").as_str(), Some("hello"));

    let err = m.set_field("f_int32", Value::None).expect_err("strict");
    assert!(err.to_string().contains("proto3 mode"), "{}", err);

    let err = get(&m, "m_str_int")
        .set_index(&Value::from("a"), Value::None)
        .expect_err("strict map");
    assert!(matches!(err, BridgeError::NoneInProto3 { .. }));

    let dict = Value::dict(vec![(Value::from("a"), Value::None)]).expect("dict");
    let err = m.set_field("m_str_int", dict).expect_err("strict dict");
    assert!(err.to_string().starts_with("TypeError:"), "{}", err);
    assert!(err.to_string().contains("proto3 mode"), "{}", err);

    // Message fields still accept None.
    m.set_field("sub", Value::None).expect("unset sub");
}

#[test]
fn test_config_from_yaml_drives_loader() {
    let config = BridgeConfig::from_yaml_str("legacy_proto2_none: false\njson_indent: 4\n")
        .expect("config");
    let loader = loader_with(config);
    let m = new_message(&loader, "test.v2.Legacy", &[kw("f_int32", Value::Int(1))]);

    assert!(m.set_field("f_string", Value::None).is_err());
    let json = call_proto(&loader, "encode_json", &[m], &[kw("compact", Value::Bool(false))])
        .expect("json");
    assert_eq!(json.as_str(), Some("{\n    \"f_int32\": 1\n}"));
}
