// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Shared fixtures: a proto3 package `test.v3`, a proto2 package `test.v2`
//! and the Any/wrapper well-known files.

#![allow(dead_code)] // Not every test binary uses every helper

use prost_types::FileDescriptorProto;
use protobridge::schema::{
    any_file, pool_from_files, wrappers_file, EnumBuilder, FieldType, FileBuilder, MessageBuilder,
};
use protobridge::{BridgeConfig, Loader, Value};
use std::sync::Arc;

pub fn v3_file() -> FileDescriptorProto {
    use FieldType::*;
    FileBuilder::proto3("test/v3.proto", "test.v3")
        .dependency("google/protobuf/wrappers.proto")
        .enumeration(
            EnumBuilder::new("Color")
                .variant("COLOR_UNSPECIFIED")
                .variant("RED")
                .variant("GREEN"),
        )
        .message(
            MessageBuilder::new("Sub")
                .field("x", 1, Int32)
                .field("name", 2, String)
                .repeated("values", 3, Int64),
        )
        .message(
            MessageBuilder::new("Node")
                .field("child", 1, Message("test.v3.Node".into()))
                .field("depth", 2, Int32),
        )
        .message(
            MessageBuilder::new("Nested")
                .message(MessageBuilder::new("Leaf").field("id", 1, Int32))
                .enumeration(EnumBuilder::new("Mood").variant("MOOD_UNSPECIFIED").variant("HAPPY")),
        )
        .message(
            MessageBuilder::new("M")
                .field("f_int32", 1, Int32)
                .field("f_int64", 2, Int64)
                .field("f_uint32", 3, Uint32)
                .field("f_uint64", 4, Uint64)
                .field("f_float", 5, Float)
                .field("f_double", 6, Double)
                .field("f_bool", 7, Bool)
                .field("f_string", 8, String)
                .field("f_bytes", 9, Bytes)
                .field("f_enum", 10, Enum("test.v3.Color".into()))
                .field("f_sub", 11, Message("test.v3.Sub".into()))
                .repeated("r_string", 12, String)
                .repeated("r_sub", 13, Message("test.v3.Sub".into()))
                .map("m_str_int", 14, String, Int32)
                .map("m_str_sub", 15, String, Message("test.v3.Sub".into()))
                .oneof_field("choice", "o_string", 16, String)
                .oneof_field("choice", "o_sub", 17, Message("test.v3.Sub".into()))
                .field("w_int32", 18, Message("google.protobuf.Int32Value".into()))
                .field("w_string", 19, Message("google.protobuf.StringValue".into()))
                .field("f_sint32", 20, Sint32)
                .field("f_fixed64", 21, Fixed64),
        )
        .build()
}

pub fn v2_file() -> FileDescriptorProto {
    use FieldType::*;
    FileBuilder::proto2("test/v2.proto", "test.v2")
        .message(
            MessageBuilder::new("Legacy")
                .field_with_default("f_int32", 1, Int32, "42")
                .field_with_default("f_string", 2, String, "hello")
                .map("m_str_int", 3, String, Int32)
                .field("sub", 4, Message("test.v2.Legacy".into()))
                .repeated("r", 5, Int32),
        )
        .build()
}

pub fn loader_with(config: BridgeConfig) -> Arc<Loader> {
    let pool = pool_from_files(vec![any_file(), wrappers_file(), v3_file(), v2_file()])
        .expect("fixture pool");
    Arc::new(Loader::new(pool, config))
}

pub fn loader() -> Arc<Loader> {
    loader_with(BridgeConfig::default())
}

pub fn kw(name: &str, value: Value) -> (String, Value) {
    (name.to_string(), value)
}

/// `Type(**kwargs)` for a fully-qualified type name.
pub fn new_message(loader: &Loader, full_name: &str, kwargs: &[(String, Value)]) -> Value {
    Value::MessageType(loader.message_type(full_name).expect("message type"))
        .call(&[], kwargs)
        .expect("construct")
}

/// `value.name`, failing the test when the attribute is missing.
pub fn get(value: &Value, name: &str) -> Value {
    value
        .attr(name)
        .expect("attr")
        .unwrap_or_else(|| panic!("no attribute {}", name))
}

/// Call `proto.<name>(*args, **kwargs)`.
pub fn call_proto(
    loader: &Arc<Loader>,
    name: &str,
    args: &[Value],
    kwargs: &[(String, Value)],
) -> protobridge::Result<Value> {
    get(&loader.module(), name).call(args, kwargs)
}

/// Call a bound method `value.name(*args)`.
pub fn call_method(value: &Value, name: &str, args: &[Value]) -> protobridge::Result<Value> {
    get(value, name).call(args, &[])
}

pub fn strings(items: &[&str]) -> Value {
    Value::list(items.iter().map(|s| Value::from(*s)).collect())
}

pub fn int(value: &Value) -> i128 {
    value.as_int().unwrap_or_else(|| panic!("not an int: {}", value))
}
